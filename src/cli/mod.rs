pub mod add;
pub mod clear;
pub mod export;
pub mod import;
pub mod remove;
pub mod setup;
pub mod summary;
pub mod ui;
