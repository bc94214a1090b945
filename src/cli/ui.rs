use crate::core::valuation::Status;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    TotalLabel,
    TotalValue,
    Error,
    Success,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::TotalLabel => style(text).bold(),
        StyleType::TotalValue => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Success => style(text).green(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right-aligned cell with two decimals.
pub fn amount_cell(value: f64) -> Cell {
    Cell::new(format!("{value:.2}")).set_alignment(CellAlignment::Right)
}

/// Formats a fallible metric. Errors are displayed as "N/A".
pub fn format_result_cell<E>(value: Result<f64, E>) -> Cell {
    match value {
        Ok(v) => amount_cell(v),
        Err(_) => Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
    }
}

/// Creates a cell for displaying profit or loss with color coding.
pub fn profit_cell(profit: f64) -> Cell {
    let cell = amount_cell(profit);
    if profit > 0.0 {
        cell.fg(Color::Green)
    } else {
        cell.fg(Color::Red)
    }
}

pub fn status_label(status: Status) -> &'static str {
    match status {
        Status::Matured => "✅ SELL",
        Status::Holding => "❌ HOLD",
    }
}

pub fn status_cell(status: Status) -> Cell {
    let cell = Cell::new(status_label(status)).add_attribute(Attribute::Bold);
    match status {
        Status::Matured => cell.fg(Color::Green),
        Status::Holding => cell.fg(Color::Red),
    }
}
