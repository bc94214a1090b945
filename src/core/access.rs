//! Shared-secret access gate

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AccessError {
    #[error("An access PIN is required (use --pin or AURUM_PIN)")]
    PinRequired,

    #[error("Invalid PIN")]
    InvalidPin,
}

/// Proof that the access gate was passed. Only [`AccessGate::unlock`] creates one.
#[derive(Debug, Clone)]
pub struct Session {
    unlocked_at: DateTime<Local>,
}

impl Session {
    pub fn unlocked_at(&self) -> DateTime<Local> {
        self.unlocked_at
    }
}

pub struct AccessGate {
    secret: Option<String>,
}

impl AccessGate {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn requires_pin(&self) -> bool {
        self.secret.is_some()
    }

    pub fn authenticate(&self, candidate: &str) -> bool {
        match &self.secret {
            Some(secret) => secret == candidate,
            None => true,
        }
    }

    pub fn unlock(&self, candidate: Option<&str>) -> Result<Session, AccessError> {
        if !self.requires_pin() {
            info!("No access PIN configured, ledger is unprotected");
            return Ok(Self::session());
        }

        let candidate = candidate.ok_or(AccessError::PinRequired)?;
        if self.authenticate(candidate) {
            debug!("Access granted");
            Ok(Self::session())
        } else {
            Err(AccessError::InvalidPin)
        }
    }

    fn session() -> Session {
        Session {
            unlocked_at: Local::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_pin_unlocks() {
        let gate = AccessGate::new(Some("131008".to_string()));
        assert!(gate.requires_pin());
        assert!(gate.authenticate("131008"));

        let before = Local::now();
        let session = gate.unlock(Some("131008")).unwrap();
        assert!(session.unlocked_at() >= before);
    }

    #[test]
    fn test_wrong_pin_fails() {
        let gate = AccessGate::new(Some("131008".to_string()));
        assert!(!gate.authenticate("000000"));
        assert!(!gate.authenticate(""));
        assert_eq!(gate.unlock(Some("1310")).unwrap_err(), AccessError::InvalidPin);
    }

    #[test]
    fn test_missing_pin_is_required() {
        let gate = AccessGate::new(Some("4321".to_string()));
        assert_eq!(gate.unlock(None).unwrap_err(), AccessError::PinRequired);
    }

    #[test]
    fn test_no_secret_means_open_gate() {
        let gate = AccessGate::new(None);
        assert!(!gate.requires_pin());
        assert!(gate.unlock(None).is_ok());

        let blank = AccessGate::new(Some(String::new()));
        assert!(!blank.requires_pin());
        assert!(blank.unlock(Some("anything")).is_ok());
    }
}
