//! Input checks done locally before anything goes over the wire.
//! They mirror what the backend enforces so obvious mistakes fail fast.

use super::error::{ActionError, AuthError};

/// Longest passphrase the backend accepts
pub const MAX_PASSPHRASE_LEN: usize = 1024;

pub fn validate_pin(pin: &str) -> Result<(), AuthError> {
    if pin.is_empty() {
        return Err(AuthError::EmptyPin);
    }
    Ok(())
}

pub fn validate_passphrase(passphrase: &str) -> Result<(), ActionError> {
    if passphrase.is_empty() {
        return Err(ActionError::InvalidPassphrase(
            "Please enter a passphrase".to_string(),
        ));
    }

    if passphrase.len() > MAX_PASSPHRASE_LEN {
        return Err(ActionError::InvalidPassphrase(
            "Passphrase too long".to_string(),
        ));
    }

    // A newline would terminate the askpass prompt early
    if passphrase.chars().any(|c| c.is_control()) {
        return Err(ActionError::InvalidPassphrase(
            "Passphrase contains invalid characters".to_string(),
        ));
    }

    Ok(())
}
