//! Error types for the shared ledger types

use thiserror::Error;

/// Address parsing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AddressError {
    #[error("Address must start with 0x: {input}")]
    MissingPrefix { input: String },

    #[error("Address must be {expected} hex digits, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid hex digit in address: {input}")]
    InvalidHex { input: String },
}

/// Amount parsing errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmountError {
    #[error("Invalid amount: {0}")]
    Invalid(String),

    #[error("Amount must not be negative: {0}")]
    Negative(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_error_display() {
        let err = AddressError::InvalidLength {
            expected: 40,
            actual: 3,
        };
        assert_eq!(err.to_string(), "Address must be 40 hex digits, got 3");
    }

    #[test]
    fn test_amount_error_display() {
        let err = AmountError::Negative("-1".to_string());
        assert!(err.to_string().contains("-1"));
    }
}
