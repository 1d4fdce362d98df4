//! Ledger error types
//!
//! Every failed call surfaces exactly one of these, and none of them leaves
//! the order log, the event log, or any balance changed.

use ledger_types::ids::Address;
use ledger_types::numeric::Amount;
use thiserror::Error;

/// Caller input failed a precondition
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Amount must not be zero")]
    ZeroPayment,

    #[error("Amount must not be negative: {amount}")]
    NegativeAmount { amount: Amount },

    #[error("Function is not payable: {attached} attached")]
    NonPayable { attached: Amount },

    #[error("Call addressed to {actual}, ledger is {expected}")]
    WrongContract { expected: Address, actual: Address },
}

/// Outbound fund movement could not be completed
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Transfer failed: requested {requested}, custody holds {available}")]
    InsufficientCustody { requested: Amount, available: Amount },

    #[error("Transfer failed: {caller} is not allowed to withdraw")]
    Unauthorized { caller: Address },

    #[error("Transfer failed: {0}")]
    Rejected(SubstrateError),
}

/// Failures reported by the value-transfer substrate itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubstrateError {
    #[error("Insufficient funds at {address}: required {required}, available {available}")]
    InsufficientFunds {
        address: Address,
        required: Amount,
        available: Amount,
    },

    #[error("Transfer amount must not be negative: {amount}")]
    NegativeAmount { amount: Amount },

    #[error("Recipient {to} rejected the transfer")]
    Rejected { to: Address },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Top-level error returned by every mutating ledger call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    /// The substrate refused the call before the ledger ran, e.g. the caller
    /// could not fund the attached value.
    #[error("Substrate error: {0}")]
    Substrate(#[from] SubstrateError),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Malformed ledger configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
