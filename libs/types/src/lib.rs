//! Types library for the marketplace ledger
//!
//! Value types shared by the ledger contract and anything that calls it:
//! identities, amounts, and the order record.
//!
//! # Modules
//! - `ids`: Identities (Address, TxId)
//! - `numeric`: Ether-denominated amounts
//! - `order`: Order record and placement request
//! - `errors`: Parse errors for the types above

pub mod ids;
pub mod numeric;
pub mod order;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::errors::*;
}
