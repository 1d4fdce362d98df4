//! Marketplace Ledger Contract
//!
//! A single owner receives the payments attached to orders placed by any
//! caller, while bare deposits accumulate in the ledger's custody until they
//! are withdrawn. Balances live on an external value-transfer substrate; the
//! ledger only decides what moves where.
//!
//! # Modules
//! - `errors`: Validation, transfer and substrate error taxonomy
//! - `events`: Events appended by successful calls
//! - `security`: Owner identity and withdrawal authorization policy
//! - `config`: Ledger configuration
//! - `substrate`: Substrate traits and the in-memory chain
//! - `ledger`: The ledger contract
//!
//! # Example
//! ```
//! use ledger::prelude::*;
//! use rust_decimal::Decimal;
//!
//! let owner = Address::from_seed("owner");
//! let buyer = Address::from_seed("buyer");
//! let mut chain = InMemoryChain::new();
//! chain.fund(&buyer, Decimal::ONE).unwrap();
//!
//! let mut ledger = Ledger::deploy(&mut chain, owner, LedgerConfig::default());
//! let call = Call::new(buyer, *ledger.address()).with_value(Decimal::new(1, 1));
//! let request = OrderRequest::new("Album 1", "Pop", "image.jpg", "Great album", "10 ETH");
//! chain.execute(call, |env| ledger.place_order(env, request)).unwrap();
//!
//! assert_eq!(ledger.show_orders().len(), 1);
//! assert_eq!(ledger.get_balance(&chain), Decimal::new(1, 1));
//! ```

pub mod config;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod security;
pub mod substrate;

pub use crate::ledger::Ledger;

/// Contract ABI version, frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::LedgerConfig;
    pub use crate::errors::{LedgerError, SubstrateError, TransferError, ValidationError};
    pub use crate::events::ContractEvent;
    pub use crate::ledger::Ledger;
    pub use crate::security::WithdrawPolicy;
    pub use crate::substrate::{BalanceQuery, Call, ChainConfig, InMemoryChain, Substrate};
    pub use ledger_types::ids::{Address, TxId};
    pub use ledger_types::numeric::{parse_ether, Amount};
    pub use ledger_types::order::{Order, OrderRequest};
}
