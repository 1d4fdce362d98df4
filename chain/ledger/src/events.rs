//! Ledger events
//!
//! Events are immutable records appended by successful ledger calls.
//! A rejected call never emits an event.

use ledger_types::ids::{Address, TxId};
use ledger_types::numeric::Amount;
use serde::{Deserialize, Serialize};

/// Ledger created and owner bound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployed {
    pub address: Address,
    pub owner: Address,
}

/// Order appended to the order log and its payment forwarded to the owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub index: u64,
    pub buyer: Address,
    pub amount: Amount,
    pub tx_id: TxId,
}

/// Bare value transfer accepted into custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposited {
    pub from: Address,
    pub amount: Amount,
    pub tx_id: TxId,
}

/// Funds moved out of custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawn {
    pub to: Address,
    pub amount: Amount,
    pub tx_id: TxId,
}

/// Enum wrapper for all ledger events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    Deployed(Deployed),
    OrderPlaced(OrderPlaced),
    Deposited(Deposited),
    Withdrawn(Withdrawn),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_order_placed_serialization() {
        let event = ContractEvent::OrderPlaced(OrderPlaced {
            index: 0,
            buyer: Address::from_seed("user1"),
            amount: Decimal::new(1, 1),
            tx_id: TxId::new(),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("OrderPlaced"));
        let deser: ContractEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }

    #[test]
    fn test_withdrawn_serialization() {
        let event = Withdrawn {
            to: Address::from_seed("user1"),
            amount: Decimal::new(5, 1),
            tx_id: TxId::new(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let deser: Withdrawn = serde_json::from_str(&json).unwrap();
        assert_eq!(event, deser);
    }
}
