//! Order record
//!
//! An order is an immutable entry in the ledger's order log: the descriptive
//! fields supplied by the buyer plus the value actually attached to the call.

use crate::ids::{Address, TxId};
use crate::numeric::Amount;
use serde::{Deserialize, Serialize};

/// Descriptive fields supplied when placing an order.
///
/// All fields are opaque to the ledger. `price_label` is display text only
/// and is never compared with the attached payment.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub name: String,
    pub category: String,
    pub image: String,
    pub description: String,
    pub price_label: String,
}

impl OrderRequest {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        image: impl Into<String>,
        description: impl Into<String>,
        price_label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            image: image.into(),
            description: description.into(),
            price_label: price_label.into(),
        }
    }
}

/// A placed order
///
/// Invariant: `amount_paid > 0`. The ledger never mutates or removes an
/// order once it has been appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Position in the order log (zero-based)
    pub index: u64,
    pub name: String,
    pub category: String,
    pub image: String,
    pub description: String,
    pub price_label: String,
    /// Exact value attached to the placing call
    pub amount_paid: Amount,
    /// Caller that placed the order
    #[serde(rename = "from")]
    pub buyer: Address,
    pub tx_id: TxId,
    /// Unix timestamp in milliseconds
    pub placed_at: i64,
}

impl Order {
    /// Build an order from a request and the call that carried it.
    pub fn from_request(
        index: u64,
        request: OrderRequest,
        amount_paid: Amount,
        buyer: Address,
        tx_id: TxId,
        placed_at: i64,
    ) -> Self {
        let OrderRequest {
            name,
            category,
            image,
            description,
            price_label,
        } = request;
        Self {
            index,
            name,
            category,
            image,
            description,
            price_label,
            amount_paid,
            buyer,
            tx_id,
            placed_at,
        }
    }
}
