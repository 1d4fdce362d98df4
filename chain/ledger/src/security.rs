//! Authorization primitives
//!
//! The ledger has exactly one privileged identity, the owner, fixed at
//! construction. Whether withdrawals require it is a configuration choice.

use ledger_types::ids::Address;
use serde::{Deserialize, Serialize};

/// Who may move funds out of custody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WithdrawPolicy {
    /// Any caller may withdraw up to the current custody.
    #[default]
    AnyCaller,
    /// Only the owner may withdraw.
    OwnerOnly,
}

impl WithdrawPolicy {
    /// Whether `caller` may withdraw from a ledger with this `ownership`.
    pub fn permits(&self, caller: &Address, ownership: &Ownable) -> bool {
        match self {
            WithdrawPolicy::AnyCaller => true,
            WithdrawPolicy::OwnerOnly => ownership.is_owner(caller),
        }
    }
}

/// Immutable single-owner access control.
///
/// Unlike a role table, ownership here can never be transferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ownable {
    owner: Address,
}

impl Ownable {
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// Check if a caller is the owner.
    pub fn is_owner(&self, caller: &Address) -> bool {
        self.owner == *caller
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_caller_permits_everyone() {
        let owner = Address::from_seed("owner");
        let ownership = Ownable::new(owner);
        let eve = Address::from_seed("eve");
        assert!(WithdrawPolicy::AnyCaller.permits(&eve, &ownership));
        assert!(WithdrawPolicy::AnyCaller.permits(&owner, &ownership));
    }

    #[test]
    fn test_owner_only_rejects_others() {
        let owner = Address::from_seed("owner");
        let ownership = Ownable::new(owner);
        let eve = Address::from_seed("eve");
        assert!(!WithdrawPolicy::OwnerOnly.permits(&eve, &ownership));
        assert!(WithdrawPolicy::OwnerOnly.permits(&owner, &ownership));
    }

    #[test]
    fn test_default_policy_is_any_caller() {
        assert_eq!(WithdrawPolicy::default(), WithdrawPolicy::AnyCaller);
    }

    #[test]
    fn test_ownable() {
        let owner = Address::from_seed("owner");
        let ownable = Ownable::new(owner);
        assert!(ownable.is_owner(&owner));
        assert!(!ownable.is_owner(&Address::from_seed("user1")));
        assert_eq!(ownable.owner(), &owner);
    }
}
