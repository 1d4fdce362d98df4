//! Value-transfer substrate
//!
//! The ledger never holds balances itself. It consumes an execution
//! environment that knows who is calling, how much value rides on the call,
//! and how to move funds atomically. `Substrate` is that seam;
//! `InMemoryChain` is a process-local implementation with EVM-like call
//! semantics:
//! - the attached value is credited to the target contract before it runs
//! - a failed call restores every balance it touched
//! - a flat call fee is charged to the caller and burned, success or not

use chrono::Utc;
use ledger_types::ids::{Address, TxId};
use ledger_types::numeric::Amount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::errors::SubstrateError;

/// Read-only balance lookup.
pub trait BalanceQuery {
    /// Balance currently held by `address`. Unknown addresses hold zero.
    fn balance_of(&self, address: &Address) -> Amount;
}

/// The environment of one executing call, as seen by a contract.
pub trait Substrate: BalanceQuery {
    /// Identity of the invoker.
    fn caller(&self) -> &Address;

    /// Address of the contract being executed.
    fn contract(&self) -> &Address;

    /// Value attached to the call (zero if none). Already credited to
    /// `contract()` by the time the contract runs.
    fn attached_value(&self) -> Amount;

    fn tx_id(&self) -> TxId;

    /// Unix timestamp in milliseconds.
    fn timestamp(&self) -> i64;

    /// Move `amount` out of the contract's custody to `to`.
    ///
    /// Atomic: either the full amount moves or nothing changes.
    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), SubstrateError>;
}

/// Hands out contract creation nonces.
pub trait Deployer {
    /// Return the creator's current nonce and advance it.
    fn next_nonce(&mut self, creator: &Address) -> u64;
}

/// An invocation of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Call {
    pub caller: Address,
    pub contract: Address,
    pub value: Amount,
}

impl Call {
    /// A call with no attached value.
    pub fn new(caller: Address, contract: Address) -> Self {
        Self {
            caller,
            contract,
            value: Decimal::ZERO,
        }
    }

    pub fn with_value(mut self, value: Amount) -> Self {
        self.value = value;
        self
    }
}

/// In-memory substrate configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Flat fee charged to the caller of every executed call, then burned
    pub call_fee: Amount,
}

/// Process-local value-transfer substrate.
#[derive(Debug, Default)]
pub struct InMemoryChain {
    balances: HashMap<Address, Amount>,
    nonces: HashMap<Address, u64>,
    /// Recipients whose inbound contract transfers fail
    rejecting: HashSet<Address>,
    config: ChainConfig,
    /// Total call fees burned
    burned: Amount,
    /// Previous balances of addresses touched by the executing call
    journal: Option<Vec<(Address, Amount)>>,
}

impl InMemoryChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ChainConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Genesis allocation: credit `amount` to `address` out of thin air.
    pub fn fund(&mut self, address: &Address, amount: Amount) -> Result<(), SubstrateError> {
        check_non_negative(amount)?;
        let current = self.balance_of(address);
        let new_balance = current
            .checked_add(amount)
            .ok_or(SubstrateError::Overflow)?;
        self.set_balance(address, new_balance);
        Ok(())
    }

    /// Plain value transfer between two accounts, with no contract code run.
    pub fn send(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), SubstrateError> {
        self.move_funds(from, to, amount)
    }

    /// Make every contract-initiated transfer to `address` fail.
    pub fn reject_transfers_to(&mut self, address: Address) {
        self.rejecting.insert(address);
    }

    pub fn accept_transfers_to(&mut self, address: &Address) {
        self.rejecting.remove(address);
    }

    /// Total call fees burned so far.
    pub fn burned(&self) -> Amount {
        self.burned
    }

    /// Sum of every balance held on the chain, or `None` if it overflows.
    pub fn total_balance(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(Decimal::ZERO, |total, balance| total.checked_add(*balance))
    }

    /// Run `body` as a call to `call.contract`.
    ///
    /// The call fee is charged first and is never refunded. The attached
    /// value then moves from caller to contract. If that move or `body`
    /// fails, every balance touched after the fee is restored.
    pub fn execute<T, E, F>(&mut self, call: Call, body: F) -> Result<T, E>
    where
        F: FnOnce(&mut CallFrame<'_>) -> Result<T, E>,
        E: From<SubstrateError>,
    {
        let tx_id = TxId::new();
        self.charge_fee(&call.caller)?;

        self.journal = Some(Vec::new());
        let result = match self.move_funds(&call.caller, &call.contract, call.value) {
            Ok(()) => {
                let mut frame = CallFrame {
                    chain: &mut *self,
                    call,
                    tx_id,
                    timestamp: Utc::now().timestamp_millis(),
                };
                body(&mut frame)
            }
            Err(err) => Err(E::from(err)),
        };

        let journal = self.journal.take().unwrap_or_default();
        if result.is_err() {
            debug!(%tx_id, touched = journal.len(), "call failed, reverting balances");
            self.rollback(journal);
        }
        result
    }

    // ───────────────────────── Internal ─────────────────────────

    fn charge_fee(&mut self, payer: &Address) -> Result<(), SubstrateError> {
        let fee = self.config.call_fee;
        if fee.is_zero() {
            return Ok(());
        }
        let available = self.balance_of(payer);
        if available < fee {
            return Err(SubstrateError::InsufficientFunds {
                address: *payer,
                required: fee,
                available,
            });
        }
        self.set_balance(payer, available - fee);
        self.burned += fee;
        Ok(())
    }

    /// Atomic move with underflow and overflow protection.
    fn move_funds(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), SubstrateError> {
        check_non_negative(amount)?;

        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(SubstrateError::InsufficientFunds {
                address: *from,
                required: amount,
                available: from_balance,
            });
        }
        if amount.is_zero() || from == to {
            return Ok(());
        }

        let new_to = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(SubstrateError::Overflow)?;
        let new_from = from_balance
            .checked_sub(amount)
            .ok_or(SubstrateError::Overflow)?;

        self.set_balance(from, new_from);
        self.set_balance(to, new_to);
        debug!(%from, %to, %amount, "funds moved");
        Ok(())
    }

    fn set_balance(&mut self, address: &Address, balance: Amount) {
        if let Some(journal) = self.journal.as_mut() {
            let previous = self.balances.get(address).copied().unwrap_or(Decimal::ZERO);
            journal.push((*address, previous));
        }
        self.balances.insert(*address, balance);
    }

    fn rollback(&mut self, journal: Vec<(Address, Amount)>) {
        for (address, previous) in journal.into_iter().rev() {
            self.balances.insert(address, previous);
        }
    }
}

impl BalanceQuery for InMemoryChain {
    fn balance_of(&self, address: &Address) -> Amount {
        self.balances.get(address).copied().unwrap_or(Decimal::ZERO)
    }
}

impl Deployer for InMemoryChain {
    fn next_nonce(&mut self, creator: &Address) -> u64 {
        let nonce = self.nonces.entry(*creator).or_insert(0);
        let current = *nonce;
        *nonce += 1;
        current
    }
}

/// One executing call on an `InMemoryChain`.
#[derive(Debug)]
pub struct CallFrame<'a> {
    chain: &'a mut InMemoryChain,
    call: Call,
    tx_id: TxId,
    timestamp: i64,
}

impl BalanceQuery for CallFrame<'_> {
    fn balance_of(&self, address: &Address) -> Amount {
        self.chain.balance_of(address)
    }
}

impl Substrate for CallFrame<'_> {
    fn caller(&self) -> &Address {
        &self.call.caller
    }

    fn contract(&self) -> &Address {
        &self.call.contract
    }

    fn attached_value(&self) -> Amount {
        self.call.value
    }

    fn tx_id(&self) -> TxId {
        self.tx_id
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }

    fn transfer(&mut self, to: &Address, amount: Amount) -> Result<(), SubstrateError> {
        if self.chain.rejecting.contains(to) {
            return Err(SubstrateError::Rejected { to: *to });
        }
        let from = self.call.contract;
        self.chain.move_funds(&from, to, amount)
    }
}

fn check_non_negative(amount: Amount) -> Result<(), SubstrateError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(SubstrateError::NegativeAmount { amount });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(seed: &str) -> Address {
        Address::from_seed(seed)
    }

    #[test]
    fn test_fund_and_balance() {
        let mut chain = InMemoryChain::new();
        chain.fund(&addr("alice"), Decimal::from(10)).unwrap();
        chain.fund(&addr("alice"), Decimal::from(5)).unwrap();
        assert_eq!(chain.balance_of(&addr("alice")), Decimal::from(15));
        assert_eq!(chain.balance_of(&addr("bob")), Decimal::ZERO);
    }

    #[test]
    fn test_fund_overflow() {
        let mut chain = InMemoryChain::new();
        chain.fund(&addr("alice"), Decimal::MAX).unwrap();
        assert_eq!(
            chain.fund(&addr("alice"), Decimal::ONE),
            Err(SubstrateError::Overflow)
        );
        assert_eq!(chain.balance_of(&addr("alice")), Decimal::MAX);
    }

    #[test]
    fn test_send_insufficient() {
        let mut chain = InMemoryChain::new();
        chain.fund(&addr("alice"), Decimal::ONE).unwrap();
        let result = chain.send(&addr("alice"), &addr("bob"), Decimal::from(2));
        assert!(matches!(
            result,
            Err(SubstrateError::InsufficientFunds { .. })
        ));
        assert_eq!(chain.balance_of(&addr("alice")), Decimal::ONE);
        assert_eq!(chain.balance_of(&addr("bob")), Decimal::ZERO);
    }

    #[test]
    fn test_send_negative() {
        let mut chain = InMemoryChain::new();
        let result = chain.send(&addr("alice"), &addr("bob"), Decimal::from(-1));
        assert!(matches!(result, Err(SubstrateError::NegativeAmount { .. })));
    }

    #[test]
    fn test_execute_credits_attached_value() {
        let mut chain = InMemoryChain::new();
        chain.fund(&addr("alice"), Decimal::from(3)).unwrap();
        let call = Call::new(addr("alice"), addr("contract")).with_value(Decimal::from(2));

        let seen = chain
            .execute(call, |frame| -> Result<Amount, SubstrateError> {
                assert_eq!(frame.caller(), &addr("alice"));
                assert_eq!(frame.attached_value(), Decimal::from(2));
                Ok(frame.balance_of(&addr("contract")))
            })
            .unwrap();

        assert_eq!(seen, Decimal::from(2));
        assert_eq!(chain.balance_of(&addr("alice")), Decimal::ONE);
    }

    #[test]
    fn test_execute_reverts_on_error() {
        let mut chain = InMemoryChain::new();
        chain.fund(&addr("alice"), Decimal::from(3)).unwrap();
        let call = Call::new(addr("alice"), addr("contract")).with_value(Decimal::from(2));

        let result: Result<(), SubstrateError> = chain.execute(call, |frame| {
            frame.transfer(&addr("bob"), Decimal::ONE)?;
            Err(SubstrateError::Rejected { to: addr("bob") })
        });

        assert!(result.is_err());
        assert_eq!(chain.balance_of(&addr("alice")), Decimal::from(3));
        assert_eq!(chain.balance_of(&addr("contract")), Decimal::ZERO);
        assert_eq!(chain.balance_of(&addr("bob")), Decimal::ZERO);
    }

    #[test]
    fn test_execute_fails_when_caller_cannot_fund_value() {
        let mut chain = InMemoryChain::new();
        let call = Call::new(addr("alice"), addr("contract")).with_value(Decimal::ONE);
        let mut ran = false;
        let result: Result<(), SubstrateError> = chain.execute(call, |_| {
            ran = true;
            Ok(())
        });
        assert!(matches!(
            result,
            Err(SubstrateError::InsufficientFunds { .. })
        ));
        assert!(!ran);
    }

    #[test]
    fn test_call_fee_charged_even_on_failure() {
        let fee = Decimal::new(1, 3);
        let mut chain = InMemoryChain::with_config(ChainConfig { call_fee: fee });
        chain.fund(&addr("alice"), Decimal::ONE).unwrap();
        let call = Call::new(addr("alice"), addr("contract"));

        let result: Result<(), SubstrateError> =
            chain.execute(call, |_| Err(SubstrateError::Overflow));

        assert!(result.is_err());
        assert_eq!(chain.balance_of(&addr("alice")), Decimal::ONE - fee);
        assert_eq!(chain.burned(), fee);
        assert_eq!(chain.total_balance(), Some(Decimal::ONE - fee));
    }

    #[test]
    fn test_total_balance_overflow() {
        let mut chain = InMemoryChain::new();
        chain.fund(&addr("alice"), Decimal::MAX).unwrap();
        assert_eq!(chain.total_balance(), Some(Decimal::MAX));

        chain.fund(&addr("bob"), Decimal::MAX).unwrap();
        assert_eq!(chain.total_balance(), None);
    }

    #[test]
    fn test_rejecting_recipient() {
        let mut chain = InMemoryChain::new();
        chain.fund(&addr("contract"), Decimal::from(5)).unwrap();
        chain.reject_transfers_to(addr("bob"));
        let call = Call::new(addr("alice"), addr("contract"));

        let result = chain.execute(call, |frame| frame.transfer(&addr("bob"), Decimal::ONE));
        assert_eq!(result, Err(SubstrateError::Rejected { to: addr("bob") }));

        chain.accept_transfers_to(&addr("bob"));
        chain
            .execute(call, |frame| frame.transfer(&addr("bob"), Decimal::ONE))
            .unwrap();
        assert_eq!(chain.balance_of(&addr("bob")), Decimal::ONE);
    }

    #[test]
    fn test_next_nonce_increments_per_creator() {
        let mut chain = InMemoryChain::new();
        assert_eq!(chain.next_nonce(&addr("alice")), 0);
        assert_eq!(chain.next_nonce(&addr("alice")), 1);
        assert_eq!(chain.next_nonce(&addr("bob")), 0);
    }
}
