//! Ledger: order intake, custody, and withdrawal
//!
//! Order payments pass straight through to the owner; bare deposits stay in
//! the ledger's custody until withdrawn. The two paths are kept separate.
//!
//! Every mutating call checks its preconditions and performs its substrate
//! transfer before touching ledger state, so a failed call leaves the order
//! log and the event log exactly as they were. A frame that runs several
//! operations goes through `Ledger::transact`, which also rolls back the
//! logs when any later step fails.

use ledger_types::ids::Address;
use ledger_types::numeric::Amount;
use ledger_types::order::{Order, OrderRequest};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::errors::{LedgerError, TransferError, ValidationError};
use crate::events::{ContractEvent, Deployed, Deposited, OrderPlaced, Withdrawn};
use crate::security::Ownable;
use crate::substrate::{BalanceQuery, Call, CallFrame, Deployer, InMemoryChain, Substrate};

/// The marketplace ledger contract.
///
/// One instance per deployment. Custody is never cached here: it is always
/// the substrate's balance for `address`.
#[derive(Debug)]
pub struct Ledger {
    address: Address,
    ownership: Ownable,
    /// Append-only, in submission order
    orders: Vec<Order>,
    /// Append-only
    events: Vec<ContractEvent>,
    config: LedgerConfig,
}

/// Lengths of the append-only logs at the start of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Checkpoint {
    orders: usize,
    events: usize,
}

impl Ledger {
    /// Create a ledger at a known address, owned by `owner`.
    pub fn new(address: Address, owner: Address, config: LedgerConfig) -> Self {
        info!(%address, %owner, policy = ?config.withdraw_policy, "ledger deployed");
        Self {
            address,
            ownership: Ownable::new(owner),
            orders: Vec::new(),
            events: vec![ContractEvent::Deployed(Deployed { address, owner })],
            config,
        }
    }

    /// Deploy a ledger from `creator`, deriving its address from the
    /// creator's next nonce. The creator becomes the owner.
    pub fn deploy<D: Deployer>(deployer: &mut D, creator: Address, config: LedgerConfig) -> Self {
        let nonce = deployer.next_nonce(&creator);
        Self::new(Address::derive_contract(&creator, nonce), creator, config)
    }

    // ───────────────────────── Calls ─────────────────────────

    /// Run `body` against this ledger inside one call frame on `chain`.
    ///
    /// The frame and the ledger form one atomic unit: if `body` returns
    /// `Err`, the chain restores its balances and the ledger truncates its
    /// order and event logs to where they stood before the call.
    pub fn transact<T, F>(
        &mut self,
        chain: &mut InMemoryChain,
        call: Call,
        body: F,
    ) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Ledger, &mut CallFrame<'_>) -> Result<T, LedgerError>,
    {
        let checkpoint = self.checkpoint();
        let result = chain.execute(call, |env| body(self, env));
        if result.is_err() {
            self.restore(checkpoint);
        }
        result
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            orders: self.orders.len(),
            events: self.events.len(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        let dropped_orders = self.orders.len().saturating_sub(checkpoint.orders);
        let dropped_events = self.events.len().saturating_sub(checkpoint.events);
        self.orders.truncate(checkpoint.orders);
        self.events.truncate(checkpoint.events);
        if dropped_orders > 0 || dropped_events > 0 {
            debug!(dropped_orders, dropped_events, "call failed, ledger logs restored");
        }
    }

    // ───────────────────────── Orders ─────────────────────────

    /// Place an order, forwarding the attached payment to the owner.
    ///
    /// Fails with `ValidationError::ZeroPayment` when no value is attached
    /// and with `TransferError` when the forward to the owner fails. Either
    /// way, no order is appended.
    pub fn place_order<S: Substrate>(
        &mut self,
        env: &mut S,
        request: OrderRequest,
    ) -> Result<Order, LedgerError> {
        self.try_place_order(env, request).inspect_err(|err| {
            warn!(
                caller = %env.caller(),
                attached = %env.attached_value(),
                %err,
                "place_order rejected"
            );
        })
    }

    fn try_place_order<S: Substrate>(
        &mut self,
        env: &mut S,
        request: OrderRequest,
    ) -> Result<Order, LedgerError> {
        self.check_target(&*env)?;

        let amount = env.attached_value();
        check_non_negative(amount)?;
        if amount.is_zero() {
            return Err(ValidationError::ZeroPayment.into());
        }

        let owner = *self.ownership.owner();
        env.transfer(&owner, amount).map_err(TransferError::Rejected)?;

        let buyer = *env.caller();
        let order = Order::from_request(
            self.orders.len() as u64,
            request,
            amount,
            buyer,
            env.tx_id(),
            env.timestamp(),
        );

        self.orders.push(order.clone());
        self.events.push(ContractEvent::OrderPlaced(OrderPlaced {
            index: order.index,
            buyer,
            amount,
            tx_id: order.tx_id,
        }));
        info!(index = order.index, %buyer, %amount, name = %order.name, "order placed");
        Ok(order)
    }

    /// All orders in submission order.
    pub fn show_orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, index: u64) -> Option<&Order> {
        usize::try_from(index).ok().and_then(|i| self.orders.get(i))
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    // ───────────────────────── Balances ─────────────────────────

    /// The owner's balance on the substrate.
    pub fn get_balance<Q: BalanceQuery>(&self, query: &Q) -> Amount {
        query.balance_of(self.ownership.owner())
    }

    /// Balance held by `address`; pass the ledger's own address for custody.
    pub fn get_contract_balance<Q: BalanceQuery>(&self, query: &Q, address: &Address) -> Amount {
        query.balance_of(address)
    }

    /// Funds currently held by the ledger itself.
    pub fn custody<Q: BalanceQuery>(&self, query: &Q) -> Amount {
        query.balance_of(&self.address)
    }

    // ───────────────────────── Deposit & Withdrawal ─────────────────────────

    /// Accept a bare value transfer into custody.
    ///
    /// The substrate has already credited the attached value; no order is
    /// recorded.
    pub fn receive<S: Substrate>(&mut self, env: &mut S) -> Result<(), LedgerError> {
        self.check_target(&*env).inspect_err(|err| {
            warn!(caller = %env.caller(), %err, "deposit rejected");
        })?;

        let amount = env.attached_value();
        if !amount.is_zero() {
            let from = *env.caller();
            self.events.push(ContractEvent::Deposited(Deposited {
                from,
                amount,
                tx_id: env.tx_id(),
            }));
            info!(%from, %amount, custody = %self.custody(&*env), "deposit received");
        }
        Ok(())
    }

    /// Move `amount` out of custody to the caller.
    ///
    /// Who may call depends on `LedgerConfig::withdraw_policy`. Fails with
    /// `TransferError` when the caller is not permitted, custody is short,
    /// or the substrate rejects the transfer.
    pub fn withdraw_money<S: Substrate>(
        &mut self,
        env: &mut S,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.try_withdraw_money(env, amount).inspect_err(|err| {
            warn!(caller = %env.caller(), %amount, %err, "withdraw_money rejected");
        })
    }

    fn try_withdraw_money<S: Substrate>(
        &mut self,
        env: &mut S,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.check_target(&*env)?;

        let attached = env.attached_value();
        if !attached.is_zero() {
            return Err(ValidationError::NonPayable { attached }.into());
        }
        check_non_negative(amount)?;

        let caller = *env.caller();
        if !self.config.withdraw_policy.permits(&caller, &self.ownership) {
            return Err(TransferError::Unauthorized { caller }.into());
        }

        let available = self.custody(&*env);
        if amount > available {
            return Err(TransferError::InsufficientCustody {
                requested: amount,
                available,
            }
            .into());
        }

        env.transfer(&caller, amount).map_err(TransferError::Rejected)?;

        self.events.push(ContractEvent::Withdrawn(Withdrawn {
            to: caller,
            amount,
            tx_id: env.tx_id(),
        }));
        info!(to = %caller, %amount, custody = %self.custody(&*env), "withdrawal completed");
        Ok(())
    }

    // ───────────────────────── Accessors ─────────────────────────

    pub fn owner(&self) -> &Address {
        self.ownership.owner()
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    // ───────────────────────── Internal Guards ─────────────────────────

    fn check_target<S: Substrate>(&self, env: &S) -> Result<(), ValidationError> {
        if *env.contract() != self.address {
            return Err(ValidationError::WrongContract {
                expected: self.address,
                actual: *env.contract(),
            });
        }
        Ok(())
    }
}

fn check_non_negative(amount: Amount) -> Result<(), ValidationError> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount { amount });
    }
    Ok(())
}
