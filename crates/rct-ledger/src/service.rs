//! # Ledger Service
//!
//! Application service wrapping the [`RecycleLedger`] engine.
//!
//! ## Architecture
//!
//! This service implements the inbound port:
//! - [`RecycleTokenApi`]: typed operations with an explicit caller
//!
//! and additionally dispatches serialized [`LedgerRequest`] payloads through
//! [`LedgerService::handle_request`].
//!
//! It depends on two outbound ports:
//! - [`HeightSource`]: the external time counter
//! - [`EventSink`]: receiver for committed mutations
//!
//! ## Concurrency
//!
//! One `parking_lot::Mutex` guards the engine. Every call, query or mutation,
//! takes it exactly once, so operations are totally ordered and each one sees
//! the effects of all earlier ones. Events are published while the lock is
//! held and therefore arrive in commit order.

use parking_lot::Mutex;
use std::env;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::adapters::{InMemoryEventLog, ManualHeightSource};
use crate::domain::{
    check_all_invariants, AccountId, Amount, CallContext, Height, InvariantCheckResult,
    LedgerState, MintId, MintRecord, RecycleLedger, VestingSchedule,
};
use crate::errors::LedgerError;
use crate::events::{LedgerEvent, LedgerRequest, LedgerResponse};
use crate::ports::inbound::RecycleTokenApi;
use crate::ports::outbound::{EventSink, HeightSource};

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Ledger service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Publish a [`LedgerEvent`] for every committed mutation.
    pub emit_events: bool,
    /// Update Prometheus metrics (only with the `metrics` feature).
    pub record_metrics: bool,
    /// Re-check whole-state invariants after every mutation.
    pub check_invariants: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            emit_events: true,
            record_metrics: true,
            check_invariants: cfg!(debug_assertions),
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RCT_EMIT_EVENTS`: Publish ledger events (default: true)
    /// - `RCT_RECORD_METRICS`: Update metrics (default: true)
    /// - `RCT_CHECK_INVARIANTS`: Verify invariants after each mutation
    ///   (default: true in debug builds)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            emit_events: env_flag("RCT_EMIT_EVENTS").unwrap_or(defaults.emit_events),
            record_metrics: env_flag("RCT_RECORD_METRICS").unwrap_or(defaults.record_metrics),
            check_invariants: env_flag("RCT_CHECK_INVARIANTS")
                .unwrap_or(defaults.check_invariants),
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes" | "on"))
}

// =============================================================================
// STATISTICS
// =============================================================================

/// Statistics for the ledger service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Mutations attempted.
    pub operations_executed: u64,
    /// Mutations committed.
    pub successful_operations: u64,
    /// Mutations rejected by a precondition.
    pub rejected_operations: u64,
    /// Read-only calls answered.
    pub queries_served: u64,
    /// Post-commit invariant checks run.
    pub invariant_checks: u64,
    /// Events the sink refused.
    pub publish_failures: u64,
}

// =============================================================================
// SERVICE
// =============================================================================

/// The reward ledger service.
pub struct LedgerService<H: HeightSource, E: EventSink> {
    /// Service configuration.
    config: ServiceConfig,
    /// The engine, behind the single lock.
    ledger: Mutex<RecycleLedger>,
    /// External time counter.
    heights: Arc<H>,
    /// Receiver for committed mutations.
    events: Arc<E>,
    /// Service statistics.
    stats: Mutex<ServiceStats>,
}

impl<H: HeightSource, E: EventSink> LedgerService<H, E> {
    /// Create a new ledger service around an existing engine.
    pub fn new(config: ServiceConfig, ledger: RecycleLedger, heights: Arc<H>, events: Arc<E>) -> Self {
        info!(
            ledger = %ledger.state().ledger_identity(),
            admin = %ledger.admin(),
            "Ledger service created"
        );
        Self {
            config,
            ledger: Mutex::new(ledger),
            heights,
            events,
            stats: Mutex::new(ServiceStats::default()),
        }
    }

    /// Service configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Get current service statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats.lock().clone()
    }

    /// The height source this service reads.
    pub fn heights(&self) -> &Arc<H> {
        &self.heights
    }

    /// The event sink this service publishes to.
    pub fn events(&self) -> &Arc<E> {
        &self.events
    }

    /// Current height as reported by the height source.
    pub fn current_height(&self) -> Height {
        self.heights.current_height()
    }

    /// Consistent copy of the whole state.
    pub fn snapshot(&self) -> LedgerState {
        self.ledger.lock().state().clone()
    }

    /// Run every whole-state invariant against the current state.
    pub fn check_invariants(&self) -> InvariantCheckResult {
        check_all_invariants(self.ledger.lock().state())
    }

    // =========================================================================
    // REQUEST DISPATCH
    // =========================================================================

    /// Execute one serialized request on behalf of `caller`.
    ///
    /// Never fails: rejections are returned as [`LedgerResponse::Error`].
    #[instrument(
        skip(self, request),
        fields(
            correlation_id = %correlation_id,
            caller = %caller,
            op = request.operation(),
            query = request.is_query()
        )
    )]
    pub fn handle_request(
        &self,
        correlation_id: Uuid,
        caller: AccountId,
        request: LedgerRequest,
    ) -> LedgerResponse {
        let result = match request {
            LedgerRequest::SetAdmin { new_admin } => {
                self.set_admin(caller, new_admin).map(|()| LedgerResponse::Ack)
            }
            LedgerRequest::Pause => self.pause(caller).map(|()| LedgerResponse::Ack),
            LedgerRequest::Unpause => self.unpause(caller).map(|()| LedgerResponse::Ack),
            LedgerRequest::AddMinter { account } => {
                self.add_minter(caller, account).map(|()| LedgerResponse::Ack)
            }
            LedgerRequest::RemoveMinter { account } => self
                .remove_minter(caller, account)
                .map(|()| LedgerResponse::Ack),
            LedgerRequest::Mint {
                amount,
                recipient,
                metadata,
            } => self
                .mint(caller, amount, recipient, &metadata)
                .map(|id| LedgerResponse::Id { id }),
            LedgerRequest::MintWithVesting {
                amount,
                recipient,
                duration,
                metadata,
            } => self
                .mint_with_vesting(caller, amount, recipient, duration, &metadata)
                .map(|id| LedgerResponse::Id { id }),
            LedgerRequest::ClaimVesting { id } => self
                .claim_vesting(caller, id)
                .map(|amount| LedgerResponse::Amount { amount }),
            LedgerRequest::Transfer {
                amount,
                sender,
                recipient,
            } => self
                .transfer(caller, amount, sender, recipient)
                .map(|()| LedgerResponse::Ack),
            LedgerRequest::Approve { spender, amount } => self
                .approve(caller, spender, amount)
                .map(|()| LedgerResponse::Ack),
            LedgerRequest::TransferFrom {
                amount,
                owner,
                recipient,
            } => self
                .transfer_from(caller, amount, owner, recipient)
                .map(|()| LedgerResponse::Ack),
            LedgerRequest::Burn { amount } => {
                self.burn(caller, amount).map(|()| LedgerResponse::Ack)
            }
            LedgerRequest::GetName => Ok(LedgerResponse::name()),
            LedgerRequest::GetSymbol => Ok(LedgerResponse::symbol()),
            LedgerRequest::GetDecimals => Ok(LedgerResponse::Decimals {
                value: self.decimals(),
            }),
            LedgerRequest::GetTotalSupply => Ok(LedgerResponse::Balance {
                balance: self.total_supply(),
            }),
            LedgerRequest::GetBalance { account } => Ok(LedgerResponse::Balance {
                balance: self.balance_of(&account),
            }),
            LedgerRequest::GetAllowance { owner, spender } => Ok(LedgerResponse::Balance {
                balance: self.allowance(&owner, &spender),
            }),
            LedgerRequest::GetMintRecord { id } => Ok(LedgerResponse::Record {
                record: self.mint_record(id),
            }),
            LedgerRequest::IsMinter { account } => Ok(LedgerResponse::Flag {
                value: self.is_minter(&account),
            }),
            LedgerRequest::IsPaused => Ok(LedgerResponse::Flag {
                value: self.is_paused(),
            }),
            LedgerRequest::GetAdmin => Ok(LedgerResponse::Account {
                account: self.query("get_admin", RecycleLedger::admin),
            }),
            LedgerRequest::GetVestingSchedule { recipient, id } => {
                Ok(LedgerResponse::Schedule {
                    schedule: self.vesting_schedule(&recipient, id),
                })
            }
            LedgerRequest::CalculateClaimable {
                recipient,
                id,
                height,
            } => {
                let height = height.unwrap_or_else(|| self.current_height());
                self.calculate_claimable(&recipient, id, height)
                    .map(|amount| LedgerResponse::Amount { amount })
            }
        };

        result.unwrap_or_else(LedgerResponse::from)
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    /// Run one mutation under the lock.
    ///
    /// `apply` performs the engine call and describes the committed change;
    /// its event is only published when it returns `Ok`.
    fn execute<T>(
        &self,
        caller: AccountId,
        operation: &'static str,
        apply: impl FnOnce(&mut RecycleLedger, &CallContext) -> Result<(T, LedgerEvent), LedgerError>,
    ) -> Result<T, LedgerError> {
        let started = Instant::now();
        let mut ledger = self.ledger.lock();
        let ctx = CallContext::new(caller, self.heights.current_height());

        let outcome = apply(&mut *ledger, &ctx);
        let mut stats = self.stats.lock();
        stats.operations_executed += 1;

        match outcome {
            Ok((value, event)) => {
                stats.successful_operations += 1;
                info!(operation, caller = %caller, height = ctx.height, "Ledger operation committed");

                if self.config.emit_events {
                    if let Err(e) = self.events.publish(event) {
                        stats.publish_failures += 1;
                        warn!(operation, error = %e, "Failed to publish ledger event");
                    }
                }

                if self.config.check_invariants {
                    stats.invariant_checks += 1;
                    let result = check_all_invariants(ledger.state());
                    if !result.is_valid() {
                        error!(operation, violations = ?result.violations, "Ledger invariant violated");
                    }
                    debug_assert!(result.is_valid(), "invariant violated after {operation}");
                }

                self.observe(operation, "ok", &ledger, started);
                Ok(value)
            }
            Err(e) => {
                stats.rejected_operations += 1;
                warn!(
                    operation,
                    caller = %caller,
                    height = ctx.height,
                    kind = e.kind_name(),
                    code = e.code(),
                    retryable = e.is_state_dependent(),
                    "Ledger operation rejected"
                );
                self.observe(operation, e.kind_name(), &ledger, started);
                Err(e)
            }
        }
    }

    /// Run one read under the lock.
    fn query<T>(&self, operation: &'static str, read: impl FnOnce(&RecycleLedger) -> T) -> T {
        let value = read(&*self.ledger.lock());
        self.stats.lock().queries_served += 1;
        debug!(operation, "Ledger query served");
        value
    }

    #[cfg(feature = "metrics")]
    fn observe(&self, operation: &str, outcome: &str, ledger: &RecycleLedger, started: Instant) {
        use rct_telemetry::metrics;

        if !self.config.record_metrics {
            return;
        }
        metrics::record_operation(operation, outcome, started.elapsed().as_secs_f64());
        metrics::set_total_supply(ledger.total_supply());
        metrics::set_paused(ledger.is_paused());
    }

    #[cfg(not(feature = "metrics"))]
    fn observe(&self, _operation: &str, _outcome: &str, _ledger: &RecycleLedger, _started: Instant) {}
}

// =============================================================================
// INBOUND PORT
// =============================================================================

impl<H: HeightSource, E: EventSink> RecycleTokenApi for LedgerService<H, E> {
    fn set_admin(&self, caller: AccountId, new_admin: AccountId) -> Result<(), LedgerError> {
        self.execute(caller, "set_admin", |ledger, ctx| {
            let previous = ledger.admin();
            ledger.set_admin(ctx, new_admin)?;
            Ok((
                (),
                LedgerEvent::AdminChanged {
                    previous,
                    new_admin,
                    height: ctx.height,
                },
            ))
        })
    }

    fn pause(&self, caller: AccountId) -> Result<(), LedgerError> {
        self.execute(caller, "pause", |ledger, ctx| {
            ledger.pause(ctx)?;
            Ok((
                (),
                LedgerEvent::Paused {
                    by: ctx.caller,
                    height: ctx.height,
                },
            ))
        })
    }

    fn unpause(&self, caller: AccountId) -> Result<(), LedgerError> {
        self.execute(caller, "unpause", |ledger, ctx| {
            ledger.unpause(ctx)?;
            Ok((
                (),
                LedgerEvent::Unpaused {
                    by: ctx.caller,
                    height: ctx.height,
                },
            ))
        })
    }

    fn add_minter(&self, caller: AccountId, account: AccountId) -> Result<(), LedgerError> {
        self.execute(caller, "add_minter", |ledger, ctx| {
            ledger.add_minter(ctx, account)?;
            Ok((
                (),
                LedgerEvent::MinterAdded {
                    account,
                    height: ctx.height,
                },
            ))
        })
    }

    fn remove_minter(&self, caller: AccountId, account: AccountId) -> Result<(), LedgerError> {
        self.execute(caller, "remove_minter", |ledger, ctx| {
            ledger.remove_minter(ctx, account)?;
            Ok((
                (),
                LedgerEvent::MinterRemoved {
                    account,
                    height: ctx.height,
                },
            ))
        })
    }

    fn mint(
        &self,
        caller: AccountId,
        amount: Amount,
        recipient: AccountId,
        metadata: &str,
    ) -> Result<MintId, LedgerError> {
        self.execute(caller, "mint", |ledger, ctx| {
            let id = ledger.mint(ctx, amount, recipient, metadata)?;
            Ok((
                id,
                LedgerEvent::Minted {
                    id,
                    minter: ctx.caller,
                    recipient,
                    amount,
                    height: ctx.height,
                },
            ))
        })
    }

    fn mint_with_vesting(
        &self,
        caller: AccountId,
        amount: Amount,
        recipient: AccountId,
        duration: Height,
        metadata: &str,
    ) -> Result<MintId, LedgerError> {
        self.execute(caller, "mint_with_vesting", |ledger, ctx| {
            let id = ledger.mint_with_vesting(ctx, amount, recipient, duration, metadata)?;
            Ok((
                id,
                LedgerEvent::VestingGranted {
                    id,
                    minter: ctx.caller,
                    recipient,
                    amount,
                    duration,
                    height: ctx.height,
                },
            ))
        })
    }

    fn claim_vesting(&self, caller: AccountId, id: MintId) -> Result<Amount, LedgerError> {
        self.execute(caller, "claim_vesting", |ledger, ctx| {
            let amount = ledger.claim_vesting(ctx, id)?;
            Ok((
                amount,
                LedgerEvent::VestingClaimed {
                    id,
                    recipient: ctx.caller,
                    amount,
                    height: ctx.height,
                },
            ))
        })
    }

    fn transfer(
        &self,
        caller: AccountId,
        amount: Amount,
        sender: AccountId,
        recipient: AccountId,
    ) -> Result<(), LedgerError> {
        self.execute(caller, "transfer", |ledger, ctx| {
            ledger.transfer(ctx, amount, sender, recipient)?;
            Ok((
                (),
                LedgerEvent::Transferred {
                    sender,
                    recipient,
                    amount,
                    height: ctx.height,
                },
            ))
        })
    }

    fn approve(
        &self,
        caller: AccountId,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.execute(caller, "approve", |ledger, ctx| {
            ledger.approve(ctx, spender, amount)?;
            Ok((
                (),
                LedgerEvent::Approved {
                    owner: ctx.caller,
                    spender,
                    amount,
                    height: ctx.height,
                },
            ))
        })
    }

    fn transfer_from(
        &self,
        caller: AccountId,
        amount: Amount,
        owner: AccountId,
        recipient: AccountId,
    ) -> Result<(), LedgerError> {
        self.execute(caller, "transfer_from", |ledger, ctx| {
            ledger.transfer_from(ctx, amount, owner, recipient)?;
            Ok((
                (),
                LedgerEvent::TransferredFrom {
                    spender: ctx.caller,
                    owner,
                    recipient,
                    amount,
                    height: ctx.height,
                },
            ))
        })
    }

    fn burn(&self, caller: AccountId, amount: Amount) -> Result<(), LedgerError> {
        self.execute(caller, "burn", |ledger, ctx| {
            ledger.burn(ctx, amount)?;
            Ok((
                (),
                LedgerEvent::Burned {
                    account: ctx.caller,
                    amount,
                    height: ctx.height,
                },
            ))
        })
    }

    fn name(&self) -> &'static str {
        self.query("get_name", RecycleLedger::name)
    }

    fn symbol(&self) -> &'static str {
        self.query("get_symbol", RecycleLedger::symbol)
    }

    fn decimals(&self) -> u8 {
        self.query("get_decimals", RecycleLedger::decimals)
    }

    fn total_supply(&self) -> Amount {
        self.query("get_total_supply", RecycleLedger::total_supply)
    }

    fn balance_of(&self, account: &AccountId) -> Amount {
        self.query("get_balance", |ledger| ledger.balance_of(account))
    }

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.query("get_allowance", |ledger| ledger.allowance(owner, spender))
    }

    fn mint_record(&self, id: MintId) -> Option<MintRecord> {
        self.query("get_mint_record", |ledger| ledger.mint_record(id).cloned())
    }

    fn is_minter(&self, account: &AccountId) -> bool {
        self.query("is_minter", |ledger| ledger.is_minter(account))
    }

    fn is_paused(&self) -> bool {
        self.query("is_paused", RecycleLedger::is_paused)
    }

    fn vesting_schedule(&self, recipient: &AccountId, id: MintId) -> Option<VestingSchedule> {
        self.query("get_vesting_schedule", |ledger| {
            ledger.vesting_schedule(recipient, id).cloned()
        })
    }

    fn calculate_claimable(
        &self,
        recipient: &AccountId,
        id: MintId,
        height: Height,
    ) -> Result<Amount, LedgerError> {
        self.query("calculate_claimable", |ledger| {
            ledger.calculate_claimable(recipient, id, height)
        })
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

/// Ledger identity used by [`create_test_service`].
pub const TEST_LEDGER_IDENTITY: AccountId = AccountId([0xCC; 20]);

/// Create a service with in-memory adapters, starting at height 0.
pub fn create_test_service(admin: AccountId) -> LedgerService<ManualHeightSource, InMemoryEventLog> {
    let config = ServiceConfig {
        check_invariants: true,
        ..ServiceConfig::default()
    };
    LedgerService::new(
        config,
        RecycleLedger::new(TEST_LEDGER_IDENTITY, admin),
        Arc::new(ManualHeightSource::new(0)),
        Arc::new(InMemoryEventLog::new()),
    )
}
