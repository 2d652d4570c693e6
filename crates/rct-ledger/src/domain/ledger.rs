//! # Ledger Engine
//!
//! Single-writer state machine over [`LedgerState`].
//!
//! Every mutating operation runs in two phases: all preconditions are checked
//! and every new value is computed first, then the writes are applied. A
//! returned error therefore always means the state is untouched.
//!
//! Precondition order (first failure wins):
//!
//! | Operation | Checks |
//! |-----------|--------|
//! | `set_admin`, `pause`, `unpause`, `remove_minter` | admin |
//! | `add_minter` | admin, not registered |
//! | `mint` | not paused, minter, amount > 0, recipient != ledger, metadata <= 500 |
//! | `mint_with_vesting` | not paused, minter, amount > 0, duration > 0, recipient != ledger, metadata <= 500 |
//! | `claim_vesting` | not paused, schedule exists, something claimable |
//! | `transfer` | not paused, caller == sender, amount > 0, balance |
//! | `approve` | not paused |
//! | `transfer_from` | not paused, allowance, amount > 0, balance |
//! | `burn` | not paused, amount > 0, balance |

use super::entities::{token, CallContext, MintRecord, VestingSchedule};
use super::policy::AccessPolicy;
use super::state::LedgerState;
use super::value_objects::{AccountId, Amount, Height, Metadata, MintId};
use super::vesting;
use crate::errors::LedgerError;

/// The reward ledger.
#[derive(Clone, Debug)]
pub struct RecycleLedger {
    state: LedgerState,
}

/// Checked values for an issuance, computed before any write.
struct PreparedIssuance {
    id: MintId,
    next_id: MintId,
    new_supply: Amount,
    metadata: Metadata,
}

impl RecycleLedger {
    /// Create an empty ledger owned by `ledger_identity`, administered by `admin`.
    #[must_use]
    pub fn new(ledger_identity: AccountId, admin: AccountId) -> Self {
        Self {
            state: LedgerState::new(ledger_identity, admin),
        }
    }

    /// Wrap an existing state aggregate.
    #[must_use]
    pub fn from_state(state: LedgerState) -> Self {
        Self { state }
    }

    /// Read-only view of the state.
    #[must_use]
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Role predicates over the current state.
    #[must_use]
    pub fn policy(&self) -> AccessPolicy<'_> {
        AccessPolicy::new(&self.state)
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    /// Replace the administrator.
    pub fn set_admin(&mut self, ctx: &CallContext, new_admin: AccountId) -> Result<(), LedgerError> {
        self.policy().require_admin(&ctx.caller)?;
        self.state.admin = new_admin;
        Ok(())
    }

    /// Set the pause flag. Idempotent.
    pub fn pause(&mut self, ctx: &CallContext) -> Result<(), LedgerError> {
        self.policy().require_admin(&ctx.caller)?;
        self.state.paused = true;
        Ok(())
    }

    /// Clear the pause flag. Idempotent.
    pub fn unpause(&mut self, ctx: &CallContext) -> Result<(), LedgerError> {
        self.policy().require_admin(&ctx.caller)?;
        self.state.paused = false;
        Ok(())
    }

    /// Register `account` as an active minter.
    ///
    /// Fails with `AlreadyRegistered` if the account has any entry, including
    /// one previously revoked by [`Self::remove_minter`].
    pub fn add_minter(&mut self, ctx: &CallContext, account: AccountId) -> Result<(), LedgerError> {
        let policy = self.policy();
        policy.require_admin(&ctx.caller)?;
        if policy.is_registered_minter(&account) {
            return Err(LedgerError::AlreadyRegistered);
        }
        self.state.minters.insert(account, true);
        Ok(())
    }

    /// Set `account`'s minter flag to false, creating the entry if needed.
    pub fn remove_minter(
        &mut self,
        ctx: &CallContext,
        account: AccountId,
    ) -> Result<(), LedgerError> {
        self.policy().require_admin(&ctx.caller)?;
        self.state.minters.insert(account, false);
        Ok(())
    }

    // =========================================================================
    // ISSUANCE
    // =========================================================================

    /// Issue `amount` to `recipient` immediately. Returns the mint record id.
    pub fn mint(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        recipient: AccountId,
        metadata: &str,
    ) -> Result<MintId, LedgerError> {
        let prepared = self.prepare_issuance(ctx, amount, None, recipient, metadata)?;
        let new_balance = self
            .state
            .balance_of(&recipient)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        let id = prepared.id;
        self.state.balances.insert(recipient, new_balance);
        self.commit_issuance(ctx, amount, recipient, prepared);
        Ok(id)
    }

    /// Reserve `amount` for `recipient`, released linearly over `duration`.
    ///
    /// Supply grows now; the recipient's balance grows only as they claim.
    /// Returns the id shared by the mint record and the schedule.
    pub fn mint_with_vesting(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        recipient: AccountId,
        duration: Height,
        metadata: &str,
    ) -> Result<MintId, LedgerError> {
        let prepared = self.prepare_issuance(ctx, amount, Some(duration), recipient, metadata)?;

        let id = prepared.id;
        self.state.vesting.insert(
            (recipient, id),
            VestingSchedule {
                granted: amount,
                start: ctx.height,
                duration,
                claimed: 0,
            },
        );
        self.commit_issuance(ctx, amount, recipient, prepared);
        Ok(id)
    }

    /// Credit the caller with everything vested since their last claim.
    /// Returns the amount credited.
    pub fn claim_vesting(&mut self, ctx: &CallContext, id: MintId) -> Result<Amount, LedgerError> {
        self.ensure_not_paused()?;
        let key = (ctx.caller, id);
        let schedule = self
            .state
            .vesting
            .get(&key)
            .ok_or(LedgerError::VestingNotFound { id })?;
        if schedule.is_exhausted() {
            return Err(LedgerError::VestingNotMature {
                id,
                height: ctx.height,
            });
        }

        let vested = vesting::vested_amount(schedule, ctx.height);
        let to_claim = vested.saturating_sub(schedule.claimed);
        if to_claim == 0 {
            return Err(LedgerError::VestingNotMature {
                id,
                height: ctx.height,
            });
        }
        let new_balance = self
            .state
            .balance_of(&ctx.caller)
            .checked_add(to_claim)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        self.state.balances.insert(ctx.caller, new_balance);
        if let Some(schedule) = self.state.vesting.get_mut(&key) {
            schedule.claimed = vested;
        }
        Ok(to_claim)
    }

    // =========================================================================
    // TRANSFER & DELEGATION
    // =========================================================================

    /// Move `amount` from `sender` to `recipient`; caller must be `sender`.
    pub fn transfer(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        sender: AccountId,
        recipient: AccountId,
    ) -> Result<(), LedgerError> {
        self.ensure_not_paused()?;
        if ctx.caller != sender {
            return Err(LedgerError::Unauthorized);
        }
        ensure_positive(amount)?;
        let (sender_balance, recipient_balance) = self.prepare_move(amount, &sender, &recipient)?;

        self.state.balances.insert(sender, sender_balance);
        self.state.balances.insert(recipient, recipient_balance);
        Ok(())
    }

    /// Set the caller's allowance for `spender` to exactly `amount`.
    pub fn approve(
        &mut self,
        ctx: &CallContext,
        spender: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.ensure_not_paused()?;
        self.state.allowances.insert((ctx.caller, spender), amount);
        Ok(())
    }

    /// Spend `amount` of `owner`'s balance on behalf of the caller.
    ///
    /// An allowance that does not cover `amount` is reported as
    /// `Unauthorized`.
    pub fn transfer_from(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        owner: AccountId,
        recipient: AccountId,
    ) -> Result<(), LedgerError> {
        self.ensure_not_paused()?;
        let allowance = self.state.allowance(&owner, &ctx.caller);
        if allowance < amount {
            return Err(LedgerError::Unauthorized);
        }
        ensure_positive(amount)?;
        let (owner_balance, recipient_balance) = self.prepare_move(amount, &owner, &recipient)?;

        self.state.balances.insert(owner, owner_balance);
        self.state.balances.insert(recipient, recipient_balance);
        self.state
            .allowances
            .insert((owner, ctx.caller), allowance - amount);
        Ok(())
    }

    // =========================================================================
    // SUPPLY CONTROL
    // =========================================================================

    /// Destroy `amount` of the caller's balance.
    pub fn burn(&mut self, ctx: &CallContext, amount: Amount) -> Result<(), LedgerError> {
        self.ensure_not_paused()?;
        ensure_positive(amount)?;
        let balance = self.state.balance_of(&ctx.caller);
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available: balance,
            });
        }

        self.state.balances.insert(ctx.caller, balance - amount);
        self.state.total_supply = self.state.total_supply.saturating_sub(amount);
        Ok(())
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Token name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        token::NAME
    }

    /// Token symbol.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        token::SYMBOL
    }

    /// Token decimals.
    #[must_use]
    pub fn decimals(&self) -> u8 {
        token::DECIMALS
    }

    /// Current total supply.
    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.state.total_supply()
    }

    /// Balance of `account`.
    #[must_use]
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.state.balance_of(account)
    }

    /// Allowance from `owner` to `spender`.
    #[must_use]
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.state.allowance(owner, spender)
    }

    /// Mint record by id.
    #[must_use]
    pub fn mint_record(&self, id: MintId) -> Option<&MintRecord> {
        self.state.mint_record(id)
    }

    /// True if `account` holds an active minter flag.
    #[must_use]
    pub fn is_minter(&self, account: &AccountId) -> bool {
        self.policy().is_minter(account)
    }

    /// Pause flag.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// Current administrator.
    #[must_use]
    pub fn admin(&self) -> AccountId {
        self.state.admin()
    }

    /// Vesting schedule for (recipient, id).
    #[must_use]
    pub fn vesting_schedule(&self, recipient: &AccountId, id: MintId) -> Option<&VestingSchedule> {
        self.state.vesting_schedule(recipient, id)
    }

    /// What `claim_vesting` would credit `recipient` at `height`.
    ///
    /// Unlike `claim_vesting` this returns `Ok(0)` when nothing is claimable.
    pub fn calculate_claimable(
        &self,
        recipient: &AccountId,
        id: MintId,
        height: Height,
    ) -> Result<Amount, LedgerError> {
        let schedule = self
            .state
            .vesting_schedule(recipient, id)
            .ok_or(LedgerError::VestingNotFound { id })?;
        Ok(vesting::claimable_now(schedule, height))
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn ensure_not_paused(&self) -> Result<(), LedgerError> {
        if self.state.paused {
            Err(LedgerError::Paused)
        } else {
            Ok(())
        }
    }

    /// Shared issuance checks. `duration` is `Some` for vesting grants.
    fn prepare_issuance(
        &self,
        ctx: &CallContext,
        amount: Amount,
        duration: Option<Height>,
        recipient: AccountId,
        metadata: &str,
    ) -> Result<PreparedIssuance, LedgerError> {
        self.ensure_not_paused()?;
        self.policy().require_minter(&ctx.caller)?;
        ensure_positive(amount)?;
        if duration == Some(0) {
            return Err(LedgerError::InvalidAmount);
        }
        if recipient == self.state.ledger_identity {
            return Err(LedgerError::InvalidRecipient);
        }
        let metadata = Metadata::new(metadata)?;

        let new_supply = self
            .state
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        let id = self.state.next_mint_id;
        let next_id = id.checked_add(1).ok_or(LedgerError::ArithmeticOverflow)?;

        Ok(PreparedIssuance {
            id,
            next_id,
            new_supply,
            metadata,
        })
    }

    fn commit_issuance(
        &mut self,
        ctx: &CallContext,
        amount: Amount,
        recipient: AccountId,
        prepared: PreparedIssuance,
    ) {
        self.state.total_supply = prepared.new_supply;
        self.state.next_mint_id = prepared.next_id;
        self.state.mint_records.insert(
            prepared.id,
            MintRecord {
                amount,
                recipient,
                metadata: prepared.metadata,
                timestamp: ctx.height,
            },
        );
    }

    /// New (from, to) balances for moving `amount`. Self-moves keep the
    /// balance as is.
    fn prepare_move(
        &self,
        amount: Amount,
        from: &AccountId,
        to: &AccountId,
    ) -> Result<(Amount, Amount), LedgerError> {
        let from_balance = self.state.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                required: amount,
                available: from_balance,
            });
        }
        if from == to {
            return Ok((from_balance, from_balance));
        }
        let to_balance = self
            .state
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        Ok((from_balance - amount, to_balance))
    }
}

fn ensure_positive(amount: Amount) -> Result<(), LedgerError> {
    if amount == 0 {
        Err(LedgerError::InvalidAmount)
    } else {
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const LEDGER: AccountId = AccountId([0xCC; 20]);
    const ADMIN: AccountId = AccountId([0x01; 20]);
    const MINTER: AccountId = AccountId([0x02; 20]);
    const ALICE: AccountId = AccountId([0x0A; 20]);
    const BOB: AccountId = AccountId([0x0B; 20]);

    fn ctx(caller: AccountId, height: Height) -> CallContext {
        CallContext::new(caller, height)
    }

    fn ledger_with_minter() -> RecycleLedger {
        let mut ledger = RecycleLedger::new(LEDGER, ADMIN);
        ledger.add_minter(&ctx(ADMIN, 0), MINTER).unwrap();
        ledger
    }

    fn funded(amount: Amount) -> RecycleLedger {
        let mut ledger = ledger_with_minter();
        ledger.mint(&ctx(MINTER, 1), amount, ALICE, "seed").unwrap();
        ledger
    }

    // -------------------------------------------------------------------------
    // Administration
    // -------------------------------------------------------------------------

    #[test]
    fn test_set_admin_requires_admin() {
        let mut ledger = RecycleLedger::new(LEDGER, ADMIN);
        assert_eq!(
            ledger.set_admin(&ctx(ALICE, 0), ALICE),
            Err(LedgerError::Unauthorized)
        );
        ledger.set_admin(&ctx(ADMIN, 0), ALICE).unwrap();
        assert_eq!(ledger.admin(), ALICE);

        // Old admin lost its rights
        assert_eq!(ledger.pause(&ctx(ADMIN, 0)), Err(LedgerError::Unauthorized));
    }

    #[test]
    fn test_pause_is_idempotent() {
        let mut ledger = RecycleLedger::new(LEDGER, ADMIN);
        ledger.pause(&ctx(ADMIN, 0)).unwrap();
        ledger.pause(&ctx(ADMIN, 0)).unwrap();
        assert!(ledger.is_paused());

        ledger.unpause(&ctx(ADMIN, 0)).unwrap();
        ledger.unpause(&ctx(ADMIN, 0)).unwrap();
        assert!(!ledger.is_paused());
    }

    #[test]
    fn test_administration_ignores_pause() {
        let mut ledger = RecycleLedger::new(LEDGER, ADMIN);
        ledger.pause(&ctx(ADMIN, 0)).unwrap();
        ledger.add_minter(&ctx(ADMIN, 0), MINTER).unwrap();
        ledger.remove_minter(&ctx(ADMIN, 0), MINTER).unwrap();
        ledger.set_admin(&ctx(ADMIN, 0), BOB).unwrap();
        assert_eq!(ledger.admin(), BOB);
    }

    #[test]
    fn test_add_minter_existence_based() {
        let mut ledger = ledger_with_minter();
        assert_eq!(
            ledger.add_minter(&ctx(ADMIN, 0), MINTER),
            Err(LedgerError::AlreadyRegistered)
        );

        // A revoked minter still counts as registered
        ledger.remove_minter(&ctx(ADMIN, 0), MINTER).unwrap();
        assert!(!ledger.is_minter(&MINTER));
        assert_eq!(
            ledger.add_minter(&ctx(ADMIN, 0), MINTER),
            Err(LedgerError::AlreadyRegistered)
        );
    }

    #[test]
    fn test_remove_minter_without_entry() {
        let mut ledger = RecycleLedger::new(LEDGER, ADMIN);
        ledger.remove_minter(&ctx(ADMIN, 0), ALICE).unwrap();
        assert!(!ledger.is_minter(&ALICE));
        assert_eq!(ledger.state().minter_entry(&ALICE), Some(false));
        assert_eq!(
            ledger.remove_minter(&ctx(BOB, 0), ALICE),
            Err(LedgerError::Unauthorized)
        );
    }

    #[test]
    fn test_add_minter_requires_admin() {
        let mut ledger = RecycleLedger::new(LEDGER, ADMIN);
        assert_eq!(
            ledger.add_minter(&ctx(ALICE, 0), ALICE),
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(ledger.state().minter_entry(&ALICE), None);
    }

    // -------------------------------------------------------------------------
    // Issuance
    // -------------------------------------------------------------------------

    #[test]
    fn test_mint_credits_and_records() {
        let mut ledger = ledger_with_minter();
        let id = ledger
            .mint(&ctx(MINTER, 7), 1_000_000, ALICE, "Reward for recycling 10kg plastic")
            .unwrap();

        assert_eq!(id, 1);
        assert_eq!(ledger.balance_of(&ALICE), 1_000_000);
        assert_eq!(ledger.total_supply(), 1_000_000);

        let record = ledger.mint_record(id).unwrap();
        assert_eq!(record.amount, 1_000_000);
        assert_eq!(record.recipient, ALICE);
        assert_eq!(record.metadata.as_str(), "Reward for recycling 10kg plastic");
        assert_eq!(record.timestamp, 7);
    }

    #[test]
    fn test_mint_ids_strictly_increase() {
        let mut ledger = ledger_with_minter();
        let a = ledger.mint(&ctx(MINTER, 0), 1, ALICE, "").unwrap();
        let b = ledger
            .mint_with_vesting(&ctx(MINTER, 0), 1, ALICE, 10, "")
            .unwrap();
        let c = ledger.mint(&ctx(MINTER, 0), 1, BOB, "").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_mint_precondition_order() {
        let mut ledger = ledger_with_minter();
        let long = "x".repeat(501);

        // Paused beats everything
        ledger.pause(&ctx(ADMIN, 0)).unwrap();
        assert_eq!(
            ledger.mint(&ctx(ALICE, 0), 0, LEDGER, &long),
            Err(LedgerError::Paused)
        );
        ledger.unpause(&ctx(ADMIN, 0)).unwrap();

        assert_eq!(
            ledger.mint(&ctx(ALICE, 0), 0, LEDGER, &long),
            Err(LedgerError::InvalidMinter)
        );
        assert_eq!(
            ledger.mint(&ctx(MINTER, 0), 0, LEDGER, &long),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(
            ledger.mint(&ctx(MINTER, 0), 5, LEDGER, &long),
            Err(LedgerError::InvalidRecipient)
        );
        assert!(matches!(
            ledger.mint(&ctx(MINTER, 0), 5, ALICE, &long),
            Err(LedgerError::MetadataTooLong { length: 501, .. })
        ));
        assert_eq!(ledger.total_supply(), 0);
        assert_eq!(ledger.state().next_mint_id(), 1);
    }

    #[test]
    fn test_revoked_minter_cannot_mint() {
        let mut ledger = ledger_with_minter();
        ledger.remove_minter(&ctx(ADMIN, 0), MINTER).unwrap();
        assert_eq!(
            ledger.mint(&ctx(MINTER, 0), 1, ALICE, ""),
            Err(LedgerError::InvalidMinter)
        );
    }

    #[test]
    fn test_mint_overflow_leaves_state_untouched() {
        let mut ledger = funded(u128::MAX);
        let before = ledger.state().clone();
        assert_eq!(
            ledger.mint(&ctx(MINTER, 2), 1, BOB, ""),
            Err(LedgerError::ArithmeticOverflow)
        );
        assert_eq!(ledger.state(), &before);
    }

    #[test]
    fn test_mint_with_vesting_reserves_supply() {
        let mut ledger = ledger_with_minter();
        let id = ledger
            .mint_with_vesting(&ctx(MINTER, 20), 1_000, ALICE, 10, "vest")
            .unwrap();

        assert_eq!(ledger.balance_of(&ALICE), 0);
        assert_eq!(ledger.total_supply(), 1_000);
        let schedule = ledger.vesting_schedule(&ALICE, id).unwrap();
        assert_eq!(schedule.granted, 1_000);
        assert_eq!(schedule.start, 20);
        assert_eq!(schedule.duration, 10);
        assert_eq!(schedule.claimed, 0);
        assert_eq!(ledger.mint_record(id).unwrap().timestamp, 20);
    }

    #[test]
    fn test_mint_with_vesting_zero_duration() {
        let mut ledger = ledger_with_minter();
        assert_eq!(
            ledger.mint_with_vesting(&ctx(MINTER, 0), 10, ALICE, 0, ""),
            Err(LedgerError::InvalidAmount)
        );
        // Duration is checked before the recipient and metadata
        assert_eq!(
            ledger.mint_with_vesting(&ctx(MINTER, 0), 10, LEDGER, 0, ""),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(
            ledger.mint_with_vesting(&ctx(MINTER, 0), 10, ALICE, 0, &"x".repeat(501)),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(
            ledger.mint_with_vesting(&ctx(MINTER, 0), 10, LEDGER, 5, ""),
            Err(LedgerError::InvalidRecipient)
        );
        assert_eq!(ledger.total_supply(), 0);
    }

    // -------------------------------------------------------------------------
    // Vesting claims
    // -------------------------------------------------------------------------

    #[test]
    fn test_claim_vesting_progression() {
        let mut ledger = ledger_with_minter();
        let id = ledger
            .mint_with_vesting(&ctx(MINTER, 100), 1_000_000, ALICE, 100, "")
            .unwrap();

        assert_eq!(
            ledger.claim_vesting(&ctx(ALICE, 100), id),
            Err(LedgerError::VestingNotMature { id, height: 100 })
        );
        assert_eq!(ledger.claim_vesting(&ctx(ALICE, 150), id), Ok(500_000));
        assert_eq!(ledger.balance_of(&ALICE), 500_000);

        // Same height again: nothing new
        assert!(matches!(
            ledger.claim_vesting(&ctx(ALICE, 150), id),
            Err(LedgerError::VestingNotMature { .. })
        ));

        assert_eq!(ledger.claim_vesting(&ctx(ALICE, 200), id), Ok(500_000));
        assert_eq!(ledger.balance_of(&ALICE), 1_000_000);
        assert_eq!(ledger.total_supply(), 1_000_000);
    }

    #[test]
    fn test_claim_after_end_is_capped() {
        let mut ledger = ledger_with_minter();
        let id = ledger
            .mint_with_vesting(&ctx(MINTER, 0), 1_000, ALICE, 10, "")
            .unwrap();
        assert_eq!(ledger.claim_vesting(&ctx(ALICE, 5), id), Ok(500));
        assert_eq!(ledger.claim_vesting(&ctx(ALICE, 1_000), id), Ok(500));
        assert!(ledger.vesting_schedule(&ALICE, id).unwrap().is_exhausted());

        // Fully claimed schedules stay rejected at any later height
        assert_eq!(
            ledger.claim_vesting(&ctx(ALICE, 1_000_000), id),
            Err(LedgerError::VestingNotMature { id, height: 1_000_000 })
        );
        assert_eq!(ledger.balance_of(&ALICE), 1_000);
        assert_eq!(ledger.vesting_schedule(&ALICE, id).unwrap().claimed, 1_000);
    }

    #[test]
    fn test_claim_is_keyed_by_caller() {
        let mut ledger = ledger_with_minter();
        let id = ledger
            .mint_with_vesting(&ctx(MINTER, 0), 1_000, ALICE, 10, "")
            .unwrap();
        assert_eq!(
            ledger.claim_vesting(&ctx(BOB, 10), id),
            Err(LedgerError::VestingNotFound { id })
        );
        assert_eq!(
            ledger.claim_vesting(&ctx(ALICE, 10), id + 1),
            Err(LedgerError::VestingNotFound { id: id + 1 })
        );
    }

    #[test]
    fn test_claim_blocked_while_paused() {
        let mut ledger = ledger_with_minter();
        let id = ledger
            .mint_with_vesting(&ctx(MINTER, 0), 1_000, ALICE, 10, "")
            .unwrap();
        ledger.pause(&ctx(ADMIN, 0)).unwrap();
        assert_eq!(
            ledger.claim_vesting(&ctx(ALICE, 10), id),
            Err(LedgerError::Paused)
        );
    }

    #[test]
    fn test_calculate_claimable_does_not_mutate() {
        let mut ledger = ledger_with_minter();
        let id = ledger
            .mint_with_vesting(&ctx(MINTER, 0), 1_000, ALICE, 10, "")
            .unwrap();
        assert_eq!(ledger.calculate_claimable(&ALICE, id, 0), Ok(0));
        assert_eq!(ledger.calculate_claimable(&ALICE, id, 3), Ok(300));
        assert_eq!(ledger.calculate_claimable(&ALICE, id, 99), Ok(1_000));
        assert_eq!(ledger.vesting_schedule(&ALICE, id).unwrap().claimed, 0);
        assert_eq!(
            ledger.calculate_claimable(&BOB, id, 3),
            Err(LedgerError::VestingNotFound { id })
        );
    }

    // -------------------------------------------------------------------------
    // Transfer & delegation
    // -------------------------------------------------------------------------

    #[test]
    fn test_transfer_moves_balance() {
        let mut ledger = funded(1_000);
        ledger.transfer(&ctx(ALICE, 2), 400, ALICE, BOB).unwrap();
        assert_eq!(ledger.balance_of(&ALICE), 600);
        assert_eq!(ledger.balance_of(&BOB), 400);
        assert_eq!(ledger.total_supply(), 1_000);
    }

    #[test]
    fn test_transfer_preconditions() {
        let mut ledger = funded(1_000);
        assert_eq!(
            ledger.transfer(&ctx(BOB, 2), 1, ALICE, BOB),
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(
            ledger.transfer(&ctx(ALICE, 2), 0, ALICE, BOB),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(
            ledger.transfer(&ctx(ALICE, 2), 1_001, ALICE, BOB),
            Err(LedgerError::InsufficientBalance {
                required: 1_001,
                available: 1_000
            })
        );
        assert_eq!(ledger.balance_of(&ALICE), 1_000);
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let mut ledger = funded(1_000);
        ledger.transfer(&ctx(ALICE, 2), 1_000, ALICE, ALICE).unwrap();
        assert_eq!(ledger.balance_of(&ALICE), 1_000);
    }

    #[test]
    fn test_approve_is_absolute() {
        let mut ledger = funded(1_000);
        ledger.approve(&ctx(ALICE, 2), BOB, 600).unwrap();
        ledger.approve(&ctx(ALICE, 2), BOB, 200).unwrap();
        assert_eq!(ledger.allowance(&ALICE, &BOB), 200);

        // Approving beyond the balance is allowed
        ledger.approve(&ctx(ALICE, 2), BOB, u128::MAX).unwrap();
        assert_eq!(ledger.allowance(&ALICE, &BOB), u128::MAX);
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let mut ledger = funded(1_000_000);
        ledger.approve(&ctx(ALICE, 2), BOB, 600_000).unwrap();
        ledger
            .transfer_from(&ctx(BOB, 3), 500_000, ALICE, MINTER)
            .unwrap();
        assert_eq!(ledger.balance_of(&ALICE), 500_000);
        assert_eq!(ledger.balance_of(&MINTER), 500_000);
        assert_eq!(ledger.allowance(&ALICE, &BOB), 100_000);
    }

    #[test]
    fn test_transfer_from_preconditions() {
        let mut ledger = funded(100);
        ledger.approve(&ctx(ALICE, 2), BOB, 500).unwrap();

        // Allowance shortfall is Unauthorized
        assert_eq!(
            ledger.transfer_from(&ctx(BOB, 3), 501, ALICE, BOB),
            Err(LedgerError::Unauthorized)
        );
        assert_eq!(
            ledger.transfer_from(&ctx(BOB, 3), 0, ALICE, BOB),
            Err(LedgerError::InvalidAmount)
        );
        assert!(matches!(
            ledger.transfer_from(&ctx(BOB, 3), 200, ALICE, BOB),
            Err(LedgerError::InsufficientBalance { .. })
        ));
        assert_eq!(ledger.allowance(&ALICE, &BOB), 500);
        assert_eq!(ledger.balance_of(&ALICE), 100);
    }

    #[test]
    fn test_delegation_blocked_while_paused() {
        let mut ledger = funded(100);
        ledger.pause(&ctx(ADMIN, 0)).unwrap();
        assert_eq!(
            ledger.approve(&ctx(ALICE, 2), BOB, 1),
            Err(LedgerError::Paused)
        );
        assert_eq!(
            ledger.transfer_from(&ctx(BOB, 2), 1, ALICE, BOB),
            Err(LedgerError::Paused)
        );
        assert_eq!(
            ledger.transfer(&ctx(ALICE, 2), 1, ALICE, BOB),
            Err(LedgerError::Paused)
        );
    }

    // -------------------------------------------------------------------------
    // Supply control
    // -------------------------------------------------------------------------

    #[test]
    fn test_burn_reduces_supply() {
        let mut ledger = funded(1_000_000);
        ledger.burn(&ctx(ALICE, 2), 300_000).unwrap();
        assert_eq!(ledger.balance_of(&ALICE), 700_000);
        assert_eq!(ledger.total_supply(), 700_000);
    }

    #[test]
    fn test_burn_preconditions() {
        let mut ledger = funded(10);
        assert_eq!(ledger.burn(&ctx(ALICE, 2), 0), Err(LedgerError::InvalidAmount));
        assert!(matches!(
            ledger.burn(&ctx(ALICE, 2), 11),
            Err(LedgerError::InsufficientBalance { .. })
        ));
        ledger.pause(&ctx(ADMIN, 0)).unwrap();
        assert_eq!(ledger.burn(&ctx(ALICE, 2), 1), Err(LedgerError::Paused));
        assert_eq!(ledger.total_supply(), 10);
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    #[test]
    fn test_fixed_metadata_queries() {
        let ledger = RecycleLedger::new(LEDGER, ADMIN);
        assert_eq!(ledger.name(), "RecycleToken");
        assert_eq!(ledger.symbol(), "RCT");
        assert_eq!(ledger.decimals(), 6);
    }

    #[test]
    fn test_absent_lookups_are_empty() {
        let ledger = RecycleLedger::new(LEDGER, ADMIN);
        assert!(ledger.mint_record(42).is_none());
        assert!(ledger.vesting_schedule(&ALICE, 42).is_none());
        assert!(!ledger.is_minter(&ALICE));
        assert_eq!(ledger.balance_of(&ALICE), 0);
    }
}
