//! # Ledger Invariants
//!
//! Whole-state checks that must hold after every committed operation.
//!
//! - Conservation: `total_supply == Σ balances + Σ (granted - claimed)`
//! - Vesting: `claimed <= granted` for every schedule
//! - Mint ids: every recorded id is below the next id to be issued

use super::state::LedgerState;
use super::value_objects::{AccountId, Amount, MintId};

/// A single broken invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Supply does not match balances plus vesting reserve.
    /// `accounted` is `None` when the sum itself overflowed.
    SupplyMismatch {
        total_supply: Amount,
        accounted: Option<Amount>,
    },
    /// A schedule has paid out more than it granted.
    OverClaimed {
        recipient: AccountId,
        id: MintId,
        granted: Amount,
        claimed: Amount,
    },
    /// A record id is not below the next id counter.
    MintIdAhead { id: MintId, next_id: MintId },
}

/// Outcome of [`check_all_invariants`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InvariantCheckResult {
    pub violations: Vec<InvariantViolation>,
}

impl InvariantCheckResult {
    /// True when no invariant is broken.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// INVARIANT-1: Conservation
/// Supply equals the sum of balances plus everything still reserved in
/// vesting schedules.
pub fn check_conservation_invariant(state: &LedgerState) -> Result<(), InvariantViolation> {
    let accounted = state
        .sum_of_balances()
        .zip(state.vesting_reserve())
        .and_then(|(balances, reserve)| balances.checked_add(reserve));

    if accounted == Some(state.total_supply()) {
        Ok(())
    } else {
        Err(InvariantViolation::SupplyMismatch {
            total_supply: state.total_supply(),
            accounted,
        })
    }
}

/// INVARIANT-2: Vesting Bound
/// No schedule pays out more than it granted.
pub fn check_vesting_invariant(state: &LedgerState) -> Vec<InvariantViolation> {
    state
        .vesting_schedules()
        .filter(|(_, schedule)| schedule.claimed > schedule.granted)
        .map(|((recipient, id), schedule)| InvariantViolation::OverClaimed {
            recipient: *recipient,
            id: *id,
            granted: schedule.granted,
            claimed: schedule.claimed,
        })
        .collect()
}

/// INVARIANT-3: Mint Id Ordering
/// Every record id was handed out before the current counter value.
pub fn check_mint_ids_invariant(state: &LedgerState) -> Vec<InvariantViolation> {
    let next_id = state.next_mint_id();
    state
        .mint_records()
        .map(|(id, _)| *id)
        .filter(|id| *id >= next_id)
        .map(|id| InvariantViolation::MintIdAhead { id, next_id })
        .collect()
}

/// Run every invariant and collect all violations.
#[must_use]
pub fn check_all_invariants(state: &LedgerState) -> InvariantCheckResult {
    let mut violations = Vec::new();
    if let Err(violation) = check_conservation_invariant(state) {
        violations.push(violation);
    }
    violations.extend(check_vesting_invariant(state));
    violations.extend(check_mint_ids_invariant(state));
    InvariantCheckResult { violations }
}
