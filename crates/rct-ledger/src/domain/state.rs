//! # Ledger State
//!
//! The single state aggregate owned by the ledger engine. Absent map entries
//! read as zero / false; nothing is ever removed.

use super::entities::{MintRecord, VestingSchedule};
use super::value_objects::{AccountId, Amount, MintId};
use std::collections::{BTreeMap, HashMap};

/// First identifier handed out by a fresh ledger.
pub const FIRST_MINT_ID: MintId = 1;

/// Authoritative ledger state.
///
/// Fields are crate-visible so the engine can write them; everything outside
/// the crate reads through the accessors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerState {
    /// The ledger's own identity. Never a valid issuance recipient.
    pub(crate) ledger_identity: AccountId,
    /// Current administrator.
    pub(crate) admin: AccountId,
    /// Pause flag.
    pub(crate) paused: bool,
    /// Sum of balances plus unclaimed vesting reserves.
    pub(crate) total_supply: Amount,
    /// Next identifier for a mint record / vesting schedule.
    pub(crate) next_mint_id: MintId,
    /// Account balances.
    pub(crate) balances: HashMap<AccountId, Amount>,
    /// Allowances keyed by (owner, spender).
    pub(crate) allowances: HashMap<(AccountId, AccountId), Amount>,
    /// Minter flags. Presence (true or false) means "registered".
    pub(crate) minters: HashMap<AccountId, bool>,
    /// Append-only issuance log.
    pub(crate) mint_records: BTreeMap<MintId, MintRecord>,
    /// Vesting schedules keyed by (recipient, id).
    pub(crate) vesting: HashMap<(AccountId, MintId), VestingSchedule>,
}

impl LedgerState {
    /// Fresh state: empty maps, zero supply, unpaused.
    #[must_use]
    pub fn new(ledger_identity: AccountId, admin: AccountId) -> Self {
        Self {
            ledger_identity,
            admin,
            paused: false,
            total_supply: 0,
            next_mint_id: FIRST_MINT_ID,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            minters: HashMap::new(),
            mint_records: BTreeMap::new(),
            vesting: HashMap::new(),
        }
    }

    /// The ledger's own identity.
    #[must_use]
    pub fn ledger_identity(&self) -> AccountId {
        self.ledger_identity
    }

    /// Current administrator.
    #[must_use]
    pub fn admin(&self) -> AccountId {
        self.admin
    }

    /// Pause flag.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Total supply.
    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Identifier the next issuance will receive.
    #[must_use]
    pub fn next_mint_id(&self) -> MintId {
        self.next_mint_id
    }

    /// Balance of `account`; zero when absent.
    #[must_use]
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Allowance `owner` granted to `spender`; zero when absent.
    #[must_use]
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Raw minter entry: `None` when the account was never registered.
    #[must_use]
    pub fn minter_entry(&self, account: &AccountId) -> Option<bool> {
        self.minters.get(account).copied()
    }

    /// Mint record by id.
    #[must_use]
    pub fn mint_record(&self, id: MintId) -> Option<&MintRecord> {
        self.mint_records.get(&id)
    }

    /// Vesting schedule for (recipient, id).
    #[must_use]
    pub fn vesting_schedule(&self, recipient: &AccountId, id: MintId) -> Option<&VestingSchedule> {
        self.vesting.get(&(*recipient, id))
    }

    /// All non-zero balances.
    pub fn balances(&self) -> impl Iterator<Item = (&AccountId, &Amount)> {
        self.balances.iter().filter(|(_, amount)| **amount > 0)
    }

    /// All mint records in id order.
    pub fn mint_records(&self) -> impl Iterator<Item = (&MintId, &MintRecord)> {
        self.mint_records.iter()
    }

    /// All vesting schedules.
    pub fn vesting_schedules(
        &self,
    ) -> impl Iterator<Item = (&(AccountId, MintId), &VestingSchedule)> {
        self.vesting.iter()
    }

    /// Sum of all balances, `None` if it exceeds `u128`.
    #[must_use]
    pub fn sum_of_balances(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(0u128, |acc, amount| acc.checked_add(*amount))
    }

    /// Sum of granted-but-unclaimed vesting units, `None` on overflow.
    #[must_use]
    pub fn vesting_reserve(&self) -> Option<Amount> {
        self.vesting
            .values()
            .try_fold(0u128, |acc, schedule| acc.checked_add(schedule.outstanding()))
    }
}

// =============================================================================
// TESTS
// =============================================================================
