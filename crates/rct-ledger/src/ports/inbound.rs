//! # Inbound Port - RecycleTokenApi
//!
//! Primary driving port exposing the ledger operations.
//!
//! ## Authorization
//!
//! | Method | Authorized Caller |
//! |--------|-------------------|
//! | `set_admin`, `pause`, `unpause`, `add_minter`, `remove_minter` | admin |
//! | `mint`, `mint_with_vesting` | active minter |
//! | `claim_vesting` | schedule recipient |
//! | `transfer` | sender |
//! | `transfer_from` | spender with sufficient allowance |
//! | everything else | anyone |

use crate::domain::{AccountId, Amount, Height, MintId, MintRecord, VestingSchedule};
use crate::errors::LedgerError;

/// Ledger operations with the caller identity passed explicitly.
///
/// The height of each call is taken from the implementation's
/// [`HeightSource`](super::HeightSource).
///
/// # Example
///
/// ```rust,ignore
/// use rct_ledger::ports::RecycleTokenApi;
///
/// fn reward(ledger: &impl RecycleTokenApi, minter: AccountId, user: AccountId) {
///     let id = ledger.mint(minter, 1_000_000, user, "Reward for recycling 10kg plastic")?;
///     assert_eq!(ledger.balance_of(&user), 1_000_000);
/// }
/// ```
pub trait RecycleTokenApi: Send + Sync {
    // --- administration ---

    /// Replaces the administrator.
    fn set_admin(&self, caller: AccountId, new_admin: AccountId) -> Result<(), LedgerError>;

    /// Sets the pause flag.
    fn pause(&self, caller: AccountId) -> Result<(), LedgerError>;

    /// Clears the pause flag.
    fn unpause(&self, caller: AccountId) -> Result<(), LedgerError>;

    /// Registers an active minter.
    ///
    /// # Errors
    /// - `Unauthorized`: caller is not admin
    /// - `AlreadyRegistered`: account has an entry (active or revoked)
    fn add_minter(&self, caller: AccountId, account: AccountId) -> Result<(), LedgerError>;

    /// Revokes a minter.
    fn remove_minter(&self, caller: AccountId, account: AccountId) -> Result<(), LedgerError>;

    // --- issuance ---

    /// Issues units immediately and returns the record id.
    ///
    /// # Errors
    /// `Paused`, `InvalidMinter`, `InvalidAmount`, `InvalidRecipient`,
    /// `MetadataTooLong`, in that order of precedence.
    fn mint(
        &self,
        caller: AccountId,
        amount: Amount,
        recipient: AccountId,
        metadata: &str,
    ) -> Result<MintId, LedgerError>;

    /// Reserves units that vest linearly over `duration`.
    fn mint_with_vesting(
        &self,
        caller: AccountId,
        amount: Amount,
        recipient: AccountId,
        duration: Height,
        metadata: &str,
    ) -> Result<MintId, LedgerError>;

    /// Credits whatever has vested since the last claim.
    fn claim_vesting(&self, caller: AccountId, id: MintId) -> Result<Amount, LedgerError>;

    // --- transfer & delegation ---

    fn transfer(
        &self,
        caller: AccountId,
        amount: Amount,
        sender: AccountId,
        recipient: AccountId,
    ) -> Result<(), LedgerError>;

    fn approve(&self, caller: AccountId, spender: AccountId, amount: Amount)
        -> Result<(), LedgerError>;

    fn transfer_from(
        &self,
        caller: AccountId,
        amount: Amount,
        owner: AccountId,
        recipient: AccountId,
    ) -> Result<(), LedgerError>;

    // --- supply control ---

    fn burn(&self, caller: AccountId, amount: Amount) -> Result<(), LedgerError>;

    // --- queries ---

    fn name(&self) -> &'static str;

    fn symbol(&self) -> &'static str;

    fn decimals(&self) -> u8;

    fn total_supply(&self) -> Amount;

    fn balance_of(&self, account: &AccountId) -> Amount;

    fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount;

    fn mint_record(&self, id: MintId) -> Option<MintRecord>;

    fn is_minter(&self, account: &AccountId) -> bool;

    fn is_paused(&self) -> bool;

    fn vesting_schedule(&self, recipient: &AccountId, id: MintId) -> Option<VestingSchedule>;

    /// Claimable amount at `height`, without claiming.
    ///
    /// # Errors
    /// - `VestingNotFound`: no schedule for (recipient, id)
    fn calculate_claimable(
        &self,
        recipient: &AccountId,
        id: MintId,
        height: Height,
    ) -> Result<Amount, LedgerError>;
}
