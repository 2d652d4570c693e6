//! # Access Policy
//!
//! Role predicates over the ledger state. Every identity comparison that
//! gates an operation goes through here.

use super::state::LedgerState;
use super::value_objects::AccountId;
use crate::errors::LedgerError;

/// Read-only role view over a [`LedgerState`].
#[derive(Clone, Copy, Debug)]
pub struct AccessPolicy<'a> {
    state: &'a LedgerState,
}

impl<'a> AccessPolicy<'a> {
    /// Bind the policy to `state`.
    #[must_use]
    pub const fn new(state: &'a LedgerState) -> Self {
        Self { state }
    }

    /// True if `account` is the current administrator.
    #[must_use]
    pub fn is_admin(&self, account: &AccountId) -> bool {
        self.state.admin == *account
    }

    /// True if `account` holds an active minter flag.
    #[must_use]
    pub fn is_minter(&self, account: &AccountId) -> bool {
        self.state.minter_entry(account).unwrap_or(false)
    }

    /// True if `account` has any minter entry, active or revoked.
    #[must_use]
    pub fn is_registered_minter(&self, account: &AccountId) -> bool {
        self.state.minter_entry(account).is_some()
    }

    /// Fails with [`LedgerError::Unauthorized`] unless `caller` is admin.
    pub fn require_admin(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if self.is_admin(caller) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized)
        }
    }

    /// Fails with [`LedgerError::InvalidMinter`] unless `caller` is an
    /// active minter.
    pub fn require_minter(&self, caller: &AccountId) -> Result<(), LedgerError> {
        if self.is_minter(caller) {
            Ok(())
        } else {
            Err(LedgerError::InvalidMinter)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(n: u8) -> AccountId {
        AccountId::new([n; 20])
    }

    #[test]
    fn test_admin_predicate() {
        let state = LedgerState::new(account(0xCC), account(1));
        let policy = AccessPolicy::new(&state);
        assert!(policy.is_admin(&account(1)));
        assert!(!policy.is_admin(&account(2)));
        assert!(policy.require_admin(&account(1)).is_ok());
        assert_eq!(
            policy.require_admin(&account(2)),
            Err(LedgerError::Unauthorized)
        );
    }

    #[test]
    fn test_minter_predicates() {
        let mut state = LedgerState::new(account(0xCC), account(1));
        state.minters.insert(account(2), true);
        state.minters.insert(account(3), false);
        let policy = AccessPolicy::new(&state);

        assert!(policy.is_minter(&account(2)));
        assert!(!policy.is_minter(&account(3)));
        assert!(!policy.is_minter(&account(4)));

        // Registration is existence-based
        assert!(policy.is_registered_minter(&account(3)));
        assert!(!policy.is_registered_minter(&account(4)));

        assert_eq!(
            policy.require_minter(&account(3)),
            Err(LedgerError::InvalidMinter)
        );
    }

    #[test]
    fn test_admin_is_not_implicitly_minter() {
        let state = LedgerState::new(account(0xCC), account(1));
        let policy = AccessPolicy::new(&state);
        assert!(!policy.is_minter(&account(1)));
    }
}
