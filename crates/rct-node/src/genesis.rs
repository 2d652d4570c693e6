//! # Genesis
//!
//! Initial ledger configuration: who the ledger is, who administers it and
//! which accounts start out as minters.
//!
//! ```json
//! {
//!   "ledger_identity": "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee",
//!   "admin": "0x0101010101010101010101010101010101010101",
//!   "minters": ["0x0202020202020202020202020202020202020202"],
//!   "start_height": 0
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use rct_ledger::prelude::{AccountId, CallContext, Height, LedgerError, RecycleLedger};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Genesis loading errors.
#[derive(Debug, Error)]
pub enum GenesisError {
    /// Genesis file could not be read.
    #[error("Failed to read genesis file: {0}")]
    Io(#[from] std::io::Error),

    /// Genesis file is not valid JSON for [`GenesisConfig`].
    #[error("Failed to parse genesis file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid genesis configuration.
    #[error("Invalid genesis configuration: {0}")]
    InvalidConfig(String),

    /// Applying the genesis to a fresh ledger failed.
    #[error("Failed to initialize genesis state: {0}")]
    StateInit(#[from] LedgerError),
}

/// Genesis configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenesisConfig {
    /// The ledger's own account. Never a mint recipient.
    pub ledger_identity: AccountId,

    /// Initial administrator.
    pub admin: AccountId,

    /// Accounts registered as active minters at genesis.
    #[serde(default)]
    pub minters: Vec<AccountId>,

    /// Height of the first request.
    #[serde(default)]
    pub start_height: Height,
}

impl GenesisConfig {
    /// Single-admin, single-minter configuration for local runs.
    pub fn devnet() -> Self {
        Self {
            ledger_identity: AccountId::new([0xEE; 20]),
            admin: AccountId::new([0x01; 20]),
            minters: vec![AccountId::new([0x02; 20])],
            start_height: 0,
        }
    }

    /// Read and validate a genesis file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GenesisError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), GenesisError> {
        if self.admin == self.ledger_identity {
            return Err(GenesisError::InvalidConfig(
                "admin must differ from the ledger identity".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(self.minters.len());
        for minter in &self.minters {
            if *minter == self.ledger_identity {
                return Err(GenesisError::InvalidConfig(
                    "the ledger identity cannot be a minter".to_string(),
                ));
            }
            if !seen.insert(minter) {
                return Err(GenesisError::InvalidConfig(format!(
                    "duplicate minter {minter:?}"
                )));
            }
        }
        Ok(())
    }

    /// Build the initial ledger with every genesis minter registered.
    pub fn build(&self) -> Result<RecycleLedger, GenesisError> {
        self.validate()?;

        let mut ledger = RecycleLedger::new(self.ledger_identity, self.admin);
        let ctx = CallContext::new(self.admin, self.start_height);
        for minter in &self.minters {
            ledger.add_minter(&ctx, *minter)?;
        }
        Ok(ledger)
    }
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self::devnet()
    }
}
