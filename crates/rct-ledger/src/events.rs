//! # Event Schema
//!
//! Request/response payloads for the ledger service boundary and the events
//! published after every committed mutation.
//!
//! Amounts travel as decimal strings so that the full `u128` range survives
//! JSON clients.
//!
//! | Message | Direction |
//! |---------|-----------|
//! | `LedgerRequest` | caller -> service |
//! | `LedgerResponse` | service -> caller |
//! | `LedgerEvent` | service -> `EventSink` |

use crate::domain::entities::{token, MintRecord, VestingSchedule};
use crate::domain::value_objects::{amount_format, AccountId, Amount, Height, MintId};
use crate::errors::{LedgerError, ServiceError};
use serde::{Deserialize, Serialize};

// =============================================================================
// REQUESTS
// =============================================================================

/// One ledger operation. The caller identity travels outside the payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum LedgerRequest {
    SetAdmin {
        new_admin: AccountId,
    },
    Pause,
    Unpause,
    AddMinter {
        account: AccountId,
    },
    RemoveMinter {
        account: AccountId,
    },
    Mint {
        #[serde(with = "amount_format")]
        amount: Amount,
        recipient: AccountId,
        #[serde(default)]
        metadata: String,
    },
    MintWithVesting {
        #[serde(with = "amount_format")]
        amount: Amount,
        recipient: AccountId,
        duration: Height,
        #[serde(default)]
        metadata: String,
    },
    ClaimVesting {
        id: MintId,
    },
    Transfer {
        #[serde(with = "amount_format")]
        amount: Amount,
        sender: AccountId,
        recipient: AccountId,
    },
    Approve {
        spender: AccountId,
        #[serde(with = "amount_format")]
        amount: Amount,
    },
    TransferFrom {
        #[serde(with = "amount_format")]
        amount: Amount,
        owner: AccountId,
        recipient: AccountId,
    },
    Burn {
        #[serde(with = "amount_format")]
        amount: Amount,
    },
    GetName,
    GetSymbol,
    GetDecimals,
    GetTotalSupply,
    GetBalance {
        account: AccountId,
    },
    GetAllowance {
        owner: AccountId,
        spender: AccountId,
    },
    GetMintRecord {
        id: MintId,
    },
    IsMinter {
        account: AccountId,
    },
    IsPaused,
    GetAdmin,
    GetVestingSchedule {
        recipient: AccountId,
        id: MintId,
    },
    /// Evaluated at `height` when given, otherwise at the current height.
    CalculateClaimable {
        recipient: AccountId,
        id: MintId,
        #[serde(default)]
        height: Option<Height>,
    },
}

impl LedgerRequest {
    /// Operation label used in logs and metrics.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::SetAdmin { .. } => "set_admin",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
            Self::AddMinter { .. } => "add_minter",
            Self::RemoveMinter { .. } => "remove_minter",
            Self::Mint { .. } => "mint",
            Self::MintWithVesting { .. } => "mint_with_vesting",
            Self::ClaimVesting { .. } => "claim_vesting",
            Self::Transfer { .. } => "transfer",
            Self::Approve { .. } => "approve",
            Self::TransferFrom { .. } => "transfer_from",
            Self::Burn { .. } => "burn",
            Self::GetName => "get_name",
            Self::GetSymbol => "get_symbol",
            Self::GetDecimals => "get_decimals",
            Self::GetTotalSupply => "get_total_supply",
            Self::GetBalance { .. } => "get_balance",
            Self::GetAllowance { .. } => "get_allowance",
            Self::GetMintRecord { .. } => "get_mint_record",
            Self::IsMinter { .. } => "is_minter",
            Self::IsPaused => "is_paused",
            Self::GetAdmin => "get_admin",
            Self::GetVestingSchedule { .. } => "get_vesting_schedule",
            Self::CalculateClaimable { .. } => "calculate_claimable",
        }
    }

    /// True for read-only requests.
    #[must_use]
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Self::GetName
                | Self::GetSymbol
                | Self::GetDecimals
                | Self::GetTotalSupply
                | Self::GetBalance { .. }
                | Self::GetAllowance { .. }
                | Self::GetMintRecord { .. }
                | Self::IsMinter { .. }
                | Self::IsPaused
                | Self::GetAdmin
                | Self::GetVestingSchedule { .. }
                | Self::CalculateClaimable { .. }
        )
    }
}

// =============================================================================
// RESPONSES
// =============================================================================

/// Result of one [`LedgerRequest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum LedgerResponse {
    /// Mutation committed, nothing to return.
    Ack,
    /// New mint record / vesting schedule id.
    Id { id: MintId },
    /// Units credited or claimable.
    Amount {
        #[serde(with = "amount_format")]
        amount: Amount,
    },
    /// Balance, allowance or supply.
    Balance {
        #[serde(with = "amount_format")]
        balance: Amount,
    },
    Record { record: Option<MintRecord> },
    Schedule { schedule: Option<VestingSchedule> },
    Flag { value: bool },
    Text { value: String },
    Decimals { value: u8 },
    Account { account: AccountId },
    /// Operation rejected; nothing changed.
    Error {
        code: u32,
        kind: String,
        message: String,
    },
}

impl LedgerResponse {
    /// Response for the token name query.
    #[must_use]
    pub fn name() -> Self {
        Self::Text {
            value: token::NAME.to_string(),
        }
    }

    /// Response for the token symbol query.
    #[must_use]
    pub fn symbol() -> Self {
        Self::Text {
            value: token::SYMBOL.to_string(),
        }
    }

    /// True for [`LedgerResponse::Error`].
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Error code, if this is an error response.
    #[must_use]
    pub fn error_code(&self) -> Option<u32> {
        match self {
            Self::Error { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<ServiceError> for LedgerResponse {
    fn from(err: ServiceError) -> Self {
        Self::Error {
            code: err.code(),
            kind: err.kind_name().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<LedgerError> for LedgerResponse {
    fn from(err: LedgerError) -> Self {
        ServiceError::from(err).into()
    }
}

// =============================================================================
// EVENTS
// =============================================================================

/// Published once per committed mutation, in commit order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum LedgerEvent {
    AdminChanged {
        previous: AccountId,
        new_admin: AccountId,
        height: Height,
    },
    Paused {
        by: AccountId,
        height: Height,
    },
    Unpaused {
        by: AccountId,
        height: Height,
    },
    MinterAdded {
        account: AccountId,
        height: Height,
    },
    MinterRemoved {
        account: AccountId,
        height: Height,
    },
    Minted {
        id: MintId,
        minter: AccountId,
        recipient: AccountId,
        #[serde(with = "amount_format")]
        amount: Amount,
        height: Height,
    },
    VestingGranted {
        id: MintId,
        minter: AccountId,
        recipient: AccountId,
        #[serde(with = "amount_format")]
        amount: Amount,
        duration: Height,
        height: Height,
    },
    VestingClaimed {
        id: MintId,
        recipient: AccountId,
        #[serde(with = "amount_format")]
        amount: Amount,
        height: Height,
    },
    Transferred {
        sender: AccountId,
        recipient: AccountId,
        #[serde(with = "amount_format")]
        amount: Amount,
        height: Height,
    },
    Approved {
        owner: AccountId,
        spender: AccountId,
        #[serde(with = "amount_format")]
        amount: Amount,
        height: Height,
    },
    TransferredFrom {
        spender: AccountId,
        owner: AccountId,
        recipient: AccountId,
        #[serde(with = "amount_format")]
        amount: Amount,
        height: Height,
    },
    Burned {
        account: AccountId,
        #[serde(with = "amount_format")]
        amount: Amount,
        height: Height,
    },
}

impl LedgerEvent {
    /// Height at which the mutation committed.
    #[must_use]
    pub fn height(&self) -> Height {
        match self {
            Self::AdminChanged { height, .. }
            | Self::Paused { height, .. }
            | Self::Unpaused { height, .. }
            | Self::MinterAdded { height, .. }
            | Self::MinterRemoved { height, .. }
            | Self::Minted { height, .. }
            | Self::VestingGranted { height, .. }
            | Self::VestingClaimed { height, .. }
            | Self::Transferred { height, .. }
            | Self::Approved { height, .. }
            | Self::TransferredFrom { height, .. }
            | Self::Burned { height, .. } => *height,
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
    fn test_request_wire_format() {
        let json = format!(
            r#"{{"op":"mint","amount":"1000000","recipient":"{}","metadata":"Reward for recycling 10kg plastic"}}"#,
            account(0x0A).to_hex()
        );
        let request: LedgerRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(
            request,
            LedgerRequest::Mint {
                amount: 1_000_000,
                recipient: account(0x0A),
                metadata: "Reward for recycling 10kg plastic".to_string(),
            }
        );
        assert_eq!(request.operation(), "mint");
        assert!(!request.is_query());
    }

    #[test]
    fn test_unit_and_defaulted_requests() {
        let pause: LedgerRequest = serde_json::from_str(r#"{"op":"pause"}"#).unwrap();
        assert_eq!(pause, LedgerRequest::Pause);

        let json = format!(
            r#"{{"op":"calculate-claimable","recipient":"{}","id":3}}"#,
            account(1).to_hex()
        );
        let request: LedgerRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(
            request,
            LedgerRequest::CalculateClaimable {
                recipient: account(1),
                id: 3,
                height: None,
            }
        );
        assert!(request.is_query());
    }

    #[test]
    fn test_large_amount_survives_tagged_enum() {
        let request = LedgerRequest::Burn { amount: u128::MAX };
        let json = serde_json::to_string(&request).unwrap();
        let back: LedgerRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_unknown_op_rejected() {
        assert!(serde_json::from_str::<LedgerRequest>(r#"{"op":"steal"}"#).is_err());
    }

    #[test]
    fn test_error_response_from_ledger_error() {
        let response = LedgerResponse::from(LedgerError::InsufficientBalance {
            required: 5,
            available: 1,
        });
        assert!(response.is_error());
        assert_eq!(response.error_code(), Some(107));
        match response {
            LedgerResponse::Error { kind, message, .. } => {
                assert_eq!(kind, "InsufficientBalance");
                assert!(message.contains("required 5"));
            }
            other => panic!("unexpected response {other:?}"),
        }
    }

    #[test]
    fn test_response_wire_format() {
        let json = serde_json::to_value(LedgerResponse::Balance { balance: 7 }).unwrap();
        assert_eq!(json, serde_json::json!({"status": "balance", "balance": "7"}));
        assert_eq!(
            serde_json::to_value(LedgerResponse::Ack).unwrap(),
            serde_json::json!({"status": "ack"})
        );
    }

    #[test]
    fn test_event_height() {
        let event = LedgerEvent::Burned {
            account: account(1),
            amount: 3,
            height: 42,
        };
        assert_eq!(event.height(), 42);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "burned");
    }
}
