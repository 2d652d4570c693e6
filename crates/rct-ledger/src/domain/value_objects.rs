//! # Value Objects
//!
//! Immutable domain primitives for the reward ledger.
//! These types represent concepts that are defined by their value, not identity.

use crate::errors::LedgerError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Token amount in base units (6 decimals).
pub type Amount = u128;

/// External time counter value supplied by the calling environment.
pub type Height = u64;

/// Identifier shared by mint records and vesting schedules.
pub type MintId = u64;

// =============================================================================
// ACCOUNT IDENTITY (20 bytes)
// =============================================================================

/// Opaque 20-byte account identity (caller, recipient, spender, minter).
///
/// Serialized as a `0x`-prefixed lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId(pub [u8; 20]);

impl AccountId {
    /// Creates an identity from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an identity from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        <[u8; 20]>::try_from(slice).ok().map(Self)
    }

    /// Full `0x`-prefixed hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "...")?;
        for byte in &self.0[18..] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 20]> for AccountId {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<AccountId> for [u8; 20] {
    fn from(account: AccountId) -> Self {
        account.0
    }
}

/// Failure to parse an [`AccountId`] from text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountIdParseError {
    /// Not valid hex.
    #[error("invalid hex in account id: {0}")]
    InvalidHex(String),

    /// Decoded to the wrong number of bytes.
    #[error("account id must be 20 bytes, got {0}")]
    InvalidLength(usize),
}

impl FromStr for AccountId {
    type Err = AccountIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes =
            hex::decode(digits).map_err(|e| AccountIdParseError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes).ok_or(AccountIdParseError::InvalidLength(bytes.len()))
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// METADATA (bounded text)
// =============================================================================

/// Maximum metadata length, counted in Unicode scalar values.
pub const MAX_METADATA_CHARS: usize = 500;

/// Free-form text attached to a mint record.
///
/// Only constructible through [`Metadata::new`], which enforces
/// [`MAX_METADATA_CHARS`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Metadata(String);

impl Metadata {
    /// Validates and wraps `text`.
    ///
    /// # Errors
    ///
    /// [`LedgerError::MetadataTooLong`] if `text` exceeds 500 characters.
    pub fn new(text: impl Into<String>) -> Result<Self, LedgerError> {
        let text = text.into();
        let length = text.chars().count();
        if length > MAX_METADATA_CHARS {
            return Err(LedgerError::MetadataTooLong {
                length,
                max: MAX_METADATA_CHARS,
            });
        }
        Ok(Self(text))
    }

    /// Borrow the text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl TryFrom<String> for Metadata {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Metadata> for String {
    fn from(metadata: Metadata) -> Self {
        metadata.0
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// AMOUNT WIRE FORMAT
// =============================================================================

/// Serde adapter writing an [`Amount`] as a decimal string.
///
/// JSON numbers lose precision above 2^53 in most clients, and tagged enums
/// buffer their content in a form that cannot hold `u128`. Input accepts a
/// decimal string or a plain integer up to `u64::MAX`.
pub mod amount_format {
    use super::Amount;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl<'de> Visitor<'de> for AmountVisitor {
        type Value = Amount;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative integer or decimal string")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
            Ok(Amount::from(value))
        }

        fn visit_u128<E: de::Error>(self, value: u128) -> Result<Amount, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
            Amount::try_from(value).map_err(|_| E::custom("amount must not be negative"))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
            value
                .parse()
                .map_err(|_| E::custom(format!("invalid amount: {value:?}")))
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_hex_round_trip() {
        let account = AccountId::new([0xAB; 20]);
        let parsed: AccountId = account.to_hex().parse().unwrap();
        assert_eq!(parsed, account);

        // Prefix is optional on input
        let bare: AccountId = "ab".repeat(20).parse().unwrap();
        assert_eq!(bare, account);
    }

    #[test]
    fn test_account_id_rejects_bad_input() {
        assert!(matches!(
            "0x1234".parse::<AccountId>(),
            Err(AccountIdParseError::InvalidLength(2))
        ));
        assert!(matches!(
            "0xzz".parse::<AccountId>(),
            Err(AccountIdParseError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_account_id_display_is_abbreviated() {
        let account = AccountId::new([0x11; 20]);
        assert_eq!(account.to_string(), "0x11111111...1111");
        assert_eq!(format!("{account:?}"), account.to_hex());
    }

    #[test]
    fn test_account_id_serde_as_string() {
        let account = AccountId::new([7u8; 20]);
        let json = serde_json::to_string(&account).unwrap();
        assert_eq!(json, format!("\"{}\"", account.to_hex()));
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, account);
    }

    #[test]
    fn test_metadata_bound() {
        assert!(Metadata::new("Reward for recycling 10kg plastic").is_ok());
        assert!(Metadata::new("x".repeat(MAX_METADATA_CHARS)).is_ok());

        let err = Metadata::new("x".repeat(MAX_METADATA_CHARS + 1)).unwrap_err();
        assert_eq!(
            err,
            LedgerError::MetadataTooLong {
                length: 501,
                max: 500
            }
        );
    }

    #[test]
    fn test_metadata_counts_characters_not_bytes() {
        // 500 two-byte characters is 1000 bytes but still within bound
        let text = "é".repeat(MAX_METADATA_CHARS);
        let metadata = Metadata::new(text).unwrap();
        assert_eq!(metadata.char_len(), 500);
    }

    #[test]
    fn test_metadata_deserialize_enforces_bound() {
        let too_long = serde_json::to_string(&"y".repeat(501)).unwrap();
        assert!(serde_json::from_str::<Metadata>(&too_long).is_err());
    }

    #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Wrapped {
        #[serde(with = "amount_format")]
        amount: Amount,
    }

    #[test]
    fn test_amount_format_accepts_string_and_number() {
        let json = serde_json::to_string(&Wrapped { amount: u128::MAX }).unwrap();
        assert_eq!(json, format!("{{\"amount\":\"{}\"}}", u128::MAX));
        assert_eq!(
            serde_json::from_str::<Wrapped>(&json).unwrap().amount,
            u128::MAX
        );
        assert_eq!(
            serde_json::from_str::<Wrapped>(r#"{"amount":42}"#).unwrap(),
            Wrapped { amount: 42 }
        );
        assert!(serde_json::from_str::<Wrapped>(r#"{"amount":-1}"#).is_err());
        assert!(serde_json::from_str::<Wrapped>(r#"{"amount":"1e3"}"#).is_err());
    }
}
