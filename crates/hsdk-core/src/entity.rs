//! # Entity Identifiers
//!
//! The network addresses four kinds of entity: accounts, files, smart
//! contract instances, and claims (an attested hash attached to an account).
//! The first three share a `shard.realm.num` address; a claim is addressed by
//! its owning account plus the hash.
//!
//! [`EntityIdentifier`] is a tagged union over those four kinds plus an
//! explicit [`EntityIdentifier::Empty`] arm for requests that address nothing
//! in particular. Exactly one arm is active at a time, so "two kinds set at
//! once" is not representable; it can only arrive from the wire, where it is
//! rejected with [`DecodeError::MultipleVariantsSet`].
//!
//! ## Validation
//!
//! Constructors check structure only. Whether an entity exists, or whether
//! its number is unique across the network, is the network's business.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, ParseIdError};
use crate::wire;

/// Generates a `shard.realm.num` identifier type with `Display`/`FromStr`
/// in the dotted form the network uses in its tooling.
macro_rules! entity_triple {
    ($(#[$meta:meta])* $ty:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        pub struct $ty {
            /// Shard number.
            pub shard: u64,
            /// Realm number within the shard.
            pub realm: u64,
            /// Entity number within the realm.
            pub num: u64,
        }

        impl $ty {
            /// Build an identifier from its three address components.
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self { shard, realm, num }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
            }
        }

        impl FromStr for $ty {
            type Err = ParseIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let [shard, realm, num] = parse_triple(s)?;
                Ok(Self::new(shard, realm, num))
            }
        }
    };
}

entity_triple!(
    /// Address of a cryptocurrency account.
    AccountId
);
entity_triple!(
    /// Address of a file stored on the network.
    FileId
);
entity_triple!(
    /// Address of a smart contract instance.
    ContractId
);

fn parse_triple(s: &str) -> Result<[u64; 3], ParseIdError> {
    let parts: Vec<&str> = s.trim().split('.').collect();
    if parts.len() != 3 {
        return Err(ParseIdError::Format(s.to_string()));
    }
    let mut out = [0u64; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| ParseIdError::Number {
            part: (*part).to_string(),
            input: s.to_string(),
        })?;
    }
    Ok(out)
}

/// A hash attested by an account.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Claim {
    /// The account the claim is attached to. `None` when the message
    /// carried no `accountID` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountId>,
    /// The claimed hash, as raw bytes.
    #[serde(with = "hex_bytes")]
    pub hash: Vec<u8>,
}

impl Claim {
    /// Build a claim for `account` over `hash`.
    pub fn new(account: AccountId, hash: impl Into<Vec<u8>>) -> Self {
        Self {
            account: Some(account),
            hash: hash.into(),
        }
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.account {
            Some(account) => write!(f, "{account}:{}", hex::encode(&self.hash)),
            None => write!(f, "none:{}", hex::encode(&self.hash)),
        }
    }
}

/// Which arm of [`EntityIdentifier`] is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// An account.
    Account,
    /// A file.
    File,
    /// A smart contract instance.
    Contract,
    /// A claim.
    Claim,
    /// No entity.
    Empty,
}

impl EntityKind {
    /// Lowercase name, matching the serde tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::File => "file",
            Self::Contract => "contract",
            Self::Claim => "claim",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier for exactly one network entity, or none.
///
/// Equality is structural: same arm and same field values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityIdentifier {
    /// No entity is addressed.
    #[default]
    Empty,
    /// An account.
    Account(AccountId),
    /// A file.
    File(FileId),
    /// A smart contract instance.
    Contract(ContractId),
    /// A claim attached to an account.
    Claim(Claim),
}

impl EntityIdentifier {
    /// An identifier addressing no entity.
    pub const fn empty() -> Self {
        Self::Empty
    }

    /// An account identifier.
    pub const fn account(shard: u64, realm: u64, num: u64) -> Self {
        Self::Account(AccountId::new(shard, realm, num))
    }

    /// A file identifier.
    pub const fn file(shard: u64, realm: u64, num: u64) -> Self {
        Self::File(FileId::new(shard, realm, num))
    }

    /// A contract identifier.
    pub const fn contract(shard: u64, realm: u64, num: u64) -> Self {
        Self::Contract(ContractId::new(shard, realm, num))
    }

    /// A claim identifier for `hash` attached to `account`.
    pub fn claim(account: AccountId, hash: impl Into<Vec<u8>>) -> Self {
        Self::Claim(Claim::new(account, hash))
    }

    /// Decode an `EntityID` protobuf message.
    ///
    /// # Errors
    ///
    /// See [`wire::decode_entity_id`].
    pub fn from_wire(bytes: &[u8]) -> Result<Self, DecodeError> {
        wire::decode_entity_id(bytes)
    }

    /// Encode as a canonical `EntityID` protobuf message.
    pub fn to_wire(&self) -> Vec<u8> {
        wire::encode_entity_id(self)
    }

    /// Which arm is active.
    pub fn variant(&self) -> EntityKind {
        match self {
            Self::Empty => EntityKind::Empty,
            Self::Account(_) => EntityKind::Account,
            Self::File(_) => EntityKind::File,
            Self::Contract(_) => EntityKind::Contract,
            Self::Claim(_) => EntityKind::Claim,
        }
    }

    /// True for the [`EntityIdentifier::Empty`] arm.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn as_account(&self) -> Option<&AccountId> {
        match self {
            Self::Account(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileId> {
        match self {
            Self::File(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_contract(&self) -> Option<&ContractId> {
        match self {
            Self::Contract(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_claim(&self) -> Option<&Claim> {
        match self {
            Self::Claim(claim) => Some(claim),
            _ => None,
        }
    }
}

impl From<AccountId> for EntityIdentifier {
    fn from(id: AccountId) -> Self {
        Self::Account(id)
    }
}

impl From<FileId> for EntityIdentifier {
    fn from(id: FileId) -> Self {
        Self::File(id)
    }
}

impl From<ContractId> for EntityIdentifier {
    fn from(id: ContractId) -> Self {
        Self::Contract(id)
    }
}

impl From<Claim> for EntityIdentifier {
    fn from(claim: Claim) -> Self {
        Self::Claim(claim)
    }
}

impl fmt::Display for EntityIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("empty"),
            Self::Account(id) => write!(f, "account {id}"),
            Self::File(id) => write!(f, "file {id}"),
            Self::Contract(id) => write!(f, "contract {id}"),
            Self::Claim(claim) => write!(f, "claim {claim}"),
        }
    }
}

/// Serde helper encoding byte vectors as lowercase hex strings.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        hex::decode(raw).map_err(serde::de::Error::custom)
    }
}
