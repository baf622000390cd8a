//! # Wire Codec
//!
//! Protobuf (proto3) encoding of the network's identifier and response
//! messages. Tag numbers are fixed by the network's published schema:
//!
//! ```text
//! message AccountID  { int64 shardNum = 1; int64 realmNum = 2; int64 accountNum  = 3; }
//! message FileID     { int64 shardNum = 1; int64 realmNum = 2; int64 fileNum     = 3; }
//! message ContractID { int64 shardNum = 1; int64 realmNum = 2; int64 contractNum = 3; }
//! message Claim      { AccountID accountID = 1; bytes hash = 2; ... }
//! message EntityID   { oneof entity { AccountID accountID = 1; Claim claim = 2;
//!                                     FileID fileID = 3; ContractID contractID = 4; } }
//! message TransactionResponse { ResponseCodeEnum nodeTransactionPrecheckCode = 1; uint64 cost = 2; }
//! ```
//!
//! The inner messages are `prost` derives. The `EntityID` oneof is driven
//! by hand on top of `prost::encoding`, since a derived oneof keeps
//! whichever arm came last instead of rejecting a second arm.
//!
//! ## Canonical form
//!
//! Fields are written in ascending tag order. Zero scalars and empty `bytes`
//! are omitted. The active `EntityID` arm is always written, even with an
//! empty body, because presence of the tag is what selects the arm. A
//! claim's `accountID` is written exactly when it is present. Equal values
//! produce identical bytes.
//!
//! ## Decoding rules
//!
//! - Unknown fields are skipped, including well-formed groups.
//! - A repeated occurrence of the same `EntityID` arm merges into the earlier
//!   one, later scalars winning; a second, different arm is
//!   [`DecodeError::MultipleVariantsSet`].
//! - Truncation, varints longer than 64 bits, reserved wire types, field
//!   number zero, and known fields with the wrong wire type are
//!   [`DecodeError::Malformed`].

use prost::encoding::{self, DecodeContext, WireType};
use prost::Message;

use crate::entity::{AccountId, Claim, ContractId, EntityIdentifier, EntityKind, FileId};
use crate::error::DecodeError;

/// `EntityID.accountID`.
pub const ENTITY_ACCOUNT_TAG: u32 = 1;
/// `EntityID.claim`.
pub const ENTITY_CLAIM_TAG: u32 = 2;
/// `EntityID.fileID`.
pub const ENTITY_FILE_TAG: u32 = 3;
/// `EntityID.contractID`.
pub const ENTITY_CONTRACT_TAG: u32 = 4;

// ─── Messages ────────────────────────────────────────────────────────

/// Shared layout of `AccountID`, `FileID` and `ContractID`.
///
/// The schema declares `int64`; the varint carries the same bit pattern as
/// the `u64` components, so the casts are lossless both ways.
#[derive(Clone, Copy, PartialEq, Eq, Message)]
struct ShardRealmNum {
    #[prost(int64, tag = "1")]
    shard_num: i64,
    #[prost(int64, tag = "2")]
    realm_num: i64,
    #[prost(int64, tag = "3")]
    num: i64,
}

impl ShardRealmNum {
    fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self {
            shard_num: shard as i64,
            realm_num: realm as i64,
            num: num as i64,
        }
    }

    fn parts(&self) -> (u64, u64, u64) {
        (self.shard_num as u64, self.realm_num as u64, self.num as u64)
    }

    fn into_account(self) -> AccountId {
        let (shard, realm, num) = self.parts();
        AccountId::new(shard, realm, num)
    }
}

/// `keys` and `claimDuration` are not modelled and are skipped as unknown.
#[derive(Clone, PartialEq, Eq, Message)]
struct ClaimMessage {
    #[prost(message, optional, tag = "1")]
    account_id: Option<ShardRealmNum>,
    #[prost(bytes = "vec", tag = "2")]
    hash: Vec<u8>,
}

impl From<&Claim> for ClaimMessage {
    fn from(claim: &Claim) -> Self {
        Self {
            account_id: claim.account.map(|a| ShardRealmNum::new(a.shard, a.realm, a.num)),
            hash: claim.hash.clone(),
        }
    }
}

impl From<ClaimMessage> for Claim {
    fn from(msg: ClaimMessage) -> Self {
        Claim {
            account: msg.account_id.map(ShardRealmNum::into_account),
            hash: msg.hash,
        }
    }
}

/// A node's synchronous reply to a submitted transaction.
#[derive(Clone, Copy, PartialEq, Eq, Message)]
pub struct TransactionResponse {
    /// Raw `ResponseCodeEnum` value; see [`crate::precheck`].
    #[prost(int32, tag = "1")]
    pub code: i32,
    /// Fee the node would charge, when it reports one.
    #[prost(uint64, tag = "2")]
    pub cost: u64,
}

/// Transport framing: the addressed `EntityID` (omitted when empty)
/// followed by the already-signed body bytes.
#[derive(Clone, PartialEq, Eq, Message)]
struct RequestEnvelope {
    #[prost(bytes = "vec", tag = "1")]
    target: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    body: Vec<u8>,
}

// ─── shard.realm.num helpers ─────────────────────────────────────────

/// Encode an `AccountID` message.
pub fn encode_account_id(id: &AccountId) -> Vec<u8> {
    ShardRealmNum::new(id.shard, id.realm, id.num).encode_to_vec()
}

/// Decode an `AccountID` message.
pub fn decode_account_id(bytes: &[u8]) -> Result<AccountId, DecodeError> {
    Ok(ShardRealmNum::decode(bytes)?.into_account())
}

/// Encode a `FileID` message.
pub fn encode_file_id(id: &FileId) -> Vec<u8> {
    ShardRealmNum::new(id.shard, id.realm, id.num).encode_to_vec()
}

/// Decode a `FileID` message.
pub fn decode_file_id(bytes: &[u8]) -> Result<FileId, DecodeError> {
    let (shard, realm, num) = ShardRealmNum::decode(bytes)?.parts();
    Ok(FileId::new(shard, realm, num))
}

/// Encode a `ContractID` message.
pub fn encode_contract_id(id: &ContractId) -> Vec<u8> {
    ShardRealmNum::new(id.shard, id.realm, id.num).encode_to_vec()
}

/// Decode a `ContractID` message.
pub fn decode_contract_id(bytes: &[u8]) -> Result<ContractId, DecodeError> {
    let (shard, realm, num) = ShardRealmNum::decode(bytes)?.parts();
    Ok(ContractId::new(shard, realm, num))
}

// ─── EntityID ────────────────────────────────────────────────────────

/// The `EntityID` arm seen so far while decoding.
enum Arm {
    Account(ShardRealmNum),
    Claim(ClaimMessage),
    File(ShardRealmNum),
    Contract(ShardRealmNum),
}

impl Arm {
    fn for_tag(tag: u32) -> Option<Self> {
        match tag {
            ENTITY_ACCOUNT_TAG => Some(Self::Account(ShardRealmNum::default())),
            ENTITY_CLAIM_TAG => Some(Self::Claim(ClaimMessage::default())),
            ENTITY_FILE_TAG => Some(Self::File(ShardRealmNum::default())),
            ENTITY_CONTRACT_TAG => Some(Self::Contract(ShardRealmNum::default())),
            _ => None,
        }
    }

    fn kind(&self) -> EntityKind {
        match self {
            Self::Account(_) => EntityKind::Account,
            Self::Claim(_) => EntityKind::Claim,
            Self::File(_) => EntityKind::File,
            Self::Contract(_) => EntityKind::Contract,
        }
    }

    /// Merge one length-delimited occurrence of this arm from `buf`.
    fn merge(&mut self, buf: &mut &[u8]) -> Result<(), DecodeError> {
        let ctx = DecodeContext::default();
        match self {
            Self::Account(m) | Self::File(m) | Self::Contract(m) => {
                encoding::message::merge(WireType::LengthDelimited, m, buf, ctx)?
            }
            Self::Claim(m) => encoding::message::merge(WireType::LengthDelimited, m, buf, ctx)?,
        }
        Ok(())
    }

    fn into_identifier(self) -> EntityIdentifier {
        match self {
            Self::Account(m) => EntityIdentifier::Account(m.into_account()),
            Self::Claim(m) => EntityIdentifier::Claim(m.into()),
            Self::File(m) => {
                let (shard, realm, num) = m.parts();
                EntityIdentifier::file(shard, realm, num)
            }
            Self::Contract(m) => {
                let (shard, realm, num) = m.parts();
                EntityIdentifier::contract(shard, realm, num)
            }
        }
    }
}

/// Encode an identifier as a canonical `EntityID` message.
///
/// [`EntityIdentifier::Empty`] encodes to zero bytes.
pub fn encode_entity_id(id: &EntityIdentifier) -> Vec<u8> {
    let mut buf = Vec::new();
    match id {
        EntityIdentifier::Empty => {}
        EntityIdentifier::Account(a) => encoding::message::encode(
            ENTITY_ACCOUNT_TAG,
            &ShardRealmNum::new(a.shard, a.realm, a.num),
            &mut buf,
        ),
        EntityIdentifier::Claim(c) => {
            encoding::message::encode(ENTITY_CLAIM_TAG, &ClaimMessage::from(c), &mut buf)
        }
        EntityIdentifier::File(f) => encoding::message::encode(
            ENTITY_FILE_TAG,
            &ShardRealmNum::new(f.shard, f.realm, f.num),
            &mut buf,
        ),
        EntityIdentifier::Contract(c) => encoding::message::encode(
            ENTITY_CONTRACT_TAG,
            &ShardRealmNum::new(c.shard, c.realm, c.num),
            &mut buf,
        ),
    }
    buf
}

/// Decode an `EntityID` message.
///
/// Zero bytes (or only unknown fields) decode to
/// [`EntityIdentifier::Empty`].
///
/// # Errors
///
/// - [`DecodeError::MultipleVariantsSet`] if two different arms are present.
/// - [`DecodeError::Malformed`] if the bytes violate the wire grammar.
pub fn decode_entity_id(bytes: &[u8]) -> Result<EntityIdentifier, DecodeError> {
    let mut buf = bytes;
    let mut active: Option<Arm> = None;
    while !buf.is_empty() {
        let (tag, wire_type) = encoding::decode_key(&mut buf)?;
        let Some(fresh) = Arm::for_tag(tag) else {
            encoding::skip_field(wire_type, tag, &mut buf, DecodeContext::default())?;
            continue;
        };
        encoding::check_wire_type(WireType::LengthDelimited, wire_type)?;

        let kind = fresh.kind();
        let arm = active.get_or_insert(fresh);
        if arm.kind() != kind {
            return Err(DecodeError::MultipleVariantsSet);
        }
        arm.merge(&mut buf)?;
    }
    Ok(active.map_or(EntityIdentifier::Empty, Arm::into_identifier))
}

// ─── TransactionResponse ─────────────────────────────────────────────

/// Encode a `TransactionResponse` message. Negative codes are
/// sign-extended to ten bytes, as protobuf does for enums.
pub fn encode_transaction_response(response: &TransactionResponse) -> Vec<u8> {
    response.encode_to_vec()
}

/// Decode a `TransactionResponse` message.
pub fn decode_transaction_response(bytes: &[u8]) -> Result<TransactionResponse, DecodeError> {
    Ok(TransactionResponse::decode(bytes)?)
}

// ─── Request envelope ────────────────────────────────────────────────

/// Frame a request for transport: the addressed `EntityID` (omitted when
/// empty) followed by the already-signed body bytes.
pub fn encode_request(target: &EntityIdentifier, body: &[u8]) -> Vec<u8> {
    RequestEnvelope {
        target: encode_entity_id(target),
        body: body.to_vec(),
    }
    .encode_to_vec()
}

/// Inverse of [`encode_request`].
pub fn decode_request(bytes: &[u8]) -> Result<(EntityIdentifier, Vec<u8>), DecodeError> {
    let envelope = RequestEnvelope::decode(bytes)?;
    Ok((decode_entity_id(&envelope.target)?, envelope.body))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_identifier() -> impl Strategy<Value = EntityIdentifier> {
        let triple = (any::<u64>(), any::<u64>(), any::<u64>());
        prop_oneof![
            Just(EntityIdentifier::Empty),
            triple.clone().prop_map(|(s, r, n)| EntityIdentifier::account(s, r, n)),
            triple.clone().prop_map(|(s, r, n)| EntityIdentifier::file(s, r, n)),
            triple.clone().prop_map(|(s, r, n)| EntityIdentifier::contract(s, r, n)),
            (prop::option::of(triple), prop::collection::vec(any::<u8>(), 0..64)).prop_map(
                |(account, hash)| {
                    EntityIdentifier::Claim(Claim {
                        account: account.map(|(s, r, n)| AccountId::new(s, r, n)),
                        hash,
                    })
                }
            ),
        ]
    }

    proptest! {
        /// Every identifier survives an encode/decode cycle.
        #[test]
        fn entity_id_round_trips(id in any_identifier()) {
            let bytes = encode_entity_id(&id);
            prop_assert_eq!(decode_entity_id(&bytes).unwrap(), id);
        }

        /// Encoding is deterministic.
        #[test]
        fn entity_id_encoding_is_deterministic(id in any_identifier()) {
            prop_assert_eq!(encode_entity_id(&id), encode_entity_id(&id.clone()));
        }

        /// Canonical bytes re-encode to themselves.
        #[test]
        fn canonical_bytes_are_a_fixed_point(id in any_identifier()) {
            let bytes = encode_entity_id(&id);
            let again = encode_entity_id(&decode_entity_id(&bytes).unwrap());
            prop_assert_eq!(again, bytes);
        }

        /// Arbitrary input never panics the decoder.
        #[test]
        fn decoder_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
            let _ = decode_entity_id(&bytes);
            let _ = decode_transaction_response(&bytes);
            let _ = decode_request(&bytes);
        }

        /// Two distinct arms concatenated are always rejected.
        #[test]
        fn two_arms_are_rejected(a in any_identifier(), b in any_identifier()) {
            prop_assume!(!a.is_empty() && !b.is_empty() && a.variant() != b.variant());
            let mut bytes = encode_entity_id(&a);
            bytes.extend(encode_entity_id(&b));
            prop_assert_eq!(decode_entity_id(&bytes), Err(DecodeError::MultipleVariantsSet));
        }

        #[test]
        fn transaction_response_round_trips(code in any::<i32>(), cost in any::<u64>()) {
            let resp = TransactionResponse { code, cost };
            prop_assert_eq!(decode_transaction_response(&encode_transaction_response(&resp)).unwrap(), resp);
        }
    }
}
