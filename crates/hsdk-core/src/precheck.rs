//! # Precheck Outcome — Response Codes and Policy
//!
//! A node answers every submission synchronously with a precheck code before
//! consensus runs. This module holds the closed set of codes the network's
//! `ResponseCodeEnum` defines and the policy that sorts each into one of
//! three classes:
//!
//! | Class | Codes |
//! |-------|-------|
//! | [`PolicyClass::Proceed`] | `OK`, `SUCCESS` |
//! | [`PolicyClass::RetryAfterDelay`] | `BUSY`, `PLATFORM_NOT_ACTIVE`, `PLATFORM_TRANSACTION_NOT_CREATED` |
//! | [`PolicyClass::Fail`] | every other known code, and every unknown raw value |
//!
//! Classification is total and pure. It never looks at attempt counts or
//! clocks; those belong to the executor. Unknown raw values fail closed and
//! stay distinguishable through [`PrecheckCode::Unrecognized`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a caller should do after receiving a precheck code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyClass {
    /// The node accepted the request.
    Proceed,
    /// The node is temporarily unable to accept; resend the same request later.
    RetryAfterDelay,
    /// The node rejected the request; resending it unchanged will not help.
    Fail,
}

impl PolicyClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Proceed => "proceed",
            Self::RetryAfterDelay => "retry_after_delay",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for PolicyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generates [`ResponseCode`] with its raw values, schema names, and the
/// ordered table returned by [`ResponseCode::all`].
macro_rules! response_codes {
    ($($(#[$doc:meta])* $variant:ident = $raw:literal => $name:literal,)+) => {
        /// Precheck codes defined by the network's `ResponseCodeEnum`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        #[repr(i32)]
        pub enum ResponseCode {
            $($(#[$doc])* $variant = $raw,)+
        }

        impl ResponseCode {
            /// Every known code in ascending raw order.
            pub fn all() -> &'static [ResponseCode] {
                &[$(Self::$variant,)+]
            }

            /// Look up a raw wire value.
            pub fn from_raw(raw: i32) -> Option<Self> {
                match raw {
                    $($raw => Some(Self::$variant),)+
                    _ => None,
                }
            }

            /// The schema's name for this code.
            pub fn name(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }
    };
}

response_codes! {
    /// The request passed precheck.
    Ok = 0 => "OK",
    InvalidTransaction = 1 => "INVALID_TRANSACTION",
    PayerAccountNotFound = 2 => "PAYER_ACCOUNT_NOT_FOUND",
    InvalidNodeAccount = 3 => "INVALID_NODE_ACCOUNT",
    TransactionExpired = 4 => "TRANSACTION_EXPIRED",
    InvalidTransactionStart = 5 => "INVALID_TRANSACTION_START",
    InvalidTransactionDuration = 6 => "INVALID_TRANSACTION_DURATION",
    InvalidSignature = 7 => "INVALID_SIGNATURE",
    MemoTooLong = 8 => "MEMO_TOO_LONG",
    InsufficientTxFee = 9 => "INSUFFICIENT_TX_FEE",
    InsufficientPayerBalance = 10 => "INSUFFICIENT_PAYER_BALANCE",
    DuplicateTransaction = 11 => "DUPLICATE_TRANSACTION",
    /// The node is too busy to accept the request right now.
    Busy = 12 => "BUSY",
    NotSupported = 13 => "NOT_SUPPORTED",
    InvalidFileId = 14 => "INVALID_FILE_ID",
    InvalidAccountId = 15 => "INVALID_ACCOUNT_ID",
    InvalidContractId = 16 => "INVALID_CONTRACT_ID",
    InvalidTransactionId = 17 => "INVALID_TRANSACTION_ID",
    ReceiptNotFound = 18 => "RECEIPT_NOT_FOUND",
    RecordNotFound = 19 => "RECORD_NOT_FOUND",
    InvalidSolidityId = 20 => "INVALID_SOLIDITY_ID",
    Unknown = 21 => "UNKNOWN",
    /// Consensus-side success; treated like `OK` when seen at precheck.
    Success = 22 => "SUCCESS",
    FailInvalid = 23 => "FAIL_INVALID",
    FailFee = 24 => "FAIL_FEE",
    FailBalance = 25 => "FAIL_BALANCE",
    KeyRequired = 26 => "KEY_REQUIRED",
    BadEncoding = 27 => "BAD_ENCODING",
    InsufficientAccountBalance = 28 => "INSUFFICIENT_ACCOUNT_BALANCE",
    InvalidSolidityAddress = 29 => "INVALID_SOLIDITY_ADDRESS",
    InsufficientGas = 30 => "INSUFFICIENT_GAS",
    ContractSizeLimitExceeded = 31 => "CONTRACT_SIZE_LIMIT_EXCEEDED",
    LocalCallModificationException = 32 => "LOCAL_CALL_MODIFICATION_EXCEPTION",
    ContractRevertExecuted = 33 => "CONTRACT_REVERT_EXECUTED",
    ContractExecutionException = 34 => "CONTRACT_EXECUTION_EXCEPTION",
    InvalidReceivingNodeAccount = 35 => "INVALID_RECEIVING_NODE_ACCOUNT",
    MissingQueryHeader = 36 => "MISSING_QUERY_HEADER",
    AccountUpdateFailed = 37 => "ACCOUNT_UPDATE_FAILED",
    InvalidKeyEncoding = 38 => "INVALID_KEY_ENCODING",
    NullSolidityAddress = 39 => "NULL_SOLIDITY_ADDRESS",
    ContractUpdateFailed = 40 => "CONTRACT_UPDATE_FAILED",
    InvalidQueryHeader = 41 => "INVALID_QUERY_HEADER",
    InvalidFeeSubmitted = 42 => "INVALID_FEE_SUBMITTED",
    InvalidPayerSignature = 43 => "INVALID_PAYER_SIGNATURE",
    KeyNotProvided = 44 => "KEY_NOT_PROVIDED",
    InvalidExpirationTime = 45 => "INVALID_EXPIRATION_TIME",
    NoWaclKey = 46 => "NO_WACL_KEY",
    FileContentEmpty = 47 => "FILE_CONTENT_EMPTY",
    InvalidAccountAmounts = 48 => "INVALID_ACCOUNT_AMOUNTS",
    EmptyTransactionBody = 49 => "EMPTY_TRANSACTION_BODY",
    InvalidTransactionBody = 50 => "INVALID_TRANSACTION_BODY",
    InvalidSignatureTypeMismatchingKey = 51 => "INVALID_SIGNATURE_TYPE_MISMATCHING_KEY",
    InvalidSignatureCountMismatchingKey = 52 => "INVALID_SIGNATURE_COUNT_MISMATCHING_KEY",
    EmptyClaimBody = 53 => "EMPTY_CLAIM_BODY",
    EmptyClaimHash = 54 => "EMPTY_CLAIM_HASH",
    EmptyClaimKeys = 55 => "EMPTY_CLAIM_KEYS",
    InvalidClaimHashSize = 56 => "INVALID_CLAIM_HASH_SIZE",
    EmptyQueryBody = 57 => "EMPTY_QUERY_BODY",
    EmptyClaimQuery = 58 => "EMPTY_CLAIM_QUERY",
    ClaimNotFound = 59 => "CLAIM_NOT_FOUND",
    AccountIdDoesNotExist = 60 => "ACCOUNT_ID_DOES_NOT_EXIST",
    ClaimAlreadyExists = 61 => "CLAIM_ALREADY_EXISTS",
    InvalidFileWacl = 62 => "INVALID_FILE_WACL",
    SerializationFailed = 63 => "SERIALIZATION_FAILED",
    TransactionOversize = 64 => "TRANSACTION_OVERSIZE",
    TransactionTooManyLayers = 65 => "TRANSACTION_TOO_MANY_LAYERS",
    ContractDeleted = 66 => "CONTRACT_DELETED",
    /// The node's platform is not yet active.
    PlatformNotActive = 67 => "PLATFORM_NOT_ACTIVE",
    KeyPrefixMismatch = 68 => "KEY_PREFIX_MISMATCH",
    /// The node could not hand the transaction to its platform.
    PlatformTransactionNotCreated = 69 => "PLATFORM_TRANSACTION_NOT_CREATED",
}

impl ResponseCode {
    /// The raw wire value.
    pub fn as_raw(&self) -> i32 {
        *self as i32
    }

    /// Policy class for this code.
    pub fn policy(&self) -> PolicyClass {
        match self {
            Self::Ok | Self::Success => PolicyClass::Proceed,
            Self::Busy | Self::PlatformNotActive | Self::PlatformTransactionNotCreated => {
                PolicyClass::RetryAfterDelay
            }
            _ => PolicyClass::Fail,
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw precheck value as received, either known or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecheckCode {
    /// A code the schema defines.
    Known(ResponseCode),
    /// A value outside the schema, e.g. from a newer node.
    Unrecognized(i32),
}

impl PrecheckCode {
    pub fn from_raw(raw: i32) -> Self {
        ResponseCode::from_raw(raw).map_or(Self::Unrecognized(raw), Self::Known)
    }

    pub fn as_raw(&self) -> i32 {
        match self {
            Self::Known(code) => code.as_raw(),
            Self::Unrecognized(raw) => *raw,
        }
    }

    /// Policy class; unrecognized values fail closed.
    pub fn policy(&self) -> PolicyClass {
        match self {
            Self::Known(code) => code.policy(),
            Self::Unrecognized(_) => PolicyClass::Fail,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    pub fn is_retryable(&self) -> bool {
        self.policy() == PolicyClass::RetryAfterDelay
    }
}

impl From<ResponseCode> for PrecheckCode {
    fn from(code: ResponseCode) -> Self {
        Self::Known(code)
    }
}

impl fmt::Display for PrecheckCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(code) => write!(f, "{} ({})", code.name(), code.as_raw()),
            Self::Unrecognized(raw) => write!(f, "UNRECOGNIZED ({raw})"),
        }
    }
}

/// Classify a raw precheck value.
pub fn classify(raw: i32) -> PolicyClass {
    PrecheckCode::from_raw(raw).policy()
}

/// True if `raw` should be retried after a delay.
pub fn is_retryable(raw: i32) -> bool {
    classify(raw) == PolicyClass::RetryAfterDelay
}
