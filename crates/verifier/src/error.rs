//! Rejection reasons. Every one of these collapses to `false` at the boolean
//! boundary; the variants exist for the typed API and for logging.

use lightgate_codec::CodecError;
use lightgate_types::hex::HexError;
use thiserror::Error;

/// Coarse category of a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputShape,
    Encoding,
    Reference,
    Consistency,
    Cryptographic,
    Quorum,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("{path}: expected {expected}")]
    InvalidField { path: String, expected: &'static str },

    #[error("{path}: {source}")]
    InvalidHex { path: String, source: HexError },

    #[error("network id {0} is outside 0..=255")]
    NetworkIdOutOfRange(i64),

    #[error("{path}: value does not fit in {kind}")]
    OutOfRange { path: String, kind: &'static str },

    #[error("canonical encoding failed: {0}")]
    Encoding(#[from] CodecError),

    #[error("precommit {position}: validator index {index} is not below {total}")]
    UnknownValidator {
        position: usize,
        index: u32,
        total: usize,
    },

    #[error("precommit {position}: {field} does not match the expected framing")]
    FramingMismatch {
        position: usize,
        field: &'static str,
    },

    #[error("precommit {position}: height {actual}, block is at {expected}")]
    HeightMismatch {
        position: usize,
        expected: u64,
        actual: u64,
    },

    #[error("precommit {position}: block hash does not match the recomputed hash")]
    BlockHashMismatch { position: usize },

    #[error("precommit {position}: round {actual}, earlier precommits are for round {expected}")]
    RoundMismatch {
        position: usize,
        expected: u32,
        actual: u32,
    },

    #[error("validator {index}: public key is not a valid ed25519 point")]
    InvalidPublicKey { index: u32 },

    #[error("precommit {position}: signature of validator {validator} does not verify")]
    BadSignature { position: usize, validator: u32 },

    #[error(
        "{confirmed} of {total} validators confirmed, at least {} required",
        crate::quorum::quorum_size(*.total)
    )]
    InsufficientQuorum { confirmed: usize, total: usize },
}

impl VerifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerifyError::InvalidField { .. }
            | VerifyError::InvalidHex { .. }
            | VerifyError::NetworkIdOutOfRange(_) => ErrorKind::InputShape,
            VerifyError::OutOfRange { .. } | VerifyError::Encoding(_) => ErrorKind::Encoding,
            VerifyError::UnknownValidator { .. } => ErrorKind::Reference,
            VerifyError::FramingMismatch { .. }
            | VerifyError::HeightMismatch { .. }
            | VerifyError::BlockHashMismatch { .. }
            | VerifyError::RoundMismatch { .. } => ErrorKind::Consistency,
            VerifyError::InvalidPublicKey { .. } | VerifyError::BadSignature { .. } => {
                ErrorKind::Cryptographic
            }
            VerifyError::InsufficientQuorum { .. } => ErrorKind::Quorum,
        }
    }
}

pub type Result<T> = std::result::Result<T, VerifyError>;
