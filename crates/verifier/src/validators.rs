use lightgate_types::hex::decode_fixed;
use lightgate_types::{PublicKeyBytes, PUBLIC_KEY_SIZE};

use crate::error::{Result, VerifyError};

/// Ordered validator public keys. A validator is identified by its index.
///
/// Keys are only checked for length here; whether they decode to a curve
/// point is checked when a precommit claims to be signed by them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorSet {
    keys: Vec<PublicKeyBytes>,
}

impl ValidatorSet {
    pub fn new(keys: Vec<PublicKeyBytes>) -> Self {
        Self { keys }
    }

    /// Parse hex-encoded keys. Fails on the first entry that is not 32 bytes of hex.
    pub fn from_hex<S: AsRef<str>>(keys: &[S]) -> Result<Self> {
        let keys = keys
            .iter()
            .enumerate()
            .map(|(i, k)| {
                decode_fixed::<PUBLIC_KEY_SIZE>(k.as_ref()).map_err(|source| {
                    VerifyError::InvalidHex {
                        path: format!("validators[{i}]"),
                        source,
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { keys })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn get(&self, index: u32) -> Option<&PublicKeyBytes> {
        self.keys.get(usize::try_from(index).ok()?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PublicKeyBytes> {
        self.keys.iter()
    }
}
