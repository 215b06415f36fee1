//! Per-vote checks. Any failure rejects the whole candidate block; a bad vote
//! is never silently dropped.

use std::collections::BTreeSet;

use lightgate_crypto::{pubkey_from_bytes, verify_precommit, CryptoError};
use lightgate_types::{Block, Hash32, MessageHeader, Precommit};
use tracing::trace;

use crate::error::{Result, VerifyError};
use crate::validators::ValidatorSet;

/// Checks precommits one by one against a single candidate block and
/// collects the distinct validators that confirmed it.
pub struct PrecommitValidator<'a> {
    height: u64,
    block_hash: Hash32,
    expected_header: MessageHeader,
    validators: &'a ValidatorSet,
    round: Option<u32>,
    confirmed: BTreeSet<u32>,
}

impl<'a> PrecommitValidator<'a> {
    pub fn new(
        block: &Block,
        block_hash: Hash32,
        expected_header: MessageHeader,
        validators: &'a ValidatorSet,
    ) -> Self {
        Self {
            height: block.height,
            block_hash,
            expected_header,
            validators,
            round: None,
            confirmed: BTreeSet::new(),
        }
    }

    /// Check the precommit at `position` in the input.
    pub fn check(&mut self, position: usize, p: &Precommit) -> Result<()> {
        let index = p.body.validator;
        let key = *self
            .validators
            .get(index)
            .ok_or(VerifyError::UnknownValidator {
                position,
                index,
                total: self.validators.len(),
            })?;

        self.check_framing(position, &p.header)?;

        if p.body.height != self.height {
            return Err(VerifyError::HeightMismatch {
                position,
                expected: self.height,
                actual: p.body.height,
            });
        }
        if p.body.block_hash != self.block_hash {
            return Err(VerifyError::BlockHashMismatch { position });
        }

        match self.round {
            None => self.round = Some(p.body.round),
            Some(expected) if expected != p.body.round => {
                return Err(VerifyError::RoundMismatch {
                    position,
                    expected,
                    actual: p.body.round,
                })
            }
            Some(_) => {}
        }

        let pk = pubkey_from_bytes(&key).map_err(|_| VerifyError::InvalidPublicKey { index })?;
        let valid = verify_precommit(&pk, p).map_err(|e| match e {
            CryptoError::Codec(c) => VerifyError::Encoding(c),
            CryptoError::InvalidPublicKey => VerifyError::InvalidPublicKey { index },
        })?;
        if !valid {
            return Err(VerifyError::BadSignature {
                position,
                validator: index,
            });
        }

        let fresh = self.confirmed.insert(index);
        trace!(position, validator = index, fresh, "precommit accepted");
        Ok(())
    }

    fn check_framing(&self, position: usize, header: &MessageHeader) -> Result<()> {
        let expected = &self.expected_header;
        let field = if header.network_id != expected.network_id {
            "network_id"
        } else if header.protocol_version != expected.protocol_version {
            "protocol_version"
        } else if header.service_id != expected.service_id {
            "service_id"
        } else if header.message_id != expected.message_id {
            "message_id"
        } else {
            return Ok(());
        };
        Err(VerifyError::FramingMismatch { position, field })
    }

    /// Round fixed by the first precommit, if any was checked.
    pub fn round(&self) -> Option<u32> {
        self.round
    }

    pub fn confirmed(&self) -> &BTreeSet<u32> {
        &self.confirmed
    }

    pub fn into_confirmed(self) -> BTreeSet<u32> {
        self.confirmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ed25519_dalek::SigningKey;
    use lightgate_crypto::sign_precommit;
    use lightgate_types::{PrecommitBody, SystemTime};

    const NETWORK: u8 = 9;

    fn keys(n: u8) -> Vec<SigningKey> {
        (1..=n).map(|i| SigningKey::from_bytes(&[i; 32])).collect()
    }

    fn set(keys: &[SigningKey]) -> ValidatorSet {
        ValidatorSet::new(keys.iter().map(|k| k.verifying_key().to_bytes()).collect())
    }

    fn block() -> Block {
        Block {
            height: 7,
            propose_round: 0,
            prev_hash: [0xA0; 32],
            tx_hash: [0xB0; 32],
            state_hash: [0xC0; 32],
        }
    }

    const BLOCK_HASH: Hash32 = [0x42; 32];

    fn vote(sk: &SigningKey, validator: u32, round: u32) -> Precommit {
        let body = PrecommitBody {
            validator,
            height: 7,
            round,
            propose_hash: [0x01; 32],
            block_hash: BLOCK_HASH,
            time: SystemTime { secs: 100, nanos: 0 },
        };
        sign_precommit(sk, MessageHeader::precommit(NETWORK), body).unwrap()
    }

    fn validator<'a>(set: &'a ValidatorSet) -> PrecommitValidator<'a> {
        PrecommitValidator::new(&block(), BLOCK_HASH, MessageHeader::precommit(NETWORK), set)
    }

    #[test]
    fn accepts_and_collapses_duplicates() {
        let ks = keys(3);
        let vs = set(&ks);
        let mut v = validator(&vs);

        v.check(0, &vote(&ks[0], 0, 1)).unwrap();
        v.check(1, &vote(&ks[0], 0, 1)).unwrap();
        v.check(2, &vote(&ks[2], 2, 1)).unwrap();

        assert_eq!(v.round(), Some(1));
        assert_eq!(v.confirmed().iter().copied().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn unknown_index_is_rejected() {
        let ks = keys(2);
        let vs = set(&ks);
        let mut v = validator(&vs);

        let err = v.check(0, &vote(&ks[0], 2, 0)).unwrap_err();
        assert_eq!(
            err,
            VerifyError::UnknownValidator {
                position: 0,
                index: 2,
                total: 2
            }
        );
    }

    #[test]
    fn framing_fields_must_match() {
        let ks = keys(1);
        let vs = set(&ks);

        let mut p = vote(&ks[0], 0, 0);
        p.header.service_id = 1;
        let err = validator(&vs).check(0, &p).unwrap_err();
        assert_eq!(
            err,
            VerifyError::FramingMismatch {
                position: 0,
                field: "service_id"
            }
        );

        let mut p = vote(&ks[0], 0, 0);
        p.header.network_id = NETWORK + 1;
        let err = validator(&vs).check(0, &p).unwrap_err();
        assert!(matches!(err, VerifyError::FramingMismatch { field: "network_id", .. }));
    }

    #[test]
    fn later_round_mismatch_is_rejected() {
        let ks = keys(3);
        let vs = set(&ks);
        let mut v = validator(&vs);

        v.check(0, &vote(&ks[0], 0, 4)).unwrap();
        let err = v.check(1, &vote(&ks[1], 1, 5)).unwrap_err();
        assert_eq!(
            err,
            VerifyError::RoundMismatch {
                position: 1,
                expected: 4,
                actual: 5
            }
        );
    }

    #[test]
    fn signature_from_another_validator_is_rejected() {
        let ks = keys(2);
        let vs = set(&ks);

        // validator 1's slot, validator 0's key
        let p = vote(&ks[0], 1, 0);
        let err = validator(&vs).check(0, &p).unwrap_err();
        assert_eq!(
            err,
            VerifyError::BadSignature {
                position: 0,
                validator: 1
            }
        );
    }

    #[test]
    fn height_and_hash_must_match_block() {
        let ks = keys(1);
        let vs = set(&ks);

        let mut p = vote(&ks[0], 0, 0);
        p.body.height = 8;
        assert!(matches!(
            validator(&vs).check(0, &p),
            Err(VerifyError::HeightMismatch { expected: 7, actual: 8, .. })
        ));

        let mut p = vote(&ks[0], 0, 0);
        p.body.block_hash = [0x43; 32];
        assert_eq!(
            validator(&vs).check(0, &p),
            Err(VerifyError::BlockHashMismatch { position: 0 })
        );
    }
}
