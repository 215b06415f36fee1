//! Light-client finality check: is a block finalized by more than two thirds
//! of a known validator set, according to the precommits supplied with it?
//!
//! The verifier is a pure function of its inputs. Pipeline:
//! structural validation, block hash recomputation, per-precommit checks,
//! then the quorum rule. The first failure rejects the block.

pub mod block_hash;
pub mod config;
pub mod error;
pub mod input;
pub mod precommit;
pub mod quorum;
pub mod render;
pub mod validators;

use std::collections::BTreeSet;

use lightgate_types::{BlockProof, Hash32};
use serde_json::Value;
use tracing::debug;

pub use config::VerifierConfig;
pub use error::{ErrorKind, VerifyError};
pub use precommit::PrecommitValidator;
pub use validators::ValidatorSet;

/// Outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified {
    pub block_hash: Hash32,
    /// Round all counted precommits agree on.
    pub round: u32,
    /// Distinct validator indices whose precommits verified.
    pub confirmed: BTreeSet<u32>,
    pub total: usize,
}

/// Verify a typed proof against `validators` on `network_id`.
pub fn verify_block_typed(
    proof: &BlockProof,
    validators: &ValidatorSet,
    network_id: u8,
    config: &VerifierConfig,
) -> error::Result<Verified> {
    let block_hash = block_hash::recompute(&proof.block, config.hash)?;

    let mut checker = PrecommitValidator::new(
        &proof.block,
        block_hash,
        config.precommit_header(network_id),
        validators,
    );
    for (position, p) in proof.precommits.iter().enumerate() {
        checker.check(position, p)?;
    }

    let total = validators.len();
    let confirmed = checker.confirmed().len();
    match checker.round() {
        // no round means no precommit was accepted, so `confirmed` is zero
        Some(round) if quorum::has_quorum(confirmed, total) => Ok(Verified {
            block_hash,
            round,
            confirmed: checker.into_confirmed(),
            total,
        }),
        _ => Err(VerifyError::InsufficientQuorum { confirmed, total }),
    }
}

/// Structural validation of raw JSON followed by [`verify_block_typed`].
pub fn try_verify_block(
    data: &Value,
    validators: &Value,
    network_id: i64,
    config: &VerifierConfig,
) -> error::Result<Verified> {
    let network_id = input::parse_network_id(network_id)?;
    let validators = input::parse_validators(validators)?;
    let proof = input::parse_proof(data, network_id, config)?;
    verify_block_typed(&proof, &validators, network_id, config)
}

/// `true` iff the block in `data = {block, precommits}` is finalized by the
/// validator set. Malformed input is rejected like a failed verification.
pub fn verify_block(data: &Value, validators: &Value, network_id: i64) -> bool {
    verify_block_with_config(data, validators, network_id, &VerifierConfig::default())
}

pub fn verify_block_with_config(
    data: &Value,
    validators: &Value,
    network_id: i64,
    config: &VerifierConfig,
) -> bool {
    match try_verify_block(data, validators, network_id, config) {
        Ok(v) => {
            debug!(
                confirmed = v.confirmed.len(),
                total = v.total,
                round = v.round,
                "block accepted"
            );
            true
        }
        Err(e) => {
            debug!(kind = ?e.kind(), error = %e, "block rejected");
            false
        }
    }
}
