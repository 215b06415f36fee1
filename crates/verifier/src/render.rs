//! JSON rendering in the same exchange format [`crate::input`] accepts.

use lightgate_types::hex::encode;
use lightgate_types::{Block, BlockProof, Precommit};
use serde_json::{json, Value};

use crate::validators::ValidatorSet;

pub fn block_to_json(b: &Block) -> Value {
    json!({
        "height": b.height.to_string(),
        "propose_round": b.propose_round,
        "prev_hash": encode(b.prev_hash),
        "tx_hash": encode(b.tx_hash),
        "state_hash": encode(b.state_hash),
    })
}

pub fn precommit_to_json(p: &Precommit) -> Value {
    json!({
        "network_id": p.header.network_id,
        "protocol_version": p.header.protocol_version,
        "message_id": p.header.message_id,
        "service_id": p.header.service_id,
        "body": {
            "validator": p.body.validator,
            "height": p.body.height.to_string(),
            "round": p.body.round,
            "propose_hash": encode(p.body.propose_hash),
            "block_hash": encode(p.body.block_hash),
            "time": {
                "secs": p.body.time.secs.to_string(),
                "nanos": p.body.time.nanos,
            },
        },
        "signature": encode(p.signature),
    })
}

/// `{block, precommits}`
pub fn proof_to_json(proof: &BlockProof) -> Value {
    json!({
        "block": block_to_json(&proof.block),
        "precommits": proof.precommits.iter().map(precommit_to_json).collect::<Vec<_>>(),
    })
}

pub fn validators_to_json(validators: &ValidatorSet) -> Value {
    Value::Array(validators.iter().map(|k| Value::String(encode(k))).collect())
}
