//! Structural validation of raw JSON input.
//!
//! Turns `{block, precommits}`, the validator list and the network id into
//! typed values, or rejects them before any hashing or signature work.
//! Unsigned 64-bit fields accept a JSON number or a decimal string. Unknown
//! keys are ignored.

use lightgate_types::hex::decode_fixed;
use lightgate_types::{
    Block, BlockProof, Hash32, MessageHeader, Precommit, PrecommitBody, SignatureBytes,
    SystemTime, HASH_SIZE, SIGNATURE_SIZE,
};
use serde_json::{Map, Value};

use crate::config::VerifierConfig;
use crate::error::{Result, VerifyError};
use crate::validators::ValidatorSet;

type Object = Map<String, Value>;

pub fn parse_network_id(network_id: i64) -> Result<u8> {
    u8::try_from(network_id).map_err(|_| VerifyError::NetworkIdOutOfRange(network_id))
}

/// The validator list must be a JSON array of 32-byte hex strings.
pub fn parse_validators(value: &Value) -> Result<ValidatorSet> {
    let keys = array(value, "validators")?
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.as_str()
                .ok_or_else(|| invalid(&format!("validators[{i}]"), "hex string"))
        })
        .collect::<Result<Vec<_>>>()?;
    ValidatorSet::from_hex(keys.as_slice())
}

/// Parse `{block, precommits}`. Framing keys missing from a precommit take the
/// values `config` expects on `network_id`.
pub fn parse_proof(data: &Value, network_id: u8, config: &VerifierConfig) -> Result<BlockProof> {
    let data = object(data, "data")?;
    let block = parse_block(field(data, "block", "data")?, "block")?;

    let default_header = config.precommit_header(network_id);
    let precommits = array(field(data, "precommits", "data")?, "precommits")?
        .iter()
        .enumerate()
        .map(|(i, v)| parse_precommit(v, &format!("precommits[{i}]"), default_header))
        .collect::<Result<Vec<_>>>()?;

    Ok(BlockProof { block, precommits })
}

pub fn parse_block(value: &Value, path: &str) -> Result<Block> {
    let obj = object(value, path)?;
    Ok(Block {
        height: u64_at(obj, "height", path)?,
        propose_round: u32_at(obj, "propose_round", path)?,
        prev_hash: hash_at(obj, "prev_hash", path)?,
        tx_hash: hash_at(obj, "tx_hash", path)?,
        state_hash: hash_at(obj, "state_hash", path)?,
    })
}

fn parse_precommit(value: &Value, path: &str, default_header: MessageHeader) -> Result<Precommit> {
    let obj = object(value, path)?;

    let body_path = format!("{path}.body");
    let body = object(field(obj, "body", path)?, &body_path)?;
    let time_path = format!("{body_path}.time");
    let time = object(field(body, "time", &body_path)?, &time_path)?;

    let body = PrecommitBody {
        validator: u32_at(body, "validator", &body_path)?,
        height: u64_at(body, "height", &body_path)?,
        round: u32_at(body, "round", &body_path)?,
        propose_hash: hash_at(body, "propose_hash", &body_path)?,
        block_hash: hash_at(body, "block_hash", &body_path)?,
        time: SystemTime {
            secs: u64_at(time, "secs", &time_path)?,
            nanos: u32_at(time, "nanos", &time_path)?,
        },
    };

    let sig_path = format!("{path}.signature");
    let signature: SignatureBytes = {
        let s = field(obj, "signature", path)?
            .as_str()
            .ok_or_else(|| invalid(&sig_path, "hex string"))?;
        decode_fixed::<SIGNATURE_SIZE>(s).map_err(|source| VerifyError::InvalidHex {
            path: sig_path,
            source,
        })?
    };

    let header = MessageHeader {
        network_id: opt_u8_at(obj, "network_id", path)?.unwrap_or(default_header.network_id),
        protocol_version: opt_u8_at(obj, "protocol_version", path)?
            .unwrap_or(default_header.protocol_version),
        message_id: opt_u16_at(obj, "message_id", path)?.unwrap_or(default_header.message_id),
        service_id: opt_u16_at(obj, "service_id", path)?.unwrap_or(default_header.service_id),
    };

    Ok(Precommit {
        header,
        body,
        signature,
    })
}

fn invalid(path: &str, expected: &'static str) -> VerifyError {
    VerifyError::InvalidField {
        path: path.to_string(),
        expected,
    }
}

fn out_of_range(path: &str, kind: &'static str) -> VerifyError {
    VerifyError::OutOfRange {
        path: path.to_string(),
        kind,
    }
}

fn object<'a>(value: &'a Value, path: &str) -> Result<&'a Object> {
    value.as_object().ok_or_else(|| invalid(path, "object"))
}

fn array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| invalid(path, "array"))
}

fn field<'a>(obj: &'a Object, key: &str, path: &str) -> Result<&'a Value> {
    obj.get(key)
        .ok_or_else(|| invalid(&format!("{path}.{key}"), "field to be present"))
}

/// Any non-negative integer up to u64::MAX, as a JSON number or decimal string.
fn unsigned(value: &Value, path: &str) -> Result<u64> {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                Ok(v)
            } else if n.is_i64() {
                Err(out_of_range(path, "unsigned integer"))
            } else {
                Err(invalid(path, "integer"))
            }
        }
        Value::String(s) if is_digits(s) => {
            s.parse::<u64>().map_err(|_| out_of_range(path, "u64"))
        }
        Value::String(s) if s.strip_prefix('-').is_some_and(is_digits) => {
            Err(out_of_range(path, "unsigned integer"))
        }
        _ => Err(invalid(path, "unsigned integer")),
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn narrow<T: TryFrom<u64>>(value: &Value, path: &str, kind: &'static str) -> Result<T> {
    T::try_from(unsigned(value, path)?).map_err(|_| out_of_range(path, kind))
}

fn u64_at(obj: &Object, key: &str, path: &str) -> Result<u64> {
    unsigned(field(obj, key, path)?, &format!("{path}.{key}"))
}

fn u32_at(obj: &Object, key: &str, path: &str) -> Result<u32> {
    narrow(field(obj, key, path)?, &format!("{path}.{key}"), "u32")
}

fn opt_u8_at(obj: &Object, key: &str, path: &str) -> Result<Option<u8>> {
    obj.get(key)
        .map(|v| narrow(v, &format!("{path}.{key}"), "u8"))
        .transpose()
}

fn opt_u16_at(obj: &Object, key: &str, path: &str) -> Result<Option<u16>> {
    obj.get(key)
        .map(|v| narrow(v, &format!("{path}.{key}"), "u16"))
        .transpose()
}

fn hash_at(obj: &Object, key: &str, path: &str) -> Result<Hash32> {
    let value = field(obj, key, path)?;
    let path = format!("{path}.{key}");
    let s = value.as_str().ok_or_else(|| invalid(&path, "hex string"))?;
    decode_fixed::<HASH_SIZE>(s).map_err(|source| VerifyError::InvalidHex { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block_json() -> Value {
        json!({
            "height": "18446744073709551615",
            "propose_round": 3,
            "prev_hash": "aa".repeat(32),
            "tx_hash": "bb".repeat(32),
            "state_hash": "cc".repeat(32),
        })
    }

    fn precommit_json() -> Value {
        json!({
            "body": {
                "validator": 1,
                "height": 5,
                "round": 2,
                "propose_hash": "01".repeat(32),
                "block_hash": "02".repeat(32),
                "time": { "secs": "1500000000", "nanos": 9 },
            },
            "signature": "03".repeat(64),
        })
    }

    #[test]
    fn network_id_range() {
        assert_eq!(parse_network_id(0), Ok(0));
        assert_eq!(parse_network_id(255), Ok(255));
        assert_eq!(parse_network_id(256), Err(VerifyError::NetworkIdOutOfRange(256)));
        assert_eq!(parse_network_id(-1), Err(VerifyError::NetworkIdOutOfRange(-1)));
    }

    #[test]
    fn block_accepts_u64_as_string() {
        let b = parse_block(&block_json(), "block").unwrap();
        assert_eq!(b.height, u64::MAX);
        assert_eq!(b.propose_round, 3);
        assert_eq!(b.state_hash, [0xcc; 32]);
    }

    #[test]
    fn u32_overflow_is_an_encoding_error() {
        let mut b = block_json();
        b["propose_round"] = json!(4_294_967_296u64);
        let err = parse_block(&b, "block").unwrap_err();
        assert_eq!(
            err,
            VerifyError::OutOfRange {
                path: "block.propose_round".into(),
                kind: "u32"
            }
        );
    }

    #[test]
    fn negative_and_fractional_numbers() {
        let mut b = block_json();
        b["height"] = json!(-1);
        assert!(matches!(
            parse_block(&b, "block"),
            Err(VerifyError::OutOfRange { .. })
        ));

        b["height"] = json!(1.5);
        assert!(matches!(
            parse_block(&b, "block"),
            Err(VerifyError::InvalidField { .. })
        ));

        b["height"] = json!("12a");
        assert!(matches!(
            parse_block(&b, "block"),
            Err(VerifyError::InvalidField { .. })
        ));
    }

    #[test]
    fn precommit_framing_defaults_and_overrides() {
        let data = json!({ "block": block_json(), "precommits": [precommit_json()] });
        let cfg = VerifierConfig::default();

        let proof = parse_proof(&data, 7, &cfg).unwrap();
        let p = &proof.precommits[0];
        assert_eq!(p.header, MessageHeader::precommit(7));
        assert_eq!(p.body.time, SystemTime { secs: 1_500_000_000, nanos: 9 });
        assert_eq!(p.signature, [0x03; 64]);

        let mut explicit = precommit_json();
        explicit["network_id"] = json!(8);
        explicit["message_id"] = json!(5);
        let data = json!({ "block": block_json(), "precommits": [explicit] });
        let proof = parse_proof(&data, 7, &cfg).unwrap();
        assert_eq!(proof.precommits[0].header.network_id, 8);
        assert_eq!(proof.precommits[0].header.message_id, 5);
    }

    #[test]
    fn precommits_must_be_an_array() {
        let data = json!({ "block": block_json(), "precommits": { "0": precommit_json() } });
        let err = parse_proof(&data, 0, &VerifierConfig::default()).unwrap_err();
        assert_eq!(
            err,
            VerifyError::InvalidField {
                path: "precommits".into(),
                expected: "array"
            }
        );
    }

    #[test]
    fn short_signature_is_rejected() {
        let mut p = precommit_json();
        p["signature"] = json!("03".repeat(32));
        let data = json!({ "block": block_json(), "precommits": [p] });
        let err = parse_proof(&data, 0, &VerifierConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            VerifyError::InvalidHex { ref path, .. } if path == "precommits[0].signature"
        ));
    }

    #[test]
    fn validators_must_be_hex_strings() {
        assert!(parse_validators(&json!(["11".repeat(32), "22".repeat(32)])).is_ok());
        assert!(parse_validators(&json!({ "0": "11".repeat(32) })).is_err());
        assert!(parse_validators(&json!([42])).is_err());
        assert!(parse_validators(&json!(["xyz"])).is_err());
    }
}
