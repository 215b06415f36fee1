use lightgate_crypto::HashKind;
use lightgate_types::{MessageHeader, CONSENSUS_SERVICE_ID, PRECOMMIT_MESSAGE_ID, PROTOCOL_VERSION};
use serde::{Deserialize, Serialize};

/// Protocol constants the verifier checks precommits against.
///
/// Missing keys in a config file fall back to the defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
    pub protocol_version: u8,
    pub service_id: u16,
    pub precommit_message_id: u16,
    pub hash: HashKind,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            service_id: CONSENSUS_SERVICE_ID,
            precommit_message_id: PRECOMMIT_MESSAGE_ID,
            hash: HashKind::Sha256,
        }
    }
}

impl VerifierConfig {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Framing every precommit on `network_id` must carry.
    pub fn precommit_header(&self, network_id: u8) -> MessageHeader {
        MessageHeader {
            network_id,
            protocol_version: self.protocol_version,
            message_id: self.precommit_message_id,
            service_id: self.service_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_protocol_constants() {
        let cfg = VerifierConfig::default();
        assert_eq!(cfg.precommit_header(3), MessageHeader::precommit(3));
        assert_eq!(cfg.hash, HashKind::Sha256);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = VerifierConfig::from_json_str(r#"{"hash": "blake3"}"#).unwrap();
        assert_eq!(cfg.hash, HashKind::Blake3);
        assert_eq!(cfg.precommit_message_id, PRECOMMIT_MESSAGE_ID);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(VerifierConfig::from_json_str(r#"{"hsah": "blake3"}"#).is_err());
    }
}
