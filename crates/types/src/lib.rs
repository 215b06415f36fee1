pub mod hex;
pub mod schema;

pub type Hash32 = [u8; HASH_SIZE];
pub type PublicKeyBytes = [u8; PUBLIC_KEY_SIZE];
pub type SignatureBytes = [u8; SIGNATURE_SIZE];

/// Message framing version understood by this client.
pub const PROTOCOL_VERSION: u8 = 0;
/// Service id of the consensus core.
pub const CONSENSUS_SERVICE_ID: u16 = 0;
/// Message id of a precommit within the consensus service.
pub const PRECOMMIT_MESSAGE_ID: u16 = 4;

pub const HASH_SIZE: usize = 32;
pub const PUBLIC_KEY_SIZE: usize = 32;
pub const SIGNATURE_SIZE: usize = 64;

/// Block header as committed to by precommits.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    pub height: u64,
    pub propose_round: u32,
    pub prev_hash: Hash32,
    pub tx_hash: Hash32,
    pub state_hash: Hash32,
}

/// Wall-clock time embedded in a precommit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SystemTime {
    pub secs: u64,
    pub nanos: u32,
}

/// Framing fields that precede every signed message.
///
/// `payload_length` is not stored; the codec derives it from the message size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageHeader {
    pub network_id: u8,
    pub protocol_version: u8,
    pub message_id: u16,
    pub service_id: u16,
}

impl MessageHeader {
    /// Header of a precommit on the given network with the default protocol constants.
    pub fn precommit(network_id: u8) -> Self {
        Self {
            network_id,
            protocol_version: PROTOCOL_VERSION,
            message_id: PRECOMMIT_MESSAGE_ID,
            service_id: CONSENSUS_SERVICE_ID,
        }
    }
}

/// Body of a precommit vote.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PrecommitBody {
    /// Index into the validator set of the signer.
    pub validator: u32,
    pub height: u64,
    pub round: u32,
    pub propose_hash: Hash32,
    pub block_hash: Hash32,
    pub time: SystemTime,
}

/// A signed precommit message.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Precommit {
    pub header: MessageHeader,
    pub body: PrecommitBody,
    pub signature: SignatureBytes,
}

/// A block together with the precommits that claim to finalize it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockProof {
    pub block: Block,
    pub precommits: Vec<Precommit>,
}
