use lightgate_codec::{
    decode_block, decode_precommit_signed, encode_block, encode_precommit_signed,
    encode_precommit_unsigned, PRECOMMIT_MESSAGE_SIZE,
};
use lightgate_types::{Block, Hash32, MessageHeader, Precommit, PrecommitBody, SystemTime};

fn assert_vector(name: &str, expected_hex: &str, actual: &[u8]) {
    assert_eq!(
        hex::encode(actual),
        expected_hex,
        "golden vector mismatch for {name} (encoding drift?)"
    );
}

fn sample_header() -> Block {
    let prev_hash: Hash32 = [0xAAu8; 32];
    let tx_hash: Hash32 = [0xBBu8; 32];
    let state_hash: Hash32 = [0xCCu8; 32];

    Block {
        height: 0x0102_0304_0506_0708,
        propose_round: 42,
        prev_hash,
        tx_hash,
        state_hash,
    }
}

fn sample_precommit() -> Precommit {
    Precommit {
        header: MessageHeader::precommit(0x11),
        body: PrecommitBody {
            validator: 2,
            height: 123,
            round: 3,
            propose_hash: [0xDDu8; 32],
            block_hash: [0xEEu8; 32],
            time: SystemTime {
                secs: 1_500_000_000,
                nanos: 7,
            },
        },
        signature: [0x22u8; 64],
    }
}

#[test]
fn golden_vector_block_header() {
    let header = sample_header();
    let bytes = encode_block(&header).expect("encode header");

    let expected = [
        "0807060504030201".to_string(),
        "2a000000".to_string(),
        "aa".repeat(32),
        "bb".repeat(32),
        "cc".repeat(32),
    ]
    .concat();
    assert_eq!(bytes.len(), 108);
    assert_vector("block header", &expected, &bytes);

    let decoded = decode_block(&bytes).expect("decode header");
    assert_eq!(decoded, header);
}

#[test]
fn golden_vector_precommit_message() {
    let p = sample_precommit();

    let unsigned = encode_precommit_unsigned(&p.header, &p.body).expect("encode unsigned");
    let signed = encode_precommit_signed(&p).expect("encode signed");

    // 1_500_000_000 = 0x5968_2F00
    let expected_unsigned = [
        // header: network, version, message id, service id, payload length (170)
        "11".to_string(),
        "00".to_string(),
        "0400".to_string(),
        "0000".to_string(),
        "aa000000".to_string(),
        // body: validator, reserved, height, round
        "02000000".to_string(),
        "00000000".to_string(),
        "7b00000000000000".to_string(),
        "03000000".to_string(),
        "dd".repeat(32),
        "ee".repeat(32),
        // time
        "002f685900000000".to_string(),
        "07000000".to_string(),
    ]
    .concat();

    assert_eq!(unsigned.len(), 106);
    assert_eq!(signed.len(), PRECOMMIT_MESSAGE_SIZE);
    assert_vector("precommit unsigned", &expected_unsigned, &unsigned);
    assert_vector(
        "precommit signed",
        &format!("{expected_unsigned}{}", "22".repeat(64)),
        &signed,
    );

    let decoded = decode_precommit_signed(&signed).expect("decode signed");
    assert_eq!(decoded, p);
}
