use lightgate_codec::encode_block;
use lightgate_crypto::{hash_bytes, HashKind};
use lightgate_types::{Block, Hash32};

use crate::error::Result;

/// Recompute the canonical block hash locally. Precommits are checked against
/// this value, never against a hash supplied alongside the block.
pub fn recompute(block: &Block, kind: HashKind) -> Result<Hash32> {
    let bytes = encode_block(block)?;
    Ok(hash_bytes(kind, &bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> Block {
        Block {
            height: 10,
            propose_round: 1,
            prev_hash: [0x01; 32],
            tx_hash: [0x02; 32],
            state_hash: [0x03; 32],
        }
    }

    #[test]
    fn every_header_byte_affects_the_hash() {
        let base = block();
        let reference = recompute(&base, HashKind::Sha256).unwrap();

        let mut variants = Vec::new();
        for i in 0..64 {
            let mut b = base.clone();
            b.height ^= 1 << i;
            variants.push(b);
        }
        for i in 0..32 {
            let mut b = base.clone();
            b.propose_round ^= 1 << i;
            variants.push(b);
        }
        for i in 0..32 {
            let mut b = base.clone();
            b.prev_hash[i] ^= 0x80;
            variants.push(b);
            let mut b = base.clone();
            b.tx_hash[i] ^= 0x80;
            variants.push(b);
            let mut b = base.clone();
            b.state_hash[i] ^= 0x80;
            variants.push(b);
        }

        for v in variants {
            assert_ne!(recompute(&v, HashKind::Sha256).unwrap(), reference, "{v:?}");
        }
    }
}
