use ed25519_dalek::Signer;
use ed25519_dalek::{Signature, SigningKey, VerifyingKey};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use lightgate_codec::{encode_block, encode_precommit_unsigned, CodecError};
use lightgate_types::{
    Block, Hash32, MessageHeader, Precommit, PrecommitBody, PublicKeyBytes, SignatureBytes,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("invalid public key")]
    InvalidPublicKey,
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Hash function used for block hashes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashKind {
    #[default]
    Sha256,
    Blake3,
}

/// Hash arbitrary bytes into a 32-byte digest.
pub fn hash_bytes(kind: HashKind, bytes: &[u8]) -> Hash32 {
    match kind {
        HashKind::Sha256 => Sha256::digest(bytes).into(),
        HashKind::Blake3 => *blake3::hash(bytes).as_bytes(),
    }
}

/// Block hash = hash(canonical 108-byte encoding of the header).
pub fn hash_block(kind: HashKind, block: &Block) -> Result<Hash32, CryptoError> {
    let bytes = encode_block(block)?;
    Ok(hash_bytes(kind, &bytes))
}

/// Fresh keypair from the OS RNG. Dev tooling only.
pub fn generate_keypair() -> (SigningKey, VerifyingKey) {
    let sk = SigningKey::generate(&mut OsRng);
    let pk = sk.verifying_key();
    (sk, pk)
}

/// Sign arbitrary bytes.
pub fn sign_bytes(sk: &SigningKey, msg: &[u8]) -> SignatureBytes {
    let sig: Signature = sk.sign(msg);
    sig.to_bytes()
}

/// Verify signature over bytes using the provided public key.
pub fn verify_bytes(pk: &VerifyingKey, msg: &[u8], sig: &SignatureBytes) -> bool {
    let sig = Signature::from_bytes(sig);
    pk.verify_strict(msg, &sig).is_ok()
}

/// Parse a VerifyingKey from raw 32-byte public key bytes.
pub fn pubkey_from_bytes(bytes: &PublicKeyBytes) -> Result<VerifyingKey, CryptoError> {
    VerifyingKey::from_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)
}

/// Sign a precommit over its canonical framed bytes (header ‖ body).
pub fn sign_precommit(
    sk: &SigningKey,
    header: MessageHeader,
    body: PrecommitBody,
) -> Result<Precommit, CryptoError> {
    let unsigned = encode_precommit_unsigned(&header, &body)?;
    let signature = sign_bytes(sk, &unsigned);
    Ok(Precommit {
        header,
        body,
        signature,
    })
}

/// Verify a precommit signature over its canonical framed bytes.
pub fn verify_precommit(pk: &VerifyingKey, p: &Precommit) -> Result<bool, CryptoError> {
    let unsigned = encode_precommit_unsigned(&p.header, &p.body)?;
    Ok(verify_bytes(pk, &unsigned, &p.signature))
}
