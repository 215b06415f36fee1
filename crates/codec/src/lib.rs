use lightgate_types::schema::{self, FieldKind, Schema};
use lightgate_types::{
    Block, Hash32, MessageHeader, Precommit, PrecommitBody, SignatureBytes, SystemTime,
    SIGNATURE_SIZE,
};
use thiserror::Error;

/// Full length of a signed precommit message: header, body, signature.
pub const PRECOMMIT_MESSAGE_SIZE: usize =
    schema::MESSAGE_HEADER.size + schema::PRECOMMIT_BODY.size + SIGNATURE_SIZE;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("trailing bytes after message")]
    TrailingBytes,
    #[error("length does not fit in u32")]
    LengthOverflow,
    #[error("{schema}: expected {expected} field values, got {actual}")]
    FieldCount {
        schema: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{schema}.{field}: value does not match declared kind")]
    KindMismatch {
        schema: &'static str,
        field: &'static str,
    },
    #[error("{schema}.{field}: slot {from}..{to} does not fit the declared layout")]
    BadSlot {
        schema: &'static str,
        field: &'static str,
        from: usize,
        to: usize,
    },
    #[error("reserved bytes are not zero")]
    NonZeroReserved,
    #[error("payload length field says {declared}, message is {actual} bytes")]
    PayloadLength { declared: u32, actual: usize },
}

/// A field value handed to [`encode_with_schema`], in schema declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Hash(&'a Hash32),
    Struct(Vec<FieldValue<'a>>),
}

/// Encode `values` into a zeroed buffer of `schema.size` bytes, each at its
/// declared offset. Byte order of the result is the schema's, never the
/// caller's.
pub fn encode_with_schema(
    schema: &Schema,
    values: &[FieldValue<'_>],
) -> Result<Vec<u8>, CodecError> {
    let mut out = vec![0u8; schema.size];
    write_fields(&mut out, schema, values)?;
    Ok(out)
}

fn write_fields(
    buf: &mut [u8],
    schema: &Schema,
    values: &[FieldValue<'_>],
) -> Result<(), CodecError> {
    if values.len() != schema.fields.len() {
        return Err(CodecError::FieldCount {
            schema: schema.name,
            expected: schema.fields.len(),
            actual: values.len(),
        });
    }

    for (field, value) in schema.fields.iter().zip(values) {
        let bad_slot = || CodecError::BadSlot {
            schema: schema.name,
            field: field.name,
            from: field.from,
            to: field.to,
        };
        let slot = buf.get_mut(field.from..field.to).ok_or_else(bad_slot)?;
        if slot.len() != field.kind.width() {
            return Err(bad_slot());
        }

        match (field.kind, value) {
            (FieldKind::U8, FieldValue::U8(v)) => slot[0] = *v,
            (FieldKind::U16, FieldValue::U16(v)) => slot.copy_from_slice(&v.to_le_bytes()),
            (FieldKind::U32, FieldValue::U32(v)) => slot.copy_from_slice(&v.to_le_bytes()),
            (FieldKind::U64, FieldValue::U64(v)) => slot.copy_from_slice(&v.to_le_bytes()),
            (FieldKind::Hash, FieldValue::Hash(h)) => slot.copy_from_slice(&h[..]),
            (FieldKind::Struct(inner), FieldValue::Struct(vals)) => {
                write_fields(slot, inner, vals)?
            }
            _ => {
                return Err(CodecError::KindMismatch {
                    schema: schema.name,
                    field: field.name,
                })
            }
        }
    }
    Ok(())
}

fn take<'a>(input: &mut &'a [u8], n: usize) -> Result<&'a [u8], CodecError> {
    if input.len() < n {
        return Err(CodecError::UnexpectedEof);
    }
    let (a, b) = input.split_at(n);
    *input = b;
    Ok(a)
}

fn read_u8(input: &mut &[u8]) -> Result<u8, CodecError> {
    Ok(take(input, 1)?[0])
}

fn read_u16_le(input: &mut &[u8]) -> Result<u16, CodecError> {
    let b = take(input, 2)?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

fn read_u32_le(input: &mut &[u8]) -> Result<u32, CodecError> {
    let b = take(input, 4)?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn read_u64_le(input: &mut &[u8]) -> Result<u64, CodecError> {
    let b = take(input, 8)?;
    Ok(u64::from_le_bytes([
        b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
    ]))
}

fn read_32(input: &mut &[u8]) -> Result<[u8; 32], CodecError> {
    let b = take(input, 32)?;
    let mut out = [0u8; 32];
    out.copy_from_slice(b);
    Ok(out)
}

fn read_64(input: &mut &[u8]) -> Result<[u8; 64], CodecError> {
    let b = take(input, 64)?;
    let mut out = [0u8; 64];
    out.copy_from_slice(b);
    Ok(out)
}

fn block_fields(b: &Block) -> Vec<FieldValue<'_>> {
    vec![
        FieldValue::U64(b.height),
        FieldValue::U32(b.propose_round),
        FieldValue::Hash(&b.prev_hash),
        FieldValue::Hash(&b.tx_hash),
        FieldValue::Hash(&b.state_hash),
    ]
}

fn system_time_fields(t: &SystemTime) -> Vec<FieldValue<'static>> {
    vec![FieldValue::U64(t.secs), FieldValue::U32(t.nanos)]
}

fn precommit_body_fields(p: &PrecommitBody) -> Vec<FieldValue<'_>> {
    vec![
        FieldValue::U32(p.validator),
        FieldValue::U64(p.height),
        FieldValue::U32(p.round),
        FieldValue::Hash(&p.propose_hash),
        FieldValue::Hash(&p.block_hash),
        FieldValue::Struct(system_time_fields(&p.time)),
    ]
}

/// Canonical 108-byte encoding of a block header. This is what gets hashed.
pub fn encode_block(b: &Block) -> Result<Vec<u8>, CodecError> {
    encode_with_schema(&schema::BLOCK, &block_fields(b))
}

pub fn encode_precommit_body(p: &PrecommitBody) -> Result<Vec<u8>, CodecError> {
    encode_with_schema(&schema::PRECOMMIT_BODY, &precommit_body_fields(p))
}

/// Message header for a message whose full signed length is `payload_length`.
pub fn encode_message_header(
    h: &MessageHeader,
    payload_length: usize,
) -> Result<Vec<u8>, CodecError> {
    let payload_length: u32 = payload_length
        .try_into()
        .map_err(|_| CodecError::LengthOverflow)?;
    encode_with_schema(
        &schema::MESSAGE_HEADER,
        &[
            FieldValue::U8(h.network_id),
            FieldValue::U8(h.protocol_version),
            FieldValue::U16(h.message_id),
            FieldValue::U16(h.service_id),
            FieldValue::U32(payload_length),
        ],
    )
}

/// Canonical encoding of a precommit without its signature: header ‖ body.
/// These are the bytes a validator signs.
pub fn encode_precommit_unsigned(
    h: &MessageHeader,
    p: &PrecommitBody,
) -> Result<Vec<u8>, CodecError> {
    let mut out = encode_message_header(h, PRECOMMIT_MESSAGE_SIZE)?;
    out.extend_from_slice(&encode_precommit_body(p)?);
    Ok(out)
}

/// Canonical encoding of a precommit including signature.
pub fn encode_precommit_signed(p: &Precommit) -> Result<Vec<u8>, CodecError> {
    let mut out = encode_precommit_unsigned(&p.header, &p.body)?;
    out.extend_from_slice(&p.signature);
    Ok(out)
}

pub fn decode_block(bytes: &[u8]) -> Result<Block, CodecError> {
    let mut input = bytes;
    let height = read_u64_le(&mut input)?;
    let propose_round = read_u32_le(&mut input)?;
    let prev_hash = read_32(&mut input)?;
    let tx_hash = read_32(&mut input)?;
    let state_hash = read_32(&mut input)?;

    if !input.is_empty() {
        return Err(CodecError::TrailingBytes);
    }

    Ok(Block {
        height,
        propose_round,
        prev_hash,
        tx_hash,
        state_hash,
    })
}

fn read_system_time(input: &mut &[u8]) -> Result<SystemTime, CodecError> {
    let secs = read_u64_le(input)?;
    let nanos = read_u32_le(input)?;
    Ok(SystemTime { secs, nanos })
}

pub fn decode_precommit_signed(bytes: &[u8]) -> Result<Precommit, CodecError> {
    let mut input = bytes;

    let network_id = read_u8(&mut input)?;
    let protocol_version = read_u8(&mut input)?;
    let message_id = read_u16_le(&mut input)?;
    let service_id = read_u16_le(&mut input)?;
    let payload_length = read_u32_le(&mut input)?;
    if payload_length as usize != bytes.len() {
        return Err(CodecError::PayloadLength {
            declared: payload_length,
            actual: bytes.len(),
        });
    }

    let validator = read_u32_le(&mut input)?;
    if take(&mut input, 4)? != [0u8; 4] {
        return Err(CodecError::NonZeroReserved);
    }
    let height = read_u64_le(&mut input)?;
    let round = read_u32_le(&mut input)?;
    let propose_hash = read_32(&mut input)?;
    let block_hash = read_32(&mut input)?;
    let time = read_system_time(&mut input)?;

    let signature: SignatureBytes = read_64(&mut input)?;

    if !input.is_empty() {
        return Err(CodecError::TrailingBytes);
    }

    Ok(Precommit {
        header: MessageHeader {
            network_id,
            protocol_version,
            message_id,
            service_id,
        },
        body: PrecommitBody {
            validator,
            height,
            round,
            propose_hash,
            block_hash,
            time,
        },
        signature,
    })
}
