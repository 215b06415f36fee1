//! Fixed-offset layouts of the canonically encoded structures.
//!
//! Every field occupies `from..to` inside a buffer of `size` bytes. Bytes not
//! covered by any field are zero. These tables are CONSENSUS-RELEVANT: the
//! byte layout is what validators hash and sign.

/// Primitive kind of a schema field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    U64,
    Hash,
    Struct(&'static Schema),
}

impl FieldKind {
    /// Encoded width in bytes.
    pub const fn width(&self) -> usize {
        match self {
            FieldKind::U8 => 1,
            FieldKind::U16 => 2,
            FieldKind::U32 => 4,
            FieldKind::U64 => 8,
            FieldKind::Hash => 32,
            FieldKind::Struct(schema) => schema.size,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub from: usize,
    pub to: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    pub size: usize,
    pub fields: &'static [Field],
}

impl Schema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

const fn field(name: &'static str, kind: FieldKind, from: usize, to: usize) -> Field {
    Field {
        name,
        kind,
        from,
        to,
    }
}

pub const BLOCK: Schema = Schema {
    name: "Block",
    size: 108,
    fields: &[
        field("height", FieldKind::U64, 0, 8),
        field("propose_round", FieldKind::U32, 8, 12),
        field("prev_hash", FieldKind::Hash, 12, 44),
        field("tx_hash", FieldKind::Hash, 44, 76),
        field("state_hash", FieldKind::Hash, 76, 108),
    ],
};

pub const SYSTEM_TIME: Schema = Schema {
    name: "SystemTime",
    size: 12,
    fields: &[
        field("secs", FieldKind::U64, 0, 8),
        field("nanos", FieldKind::U32, 8, 12),
    ],
};

/// Precommit body. Bytes 4..8 are reserved and always zero.
pub const PRECOMMIT_BODY: Schema = Schema {
    name: "Precommit",
    size: 96,
    fields: &[
        field("validator", FieldKind::U32, 0, 4),
        field("height", FieldKind::U64, 8, 16),
        field("round", FieldKind::U32, 16, 20),
        field("propose_hash", FieldKind::Hash, 20, 52),
        field("block_hash", FieldKind::Hash, 52, 84),
        field("time", FieldKind::Struct(&SYSTEM_TIME), 84, 96),
    ],
};

/// Header prepended to every signed message.
pub const MESSAGE_HEADER: Schema = Schema {
    name: "MessageHeader",
    size: 10,
    fields: &[
        field("network_id", FieldKind::U8, 0, 1),
        field("protocol_version", FieldKind::U8, 1, 2),
        field("message_id", FieldKind::U16, 2, 4),
        field("service_id", FieldKind::U16, 4, 6),
        field("payload_length", FieldKind::U32, 6, 10),
    ],
};
