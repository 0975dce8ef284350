//! The Bitcoin Script opcode table.
//!
//! Every byte value with defined protocol semantics appears here, including
//! the permanently disabled operations and the formally reserved ones: the
//! parser keeps whatever bytes it sees, and rejection happens at execution
//! time with the right error for each class. Bytes 0x01–0x4e never reach
//! this table — they are push instructions consumed by the parser.

/// A Bitcoin Script opcode with protocol-defined semantics.
///
/// The discriminant is the wire byte. Variant names follow the canonical
/// protocol spelling so that `Display` can render them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[allow(non_camel_case_types)]
#[repr(u8)]
pub enum Opcode {
    // Constants
    OP_0 = 0x00,
    OP_PUSHDATA1 = 0x4c,
    OP_PUSHDATA2 = 0x4d,
    OP_PUSHDATA4 = 0x4e,
    OP_1NEGATE = 0x4f,
    OP_RESERVED = 0x50,
    OP_1 = 0x51,
    OP_2 = 0x52,
    OP_3 = 0x53,
    OP_4 = 0x54,
    OP_5 = 0x55,
    OP_6 = 0x56,
    OP_7 = 0x57,
    OP_8 = 0x58,
    OP_9 = 0x59,
    OP_10 = 0x5a,
    OP_11 = 0x5b,
    OP_12 = 0x5c,
    OP_13 = 0x5d,
    OP_14 = 0x5e,
    OP_15 = 0x5f,
    OP_16 = 0x60,

    // Flow control
    OP_NOP = 0x61,
    OP_VER = 0x62,
    OP_IF = 0x63,
    OP_NOTIF = 0x64,
    OP_VERIF = 0x65,
    OP_VERNOTIF = 0x66,
    OP_ELSE = 0x67,
    OP_ENDIF = 0x68,
    OP_VERIFY = 0x69,
    OP_RETURN = 0x6a,

    // Stack manipulation
    OP_TOALTSTACK = 0x6b,
    OP_FROMALTSTACK = 0x6c,
    OP_2DROP = 0x6d,
    OP_2DUP = 0x6e,
    OP_3DUP = 0x6f,
    OP_2OVER = 0x70,
    OP_2ROT = 0x71,
    OP_2SWAP = 0x72,
    OP_IFDUP = 0x73,
    OP_DEPTH = 0x74,
    OP_DROP = 0x75,
    OP_DUP = 0x76,
    OP_NIP = 0x77,
    OP_OVER = 0x78,
    OP_PICK = 0x79,
    OP_ROLL = 0x7a,
    OP_ROT = 0x7b,
    OP_SWAP = 0x7c,
    OP_TUCK = 0x7d,

    // Splice (all but OP_SIZE disabled)
    OP_CAT = 0x7e,
    OP_SUBSTR = 0x7f,
    OP_LEFT = 0x80,
    OP_RIGHT = 0x81,
    OP_SIZE = 0x82,

    // Bitwise logic (all but the equality pair disabled)
    OP_INVERT = 0x83,
    OP_AND = 0x84,
    OP_OR = 0x85,
    OP_XOR = 0x86,
    OP_EQUAL = 0x87,
    OP_EQUALVERIFY = 0x88,
    OP_RESERVED1 = 0x89,
    OP_RESERVED2 = 0x8a,

    // Arithmetic
    OP_1ADD = 0x8b,
    OP_1SUB = 0x8c,
    OP_2MUL = 0x8d,
    OP_2DIV = 0x8e,
    OP_NEGATE = 0x8f,
    OP_ABS = 0x90,
    OP_NOT = 0x91,
    OP_0NOTEQUAL = 0x92,
    OP_ADD = 0x93,
    OP_SUB = 0x94,
    OP_MUL = 0x95,
    OP_DIV = 0x96,
    OP_MOD = 0x97,
    OP_LSHIFT = 0x98,
    OP_RSHIFT = 0x99,
    OP_BOOLAND = 0x9a,
    OP_BOOLOR = 0x9b,
    OP_NUMEQUAL = 0x9c,
    OP_NUMEQUALVERIFY = 0x9d,
    OP_NUMNOTEQUAL = 0x9e,
    OP_LESSTHAN = 0x9f,
    OP_GREATERTHAN = 0xa0,
    OP_LESSTHANOREQUAL = 0xa1,
    OP_GREATERTHANOREQUAL = 0xa2,
    OP_MIN = 0xa3,
    OP_MAX = 0xa4,
    OP_WITHIN = 0xa5,

    // Crypto
    OP_RIPEMD160 = 0xa6,
    OP_SHA1 = 0xa7,
    OP_SHA256 = 0xa8,
    OP_HASH160 = 0xa9,
    OP_HASH256 = 0xaa,
    OP_CODESEPARATOR = 0xab,
    OP_CHECKSIG = 0xac,
    OP_CHECKSIGVERIFY = 0xad,
    OP_CHECKMULTISIG = 0xae,
    OP_CHECKMULTISIGVERIFY = 0xaf,

    // Expansion
    OP_NOP1 = 0xb0,
    OP_NOP2 = 0xb1,
    OP_NOP3 = 0xb2,
    OP_NOP4 = 0xb3,
    OP_NOP5 = 0xb4,
    OP_NOP6 = 0xb5,
    OP_NOP7 = 0xb6,
    OP_NOP8 = 0xb7,
    OP_NOP9 = 0xb8,
    OP_NOP10 = 0xb9,
}

impl Opcode {
    /// Convert a byte to an `Opcode`, if the byte has defined semantics.
    ///
    /// Returns `None` for push instructions (`0x01`–`0x4b`, which the parser
    /// consumes before dispatch ever happens) and for bytes above OP_NOP10,
    /// which the interpreter rejects as reserved.
    pub fn from_byte(byte: u8) -> Option<Opcode> {
        use Opcode::*;
        let op = match byte {
            0x00 => OP_0,
            0x4c => OP_PUSHDATA1,
            0x4d => OP_PUSHDATA2,
            0x4e => OP_PUSHDATA4,
            0x4f => OP_1NEGATE,
            0x50 => OP_RESERVED,
            0x51 => OP_1,
            0x52 => OP_2,
            0x53 => OP_3,
            0x54 => OP_4,
            0x55 => OP_5,
            0x56 => OP_6,
            0x57 => OP_7,
            0x58 => OP_8,
            0x59 => OP_9,
            0x5a => OP_10,
            0x5b => OP_11,
            0x5c => OP_12,
            0x5d => OP_13,
            0x5e => OP_14,
            0x5f => OP_15,
            0x60 => OP_16,
            0x61 => OP_NOP,
            0x62 => OP_VER,
            0x63 => OP_IF,
            0x64 => OP_NOTIF,
            0x65 => OP_VERIF,
            0x66 => OP_VERNOTIF,
            0x67 => OP_ELSE,
            0x68 => OP_ENDIF,
            0x69 => OP_VERIFY,
            0x6a => OP_RETURN,
            0x6b => OP_TOALTSTACK,
            0x6c => OP_FROMALTSTACK,
            0x6d => OP_2DROP,
            0x6e => OP_2DUP,
            0x6f => OP_3DUP,
            0x70 => OP_2OVER,
            0x71 => OP_2ROT,
            0x72 => OP_2SWAP,
            0x73 => OP_IFDUP,
            0x74 => OP_DEPTH,
            0x75 => OP_DROP,
            0x76 => OP_DUP,
            0x77 => OP_NIP,
            0x78 => OP_OVER,
            0x79 => OP_PICK,
            0x7a => OP_ROLL,
            0x7b => OP_ROT,
            0x7c => OP_SWAP,
            0x7d => OP_TUCK,
            0x7e => OP_CAT,
            0x7f => OP_SUBSTR,
            0x80 => OP_LEFT,
            0x81 => OP_RIGHT,
            0x82 => OP_SIZE,
            0x83 => OP_INVERT,
            0x84 => OP_AND,
            0x85 => OP_OR,
            0x86 => OP_XOR,
            0x87 => OP_EQUAL,
            0x88 => OP_EQUALVERIFY,
            0x89 => OP_RESERVED1,
            0x8a => OP_RESERVED2,
            0x8b => OP_1ADD,
            0x8c => OP_1SUB,
            0x8d => OP_2MUL,
            0x8e => OP_2DIV,
            0x8f => OP_NEGATE,
            0x90 => OP_ABS,
            0x91 => OP_NOT,
            0x92 => OP_0NOTEQUAL,
            0x93 => OP_ADD,
            0x94 => OP_SUB,
            0x95 => OP_MUL,
            0x96 => OP_DIV,
            0x97 => OP_MOD,
            0x98 => OP_LSHIFT,
            0x99 => OP_RSHIFT,
            0x9a => OP_BOOLAND,
            0x9b => OP_BOOLOR,
            0x9c => OP_NUMEQUAL,
            0x9d => OP_NUMEQUALVERIFY,
            0x9e => OP_NUMNOTEQUAL,
            0x9f => OP_LESSTHAN,
            0xa0 => OP_GREATERTHAN,
            0xa1 => OP_LESSTHANOREQUAL,
            0xa2 => OP_GREATERTHANOREQUAL,
            0xa3 => OP_MIN,
            0xa4 => OP_MAX,
            0xa5 => OP_WITHIN,
            0xa6 => OP_RIPEMD160,
            0xa7 => OP_SHA1,
            0xa8 => OP_SHA256,
            0xa9 => OP_HASH160,
            0xaa => OP_HASH256,
            0xab => OP_CODESEPARATOR,
            0xac => OP_CHECKSIG,
            0xad => OP_CHECKSIGVERIFY,
            0xae => OP_CHECKMULTISIG,
            0xaf => OP_CHECKMULTISIGVERIFY,
            0xb0 => OP_NOP1,
            0xb1 => OP_NOP2,
            0xb2 => OP_NOP3,
            0xb3 => OP_NOP4,
            0xb4 => OP_NOP5,
            0xb5 => OP_NOP6,
            0xb6 => OP_NOP7,
            0xb7 => OP_NOP8,
            0xb8 => OP_NOP9,
            0xb9 => OP_NOP10,
            _ => return None,
        };
        Some(op)
    }

    /// The wire byte of this opcode.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// The small integer a constant opcode pushes: `Some(0)` for OP_0,
    /// `Some(-1)` for OP_1NEGATE, `Some(1..=16)` for OP_1..OP_16.
    pub fn small_int(self) -> Option<i64> {
        match self {
            Opcode::OP_0 => Some(0),
            Opcode::OP_1NEGATE => Some(-1),
            op if op >= Opcode::OP_1 && op <= Opcode::OP_16 => {
                Some(i64::from(op as u8 - Opcode::OP_1 as u8 + 1))
            }
            _ => None,
        }
    }
}

/// Decodes an OP_1..OP_16 byte to its integer value.
///
/// Callers must have checked the range; out-of-range bytes return 0.
pub(crate) fn decode_op_n(byte: u8) -> usize {
    if (Opcode::OP_1 as u8..=Opcode::OP_16 as u8).contains(&byte) {
        usize::from(byte - Opcode::OP_1 as u8 + 1)
    } else {
        0
    }
}

/// The permanently disabled opcodes. Their presence anywhere in an executed
/// program fails the script, taken branch or not.
pub fn is_disabled(byte: u8) -> bool {
    matches!(
        Opcode::from_byte(byte),
        Some(
            Opcode::OP_CAT
                | Opcode::OP_SUBSTR
                | Opcode::OP_LEFT
                | Opcode::OP_RIGHT
                | Opcode::OP_INVERT
                | Opcode::OP_AND
                | Opcode::OP_OR
                | Opcode::OP_XOR
                | Opcode::OP_2MUL
                | Opcode::OP_2DIV
                | Opcode::OP_MUL
                | Opcode::OP_DIV
                | Opcode::OP_MOD
                | Opcode::OP_LSHIFT
                | Opcode::OP_RSHIFT
        )
    )
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Variant names are the canonical protocol spellings.
        write!(f, "{self:?}")
    }
}
