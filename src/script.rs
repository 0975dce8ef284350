//! Script programs: parsing, building, classification.
//!
//! A [`Script`] couples the parsed chunk sequence with the exact bytes it
//! came from. The byte image is load-bearing: signature hashing slices it
//! directly (the "connected script"), so it is retained verbatim rather
//! than re-synthesized from chunks. Canonical re-encoding happens only for
//! scripts assembled through [`ScriptBuilder`].

use crate::chunk::Chunk;
use crate::error::ScriptError;
use crate::num;
use crate::opcode::{decode_op_n, Opcode};

/// Maximum program length in bytes.
pub const MAX_SCRIPT_SIZE: usize = 10_000;

/// Maximum length of a pushed stack element.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;

/// Maximum counted opcodes per script (opcodes above OP_16 only).
pub const MAX_OPS_PER_SCRIPT: usize = 201;

/// Maximum public keys per OP_CHECKMULTISIG.
pub const MAX_PUBKEYS_PER_MULTISIG: usize = 20;

/// Maximum combined size of the main and alt stacks.
pub const MAX_STACK_SIZE: usize = 1000;

/// A parsed script program.
///
/// Immutable once constructed. Parsing never rejects unknown or disabled
/// opcode bytes (those fail at execution with their own error kinds), only
/// pushes that overrun the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    chunks: Vec<Chunk>,
    program: Vec<u8>,
}

impl Script {
    /// Parses raw program bytes, retaining them.
    ///
    /// Walks the bytes left to right, dispatching on each opcode byte:
    /// `0x00`–`0x4b` push that many following bytes (zero included),
    /// OP_PUSHDATA1/2/4 carry an explicit 1/2/4-byte little-endian length,
    /// and every other byte becomes an opcode chunk. Fails with
    /// [`ScriptError::MalformedScript`] when a push runs past the end.
    pub fn parse(bytes: &[u8]) -> Result<Script, ScriptError> {
        let (chunks, err) = parse_prefix(bytes);
        match err {
            Some(e) => Err(e),
            None => Ok(Script {
                chunks,
                program: bytes.to_vec(),
            }),
        }
    }

    /// Parses a hex-encoded program.
    pub fn parse_hex(hex_str: &str) -> Result<Script, ScriptError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| ScriptError::MalformedScript(format!("invalid hex: {e}")))?;
        Script::parse(&bytes)
    }

    /// The retained program bytes, exactly as provided to [`Script::parse`]
    /// (or the canonical serialization, for built scripts).
    pub fn bytes(&self) -> &[u8] {
        &self.program
    }

    /// Program length in bytes.
    pub fn len(&self) -> usize {
        self.program.len()
    }

    pub fn is_empty(&self) -> bool {
        self.program.is_empty()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// True when every chunk is a push: data, or one of the small-constant
    /// opcodes up to OP_16. Scripts spending a pay-to-script-hash output
    /// must satisfy this.
    pub fn is_push_only(&self) -> bool {
        self.chunks
            .iter()
            .all(|c| c.opcode().map_or(true, |op| op <= Opcode::OP_16 as u8))
    }

    /// Pay-to-pubkey: `<pubkey> OP_CHECKSIG`.
    pub fn is_pay_to_pubkey(&self) -> bool {
        self.chunks.len() == 2
            && self.chunks[0].push_data().map_or(false, |d| d.len() > 1)
            && self.chunks[1].opcode() == Some(Opcode::OP_CHECKSIG as u8)
    }

    /// Pay-to-pubkey-hash:
    /// `OP_DUP OP_HASH160 <20 bytes> OP_EQUALVERIFY OP_CHECKSIG`.
    pub fn is_pay_to_pubkey_hash(&self) -> bool {
        self.chunks.len() == 5
            && self.chunks[0].opcode() == Some(Opcode::OP_DUP as u8)
            && self.chunks[1].opcode() == Some(Opcode::OP_HASH160 as u8)
            && self.chunks[2].push_data().map_or(false, |d| d.len() == 20)
            && self.chunks[3].opcode() == Some(Opcode::OP_EQUALVERIFY as u8)
            && self.chunks[4].opcode() == Some(Opcode::OP_CHECKSIG as u8)
    }

    /// Pay-to-script-hash, recognized by the exact 23-byte wire template
    /// `OP_HASH160 0x14 <20 bytes> OP_EQUAL`. The byte-level form, not the
    /// parsed one, is what activates the redeem-script recursion.
    pub fn is_pay_to_script_hash(&self) -> bool {
        self.program.len() == 23
            && self.program[0] == Opcode::OP_HASH160 as u8
            && self.program[1] == 0x14
            && self.program[22] == Opcode::OP_EQUAL as u8
    }

    /// Bare multisig: `OP_m <key_1> .. <key_n> OP_n OP_CHECKMULTISIG`
    /// (or the VERIFY form), with 1 <= m <= n.
    pub fn is_multisig(&self) -> bool {
        let total = self.chunks.len();
        if total < 4 {
            return false;
        }
        match self.chunks[total - 1].opcode().and_then(Opcode::from_byte) {
            Some(Opcode::OP_CHECKMULTISIG | Opcode::OP_CHECKMULTISIGVERIFY) => {}
            _ => return false,
        }
        let key_count = match self.chunks[total - 2].opcode() {
            Some(op) => decode_op_n(op),
            None => return false,
        };
        if key_count < 1 || key_count != total - 3 {
            return false;
        }
        let sig_count = match self.chunks[0].opcode() {
            Some(op) => decode_op_n(op),
            None => return false,
        };
        if sig_count < 1 || sig_count > key_count {
            return false;
        }
        self.chunks[1..total - 2].iter().all(|c| !c.is_op())
    }

    /// The public key of a pay-to-pubkey script.
    pub fn pubkey(&self) -> Option<&[u8]> {
        if self.is_pay_to_pubkey() {
            self.chunks[0].push_data()
        } else {
            None
        }
    }

    /// The 20-byte hash committed to by a pay-to-pubkey-hash or
    /// pay-to-script-hash output.
    pub fn pubkey_hash(&self) -> Option<&[u8]> {
        if self.is_pay_to_pubkey_hash() {
            self.chunks[2].push_data()
        } else if self.is_pay_to_script_hash() {
            Some(&self.program[2..22])
        } else {
            None
        }
    }

    /// Counts signature operations. OP_CHECKSIG[VERIFY] is 1.
    /// OP_CHECKMULTISIG[VERIFY] is the value of the immediately preceding
    /// OP_1..OP_16 when `accurate` is set and such an opcode precedes it,
    /// otherwise the worst-case 20.
    pub fn sig_op_count(&self, accurate: bool) -> usize {
        count_sig_ops(&self.chunks, accurate)
    }

    /// Accurate signature-operation count of the redeem script carried by a
    /// pay-to-script-hash scriptSig.
    ///
    /// The redeem script is the final data push of `script_sig`. Returns 0
    /// when the scriptSig does not parse or does not end in a data push;
    /// unparseable redeem bytes are counted over their parseable prefix.
    pub fn p2sh_sig_op_count(script_sig: &[u8]) -> usize {
        let script = match Script::parse(script_sig) {
            Ok(script) => script,
            Err(_) => return 0,
        };
        let redeem = match script.chunks.last().and_then(|c| c.push_data()) {
            Some(redeem) => redeem,
            None => return 0,
        };
        let (chunks, _) = parse_prefix(redeem);
        count_sig_ops(&chunks, true)
    }
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, chunk) in self.chunks.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{chunk}")?;
        }
        Ok(())
    }
}

/// Parses as many whole chunks as the bytes allow.
///
/// On truncation the chunks consumed so far are still returned alongside
/// the error; strict callers reject, lenient ones (sig-op counting over
/// redeem bytes) keep the prefix.
fn parse_prefix(bytes: &[u8]) -> (Vec<Chunk>, Option<ScriptError>) {
    let mut chunks = Vec::new();
    let mut pos = 0;
    let len = bytes.len();

    while pos < len {
        let start = pos;
        let op = bytes[pos];
        pos += 1;

        let data_len = match op {
            // Direct push: the opcode byte is the length, zero included.
            0x00..=0x4b => Some(op as usize),
            0x4c => {
                if pos >= len {
                    return (chunks, Some(truncated("OP_PUSHDATA1 missing length byte")));
                }
                let n = bytes[pos] as usize;
                pos += 1;
                Some(n)
            }
            0x4d => {
                if pos + 2 > len {
                    return (chunks, Some(truncated("OP_PUSHDATA2 missing length bytes")));
                }
                let n = u16::from_le_bytes([bytes[pos], bytes[pos + 1]]) as usize;
                pos += 2;
                Some(n)
            }
            0x4e => {
                if pos + 4 > len {
                    return (chunks, Some(truncated("OP_PUSHDATA4 missing length bytes")));
                }
                let n = u32::from_le_bytes([
                    bytes[pos],
                    bytes[pos + 1],
                    bytes[pos + 2],
                    bytes[pos + 3],
                ]) as usize;
                pos += 4;
                Some(n)
            }
            _ => None,
        };

        match data_len {
            Some(n) => {
                if pos + n > len {
                    return (chunks, Some(truncated("push overruns end of program")));
                }
                chunks.push(Chunk::data(bytes[pos..pos + n].to_vec(), start));
                pos += n;
            }
            None => chunks.push(Chunk::op(op, start)),
        }
    }

    (chunks, None)
}

fn truncated(what: &str) -> ScriptError {
    ScriptError::MalformedScript(what.to_string())
}

fn count_sig_ops(chunks: &[Chunk], accurate: bool) -> usize {
    let mut count = 0;
    let mut last_op: Option<u8> = None;
    for chunk in chunks {
        if let Some(op) = chunk.opcode() {
            match Opcode::from_byte(op) {
                Some(Opcode::OP_CHECKSIG | Opcode::OP_CHECKSIGVERIFY) => count += 1,
                Some(Opcode::OP_CHECKMULTISIG | Opcode::OP_CHECKMULTISIGVERIFY) => {
                    let preceding = last_op.map_or(0, decode_op_n);
                    if accurate && preceding > 0 {
                        count += preceding;
                    } else {
                        count += MAX_PUBKEYS_PER_MULTISIG;
                    }
                }
                _ => {}
            }
            last_op = Some(op);
        }
    }
    count
}

/// Removes every occurrence of `pattern` from `script`, stepping by whole
/// script instructions so that push payloads are never scanned from the
/// middle.
///
/// At each instruction boundary the bytes from the cursor are compared
/// against `pattern`; a matching instruction is dropped from the output and
/// a non-matching one is copied through, payload and all. Used to strip
/// signature pushes out of the connected script before signature hashing.
pub fn find_and_delete(script: &[u8], pattern: &[u8]) -> Vec<u8> {
    let len = script.len();
    if pattern.is_empty() || pattern.len() > len {
        return script.to_vec();
    }

    let mut out = Vec::with_capacity(len);
    let mut cursor = 0;
    while cursor < len {
        let matched = script[cursor..].starts_with(pattern);
        let op = script[cursor];
        let remaining = len - cursor - 1;
        // Length of the payload this instruction announces, clamped so a
        // truncated tail cannot read out of bounds.
        let payload = match op {
            0x00..=0x4b => op as usize,
            0x4c => {
                if remaining < 1 {
                    0
                } else {
                    script[cursor + 1] as usize + 1
                }
            }
            0x4d => {
                if remaining < 2 {
                    remaining
                } else {
                    u16::from_le_bytes([script[cursor + 1], script[cursor + 2]]) as usize + 2
                }
            }
            0x4e => {
                if remaining < 4 {
                    remaining
                } else {
                    u32::from_le_bytes([
                        script[cursor + 1],
                        script[cursor + 2],
                        script[cursor + 3],
                        script[cursor + 4],
                    ]) as usize
                        + 4
                }
            }
            _ => 0,
        };
        let payload = payload.min(remaining);

        if !matched {
            out.extend_from_slice(&script[cursor..cursor + 1 + payload]);
        }
        cursor += 1 + payload;
    }
    out
}

/// Assembles a script chunk by chunk, serializing pushes canonically.
#[derive(Debug, Default)]
pub struct ScriptBuilder {
    chunks: Vec<Chunk>,
    program: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an opcode.
    pub fn op(mut self, op: Opcode) -> Self {
        let chunk = Chunk::op(op as u8, self.program.len());
        chunk.write_to(&mut self.program);
        self.chunks.push(chunk);
        self
    }

    /// Appends a data push using the shortest push opcode for its length.
    pub fn data(mut self, data: &[u8]) -> Self {
        let chunk = Chunk::data(data.to_vec(), self.program.len());
        chunk.write_to(&mut self.program);
        self.chunks.push(chunk);
        self
    }

    /// Appends an integer, preferring the one-byte constant opcodes where
    /// one exists (OP_1NEGATE, OP_1..OP_16, the empty push for zero).
    pub fn number(self, n: i64) -> Self {
        match n {
            0 => self.data(&[]),
            -1 => self.op(Opcode::OP_1NEGATE),
            1..=16 => {
                let chunk_op = Opcode::from_byte(Opcode::OP_1 as u8 + (n as u8 - 1));
                match chunk_op {
                    Some(op) => self.op(op),
                    // Unreachable for 1..=16; fall through to a push.
                    None => self.data(&num::encode(n)),
                }
            }
            _ => self.data(&num::encode(n)),
        }
    }

    pub fn build(self) -> Script {
        Script {
            chunks: self.chunks,
            program: self.program,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkKind;
    use hex_literal::hex;

    #[test]
    fn empty_program() {
        let script = Script::parse(&[]).unwrap();
        assert!(script.chunks().is_empty());
        assert!(script.is_empty());
    }

    #[test]
    fn single_opcode() {
        let script = Script::parse(&[0x76]).unwrap();
        assert_eq!(script.chunks(), &[Chunk::op(0x76, 0)]);
    }

    #[test]
    fn op_0_is_an_empty_push() {
        let script = Script::parse(&[0x00]).unwrap();
        assert_eq!(script.chunks(), &[Chunk::data(vec![], 0)]);
    }

    #[test]
    fn direct_push() {
        let script = Script::parse(&[0x03, 0xaa, 0xbb, 0xcc]).unwrap();
        assert_eq!(script.chunks(), &[Chunk::data(vec![0xaa, 0xbb, 0xcc], 0)]);
    }

    #[test]
    fn direct_push_truncated() {
        let err = Script::parse(&[0x03, 0xaa]).unwrap_err();
        assert!(matches!(err, ScriptError::MalformedScript(_)));
    }

    #[test]
    fn pushdata_forms() {
        let script = Script::parse(&[0x4c, 0x02, 0xde, 0xad]).unwrap();
        assert_eq!(script.chunks(), &[Chunk::data(vec![0xde, 0xad], 0)]);

        let script = Script::parse(&[0x4d, 0x03, 0x00, 0xaa, 0xbb, 0xcc]).unwrap();
        assert_eq!(script.chunks(), &[Chunk::data(vec![0xaa, 0xbb, 0xcc], 0)]);

        let script = Script::parse(&[0x4e, 0x01, 0x00, 0x00, 0x00, 0x7f]).unwrap();
        assert_eq!(script.chunks(), &[Chunk::data(vec![0x7f], 0)]);
    }

    #[test]
    fn pushdata_truncated_length_field() {
        for bytes in [
            vec![0x4c],
            vec![0x4d, 0x03],
            vec![0x4e, 0x01, 0x00],
        ] {
            let err = Script::parse(&bytes).unwrap_err();
            assert!(matches!(err, ScriptError::MalformedScript(_)));
        }
    }

    #[test]
    fn unknown_bytes_parse_as_opcodes() {
        // Parsing keeps undefined and reserved bytes; execution rejects them.
        let script = Script::parse(&[0x50, 0xba, 0xff]).unwrap();
        assert_eq!(script.chunks().len(), 3);
        assert!(script.chunks().iter().all(|c| c.is_op()));
    }

    #[test]
    fn oversized_push_parses() {
        // Element-size enforcement happens at execution, not here.
        let mut bytes = vec![0x4d, 0x0a, 0x02]; // 522-byte push
        bytes.extend_from_slice(&[0x55; 522]);
        let script = Script::parse(&bytes).unwrap();
        assert_eq!(script.chunks()[0].push_data().unwrap().len(), 522);
    }

    #[test]
    fn chunk_offsets_cover_program_contiguously() {
        let mut bytes = vec![0x76, 0xa9, 0x14];
        bytes.extend_from_slice(&[0xab; 20]);
        bytes.push(0x88);
        bytes.extend_from_slice(&[0x02, 0x01, 0x02]);
        bytes.push(0xac);
        let script = Script::parse(&bytes).unwrap();

        let starts: Vec<usize> = script.chunks().iter().map(|c| c.start()).collect();
        assert_eq!(starts, vec![0, 1, 2, 23, 24, 27]);

        // Re-encoding every chunk in wire order reproduces the program
        // (all pushes here are already canonical).
        let mut rebuilt = Vec::new();
        for chunk in script.chunks() {
            chunk.write_to(&mut rebuilt);
        }
        assert_eq!(rebuilt, bytes);

        // A non-canonical push still gets a correct offset; only the
        // re-encoding shrinks.
        let script = Script::parse(&[0x51, 0x4c, 0x02, 0x01, 0x02, 0xac]).unwrap();
        let starts: Vec<usize> = script.chunks().iter().map(|c| c.start()).collect();
        assert_eq!(starts, vec![0, 1, 5]);
    }

    #[test]
    fn parse_hex_roundtrip() {
        let script = Script::parse_hex("76a914").unwrap_err();
        assert!(matches!(script, ScriptError::MalformedScript(_)));

        let script = Script::parse_hex("515187").unwrap();
        assert_eq!(script.chunks().len(), 3);
        assert_eq!(format!("{script}"), "OP_1 OP_1 OP_EQUAL");
    }

    #[test]
    fn parse_hex_invalid() {
        let err = Script::parse_hex("zz").unwrap_err();
        assert!(matches!(err, ScriptError::MalformedScript(_)));
    }

    #[test]
    fn display_mixed() {
        let script = Script::parse(&[0x00, 0x02, 0xca, 0xfe, 0xac]).unwrap();
        assert_eq!(format!("{script}"), "<> <cafe> OP_CHECKSIG");
    }

    // Template recognizers.

    fn p2pkh_script(hash: &[u8; 20]) -> Script {
        ScriptBuilder::new()
            .op(Opcode::OP_DUP)
            .op(Opcode::OP_HASH160)
            .data(hash)
            .op(Opcode::OP_EQUALVERIFY)
            .op(Opcode::OP_CHECKSIG)
            .build()
    }

    #[test]
    fn recognizes_p2pkh() {
        let hash = [0x42; 20];
        let script = p2pkh_script(&hash);
        assert!(script.is_pay_to_pubkey_hash());
        assert!(!script.is_pay_to_pubkey());
        assert!(!script.is_pay_to_script_hash());
        assert_eq!(script.pubkey_hash().unwrap(), &hash);
        assert_eq!(script.bytes().len(), 25);
    }

    #[test]
    fn recognizes_p2pk() {
        let key = [0x02; 33];
        let script = ScriptBuilder::new()
            .data(&key)
            .op(Opcode::OP_CHECKSIG)
            .build();
        assert!(script.is_pay_to_pubkey());
        assert_eq!(script.pubkey().unwrap(), &key);
        assert!(script.pubkey_hash().is_none());
    }

    #[test]
    fn p2pk_requires_plausible_key_length() {
        let script = ScriptBuilder::new()
            .data(&[0x01])
            .op(Opcode::OP_CHECKSIG)
            .build();
        assert!(!script.is_pay_to_pubkey());
    }

    #[test]
    fn recognizes_p2sh_by_wire_template() {
        let mut bytes = vec![0xa9, 0x14];
        bytes.extend_from_slice(&[0x7f; 20]);
        bytes.push(0x87);
        let script = Script::parse(&bytes).unwrap();
        assert!(script.is_pay_to_script_hash());
        assert_eq!(script.pubkey_hash().unwrap(), &[0x7f; 20]);

        // Same chunks spelled with a non-canonical push are NOT P2SH:
        // the wire template governs.
        let mut loose = vec![0xa9, 0x4c, 0x14];
        loose.extend_from_slice(&[0x7f; 20]);
        loose.push(0x87);
        let script = Script::parse(&loose).unwrap();
        assert!(!script.is_pay_to_script_hash());
    }

    #[test]
    fn recognizes_multisig() {
        let script = ScriptBuilder::new()
            .op(Opcode::OP_2)
            .data(&[0x02; 33])
            .data(&[0x03; 33])
            .data(&[0x02; 33])
            .op(Opcode::OP_3)
            .op(Opcode::OP_CHECKMULTISIG)
            .build();
        assert!(script.is_multisig());
        assert!(!script.is_pay_to_pubkey_hash());
    }

    #[test]
    fn multisig_rejects_bad_shapes() {
        // m > n
        let script = ScriptBuilder::new()
            .op(Opcode::OP_3)
            .data(&[0x02; 33])
            .data(&[0x03; 33])
            .op(Opcode::OP_2)
            .op(Opcode::OP_CHECKMULTISIG)
            .build();
        assert!(!script.is_multisig());

        // key-count opcode disagrees with the number of pushes
        let script = ScriptBuilder::new()
            .op(Opcode::OP_1)
            .data(&[0x02; 33])
            .data(&[0x03; 33])
            .op(Opcode::OP_3)
            .op(Opcode::OP_CHECKMULTISIG)
            .build();
        assert!(!script.is_multisig());
    }

    #[test]
    fn push_only_classification() {
        let script = Script::parse(&hex!("0051600101")).unwrap();
        assert!(script.is_push_only());
        let script = Script::parse(&[0x76]).unwrap();
        assert!(!script.is_push_only());
    }

    // Sig-op counting.

    #[test]
    fn sig_op_count_basic() {
        let script = Script::parse(&[0xac, 0xad]).unwrap();
        assert_eq!(script.sig_op_count(false), 2);
        assert_eq!(script.sig_op_count(true), 2);
    }

    #[test]
    fn sig_op_count_multisig() {
        let script = ScriptBuilder::new()
            .op(Opcode::OP_1)
            .data(&[0x02; 33])
            .data(&[0x03; 33])
            .op(Opcode::OP_2)
            .op(Opcode::OP_CHECKMULTISIG)
            .build();
        assert_eq!(script.sig_op_count(true), 2);
        assert_eq!(script.sig_op_count(false), 20);

        // No OP_N immediately before: worst case even in accurate mode.
        let script = Script::parse(&[0xae]).unwrap();
        assert_eq!(script.sig_op_count(true), 20);
    }

    #[test]
    fn p2sh_sig_op_count_reads_last_push() {
        let redeem = ScriptBuilder::new()
            .op(Opcode::OP_2)
            .data(&[0x02; 33])
            .data(&[0x03; 33])
            .data(&[0x02; 33])
            .op(Opcode::OP_3)
            .op(Opcode::OP_CHECKMULTISIG)
            .build();
        let script_sig = ScriptBuilder::new()
            .data(&[])
            .data(&[0x30; 9])
            .data(redeem.bytes())
            .build();
        assert_eq!(Script::p2sh_sig_op_count(script_sig.bytes()), 3);
    }

    #[test]
    fn p2sh_sig_op_count_degenerate_inputs() {
        // Unparseable scriptSig.
        assert_eq!(Script::p2sh_sig_op_count(&[0x4c]), 0);
        // Ends in an opcode rather than a push.
        assert_eq!(Script::p2sh_sig_op_count(&[0x01, 0xaa, 0x76]), 0);
        // Empty.
        assert_eq!(Script::p2sh_sig_op_count(&[]), 0);
    }

    #[test]
    fn p2sh_sig_op_count_truncated_redeem() {
        // Redeem bytes end mid-push: counting covers the parseable prefix.
        let redeem = [0xac, 0xac, 0x4c]; // two CHECKSIGs then a truncated push
        let script_sig = ScriptBuilder::new().data(&redeem).build();
        assert_eq!(Script::p2sh_sig_op_count(script_sig.bytes()), 2);
    }

    // find_and_delete.

    #[test]
    fn find_and_delete_removes_matching_instruction() {
        // <aa> OP_DUP <aa> ; pattern = push of 0xaa
        let script = [0x01, 0xaa, 0x76, 0x01, 0xaa];
        let cleaned = find_and_delete(&script, &[0x01, 0xaa]);
        assert_eq!(cleaned, vec![0x76]);
    }

    #[test]
    fn find_and_delete_skips_payload_bytes() {
        // The payload of the first push spells the pattern, but stepping by
        // instruction must not see it.
        let script = [0x02, 0x01, 0xaa, 0x01, 0xaa];
        let cleaned = find_and_delete(&script, &[0x01, 0xaa]);
        assert_eq!(cleaned, vec![0x02, 0x01, 0xaa]);
    }

    #[test]
    fn find_and_delete_no_match() {
        let script = [0x76, 0xa9, 0x01, 0xcc];
        assert_eq!(find_and_delete(&script, &[0x01, 0xaa]), script.to_vec());
    }

    #[test]
    fn find_and_delete_empty_pattern() {
        let script = [0x76, 0xa9];
        assert_eq!(find_and_delete(&script, &[]), script.to_vec());
    }

    #[test]
    fn find_and_delete_pushdata1_pattern() {
        let mut pattern = vec![0x4c, 0x50];
        pattern.extend_from_slice(&[0x11; 0x50]);
        let mut script = vec![0x51];
        script.extend_from_slice(&pattern);
        script.push(0x52);
        assert_eq!(find_and_delete(&script, &pattern), vec![0x51, 0x52]);
    }

    // Builder.

    #[test]
    fn builder_number_selects_constant_opcodes() {
        let script = ScriptBuilder::new()
            .number(0)
            .number(-1)
            .number(1)
            .number(16)
            .number(17)
            .build();
        assert_eq!(script.bytes(), &[0x00, 0x4f, 0x51, 0x60, 0x01, 0x11]);
    }

    #[test]
    fn builder_output_reparses_identically() {
        let script = ScriptBuilder::new()
            .op(Opcode::OP_DUP)
            .data(&[0xab; 76])
            .op(Opcode::OP_CHECKSIG)
            .build();
        let reparsed = Script::parse(script.bytes()).unwrap();
        assert_eq!(reparsed.chunks(), script.chunks());
    }

    #[test]
    fn builder_zero_number_matches_parser_view() {
        let script = ScriptBuilder::new().number(0).build();
        let reparsed = Script::parse(script.bytes()).unwrap();
        assert_eq!(reparsed.chunks(), script.chunks());
        assert!(matches!(
            reparsed.chunks()[0].kind(),
            ChunkKind::Data(d) if d.is_empty()
        ));
    }
}
