//! The script interpreter.
//!
//! A single loop walks the parsed chunks, gating execution on the
//! conditional stack and dispatching each opcode inline. Failure is a typed
//! [`ScriptError`] and always the first one encountered; there is no
//! recovery. Signature checking is delegated through two narrow traits so
//! the engine itself stays free of transaction and curve arithmetic — a bad
//! signature is a false result, never a script error.

use std::collections::VecDeque;

use crate::chunk::{write_push, ChunkKind};
use crate::error::ScriptError;
use crate::hash;
use crate::num;
use crate::opcode::{is_disabled, Opcode};
use crate::script::{
    find_and_delete, Script, MAX_OPS_PER_SCRIPT, MAX_PUBKEYS_PER_MULTISIG,
    MAX_SCRIPT_ELEMENT_SIZE, MAX_STACK_SIZE,
};
use crate::stack::Stack;

/// Computes the 32-byte message hash a signature commits to.
///
/// `script_code` is the connected script (everything after the most recent
/// OP_CODESEPARATOR) with the signature push(es) already stripped out.
/// Implementations must behave as pure functions of their arguments; one
/// that rewrites a transaction does so on an internal copy. Returning
/// `None` makes the surrounding signature check false without failing the
/// script.
pub trait SighashProvider {
    fn sighash(&self, input_index: usize, script_code: &[u8], sighash_type: u8)
        -> Option<[u8; 32]>;
}

/// Verifies an ECDSA signature over secp256k1.
///
/// `signature_der` is the DER body with the trailing sighash byte already
/// removed. Implementations must not panic: undecodable signatures or keys
/// are simply `false`.
pub trait SignatureVerifier {
    fn verify(&self, sighash: &[u8; 32], signature_der: &[u8], pubkey: &[u8]) -> bool;
}

/// Provider for contexts with no transaction: every sighash is unavailable.
pub struct NoopSighash;

impl SighashProvider for NoopSighash {
    fn sighash(&self, _: usize, _: &[u8], _: u8) -> Option<[u8; 32]> {
        None
    }
}

/// Verifier that rejects everything.
pub struct NoopVerifier;

impl SignatureVerifier for NoopVerifier {
    fn verify(&self, _: &[u8; 32], _: &[u8], _: &[u8]) -> bool {
        false
    }
}

/// Real ECDSA verification via the `secp256k1` crate.
#[cfg(feature = "secp256k1")]
pub struct Secp256k1Verifier;

#[cfg(feature = "secp256k1")]
impl SignatureVerifier for Secp256k1Verifier {
    fn verify(&self, sighash: &[u8; 32], signature_der: &[u8], pubkey: &[u8]) -> bool {
        use secp256k1::ecdsa::Signature;
        use secp256k1::{Message, PublicKey, Secp256k1};

        let secp = Secp256k1::verification_only();
        let signature = match Signature::from_der(signature_der) {
            Ok(signature) => signature,
            Err(_) => return false,
        };
        let public_key = match PublicKey::from_slice(pubkey) {
            Ok(key) => key,
            Err(_) => return false,
        };
        let message = Message::from_digest(*sighash);
        secp.verify_ecdsa(&message, &signature, &public_key).is_ok()
    }
}

/// Execution context: which input of the spending transaction is being
/// evaluated, and the two signature-checking collaborators.
pub struct ExecuteOpts<'a> {
    /// Index of the transaction input whose scriptSig is under evaluation.
    pub input_index: usize,

    /// Signature-hash provider for OP_CHECKSIG / OP_CHECKMULTISIG.
    pub sighash: &'a dyn SighashProvider,

    /// Signature verifier for OP_CHECKSIG / OP_CHECKMULTISIG.
    pub verifier: &'a dyn SignatureVerifier,
}

impl Default for ExecuteOpts<'static> {
    /// A context without transaction data: every signature check is false.
    fn default() -> Self {
        ExecuteOpts {
            input_index: 0,
            sighash: &NoopSighash,
            verifier: &NoopVerifier,
        }
    }
}

/// Executes a script on a fresh stack with no signature-checking context.
///
/// Returns `Ok(true)` when the script leaves a truthy top element,
/// `Ok(false)` for an empty stack or falsy top, and the first
/// [`ScriptError`] otherwise.
pub fn execute(script: &Script) -> Result<bool, ScriptError> {
    execute_with_opts(script, &ExecuteOpts::default())
}

/// Executes a script on a fresh stack with the given context.
pub fn execute_with_opts(script: &Script, opts: &ExecuteOpts<'_>) -> Result<bool, ScriptError> {
    let mut stack = Stack::new();
    execute_on_stack(script, &mut stack, opts)?;
    if stack.is_empty() {
        return Ok(false);
    }
    let top = stack.pop()?;
    Ok(num::cast_to_bool(&top))
}

/// Executes a script against an existing stack.
///
/// This is the shared core of [`execute_with_opts`] and the two-phase spend
/// verification, where the scriptSig runs first and the scriptPubKey
/// continues on the same stack.
pub(crate) fn execute_on_stack(
    script: &Script,
    stack: &mut Stack,
    opts: &ExecuteOpts<'_>,
) -> Result<(), ScriptError> {
    let mut alt = Stack::new();
    let mut cond: Vec<bool> = Vec::new();
    let mut op_count: usize = 0;
    let mut last_separator: usize = 0;

    for chunk in script.chunks() {
        let executing = cond.iter().all(|&branch| branch);

        match chunk.kind() {
            ChunkKind::Data(data) => {
                // Oversized elements fail the script whether or not the
                // branch is taken.
                if data.len() > MAX_SCRIPT_ELEMENT_SIZE {
                    return Err(ScriptError::ScriptSize);
                }
                if executing {
                    stack.push(data.clone());
                }
            }

            ChunkKind::Op(raw) => {
                let raw = *raw;
                if raw > Opcode::OP_16 as u8 {
                    op_count += 1;
                    if op_count > MAX_OPS_PER_SCRIPT {
                        return Err(ScriptError::OpCount);
                    }
                }

                // These two fail the script from inside skipped branches
                // as well; every other reserved byte only fails when
                // actually executed.
                if raw == Opcode::OP_VERIF as u8 || raw == Opcode::OP_VERNOTIF as u8 {
                    return Err(ScriptError::ReservedOp(raw));
                }
                if is_disabled(raw) {
                    return Err(ScriptError::DisabledOp(raw));
                }

                let op = Opcode::from_byte(raw);

                // Conditional structure advances even in skipped branches.
                match op {
                    Some(cond_op @ (Opcode::OP_IF | Opcode::OP_NOTIF)) => {
                        let branch = if executing {
                            let value = num::cast_to_bool(&stack.pop()?);
                            if cond_op == Opcode::OP_NOTIF {
                                !value
                            } else {
                                value
                            }
                        } else {
                            false
                        };
                        cond.push(branch);
                    }
                    Some(Opcode::OP_ELSE) => {
                        let top = cond.last_mut().ok_or(ScriptError::UnbalancedConditional)?;
                        *top = !*top;
                    }
                    Some(Opcode::OP_ENDIF) => {
                        if cond.pop().is_none() {
                            return Err(ScriptError::UnbalancedConditional);
                        }
                    }

                    _ if !executing => {}

                    // The parser renders byte 0x00 as an empty data push,
                    // but built scripts may carry it as an opcode chunk.
                    Some(Opcode::OP_0) => stack.push(vec![]),
                    Some(Opcode::OP_1NEGATE) => stack.push(num::encode(-1)),
                    Some(n) if n >= Opcode::OP_1 && n <= Opcode::OP_16 => {
                        stack.push(num::encode(i64::from(n as u8 - Opcode::OP_1 as u8) + 1));
                    }

                    Some(Opcode::OP_NOP) => {}
                    Some(
                        Opcode::OP_NOP1
                        | Opcode::OP_NOP2
                        | Opcode::OP_NOP3
                        | Opcode::OP_NOP4
                        | Opcode::OP_NOP5
                        | Opcode::OP_NOP6
                        | Opcode::OP_NOP7
                        | Opcode::OP_NOP8
                        | Opcode::OP_NOP9
                        | Opcode::OP_NOP10,
                    ) => {}

                    Some(Opcode::OP_VERIFY) => {
                        if !num::cast_to_bool(&stack.pop()?) {
                            return Err(ScriptError::Verify);
                        }
                    }
                    Some(Opcode::OP_RETURN) => return Err(ScriptError::OpReturn),

                    Some(Opcode::OP_TOALTSTACK) => alt.push(stack.pop()?),
                    Some(Opcode::OP_FROMALTSTACK) => stack.push(alt.pop()?),

                    Some(Opcode::OP_2DROP) => {
                        stack.pop()?;
                        stack.pop()?;
                    }
                    Some(Opcode::OP_2DUP) => {
                        let second = stack.peek_at(1)?.to_vec();
                        let top = stack.peek()?.to_vec();
                        stack.push(second);
                        stack.push(top);
                    }
                    Some(Opcode::OP_3DUP) => {
                        let third = stack.peek_at(2)?.to_vec();
                        let second = stack.peek_at(1)?.to_vec();
                        let top = stack.peek()?.to_vec();
                        stack.push(third);
                        stack.push(second);
                        stack.push(top);
                    }
                    Some(Opcode::OP_2OVER) => {
                        let fourth = stack.peek_at(3)?.to_vec();
                        let third = stack.peek_at(2)?.to_vec();
                        stack.push(fourth);
                        stack.push(third);
                    }
                    Some(Opcode::OP_2ROT) => {
                        let sixth = stack.remove(5)?;
                        let fifth = stack.remove(4)?;
                        stack.push(sixth);
                        stack.push(fifth);
                    }
                    Some(Opcode::OP_2SWAP) => {
                        let fourth = stack.remove(3)?;
                        let third = stack.remove(2)?;
                        stack.push(fourth);
                        stack.push(third);
                    }
                    Some(Opcode::OP_IFDUP) => {
                        if num::cast_to_bool(stack.peek()?) {
                            let top = stack.peek()?.to_vec();
                            stack.push(top);
                        }
                    }
                    Some(Opcode::OP_DEPTH) => {
                        stack.push(num::encode(stack.len() as i64));
                    }
                    Some(Opcode::OP_DROP) => {
                        stack.pop()?;
                    }
                    Some(Opcode::OP_DUP) => {
                        let top = stack.peek()?.to_vec();
                        stack.push(top);
                    }
                    Some(Opcode::OP_NIP) => {
                        stack.remove(1)?;
                    }
                    Some(Opcode::OP_OVER) => {
                        let second = stack.peek_at(1)?.to_vec();
                        stack.push(second);
                    }
                    Some(roll_op @ (Opcode::OP_PICK | Opcode::OP_ROLL)) => {
                        let n = num::decode(&stack.pop()?)?;
                        if n < 0 || n as usize >= stack.len() {
                            return Err(ScriptError::StackUnderflow);
                        }
                        let depth = n as usize;
                        if roll_op == Opcode::OP_PICK {
                            let item = stack.peek_at(depth)?.to_vec();
                            stack.push(item);
                        } else {
                            let item = stack.remove(depth)?;
                            stack.push(item);
                        }
                    }
                    Some(Opcode::OP_ROT) => {
                        let third = stack.remove(2)?;
                        stack.push(third);
                    }
                    Some(Opcode::OP_SWAP) => {
                        let second = stack.remove(1)?;
                        stack.push(second);
                    }
                    Some(Opcode::OP_TUCK) => {
                        let top = stack.peek()?.to_vec();
                        stack.insert(2, top)?;
                    }

                    Some(Opcode::OP_SIZE) => {
                        let size = stack.peek()?.len();
                        stack.push(num::encode(size as i64));
                    }

                    Some(Opcode::OP_EQUAL) => {
                        let b = stack.pop()?;
                        let a = stack.pop()?;
                        stack.push_bool(a == b);
                    }
                    Some(Opcode::OP_EQUALVERIFY) => {
                        let b = stack.pop()?;
                        let a = stack.pop()?;
                        if a != b {
                            return Err(ScriptError::Verify);
                        }
                    }

                    Some(Opcode::OP_1ADD) => unary_num(stack, |n| n + 1)?,
                    Some(Opcode::OP_1SUB) => unary_num(stack, |n| n - 1)?,
                    Some(Opcode::OP_NEGATE) => unary_num(stack, |n| -n)?,
                    Some(Opcode::OP_ABS) => unary_num(stack, i64::abs)?,
                    Some(Opcode::OP_NOT) => unary_num(stack, |n| i64::from(n == 0))?,
                    Some(Opcode::OP_0NOTEQUAL) => unary_num(stack, |n| i64::from(n != 0))?,

                    Some(Opcode::OP_ADD) => binary_num(stack, |a, b| a + b)?,
                    Some(Opcode::OP_SUB) => binary_num(stack, |a, b| a - b)?,
                    Some(Opcode::OP_MIN) => binary_num(stack, i64::min)?,
                    Some(Opcode::OP_MAX) => binary_num(stack, i64::max)?,

                    Some(Opcode::OP_BOOLAND) => binary_cmp(stack, |a, b| a != 0 && b != 0)?,
                    Some(Opcode::OP_BOOLOR) => binary_cmp(stack, |a, b| a != 0 || b != 0)?,
                    Some(Opcode::OP_NUMEQUAL) => binary_cmp(stack, |a, b| a == b)?,
                    Some(Opcode::OP_NUMNOTEQUAL) => binary_cmp(stack, |a, b| a != b)?,
                    Some(Opcode::OP_LESSTHAN) => binary_cmp(stack, |a, b| a < b)?,
                    Some(Opcode::OP_GREATERTHAN) => binary_cmp(stack, |a, b| a > b)?,
                    Some(Opcode::OP_LESSTHANOREQUAL) => binary_cmp(stack, |a, b| a <= b)?,
                    Some(Opcode::OP_GREATERTHANOREQUAL) => binary_cmp(stack, |a, b| a >= b)?,

                    Some(Opcode::OP_NUMEQUALVERIFY) => {
                        let b = num::decode(&stack.pop()?)?;
                        let a = num::decode(&stack.pop()?)?;
                        if a != b {
                            return Err(ScriptError::Verify);
                        }
                    }
                    Some(Opcode::OP_WITHIN) => {
                        let hi = num::decode(&stack.pop()?)?;
                        let lo = num::decode(&stack.pop()?)?;
                        let x = num::decode(&stack.pop()?)?;
                        stack.push_bool(lo <= x && x < hi);
                    }

                    Some(Opcode::OP_RIPEMD160) => {
                        let data = stack.pop()?;
                        stack.push(hash::ripemd160(&data).to_vec());
                    }
                    Some(Opcode::OP_SHA1) => {
                        let data = stack.pop()?;
                        stack.push(hash::sha1(&data).to_vec());
                    }
                    Some(Opcode::OP_SHA256) => {
                        let data = stack.pop()?;
                        stack.push(hash::sha256(&data).to_vec());
                    }
                    Some(Opcode::OP_HASH160) => {
                        let data = stack.pop()?;
                        stack.push(hash::hash160(&data).to_vec());
                    }
                    Some(Opcode::OP_HASH256) => {
                        let data = stack.pop()?;
                        stack.push(hash::hash256(&data).to_vec());
                    }

                    Some(Opcode::OP_CODESEPARATOR) => {
                        last_separator = chunk.start() + 1;
                    }

                    Some(sig_op @ (Opcode::OP_CHECKSIG | Opcode::OP_CHECKSIGVERIFY)) => {
                        let verified = check_sig(stack, script, last_separator, opts)?;
                        if sig_op == Opcode::OP_CHECKSIG {
                            stack.push_bool(verified);
                        } else if !verified {
                            return Err(ScriptError::Verify);
                        }
                    }
                    Some(
                        multi_op @ (Opcode::OP_CHECKMULTISIG | Opcode::OP_CHECKMULTISIGVERIFY),
                    ) => {
                        let verified =
                            check_multisig(stack, script, last_separator, opts, &mut op_count)?;
                        if multi_op == Opcode::OP_CHECKMULTISIG {
                            stack.push_bool(verified);
                        } else if !verified {
                            return Err(ScriptError::Verify);
                        }
                    }

                    // OP_VER, OP_RESERVED, OP_RESERVED1/2, and every byte
                    // with no defined semantics.
                    _ => return Err(ScriptError::ReservedOp(raw)),
                }
            }
        }

        if stack.len() + alt.len() > MAX_STACK_SIZE {
            return Err(ScriptError::StackSize);
        }
    }

    if !cond.is_empty() {
        return Err(ScriptError::UnbalancedConditional);
    }

    Ok(())
}

fn unary_num(stack: &mut Stack, f: impl Fn(i64) -> i64) -> Result<(), ScriptError> {
    let n = num::decode(&stack.pop()?)?;
    stack.push(num::encode(f(n)));
    Ok(())
}

fn binary_num(stack: &mut Stack, f: impl Fn(i64, i64) -> i64) -> Result<(), ScriptError> {
    let b = num::decode(&stack.pop()?)?;
    let a = num::decode(&stack.pop()?)?;
    stack.push(num::encode(f(a, b)));
    Ok(())
}

fn binary_cmp(stack: &mut Stack, f: impl Fn(i64, i64) -> bool) -> Result<(), ScriptError> {
    let b = num::decode(&stack.pop()?)?;
    let a = num::decode(&stack.pop()?)?;
    stack.push_bool(f(a, b));
    Ok(())
}

/// OP_CHECKSIG core: pops key and signature, derives the connected script,
/// strips the signature's own push from it, and asks the collaborators.
fn check_sig(
    stack: &mut Stack,
    script: &Script,
    last_separator: usize,
    opts: &ExecuteOpts<'_>,
) -> Result<bool, ScriptError> {
    let pubkey = stack.pop()?;
    let signature = stack.pop()?;

    let connected = &script.bytes()[last_separator..];
    let mut pattern = Vec::with_capacity(signature.len() + 5);
    write_push(&mut pattern, &signature);
    let script_code = find_and_delete(connected, &pattern);

    Ok(verify_one(&signature, &pubkey, &script_code, opts))
}

/// Checks a single signature against a single key. Everything that can go
/// wrong here (empty signature, unavailable sighash, verifier rejection)
/// is a false result, never an error.
fn verify_one(signature: &[u8], pubkey: &[u8], script_code: &[u8], opts: &ExecuteOpts<'_>) -> bool {
    if signature.is_empty() {
        return false;
    }
    let (der, sighash_type) = signature.split_at(signature.len() - 1);
    let sighash = match opts
        .sighash
        .sighash(opts.input_index, script_code, sighash_type[0])
    {
        Some(sighash) => sighash,
        None => return false,
    };
    opts.verifier.verify(&sighash, der, pubkey)
}

/// OP_CHECKMULTISIG core.
///
/// Signatures must appear in the same relative order as the keys they
/// match: each key is tried once and consumed whether or not it matched,
/// and the check fails as soon as more signatures remain than keys.
fn check_multisig(
    stack: &mut Stack,
    script: &Script,
    last_separator: usize,
    opts: &ExecuteOpts<'_>,
    op_count: &mut usize,
) -> Result<bool, ScriptError> {
    let key_count = num::decode(&stack.pop()?)?;
    if key_count < 0 || key_count as usize > MAX_PUBKEYS_PER_MULTISIG {
        return Err(ScriptError::NumericRange);
    }
    let key_count = key_count as usize;
    *op_count += key_count;
    if *op_count > MAX_OPS_PER_SCRIPT {
        return Err(ScriptError::OpCount);
    }

    let mut pubkeys = VecDeque::with_capacity(key_count);
    for _ in 0..key_count {
        pubkeys.push_back(stack.pop()?);
    }

    let sig_count = num::decode(&stack.pop()?)?;
    if sig_count < 0 || sig_count as usize > key_count {
        return Err(ScriptError::NumericRange);
    }
    let mut sigs = VecDeque::with_capacity(sig_count as usize);
    for _ in 0..sig_count {
        sigs.push_back(stack.pop()?);
    }

    // OP_CHECKMULTISIG consumes one argument more than it uses. The extra
    // pop is part of the protocol and must stay, which also means the item
    // has to exist.
    stack.pop()?;

    let connected = &script.bytes()[last_separator..];
    let mut script_code = connected.to_vec();
    for sig in &sigs {
        let mut pattern = Vec::with_capacity(sig.len() + 5);
        write_push(&mut pattern, sig);
        script_code = find_and_delete(&script_code, &pattern);
    }

    let mut valid = true;
    while !sigs.is_empty() {
        // One key per round, consumed regardless of the outcome. The loop
        // guard keeps sigs <= pubkeys on entry, so a key is available.
        let pubkey = match pubkeys.pop_front() {
            Some(key) => key,
            None => return Err(ScriptError::Internal("multisig key deque exhausted".into())),
        };
        if let Some(sig) = sigs.front() {
            if verify_one(sig, &pubkey, &script_code, opts) {
                sigs.pop_front();
            }
        }
        if sigs.len() > pubkeys.len() {
            valid = false;
            break;
        }
    }

    Ok(valid)
}
