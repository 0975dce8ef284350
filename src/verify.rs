//! Spend verification: binding a scriptSig to the scriptPubKey of the
//! output it spends.
//!
//! The two scripts are never concatenated. The scriptSig runs first on an
//! empty stack, then the scriptPubKey continues on whatever it left behind,
//! and the spend stands or falls on the final top element. When the output
//! is a pay-to-script-hash commitment the last value the scriptSig pushed
//! is itself parsed as a script and replayed against the remaining items.

use tracing::{debug, trace};

use crate::error::ScriptError;
use crate::interpreter::{execute_on_stack, ExecuteOpts};
use crate::num;
use crate::opcode::Opcode;
use crate::script::{Script, MAX_SCRIPT_SIZE};
use crate::stack::Stack;

/// Verifies that `script_sig` satisfies `script_pubkey`.
///
/// `opts` carries the input index under evaluation and the two
/// signature-checking collaborators. With `enforce_p2sh` set, outputs
/// matching the pay-to-script-hash wire template additionally require a
/// push-only scriptSig and a passing redeem-script execution.
///
/// Returns `Ok(())` on acceptance, otherwise the first failure. There is no
/// partial acceptance.
pub fn verify_spend(
    script_sig: &Script,
    script_pubkey: &Script,
    opts: &ExecuteOpts<'_>,
    enforce_p2sh: bool,
) -> Result<(), ScriptError> {
    trace!(
        input_index = opts.input_index,
        script_sig_len = script_sig.len(),
        script_pubkey_len = script_pubkey.len(),
        "verifying spend"
    );

    if script_sig.len() > MAX_SCRIPT_SIZE || script_pubkey.len() > MAX_SCRIPT_SIZE {
        return Err(ScriptError::ScriptSize);
    }

    let mut stack = Stack::new();
    execute_on_stack(script_sig, &mut stack, opts)?;

    // Snapshot taken between the two phases: the redeem-script replay must
    // see the stack exactly as the scriptSig left it.
    let mut p2sh_stack = if enforce_p2sh { Some(stack.clone()) } else { None };

    execute_on_stack(script_pubkey, &mut stack, opts)?;

    if stack.is_empty() {
        return Err(ScriptError::EmptyStack);
    }
    if !num::cast_to_bool(&stack.pop()?) {
        return Err(ScriptError::NonTrueTop);
    }

    if let Some(p2sh_stack) = p2sh_stack.as_mut() {
        if script_pubkey.is_pay_to_script_hash() {
            // The committed script travels as plain data, so the scriptSig
            // may not compute anything.
            let non_push = script_sig
                .chunks()
                .iter()
                .any(|c| c.opcode().map_or(false, |op| op > Opcode::OP_16 as u8));
            if non_push {
                return Err(ScriptError::P2SHNonPush);
            }

            let redeem_bytes = p2sh_stack.pop()?;
            let redeem = Script::parse(&redeem_bytes)?;
            debug!(redeem_len = redeem.len(), "script hash matched, executing redeem script");

            execute_on_stack(&redeem, p2sh_stack, opts)?;

            if p2sh_stack.is_empty() {
                return Err(ScriptError::EmptyStack);
            }
            if !num::cast_to_bool(&p2sh_stack.pop()?) {
                return Err(ScriptError::NonTrueTop);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash;
    use crate::script::ScriptBuilder;

    fn p2pkh_output(pubkey: &[u8]) -> Script {
        ScriptBuilder::new()
            .op(Opcode::OP_DUP)
            .op(Opcode::OP_HASH160)
            .data(&hash::hash160(pubkey))
            .op(Opcode::OP_EQUALVERIFY)
            .op(Opcode::OP_CHECKSIG)
            .build()
    }

    #[test]
    fn program_size_gate() {
        let big = ScriptBuilder::new().data(&[0x51; 9998]).build();
        assert_eq!(big.len(), 10_001);
        let ok = Script::parse(&[0x51]).unwrap();
        assert_eq!(
            verify_spend(&big, &ok, &ExecuteOpts::default(), false).unwrap_err(),
            ScriptError::ScriptSize
        );
        assert_eq!(
            verify_spend(&ok, &big, &ExecuteOpts::default(), false).unwrap_err(),
            ScriptError::ScriptSize
        );
    }

    #[test]
    fn program_size_boundary_accepted() {
        // Exactly 10,000 bytes passes the gate: twenty 497-byte pushes,
        // each 500 bytes on the wire.
        let mut builder = ScriptBuilder::new();
        for _ in 0..20 {
            builder = builder.data(&[0x51; 497]);
        }
        let exact = builder.build();
        assert_eq!(exact.len(), 10_000);
        let pk = Script::parse(&[0x51]).unwrap();
        verify_spend(&exact, &pk, &ExecuteOpts::default(), false).unwrap();
    }

    #[test]
    fn empty_final_stack_is_rejected() {
        let sig = Script::parse(&[]).unwrap();
        let pk = Script::parse(&[]).unwrap();
        assert_eq!(
            verify_spend(&sig, &pk, &ExecuteOpts::default(), false).unwrap_err(),
            ScriptError::EmptyStack
        );
    }

    #[test]
    fn false_final_top_is_rejected() {
        let sig = Script::parse(&[0x00]).unwrap();
        let pk = Script::parse(&[]).unwrap();
        assert_eq!(
            verify_spend(&sig, &pk, &ExecuteOpts::default(), false).unwrap_err(),
            ScriptError::NonTrueTop
        );
    }

    #[test]
    fn wrong_pubkey_hash_fails_with_verify() {
        let sig = ScriptBuilder::new()
            .data(&[0x30, 0x07, 0x01])
            .data(&[0x02; 33])
            .build();
        let pk = p2pkh_output(&[0x03; 33]);
        assert_eq!(
            verify_spend(&sig, &pk, &ExecuteOpts::default(), false).unwrap_err(),
            ScriptError::Verify
        );
    }
}
