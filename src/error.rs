use thiserror::Error;

/// All failure conditions a script can produce, during parsing, execution,
/// or spend verification.
///
/// A verification surfaces exactly one of these: the first failure
/// encountered. Signature-level problems (undecodable DER, an unavailable
/// sighash, a verifier rejection) are deliberately *not* represented here.
/// They degrade to a false result inside OP_CHECKSIG / OP_CHECKMULTISIG
/// rather than aborting the script.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// A push ran past the end of the program, or the bytes are otherwise
    /// unparseable.
    #[error("malformed script: {0}")]
    MalformedScript(String),

    /// Program longer than 10,000 bytes, or a pushed element longer than
    /// 520 bytes.
    #[error("script or element size limit exceeded")]
    ScriptSize,

    /// An operation required more items than the stack (or alt stack) held.
    #[error("stack underflow: not enough elements on the stack")]
    StackUnderflow,

    /// OP_ELSE/OP_ENDIF without a matching OP_IF/OP_NOTIF, or an OP_IF left
    /// open at the end of the script.
    #[error("unbalanced conditional: mismatched IF/ELSE/ENDIF")]
    UnbalancedConditional,

    /// One of the permanently disabled opcodes appeared in the program.
    /// These fail the script even inside an untaken branch.
    #[error("disabled opcode: 0x{0:02x}")]
    DisabledOp(u8),

    /// OP_VERIF, OP_VERNOTIF, or an opcode byte with no defined semantics.
    #[error("reserved opcode: 0x{0:02x}")]
    ReservedOp(u8),

    /// More than 201 counted opcodes executed (OP_CHECKMULTISIG adds its
    /// public-key count to the total).
    #[error("opcode count limit exceeded")]
    OpCount,

    /// Main plus alt stack grew beyond 1000 items.
    #[error("stack size limit exceeded")]
    StackSize,

    /// A numeric operand was wider than 4 bytes, or a multisig key or
    /// signature count was outside its allowed range.
    #[error("numeric value out of range")]
    NumericRange,

    /// OP_VERIFY (or a *VERIFY variant) consumed a false value.
    #[error("verify failed: top stack element is false")]
    Verify,

    /// OP_RETURN was executed. The output is provably unspendable.
    #[error("OP_RETURN encountered: script is unspendable")]
    OpReturn,

    /// The stack was empty when top-level execution finished.
    #[error("stack empty at end of script")]
    EmptyStack,

    /// The final top-of-stack value did not cast to true.
    #[error("script evaluated to false")]
    NonTrueTop,

    /// A scriptSig spending a pay-to-script-hash output contained non-push
    /// opcodes.
    #[error("scriptSig for pay-to-script-hash spend is not push-only")]
    P2SHNonPush,

    /// An internal invariant was violated. Indicates a bug in the engine,
    /// never a property of the script.
    #[error("internal error: {0}")]
    Internal(String),
}
