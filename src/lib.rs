//! Consensus-faithful Bitcoin Script parsing, execution, and spend
//! verification.
//!
//! Bitcoin Script is the stack-based language that encodes the spending
//! conditions of transaction outputs. This crate implements the legacy
//! (pre-witness) script subsystem the way deployed nodes actually behave:
//! the documented limits, the error ordering, and the historical quirks are
//! all part of the contract, because a validator that diverges on any of
//! them splits from the chain.
//!
//! # What this crate implements
//!
//! - **Parser**: raw bytes to chunks, preserving the exact wire image for
//!   signature hashing ([`script::Script::parse`]). All four push
//!   encodings; undefined opcode bytes parse fine and fail at execution.
//! - **Builder**: canonical re-encoding for freshly assembled scripts
//!   ([`script::ScriptBuilder`]).
//! - **Templates**: recognizers and extractors for the standard output
//!   forms — pay-to-pubkey, pay-to-pubkey-hash, pay-to-script-hash (by its
//!   exact 23-byte wire form), bare multisig — plus signature-operation
//!   counting.
//! - **Interpreter**: the full legacy opcode set over a main and alt stack
//!   with conditional control flow ([`interpreter::execute_with_opts`]):
//!   element/stack/opcode-count limits, disabled and reserved opcode
//!   classes, OP_CODESEPARATOR, OP_CHECKSIG and OP_CHECKMULTISIG with
//!   signature stripping — including the protocol's extra-pop quirk.
//! - **Spend verification**: the two-phase scriptSig/scriptPubKey protocol
//!   with optional pay-to-script-hash recursion
//!   ([`verify::verify_spend`]).
//!
//! # What is NOT implemented
//!
//! - Transaction serialization and the sighash transformation itself:
//!   callers supply a [`interpreter::SighashProvider`].
//! - Curve arithmetic: callers supply a [`interpreter::SignatureVerifier`]
//!   (one backed by the `secp256k1` crate ships behind the `secp256k1`
//!   feature).
//! - Witness programs, taproot, and post-activation strict-encoding rules.
//! - Networking, wallets, block validation, addresses.
//!
//! # Quick example
//!
//! ```rust
//! use bitcoin_script_engine::interpreter::execute;
//! use bitcoin_script_engine::script::Script;
//!
//! // OP_1 OP_1 OP_EQUAL
//! let script = Script::parse_hex("515187").unwrap();
//! assert!(execute(&script).unwrap());
//! ```
//!
//! # Feature flags
//!
//! | Feature     | Description                                          |
//! |-------------|------------------------------------------------------|
//! | `secp256k1` | Provides `Secp256k1Verifier`, a [`interpreter::SignatureVerifier`] backed by the `secp256k1` crate. |

pub mod chunk;
pub mod error;
pub mod hash;
pub mod interpreter;
pub mod num;
pub mod opcode;
pub mod script;
pub(crate) mod stack;
pub mod verify;
