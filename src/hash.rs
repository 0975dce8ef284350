//! The digest functions the opcode set needs, as thin typed wrappers over
//! the RustCrypto hashers.

use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::digest::{Digest, Output};
use sha2::Sha256;

/// One-shot digest over any hasher in the family.
fn digest<D: Digest>(data: &[u8]) -> Output<D> {
    D::new().chain_update(data).finalize()
}

/// SHA-256. The workhorse hash of the protocol; also the inner step of
/// [`hash160`] and both steps of [`hash256`].
pub fn sha256(data: &[u8]) -> [u8; 32] {
    digest::<Sha256>(data).into()
}

/// SHA-1. Exists only to serve OP_SHA1.
pub fn sha1(data: &[u8]) -> [u8; 20] {
    digest::<Sha1>(data).into()
}

/// RIPEMD-160, the outer step of [`hash160`].
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    digest::<Ripemd160>(data).into()
}

/// HASH160: RIPEMD-160 over SHA-256. The 20-byte key and script hash used
/// by the pay-to-pubkey-hash and pay-to-script-hash output forms.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    digest::<Ripemd160>(&sha256(data)).into()
}

/// HASH256: double SHA-256. The transaction and block hash.
pub fn hash256(data: &[u8]) -> [u8; 32] {
    digest::<Sha256>(&sha256(data)).into()
}
