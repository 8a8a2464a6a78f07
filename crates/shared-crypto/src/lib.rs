//! # Shared Crypto - Signature Service
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `signatures` | Ed25519 | Page signing and verification |
//! | `hashing` | SHA-256 | Page hashes and rollup digests |
//! | `keystore` | hex seed files | Loading validator keys |
//!
//! ## Security Parameter
//!
//! Ed25519 over Curve25519: 256-bit keys, 64-byte signatures,
//! ~128-bit security level.
//!
//! ## Security Properties
//!
//! - **Ed25519**: Deterministic nonces, no RNG dependency when signing
//! - **PrivateKey**: zeroized on drop, `Debug` output redacted
//! - A signature mismatch is an ordinary `Ok(false)`, never an error

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod hashing;
pub mod keystore;
pub mod signatures;

// Re-exports
pub use errors::CryptoError;
pub use hashing::{sha256, sha256_many, Sha256Hasher};
pub use signatures::{
    generate_keypair, sign, verify, KeyPair, PrivateKey, PublicKey, PUBLIC_KEY_LEN,
    SECRET_KEY_LEN, SIGNATURE_LEN,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
