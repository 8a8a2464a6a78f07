//! # Ed25519 Signatures
//!
//! Signature service used by validators to co-sign ledger pages.
//!
//! ## Contract
//!
//! - `generate_keypair()` draws a 32-byte seed from the OS RNG.
//! - `sign()` is deterministic for a given key and payload.
//! - `verify()` returns `Ok(false)` on a mismatch and `Err(_)` only when the
//!   key or signature bytes are malformed.

use crate::CryptoError;
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Secret seed length in bytes.
pub const SECRET_KEY_LEN: usize = 32;

/// Signature length in bytes.
pub const SIGNATURE_LEN: usize = 64;

/// Ed25519 public key (32 bytes).
///
/// Serialized as a lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    /// Create from bytes, checking that they encode a curve point.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LEN]) -> Result<Self, CryptoError> {
        VerifyingKey::from_bytes(&bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self(bytes))
    }

    /// Create from a slice of exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; PUBLIC_KEY_LEN] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: PUBLIC_KEY_LEN,
                actual: bytes.len(),
            })?;
        Self::from_bytes(array)
    }

    /// Parse from hex.
    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        let bytes =
            hex::decode(encoded.trim()).map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        PublicKey::from_hex(&encoded).map_err(serde::de::Error::custom)
    }
}

/// Ed25519 secret seed (32 bytes).
///
/// Zeroized on drop. `Debug` never prints key material.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; SECRET_KEY_LEN]);

impl PrivateKey {
    /// Create from a 32-byte seed.
    pub fn from_seed(seed: [u8; SECRET_KEY_LEN]) -> Self {
        Self(seed)
    }

    /// Create from a slice of exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let seed: [u8; SECRET_KEY_LEN] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: SECRET_KEY_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(seed))
    }

    /// Parse from hex.
    pub fn from_hex(encoded: &str) -> Result<Self, CryptoError> {
        let mut bytes =
            hex::decode(encoded.trim()).map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
        let key = Self::from_slice(&bytes);
        bytes.zeroize();
        key
    }

    /// Hex encoding of the seed. Only the keystore should call this.
    pub fn expose_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Derive the matching public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey(SigningKey::from_bytes(&self.0).verifying_key().to_bytes())
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Generate a fresh Ed25519 key pair.
pub fn generate_keypair() -> Result<(PublicKey, PrivateKey), CryptoError> {
    let mut seed = [0u8; SECRET_KEY_LEN];
    OsRng
        .try_fill_bytes(&mut seed)
        .map_err(|e| CryptoError::KeyGenerationFailed(e.to_string()))?;

    let private = PrivateKey::from_seed(seed);
    seed.zeroize();
    Ok((private.public_key(), private))
}

/// Sign `payload` with `private_key` (deterministic - no RNG needed).
pub fn sign(private_key: &PrivateKey, payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let signing_key = SigningKey::from_bytes(&private_key.0);
    signing_key
        .try_sign(payload)
        .map(|sig| sig.to_bytes().to_vec())
        .map_err(|e| CryptoError::SigningFailed(e.to_string()))
}

/// Verify `signature` over exactly `payload` under `public_key`.
pub fn verify(public_key: &PublicKey, payload: &[u8], signature: &[u8]) -> Result<bool, CryptoError> {
    let verifying_key =
        VerifyingKey::from_bytes(&public_key.0).map_err(|_| CryptoError::InvalidPublicKey)?;

    let sig_bytes: [u8; SIGNATURE_LEN] =
        signature
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureFormat {
                expected: SIGNATURE_LEN,
                actual: signature.len(),
            })?;
    let sig = Signature::from_bytes(&sig_bytes);

    Ok(verifying_key.verify_strict(payload, &sig).is_ok())
}

/// Ed25519 keypair.
#[derive(Clone)]
pub struct KeyPair {
    public: PublicKey,
    private: PrivateKey,
}

impl KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Result<Self, CryptoError> {
        let (public, private) = generate_keypair()?;
        Ok(Self { public, private })
    }

    /// Rebuild from a private key.
    pub fn from_private(private: PrivateKey) -> Self {
        Self {
            public: private.public_key(),
            private,
        }
    }

    /// Get public key.
    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    /// Get private key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        sign(&self.private, message)
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}
