//! # Pages
//!
//! The atomic, immutable unit of the ledger.
//!
//! ## Canonical Content
//!
//! The bytes that are signed and hashed:
//!
//! ```text
//! "civic-ledger/page/v1"
//! sequence_index      u64 LE
//! timestamp           u64 LE
//! action_type         u32 LE length + UTF-8
//! payload             u32 LE length + bytes
//! submitter_identity  u32 LE length + UTF-8
//! signer_identity     u32 LE length + UTF-8
//! prior_hash          32 bytes
//! ```
//!
//! `page_hash = SHA-256(content || u32 LE length || seal bytes)`

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_crypto::Sha256Hasher;
use shared_types::{short_hex, Hash, Timestamp};

/// Domain separation tag prefixed to every page's canonical content.
pub const PAGE_DOMAIN_TAG: &[u8] = b"civic-ledger/page/v1";

/// Seal bytes of the genesis page.
pub const GENESIS_SEAL: &[u8] = b"GENESIS";

/// Action type of the genesis page.
pub const GENESIS_ACTION: &str = "genesis";

/// Opaque record payload, owned by the submitting collaborator.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload(#[serde_as(as = "Bytes")] Vec<u8>);

impl Payload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Encode a value as JSON.
    pub fn from_json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_vec(value).map(Self)
    }

    /// Decode the payload as JSON.
    pub fn to_json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Mutable access, only for tamper tests.
    #[cfg(test)]
    pub(crate) fn bytes_mut(&mut self) -> &mut Vec<u8> {
        &mut self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

/// How a page is sealed.
///
/// Only page 0 carries `Genesis`; it is accepted without a signature.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSeal {
    Genesis,
    Signed(#[serde_as(as = "Bytes")] Vec<u8>),
}

impl PageSeal {
    /// Bytes folded into the page hash.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PageSeal::Genesis => GENESIS_SEAL,
            PageSeal::Signed(signature) => signature,
        }
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self, PageSeal::Genesis)
    }
}

/// Everything about a page except its seal: the canonical content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageDraft {
    pub sequence_index: u64,
    pub timestamp: Timestamp,
    pub action_type: String,
    pub payload: Payload,
    pub submitter_identity: String,
    pub signer_identity: String,
    pub prior_hash: Hash,
}

impl PageDraft {
    /// Canonical bytes to sign.
    pub fn content_bytes(&self) -> Vec<u8> {
        encode_content(
            self.sequence_index,
            self.timestamp,
            &self.action_type,
            self.payload.as_bytes(),
            &self.submitter_identity,
            &self.signer_identity,
            &self.prior_hash,
        )
    }

    /// Attach a seal and compute the page hash.
    pub fn seal(self, seal: PageSeal) -> Page {
        let page_hash = compute_page_hash(&self.content_bytes(), &seal);
        Page {
            sequence_index: self.sequence_index,
            timestamp: self.timestamp,
            action_type: self.action_type,
            payload: self.payload,
            submitter_identity: self.submitter_identity,
            signer_identity: self.signer_identity,
            seal,
            prior_hash: self.prior_hash,
            page_hash,
        }
    }
}

/// A committed ledger page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub sequence_index: u64,
    pub timestamp: Timestamp,
    pub action_type: String,
    pub payload: Payload,
    pub submitter_identity: String,
    pub signer_identity: String,
    pub seal: PageSeal,
    pub prior_hash: Hash,
    pub page_hash: Hash,
}

impl Page {
    /// Canonical bytes that were signed.
    pub fn content_bytes(&self) -> Vec<u8> {
        encode_content(
            self.sequence_index,
            self.timestamp,
            &self.action_type,
            self.payload.as_bytes(),
            &self.submitter_identity,
            &self.signer_identity,
            &self.prior_hash,
        )
    }

    /// Recompute the hash from the stored fields.
    pub fn compute_hash(&self) -> Hash {
        compute_page_hash(&self.content_bytes(), &self.seal)
    }

    pub fn is_genesis(&self) -> bool {
        self.seal.is_genesis()
    }

    /// Short hex of the page hash, for logs.
    pub fn short_hash(&self) -> String {
        short_hex(&self.page_hash)
    }
}

fn push_prefixed(out: &mut Vec<u8>, field: &[u8]) {
    out.extend_from_slice(&(field.len() as u32).to_le_bytes());
    out.extend_from_slice(field);
}

fn encode_content(
    sequence_index: u64,
    timestamp: Timestamp,
    action_type: &str,
    payload: &[u8],
    submitter_identity: &str,
    signer_identity: &str,
    prior_hash: &Hash,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(
        PAGE_DOMAIN_TAG.len()
            + 16
            + 16
            + action_type.len()
            + payload.len()
            + submitter_identity.len()
            + signer_identity.len()
            + 32,
    );
    out.extend_from_slice(PAGE_DOMAIN_TAG);
    out.extend_from_slice(&sequence_index.to_le_bytes());
    out.extend_from_slice(&timestamp.to_le_bytes());
    push_prefixed(&mut out, action_type.as_bytes());
    push_prefixed(&mut out, payload);
    push_prefixed(&mut out, submitter_identity.as_bytes());
    push_prefixed(&mut out, signer_identity.as_bytes());
    out.extend_from_slice(prior_hash);
    out
}

/// `SHA-256(content || len(seal) || seal)`.
pub fn compute_page_hash(content: &[u8], seal: &PageSeal) -> Hash {
    let mut hasher = Sha256Hasher::new();
    hasher.update(content).update_prefixed(seal.as_bytes());
    hasher.finalize()
}
