//! Per-page checks.

use cl_02_page_ledger::{GenesisRecord, Page, PageSeal};
use shared_crypto::verify;
use shared_types::{short_hex, Hash, Timestamp};

use super::IntegrityVerifier;
use crate::domain::report::IntegrityReport;
use crate::domain::violation::{Violation, ViolationKind};

impl IntegrityVerifier {
    /// Check `pages`, the first of which sits at `start`.
    pub(super) fn check_pages(
        &self,
        pages: &[Page],
        start: u64,
        mut expected_prior: Hash,
        mut prev_timestamp: Option<Timestamp>,
        report: &mut IntegrityReport,
    ) {
        for (offset, page) in pages.iter().enumerate() {
            let position = start + offset as u64;
            if let Some(violation) =
                self.check_page(page, position, &expected_prior, prev_timestamp)
            {
                report.violations.push(violation);
            }
            expected_prior = page.page_hash;
            prev_timestamp = Some(page.timestamp);
            report.pages_checked += 1;
        }
    }

    fn check_page(
        &self,
        page: &Page,
        position: u64,
        expected_prior: &Hash,
        prev_timestamp: Option<Timestamp>,
    ) -> Option<Violation> {
        let fail = |kind: ViolationKind, detail: String| Some(Violation::page(position, kind, detail));

        if page.sequence_index != position {
            return fail(
                ViolationKind::SequenceMismatch,
                format!("stored index {}", page.sequence_index),
            );
        }

        let recomputed = page.compute_hash();
        if recomputed != page.page_hash {
            return fail(
                ViolationKind::HashMismatch,
                format!(
                    "stored {} but content hashes to {}",
                    short_hex(&page.page_hash),
                    short_hex(&recomputed)
                ),
            );
        }

        if page.prior_hash != *expected_prior {
            return fail(
                ViolationKind::BrokenLink,
                format!(
                    "prior_hash {} but predecessor is {}",
                    short_hex(&page.prior_hash),
                    short_hex(expected_prior)
                ),
            );
        }

        if page.seal.is_genesis() != (position == 0) {
            return fail(
                ViolationKind::MisplacedSeal,
                if position == 0 {
                    "page 0 is not sealed as genesis".to_string()
                } else {
                    "genesis seal outside page 0".to_string()
                },
            );
        }

        if let Some(prev) = prev_timestamp {
            if page.timestamp <= prev {
                return fail(
                    ViolationKind::TimestampRegression,
                    format!("timestamp {} not after {}", page.timestamp, prev),
                );
            }
        }

        match &page.seal {
            PageSeal::Genesis => check_genesis(page).map(|detail| {
                Violation::page(position, ViolationKind::InvalidGenesisRecord, detail)
            }),
            PageSeal::Signed(signature) => self
                .check_signature(page, signature)
                .map(|(kind, detail)| Violation::page(position, kind, detail)),
        }
    }

    fn check_signature(&self, page: &Page, signature: &[u8]) -> Option<(ViolationKind, String)> {
        let Some(id) = self.registry.lookup(&page.signer_identity) else {
            return Some((
                ViolationKind::UnknownSigner,
                format!("{} is not a registered validator", page.signer_identity),
            ));
        };

        if !self.registry.is_active(id, page.timestamp) {
            return Some((
                ViolationKind::InactiveSigner,
                format!(
                    "validator #{} was not active at {}",
                    id, page.timestamp
                ),
            ));
        }

        let Some(key) = self.registry.public_key_at(id, page.timestamp) else {
            return Some((
                ViolationKind::UnknownSigner,
                format!("validator #{} had no key at {}", id, page.timestamp),
            ));
        };

        match verify(&key, &page.content_bytes(), signature) {
            Ok(true) => None,
            Ok(false) => Some((
                ViolationKind::InvalidSignature,
                format!("signature does not verify for validator #{}", id),
            )),
            Err(e) => Some((ViolationKind::MalformedSignature, e.to_string())),
        }
    }
}

/// Genesis carries no signature; its payload must still be a genesis record
/// naming the page's own signer as founder.
fn check_genesis(page: &Page) -> Option<String> {
    match GenesisRecord::decode(&page.payload) {
        Err(e) => Some(e.to_string()),
        Ok(record) if record.founder_identity != page.signer_identity => Some(format!(
            "record founder {} differs from signer {}",
            record.founder_identity, page.signer_identity
        )),
        Ok(_) => None,
    }
}
