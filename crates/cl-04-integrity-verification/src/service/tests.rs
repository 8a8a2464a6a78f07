use super::*;
use crate::domain::violation::ViolationScope;
use cl_02_page_ledger::test_utils::{keypair, TestLedger, FOUNDER};
use cl_02_page_ledger::{
    InMemoryPageStore, LedgerConfig, LedgerService, Page, PageDraft, PageSeal, Payload,
};
use cl_03_hierarchical_aggregation::{AggregationConfig, AggregationError, AggregationService};
use shared_crypto::{sign, KeyPair};

fn verifier(fixture: &TestLedger) -> IntegrityVerifier {
    IntegrityVerifier::new(fixture.ledger.clone(), fixture.registry.clone())
}

/// Ledger over a crafted page list, sharing the fixture's registry.
fn reload(fixture: &TestLedger, pages: Vec<Page>) -> Arc<LedgerService> {
    Arc::new(
        LedgerService::new(
            Box::new(InMemoryPageStore::with_pages(pages).unwrap()),
            fixture.registry.clone(),
            LedgerConfig::default(),
        )
        .unwrap(),
    )
}

fn flip_payload_byte(page: &mut Page, at: usize) {
    let mut bytes = page.payload.as_bytes().to_vec();
    bytes[at] ^= 0x01;
    page.payload = Payload::new(bytes);
}

fn signed_page(draft: PageDraft, keys: &KeyPair) -> Page {
    let signature = sign(keys.private_key(), &draft.content_bytes()).unwrap();
    draft.seal(PageSeal::Signed(signature))
}

fn next_draft(prev: &Page, signer: &str, timestamp: u64) -> PageDraft {
    PageDraft {
        sequence_index: prev.sequence_index + 1,
        timestamp,
        action_type: "vote_cast".to_string(),
        payload: Payload::from("{}"),
        submitter_identity: "citizen-x".to_string(),
        signer_identity: signer.to_string(),
        prior_hash: prev.page_hash,
    }
}

/// Aggregate source with fixed contents.
struct FixedAggregates([Vec<Aggregate>; 4]);

impl HierarchicalAggregationApi for FixedAggregates {
    fn try_close(&self, _level: Level) -> Result<Option<Aggregate>, AggregationError> {
        Ok(None)
    }

    fn roll_up(&self) -> Result<Vec<Aggregate>, AggregationError> {
        Ok(Vec::new())
    }

    fn aggregates(&self, level: Level) -> Vec<Aggregate> {
        self.0[level.index()].clone()
    }

    fn get(&self, level: Level, position: u64) -> Option<Aggregate> {
        self.0[level.index()].get(position as usize).cloned()
    }

    fn open_children(&self, _level: Level) -> u64 {
        0
    }
}

fn rolled_up(fixture: &TestLedger, threshold: usize) -> Arc<AggregationService> {
    let agg = AggregationService::in_memory(
        fixture.ledger.clone(),
        AggregationConfig::uniform(threshold),
        fixture.clock.clone(),
    )
    .unwrap();
    agg.roll_up().unwrap();
    Arc::new(agg)
}

// =============================================================================
// Untouched ledger
// =============================================================================

#[test]
fn test_untouched_ledger_is_valid() {
    let fixture = TestLedger::with_pages(20);
    let aggregator = rolled_up(&fixture, 4);
    let report = verifier(&fixture).with_aggregates(aggregator).verify_full();

    assert_eq!(report.pages_checked, 21);
    assert_eq!(report.aggregates_checked, 5 + 1);
    assert_eq!(report.into_parts(), (true, vec![]));
}

#[test]
fn test_empty_ledger_is_valid() {
    let fixture = TestLedger::uninitialized();
    assert!(verifier(&fixture).verify_full().is_valid());
}

#[test]
fn test_deactivation_keeps_history_valid() {
    let fixture = TestLedger::new();
    let (id, clerk) = fixture.add_validator("clerk@county", 7);
    for i in 0..3 {
        fixture
            .submit("vote_cast", &format!("citizen-{}", i), "clerk@county", &clerk)
            .unwrap();
    }

    fixture.registry.deactivate(id).unwrap();
    fixture.submit_founder("validator_removed", "clerk@county");

    assert_eq!(verifier(&fixture).verify_full().into_parts(), (true, vec![]));
}

#[test]
fn test_key_rotation_keeps_history_valid() {
    let fixture = TestLedger::new();
    let (id, old_keys) = fixture.add_validator("clerk@county", 7);
    fixture
        .submit("vote_cast", "citizen-1", "clerk@county", &old_keys)
        .unwrap();

    let new_keys = keypair(8);
    fixture
        .registry
        .rotate_public_key(id, new_keys.public_key())
        .unwrap();
    fixture
        .submit("vote_cast", "citizen-2", "clerk@county", &new_keys)
        .unwrap();

    assert!(verifier(&fixture).verify_full().is_valid());
}

// =============================================================================
// Tampering
// =============================================================================

#[test]
fn test_single_payload_byte_tamper_is_one_violation() {
    let fixture = TestLedger::with_pages(20);
    let aggregator = rolled_up(&fixture, 4);

    let mut pages = fixture.ledger.snapshot().to_vec();
    flip_payload_byte(&mut pages[6], 3);
    let tampered = reload(&fixture, pages);

    let report = IntegrityVerifier::new(tampered, fixture.registry.clone())
        .with_aggregates(aggregator)
        .verify_full();
    let (valid, violations) = report.into_parts();

    assert!(!valid);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].scope, ViolationScope::Page);
    assert_eq!(violations[0].index, 6);
    assert_eq!(violations[0].kind, ViolationKind::HashMismatch);
}

#[test]
fn test_rehashed_tamper_breaks_signature_and_link() {
    let fixture = TestLedger::with_pages(5);
    let mut pages = fixture.ledger.snapshot().to_vec();
    flip_payload_byte(&mut pages[2], 0);
    pages[2].page_hash = pages[2].compute_hash();

    let report = IntegrityVerifier::new(reload(&fixture, pages), fixture.registry.clone())
        .verify_full();
    let kinds: Vec<_> = report.violations.iter().map(|v| (v.index, v.kind)).collect();

    assert_eq!(
        kinds,
        vec![
            (2, ViolationKind::InvalidSignature),
            (3, ViolationKind::BrokenLink)
        ]
    );
}

#[test]
fn test_removed_page_detected() {
    let fixture = TestLedger::with_pages(5);
    let mut pages = fixture.ledger.snapshot().to_vec();
    pages.remove(2);

    let report = IntegrityVerifier::new(reload(&fixture, pages), fixture.registry.clone())
        .verify_full();
    assert_eq!(report.violations[0].index, 2);
    assert_eq!(report.violations[0].kind, ViolationKind::SequenceMismatch);
}

#[test]
fn test_unknown_signer_detected() {
    let fixture = TestLedger::with_pages(2);
    let mut pages = fixture.ledger.snapshot().to_vec();
    let last = pages.last().unwrap().clone();
    let forged = signed_page(next_draft(&last, "impostor", last.timestamp + 10), &keypair(66));
    pages.push(forged);

    let report = IntegrityVerifier::new(reload(&fixture, pages), fixture.registry.clone())
        .verify_full();
    let (valid, violations) = report.into_parts();
    assert!(!valid);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].index, 3);
    assert_eq!(violations[0].kind, ViolationKind::UnknownSigner);
}

#[test]
fn test_page_signed_after_deactivation_detected() {
    let fixture = TestLedger::new();
    let (id, clerk) = fixture.add_validator("clerk@county", 7);
    fixture
        .submit("vote_cast", "citizen-1", "clerk@county", &clerk)
        .unwrap();
    fixture.registry.deactivate(id).unwrap();

    let mut pages = fixture.ledger.snapshot().to_vec();
    let last = pages.last().unwrap().clone();
    let late = fixture.clock.peek() + 10;
    pages.push(signed_page(next_draft(&last, "clerk@county", late), &clerk));

    let report = IntegrityVerifier::new(reload(&fixture, pages), fixture.registry.clone())
        .verify_full();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::InactiveSigner);
}

#[test]
fn test_wrong_key_signature_detected() {
    let fixture = TestLedger::with_pages(1);
    let mut pages = fixture.ledger.snapshot().to_vec();
    let last = pages.last().unwrap().clone();
    pages.push(signed_page(
        next_draft(&last, FOUNDER, last.timestamp + 1),
        &keypair(3),
    ));

    let report = IntegrityVerifier::new(reload(&fixture, pages), fixture.registry.clone())
        .verify_full();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::InvalidSignature);
}

#[test]
fn test_malformed_signature_detected() {
    let fixture = TestLedger::with_pages(1);
    let mut pages = fixture.ledger.snapshot().to_vec();
    let last = pages.last().unwrap().clone();
    pages.push(next_draft(&last, FOUNDER, last.timestamp + 1).seal(PageSeal::Signed(vec![1, 2, 3])));

    let report = IntegrityVerifier::new(reload(&fixture, pages), fixture.registry.clone())
        .verify_full();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::MalformedSignature);
}

#[test]
fn test_genesis_seal_outside_page_zero_detected() {
    let fixture = TestLedger::with_pages(1);
    let mut pages = fixture.ledger.snapshot().to_vec();
    let last = pages.last().unwrap().clone();
    pages.push(next_draft(&last, FOUNDER, last.timestamp + 1).seal(PageSeal::Genesis));

    let report = IntegrityVerifier::new(reload(&fixture, pages), fixture.registry.clone())
        .verify_full();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::MisplacedSeal);
}

#[test]
fn test_timestamp_regression_detected() {
    let fixture = TestLedger::with_pages(1);
    let mut pages = fixture.ledger.snapshot().to_vec();
    let last = pages.last().unwrap().clone();
    pages.push(signed_page(
        next_draft(&last, FOUNDER, last.timestamp),
        &fixture.founder,
    ));

    let report = IntegrityVerifier::new(reload(&fixture, pages), fixture.registry.clone())
        .verify_full();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::TimestampRegression);
}

#[test]
fn test_genesis_payload_must_decode() {
    let fixture = TestLedger::with_pages(1);
    let mut pages = fixture.ledger.snapshot().to_vec();
    pages[0].payload = Payload::from("{}");
    pages[0].page_hash = pages[0].compute_hash();
    pages[1].prior_hash = pages[0].page_hash;

    let report = IntegrityVerifier::new(reload(&fixture, pages), fixture.registry.clone())
        .verify_full();
    let kinds: Vec<_> = report.violations.iter().map(|v| (v.index, v.kind)).collect();
    assert_eq!(kinds[0], (0, ViolationKind::InvalidGenesisRecord));
}

#[test]
fn test_aggregate_tamper_detected() {
    let fixture = TestLedger::with_pages(15);
    let real = rolled_up(&fixture, 4);
    let mut levels = Level::ALL.map(|level| real.aggregates(level));

    // Swap a child digest and re-hash the chapter so only the cross-check catches it.
    let chapter = &mut levels[Level::Chapter.index()][1];
    chapter.child_digests[0] = [0xAB; 32];
    chapter.rollup_hash = chapter.compute_hash();

    let report = verifier(&fixture)
        .with_aggregates(Arc::new(FixedAggregates(levels)))
        .verify_full();
    let found: Vec<_> = report
        .violations
        .iter()
        .map(|v| (v.scope, v.index, v.kind))
        .collect();

    assert!(found.contains(&(
        ViolationScope::Aggregate(Level::Chapter),
        1,
        ViolationKind::ChildMismatch
    )));
    assert!(found.contains(&(
        ViolationScope::Aggregate(Level::Chapter),
        2,
        ViolationKind::BrokenLink
    )));
    assert!(found.contains(&(
        ViolationScope::Aggregate(Level::Book),
        0,
        ViolationKind::ChildMismatch
    )));
    assert!(report.page_violations().next().is_none());
}

// =============================================================================
// Checkpoints
// =============================================================================

#[test]
fn test_unknown_checkpoint() {
    let fixture = TestLedger::with_pages(3);
    let aggregator = rolled_up(&fixture, 4);
    let verifier = verifier(&fixture);

    assert!(matches!(
        verifier.verify_from_checkpoint(CheckpointId::new(Level::Chapter, 0)),
        Err(IntegrityError::UnknownCheckpoint(_))
    ));

    let verifier = verifier.with_aggregates(aggregator);
    assert!(verifier
        .verify_from_checkpoint(CheckpointId::new(Level::Chapter, 0))
        .is_ok());
    assert!(matches!(
        verifier.verify_from_checkpoint(CheckpointId::new(Level::Book, 0)),
        Err(IntegrityError::UnknownCheckpoint(_))
    ));
}

#[test]
fn test_checkpoint_skips_covered_pages() {
    let fixture = TestLedger::with_pages(11); // 12 pages, chapters 0..=2 at threshold 4
    let aggregator = rolled_up(&fixture, 4);

    let mut pages = fixture.ledger.snapshot().to_vec();
    flip_payload_byte(&mut pages[1], 0); // covered by chapter 0
    let tampered = reload(&fixture, pages);
    let verifier =
        IntegrityVerifier::new(tampered, fixture.registry.clone()).with_aggregates(aggregator);

    let report = verifier
        .verify_from_checkpoint(CheckpointId::new(Level::Chapter, 0))
        .unwrap();
    assert!(report.is_valid());
    assert_eq!(report.pages_checked, 8);

    let full = verifier.verify_full();
    assert_eq!(full.violations.len(), 1);
    assert_eq!(full.violations[0].index, 1);
}

#[test]
fn test_checkpoint_reports_later_tamper() {
    let fixture = TestLedger::with_pages(11);
    let aggregator = rolled_up(&fixture, 4);

    let mut pages = fixture.ledger.snapshot().to_vec();
    flip_payload_byte(&mut pages[9], 0);
    let tampered = reload(&fixture, pages);

    let report = IntegrityVerifier::new(tampered, fixture.registry.clone())
        .with_aggregates(aggregator)
        .verify_from_checkpoint(CheckpointId::new(Level::Chapter, 1))
        .unwrap();
    let (valid, violations) = report.into_parts();
    assert!(!valid);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].index, 9);
}

#[test]
fn test_report_serializes() {
    let fixture = TestLedger::with_pages(1);
    let report = verifier(&fixture).verify_full();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["pages_checked"], 2);
    assert!(json["violations"].as_array().unwrap().is_empty());
}
