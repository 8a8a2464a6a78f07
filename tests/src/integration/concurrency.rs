//! # Concurrency
//!
//! Writers with different signers race each other while readers, the
//! aggregator and the verifier run alongside. Admission must stay serialized:
//! contiguous indices, an unbroken chain, and a clean verification at the end.

#[cfg(test)]
mod tests {
    use cl_01_validator_registry::ValidatorRegistryApi;
    use cl_02_page_ledger::test_utils::TestLedger;
    use cl_02_page_ledger::PageLedgerApi;
    use cl_03_hierarchical_aggregation::{
        AggregationConfig, AggregationService, HierarchicalAggregationApi, Level,
    };
    use cl_04_integrity_verification::{IntegrityVerificationApi, IntegrityVerifier};
    use cl_05_audit_query::{AuditQueryApi, AuditQueryService};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    const WRITERS: usize = 8;
    const PER_WRITER: usize = 50;

    #[test]
    fn test_stress_writers_readers_aggregator() {
        let fixture = Arc::new(TestLedger::new());
        let signers: Vec<_> = (0..WRITERS)
            .map(|i| {
                let identity = format!("clerk-{}@county", i);
                let (_, keys) = fixture.add_validator(&identity, 40 + i as u8);
                (identity, keys)
            })
            .collect();

        let aggregator = Arc::new(
            AggregationService::in_memory(
                fixture.ledger.clone(),
                AggregationConfig::uniform(4),
                fixture.clock.clone(),
            )
            .unwrap(),
        );
        let audit = Arc::new(AuditQueryService::new(fixture.ledger.clone()));
        let done = Arc::new(AtomicBool::new(false));

        let writers: Vec<_> = signers
            .into_iter()
            .enumerate()
            .map(|(w, (identity, keys))| {
                let fixture = Arc::clone(&fixture);
                thread::spawn(move || {
                    for n in 0..PER_WRITER {
                        fixture
                            .submit("vote_cast", &format!("w{}-{}", w, n), &identity, &keys)
                            .unwrap();
                    }
                })
            })
            .collect();

        let roller = {
            let aggregator = Arc::clone(&aggregator);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                while !done.load(Ordering::Acquire) {
                    aggregator.roll_up().unwrap();
                    thread::yield_now();
                }
            })
        };

        let reader = {
            let audit = Arc::clone(&audit);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut seen = 0;
                while !done.load(Ordering::Acquire) {
                    let pages = audit.find_by_signer("clerk-0@county");
                    assert!(pages.len() >= seen);
                    assert!(pages
                        .windows(2)
                        .all(|w| w[0].sequence_index < w[1].sequence_index));
                    seen = pages.len();
                }
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Release);
        roller.join().unwrap();
        reader.join().unwrap();
        aggregator.roll_up().unwrap();

        let total = 1 + WRITERS * PER_WRITER;
        let snapshot = fixture.ledger.snapshot();
        assert_eq!(snapshot.len(), total);

        let indices: HashSet<u64> = snapshot.iter().map(|p| p.sequence_index).collect();
        assert_eq!(indices.len(), total);
        for (i, page) in snapshot.iter().enumerate() {
            assert_eq!(page.sequence_index, i as u64);
        }

        // 401 pages at threshold 4: 100 chapters, 25 books, 6 parts, 1 series.
        assert_eq!(aggregator.aggregates(Level::Chapter).len(), 100);
        assert_eq!(aggregator.aggregates(Level::Book).len(), 25);
        assert_eq!(aggregator.aggregates(Level::Part).len(), 6);
        assert_eq!(aggregator.aggregates(Level::Series).len(), 1);

        let report = IntegrityVerifier::new(fixture.ledger.clone(), fixture.registry.clone())
            .with_aggregates(aggregator)
            .verify_full();
        assert!(report.is_valid(), "{}", report);
        assert_eq!(report.aggregates_checked, 132);
    }

    #[test]
    fn test_deactivation_races_admission() {
        let fixture = Arc::new(TestLedger::new());
        let (id, keys) = fixture.add_validator("clerk@county", 9);

        let writer = {
            let fixture = Arc::clone(&fixture);
            thread::spawn(move || {
                let mut admitted = 0;
                for n in 0..200 {
                    if fixture
                        .submit("vote_cast", &format!("v{}", n), "clerk@county", &keys)
                        .is_ok()
                    {
                        admitted += 1;
                    }
                }
                admitted
            })
        };

        thread::yield_now();
        fixture.registry.deactivate(id).unwrap();
        let admitted = writer.join().unwrap();

        // Whatever got in before the deactivation instant stays valid forever.
        assert_eq!(fixture.ledger.len(), 1 + admitted);
        let report =
            IntegrityVerifier::new(fixture.ledger.clone(), fixture.registry.clone()).verify_full();
        assert!(report.is_valid(), "{}", report);

        let deactivated_at = fixture
            .registry
            .get(id)
            .and_then(|v| v.status_history.last().map(|e| e.at))
            .unwrap();
        assert!(fixture
            .ledger
            .snapshot()
            .iter()
            .skip(1)
            .all(|p| p.timestamp < deactivated_at));
    }
}
