//! # Aggregation
//!
//! Roll-ups are derived reads of committed pages: repeating them changes
//! nothing, and their checkpoints let a verifier skip covered history.

#[cfg(test)]
mod tests {
    use cl_02_page_ledger::test_utils::TestLedger;
    use cl_02_page_ledger::PageLedgerApi;
    use cl_03_hierarchical_aggregation::{
        AggregationConfig, AggregationService, HierarchicalAggregationApi, Level,
    };
    use cl_04_integrity_verification::{
        CheckpointId, IntegrityError, IntegrityVerificationApi, IntegrityVerifier,
    };
    use proptest::prelude::*;
    use std::sync::Arc;

    fn aggregator(fixture: &TestLedger, threshold: usize) -> Arc<AggregationService> {
        Arc::new(
            AggregationService::in_memory(
                fixture.ledger.clone(),
                AggregationConfig::uniform(threshold),
                fixture.clock.clone(),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_roll_up_is_idempotent() {
        let fixture = TestLedger::with_pages(19);
        let agg = aggregator(&fixture, 4);

        let first = agg.roll_up().unwrap();
        assert_eq!(first.len(), 5 + 1);
        let before = Level::ALL.map(|level| agg.aggregates(level));

        assert!(agg.roll_up().unwrap().is_empty());
        assert!(agg.try_close_chapter().unwrap().is_none());
        assert!(agg.try_close_book().unwrap().is_none());
        assert_eq!(Level::ALL.map(|level| agg.aggregates(level)), before);
    }

    #[test]
    fn test_closing_follows_new_pages() {
        let fixture = TestLedger::with_pages(2); // 3 pages
        let agg = aggregator(&fixture, 4);

        assert!(agg.try_close_chapter().unwrap().is_none());
        assert_eq!(agg.open_children(Level::Chapter), 3);

        fixture.submit_founder("vote_cast", "late");
        let chapter = agg.try_close_chapter().unwrap().unwrap();
        assert_eq!((chapter.first_page, chapter.last_page), (0, 3));
        assert_eq!(agg.open_children(Level::Chapter), 0);
        assert_eq!(agg.open_children(Level::Book), 1);
    }

    #[test]
    fn test_two_aggregators_agree_on_digests() {
        let fixture = TestLedger::with_pages(31);
        let eager = aggregator(&fixture, 4);
        let lazy = aggregator(&fixture, 4);

        // One closes level by level, the other in one roll-up.
        while eager.try_close_chapter().unwrap().is_some() {}
        while eager.try_close_book().unwrap().is_some() {}
        while eager.try_close_part().unwrap().is_some() {}
        lazy.roll_up().unwrap();

        for level in Level::ALL {
            let a: Vec<_> = eager.aggregates(level).iter().map(|x| x.rollup_hash).collect();
            let b: Vec<_> = lazy.aggregates(level).iter().map(|x| x.rollup_hash).collect();
            assert_eq!(a, b, "{}", level);
        }
    }

    #[test]
    fn test_checkpoint_verification() {
        let fixture = TestLedger::with_pages(40);
        let agg = aggregator(&fixture, 4);
        agg.roll_up().unwrap();

        let verifier = IntegrityVerifier::new(fixture.ledger.clone(), fixture.registry.clone())
            .with_aggregates(agg.clone());

        let book = agg.get(Level::Book, 1).unwrap();
        let report = verifier
            .verify_from_checkpoint(CheckpointId::new(Level::Book, 1))
            .unwrap();
        assert!(report.is_valid());
        assert_eq!(report.pages_checked, fixture.ledger.len() - book.last_page - 1);

        assert!(matches!(
            verifier.verify_from_checkpoint(CheckpointId::new(Level::Series, 0)),
            Err(IntegrityError::UnknownCheckpoint(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_aggregate_counts_follow_thresholds(pages in 0usize..60, threshold in 1usize..6) {
            let fixture = TestLedger::with_pages(pages);
            let agg = aggregator(&fixture, threshold);
            agg.roll_up().unwrap();

            let mut children = pages + 1;
            for level in Level::ALL {
                let closed = agg.aggregates(level).len();
                prop_assert_eq!(closed, children / threshold);
                children = closed;
            }
            prop_assert!(agg.roll_up().unwrap().is_empty());
        }
    }
}
