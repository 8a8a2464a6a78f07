//! # Persistence
//!
//! Restart, on-disk tampering and the single-writer lock, driven through the
//! same container the operator CLI uses.

#[cfg(test)]
mod tests {
    use cl_01_validator_registry::ValidatorRegistryApi;
    use cl_02_page_ledger::test_utils::keypair;
    use cl_02_page_ledger::{GenesisParams, PageLedgerApi, Payload, PAGES_FILE};
    use cl_03_hierarchical_aggregation::{AggregationConfig, HierarchicalAggregationApi, Level};
    use cl_04_integrity_verification::{IntegrityVerificationApi, ViolationKind, ViolationScope};
    use ledger_admin::{AdminConfig, LedgerContainer};
    use shared_crypto::KeyPair;
    use shared_types::{ManualTimeSource, StoreError};
    use std::sync::Arc;
    use tempfile::TempDir;

    const T0: u64 = 1_704_067_200_000_000;
    const MARKER: &str = "ZQXJZQXJ";

    fn config(dir: &TempDir) -> AdminConfig {
        let mut config = AdminConfig::default().with_data_dir(dir.path());
        config.aggregation = AggregationConfig::uniform(4);
        config
    }

    /// Each session starts its clock an hour after the previous one.
    fn open(config: &AdminConfig, session: u64) -> LedgerContainer {
        let clock = Arc::new(ManualTimeSource::new(T0 + session * 3_600_000_000));
        LedgerContainer::open_with_clock(config, clock).unwrap()
    }

    fn founder() -> KeyPair {
        keypair(0xF0)
    }

    fn seed_ledger(container: &LedgerContainer, pages: usize) {
        let founder = founder();
        container
            .ledger
            .create_genesis(GenesisParams::new("founder@civic", founder.public_key()))
            .unwrap();
        for i in 0..pages {
            let payload = Payload::from_json(&serde_json::json!({
                "ballot": i,
                "note": format!("{}-{}", MARKER, i),
            }))
            .unwrap();
            container
                .ledger
                .submit(
                    "vote_cast",
                    payload,
                    &format!("citizen-{}", i),
                    "founder@civic",
                    founder.private_key(),
                )
                .unwrap();
        }
    }

    #[test]
    fn test_restart_preserves_everything() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let tip = {
            let container = open(&config, 0);
            seed_ledger(&container, 9);
            let clerk = keypair(3);
            let id = container
                .registry
                .register_validator("clerk@county", clerk.public_key(), "clerk")
                .unwrap();
            container.registry.deactivate(id).unwrap();
            container.aggregator.roll_up().unwrap();
            container.ledger.latest().unwrap()
        };

        let container = open(&config, 1);
        assert_eq!(container.ledger.len(), 10);
        assert_eq!(container.ledger.latest(), Some(tip.clone()));
        assert_eq!(container.registry.len(), 2);
        assert_eq!(container.aggregator.aggregates(Level::Chapter).len(), 2);

        let founder = founder();
        let next = container
            .ledger
            .submit(
                "vote_cast",
                Payload::from("{}"),
                "citizen-x",
                "founder@civic",
                founder.private_key(),
            )
            .unwrap();
        assert_eq!(next.sequence_index, 10);
        assert_eq!(next.prior_hash, tip.page_hash);

        assert!(container.verifier().verify_full().is_valid());
    }

    #[test]
    fn test_on_disk_payload_tamper_is_one_violation() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        {
            let container = open(&config, 0);
            seed_ledger(&container, 12);
            container.aggregator.roll_up().unwrap();
        }

        // Flip one byte of page 5's payload in place.
        let path = dir.path().join(PAGES_FILE);
        let mut bytes = std::fs::read(&path).unwrap();
        let needle = format!("{}-5", MARKER);
        let at = bytes
            .windows(needle.len())
            .position(|w| w == needle.as_bytes())
            .unwrap();
        bytes[at] ^= 0x01;
        std::fs::write(&path, &bytes).unwrap();

        let container = open(&config, 1);
        assert_eq!(container.ledger.len(), 13);
        let (valid, violations) = container.verifier().verify_full().into_parts();

        assert!(!valid);
        assert_eq!(violations.len(), 1, "{:?}", violations);
        assert_eq!(violations[0].scope, ViolationScope::Page);
        assert_eq!(violations[0].index, 6);
        assert_eq!(violations[0].kind, ViolationKind::HashMismatch);
    }

    #[test]
    fn test_reopen_with_lagging_clock_keeps_history_valid() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let clerk = keypair(3);

        {
            let container = open(&config, 1);
            seed_ledger(&container, 0);
            container
                .registry
                .register_validator("clerk@county", clerk.public_key(), "clerk")
                .unwrap();
            container
                .ledger
                .submit(
                    "permit_issued",
                    Payload::from("{}"),
                    "citizen-1",
                    "clerk@county",
                    clerk.private_key(),
                )
                .unwrap();
            assert!(container.verifier().verify_full().is_valid());
        }

        // The wall clock stepped back an hour between sessions.
        let container = open(&config, 0);
        let id = container.registry.lookup("clerk@county").unwrap();
        container.registry.deactivate(id).unwrap();

        let (valid, violations) = container.verifier().verify_full().into_parts();
        assert!(valid, "{:?}", violations);

        let founder = founder();
        let next = container
            .ledger
            .submit(
                "vote_cast",
                Payload::from("{}"),
                "citizen-2",
                "founder@civic",
                founder.private_key(),
            )
            .unwrap();
        assert_eq!(next.sequence_index, 2);
        assert!(container.verifier().verify_full().is_valid());
    }

    #[test]
    fn test_second_writer_is_locked_out() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let _first = open(&config, 0);

        let second = LedgerContainer::open_with_clock(&config, Arc::new(ManualTimeSource::new(T0)));
        let err = match second {
            Ok(_) => panic!("second container opened"),
            Err(e) => e,
        };
        let store_error = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<StoreError>())
            .expect("store error in chain");
        assert!(matches!(store_error, StoreError::Locked { .. }));
    }
}
