//! # End-to-End Flow
//!
//! Genesis, validator enrollment, submissions, deactivation and audit, all
//! through the public ports.

#[cfg(test)]
mod tests {
    use cl_01_validator_registry::ValidatorRegistryApi;
    use cl_02_page_ledger::test_utils::{TestLedger, FOUNDER};
    use cl_02_page_ledger::{GenesisParams, LedgerError, PageLedgerApi};
    use cl_04_integrity_verification::{IntegrityVerificationApi, IntegrityVerifier};
    use cl_05_audit_query::{AuditQueryApi, AuditQueryService, TimeRange};
    use shared_crypto::verify;

    fn verifier(fixture: &TestLedger) -> IntegrityVerifier {
        IntegrityVerifier::new(fixture.ledger.clone(), fixture.registry.clone())
    }

    #[test]
    fn test_three_pages_then_deactivate() {
        let fixture = TestLedger::new();
        let (id, clerk) = fixture.add_validator("clerk@county", 11);

        for voter in ["alice", "bob", "carol"] {
            fixture
                .submit("vote_cast", voter, "clerk@county", &clerk)
                .unwrap();
        }
        assert_eq!(fixture.ledger.len(), 4);

        fixture.registry.deactivate(id).unwrap();
        let err = fixture
            .submit("vote_cast", "dave", "clerk@county", &clerk)
            .unwrap_err();
        assert!(matches!(err, LedgerError::UnauthorizedSigner { .. }));
        assert_eq!(fixture.ledger.len(), 4);

        let (valid, violations) = verifier(&fixture).verify_full().into_parts();
        assert!(valid, "{:?}", violations);
    }

    #[test]
    fn test_pages_chain_and_verify_under_signer_key() {
        let fixture = TestLedger::new();
        let (_, clerk) = fixture.add_validator("clerk@county", 11);
        for i in 0..5 {
            fixture
                .submit("vote_cast", &format!("citizen-{}", i), "clerk@county", &clerk)
                .unwrap();
        }

        let pages = fixture.ledger.snapshot();
        for pair in pages.windows(2) {
            assert_eq!(pair[1].prior_hash, pair[0].page_hash);
            assert_eq!(pair[1].sequence_index, pair[0].sequence_index + 1);
            assert!(pair[1].timestamp > pair[0].timestamp);
        }
        for page in pages.iter().skip(1) {
            assert!(verify(
                &clerk.public_key(),
                &page.content_bytes(),
                page.seal.as_bytes()
            )
            .unwrap());
        }
    }

    #[test]
    fn test_genesis_twice_fails() {
        let fixture = TestLedger::new();
        let again = fixture
            .ledger
            .create_genesis(GenesisParams::new(FOUNDER, fixture.founder.public_key()));
        assert!(matches!(again, Err(LedgerError::GenesisAlreadyExists)));
        assert_eq!(fixture.ledger.len(), 1);
        assert_eq!(fixture.registry.len(), 1);
    }

    #[test]
    fn test_historical_validity_survives_registry_changes() {
        let fixture = TestLedger::new();
        let (clerk_id, clerk) = fixture.add_validator("clerk@county", 11);
        let (auditor_id, auditor) = fixture.add_validator("auditor@state", 12);

        fixture
            .submit("vote_cast", "alice", "clerk@county", &clerk)
            .unwrap();
        fixture
            .submit("audit_opened", "auditor@state", "auditor@state", &auditor)
            .unwrap();

        fixture.registry.deactivate(clerk_id).unwrap();
        fixture.registry.deactivate(auditor_id).unwrap();
        fixture.registry.activate(clerk_id).unwrap();
        fixture
            .submit("vote_cast", "bob", "clerk@county", &clerk)
            .unwrap();

        let first = verifier(&fixture).verify_full();
        fixture.registry.deactivate(clerk_id).unwrap();
        let second = verifier(&fixture).verify_full();

        assert!(first.is_valid());
        assert_eq!(first, second);
    }

    #[test]
    fn test_term_limit_style_audit() {
        let fixture = TestLedger::new();
        let (_, clerk) = fixture.add_validator("clerk@county", 11);
        for _ in 0..2 {
            fixture
                .submit("term_started", "mayor-jones", "clerk@county", &clerk)
                .unwrap();
            fixture.submit_founder("vote_cast", "alice");
        }

        let audit = AuditQueryService::new(fixture.ledger.clone());
        let terms = audit.find_by_action_type("term_started", TimeRange::all());
        assert_eq!(terms.len(), 2);
        assert!(terms.iter().all(|p| p.submitter_identity == "mayor-jones"));
        assert!(terms[0].sequence_index < terms[1].sequence_index);
        assert!(audit.has_record("mayor-jones", "term_started", TimeRange::all()));
        assert_eq!(audit.find_by_signer("clerk@county").len(), 2);
    }
}
