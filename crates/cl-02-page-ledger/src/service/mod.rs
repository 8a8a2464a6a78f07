//! # Page Ledger Service
//!
//! The sole writer of pages.
//!
//! ## Concurrency
//!
//! - `writer` (`parking_lot::Mutex`) serializes admission: authorization,
//!   index assignment, signing, persistence and publication form one
//!   critical section.
//! - `committed` (`parking_lot::RwLock`) holds the published sequence.
//!   Readers clone an `Arc` and release the lock immediately.
//!
//! Lock order is always `writer` then registry then `committed`.


use cl_01_validator_registry::{ValidatorRegistry, ValidatorRegistryApi};
use parking_lot::{Mutex, RwLock};
use shared_crypto::{sign, PrivateKey};
use shared_types::{Hash, TimeSource, Timestamp, ZERO_HASH};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::adapters::{FilePageStore, InMemoryPageStore};
use crate::domain::config::LedgerConfig;
use crate::domain::errors::LedgerError;
use crate::domain::genesis::{GenesisParams, GenesisRecord};
use crate::domain::page::{Page, PageDraft, PageSeal, Payload, GENESIS_ACTION};
use crate::domain::snapshot::LedgerSnapshot;
use crate::ports::inbound::PageLedgerApi;
use crate::ports::outbound::PageStore;

/// Position, hash and time of the newest committed page.
#[derive(Debug, Clone, Copy)]
struct Tip {
    index: u64,
    hash: Hash,
    timestamp: Timestamp,
}

impl Tip {
    fn of(page: &Page) -> Self {
        Self {
            index: page.sequence_index,
            hash: page.page_hash,
            timestamp: page.timestamp,
        }
    }
}

struct WriterState {
    store: Box<dyn PageStore>,
    tip: Option<Tip>,
}

/// The Page Ledger.
pub struct LedgerService {
    writer: Mutex<WriterState>,
    committed: RwLock<Arc<Vec<Page>>>,
    registry: Arc<ValidatorRegistry>,
    config: LedgerConfig,
}

impl LedgerService {
    /// Open a ledger over `store`, loading the pages it already holds.
    ///
    /// Stored pages are not judged here; that is the integrity verifier's job.
    pub fn new(
        store: Box<dyn PageStore>,
        registry: Arc<ValidatorRegistry>,
        config: LedgerConfig,
    ) -> Result<Self, LedgerError> {
        let pages = store.load_all()?;

        // The next index follows the stored position, not the stored field.
        let tip = pages.last().map(|last| Tip {
            index: pages.len() as u64 - 1,
            hash: last.page_hash,
            timestamp: last.timestamp,
        });

        if let Some(newest) = pages.iter().map(|page| page.timestamp).max() {
            registry.time_source().observe(newest);
        }

        info!("[cl-02] Ledger opened with {} pages", pages.len());

        Ok(Self {
            writer: Mutex::new(WriterState { store, tip }),
            committed: RwLock::new(Arc::new(pages)),
            registry,
            config,
        })
    }

    /// Empty ledger backed by memory.
    pub fn in_memory(registry: Arc<ValidatorRegistry>) -> Self {
        Self {
            writer: Mutex::new(WriterState {
                store: Box::new(InMemoryPageStore::new()),
                tip: None,
            }),
            committed: RwLock::new(Arc::new(Vec::new())),
            registry,
            config: LedgerConfig::default(),
        }
    }

    /// Ledger persisted in `<data_dir>/pages.log`. Takes the directory lock.
    pub fn open_dir(
        data_dir: &Path,
        registry: Arc<ValidatorRegistry>,
        config: LedgerConfig,
    ) -> Result<Self, LedgerError> {
        let store = FilePageStore::open(data_dir)?;
        Self::new(Box::new(store), registry, config)
    }

    pub fn registry(&self) -> &Arc<ValidatorRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn check_label(&self, field: &str, value: &str) -> Result<(), LedgerError> {
        if value.trim().is_empty() {
            return Err(LedgerError::InvalidRecord(format!("{} must not be empty", field)));
        }
        if value.len() > self.config.max_label_bytes {
            return Err(LedgerError::InvalidRecord(format!(
                "{} exceeds {} bytes",
                field, self.config.max_label_bytes
            )));
        }
        Ok(())
    }

    fn validate_record(
        &self,
        action_type: &str,
        payload: &Payload,
        submitter_identity: &str,
        signer_identity: &str,
    ) -> Result<(), LedgerError> {
        self.check_label("action type", action_type)?;
        self.check_label("submitter identity", submitter_identity)?;
        self.check_label("signer identity", signer_identity)?;

        if action_type == GENESIS_ACTION {
            return Err(LedgerError::InvalidRecord(
                "action type 'genesis' is reserved for page 0".to_string(),
            ));
        }
        if payload.len() > self.config.max_payload_bytes {
            return Err(LedgerError::InvalidRecord(format!(
                "payload of {} bytes exceeds limit of {}",
                payload.len(),
                self.config.max_payload_bytes
            )));
        }
        Ok(())
    }

    /// Persist and publish `page`. Caller holds the writer lock.
    fn commit(&self, writer: &mut WriterState, page: &Page) -> Result<(), LedgerError> {
        if let Err(e) = writer.store.append(page) {
            warn!(
                "[cl-02] ⚠️ Append of page {} failed, ledger unchanged: {}",
                page.sequence_index, e
            );
            return Err(LedgerError::Persistence(e));
        }
        writer.tip = Some(Tip::of(page));

        let mut committed = self.committed.write();
        Arc::make_mut(&mut committed).push(page.clone());
        Ok(())
    }
}

impl PageLedgerApi for LedgerService {
    fn create_genesis(&self, params: GenesisParams) -> Result<Page, LedgerError> {
        params.validate()?;

        let mut writer = self.writer.lock();
        if writer.tip.is_some() {
            return Err(LedgerError::GenesisAlreadyExists);
        }

        self.registry
            .register_founder(&params.founder_identity, params.founder_public_key)?;
        let grant = self
            .registry
            .authorize(&params.founder_identity)
            .map_err(|e| LedgerError::from_authorization(&params.founder_identity, e))?;

        let record = GenesisRecord::from_params(&params);
        let draft = PageDraft {
            sequence_index: 0,
            timestamp: grant.at,
            action_type: GENESIS_ACTION.to_string(),
            payload: record.encode()?,
            submitter_identity: params.founder_identity.clone(),
            signer_identity: params.founder_identity.clone(),
            prior_hash: ZERO_HASH,
        };
        let page = draft.seal(PageSeal::Genesis);

        self.commit(&mut writer, &page)?;
        info!(
            "[cl-02] 🌱 Genesis created for {} (founder {}, hash {})",
            record.network.chain_name,
            params.founder_identity,
            page.short_hash()
        );
        Ok(page)
    }

    fn submit(
        &self,
        action_type: &str,
        payload: Payload,
        submitter_identity: &str,
        signer_identity: &str,
        signing_key: &PrivateKey,
    ) -> Result<Page, LedgerError> {
        self.validate_record(action_type, &payload, submitter_identity, signer_identity)?;

        let mut writer = self.writer.lock();
        let tip = writer.tip.ok_or(LedgerError::LedgerNotInitialized)?;

        let grant = self
            .registry
            .authorize(signer_identity)
            .map_err(|e| LedgerError::from_authorization(signer_identity, e))?;

        if signing_key.public_key() != grant.public_key {
            return Err(LedgerError::KeyMismatch {
                identity: signer_identity.to_string(),
            });
        }
        if grant.at <= tip.timestamp {
            return Err(LedgerError::ClockRegression {
                tip: tip.timestamp,
                now: grant.at,
            });
        }

        let draft = PageDraft {
            sequence_index: tip.index + 1,
            timestamp: grant.at,
            action_type: action_type.to_string(),
            payload,
            submitter_identity: submitter_identity.to_string(),
            signer_identity: signer_identity.to_string(),
            prior_hash: tip.hash,
        };
        let signature = sign(signing_key, &draft.content_bytes())?;
        let page = draft.seal(PageSeal::Signed(signature));

        self.commit(&mut writer, &page)?;
        debug!(
            "[cl-02] ✅ Page {} admitted ({} by {}, signer {}, hash {})",
            page.sequence_index,
            page.action_type,
            page.submitter_identity,
            page.signer_identity,
            page.short_hash()
        );
        Ok(page)
    }

    fn len(&self) -> u64 {
        self.committed.read().len() as u64
    }

    fn page(&self, index: u64) -> Option<Page> {
        let pages = self.committed.read();
        usize::try_from(index).ok().and_then(|i| pages.get(i).cloned())
    }

    fn latest(&self) -> Option<Page> {
        self.committed.read().last().cloned()
    }

    fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::new(Arc::clone(&*self.committed.read()))
    }

    fn genesis_record(&self) -> Result<Option<GenesisRecord>, LedgerError> {
        let snapshot = self.snapshot();
        match snapshot.genesis() {
            Some(page) if page.is_genesis() => GenesisRecord::decode(&page.payload).map(Some),
            Some(_) => Err(LedgerError::InvalidGenesis(
                "page 0 is not sealed as genesis".to_string(),
            )),
            None => Ok(None),
        }
    }
}
