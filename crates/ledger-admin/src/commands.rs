//! # Command Execution
//!
//! Each command writes its result to `out` so the whole CLI can be driven
//! from tests without a terminal.

use anyhow::{bail, Context, Result};
use cl_01_validator_registry::{Validator, ValidatorRegistryApi};
use cl_02_page_ledger::{GenesisParams, NetworkParams, Page, PageLedgerApi, Payload};
use cl_03_hierarchical_aggregation::{Aggregate, HierarchicalAggregationApi, Level};
use cl_04_integrity_verification::{IntegrityReport, IntegrityVerificationApi};
use cl_05_audit_query::{AuditFilter, AuditQueryApi};
use serde::Serialize;
use shared_crypto::keystore::{load_private_key, save_private_key};
use shared_crypto::{KeyPair, PublicKey};
use shared_types::{full_hex, TimeRange, Timestamp};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::cli::{Command, InitArgs, QueryArgs, SubmitArgs};
use crate::config::AdminConfig;
use crate::container::LedgerContainer;

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// `verify` found violations.
    IntegrityViolated,
}

/// Page as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub index: u64,
    pub timestamp: Timestamp,
    pub action_type: String,
    pub submitter: String,
    pub signer: String,
    pub genesis: bool,
    pub prior_hash: String,
    pub page_hash: String,
    pub payload: serde_json::Value,
}

impl From<&Page> for PageView {
    fn from(page: &Page) -> Self {
        let payload = page
            .payload
            .to_json()
            .unwrap_or_else(|_| serde_json::Value::String(hex::encode(page.payload.as_bytes())));
        Self {
            index: page.sequence_index,
            timestamp: page.timestamp,
            action_type: page.action_type.clone(),
            submitter: page.submitter_identity.clone(),
            signer: page.signer_identity.clone(),
            genesis: page.is_genesis(),
            prior_hash: full_hex(&page.prior_hash),
            page_hash: full_hex(&page.page_hash),
            payload,
        }
    }
}

#[derive(Debug, Serialize)]
struct StatusView {
    data_dir: String,
    pages: u64,
    chain_name: Option<String>,
    tip_hash: Option<String>,
    validators: usize,
    active_validators: usize,
    chapters: usize,
    books: usize,
    parts: usize,
    series: usize,
}

fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn print_page(out: &mut dyn Write, page: &Page) -> Result<()> {
    writeln!(
        out,
        "#{:<6} {} {:<20} submitter={} signer={} hash={}",
        page.sequence_index,
        page.timestamp,
        page.action_type,
        page.submitter_identity,
        page.signer_identity,
        page.short_hash()
    )?;
    Ok(())
}

fn print_pages(out: &mut dyn Write, json: bool, pages: &[Page]) -> Result<()> {
    if json {
        let views: Vec<PageView> = pages.iter().map(PageView::from).collect();
        return print_json(out, &views);
    }
    for page in pages {
        print_page(out, page)?;
    }
    Ok(())
}

fn print_validator(out: &mut dyn Write, v: &Validator) -> Result<()> {
    writeln!(
        out,
        "#{:<4} {:<32} {:<10} {:<8} key={}",
        v.id,
        v.identity,
        v.authority_tag,
        if v.is_active() { "active" } else { "inactive" },
        v.public_key().to_hex()
    )?;
    Ok(())
}

fn print_aggregates(out: &mut dyn Write, json: bool, closed: &[Aggregate]) -> Result<()> {
    if json {
        return print_json(out, closed);
    }
    if closed.is_empty() {
        writeln!(out, "Nothing to close")?;
    }
    for agg in closed {
        writeln!(
            out,
            "{} pages {}..={} ({} children) hash={}",
            agg.id(),
            agg.first_page,
            agg.last_page,
            agg.child_count(),
            agg.short_hash()
        )?;
    }
    Ok(())
}

fn print_report(out: &mut dyn Write, json: bool, report: &IntegrityReport) -> Result<Outcome> {
    if json {
        print_json(out, report)?;
    } else {
        for violation in &report.violations {
            writeln!(out, "VIOLATION {}", violation)?;
        }
        writeln!(
            out,
            "{}: {}",
            if report.is_valid() { "VALID" } else { "INVALID" },
            report
        )?;
    }
    Ok(if report.is_valid() {
        Outcome::Done
    } else {
        Outcome::IntegrityViolated
    })
}

fn parse_public_key(hex: &str) -> Result<PublicKey> {
    PublicKey::from_hex(hex).with_context(|| format!("Invalid public key {:?}", hex))
}

fn load_key(path: &Path) -> Result<KeyPair> {
    let private = load_private_key(path)
        .with_context(|| format!("Failed to load key from {}", path.display()))?;
    Ok(KeyPair::from_private(private))
}

/// Generate a key pair and write its private half to `path`.
pub fn keygen(path: &Path, out: &mut dyn Write) -> Result<KeyPair> {
    if path.exists() {
        bail!("Refusing to overwrite existing key file {}", path.display());
    }
    let keys = KeyPair::generate().context("Failed to generate key pair")?;
    save_private_key(path, keys.private_key())
        .with_context(|| format!("Failed to write key to {}", path.display()))?;
    writeln!(out, "{}", keys.public_key().to_hex())?;
    info!("[admin] 🔑 Wrote private key to {}", path.display());
    Ok(keys)
}

fn init(container: &LedgerContainer, args: &InitArgs, out: &mut dyn Write) -> Result<()> {
    let keys = if args.key_file.exists() {
        load_key(&args.key_file)?
    } else {
        keygen(&args.key_file, out)?
    };

    let mut params = GenesisParams::new(&args.founder, keys.public_key());
    if let Some(chain_name) = &args.chain_name {
        params = params.with_network(NetworkParams {
            chain_name: chain_name.clone(),
            ..NetworkParams::default()
        });
    }

    let page = container
        .ledger
        .create_genesis(params)
        .context("Failed to create genesis")?;
    writeln!(out, "Genesis created: {}", full_hex(&page.page_hash))?;
    Ok(())
}

fn submit(container: &LedgerContainer, args: &SubmitArgs, json: bool, out: &mut dyn Write) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(&args.payload).context("Payload is not valid JSON")?;
    let payload = Payload::from_json(&value)?;
    let keys = load_key(&args.key_file)?;

    let page = container
        .ledger
        .submit(
            &args.action,
            payload,
            &args.submitter,
            &args.signer,
            keys.private_key(),
        )
        .context("Submission rejected")?;
    print_pages(out, json, std::slice::from_ref(&page))
}

fn query(container: &LedgerContainer, args: &QueryArgs, json: bool, out: &mut dyn Write) -> Result<()> {
    let filter = AuditFilter {
        actor: args.actor.clone(),
        signer: args.signer.clone(),
        action_type: args.action.clone(),
        range: TimeRange {
            start: args.since,
            end: args.until,
        },
    };
    let audit = container.audit();

    if args.count {
        let count = audit.count(&filter);
        if json {
            print_json(out, &serde_json::json!({ "count": count }))?;
        } else {
            writeln!(out, "{}", count)?;
        }
        return Ok(());
    }
    print_pages(out, json, &audit.find(&filter))
}

fn status(container: &LedgerContainer, config: &AdminConfig, json: bool, out: &mut dyn Write) -> Result<()> {
    let snapshot = container.ledger.snapshot();
    let validators = container.registry.all();
    let agg = &container.aggregator;
    let view = StatusView {
        data_dir: config.data_dir.display().to_string(),
        pages: snapshot.len() as u64,
        chain_name: container
            .ledger
            .genesis_record()?
            .map(|record| record.network.chain_name),
        tip_hash: snapshot.tip().map(|p| full_hex(&p.page_hash)),
        validators: validators.len(),
        active_validators: validators.iter().filter(|v| v.is_active()).count(),
        chapters: agg.aggregates(Level::Chapter).len(),
        books: agg.aggregates(Level::Book).len(),
        parts: agg.aggregates(Level::Part).len(),
        series: agg.aggregates(Level::Series).len(),
    };

    if json {
        return print_json(out, &view);
    }
    writeln!(out, "Data directory: {}", view.data_dir)?;
    writeln!(out, "Chain:          {}", view.chain_name.as_deref().unwrap_or("(no genesis)"))?;
    writeln!(out, "Pages:          {}", view.pages)?;
    writeln!(out, "Tip:            {}", view.tip_hash.as_deref().unwrap_or("-"))?;
    writeln!(
        out,
        "Validators:     {} ({} active)",
        view.validators, view.active_validators
    )?;
    writeln!(
        out,
        "Aggregates:     {} chapters, {} books, {} parts, {} series",
        view.chapters, view.books, view.parts, view.series
    )?;
    Ok(())
}

/// Run one command against the data directory in `config`.
pub fn execute(
    command: &Command,
    config: &AdminConfig,
    json: bool,
    out: &mut dyn Write,
) -> Result<Outcome> {
    if let Command::Keygen { out: path } = command {
        keygen(path, out)?;
        return Ok(Outcome::Done);
    }

    let container = LedgerContainer::open(config)?;
    run(&container, command, config, json, out)
}

/// Run one command against an already opened container.
pub fn run(
    container: &LedgerContainer,
    command: &Command,
    config: &AdminConfig,
    json: bool,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let registry = &container.registry;

    match command {
        Command::Keygen { out: path } => {
            keygen(path, out)?;
        }
        Command::Init(args) => init(container, args, out)?,
        Command::Register {
            identity,
            public_key,
            tag,
        } => {
            let id = registry
                .register_validator(identity, parse_public_key(public_key)?, tag)
                .context("Registration failed")?;
            writeln!(out, "Registered {} as validator #{}", identity, id)?;
        }
        Command::Activate { id } => {
            registry.activate(*id).context("Activation failed")?;
            writeln!(out, "Validator #{} active", id)?;
        }
        Command::Deactivate { id } => {
            registry.deactivate(*id).context("Deactivation failed")?;
            writeln!(out, "Validator #{} inactive", id)?;
        }
        Command::RotateKey { id, public_key } => {
            registry
                .rotate_public_key(*id, parse_public_key(public_key)?)
                .context("Key rotation failed")?;
            writeln!(out, "Validator #{} key rotated", id)?;
        }
        Command::Validators => {
            let validators = registry.all();
            if json {
                print_json(out, &validators)?;
            } else {
                for v in &validators {
                    print_validator(out, v)?;
                }
            }
        }
        Command::Submit(args) => submit(container, args, json, out)?,
        Command::RollUp => {
            let closed = container.aggregator.roll_up().context("Roll-up failed")?;
            print_aggregates(out, json, &closed)?;
        }
        Command::Verify { from } => {
            let verifier = container.verifier();
            let report = match from {
                Some(checkpoint) => verifier.verify_from_checkpoint(*checkpoint)?,
                None => verifier.verify_full(),
            };
            return print_report(out, json, &report);
        }
        Command::Query(args) => query(container, args, json, out)?,
        Command::Show { index } => {
            let Some(page) = container.audit().page(*index) else {
                bail!("No page at index {}", index);
            };
            if json {
                print_json(out, &PageView::from(&page))?;
            } else {
                print_page(out, &page)?;
            }
        }
        Command::Status => status(container, config, json, out)?,
    }
    Ok(Outcome::Done)
}
