//! Command-line surface.

use cl_01_validator_registry::ValidatorId;
use cl_04_integrity_verification::CheckpointId;
use clap::{Args, Parser, Subcommand};
use shared_types::Timestamp;
use std::path::PathBuf;

/// Civic-Ledger operator tool
#[derive(Parser, Debug)]
#[command(name = "ledger-admin", version)]
#[command(about = "Operate a Civic-Ledger data directory")]
pub struct Cli {
    /// Ledger data directory (overrides CL_DATA_DIR)
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a key pair and write the private key to a file
    Keygen {
        #[arg(long)]
        out: PathBuf,
    },
    /// Create the genesis page and enroll the founder
    Init(InitArgs),
    /// Register a validator
    Register {
        #[arg(long)]
        identity: String,
        /// Hex-encoded Ed25519 public key
        #[arg(long)]
        public_key: String,
        #[arg(long, default_value = "clerk")]
        tag: String,
    },
    /// Re-activate a validator
    Activate { id: ValidatorId },
    /// Deactivate a validator; its past pages stay valid
    Deactivate { id: ValidatorId },
    /// Replace a validator's public key from now on
    RotateKey {
        id: ValidatorId,
        #[arg(long)]
        public_key: String,
    },
    /// List validators
    Validators,
    /// Append a signed record
    Submit(SubmitArgs),
    /// Close every aggregate whose threshold is reached
    RollUp,
    /// Verify the whole ledger, or everything after a checkpoint
    Verify {
        /// Checkpoint as `<level>:<position>`, e.g. `chapter:3`
        #[arg(long, value_parser = parse_checkpoint)]
        from: Option<CheckpointId>,
    },
    /// Search pages
    Query(QueryArgs),
    /// Print one page
    Show { index: u64 },
    /// Summarize the data directory
    Status,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    #[arg(long)]
    pub founder: String,
    /// Founder private key; generated here if the file does not exist
    #[arg(long)]
    pub key_file: PathBuf,
    #[arg(long)]
    pub chain_name: Option<String>,
}

#[derive(Args, Debug)]
pub struct SubmitArgs {
    #[arg(long)]
    pub action: String,
    #[arg(long)]
    pub submitter: String,
    #[arg(long)]
    pub signer: String,
    /// Signer's private key file
    #[arg(long)]
    pub key_file: PathBuf,
    /// JSON payload
    #[arg(long, default_value = "{}")]
    pub payload: String,
}

#[derive(Args, Debug, Default)]
pub struct QueryArgs {
    /// Submitter identity
    #[arg(long)]
    pub actor: Option<String>,
    #[arg(long)]
    pub signer: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
    /// Inclusive lower bound, microseconds since the epoch
    #[arg(long)]
    pub since: Option<Timestamp>,
    /// Exclusive upper bound, microseconds since the epoch
    #[arg(long)]
    pub until: Option<Timestamp>,
    /// Print only the number of matches
    #[arg(long)]
    pub count: bool,
}

pub fn parse_checkpoint(s: &str) -> Result<CheckpointId, String> {
    let (level, position) = s
        .split_once(':')
        .ok_or_else(|| format!("expected <level>:<position>, got {:?}", s))?;
    let position = position
        .parse()
        .map_err(|_| format!("invalid position {:?}", position))?;
    Ok(CheckpointId::new(level.parse()?, position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cl_03_hierarchical_aggregation::Level;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_checkpoint() {
        assert_eq!(
            parse_checkpoint("book:2"),
            Ok(CheckpointId::new(Level::Book, 2))
        );
        assert!(parse_checkpoint("book").is_err());
        assert!(parse_checkpoint("shelf:1").is_err());
        assert!(parse_checkpoint("chapter:x").is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ledger-admin",
            "verify",
            "--from",
            "chapter:0",
            "--json",
            "-d",
            "/tmp/ledger",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/ledger")));
        assert!(matches!(cli.command, Command::Verify { from: Some(_) }));
    }
}
