//! shardbox: partition a combined ERP export into monthly shards and
//! wrap each shard in password-derived authenticated encryption.
//!
//! The upstream fetch client deposits one gzip JSON file; `split` turns
//! it into `<out>/<YYYY>/<MM>.json.gz` shards, `encrypt` seals every
//! shard into a `.enc` sibling blob, and `plan` reports the fetch the
//! client should perform next (reading the shared `.last_sync` cursor).

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use shardbox_crypto::{decrypt_file, encrypt_tree};
use shardbox_partition::{partition, read_combined, write_shards};
use shardbox_sync::{plan, CursorStore, FileCursor, SyncMode, SyncPlan, DEFAULT_WINDOW_DAYS};
use std::path::{Path, PathBuf};

/// Environment variable holding the shared encryption password.
const PASSWORD_ENV: &str = "SHARDBOX_PASSWORD";

#[derive(Debug, Parser)]
#[command(
    name = "shardbox",
    about = "Partition and encrypt monthly data shards",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Split a combined gzip JSON dataset into monthly shards.
    Split {
        /// Combined dataset deposited by the fetch client.
        #[arg(long)]
        input: PathBuf,
        /// Root directory for `<YYYY>/<MM>.json.gz` shards.
        #[arg(long)]
        output: PathBuf,
    },
    /// Encrypt every shard under a directory into `.enc` blobs.
    Encrypt {
        /// Shard tree root.
        #[arg(long)]
        dir: PathBuf,
    },
    /// Decrypt one `.enc` blob back to its original file.
    Decrypt {
        /// Path of the encrypted blob.
        #[arg(long)]
        file: PathBuf,
    },
    /// Report the fetch plan for the upstream sync client.
    Plan {
        /// Data directory holding the `.last_sync` cursor.
        #[arg(long)]
        data_root: PathBuf,
        #[arg(long, value_enum, default_value = "incremental")]
        mode: ModeArg,
        /// Incremental lookback window in days.
        #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
        days: i64,
        /// Record a completed fetch by advancing the cursor to now.
        #[arg(long)]
        mark_synced: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Full,
    Incremental,
}

impl From<ModeArg> for SyncMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Full => SyncMode::Full,
            ModeArg::Incremental => SyncMode::Incremental,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Split { input, output } => run_split(&input, &output),
        Command::Encrypt { dir } => run_encrypt(&dir),
        Command::Decrypt { file } => run_decrypt(&file),
        Command::Plan {
            data_root,
            mode,
            days,
            mark_synced,
        } => run_plan(&data_root, mode.into(), days, mark_synced),
    }
}

fn run_split(input: &Path, output: &Path) -> Result<()> {
    let dataset = read_combined(input).context("reading combined dataset")?;
    let records_read = dataset.details.len();

    let result = partition(&dataset, input);
    let written = write_shards(&result.shards, output).context("writing shards")?;

    println!("records read:     {records_read}");
    println!("records skipped:  {}", result.skipped);
    println!("months:           {}", written.len());
    for shard in &written {
        println!(
            "  {}: {} records -> {} ({} bytes)",
            shard.key,
            shard.records,
            shard.path.display(),
            shard.bytes
        );
    }
    Ok(())
}

fn run_encrypt(dir: &Path) -> Result<()> {
    let password = password_from_env()?;
    let report = encrypt_tree(dir, &password).context("encrypting shard tree")?;

    println!("files encrypted:  {}", report.encrypted);
    println!("files failed:     {}", report.failed.len());
    for (path, reason) in &report.failed {
        println!("  {}: {reason}", path.display());
    }

    if !report.is_clean() {
        bail!(
            "{} of {} candidate files failed to encrypt",
            report.failed.len(),
            report.failed.len() + report.encrypted
        );
    }
    Ok(())
}

fn run_decrypt(file: &Path) -> Result<()> {
    let password = password_from_env()?;
    let out = decrypt_file(file, &password).context("decrypting blob")?;
    println!("decrypted -> {}", out.display());
    Ok(())
}

fn run_plan(data_root: &Path, mode: SyncMode, days: i64, mark_synced: bool) -> Result<()> {
    let cursor = FileCursor::in_data_root(data_root);
    let last_sync = cursor.read().context("reading sync cursor")?;
    let now = Utc::now();

    match plan(mode, last_sync, now, days) {
        SyncPlan::Full => println!("plan: full fetch"),
        SyncPlan::Incremental { cutoff } => {
            println!("plan: incremental fetch, cutoff {}", cutoff.to_rfc3339());
        }
    }
    match last_sync {
        Some(at) => println!("last sync: {}", at.to_rfc3339()),
        None => println!("last sync: never"),
    }

    if mark_synced {
        cursor.write(now).context("writing sync cursor")?;
        println!("cursor advanced to {}", now.to_rfc3339());
    }
    Ok(())
}

fn password_from_env() -> Result<String> {
    let password = std::env::var(PASSWORD_ENV)
        .with_context(|| format!("{PASSWORD_ENV} must be set (never hard-code the password)"))?;
    if password.is_empty() {
        bail!("{PASSWORD_ENV} is set but empty");
    }
    Ok(password)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
