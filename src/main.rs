//! CLI entry point for `invoicedrop`.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};

use invoicedrop::config::{self, Config};
use invoicedrop::drive::client::DriveClient;
use invoicedrop::fetch::fetch_attachments;
use invoicedrop::mail::criteria::SearchCriteria;
use invoicedrop::mail::session::ImapMailbox;
use invoicedrop::model::report::{FetchReport, SyncReport};
use invoicedrop::sync::sync_directory;

#[derive(Parser)]
#[command(
    name = "invoicedrop",
    version,
    about = "Fetch PDF attachments from a mailbox and sync them into a Google Drive folder"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file to use instead of the standard locations
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the mailbox and stage matching PDF attachments locally
    Fetch {
        /// Recipient address filter (TO)
        #[arg(long)]
        to: Option<String>,
        /// Subject substring filter
        #[arg(long)]
        subject: Option<String>,
        /// Earliest received date, YYYY-MM-DD
        #[arg(long, value_parser = parse_iso_date)]
        since: Option<NaiveDate>,
        /// Staging directory
        #[arg(short, long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Upload staged PDFs not already present in the Drive folder
    Sync {
        /// Staging directory
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// Drive folder name
        #[arg(long)]
        folder: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Run both stages: fetch, then sync
    Run {
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long, value_parser = parse_iso_date)]
        since: Option<NaiveDate>,
        #[arg(short, long)]
        dir: Option<PathBuf>,
        #[arg(long)]
        folder: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
    /// Generate a man page
    Manpage,
}

fn parse_iso_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("invalid date '{s}': {e}"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut cfg = config::load_config(cli.config.as_deref());

    // Configure logging: stderr + optional log file
    let log_level = match cli.verbose {
        0 => cfg.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    setup_logging(&log_level, &cfg);

    match cli.command {
        Commands::Fetch {
            to,
            subject,
            since,
            dir,
            json,
        } => {
            apply_filter_overrides(&mut cfg, to, subject, since, dir);
            cmd_fetch(&cfg, json)
        }
        Commands::Sync { dir, folder, json } => {
            if let Some(dir) = dir {
                cfg.local.dir = dir;
            }
            if let Some(folder) = folder {
                cfg.drive.folder = folder;
            }
            cmd_sync(&cfg, json)
        }
        Commands::Run {
            to,
            subject,
            since,
            dir,
            folder,
            json,
        } => {
            apply_filter_overrides(&mut cfg, to, subject, since, dir);
            if let Some(folder) = folder {
                cfg.drive.folder = folder;
            }
            cmd_fetch(&cfg, json)?;
            cmd_sync(&cfg, json)
        }
        Commands::Completions { shell } => cmd_completions(shell),
        Commands::Manpage => cmd_manpage(),
    }
}

fn apply_filter_overrides(
    cfg: &mut Config,
    to: Option<String>,
    subject: Option<String>,
    since: Option<NaiveDate>,
    dir: Option<PathBuf>,
) {
    if let Some(to) = to {
        cfg.filter.to = to;
    }
    if let Some(subject) = subject {
        cfg.filter.subject = subject;
    }
    if let Some(since) = since {
        cfg.filter.since = Some(since);
    }
    if let Some(dir) = dir {
        cfg.local.dir = dir;
    }
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, cfg: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // Try to set up file logging
    let log_dir = config::cache_dir(cfg);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "invoicedrop.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

/// Generate shell completions and print to stdout.
fn cmd_completions(shell: clap_complete::Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "invoicedrop", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
fn cmd_manpage() -> anyhow::Result<()> {
    let cmd = Cli::command();
    let man = clap_mangen::Man::new(cmd);
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}

/// Run the mailbox-scan stage against the live IMAP server.
fn cmd_fetch(cfg: &Config, json: bool) -> anyhow::Result<()> {
    let criteria = SearchCriteria::from_filter(&cfg.filter);
    let password = config::imap_password()?;

    let mut mailbox = ImapMailbox::connect(&cfg.imap, &password)?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Fetching [{bar:40.cyan/blue}] {pos}/{len} messages")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let result = fetch_attachments(
        &mut mailbox,
        &criteria,
        &cfg.local.dir,
        Some(&|current, total| {
            pb.set_length(total as u64);
            pb.set_position(current as u64);
        }),
    );
    pb.finish_and_clear();

    if let Err(e) = mailbox.logout() {
        tracing::warn!(error = %e, "IMAP logout failed");
    }

    let report = result?;
    if json {
        print_fetch_json(&report, &cfg.local.dir)?;
    } else {
        print_fetch_table(&report, &cfg.local.dir);
    }
    Ok(())
}

/// Run the cloud-sync stage against the live Drive API.
fn cmd_sync(cfg: &Config, json: bool) -> anyhow::Result<()> {
    let token = config::drive_token()?;
    let client = DriveClient::new(&cfg.drive, token)?;

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} Syncing [{bar:40.cyan/blue}] {pos}/{len} files")
            .expect("valid template")
            .progress_chars("#>-"),
    );

    let report = sync_directory(
        &client,
        &cfg.local.dir,
        &cfg.drive.folder,
        Some(&|current, total| {
            pb.set_length(total as u64);
            pb.set_position(current as u64);
        }),
    );
    pb.finish_and_clear();
    let report = report?;

    if json {
        print_sync_json(&report, &cfg.drive.folder)?;
    } else {
        print_sync_table(&report, &cfg.drive.folder);
    }

    if !report.failed.is_empty() {
        anyhow::bail!("{} file(s) failed to sync", report.failed.len());
    }
    Ok(())
}

/// Print the fetch summary in a human-readable table.
fn print_fetch_table(report: &FetchReport, dir: &Path) {
    println!();
    println!("  {:<22} {}", "Messages matched", report.matched);
    println!("  {:<22} {}", "PDFs saved", report.saved);
    println!("  {:<22} {}", "PDFs skipped", report.skipped);
    println!(
        "  {:<22} {}",
        "Bytes written",
        format_size(report.bytes_saved, BINARY)
    );
    println!("  {:<22} {}", "Staging dir", dir.display());
    println!();
}

/// Print the fetch summary as JSON.
fn print_fetch_json(report: &FetchReport, dir: &Path) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "stage": "fetch",
        "dir": dir.to_string_lossy(),
        "matched": report.matched,
        "saved": report.saved,
        "skipped": report.skipped,
        "bytes_saved": report.bytes_saved,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Print the sync summary in a human-readable table.
fn print_sync_table(report: &SyncReport, folder_name: &str) {
    let folder_state = if report.folder_created {
        "created"
    } else {
        "found"
    };

    println!();
    println!(
        "  {:<22} {} ({})",
        "Drive folder", folder_name, folder_state
    );
    println!("  {:<22} {}", "Folder ID", report.folder_id);
    println!("  {:<22} {}", "Uploaded", report.uploaded);
    println!("  {:<22} {}", "Skipped (duplicates)", report.skipped);
    println!(
        "  {:<22} {}",
        "Bytes uploaded",
        format_size(report.bytes_uploaded, BINARY)
    );

    if !report.failed.is_empty() {
        println!();
        println!("  Failed:");
        for failure in &report.failed {
            println!("    {:<30} {}", failure.filename, failure.reason);
        }
    }
    println!();
}

/// Print the sync summary as JSON.
fn print_sync_json(report: &SyncReport, folder_name: &str) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "stage": "sync",
        "folder": folder_name,
        "folder_id": report.folder_id,
        "folder_created": report.folder_created,
        "uploaded": report.uploaded,
        "skipped": report.skipped,
        "bytes_uploaded": report.bytes_uploaded,
        "failed": report.failed,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
