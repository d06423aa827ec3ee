use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use args::Args;
use clap::Parser;
use log::{LevelFilter, error, info};
use tokio::sync::mpsc;

use rustedbytes_filebot::browser::utils::path_resolver::PathResolver;
use rustedbytes_filebot::console::{self, ConsoleMessenger};
use rustedbytes_filebot::server::{Server, ServerConfig};
use rustedbytes_filebot::transfer::TransferLimits;

mod args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    // Parsing degli argomenti da linea di comando
    let args = Args::parse();

    let requested = if args.drives.is_empty() {
        PathResolver::platform_drives()
    } else {
        args.drives.clone()
    };
    let drives = requested
        .iter()
        .map(|drive| canonical_drive(drive))
        .collect::<anyhow::Result<Vec<_>>>()?;
    if drives.is_empty() {
        bail!("No drives available");
    }
    for drive in &drives {
        info!("Drive: {:?}", drive);
    }

    if !args.progress_interval_secs.is_finite() || args.progress_interval_secs < 0.0 {
        bail!(
            "Invalid progress interval: {}",
            args.progress_interval_secs
        );
    }
    if args.page_size == 0 {
        bail!("Page size must be at least 1");
    }

    let limits = TransferLimits {
        max_size: args.max_transfer_size,
        threshold: args.progress_threshold,
        min_interval: Duration::from_secs_f64(args.progress_interval_secs),
    };
    info!("Max transfer size: {} bytes", limits.max_size);

    let config = ServerConfig {
        owner_id: args.owner_id,
        drives,
        page_size: args.page_size,
        max_handles: args.max_handles,
        limits,
    };

    tokio::fs::create_dir_all(&args.outbox)
        .await
        .with_context(|| format!("Failed to create outbox {:?}", args.outbox))?;
    let outbox = args
        .outbox
        .canonicalize()
        .with_context(|| format!("Failed to canonicalize outbox {:?}", args.outbox))?;
    info!("Outbox: {:?}", outbox);

    let messenger = Arc::new(ConsoleMessenger::new(outbox, args.chunk_size));
    let (events_tx, events_rx) = mpsc::channel(32);

    let owner = args.owner_id;
    tokio::spawn(async move {
        if let Err(e) = console::read_events(owner, events_tx).await {
            error!("{:#}", e);
        }
    });

    info!("Type /start to begin, /quit to exit");
    Server::new(config, messenger).run(events_rx).await;
    Ok(())
}

/// Ogni unità deve esistere ed essere una directory
fn canonical_drive(drive: &Path) -> anyhow::Result<PathBuf> {
    if !drive.exists() {
        bail!("Drive {:?} does not exist", drive);
    }
    if !drive.is_dir() {
        bail!("Drive {:?} is not a directory", drive);
    }
    drive
        .canonicalize()
        .with_context(|| format!("Failed to canonicalize drive {:?}", drive))
}
