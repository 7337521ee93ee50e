mod cli;

use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use anchor_lang::prelude::Pubkey;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bridge_reconciler::{Reconciler, ReconcilerConfig, ReconcilerError, SnapshotFile};
use cli::Cli;

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let asset = Pubkey::from_str(&cli.asset)
        .map_err(|_| ReconcilerError::InvalidPubkey(cli.asset.clone()))?;
    let now = match cli.now {
        Some(now) => now,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("system clock before unix epoch")?
            .as_secs() as i64,
    };

    let file = SnapshotFile::load(&cli.snapshot)?;
    info!(
        path = %cli.snapshot.display(),
        chains = file.snapshots.len(),
        now,
        max_staleness_secs = cli.max_staleness_secs,
        "loaded snapshots"
    );

    let reconciler = Reconciler::new(
        file.snapshots,
        ReconcilerConfig {
            max_staleness_secs: cli.max_staleness_secs,
            now,
        },
    )?;
    let report = reconciler.check(&asset);

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.solvent {
        std::process::exit(1);
    }
    Ok(())
}
