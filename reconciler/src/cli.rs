use std::path::PathBuf;

use clap::Parser;

use bridge_reconciler::DEFAULT_MAX_STALENESS_SECS;

#[derive(Parser, Debug)]
#[command(author, version, about = "Cross-chain solvency check for the collateral bridge", long_about = None)]
pub struct Cli {
    /// JSON file with one snapshot per chain
    #[arg(long, env = "BRIDGE_SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Asset mint on its source chain (base58)
    #[arg(long, env = "BRIDGE_ASSET")]
    pub asset: String,

    /// Evaluate at this unix time instead of the wall clock
    #[arg(long, env = "BRIDGE_NOW")]
    pub now: Option<i64>,

    /// Snapshots older than this contribute no locked collateral
    #[arg(long, env = "BRIDGE_MAX_STALENESS_SECS", default_value_t = DEFAULT_MAX_STALENESS_SECS)]
    pub max_staleness_secs: i64,
}
