//! Read-only solvency check over per-chain snapshots of the bridge.
//!
//! For one asset, the collateral still locked in vaults must cover the
//! wrapped supply minted on every destination chain. Snapshots older than
//! the staleness bound contribute no collateral.

pub mod error;
pub mod snapshot;

use std::collections::BTreeMap;

use anchor_lang::prelude::Pubkey;
use serde::Serialize;
use tracing::{debug, error, info, warn};

pub use error::{ReconcilerError, Result};
pub use snapshot::{ChainSnapshot, LedgerView, SnapshotFile, VaultView};

pub use bridge_committee::config::DEFAULT_MAX_STALENESS_SECS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerConfig {
    pub max_staleness_secs: i64,
    /// Unix seconds the check is evaluated at
    pub now: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    /// Locked collateral on this chain was counted as zero
    StaleSnapshot {
        chain_id: u64,
        observed_at: i64,
        age_secs: i64,
        discounted: u64,
    },
    Insolvent {
        total_locked: u128,
        total_minted: u128,
        shortfall: u128,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SolvencyReport {
    #[serde(with = "snapshot::pubkey_string")]
    pub asset: Pubkey,
    pub per_chain_locked: BTreeMap<u64, u64>,
    pub per_chain_minted: BTreeMap<u64, u64>,
    pub total_locked: u128,
    pub total_minted: u128,
    pub solvent: bool,
    pub alerts: Vec<Alert>,
}

pub struct Reconciler {
    snapshots: Vec<ChainSnapshot>,
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(snapshots: Vec<ChainSnapshot>, config: ReconcilerConfig) -> Result<Self> {
        let mut seen = Vec::with_capacity(snapshots.len());
        for snapshot in &snapshots {
            if seen.contains(&snapshot.chain_id) {
                return Err(ReconcilerError::DuplicateChain(snapshot.chain_id));
            }
            seen.push(snapshot.chain_id);
        }
        Ok(Self { snapshots, config })
    }

    pub fn snapshots(&self) -> &[ChainSnapshot] {
        &self.snapshots
    }

    fn is_stale(&self, snapshot: &ChainSnapshot) -> bool {
        self.config.now.saturating_sub(snapshot.observed_at) > self.config.max_staleness_secs
    }

    /// Sum locked and minted totals for `asset` across every chain
    pub fn check(&self, asset: &Pubkey) -> SolvencyReport {
        let mut per_chain_locked = BTreeMap::new();
        let mut per_chain_minted = BTreeMap::new();
        let mut alerts = Vec::new();

        for snapshot in &self.snapshots {
            let locked: u64 = snapshot
                .vaults
                .iter()
                .filter(|vault| vault.asset == *asset)
                .map(VaultView::outstanding)
                .fold(0u64, u64::saturating_add);
            let minted: u64 = snapshot
                .ledgers
                .iter()
                .filter(|ledger| ledger.asset == *asset)
                .map(|ledger| ledger.minted_total)
                .fold(0u64, u64::saturating_add);

            let locked = if self.is_stale(snapshot) {
                let age_secs = self.config.now.saturating_sub(snapshot.observed_at);
                warn!(
                    chain_id = snapshot.chain_id,
                    observed_at = snapshot.observed_at,
                    age_secs,
                    discounted = locked,
                    "stale snapshot, locked collateral discounted to zero"
                );
                alerts.push(Alert::StaleSnapshot {
                    chain_id: snapshot.chain_id,
                    observed_at: snapshot.observed_at,
                    age_secs,
                    discounted: locked,
                });
                0
            } else {
                locked
            };

            debug!(chain_id = snapshot.chain_id, locked, minted, "chain totals");

            if locked > 0 || snapshot.vaults.iter().any(|v| v.asset == *asset) {
                per_chain_locked.insert(snapshot.chain_id, locked);
            }
            if minted > 0 || snapshot.ledgers.iter().any(|l| l.asset == *asset) {
                per_chain_minted.insert(snapshot.chain_id, minted);
            }
        }

        let total_locked: u128 = per_chain_locked.values().map(|v| *v as u128).sum();
        let total_minted: u128 = per_chain_minted.values().map(|v| *v as u128).sum();
        let solvent = total_minted <= total_locked;

        if solvent {
            info!(%asset, total_locked, total_minted, "bridge solvent");
        } else {
            let shortfall = total_minted - total_locked;
            error!(
                %asset,
                total_locked,
                total_minted,
                shortfall,
                "INSOLVENT: minted supply exceeds locked collateral"
            );
            alerts.push(Alert::Insolvent {
                total_locked,
                total_minted,
                shortfall,
            });
        }

        SolvencyReport {
            asset: *asset,
            per_chain_locked,
            per_chain_minted,
            total_locked,
            total_minted,
            solvent,
            alerts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHAIN_A: u64 = 1;
    const CHAIN_B: u64 = 2;
    const CHAIN_C: u64 = 3;

    fn config(now: i64) -> ReconcilerConfig {
        ReconcilerConfig {
            max_staleness_secs: 600,
            now,
        }
    }

    fn vault_chain(chain_id: u64, observed_at: i64, asset: Pubkey, locked: u64, released: u64) -> ChainSnapshot {
        let mut snapshot = ChainSnapshot::new(chain_id, observed_at);
        snapshot.vaults.push(VaultView {
            asset,
            locked_total: locked,
            released_total: released,
        });
        snapshot
    }

    fn ledger_chain(chain_id: u64, observed_at: i64, asset: Pubkey, minted: u64) -> ChainSnapshot {
        let mut snapshot = ChainSnapshot::new(chain_id, observed_at);
        snapshot.ledgers.push(LedgerView {
            source_chain: CHAIN_A,
            asset,
            minted_total: minted,
        });
        snapshot
    }

    #[test]
    fn test_solvent_across_two_destinations() {
        let asset = Pubkey::new_unique();
        let reconciler = Reconciler::new(
            vec![
                vault_chain(CHAIN_A, 1_000, asset, 1_500, 500),
                ledger_chain(CHAIN_B, 1_000, asset, 600),
                ledger_chain(CHAIN_C, 1_000, asset, 400),
            ],
            config(1_100),
        )
        .unwrap();

        let report = reconciler.check(&asset);
        assert!(report.solvent);
        assert!(report.alerts.is_empty());
        assert_eq!(report.per_chain_locked[&CHAIN_A], 1_000);
        assert_eq!(report.per_chain_minted[&CHAIN_B], 600);
        assert_eq!(report.per_chain_minted[&CHAIN_C], 400);
        assert_eq!(report.total_minted, 1_000);
    }

    #[test]
    fn test_insolvency_alert() {
        let asset = Pubkey::new_unique();
        let reconciler = Reconciler::new(
            vec![
                vault_chain(CHAIN_A, 1_000, asset, 1_000, 0),
                ledger_chain(CHAIN_B, 1_000, asset, 700),
                ledger_chain(CHAIN_C, 1_000, asset, 400),
            ],
            config(1_000),
        )
        .unwrap();

        let report = reconciler.check(&asset);
        assert!(!report.solvent);
        assert_eq!(
            report.alerts,
            vec![Alert::Insolvent {
                total_locked: 1_000,
                total_minted: 1_100,
                shortfall: 100,
            }]
        );
    }

    #[test]
    fn test_stale_vault_discounted() {
        let asset = Pubkey::new_unique();
        let snapshots = vec![
            vault_chain(CHAIN_A, 1_000, asset, 1_000, 0),
            ledger_chain(CHAIN_B, 1_600, asset, 1),
        ];

        // Exactly at the bound the collateral still counts
        let report = Reconciler::new(snapshots.clone(), config(1_600))
            .unwrap()
            .check(&asset);
        assert!(report.solvent);

        let report = Reconciler::new(snapshots, config(1_601)).unwrap().check(&asset);
        assert!(!report.solvent);
        assert_eq!(report.per_chain_locked[&CHAIN_A], 0);
        assert!(report.alerts.contains(&Alert::StaleSnapshot {
            chain_id: CHAIN_A,
            observed_at: 1_000,
            age_secs: 601,
            discounted: 1_000,
        }));
    }

    #[test]
    fn test_other_assets_ignored() {
        let asset = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let reconciler = Reconciler::new(
            vec![
                vault_chain(CHAIN_A, 1_000, asset, 10, 0),
                ledger_chain(CHAIN_B, 1_000, other, 1_000_000),
            ],
            config(1_000),
        )
        .unwrap();

        let report = reconciler.check(&asset);
        assert!(report.solvent);
        assert!(report.per_chain_minted.is_empty());
    }

    #[test]
    fn test_duplicate_chain_rejected() {
        let asset = Pubkey::new_unique();
        let result = Reconciler::new(
            vec![
                vault_chain(CHAIN_A, 1_000, asset, 10, 0),
                ledger_chain(CHAIN_A, 1_000, asset, 5),
            ],
            config(1_000),
        );
        assert!(matches!(result, Err(ReconcilerError::DuplicateChain(CHAIN_A))));
    }

    #[test]
    fn test_check_is_read_only() {
        let asset = Pubkey::new_unique();
        let snapshots = vec![vault_chain(CHAIN_A, 0, asset, 10, 0)];
        let reconciler = Reconciler::new(snapshots.clone(), config(10_000)).unwrap();

        reconciler.check(&asset);
        assert_eq!(reconciler.snapshots(), snapshots.as_slice());
    }
}
