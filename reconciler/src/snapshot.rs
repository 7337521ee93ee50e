//! Per-chain views of vault and ledger accounts, as the reconciler reads them.

use anchor_lang::prelude::Pubkey;
use anchor_lang::AccountDeserialize;
use bridge_mint::MintLedger;
use bridge_vault::AssetVault;
use serde::{Deserialize, Serialize};

use crate::error::{ReconcilerError, Result};

/// Base58 strings in JSON instead of byte arrays
pub mod pubkey_string {
    use std::str::FromStr;

    use anchor_lang::prelude::Pubkey;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(key: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&key.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(|_| de::Error::custom(format!("invalid pubkey {s:?}")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultView {
    #[serde(with = "pubkey_string")]
    pub asset: Pubkey,
    pub locked_total: u64,
    pub released_total: u64,
}

impl VaultView {
    pub fn outstanding(&self) -> u64 {
        self.locked_total.saturating_sub(self.released_total)
    }
}

impl From<&AssetVault> for VaultView {
    fn from(vault: &AssetVault) -> Self {
        Self {
            asset: vault.asset,
            locked_total: vault.locked_total,
            released_total: vault.released_total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerView {
    pub source_chain: u64,
    #[serde(with = "pubkey_string")]
    pub asset: Pubkey,
    pub minted_total: u64,
}

impl From<&MintLedger> for LedgerView {
    fn from(ledger: &MintLedger) -> Self {
        Self {
            source_chain: ledger.source_chain,
            asset: ledger.asset,
            minted_total: ledger.minted_total,
        }
    }
}

/// State of one chain at `observed_at`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain_id: u64,
    pub observed_at: i64,
    #[serde(default)]
    pub vaults: Vec<VaultView>,
    #[serde(default)]
    pub ledgers: Vec<LedgerView>,
    /// Raw `AssetVault` / `MintLedger` account data, hex encoded, as
    /// fetched from the chain
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<String>,
}

impl ChainSnapshot {
    pub fn new(chain_id: u64, observed_at: i64) -> Self {
        Self {
            chain_id,
            observed_at,
            ..Default::default()
        }
    }

    /// Decode `accounts` into typed views; the account discriminator picks
    /// the type
    pub fn decode_accounts(&mut self) -> Result<()> {
        for (index, encoded) in self.accounts.drain(..).enumerate() {
            let data = hex::decode(encoded.trim_start_matches("0x"))?;

            if let Ok(vault) = AssetVault::try_deserialize(&mut data.as_slice()) {
                self.vaults.push(VaultView::from(&vault));
            } else if let Ok(ledger) = MintLedger::try_deserialize(&mut data.as_slice()) {
                self.ledgers.push(LedgerView::from(&ledger));
            } else {
                return Err(ReconcilerError::UnknownAccount {
                    chain_id: self.chain_id,
                    index,
                });
            }
        }
        Ok(())
    }
}

/// Top-level JSON document read by the CLI
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotFile {
    pub snapshots: Vec<ChainSnapshot>,
}

impl SnapshotFile {
    pub fn from_json(json: &str) -> Result<Self> {
        let mut file: SnapshotFile = serde_json::from_str(json)?;
        for snapshot in &mut file.snapshots {
            snapshot.decode_accounts()?;
        }
        Ok(file)
    }

    pub fn load(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| ReconcilerError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}
