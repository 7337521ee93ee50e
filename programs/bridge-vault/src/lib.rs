use anchor_lang::prelude::*;

pub mod instructions;
pub mod state;

use instructions::*;
use bridge_committee::ReleaseAuthorization;
pub use bridge_committee::DOMAIN_SEPARATOR;
pub use state::{AssetVault, DepositHandle, DepositRecord, ReleaseReceipt, VaultConfig};

declare_id!("2ktujS2t9SRXE9cA4UVQJyDFH9genNR4GngfmGffjKkp");

#[program]
pub mod bridge_vault {
    use super::*;

    /// Initialize the vault for this chain (call once)
    pub fn initialize_vault(ctx: Context<InitializeVault>) -> Result<()> {
        instructions::initialize_vault::handler(ctx)
    }

    /// Open custody for an asset mint
    pub fn register_asset(ctx: Context<RegisterAsset>) -> Result<()> {
        instructions::register_asset::handler(ctx)
    }

    /// Lock collateral; returns the deposit sequence and record hash
    pub fn lock(ctx: Context<Lock>, amount: u64) -> Result<DepositHandle> {
        instructions::lock::handler(ctx, amount)
    }

    /// Release collateral against a committee-signed withdraw claim
    pub fn release(ctx: Context<Release>, claim: ReleaseAuthorization) -> Result<()> {
        instructions::release::handler(ctx, claim)
    }
}
