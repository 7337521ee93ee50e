use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use bridge_committee::BridgeError;

use crate::state::{AssetVault, VaultConfig};

/// Open custody for one asset. The custody token account is a PDA whose
/// authority is the asset vault PDA, so only `release` can move funds out.
#[derive(Accounts)]
pub struct RegisterAsset<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        seeds = [b"vault_config"],
        bump = vault_config.bump,
        has_one = admin @ BridgeError::Unauthorized
    )]
    pub vault_config: Account<'info, VaultConfig>,

    pub asset_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = admin,
        space = 8 + AssetVault::INIT_SPACE,
        seeds = [AssetVault::SEED_PREFIX, asset_mint.key().as_ref()],
        bump
    )]
    pub asset_vault: Account<'info, AssetVault>,

    #[account(
        init,
        payer = admin,
        seeds = [b"custody", asset_mint.key().as_ref()],
        bump,
        token::mint = asset_mint,
        token::authority = asset_vault
    )]
    pub custody: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

pub fn handler(ctx: Context<RegisterAsset>) -> Result<()> {
    let asset_vault = &mut ctx.accounts.asset_vault;
    asset_vault.asset = ctx.accounts.asset_mint.key();
    asset_vault.custody = ctx.accounts.custody.key();
    asset_vault.locked_total = 0;
    asset_vault.released_total = 0;
    asset_vault.lock_sequence = 0;
    asset_vault.bump = ctx.bumps.asset_vault;

    msg!("Asset registered: {}", asset_vault.asset);
    msg!("Custody: {}", asset_vault.custody);

    Ok(())
}
