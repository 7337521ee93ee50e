use anchor_lang::prelude::*;
use bridge_committee::{AttestorConfig, ID as COMMITTEE_PROGRAM_ID};

use crate::state::VaultConfig;

#[derive(Accounts)]
pub struct InitializeVault<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Committee config on this chain; the vault adopts its chain id
    #[account(
        seeds = [b"attestor_config"],
        bump = attestor_config.bump,
        seeds::program = COMMITTEE_PROGRAM_ID
    )]
    pub attestor_config: Account<'info, AttestorConfig>,

    #[account(
        init,
        payer = admin,
        space = 8 + VaultConfig::INIT_SPACE,
        seeds = [b"vault_config"],
        bump
    )]
    pub vault_config: Account<'info, VaultConfig>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitializeVault>) -> Result<()> {
    let vault_config = &mut ctx.accounts.vault_config;
    vault_config.admin = ctx.accounts.admin.key();
    vault_config.chain_id = ctx.accounts.attestor_config.chain_id;
    vault_config.bump = ctx.bumps.vault_config;

    msg!("Vault initialized");
    msg!("Admin: {}", vault_config.admin);
    msg!("Chain: {}", vault_config.chain_id);

    Ok(())
}
