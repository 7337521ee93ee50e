use anchor_lang::prelude::*;
use bridge_committee::{AttestorConfig, ID as COMMITTEE_PROGRAM_ID};

use crate::state::MintAuthorityConfig;

#[derive(Accounts)]
pub struct InitializeMintAuthority<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    /// Committee config on this chain; the mint authority adopts its chain id
    #[account(
        seeds = [b"attestor_config"],
        bump = attestor_config.bump,
        seeds::program = COMMITTEE_PROGRAM_ID
    )]
    pub attestor_config: Account<'info, AttestorConfig>,

    #[account(
        init,
        payer = admin,
        space = 8 + MintAuthorityConfig::INIT_SPACE,
        seeds = [b"mint_config"],
        bump
    )]
    pub mint_config: Account<'info, MintAuthorityConfig>,

    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<InitializeMintAuthority>) -> Result<()> {
    let mint_config = &mut ctx.accounts.mint_config;
    mint_config.admin = ctx.accounts.admin.key();
    mint_config.chain_id = ctx.accounts.attestor_config.chain_id;
    mint_config.bump = ctx.bumps.mint_config;

    msg!("Mint authority initialized");
    msg!("Admin: {}", mint_config.admin);
    msg!("Chain: {}", mint_config.chain_id);

    Ok(())
}
