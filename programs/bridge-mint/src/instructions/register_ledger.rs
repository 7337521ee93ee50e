use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token};
use bridge_committee::BridgeError;

use crate::state::{MintAuthorityConfig, MintLedger};

#[derive(AnchorSerialize, AnchorDeserialize, Clone)]
pub struct RegisterLedgerParams {
    pub source_chain: u64,

    /// Asset mint on the source chain
    pub asset: Pubkey,

    /// Decimals of the wrapped mint; should match the source asset
    pub decimals: u8,

    pub safety_margin: u64,
}

/// Create the ledger and its wrapped mint for one (source_chain, asset).
/// The ledger PDA is both mint and freeze authority.
#[derive(Accounts)]
#[instruction(params: RegisterLedgerParams)]
pub struct RegisterLedger<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        seeds = [b"mint_config"],
        bump = mint_config.bump,
        has_one = admin @ BridgeError::Unauthorized
    )]
    pub mint_config: Account<'info, MintAuthorityConfig>,

    #[account(
        init,
        payer = admin,
        space = 8 + MintLedger::INIT_SPACE,
        seeds = [
            MintLedger::SEED_PREFIX,
            params.source_chain.to_le_bytes().as_ref(),
            params.asset.as_ref()
        ],
        bump
    )]
    pub mint_ledger: Account<'info, MintLedger>,

    #[account(
        init,
        payer = admin,
        seeds = [
            b"wrapped_mint",
            params.source_chain.to_le_bytes().as_ref(),
            params.asset.as_ref()
        ],
        bump,
        mint::decimals = params.decimals,
        mint::authority = mint_ledger,
        mint::freeze_authority = mint_ledger
    )]
    pub wrapped_mint: Account<'info, Mint>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

#[derive(Accounts)]
#[instruction(source_chain: u64, asset: Pubkey)]
pub struct SetSafetyMargin<'info> {
    pub admin: Signer<'info>,

    #[account(
        seeds = [b"mint_config"],
        bump = mint_config.bump,
        has_one = admin @ BridgeError::Unauthorized
    )]
    pub mint_config: Account<'info, MintAuthorityConfig>,

    #[account(
        mut,
        seeds = [
            MintLedger::SEED_PREFIX,
            source_chain.to_le_bytes().as_ref(),
            asset.as_ref()
        ],
        bump = mint_ledger.bump
    )]
    pub mint_ledger: Account<'info, MintLedger>,
}

pub fn handler(ctx: Context<RegisterLedger>, params: RegisterLedgerParams) -> Result<()> {
    require!(
        params.source_chain != ctx.accounts.mint_config.chain_id,
        BridgeError::ChainBindingMismatch
    );

    let mint_ledger = &mut ctx.accounts.mint_ledger;
    mint_ledger.source_chain = params.source_chain;
    mint_ledger.asset = params.asset;
    mint_ledger.wrapped_mint = ctx.accounts.wrapped_mint.key();
    mint_ledger.minted_total = 0;
    mint_ledger.safety_margin = params.safety_margin;
    mint_ledger.next_withdraw_id = 1;
    mint_ledger.mints_processed = 0;
    mint_ledger.withdraws_opened = 0;
    mint_ledger.bump = ctx.bumps.mint_ledger;

    msg!("Ledger registered");
    msg!("Source chain: {}", mint_ledger.source_chain);
    msg!("Asset: {}", mint_ledger.asset);
    msg!("Wrapped mint: {}", mint_ledger.wrapped_mint);
    msg!("Safety margin: {}", mint_ledger.safety_margin);

    emit!(LedgerConfigured {
        source_chain: mint_ledger.source_chain,
        asset: mint_ledger.asset,
        wrapped_mint: mint_ledger.wrapped_mint,
        safety_margin: mint_ledger.safety_margin,
    });

    Ok(())
}

pub fn set_safety_margin(
    ctx: Context<SetSafetyMargin>,
    _source_chain: u64,
    _asset: Pubkey,
    safety_margin: u64,
) -> Result<()> {
    let mint_ledger = &mut ctx.accounts.mint_ledger;
    msg!("Safety margin {} -> {}", mint_ledger.safety_margin, safety_margin);
    mint_ledger.safety_margin = safety_margin;

    emit!(LedgerConfigured {
        source_chain: mint_ledger.source_chain,
        asset: mint_ledger.asset,
        wrapped_mint: mint_ledger.wrapped_mint,
        safety_margin,
    });

    Ok(())
}

#[event]
pub struct LedgerConfigured {
    pub source_chain: u64,
    pub asset: Pubkey,
    pub wrapped_mint: Pubkey,
    pub safety_margin: u64,
}
