use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};
use bridge_committee::BridgeError;

use crate::state::{MintAuthorityConfig, MintLedger, WithdrawClaim};
use crate::token_accounting::burn_with_proof;

/// Burn wrapped supply and open a claim on the source chain's collateral
#[derive(Accounts)]
#[instruction(source_chain: u64, asset: Pubkey)]
pub struct InitiateWithdraw<'info> {
    #[account(mut)]
    pub burner: Signer<'info>,

    #[account(
        seeds = [b"mint_config"],
        bump = mint_config.bump
    )]
    pub mint_config: Account<'info, MintAuthorityConfig>,

    #[account(
        mut,
        seeds = [
            MintLedger::SEED_PREFIX,
            source_chain.to_le_bytes().as_ref(),
            asset.as_ref()
        ],
        bump = mint_ledger.bump,
        has_one = wrapped_mint @ BridgeError::AssetMismatch
    )]
    pub mint_ledger: Account<'info, MintLedger>,

    #[account(mut)]
    pub wrapped_mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = burner_token_account.owner == burner.key() @ BridgeError::Unauthorized,
        constraint = burner_token_account.mint == wrapped_mint.key() @ BridgeError::AssetMismatch,
    )]
    pub burner_token_account: Account<'info, TokenAccount>,

    /// Seeds: ["withdraw_claim", source_chain, asset, withdraw_id]
    ///
    /// The id comes from the ledger counter, so two identical calls open
    /// two distinct claims.
    #[account(
        init,
        payer = burner,
        space = 8 + WithdrawClaim::INIT_SPACE,
        seeds = [
            WithdrawClaim::SEED_PREFIX,
            source_chain.to_le_bytes().as_ref(),
            asset.as_ref(),
            mint_ledger.next_withdraw_id.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub withdraw_claim: Account<'info, WithdrawClaim>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(
    ctx: Context<InitiateWithdraw>,
    _source_chain: u64,
    _asset: Pubkey,
    amount: u64,
    recipient: Pubkey,
) -> Result<u64> {
    require!(amount > 0, BridgeError::InvalidAmount);

    msg!("🔥 Withdraw: burning {} from {}", amount, ctx.accounts.burner.key());

    let proof = burn_with_proof(
        &ctx.accounts.token_program,
        &mut ctx.accounts.wrapped_mint,
        &ctx.accounts.burner_token_account,
        &ctx.accounts.burner,
        amount,
    )?;

    msg!(
        "✓ Supply {} -> {}",
        proof.supply_before,
        proof.supply_after
    );

    let now = Clock::get()?.unix_timestamp;
    let chain_id = ctx.accounts.mint_config.chain_id;
    let mint_ledger = &mut ctx.accounts.mint_ledger;
    let withdraw_claim = &mut ctx.accounts.withdraw_claim;

    let withdraw_id = mint_ledger.open_withdraw(chain_id, &proof, recipient, now, withdraw_claim)?;
    withdraw_claim.bump = ctx.bumps.withdraw_claim;

    emit!(WithdrawInitiated {
        withdraw_id,
        dest_chain: chain_id,
        source_chain: withdraw_claim.source_chain,
        asset: withdraw_claim.asset,
        amount,
        burner: proof.burner,
        recipient,
        minted_total: mint_ledger.minted_total,
    });

    msg!("✅ Withdraw claim {} opened", withdraw_id);
    Ok(withdraw_id)
}

/// Burn observed by the committee; signs a ReleaseAuthorization from it
#[event]
pub struct WithdrawInitiated {
    pub withdraw_id: u64,
    pub dest_chain: u64,
    pub source_chain: u64,
    pub asset: Pubkey,
    pub amount: u64,
    pub burner: Pubkey,
    pub recipient: Pubkey,
    pub minted_total: u64,
}
