use anchor_lang::prelude::*;
use anchor_spl::token::{self, Mint, Token, TokenAccount, Transfer};
use bridge_committee::BridgeError;

use crate::state::{AssetVault, DepositHandle, DepositRecord, VaultConfig};

#[derive(Accounts)]
pub struct Lock<'info> {
    #[account(mut)]
    pub locker: Signer<'info>,

    #[account(
        seeds = [b"vault_config"],
        bump = vault_config.bump
    )]
    pub vault_config: Account<'info, VaultConfig>,

    #[account(
        mut,
        seeds = [AssetVault::SEED_PREFIX, asset_mint.key().as_ref()],
        bump = asset_vault.bump,
        has_one = custody @ BridgeError::AssetMismatch
    )]
    pub asset_vault: Account<'info, AssetVault>,

    pub asset_mint: Account<'info, Mint>,

    #[account(mut)]
    pub custody: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = locker_token_account.owner == locker.key() @ BridgeError::Unauthorized,
        constraint = locker_token_account.mint == asset_mint.key() @ BridgeError::AssetMismatch,
    )]
    pub locker_token_account: Account<'info, TokenAccount>,

    /// Seeds: ["deposit", asset, sequence]
    #[account(
        init,
        payer = locker,
        space = 8 + DepositRecord::INIT_SPACE,
        seeds = [
            b"deposit",
            asset_mint.key().as_ref(),
            asset_vault.lock_sequence.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub deposit_record: Account<'info, DepositRecord>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

/// Move `amount` of the asset into custody and record the deposit.
///
/// A failed transfer aborts the transaction, so the vault totals and the
/// deposit record are never left describing collateral that did not move.
pub fn handler(ctx: Context<Lock>, amount: u64) -> Result<DepositHandle> {
    let chain_id = ctx.accounts.vault_config.chain_id;
    let locker = ctx.accounts.locker.key();

    let handle = ctx
        .accounts
        .asset_vault
        .record_lock(chain_id, &locker, amount)?;

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.locker_token_account.to_account_info(),
                to: ctx.accounts.custody.to_account_info(),
                authority: ctx.accounts.locker.to_account_info(),
            },
        ),
        amount,
    )?;

    let deposit_record = &mut ctx.accounts.deposit_record;
    deposit_record.chain_id = chain_id;
    deposit_record.asset = ctx.accounts.asset_mint.key();
    deposit_record.locker = locker;
    deposit_record.amount = amount;
    deposit_record.sequence = handle.sequence;
    deposit_record.locked_at = Clock::get()?.unix_timestamp;
    deposit_record.record_hash = handle.record_hash;
    deposit_record.bump = ctx.bumps.deposit_record;

    emit!(CollateralLocked {
        chain_id,
        asset: deposit_record.asset,
        locker,
        amount,
        sequence: handle.sequence,
        record_hash: handle.record_hash,
        locked_total: ctx.accounts.asset_vault.locked_total,
    });

    msg!(
        "🔒 Locked {} from {} (sequence: {}, hash: {:?})",
        amount,
        locker,
        handle.sequence,
        handle.record_hash
    );

    Ok(handle)
}

/// Deposit observed by the committee
#[event]
pub struct CollateralLocked {
    pub chain_id: u64,
    pub asset: Pubkey,
    pub locker: Pubkey,
    pub amount: u64,
    pub sequence: u64,
    pub record_hash: [u8; 32],
    pub locked_total: u64,
}
