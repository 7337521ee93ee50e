use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::ID as IX_SYSVAR_ID;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};
use bridge_committee::ed25519_utils::load_signed_messages;
use bridge_committee::{BridgeError, CommitteeSet, ReleaseAuthorization, ID as COMMITTEE_PROGRAM_ID};

use crate::state::{AssetVault, ReleaseReceipt, VaultConfig};

/// Release collateral for a withdraw claim opened on `claim.dest_chain`
///
/// Transaction layout:
/// [0..n] Ed25519Program.verify(signer_i, signing_bytes(ReleaseAuthorization))
/// [n]    BridgeVault.release(claim)  <- We are here
#[derive(Accounts)]
#[instruction(claim: ReleaseAuthorization)]
pub struct Release<'info> {
    /// Relayer paying for the receipt; carries no authority
    #[account(mut)]
    pub relayer: Signer<'info>,

    #[account(
        seeds = [b"vault_config"],
        bump = vault_config.bump
    )]
    pub vault_config: Account<'info, VaultConfig>,

    #[account(
        seeds = [b"committee_set"],
        bump = committee_set.bump,
        seeds::program = COMMITTEE_PROGRAM_ID
    )]
    pub committee_set: Account<'info, CommitteeSet>,

    #[account(
        mut,
        seeds = [AssetVault::SEED_PREFIX, claim.asset.as_ref()],
        bump = asset_vault.bump,
        has_one = custody @ BridgeError::AssetMismatch
    )]
    pub asset_vault: Account<'info, AssetVault>,

    #[account(mut)]
    pub custody: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = recipient_token_account.owner == claim.recipient @ BridgeError::Unauthorized,
        constraint = recipient_token_account.mint == claim.asset @ BridgeError::AssetMismatch,
    )]
    pub recipient_token_account: Account<'info, TokenAccount>,

    /// Seeds: ["release_receipt", asset, dest_chain, withdraw_id]
    #[account(
        init_if_needed,
        payer = relayer,
        space = 8 + ReleaseReceipt::INIT_SPACE,
        seeds = [
            ReleaseReceipt::SEED_PREFIX,
            claim.asset.as_ref(),
            claim.dest_chain.to_le_bytes().as_ref(),
            claim.withdraw_id.to_le_bytes().as_ref()
        ],
        bump
    )]
    pub release_receipt: Account<'info, ReleaseReceipt>,

    /// CHECK: address constrained to the instructions sysvar
    #[account(address = IX_SYSVAR_ID)]
    pub instructions: AccountInfo<'info>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

pub fn handler(ctx: Context<Release>, claim: ReleaseAuthorization) -> Result<()> {
    msg!("🔓 Release request");
    msg!("   Withdraw: {} (from chain {})", claim.withdraw_id, claim.dest_chain);
    msg!("   Asset: {}", claim.asset);
    msg!("   Amount: {}", claim.amount);
    msg!("   Recipient: {}", claim.recipient);

    let signed = load_signed_messages(&ctx.accounts.instructions)?;
    let chain_id = ctx.accounts.vault_config.chain_id;

    ctx.accounts.asset_vault.authorize_release(
        chain_id,
        &ctx.accounts.release_receipt,
        &claim,
        &signed,
        &ctx.accounts.committee_set,
    )?;

    let asset_vault_bump = ctx.accounts.asset_vault.bump;
    token::transfer(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.custody.to_account_info(),
                to: ctx.accounts.recipient_token_account.to_account_info(),
                authority: ctx.accounts.asset_vault.to_account_info(),
            },
            &[&[
                AssetVault::SEED_PREFIX,
                claim.asset.as_ref(),
                &[asset_vault_bump],
            ]],
        ),
        claim.amount,
    )?;

    let now = Clock::get()?.unix_timestamp;
    let asset_vault = &mut ctx.accounts.asset_vault;
    let release_receipt = &mut ctx.accounts.release_receipt;
    asset_vault.commit_release(release_receipt, &claim, now)?;
    release_receipt.bump = ctx.bumps.release_receipt;

    emit!(CollateralReleased {
        withdraw_id: claim.withdraw_id,
        dest_chain: claim.dest_chain,
        source_chain: claim.source_chain,
        asset: claim.asset,
        amount: claim.amount,
        recipient: claim.recipient,
        outstanding: asset_vault.outstanding(),
    });

    msg!("✅ Released {} (outstanding: {})", claim.amount, asset_vault.outstanding());
    Ok(())
}

#[event]
pub struct CollateralReleased {
    pub withdraw_id: u64,
    pub dest_chain: u64,
    pub source_chain: u64,
    pub asset: Pubkey,
    pub amount: u64,
    pub recipient: Pubkey,
    pub outstanding: u64,
}
