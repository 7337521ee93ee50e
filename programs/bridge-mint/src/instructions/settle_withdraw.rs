use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::ID as IX_SYSVAR_ID;
use bridge_committee::ed25519_utils::load_signed_messages;
use bridge_committee::{CommitteeSet, SettlementAuthorization, ID as COMMITTEE_PROGRAM_ID};

use crate::state::{MintAuthorityConfig, WithdrawClaim};

/// Close out a withdraw claim once the source-chain vault has released it
///
/// Transaction layout:
/// [0..n] Ed25519Program.verify(signer_i, signing_bytes(SettlementAuthorization))
/// [n]    BridgeMint.settle_withdraw(settlement)  <- We are here
#[derive(Accounts)]
#[instruction(settlement: SettlementAuthorization)]
pub struct SettleWithdraw<'info> {
    pub relayer: Signer<'info>,

    #[account(
        seeds = [b"mint_config"],
        bump = mint_config.bump
    )]
    pub mint_config: Account<'info, MintAuthorityConfig>,

    #[account(
        seeds = [b"committee_set"],
        bump = committee_set.bump,
        seeds::program = COMMITTEE_PROGRAM_ID
    )]
    pub committee_set: Account<'info, CommitteeSet>,

    #[account(
        mut,
        seeds = [
            WithdrawClaim::SEED_PREFIX,
            settlement.source_chain.to_le_bytes().as_ref(),
            settlement.asset.as_ref(),
            settlement.withdraw_id.to_le_bytes().as_ref()
        ],
        bump = withdraw_claim.bump
    )]
    pub withdraw_claim: Account<'info, WithdrawClaim>,

    /// CHECK: address constrained to the instructions sysvar
    #[account(address = IX_SYSVAR_ID)]
    pub instructions: AccountInfo<'info>,
}

pub fn handler(ctx: Context<SettleWithdraw>, settlement: SettlementAuthorization) -> Result<()> {
    msg!("📬 Settling withdraw {}", settlement.withdraw_id);

    let signed = load_signed_messages(&ctx.accounts.instructions)?;

    let withdraw_claim = &mut ctx.accounts.withdraw_claim;
    withdraw_claim.authorize_settlement(
        ctx.accounts.mint_config.chain_id,
        &settlement,
        &signed,
        &ctx.accounts.committee_set,
    )?;
    withdraw_claim.settle(Clock::get()?.unix_timestamp);

    emit!(WithdrawSettled {
        withdraw_id: settlement.withdraw_id,
        source_chain: settlement.source_chain,
        asset: settlement.asset,
        amount: settlement.amount,
    });

    msg!("✅ Withdraw {} claimed", settlement.withdraw_id);
    Ok(())
}

#[event]
pub struct WithdrawSettled {
    pub withdraw_id: u64,
    pub source_chain: u64,
    pub asset: Pubkey,
    pub amount: u64,
}
