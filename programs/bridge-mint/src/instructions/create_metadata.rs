use anchor_lang::prelude::*;
use anchor_spl::token::Mint;
use bridge_committee::BridgeError;
use mpl_token_metadata::{
    ID as TOKEN_METADATA_PROGRAM_ID,
    instructions::CreateMetadataAccountV3CpiBuilder,
    types::DataV2,
};

use crate::state::{MintAuthorityConfig, MintLedger};

#[derive(Accounts)]
#[instruction(source_chain: u64, asset: Pubkey)]
pub struct CreateMetadata<'info> {
    #[account(
        seeds = [b"mint_config"],
        bump = mint_config.bump,
        has_one = admin @ BridgeError::Unauthorized
    )]
    pub mint_config: Account<'info, MintAuthorityConfig>,

    /// Mint and update authority of the wrapped mint
    #[account(
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

    /// CHECK: created by the token metadata program
    #[account(mut)]
    pub metadata: UncheckedAccount<'info>,

    pub admin: Signer<'info>,

    #[account(mut)]
    pub payer: Signer<'info>,

    /// CHECK: address constrained to the token metadata program
    #[account(address = TOKEN_METADATA_PROGRAM_ID)]
    pub token_metadata_program: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

/// Name the wrapped token, signing as the ledger PDA
pub fn handler(
    ctx: Context<CreateMetadata>,
    _source_chain: u64,
    _asset: Pubkey,
    name: String,
    symbol: String,
    uri: String,
) -> Result<()> {
    msg!("Creating wrapped token metadata");
    msg!("  Name: {}", name);
    msg!("  Symbol: {}", symbol);
    msg!("  URI: {}", uri);

    let mint_ledger = &ctx.accounts.mint_ledger;
    let source_chain_bytes = mint_ledger.source_chain.to_le_bytes();
    let bump_seed = [mint_ledger.bump];
    let ledger_seeds: &[&[u8]] = &[
        MintLedger::SEED_PREFIX,
        &source_chain_bytes,
        mint_ledger.asset.as_ref(),
        &bump_seed,
    ];

    CreateMetadataAccountV3CpiBuilder::new(&ctx.accounts.token_metadata_program.to_account_info())
        .metadata(&ctx.accounts.metadata.to_account_info())
        .mint(&ctx.accounts.wrapped_mint.to_account_info())
        .mint_authority(&mint_ledger.to_account_info())
        .payer(&ctx.accounts.payer.to_account_info())
        .update_authority(&mint_ledger.to_account_info(), true)
        .system_program(&ctx.accounts.system_program.to_account_info())
        .rent(Some(&ctx.accounts.rent.to_account_info()))
        .data(DataV2 {
            name,
            symbol,
            uri,
            seller_fee_basis_points: 0,
            creators: None,
            collection: None,
            uses: None,
        })
        .is_mutable(true)
        .invoke_signed(&[ledger_seeds])?;

    msg!("✅ Wrapped token metadata created");

    Ok(())
}
