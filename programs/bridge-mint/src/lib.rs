use anchor_lang::prelude::*;

pub mod instructions;
pub mod state;
pub mod token_accounting;

use instructions::*;
use bridge_committee::{MintAuthorization, SettlementAuthorization};
pub use state::{MintAuthorityConfig, MintContext, MintLedger, MintRecord, WithdrawClaim};
pub use token_accounting::BurnProof;

declare_id!("8kmoPKtLAjjzQRN5i4emUsmWeu3LM5yPWFrsqZVyekhk");

#[program]
pub mod bridge_mint {
    use super::*;

    /// Initialize the mint authority for this chain (call once)
    pub fn initialize_mint_authority(ctx: Context<InitializeMintAuthority>) -> Result<()> {
        instructions::initialize::handler(ctx)
    }

    /// Create the ledger and wrapped mint for a (source_chain, asset)
    pub fn register_ledger(ctx: Context<RegisterLedger>, params: RegisterLedgerParams) -> Result<()> {
        instructions::register_ledger::handler(ctx, params)
    }

    pub fn set_safety_margin(
        ctx: Context<SetSafetyMargin>,
        source_chain: u64,
        asset: Pubkey,
        safety_margin: u64,
    ) -> Result<()> {
        instructions::register_ledger::set_safety_margin(ctx, source_chain, asset, safety_margin)
    }

    /// Mint wrapped supply against a committee-signed request
    pub fn request_mint(ctx: Context<RequestMint>, request: MintAuthorization) -> Result<()> {
        instructions::request_mint::handler(ctx, request)
    }

    /// Burn wrapped supply and open a withdraw claim; returns the withdraw id
    pub fn initiate_withdraw(
        ctx: Context<InitiateWithdraw>,
        source_chain: u64,
        asset: Pubkey,
        amount: u64,
        recipient: Pubkey,
    ) -> Result<u64> {
        instructions::initiate_withdraw::handler(ctx, source_chain, asset, amount, recipient)
    }

    /// Mark a withdraw claim claimed after the source vault released it
    pub fn settle_withdraw(ctx: Context<SettleWithdraw>, settlement: SettlementAuthorization) -> Result<()> {
        instructions::settle_withdraw::handler(ctx, settlement)
    }

    /// Create token metadata using the ledger PDA authority
    pub fn create_metadata(
        ctx: Context<CreateMetadata>,
        source_chain: u64,
        asset: Pubkey,
        name: String,
        symbol: String,
        uri: String,
    ) -> Result<()> {
        instructions::create_metadata::handler(ctx, source_chain, asset, name, symbol, uri)
    }
}
