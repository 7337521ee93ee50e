use anchor_lang::prelude::*;
use anchor_spl::token::{self, Burn, Mint, MintTo, Token, TokenAccount};

use crate::state::MintLedger;

/// Supply observation around a burn of the wrapped token
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct BurnProof {
    pub mint: Pubkey,
    pub burner: Pubkey,
    pub amount: u64,
    pub supply_before: u64,
    pub supply_after: u64,
}

impl BurnProof {
    /// Supply went down by exactly `amount`
    pub fn is_exact(&self) -> bool {
        self.supply_before.checked_sub(self.supply_after) == Some(self.amount)
    }
}

/// Mint wrapped supply with the ledger PDA as mint authority
pub fn mint_wrapped<'info>(
    token_program: &Program<'info, Token>,
    wrapped_mint: &Account<'info, Mint>,
    to: &Account<'info, TokenAccount>,
    mint_ledger: &Account<'info, MintLedger>,
    amount: u64,
) -> Result<()> {
    let source_chain_bytes = mint_ledger.source_chain.to_le_bytes();
    let bump_seed = [mint_ledger.bump];
    let ledger_seeds: &[&[u8]] = &[
        MintLedger::SEED_PREFIX,
        &source_chain_bytes,
        mint_ledger.asset.as_ref(),
        &bump_seed,
    ];

    token::mint_to(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            MintTo {
                mint: wrapped_mint.to_account_info(),
                to: to.to_account_info(),
                authority: mint_ledger.to_account_info(),
            },
            &[ledger_seeds],
        ),
        amount,
    )
}

/// Burn `amount` from the burner's account and report the supply change
/// the token program actually applied
pub fn burn_with_proof<'info>(
    token_program: &Program<'info, Token>,
    wrapped_mint: &mut Account<'info, Mint>,
    from: &Account<'info, TokenAccount>,
    burner: &Signer<'info>,
    amount: u64,
) -> Result<BurnProof> {
    let supply_before = wrapped_mint.supply;

    token::burn(
        CpiContext::new(
            token_program.to_account_info(),
            Burn {
                mint: wrapped_mint.to_account_info(),
                from: from.to_account_info(),
                authority: burner.to_account_info(),
            },
        ),
        amount,
    )?;

    wrapped_mint.reload()?;

    Ok(BurnProof {
        mint: wrapped_mint.key(),
        burner: burner.key(),
        amount,
        supply_before,
        supply_after: wrapped_mint.supply,
    })
}
