//! Post a new offer: escrow token A in the vault and record the terms.

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

use crate::client::SwapClient;
use crate::error::{Result, SwapClientError};
use crate::instructions::{self, MakeOfferAccounts, MakeOfferArgs};
use crate::pda;
use crate::tx;
use crate::validate;

#[derive(Debug, Clone)]
pub struct MakeOfferRequest {
    /// Mint of the token being escrowed, as typed by the user.
    pub token_mint_a: String,
    /// Mint of the token wanted in return.
    pub token_mint_b: String,
    /// Display amount of token A to escrow.
    pub token_a_amount: f64,
    /// Display amount of token B wanted.
    pub token_b_wanted_amount: f64,
    /// Explicit offer id. `None` probes for the smallest unused id, which
    /// costs one lookup per existing offer.
    pub offer_id: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct MakeOfferOutcome {
    /// The id used in the offer address derivation.
    pub offer_id: u64,
    pub offer_address: Pubkey,
    pub vault: Pubkey,
    pub signature: Signature,
}

impl SwapClient {
    pub async fn make_offer(&self, request: MakeOfferRequest) -> Result<MakeOfferOutcome> {
        let _gate = self.gates.make_offer.enter("make offer")?;

        // Input validation, before any network call.
        validate::require_positive(request.token_a_amount, "token A amount")?;
        validate::require_positive(request.token_b_wanted_amount, "token B wanted amount")?;
        let token_mint_a = validate::parse_pubkey(&request.token_mint_a, "token mint A")?;
        let token_mint_b = validate::parse_pubkey(&request.token_mint_b, "token mint B")?;
        if token_mint_a == token_mint_b {
            return Err(SwapClientError::InvalidInput(
                "token mint A and token mint B must differ".to_string(),
            ));
        }

        let maker = self.payer();
        let program_id = self.config.program_id;

        // Pre-flight reads: both mints must exist, and the maker's token A
        // account must be real, token-program-owned and funded.
        self.report("Checking mints and maker balance...");
        let mint_a_state = validate::expect_mint(self.rpc.as_ref(), &token_mint_a).await?;
        let mint_b_state = validate::expect_mint(self.rpc.as_ref(), &token_mint_b).await?;

        let token_a_offered_amount = validate::to_base_units(
            request.token_a_amount,
            mint_a_state.decimals,
            "token A amount",
        )?;
        let token_b_wanted_amount = validate::to_base_units(
            request.token_b_wanted_amount,
            mint_b_state.decimals,
            "token B wanted amount",
        )?;

        let maker_token_account_a = pda::derive_associated_token_address(&maker, &token_mint_a);
        let maker_ata_state =
            validate::expect_token_account(self.rpc.as_ref(), &maker_token_account_a, &token_mint_a)
                .await?;
        validate::require_token_balance(
            &maker_token_account_a,
            &maker_ata_state,
            token_a_offered_amount,
        )?;

        // Pick the offer id: explicit with a collision check, or the
        // smallest unused one.
        let offer_id = match request.offer_id {
            Some(id) => {
                let (offer, _bump) = pda::derive_offer_address(&program_id, &maker, id);
                if self.rpc.get_account(&offer).await?.is_some() {
                    return Err(SwapClientError::InvalidInput(format!(
                        "offer id {id} is already in use"
                    )));
                }
                id
            }
            None => {
                self.report("Finding the next unused offer id...");
                pda::next_offer_id(self.rpc.as_ref(), &program_id, &maker).await?
            }
        };

        let (offer_address, _bump) = pda::derive_offer_address(&program_id, &maker, offer_id);
        let vault = pda::derive_vault_address(&offer_address, &token_mint_a);

        self.report(&format!("Submitting offer {offer_id}..."));
        let instruction = instructions::make_offer(
            &program_id,
            MakeOfferAccounts {
                maker,
                token_mint_a,
                token_mint_b,
                maker_token_account_a,
                offer: offer_address,
                vault,
            },
            MakeOfferArgs {
                id: offer_id,
                token_a_offered_amount,
                token_b_wanted_amount,
            },
        );
        let signature =
            tx::send_instructions(self.rpc.as_ref(), self.wallet.as_ref(), &[], &[instruction])
                .await?;

        self.report(&format!("Offer {offer_id} created: {signature}"));
        Ok(MakeOfferOutcome {
            offer_id,
            offer_address,
            vault,
            signature,
        })
    }
}
