//! Accept an open offer: pay the wanted token B and drain the vault.

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use spl_associated_token_account::instruction::create_associated_token_account;

use crate::client::SwapClient;
use crate::error::{Result, SwapClientError};
use crate::instructions::{self, TakeOfferAccounts};
use crate::pda;
use crate::state::Offer;
use crate::tx;
use crate::validate;

#[derive(Debug, Clone)]
pub struct TakeOfferRequest {
    /// Maker address of the selected offer, as typed or copied by the user.
    pub maker: String,
    pub offer_id: u64,
    pub token_mint_a: String,
    pub token_mint_b: String,
}

#[derive(Debug, Clone)]
pub struct TakeOfferOutcome {
    pub offer_address: Pubkey,
    /// One signature normally; two when the transaction had to be split
    /// into account creation followed by the swap.
    pub signatures: Vec<Signature>,
    pub split: bool,
}

impl SwapClient {
    pub async fn take_offer(&self, request: TakeOfferRequest) -> Result<TakeOfferOutcome> {
        let _gate = self.gates.take_offer.enter("take offer")?;

        // Input validation, before any network call.
        let maker = validate::parse_pubkey(&request.maker, "maker")?;
        let token_mint_a = validate::parse_pubkey(&request.token_mint_a, "token mint A")?;
        let token_mint_b = validate::parse_pubkey(&request.token_mint_b, "token mint B")?;

        let taker = self.payer();
        let program_id = self.config.program_id;

        let (offer_address, _bump) =
            pda::derive_offer_address(&program_id, &maker, request.offer_id);
        let vault = pda::derive_vault_address(&offer_address, &token_mint_a);
        let taker_token_account_a = pda::derive_associated_token_address(&taker, &token_mint_a);
        let taker_token_account_b = pda::derive_associated_token_address(&taker, &token_mint_b);
        let maker_token_account_b = pda::derive_associated_token_address(&maker, &token_mint_b);

        // The offer record must exist, belong to the swap program and match
        // the selection the user made.
        self.report("Reading the offer record...");
        let offer_account = self
            .rpc
            .get_account(&offer_address)
            .await?
            .ok_or(SwapClientError::AccountMissing(offer_address))?;
        if offer_account.owner != program_id {
            return Err(SwapClientError::WrongAccountOwner {
                account: offer_address,
                owner: offer_account.owner,
                expected: program_id,
            });
        }
        let offer = Offer::try_decode(&offer_account.data).ok_or_else(|| {
            SwapClientError::InvalidInput(format!(
                "account {offer_address} is not a well-formed offer record"
            ))
        })?;
        if offer.maker != maker || offer.token_mint_a != token_mint_a
            || offer.token_mint_b != token_mint_b
        {
            return Err(SwapClientError::InvalidInput(
                "selected offer does not match its on-chain record".to_string(),
            ));
        }

        // The vault must be a live token account for mint A.
        validate::expect_token_account(self.rpc.as_ref(), &vault, &token_mint_a).await?;

        // The taker pays token B, so that account must exist and be funded.
        self.report("Checking taker balance...");
        let taker_ata_b_state =
            validate::expect_token_account(self.rpc.as_ref(), &taker_token_account_b, &token_mint_b)
                .await?;
        validate::require_token_balance(
            &taker_token_account_b,
            &taker_ata_b_state,
            offer.token_b_wanted_amount,
        )?;

        // The taker receives token A; create that account in the same
        // transaction when it does not exist yet.
        let mut prelude = Vec::new();
        if self.rpc.get_account(&taker_token_account_a).await?.is_none() {
            prelude.push(create_associated_token_account(
                &taker,
                &taker,
                &token_mint_a,
                &spl_token::ID,
            ));
        }

        let swap_instruction = instructions::take_offer(
            &program_id,
            TakeOfferAccounts {
                taker,
                maker,
                token_mint_a,
                token_mint_b,
                taker_token_account_a,
                taker_token_account_b,
                maker_token_account_b,
                offer: offer_address,
                vault,
            },
        );

        let mut combined = prelude.clone();
        combined.push(swap_instruction.clone());

        self.report("Submitting the swap...");
        let blockhash = self.rpc.latest_blockhash().await?;
        let combined_tx = tx::build_signed(&combined, self.wallet.as_ref(), &[], blockhash)?;
        let size = tx::serialized_size(&combined_tx)?;

        let (signatures, split) = if size <= self.config.tx_size_limit {
            let signature = self.rpc.send_and_confirm(&combined_tx).await?;
            (vec![signature], false)
        } else if prelude.is_empty() {
            return Err(SwapClientError::TransactionTooLarge {
                size,
                limit: self.config.tx_size_limit,
            });
        } else {
            // Too big in one piece: create the account first, then swap,
            // each with a fresh blockhash.
            self.report("Transaction too large; splitting into two...");
            let first =
                tx::send_instructions(self.rpc.as_ref(), self.wallet.as_ref(), &[], &prelude)
                    .await?;
            let second = tx::send_instructions(
                self.rpc.as_ref(),
                self.wallet.as_ref(),
                &[],
                &[swap_instruction],
            )
            .await?;
            (vec![first, second], true)
        };

        self.report(&format!(
            "Offer {} taken: {}",
            offer.id,
            signatures
                .last()
                .map(|s| s.to_string())
                .unwrap_or_default()
        ));
        Ok(TakeOfferOutcome {
            offer_address,
            signatures,
            split,
        })
    }
}
