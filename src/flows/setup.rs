//! Issue the two test tokens: mints, the caller's associated accounts,
//! on-chain metadata and initial supply.
//!
//! Each step is its own transaction, confirmed before the next one is sent.
//! Confirmed steps are never rolled back; re-running after a partial
//! failure skips associated accounts that already exist but always creates
//! fresh mints.

use mpl_token_metadata::instructions::CreateV1Builder;
use mpl_token_metadata::types::TokenStandard;
use solana_sdk::instruction::Instruction;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_system_interface::instruction as system_instruction;
use spl_associated_token_account::instruction::create_associated_token_account;
use spl_token::state::Mint;

use crate::client::SwapClient;
use crate::error::{Result, SwapClientError};
use crate::pda;
use crate::storage::TokenMetadataDocument;
use crate::tx;
use crate::validate::{self, MAX_DECIMALS};

/// Fee floor assumed per transaction when checking the payer can afford the
/// whole sequence (0.005 SOL, matching typical priority-fee headroom).
const TX_FEE_FLOOR_LAMPORTS: u64 = 5_000_000;

/// Mints+ATAs, metadata A, metadata B, mint-to.
const PLANNED_TRANSACTIONS: u64 = 4;

/// Attempts for each metadata-attachment transaction; transient failures
/// get a refreshed blockhash per attempt.
const METADATA_ATTACH_ATTEMPTS: u32 = 3;

/// Everything needed to issue one token.
#[derive(Debug, Clone)]
pub struct TokenSpec {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub image: Vec<u8>,
    pub image_file_name: String,
    pub image_content_type: String,
}

#[derive(Debug, Clone)]
pub struct SetupRequest {
    pub token_a: TokenSpec,
    pub token_b: TokenSpec,
    /// Display amount of token A to mint to the caller.
    pub token_a_amount: f64,
    /// Display amount of token B to mint to the caller.
    pub token_b_amount: f64,
}

#[derive(Debug, Clone)]
pub struct SetupOutcome {
    pub token_a_mint: Pubkey,
    pub token_b_mint: Pubkey,
    pub token_a_account: Pubkey,
    pub token_b_account: Pubkey,
    pub signatures: Vec<Signature>,
}

impl SwapClient {
    pub async fn setup(&self, request: SetupRequest) -> Result<SetupOutcome> {
        let _gate = self.gates.setup.enter("setup")?;

        // Input validation, before any network call.
        for spec in [&request.token_a, &request.token_b] {
            if spec.decimals > MAX_DECIMALS {
                return Err(SwapClientError::DecimalsOutOfRange(spec.decimals as u32));
            }
            if spec.name.trim().is_empty() || spec.symbol.trim().is_empty() {
                return Err(SwapClientError::InvalidInput(
                    "token name and symbol must not be empty".to_string(),
                ));
            }
        }
        validate::require_positive(request.token_a_amount, "token A amount")?;
        validate::require_positive(request.token_b_amount, "token B amount")?;
        let amount_a =
            validate::to_base_units(request.token_a_amount, request.token_a.decimals, "token A amount")?;
        let amount_b =
            validate::to_base_units(request.token_b_amount, request.token_b.decimals, "token B amount")?;
        let storage = self.storage()?;

        let payer = self.payer();

        // The payer funds four transactions plus rent; refuse early rather
        // than fail half way through.
        self.report("Checking SOL balance...");
        let balance = self.rpc.get_balance(&payer).await?;
        let need = TX_FEE_FLOOR_LAMPORTS * PLANNED_TRANSACTIONS;
        if balance < need {
            return Err(SwapClientError::InsufficientSolBalance { have: balance, need });
        }

        // Off-chain uploads happen before anything touches the chain, so a
        // storage failure leaves no partial on-chain state behind.
        self.report("Uploading token images and metadata...");
        let uri_a = self.upload_token_metadata(storage, &request.token_a).await?;
        let uri_b = self.upload_token_metadata(storage, &request.token_b).await?;

        let mint_a = Keypair::new();
        let mint_b = Keypair::new();
        let token_a_mint = mint_a.pubkey();
        let token_b_mint = mint_b.pubkey();
        let token_a_account = pda::derive_associated_token_address(&payer, &token_a_mint);
        let token_b_account = pda::derive_associated_token_address(&payer, &token_b_mint);

        let mut signatures = Vec::with_capacity(PLANNED_TRANSACTIONS as usize);

        // Transaction 1: both mints plus the payer's associated accounts.
        self.report("Creating mints and token accounts...");
        let rent = self
            .rpc
            .minimum_balance_for_rent_exemption(Mint::LEN)
            .await?;
        let mut creation = vec![
            system_instruction::create_account(
                &payer,
                &token_a_mint,
                rent,
                Mint::LEN as u64,
                &spl_token::ID,
            ),
            initialize_mint(&token_a_mint, &payer, request.token_a.decimals)?,
            system_instruction::create_account(
                &payer,
                &token_b_mint,
                rent,
                Mint::LEN as u64,
                &spl_token::ID,
            ),
            initialize_mint(&token_b_mint, &payer, request.token_b.decimals)?,
        ];
        // Skip associated accounts that already exist so a retried setup
        // does not fail on its own leftovers.
        for (ata, mint) in [
            (token_a_account, token_a_mint),
            (token_b_account, token_b_mint),
        ] {
            if self.rpc.get_account(&ata).await?.is_none() {
                creation.push(create_associated_token_account(
                    &payer,
                    &payer,
                    &mint,
                    &spl_token::ID,
                ));
            } else {
                log::debug!("associated token account {ata} already exists, skipping");
            }
        }
        signatures.push(
            tx::send_instructions(
                self.rpc.as_ref(),
                self.wallet.as_ref(),
                &[&mint_a, &mint_b],
                &creation,
            )
            .await
            .map_err(|e| step_failed("create mints and token accounts", e))?,
        );

        // Transactions 2 and 3: attach metadata, with a bounded retry.
        for (label, mint, spec, uri) in [
            ("token A", &token_a_mint, &request.token_a, &uri_a),
            ("token B", &token_b_mint, &request.token_b, &uri_b),
        ] {
            self.report(&format!("Attaching {label} metadata..."));
            let instruction = metadata_instruction(&payer, mint, spec, uri);
            signatures.push(
                tx::send_instructions_with_retry(
                    self.rpc.as_ref(),
                    self.wallet.as_ref(),
                    &[instruction],
                    METADATA_ATTACH_ATTEMPTS,
                )
                .await
                .map_err(|e| step_failed("attach metadata", e))?,
            );
        }

        // Transaction 4: mint the initial supply to the payer.
        self.report("Minting initial supply...");
        let minting = vec![
            mint_to(&token_a_mint, &token_a_account, &payer, amount_a)?,
            mint_to(&token_b_mint, &token_b_account, &payer, amount_b)?,
        ];
        signatures.push(
            tx::send_instructions(self.rpc.as_ref(), self.wallet.as_ref(), &[], &minting)
                .await
                .map_err(|e| step_failed("mint initial supply", e))?,
        );

        self.report(&format!(
            "Setup complete. Token A mint {token_a_mint}, token B mint {token_b_mint}"
        ));
        Ok(SetupOutcome {
            token_a_mint,
            token_b_mint,
            token_a_account,
            token_b_account,
            signatures,
        })
    }

    async fn upload_token_metadata(
        &self,
        storage: &dyn crate::storage::StorageClient,
        spec: &TokenSpec,
    ) -> Result<String> {
        let image_uri = storage
            .pin_image(
                spec.image.clone(),
                &spec.image_file_name,
                &spec.image_content_type,
            )
            .await?;
        storage
            .pin_metadata(&TokenMetadataDocument {
                name: spec.name.clone(),
                symbol: spec.symbol.clone(),
                image: image_uri,
            })
            .await
    }
}

fn initialize_mint(mint: &Pubkey, authority: &Pubkey, decimals: u8) -> Result<Instruction> {
    spl_token::instruction::initialize_mint2(&spl_token::ID, mint, authority, None, decimals)
        .map_err(|e| SwapClientError::InvalidInput(e.to_string()))
}

fn mint_to(mint: &Pubkey, destination: &Pubkey, authority: &Pubkey, amount: u64) -> Result<Instruction> {
    spl_token::instruction::mint_to(&spl_token::ID, mint, destination, authority, &[], amount)
        .map_err(|e| SwapClientError::InvalidInput(e.to_string()))
}

fn metadata_instruction(payer: &Pubkey, mint: &Pubkey, spec: &TokenSpec, uri: &str) -> Instruction {
    CreateV1Builder::new()
        .metadata(pda::derive_metadata_address(mint))
        .mint(*mint, false)
        .authority(*payer)
        .payer(*payer)
        .update_authority(*payer, true)
        .is_mutable(true)
        .name(spec.name.clone())
        .symbol(spec.symbol.clone())
        .uri(uri.to_string())
        .seller_fee_basis_points(0)
        .token_standard(TokenStandard::Fungible)
        .decimals(spec.decimals)
        .instruction()
}

fn step_failed(step: &str, err: SwapClientError) -> SwapClientError {
    match err {
        // Program rejects keep their structure; everything else gets the
        // failing step attached for the status display.
        SwapClientError::ProgramRejected(_) | SwapClientError::MetadataAttachFailed { .. } => err,
        other => SwapClientError::Confirmation(format!("failed to {step}: {other}")),
    }
}
