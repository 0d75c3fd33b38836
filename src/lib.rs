//! Client SDK for the token-swap escrow program.
//!
//! The on-chain program escrows an amount of token A inside a vault owned by
//! an offer record, and releases it atomically when a taker pays the wanted
//! amount of token B. This crate is the off-chain side of that lifecycle:
//! deterministic address derivation, pre-flight account validation,
//! transaction construction and sequencing, and offer discovery — everything
//! a wallet-holding caller needs to mint test tokens, post an offer and take
//! one.
//!
//! The escrow program itself, the RPC node and the wallet are external
//! collaborators. They are reached only through their public seams
//! ([`ChainRpc`], [`WalletSigner`], [`StorageClient`]), which keeps every
//! flow testable against scripted doubles.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use swap_client::{MakeOfferRequest, SwapClient, SwapConfig};
//! use solana_sdk::signature::Keypair;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SwapConfig::from_env()?;
//!     let wallet = Arc::new(Keypair::new()); // use your funded keypair
//!     let client = SwapClient::new(config, wallet)?;
//!
//!     let outcome = client
//!         .make_offer(MakeOfferRequest {
//!             token_mint_a: "So11111111111111111111111111111111111111112".into(),
//!             token_mint_b: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".into(),
//!             token_a_amount: 1.5,
//!             token_b_wanted_amount: 200.0,
//!             offer_id: None,
//!         })
//!         .await?;
//!     println!("offer {} created: {}", outcome.offer_id, outcome.signature);
//!
//!     for offer in client.list_offers().await? {
//!         println!("{} offers {} A for {} B", offer.maker, offer.token_a_ui_amount, offer.token_b_ui_amount);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod flows;
pub mod instructions;
pub mod pda;
pub mod rpc;
pub mod state;
pub mod status;
pub mod storage;
pub mod tx;
pub mod validate;
pub mod wallet;

#[cfg(test)]
mod tests;

pub use client::SwapClient;
pub use config::{StorageConfig, SwapConfig};
pub use error::{ProgramRejection, Result, SwapClientError};
pub use flows::make_offer::{MakeOfferOutcome, MakeOfferRequest};
pub use flows::setup::{SetupOutcome, SetupRequest, TokenSpec};
pub use flows::take_offer::{TakeOfferOutcome, TakeOfferRequest};
pub use rpc::{ChainRpc, SolanaRpc};
pub use state::{Offer, OfferSummary};
pub use status::{NullSink, StatusSink};
pub use storage::{PinataClient, StorageClient, TokenMetadataDocument};
pub use wallet::WalletSigner;

/// Decimal count assumed for a mint whose on-chain record cannot be read.
pub const DEFAULT_DECIMALS: u8 = 9;
