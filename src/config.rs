use std::env;
use std::str::FromStr;

use solana_sdk::packet::PACKET_DATA_SIZE;
use solana_sdk::pubkey::Pubkey;

use crate::error::{Result, SwapClientError};

/// Credentials for the off-chain metadata storage API.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub api_key: String,
    pub secret_api_key: String,
}

/// Client configuration. Read from the environment with [`SwapConfig::from_env`]
/// or built programmatically for tests.
#[derive(Debug, Clone)]
pub struct SwapConfig {
    /// RPC endpoint URL.
    pub rpc_url: String,
    /// Address of the deployed swap program.
    pub program_id: Pubkey,
    /// Serialized-transaction size ceiling; transactions above it are split.
    pub tx_size_limit: usize,
    /// Metadata storage credentials; only the setup flow needs them.
    pub storage: Option<StorageConfig>,
}

impl SwapConfig {
    pub fn new(rpc_url: impl Into<String>, program_id: Pubkey) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            program_id,
            tx_size_limit: PACKET_DATA_SIZE,
            storage: None,
        }
    }

    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn with_tx_size_limit(mut self, limit: usize) -> Self {
        self.tx_size_limit = limit;
        self
    }

    /// Environment variables: `SWAP_RPC_URL`, `SWAP_PROGRAM_ID`,
    /// `SWAP_TX_SIZE_LIMIT` (optional), `PINATA_API_KEY` and
    /// `PINATA_SECRET_API_KEY` (optional as a pair).
    pub fn from_env() -> Result<Self> {
        let rpc_url =
            env::var("SWAP_RPC_URL").map_err(|_| SwapClientError::MissingConfig("SWAP_RPC_URL"))?;
        let program_id = env::var("SWAP_PROGRAM_ID")
            .map_err(|_| SwapClientError::MissingConfig("SWAP_PROGRAM_ID"))?;
        let program_id = Pubkey::from_str(&program_id).map_err(|_| {
            SwapClientError::MalformedAddress {
                context: "SWAP_PROGRAM_ID",
                value: program_id,
            }
        })?;

        let tx_size_limit = match env::var("SWAP_TX_SIZE_LIMIT") {
            Ok(raw) => raw.parse::<usize>().map_err(|_| {
                SwapClientError::InvalidInput(format!("SWAP_TX_SIZE_LIMIT is not a number: {raw}"))
            })?,
            Err(_) => PACKET_DATA_SIZE,
        };

        let storage = match (env::var("PINATA_API_KEY"), env::var("PINATA_SECRET_API_KEY")) {
            (Ok(api_key), Ok(secret_api_key)) => Some(StorageConfig {
                api_key,
                secret_api_key,
            }),
            _ => None,
        };

        Ok(Self {
            rpc_url,
            program_id,
            tx_size_limit,
            storage,
        })
    }
}
