//! Off-chain metadata storage. Images and metadata JSON are pinned to a
//! Pinata-style IPFS API; the returned content hash becomes the URI the
//! on-chain metadata record points at.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;
use crate::error::{Result, SwapClientError};

const PIN_FILE_URL: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";
const PIN_JSON_URL: &str = "https://api.pinata.cloud/pinning/pinJSONToIPFS";
const GATEWAY_BASE: &str = "https://gateway.pinata.cloud/ipfs";

/// Token metadata document, shaped the way wallets expect it.
#[derive(Debug, Clone, Serialize)]
pub struct TokenMetadataDocument {
    pub name: String,
    pub symbol: String,
    pub image: String,
}

#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Pin raw image bytes, returning a retrievable URI.
    async fn pin_image(&self, bytes: Vec<u8>, file_name: &str, content_type: &str)
        -> Result<String>;

    /// Pin a metadata document, returning a retrievable URI.
    async fn pin_metadata(&self, document: &TokenMetadataDocument) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

pub struct PinataClient {
    http: reqwest::Client,
    config: StorageConfig,
}

impl PinataClient {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn gateway_uri(hash: &str) -> String {
        format!("{GATEWAY_BASE}/{hash}")
    }

    async fn read_pin_response(response: reqwest::Response) -> Result<String> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SwapClientError::Storage(format!(
                "pin request failed with {status}: {body}"
            )));
        }
        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|e| SwapClientError::Storage(e.to_string()))?;
        Ok(Self::gateway_uri(&pinned.ipfs_hash))
    }
}

#[async_trait]
impl StorageClient for PinataClient {
    async fn pin_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| SwapClientError::Storage(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(PIN_FILE_URL)
            .header("pinata_api_key", &self.config.api_key)
            .header("pinata_secret_api_key", &self.config.secret_api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SwapClientError::Storage(e.to_string()))?;
        Self::read_pin_response(response).await
    }

    async fn pin_metadata(&self, document: &TokenMetadataDocument) -> Result<String> {
        let response = self
            .http
            .post(PIN_JSON_URL)
            .header("pinata_api_key", &self.config.api_key)
            .header("pinata_secret_api_key", &self.config.secret_api_key)
            .json(document)
            .send()
            .await
            .map_err(|e| SwapClientError::Storage(e.to_string()))?;
        Self::read_pin_response(response).await
    }
}
