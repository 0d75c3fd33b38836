use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::SwapConfig;
use crate::error::{Result, SwapClientError};
use crate::rpc::{ChainRpc, SolanaRpc};
use crate::status::{NullSink, StatusSink};
use crate::storage::{PinataClient, StorageClient};
use crate::wallet::WalletSigner;

/// Client façade. One public async method per flow: `setup`, `make_offer`,
/// `take_offer`, `list_offers` (implemented in [`crate::flows`]).
pub struct SwapClient {
    pub(crate) config: SwapConfig,
    pub(crate) rpc: Arc<dyn ChainRpc>,
    pub(crate) wallet: Arc<dyn WalletSigner>,
    pub(crate) storage: Option<Arc<dyn StorageClient>>,
    pub(crate) status: Arc<dyn StatusSink>,
    pub(crate) gates: FlowGates,
}

impl SwapClient {
    /// Production wiring: nonblocking RPC at confirmed commitment, plus the
    /// Pinata storage client when credentials are configured.
    pub fn new(config: SwapConfig, wallet: Arc<dyn WalletSigner>) -> Result<Self> {
        let rpc: Arc<dyn ChainRpc> = Arc::new(SolanaRpc::new(config.rpc_url.clone()));
        let storage: Option<Arc<dyn StorageClient>> = config
            .storage
            .clone()
            .map(|creds| Arc::new(PinataClient::new(creds)) as Arc<dyn StorageClient>);
        Ok(Self {
            config,
            rpc,
            wallet,
            storage,
            status: Arc::new(NullSink),
            gates: FlowGates::default(),
        })
    }

    /// Dependency-injected wiring, used by tests to script every seam.
    pub fn with_parts(
        config: SwapConfig,
        rpc: Arc<dyn ChainRpc>,
        wallet: Arc<dyn WalletSigner>,
        storage: Option<Arc<dyn StorageClient>>,
    ) -> Self {
        Self {
            config,
            rpc,
            wallet,
            storage,
            status: Arc::new(NullSink),
            gates: FlowGates::default(),
        }
    }

    /// Route step-by-step progress messages to a caller-supplied sink.
    pub fn with_status(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.status = sink;
        self
    }

    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    /// The connected wallet's address, used as fee payer everywhere.
    pub fn payer(&self) -> solana_sdk::pubkey::Pubkey {
        self.wallet.pubkey()
    }

    pub(crate) fn report(&self, message: &str) {
        log::info!("{message}");
        self.status.status(message);
    }

    pub(crate) fn storage(&self) -> Result<&dyn StorageClient> {
        self.storage
            .as_deref()
            .ok_or(SwapClientError::MissingConfig("PINATA_API_KEY"))
    }
}

/// One in-flight flag per flow. A flow that is still pending rejects a
/// second invocation instead of double-submitting.
#[derive(Default)]
pub(crate) struct FlowGates {
    pub(crate) setup: FlowGate,
    pub(crate) make_offer: FlowGate,
    pub(crate) take_offer: FlowGate,
}

pub(crate) struct FlowGate {
    busy: AtomicBool,
}

impl Default for FlowGate {
    fn default() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }
}

impl FlowGate {
    pub(crate) fn enter(&self, flow: &'static str) -> Result<GateGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            Ok(GateGuard { gate: &self.busy })
        } else {
            Err(SwapClientError::FlowInFlight(flow))
        }
    }
}

/// Releases the gate when the flow finishes, including on early return.
pub(crate) struct GateGuard<'a> {
    gate: &'a AtomicBool,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_rejects_reentry_until_released() {
        let gate = FlowGate::default();
        let guard = gate.enter("make offer").unwrap();
        assert!(matches!(
            gate.enter("make offer"),
            Err(SwapClientError::FlowInFlight("make offer"))
        ));
        drop(guard);
        assert!(gate.enter("make offer").is_ok());
    }
}
