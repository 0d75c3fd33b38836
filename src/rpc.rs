use async_trait::async_trait;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::{RpcError, RpcResponseErrorData};
use solana_sdk::account::Account;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::InstructionError;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::{Transaction, TransactionError};

use crate::error::{ProgramRejection, Result, SwapClientError};

/// The RPC surface the flows need. Every pre-flight read and every
/// submission goes through this trait, which is what makes the
/// "reject before any network call" behavior observable in tests.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64>;

    /// `None` when no account exists at the address.
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>>;

    async fn latest_blockhash(&self) -> Result<Hash>;

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64>;

    /// Submit a fully signed transaction and wait for confirmed commitment.
    async fn send_and_confirm(&self, tx: &Transaction) -> Result<Signature>;

    /// All accounts owned by the given program, with their raw data.
    async fn program_accounts(&self, program_id: &Pubkey) -> Result<Vec<(Pubkey, Account)>>;
}

/// Production implementation backed by the nonblocking RPC client at
/// confirmed commitment.
pub struct SolanaRpc {
    inner: RpcClient,
}

impl SolanaRpc {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            inner: RpcClient::new_with_commitment(rpc_url.into(), CommitmentConfig::confirmed()),
        }
    }
}

#[async_trait]
impl ChainRpc for SolanaRpc {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64> {
        self.inner.get_balance(address).await.map_err(map_client_error)
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        let response = self
            .inner
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await
            .map_err(map_client_error)?;
        Ok(response.value)
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        self.inner.get_latest_blockhash().await.map_err(map_client_error)
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> Result<u64> {
        self.inner
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(map_client_error)
    }

    async fn send_and_confirm(&self, tx: &Transaction) -> Result<Signature> {
        self.inner
            .send_and_confirm_transaction(tx)
            .await
            .map_err(map_client_error)
    }

    async fn program_accounts(&self, program_id: &Pubkey) -> Result<Vec<(Pubkey, Account)>> {
        self.inner
            .get_program_accounts(program_id)
            .await
            .map_err(map_client_error)
    }
}

/// Pull the program's structured reject out of an RPC failure when present;
/// otherwise keep the raw message.
fn map_client_error(err: ClientError) -> SwapClientError {
    match err.kind() {
        ClientErrorKind::TransactionError(tx_err) => rejection_from_tx_error(tx_err, Vec::new()),
        ClientErrorKind::RpcError(RpcError::RpcResponseError {
            data: RpcResponseErrorData::SendTransactionPreflightFailure(sim),
            ..
        }) => {
            let logs = sim.logs.clone().unwrap_or_default();
            match &sim.err {
                Some(tx_err) => rejection_from_tx_error(tx_err, logs),
                None => SwapClientError::ProgramRejected(ProgramRejection {
                    code: None,
                    message: "transaction simulation failed".to_string(),
                    program_id: None,
                    logs,
                }),
            }
        }
        _ => SwapClientError::Rpc(err.to_string()),
    }
}

fn rejection_from_tx_error(tx_err: &TransactionError, logs: Vec<String>) -> SwapClientError {
    match tx_err {
        TransactionError::InstructionError(_, InstructionError::Custom(code)) => {
            SwapClientError::ProgramRejected(ProgramRejection {
                code: Some(*code),
                message: tx_err.to_string(),
                program_id: program_id_from_logs(&logs),
                logs,
            })
        }
        _ => SwapClientError::ProgramRejected(ProgramRejection {
            code: None,
            message: tx_err.to_string(),
            program_id: program_id_from_logs(&logs),
            logs,
        }),
    }
}

/// The failing program id shows up in log lines shaped like
/// `Program <id> failed: custom program error: 0x...`.
fn program_id_from_logs(logs: &[String]) -> Option<Pubkey> {
    logs.iter().rev().find_map(|line| {
        let rest = line.strip_prefix("Program ")?;
        if !rest.contains("failed") {
            return None;
        }
        let id = rest.split_whitespace().next()?;
        id.parse().ok()
    })
}
