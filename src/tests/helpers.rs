//! Scripted doubles for the client's seams, plus builders for the on-chain
//! account shapes the flows read.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use solana_sdk::account::Account;
use solana_sdk::hash::Hash;
use solana_sdk::program_option::COption;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::transaction::Transaction;
use spl_token::state::{Account as TokenAccount, AccountState, Mint};

use crate::config::SwapConfig;
use crate::error::{Result, SwapClientError};
use crate::rpc::ChainRpc;
use crate::storage::{StorageClient, TokenMetadataDocument};
use crate::SwapClient;

/// In-memory chain double. Every method counts as a network call so tests
/// can assert that validation failures happen before any call is made.
#[derive(Default)]
pub struct MockRpc {
    accounts: Mutex<HashMap<Pubkey, Account>>,
    balances: Mutex<HashMap<Pubkey, u64>>,
    owned: Mutex<Vec<(Pubkey, Account)>>,
    sent: Mutex<Vec<Transaction>>,
    send_failures: Mutex<VecDeque<SwapClientError>>,
    calls: AtomicUsize,
}

impl MockRpc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_account(&self, address: Pubkey, account: Account) {
        self.accounts.lock().unwrap().insert(address, account);
    }

    pub fn set_balance(&self, address: Pubkey, lamports: u64) {
        self.balances.lock().unwrap().insert(address, lamports);
    }

    pub fn add_program_account(&self, address: Pubkey, account: Account) {
        self.owned.lock().unwrap().push((address, account));
    }

    /// Queue an error for the next `send_and_confirm` call.
    pub fn fail_next_send(&self, err: SwapClientError) {
        self.send_failures.lock().unwrap().push_back(err);
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    pub fn network_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainRpc for MockRpc {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(*self.balances.lock().unwrap().get(address).unwrap_or(&0))
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Hash::new_unique())
    }

    async fn minimum_balance_for_rent_exemption(&self, _data_len: usize) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(1_461_600)
    }

    async fn send_and_confirm(&self, tx: &Transaction) -> Result<Signature> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.send_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        self.sent.lock().unwrap().push(tx.clone());
        Ok(Signature::new_unique())
    }

    async fn program_accounts(&self, _program_id: &Pubkey) -> Result<Vec<(Pubkey, Account)>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.owned.lock().unwrap().clone())
    }
}

pub struct MockStorage;

#[async_trait]
impl StorageClient for MockStorage {
    async fn pin_image(
        &self,
        _bytes: Vec<u8>,
        file_name: &str,
        _content_type: &str,
    ) -> Result<String> {
        Ok(format!("https://gateway.pinata.cloud/ipfs/img-{file_name}"))
    }

    async fn pin_metadata(&self, document: &TokenMetadataDocument) -> Result<String> {
        Ok(format!(
            "https://gateway.pinata.cloud/ipfs/meta-{}",
            document.symbol
        ))
    }
}

/// Client wired to the mocks, with a fresh keypair wallet.
pub fn test_client(rpc: Arc<MockRpc>, program_id: Pubkey) -> (SwapClient, Arc<Keypair>) {
    let _ = env_logger::builder().is_test(true).try_init();
    let wallet = Arc::new(Keypair::new());
    let config = SwapConfig::new("http://localhost:8899", program_id);
    let client = SwapClient::with_parts(config, rpc, wallet.clone(), Some(Arc::new(MockStorage)));
    (client, wallet)
}

pub fn account_with(owner: Pubkey, data: Vec<u8>) -> Account {
    Account {
        lamports: 2_039_280,
        data,
        owner,
        executable: false,
        rent_epoch: 0,
    }
}

pub fn mint_account(authority: &Pubkey, decimals: u8) -> Account {
    let mut data = vec![0u8; Mint::LEN];
    Mint::pack(
        Mint {
            mint_authority: COption::Some(*authority),
            supply: 1_000_000_000_000,
            decimals,
            is_initialized: true,
            freeze_authority: COption::None,
        },
        &mut data,
    )
    .unwrap();
    account_with(spl_token::ID, data)
}

pub fn token_account(mint: &Pubkey, owner: &Pubkey, amount: u64) -> Account {
    let mut data = vec![0u8; TokenAccount::LEN];
    TokenAccount::pack(
        TokenAccount {
            mint: *mint,
            owner: *owner,
            amount,
            delegate: COption::None,
            state: AccountState::Initialized,
            is_native: COption::None,
            delegated_amount: 0,
            close_authority: COption::None,
        },
        &mut data,
    )
    .unwrap();
    account_with(spl_token::ID, data)
}
