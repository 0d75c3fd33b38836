use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SwapClientError>;

/// Structured error surfaced when the on-chain program rejects a
/// transaction: custom code, message, owning program and log lines, as far
/// as the RPC response carries them.
#[derive(Debug, Clone, Default)]
pub struct ProgramRejection {
    pub code: Option<u32>,
    pub message: String,
    pub program_id: Option<Pubkey>,
    pub logs: Vec<String>,
}

impl std::fmt::Display for ProgramRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.code, self.program_id) {
            (Some(code), Some(program)) => {
                write!(f, "program {program} rejected with code {code}: {}", self.message)
            }
            (Some(code), None) => write!(f, "program rejected with code {code}: {}", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

#[derive(Debug, Error)]
pub enum SwapClientError {
    // Input validation: caught before any network call.
    #[error("invalid {context} address: {value}")]
    MalformedAddress { context: &'static str, value: String },

    #[error("{context} must be a positive number")]
    NonPositiveAmount { context: &'static str },

    #[error("decimals must be between 0 and 9, got {0}")]
    DecimalsOutOfRange(u32),

    #[error("{0}")]
    InvalidInput(String),

    // Precondition failures: detected by read-and-check before submission.
    #[error("account {0} does not exist")]
    AccountMissing(Pubkey),

    #[error("mint {0} does not exist")]
    MintMissing(Pubkey),

    #[error("account {account} is owned by {owner}, expected {expected}")]
    WrongAccountOwner {
        account: Pubkey,
        owner: Pubkey,
        expected: Pubkey,
    },

    #[error("token account {account} holds mint {found}, expected {expected}")]
    MintMismatch {
        account: Pubkey,
        found: Pubkey,
        expected: Pubkey,
    },

    #[error("insufficient token balance in {account}: have {have}, need {need}")]
    InsufficientTokenBalance {
        account: Pubkey,
        have: u64,
        need: u64,
    },

    #[error("insufficient SOL balance: have {have} lamports, need at least {need}")]
    InsufficientSolBalance { have: u64, need: u64 },

    // Submission and confirmation failures.
    #[error("transaction rejected by program: {0}")]
    ProgramRejected(ProgramRejection),

    #[error("rpc request failed: {0}")]
    Rpc(String),

    #[error("transaction failed to confirm: {0}")]
    Confirmation(String),

    #[error("transaction of {size} bytes exceeds the {limit} byte limit and cannot be split")]
    TransactionTooLarge { size: usize, limit: usize },

    #[error("failed to serialize transaction: {0}")]
    TxEncode(String),

    #[error("failed to sign transaction: {0}")]
    Signing(String),

    #[error("metadata transaction failed after {attempts} attempts: {last_error}")]
    MetadataAttachFailed { attempts: u32, last_error: String },

    // Everything else.
    #[error("another {0} flow is already in flight")]
    FlowInFlight(&'static str),

    #[error("metadata storage error: {0}")]
    Storage(String),

    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
}

impl SwapClientError {
    /// True for failures worth retrying with a fresh blockhash; program
    /// rejects and validation errors are final.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SwapClientError::Rpc(_) | SwapClientError::Confirmation(_)
        )
    }
}
