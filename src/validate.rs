//! Input parsing and pre-flight account checks. Everything here either runs
//! before the first network call (pure input validation) or is an explicit
//! read-and-check against on-chain state before a transaction is submitted.

use std::str::FromStr;

use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use spl_token::state::{Account as TokenAccount, Mint};

use crate::error::{Result, SwapClientError};
use crate::rpc::ChainRpc;
use crate::DEFAULT_DECIMALS;

/// Maximum decimal precision a mint can carry.
pub const MAX_DECIMALS: u8 = 9;

/// Parse an address string, attributing the failure to the field it came from.
pub fn parse_pubkey(value: &str, context: &'static str) -> Result<Pubkey> {
    Pubkey::from_str(value.trim()).map_err(|_| SwapClientError::MalformedAddress {
        context,
        value: value.to_string(),
    })
}

/// Reject non-finite and non-positive display amounts before any conversion.
pub fn require_positive(amount: f64, context: &'static str) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(SwapClientError::NonPositiveAmount { context });
    }
    Ok(())
}

pub fn require_decimals_in_range(decimals: u32) -> Result<u8> {
    if decimals > MAX_DECIMALS as u32 {
        return Err(SwapClientError::DecimalsOutOfRange(decimals));
    }
    Ok(decimals as u8)
}

/// Display amount to base units, flooring fractional dust below the mint's
/// precision.
pub fn to_base_units(amount: f64, decimals: u8, context: &'static str) -> Result<u64> {
    require_positive(amount, context)?;
    let scaled = (amount * 10f64.powi(decimals as i32)).floor();
    if scaled <= 0.0 {
        return Err(SwapClientError::NonPositiveAmount { context });
    }
    if scaled > u64::MAX as f64 {
        return Err(SwapClientError::InvalidInput(format!(
            "{context} is too large to represent in base units"
        )));
    }
    Ok(scaled as u64)
}

/// Fetch and unpack a mint, requiring it to exist and be owned by the token
/// program.
pub async fn expect_mint(rpc: &dyn ChainRpc, mint: &Pubkey) -> Result<Mint> {
    let account = rpc
        .get_account(mint)
        .await?
        .ok_or(SwapClientError::MintMissing(*mint))?;
    if account.owner != spl_token::ID {
        return Err(SwapClientError::WrongAccountOwner {
            account: *mint,
            owner: account.owner,
            expected: spl_token::ID,
        });
    }
    Mint::unpack(&account.data)
        .map_err(|_| SwapClientError::InvalidInput(format!("account {mint} is not a mint")))
}

/// Decimal count for a mint, falling back to [`DEFAULT_DECIMALS`] when the
/// record cannot be read. Listing uses this so one bad mint never breaks the
/// whole view.
pub async fn mint_decimals_or_default(rpc: &dyn ChainRpc, mint: &Pubkey) -> u8 {
    match expect_mint(rpc, mint).await {
        Ok(state) => state.decimals,
        Err(err) => {
            log::warn!("falling back to {DEFAULT_DECIMALS} decimals for mint {mint}: {err}");
            DEFAULT_DECIMALS
        }
    }
}

/// Fetch and unpack a token account, requiring token-program ownership and
/// the expected mint.
pub async fn expect_token_account(
    rpc: &dyn ChainRpc,
    address: &Pubkey,
    expected_mint: &Pubkey,
) -> Result<TokenAccount> {
    let account = rpc
        .get_account(address)
        .await?
        .ok_or(SwapClientError::AccountMissing(*address))?;
    if account.owner != spl_token::ID {
        return Err(SwapClientError::WrongAccountOwner {
            account: *address,
            owner: account.owner,
            expected: spl_token::ID,
        });
    }
    let state = TokenAccount::unpack(&account.data).map_err(|_| {
        SwapClientError::InvalidInput(format!("account {address} is not a token account"))
    })?;
    if state.mint != *expected_mint {
        return Err(SwapClientError::MintMismatch {
            account: *address,
            found: state.mint,
            expected: *expected_mint,
        });
    }
    Ok(state)
}

/// Require `account` to hold at least `need` base units.
pub fn require_token_balance(address: &Pubkey, state: &TokenAccount, need: u64) -> Result<()> {
    if state.amount < need {
        return Err(SwapClientError::InsufficientTokenBalance {
            account: *address,
            have: state.amount,
            need,
        });
    }
    Ok(())
}
