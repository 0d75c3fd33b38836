//! Transaction assembly, size accounting and submission.

use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::transaction::Transaction;

use crate::error::{Result, SwapClientError};
use crate::rpc::ChainRpc;
use crate::wallet::WalletSigner;

/// Build and sign a transaction: extra keypair signers first (mint
/// identities and the like), the wallet last as fee payer.
pub fn build_signed(
    instructions: &[Instruction],
    wallet: &dyn WalletSigner,
    extra_signers: &[&Keypair],
    blockhash: Hash,
) -> Result<Transaction> {
    let payer = wallet.pubkey();
    let mut tx = Transaction::new_with_payer(instructions, Some(&payer));
    tx.message.recent_blockhash = blockhash;
    if !extra_signers.is_empty() {
        tx.try_partial_sign(extra_signers, blockhash)
            .map_err(|e| SwapClientError::Signing(e.to_string()))?;
    }
    wallet.sign_transaction(&mut tx)?;
    Ok(tx)
}

/// Wire size of a signed transaction.
pub fn serialized_size(tx: &Transaction) -> Result<usize> {
    bincode::serialize(tx)
        .map(|bytes| bytes.len())
        .map_err(|e| SwapClientError::TxEncode(e.to_string()))
}

/// Fetch a fresh blockhash, then build, sign and submit in one step.
pub async fn send_instructions(
    rpc: &dyn ChainRpc,
    wallet: &dyn WalletSigner,
    extra_signers: &[&Keypair],
    instructions: &[Instruction],
) -> Result<Signature> {
    let blockhash = rpc.latest_blockhash().await?;
    let tx = build_signed(instructions, wallet, extra_signers, blockhash)?;
    rpc.send_and_confirm(&tx).await
}

/// As [`send_instructions`], retrying transient failures up to `attempts`
/// times with a refreshed blockhash. Program rejects and validation errors
/// are never retried.
pub async fn send_instructions_with_retry(
    rpc: &dyn ChainRpc,
    wallet: &dyn WalletSigner,
    instructions: &[Instruction],
    attempts: u32,
) -> Result<Signature> {
    let mut last_error = None;
    for attempt in 1..=attempts {
        match send_instructions(rpc, wallet, &[], instructions).await {
            Ok(signature) => return Ok(signature),
            Err(err) if err.is_transient() && attempt < attempts => {
                log::warn!("transaction attempt {attempt}/{attempts} failed: {err}");
                last_error = Some(err);
            }
            Err(err) if err.is_transient() => last_error = Some(err),
            Err(err) => return Err(err),
        }
    }
    Err(SwapClientError::MetadataAttachFailed {
        attempts,
        last_error: last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempts made".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signer::Signer;
    use solana_sdk::system_instruction;

    #[test]
    fn build_signed_sets_blockhash_and_signatures() {
        let wallet = Keypair::new();
        let mint = Keypair::new();
        let blockhash = Hash::new_unique();
        let ix = system_instruction::create_account(
            &Signer::pubkey(&wallet),
            &Signer::pubkey(&mint),
            1_000_000,
            82,
            &spl_token::ID,
        );

        let tx = build_signed(&[ix], &wallet, &[&mint], blockhash).unwrap();
        assert_eq!(tx.message.recent_blockhash, blockhash);
        assert!(tx.is_signed());
    }

    #[test]
    fn serialized_size_grows_with_instructions() {
        let wallet = Keypair::new();
        let blockhash = Hash::new_unique();
        let payer = Signer::pubkey(&wallet);
        let transfer = |n: u64| system_instruction::transfer(&payer, &Pubkey::new_unique(), n);

        let small = build_signed(&[transfer(1)], &wallet, &[], blockhash).unwrap();
        let large =
            build_signed(&[transfer(1), transfer(2), transfer(3)], &wallet, &[], blockhash)
                .unwrap();
        assert!(serialized_size(&large).unwrap() > serialized_size(&small).unwrap());
    }
}
