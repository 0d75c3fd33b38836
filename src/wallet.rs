use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;

use crate::error::{Result, SwapClientError};

/// The signing capability a connected wallet supplies. The SDK never holds
/// private keys itself; it only asks the wallet to add its signature as fee
/// payer after all other required signers have signed.
pub trait WalletSigner: Send + Sync {
    fn pubkey(&self) -> Pubkey;

    /// Add this wallet's signature for the transaction's current blockhash.
    fn sign_transaction(&self, tx: &mut Transaction) -> Result<()>;
}

impl WalletSigner for Keypair {
    fn pubkey(&self) -> Pubkey {
        Signer::pubkey(self)
    }

    fn sign_transaction(&self, tx: &mut Transaction) -> Result<()> {
        let blockhash = tx.message.recent_blockhash;
        tx.try_partial_sign(&[self], blockhash)
            .map_err(|e| SwapClientError::Signing(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::hash::Hash;
    use solana_sdk::system_instruction;

    #[test]
    fn keypair_signs_as_fee_payer() {
        let payer = Keypair::new();
        let recipient = Pubkey::new_unique();
        let ix = system_instruction::transfer(&WalletSigner::pubkey(&payer), &recipient, 1);
        let mut tx = Transaction::new_with_payer(&[ix], Some(&WalletSigner::pubkey(&payer)));
        tx.message.recent_blockhash = Hash::new_unique();

        payer.sign_transaction(&mut tx).unwrap();
        assert!(tx.is_signed());
    }
}
