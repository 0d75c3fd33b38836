//! On-chain account layouts consumed by the client.

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

/// Offer record as the swap program stores it, after the 8-byte account
/// discriminator.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Offer {
    pub id: u64,
    pub maker: Pubkey,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub token_a_offered_amount: u64,
    pub token_b_wanted_amount: u64,
    pub bump: u8,
}

impl Offer {
    /// First 8 bytes of every offer account.
    pub fn discriminator() -> [u8; 8] {
        account_discriminator("Offer")
    }

    /// Decode raw account data. Returns `None` for anything that is not a
    /// well-formed offer record; the list view drops such records instead
    /// of failing.
    pub fn try_decode(data: &[u8]) -> Option<Self> {
        let payload = data.strip_prefix(&Self::discriminator()[..])?;
        // Trailing padding is tolerated, short data is not.
        Offer::deserialize(&mut &payload[..]).ok()
    }

    /// Encode with discriminator, the exact inverse of [`Offer::try_decode`].
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Self::discriminator().to_vec();
        self.serialize(&mut out).unwrap_or_default();
        out
    }
}

/// Anchor-style account discriminator: sha256("account:<Name>")[..8].
pub fn account_discriminator(name: &str) -> [u8; 8] {
    sighash("account", name)
}

/// Anchor-style instruction discriminator: sha256("global:<name>")[..8].
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    sighash("global", name)
}

fn sighash(namespace: &str, name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("{namespace}:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// A decoded open offer with amounts scaled for display using each mint's
/// fetched decimal count.
#[derive(Debug, Clone)]
pub struct OfferSummary {
    pub address: Pubkey,
    pub id: u64,
    pub maker: Pubkey,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub token_a_offered_amount: u64,
    pub token_b_wanted_amount: u64,
    pub token_a_ui_amount: f64,
    pub token_b_ui_amount: f64,
}

/// Base units to a display amount for a given decimal count.
pub fn ui_amount(base_amount: u64, decimals: u8) -> f64 {
    base_amount as f64 / 10f64.powi(decimals as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_offer() -> Offer {
        Offer {
            id: 7,
            maker: Pubkey::new_unique(),
            token_mint_a: Pubkey::new_unique(),
            token_mint_b: Pubkey::new_unique(),
            token_a_offered_amount: 1_000_000_000,
            token_b_wanted_amount: 250_000_000,
            bump: 254,
        }
    }

    #[test]
    fn decode_inverts_encode() {
        let offer = sample_offer();
        assert_eq!(Offer::try_decode(&offer.encode()), Some(offer));
    }

    #[test]
    fn decode_rejects_wrong_discriminator() {
        let mut data = sample_offer().encode();
        data[0] ^= 0xff;
        assert_eq!(Offer::try_decode(&data), None);
    }

    #[test]
    fn decode_rejects_truncated_data() {
        let data = sample_offer().encode();
        assert_eq!(Offer::try_decode(&data[..data.len() - 4]), None);
        assert_eq!(Offer::try_decode(&[]), None);
    }

    #[test]
    fn decode_tolerates_trailing_padding() {
        let mut data = sample_offer().encode();
        data.extend_from_slice(&[0u8; 16]);
        assert!(Offer::try_decode(&data).is_some());
    }

    #[test]
    fn ui_amount_scales_by_decimals() {
        assert_eq!(ui_amount(1_500_000_000, 9), 1.5);
        assert_eq!(ui_amount(250, 0), 250.0);
    }
}
