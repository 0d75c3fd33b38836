//! Instruction builders for the swap program's two entrypoints. The wire
//! format is the Anchor convention the program was generated with: an 8-byte
//! sighash discriminator followed by borsh-encoded args.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_program;

use crate::state::instruction_discriminator;

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MakeOfferArgs {
    pub id: u64,
    pub token_a_offered_amount: u64,
    pub token_b_wanted_amount: u64,
}

/// Accounts for `make_offer`, in the order the program declares them.
pub struct MakeOfferAccounts {
    pub maker: Pubkey,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub maker_token_account_a: Pubkey,
    pub offer: Pubkey,
    pub vault: Pubkey,
}

pub fn make_offer(
    program_id: &Pubkey,
    accounts: MakeOfferAccounts,
    args: MakeOfferArgs,
) -> Instruction {
    let mut data = instruction_discriminator("make_offer").to_vec();
    args.serialize(&mut data).unwrap_or_default();

    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(accounts.maker, true),
            AccountMeta::new_readonly(accounts.token_mint_a, false),
            AccountMeta::new_readonly(accounts.token_mint_b, false),
            AccountMeta::new(accounts.maker_token_account_a, false),
            AccountMeta::new(accounts.offer, false),
            AccountMeta::new(accounts.vault, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(spl_token::ID, false),
            AccountMeta::new_readonly(spl_associated_token_account::ID, false),
        ],
        data,
    }
}

/// Accounts for `take_offer`, in the order the program declares them.
/// `take_offer` carries no args; the amounts live in the offer record.
pub struct TakeOfferAccounts {
    pub taker: Pubkey,
    pub maker: Pubkey,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub taker_token_account_a: Pubkey,
    pub taker_token_account_b: Pubkey,
    pub maker_token_account_b: Pubkey,
    pub offer: Pubkey,
    pub vault: Pubkey,
}

pub fn take_offer(program_id: &Pubkey, accounts: TakeOfferAccounts) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(accounts.taker, true),
            AccountMeta::new(accounts.maker, false),
            AccountMeta::new_readonly(accounts.token_mint_a, false),
            AccountMeta::new_readonly(accounts.token_mint_b, false),
            AccountMeta::new(accounts.taker_token_account_a, false),
            AccountMeta::new(accounts.taker_token_account_b, false),
            AccountMeta::new(accounts.maker_token_account_b, false),
            AccountMeta::new(accounts.offer, false),
            AccountMeta::new(accounts.vault, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(spl_token::ID, false),
            AccountMeta::new_readonly(spl_associated_token_account::ID, false),
        ],
        data: instruction_discriminator("take_offer").to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn make_offer_data_is_discriminator_then_args() {
        let args = MakeOfferArgs {
            id: 3,
            token_a_offered_amount: 10,
            token_b_wanted_amount: 20,
        };
        let ix = make_offer(
            &Pubkey::new_unique(),
            MakeOfferAccounts {
                maker: Pubkey::new_unique(),
                token_mint_a: Pubkey::new_unique(),
                token_mint_b: Pubkey::new_unique(),
                maker_token_account_a: Pubkey::new_unique(),
                offer: Pubkey::new_unique(),
                vault: Pubkey::new_unique(),
            },
            args.clone(),
        );

        assert_eq!(&ix.data[..8], &instruction_discriminator("make_offer"));
        let decoded = MakeOfferArgs::try_from_slice(&ix.data[8..]).unwrap();
        assert_eq!(decoded, args);
        // Maker is the only signer.
        assert_eq!(
            ix.accounts.iter().filter(|meta| meta.is_signer).count(),
            1
        );
    }

    #[test]
    fn take_offer_carries_no_args() {
        let ix = take_offer(
            &Pubkey::new_unique(),
            TakeOfferAccounts {
                taker: Pubkey::new_unique(),
                maker: Pubkey::new_unique(),
                token_mint_a: Pubkey::new_unique(),
                token_mint_b: Pubkey::new_unique(),
                taker_token_account_a: Pubkey::new_unique(),
                taker_token_account_b: Pubkey::new_unique(),
                maker_token_account_b: Pubkey::new_unique(),
                offer: Pubkey::new_unique(),
                vault: Pubkey::new_unique(),
            },
        );
        assert_eq!(ix.data, instruction_discriminator("take_offer").to_vec());
        assert_eq!(ix.accounts.len(), 12);
    }
}
