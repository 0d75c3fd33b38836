//! Offer discovery: read every program-owned account and keep the ones that
//! decode as open offers.

use std::collections::HashMap;

use solana_sdk::pubkey::Pubkey;

use crate::client::SwapClient;
use crate::error::Result;
use crate::state::{ui_amount, Offer, OfferSummary};
use crate::validate;

impl SwapClient {
    /// All open offers the program currently owns. Records that fail to
    /// decode are dropped, never an error: one corrupt account must not
    /// take down the whole list.
    pub async fn list_offers(&self) -> Result<Vec<OfferSummary>> {
        let accounts = self.rpc.program_accounts(&self.config.program_id).await?;
        let mut decimals_cache: HashMap<Pubkey, u8> = HashMap::new();
        let mut offers = Vec::new();

        for (address, account) in accounts {
            let Some(offer) = Offer::try_decode(&account.data) else {
                log::debug!("skipping undecodable program account {address}");
                continue;
            };
            let decimals_a = self
                .cached_decimals(&mut decimals_cache, &offer.token_mint_a)
                .await;
            let decimals_b = self
                .cached_decimals(&mut decimals_cache, &offer.token_mint_b)
                .await;
            offers.push(OfferSummary {
                address,
                id: offer.id,
                maker: offer.maker,
                token_mint_a: offer.token_mint_a,
                token_mint_b: offer.token_mint_b,
                token_a_offered_amount: offer.token_a_offered_amount,
                token_b_wanted_amount: offer.token_b_wanted_amount,
                token_a_ui_amount: ui_amount(offer.token_a_offered_amount, decimals_a),
                token_b_ui_amount: ui_amount(offer.token_b_wanted_amount, decimals_b),
            });
        }
        Ok(offers)
    }

    async fn cached_decimals(&self, cache: &mut HashMap<Pubkey, u8>, mint: &Pubkey) -> u8 {
        if let Some(decimals) = cache.get(mint) {
            return *decimals;
        }
        let decimals = validate::mint_decimals_or_default(self.rpc.as_ref(), mint).await;
        cache.insert(*mint, decimals);
        decimals
    }
}
