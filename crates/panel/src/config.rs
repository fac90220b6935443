use alloy_primitives::{Address, ChainId, address};
use serde::Deserialize;

/// Fixed configuration for one panel instance.
///
/// Everything here is decided at construction time and never mutated; the
/// defaults are the deployed collection's constants.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PanelConfig {
    /// Address of the deployed NFT contract.
    pub contract: Address,
    /// Chain the contract lives on. Any other chain gets the wrong-network banner.
    pub chain_id: ChainId,
    /// Hard cap on the number of tokens the contract will ever mint.
    pub total_supply: u64,
    /// Marketplace base URL; token listings are `{base}/{contract}/{token_id}`.
    pub marketplace_url: String,
    /// Profile linked from the panel footer.
    pub profile_url: String,
}

impl PanelConfig {
    /// Marketplace listing URL for one token of the collection.
    pub fn token_url(&self, token_id: u64) -> String {
        format!("{}/{}/{token_id}", self.marketplace_url.trim_end_matches('/'), self.contract)
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            contract: address!("0xb540D8953b104c9C8b5DD2285b2D540BAA0F18dd"),
            chain_id: 4,
            total_supply: 50,
            marketplace_url: "https://testnets.opensea.io/assets".to_string(),
            profile_url: "https://twitter.com/dieumondroit".to_string(),
        }
    }
}
