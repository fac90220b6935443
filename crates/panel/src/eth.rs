//! Live wallet and contract capabilities backed by an alloy JSON-RPC provider.

use alloy_network::Ethereum;
use alloy_primitives::{Address, ChainId, TxHash};
use alloy_provider::{DynProvider, PendingTransactionBuilder, Provider};
use alloy_sol_types::sol;
use async_trait::async_trait;
use futures::StreamExt;

use crate::{
    contract::{MintContract, MintEventStream, MintedEvent, PendingMint},
    error::PanelError,
    wallet::{ChainChangedStream, WalletProvider},
};

sol! {
    #[sol(rpc)]
    interface IMyEpicNFT {
        #[derive(Debug)]
        event NewEpicNFTMinted(address indexed from, uint256 tokenId);

        function getAmountMinted() external view returns (uint256);
        function makeAnEpicNFT() external;
    }
}

/// Wallet capability served by a JSON-RPC node.
///
/// `eth_accounts` doubles as both the silent account query and the connect
/// call: nodes have no permission prompt, the account set is the grant. The
/// node also never switches chains underneath a session, so the chain-change
/// stream is pending forever.
#[derive(Clone, Debug)]
pub struct EthWallet {
    provider: DynProvider,
}

impl EthWallet {
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl WalletProvider for EthWallet {
    async fn accounts(&self) -> Result<Vec<Address>, PanelError> {
        self.provider
            .get_accounts()
            .await
            .map_err(|err| PanelError::ConnectionRejected(err.to_string()))
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, PanelError> {
        self.accounts().await
    }

    async fn chain_id(&self) -> Result<ChainId, PanelError> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|err| PanelError::ConnectionRejected(err.to_string()))
    }

    async fn chain_changed(&self) -> Result<ChainChangedStream, PanelError> {
        Ok(futures::stream::pending().boxed())
    }
}

/// Contract capability backed by the deployed `MyEpicNFT` instance.
#[derive(Clone, Debug)]
pub struct EthContract {
    contract: IMyEpicNFT::IMyEpicNFTInstance<DynProvider>,
}

impl EthContract {
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self { contract: IMyEpicNFT::new(address, provider) }
    }
}

#[async_trait]
impl MintContract for EthContract {
    async fn amount_minted(&self) -> Result<u64, PanelError> {
        let count = self
            .contract
            .getAmountMinted()
            .call()
            .await
            .map_err(|err| PanelError::ContractRead(err.to_string()))?;
        Ok(count.to::<u64>())
    }

    async fn mint(&self) -> Result<Box<dyn PendingMint>, PanelError> {
        let pending = self
            .contract
            .makeAnEpicNFT()
            .send()
            .await
            .map_err(|err| PanelError::Transaction(err.to_string()))?;
        Ok(Box::new(EthPendingMint { pending }))
    }

    async fn mint_events(&self) -> Result<MintEventStream, PanelError> {
        // Log filter polling works over plain HTTP; no pubsub transport needed.
        let poller = self
            .contract
            .NewEpicNFTMinted_filter()
            .watch()
            .await
            .map_err(|err| PanelError::Subscribe(err.to_string()))?;
        let stream = poller.into_stream().filter_map(|item| async move {
            match item {
                Ok((event, _log)) => {
                    Some(MintedEvent { from: event.from, token_id: event.tokenId.to::<u64>() })
                }
                Err(err) => {
                    warn!(%err, "dropping undecodable mint event");
                    None
                }
            }
        });
        Ok(stream.boxed())
    }
}

/// Mint transaction in flight on an Ethereum chain.
struct EthPendingMint {
    pending: PendingTransactionBuilder<Ethereum>,
}

#[async_trait]
impl PendingMint for EthPendingMint {
    async fn confirmed(self: Box<Self>) -> Result<TxHash, PanelError> {
        self.pending.watch().await.map_err(|err| PanelError::Transaction(err.to_string()))
    }
}
