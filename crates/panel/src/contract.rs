use alloy_primitives::{Address, TxHash};
use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::PanelError;

/// A single confirmed mint, as reported by the contract's event stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintedEvent {
    /// Account that called the mint function.
    pub from: Address,
    /// Zero-based id of the token that was created.
    pub token_id: u64,
}

/// Stream of confirmed mint events.
pub type MintEventStream = BoxStream<'static, MintedEvent>;

/// Handle to a submitted mint transaction.
#[async_trait]
pub trait PendingMint: Send {
    /// Wait until the transaction is mined and return its hash.
    ///
    /// There is no timeout; this resolves whenever the chain does, mirroring
    /// the external transaction's own lifecycle.
    async fn confirmed(self: Box<Self>) -> Result<TxHash, PanelError>;
}

/// Capability exposed by the deployed NFT contract.
///
/// Mint accounting, the supply cap, and event emission are all owned by the
/// contract; the panel only reads and mirrors them.
#[async_trait]
pub trait MintContract: Send + Sync {
    /// Current number of minted tokens.
    async fn amount_minted(&self) -> Result<u64, PanelError>;

    /// Submit a mint transaction through the connected signer.
    async fn mint(&self) -> Result<Box<dyn PendingMint>, PanelError>;

    /// Subscribe to the contract's mint event stream.
    async fn mint_events(&self) -> Result<MintEventStream, PanelError>;
}
