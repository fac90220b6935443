use alloy_primitives::{Address, ChainId};
use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::PanelError;

/// Stream of chain ids emitted when the wallet switches networks.
pub type ChainChangedStream = BoxStream<'static, ChainId>;

/// Capability exposed by the host's injected wallet.
///
/// Mirrors the slice of the EIP-1193 provider surface the panel needs: account
/// discovery, the permission-prompting connect call, the active chain, and
/// chain-switch notifications. The panel never constructs one of these; the
/// host environment supplies it, and tests substitute a mock.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts the wallet has already authorized, without prompting the user.
    async fn accounts(&self) -> Result<Vec<Address>, PanelError>;

    /// Prompt the user for account access and return the granted accounts.
    ///
    /// The permission prompt itself is the wallet's responsibility; a rejection
    /// surfaces as [`PanelError::ConnectionRejected`].
    async fn request_accounts(&self) -> Result<Vec<Address>, PanelError>;

    /// Chain the wallet is currently pointed at.
    async fn chain_id(&self) -> Result<ChainId, PanelError>;

    /// Subscribe to chain switches. Each item is the new chain id.
    async fn chain_changed(&self) -> Result<ChainChangedStream, PanelError>;
}

/// Parses a chain id as wallets report it.
///
/// Injected providers emit the id both as a decimal string (`"4"`) and as
/// 0x-prefixed hex (`"0x4"`) depending on the call site; both forms normalize
/// to the same [`ChainId`] so network comparisons happen exactly one way.
pub fn parse_chain_id(raw: &str) -> Result<ChainId, PanelError> {
    let raw = raw.trim();
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => ChainId::from_str_radix(hex, 16),
        None => raw.parse(),
    };
    parsed.map_err(|_| PanelError::InvalidChainId(raw.to_string()))
}
