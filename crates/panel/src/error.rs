/// Errors surfaced by panel operations.
///
/// Capability implementations erase their transport errors into the matching
/// variant; the variants exist so the host surface can tell an install-a-wallet
/// alert apart from a log line.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// No injected wallet is available in the host environment.
    #[error("no wallet provider available, install a browser wallet")]
    ProviderAbsent,
    /// The wallet refused to expose accounts, usually a rejected permission prompt.
    #[error("wallet connection rejected: {0}")]
    ConnectionRejected(String),
    /// The wallet granted access but reported no accounts.
    #[error("wallet returned no accounts")]
    NoAccounts,
    /// A chain id reported by the wallet could not be parsed.
    #[error("unparseable chain id: {0:?}")]
    InvalidChainId(String),
    /// Reading contract state failed.
    #[error("contract read failed: {0}")]
    ContractRead(String),
    /// The mint transaction failed to submit or confirm.
    #[error("mint transaction failed: {0}")]
    Transaction(String),
    /// Establishing an event subscription failed.
    #[error("event subscription failed: {0}")]
    Subscribe(String),
}
