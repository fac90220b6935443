use std::sync::Arc;

use alloy_primitives::Address;
use parking_lot::Mutex;

/// Wallet connection half of the panel state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionState {
    /// Connected account, if any.
    pub account: Option<Address>,
    /// The wallet is pointed at a different chain than the contract's.
    pub wrong_network: bool,
}

/// Mint counter as last reported by the contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MintCounter {
    /// Latest known on-chain count, never a locally incremented guess.
    pub minted: u64,
}

/// Lifecycle of the in-flight mint transaction, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MintTxState {
    /// True from submission until confirmation or failure.
    pub minting: bool,
    /// Marketplace link for the caller's most recent confirmed mint.
    pub result_link: Option<String>,
}

/// Shared panel state.
///
/// Mutation only happens from the panel's operations and its forwarding tasks,
/// all on the host's single executor; the mutex covers the handful of
/// independent callbacks, not a concurrency model.
#[derive(Clone, Debug, Default)]
pub(crate) struct PanelState {
    inner: Arc<Mutex<StateInner>>,
}

#[derive(Debug, Default)]
struct StateInner {
    connection: ConnectionState,
    counter: MintCounter,
    tx: MintTxState,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection(&self) -> ConnectionState {
        self.inner.lock().connection.clone()
    }

    pub fn counter(&self) -> MintCounter {
        self.inner.lock().counter
    }

    pub fn tx(&self) -> MintTxState {
        self.inner.lock().tx.clone()
    }

    pub fn set_account(&self, account: Address) {
        self.inner.lock().connection.account = Some(account);
    }

    pub fn set_wrong_network(&self, wrong: bool) {
        self.inner.lock().connection.wrong_network = wrong;
    }

    /// Overwrites the counter with a contract-reported count.
    pub fn set_minted(&self, minted: u64) {
        self.inner.lock().counter.minted = minted;
    }

    pub fn set_minting(&self, minting: bool) {
        self.inner.lock().tx.minting = minting;
    }

    /// Applies one confirmed mint event: the new count, and the marketplace
    /// link when the mint was the connected account's own.
    pub fn record_mint_event(&self, minted: u64, link: Option<String>) {
        let mut state = self.inner.lock();
        state.counter.minted = minted;
        if let Some(link) = link {
            state.tx.result_link = Some(link);
        }
    }
}
