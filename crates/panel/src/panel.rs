use std::sync::Arc;

use alloy_primitives::{Address, ChainId};
use futures::StreamExt;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::{
    config::PanelConfig,
    contract::MintContract,
    error::PanelError,
    state::{ConnectionState, MintCounter, MintTxState, PanelState},
    view::PanelView,
    wallet::WalletProvider,
};

/// UI state container binding a wallet provider and the NFT contract.
///
/// The wallet capability is optional: `None` models a host environment with no
/// injected wallet, in which case detection is a no-op and an explicit connect
/// attempt surfaces [`PanelError::ProviderAbsent`].
///
/// Every operation runs to completion on the host's executor. The only
/// background work are the two forwarding tasks for the contract's mint events
/// and the wallet's chain switches; each is tracked by a single handle and the
/// previous task is aborted before a replacement is spawned, so listeners
/// never accumulate.
pub struct MintPanel {
    config: PanelConfig,
    wallet: Option<Arc<dyn WalletProvider>>,
    contract: Arc<dyn MintContract>,
    state: PanelState,
    /// The single live mint-event subscription.
    events_task: Mutex<Option<JoinHandle<()>>>,
    /// The single live chain-change listener.
    chain_task: Mutex<Option<JoinHandle<()>>>,
}

impl MintPanel {
    /// Creates a panel over the given capabilities. No network traffic happens
    /// until one of the operations is called.
    pub fn new(
        config: PanelConfig,
        wallet: Option<Arc<dyn WalletProvider>>,
        contract: Arc<dyn MintContract>,
    ) -> Self {
        Self {
            config,
            wallet,
            contract,
            state: PanelState::new(),
            events_task: Mutex::new(None),
            chain_task: Mutex::new(None),
        }
    }

    /// Adopts an already-authorized account, if the wallet has one.
    ///
    /// Intended to run once at load. Checks the wallet's current chain against
    /// the configured one, then adopts the first authorized account. Never
    /// fails: a missing provider or a failing call is logged and leaves the
    /// connection empty.
    pub async fn detect_existing_connection(&self) {
        let Some(wallet) = self.wallet.clone() else {
            debug!("no wallet provider injected, skipping connection check");
            return;
        };

        match wallet.chain_id().await {
            Ok(chain_id) => self.on_network_changed(chain_id),
            Err(err) => warn!(%err, "failed to read wallet chain id"),
        }

        let accounts = match wallet.accounts().await {
            Ok(accounts) => accounts,
            Err(err) => {
                warn!(%err, "failed to query authorized accounts");
                return;
            }
        };
        let Some(account) = accounts.first().copied() else {
            debug!("no authorized account found");
            return;
        };
        debug!(%account, "found an authorized account");
        self.adopt_account(account).await;
    }

    /// Requests account access from the wallet, prompting the user.
    ///
    /// On success the first granted account is adopted. A missing provider or a
    /// rejected prompt is returned to the caller with the connection unchanged;
    /// the host decides between an alert and a log line.
    pub async fn connect_wallet(&self) -> Result<(), PanelError> {
        let wallet = self.wallet.clone().ok_or(PanelError::ProviderAbsent)?;
        let accounts = wallet.request_accounts().await?;
        let account = *accounts.first().ok_or(PanelError::NoAccounts)?;
        info!(%account, "wallet connected");
        self.adopt_account(account).await;
        Ok(())
    }

    /// The single adoption sequence shared by detection and explicit connect:
    /// set the account, re-arm the event subscription, refresh the counter,
    /// re-register the chain listener. Running it again replaces the previous
    /// listeners instead of stacking new ones.
    async fn adopt_account(&self, account: Address) {
        self.state.set_account(account);
        self.subscribe_mint_events().await;
        self.refresh_mint_counter().await;
        self.watch_chain_changes().await;
    }

    /// (Re)registers the mint-event subscription, detaching any previous one.
    ///
    /// Each event overwrites the counter with `token_id + 1`; when the sender
    /// is the connected account the marketplace link for the new token is
    /// recorded as the mint result.
    pub async fn subscribe_mint_events(&self) {
        let stream = match self.contract.mint_events().await {
            Ok(stream) => stream,
            Err(err) => {
                warn!(%err, "failed to subscribe to mint events");
                return;
            }
        };
        if let Some(old) = self.events_task.lock().take() {
            old.abort();
        }
        let state = self.state.clone();
        let config = self.config.clone();
        let task = tokio::spawn(async move {
            let mut stream = stream;
            while let Some(event) = stream.next().await {
                let link = config.token_url(event.token_id);
                trace!(from = %event.from, token_id = event.token_id, %link, "mint event");
                let ours = state.connection().account == Some(event.from);
                state.record_mint_event(event.token_id + 1, ours.then_some(link));
            }
            debug!("mint event stream ended");
        });
        *self.events_task.lock() = Some(task);
        debug!("mint event listener registered");
    }

    /// Overwrites the counter with the contract's currently reported count.
    pub async fn refresh_mint_counter(&self) {
        match self.contract.amount_minted().await {
            Ok(count) => {
                trace!(count, "refreshed mint counter");
                self.state.set_minted(count);
            }
            Err(err) => warn!(%err, "failed to read mint count"),
        }
    }

    /// Submits a mint transaction and waits for it to land on chain.
    ///
    /// The minting flag is raised before submission and cleared on every exit
    /// path, so the mint button always comes back. No retries: a failed mint
    /// needs another click.
    pub async fn request_mint(&self) -> Result<(), PanelError> {
        if self.wallet.is_none() {
            return Err(PanelError::ProviderAbsent);
        }
        self.state.set_minting(true);
        let result = self.drive_mint().await;
        self.state.set_minting(false);
        if let Err(err) = &result {
            warn!(%err, "mint failed");
        }
        result
    }

    async fn drive_mint(&self) -> Result<(), PanelError> {
        let pending = self.contract.mint().await?;
        debug!("mint transaction submitted, waiting for confirmation");
        let hash = pending.confirmed().await?;
        info!(%hash, "mint confirmed");
        Ok(())
    }

    /// Applies a chain switch reported by the wallet.
    pub fn on_network_changed(&self, chain_id: ChainId) {
        let wrong = chain_id != self.config.chain_id;
        if wrong {
            debug!(chain_id, required = self.config.chain_id, "wallet is on the wrong network");
        }
        self.state.set_wrong_network(wrong);
    }

    /// (Re)registers the chain-change listener, detaching any previous one.
    async fn watch_chain_changes(&self) {
        let Some(wallet) = self.wallet.clone() else { return };
        let stream = match wallet.chain_changed().await {
            Ok(stream) => stream,
            Err(err) => {
                warn!(%err, "failed to register chain-change listener");
                return;
            }
        };
        if let Some(old) = self.chain_task.lock().take() {
            old.abort();
        }
        let state = self.state.clone();
        let required = self.config.chain_id;
        let task = tokio::spawn(async move {
            let mut stream = stream;
            while let Some(chain_id) = stream.next().await {
                debug!(chain_id, "wallet switched chains");
                state.set_wrong_network(chain_id != required);
            }
        });
        *self.chain_task.lock() = Some(task);
    }

    /// Current render state of the panel surface.
    pub fn view(&self) -> PanelView {
        let connection = self.state.connection();
        let tx = self.state.tx();
        let minted = self.state.counter().minted;
        PanelView {
            wrong_network_banner: connection.wrong_network,
            counter_text: format!("{minted} out of {}", self.config.total_supply),
            show_connect: connection.account.is_none(),
            show_mint: connection.account.is_some(),
            mint_enabled: connection.account.is_some() && !tx.minting,
            mint_label: if tx.minting { "Minting your NFT" } else { "Mint NFT" },
            result_link: tx.result_link,
            footer_link: self.config.profile_url.clone(),
        }
    }

    /// Configuration the panel was constructed with.
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Snapshot of the wallet connection state.
    pub fn connection(&self) -> ConnectionState {
        self.state.connection()
    }

    /// Snapshot of the mint counter.
    pub fn counter(&self) -> MintCounter {
        self.state.counter()
    }

    /// Snapshot of the in-flight transaction state.
    pub fn tx_state(&self) -> MintTxState {
        self.state.tx()
    }
}

impl Drop for MintPanel {
    fn drop(&mut self) {
        for task in
            [self.events_task.lock().take(), self.chain_task.lock().take()].into_iter().flatten()
        {
            task.abort();
        }
    }
}

impl std::fmt::Debug for MintPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MintPanel")
            .field("config", &self.config)
            .field("connection", &self.state.connection())
            .field("counter", &self.state.counter())
            .field("tx", &self.state.tx())
            .finish_non_exhaustive()
    }
}
