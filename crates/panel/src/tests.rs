use std::{sync::Arc, time::Duration};

use alloy_primitives::{Address, ChainId, TxHash, address};
use async_trait::async_trait;
use futures::{
    StreamExt,
    channel::{mpsc, oneshot},
    stream,
};
use parking_lot::Mutex;

use crate::{
    ChainChangedStream, MintContract, MintEventStream, MintPanel, MintedEvent, PanelConfig,
    PanelError, PendingMint, WalletProvider,
};

const ACCOUNT: Address = address!("0x0000000000000000000000000000000000000abc");
const STRANGER: Address = address!("0x000000000000000000000000000000000000dead");

/// Scriptable stand-in for the injected wallet.
#[derive(Default)]
struct MockWallet {
    accounts: Vec<Address>,
    chain_id: ChainId,
    reject_request: bool,
    fail_accounts: bool,
    chain_stream: Mutex<Option<ChainChangedStream>>,
}

impl MockWallet {
    fn authorized(account: Address, chain_id: ChainId) -> Self {
        Self { accounts: vec![account], chain_id, ..Self::default() }
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn accounts(&self) -> Result<Vec<Address>, PanelError> {
        if self.fail_accounts {
            return Err(PanelError::ConnectionRejected("wallet unavailable".to_string()));
        }
        Ok(self.accounts.clone())
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, PanelError> {
        if self.reject_request {
            return Err(PanelError::ConnectionRejected("user rejected the prompt".to_string()));
        }
        self.accounts().await
    }

    async fn chain_id(&self) -> Result<ChainId, PanelError> {
        Ok(self.chain_id)
    }

    async fn chain_changed(&self) -> Result<ChainChangedStream, PanelError> {
        Ok(self.chain_stream.lock().take().unwrap_or_else(|| stream::pending().boxed()))
    }
}

/// Scriptable stand-in for the deployed contract.
#[derive(Default)]
struct MockContract {
    minted: Mutex<u64>,
    fail_mint: bool,
    /// Gate a pending mint's confirmation on an external signal.
    confirm_gate: Mutex<Option<oneshot::Receiver<()>>>,
    /// Event streams handed out per subscription, in order.
    event_streams: Mutex<Vec<mpsc::UnboundedReceiver<MintedEvent>>>,
}

impl MockContract {
    fn with_count(count: u64) -> Self {
        Self { minted: Mutex::new(count), ..Self::default() }
    }

    fn with_events(self) -> (Self, mpsc::UnboundedSender<MintedEvent>) {
        let (tx, rx) = mpsc::unbounded();
        self.event_streams.lock().push(rx);
        (self, tx)
    }
}

#[async_trait]
impl MintContract for MockContract {
    async fn amount_minted(&self) -> Result<u64, PanelError> {
        Ok(*self.minted.lock())
    }

    async fn mint(&self) -> Result<Box<dyn PendingMint>, PanelError> {
        if self.fail_mint {
            return Err(PanelError::Transaction("execution reverted".to_string()));
        }
        Ok(Box::new(MockPending { gate: self.confirm_gate.lock().take() }))
    }

    async fn mint_events(&self) -> Result<MintEventStream, PanelError> {
        let mut streams = self.event_streams.lock();
        if streams.is_empty() {
            return Ok(stream::pending().boxed());
        }
        Ok(streams.remove(0).boxed())
    }
}

struct MockPending {
    gate: Option<oneshot::Receiver<()>>,
}

#[async_trait]
impl PendingMint for MockPending {
    async fn confirmed(self: Box<Self>) -> Result<TxHash, PanelError> {
        if let Some(gate) = self.gate {
            let _ = gate.await;
        }
        Ok(TxHash::ZERO)
    }
}

fn panel(wallet: Option<MockWallet>, contract: MockContract) -> MintPanel {
    MintPanel::new(
        PanelConfig::default(),
        wallet.map(|wallet| Arc::new(wallet) as Arc<dyn WalletProvider>),
        Arc::new(contract),
    )
}

/// Spin the single-threaded runtime until the forwarding tasks catch up.
async fn wait_for(mut cond: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while !cond() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("state never reached the expected value");
}

#[tokio::test]
async fn detect_without_provider_leaves_connection_empty() {
    let panel = panel(None, MockContract::default());
    panel.detect_existing_connection().await;

    assert_eq!(panel.connection().account, None);
    assert!(!panel.connection().wrong_network);

    let view = panel.view();
    assert!(view.show_connect);
    assert!(!view.show_mint);
    assert_eq!(view.counter_text, "0 out of 50");
}

#[tokio::test]
async fn detect_adopts_authorized_account_and_refreshes_counter() {
    let panel = panel(Some(MockWallet::authorized(ACCOUNT, 4)), MockContract::with_count(12));
    panel.detect_existing_connection().await;

    assert_eq!(panel.connection().account, Some(ACCOUNT));
    assert!(!panel.connection().wrong_network);
    assert_eq!(panel.counter().minted, 12);
    assert!(panel.view().show_mint);
}

#[tokio::test]
async fn detect_flags_mismatched_network() {
    let panel = panel(Some(MockWallet::authorized(ACCOUNT, 3)), MockContract::default());
    panel.detect_existing_connection().await;

    assert!(panel.connection().wrong_network);
    assert!(panel.view().wrong_network_banner);
}

#[tokio::test]
async fn detect_survives_failing_account_query() {
    let wallet = MockWallet { fail_accounts: true, chain_id: 4, ..MockWallet::default() };
    let panel = panel(Some(wallet), MockContract::default());
    panel.detect_existing_connection().await;

    assert_eq!(panel.connection().account, None);
}

#[tokio::test]
async fn connect_adopts_account_and_arms_event_subscription() {
    let (contract, events) = MockContract::with_count(7).with_events();
    let panel = panel(Some(MockWallet::authorized(ACCOUNT, 4)), contract);

    panel.connect_wallet().await.unwrap();
    assert_eq!(panel.connection().account, Some(ACCOUNT));
    assert_eq!(panel.counter().minted, 7);

    events.unbounded_send(MintedEvent { from: ACCOUNT, token_id: 7 }).unwrap();
    wait_for(|| panel.counter().minted == 8).await;

    let expected = panel.config().token_url(7);
    assert_eq!(panel.tx_state().result_link, Some(expected));
    assert!(panel.view().result_link.is_some());
}

#[tokio::test]
async fn connect_without_provider_is_provider_absent() {
    let panel = panel(None, MockContract::default());
    let err = panel.connect_wallet().await.unwrap_err();
    assert!(matches!(err, PanelError::ProviderAbsent));
}

#[tokio::test]
async fn rejected_connect_leaves_state_unchanged() {
    let wallet = MockWallet {
        accounts: vec![ACCOUNT],
        chain_id: 4,
        reject_request: true,
        ..MockWallet::default()
    };
    let panel = panel(Some(wallet), MockContract::with_count(3));

    let err = panel.connect_wallet().await.unwrap_err();
    assert!(matches!(err, PanelError::ConnectionRejected(_)));
    assert_eq!(panel.connection().account, None);
    assert_eq!(panel.counter().minted, 0);
}

#[tokio::test]
async fn connect_with_no_granted_accounts_is_an_error() {
    let wallet = MockWallet { chain_id: 4, ..MockWallet::default() };
    let panel = panel(Some(wallet), MockContract::default());
    assert!(matches!(panel.connect_wallet().await.unwrap_err(), PanelError::NoAccounts));
}

#[tokio::test]
async fn foreign_mint_updates_counter_but_not_result_link() {
    let (contract, events) = MockContract::default().with_events();
    let panel = panel(Some(MockWallet::authorized(ACCOUNT, 4)), contract);
    panel.connect_wallet().await.unwrap();

    events.unbounded_send(MintedEvent { from: STRANGER, token_id: 9 }).unwrap();
    wait_for(|| panel.counter().minted == 10).await;

    assert_eq!(panel.tx_state().result_link, None);
}

#[tokio::test]
async fn refresh_overwrites_counter_in_both_directions() {
    let contract = Arc::new(MockContract::with_count(12));
    let panel = MintPanel::new(
        PanelConfig::default(),
        Some(Arc::new(MockWallet::authorized(ACCOUNT, 4)) as Arc<dyn WalletProvider>),
        Arc::clone(&contract) as Arc<dyn MintContract>,
    );

    panel.refresh_mint_counter().await;
    assert_eq!(panel.counter().minted, 12);

    // A smaller reported count still wins: overwrite, not increment.
    *contract.minted.lock() = 5;
    panel.refresh_mint_counter().await;
    assert_eq!(panel.counter().minted, 5);
}

#[tokio::test]
async fn request_mint_holds_flag_until_confirmation() {
    let (gate_tx, gate_rx) = oneshot::channel();
    let contract =
        MockContract { confirm_gate: Mutex::new(Some(gate_rx)), ..MockContract::default() };
    let panel = Arc::new(panel(Some(MockWallet::authorized(ACCOUNT, 4)), contract));
    panel.connect_wallet().await.unwrap();

    let minting = {
        let panel = Arc::clone(&panel);
        tokio::spawn(async move { panel.request_mint().await })
    };

    wait_for(|| panel.tx_state().minting).await;
    let view = panel.view();
    assert!(!view.mint_enabled);
    assert_eq!(view.mint_label, "Minting your NFT");

    gate_tx.send(()).unwrap();
    minting.await.unwrap().unwrap();

    assert!(!panel.tx_state().minting);
    assert!(panel.view().mint_enabled);
    assert_eq!(panel.view().mint_label, "Mint NFT");
}

#[tokio::test]
async fn failed_mint_clears_minting_flag() {
    let contract = MockContract { fail_mint: true, ..MockContract::default() };
    let panel = panel(Some(MockWallet::authorized(ACCOUNT, 4)), contract);
    panel.connect_wallet().await.unwrap();

    let err = panel.request_mint().await.unwrap_err();
    assert!(matches!(err, PanelError::Transaction(_)));
    assert!(!panel.tx_state().minting);
    assert!(panel.view().mint_enabled);
}

#[tokio::test]
async fn request_mint_without_provider_fails_fast() {
    let panel = panel(None, MockContract::default());
    assert!(matches!(panel.request_mint().await.unwrap_err(), PanelError::ProviderAbsent));
    assert!(!panel.tx_state().minting);
}

#[tokio::test]
async fn resubscribing_detaches_the_previous_listener() {
    let (contract, first) = MockContract::default().with_events();
    let (contract, second) = contract.with_events();
    let panel = panel(Some(MockWallet::authorized(ACCOUNT, 4)), contract);

    panel.subscribe_mint_events().await;
    panel.subscribe_mint_events().await;

    // The superseded stream's events must no longer reach the panel.
    let _ = first.unbounded_send(MintedEvent { from: ACCOUNT, token_id: 0 });
    second.unbounded_send(MintedEvent { from: STRANGER, token_id: 2 }).unwrap();
    wait_for(|| panel.counter().minted == 3).await;
    assert_eq!(panel.counter().minted, 3);
}

#[tokio::test]
async fn on_network_changed_flips_banner_both_ways() {
    let panel = panel(Some(MockWallet::authorized(ACCOUNT, 4)), MockContract::default());

    panel.on_network_changed(3);
    assert!(panel.connection().wrong_network);

    panel.on_network_changed(4);
    assert!(!panel.connection().wrong_network);
}

#[tokio::test]
async fn chain_change_stream_drives_the_banner() {
    let (chains, chain_rx) = mpsc::unbounded::<ChainId>();
    let wallet = MockWallet {
        accounts: vec![ACCOUNT],
        chain_id: 4,
        chain_stream: Mutex::new(Some(chain_rx.boxed())),
        ..MockWallet::default()
    };
    let panel = panel(Some(wallet), MockContract::default());
    panel.connect_wallet().await.unwrap();

    chains.unbounded_send(1).unwrap();
    wait_for(|| panel.connection().wrong_network).await;

    chains.unbounded_send(4).unwrap();
    wait_for(|| !panel.connection().wrong_network).await;
}

#[tokio::test]
async fn view_serializes_to_json() {
    let panel = panel(None, MockContract::default());
    let json = serde_json::to_value(panel.view()).unwrap();
    assert_eq!(json["counter_text"], "0 out of 50");
    assert_eq!(json["show_connect"], true);
    assert_eq!(json["result_link"], serde_json::Value::Null);
}
