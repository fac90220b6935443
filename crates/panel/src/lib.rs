//! # Wallet-Linked Mint Panel
//!
//! State container for a single-page mint surface over the `MyEpicNFT` collection:
//! it adopts an account from a host-supplied wallet capability, mirrors the
//! contract's mint counter and event stream, submits mint transactions, and
//! renders everything into a [`PanelView`] snapshot.
//!
//! ## Architecture
//!
//! The panel owns no protocol logic of its own. The wallet provider and the
//! deployed contract are external collaborators reached through the
//! [`WalletProvider`] and [`MintContract`] capability traits; the live
//! implementations in [`eth`] back them with an alloy JSON-RPC provider, and
//! tests substitute mocks. All state lives in one shared container mutated only
//! by the panel's operations and its two forwarding tasks (mint events and
//! chain switches), each of which is registered exactly once and detached
//! before any re-registration.

#[macro_use]
extern crate tracing;

mod config;
mod contract;
mod error;
mod panel;
mod state;
mod view;
mod wallet;

pub mod eth;

pub use config::PanelConfig;
pub use contract::{MintContract, MintEventStream, MintedEvent, PendingMint};
pub use error::PanelError;
pub use panel::MintPanel;
pub use state::{ConnectionState, MintCounter, MintTxState};
pub use view::PanelView;
pub use wallet::{ChainChangedStream, WalletProvider, parse_chain_id};

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
