use serde::Serialize;

/// Snapshot of everything the rendered panel surface shows.
///
/// Pure data; the host environment decides how to draw it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PanelView {
    /// Show the wrong-network warning banner.
    pub wrong_network_banner: bool,
    /// `"{minted} out of {total}"`.
    pub counter_text: String,
    /// Show the connect button: no account is connected yet.
    pub show_connect: bool,
    /// Show the mint button: an account is connected.
    pub show_mint: bool,
    /// The mint button is clickable.
    pub mint_enabled: bool,
    /// Label on the mint button.
    pub mint_label: &'static str,
    /// Marketplace link for the latest confirmed mint, once one exists.
    pub result_link: Option<String>,
    /// Fixed footer link to the author's profile.
    pub footer_link: String,
}
