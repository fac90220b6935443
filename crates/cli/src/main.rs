//! `mintpad`: terminal surface for the wallet-linked mint panel.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};

use alloy_network::EthereumWallet;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use clap::Parser;
use eyre::{Result, WrapErr};
use mintpad_panel::{
    MintPanel, PanelConfig, PanelError, PanelView,
    eth::{EthContract, EthWallet},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use yansi::Paint;

/// Terminal front-end for the MyEpicNFT mint panel.
#[derive(Debug, Parser)]
#[command(name = "mintpad", version, about)]
struct MintpadArgs {
    /// The RPC endpoint to connect through.
    #[arg(
        short = 'r',
        long = "rpc-url",
        env = "ETH_RPC_URL",
        default_value = "http://localhost:8545",
        value_name = "URL"
    )]
    rpc_url: String,

    /// Private key used to sign the mint transaction.
    ///
    /// Without one, signing is left to the node's own unlocked accounts.
    #[arg(long, env = "ETH_PRIVATE_KEY", value_name = "RAW_PRIVATE_KEY")]
    private_key: Option<String>,

    /// Path to a TOML file overriding the built-in collection constants.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the detected panel state as JSON and exit.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    subscriber();
    let args = MintpadArgs::parse();
    run(args)
}

/// Mirrors `RUST_LOG` into tracing output.
fn subscriber() {
    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn run(args: MintpadArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    let provider = match &args.private_key {
        Some(key) => {
            let signer: PrivateKeySigner = key.parse().wrap_err("invalid private key")?;
            ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect(&args.rpc_url)
                .await
                .wrap_err_with(|| format!("could not connect to {}", args.rpc_url))?
                .erased()
        }
        None => ProviderBuilder::new()
            .connect(&args.rpc_url)
            .await
            .wrap_err_with(|| format!("could not connect to {}", args.rpc_url))?
            .erased(),
    };

    let wallet = Arc::new(EthWallet::new(provider.clone()));
    let contract = Arc::new(EthContract::new(config.contract, provider));
    let panel = MintPanel::new(config, Some(wallet), contract);

    panel.detect_existing_connection().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&panel.view())?);
        return Ok(());
    }

    render(&panel.view());
    prompt_loop(&panel).await
}

fn load_config(path: Option<&Path>) -> Result<PanelConfig> {
    let Some(path) = path else { return Ok(PanelConfig::default()) };
    let raw = fs::read_to_string(path)
        .wrap_err_with(|| format!("could not read {}", path.display()))?;
    toml::from_str(&raw).wrap_err("malformed panel configuration")
}

async fn prompt_loop(panel: &MintPanel) -> Result<()> {
    print_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else { break };
        match line.trim() {
            "" => {}
            "connect" => match panel.connect_wallet().await {
                Ok(()) => render(&panel.view()),
                Err(PanelError::ProviderAbsent) => {
                    println!("{}", "Get a wallet! No provider is reachable.".red());
                }
                Err(err) => println!("{}", format!("connect failed: {err}").red()),
            },
            "mint" => {
                if !panel.view().mint_enabled {
                    println!("connect a wallet first");
                    continue;
                }
                println!("{}", "Minting, please wait...".yellow());
                match panel.request_mint().await {
                    Ok(()) => render(&panel.view()),
                    Err(err) => println!("{}", format!("mint failed: {err}").red()),
                }
            }
            "refresh" => {
                panel.refresh_mint_counter().await;
                render(&panel.view());
            }
            "view" => render(&panel.view()),
            "help" => print_help(),
            "quit" | "exit" | "q" => break,
            other => println!("unknown command {other:?}, try `help`"),
        }
    }
    Ok(())
}

fn render(view: &PanelView) {
    println!();
    if view.wrong_network_banner {
        println!("{}", "You are connected to the wrong network.".magenta().bold());
    }
    println!("{}", "My NFT Collection".bold());
    println!("{}", "Each unique. Each beautiful. Discover your NFT today.".dim());
    println!("{} has already been minted", view.counter_text.green());
    if view.show_connect {
        println!("  {}", "[connect]  connect to a wallet".cyan());
    }
    if view.show_mint {
        if view.mint_enabled {
            println!("  {}", "[mint]     mint an NFT".cyan());
        } else {
            println!("  {}", view.mint_label.yellow());
        }
    }
    if let Some(link) = &view.result_link {
        println!("  see your newly minted NFT: {}", link.underline());
    }
    println!("{}", view.footer_link.dim());
    println!();
}

fn print_help() {
    println!("commands: connect, mint, refresh, view, help, quit");
}
