use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

use giftlist_client::ui::TerminalUi;
use giftlist_client::{ClientConfig, Controller, DeleteOutcome, FileStore};
use giftlist_types::NewGift;

#[derive(Parser, Debug)]
#[command(name = "giftlist")]
#[command(about = "Suggest, list and delete gifts")]
#[command(version)]
struct Args {
    /// API base address (overrides GIFTLIST_API_URL)
    #[arg(long)]
    api_url: Option<Url>,

    /// Ignore any configured API and use only the local cache
    #[arg(long, conflicts_with = "api_url")]
    local: bool,

    /// Local cache file (overrides GIFTLIST_CACHE_PATH)
    #[arg(long)]
    cache: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every suggestion, newest first
    List {
        /// Print the list as HTML cards
        #[arg(long)]
        html: bool,
    },
    /// Suggest a gift
    Add {
        #[arg(long)]
        nome: String,
        #[arg(long)]
        presente: String,
        #[arg(long, default_value = "")]
        link: String,
    },
    /// Delete a suggestion by id
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Write the local cache to a JSON file
    Export { file: PathBuf },
    /// Replace the local cache with a JSON file
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "giftlist_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = args.api_url {
        config.api_url = Some(url);
    }
    if args.local {
        config.api_url = None;
    }
    if let Some(cache) = args.cache {
        config.cache_path = cache;
    }

    let store = FileStore::new(&config.cache_path);
    let mut ui = TerminalUi::default();

    match args.command {
        Command::List { html } => {
            ui.html = html;
            let mut controller = Controller::new(&config, store, ui);
            controller.load().await;
        }
        Command::Add {
            nome,
            presente,
            link,
        } => {
            let mut controller = Controller::new(&config, store, ui);
            let submitted = controller.submit(NewGift::new(nome, presente, link)).await?;
            println!("Saved as #{} ({:?})", submitted.gift.id, submitted.source);
        }
        Command::Delete { id, yes } => {
            ui.assume_yes = yes;
            ui.quiet = true;
            let mut controller = Controller::new(&config, store, ui);
            if controller.delete(id).await? == DeleteOutcome::Cancelled {
                println!("Nothing deleted");
            }
        }
        Command::Export { file } => {
            let controller = Controller::new(&config, store, ui);
            let count = controller.cache().export_to(&file)?;
            println!("Exported {} gifts to {}", count, file.display());
        }
        Command::Import { file } => {
            let mut controller = Controller::new(&config, store, ui);
            let count = controller.cache_mut().import_from(&file)?;
            println!("Imported {} gifts from {}", count, file.display());
        }
    }

    Ok(())
}
