use std::process::ExitCode;

use clap::{Parser, Subcommand};
use luna_core::config::SiteConfig;
use luna_core::{load_with_fallback, DictionarySource, DirSource, HttpSource, LocaleTag};
use luna_edge::{run, EdgeConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "luna", about = "Luna Launcher site tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the static site with SPA fallback.
    Serve {
        /// Directory holding the built site.
        #[arg(long)]
        assets: Option<String>,
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Resolve a dot-path translation key for a locale.
    Lookup {
        /// Directory holding `<tag>.json` files.
        #[arg(long)]
        locales: Option<String>,
        locale: String,
        key: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("luna=info,luna_edge=info,luna_core=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Serve { assets, host, port } => {
            let mut cfg = EdgeConfig::from_env();
            if let Some(assets) = assets {
                cfg.assets_dir = assets;
            }
            if let Some(host) = host {
                cfg.host = host;
            }
            if let Some(port) = port {
                cfg.port = port;
            }
            match run(cfg).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!("{e}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::Lookup {
            locales,
            locale,
            key,
        } => {
            let Some(tag) = LocaleTag::parse(&locale) else {
                eprintln!("Unknown locale: {locale}");
                return ExitCode::FAILURE;
            };
            let mut cfg = SiteConfig::from_env();
            if let Some(dir) = locales {
                cfg.locales_dir = dir;
                cfg.locales_base_url = None;
            }
            let found = match cfg.locales_base_url {
                Some(base) => lookup(&HttpSource::from_base_url(base), tag, &key).await,
                None => lookup(&DirSource::new(cfg.locales_dir), tag, &key).await,
            };
            match found {
                Some(text) => {
                    println!("{text}");
                    ExitCode::SUCCESS
                }
                None => {
                    eprintln!("No translation found for key: {key}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

async fn lookup<S: DictionarySource>(source: &S, locale: LocaleTag, key: &str) -> Option<String> {
    let (_, dictionary) = load_with_fallback(source, locale).await?;
    dictionary.lookup(key).map(str::to_owned)
}
