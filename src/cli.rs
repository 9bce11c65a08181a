use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{Cell, Table};

use crate::config;
use crate::models::SearchCategory;
use crate::sources::netease::NeteaseClient;
use crate::transport::HttpTransport;

#[derive(Parser)]
#[command(name = "tunefetch", about = "Netease music catalog search client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search the catalog and resolve the stream URL of the first hit
    Search {
        /// Track name to search for
        name: String,
        /// Result offset into the catalog's ranking
        #[arg(default_value_t = 0)]
        offset: u32,
        /// Search scope
        #[arg(long, value_enum, default_value_t = SearchCategory::Music)]
        category: SearchCategory,
        /// Also fetch the lyrics document (diagnostic)
        #[arg(long)]
        lyrics: bool,
    },
    /// Update the stored configuration
    Config {
        /// Catalog service base URL
        #[arg(long)]
        base_url: Option<String>,
        /// User-Agent header override
        #[arg(long)]
        user_agent: Option<String>,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Search {
            name,
            offset,
            category,
            lyrics,
        } => cmd_search(&name, offset, category, lyrics),
        Commands::Config {
            base_url,
            user_agent,
        } => cmd_config(base_url, user_agent),
    }
}

fn cmd_search(name: &str, offset: u32, category: SearchCategory, lyrics: bool) -> Result<()> {
    let cfg = config::load_config();
    let transport =
        HttpTransport::new(&cfg.user_agent).context("failed to build the HTTP client")?;
    let client = NeteaseClient::new(Box::new(transport), &cfg.base_url);

    let track = client
        .search(name, offset, category)
        .with_context(|| format!("search for \"{name}\" failed"))?;

    // Diagnostic fetches; a failure here still leaves a usable result.
    if let Err(e) = client.fetch_info(&track) {
        eprintln!("info fetch failed: {e}");
    }
    if lyrics {
        if let Err(e) = client.fetch_lyrics(&track) {
            eprintln!("lyrics fetch failed: {e}");
        }
    }

    let mut table = Table::new();
    table.set_header(vec!["Title", "Id", "Stream URL"]);
    table.add_row(vec![
        Cell::new(&track.title),
        Cell::new(track.id),
        Cell::new(client.play_url(track.id)),
    ]);
    println!("{table}");

    Ok(())
}

fn cmd_config(base_url: Option<String>, user_agent: Option<String>) -> Result<()> {
    let mut cfg = config::load_config();

    if base_url.is_none() && user_agent.is_none() {
        print!("{}", toml::to_string_pretty(&cfg)?);
        return Ok(());
    }

    if let Some(url) = base_url {
        cfg.base_url = url;
    }
    if let Some(ua) = user_agent {
        cfg.user_agent = ua;
    }

    config::save_config(&cfg)?;
    println!("configuration saved");
    Ok(())
}
