//! podbio CLI
//!
//! Inspect design tokens, resolve page styles, sanitize widget styles, and
//! extract palettes from artwork.

use anyhow::Result;
use clap::{Parser, Subcommand};
use podbio_theme::{InMemoryThemes, PageStyleRecord, ThemeData, ThemeRecord};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{debug, warn};

mod commands;
mod config;
mod logging;

use config::PodbioConfig;

#[derive(Parser)]
#[command(name = "podbio")]
#[command(author, version, about = "podbio theme engine tooling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to podbio.toml (defaults to ./podbio.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every resolved design token
    Tokens {
        /// JSON file with theme_data overrides to apply first
        #[arg(long)]
        theme_data: Option<PathBuf>,

        /// Only print one layer (core, semantic, component)
        #[arg(long)]
        layer: Option<String>,
    },

    /// Resolve a page's final style map
    Resolve {
        /// JSON file with the page style record
        #[arg(long)]
        page: PathBuf,

        /// JSON file with a single theme record to resolve against
        #[arg(long, conflicts_with = "themes")]
        theme: Option<PathBuf>,

        /// JSON file with an array of theme records (overrides config)
        #[arg(long)]
        themes: Option<PathBuf>,

        /// Report which tier supplied each value
        #[arg(long)]
        sources: bool,
    },

    /// Validate a widget style JSON object against the schema
    Sanitize {
        /// JSON file with the widget style object
        file: PathBuf,
    },

    /// Extract primary, secondary, and accent colors from an image
    Palette {
        /// Image path, file:// URI, or data: URI
        image: String,

        /// Print as theme_data color overrides
        #[arg(long)]
        as_theme_data: bool,
    },

    /// Write a default podbio.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = PodbioConfig::load(cli.config.as_deref())?;
    logging::init_logging(cli.verbose, &config.log.level)?;
    debug!(?config, "loaded configuration");

    match cli.command {
        Commands::Tokens { theme_data, layer } => {
            let data: Option<ThemeData> = theme_data
                .as_deref()
                .map(commands::read_json)
                .transpose()?;
            print!("{}", commands::tokens(data.as_ref(), layer.as_deref())?);
        }
        Commands::Resolve {
            page,
            theme,
            themes,
            sources,
        } => {
            let page: PageStyleRecord = commands::read_json(&page)?;
            let theme: Option<ThemeRecord> =
                theme.as_deref().map(commands::read_json).transpose()?;
            let themes = match themes.as_ref().or(config.themes.path.as_ref()) {
                Some(path) => commands::load_themes(path)?,
                None => InMemoryThemes::new(),
            };
            let out = commands::resolve(&page, theme.as_ref(), &themes, sources)?;
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Sanitize { file } => {
            let bag: Map<String, Value> = commands::read_json(&file)?;
            let out = commands::sanitize(&bag);
            if out["diagnostics"]
                .as_array()
                .is_some_and(|d| !d.is_empty())
            {
                warn!(file = %file.display(), "widget style had invalid entries");
            }
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Palette {
            image,
            as_theme_data,
        } => {
            let out = commands::palette(&image, &config.palette, as_theme_data)?;
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::Init { path, force } => {
            commands::init(&path, force)?;
            println!("Created {}", path.join(config::CONFIG_FILE).display());
        }
    }

    Ok(())
}
