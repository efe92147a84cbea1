//! CLI definitions and command dispatch.

use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fonthost_core::{
    FontsHandler, HttpFetch, JsonSettingsStore, PublicStorage, SyncOptions, SyncRunner,
    config::{API_KEY_ENV, SITE_CONTEXT},
};

#[derive(Parser)]
#[command(name = "fonthost")]
#[command(about = "Self-host Google Fonts: sync the catalog and enable fonts per site")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct StorageArgs {
    /// Directory holding fonts.json and the per-font bundles.
    #[arg(long, default_value = "fonts")]
    pub fonts_dir: PathBuf,
    /// Root of the public files area.
    #[arg(long, default_value = "public")]
    pub public_dir: PathBuf,
    /// Settings store file.
    #[arg(long, default_value = "settings.json")]
    pub settings_file: PathBuf,
    /// Site context the operation applies to.
    #[arg(long, default_value = SITE_CONTEXT)]
    pub context: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Refresh the font catalog and download bundles from the Google Fonts API.
    Sync {
        #[arg(long, default_value = "fonts")]
        fonts_dir: PathBuf,
        /// API key; falls back to the GOOGLE_FONTS_API_KEY environment variable.
        #[arg(long)]
        api_key: Option<String>,
    },
    /// Enable a font: download its files and add it to the enabled list.
    Add {
        /// Font id (the catalog slug, e.g. `roboto`).
        #[arg(long)]
        font: String,
        #[command(flatten)]
        args: StorageArgs,
    },
    /// Disable a font: remove it from the enabled list and delete its files.
    Remove {
        /// Font id (the catalog slug, e.g. `roboto`).
        #[arg(long)]
        font: String,
        #[command(flatten)]
        args: StorageArgs,
    },
    /// Show enabled fonts and available options for a context.
    List {
        #[command(flatten)]
        args: StorageArgs,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Sync { fonts_dir, api_key } => {
                let api_key = api_key
                    .or_else(|| env::var(API_KEY_ENV).ok())
                    .with_context(|| format!("No API key; pass --api-key or set {API_KEY_ENV}"))?;
                let fetch = HttpFetch::new();
                SyncRunner::new(&fetch, SyncOptions { fonts_dir, api_key }).run()?;
            }
            Commands::Add { font, args } => {
                let mut handler = handler(&args)?;
                let redirect = handler.add(&font, &args.context);
                log::debug!("add {font}: {redirect:?}");
                print_settings(&handler, &args.context);
            }
            Commands::Remove { font, args } => {
                let mut handler = handler(&args)?;
                let redirect = handler.remove(&font, &args.context);
                log::debug!("remove {font}: {redirect:?}");
                print_settings(&handler, &args.context);
            }
            Commands::List { args } => {
                print_settings(&handler(&args)?, &args.context);
            }
        }
        Ok(())
    }
}

fn handler(args: &StorageArgs) -> Result<FontsHandler<JsonSettingsStore, HttpFetch>> {
    let store = JsonSettingsStore::open(&args.settings_file)?;
    Ok(FontsHandler::new(
        &args.fonts_dir,
        PublicStorage::new(&args.public_dir),
        store,
        HttpFetch::new(),
    ))
}

/// Render the settings view: enabled fonts plus the option count.
///
/// The one place a catalog failure is shown to the user; add/remove
/// failures only reach the log.
fn print_settings(handler: &FontsHandler<JsonSettingsStore, HttpFetch>, context: &str) {
    let options = match handler.options() {
        Ok(options) => options,
        Err(e) => {
            println!("The Google Fonts catalog could not be loaded: {e}");
            println!("Enabled fonts for {context}: (none)");
            return;
        }
    };

    println!("{} fonts available.", options.len());
    match handler.enabled_fonts(context) {
        Ok(enabled) if enabled.is_empty() => {
            println!("Enabled fonts for {context}: (none)");
        }
        Ok(enabled) => {
            println!("Enabled fonts for {context}:");
            for font in enabled {
                println!("  {} ({}, {}, {})", font.family, font.id, font.category, font.version);
            }
        }
        Err(e) => {
            println!("The enabled-font list could not be read: {e}");
        }
    }
}
