//! Command-line front end over a file-seeded in-memory store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use crate::backing::MemoryBackingStore;
use crate::config::{EngineConfig, Settings};
use crate::engine::SettingsEngine;
use crate::ids::UuidIds;

#[derive(Debug, Parser)]
#[command(name = "settings-engine", version, about = "Inspect and edit provider settings")]
pub struct Cli {
    /// Settings file (JSON). Created with factory defaults when missing.
    #[arg(long, short)]
    pub seed: PathBuf,

    /// Engine configuration file (TOML). Defaults to the user config dir.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the full settings as JSON.
    Show,
    /// List providers, marking the current one.
    Providers,
    /// Make a provider the current one.
    UseProvider { id: String },
    DeleteProvider { id: String },
    AddLanguage { name: String },
    RemoveLanguage { name: String },
    DefaultInput { name: String },
    DefaultOutput { name: String },
    /// Check a provider profile; `--live` also checks credentials.
    ValidateProvider {
        id: String,
        #[arg(long)]
        live: bool,
        #[arg(long)]
        model: Option<String>,
    },
    /// Restore factory defaults.
    Reset,
}

impl Command {
    fn mutates(&self) -> bool {
        !matches!(
            self,
            Command::Show | Command::Providers | Command::ValidateProvider { .. }
        )
    }
}

fn read_seed(path: &Path) -> anyhow::Result<Settings> {
    if !path.exists() {
        return Ok(Settings::factory_defaults());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse settings file '{}'", path.display()))
}

fn write_seed(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write settings file '{}'", path.display()))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path)?,
        None => EngineConfig::load()?,
    };

    let store = Arc::new(MemoryBackingStore::new(read_seed(&cli.seed)?));
    let engine = SettingsEngine::new(store.clone(), Arc::new(UuidIds), &config);
    engine.fetch_settings().await?;

    match &cli.command {
        Command::Show => {
            println!("{}", serde_json::to_string_pretty(engine.snapshot().baseline())?);
        }
        Command::Providers => {
            let state = engine.snapshot();
            let settings = state.baseline();
            for provider in &settings.available_providers {
                let marker = if provider.id == settings.current_provider.id {
                    "*"
                } else {
                    " "
                };
                let auth = if provider.is_configured() {
                    "configured"
                } else {
                    "missing credentials"
                };
                println!(
                    "{} {}\t{}\t{}\t{}",
                    marker, provider.id, provider.name, provider.base_url, auth
                );
            }
        }
        Command::UseProvider { id } => {
            let provider = engine.set_current_provider(id).await?;
            println!("Current provider: {} ({})", provider.name, provider.id);
        }
        Command::DeleteProvider { id } => {
            engine.delete_provider(id).await?;
            println!("Deleted provider {}", id);
        }
        Command::AddLanguage { name } => {
            let languages = engine.add_language(name).await?;
            println!("Languages: {}", languages.join(", "));
        }
        Command::RemoveLanguage { name } => {
            let languages = engine.remove_language(name).await?;
            println!("Languages: {}", languages.join(", "));
        }
        Command::DefaultInput { name } => {
            engine.set_default_input_language(name).await?;
            println!("Default input language: {}", name);
        }
        Command::DefaultOutput { name } => {
            engine.set_default_output_language(name).await?;
            println!("Default output language: {}", name);
        }
        Command::ValidateProvider { id, live, model } => {
            let Some(provider) = engine.snapshot().baseline().provider(id).cloned() else {
                bail!("Provider '{}' not found", id);
            };
            let valid = engine
                .validate_provider(provider, *live, model.clone())
                .await?;
            println!("{}", if valid { "valid" } else { "invalid" });
        }
        Command::Reset => {
            engine.reset_to_defaults().await?;
            println!("Settings reset to factory defaults");
        }
    }

    if cli.command.mutates() {
        write_seed(&cli.seed, &store.snapshot())?;
    }
    Ok(())
}
