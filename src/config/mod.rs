pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_url, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Resolved settings after merging command-line flags over the TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub data_dir: String,
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: DEFAULT_DATA_DIR.to_string(),
            verbose: false,
        }
    }
}

impl ConfigProvider for AppConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn data_dir(&self) -> &str {
        &self.data_dir
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_base_url", &self.api_base_url)?;
        validate_path("data_dir", &self.data_dir)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
pub use self::args::{CatalogCommand, CliConfig, Command, TeamCommand};

#[cfg(feature = "cli")]
mod args {
    use super::toml_config::TomlConfig;
    use super::AppConfig;
    use crate::utils::error::Result;
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "poke-team-builder")]
    #[command(about = "Browse the Pokémon catalog and build teams of up to six")]
    pub struct CliConfig {
        /// Path to a TOML configuration file
        #[arg(short, long)]
        pub config: Option<String>,

        /// Base URL of the Pokémon catalog API
        #[arg(long)]
        pub api_base_url: Option<String>,

        /// Directory holding the persisted teams
        #[arg(long)]
        pub data_dir: Option<String>,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub log_json: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// Manage locally stored teams
        #[command(subcommand)]
        Teams(TeamCommand),
        /// Browse or search the Pokémon catalog
        #[command(subcommand)]
        Catalog(CatalogCommand),
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum TeamCommand {
        List,
        Show {
            id: String,
        },
        Create {
            name: String,
            #[arg(short, long)]
            description: Option<String>,
        },
        Rename {
            id: String,
            #[arg(long)]
            name: Option<String>,
            #[arg(long)]
            description: Option<String>,
        },
        Delete {
            id: String,
        },
        /// Add a Pokémon, looked up by name or id
        Add {
            team_id: String,
            pokemon: String,
        },
        Remove {
            team_id: String,
            pokemon_id: u32,
        },
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum CatalogCommand {
        Browse {
            #[arg(long, default_value = "1")]
            pages: usize,
            /// Case-insensitive name filter over the loaded pages
            #[arg(long)]
            filter: Option<String>,
        },
        Search {
            term: String,
        },
        Show {
            /// Pokémon name or id
            pokemon: String,
        },
    }

    impl CliConfig {
        /// 合併設定：命令列 > TOML 檔案 > 預設值
        pub fn resolve(&self) -> Result<AppConfig> {
            let mut resolved = match &self.config {
                Some(path) => TomlConfig::from_file(path)?.into_app_config(),
                None => AppConfig::default(),
            };

            if let Some(url) = &self.api_base_url {
                resolved.api_base_url = url.clone();
            }
            if let Some(dir) = &self.data_dir {
                resolved.data_dir = dir.clone();
            }
            resolved.verbose |= self.verbose;

            Ok(resolved)
        }
    }

}
