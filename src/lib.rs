pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::PokeApiClient;
pub use crate::config::{cli::LocalStorage, AppConfig};
pub use crate::core::{
    catalog::{CatalogLoader, LoadOutcome, LoaderState, PAGE_SIZE},
    session::TeamSession,
    team_store::{TeamStore, STORAGE_KEY},
};
pub use crate::domain::model::{
    CreateTeamData, PokemonDetails, PokemonSummary, Team, TeamUpdate, MAX_TEAM_SIZE,
};
pub use crate::utils::error::{Result, TeamBuilderError};
