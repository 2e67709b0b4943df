pub mod catalog;
pub mod session;
pub mod team_store;

pub use crate::domain::model::{PokemonSummary, Team};
pub use crate::domain::ports::{CatalogSource, ConfigProvider, Storage};
pub use crate::utils::error::Result;
