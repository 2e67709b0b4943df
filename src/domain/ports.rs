use crate::domain::model::{PokemonDetails, PokemonListResponse};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Flat key-value persistence. A missing key reads as `Ok(None)`.
pub trait Storage: Send + Sync {
    fn read_file(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn data_dir(&self) -> &str;
}

/// The external Pokémon catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn list_page(&self, offset: usize, limit: usize) -> Result<PokemonListResponse>;
    async fn pokemon_by_id(&self, id: u32) -> Result<PokemonDetails>;
    /// `Ok(None)` when the catalog has no Pokémon with that exact name.
    async fn pokemon_by_name(&self, name: &str) -> Result<Option<PokemonDetails>>;
    fn resource_url(&self, id: u32) -> String;
}
