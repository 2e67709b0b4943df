use crate::domain::model::{PokemonDetails, PokemonListResponse};
use crate::domain::ports::{CatalogSource, ConfigProvider};
use crate::utils::error::{Result, TeamBuilderError};
use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use std::sync::LazyLock;

static RESOURCE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)/?$").expect("resource id pattern is valid"));

/// Pulls the trailing numeric id out of a catalog resource URL such as
/// `https://pokeapi.co/api/v2/pokemon/25/`.
pub fn extract_id_from_url(url: &str) -> Option<u32> {
    RESOURCE_ID
        .captures(url)
        .and_then(|caps| caps[1].parse().ok())
        .filter(|id| *id > 0)
}

#[derive(Debug, Clone)]
pub struct PokeApiClient {
    base_url: String,
    client: Client,
}

impl PokeApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn from_config(config: &impl ConfigProvider) -> Self {
        Self::new(config.api_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Looks a Pokémon up by numeric id or by name. A miss is `Ok(None)` either way.
    pub async fn find(&self, query: &str) -> Result<Option<PokemonDetails>> {
        match query.trim().parse::<u32>() {
            Ok(id) => match self.pokemon_by_id(id).await {
                Ok(details) => Ok(Some(details)),
                Err(e) if e.is_not_found() => Ok(None),
                Err(e) => Err(e),
            },
            Err(_) => self.pokemon_by_name(query).await,
        }
    }

    async fn get_details(&self, url: String) -> Result<Option<PokemonDetails>> {
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(TeamBuilderError::FetchError {
                url,
                status: status.as_u16(),
            });
        }

        Ok(Some(response.json().await?))
    }
}

#[async_trait]
impl CatalogSource for PokeApiClient {
    async fn list_page(&self, offset: usize, limit: usize) -> Result<PokemonListResponse> {
        let url = format!("{}/pokemon?offset={}&limit={}", self.base_url, offset, limit);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(TeamBuilderError::FetchError {
                url,
                status: status.as_u16(),
            });
        }

        Ok(response.json().await?)
    }

    async fn pokemon_by_id(&self, id: u32) -> Result<PokemonDetails> {
        let url = format!("{}/pokemon/{}", self.base_url, id);
        match self.get_details(url.clone()).await? {
            Some(details) => Ok(details),
            None => Err(TeamBuilderError::FetchError {
                url,
                status: StatusCode::NOT_FOUND.as_u16(),
            }),
        }
    }

    async fn pokemon_by_name(&self, name: &str) -> Result<Option<PokemonDetails>> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Ok(None);
        }
        let encoded: String = url::form_urlencoded::byte_serialize(name.as_bytes()).collect();
        self.get_details(format!("{}/pokemon/{}", self.base_url, encoded))
            .await
    }

    fn resource_url(&self, id: u32) -> String {
        format!("{}/pokemon/{}/", self.base_url, id)
    }
}
