use crate::domain::model::{CreateTeamData, PokemonSummary, Team, TeamUpdate};
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use crate::utils::validation::{normalize_description, normalize_team_name};
use chrono::Utc;

/// The single key every team is persisted under.
pub const STORAGE_KEY: &str = "pokemon-teams.json";

/// Sole owner of persisted teams.
///
/// Every operation reads the whole collection, mutates it and writes it back.
/// There is no locking: two processes sharing a data directory overwrite each
/// other and the last writer wins.
pub struct TeamStore<S: Storage> {
    storage: S,
}

impl<S: Storage> TeamStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// All teams, oldest first. Missing or unreadable state is an empty store.
    pub async fn list_teams(&self) -> Vec<Team> {
        self.read_or_empty().await
    }

    pub async fn get_team_by_id(&self, id: &str) -> Option<Team> {
        self.read_or_empty().await.into_iter().find(|t| t.id == id)
    }

    pub async fn create_team(&self, data: CreateTeamData) -> Result<Team> {
        let name = normalize_team_name(&data.name)?;
        let description = normalize_description(data.description.as_deref())?;

        let mut teams = self.read_all().await?;
        let team = Team {
            id: generate_team_id(&teams),
            name,
            description,
            pokemon: Vec::new(),
            created_at: Utc::now(),
        };

        teams.push(team.clone());
        self.write_all(&teams).await?;

        tracing::info!(id = %team.id, name = %team.name, "Created team");
        Ok(team)
    }

    /// Returns `Ok(None)` when no team has that id.
    pub async fn update_team(&self, id: &str, update: TeamUpdate) -> Result<Option<Team>> {
        let name = update.name.as_deref().map(normalize_team_name).transpose()?;
        let description = update
            .description
            .as_deref()
            .map(|d| normalize_description(Some(d)))
            .transpose()?;

        let mut teams = self.read_all().await?;
        let Some(team) = teams.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(name) = name {
            team.name = name;
        }
        if let Some(description) = description {
            team.description = description;
        }
        let updated = team.clone();

        self.write_all(&teams).await?;
        tracing::info!(id = %updated.id, "Updated team");
        Ok(Some(updated))
    }

    /// Returns whether a team was removed. An absent id writes nothing.
    pub async fn delete_team(&self, id: &str) -> Result<bool> {
        let mut teams = self.read_all().await?;
        let before = teams.len();
        teams.retain(|t| t.id != id);

        if teams.len() == before {
            tracing::debug!(id, "Delete ignored, no such team");
            return Ok(false);
        }

        self.write_all(&teams).await?;
        tracing::info!(id, "Deleted team");
        Ok(true)
    }

    /// `Ok(None)` without touching storage if the team is missing, full, or
    /// already holds a Pokémon with the same id.
    pub async fn add_pokemon_to_team(
        &self,
        team_id: &str,
        pokemon: PokemonSummary,
    ) -> Result<Option<Team>> {
        let mut teams = self.read_all().await?;
        let Some(team) = teams.iter_mut().find(|t| t.id == team_id) else {
            return Ok(None);
        };

        if team.is_full() {
            tracing::debug!(team_id, "Team is full");
            return Ok(None);
        }
        if team.contains(pokemon.id) {
            tracing::debug!(team_id, pokemon_id = pokemon.id, "Pokémon already on team");
            return Ok(None);
        }

        tracing::info!(team_id, pokemon = %pokemon.name, "Adding Pokémon to team");
        team.pokemon.push(pokemon);
        let updated = team.clone();

        self.write_all(&teams).await?;
        Ok(Some(updated))
    }

    /// Returns the team even when it held no matching Pokémon.
    pub async fn remove_pokemon_from_team(
        &self,
        team_id: &str,
        pokemon_id: u32,
    ) -> Result<Option<Team>> {
        let mut teams = self.read_all().await?;
        let Some(team) = teams.iter_mut().find(|t| t.id == team_id) else {
            return Ok(None);
        };

        team.pokemon.retain(|p| p.id != pokemon_id);
        let updated = team.clone();

        self.write_all(&teams).await?;
        tracing::info!(team_id, pokemon_id, "Removed Pokémon from team");
        Ok(Some(updated))
    }

    async fn read_or_empty(&self) -> Vec<Team> {
        self.read_all().await.unwrap_or_else(|e| {
            tracing::warn!("Could not read stored teams, treating as empty: {}", e);
            Vec::new()
        })
    }

    /// Missing or malformed data is an empty store; a failed read is an error.
    async fn read_all(&self) -> Result<Vec<Team>> {
        let Some(bytes) = self.storage.read_file(STORAGE_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_slice(&bytes) {
            Ok(teams) => Ok(teams),
            Err(e) => {
                tracing::warn!("Stored teams are malformed, treating as empty: {}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn write_all(&self, teams: &[Team]) -> Result<()> {
        let data = serde_json::to_vec_pretty(teams)?;
        tracing::debug!("Persisting {} teams ({} bytes)", teams.len(), data.len());
        self.storage.write_file(STORAGE_KEY, &data).await
    }
}

/// Millisecond timestamp, bumped past any id already in use.
fn generate_team_id(teams: &[Team]) -> String {
    let mut candidate = Utc::now().timestamp_millis();
    while teams.iter().any(|t| t.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}
