use crate::core::team_store::TeamStore;
use crate::domain::model::{CreateTeamData, PokemonSummary, Team};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// Presentation-side team state: a cached copy of the store plus the team
/// currently being viewed. The store stays the only writer; the session just
/// keeps its derived references in step after each mutation.
pub struct TeamSession<'a, S: Storage> {
    store: &'a TeamStore<S>,
    teams: Vec<Team>,
    current: Option<Team>,
}

impl<'a, S: Storage> TeamSession<'a, S> {
    pub async fn load(store: &'a TeamStore<S>) -> Self {
        let teams = store.list_teams().await;
        Self {
            store,
            teams,
            current: None,
        }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn current(&self) -> Option<&Team> {
        self.current.as_ref()
    }

    pub async fn refresh(&mut self) {
        self.teams = self.store.list_teams().await;
    }

    /// Returns false and leaves the selection alone if the id is unknown.
    pub fn select(&mut self, team_id: &str) -> bool {
        match self.teams.iter().find(|t| t.id == team_id) {
            Some(team) => {
                self.current = Some(team.clone());
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.current = None;
    }

    pub async fn create_team(&mut self, data: CreateTeamData) -> Result<Team> {
        let team = self.store.create_team(data).await?;
        self.refresh().await;
        Ok(team)
    }

    pub async fn delete_team(&mut self, team_id: &str) -> Result<bool> {
        let deleted = self.store.delete_team(team_id).await?;
        if deleted {
            self.refresh().await;
            if self.is_current(team_id) {
                self.current = None;
            }
        }
        Ok(deleted)
    }

    pub async fn add_pokemon_to_team(
        &mut self,
        team_id: &str,
        pokemon: PokemonSummary,
    ) -> Result<Option<Team>> {
        let updated = self.store.add_pokemon_to_team(team_id, pokemon).await?;
        self.sync(updated.as_ref()).await;
        Ok(updated)
    }

    pub async fn remove_pokemon_from_team(
        &mut self,
        team_id: &str,
        pokemon_id: u32,
    ) -> Result<Option<Team>> {
        let updated = self.store.remove_pokemon_from_team(team_id, pokemon_id).await?;
        self.sync(updated.as_ref()).await;
        Ok(updated)
    }

    async fn sync(&mut self, updated: Option<&Team>) {
        let Some(team) = updated else {
            return;
        };
        self.refresh().await;
        if self.is_current(&team.id) {
            self.current = Some(team.clone());
        }
    }

    fn is_current(&self, team_id: &str) -> bool {
        self.current.as_ref().is_some_and(|t| t.id == team_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.files.lock().await.get(path).cloned())
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn pokemon(id: u32, name: &str) -> PokemonSummary {
        PokemonSummary {
            id,
            name: name.to_string(),
            url: format!("https://pokeapi.co/api/v2/pokemon/{}/", id),
            image: String::new(),
            types: vec![],
        }
    }

    #[tokio::test]
    async fn test_delete_current_team_clears_selection() {
        let store = TeamStore::new(MockStorage::default());
        let mut session = TeamSession::load(&store).await;
        let team = session.create_team(CreateTeamData::new("Ash")).await.unwrap();
        let other = session.create_team(CreateTeamData::new("Misty")).await.unwrap();

        assert!(session.select(&team.id));
        assert!(session.delete_team(&other.id).await.unwrap());
        assert_eq!(session.current().map(|t| t.id.as_str()), Some(team.id.as_str()));

        assert!(session.delete_team(&team.id).await.unwrap());
        assert!(session.current().is_none());
        assert!(session.teams().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_update_current_team() {
        let store = TeamStore::new(MockStorage::default());
        let mut session = TeamSession::load(&store).await;
        let team = session.create_team(CreateTeamData::new("Ash")).await.unwrap();
        session.select(&team.id);

        session
            .add_pokemon_to_team(&team.id, pokemon(25, "pikachu"))
            .await
            .unwrap();
        assert_eq!(session.current().unwrap().pokemon.len(), 1);
        assert_eq!(session.teams()[0].pokemon.len(), 1);

        let rejected = session
            .add_pokemon_to_team(&team.id, pokemon(25, "pikachu"))
            .await
            .unwrap();
        assert!(rejected.is_none());
        assert_eq!(session.current().unwrap().pokemon.len(), 1);

        session.remove_pokemon_from_team(&team.id, 25).await.unwrap();
        assert!(session.current().unwrap().pokemon.is_empty());
    }

    #[tokio::test]
    async fn test_select_unknown_team() {
        let store = TeamStore::new(MockStorage::default());
        let mut session = TeamSession::load(&store).await;

        assert!(!session.select("missing"));
        assert!(session.current().is_none());
    }

    #[tokio::test]
    async fn test_mutation_of_other_team_keeps_selection() {
        let store = TeamStore::new(MockStorage::default());
        let mut session = TeamSession::load(&store).await;
        let ash = session.create_team(CreateTeamData::new("Ash")).await.unwrap();
        let brock = session.create_team(CreateTeamData::new("Brock")).await.unwrap();
        session.select(&ash.id);

        session
            .add_pokemon_to_team(&brock.id, pokemon(95, "onix"))
            .await
            .unwrap();

        assert_eq!(session.current(), Some(&ash));
        session.clear_selection();
        assert!(session.current().is_none());
    }
}
