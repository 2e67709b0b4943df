use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A team can never hold more than this many Pokémon.
pub const MAX_TEAM_SIZE: usize = 6;

/// Minimal projection of a catalog Pokémon used for display and team membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub id: u32,
    pub name: String,
    pub url: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub pokemon: Vec<PokemonSummary>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn is_full(&self) -> bool {
        self.pokemon.len() >= MAX_TEAM_SIZE
    }

    pub fn contains(&self, pokemon_id: u32) -> bool {
        self.pokemon.iter().any(|p| p.id == pokemon_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateTeamData {
    pub name: String,
    pub description: Option<String>,
}

impl CreateTeamData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Editable team fields. `None` leaves a field as it is; a blank description clears it.
#[derive(Debug, Clone, Default)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// One `{name, url}` entry of a catalog list page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonListResponse {
    #[serde(default)]
    pub count: Option<u32>,
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<NamedResource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Artwork {
    pub front_default: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Option<Artwork>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: Option<OtherSprites>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSlot {
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatEntry {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub slot: u8,
}

/// Full detail record returned by the catalog's per-Pokémon endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PokemonDetails {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
}

impl PokemonDetails {
    /// Official artwork when present, otherwise the default sprite.
    pub fn image_url(&self) -> Option<&str> {
        self.sprites
            .other
            .as_ref()
            .and_then(|other| other.official_artwork.as_ref())
            .and_then(|artwork| artwork.front_default.as_deref())
            .or(self.sprites.front_default.as_deref())
    }

    pub fn type_names(&self) -> Vec<String> {
        let mut slots: Vec<&TypeSlot> = self.types.iter().collect();
        slots.sort_by_key(|t| t.slot);
        slots.into_iter().map(|t| t.kind.name.clone()).collect()
    }

    pub fn base_stat_total(&self) -> u32 {
        self.stats.iter().map(|s| s.base_stat).sum()
    }

    pub fn to_summary(&self, url: String) -> PokemonSummary {
        PokemonSummary {
            id: self.id,
            name: self.name.clone(),
            url,
            image: self.image_url().unwrap_or_default().to_string(),
            types: self.type_names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details_json(artwork: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "id": 25,
            "name": "pikachu",
            "height": 4,
            "weight": 60,
            "sprites": {
                "front_default": "https://img/sprites/25.png",
                "other": { "official-artwork": artwork }
            },
            "types": [
                { "slot": 1, "type": { "name": "electric", "url": "https://pokeapi.co/api/v2/type/13/" } }
            ],
            "stats": [
                { "base_stat": 35, "effort": 0, "stat": { "name": "hp", "url": "x" } },
                { "base_stat": 55, "effort": 0, "stat": { "name": "attack", "url": "x" } }
            ],
            "abilities": [
                { "ability": { "name": "static", "url": "x" }, "is_hidden": false, "slot": 1 }
            ]
        })
    }

    #[test]
    fn test_summary_prefers_official_artwork() {
        let details: PokemonDetails = serde_json::from_value(details_json(
            serde_json::json!({ "front_default": "https://img/artwork/25.png" }),
        ))
        .unwrap();

        let summary = details.to_summary("https://pokeapi.co/api/v2/pokemon/25/".to_string());
        assert_eq!(summary.image, "https://img/artwork/25.png");
        assert_eq!(summary.types, vec!["electric"]);
        assert_eq!(details.base_stat_total(), 90);
    }

    #[test]
    fn test_summary_falls_back_to_default_sprite() {
        let details: PokemonDetails =
            serde_json::from_value(details_json(serde_json::json!({ "front_default": null })))
                .unwrap();
        assert_eq!(details.image_url(), Some("https://img/sprites/25.png"));

        let mut details: PokemonDetails =
            serde_json::from_value(details_json(serde_json::json!(null))).unwrap();
        assert_eq!(details.image_url(), Some("https://img/sprites/25.png"));

        details.sprites.front_default = None;
        assert_eq!(details.to_summary(String::new()).image, "");
    }

    #[test]
    fn test_team_serializes_in_camel_case() {
        let team = Team {
            id: "1700000000000".to_string(),
            name: "Ash".to_string(),
            description: None,
            pokemon: vec![],
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(&team).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_team_reads_summary_without_types() {
        let raw = r#"[{"id":"1","name":"Ash","pokemon":[{"id":1,"name":"bulbasaur","url":"u","image":"i"}],"createdAt":"2024-01-01T00:00:00.000Z"}]"#;
        let teams: Vec<Team> = serde_json::from_str(raw).unwrap();
        assert_eq!(teams[0].pokemon[0].types, Vec::<String>::new());
        assert!(teams[0].contains(1));
        assert!(!teams[0].is_full());
    }
}
