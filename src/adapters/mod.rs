// Adapters layer: concrete implementations for external systems (the Pokémon catalog over HTTP).

pub mod pokeapi;

pub use pokeapi::{extract_id_from_url, PokeApiClient};
