use httpmock::prelude::*;
use poke_team_builder::{CatalogLoader, LoadOutcome, LoaderState, PokeApiClient, PAGE_SIZE};
use std::collections::HashSet;

fn details_body(id: u32, name: &str, artwork: bool) -> serde_json::Value {
    let artwork = if artwork {
        serde_json::json!({ "front_default": format!("https://img/artwork/{}.png", id) })
    } else {
        serde_json::json!({ "front_default": null })
    };
    serde_json::json!({
        "id": id,
        "name": name,
        "height": 7,
        "weight": 69,
        "sprites": {
            "front_default": format!("https://img/sprites/{}.png", id),
            "other": { "official-artwork": artwork }
        },
        "types": [{ "slot": 1, "type": { "name": "grass", "url": "https://pokeapi.co/api/v2/type/12/" } }],
        "stats": [{ "base_stat": 45, "effort": 0, "stat": { "name": "hp", "url": "x" } }],
        "abilities": [{ "ability": { "name": "overgrow", "url": "x" }, "is_hidden": false, "slot": 1 }]
    })
}

/// Mounts a list page plus one detail endpoint per entry.
fn mount_page<'a>(
    server: &'a MockServer,
    offset: usize,
    ids: std::ops::RangeInclusive<u32>,
    has_next: bool,
) -> Vec<httpmock::Mock<'a>> {
    let results: Vec<serde_json::Value> = ids
        .clone()
        .map(|id| {
            serde_json::json!({
                "name": format!("mon-{}", id),
                "url": server.url(format!("/pokemon/{}/", id)),
            })
        })
        .collect();
    let next = has_next
        .then(|| server.url(format!("/pokemon?offset={}&limit=20", offset + PAGE_SIZE)));

    let mut mocks = vec![server.mock(|when, then| {
        when.method(GET)
            .path("/pokemon")
            .query_param("offset", offset.to_string())
            .query_param("limit", PAGE_SIZE.to_string());
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "count": 1302,
                "next": next,
                "previous": null,
                "results": results,
            }));
    })];

    for id in ids {
        mocks.push(server.mock(|when, then| {
            when.method(GET).path(format!("/pokemon/{}", id));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(details_body(id, &format!("mon-{}", id), id % 2 == 0));
        }));
    }
    mocks
}

#[tokio::test]
async fn test_two_pages_accumulate_forty_unique() {
    let server = MockServer::start();
    let first = mount_page(&server, 0, 1..=20, true);
    let second = mount_page(&server, 20, 21..=40, true);

    let loader = CatalogLoader::new(PokeApiClient::new(server.url("")));
    assert_eq!(loader.load_next_page().await, LoadOutcome::Loaded { added: 20 });
    assert_eq!(loader.load_next_page().await, LoadOutcome::Loaded { added: 20 });

    for mock in first.iter().chain(second.iter()) {
        mock.assert();
    }

    let pokemon = loader.pokemon();
    assert_eq!(pokemon.len(), 40);
    let names: HashSet<&str> = pokemon.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names.len(), 40);
    assert_eq!(pokemon[0].id, 1);
    assert_eq!(pokemon[39].id, 40);
    assert_eq!(loader.offset(), 40);
    assert!(loader.has_more());
}

#[tokio::test]
async fn test_summary_image_fallback() {
    let server = MockServer::start();
    let _mocks = mount_page(&server, 0, 1..=20, false);

    let loader = CatalogLoader::new(PokeApiClient::new(server.url("")));
    loader.load_next_page().await;

    let pokemon = loader.pokemon();
    // even ids carry official artwork, odd ids only the default sprite
    assert_eq!(pokemon[0].image, "https://img/sprites/1.png");
    assert_eq!(pokemon[1].image, "https://img/artwork/2.png");
    assert_eq!(pokemon[0].types, vec!["grass"]);
    assert_eq!(pokemon[0].url, server.url("/pokemon/1/"));
    assert!(!loader.has_more());
}

#[tokio::test]
async fn test_failing_detail_fails_page_and_retry_recovers() {
    let server = MockServer::start();
    let results: Vec<serde_json::Value> = (1..=20)
        .map(|id| {
            serde_json::json!({
                "name": format!("mon-{}", id),
                "url": server.url(format!("/pokemon/{}/", id)),
            })
        })
        .collect();
    server.mock(|when, then| {
        when.method(GET).path("/pokemon").query_param("offset", "0");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({ "next": null, "results": results }));
    });
    for id in 1..=19 {
        server.mock(|when, then| {
            when.method(GET).path(format!("/pokemon/{}", id));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(details_body(id, &format!("mon-{}", id), true));
        });
    }
    let mut broken = server.mock(|when, then| {
        when.method(GET).path("/pokemon/20");
        then.status(500);
    });

    let loader = CatalogLoader::new(PokeApiClient::new(server.url("")));
    assert_eq!(loader.load_next_page().await, LoadOutcome::Failed);
    assert!(loader.pokemon().is_empty());
    assert_eq!(loader.offset(), 0);
    assert!(matches!(loader.state(), LoaderState::Error(_)));

    broken.delete();
    server.mock(|when, then| {
        when.method(GET).path("/pokemon/20");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(details_body(20, "mon-20", true));
    });

    assert_eq!(loader.load_next_page().await, LoadOutcome::Loaded { added: 20 });
    assert_eq!(loader.state(), LoaderState::Idle);
}

#[tokio::test]
async fn test_list_endpoint_down_is_error_state() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/pokemon");
        then.status(503);
    });

    let loader = CatalogLoader::new(PokeApiClient::new(server.url("")));
    assert_eq!(loader.load_next_page().await, LoadOutcome::Failed);
    assert!(matches!(loader.state(), LoaderState::Error(_)));
    assert!(!loader.is_loading());
}

#[tokio::test]
async fn test_search_known_name() {
    let server = MockServer::start();
    let search_mock = server.mock(|when, then| {
        when.method(GET).path("/pokemon/pikachu");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(details_body(25, "pikachu", true));
    });

    let loader = CatalogLoader::new(PokeApiClient::new(server.url("")));
    assert_eq!(loader.search("pikachu").await, LoadOutcome::Loaded { added: 1 });

    search_mock.assert();
    let found = loader.pokemon();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "pikachu");
    assert!(!loader.has_more());
}

#[tokio::test]
async fn test_search_nonsense_is_empty_not_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/pokemon/zzzznotapokemon");
        then.status(404).body("Not Found");
    });

    let loader = CatalogLoader::new(PokeApiClient::new(server.url("")));
    assert_eq!(loader.search("zzzznotapokemon").await, LoadOutcome::Loaded { added: 0 });
    assert!(loader.pokemon().is_empty());
    assert_eq!(loader.state(), LoaderState::Idle);
}

#[tokio::test]
async fn test_clearing_search_reloads_first_page() {
    let server = MockServer::start();
    let first = mount_page(&server, 0, 1..=20, true);
    server.mock(|when, then| {
        when.method(GET).path("/pokemon/mon-99");
        then.status(404);
    });

    let loader = CatalogLoader::new(PokeApiClient::new(server.url("")));
    loader.load_next_page().await;
    loader.search("mon-99").await;
    assert!(loader.pokemon().is_empty());
    assert!(!loader.has_more());

    assert_eq!(loader.search("").await, LoadOutcome::Loaded { added: 20 });
    assert_eq!(first[0].hits(), 2);
    assert_eq!(loader.pokemon().len(), 20);
    assert!(loader.has_more());
}

#[tokio::test]
async fn test_fetch_details() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/pokemon/1");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(details_body(1, "bulbasaur", true));
    });

    let loader = CatalogLoader::new(PokeApiClient::new(server.url("")));
    let details = loader.fetch_details(1).await.unwrap();

    assert_eq!(details.name, "bulbasaur");
    assert_eq!(details.height, 7);
    assert_eq!(details.abilities[0].ability.name, "overgrow");
    assert_eq!(details.base_stat_total(), 45);
    assert!(loader.fetch_details(2).await.is_err());
}
