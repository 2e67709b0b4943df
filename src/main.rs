use clap::Parser;
use poke_team_builder::config::{CatalogCommand, Command, TeamCommand};
use poke_team_builder::domain::ports::CatalogSource;
use poke_team_builder::utils::error::ErrorSeverity;
use poke_team_builder::utils::{logger, validation::Validate};
use poke_team_builder::{
    AppConfig, CatalogLoader, CliConfig, CreateTeamData, LoadOutcome, LoaderState, LocalStorage,
    PokeApiClient, PokemonDetails, PokemonSummary, Result, Team, TeamBuilderError, TeamStore,
    TeamUpdate, MAX_TEAM_SIZE,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("Resolved config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(e);
    }

    if let Err(e) = run(&config, cli.command).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        exit_with(e);
    }
}

fn exit_with(e: TeamBuilderError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::High => 1,
        ErrorSeverity::Medium => 2, // 可重試
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

async fn run(config: &AppConfig, command: Command) -> Result<()> {
    let catalog = PokeApiClient::from_config(config);

    match command {
        Command::Teams(command) => {
            let store = TeamStore::new(LocalStorage::from_config(config));
            run_teams(&store, &catalog, command).await
        }
        Command::Catalog(command) => run_catalog(CatalogLoader::new(catalog), command).await,
    }
}

async fn run_teams(
    store: &TeamStore<LocalStorage>,
    catalog: &PokeApiClient,
    command: TeamCommand,
) -> Result<()> {
    match command {
        TeamCommand::List => {
            let teams = store.list_teams().await;
            if teams.is_empty() {
                println!("No teams yet. Create one with `teams create <name>`.");
            }
            for team in &teams {
                println!(
                    "{}  {}  ({}/{})",
                    team.id,
                    team.name,
                    team.pokemon.len(),
                    MAX_TEAM_SIZE
                );
            }
        }
        TeamCommand::Show { id } => match store.get_team_by_id(&id).await {
            Some(team) => print_team(&team),
            None => println!("No team with id {}", id),
        },
        TeamCommand::Create { name, description } => {
            let team = store
                .create_team(CreateTeamData { name, description })
                .await?;
            println!("✅ Created team {} ({})", team.name, team.id);
        }
        TeamCommand::Rename {
            id,
            name,
            description,
        } => match store.update_team(&id, TeamUpdate { name, description }).await? {
            Some(team) => print_team(&team),
            None => println!("No team with id {}", id),
        },
        TeamCommand::Delete { id } => {
            if store.delete_team(&id).await? {
                println!("🗑️  Deleted team {}", id);
            } else {
                println!("No team with id {}", id);
            }
        }
        TeamCommand::Add { team_id, pokemon } => {
            let Some(details) = catalog.find(&pokemon).await? else {
                println!("No Pokémon matches '{}'", pokemon);
                return Ok(());
            };
            let summary = details.to_summary(catalog.resource_url(details.id));
            let name = summary.name.clone();

            match store.add_pokemon_to_team(&team_id, summary).await? {
                Some(team) => {
                    println!("✅ Added {} to {}", name, team.name);
                    print_team(&team);
                }
                None => println!(
                    "Could not add {}: team missing, already full, or already has it",
                    name
                ),
            }
        }
        TeamCommand::Remove {
            team_id,
            pokemon_id,
        } => match store.remove_pokemon_from_team(&team_id, pokemon_id).await? {
            Some(team) => print_team(&team),
            None => println!("No team with id {}", team_id),
        },
    }
    Ok(())
}

async fn run_catalog(loader: CatalogLoader<PokeApiClient>, command: CatalogCommand) -> Result<()> {
    match command {
        CatalogCommand::Browse { pages, filter } => {
            for _ in 0..pages.max(1) {
                if !matches!(loader.load_more().await, LoadOutcome::Loaded { .. }) {
                    break;
                }
            }
            let healthy = report_state(&loader);

            let shown = loader.filtered(filter.as_deref().unwrap_or_default());
            print_summaries(&shown);
            if loader.has_more() {
                println!("… more available (offset {})", loader.offset());
            }
            if !healthy {
                std::process::exit(2);
            }
        }
        CatalogCommand::Search { term } => {
            loader.search(&term).await;
            if !report_state(&loader) {
                std::process::exit(2);
            }
            let found = loader.pokemon();
            if found.is_empty() {
                println!("No Pokémon named '{}'", term.trim());
            }
            print_summaries(&found);
        }
        CatalogCommand::Show { pokemon } => match loader.source().find(&pokemon).await? {
            Some(details) => print_details(&details),
            None => println!("No Pokémon matches '{}'", pokemon),
        },
    }
    Ok(())
}

/// 目錄讀取失敗時仍列出已載入的部分，並以可重試代碼結束
fn report_state(loader: &CatalogLoader<PokeApiClient>) -> bool {
    if let LoaderState::Error(message) = loader.state() {
        eprintln!("⚠️  {}", message);
        eprintln!("💡 Run the same command again to retry");
        return false;
    }
    true
}

fn print_summaries(pokemon: &[PokemonSummary]) {
    for p in pokemon {
        println!("#{:<5} {:<16} {}", p.id, p.name, p.types.join("/"));
    }
}

fn print_team(team: &Team) {
    println!("{} [{}]", team.name, team.id);
    if let Some(description) = &team.description {
        println!("  {}", description);
    }
    println!("  created {}", team.created_at.format("%Y-%m-%d %H:%M"));
    for (slot, p) in team.pokemon.iter().enumerate() {
        println!("  {}. #{} {}", slot + 1, p.id, p.name);
    }
    for slot in team.pokemon.len()..MAX_TEAM_SIZE {
        println!("  {}. —", slot + 1);
    }
}

fn print_details(details: &PokemonDetails) {
    println!("#{} {}", details.id, details.name);
    println!("  types:   {}", details.type_names().join("/"));
    println!(
        "  height:  {:.1} m   weight: {:.1} kg",
        details.height as f32 / 10.0,
        details.weight as f32 / 10.0
    );
    for stat in &details.stats {
        println!("  {:<16} {}", stat.stat.name, stat.base_stat);
    }
    println!("  total            {}", details.base_stat_total());
    let abilities: Vec<String> = details
        .abilities
        .iter()
        .map(|a| {
            if a.is_hidden {
                format!("{} (hidden)", a.ability.name)
            } else {
                a.ability.name.clone()
            }
        })
        .collect();
    println!("  abilities: {}", abilities.join(", "));
    if let Some(image) = details.image_url() {
        println!("  artwork: {}", image);
    }
}
