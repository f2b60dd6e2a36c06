use pokedex_companion::{
    Config, NotificationLevel, PokeApiClient, RosterStore, ScoreLabel, analysis, showdown, storage,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let client = match PokeApiClient::new(&config.pokemon) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to create API client: {}", e);
            std::process::exit(1);
        }
    };
    let mut roster = RosterStore::new(storage::from_config(&config.storage));
    tracing::info!(
        "Loaded {} team members and {} favorites",
        roster.team.len(),
        roster.favorites.len()
    );

    for name in std::env::args().skip(1) {
        let details = match client.fetch_pokemon(&name).await {
            Ok(details) => details,
            Err(e) => {
                tracing::error!("Could not fetch {}: {}", name, e);
                continue;
            }
        };
        let notification = roster.team.add(&details.summary);
        match notification.level {
            NotificationLevel::Success => tracing::info!("{}", notification.message),
            _ => tracing::warn!("{}", notification.message),
        }
    }

    let team = roster.team.members();
    let report = analysis::analyze(team);
    match report.score() {
        Some(score) => tracing::info!(
            "Team score: {} ({})",
            score,
            ScoreLabel::from_score(score).as_str()
        ),
        None => tracing::info!("Team is empty"),
    }
    for (ty, count) in report.top_weaknesses() {
        tracing::info!("Weak to {}: {} members", ty, count);
    }
    for recommendation in report.recommendations(team.len()) {
        tracing::info!("{}", recommendation);
    }

    if !team.is_empty() {
        tracing::info!("Showdown export:\n{}", showdown::export_team(team));
    }
}
