//! Memberboard backend
//!
//! All operations are exposed via GraphQL at /graphql.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use memberboard::AppState;
use memberboard::api;
use memberboard::cli::CliOptions;
use memberboard::config::Config;
use memberboard::db::Database;
use memberboard::graphql;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memberboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let cli = CliOptions::from_args();
    let config = Arc::new(Config::from_env()?);
    tracing::info!("Configuration loaded");

    if cli.print_schema {
        let schema = graphql::build_schema(Database::disconnected()?, &config.schema_limits());
        println!("{}", schema.sdl());
        return Ok(());
    }

    let db = Database::connect(&config.database_url, config.database_max_connections).await?;
    db.migrate().await?;
    tracing::info!("Database migrations applied");

    if cli.migrate_only {
        return Ok(());
    }

    let schema = graphql::build_schema(db.clone(), &config.schema_limits());
    tracing::info!("GraphQL schema built");

    let state = AppState {
        config: config.clone(),
        db,
        schema,
    };
    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);
    tracing::info!(
        "GraphiQL: http://{}:{}/graphql",
        config.host.as_deref().unwrap_or("localhost"),
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
