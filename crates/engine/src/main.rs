//! CharVault server - main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use charvault_engine::api;
use charvault_engine::app::App;
use charvault_engine::infrastructure::{
    clock::SystemClock,
    memory::MemoryStore,
    neo4j::{ensure_schema, Neo4jCharacterStore},
    ports::{CharacterStore, ClockPort},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present.
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charvault_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting CharVault");

    // Load configuration
    let backend = std::env::var("STORE_BACKEND").unwrap_or_else(|_| "neo4j".into());
    let server_host = std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let server_port: u16 = std::env::var("SERVER_PORT")
        .or_else(|_| std::env::var("PORT"))
        .unwrap_or_else(|_| "8765".into())
        .parse()
        .unwrap_or(8765);

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    let store: Arc<dyn CharacterStore> = match backend.as_str() {
        "memory" => {
            tracing::info!("Using the in-memory character store");
            Arc::new(MemoryStore::new(clock))
        }
        _ => {
            let uri =
                std::env::var("NEO4J_URI").unwrap_or_else(|_| "bolt://localhost:7687".into());
            let user = std::env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".into());
            let password = std::env::var("NEO4J_PASSWORD").unwrap_or_else(|_| "password".into());
            let database = std::env::var("NEO4J_DATABASE").unwrap_or_else(|_| "neo4j".into());
            let label =
                std::env::var("NEO4J_CHARACTER_LABEL").unwrap_or_else(|_| "Character".into());

            tracing::info!("Connecting to Neo4j at {}", uri);
            let config = neo4rs::ConfigBuilder::default()
                .uri(&uri)
                .user(&user)
                .password(&password)
                .db(database.as_str())
                .build()?;
            let graph = neo4rs::Graph::connect(config).await?;

            // Ensure database schema (constraints and indexes)
            ensure_schema(&graph, &label).await?;

            Arc::new(Neo4jCharacterStore::new(graph, label, clock))
        }
    };

    let app = Arc::new(App::new(store));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = api::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = format!("{server_host}:{server_port}").parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
