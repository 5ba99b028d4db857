use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use homies_server::config::Config;
use homies_server::db::PgEventStore;
use homies_server::routes::create_routes;
use homies_server::state::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let store = PgEventStore::connect(&config)
        .await
        .expect("Failed to connect to database");

    tracing::info!(max_connections = config.max_connections, "Connected to database");

    store.migrate().await.expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let app = create_routes(AppState::new(store));

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    tracing::info!("Server running at http://{}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server failed");
}
