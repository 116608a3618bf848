use infinity_backend::config::AppConfig;
use infinity_backend::player::repository::{
    InMemoryPlayerRepository, MongoPlayerRepository, PlayerRepository,
};
use infinity_backend::shared::AppState;
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "infinity_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dota Infinity backend");

    let config = AppConfig::from_env();

    // Player storage: MongoDB when configured, in-memory otherwise
    let repository: Arc<dyn PlayerRepository + Send + Sync> = match &config.mongodb_uri {
        Some(uri) => {
            let repository = MongoPlayerRepository::connect(uri, &config.database_name)
                .await
                .expect("Failed to connect to MongoDB");
            info!(database = %config.database_name, "Connected to MongoDB");
            Arc::new(repository)
        }
        None => {
            warn!("MONGODB_URI not set, player records will be lost on restart");
            Arc::new(InMemoryPlayerRepository::new())
        }
    };

    let app_state = AppState::new(repository, config.api_key.clone());

    // cap request handling time across all routes
    let app = infinity_backend::router(app_state).layer(TimeoutLayer::new(config.request_timeout));

    // run our app with hyper, listening globally on the configured port
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    info!("Server running on http://{}", addr);
    axum::serve(listener, app).await.unwrap();
}
