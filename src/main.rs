use axum::{Json, Router, routing::get};
use cvlforum::{AppState, Config, auth, categories, db, messages, profiles};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, cookie::SameSite};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let db_pool = db::connect(&config.database_url).await?;
    db::init_schema(&db_pool).await?;

    let clients = match std::fs::read_to_string(&config.client_secret_path) {
        Ok(raw) => auth::Clients::from_json(&serde_json::from_str(&raw)?, &config.oauth_redirect_base)?,
        Err(err) => {
            tracing::warn!("no OAuth keys at {} ({err}), sign-in disabled", config.client_secret_path);
            auth::Clients::none()
        }
    };

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(12)));

    let bind_addr = config.bind_addr.clone();
    let app_state = AppState { db_pool, clients, config };

    let app = Router::new()
        .route("/", get(health))
        .merge(auth::router())
        .nest("/messages", messages::router())
        .nest("/categories", categories::router())
        .nest("/profiles", profiles::router())
        .with_state(app_state)
        .layer(session_layer)
        .layer(CorsLayer::permissive());

    tracing::info!("listening on {bind_addr}");
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "service": "cvlforum", "status": "ok" }))
}
