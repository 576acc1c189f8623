//! Admin panel server. Connects, migrates, and serves the router on `BIND_ADDR`.

use tokio::net::TcpListener;
use trip_admin::{app, apply_migrations, connect, resources, AppState, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trip_admin=info")),
        )
        .init();

    let settings = Settings::from_env()?;
    let registry = resources::registry()?;
    let pool = connect(&settings).await?;
    apply_migrations(&pool, &registry).await?;
    tracing::info!(resources = registry.len(), "resources registered");

    let listener = TcpListener::bind(settings.bind_addr).await?;
    let addr = listener.local_addr()?;
    let docs = settings.documentation_url();
    let state = AppState::new(pool, registry, settings);
    tracing::info!(%addr, docs = %docs, "trip-admin listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
