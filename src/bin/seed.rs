//! Seed the admin user. Safe to run repeatedly.

use trip_admin::{apply_migrations, connect, resources, seed_admin, Settings};

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
    let id = seed_admin(&pool).await?;
    println!("Admin user ready: {} (id {})", trip_admin::seed::ADMIN_EMAIL, id);
    Ok(())
}
