//! Issue a fresh access token for the test user, revoking its previous ones.

use trip_admin::{apply_migrations, connect, issue_test_token, resources, Settings};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("trip_admin=warn")),
        )
        .init();

    let settings = Settings::from_env()?;
    let registry = resources::registry()?;
    let pool = connect(&settings).await?;
    apply_migrations(&pool, &registry).await?;
    let token = issue_test_token(&pool).await?;

    println!("Token generated successfully!");
    println!("Token: {}", token);
    println!();
    println!("Use it in the API documentation at {}:", settings.documentation_url());
    println!("  1. Click \"Authorize\"");
    println!("  2. Enter: Bearer {}", token);
    println!("  3. Click \"Authorize\" again to confirm");
    Ok(())
}
