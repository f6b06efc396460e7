use chirpy::{
    auth::TokenService, config::Config, db::Store, repository::Repository, routes, states::AppState,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let store = Store::open(config.database_path.clone())?;
    let repo = Repository::new(store, TokenService::new(&config.jwt_secret));
    let state = AppState::new(repo, config.polka_key.clone());

    let app = routes::router(state, &config.static_dir);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    info!("Server running on http://{}", config.bind_addr);
    info!("Database: {}", config.database_path.display());
    info!("API Endpoints:");
    info!("  GET    /api/healthz          - Health check");
    info!("  POST   /api/users            - Create account");
    info!("  PUT    /api/users            - Update account (auth)");
    info!("  POST   /api/login            - Login");
    info!("  POST   /api/refresh          - New access token (refresh token)");
    info!("  POST   /api/revoke           - Revoke refresh token");
    info!("  POST   /api/chirps           - Create chirp (auth)");
    info!("  GET    /api/chirps           - List chirps (?author_id=&sort=)");
    info!("  GET    /api/chirps/{{id}}      - Get specific chirp");
    info!("  DELETE /api/chirps/{{id}}      - Delete chirp (auth, author only)");
    info!("  POST   /api/polka/webhooks   - Payment provider webhook");
    info!("  GET    /admin/metrics        - File server hits");

    axum::serve(listener, app).await?;
    Ok(())
}
