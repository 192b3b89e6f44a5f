use std::sync::Arc;

use anyhow::Result;
use api::{
    AppState, create_router,
    repositories::{
        LikeRepository, PlaylistRepository, SubscriptionRepository, VideoRepository,
    },
};
use common::{
    database::{self, DatabaseConfig},
    jwt::{JwtConfig, JwtService},
    telemetry,
};
use tokio::net::TcpListener;
use tracing::info;

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:3001";

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    info!("Starting API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = database::init_pool(&db_config).await?;

    // Check database connectivity
    if database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    database::run_migrations(&pool).await?;

    let jwt_service = JwtService::new(JwtConfig::from_env()?)?;

    let app_state = AppState {
        jwt_service,
        videos: Arc::new(VideoRepository::new(pool.clone())),
        playlists: Arc::new(PlaylistRepository::new(pool.clone())),
        subscriptions: Arc::new(SubscriptionRepository::new(pool.clone())),
        likes: Arc::new(LikeRepository::new(pool)),
    };

    let app = create_router(app_state);

    let server_addr =
        std::env::var("SERVER_ADDR").unwrap_or_else(|_| DEFAULT_SERVER_ADDR.to_string());
    let listener = TcpListener::bind(&server_addr).await?;
    info!("API service listening on {}", server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
