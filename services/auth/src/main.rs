use std::sync::Arc;

use anyhow::Result;
use auth::{
    AppState, AuthService,
    config::AuthConfig,
    create_router,
    otp::TracingOtpSender,
    repositories::{OtpRepository, UserRepository},
};
use common::{
    database::{self, DatabaseConfig},
    jwt::JwtService,
    telemetry,
};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    info!("Starting authentication service");

    let config = AuthConfig::from_env()?;
    info!("OTP lookup policy: {:?}", config.otp.lookup_policy);

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

    let jwt_service = JwtService::new(config.jwt.clone())?;

    let auth_service = AuthService::new(
        Arc::new(UserRepository::new(pool.clone())),
        Arc::new(OtpRepository::new(pool)),
        Arc::new(TracingOtpSender),
        jwt_service,
        config.otp.clone(),
    );

    let app = create_router(AppState { auth_service });

    let listener = TcpListener::bind(&config.server_addr).await?;
    info!("Authentication service listening on {}", config.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
