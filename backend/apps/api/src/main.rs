//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;
mod pages;

use auth::application::{CreateAccountInput, CreateAccountUseCase};
use auth::{AuthError, PgAuthRepository, SessionState, TokenCodec};
use axum::http::{self, Method, header};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{BootstrapAccount, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(config.auth.db_timeout)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    if !tokio::task::spawn_blocking(platform::password::prepare_dummy_hash).await? {
        tracing::warn!("Dummy password hash unavailable; unknown-user logins answer faster");
    }

    let auth_config = Arc::new(config.auth);
    let codec = Arc::new(TokenCodec::new(
        Arc::new(config.secret),
        auth_config.session_ttl,
    ));
    let repo = PgAuthRepository::new(pool.clone());

    // Startup bootstrap: errors here should not prevent server startup
    if let Some(bootstrap) = config.bootstrap {
        bootstrap_account(&repo, auth_config.clone(), bootstrap).await;
    }

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]))
        .allow_credentials(true);

    // Build router
    let session = SessionState::new(codec, auth_config);
    let app = pages::app_router(repo, session)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    tracing::info!("Listening on {}", config.bind_addr);

    let listener = TcpListener::bind(config.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn bootstrap_account(
    repo: &PgAuthRepository,
    config: Arc<auth::AuthConfig>,
    bootstrap: BootstrapAccount,
) {
    let use_case = CreateAccountUseCase::new(Arc::new(repo.clone()), config);
    let username = bootstrap.username.clone();

    match use_case
        .execute(CreateAccountInput {
            username: bootstrap.username,
            password: bootstrap.password,
            division: bootstrap.division,
        })
        .await
    {
        Ok(account) => {
            tracing::info!(username = %account.user_name, "Bootstrap account created");
        }
        Err(AuthError::UserNameTaken) => {
            tracing::debug!(username = %username, "Bootstrap account already exists");
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Bootstrap account not created, continuing anyway"
            );
        }
    }
}
