use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agora_api::config::Config;
use agora_api::graphql::build_schema;
use agora_api::repositories::SessionRepository;
use agora_api::routes::{graphql_router, GraphQLState};
use agora_api::services::{AuthService, SessionResolver, TokenCodec};

/// How often expired tokens are purged from the active lists
const TOKEN_CLEANUP_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Maximum rows deleted per cleanup batch
const TOKEN_CLEANUP_BATCH_SIZE: i64 = 1000;

/// Build the CORS layer based on configuration.
///
/// In production mode:
/// - If `CORS_ORIGINS` is set, only those origins are allowed
/// - If `CORS_ORIGINS` is not set, CORS requests are rejected (no origins allowed)
///
/// In development mode:
/// - If `CORS_ORIGINS` is set, those origins are used
/// - If `CORS_ORIGINS` is not set, permissive CORS is used for convenience
fn build_cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("No valid CORS origins configured, CORS requests will be rejected");
                CorsLayer::new()
            } else {
                tracing::info!(
                    "CORS configured with {} allowed origin(s): {:?}",
                    allowed_origins.len(),
                    origins
                );
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([
                        header::AUTHORIZATION,
                        header::CONTENT_TYPE,
                        header::ACCEPT,
                        header::ORIGIN,
                    ])
                    .allow_credentials(true)
                    .max_age(Duration::from_secs(3600))
            }
        }
        _ if config.is_production() => {
            tracing::warn!(
                "CORS_ORIGINS not configured in production mode. \
                 CORS requests will be rejected. Set CORS_ORIGINS to allow cross-origin requests."
            );
            CorsLayer::new()
        }
        _ => {
            tracing::warn!(
                "Using permissive CORS in development mode. \
                 Set CORS_ORIGINS for production-like behavior."
            );
            CorsLayer::permissive()
        }
    }
}

/// Periodically delete expired rows from the active-token lists
fn spawn_token_cleanup(session_repo: SessionRepository) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TOKEN_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            loop {
                match session_repo.delete_expired(TOKEN_CLEANUP_BATCH_SIZE).await {
                    Ok(0) => break,
                    Ok(deleted) => {
                        tracing::info!(deleted, "Cleaned up expired session tokens");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to clean up expired session tokens");
                        break;
                    }
                }
            }
        }
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agora_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!("Starting Agora API server on port {}", config.port);

    // Initialize database pool
    let database = config.database();
    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .min_connections(database.min_connections)
        .acquire_timeout(Duration::from_secs(database.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(database.idle_timeout_secs))
        .connect(&database.url)
        .await?;

    tracing::info!("Database connection established");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations completed successfully");

    // The session lifetime is fixed for the life of the process
    let codec = TokenCodec::new(config.token_config());
    tracing::info!(
        session_ttl_secs = config.session_ttl_secs,
        "TokenCodec initialized"
    );

    let session_repo = SessionRepository::new(pool.clone());
    let store = Arc::new(session_repo.clone());
    let resolver = SessionResolver::new(codec.clone(), store.clone());
    let auth_service = AuthService::new(codec, store);
    tracing::info!("AuthService initialized");

    spawn_token_cleanup(session_repo);

    let schema = build_schema(pool.clone(), auth_service)?;
    tracing::info!("GraphQL schema built");

    let playground = !config.is_production();
    let cors_layer = build_cors_layer(&config);

    let app = Router::new()
        .route("/", get(root))
        .merge(graphql_router(GraphQLState::new(schema, resolver), playground))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    if playground {
        tracing::info!(
            "GraphQL Playground available at http://{}:{}/graphql/playground",
            addr.ip(),
            addr.port()
        );
    }

    axum::serve(listener, app).await?;

    Ok(())
}

async fn root() -> &'static str {
    "Agora API"
}
