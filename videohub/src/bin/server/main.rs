use std::sync::Arc;

use auth::Authenticator;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use videohub::config::Config;
use videohub::domain::comment::service::CommentService;
use videohub::domain::user::service::UserService;
use videohub::domain::video::service::VideoService;
use videohub::inbound::http::router::create_router;
use videohub::inbound::http::router::AppState;
use videohub::outbound::repositories::PostgresCommentRepository;
use videohub::outbound::repositories::PostgresUserRepository;
use videohub::outbound::repositories::PostgresVideoRepository;
use videohub::outbound::storage::S3ObjectStorage;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "videohub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "videohub",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;
    let key_ring = config.jwt.key_ring()?;

    tracing::info!(
        http_port = config.server.http_port,
        max_upload_bytes = config.server.max_upload_bytes,
        jwt_active_key = key_ring.active_kid(),
        jwt_keys = ?key_ring.kids(),
        storage_bucket = %config.storage.bucket,
        storage_endpoint = ?config.storage.endpoint,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = config.database.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let authenticator = Arc::new(Authenticator::new(
        key_ring,
        config.jwt.token_validity(),
    ));

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let comment_repository = Arc::new(PostgresCommentRepository::new(pg_pool.clone()));
    let video_repository = Arc::new(PostgresVideoRepository::new(pg_pool));
    let object_storage = Arc::new(S3ObjectStorage::new(&config.storage).await);
    tracing::info!(
        bucket = %config.storage.bucket,
        region = %config.storage.region,
        "Object storage client created"
    );

    let state = AppState {
        user_service: Arc::new(UserService::new(
            user_repository,
            Arc::clone(&authenticator),
        )),
        comment_service: Arc::new(CommentService::new(
            comment_repository,
            Arc::clone(&video_repository),
        )),
        video_service: Arc::new(VideoService::new(
            video_repository,
            object_storage,
            config.storage.request_timeout(),
            config.storage.presign_expiry(),
        )),
        authenticator,
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(state, config.server.max_upload_bytes);
    axum::serve(http_listener, http_application)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server exited successfully");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
