//! Atelier server entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use atelier_api::{middleware::AppState, router as api_router};
use atelier_common::{Config, LocalStorage};
use atelier_core::{
    AccountService, ArtworkService, CategoryService, CuratorService, EngagementService,
    FeedService, MediaService, ModerationService,
};
use atelier_db::repositories::{
    ArtworkRepository, CategoryRepository, CommentRepository, LikeRepository, ReportRepository,
    UserRepository,
};
use axum::{Router, middleware};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting atelier server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = atelier_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    atelier_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let artwork_repo = ArtworkRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let report_repo = ReportRepository::new(Arc::clone(&db));

    // Initialize media storage
    let storage = Arc::new(LocalStorage::new(
        PathBuf::from(&config.storage.base_path),
        config.storage.base_url.clone(),
    ));
    let media = MediaService::new(storage);

    // Initialize services
    let account_service = AccountService::new(user_repo.clone(), artwork_repo.clone(), media.clone());
    let artwork_service = ArtworkService::new(
        artwork_repo.clone(),
        category_repo.clone(),
        user_repo.clone(),
        media.clone(),
    );
    let category_service = CategoryService::new(category_repo.clone(), artwork_repo.clone());
    let engagement_service = EngagementService::new(
        artwork_repo.clone(),
        like_repo.clone(),
        comment_repo.clone(),
        user_repo.clone(),
        media.clone(),
    );
    let feed_service = FeedService::new(
        artwork_repo.clone(),
        like_repo,
        comment_repo.clone(),
        user_repo.clone(),
        category_repo,
        media.clone(),
    );
    let moderation_service = ModerationService::new(
        report_repo,
        artwork_repo,
        comment_repo,
        LikeRepository::new(Arc::clone(&db)),
        user_repo,
        media,
    );

    let curator_service = CuratorService::new(config.ai.clone())?;
    if curator_service.is_configured() {
        info!(model = %config.ai.model, "AI curator enabled");
    } else {
        info!("AI curator disabled (no API key configured)");
    }

    // Create app state
    let state = AppState {
        account_service,
        artwork_service,
        category_service,
        curator_service,
        engagement_service,
        feed_service,
        moderation_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .nest_service(
            config.storage.base_url.as_str(),
            ServeDir::new(&config.storage.base_path),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            atelier_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
