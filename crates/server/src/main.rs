//! Bookmarks-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::middleware;
use bookmarks_api::{middleware::AppState, router as app_router};
use bookmarks_common::Config;
use bookmarks_core::{AccountService, ActionService, ContactService, ImageService};
use bookmarks_db::repositories::{
    ActionRepository, ContactRepository, ImageRepository, UserProfileRepository, UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
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
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bookmarks=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting bookmarks-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = bookmarks_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    bookmarks_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let user_profile_repo = UserProfileRepository::new(Arc::clone(&db));
    let contact_repo = ContactRepository::new(Arc::clone(&db));
    let action_repo = ActionRepository::new(Arc::clone(&db));
    let image_repo = ImageRepository::new(Arc::clone(&db));

    // Initialize services
    let account_service = AccountService::new(
        user_repo.clone(),
        user_profile_repo.clone(),
        action_repo.clone(),
    );
    let contact_service = ContactService::new(
        contact_repo.clone(),
        user_repo.clone(),
        action_repo.clone(),
    );
    let action_service = ActionService::new(
        action_repo.clone(),
        contact_repo,
        user_repo,
        image_repo.clone(),
    );
    let image_service = ImageService::new(image_repo, action_repo);

    // Create app state
    let state = AppState {
        account_service,
        contact_service,
        action_service,
        image_service,
    };

    // Build router
    let app = app_router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            bookmarks_api::middleware::auth_middleware,
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
