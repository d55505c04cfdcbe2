use std::sync::Arc;

use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use assistant_hub::{
    app_state::AppState,
    config::AppConfig,
    context::Context,
    database::{
        init::{ConnectionManager, DbError},
        migrations::apply_migrations,
        pool::{PgHandle, PgPool},
    },
    repositories::message_repository::PgMessageRepository,
    routes::app_routes::create_router,
    services::message_service::MessageService,
};

// The main entry point for the application using the tokio runtime.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Error loading configuration: {}", e);
            return;
        }
    };

    let mut manager = match ConnectionManager::postgres(&config.database_url, config.db.clone()) {
        Ok(manager) => manager,
        Err(e) => {
            error!("Error configuring the database: {}", e);
            return;
        }
    };

    let bootstrap_ctx = match config.bootstrap_timeout {
        Some(timeout) => Context::with_timeout(timeout),
        None => Context::background(),
    };

    // Initialize the database connection and handle errors
    let pool = match open_database(&mut manager, &bootstrap_ctx).await {
        Ok(pool) => {
            info!("Database initialized successfully!");
            pool
        }
        Err(e) => {
            error!("Error initializing the database: {}", e);
            manager.close();
            return;
        }
    };

    // One pool shared by every repository
    let db: Arc<dyn PgHandle> = Arc::new(pool);
    let messages = MessageService::new(Arc::new(PgMessageRepository::new(Arc::clone(&db))));
    let app = create_router(AppState::new(messages, db, config.request_timeout));

    info!("Server running on http://{}", config.server_addr);

    // Start the server, binding to the specified address and enabling graceful shutdown
    let served = axum::Server::bind(&config.server_addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Err(e) = served {
        error!("Server error: {}", e);
    }

    manager.close();
}

async fn open_database(
    manager: &mut ConnectionManager,
    ctx: &Context,
) -> Result<PgPool, DbError> {
    let pool = manager.open(ctx).await?;

    let mut conn = pool
        .acquire(ctx)
        .await
        .map_err(DbError::MigrationError)?;
    apply_migrations(&mut conn, ctx)
        .await
        .map_err(DbError::MigrationError)?;

    Ok(pool)
}

// A function to handle graceful shutdown by listening for termination signals.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    // Wait for either Ctrl+C or the termination signal
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Signal received, starting graceful shutdown");
}
