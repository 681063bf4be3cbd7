use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use kadai_core::{Config, Database, LineLogin, LineMessenger, Messenger, ReminderScheduler};
use kadai_server::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::load()?;
    tracing::info!("Starting Kadai API server");

    let db_path = config.database_path()?;
    let db = Arc::new(Mutex::new(Database::open(&db_path)?));
    tracing::info!(path = %db_path.display(), "Database opened");

    let messenger: Arc<dyn Messenger> = Arc::new(LineMessenger::new(&config.line));
    let login = LineLogin::new(&config.line);

    // Background reminder loop: morning and evening passes.
    let scheduler = Arc::new(ReminderScheduler::new(
        db.clone(),
        messenger.clone(),
        &config.notifications,
    )?);
    tokio::spawn(scheduler.run());
    tracing::info!("Reminder scheduler started");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, db, messenger, login));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
