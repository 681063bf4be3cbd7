use std::sync::Arc;
use tokio::sync::Mutex;

use kadai_core::{Config, Database, LineLogin, Messenger};

/// Shared application state passed to all handlers.
///
/// The database connection sits behind an async mutex; handlers hold it only
/// for the duration of a query, never across a delivery call.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<Mutex<Database>>,
    pub messenger: Arc<dyn Messenger>,
    pub login: Arc<LineLogin>,
}

impl AppState {
    pub fn new(
        config: Config,
        db: Arc<Mutex<Database>>,
        messenger: Arc<dyn Messenger>,
        login: LineLogin,
    ) -> Self {
        Self {
            config: Arc::new(config),
            db,
            messenger,
            login: Arc::new(login),
        }
    }
}
