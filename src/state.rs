use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::api::ApiClient;
use crate::config::Config;
use crate::db;
use crate::session::{SessionController, SessionStore};

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub api: ApiClient,
    pub session: Arc<SessionController>,
}

impl AppState {
    /// Opens the client database and restores the session before anything
    /// is served.
    pub fn init(config: Config) -> anyhow::Result<Self> {
        let pool = db::create_pool(&config.db_path())?;
        db::run_migrations(&pool)?;

        let api = ApiClient::new(&config.api)?;
        let store = SessionStore::new(pool.clone());
        let session = SessionController::hydrate(Arc::new(api.clone()), store)?;

        Ok(Self {
            db: pool,
            config,
            api,
            session: Arc::new(session),
        })
    }
}
