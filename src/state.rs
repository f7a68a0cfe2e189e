use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::SqlitePool;

use crate::{
    config::Config,
    utils::session::{AuthBackend, SessionAuth},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub auth: Arc<dyn AuthBackend>,
}

impl AppState {
    /// State backed by database sessions on the same pool.
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let auth = Arc::new(SessionAuth::new(pool.clone(), config.session_ttl_seconds));
        Self { pool, config, auth }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn AuthBackend> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
