//! API module
//!
//! HTTP routes, middleware, and shared router state.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::config::Config;

pub use routes::create_router;

/// Shared state for the router: the connection pool plus the settings the
/// auth middleware and login handler need (token secret, bcrypt cost).
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}

// Lets handlers that only touch the database keep a plain `State<PgPool>`.
impl FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> PgPool {
        state.pool.clone()
    }
}
