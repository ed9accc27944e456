//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::ApiConfig;
use crate::services::token::TokenService;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; provides access to the database pool and
/// the token service. Configuration is consumed at construction time, not
/// carried at runtime.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: SqlitePool,
    tokens: TokenService,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: &ApiConfig, pool: SqlitePool) -> Self {
        let tokens = TokenService::new(&config.token_secret, config.token_ttl);

        Self {
            inner: Arc::new(AppStateInner { pool, tokens }),
        }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.inner.pool
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use bazaar_core::UserId;

    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_state_wires_token_service_from_config() {
        let config = ApiConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            token_secret: SecretString::from("kP9#mW2$vQ7!xT4@nB6^zR8&cJ1*fH3%"),
            token_ttl: Duration::from_secs(3600),
            sentry_dsn: None,
            sentry_environment: None,
        };
        let pool = test_pool().await;

        let state = AppState::new(&config, pool);
        let token = state.tokens().issue(UserId::new(7)).unwrap();
        assert_eq!(state.tokens().verify(&token).unwrap(), UserId::new(7));

        // Clones share the same pool
        let clone = state.clone();
        assert!(std::ptr::eq(state.pool(), clone.pool()));
    }
}
