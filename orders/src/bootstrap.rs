//! Process wiring: tracing, storage, sessions, notifier, store.
//!
//! Everything `main` needs to assemble an [`AppState`], split out so the
//! selection logic (Redis vs memory, SMTP vs console) is testable.

use crate::config::Config;
use crate::lifecycle::{LifecycleState, OrderEnvironment, OrderLifecycleReducer, OrderStore};
use crate::notifier::{ConsoleNotifier, Notifier, SmtpNotifier};
use crate::queries::OrderQueries;
use crate::repository::OrderRepository;
use crate::server::AppState;
use anyhow::{Context, Result};
use custom_orders_auth::providers::{
    GoogleIdentityProvider, IdentityProvider, PrincipalRepository, SessionStore,
};
use custom_orders_auth::stores::{InMemorySessionStore, RedisSessionStore};
use custom_orders_auth::{AdminAllowList, AuthContext};
use custom_orders_core::environment::SystemClock;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,custom_orders=debug";

/// Install the global tracing subscriber.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Order and principal storage.
pub struct Repositories {
    /// Orders.
    pub orders: Arc<dyn OrderRepository>,
    /// Principals.
    pub principals: Arc<dyn PrincipalRepository>,
}

/// Connect to Postgres and run migrations.
///
/// # Errors
///
/// Fails if the database is unreachable or a migration fails.
#[cfg(feature = "postgres")]
pub async fn build_repositories(config: &Config) -> Result<Repositories> {
    use crate::repository::PostgresOrderRepository;
    use custom_orders_auth::stores::PostgresPrincipalRepository;
    use sqlx::postgres::PgPoolOptions;

    tracing::info!("Connecting to PostgreSQL...");
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("PostgreSQL connected, migrations applied");

    Ok(Repositories {
        orders: Arc::new(PostgresOrderRepository::new(pool.clone())),
        principals: Arc::new(PostgresPrincipalRepository::new(pool)),
    })
}

/// In-memory storage (built without the `postgres` feature).
///
/// # Errors
///
/// Never fails; the signature matches the Postgres variant.
#[cfg(not(feature = "postgres"))]
#[allow(clippy::unused_async)]
pub async fn build_repositories(_config: &Config) -> Result<Repositories> {
    use crate::repository::InMemoryOrderRepository;
    use custom_orders_auth::stores::InMemoryPrincipalRepository;

    tracing::warn!("Built without `postgres`; orders and principals are kept in memory");

    Ok(Repositories {
        orders: Arc::new(InMemoryOrderRepository::new()),
        principals: Arc::new(InMemoryPrincipalRepository::new()),
    })
}

/// Redis sessions when `REDIS_URL` is set, in-memory otherwise.
///
/// # Errors
///
/// Fails if Redis is configured but unreachable.
pub async fn build_session_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    match &config.sessions.redis_url {
        Some(url) => {
            let store = RedisSessionStore::new(url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Using Redis session store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("REDIS_URL not set; sessions are kept in memory");
            Ok(Arc::new(InMemorySessionStore::new()))
        }
    }
}

/// SMTP notifier when `SMTP_HOST` is set, console notifier otherwise.
///
/// # Errors
///
/// Fails if `SMTP_HOST` is set without `SMTP_USER`, or an address is invalid.
pub fn build_notifier(config: &Config, admins: &AdminAllowList) -> Result<Arc<dyn Notifier>> {
    let recipients: Vec<String> = admins.iter().map(str::to_string).collect();
    if recipients.is_empty() {
        tracing::warn!("ADMIN_EMAILS is empty; new-order notifications have no recipients");
    }

    let Some(host) = &config.smtp.host else {
        tracing::info!("SMTP_HOST not set; notifications are logged to the console");
        return Ok(Arc::new(ConsoleNotifier::new(recipients)));
    };

    let user = config
        .smtp
        .user
        .clone()
        .context("SMTP_USER is required when SMTP_HOST is set")?;
    let pass = config.smtp.pass.clone().unwrap_or_default();

    let notifier = SmtpNotifier::new(host, config.smtp.port, user, pass, recipients)
        .context("Invalid SMTP configuration")?;
    tracing::info!(host = %host, port = config.smtp.port, "Using SMTP notifier");
    Ok(Arc::new(notifier))
}

/// Google sign-in provider from configuration.
#[must_use]
pub fn build_identity_provider(config: &Config) -> Arc<dyn IdentityProvider> {
    if config.google.client_id.is_empty() {
        tracing::warn!("GOOGLE_CLIENT_ID not set; sign-in will fail until configured");
    }
    Arc::new(GoogleIdentityProvider::new(
        config.google.client_id.clone(),
        config.google.client_secret.clone(),
        config.google.callback_url.clone(),
    ))
}

/// Assemble the lifecycle store and application state.
#[must_use]
pub fn build_state(
    config: &Config,
    repositories: Repositories,
    sessions: Arc<dyn SessionStore>,
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn Notifier>,
    metrics: Option<PrometheusHandle>,
) -> AppState {
    let environment = OrderEnvironment::new(
        Arc::new(SystemClock),
        Arc::clone(&repositories.orders),
        notifier,
    )
    .with_notify_timeout(config.notify_timeout());

    let store: OrderStore = OrderStore::new(
        LifecycleState::default(),
        OrderLifecycleReducer::new(),
        environment,
    );

    AppState {
        store: Arc::new(store),
        queries: OrderQueries::new(repositories.orders),
        auth: AuthContext {
            sessions,
            principals: repositories.principals,
            identity,
            admins: Arc::new(AdminAllowList::parse(&config.admin_emails)),
            config: config.auth_config(),
        },
        metrics,
        request_timeout: config.request_timeout(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
        Config::from_lookup(|key| vars.get(key).map(|v| (*v).to_string()))
    }

    #[test]
    fn test_console_notifier_without_smtp_host() {
        let config = config_from(&[]);
        assert!(build_notifier(&config, &AdminAllowList::parse("a@x.com")).is_ok());
    }

    #[tokio::test]
    async fn test_smtp_host_requires_user() {
        let config = config_from(&[("SMTP_HOST", "smtp.example.com")]);
        assert!(build_notifier(&config, &AdminAllowList::parse("a@x.com")).is_err());

        let config = config_from(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_USER", "shop@example.com"),
            ("SMTP_PASS", "secret"),
        ]);
        assert!(build_notifier(&config, &AdminAllowList::parse("a@x.com")).is_ok());
    }

    #[tokio::test]
    async fn test_memory_sessions_without_redis_url() {
        assert!(build_session_store(&config_from(&[])).await.is_ok());
    }
}
