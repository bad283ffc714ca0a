//! Connection pool lifecycle.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlgate_core::{BackendHandle, ConnectError, ConnectionConfig, Driver};
use sqlgate_data::{DataError, Dialect};
use sqlx::any::{AnyConnectOptions, AnyPoolOptions};
use sqlx::{AnyConnection, AnyPool, ConnectOptions, Connection};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::SqlxErrorExt;
use crate::repository::Repository;

/// Maximum open connections when the configuration leaves it unset.
pub const DEFAULT_MAX_OPEN_CONNS: u32 = 10;
/// Maximum idle connections when the configuration leaves it unset.
pub const DEFAULT_MAX_IDLE_CONNS: u32 = 5;
/// Maximum connection lifetime when the configuration leaves it unset.
pub const DEFAULT_CONN_MAX_LIFETIME: Duration = Duration::from_secs(3600);

/// Resolved pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_open_conns: u32,
    /// Reported by [`Pool::settings`] and logged at connect time only.
    ///
    /// The sqlx pool has no separate idle cap: it keeps up to
    /// `max_open_conns` connections idle until they reach
    /// `conn_max_lifetime`. Setting this value does not shrink the pool.
    pub max_idle_conns: u32,
    pub conn_max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_open_conns: DEFAULT_MAX_OPEN_CONNS,
            max_idle_conns: DEFAULT_MAX_IDLE_CONNS,
            conn_max_lifetime: DEFAULT_CONN_MAX_LIFETIME,
        }
    }
}

impl PoolSettings {
    /// Apply defaults to every option that is zero or negative.
    pub fn from_config(config: &ConnectionConfig) -> Self {
        let positive = |n: i64| u64::try_from(n).ok().filter(|n| *n > 0);
        Self {
            max_open_conns: positive(config.max_open_conns.into())
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(DEFAULT_MAX_OPEN_CONNS),
            max_idle_conns: positive(config.max_idle_conns.into())
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(DEFAULT_MAX_IDLE_CONNS),
            conn_max_lifetime: positive(config.conn_max_lifetime_secs)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CONN_MAX_LIFETIME),
        }
    }
}

/// Point-in-time pool occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub size: u32,
    pub idle: usize,
    pub max: u32,
}

/// A shared connection pool bound to one backend.
///
/// Cheap to clone; clones share the same underlying pool.
#[derive(Clone)]
pub struct Pool {
    inner: AnyPool,
    driver: Driver,
    settings: PoolSettings,
    // Holds an in-memory SQLite database open while pooled connections come and go.
    anchor: Option<Arc<Mutex<Option<AnyConnection>>>>,
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("driver", &self.driver)
            .field("settings", &self.settings)
            .field("closed", &self.inner.is_closed())
            .finish()
    }
}

/// Open a pool for `handle`.
///
/// Exactly one connection attempt is made up front; its failure is returned
/// as [`ConnectError::ConnectionFailed`] without retrying.
#[tracing::instrument(skip_all, fields(driver = %handle.driver()))]
pub async fn connect(handle: &BackendHandle, settings: PoolSettings) -> Result<Pool, ConnectError> {
    sqlx::any::install_default_drivers();

    let options =
        AnyConnectOptions::from_str(handle.engine_url()).map_err(ConnectError::connection_failed)?;
    let mut probe = options
        .connect()
        .await
        .map_err(ConnectError::connection_failed)?;
    probe.ping().await.map_err(ConnectError::connection_failed)?;

    let anchor = if handle.is_in_memory() {
        Some(Arc::new(Mutex::new(Some(probe))))
    } else {
        if let Err(err) = probe.close().await {
            warn!(error = %err, "failed to close probe connection");
        }
        None
    };

    let inner = AnyPoolOptions::new()
        .max_connections(settings.max_open_conns)
        .max_lifetime(settings.conn_max_lifetime)
        .connect_lazy_with(options);

    info!(
        max_open = settings.max_open_conns,
        max_idle = settings.max_idle_conns,
        max_lifetime_secs = settings.conn_max_lifetime.as_secs(),
        "database pool opened"
    );
    Ok(Pool {
        inner,
        driver: handle.driver(),
        settings,
        anchor,
    })
}

impl Pool {
    /// The raw engine pool.
    pub fn any_pool(&self) -> &AnyPool {
        &self.inner
    }

    pub fn driver(&self) -> Driver {
        self.driver
    }

    pub fn dialect(&self) -> Dialect {
        dialect_for(self.driver)
    }

    pub fn settings(&self) -> PoolSettings {
        self.settings
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            size: self.inner.size(),
            idle: self.inner.num_idle(),
            max: self.settings.max_open_conns,
        }
    }

    /// A repository over the whole pool.
    pub fn repository(&self) -> Repository {
        Repository::new(self)
    }

    /// Run `SELECT 1` on a pooled connection.
    pub async fn health_check(&self) -> Result<(), DataError> {
        sqlx::query("SELECT 1")
            .execute(&self.inner)
            .await
            .map(|_| ())
            .map_err(SqlxErrorExt::into_data_error)
    }

    /// Close every connection. Closing an already closed pool does nothing.
    pub async fn close(&self) {
        if self.inner.is_closed() {
            return;
        }
        self.inner.close().await;
        if let Some(anchor) = &self.anchor {
            if let Some(conn) = anchor.lock().await.take() {
                if let Err(err) = conn.close().await {
                    warn!(error = %err, "failed to close in-memory anchor connection");
                }
            }
        }
        info!(driver = %self.driver, "database pool closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

pub(crate) fn dialect_for(driver: Driver) -> Dialect {
    match driver {
        Driver::MySql => Dialect::MySql,
        Driver::Postgres => Dialect::Postgres,
        Driver::Sqlite => Dialect::Sqlite,
        Driver::SqlServer => Dialect::Generic,
    }
}
