use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::driver::Driver;
use crate::error::ConnectError;

/// User-facing connection settings, shared by every supported backend.
///
/// Zero or empty fields are allowed here: required fields are checked by
/// [`resolve`](crate::resolve), and unset pool options receive their defaults
/// when the pool is opened, never at construction time.
///
/// ```
/// use sqlgate_core::ConnectionConfig;
///
/// let config = ConnectionConfig::new("postgres")
///     .host("localhost")
///     .port(5432)
///     .user("app")
///     .db_name("app")
///     .param("sslmode", "disable");
/// assert_eq!(config.port, 5432);
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Driver tag as supplied by the caller: mysql, postgres, postgresql, sqlite, sqlserver.
    pub driver: String,
    /// Host for networked databases (ignored for SQLite).
    pub host: String,
    /// Port for networked databases; 0 means unset.
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database name, or the SQLite file path / `:memory:`.
    #[serde(alias = "dbname", alias = "database")]
    pub db_name: String,
    /// Driver-specific connection parameters.
    pub params: HashMap<String, String>,
    /// Maximum open connections (default 10 when zero or negative).
    pub max_open_conns: i32,
    /// Maximum idle connections (default 5 when zero or negative).
    pub max_idle_conns: i32,
    /// Maximum connection lifetime in seconds (default 3600 when zero or negative).
    pub conn_max_lifetime_secs: i64,
}

impl ConnectionConfig {
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            ..Default::default()
        }
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn max_open_conns(mut self, n: i32) -> Self {
        self.max_open_conns = n;
        self
    }

    pub fn max_idle_conns(mut self, n: i32) -> Self {
        self.max_idle_conns = n;
        self
    }

    pub fn conn_max_lifetime_secs(mut self, secs: i64) -> Self {
        self.conn_max_lifetime_secs = secs;
        self
    }

    /// Parse the driver tag.
    pub fn parsed_driver(&self) -> Result<Driver, ConnectError> {
        Driver::parse(&self.driver)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = if self.password.is_empty() { "" } else { "***" };
        f.debug_struct("ConnectionConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &password)
            .field("db_name", &self.db_name)
            .field("params", &self.params)
            .field("max_open_conns", &self.max_open_conns)
            .field("max_idle_conns", &self.max_idle_conns)
            .field("conn_max_lifetime_secs", &self.conn_max_lifetime_secs)
            .finish()
    }
}
