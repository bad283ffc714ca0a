use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use url::Url;

use crate::connection::ConnectionConfig;
use crate::driver::Driver;
use crate::dsn;
use crate::error::{ConnectError, RequiredField};

/// Marker for an SQLite in-memory database.
pub const SQLITE_MEMORY: &str = ":memory:";

/// MySQL connection-string options that only exist in the DSN form and are
/// not understood by the engine's MySQL URL parser.
const MYSQL_DSN_ONLY_PARAMS: [&str; 2] = ["parseTime", "loc"];

static MEMORY_DB_SEQ: AtomicU64 = AtomicU64::new(0);

/// A validated, ready-to-connect backend descriptor.
///
/// Produced by [`resolve`]. Holds the driver, the driver-specific connection
/// string, and the equivalent engine URL used to open the pool.
#[derive(Clone)]
pub struct BackendHandle {
    driver: Driver,
    dsn: String,
    engine_url: String,
    in_memory: bool,
}

impl BackendHandle {
    pub fn driver(&self) -> Driver {
        self.driver
    }

    /// The driver-specific connection string (see [`dsn`](crate::dsn)).
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// The URL handed to the execution engine.
    pub fn engine_url(&self) -> &str {
        &self.engine_url
    }

    /// `true` for an SQLite `:memory:` database.
    pub fn is_in_memory(&self) -> bool {
        self.in_memory
    }
}

impl fmt::Debug for BackendHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendHandle")
            .field("driver", &self.driver)
            .field("in_memory", &self.in_memory)
            .finish_non_exhaustive()
    }
}

/// Validate `config` for its driver and build the backend descriptor.
///
/// Required fields are checked in order and the first failure wins:
/// networked drivers need host, port, user, then database name; SQLite needs
/// only the database name. No connection is attempted.
pub fn resolve(config: &ConnectionConfig) -> Result<BackendHandle, ConnectError> {
    let driver = config.parsed_driver()?;
    validate(driver, config)?;

    let in_memory = driver == Driver::Sqlite && config.db_name == SQLITE_MEMORY;
    let engine_url = engine_url(driver, config)?;
    Ok(BackendHandle {
        driver,
        dsn: dsn::dsn_for(driver, config),
        engine_url,
        in_memory,
    })
}

fn validate(driver: Driver, config: &ConnectionConfig) -> Result<(), ConnectError> {
    if driver.is_networked() {
        if config.host.is_empty() {
            return Err(ConnectError::missing(driver, RequiredField::Host));
        }
        if config.port == 0 {
            return Err(ConnectError::missing(driver, RequiredField::Port));
        }
        if config.user.is_empty() {
            return Err(ConnectError::missing(driver, RequiredField::User));
        }
    }
    if config.db_name.is_empty() {
        return Err(ConnectError::missing(driver, RequiredField::DbName));
    }
    Ok(())
}

fn engine_url(driver: Driver, config: &ConnectionConfig) -> Result<String, ConnectError> {
    match driver {
        Driver::Sqlite => Ok(sqlite_url(&config.db_name)),
        Driver::MySql => {
            let mut url = network_url("mysql", driver, config)?;
            {
                let mut query = url.query_pairs_mut();
                if !config.params.contains_key("charset") {
                    query.append_pair("charset", "utf8mb4");
                }
                for (key, value) in &config.params {
                    if !MYSQL_DSN_ONLY_PARAMS.contains(&key.as_str()) {
                        query.append_pair(key, value);
                    }
                }
            }
            Ok(url.into())
        }
        Driver::Postgres => {
            let mut url = network_url("postgres", driver, config)?;
            if !config.params.is_empty() {
                url.query_pairs_mut().extend_pairs(config.params.iter());
            }
            Ok(url.into())
        }
        Driver::SqlServer => {
            let mut url = network_url("sqlserver", driver, config)?;
            if !config.params.is_empty() {
                url.query_pairs_mut().extend_pairs(config.params.iter());
            }
            Ok(url.into())
        }
    }
}

fn network_url(
    scheme: &str,
    driver: Driver,
    config: &ConnectionConfig,
) -> Result<Url, ConnectError> {
    let invalid = |reason: String| ConnectError::InvalidSettings { driver, reason };

    let mut url = Url::parse(&format!("{scheme}://{}:{}", config.host, config.port))
        .map_err(|e| invalid(format!("host `{}`: {e}", config.host)))?;
    url.set_username(&config.user)
        .map_err(|_| invalid("user cannot be encoded".to_string()))?;
    if !config.password.is_empty() {
        url.set_password(Some(&config.password))
            .map_err(|_| invalid("password cannot be encoded".to_string()))?;
    }
    url.set_path(&config.db_name);
    Ok(url)
}

fn sqlite_url(db_name: &str) -> String {
    if db_name == SQLITE_MEMORY {
        // A named shared-cache database: every pooled connection opens the same one.
        let seq = MEMORY_DB_SEQ.fetch_add(1, Ordering::Relaxed);
        format!(
            "sqlite:file:sqlgate-memory-{}-{seq}?mode=memory&cache=shared",
            std::process::id()
        )
    } else {
        format!("sqlite://{db_name}?mode=rwc")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_engine_url_drops_dsn_only_params() {
        let config = ConnectionConfig::new("mysql")
            .host("localhost")
            .port(3306)
            .user("root")
            .db_name("test")
            .param("parseTime", "False");
        let handle = resolve(&config).unwrap();
        assert_eq!(
            handle.engine_url(),
            "mysql://root@localhost:3306/test?charset=utf8mb4"
        );
        assert!(handle.dsn().contains("parseTime=False"));
    }

    #[test]
    fn test_postgres_engine_url_encodes_credentials() {
        let config = ConnectionConfig::new("postgres")
            .host("db")
            .port(5432)
            .user("app")
            .password("p@ss word")
            .db_name("app");
        let handle = resolve(&config).unwrap();
        assert_eq!(handle.engine_url(), "postgres://app:p%40ss%20word@db:5432/app");
    }

    #[test]
    fn test_sqlite_file_url() {
        let config = ConnectionConfig::new("sqlite").db_name("/tmp/app.db");
        let handle = resolve(&config).unwrap();
        assert_eq!(handle.engine_url(), "sqlite:///tmp/app.db?mode=rwc");
        assert!(!handle.is_in_memory());
    }

    #[test]
    fn test_sqlite_memory_urls_are_distinct() {
        let config = ConnectionConfig::new("sqlite").db_name(":memory:");
        let first = resolve(&config).unwrap();
        let second = resolve(&config).unwrap();
        assert!(first.is_in_memory());
        assert_eq!(first.dsn(), ":memory:");
        assert_ne!(first.engine_url(), second.engine_url());
        assert!(first.engine_url().ends_with("?mode=memory&cache=shared"));
    }

    #[test]
    fn test_debug_hides_credentials() {
        let config = ConnectionConfig::new("sqlserver")
            .host("db")
            .port(1433)
            .user("sa")
            .password("secret")
            .db_name("app");
        let handle = resolve(&config).unwrap();
        assert!(!format!("{handle:?}").contains("secret"));
    }
}
