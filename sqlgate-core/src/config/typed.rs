use super::{ConfigError, SqlgateConfig};
use crate::connection::ConnectionConfig;

/// A strongly-typed configuration section read from a [`SqlgateConfig`].
pub trait ConfigProperties: Sized {
    /// The key prefix of the section (e.g. `"datasource"`).
    fn prefix() -> &'static str;

    fn from_config(config: &SqlgateConfig) -> Result<Self, ConfigError>;
}

/// The `datasource` section.
///
/// Only `driver` is mandatory here; per-driver requirements are enforced by
/// [`resolve`](crate::resolve) so that configuration errors keep their
/// connection-specific messages.
impl ConfigProperties for ConnectionConfig {
    fn prefix() -> &'static str {
        "datasource"
    }

    fn from_config(config: &SqlgateConfig) -> Result<Self, ConfigError> {
        let key = |name: &str| format!("{}.{name}", Self::prefix());

        Ok(ConnectionConfig {
            driver: config.get(&key("driver"))?,
            host: config.get_opt(&key("host"))?.unwrap_or_default(),
            port: config.get_opt(&key("port"))?.unwrap_or_default(),
            user: config.get_opt(&key("user"))?.unwrap_or_default(),
            password: config.get_opt(&key("password"))?.unwrap_or_default(),
            db_name: config.get_opt(&key("database"))?.unwrap_or_default(),
            params: config.string_map(&key("params"))?,
            max_open_conns: config.get_opt(&key("pool.maxopen"))?.unwrap_or_default(),
            max_idle_conns: config.get_opt(&key("pool.maxidle"))?.unwrap_or_default(),
            conn_max_lifetime_secs: config.get_opt(&key("pool.maxlifetime"))?.unwrap_or_default(),
        })
    }
}
