use std::fmt;

use crate::config::ConfigError;
use crate::driver::Driver;

/// Boxed error used to carry backend errors across crate boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A configuration field that a driver requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    Host,
    Port,
    User,
    DbName,
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RequiredField::Host => "Host",
            RequiredField::Port => "Port",
            RequiredField::User => "User",
            RequiredField::DbName => "DBName",
        })
    }
}

/// Errors raised while turning a configuration into an open connection.
///
/// Every variant is fatal to the connect attempt; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The driver tag matched no known backend. Carries the original input.
    #[error("unsupported driver: {0}")]
    UnsupportedDriver(String),

    /// A field required by the resolved driver is empty or zero.
    #[error("missing {field}{hint} for {driver} connection")]
    MissingField {
        driver: Driver,
        field: RequiredField,
        hint: &'static str,
    },

    /// A configuration value cannot be expressed as an engine connect URL.
    #[error("invalid {driver} connection settings: {reason}")]
    InvalidSettings { driver: Driver, reason: String },

    /// The backend rejected the connection or the pool could not be opened.
    #[error("failed to open database: {0}")]
    ConnectionFailed(#[source] BoxError),

    /// Loading the layered configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ConnectError {
    pub(crate) fn missing(driver: Driver, field: RequiredField) -> Self {
        let hint = match (driver, field) {
            (Driver::Sqlite, RequiredField::DbName) => " (file path or :memory:)",
            _ => "",
        };
        ConnectError::MissingField { driver, field, hint }
    }

    /// Wrap a backend error raised while establishing the connection.
    pub fn connection_failed(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        ConnectError::ConnectionFailed(Box::new(err))
    }

    /// `true` for errors detected locally, before any I/O.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ConnectError::UnsupportedDriver(_)
                | ConnectError::MissingField { .. }
                | ConnectError::InvalidSettings { .. }
        )
    }
}
