use std::fmt;
use std::str::FromStr;

use crate::error::ConnectError;

/// A supported database backend.
///
/// Configuration text is parsed with [`Driver::parse`], which normalizes the
/// tag case-insensitively. `postgres` and `postgresql` are aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    MySql,
    Postgres,
    Sqlite,
    SqlServer,
}

impl Driver {
    pub const ALL: [Driver; 4] = [
        Driver::MySql,
        Driver::Postgres,
        Driver::Sqlite,
        Driver::SqlServer,
    ];

    /// Parse a driver tag coming from configuration.
    ///
    /// Unknown tags fail with [`ConnectError::UnsupportedDriver`] carrying the
    /// original, non-normalized input.
    pub fn parse(raw: &str) -> Result<Self, ConnectError> {
        match raw.to_lowercase().as_str() {
            "mysql" => Ok(Driver::MySql),
            "postgres" | "postgresql" => Ok(Driver::Postgres),
            "sqlite" => Ok(Driver::Sqlite),
            "sqlserver" => Ok(Driver::SqlServer),
            _ => Err(ConnectError::UnsupportedDriver(raw.to_string())),
        }
    }

    /// Canonical lowercase tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Driver::MySql => "mysql",
            Driver::Postgres => "postgres",
            Driver::Sqlite => "sqlite",
            Driver::SqlServer => "sqlserver",
        }
    }

    /// Human-readable backend name used in error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Driver::MySql => "MySQL",
            Driver::Postgres => "Postgres",
            Driver::Sqlite => "SQLite",
            Driver::SqlServer => "SQLServer",
        }
    }

    /// Whether the backend is reached over the network (host/port/user required).
    pub fn is_networked(self) -> bool {
        !matches!(self, Driver::Sqlite)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Driver {
    type Err = ConnectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Driver::parse(s)
    }
}
