//! # sqlgate-core
//!
//! Driver-agnostic connection configuration for sqlgate. This crate turns a
//! [`ConnectionConfig`] into the pieces the execution engine needs, without
//! touching the network:
//!
//! | Item | Description |
//! |------|-------------|
//! | [`ConnectionConfig`] | Host, credentials, database name, free-form params and pool options |
//! | [`Driver`] | Closed set of supported backends, parsed case-insensitively |
//! | [`build_dsn`] | Driver-specific connection string |
//! | [`resolve`] | Per-driver validation producing a [`BackendHandle`] |
//! | [`SqlgateConfig`] | Layered YAML / `.env` / environment configuration |
//! | [`init_tracing`] | Default `tracing` subscriber |

pub mod config;
pub mod connection;
pub mod driver;
pub mod dsn;
pub mod error;
pub mod layers;
pub mod resolver;

pub use config::{
    ConfigError, ConfigProperties, ConfigValue, DefaultSecretResolver, FromConfigValue,
    SecretResolver, SqlgateConfig,
};
pub use connection::ConnectionConfig;
pub use driver::Driver;
pub use dsn::build_dsn;
pub use error::{BoxError, ConnectError, RequiredField};
pub use layers::init_tracing;
pub use resolver::{resolve, BackendHandle};

pub mod prelude {
    //! Re-exports of the most commonly used core types.
    pub use crate::{
        build_dsn, resolve, BackendHandle, ConnectError, ConnectionConfig, Driver, SqlgateConfig,
    };
}
