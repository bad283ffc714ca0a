//! sqlgate: one configuration shape for MySQL, PostgreSQL, SQLite and SQL
//! Server, a pooled connection, and a generic repository on top.
//!
//! This facade crate re-exports the sqlgate sub-crates through a single
//! dependency. Import everything you need with:
//!
//! ```ignore
//! use sqlgate::prelude::*;
//!
//! let client = Client::connect(&ConnectionConfig::new("sqlite").db_name(":memory:")).await?;
//! let cars = client.repo().get_all::<Car>(&OpContext::background()).await?;
//! client.close().await;
//! ```
//!
//! # Feature flags
//!
//! | Feature    | Default | Crate                            |
//! |------------|---------|----------------------------------|
//! | `sqlite`   | **yes** | `sqlgate-data-sqlx/sqlite`       |
//! | `postgres` | **yes** | `sqlgate-data-sqlx/postgres`     |
//! | `mysql`    | **yes** | `sqlgate-data-sqlx/mysql`        |

mod client;
mod error;

pub use client::Client;
pub use error::Error;

pub use sqlgate_core;
pub use sqlgate_data;
pub use sqlgate_data_sqlx;
pub use sqlx;

pub use sqlgate_core::{
    build_dsn, init_tracing, resolve, BackendHandle, ConfigError, ConnectError, ConnectionConfig,
    Driver, SqlgateConfig,
};
pub use sqlgate_data::{DataError, Entity, OpContext, Page, Pageable, Value};
pub use sqlgate_data_sqlx::{Pool, PoolSettings, Record, Repository, Tx};

pub mod prelude {
    //! Re-exports of the most commonly used types.
    pub use crate::{Client, Error};
    pub use sqlgate_core::prelude::*;
    pub use sqlgate_data_sqlx::prelude::*;
}
