//! # sqlgate-data-sqlx: SQLx backend for the sqlgate data layer
//!
//! This crate opens connection pools through SQLx's `Any` driver, which picks
//! the backend from the URL scheme at runtime, and provides the generic
//! repository on top of them. It depends on [`sqlgate_data`] for the
//! engine-agnostic types.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`connect`] | Single-attempt pool open from a resolved [`BackendHandle`](sqlgate_core::BackendHandle) |
//! | [`Pool`] | Shared pool with settings, stats, health check and idempotent close |
//! | [`PoolSettings`] | Max open / max idle / max lifetime with defaults applied |
//! | [`Repository`] | Generic CRUD, pagination, field lookup and transactions |
//! | [`Tx`] | Manually committed transaction |
//! | [`SqlxErrorExt`] | Extension trait to convert `sqlx::Error` → `DataError` (`.into_data_error()`) |
//!
//! # Feature flags
//!
//! | Feature    | Driver |
//! |------------|--------|
//! | `sqlite`   | SQLite via `sqlx/sqlite` |
//! | `postgres` | PostgreSQL via `sqlx/postgres` |
//! | `mysql`    | MySQL via `sqlx/mysql` |
//!
//! All three are enabled by default. A configuration naming a driver whose
//! feature is disabled fails at [`connect`] with `ConnectionFailed`.
//!
//! # Quick start
//!
//! ```ignore
//! use sqlgate_core::{resolve, ConnectionConfig};
//! use sqlgate_data::OpContext;
//! use sqlgate_data_sqlx::{connect, PoolSettings};
//!
//! let config = ConnectionConfig::new("sqlite").db_name(":memory:");
//! let pool = connect(&resolve(&config)?, PoolSettings::from_config(&config)).await?;
//! let repo = pool.repository();
//!
//! repo.transaction(&OpContext::background(), |tx| async move {
//!     tx.create(&ctx, &mut car).await
//! })
//! .await?;
//! ```

mod bind;
pub mod error;
pub mod pool;
pub mod repository;
pub mod tx;

pub use error::{SqlxErrorExt, SqlxResult};
pub use pool::{
    connect, Pool, PoolSettings, PoolStats, DEFAULT_CONN_MAX_LIFETIME, DEFAULT_MAX_IDLE_CONNS,
    DEFAULT_MAX_OPEN_CONNS,
};
pub use repository::{Record, Repository};
pub use tx::Tx;

/// Re-exports of the most commonly used types from both `sqlgate-data` and this crate.
pub mod prelude {
    pub use crate::{connect, Pool, PoolSettings, Record, Repository, SqlxErrorExt, Tx};
    pub use sqlgate_data::prelude::*;
}
