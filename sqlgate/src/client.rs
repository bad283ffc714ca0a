use sqlgate_core::{resolve, ConnectionConfig, Driver, SqlgateConfig};
use sqlgate_data_sqlx::{connect, Pool, PoolSettings, Repository};
use tracing::info;

use crate::error::Error;

/// An open database: the pool plus a repository bound to it.
///
/// Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct Client {
    pool: Pool,
    repo: Repository,
}

impl Client {
    /// Validate `config`, make one connection attempt and open the pool.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, Error> {
        let handle = resolve(config)?;
        let pool = connect(&handle, PoolSettings::from_config(config)).await?;
        info!(driver = %pool.driver(), "client connected");
        let repo = pool.repository();
        Ok(Self { pool, repo })
    }

    /// Connect using the `datasource` section of a layered configuration.
    pub async fn from_config(config: &SqlgateConfig) -> Result<Self, Error> {
        let datasource: ConnectionConfig = config.section()?;
        Self::connect(&datasource).await
    }

    /// Close the pool. Calling it again is a no-op.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// The root repository.
    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    pub fn driver(&self) -> Driver {
        self.pool.driver()
    }

    pub async fn health_check(&self) -> Result<(), Error> {
        Ok(self.pool.health_check().await?)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("pool", &self.pool).finish()
    }
}
