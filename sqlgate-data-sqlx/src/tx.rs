//! Transaction handles.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use sqlgate_data::{DataError, Dialect};
use sqlx::{Any, Transaction};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::SqlxErrorExt;
use crate::repository::Repository;

/// The shared state behind a transactional repository.
///
/// `None` once the transaction has been committed or rolled back.
pub(crate) struct TxState {
    pub(crate) conn: Mutex<Option<Transaction<'static, Any>>>,
    savepoints: AtomicU32,
}

impl TxState {
    pub(crate) fn new(tx: Transaction<'static, Any>) -> Arc<Self> {
        Arc::new(Self {
            conn: Mutex::new(Some(tx)),
            savepoints: AtomicU32::new(0),
        })
    }

    pub(crate) fn next_savepoint(&self) -> String {
        let n = self.savepoints.fetch_add(1, Ordering::Relaxed) + 1;
        format!("sqlgate_sp_{n}")
    }

    pub(crate) async fn commit(&self) -> Result<(), DataError> {
        let tx = self
            .conn
            .lock()
            .await
            .take()
            .ok_or(DataError::TransactionClosed)?;
        tx.commit().await.map_err(SqlxErrorExt::into_data_error)?;
        debug!("transaction committed");
        Ok(())
    }

    pub(crate) async fn rollback(&self) -> Result<(), DataError> {
        let tx = self
            .conn
            .lock()
            .await
            .take()
            .ok_or(DataError::TransactionClosed)?;
        tx.rollback().await.map_err(SqlxErrorExt::into_data_error)?;
        debug!("transaction rolled back");
        Ok(())
    }

    /// Roll back, logging instead of returning a failure.
    pub(crate) async fn rollback_logged(&self) {
        match self.rollback().await {
            Ok(()) | Err(DataError::TransactionClosed) => {}
            Err(err) => warn!(error = %err, "transaction rollback failed"),
        }
    }
}

/// A manually controlled transaction, returned by
/// [`Repository::manual_tx`](crate::Repository::manual_tx).
///
/// Call [`commit`](Tx::commit) or [`rollback`](Tx::rollback) to finish it.
/// Dropping an unfinished `Tx` rolls the transaction back; repositories
/// obtained from it report [`DataError::TransactionClosed`] afterwards.
pub struct Tx {
    state: Arc<TxState>,
    dialect: Dialect,
}

impl std::fmt::Debug for Tx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let finished = self
            .state
            .conn
            .try_lock()
            .map(|conn| conn.is_none())
            .ok();
        f.debug_struct("Tx")
            .field("dialect", &self.dialect)
            .field("finished", &finished)
            .finish()
    }
}

impl Tx {
    pub(crate) fn new(state: Arc<TxState>, dialect: Dialect) -> Self {
        Self { state, dialect }
    }

    /// A repository whose operations run inside this transaction.
    pub fn repository(&self) -> Repository {
        Repository::for_tx(self.state.clone(), self.dialect)
    }

    pub async fn commit(self) -> Result<(), DataError> {
        self.state.commit().await
    }

    pub async fn rollback(self) -> Result<(), DataError> {
        self.state.rollback().await
    }
}

impl Drop for Tx {
    fn drop(&mut self) {
        // Dropping the engine transaction queues its rollback on the connection.
        if let Ok(mut conn) = self.state.conn.try_lock() {
            if conn.take().is_some() {
                debug!("unfinished transaction dropped, rolling back");
            }
        }
    }
}
