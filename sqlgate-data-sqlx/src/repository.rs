use std::future::Future;
use std::sync::Arc;

use sqlgate_data::{DataError, Dialect, Entity, OpContext, Page, Pageable, QueryBuilder, Value};
use sqlx::any::{AnyQueryResult, AnyRow};
use sqlx::{Any, AnyPool, FromRow};
use tracing::{debug, warn};

use crate::bind::arguments;
use crate::error::SqlxErrorExt;
use crate::pool::Pool;
use crate::tx::{Tx, TxState};

/// An entity the repository can both write and read back.
pub trait Record: Entity + for<'r> FromRow<'r, AnyRow> {}

impl<T> Record for T where T: Entity + for<'r> FromRow<'r, AnyRow> {}

#[derive(Clone)]
enum Handle {
    Root(AnyPool),
    Tx(Arc<TxState>),
}

/// Generic CRUD, query and transaction façade over one handle: the root pool
/// or an active transaction.
///
/// The record type is chosen per call, so a single repository serves every
/// entity. Every operation takes an [`OpContext`] and stops with
/// [`DataError::Cancelled`] or [`DataError::DeadlineExceeded`] when it fires.
/// Engine errors are returned verbatim as [`DataError::Database`].
///
/// # Example
///
/// ```ignore
/// let repo = pool.repository();
/// let ctx = OpContext::background();
///
/// let mut car = Car { id: 0, brand: "Fiat".into(), ..Default::default() };
/// repo.create(&ctx, &mut car).await?;
///
/// let page = repo.get_paginated::<Car>(&ctx, 1, 20).await?;
/// ```
#[derive(Clone)]
pub struct Repository {
    handle: Handle,
    dialect: Dialect,
}

// Runs `$body` against whichever executor the repository is bound to.
macro_rules! on_handle {
    ($self:ident, $exec:ident => $body:expr) => {
        match &$self.handle {
            Handle::Root(pool) => {
                let $exec = pool;
                $body.await
            }
            Handle::Tx(state) => {
                let mut guard = state.conn.lock().await;
                let Some(tx) = guard.as_mut() else {
                    return Err(DataError::TransactionClosed);
                };
                let $exec = &mut **tx;
                $body.await
            }
        }
        .map_err(SqlxErrorExt::into_data_error)
    };
}

impl Repository {
    pub fn new(pool: &Pool) -> Self {
        Self {
            handle: Handle::Root(pool.any_pool().clone()),
            dialect: pool.dialect(),
        }
    }

    pub(crate) fn for_tx(state: Arc<TxState>, dialect: Dialect) -> Self {
        Self {
            handle: Handle::Tx(state),
            dialect,
        }
    }

    /// `true` when bound to a transaction rather than the root pool.
    pub fn is_transactional(&self) -> bool {
        matches!(self.handle, Handle::Tx(_))
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// A [`QueryBuilder`] for `T`'s table in this repository's dialect.
    pub fn query<T: Entity>(&self) -> QueryBuilder {
        QueryBuilder::new_with_dialect(T::table_name(), self.dialect)
    }

    /// Insert `entity`.
    ///
    /// An unset primary key is left for the database to generate, and the
    /// generated value is written back through [`Entity::set_generated_id`].
    pub async fn create<T: Entity>(
        &self,
        ctx: &OpContext,
        entity: &mut T,
    ) -> Result<(), DataError> {
        ctx.run(self.insert(entity)).await
    }

    /// Save every field of `entity`.
    ///
    /// An unset primary key behaves like [`create`](Self::create). Otherwise
    /// the row with that key is updated, or inserted when it does not exist.
    pub async fn update<T: Entity>(
        &self,
        ctx: &OpContext,
        entity: &mut T,
    ) -> Result<(), DataError> {
        let id = entity.id_value();
        if id.is_unset_key() {
            return self.create(ctx, entity).await;
        }
        ctx.run(async {
            let assignments = entity.non_key_values();
            if !assignments.is_empty() {
                let (sql, params) = self
                    .query::<T>()
                    .where_eq(T::id_column(), id.clone())
                    .build_update(assignments);
                if self.execute(&sql, params).await?.rows_affected() > 0 {
                    return Ok(());
                }
            }
            // Zero rows may also mean "unchanged" on MySQL, so confirm absence first.
            if self.exists::<T>(id).await? {
                return Ok(());
            }
            self.insert(entity).await
        })
        .await
    }

    /// Delete the row matching `entity`'s primary key.
    ///
    /// Fails with [`DataError::MissingPrimaryKey`] when the key is unset, so a
    /// blank entity can never delete the whole table.
    pub async fn delete<T: Entity>(&self, ctx: &OpContext, entity: &T) -> Result<(), DataError> {
        let id = entity.id_value();
        if id.is_unset_key() {
            return Err(DataError::MissingPrimaryKey {
                table: T::table_name(),
            });
        }
        ctx.run(self.delete_where::<T>(id)).await
    }

    pub async fn delete_by_id<T: Entity>(
        &self,
        ctx: &OpContext,
        id: &T::Id,
    ) -> Result<(), DataError> {
        ctx.run(self.delete_where::<T>(id.clone().into())).await
    }

    /// Load the row with primary key `id` into `out`.
    ///
    /// When no row matches, returns `Ok(())` and leaves `out` untouched.
    pub async fn get_by_id<T: Record>(
        &self,
        ctx: &OpContext,
        id: &T::Id,
        out: &mut T,
    ) -> Result<(), DataError> {
        if let Some(found) = self.find_by_id::<T>(ctx, id).await? {
            *out = found;
        }
        Ok(())
    }

    pub async fn find_by_id<T: Record>(
        &self,
        ctx: &OpContext,
        id: &T::Id,
    ) -> Result<Option<T>, DataError> {
        let (sql, params) = self
            .query::<T>()
            .where_eq(T::id_column(), id.clone())
            .build_select("*");
        ctx.run(self.fetch_optional(&sql, params)).await
    }

    pub async fn get_all<T: Record>(&self, ctx: &OpContext) -> Result<Vec<T>, DataError> {
        let (sql, params) = self.query::<T>().build_select("*");
        ctx.run(self.fetch_all(&sql, params)).await
    }

    /// One page of `T`, ordered by primary key, with the table's total row count.
    ///
    /// Pages are 1-based. A `page` or `page_size` of zero or less returns every row.
    pub async fn get_paginated<T: Record>(
        &self,
        ctx: &OpContext,
        page: i64,
        page_size: i64,
    ) -> Result<Page<T>, DataError> {
        let pageable = Pageable::new(page, page_size);
        ctx.run(async {
            let total = self.count_rows::<T>().await?;
            let mut query = self.query::<T>().order_by(T::id_column(), true);
            if !pageable.is_unpaged() {
                query = query.limit(pageable.size as u64).offset(pageable.offset());
            }
            let (sql, params) = query.build_select("*");
            let content = self.fetch_all(&sql, params).await?;
            Ok::<_, DataError>(Page::new(content, &pageable, total))
        })
        .await
    }

    /// Rows of `T` whose `field` equals `value`.
    ///
    /// `field` is written into the statement as-is and must be a trusted
    /// column name; `value` is always bound.
    pub async fn get_by_field<T: Record>(
        &self,
        ctx: &OpContext,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<T>, DataError> {
        let (sql, params) = self.query::<T>().where_eq(field, value).build_select("*");
        ctx.run(self.fetch_all(&sql, params)).await
    }

    pub async fn count<T: Entity>(&self, ctx: &OpContext) -> Result<u64, DataError> {
        ctx.run(self.count_rows::<T>()).await
    }

    /// Run `f` inside a transaction.
    ///
    /// `f` receives a repository bound to the transaction. `Ok` commits. `Err`
    /// rolls back and returns the error unchanged. If `ctx` fires while `f`
    /// runs, the transaction is rolled back and the cancellation is returned.
    ///
    /// Called on a transactional repository, the scope becomes a savepoint of
    /// the enclosing transaction: `Ok` releases it, `Err` rolls back to it and
    /// leaves the enclosing transaction usable.
    #[tracing::instrument(level = "debug", skip_all, fields(nested = self.is_transactional()))]
    pub async fn transaction<F, Fut, R, E>(&self, ctx: &OpContext, f: F) -> Result<R, E>
    where
        F: FnOnce(Repository) -> Fut,
        Fut: Future<Output = Result<R, E>>,
        E: From<DataError>,
    {
        match &self.handle {
            Handle::Root(pool) => {
                let tx = ctx
                    .run(async { pool.begin().await.map_err(SqlxErrorExt::into_data_error) })
                    .await?;
                let state = TxState::new(tx);
                let scoped = Self::for_tx(state.clone(), self.dialect);
                match ctx.run(f(scoped)).await {
                    Ok(value) => {
                        state.commit().await?;
                        Ok(value)
                    }
                    Err(err) => {
                        state.rollback_logged().await;
                        Err(err)
                    }
                }
            }
            Handle::Tx(state) => {
                let savepoint = state.next_savepoint();
                self.raw(&format!("SAVEPOINT {savepoint}")).await?;
                match ctx.run(f(self.clone())).await {
                    Ok(value) => {
                        self.raw(&format!("RELEASE SAVEPOINT {savepoint}")).await?;
                        Ok(value)
                    }
                    Err(err) => {
                        if let Err(rollback_err) =
                            self.raw(&format!("ROLLBACK TO SAVEPOINT {savepoint}")).await
                        {
                            warn!(error = %rollback_err, %savepoint, "savepoint rollback failed");
                        }
                        Err(err)
                    }
                }
            }
        }
    }

    /// Begin a transaction the caller finishes with [`Tx::commit`] or
    /// [`Tx::rollback`].
    ///
    /// Fails with [`DataError::NestedTransaction`] on a transactional repository.
    pub async fn manual_tx(&self, ctx: &OpContext) -> Result<Tx, DataError> {
        let Handle::Root(pool) = &self.handle else {
            return Err(DataError::NestedTransaction);
        };
        let tx = ctx
            .run(async { pool.begin().await.map_err(SqlxErrorExt::into_data_error) })
            .await?;
        debug!("manual transaction started");
        Ok(Tx::new(TxState::new(tx), self.dialect))
    }

    async fn insert<T: Entity>(&self, entity: &mut T) -> Result<(), DataError> {
        let generated = entity.id_value().is_unset_key();
        let row = if generated {
            entity.non_key_values()
        } else {
            T::columns().iter().copied().zip(entity.values()).collect()
        };
        let query = self.query::<T>();

        if generated && self.dialect.supports_returning() {
            let (sql, params) = query.build_insert(row, Some(T::id_column()));
            let id = self.fetch_i64(&sql, params).await?;
            entity.set_generated_id(id);
            return Ok(());
        }

        let (sql, params) = query.build_insert(row, None);
        let result = self.execute(&sql, params).await?;
        if generated {
            if let Some(id) = result.last_insert_id() {
                entity.set_generated_id(id);
            }
        }
        Ok(())
    }

    async fn delete_where<T: Entity>(&self, id: Value) -> Result<(), DataError> {
        let (sql, params) = self.query::<T>().where_eq(T::id_column(), id).build_delete();
        self.execute(&sql, params).await.map(|_| ())
    }

    async fn exists<T: Entity>(&self, id: Value) -> Result<bool, DataError> {
        let (sql, params) = self.query::<T>().where_eq(T::id_column(), id).build_count();
        Ok(self.fetch_i64(&sql, params).await? > 0)
    }

    async fn count_rows<T: Entity>(&self) -> Result<u64, DataError> {
        let (sql, params) = self.query::<T>().build_count();
        let count = self.fetch_i64(&sql, params).await?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn execute(&self, sql: &str, params: Vec<Value>) -> Result<AnyQueryResult, DataError> {
        debug!(sql, ?params, "execute");
        let query = sqlx::query_with::<Any, _>(sql, arguments(params)?);
        on_handle!(self, exec => query.execute(exec))
    }

    async fn fetch_all<T: Record>(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Vec<T>, DataError> {
        debug!(sql, ?params, "fetch_all");
        let query = sqlx::query_as_with::<Any, T, _>(sql, arguments(params)?);
        on_handle!(self, exec => query.fetch_all(exec))
    }

    async fn fetch_optional<T: Record>(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Option<T>, DataError> {
        debug!(sql, ?params, "fetch_optional");
        let query = sqlx::query_as_with::<Any, T, _>(sql, arguments(params)?);
        on_handle!(self, exec => query.fetch_optional(exec))
    }

    async fn fetch_i64(&self, sql: &str, params: Vec<Value>) -> Result<i64, DataError> {
        debug!(sql, ?params, "fetch_scalar");
        let query = sqlx::query_scalar_with::<Any, i64, _>(sql, arguments(params)?);
        on_handle!(self, exec => query.fetch_one(exec))
    }

    async fn raw(&self, sql: &str) -> Result<(), DataError> {
        debug!(sql, "raw");
        on_handle!(self, exec => sqlx::raw_sql(sql).execute(exec)).map(|_| ())
    }
}
