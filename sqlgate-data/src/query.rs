use crate::value::Value;

/// SQL flavour: placeholder style and generated-key retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Generic SQL using `?` placeholders (default).
    Generic,
    /// SQLite-style `?` placeholders.
    Sqlite,
    /// MySQL-style `?` placeholders.
    MySql,
    /// Postgres-style `$1, $2, ...` placeholders.
    Postgres,
}

impl Dialect {
    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Generic | Dialect::Sqlite | Dialect::MySql => "?".to_string(),
        }
    }

    /// `true` when generated keys are read back with `RETURNING` instead of
    /// the statement's last-insert id.
    pub fn supports_returning(self) -> bool {
        matches!(self, Dialect::Postgres | Dialect::Sqlite)
    }
}

/// A fluent builder for the fixed statements a CRUD repository issues.
///
/// Only equality predicates joined by `AND` are supported. Table and column
/// names are interpolated as given; values always travel as bind parameters.
///
/// # Example
///
/// ```
/// use sqlgate_data::{Dialect, QueryBuilder};
///
/// let (sql, params) = QueryBuilder::new("cars")
///     .dialect(Dialect::Postgres)
///     .where_eq("brand", "Fiat")
///     .order_by("id", true)
///     .limit(10)
///     .build_select("*");
/// assert_eq!(sql, "SELECT * FROM cars WHERE brand = $1 ORDER BY id ASC LIMIT 10");
/// assert_eq!(params.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    conditions: Vec<(String, Value)>,
    order: Vec<(String, bool)>,
    limit_val: Option<u64>,
    offset_val: Option<u64>,
    dialect: Dialect,
}

impl QueryBuilder {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            conditions: Vec::new(),
            order: Vec::new(),
            limit_val: None,
            offset_val: None,
            dialect: Dialect::Generic,
        }
    }

    /// Create a new builder with an explicit SQL dialect.
    pub fn new_with_dialect(table: &str, dialect: Dialect) -> Self {
        Self::new(table).dialect(dialect)
    }

    /// Set the SQL dialect (affects placeholder style).
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions.push((column.to_string(), value.into()));
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order.push((column.to_string(), ascending));
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_val = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset_val = Some(offset);
        self
    }

    /// Build a SELECT query returning `(sql, bind_values)`.
    ///
    /// The `columns` parameter determines which columns to select (e.g., `"*"` or `"id, name"`).
    pub fn build_select(&self, columns: &str) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {columns} FROM {}", self.table);
        let mut params = Vec::new();
        self.append_where(&mut sql, &mut params);
        self.append_order(&mut sql);
        self.append_limit_offset(&mut sql);
        (sql, params)
    }

    /// Build a COUNT query returning `(sql, bind_values)`.
    pub fn build_count(&self) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let mut params = Vec::new();
        self.append_where(&mut sql, &mut params);
        (sql, params)
    }

    /// Build an INSERT of `row`. Conditions, ordering and limits are ignored.
    ///
    /// An empty `row` inserts `DEFAULT VALUES`. With `returning`, a
    /// `RETURNING <column>` clause is appended.
    pub fn build_insert(
        &self,
        row: Vec<(&str, Value)>,
        returning: Option<&str>,
    ) -> (String, Vec<Value>) {
        let mut columns = Vec::with_capacity(row.len());
        let mut placeholders = Vec::with_capacity(row.len());
        let mut params = Vec::with_capacity(row.len());
        for (column, value) in row {
            columns.push(column);
            placeholders.push(self.dialect.placeholder(params.len() + 1));
            params.push(value);
        }
        let mut sql = if columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.table)
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table,
                columns.join(", "),
                placeholders.join(", ")
            )
        };
        if let Some(column) = returning {
            sql.push_str(&format!(" RETURNING {column}"));
        }
        (sql, params)
    }

    /// Build an UPDATE setting `assignments` on the rows matching the conditions.
    pub fn build_update(&self, assignments: Vec<(&str, Value)>) -> (String, Vec<Value>) {
        let mut params = Vec::with_capacity(assignments.len() + self.conditions.len());
        let mut sets = Vec::with_capacity(assignments.len());
        for (column, value) in assignments {
            sets.push(format!(
                "{column} = {}",
                self.dialect.placeholder(params.len() + 1)
            ));
            params.push(value);
        }
        let mut sql = format!("UPDATE {} SET {}", self.table, sets.join(", "));
        self.append_where(&mut sql, &mut params);
        (sql, params)
    }

    /// Build a DELETE of the rows matching the conditions.
    pub fn build_delete(&self) -> (String, Vec<Value>) {
        let mut sql = format!("DELETE FROM {}", self.table);
        let mut params = Vec::new();
        self.append_where(&mut sql, &mut params);
        (sql, params)
    }

    fn append_where(&self, sql: &mut String, params: &mut Vec<Value>) {
        if self.conditions.is_empty() {
            return;
        }
        let clauses: Vec<_> = self
            .conditions
            .iter()
            .map(|(column, value)| {
                params.push(value.clone());
                format!("{column} = {}", self.dialect.placeholder(params.len()))
            })
            .collect();
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    fn append_order(&self, sql: &mut String) {
        if self.order.is_empty() {
            return;
        }
        sql.push_str(" ORDER BY ");
        let clauses: Vec<_> = self
            .order
            .iter()
            .map(|(col, asc)| {
                if *asc {
                    format!("{col} ASC")
                } else {
                    format!("{col} DESC")
                }
            })
            .collect();
        sql.push_str(&clauses.join(", "));
    }

    fn append_limit_offset(&self, sql: &mut String) {
        if let Some(limit) = self.limit_val {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset_val {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
    }
}
