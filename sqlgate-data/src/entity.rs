use crate::value::Value;

/// Trait representing a database entity: table metadata plus its bind values.
///
/// `columns()` lists every column including the primary key, and `values()`
/// returns one [`Value`] per column in the same order. Result scanning is left
/// to the execution engine's row mapping.
///
/// # Example
///
/// ```
/// use sqlgate_data::{Entity, Value};
///
/// struct Car { id: i64, brand: String }
///
/// impl Entity for Car {
///     type Id = i64;
///     fn table_name() -> &'static str { "cars" }
///     fn columns() -> &'static [&'static str] { &["id", "brand"] }
///     fn id(&self) -> &i64 { &self.id }
///     fn values(&self) -> Vec<Value> { vec![self.id.into(), self.brand.clone().into()] }
///     fn set_generated_id(&mut self, id: i64) { self.id = id; }
/// }
///
/// let car = Car { id: 0, brand: "Fiat".into() };
/// assert!(car.id_value().is_unset_key());
/// ```
pub trait Entity: Send + Sync + Unpin + 'static {
    type Id: Clone + Into<Value> + Send + Sync + 'static;

    fn table_name() -> &'static str;

    fn id_column() -> &'static str {
        "id"
    }

    fn columns() -> &'static [&'static str];

    fn id(&self) -> &Self::Id;

    /// Bind values, one per entry of [`columns`](Entity::columns).
    fn values(&self) -> Vec<Value>;

    /// Store a database-generated primary key. Entities with caller-assigned
    /// keys keep the default no-op.
    fn set_generated_id(&mut self, _id: i64) {}

    fn id_value(&self) -> Value {
        self.id().clone().into()
    }

    /// Column/value pairs, skipping the primary key column.
    fn non_key_values(&self) -> Vec<(&'static str, Value)> {
        Self::columns()
            .iter()
            .copied()
            .zip(self.values())
            .filter(|(column, _)| *column != Self::id_column())
            .collect()
    }
}
