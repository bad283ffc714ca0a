pub mod context;
pub mod entity;
pub mod error;
pub mod page;
pub mod query;
pub mod value;

pub use context::OpContext;
pub use entity::Entity;
pub use error::DataError;
pub use page::{Page, Pageable};
pub use query::{Dialect, QueryBuilder};
pub use value::{HasValueKind, Value, ValueKind};

pub mod prelude {
    //! Re-exports of the most commonly used data types.
    pub use crate::{DataError, Entity, OpContext, Page, Pageable, QueryBuilder, Value, ValueKind};
}
