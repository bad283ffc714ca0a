/// The SQL type a [`Value`] binds as.
///
/// A NULL keeps the type of the field it stands for, so backends with
/// strictly typed parameters accept it for non-text columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    Bytes,
}

/// A bind parameter, independent of the execution engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null(ValueKind),
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Value {
    /// The SQL type this value binds as.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null(kind) => *kind,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Bytes(_) => ValueKind::Bytes,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null(_))
    }

    /// `true` when a primary key holding this value counts as not yet assigned:
    /// NULL, integer zero, or the empty string.
    pub fn is_unset_key(&self) -> bool {
        match self {
            Value::Null(_) => true,
            Value::Int(i) => *i == 0,
            Value::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// Rust types with a fixed SQL counterpart.
///
/// Drives the type of the NULL an `Option::None` binds as.
pub trait HasValueKind {
    const KIND: ValueKind;
}

macro_rules! impl_from_int {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Int(i64::from(v))
                }
            }

            impl HasValueKind for $ty {
                const KIND: ValueKind = ValueKind::Int;
            }
        )+
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! impl_kind {
    ($($ty:ty => $kind:ident),+ $(,)?) => {
        $(
            impl HasValueKind for $ty {
                const KIND: ValueKind = ValueKind::$kind;
            }
        )+
    };
}

impl_kind!(
    bool => Bool,
    f32 => Float,
    f64 => Float,
    String => Text,
    &str => Text,
    &String => Text,
    Vec<u8> => Bytes,
);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl<T: Into<Value> + HasValueKind> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null(T::KIND), Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_keys() {
        assert!(Value::Null(ValueKind::Int).is_unset_key());
        assert!(Value::from(0i64).is_unset_key());
        assert!(Value::from(0u32).is_unset_key());
        assert!(Value::from("").is_unset_key());
        assert!(!Value::from(7i64).is_unset_key());
        assert!(!Value::from("abc").is_unset_key());
        assert!(!Value::from(false).is_unset_key());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
        assert_eq!(Value::from(Some(3u8)), Value::Int(3));
    }

    #[test]
    fn test_none_keeps_field_type() {
        assert_eq!(Value::from(None::<i32>), Value::Null(ValueKind::Int));
        assert_eq!(Value::from(None::<bool>), Value::Null(ValueKind::Bool));
        assert_eq!(Value::from(None::<f64>), Value::Null(ValueKind::Float));
        assert_eq!(Value::from(None::<String>), Value::Null(ValueKind::Text));
        assert_eq!(Value::from(None::<Vec<u8>>), Value::Null(ValueKind::Bytes));
        assert!(Value::from(None::<i64>).is_null());
        assert_eq!(Value::from(None::<i64>).kind(), Value::Int(1).kind());
    }
}
