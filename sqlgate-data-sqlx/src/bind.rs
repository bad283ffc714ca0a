use sqlgate_data::{DataError, Value, ValueKind};
use sqlx::any::AnyArguments;
use sqlx::Arguments;

/// Encode `params` in order as engine arguments.
pub(crate) fn arguments<'q>(params: Vec<Value>) -> Result<AnyArguments<'q>, DataError> {
    let mut args = AnyArguments::default();
    for value in params {
        match value {
            // Postgres rejects a text-typed NULL for integer, boolean or bytea columns.
            Value::Null(ValueKind::Bool) => args.add(None::<bool>),
            Value::Null(ValueKind::Int) => args.add(None::<i64>),
            Value::Null(ValueKind::Float) => args.add(None::<f64>),
            Value::Null(ValueKind::Text) => args.add(None::<String>),
            Value::Null(ValueKind::Bytes) => args.add(None::<Vec<u8>>),
            Value::Bool(v) => args.add(v),
            Value::Int(v) => args.add(v),
            Value::Float(v) => args.add(v),
            Value::Text(v) => args.add(v),
            Value::Bytes(v) => args.add(v),
        }
        .map_err(DataError::Database)?;
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::any::AnyTypeInfoKind;
    use sqlx_core::any::AnyValueKind;

    fn null_kinds(params: Vec<Value>) -> Vec<AnyTypeInfoKind> {
        let args = arguments(params).unwrap();
        args.values
            .0
            .iter()
            .map(|value| match value {
                AnyValueKind::Null(kind) => *kind,
                other => panic!("expected a NULL argument, got {other:?}"),
            })
            .collect()
    }

    #[test]
    fn test_null_binds_with_field_type() {
        let kinds = null_kinds(vec![
            Value::from(None::<i64>),
            Value::from(None::<bool>),
            Value::from(None::<f64>),
            Value::from(None::<String>),
            Value::from(None::<Vec<u8>>),
        ]);
        assert_eq!(
            kinds,
            vec![
                AnyTypeInfoKind::BigInt,
                AnyTypeInfoKind::Bool,
                AnyTypeInfoKind::Double,
                AnyTypeInfoKind::Text,
                AnyTypeInfoKind::Blob,
            ]
        );
    }

    #[test]
    fn test_arguments_keep_order() {
        let params = vec![Value::from("Fiat"), Value::from(2015), Value::from(true)];
        let args = arguments(params).unwrap();
        assert_eq!(args.len(), 3);
        assert!(matches!(args.values.0[0], AnyValueKind::Text(_)));
        assert!(matches!(args.values.0[1], AnyValueKind::BigInt(2015)));
        assert!(matches!(args.values.0[2], AnyValueKind::Bool(true)));
    }
}
