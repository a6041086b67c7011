use crate::types::{infer_type, ParamType, Value};
use crate::{Error, Result};

/// One named placeholder together with the value bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamBinding {
    name: String,
    value: Value,
    param_type: ParamType,
}

impl ParamBinding {
    /// Creates a binding, rejecting values that have no SQLite bind type.
    ///
    /// `name` is used verbatim and must carry its sigil (`:age`).
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let name = name.into();
        let value = value.into();
        let param_type = infer_type(&value).ok_or_else(|| {
            Error::invalid_argument(format!(
                "cannot bind a {} value to {name}",
                value.kind()
            ))
        })?;

        Ok(Self {
            name,
            value,
            param_type,
        })
    }

    /// For values already checked with [`infer_type`].
    pub(crate) fn prevalidated(name: String, value: Value) -> Self {
        let param_type = infer_type(&value).unwrap_or(ParamType::Null);
        Self {
            name,
            value,
            param_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn param_type(&self) -> ParamType {
        self.param_type
    }

    /// The value in the shape the driver binds it with.
    pub(crate) fn to_driver_value(&self) -> libsql::Value {
        match &self.value {
            Value::Boolean(b) => libsql::Value::Integer(i64::from(*b)),
            Value::Integer(i) => libsql::Value::Integer(*i),
            Value::Float(f) => libsql::Value::Real(*f),
            Value::Text(s) => libsql::Value::Text(s.clone()),
            // blobs never get past `new`
            Value::Null | Value::Blob(_) => libsql::Value::Null,
        }
    }
}
