// JSON entry point for request bodies

use crate::{Outcome, PipeError, Record, Schema, Value};

/// Validates JSON request bodies against a [`Schema`]
pub struct ValidationPipe;

impl ValidationPipe {
    /// Decode a JSON object body and validate it.
    ///
    /// Failing fields are reported in the returned [`Outcome`]; only bodies
    /// that are not a JSON object, and schema faults, are errors.
    pub fn parse(body: &[u8], schema: &Schema) -> Result<Outcome, PipeError> {
        let json: serde_json::Value = serde_json::from_slice(body)?;
        let input = record_from_json(json)?;
        Ok(schema.validate(&input)?)
    }

    /// Error report for a response body, `{"errors": [..]}`.
    pub fn error_body(outcome: &Outcome) -> serde_json::Value {
        outcome.to_errors().to_json()
    }
}

/// Turn a decoded JSON object into an input record.
pub fn record_from_json(json: serde_json::Value) -> Result<Record, PipeError> {
    match json {
        serde_json::Value::Object(map) => {
            Ok(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
        }
        serde_json::Value::Null => Err(PipeError::NotAnObject("null")),
        serde_json::Value::Bool(_) => Err(PipeError::NotAnObject("a boolean")),
        serde_json::Value::Number(_) => Err(PipeError::NotAnObject("a number")),
        serde_json::Value::String(_) => Err(PipeError::NotAnObject("a string")),
        serde_json::Value::Array(_) => Err(PipeError::NotAnObject("an array")),
    }
}

/// Build a [`Record`] from `key => value` pairs
#[macro_export]
macro_rules! record {
    () => {
        $crate::Record::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut record = $crate::Record::new();
        $(
            record.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        record
    }};
}
