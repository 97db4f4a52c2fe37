// Validation failures and engine faults

use std::fmt;
use thiserror::Error;

/// Failure of a single field, in structured form.
///
/// [`crate::Outcome::errors`] only keeps the message. This type adds the
/// rule that failed and the offending input, for API responses.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Schema key of the field
    pub field: String,

    /// Human-readable message (custom or generated)
    pub message: String,

    /// Rule kind that failed, e.g. `isMinLen` or `isRequired`
    pub rule: String,

    /// Original input, rendered as text (optional)
    pub value: Option<String>,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: "custom".to_string(),
            value: None,
        }
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = rule.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Collection of validation errors
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    pub errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn add(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Error for a specific field, if it failed
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// JSON body in the shape `{"errors": [{field, message, rule, value}]}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.errors.iter().map(|e| {
                serde_json::json!({
                    "field": e.field,
                    "message": e.message,
                    "rule": e.rule,
                    "value": e.value,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::new(errors)
    }
}

/// A fault in the schema itself, as opposed to bad input.
///
/// Faults abort the whole validation call; they are never folded into the
/// per-field error map.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineFault {
    #[error("program error: unknown rule kind '{kind}' on field '{field}'")]
    UnknownRule { field: String, kind: String },

    #[error("validation task failed: {0}")]
    Task(String),
}

/// Errors from [`crate::ValidationPipe`]
#[derive(Error, Debug)]
pub enum PipeError {
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error(transparent)]
    Fault(#[from] EngineFault),
}
