// Schema validator and aggregate outcome

use crate::engine::{FieldOutcome, evaluate};
use crate::{EngineFault, FieldConstraint, Record, ValidationConfig, ValidationError, ValidationErrors, Value};
use serde::Serialize;
use sound_log::{debug, trace};
use std::sync::Arc;

const TARGET: &str = "sound::schema";

/// Field keys mapped to their constraints, in insertion order.
///
/// Constraints are frozen behind an `Arc` when added, so a schema is cheap
/// to clone and safe to share across threads and tasks.
///
/// ```
/// use sound_validation::{Record, Schema, Value, field};
///
/// let schema = Schema::new()
///     .field("username", field().is_string().to_trim().is_required())
///     .field("age", field().to_integer().has_default(21));
///
/// let mut input = Record::new();
/// input.insert("username".to_string(), Value::from("  andy "));
///
/// let outcome = schema.validate(&input).unwrap();
/// assert!(outcome.ok);
/// assert_eq!(outcome.value("username"), Some(&Value::from("andy")));
/// assert_eq!(outcome.value("age"), Some(&Value::Integer(21)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, Arc<FieldConstraint>)>,
    config: Arc<ValidationConfig>,
}

impl Schema {
    /// Empty schema with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Share `config` with every field of this schema.
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Add a field. Re-using a key replaces the earlier constraint in place.
    pub fn field(mut self, key: impl Into<String>, constraint: FieldConstraint) -> Self {
        let key = key.into();
        let constraint = Arc::new(constraint);
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = constraint,
            None => self.fields.push((key, constraint)),
        }
        self
    }

    /// Configuration shared by every field.
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    /// Constraint registered under `key`.
    pub fn get(&self, key: &str) -> Option<&FieldConstraint> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, constraint)| constraint.as_ref())
    }

    /// Validate every field of the schema against `input`.
    ///
    /// Bad input never produces `Err`; it lands in [`Outcome::errors`].
    /// `Err` means the schema itself is broken (an unknown rule kind).
    pub fn validate(&self, input: &Record) -> Result<Outcome, EngineFault> {
        self.validate_each(input, |_, _| {})
    }

    /// Validate, reporting each field to `callback` as it completes.
    ///
    /// The callback receives `Ok(Some(value))` for a clean field,
    /// `Ok(None)` for an empty optional field and `Err(message)` for a
    /// failure. The aggregate outcome is returned afterwards.
    pub fn validate_each<F>(&self, input: &Record, mut callback: F) -> Result<Outcome, EngineFault>
    where
        F: FnMut(&str, Result<Option<&Value>, &str>),
    {
        trace!(target: TARGET, "validating {} fields", self.fields.len());

        let mut outcome = Outcome::new(input.clone());
        for (key, constraint) in &self.fields {
            let result = evaluate(key, input.get(key), constraint, &self.config)?;
            match &result {
                FieldOutcome::Valid(value) => callback(key.as_str(), Ok(Some(value))),
                FieldOutcome::Empty => callback(key.as_str(), Ok(None)),
                FieldOutcome::Invalid { message, .. } => callback(key.as_str(), Err(message.as_str())),
            }
            outcome.record(key, result);
        }

        Ok(outcome.finish(self.fields.len()))
    }

    /// Validate fields concurrently, one task per field.
    ///
    /// Produces the same outcome as [`Schema::validate`]. When several
    /// fields fault, the first in insertion order is reported.
    pub async fn validate_parallel(&self, input: &Record) -> Result<Outcome, EngineFault> {
        use tokio::task::JoinSet;

        let mut set = JoinSet::new();

        for (index, (key, constraint)) in self.fields.iter().enumerate() {
            let key = key.clone();
            let constraint = Arc::clone(constraint);
            let config = Arc::clone(&self.config);
            let raw = input.get(&key).cloned();

            set.spawn(async move {
                let result = evaluate(&key, raw.as_ref(), &constraint, &config);
                (index, key, result)
            });
        }

        let mut results = Vec::with_capacity(self.fields.len());
        while let Some(joined) = set.join_next().await {
            let (index, key, result) = joined.map_err(|e| EngineFault::Task(e.to_string()))?;
            results.push((index, key, result));
        }
        results.sort_by_key(|(index, ..)| *index);

        let mut outcome = Outcome::new(input.clone());
        for (_, key, result) in results {
            outcome.record(&key, result?);
        }

        Ok(outcome.finish(self.fields.len()))
    }
}

impl<K: Into<String>> FromIterator<(K, FieldConstraint)> for Schema {
    fn from_iter<I: IntoIterator<Item = (K, FieldConstraint)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Schema::new(), |schema, (key, constraint)| schema.field(key, constraint))
    }
}

/// Validate `input` against `schema`.
pub fn validate(input: &Record, schema: &Schema) -> Result<Outcome, EngineFault> {
    schema.validate(input)
}

/// Result of validating one record against a [`Schema`].
///
/// A key in neither `values` nor `errors` was legitimately empty: not
/// required, no default, nothing provided.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// True iff no field failed
    pub ok: bool,

    /// Final working value of every field that passed, in schema order
    pub values: FieldMap<Value>,

    /// Message for every field that failed, in schema order
    pub errors: FieldMap<String>,

    /// The input record, untouched
    pub input: Record,

    #[serde(skip)]
    failed_rules: FieldMap<String>,
}

impl Outcome {
    fn new(input: Record) -> Self {
        Self {
            ok: true,
            values: FieldMap::new(),
            errors: FieldMap::new(),
            input,
            failed_rules: FieldMap::new(),
        }
    }

    fn record(&mut self, key: &str, result: FieldOutcome) {
        match result {
            FieldOutcome::Valid(value) => {
                self.values.insert(key, value);
            }
            FieldOutcome::Empty => {}
            FieldOutcome::Invalid { message, rule } => {
                self.errors.insert(key, message);
                self.failed_rules.insert(key, rule);
            }
        }
    }

    fn finish(mut self, fields: usize) -> Self {
        self.ok = self.errors.is_empty();
        if !self.ok {
            debug!(target: TARGET, "{} of {} fields failed", self.errors.len(), fields);
        }
        self
    }

    /// True iff no field failed.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Final working value of `key`, if it passed.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Error message of `key`, if it failed.
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// Rule kind that failed for `key`, e.g. `isMinLen` or `isRequired`.
    pub fn failed_rule(&self, key: &str) -> Option<&str> {
        self.failed_rules.get(key).map(String::as_str)
    }

    /// Structured form of the error map, with the failing rule and input.
    pub fn to_errors(&self) -> ValidationErrors {
        self.errors
            .iter()
            .map(|(key, message)| {
                let error = ValidationError::new(key, message.as_str())
                    .with_rule(self.failed_rule(key).unwrap_or("custom"));
                match self.input.get(key) {
                    Some(raw) => error.with_value(raw.to_string()),
                    None => error,
                }
            })
            .collect::<Vec<_>>()
            .into()
    }

    /// `{"ok": .., "values": {..}, "errors": {..}}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "ok": self.ok,
            "values": self.values,
            "errors": self.errors,
        })
    }
}

/// Per-field results of an [`Outcome`], iterated in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMap<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for FieldMap<T> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<T> FieldMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, key: &str, value: T) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Entry for `key`.
    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<T: Serialize> Serialize for FieldMap<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
