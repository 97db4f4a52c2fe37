// Format validator trait

use crate::ValidationError;

/// A fixed-pattern check over a string value.
///
/// Implementors only answer yes or no. The rule that owns the check decides
/// the failure message, falling back to [`FormatValidator::default_message`].
pub trait FormatValidator: Send + Sync {
    /// Whether `value` has the expected format
    fn is_valid(&self, value: &str) -> bool;

    /// Rule kind name, e.g. `isUrl`
    fn name(&self) -> &'static str;

    /// Message used when the rule has no custom one
    fn default_message(&self, field: &str) -> String;

    /// Check `value` directly, outside of a schema.
    fn validate(&self, value: &str, field: &str) -> Result<(), ValidationError> {
        if self.is_valid(value) {
            Ok(())
        } else {
            Err(ValidationError::new(field, self.default_message(field))
                .with_rule(self.name())
                .with_value(value))
        }
    }
}
