// Sound - declarative validation and coercion for untrusted input
//
// This library describes each field of an input record as an ordered chain of
// checks and transformations, then validates whole records against it.

// Re-export the engine
pub use sound_validation::*;

// Re-export logging
pub use sound_log;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        EmailProfile, EngineFault, FieldConstraint, Outcome, Record, Rule, Schema,
        ValidationConfig, ValidationPipe, Value, field, record, validate,
    };
}
