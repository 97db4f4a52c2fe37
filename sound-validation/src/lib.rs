//! Declarative field validation and value coercion
//!
//! Describe each field of an input record as an ordered chain of type
//! assertions, value constraints, string transforms and coercions. The
//! engine threads a working value through the chain, stops at the first
//! failure, and reports one message per failed field alongside the
//! transformed values of the fields that passed.
//!
//! # Examples
//!
//! ## Basic Validation
//!
//! ```
//! use sound_validation::{Schema, Value, field, record};
//!
//! let schema = Schema::new()
//!     .field("username", field()
//!         .set_name("Username")
//!         .is_string()
//!         .to_trim()
//!         .to_lower_case()
//!         .is_required()
//!         .is_token()
//!         .is_min_len(3))
//!     .field("email", field().is_string().to_trim().is_email_address())
//!     .field("age", field().to_integer().is_min_val(18).has_default(21));
//!
//! let input = record! {
//!     "username" => "  Andy  ",
//!     "email" => "me@example.com",
//! };
//!
//! let outcome = schema.validate(&input).unwrap();
//! assert!(outcome.ok);
//! assert_eq!(outcome.value("username"), Some(&Value::from("andy")));
//! assert_eq!(outcome.value("age"), Some(&Value::Integer(21)));
//! ```
//!
//! ## Error Messages
//!
//! ```
//! use sound_validation::{field, record, validate, Schema};
//!
//! let schema = Schema::new()
//!     .field("title", field().is_string().is_max_len(8).with_message("Must be shorter than 8 chars."))
//!     .field("count", field().set_name("Count").is_required());
//!
//! let outcome = validate(&record! { "title" => "A long title" }, &schema).unwrap();
//! assert!(!outcome.ok);
//! assert_eq!(outcome.error("title"), Some("Must be shorter than 8 chars."));
//! assert_eq!(outcome.error("count"), Some("Count is required"));
//! ```
//!
//! ## Coercions
//!
//! ```
//! use sound_validation::{field, record, Schema, Value};
//!
//! let schema = Schema::new()
//!     .field("subscribe", field().to_boolean())
//!     .field("price", field().to_float());
//!
//! let outcome = schema
//!     .validate(&record! { "subscribe" => " Yes ", "price" => "9.95" })
//!     .unwrap();
//! assert_eq!(outcome.value("subscribe"), Some(&Value::Bool(true)));
//! assert_eq!(outcome.value("price"), Some(&Value::Float(9.95)));
//! ```

mod config;
mod engine;
mod errors;
mod pipe;
mod rules;
mod schema;
mod traits;
mod validators;
mod value;

pub use config::{ConfigError, ENV_PREFIX, ValidationConfig};
pub use engine::*;
pub use errors::*;
pub use pipe::*;
pub use rules::*;
pub use schema::*;
pub use traits::*;
pub use validators::*;
pub use value::*;
