// Per-field validation engine

use crate::validators::{IsDomain, IsEmailAddress, IsToken, IsUrl};
use crate::{EngineFault, FieldConstraint, FormatValidator, Needle, Rule, ValidationConfig, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use sound_log::{debug, trace};
use std::cmp::Ordering;

const TARGET: &str = "sound::engine";

// Numeric prefixes read by `toInteger` and `toFloat`; trailing text is ignored.
static INTEGER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?\d+").unwrap());

static FLOAT_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(Infinity|\d+\.?\d*([eE][+-]?\d+)?|\.\d+([eE][+-]?\d+)?)").unwrap()
});

/// Strings accepted by `toBoolean`, matched case-insensitively after trimming.
const BOOLEAN_WORDS: [(&str, bool); 10] = [
    ("true", true),
    ("false", false),
    ("t", true),
    ("f", false),
    ("yes", true),
    ("no", false),
    ("on", true),
    ("off", false),
    ("1", true),
    ("0", false),
];

/// Result of evaluating one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// Every rule passed; this is the final working value
    Valid(Value),
    /// No input, not required, no default: nothing to report
    Empty,
    /// A rule (or the required check) failed
    Invalid { message: String, rule: String },
}

// Why the fold stopped early.
enum Halt {
    Invalid { message: String, rule: String },
    Fault(EngineFault),
}

/// Evaluate `raw` against `constraint`.
///
/// Presence is resolved first: absent, null and empty-string input takes
/// the default if there is one, otherwise fails when required or ends as
/// [`FieldOutcome::Empty`]. The rules then run in order over a working
/// value, stopping at the first failure.
///
/// Only an unknown rule kind produces `Err`.
pub fn evaluate(
    key: &str,
    raw: Option<&Value>,
    constraint: &FieldConstraint,
    config: &ValidationConfig,
) -> Result<FieldOutcome, EngineFault> {
    let name = constraint.display_name(key);

    let start = match raw.filter(|value| !value.is_empty_input()) {
        Some(value) => value.clone(),
        None => match constraint.default_value() {
            Some(default) => default.clone(),
            None if constraint.required() => {
                let message = constraint
                    .required_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{} is required", name));
                return Ok(failed(key, config, message, "isRequired".to_string()));
            }
            None => return Ok(FieldOutcome::Empty),
        },
    };

    let folded = constraint
        .rules()
        .iter()
        .try_fold(start, |value, rule| {
            trace!(target: TARGET, "{}: {} on {}", key, rule.kind(), value.kind());
            apply(rule, value, key, name, config)
        });

    match folded {
        Ok(value) => Ok(FieldOutcome::Valid(value)),
        Err(Halt::Invalid { message, rule }) => Ok(failed(key, config, message, rule)),
        Err(Halt::Fault(fault)) => Err(fault),
    }
}

fn failed(key: &str, config: &ValidationConfig, message: String, rule: String) -> FieldOutcome {
    if config.log_failures {
        debug!(target: TARGET, "{} failed {}: {}", key, rule, message);
    }
    FieldOutcome::Invalid { message, rule }
}

/// Custom message wins over the generated one.
fn reject(rule: &Rule, generated: impl FnOnce() -> String) -> Halt {
    Halt::Invalid {
        message: rule.message().map(str::to_string).unwrap_or_else(generated),
        rule: rule.kind().to_string(),
    }
}

/// Pass `value` through unchanged when `ok`, otherwise stop.
fn check(ok: bool, value: Value, rule: &Rule, generated: impl FnOnce() -> String) -> Result<Value, Halt> {
    if ok {
        Ok(value)
    } else {
        Err(reject(rule, generated))
    }
}

fn apply(
    rule: &Rule,
    value: Value,
    key: &str,
    name: &str,
    config: &ValidationConfig,
) -> Result<Value, Halt> {
    match rule {
        Rule::IsString { .. } => {
            let ok = matches!(value, Value::String(_));
            check(ok, value, rule, || format!("{} should be a string", name))
        }
        Rule::IsInteger { .. } => {
            let ok = is_integral(&value);
            check(ok, value, rule, || format!("{} should be an integer", name))
        }
        Rule::IsFloat { .. } => {
            let ok = value.is_number();
            check(ok, value, rule, || format!("{} should be a float", name))
        }
        Rule::IsBoolean { .. } => {
            let ok = matches!(value, Value::Bool(_));
            check(ok, value, rule, || format!("{} should be a boolean", name))
        }
        Rule::IsDate { .. } => {
            let ok = matches!(value, Value::Date(_));
            check(ok, value, rule, || format!("{} should be a date", name))
        }
        Rule::IsObject { .. } => {
            let ok = matches!(value, Value::Object(_));
            check(ok, value, rule, || format!("{} should be an object", name))
        }
        Rule::IsArray { .. } => {
            let ok = matches!(value, Value::Array(_));
            check(ok, value, rule, || format!("{} should be an array", name))
        }

        Rule::IsEqual { value: expected, .. } => {
            let ok = value.same_as(expected);
            check(ok, value, rule, || format!("{} should be {}", name, expected))
        }
        Rule::IsGreaterThan { value: bound, .. } => {
            let ok = value.compare(bound) == Some(Ordering::Greater);
            check(ok, value, rule, || format!("{} should be greater than {}", name, bound))
        }
        Rule::IsLessThan { value: bound, .. } => {
            let ok = value.compare(bound) == Some(Ordering::Less);
            check(ok, value, rule, || format!("{} should be less than {}", name, bound))
        }
        Rule::IsMinVal { value: bound, .. } => {
            let ok = matches!(value.compare(bound), Some(Ordering::Greater | Ordering::Equal));
            check(ok, value, rule, || format!("{} should be at least {}", name, bound))
        }
        Rule::IsMaxVal { value: bound, .. } => {
            let ok = matches!(value.compare(bound), Some(Ordering::Less | Ordering::Equal));
            check(ok, value, rule, || format!("{} should be at most {}", name, bound))
        }
        Rule::IsNotEmpty { .. } => {
            let ok = value.as_str().is_some_and(|s| !s.trim().is_empty());
            check(ok, value, rule, || format!("{} should be provided", name))
        }
        Rule::IsMinLen { len, .. } => {
            let ok = length(&value).is_some_and(|n| n >= *len);
            check(ok, value, rule, || {
                format!("{} should be at least {} characters", name, len)
            })
        }
        Rule::IsMaxLen { len, .. } => {
            let ok = length(&value).is_some_and(|n| n <= *len);
            check(ok, value, rule, || {
                format!("{} should be at most {} characters", name, len)
            })
        }
        Rule::IsMatch { regex, .. } => {
            let ok = value.as_str().is_some_and(|s| regex.is_match(s));
            check(ok, value, rule, || format!("{} is not valid", name))
        }
        Rule::IsEnum { lookup, .. } => {
            let ok = value.as_str().is_some_and(|s| lookup.contains(s));
            check(ok, value, rule, || format!("{} is not a valid value", name))
        }

        Rule::IsUrl { .. } => check_format(&IsUrl, value, rule, name),
        Rule::IsDomain { .. } => check_format(&IsDomain, value, rule, name),
        Rule::IsEmailAddress { profile, .. } => {
            let validator = IsEmailAddress(profile.unwrap_or(config.email_profile));
            check_format(&validator, value, rule, name)
        }
        Rule::IsToken { .. } => check_format(&IsToken, value, rule, name),

        Rule::ToTrim => Ok(map_str(value, |s| s.trim().to_string())),
        Rule::ToLowerCase => Ok(map_str(value, str::to_lowercase)),
        Rule::ToUpperCase => Ok(map_str(value, str::to_uppercase)),
        Rule::ToReplace {
            needle,
            replacement,
            all,
        } => Ok(map_str(value, |s| match needle {
            Needle::Literal(from) if *all => s.replace(from.as_str(), replacement),
            Needle::Literal(from) => s.replacen(from.as_str(), replacement, 1),
            Needle::Pattern(re) if *all => re.replace_all(s, replacement.as_str()).into_owned(),
            Needle::Pattern(re) => re.replace(s, replacement.as_str()).into_owned(),
        })),

        Rule::ToString { .. } => Ok(coerce_string(value)),
        Rule::ToInteger { .. } => coerce_integer(&value).ok_or_else(|| {
            reject(rule, || format!("{} could not be converted to an integer", name))
        }),
        Rule::ToFloat { .. } => coerce_float(&value).ok_or_else(|| {
            reject(rule, || format!("{} could not be converted to a float", name))
        }),
        Rule::ToBoolean { .. } => coerce_boolean(rule, value, name),

        Rule::Unknown { kind } => Err(Halt::Fault(EngineFault::UnknownRule {
            field: key.to_string(),
            kind: kind.clone(),
        })),
    }
}

fn check_format(validator: &dyn FormatValidator, value: Value, rule: &Rule, name: &str) -> Result<Value, Halt> {
    let ok = value.as_str().is_some_and(|s| validator.is_valid(s));
    check(ok, value, rule, || validator.default_message(name))
}

/// Numbers whose integer parse gives back the same number.
fn is_integral(value: &Value) -> bool {
    match value {
        Value::Integer(_) => true,
        Value::Float(x) => x.is_finite() && x.fract() == 0.0 && float_fits_i64(*x),
        _ => false,
    }
}

fn float_fits_i64(x: f64) -> bool {
    x >= i64::MIN as f64 && x < i64::MAX as f64
}

/// Characters for strings, elements for arrays.
fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

// Transforms only touch strings; other kinds pass through as they are.
fn map_str(value: Value, f: impl FnOnce(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

fn coerce_string(value: Value) -> Value {
    match value {
        Value::String(_) => value,
        other => Value::String(render(&other)),
    }
}

// Arrays join their elements with commas, with null items left blank;
// objects render as `[object Object]`.
fn render(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => render(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
        other => other.to_string(),
    }
}

/// Leading base-10 digits of a string, so `"10px"` gives 10 and `"1.9"` gives 1.
fn coerce_integer(value: &Value) -> Option<Value> {
    match value {
        Value::Integer(_) => Some(value.clone()),
        Value::Float(x) if x.is_finite() && float_fits_i64(x.trunc()) => {
            Some(Value::Integer(x.trunc() as i64))
        }
        Value::String(s) => INTEGER_PREFIX
            .find(s.trim_start())
            .and_then(|m| m.as_str().parse::<i64>().ok())
            .map(Value::Integer),
        _ => None,
    }
}

/// Longest leading float of a string. Only the spelling `Infinity` is read
/// as infinite; `inf` and `NaN` fail.
fn coerce_float(value: &Value) -> Option<Value> {
    let x = match value {
        Value::Integer(i) => *i as f64,
        Value::Float(x) => *x,
        Value::String(s) => FLOAT_PREFIX
            .find(s.trim_start())
            .and_then(|m| m.as_str().parse::<f64>().ok())?,
        _ => return None,
    };
    (!x.is_nan()).then_some(Value::Float(x))
}

fn coerce_boolean(rule: &Rule, value: Value, name: &str) -> Result<Value, Halt> {
    match value {
        Value::String(s) => {
            let word = s.trim().to_lowercase();
            BOOLEAN_WORDS
                .iter()
                .find(|(w, _)| *w == word)
                .map(|(_, b)| Value::Bool(*b))
                .ok_or_else(|| {
                    reject(rule, || {
                        format!("{} is not a recognised value when converting to boolean", name)
                    })
                })
        }
        Value::Integer(i) => Ok(Value::Bool(i != 0)),
        Value::Float(x) => Ok(Value::Bool(x != 0.0)),
        _ => Err(reject(rule, || {
            format!("{} value should be a string or integer when converting to boolean", name)
        })),
    }
}
