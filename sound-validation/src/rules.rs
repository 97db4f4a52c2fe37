// Rule catalog and field constraint builder

use crate::{EmailProfile, Value};
use regex::Regex;
use std::collections::HashSet;

/// What a replace rule searches for.
#[derive(Debug, Clone)]
pub enum Needle {
    /// Exact substring
    Literal(String),
    /// Regular expression; the replacement may use `$1`-style groups
    Pattern(Regex),
}

/// One pipeline step of a field.
///
/// The variant fixes which parameters exist. `msg` is the custom failure
/// message; `None` means the engine generates one from the field name.
#[derive(Debug, Clone)]
pub enum Rule {
    // Type assertions
    IsString { msg: Option<String> },
    IsInteger { msg: Option<String> },
    IsFloat { msg: Option<String> },
    IsBoolean { msg: Option<String> },
    IsDate { msg: Option<String> },
    IsObject { msg: Option<String> },
    IsArray { msg: Option<String> },

    // Value constraints
    IsEqual { value: Value, msg: Option<String> },
    IsGreaterThan { value: Value, msg: Option<String> },
    IsLessThan { value: Value, msg: Option<String> },
    IsMinVal { value: Value, msg: Option<String> },
    IsMaxVal { value: Value, msg: Option<String> },
    IsNotEmpty { msg: Option<String> },
    IsMinLen { len: usize, msg: Option<String> },
    IsMaxLen { len: usize, msg: Option<String> },
    IsMatch { regex: Regex, msg: Option<String> },
    /// Build with [`Rule::is_enum`] so `lookup` mirrors `values`.
    IsEnum {
        values: Vec<String>,
        lookup: HashSet<String>,
        msg: Option<String>,
    },

    // Formats
    IsUrl { msg: Option<String> },
    IsDomain { msg: Option<String> },
    /// `profile: None` uses the schema's configured profile
    IsEmailAddress {
        profile: Option<EmailProfile>,
        msg: Option<String>,
    },
    IsToken { msg: Option<String> },

    // Transforms (never fail)
    ToTrim,
    ToLowerCase,
    ToUpperCase,
    ToReplace {
        needle: Needle,
        replacement: String,
        all: bool,
    },

    // Coercions
    ToString { msg: Option<String> },
    ToInteger { msg: Option<String> },
    ToFloat { msg: Option<String> },
    ToBoolean { msg: Option<String> },

    /// A kind outside the catalog. Evaluating it is an engine fault.
    Unknown { kind: String },
}

impl Rule {
    /// Enumeration rule with its lookup set derived from `values`.
    pub fn is_enum<I, S>(values: I, msg: Option<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let lookup = values.iter().cloned().collect();
        Rule::IsEnum {
            values,
            lookup,
            msg,
        }
    }

    /// Catalog name of the rule kind.
    pub fn kind(&self) -> &str {
        match self {
            Rule::IsString { .. } => "isString",
            Rule::IsInteger { .. } => "isInteger",
            Rule::IsFloat { .. } => "isFloat",
            Rule::IsBoolean { .. } => "isBoolean",
            Rule::IsDate { .. } => "isDate",
            Rule::IsObject { .. } => "isObject",
            Rule::IsArray { .. } => "isArray",
            Rule::IsEqual { .. } => "isEqual",
            Rule::IsGreaterThan { .. } => "isGreaterThan",
            Rule::IsLessThan { .. } => "isLessThan",
            Rule::IsMinVal { .. } => "isMinVal",
            Rule::IsMaxVal { .. } => "isMaxVal",
            Rule::IsNotEmpty { .. } => "isNotEmpty",
            Rule::IsMinLen { .. } => "isMinLen",
            Rule::IsMaxLen { .. } => "isMaxLen",
            Rule::IsMatch { .. } => "isMatch",
            Rule::IsEnum { .. } => "isEnum",
            Rule::IsUrl { .. } => "isUrl",
            Rule::IsDomain { .. } => "isDomain",
            Rule::IsEmailAddress { .. } => "isEmailAddress",
            Rule::IsToken { .. } => "isToken",
            Rule::ToTrim => "toTrim",
            Rule::ToLowerCase => "toLowerCase",
            Rule::ToUpperCase => "toUpperCase",
            Rule::ToReplace { .. } => "toReplace",
            Rule::ToString { .. } => "toString",
            Rule::ToInteger { .. } => "toInteger",
            Rule::ToFloat { .. } => "toFloat",
            Rule::ToBoolean { .. } => "toBoolean",
            Rule::Unknown { kind } => kind,
        }
    }

    /// Custom failure message, if one was given.
    pub fn message(&self) -> Option<&str> {
        self.msg_slot().and_then(|slot| slot.as_deref())
    }

    fn msg_slot(&self) -> Option<&Option<String>> {
        match self {
            Rule::IsString { msg }
            | Rule::IsInteger { msg }
            | Rule::IsFloat { msg }
            | Rule::IsBoolean { msg }
            | Rule::IsDate { msg }
            | Rule::IsObject { msg }
            | Rule::IsArray { msg }
            | Rule::IsEqual { msg, .. }
            | Rule::IsGreaterThan { msg, .. }
            | Rule::IsLessThan { msg, .. }
            | Rule::IsMinVal { msg, .. }
            | Rule::IsMaxVal { msg, .. }
            | Rule::IsNotEmpty { msg }
            | Rule::IsMinLen { msg, .. }
            | Rule::IsMaxLen { msg, .. }
            | Rule::IsMatch { msg, .. }
            | Rule::IsEnum { msg, .. }
            | Rule::IsUrl { msg }
            | Rule::IsDomain { msg }
            | Rule::IsEmailAddress { msg, .. }
            | Rule::IsToken { msg }
            | Rule::ToString { msg }
            | Rule::ToInteger { msg }
            | Rule::ToFloat { msg }
            | Rule::ToBoolean { msg } => Some(msg),
            Rule::ToTrim
            | Rule::ToLowerCase
            | Rule::ToUpperCase
            | Rule::ToReplace { .. }
            | Rule::Unknown { .. } => None,
        }
    }

    fn set_message(&mut self, text: String) {
        match self {
            Rule::IsString { msg }
            | Rule::IsInteger { msg }
            | Rule::IsFloat { msg }
            | Rule::IsBoolean { msg }
            | Rule::IsDate { msg }
            | Rule::IsObject { msg }
            | Rule::IsArray { msg }
            | Rule::IsEqual { msg, .. }
            | Rule::IsGreaterThan { msg, .. }
            | Rule::IsLessThan { msg, .. }
            | Rule::IsMinVal { msg, .. }
            | Rule::IsMaxVal { msg, .. }
            | Rule::IsNotEmpty { msg }
            | Rule::IsMinLen { msg, .. }
            | Rule::IsMaxLen { msg, .. }
            | Rule::IsMatch { msg, .. }
            | Rule::IsEnum { msg, .. }
            | Rule::IsUrl { msg }
            | Rule::IsDomain { msg }
            | Rule::IsEmailAddress { msg, .. }
            | Rule::IsToken { msg }
            | Rule::ToString { msg }
            | Rule::ToInteger { msg }
            | Rule::ToFloat { msg }
            | Rule::ToBoolean { msg } => *msg = Some(text),
            Rule::ToTrim
            | Rule::ToLowerCase
            | Rule::ToUpperCase
            | Rule::ToReplace { .. }
            | Rule::Unknown { .. } => {}
        }
    }
}

/// Start a new, unnamed field constraint.
pub fn field() -> FieldConstraint {
    FieldConstraint::default()
}

/// Ordered rules plus presence metadata for one schema field.
///
/// Built with consuming, chainable calls. Once added to a
/// [`crate::Schema`] it is frozen behind an `Arc` and only read.
///
/// ```
/// use sound_validation::field;
///
/// let username = field()
///     .set_name("Username")
///     .is_string()
///     .to_trim()
///     .to_lower_case()
///     .is_required()
///     .is_token()
///     .is_min_len(3)
///     .with_message("Username is too short");
///
/// assert_eq!(username.rules().len(), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldConstraint {
    name: Option<String>,
    required: bool,
    required_msg: Option<String>,
    default: Option<Value>,
    rules: Vec<Rule>,
}

#[allow(clippy::wrong_self_convention)]
impl FieldConstraint {
    /// Start a field with a display name already set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    // ------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------

    /// Name used in generated messages instead of the schema key.
    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn is_required(mut self) -> Self {
        self.required = true;
        self.required_msg = None;
        self
    }

    pub fn is_required_with(mut self, msg: impl Into<String>) -> Self {
        self.required = true;
        self.required_msg = Some(msg.into());
        self
    }

    /// Substituted when the input is absent, null or empty.
    pub fn has_default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Custom message for the most recently appended rule.
    ///
    /// Has no effect when the last rule cannot fail (transforms) or when no
    /// rule has been added yet; use [`FieldConstraint::is_required_with`]
    /// for the required message.
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        if let Some(rule) = self.rules.last_mut() {
            rule.set_message(msg.into());
        }
        self
    }

    /// Append a raw rule record.
    pub fn inject(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    fn push(self, rule: Rule) -> Self {
        self.inject(rule)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Name set with [`FieldConstraint::set_name`], if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Display name, falling back to the schema key.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(key)
    }

    /// Whether missing input fails the field.
    pub fn required(&self) -> bool {
        self.required
    }

    /// Custom message for a missing required field.
    pub fn required_message(&self) -> Option<&str> {
        self.required_msg.as_deref()
    }

    /// Value substituted for missing input.
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Rules in the order they run.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    // ------------------------------------------------------------------
    // Type assertions
    // ------------------------------------------------------------------

    /// Value must be a string.
    pub fn is_string(self) -> Self {
        self.push(Rule::IsString { msg: None })
    }

    /// Integral numbers only; numeric strings are rejected.
    pub fn is_integer(self) -> Self {
        self.push(Rule::IsInteger { msg: None })
    }

    /// Any number, integral or not.
    pub fn is_float(self) -> Self {
        self.push(Rule::IsFloat { msg: None })
    }

    /// Value must be a boolean.
    pub fn is_boolean(self) -> Self {
        self.push(Rule::IsBoolean { msg: None })
    }

    /// Value must be a date.
    pub fn is_date(self) -> Self {
        self.push(Rule::IsDate { msg: None })
    }

    /// Value must be an object.
    pub fn is_object(self) -> Self {
        self.push(Rule::IsObject { msg: None })
    }

    /// Value must be an array.
    pub fn is_array(self) -> Self {
        self.push(Rule::IsArray { msg: None })
    }

    // ------------------------------------------------------------------
    // Value constraints
    // ------------------------------------------------------------------

    /// Equal to `value`; integers and floats compare numerically.
    pub fn is_equal(self, value: impl Into<Value>) -> Self {
        self.push(Rule::IsEqual {
            value: value.into(),
            msg: None,
        })
    }

    /// Strictly greater than `value`.
    pub fn is_greater_than(self, value: impl Into<Value>) -> Self {
        self.push(Rule::IsGreaterThan {
            value: value.into(),
            msg: None,
        })
    }

    /// Strictly less than `value`.
    pub fn is_less_than(self, value: impl Into<Value>) -> Self {
        self.push(Rule::IsLessThan {
            value: value.into(),
            msg: None,
        })
    }

    /// Inclusive lower bound.
    pub fn is_min_val(self, value: impl Into<Value>) -> Self {
        self.push(Rule::IsMinVal {
            value: value.into(),
            msg: None,
        })
    }

    /// Inclusive upper bound.
    pub fn is_max_val(self, value: impl Into<Value>) -> Self {
        self.push(Rule::IsMaxVal {
            value: value.into(),
            msg: None,
        })
    }

    /// Fails on strings that are blank after trimming.
    pub fn is_not_empty(self) -> Self {
        self.push(Rule::IsNotEmpty { msg: None })
    }

    /// Minimum length in characters (elements for arrays).
    pub fn is_min_len(self, len: usize) -> Self {
        self.push(Rule::IsMinLen { len, msg: None })
    }

    /// Maximum length in characters (elements for arrays).
    pub fn is_max_len(self, len: usize) -> Self {
        self.push(Rule::IsMaxLen { len, msg: None })
    }

    /// String matching `regex` anywhere; anchor it to match the whole value.
    pub fn is_match(self, regex: Regex) -> Self {
        self.push(Rule::IsMatch { regex, msg: None })
    }

    /// Case-sensitive membership in `values`.
    pub fn is_enum<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(Rule::is_enum(values, None))
    }

    // ------------------------------------------------------------------
    // Formats
    // ------------------------------------------------------------------

    /// Absolute `http://` or `https://` URL.
    pub fn is_url(self) -> Self {
        self.push(Rule::IsUrl { msg: None })
    }

    /// Fully qualified domain name such as `example.com`.
    pub fn is_domain(self) -> Self {
        self.push(Rule::IsDomain { msg: None })
    }

    /// Mailbox check using the schema's configured [`EmailProfile`].
    pub fn is_email_address(self) -> Self {
        self.push(Rule::IsEmailAddress {
            profile: None,
            msg: None,
        })
    }

    /// Mailbox check pinned to `profile` regardless of configuration.
    pub fn is_email_address_with(self, profile: EmailProfile) -> Self {
        self.push(Rule::IsEmailAddress {
            profile: Some(profile),
            msg: None,
        })
    }

    /// Lowercase letters, digits and dashes, starting and ending with an alphanumeric.
    pub fn is_token(self) -> Self {
        self.push(Rule::IsToken { msg: None })
    }

    // ------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------

    /// Strip surrounding whitespace.
    pub fn to_trim(self) -> Self {
        self.push(Rule::ToTrim)
    }

    /// Lowercase the string.
    pub fn to_lower_case(self) -> Self {
        self.push(Rule::ToLowerCase)
    }

    /// Uppercase the string.
    pub fn to_upper_case(self) -> Self {
        self.push(Rule::ToUpperCase)
    }

    /// Replace the first occurrence of `from`.
    pub fn to_replace(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.push(Rule::ToReplace {
            needle: Needle::Literal(from.into()),
            replacement: to.into(),
            all: false,
        })
    }

    /// Replace the first match of `pattern`.
    pub fn to_replace_regex(self, pattern: Regex, to: impl Into<String>) -> Self {
        self.push(Rule::ToReplace {
            needle: Needle::Pattern(pattern),
            replacement: to.into(),
            all: false,
        })
    }

    /// Replace every match of `pattern`.
    pub fn to_replace_all(self, pattern: Regex, to: impl Into<String>) -> Self {
        self.push(Rule::ToReplace {
            needle: Needle::Pattern(pattern),
            replacement: to.into(),
            all: true,
        })
    }

    // ------------------------------------------------------------------
    // Coercions
    // ------------------------------------------------------------------

    /// Render any value as a string. Arrays join with commas.
    pub fn to_string(self) -> Self {
        self.push(Rule::ToString { msg: None })
    }

    /// Convert to an integer. Floats truncate and strings are read up to
    /// the first non-digit, so `"10px"` gives 10.
    pub fn to_integer(self) -> Self {
        self.push(Rule::ToInteger { msg: None })
    }

    /// Convert to a float from the longest numeric prefix of a string.
    pub fn to_float(self) -> Self {
        self.push(Rule::ToFloat { msg: None })
    }

    /// Convert `yes`/`no`, `on`/`off`, `true`/`false`, `t`/`f`, `1`/`0` and numbers to a boolean.
    pub fn to_boolean(self) -> Self {
        self.push(Rule::ToBoolean { msg: None })
    }
}
