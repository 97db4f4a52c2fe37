//! Integration tests for sound-validation

use chrono::Utc;
use regex::Regex;
use sound_validation::*;

fn percentage() -> FieldConstraint {
    field()
        .is_string()
        .to_trim()
        .is_required()
        .is_match(Regex::new(r"^\d+$").unwrap())
        .to_integer()
        .is_min_val(0)
        .is_max_val(100)
}

#[test]
fn test_simple_types() {
    let schema = Schema::new()
        .field("username", field().is_string().set_name("Username").is_required())
        .field("logins", field().is_integer().set_name("Logins").is_required())
        .field("pi", field().is_float().set_name("PI").is_required())
        .field("isAdmin", field().is_boolean().set_name("Is Admin").is_required())
        .field("date", field().is_date().set_name("Date").is_required())
        .field("agree", field().is_equal(true).set_name("Agree"))
        .field("hasHair", field().is_equal(false))
        .field("age", field().is_equal(21))
        .field("yes", field().is_equal("yes"));

    let input = record! {
        "username" => "andy",
        "logins" => 2,
        "pi" => 1.5,
        "isAdmin" => false,
        "date" => Utc::now(),
        "agree" => true,
        "hasHair" => false,
        "age" => 21,
        "yes" => "yes",
    };

    let outcome = validate(&input, &schema).unwrap();
    assert!(outcome.ok, "{:?}", outcome.errors);
    assert_eq!(outcome.values.len(), 9);
}

#[test]
fn test_string_lengths() {
    let named = |name: &str| field().is_string().is_required().set_name(name);
    let schema = Schema::new()
        .field("u1", named("U1").is_min_len(3))
        .field("u2", named("U2").is_min_len(3))
        .field("u3", named("U3").is_max_len(8))
        .field("u4", named("U4").is_min_len(3).is_max_len(8))
        .field("u5", named("U5").is_max_len(8).is_min_len(3))
        .field("u6", named("U6").is_not_empty());

    let input = record! {
        "u1" => "ok-here",
        "u2" => "mm",
        "u3" => "too-long-here",
        "u4" => "mm",
        "u5" => "too-long-here",
        "u6" => "",
    };

    let outcome = schema.validate(&input).unwrap();
    assert!(outcome.error("u1").is_none());
    assert_eq!(outcome.error("u2"), Some("U2 should be at least 3 characters"));
    assert_eq!(outcome.error("u3"), Some("U3 should be at most 8 characters"));
    assert_eq!(outcome.error("u4"), Some("U4 should be at least 3 characters"));
    assert_eq!(outcome.error("u5"), Some("U5 should be at most 8 characters"));
    assert_eq!(outcome.error("u6"), Some("U6 is required"));
}

#[test]
fn test_integer_bounds() {
    let named = |name: &str| field().is_integer().is_required().set_name(name);
    let schema = Schema::new()
        .field("int1", named("Int1").is_min_val(3).is_max_val(8))
        .field("int2", named("Int2").is_min_val(3).is_max_val(8))
        .field("int3", named("Int3").is_max_val(8).is_min_val(3))
        .field("int4", named("Int4").is_greater_than(3))
        .field("int5", named("Int5").is_less_than(8));

    let input = record! { "int1" => 5, "int2" => 2, "int3" => 9, "int4" => 3, "int5" => 8 };

    let outcome = schema.validate(&input).unwrap();
    assert_eq!(outcome.value("int1"), Some(&Value::Integer(5)));
    assert_eq!(outcome.error("int2"), Some("Int2 should be at least 3"));
    assert_eq!(outcome.error("int3"), Some("Int3 should be at most 8"));
    assert_eq!(outcome.error("int4"), Some("Int4 should be greater than 3"));
    assert_eq!(outcome.error("int5"), Some("Int5 should be less than 8"));
}

#[test]
fn test_formats_in_a_schema() {
    let schema = Schema::new()
        .field("url", field().is_string().is_required().is_url())
        .field("ftp", field().is_string().is_required().is_url())
        .field("domain", field().is_string().is_required().is_domain())
        .field("email", field().is_string().is_required().is_email_address())
        .field("tok", field().is_string().is_required().is_token());

    let input = record! {
        "url" => "http://chilts.org/blog/",
        "ftp" => "ftp://example.net/",
        "domain" => "localhost",
        "email" => "me@t.123",
        "tok" => "-invalid",
    };

    let outcome = schema.validate(&input).unwrap();
    assert!(outcome.error("url").is_none());
    assert_eq!(
        outcome.error("ftp"),
        Some("ftp should be a URL and start with http:// or https://")
    );
    assert_eq!(
        outcome.error("domain"),
        Some("domain should be a FQDN such as example.com or my.example.org")
    );
    assert_eq!(outcome.error("email"), Some("email should be an Email Address"));
    assert_eq!(
        outcome.error("tok"),
        Some("tok should start and end with letters/numbers and contain only lowercase letters, numbers and dashes")
    );
}

#[test]
fn test_enums() {
    let colours = ["red", "green", "blue"];
    let schema = Schema::new()
        .field("c1", field().is_string().is_enum(colours))
        .field("c2", field().is_string().is_enum(colours))
        .field("c3", field().is_string().is_enum(colours))
        .field("c4", field().is_string().is_enum(colours))
        .field("c5", field().is_string().to_lower_case().to_trim().is_required().is_enum(colours))
        .field("c6", field().is_string().is_required().is_enum(colours));

    let input = record! {
        "c1" => "blue",
        "c2" => " ",
        "c3" => "Red",
        "c4" => true,
        "c5" => "  RED  ",
        "c6" => "",
    };

    let outcome = schema.validate(&input).unwrap();
    assert!(outcome.error("c1").is_none());
    assert_eq!(outcome.error("c2"), Some("c2 is not a valid value"));
    assert_eq!(outcome.error("c3"), Some("c3 is not a valid value"));
    assert_eq!(outcome.error("c4"), Some("c4 should be a string"));
    assert_eq!(outcome.value("c5"), Some(&Value::from("red")));
    assert_eq!(outcome.error("c6"), Some("c6 is required"));
}

#[test]
fn test_string_to_integer_coercions() {
    let schema = Schema::new()
        .field("p0", percentage())
        .field("p1", percentage())
        .field("p2", percentage())
        .field("p3", percentage())
        .field("p4", percentage())
        .field("p5", field().is_string().is_required().to_integer().is_min_val(0));

    let input = record! {
        "p0" => "-1",
        "p1" => " 0 ",
        "p2" => " 100 ",
        "p3" => "101",
        "p4" => "1.1",
        "p5" => "not a number",
    };

    let outcome = schema.validate(&input).unwrap();
    assert_eq!(outcome.error("p0"), Some("p0 is not valid"));
    assert_eq!(outcome.value("p1"), Some(&Value::Integer(0)));
    assert_eq!(outcome.value("p2"), Some(&Value::Integer(100)));
    assert_eq!(outcome.error("p3"), Some("p3 should be at most 100"));
    assert_eq!(outcome.error("p4"), Some("p4 is not valid"));
    assert_eq!(outcome.error("p5"), Some("p5 could not be converted to an integer"));
    assert!(outcome.value("p3").is_none());
}

#[test]
fn test_string_to_float_coercions() {
    let schema: Schema = ["f0", "f1", "f2", "f3"]
        .into_iter()
        .map(|key| (key, field().to_float()))
        .collect();

    let input = record! { "f0" => 0, "f1" => "0.1", "f2" => "-0.1", "f3" => "invalid" };

    let outcome = schema.validate(&input).unwrap();
    assert_eq!(outcome.value("f0"), Some(&Value::Float(0.0)));
    assert_eq!(outcome.value("f1"), Some(&Value::Float(0.1)));
    assert_eq!(outcome.value("f2"), Some(&Value::Float(-0.1)));
    assert_eq!(outcome.error("f3"), Some("f3 could not be converted to a float"));
}

#[test]
fn test_numeric_coercions_read_leading_prefix() {
    let schema = Schema::new()
        .field("width", field().to_integer())
        .field("rows", field().to_integer())
        .field("ratio", field().to_float())
        .field("limit", field().to_float());

    let input = record! { "width" => "10px", "rows" => "1.9", "ratio" => "2.5abc", "limit" => "inf" };

    let outcome = schema.validate(&input).unwrap();
    assert_eq!(outcome.value("width"), Some(&Value::Integer(10)));
    assert_eq!(outcome.value("rows"), Some(&Value::Integer(1)));
    assert_eq!(outcome.value("ratio"), Some(&Value::Float(2.5)));
    assert_eq!(outcome.error("limit"), Some("limit could not be converted to a float"));
}

#[test]
fn test_string_conversions() {
    let schema = Schema::new()
        .field("u0", field().is_string().to_trim().is_required().is_min_len(4))
        .field("u1", field().is_string().to_trim().is_required())
        .field("u2", field().is_string().is_required().to_lower_case())
        .field("u3", field().is_string().is_required().to_replace("_", "-"))
        .field(
            "u4",
            field()
                .is_string()
                .to_trim()
                .to_lower_case()
                .is_required()
                .to_replace_all(Regex::new("_").unwrap(), "-"),
        )
        .field("ageString", field().is_integer().is_required().to_string())
        .field("badBool", field().to_boolean());

    let input = record! {
        "u0" => "    ",
        "u1" => " andy   ",
        "u2" => "ANDY",
        "u3" => "the_boss",
        "u4" => "the_BIG_boss   ",
        "ageString" => 20,
        "badBool" => Utc::now(),
    };

    let outcome = schema.validate(&input).unwrap();
    assert_eq!(outcome.error("u0"), Some("u0 should be at least 4 characters"));
    assert_eq!(outcome.value("u1"), Some(&Value::from("andy")));
    assert_eq!(outcome.value("u2"), Some(&Value::from("andy")));
    assert_eq!(outcome.value("u3"), Some(&Value::from("the-boss")));
    assert_eq!(outcome.value("u4"), Some(&Value::from("the-big-boss")));
    assert_eq!(outcome.value("ageString"), Some(&Value::from("20")));
    assert_eq!(
        outcome.error("badBool"),
        Some("badBool value should be a string or integer when converting to boolean")
    );
}

#[test]
fn test_defaults() {
    let schema = Schema::new()
        .field("g1", field().is_string().has_default("hello"))
        .field("g2", field().is_string().has_default("Yo!"))
        .field("g3", field().is_string().has_default("Cheers"))
        .field("g4", field().is_string().has_default(""))
        .field("g5", field().is_string().has_default("Wassup").is_required())
        .field("g6", field().is_string().has_default("").is_required())
        .field("tall", field().is_string().has_default("true").to_boolean())
        .field("thin", field().is_string().has_default("f").to_boolean());

    let input = record! { "g1" => "Alright?", "g3" => "", "g4" => "", "tall" => "OFF" };

    let outcome = schema.validate(&input).unwrap();
    assert!(outcome.ok);
    assert_eq!(outcome.value("g1"), Some(&Value::from("Alright?")));
    assert_eq!(outcome.value("g2"), Some(&Value::from("Yo!")));
    assert_eq!(outcome.value("g3"), Some(&Value::from("Cheers")));
    assert_eq!(outcome.value("g4"), Some(&Value::from("")));
    assert_eq!(outcome.value("g5"), Some(&Value::from("Wassup")));
    assert_eq!(outcome.value("g6"), Some(&Value::from("")));
    assert_eq!(outcome.value("tall"), Some(&Value::Bool(false)));
    assert_eq!(outcome.value("thin"), Some(&Value::Bool(false)));
}

#[test]
fn test_required_messages() {
    let schema = Schema::new()
        .field("username", field().is_string().is_required_with("a"))
        .field("logins", field().is_integer().is_required_with("b"))
        .field("col", field().is_string().is_required_with("f").is_enum(["red"]));

    let outcome = schema.validate(&record! { "col" => "" }).unwrap();
    assert_eq!(outcome.error("username"), Some("a"));
    assert_eq!(outcome.error("logins"), Some("b"));
    assert_eq!(outcome.error("col"), Some("f"));
}

#[test]
fn test_custom_messages() {
    let schema = Schema::new()
        .field(
            "username1",
            field()
                .is_string()
                .is_required()
                .to_lower_case()
                .is_match(Regex::new(r"^[a-z][a-z0-9-]{3,}$").unwrap())
                .with_message("Username should only contain letters, numbers and the dash character."),
        )
        .field(
            "username2",
            field().is_string().is_min_len(3).with_message("Username must be at least 3 characters long"),
        )
        .field(
            "col",
            field()
                .is_string()
                .is_enum(["red", "green", "blue"])
                .with_message("Must be one of 'red', 'green', or 'blue'."),
        )
        .field("date", field().is_date());

    let input = record! {
        "username1" => "Invalid!",
        "username2" => "hm",
        "col" => " ",
        "date" => 123,
    };

    let outcome = schema.validate(&input).unwrap();
    assert_eq!(
        outcome.error("username1"),
        Some("Username should only contain letters, numbers and the dash character.")
    );
    assert_eq!(outcome.error("username2"), Some("Username must be at least 3 characters long"));
    assert_eq!(outcome.error("col"), Some("Must be one of 'red', 'green', or 'blue'."));
    assert_eq!(outcome.error("date"), Some("date should be a date"));
}

#[test]
fn test_names_both_ways() {
    let by_setter = Schema::new()
        .field("numOfCars", field().is_integer().is_required().set_name("Cars Owned").is_min_val(0))
        .field("pi", field().is_float().is_required().set_name("PI"))
        .field("happy", field().is_boolean().is_required().set_name("Happy"));
    let by_constructor = Schema::new()
        .field("numOfCars", FieldConstraint::named("Cars Owned").is_integer().is_required().is_min_val(0))
        .field("pi", FieldConstraint::named("PI").is_float().is_required())
        .field("happy", FieldConstraint::named("Happy").is_boolean().is_required());

    let input = record! { "numOfCars" => -1, "pi" => "float", "happy" => "Yes" };

    for schema in [by_setter, by_constructor] {
        let outcome = schema.validate(&input).unwrap();
        assert_eq!(outcome.error("numOfCars"), Some("Cars Owned should be at least 0"));
        assert_eq!(outcome.error("pi"), Some("PI should be a float"));
        assert_eq!(outcome.error("happy"), Some("Happy should be a boolean"));

        let empty = schema.validate(&Record::new()).unwrap();
        assert_eq!(empty.error("numOfCars"), Some("Cars Owned is required"));
        assert_eq!(empty.error("pi"), Some("PI is required"));
    }
}

#[test]
fn test_objects_and_arrays() {
    let schema = Schema::new()
        .field("status", field().is_integer().is_required().is_equal(200))
        .field("payload", field().is_object().is_required())
        .field("items", field().is_array().is_required());

    let ok = schema
        .validate(&record! {
            "status" => 200,
            "payload" => Value::Object(Default::default()),
            "items" => Value::Array(Vec::new()),
        })
        .unwrap();
    assert!(ok.ok);
    assert_eq!(ok.value("items"), Some(&Value::Array(Vec::new())));

    let wrong = schema
        .validate(&record! { "status" => "sdf", "payload" => Utc::now(), "items" => Utc::now() })
        .unwrap();
    assert_eq!(wrong.error("status"), Some("status should be an integer"));
    assert_eq!(wrong.error("payload"), Some("payload should be an object"));
    assert_eq!(wrong.error("items"), Some("items should be an array"));
}

#[test]
fn test_signup_keeps_original_input() {
    let schema = Schema::new()
        .field(
            "username",
            field()
                .is_string()
                .to_lower_case()
                .to_trim()
                .is_required()
                .is_token()
                .is_min_len(3),
        )
        .field("email", field().is_string().to_trim().is_email_address())
        .field("password", field().is_string().is_required().is_min_len(8).is_max_len(100));

    let input = record! { "username" => "  Andy  ", "password" => "s3kr1ts3kr1t", "email" => "" };

    let outcome = schema.validate(&input).unwrap();
    assert!(outcome.ok);
    assert_eq!(outcome.value("username"), Some(&Value::from("andy")));
    assert!(outcome.value("email").is_none());
    assert_eq!(outcome.input["username"], Value::from("  Andy  "));
    assert_eq!(outcome.input["email"], Value::from(""));
}

#[test]
fn test_absent_optional_field_has_no_value() {
    let schema = Schema::new()
        .field("username", field().is_string().is_required())
        .field("interests", field().is_string());

    let outcome = schema.validate(&record! { "username" => "chilts" }).unwrap();
    assert!(outcome.ok);
    assert!(!outcome.values.contains_key("interests"));
    assert!(!outcome.errors.contains_key("interests"));
}

#[test]
fn test_trim_and_lowercase_are_idempotent() {
    let schema = Schema::new().field("name", field().to_trim().to_lower_case());

    let once = schema.validate(&record! { "name" => "  ANDY  " }).unwrap();
    let first = once.value("name").cloned().unwrap();
    let twice = schema.validate(&record! { "name" => first.clone() }).unwrap();
    assert_eq!(twice.value("name"), Some(&first));
}

#[test]
fn test_injected_unknown_rule_is_a_fault() {
    let schema = Schema::new().field(
        "t",
        field().is_string().is_required().inject(Rule::Unknown {
            kind: "UNKNOWN".to_string(),
        }),
    );

    let result = schema.validate(&record! { "t" => "Blah!" });
    assert!(matches!(result, Err(EngineFault::UnknownRule { ref kind, .. }) if kind == "UNKNOWN"));
}

#[test]
fn test_config_email_profile() {
    let config = ValidationConfig::from_toml_str("email_profile = \"loose\"").unwrap();
    let schema = Schema::new()
        .with_config(config)
        .field("email", field().is_email_address());

    let outcome = schema.validate(&record! { "email" => "me@t.123" }).unwrap();
    assert!(outcome.ok);
}

#[test]
fn test_legacy_callbacks() {
    let schema = Schema::new()
        .field("a", field().to_integer())
        .field("b", field().to_integer());

    let mut errors = Vec::new();
    let mut values = Vec::new();
    let outcome = schema
        .validate_each(&record! { "a" => "1", "b" => "x" }, |key, result| match result {
            Ok(Some(value)) => values.push((key.to_string(), value.clone())),
            Ok(None) => {}
            Err(message) => errors.push(message.to_string()),
        })
        .unwrap();

    assert_eq!(values, [("a".to_string(), Value::Integer(1))]);
    assert_eq!(errors, ["b could not be converted to an integer"]);
    assert!(!outcome.ok);
}

#[tokio::test]
async fn test_parallel_validation() {
    let schema = Schema::new()
        .field("p1", percentage())
        .field("p2", percentage())
        .field("name", field().is_string().is_required());

    let input = record! { "p1" => " 42 ", "p2" => "101" };

    let outcome = schema.validate_parallel(&input).await.unwrap();
    assert_eq!(outcome.value("p1"), Some(&Value::Integer(42)));
    assert_eq!(outcome.error("p2"), Some("p2 should be at most 100"));
    assert_eq!(outcome.error("name"), Some("name is required"));
    assert_eq!(outcome, schema.validate(&input).unwrap());
}
