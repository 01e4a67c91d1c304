use polydecode::config::schema::Schema;
use polydecode::config::Config;
use polydecode::decode::decode;
use polydecode::document::parser::parse_json;
use polydecode::resolver::{Policy, TypeResolver};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.policy, Policy::Strict);
    assert_eq!(config.log_level, "warn");
    assert!(config.pretty);
}

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = Config {
        policy: Policy::Soft,
        log_level: "debug".to_string(),
        pretty: false,
    };
    config.save_to(&path).unwrap();

    assert_eq!(Config::load_from(&path), config);
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_from(&dir.path().join("absent.toml"));
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_invalid_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "policy = 12\n").unwrap();
    assert_eq!(Config::load_from(&path), Config::default());
}

#[test]
fn test_config_path_location() {
    if let Some(path) = Config::config_path() {
        assert!(path.ends_with(".config/polydecode/config.toml"));
    }
}

const MESSAGES: &str = r#"
root = "Envelope"

[types.Envelope]
Kind = "string"
Payload = "any"

[types.Alert]
Level = "integer"
Text = "string"

[types.Metric]
Name = "string"
Values = "[float]"

[resolver]
target = "payload"
discriminator = "../kind"

[resolver.type_map]
alert = "Alert"
metric = "Metric"
"#;

#[test]
fn test_schema_from_file_drives_decoding() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.toml");
    fs::write(&path, MESSAGES).unwrap();

    let compiled = Schema::load(&path).unwrap().compile(Policy::Strict).unwrap();
    assert_eq!(compiled.resolver.target_path().to_string(), r#"/"payload""#);

    let source = parse_json(r#"{"kind": "metric", "payload": {"name": "cpu", "values": [1, 2.5]}}"#).unwrap();
    let mut target = compiled.target();
    assert!(decode(&compiled.resolver, &source, &mut target).unwrap());

    let json = serde_json::to_value(&target).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "Kind": "metric",
            "Payload": {"Name": "cpu", "Values": [1.0, 2.5]}
        })
    );
}

#[test]
fn test_schema_unknown_key_is_rejected() {
    let text = MESSAGES.replace("target = ", "targte = ");
    assert!(Schema::parse(&text).is_err());
}

#[test]
fn test_schema_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Schema::load(dir.path().join("nope.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read schema"));
}

const NUMBERED_ANIMALS: &str = r#"
root = "Animal"

[types.Animal]
Name = "string"
Specifics = "any"

[types.Horse]
Shoes = "integer"

[resolver]
target = "specifics"
discriminator = "type"

[[resolver.type_map]]
value = 1
type = "Horse"
"#;

#[test]
fn test_schema_with_integer_discriminator() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("schema.toml");
    fs::write(&path, NUMBERED_ANIMALS).unwrap();

    let compiled = Schema::load(&path).unwrap().compile(Policy::Strict).unwrap();
    let source = parse_json(r#"{"specifics": {"type": 1, "shoes": 4}}"#).unwrap();
    let mut target = compiled.target();
    assert!(decode(&compiled.resolver, &source, &mut target).unwrap());

    let json = serde_json::to_value(&target).unwrap();
    assert_eq!(json, serde_json::json!({"Name": "", "Specifics": {"Shoes": 4}}));

    // the string "1" is a different discriminator
    let source = parse_json(r#"{"specifics": {"type": "1", "shoes": 4}}"#).unwrap();
    let mut target = compiled.target();
    let err = decode(&compiled.resolver, &source, &mut target).unwrap_err();
    assert!(err.is_unresolved_type());
}
