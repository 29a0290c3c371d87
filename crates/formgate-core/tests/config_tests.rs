use formgate_core::prelude::*;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::Builder;

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn expected() -> FormConfig {
    FormConfig::new()
        .with_field(FieldDescriptor::new("name", Rule::letters(2)))
        .with_field(FieldDescriptor::new("phone", Rule::digits(7)).with_label("Phone"))
        .with_submission(SubmissionConfig::default().with_finalize_delay(std::time::Duration::from_millis(200)))
}

#[test]
fn test_load_toml() {
    let file = write_temp(
        ".toml",
        r#"
[[fields]]
id = "name"
rule = { kind = "letters", min = 2 }

[[fields]]
id = "phone"
label = "Phone"
rule = { kind = "digits", exact = 7 }

[submission]
finalize_delay_ms = 200
"#,
    );
    assert_eq!(FormConfig::load(file.path()).unwrap(), expected());
}

#[test]
fn test_load_yaml() {
    let file = write_temp(
        ".yaml",
        r"
fields:
  - id: name
    rule: { kind: letters }
  - id: phone
    label: Phone
    rule: { kind: digits, exact: 7 }
submission:
  finalize_delay_ms: 200
",
    );
    assert_eq!(FormConfig::load(file.path()).unwrap(), expected());
}

#[test]
fn test_load_json() {
    let file = write_temp(
        ".json",
        r#"{
  "fields": [
    {"id": "name", "rule": {"kind": "letters", "min": 2}},
    {"id": "phone", "label": "Phone", "rule": {"kind": "digits", "exact": 7}}
  ],
  "submission": {"finalize_delay_ms": 200}
}"#,
    );
    let config = FormConfig::load(file.path()).unwrap();
    assert_eq!(config, expected());
    let registry = config.build().unwrap();
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_unsupported_extension() {
    let file = write_temp(".ini", "fields=");
    assert_eq!(
        FormConfig::load(file.path()).unwrap_err(),
        ConfigurationError::UnsupportedFormat("ini".into())
    );
}

#[test]
fn test_missing_file() {
    let err = FormConfig::load("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigurationError::Io { .. }));
}

#[test]
fn test_malformed_file() {
    let file = write_temp(".json", "{ not json");
    assert!(matches!(
        FormConfig::load(file.path()).unwrap_err(),
        ConfigurationError::Parse { .. }
    ));
}

#[test]
fn test_duplicate_ids_abort_build() {
    let file = write_temp(
        ".toml",
        r#"
[[fields]]
id = "name"
rule = { kind = "email" }

[[fields]]
id = "name"
rule = { kind = "email" }
"#,
    );
    let config = FormConfig::load(file.path()).unwrap();
    assert_eq!(
        config.build().unwrap_err(),
        ConfigurationError::DuplicateField(FieldId::from("name"))
    );
}

#[test]
fn test_bad_pattern_aborts_build() {
    let config = FormConfig::new().with_field(FieldDescriptor::new("code", Rule::pattern("[")));
    assert!(matches!(
        config.build().unwrap_err(),
        ConfigurationError::InvalidPattern { .. }
    ));
}
