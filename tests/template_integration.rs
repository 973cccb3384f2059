//! Integration tests for template declarations and sessions

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use mis_formatter::{
    format_name_on, Error, FieldKind, Session, SessionState, TemplateError, TemplateRegistry,
};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn june_25() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 6, 25).unwrap()
}

#[test]
fn test_merge_yaml_declaration() {
    let mut registry = TemplateRegistry::with_builtins();
    let before: Vec<_> = registry.iter().cloned().collect();

    let custom = registry
        .load_file(&fixture("custom_template.yaml"))
        .expect("Should load")
        .clone();

    assert_eq!(custom.name, "custom");
    assert_eq!(custom.field_count(), 3);
    // Defaults from the file are discarded.
    assert_eq!(custom.defaults(), vec!["", "", ""]);
    assert_eq!(custom.fields[1].kind, FieldKind::Numeric);

    for def in before {
        assert_eq!(registry.get(&def.name), Some(&def));
    }
    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["BIOMIC", "generic", "custom"]
    );
}

#[test]
fn test_merged_template_formats() {
    let mut registry = TemplateRegistry::with_builtins();
    registry.load_file(&fixture("custom_template.yaml")).unwrap();
    let custom = registry.get("custom").unwrap();

    let name = format_name_on(custom, &["proj1", "3", "neg"], june_25()).unwrap();
    assert_eq!(name, "20200625_proj1-003-IMS_neg");
}

#[test]
fn test_merge_toml_declaration() {
    let mut registry = TemplateRegistry::with_builtins();
    registry.load_file(&fixture("slide_template.toml")).unwrap();
    let slide = registry.get("slide").unwrap();

    let name = format_name_on(slide, &["SL42", "5"], june_25()).unwrap();
    assert_eq!(name, "20200625_SL42_005");
}

#[test]
fn test_broken_declaration_leaves_registry() {
    let mut registry = TemplateRegistry::with_builtins();
    let result = registry.load_file(&fixture("broken_template.yaml"));
    assert!(matches!(
        result,
        Err(TemplateError::KindCountMismatch { .. })
    ));
    assert_eq!(registry.len(), 2);
    assert!(!registry.contains("broken"));
}

#[test]
fn test_missing_declaration_file() {
    let mut registry = TemplateRegistry::new();
    let result = registry.load_file(&fixture("nope.yaml"));
    assert!(matches!(result, Err(TemplateError::FileRead { .. })));
}

#[test]
fn test_session_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("acquisition.mis");
    fs::copy(fixture("sequence.mis"), &source).unwrap();

    let mut session = Session::new();
    session.select_document(&source);
    session
        .load_template(&fixture("custom_template.yaml"))
        .unwrap();
    session.select_template("custom").unwrap();
    assert_eq!(session.state(), SessionState::TemplateLoaded);

    let outcome = session.run_on(&["proj1", "3", "pos"], june_25()).unwrap();
    assert_eq!(outcome.name, "20200625_proj1-003-IMS_pos");
    assert_eq!(outcome.regions, 3);

    let written = fs::read_to_string(&outcome.output_path).unwrap();
    assert!(written.contains(r#"Name="20200625_proj1-003-IMS_pos_roi000""#));
    assert!(written.contains(r#"Name="20200625_proj1-003-IMS_pos_roi002""#));
    assert_eq!(session.state(), SessionState::Done);

    // The session stays usable for another run.
    let again = session.run_on(&["proj1", "4", "pos"], june_25()).unwrap();
    assert_eq!(again.name, "20200625_proj1-004-IMS_pos");
}

#[test]
fn test_session_load_error_describes_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "template_name = \"x\"\nlabels = [\"a\"\n").unwrap();

    let mut session = Session::new();
    let err = session.load_template(&path).unwrap_err();
    assert!(matches!(err, Error::TemplateLoad { .. }));
    assert!(err.describe().contains("bad.toml"));
    assert_eq!(session.registry().len(), 2);
}
