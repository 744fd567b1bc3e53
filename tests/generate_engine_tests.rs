use std::fs;
use std::path::Path;

use lockit::{FormatRegistry, GenerateOptions, LocalizationFile, generate};
use tempfile::TempDir;

fn read(registry: &FormatRegistry, path: &Path) -> LocalizationFile {
    registry
        .handler_for_path(path)
        .expect("handler for path")
        .read_from(path)
        .expect("parse file")
}

#[test]
fn test_generate_creates_a_new_target_file() {
    let tmp = TempDir::new().expect("tempdir");
    let source = tmp.path().join("app.en.json");
    fs::write(&source, r#"{"A": "Hello", "B": "Bye"}"#).expect("write");

    let registry = FormatRegistry::default_registry();
    let out = tmp.path().join("out");
    let results = generate(registry, &source, &out, &GenerateOptions::new("en", "tr"));

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(result.success(), "{:?}", result.error_message);
    assert!(result.created);
    assert_eq!(result.keys_added, 2);
    assert_eq!(result.keys_skipped, 0);
    assert_eq!(result.file_path, out.join("app.tr.json"));

    let target = read(registry, &result.file_path);
    assert_eq!(target.entry("A").unwrap().value.as_deref(), Some("@@MISSING@@ Hello"));
    assert_eq!(target.entry("B").unwrap().value.as_deref(), Some("@@MISSING@@ Bye"));
}

#[test]
fn test_generate_merges_into_an_existing_target() {
    let tmp = TempDir::new().expect("tempdir");
    let source = tmp.path().join("app.en.json");
    fs::write(&source, r#"{"A": "Hello", "B": "Bye"}"#).expect("write");
    let target_path = tmp.path().join("app.tr.json");
    fs::write(&target_path, r#"{"A": "x"}"#).expect("write");

    let registry = FormatRegistry::default_registry();
    let results = generate(
        registry,
        &source,
        tmp.path(),
        &GenerateOptions::new("en", "tr"),
    );

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(result.success(), "{:?}", result.error_message);
    assert!(!result.created);
    assert_eq!(result.keys_added, 1);
    assert_eq!(result.keys_skipped, 1);

    // Existing translations survive the merge.
    let target = read(registry, &target_path);
    assert_eq!(target.entry("A").unwrap().value.as_deref(), Some("x"));
    assert_eq!(
        target.entry("B").unwrap().value.as_deref(),
        Some("@@MISSING@@ Bye")
    );
}

#[test]
fn test_generate_overwrite_discards_the_target() {
    let tmp = TempDir::new().expect("tempdir");
    let source = tmp.path().join("app.en.json");
    fs::write(&source, r#"{"A": "Hello"}"#).expect("write");
    let target_path = tmp.path().join("app.tr.json");
    fs::write(&target_path, r#"{"A": "x", "stale": "y"}"#).expect("write");

    let registry = FormatRegistry::default_registry();
    let results = generate(
        registry,
        &source,
        tmp.path(),
        &GenerateOptions::new("en", "tr").with_overwrite(true),
    );

    let result = &results[0];
    assert!(result.success());
    assert!(!result.created);
    assert_eq!(result.keys_added, 1);

    let target = read(registry, &target_path);
    assert_eq!(target.len(), 1);
    assert_eq!(target.entry("A").unwrap().value.as_deref(), Some("@@MISSING@@ Hello"));
}

#[test]
fn test_generate_over_a_directory_filters_by_base_culture() {
    let tmp = TempDir::new().expect("tempdir");
    let locales = tmp.path().join("locales");
    fs::create_dir_all(&locales).expect("create dir");
    fs::write(locales.join("app.en.json"), r#"{"A": "one"}"#).expect("write");
    fs::write(locales.join("menu.en.json"), r#"{"B": "two"}"#).expect("write");
    fs::write(locales.join("app.fr.json"), r#"{"A": "un"}"#).expect("write");

    let registry = FormatRegistry::default_registry();
    let out = tmp.path().join("out");
    let results = generate(registry, &locales, &out, &GenerateOptions::new("en", "de"));

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.success()));
    assert!(out.join("app.de.json").is_file());
    assert!(out.join("menu.de.json").is_file());
    assert!(!out.join("app.fr.json").exists());
}

#[test]
fn test_generate_with_empty_value_policy() {
    let tmp = TempDir::new().expect("tempdir");
    let source = tmp.path().join("app.en.json");
    fs::write(&source, r#"{"A": "Hello"}"#).expect("write");

    let registry = FormatRegistry::default_registry();
    let out = tmp.path().join("out");
    let results = generate(
        registry,
        &source,
        &out,
        &GenerateOptions::new("en", "tr").with_empty_value(true),
    );
    assert!(results[0].success());

    let target = read(registry, &out.join("app.tr.json"));
    assert_eq!(target.entry("A").unwrap().value.as_deref(), Some(""));
}

#[test]
fn test_source_with_wrong_culture_is_a_no_op() {
    let tmp = TempDir::new().expect("tempdir");
    let source = tmp.path().join("app.fr.json");
    fs::write(&source, r#"{"A": "un"}"#).expect("write");

    let registry = FormatRegistry::default_registry();
    let results = generate(
        registry,
        &source,
        tmp.path(),
        &GenerateOptions::new("en", "tr"),
    );
    assert!(results.is_empty());
}
