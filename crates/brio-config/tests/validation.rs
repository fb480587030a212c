//! Tests for configuration validation.

use brio_config::{BrioConfig, ConfigError, ConfigValidator, FsValidator, SchemaValidator};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn config(value: serde_json::Value) -> BrioConfig {
    BrioConfig::from_value(value).expect("parse config")
}

#[test]
fn fs_validator_catches_missing_alias_target() {
    let dir = TempDir::new().expect("tempdir");
    let cfg = config(json!({ "resolve": { "alias": { "@": "./src" } } }));

    let result = FsValidator::new(dir.path()).validate(&cfg);
    match result.expect_err("missing target") {
        ConfigError::AliasTargetNotFound { token, path } => {
            assert_eq!(token, "@");
            assert!(path.ends_with("src"));
        }
        other => panic!("expected AliasTargetNotFound error, got {other:?}"),
    }
}

#[test]
fn fs_validator_accepts_existing_alias_targets() {
    let dir = TempDir::new().expect("tempdir");
    fs::create_dir_all(dir.path().join("src/components")).expect("create src dir");

    let cfg = config(json!({
        "resolve": { "alias": { "@": "./src", "@/components": "src/components" } }
    }));

    assert!(FsValidator::new(dir.path()).validate(&cfg).is_ok());
}

#[test]
fn fs_validator_runs_schema_checks_first() {
    let dir = TempDir::new().expect("tempdir");
    let cfg = config(json!({
        "server": { "proxy": { "api": { "target": "http://localhost:8001" } } }
    }));

    assert!(matches!(
        FsValidator::new(dir.path()).validate(&cfg).expect_err("bad prefix"),
        ConfigError::InvalidProxyRule { .. }
    ));
}

#[test]
fn schema_validator_catches_chunk_overlap() {
    let cfg = config(json!({
        "build": { "rollupOptions": { "output": { "manualChunks": {
            "utils-vendor": ["axios", "dayjs"],
            "net-vendor": ["axios"]
        } } } }
    }));

    match SchemaValidator.validate(&cfg).expect_err("overlap") {
        ConfigError::DuplicateChunkMember {
            specifier,
            first,
            second,
        } => {
            assert_eq!(specifier, "axios");
            assert_eq!(first, "utils-vendor");
            assert_eq!(second, "net-vendor");
        }
        other => panic!("expected DuplicateChunkMember, got {other:?}"),
    }
}

#[test]
fn schema_validator_catches_empty_chunk_specifier() {
    let cfg = config(json!({
        "build": { "rollupOptions": { "output": { "manualChunks": { "vendor": [""] } } } }
    }));
    assert!(matches!(
        SchemaValidator.validate(&cfg).expect_err("empty"),
        ConfigError::SchemaValidation { .. }
    ));
}

#[test]
fn schema_validator_catches_duplicate_plugins() {
    let cfg = config(json!({ "plugins": [{ "name": "react" }, { "name": "react" }] }));
    assert!(matches!(
        SchemaValidator.validate(&cfg).expect_err("duplicate"),
        ConfigError::DuplicateKey { .. }
    ));
}

#[test]
fn schema_validator_catches_empty_alias_target() {
    let cfg = config(json!({ "resolve": { "alias": { "@": "" } } }));
    assert!(matches!(
        SchemaValidator.validate(&cfg).expect_err("empty target"),
        ConfigError::InvalidAlias { .. }
    ));
}

#[test]
fn schema_validator_catches_absolute_assets_dir() {
    let cfg = config(json!({ "build": { "assetsDir": "/assets" } }));
    assert!(SchemaValidator.validate(&cfg).is_err());
}
