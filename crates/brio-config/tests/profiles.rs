//! Tests for mode profiles and merging behavior.

use brio_config::{BuildMode, ConfigDiscovery, ConfigError};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn project(config: &str) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("brio.toml"), config).expect("write config");
    dir
}

#[test]
fn profile_overrides_build_options() {
    let dir = project(
        r#"
[build]
minify = false
outDir = "dist"

[profiles.production.build]
minify = true
outDir = "release"
"#,
    );

    let config = ConfigDiscovery::new(dir.path())
        .load_for_mode(BuildMode::Production)
        .expect("load with profile");

    assert!(config.build.minify);
    assert_eq!(config.build.out_dir, PathBuf::from("release"));
}

#[test]
fn merge_preserves_unspecified_fields() {
    let dir = project(
        r#"
[server]
host = "0.0.0.0"
port = 3002
cors = false

[profiles.development.server]
port = 5173
"#,
    );

    let config = ConfigDiscovery::new(dir.path())
        .load_for_mode(BuildMode::Development)
        .expect("load with profile");

    assert_eq!(config.server.port, 5173);
    assert_eq!(config.server.host, "0.0.0.0");
    assert!(!config.server.cors);
}

#[test]
fn merge_handles_nested_objects() {
    let dir = project(
        r#"
[server.proxy."/api"]
target = "http://localhost:8001"
changeOrigin = true

[profiles.production.server.proxy."/api"]
target = "https://api.example.com"
"#,
    );

    let config = ConfigDiscovery::new(dir.path())
        .load_for_mode(BuildMode::Production)
        .expect("load with profile");

    let api = &config.server.proxy["/api"];
    assert_eq!(api.target, "https://api.example.com");
    assert!(api.change_origin, "sibling keys survive the merge");
}

#[test]
fn merge_replaces_arrays() {
    let dir = project(
        r#"
[optimizeDeps]
include = ["react", "react-dom", "axios"]

[profiles.production.optimizeDeps]
include = ["react"]
"#,
    );

    let config = ConfigDiscovery::new(dir.path())
        .load_for_mode(BuildMode::Production)
        .expect("load with profile");
    assert_eq!(config.optimize_deps.include, vec!["react"]);
}

#[test]
fn profile_appends_proxy_rules_after_base_rules() {
    let dir = project(
        r#"
[server.proxy."/api"]
target = "http://localhost:8001"

[profiles.development.server.proxy."/auth"]
target = "http://localhost:8002"
"#,
    );

    let config = ConfigDiscovery::new(dir.path())
        .load_for_mode(BuildMode::Development)
        .expect("load with profile");
    let prefixes: Vec<_> = config.server.proxy.keys().cloned().collect();
    assert_eq!(prefixes, vec!["/api", "/auth"]);
}

#[test]
fn inactive_profile_is_not_applied() {
    let dir = project(
        r#"
[build]
minify = false

[profiles.production.build]
minify = true
"#,
    );

    let config = ConfigDiscovery::new(dir.path())
        .load_for_mode(BuildMode::Development)
        .expect("load with profile");
    assert!(!config.build.minify);
}

#[test]
fn profile_with_wrong_type_is_rejected() {
    let dir = project(
        r#"
[profiles.production.server]
port = "not-a-port"
"#,
    );

    let err = ConfigDiscovery::new(dir.path())
        .load_for_mode(BuildMode::Production)
        .expect_err("invalid override");
    assert!(matches!(err, ConfigError::InvalidProfileOverride { .. }));
}

#[test]
fn profile_sourcemap_beats_mode_default() {
    let dir = project(
        r#"
[profiles.production.build]
sourcemap = true
"#,
    );

    let resolved = ConfigDiscovery::new(dir.path())
        .resolve(BuildMode::Production)
        .expect("resolve");
    assert!(resolved.build.sourcemap);
    assert!(resolved.build.terser_options.compress.drop_console);
}
