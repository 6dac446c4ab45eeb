//! Coverage for config parsing, loading, and path resolution.

use std::fs;

use penwright::config::{config_dir, Config, ServiceConfig, DEFAULT_BASE_URL};

#[test]
fn config_dir_resolves() {
    let path = match config_dir() {
        Ok(path) => path,
        Err(err) => panic!("config dir should resolve: {err}"),
    };
    assert!(path.ends_with(".penwright"));
}

#[test]
fn parse_service_section() {
    let toml_str = r#"
[service]
base_url = "https://api.example.test/v1"
model = "glm-4-air"
temperature = 1.1
"#;
    let config = match Config::from_toml(toml_str) {
        Ok(config) => config,
        Err(err) => panic!("service config should parse: {err}"),
    };

    assert_eq!(config.service.base_url, "https://api.example.test/v1");
    assert_eq!(config.service.model, "glm-4-air");
    assert!((config.service.temperature - 1.1).abs() < f64::EPSILON);
    assert_eq!(config.service.max_tokens, ServiceConfig::default().max_tokens);
    assert!(config.validate().is_ok());
}

#[test]
fn wrong_field_type_is_rejected() {
    let result = Config::from_toml("[service]\nmax_tokens = \"many\"\n");
    assert!(result.is_err());
}

#[test]
fn load_reads_explicit_path() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("config.toml");
    let write = fs::write(
        &path,
        "[service]\nbase_url = \"http://127.0.0.1:8080/v1\"\ntimeout_secs = 12\n",
    );
    assert!(write.is_ok());

    let config = match Config::load(Some(&path)) {
        Ok(config) => config,
        Err(err) => panic!("config should load: {err}"),
    };
    assert_eq!(config.service.base_url, "http://127.0.0.1:8080/v1");
}

#[test]
fn load_missing_explicit_path_uses_defaults() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("absent.toml");

    let config = match Config::load(Some(&path)) {
        Ok(config) => config,
        Err(err) => panic!("missing config should fall back to defaults: {err}"),
    };
    assert_eq!(config.service.model, ServiceConfig::default().model);
}

#[test]
fn load_rejects_invalid_values() {
    let tmp = tempfile::tempdir().expect("should create temp dir");
    let path = tmp.path().join("config.toml");
    let write = fs::write(&path, "[service]\nbase_url = \"file:///etc/passwd\"\n");
    assert!(write.is_ok());

    assert!(Config::load(Some(&path)).is_err());
}

#[test]
fn defaults_carry_no_credentials() {
    let service = ServiceConfig::default();
    assert!(service.api_key.is_none());
    assert!(!format!("{service:?}").contains("Bearer"));
}

#[test]
fn default_endpoint_is_local() {
    let service = ServiceConfig::default();
    assert_eq!(service.base_url, DEFAULT_BASE_URL);
    let url = url::Url::parse(&service.base_url).expect("default URL parses");
    assert_eq!(url.host_str(), Some("127.0.0.1"));
}
