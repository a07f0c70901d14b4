use mentions::config::*;
use mentions::errors::MentionError;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = MentionsConfig::default();
    assert_eq!(config.version, 1);
    assert_eq!(config.base_path, "/ocs/v2.php/cloud/");
    assert_eq!(config.timeout(), Duration::from_secs(30));
    assert!(config.server_url.is_empty());
}

#[test]
fn test_load_missing_config_returns_default() {
    let dir = TempDir::new().unwrap();
    let loaded = load_config(&dir.path().join(CONFIG_FILENAME)).unwrap();
    assert_eq!(loaded, MentionsConfig::default());
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join(CONFIG_FILENAME);
    let config = MentionsConfig {
        server_url: "https://cloud.example.com".to_string(),
        user_id: "alice".to_string(),
        token: "secret".to_string(),
        timeout_secs: 5,
        ..MentionsConfig::default()
    };

    save_config(&path, &config).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let loaded = load_config(&path).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn test_partial_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILENAME);
    std::fs::write(&path, r#"{ "server_url": "https://cloud.example.com" }"#).unwrap();

    let loaded = load_config(&path).unwrap();
    assert_eq!(loaded.server_url, "https://cloud.example.com");
    assert_eq!(loaded.base_path, "/ocs/v2.php/cloud/");
    assert_eq!(loaded.avatar_size, 64);
}

#[test]
fn test_invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILENAME);
    std::fs::write(&path, "not json").unwrap();

    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, MentionError::Config { .. }));
    assert!(err.to_string().contains("failed to parse config file"));
}

#[test]
fn test_account_from_config() {
    let config = MentionsConfig {
        server_url: "https://cloud.example.com/".to_string(),
        user_id: "alice".to_string(),
        token: "secret".to_string(),
        ..MentionsConfig::default()
    };
    let account = config.account().unwrap();
    assert_eq!(account.url, "https://cloud.example.com");
    assert_eq!(account.name, "alice@cloud.example.com");
}

#[test]
fn test_account_requires_server_and_user() {
    let config = MentionsConfig::default();
    assert!(matches!(config.account(), Err(MentionError::Config { .. })));

    let config = MentionsConfig {
        server_url: "https://cloud.example.com".to_string(),
        ..MentionsConfig::default()
    };
    assert!(matches!(config.account(), Err(MentionError::Config { .. })));
}

#[test]
fn test_default_config_path() {
    let path = default_config_path();
    assert!(path.ends_with("mentions/config.json"));
}
