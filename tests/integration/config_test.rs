//! Configuration Integration Tests
//!
//! Layering of config file, environment and command-line overrides.

use std::collections::HashMap;
use std::path::PathBuf;

use spec_rag::storage::config::{ConfigService, ENV_AGENT_MODEL, ENV_API_KEY};
use spec_rag::{AppError, AppState, RagConfig, SettingsUpdate};

#[test]
fn test_file_then_env_then_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spec-rag.json");
    std::fs::write(
        &path,
        r#"{"agent_model": "gpt-4o-mini", "dataset_dir": "pdfs", "max_tool_rounds": 4}"#,
    )
    .unwrap();

    let env: HashMap<&str, &str> = [(ENV_AGENT_MODEL, "gpt-4.1"), (ENV_API_KEY, "sk-test")]
        .into_iter()
        .collect();

    let mut service = ConfigService::load(Some(&path)).unwrap();
    service
        .apply_overrides(ConfigService::settings_from_env(|key| {
            env.get(key).map(|v| v.to_string())
        }))
        .unwrap();
    let config = service
        .apply_overrides(SettingsUpdate {
            dataset_dir: Some(PathBuf::from("other")),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(config.agent_model, "gpt-4.1");
    assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.dataset_dir, PathBuf::from("other"));
    assert_eq!(config.max_tool_rounds, 4);
    assert_eq!(config.database_path, PathBuf::from("rag_data.db"));
}

#[test]
fn test_invalid_file_values_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"temperature": 3.5}"#).unwrap();

    let err = ConfigService::load(Some(&path)).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn test_state_initializes_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = RagConfig {
        dataset_dir: dir.path().join("dataset"),
        database_path: dir.path().join("data").join("rag.db"),
        api_key: Some("sk-test".to_string()),
        ..Default::default()
    };

    let state = AppState::initialize(&config).unwrap();
    assert!(config.database_path.exists());
    assert_eq!(state.query("SELECT COUNT(*) AS n FROM DatabaseItem").unwrap()[0]["n"], 0);
}
