use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_policyalign_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("POLICYALIGN_PORT");
        env::remove_var("POLICYALIGN_BIND_ADDR");
        env::remove_var("POLICYALIGN_EMBEDDING_MODEL_PATH");
        env::remove_var("POLICYALIGN_JUDGE_MODEL");
        env::remove_var("POLICYALIGN_MIN_CALL_INTERVAL_MS");
        env::remove_var("POLICYALIGN_RETRY_BACKOFF_MS");
        env::remove_var("POLICYALIGN_VERDICT_CACHE_CAPACITY");
        env::remove_var("POLICYALIGN_PARAGRAPH_ACCEPT_THRESHOLD");
        env::remove_var("POLICYALIGN_ATOMIC_STRICT_THRESHOLD");
        env::remove_var("POLICYALIGN_AI_CALL_THRESHOLD");
        env::remove_var("POLICYALIGN_REUSE_PENALTY");
        env::remove_var("POLICYALIGN_MOCK_PROVIDER");
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert!(config.embedding_model_path.is_none());
    assert_eq!(config.judge_model, "mistral-small-latest");
    assert_eq!(config.min_call_interval, Duration::from_secs(1));
    assert_eq!(config.retry_backoff, Duration::from_secs(5));
    assert_eq!(config.paragraph_accept_threshold, 0.60);
    assert_eq!(config.atomic_strict_threshold, 0.65);
    assert_eq!(config.ai_call_threshold, 0.80);
    assert!(!config.reuse_penalty);
    assert!(!config.mock_provider);
}

#[test]
fn test_socket_addr() {
    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_policyalign_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8080);
    assert_eq!(config.verdict_cache_capacity, 10_000);
    assert!(!config.reuse_penalty);
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_policyalign_env();

    let config = with_env_vars(
        &[
            ("POLICYALIGN_PORT", "9090"),
            ("POLICYALIGN_BIND_ADDR", "0.0.0.0"),
            ("POLICYALIGN_JUDGE_MODEL", "gpt-4o-mini"),
            ("POLICYALIGN_MIN_CALL_INTERVAL_MS", "250"),
            ("POLICYALIGN_RETRY_BACKOFF_MS", "10"),
            ("POLICYALIGN_PARAGRAPH_ACCEPT_THRESHOLD", "0.7"),
            ("POLICYALIGN_AI_CALL_THRESHOLD", "0.75"),
            ("POLICYALIGN_REUSE_PENALTY", "true"),
            ("POLICYALIGN_MOCK_PROVIDER", "1"),
        ],
        Config::from_env,
    )
    .expect("should parse overrides");

    assert_eq!(config.port, 9090);
    assert_eq!(config.socket_addr(), "0.0.0.0:9090");
    assert_eq!(config.judge_model, "gpt-4o-mini");
    assert_eq!(config.min_call_interval, Duration::from_millis(250));
    assert_eq!(config.retry_backoff, Duration::from_millis(10));
    assert_eq!(config.paragraph_accept_threshold, 0.7);
    assert_eq!(config.atomic_strict_threshold, 0.65);
    assert_eq!(config.ai_call_threshold, 0.75);
    assert!(config.reuse_penalty);
    assert!(config.mock_provider);
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_policyalign_env();

    let result = with_env_vars(&[("POLICYALIGN_PORT", "0")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidPort { .. })));
}

#[test]
#[serial]
fn test_invalid_port_not_a_number() {
    clear_policyalign_env();

    let result = with_env_vars(&[("POLICYALIGN_PORT", "eighty")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::PortParseError { .. })));
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_policyalign_env();

    let result = with_env_vars(&[("POLICYALIGN_BIND_ADDR", "not-an-ip")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidBindAddr { .. })));
}

#[test]
#[serial]
fn test_threshold_not_a_number() {
    clear_policyalign_env();

    let result = with_env_vars(
        &[("POLICYALIGN_ATOMIC_STRICT_THRESHOLD", "high")],
        Config::from_env,
    );
    assert!(matches!(
        result,
        Err(ConfigError::ThresholdParseError {
            name: "POLICYALIGN_ATOMIC_STRICT_THRESHOLD",
            ..
        })
    ));
}

#[test]
#[serial]
fn test_threshold_out_of_range() {
    clear_policyalign_env();

    let result = with_env_vars(
        &[("POLICYALIGN_PARAGRAPH_ACCEPT_THRESHOLD", "1.5")],
        Config::from_env,
    );
    assert!(matches!(
        result,
        Err(ConfigError::ThresholdOutOfRange { value, .. }) if value == 1.5
    ));
}

#[test]
#[serial]
fn test_flag_parsing_ignores_garbage() {
    clear_policyalign_env();

    let config = with_env_vars(&[("POLICYALIGN_REUSE_PENALTY", "maybe")], Config::from_env)
        .expect("should parse");
    assert!(!config.reuse_penalty);
}

#[test]
#[serial]
fn test_blank_model_path_is_ignored() {
    clear_policyalign_env();

    let config = with_env_vars(
        &[("POLICYALIGN_EMBEDDING_MODEL_PATH", "   ")],
        Config::from_env,
    )
    .expect("should parse");
    assert!(config.embedding_model_path.is_none());
}

#[test]
fn test_validate_default_ok() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_missing_model_dir() {
    let config = Config {
        embedding_model_path: Some("/definitely/not/here".into()),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_model_path_is_file() {
    let file = tempfile::NamedTempFile::new().expect("temp file");
    let config = Config {
        embedding_model_path: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_model_dir_ok() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let config = Config {
        embedding_model_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_empty_judge_model() {
    let config = Config {
        judge_model: "  ".to_string(),
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::EmptyJudgeModel)));
}

#[test]
fn test_validate_threshold_range() {
    let config = Config {
        ai_call_threshold: -0.1,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ThresholdOutOfRange { .. })
    ));
}

#[test]
fn test_error_display() {
    let err = ConfigError::ThresholdOutOfRange {
        name: "POLICYALIGN_AI_CALL_THRESHOLD",
        value: 2.0,
    };
    assert!(err.to_string().contains("POLICYALIGN_AI_CALL_THRESHOLD"));
    assert!(err.to_string().contains("between 0.0 and 1.0"));
}
