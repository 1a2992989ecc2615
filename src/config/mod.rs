//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `POLICYALIGN_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{AI_CALL_THRESHOLD, PARAGRAPH_ACCEPT_THRESHOLD, STRICT_THRESHOLD};

/// Default language model used for verification, classification and remediation.
pub const DEFAULT_JUDGE_MODEL: &str = "mistral-small-latest";

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `POLICYALIGN_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding a sentence embedding model (`config.json`,
    /// `model.safetensors`, `tokenizer.json`). `None` runs the stub embedder.
    pub embedding_model_path: Option<PathBuf>,

    /// Model name passed to the judgment service. Default: `mistral-small-latest`.
    pub judge_model: String,

    /// Minimum spacing between judgment service calls. Default: 1s.
    pub min_call_interval: Duration,

    /// Linear backoff base for throttled calls (attempt `n` waits `n * base`). Default: 5s.
    pub retry_backoff: Duration,

    /// Max verdicts held in the process-wide cache. Default: `10_000`.
    pub verdict_cache_capacity: u64,

    /// Fused score needed to accept a paragraph match. Default: `0.60`.
    pub paragraph_accept_threshold: f32,

    /// Verdict similarity needed to accept an atomic match. Default: `0.65`.
    pub atomic_strict_threshold: f32,

    /// Embedding score needed before an atomic candidate is verified. Default: `0.80`.
    pub ai_call_threshold: f32,

    /// Penalise vendor paragraphs reused more than five times. Default: off.
    pub reuse_penalty: bool,

    /// Answer judgment calls with a deterministic local mock. Default: off.
    pub mock_provider: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            embedding_model_path: None,
            judge_model: DEFAULT_JUDGE_MODEL.to_string(),
            min_call_interval: Duration::from_millis(1_000),
            retry_backoff: Duration::from_millis(5_000),
            verdict_cache_capacity: 10_000,
            paragraph_accept_threshold: PARAGRAPH_ACCEPT_THRESHOLD,
            atomic_strict_threshold: STRICT_THRESHOLD,
            ai_call_threshold: AI_CALL_THRESHOLD,
            reuse_penalty: false,
            mock_provider: false,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "POLICYALIGN_PORT";
    const ENV_BIND_ADDR: &'static str = "POLICYALIGN_BIND_ADDR";
    const ENV_EMBEDDING_MODEL_PATH: &'static str = "POLICYALIGN_EMBEDDING_MODEL_PATH";
    const ENV_JUDGE_MODEL: &'static str = "POLICYALIGN_JUDGE_MODEL";
    const ENV_MIN_CALL_INTERVAL_MS: &'static str = "POLICYALIGN_MIN_CALL_INTERVAL_MS";
    const ENV_RETRY_BACKOFF_MS: &'static str = "POLICYALIGN_RETRY_BACKOFF_MS";
    const ENV_VERDICT_CACHE_CAPACITY: &'static str = "POLICYALIGN_VERDICT_CACHE_CAPACITY";
    const ENV_PARAGRAPH_ACCEPT: &'static str = "POLICYALIGN_PARAGRAPH_ACCEPT_THRESHOLD";
    const ENV_ATOMIC_STRICT: &'static str = "POLICYALIGN_ATOMIC_STRICT_THRESHOLD";
    const ENV_AI_CALL: &'static str = "POLICYALIGN_AI_CALL_THRESHOLD";
    const ENV_REUSE_PENALTY: &'static str = "POLICYALIGN_REUSE_PENALTY";
    const ENV_MOCK_PROVIDER: &'static str = "POLICYALIGN_MOCK_PROVIDER";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let embedding_model_path =
            Self::parse_optional_path_from_env(Self::ENV_EMBEDDING_MODEL_PATH);
        let judge_model = Self::parse_string_from_env(Self::ENV_JUDGE_MODEL, defaults.judge_model);
        let min_call_interval = Duration::from_millis(Self::parse_u64_from_env(
            Self::ENV_MIN_CALL_INTERVAL_MS,
            defaults.min_call_interval.as_millis() as u64,
        ));
        let retry_backoff = Duration::from_millis(Self::parse_u64_from_env(
            Self::ENV_RETRY_BACKOFF_MS,
            defaults.retry_backoff.as_millis() as u64,
        ));
        let verdict_cache_capacity = Self::parse_u64_from_env(
            Self::ENV_VERDICT_CACHE_CAPACITY,
            defaults.verdict_cache_capacity,
        );
        let paragraph_accept_threshold = Self::parse_threshold_from_env(
            Self::ENV_PARAGRAPH_ACCEPT,
            defaults.paragraph_accept_threshold,
        )?;
        let atomic_strict_threshold =
            Self::parse_threshold_from_env(Self::ENV_ATOMIC_STRICT, defaults.atomic_strict_threshold)?;
        let ai_call_threshold =
            Self::parse_threshold_from_env(Self::ENV_AI_CALL, defaults.ai_call_threshold)?;
        let reuse_penalty = Self::parse_flag_from_env(Self::ENV_REUSE_PENALTY);
        let mock_provider = Self::parse_flag_from_env(Self::ENV_MOCK_PROVIDER);

        Ok(Self {
            port,
            bind_addr,
            embedding_model_path,
            judge_model,
            min_call_interval,
            retry_backoff,
            verdict_cache_capacity,
            paragraph_accept_threshold,
            atomic_strict_threshold,
            ai_call_threshold,
            reuse_penalty,
            mock_provider,
        })
    }

    /// Validates paths and numeric ranges (does not load any model).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref path) = self.embedding_model_path {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if self.judge_model.trim().is_empty() {
            return Err(ConfigError::EmptyJudgeModel);
        }

        for (name, value) in [
            (Self::ENV_PARAGRAPH_ACCEPT, self.paragraph_accept_threshold),
            (Self::ENV_ATOMIC_STRICT, self.atomic_strict_threshold),
            (Self::ENV_AI_CALL, self.ai_call_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_threshold_from_env(name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(name) {
            Ok(value) => {
                let parsed: f32 =
                    value
                        .trim()
                        .parse()
                        .map_err(|e| ConfigError::ThresholdParseError {
                            name,
                            value: value.clone(),
                            source: e,
                        })?;

                if !(0.0..=1.0).contains(&parsed) {
                    return Err(ConfigError::ThresholdOutOfRange {
                        name,
                        value: parsed,
                    });
                }

                Ok(parsed)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_flag_from_env(var_name: &str) -> bool {
        env::var(var_name).is_ok_and(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
    }
}
