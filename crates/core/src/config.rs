//! 설정 관리 -- blockcmp.toml 파싱 및 런타임 설정
//!
//! [`BlockcmpConfig`]는 모든 모듈의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`BLOCKCMP_SOURCES_CORE_LOG=/data/debug.log` 형식)
//! 3. 설정 파일 (`blockcmp.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), blockcmp_core::error::BlockcmpError> {
//! use blockcmp_core::config::BlockcmpConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = BlockcmpConfig::load("blockcmp.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = BlockcmpConfig::parse("[sources]\ntail_lines = 500")?;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{BlockcmpError, ConfigError};

/// blockcmp 통합 설정
///
/// `blockcmp.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockcmpConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 로그 소스 설정
    #[serde(default)]
    pub sources: SourcesConfig,
    /// 비교 동작 설정
    #[serde(default)]
    pub compare: CompareConfig,
}

impl BlockcmpConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, BlockcmpError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일이 없으면 기본값에서 시작하는 [`load`](Self::load)입니다.
    ///
    /// 파일이 존재하지만 파싱/검증에 실패하면 에러를 반환합니다.
    pub async fn load_or_default(path: impl AsRef<Path>) -> Result<Self, BlockcmpError> {
        let path = path.as_ref();
        let mut config = match Self::from_file(path).await {
            Ok(config) => config,
            Err(BlockcmpError::Config(ConfigError::FileNotFound { .. })) => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, BlockcmpError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BlockcmpError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                BlockcmpError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, BlockcmpError> {
        toml::from_str(toml_str).map_err(|e| {
            BlockcmpError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `BLOCKCMP_{SECTION}_{FIELD}`
    /// 예: `BLOCKCMP_SOURCES_TAIL_LINES=2000`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "BLOCKCMP_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "BLOCKCMP_GENERAL_LOG_FORMAT");

        // Sources
        override_string(&mut self.sources.core_log, "BLOCKCMP_SOURCES_CORE_LOG");
        override_string(&mut self.sources.bitcrust_log, "BLOCKCMP_SOURCES_BITCRUST_LOG");
        override_usize(&mut self.sources.tail_lines, "BLOCKCMP_SOURCES_TAIL_LINES");
        override_string(
            &mut self.sources.core_profile,
            "BLOCKCMP_SOURCES_CORE_PROFILE",
        );
        override_string(
            &mut self.sources.bitcrust_profile,
            "BLOCKCMP_SOURCES_BITCRUST_PROFILE",
        );

        // Compare
        override_parsed(
            &mut self.compare.error_policy,
            "BLOCKCMP_COMPARE_ERROR_POLICY",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), BlockcmpError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.sources.core_log.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sources.core_log".to_owned(),
                reason: "path must not be empty".to_owned(),
            }
            .into());
        }

        if self.sources.bitcrust_log.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sources.bitcrust_log".to_owned(),
                reason: "path must not be empty".to_owned(),
            }
            .into());
        }

        if self.sources.tail_lines == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sources.tail_lines".to_owned(),
                reason: "must be greater than 0".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 로그 소스 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Bitcoin Core debug.log 경로
    pub core_log: String,
    /// bitcrust 로그 경로
    pub bitcrust_log: String,
    /// 각 로그에서 읽을 마지막 라인 수
    pub tail_lines: usize,
    /// Core 로그 프로파일 YAML 경로 (비어있으면 내장 프로파일)
    pub core_profile: String,
    /// bitcrust 로그 프로파일 YAML 경로 (비어있으면 내장 프로파일)
    pub bitcrust_profile: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            core_log: "/root/.bitcoin/debug.log".to_owned(),
            bitcrust_log: "bitcrust.log".to_owned(),
            tail_lines: 1000,
            core_profile: String::new(),
            bitcrust_profile: String::new(),
        }
    }
}

/// 비교 동작 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// 파생 필드 계산 실패 시 처리 정책
    pub error_policy: ErrorPolicy,
}

/// 잘못된 프레임 처리 정책
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// 첫 에러에서 즉시 중단 (부분 결과 없음)
    #[default]
    FailFast,
    /// 잘못된 프레임을 건너뛰고 마지막에 건너뛴 수를 보고
    Skip,
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailFast => f.write_str("fail-fast"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

impl FromStr for ErrorPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail-fast" | "fail_fast" => Ok(Self::FailFast),
            "skip" => Ok(Self::Skip),
            _ => Err(ConfigError::InvalidValue {
                field: "compare.error_policy".to_owned(),
                reason: format!("unknown policy '{s}', expected 'fail-fast' or 'skip'"),
            }),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_parsed<T: FromStr>(target: &mut T, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<T>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse value from env var, ignoring"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = BlockcmpConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "pretty");
        assert_eq!(config.sources.tail_lines, 1000);
        assert!(config.sources.core_profile.is_empty());
        assert_eq!(config.compare.error_policy, ErrorPolicy::FailFast);
    }

    #[test]
    fn default_config_passes_validation() {
        let config = BlockcmpConfig::default();
        config.validate().unwrap();
    }

    #[test]
    fn from_str_empty_toml_uses_defaults() {
        let config = BlockcmpConfig::parse("").unwrap();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.sources.bitcrust_log, "bitcrust.log");
    }

    #[test]
    fn from_str_partial_toml_merges_with_defaults() {
        let toml = r#"
[sources]
core_log = "/data/bitcoin/debug.log"

[compare]
error_policy = "skip"
"#;
        let config = BlockcmpConfig::parse(toml).unwrap();
        assert_eq!(config.sources.core_log, "/data/bitcoin/debug.log");
        // tail_lines는 기본값 유지
        assert_eq!(config.sources.tail_lines, 1000);
        assert_eq!(config.compare.error_policy, ErrorPolicy::Skip);
    }

    #[test]
    fn from_str_invalid_toml_returns_error() {
        let result = BlockcmpConfig::parse("invalid = [[[toml");
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            BlockcmpError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn from_str_unknown_policy_is_parse_error() {
        let result = BlockcmpConfig::parse("[compare]\nerror_policy = \"retry\"");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = BlockcmpConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = BlockcmpConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    fn validate_rejects_zero_tail_lines() {
        let mut config = BlockcmpConfig::default();
        config.sources.tail_lines = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tail_lines"));
    }

    #[test]
    fn validate_rejects_empty_log_path() {
        let mut config = BlockcmpConfig::default();
        config.sources.bitcrust_log = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bitcrust_log"));
    }

    #[test]
    fn error_policy_from_str() {
        assert_eq!("skip".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Skip);
        assert_eq!(
            "FAIL-FAST".parse::<ErrorPolicy>().unwrap(),
            ErrorPolicy::FailFast
        );
        assert!("never".parse::<ErrorPolicy>().is_err());
        assert_eq!(ErrorPolicy::Skip.to_string(), "skip");
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_BLOCKCMP_STR", "overridden") };
        override_string(&mut val, "TEST_BLOCKCMP_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_BLOCKCMP_STR") };
    }

    #[test]
    #[serial]
    fn env_override_usize_invalid_keeps_original() {
        let mut val = 1000usize;
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("TEST_BLOCKCMP_USIZE_BAD", "lots") };
        override_usize(&mut val, "TEST_BLOCKCMP_USIZE_BAD");
        assert_eq!(val, 1000); // 원래 값 유지
        unsafe { std::env::remove_var("TEST_BLOCKCMP_USIZE_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_policy() {
        let mut config = BlockcmpConfig::default();
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 안전합니다.
        unsafe { std::env::set_var("BLOCKCMP_COMPARE_ERROR_POLICY", "skip") };
        config.apply_env_overrides();
        assert_eq!(config.compare.error_policy, ErrorPolicy::Skip);
        unsafe { std::env::remove_var("BLOCKCMP_COMPARE_ERROR_POLICY") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut val = "original".to_owned();
        override_string(&mut val, "TEST_BLOCKCMP_NONEXISTENT_12345");
        assert_eq!(val, "original");
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = BlockcmpConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = BlockcmpConfig::parse(&toml_str).unwrap();
        assert_eq!(config.sources.core_log, parsed.sources.core_log);
        assert_eq!(config.compare.error_policy, parsed.compare.error_policy);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = BlockcmpConfig::from_file("/nonexistent/path/blockcmp.toml").await;
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            BlockcmpError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    #[serial]
    async fn load_or_default_without_file_uses_defaults() {
        let config = BlockcmpConfig::load_or_default("/nonexistent/path/blockcmp.toml")
            .await
            .unwrap();
        assert_eq!(config.sources.tail_lines, 1000);
    }
}
