//! 비교 파이프라인 설정
//!
//! [`PipelineConfig`]는 core의 [`BlockcmpConfig`](blockcmp_core::config::BlockcmpConfig)
//! 중 `[sources]`/`[compare]` 섹션을 파이프라인이 쓰기 좋은 형태로 변환합니다.
//!
//! # 사용 예시
//! ```ignore
//! use blockcmp_core::config::BlockcmpConfig;
//! use blockcmp_log_pipeline::config::PipelineConfig;
//!
//! let core_config = BlockcmpConfig::default();
//! let config = PipelineConfig::from_core(&core_config);
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use blockcmp_core::config::{BlockcmpConfig, ErrorPolicy};

use crate::error::LogPipelineError;

/// 소스당 tail 라인 수 상한 (조인이 O(n*m)이므로 제한)
pub const MAX_TAIL_LINES: usize = 1_000_000;

/// 비교 파이프라인 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Bitcoin Core debug.log 경로
    pub core_log: PathBuf,
    /// bitcrust 로그 경로
    pub bitcrust_log: PathBuf,
    /// 각 로그에서 읽을 마지막 라인 수
    pub tail_lines: usize,
    /// Core 프로파일 YAML (None이면 내장 프로파일)
    pub core_profile: Option<PathBuf>,
    /// bitcrust 프로파일 YAML (None이면 내장 프로파일)
    pub bitcrust_profile: Option<PathBuf>,
    /// 파생 필드 실패 처리 정책
    pub error_policy: ErrorPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_core(&BlockcmpConfig::default())
    }
}

impl PipelineConfig {
    /// core 설정에서 파이프라인 설정을 생성합니다.
    ///
    /// 빈 프로파일 경로는 내장 프로파일을 뜻합니다.
    pub fn from_core(core: &BlockcmpConfig) -> Self {
        let optional_path = |s: &str| (!s.is_empty()).then(|| PathBuf::from(s));

        Self {
            core_log: PathBuf::from(&core.sources.core_log),
            bitcrust_log: PathBuf::from(&core.sources.bitcrust_log),
            tail_lines: core.sources.tail_lines,
            core_profile: optional_path(&core.sources.core_profile),
            bitcrust_profile: optional_path(&core.sources.bitcrust_profile),
            error_policy: core.compare.error_policy,
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogPipelineError> {
        if self.core_log.as_os_str().is_empty() {
            return Err(LogPipelineError::Config {
                field: "core_log".to_owned(),
                reason: "log path must not be empty".to_owned(),
            });
        }

        if self.bitcrust_log.as_os_str().is_empty() {
            return Err(LogPipelineError::Config {
                field: "bitcrust_log".to_owned(),
                reason: "log path must not be empty".to_owned(),
            });
        }

        if self.tail_lines == 0 || self.tail_lines > MAX_TAIL_LINES {
            return Err(LogPipelineError::Config {
                field: "tail_lines".to_owned(),
                reason: format!("must be 1-{MAX_TAIL_LINES}"),
            });
        }

        Ok(())
    }
}

/// 파이프라인 설정 빌더
///
/// CLI 플래그가 설정 파일 값을 덮어쓸 때 사용합니다.
#[derive(Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// 기본값에서 시작하는 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 기존 설정에서 시작하는 빌더를 생성합니다.
    pub fn from_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Core 로그 경로를 설정합니다.
    pub fn core_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.core_log = path.into();
        self
    }

    /// bitcrust 로그 경로를 설정합니다.
    pub fn bitcrust_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.bitcrust_log = path.into();
        self
    }

    /// tail 라인 수를 설정합니다.
    pub fn tail_lines(mut self, lines: usize) -> Self {
        self.config.tail_lines = lines;
        self
    }

    /// Core 프로파일 파일을 설정합니다.
    pub fn core_profile(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.core_profile = Some(path.into());
        self
    }

    /// bitcrust 프로파일 파일을 설정합니다.
    pub fn bitcrust_profile(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.bitcrust_profile = Some(path.into());
        self
    }

    /// 에러 처리 정책을 설정합니다.
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.config.error_policy = policy;
        self
    }

    /// 설정을 검증하고 `PipelineConfig`를 생성합니다.
    pub fn build(self) -> Result<PipelineConfig, LogPipelineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
