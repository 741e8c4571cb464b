//! 로그 파이프라인 에러 타입
//!
//! [`LogPipelineError`]는 로그 읽기, 프로파일 로딩, 레코드 추출, 렌더링에서
//! 발생하는 모든 에러를 표현합니다.
//! `From<LogPipelineError> for BlockcmpError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use blockcmp_core::error::{BlockcmpError, ConfigError, PipelineError};

/// 로그 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogPipelineError {
    /// 로그 파일 읽기 실패 (열기, 탐색, 읽기)
    #[error("collector error: {path}: {reason}")]
    Collector {
        /// 로그 파일 경로
        path: String,
        /// 에러 사유
        reason: String,
    },

    /// 프로파일 파일 로딩 실패
    #[error("profile load error: {path}: {reason}")]
    ProfileLoad {
        /// 프로파일 파일 경로
        path: String,
        /// 로딩 실패 사유
        reason: String,
    },

    /// 프로파일 유효성 검증 실패 (정규식 컴파일 실패 포함)
    #[error("profile validation error: profile '{profile}': {reason}")]
    ProfileValidation {
        /// 문제가 된 프로파일 이름
        profile: String,
        /// 검증 실패 사유
        reason: String,
    },

    /// 파생 필드에 필요한 필드가 프레임에 없음
    #[error("missing field '{field}' in {profile} frame")]
    MissingField {
        /// 프로파일 이름
        profile: String,
        /// 누락된 필드
        field: String,
    },

    /// 파생 필드 계산 실패 (타임스탬프/숫자 파싱 실패)
    #[error("derivation error: field '{field}': cannot parse '{value}': {reason}")]
    Derivation {
        /// 원본 필드
        field: String,
        /// 파싱하지 못한 값
        value: String,
        /// 실패 사유
        reason: String,
    },

    /// 템플릿 파싱 실패
    #[error("template error at offset {offset}: {reason}")]
    Template {
        /// 템플릿 내 위치 (바이트 오프셋)
        offset: usize,
        /// 실패 사유
        reason: String,
    },

    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LogPipelineError> for BlockcmpError {
    fn from(err: LogPipelineError) -> Self {
        match err {
            LogPipelineError::Io(e) => BlockcmpError::Io(e),
            LogPipelineError::Config { field, reason } => {
                BlockcmpError::Config(ConfigError::InvalidValue { field, reason })
            }
            LogPipelineError::Collector { .. } => {
                BlockcmpError::Pipeline(PipelineError::Source(err.to_string()))
            }
            LogPipelineError::Template { .. } => {
                BlockcmpError::Pipeline(PipelineError::Render(err.to_string()))
            }
            other => BlockcmpError::Pipeline(PipelineError::Extraction(other.to_string())),
        }
    }
}
