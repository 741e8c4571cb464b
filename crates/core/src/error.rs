//! 에러 타입 -- 도메인별 에러 정의

/// blockcmp 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum BlockcmpError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 로그 처리 파이프라인 에러
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 로그 처리 파이프라인 에러
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// 로그 파일 읽기 실패
    #[error("log source failed: {0}")]
    Source(String),

    /// 레코드 추출 실패 (파생 필드 계산, 프로파일 등)
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// 출력 렌더링 실패
    #[error("render failed: {0}")]
    Render(String),
}
