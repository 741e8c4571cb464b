//! 로그 값 파싱 모듈
//!
//! 정규식이 캡처한 원문을 파생 필드 계산에 쓰이는 타입으로 변환합니다.
//!
//! - [`timestamp`]: 로그 타임스탬프 파싱 및 경과 시간(밀리초) 계산
//! - [`parse_number`]: 숫자 필드 파싱 (`120.5ms`의 `120.5` 등)

pub mod timestamp;

pub use timestamp::{elapsed_millis, parse_log_timestamp};

use crate::error::LogPipelineError;

/// 숫자 필드를 `f64`로 파싱합니다.
///
/// 소수점 이하 정밀도를 유지합니다 (`"120.5"` -> `120.5`).
pub fn parse_number(field: &str, value: &str) -> Result<f64, LogPipelineError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| LogPipelineError::Derivation {
            field: field.to_owned(),
            value: value.to_owned(),
            reason: e.to_string(),
        })
}
