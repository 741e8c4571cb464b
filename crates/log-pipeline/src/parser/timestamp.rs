//! 로그 타임스탬프 파서
//!
//! 두 로그의 라인 앞부분에서 캡처한 시각 문자열을 [`NaiveDateTime`]으로 변환합니다.
//!
//! # 지원 형식 (시도 순서)
//! - RFC 3339: `2017-06-02T14:03:21.123Z`
//! - Bitcoin Core debug.log: `2017-06-02 14:03:21` (소수 초 허용)
//! - ISO 8601 (타임존 없음): `2017-06-02T14:03:21.123`
//! - slog-term compact: `Jun 02 14:03:21.123` (연도 없음, 현재 연도로 가정)
//!
//! 같은 프레임 안의 두 시각 차이만 사용하므로, 연도 가정은 결과에 영향이 없습니다.
//! 현재 연도에 존재하지 않는 날짜(평년의 `Feb 29`)는 윤년(2000)으로 다시 파싱합니다.

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

use crate::error::LogPipelineError;

/// 연도를 포함하는 naive 형식
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// 연도가 없는 형식 (앞에 연도를 붙여 파싱)
const YEARLESS_FORMATS: &[&str] = &["%Y %b %d %H:%M:%S%.f"];

/// 현재 연도로 파싱할 수 없을 때 사용하는 윤년
const LEAP_YEAR: i32 = 2000;

/// 타임스탬프 문자열을 파싱합니다.
///
/// `field`는 에러 메시지에만 사용됩니다.
pub fn parse_log_timestamp(field: &str, value: &str) -> Result<NaiveDateTime, LogPipelineError> {
    let input = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc).naive_utc());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(dt);
        }
    }

    let current_year = Utc::now().year();
    if let Some(dt) = parse_yearless(input, current_year) {
        return Ok(dt);
    }
    if current_year != LEAP_YEAR {
        if let Some(dt) = parse_yearless(input, LEAP_YEAR) {
            return Ok(dt);
        }
    }

    Err(LogPipelineError::Derivation {
        field: field.to_owned(),
        value: value.to_owned(),
        reason: "unrecognized timestamp format".to_owned(),
    })
}

fn parse_yearless(input: &str, year: i32) -> Option<NaiveDateTime> {
    let with_year = format!("{year} {input}");
    YEARLESS_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&with_year, format).ok())
}

/// `end - start`를 밀리초(마이크로초 해상도)로 반환합니다.
///
/// 음수가 될 수 있습니다 (로그 시계 역행).
pub fn elapsed_millis(start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    let delta = end - start;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1000.0,
        // 마이크로초 범위 초과 (약 29만 년): 밀리초로 계산
        None => delta.num_milliseconds() as f64,
    }
}
