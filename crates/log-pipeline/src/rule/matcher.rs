//! 규칙 매칭 로직 -- 정규식 컴파일 및 라인 적용
//!
//! [`ExtractionRule`]은 프로파일 로딩 시 한 번만 컴파일되며,
//! 매칭된 명명 그룹을 누적 레코드에 병합합니다.

use regex::Regex;

use blockcmp_core::types::Record;

use crate::error::LogPipelineError;

/// 컴파일된 추출 규칙 -- (정규식, 필드 집합) 쌍
#[derive(Debug, Clone)]
pub struct ExtractionRule {
    /// 컴파일된 정규식
    pattern: Regex,
    /// 정규식의 명명 그룹 이름 (= 이 규칙이 채우는 필드)
    fields: Vec<String>,
}

impl ExtractionRule {
    /// 패턴을 컴파일합니다.
    ///
    /// 명명 그룹이 하나도 없는 패턴은 아무 필드도 채우지 못하므로 거부합니다.
    pub fn compile(profile: &str, idx: usize, pattern: &str) -> Result<Self, LogPipelineError> {
        let regex = Regex::new(pattern).map_err(|e| LogPipelineError::ProfileValidation {
            profile: profile.to_owned(),
            reason: format!("invalid regex in rule[{idx}]: {e}"),
        })?;

        let fields: Vec<String> = regex
            .capture_names()
            .flatten()
            .map(str::to_owned)
            .collect();

        if fields.is_empty() {
            return Err(LogPipelineError::ProfileValidation {
                profile: profile.to_owned(),
                reason: format!("rule[{idx}] has no named capture groups: {pattern}"),
            });
        }

        Ok(Self {
            pattern: regex,
            fields,
        })
    }

    /// 이 규칙이 채우는 필드 목록
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// 원본 패턴 문자열
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// 라인에 규칙을 적용합니다.
    ///
    /// 매칭되면 참여한 명명 그룹을 `record`에 병합하고(기존 값 덮어씀) `true`를 반환합니다.
    /// 매칭되지 않으면 `record`를 건드리지 않습니다.
    pub fn apply(&self, line: &str, record: &mut Record) -> bool {
        let Some(caps) = self.pattern.captures(line) else {
            return false;
        };

        for field in &self.fields {
            // 매칭에 참여하지 않은 선택적 그룹은 건너뜀
            if let Some(m) = caps.name(field) {
                record.insert(field.as_str(), m.as_str());
            }
        }
        true
    }
}
