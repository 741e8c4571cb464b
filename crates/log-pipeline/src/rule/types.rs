//! 로그 프로파일 데이터 타입
//!
//! YAML 프로파일 파일에서 역직렬화되는 구조체들을 정의합니다.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::LogPipelineError;

/// 로그 프로파일 정의 -- 하나의 YAML 프로파일 파일에 대응합니다.
///
/// # YAML 스키마
/// ```yaml
/// name: bitcrust
/// description: bitcrust add_block timing
/// completion_field: bc_start
/// stop_marker: already exists
/// rules:
///   - pattern: '^(?P<bc_start>.+) INFO add_block - start'
///   - pattern: 'add_block - hashed, hash: (?P<hash>[0-9a-f]*)'
///     name: hash
/// derivations:
///   - duration:
///       start: bc_start
///       end: bc_done
///       into: bc_dur
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDefinition {
    /// 프로파일 이름
    pub name: String,
    /// 프로파일 설명
    #[serde(default)]
    pub description: String,
    /// 추출 규칙 (라인마다 이 순서대로 적용)
    pub rules: Vec<RuleDefinition>,
    /// 이 필드가 채워지면 프레임이 완료됨
    pub completion_field: String,
    /// 이 문자열을 포함한 라인을 만나면 스캔 전체를 중단
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_marker: Option<String>,
    /// 프레임 완료 시 순서대로 적용되는 파생 필드
    ///
    /// YAML에서는 `- number: {field: ..}` 형태의 단일 키 맵으로 표기합니다.
    #[serde(default, with = "serde_yaml::with::singleton_map_recursive")]
    pub derivations: Vec<Derivation>,
}

/// 단일 추출 규칙 정의
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// 명명 그룹(`(?P<field>...)`)을 포함한 정규식
    pub pattern: String,
    /// 진단용 규칙 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RuleDefinition {
    /// 패턴만으로 규칙을 생성합니다.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            name: None,
        }
    }
}

/// 파생 필드 -- 완료된 프레임에 적용되는 후처리
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Derivation {
    /// 텍스트 필드를 숫자로 변환 (제자리)
    Number {
        /// 변환할 필드
        field: String,
    },
    /// 두 타임스탬프 필드의 차이를 밀리초로 계산하고 원본 필드는 제거
    Duration {
        /// 시작 시각 필드
        start: String,
        /// 종료 시각 필드
        end: String,
        /// 결과 필드
        into: String,
    },
}

impl Derivation {
    /// 이 파생 필드가 읽는 입력 필드 목록
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Self::Number { field } => vec![field.as_str()],
            Self::Duration { start, end, .. } => vec![start.as_str(), end.as_str()],
        }
    }

    /// 이 파생 필드가 만드는 출력 필드
    pub fn output(&self) -> &str {
        match self {
            Self::Number { field } => field,
            Self::Duration { into, .. } => into,
        }
    }
}

impl ProfileDefinition {
    /// 정규식 컴파일 없이 확인할 수 있는 구조적 유효성을 검증합니다.
    ///
    /// 필드 참조 검증은 규칙이 만드는 필드 집합(`produced`)을 기준으로 합니다.
    pub fn validate(&self, produced: &HashSet<String>) -> Result<(), LogPipelineError> {
        let invalid = |reason: String| LogPipelineError::ProfileValidation {
            profile: if self.name.is_empty() {
                "(empty)".to_owned()
            } else {
                self.name.clone()
            },
            reason,
        };

        if self.name.is_empty() {
            return Err(invalid("profile name must not be empty".to_owned()));
        }

        if self.rules.is_empty() {
            return Err(invalid("at least one rule is required".to_owned()));
        }

        if self.completion_field.is_empty() {
            return Err(invalid("completion_field must not be empty".to_owned()));
        }

        if !produced.contains(&self.completion_field) {
            return Err(invalid(format!(
                "completion_field '{}' is not captured by any rule",
                self.completion_field
            )));
        }

        if self.stop_marker.as_deref() == Some("") {
            return Err(invalid("stop_marker must not be empty when set".to_owned()));
        }

        for (idx, derivation) in self.derivations.iter().enumerate() {
            for input in derivation.inputs() {
                if !produced.contains(input) {
                    return Err(invalid(format!(
                        "derivation[{idx}] reads field '{input}' which no rule captures"
                    )));
                }
            }
            if derivation.output().is_empty() {
                return Err(invalid(format!(
                    "derivation[{idx}] output field must not be empty"
                )));
            }
        }

        Ok(())
    }
}
