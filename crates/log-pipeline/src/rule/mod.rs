//! 로그 프로파일 -- 선언적 정규식 테이블
//!
//! 하나의 로그 형식을 (정규식, 필드 집합) 규칙 목록, 완료 필드, 중단 마커,
//! 파생 필드로 기술합니다. 추출기는 프로파일만 바꿔 끼우면 어떤 형식이든
//! 같은 코드로 스캔합니다.
//!
//! # 프로파일 형식
//! ```yaml
//! name: core
//! completion_field: txcount
//! rules:
//!   - pattern: '^(?P<time>.*) - Connect block: (?P<blocktime>[0-9.]*)ms'
//!   - pattern: 'Connect (?P<txcount>[0-9]*) transactions'
//! derivations:
//!   - number:
//!       field: blocktime
//! ```
//!
//! # 아키텍처
//! - [`LogProfile`]: 컴파일된 프로파일 (규칙 적용 + 파생 필드 계산)
//! - [`loader`]: YAML 파일 로딩
//! - [`matcher`]: 정규식 규칙 컴파일 및 매칭
//! - [`types`]: 프로파일 정의 데이터 구조

pub mod loader;
pub mod matcher;
pub mod types;

pub use loader::ProfileLoader;
pub use matcher::ExtractionRule;
pub use types::{Derivation, ProfileDefinition, RuleDefinition};

use std::collections::HashSet;

use blockcmp_core::types::{FieldValue, Record};

use crate::error::LogPipelineError;
use crate::parser::{elapsed_millis, parse_log_timestamp, parse_number};

/// 내장 프로파일 이름 -- Bitcoin Core `debug.log` (`-debug=bench`)
pub const CORE_PROFILE: &str = "core";

/// 내장 프로파일 이름 -- bitcrust 로그
pub const BITCRUST_PROFILE: &str = "bitcrust";

/// 내장 프로파일 이름 목록
pub const BUILTIN_PROFILES: &[&str] = &[CORE_PROFILE, BITCRUST_PROFILE];

/// 컴파일된 로그 프로파일
///
/// 정규식은 생성 시 한 번만 컴파일되며 이후 읽기 전용으로 공유됩니다.
#[derive(Debug, Clone)]
pub struct LogProfile {
    /// 원본 정의 (`profile show` 출력용)
    definition: ProfileDefinition,
    /// 컴파일된 규칙 (적용 순서 유지)
    rules: Vec<ExtractionRule>,
}

impl LogProfile {
    /// 정의를 검증하고 컴파일합니다.
    ///
    /// # Errors
    /// 정규식 컴파일 실패 또는 구조적 검증 실패 시
    /// [`LogPipelineError::ProfileValidation`]을 반환합니다.
    pub fn compile(definition: ProfileDefinition) -> Result<Self, LogPipelineError> {
        let rules = definition
            .rules
            .iter()
            .enumerate()
            .map(|(idx, rule)| ExtractionRule::compile(&definition.name, idx, &rule.pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let produced: HashSet<String> = rules
            .iter()
            .flat_map(|rule| rule.fields().iter().cloned())
            .collect();

        definition.validate(&produced)?;

        tracing::debug!(
            profile = %definition.name,
            rules = rules.len(),
            derivations = definition.derivations.len(),
            "compiled log profile"
        );

        Ok(Self { definition, rules })
    }

    /// 이름으로 내장 프로파일을 조회합니다.
    ///
    /// # Errors
    /// 알 수 없는 이름이면 [`LogPipelineError::Config`]를 반환합니다.
    pub fn builtin(name: &str) -> Result<Self, LogPipelineError> {
        match name {
            CORE_PROFILE => Self::compile(bitcoin_core_definition()),
            BITCRUST_PROFILE => Self::compile(bitcrust_definition()),
            other => Err(LogPipelineError::Config {
                field: "profile".to_owned(),
                reason: format!(
                    "unknown built-in profile '{other}', expected one of: {}",
                    BUILTIN_PROFILES.join(", ")
                ),
            }),
        }
    }

    /// 프로파일 이름
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// 완료 필드 이름
    pub fn completion_field(&self) -> &str {
        &self.definition.completion_field
    }

    /// 중단 마커
    pub fn stop_marker(&self) -> Option<&str> {
        self.definition.stop_marker.as_deref()
    }

    /// 컴파일된 규칙 목록
    pub fn rules(&self) -> &[ExtractionRule] {
        &self.rules
    }

    /// 파생 필드 목록
    pub fn derivations(&self) -> &[Derivation] {
        &self.definition.derivations
    }

    /// 원본 정의
    pub fn definition(&self) -> &ProfileDefinition {
        &self.definition
    }

    /// 라인이 중단 마커를 포함하는지 확인합니다.
    pub fn is_stop_line(&self, line: &str) -> bool {
        self.stop_marker()
            .is_some_and(|marker| line.contains(marker))
    }

    /// 모든 규칙을 순서대로 라인에 적용하고 매칭된 규칙 수를 반환합니다.
    pub fn apply_line(&self, line: &str, record: &mut Record) -> usize {
        self.rules
            .iter()
            .filter(|rule| rule.apply(line, record))
            .count()
    }

    /// 누적 레코드가 완료 필드를 포함하는지 확인합니다.
    pub fn is_complete(&self, record: &Record) -> bool {
        record.contains(self.completion_field())
    }

    /// 완료된 프레임에 파생 필드를 순서대로 적용합니다.
    ///
    /// # Errors
    /// - 입력 필드가 없으면 [`LogPipelineError::MissingField`]
    /// - 숫자/타임스탬프 파싱 실패 시 [`LogPipelineError::Derivation`]
    pub fn finalize(&self, mut record: Record) -> Result<Record, LogPipelineError> {
        for derivation in self.derivations() {
            match derivation {
                Derivation::Number { field } => {
                    let value = match self.required(&record, field)? {
                        FieldValue::Number(n) => *n,
                        FieldValue::Text(text) => parse_number(field, text)?,
                    };
                    record.insert(field.as_str(), value);
                }
                Derivation::Duration { start, end, into } => {
                    let started = self.required_timestamp(&record, start)?;
                    let ended = self.required_timestamp(&record, end)?;
                    record.remove(start);
                    record.remove(end);
                    record.insert(into.as_str(), elapsed_millis(started, ended));
                }
            }
        }
        Ok(record)
    }

    fn required<'r>(
        &self,
        record: &'r Record,
        field: &str,
    ) -> Result<&'r FieldValue, LogPipelineError> {
        record
            .get(field)
            .ok_or_else(|| LogPipelineError::MissingField {
                profile: self.name().to_owned(),
                field: field.to_owned(),
            })
    }

    fn required_timestamp(
        &self,
        record: &Record,
        field: &str,
    ) -> Result<chrono::NaiveDateTime, LogPipelineError> {
        let value = self.required(record, field)?.to_string();
        parse_log_timestamp(field, &value)
    }
}

/// Bitcoin Core `debug.log` 벤치마크 라인용 내장 정의
///
/// 프레임은 `Connect N transactions`(완료 필드 `txcount`)로 끝나며,
/// 최신 라인부터 역순으로 스캔된다는 전제입니다.
pub fn bitcoin_core_definition() -> ProfileDefinition {
    ProfileDefinition {
        name: CORE_PROFILE.to_owned(),
        description: "Bitcoin Core debug.log block connect timing (-debug=bench)".to_owned(),
        rules: vec![
            RuleDefinition::new(r"^(?P<time>.*) - Connect block: (?P<blocktime>[0-9.]*)ms"),
            RuleDefinition::new(
                r"UpdateTip: new best=(?P<hash>[0-9a-f]*) height=(?P<height>[0-9]*)",
            ),
            RuleDefinition::new(r"Connect (?P<txcount>[0-9]*) transactions"),
            RuleDefinition::new(r"Verify (?P<txincount>[0-9]*) txins"),
        ],
        completion_field: "txcount".to_owned(),
        stop_marker: None,
        derivations: vec![Derivation::Number {
            field: "blocktime".to_owned(),
        }],
    }
}

/// bitcrust `add_block` 로그용 내장 정의
pub fn bitcrust_definition() -> ProfileDefinition {
    ProfileDefinition {
        name: BITCRUST_PROFILE.to_owned(),
        description: "bitcrust add_block timing".to_owned(),
        rules: vec![
            RuleDefinition::new(r"^(?P<bc_start>.+) INFO add_block - start"),
            RuleDefinition::new(r"^(?P<bc_done>.+) INFO add_block - done"),
            RuleDefinition::new(r"^(?P<bc_connect_start>.+) INFO add_block - block-index"),
            RuleDefinition::new(r"^(?P<bc_connect_end>.+) INFO connected"),
            RuleDefinition::new(r"add_block - hashed, hash: (?P<hash>[0-9a-f]*)"),
        ],
        completion_field: "bc_start".to_owned(),
        stop_marker: Some("already exists".to_owned()),
        derivations: vec![
            Derivation::Duration {
                start: "bc_start".to_owned(),
                end: "bc_done".to_owned(),
                into: "bc_dur".to_owned(),
            },
            Derivation::Duration {
                start: "bc_connect_start".to_owned(),
                end: "bc_connect_end".to_owned(),
                into: "bc_cdur".to_owned(),
            },
        ],
    }
}
