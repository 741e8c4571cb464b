#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`collector`]: 로그 파일 tail 스냅샷 읽기 (역방향 청크 읽기)
//! - [`parser`]: 타임스탬프/숫자 필드 파싱
//! - [`rule`]: 선언적 로그 프로파일 (정규식 규칙, 완료 필드, 중단 마커, 파생 필드)
//! - [`extract`]: 라인 시퀀스 -> 블록 레코드 반복자
//! - [`join`]: 해시 기준 중첩 조인
//! - [`render`]: `{{ field }}` 템플릿 기반 HTML 렌더링
//! - [`compare`]: 전체 비교 흐름 (읽기 -> 추출 -> 조인)
//! - [`config`]: 파이프라인 설정 (core 설정 변환)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! LogSnapshot -> RecordExtractor(LogProfile) -> join_by_hash -> HtmlRenderer / JSON
//!      |                  |                          |
//!  tail N lines     regex rules + derivations    core ⋈ bitcrust
//! ```

pub mod compare;
pub mod config;
pub mod error;
pub mod extract;
pub mod join;
pub mod render;

pub mod collector;
pub mod parser;
pub mod rule;

// --- 주요 타입 re-export ---

// 비교 세션
pub use compare::{CompareReport, CompareSession, CompareSessionBuilder, ExtractReport, extract_only};

// 설정
pub use config::{PipelineConfig, PipelineConfigBuilder};

// 에러
pub use error::LogPipelineError;

// 추출/조인/렌더링
pub use extract::{RecordExtractor, extract_records};
pub use join::join_by_hash;
pub use render::{HtmlRenderer, Template};

// 프로파일
pub use rule::{LogProfile, ProfileDefinition, ProfileLoader};

// 수집기
pub use collector::LogSnapshot;
