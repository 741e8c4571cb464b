//! 비교 세션 -- 두 로그를 읽고, 추출하고, 해시로 조인합니다.
//!
//! # 흐름
//! ```text
//! bitcrust log --tail--> newest-first --extract--> records ─┐
//!                                                           ├─ join_by_hash --> blocks
//! core log     --tail--> newest-first --extract--> records ─┘
//! ```
//!
//! 두 로그 모두 완료 필드가 프레임의 시간상 첫 라인이므로 최신 라인부터
//! 역순으로 스캔합니다. 파일은 순차적으로 한 번씩 읽습니다.

use std::path::{Path, PathBuf};

use serde::Serialize;

use blockcmp_core::config::ErrorPolicy;
use blockcmp_core::types::Record;

use crate::collector::LogSnapshot;
use crate::config::PipelineConfig;
use crate::error::LogPipelineError;
use crate::extract::RecordExtractor;
use crate::join::join_by_hash;
use crate::rule::{BITCRUST_PROFILE, CORE_PROFILE, LogProfile, ProfileLoader};

/// 비교 결과
#[derive(Debug, Clone, Serialize)]
pub struct CompareReport {
    /// Core 로그 소스
    pub core_log: String,
    /// bitcrust 로그 소스
    pub bitcrust_log: String,
    /// Core 로그에서 읽은 라인 수
    pub core_lines: usize,
    /// bitcrust 로그에서 읽은 라인 수
    pub bitcrust_lines: usize,
    /// Core 레코드 수
    pub core_records: usize,
    /// bitcrust 레코드 수
    pub bitcrust_records: usize,
    /// 건너뛴 프레임 수 (skip 정책)
    pub skipped_frames: usize,
    /// 조인된 블록 (Core 순서)
    pub blocks: Vec<Record>,
}

/// 단일 로그 추출 결과
#[derive(Debug, Clone, Serialize)]
pub struct ExtractReport {
    /// 로그 소스
    pub source: String,
    /// 사용한 프로파일 이름
    pub profile: String,
    /// 읽은 라인 수
    pub lines_read: usize,
    /// 건너뛴 프레임 수
    pub skipped_frames: usize,
    /// 추출된 레코드 (최신 블록 먼저)
    pub records: Vec<Record>,
}

/// 비교 대상 로그 하나
#[derive(Debug, Clone)]
pub struct LogSource {
    /// 로그 파일 경로
    pub path: PathBuf,
    /// 적용할 프로파일
    pub profile: LogProfile,
}

/// 비교 세션
///
/// # 사용 예시
/// ```ignore
/// let config = PipelineConfig::from_core(&core_config);
/// let session = CompareSession::from_config(&config).await?;
/// let report = session.run().await?;
/// ```
#[derive(Debug, Clone)]
pub struct CompareSession {
    core: LogSource,
    bitcrust: LogSource,
    tail_lines: usize,
    policy: ErrorPolicy,
}

impl CompareSession {
    /// 새 빌더를 생성합니다.
    pub fn builder() -> CompareSessionBuilder {
        CompareSessionBuilder::new()
    }

    /// 설정에서 세션을 생성합니다. 프로파일 파일이 지정되면 디스크에서 로드합니다.
    pub async fn from_config(config: &PipelineConfig) -> Result<Self, LogPipelineError> {
        config.validate()?;

        let core_profile = resolve_profile(CORE_PROFILE, config.core_profile.as_deref()).await?;
        let bitcrust_profile =
            resolve_profile(BITCRUST_PROFILE, config.bitcrust_profile.as_deref()).await?;

        CompareSessionBuilder::new()
            .core(config.core_log.clone(), core_profile)
            .bitcrust(config.bitcrust_log.clone(), bitcrust_profile)
            .tail_lines(config.tail_lines)
            .error_policy(config.error_policy)
            .build()
    }

    /// Core 로그 소스
    pub fn core(&self) -> &LogSource {
        &self.core
    }

    /// bitcrust 로그 소스
    pub fn bitcrust(&self) -> &LogSource {
        &self.bitcrust
    }

    /// 두 로그를 읽어 비교합니다.
    ///
    /// # Errors
    /// - 로그 파일을 읽을 수 없으면 [`LogPipelineError::Collector`]
    /// - fail-fast 정책에서 잘못된 프레임을 만나면 해당 추출 에러
    pub async fn run(&self) -> Result<CompareReport, LogPipelineError> {
        let bitcrust = LogSnapshot::read(&self.bitcrust.path, self.tail_lines).await?;
        let core = LogSnapshot::read(&self.core.path, self.tail_lines).await?;
        self.compare_snapshots(&core, &bitcrust)
    }

    /// 메모리 상의 라인(시간순)으로 비교합니다.
    pub fn from_lines<S: AsRef<str>>(
        &self,
        core_lines: &[S],
        bitcrust_lines: &[S],
    ) -> Result<CompareReport, LogPipelineError> {
        let core = LogSnapshot::from_lines(
            self.core.path.display().to_string(),
            core_lines.iter().map(|l| l.as_ref().to_owned()),
        );
        let bitcrust = LogSnapshot::from_lines(
            self.bitcrust.path.display().to_string(),
            bitcrust_lines.iter().map(|l| l.as_ref().to_owned()),
        );
        self.compare_snapshots(&core, &bitcrust)
    }

    /// 이미 읽은 스냅샷으로 비교합니다.
    pub fn compare_snapshots(
        &self,
        core: &LogSnapshot,
        bitcrust: &LogSnapshot,
    ) -> Result<CompareReport, LogPipelineError> {
        let (bitcrust_records, bitcrust_skipped) =
            self.extract(&self.bitcrust.profile, bitcrust)?;
        let (core_records, core_skipped) = self.extract(&self.core.profile, core)?;

        let blocks: Vec<Record> = join_by_hash(&core_records, &bitcrust_records).collect();

        tracing::info!(
            core_records = core_records.len(),
            bitcrust_records = bitcrust_records.len(),
            blocks = blocks.len(),
            skipped = core_skipped + bitcrust_skipped,
            "compare completed"
        );

        Ok(CompareReport {
            core_log: core.source.clone(),
            bitcrust_log: bitcrust.source.clone(),
            core_lines: core.len(),
            bitcrust_lines: bitcrust.len(),
            core_records: core_records.len(),
            bitcrust_records: bitcrust_records.len(),
            skipped_frames: core_skipped + bitcrust_skipped,
            blocks,
        })
    }

    fn extract(
        &self,
        profile: &LogProfile,
        snapshot: &LogSnapshot,
    ) -> Result<(Vec<Record>, usize), LogPipelineError> {
        let mut extractor =
            RecordExtractor::new(profile, snapshot.newest_first()).with_policy(self.policy);
        let records = extractor.by_ref().collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            profile = %profile.name(),
            source = %snapshot.source,
            lines = snapshot.len(),
            scanned = extractor.lines_scanned(),
            records = records.len(),
            "extracted records"
        );

        Ok((records, extractor.skipped()))
    }
}

/// 비교 세션 빌더
///
/// 프로파일을 지정하지 않으면 내장 프로파일을 사용합니다.
#[derive(Default)]
pub struct CompareSessionBuilder {
    core_log: Option<PathBuf>,
    core_profile: Option<LogProfile>,
    bitcrust_log: Option<PathBuf>,
    bitcrust_profile: Option<LogProfile>,
    tail_lines: Option<usize>,
    policy: ErrorPolicy,
}

impl CompareSessionBuilder {
    /// 새 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// Core 로그와 프로파일을 설정합니다.
    pub fn core(mut self, path: impl Into<PathBuf>, profile: LogProfile) -> Self {
        self.core_log = Some(path.into());
        self.core_profile = Some(profile);
        self
    }

    /// Core 로그 경로만 설정합니다 (내장 프로파일).
    pub fn core_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.core_log = Some(path.into());
        self
    }

    /// bitcrust 로그와 프로파일을 설정합니다.
    pub fn bitcrust(mut self, path: impl Into<PathBuf>, profile: LogProfile) -> Self {
        self.bitcrust_log = Some(path.into());
        self.bitcrust_profile = Some(profile);
        self
    }

    /// bitcrust 로그 경로만 설정합니다 (내장 프로파일).
    pub fn bitcrust_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.bitcrust_log = Some(path.into());
        self
    }

    /// tail 라인 수를 설정합니다.
    pub fn tail_lines(mut self, lines: usize) -> Self {
        self.tail_lines = Some(lines);
        self
    }

    /// 에러 처리 정책을 설정합니다.
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 세션을 생성합니다.
    ///
    /// 지정하지 않은 값은 [`PipelineConfig::default`]를 따릅니다.
    pub fn build(self) -> Result<CompareSession, LogPipelineError> {
        let defaults = PipelineConfig::default();

        let config = PipelineConfig {
            core_log: self.core_log.unwrap_or(defaults.core_log),
            bitcrust_log: self.bitcrust_log.unwrap_or(defaults.bitcrust_log),
            tail_lines: self.tail_lines.unwrap_or(defaults.tail_lines),
            core_profile: None,
            bitcrust_profile: None,
            error_policy: self.policy,
        };
        config.validate()?;

        let core_profile = match self.core_profile {
            Some(profile) => profile,
            None => LogProfile::builtin(CORE_PROFILE)?,
        };
        let bitcrust_profile = match self.bitcrust_profile {
            Some(profile) => profile,
            None => LogProfile::builtin(BITCRUST_PROFILE)?,
        };

        Ok(CompareSession {
            core: LogSource {
                path: config.core_log,
                profile: core_profile,
            },
            bitcrust: LogSource {
                path: config.bitcrust_log,
                profile: bitcrust_profile,
            },
            tail_lines: config.tail_lines,
            policy: config.error_policy,
        })
    }
}

/// 프로파일 파일이 있으면 로드하고, 없으면 내장 프로파일을 사용합니다.
pub async fn resolve_profile(
    builtin: &str,
    path: Option<&Path>,
) -> Result<LogProfile, LogPipelineError> {
    match path {
        Some(path) => ProfileLoader::load_file(path).await,
        None => LogProfile::builtin(builtin),
    }
}

/// 로그 하나만 읽어 레코드를 추출합니다.
pub async fn extract_only(
    profile: &LogProfile,
    path: impl AsRef<Path>,
    tail_lines: usize,
    policy: ErrorPolicy,
) -> Result<ExtractReport, LogPipelineError> {
    if tail_lines == 0 {
        return Err(LogPipelineError::Config {
            field: "tail_lines".to_owned(),
            reason: "must be greater than 0".to_owned(),
        });
    }

    let snapshot = LogSnapshot::read(path, tail_lines).await?;
    let mut extractor = RecordExtractor::new(profile, snapshot.newest_first()).with_policy(policy);
    let records = extractor.by_ref().collect::<Result<Vec<_>, _>>()?;

    tracing::info!(
        profile = %profile.name(),
        source = %snapshot.source,
        records = records.len(),
        skipped = extractor.skipped(),
        "extract completed"
    );

    Ok(ExtractReport {
        source: snapshot.source.clone(),
        profile: profile.name().to_owned(),
        lines_read: snapshot.len(),
        skipped_frames: extractor.skipped(),
        records,
    })
}
