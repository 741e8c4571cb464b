//! 레코드 추출기 -- 라인 시퀀스를 완료된 블록 레코드 시퀀스로 변환합니다.
//!
//! 하나의 누적 레코드를 유지하며 라인마다 프로파일의 규칙을 순서대로 적용합니다.
//! 완료 필드가 누적 레코드에 나타나면 파생 필드를 계산한 뒤 레코드를 내보내고
//! 누적 레코드를 비웁니다.
//!
//! # 동작 규칙
//! - 매칭되지 않는 라인은 누적 레코드를 바꾸지 않음
//! - 중단 마커를 포함한 라인을 만나면 규칙 적용 전에 스캔 전체를 종료
//! - 입력 끝에 남은 미완료 프레임은 버림
//! - 한 번 `None`을 반환하면 계속 `None` (fused)

use std::iter::FusedIterator;

use blockcmp_core::config::ErrorPolicy;
use blockcmp_core::types::Record;

use crate::error::LogPipelineError;
use crate::rule::LogProfile;

/// 레코드 추출 반복자
///
/// # 사용 예시
/// ```ignore
/// let profile = LogProfile::builtin("core")?;
/// let mut extractor = RecordExtractor::new(&profile, snapshot.newest_first())
///     .with_policy(ErrorPolicy::Skip);
/// let records: Vec<Record> = extractor.by_ref().collect::<Result<_, _>>()?;
/// println!("skipped {}", extractor.skipped());
/// ```
pub struct RecordExtractor<'p, I> {
    /// 적용할 프로파일
    profile: &'p LogProfile,
    /// 입력 라인
    lines: I,
    /// 현재 프레임 누적 레코드
    accumulator: Record,
    /// 파생 필드 실패 처리 정책
    policy: ErrorPolicy,
    /// 건너뛴 프레임 수
    skipped: usize,
    /// 처리한 라인 수
    lines_scanned: usize,
    /// 종료 여부
    finished: bool,
}

impl<'p, I, S> RecordExtractor<'p, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    /// 새 추출기를 생성합니다. 기본 정책은 fail-fast입니다.
    pub fn new(profile: &'p LogProfile, lines: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            profile,
            lines: lines.into_iter(),
            accumulator: Record::new(),
            policy: ErrorPolicy::default(),
            skipped: 0,
            lines_scanned: 0,
            finished: false,
        }
    }

    /// 에러 처리 정책을 설정합니다.
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 건너뛴 프레임 수 (`Skip` 정책에서만 증가)
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// 지금까지 처리한 라인 수
    pub fn lines_scanned(&self) -> usize {
        self.lines_scanned
    }

    /// 현재 누적 레코드
    pub fn pending(&self) -> &Record {
        &self.accumulator
    }

    fn finish(&mut self) {
        self.finished = true;
        if !self.accumulator.is_empty() {
            tracing::debug!(
                profile = %self.profile.name(),
                fields = self.accumulator.len(),
                "discarding incomplete trailing frame"
            );
            self.accumulator = Record::new();
        }
    }
}

impl<I, S> Iterator for RecordExtractor<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Result<Record, LogPipelineError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while let Some(line) = self.lines.next() {
            let line = line.as_ref();
            self.lines_scanned += 1;

            if self.profile.is_stop_line(line) {
                tracing::debug!(
                    profile = %self.profile.name(),
                    line = self.lines_scanned,
                    "stop marker reached, aborting scan"
                );
                self.finish();
                return None;
            }

            self.profile.apply_line(line, &mut self.accumulator);

            if !self.profile.is_complete(&self.accumulator) {
                continue;
            }

            let frame = std::mem::take(&mut self.accumulator);
            match self.profile.finalize(frame) {
                Ok(record) => {
                    tracing::debug!(
                        profile = %self.profile.name(),
                        hash = record.hash().unwrap_or("-"),
                        fields = record.len(),
                        "frame completed"
                    );
                    return Some(Ok(record));
                }
                Err(e) => match self.policy {
                    ErrorPolicy::FailFast => {
                        self.finish();
                        return Some(Err(e));
                    }
                    ErrorPolicy::Skip => {
                        self.skipped += 1;
                        tracing::warn!(
                            profile = %self.profile.name(),
                            line = self.lines_scanned,
                            error = %e,
                            "skipping malformed frame"
                        );
                    }
                },
            }
        }

        self.finish();
        None
    }
}

impl<I, S> FusedIterator for RecordExtractor<'_, I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
}

/// 라인 시퀀스에서 모든 레코드를 추출합니다.
///
/// 반환값은 (레코드 목록, 건너뛴 프레임 수)입니다.
///
/// # Errors
/// fail-fast 정책에서 첫 번째 파생 필드 에러를 반환합니다.
pub fn extract_records<I, S>(
    profile: &LogProfile,
    lines: I,
    policy: ErrorPolicy,
) -> Result<(Vec<Record>, usize), LogPipelineError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut extractor = RecordExtractor::new(profile, lines).with_policy(policy);
    let records = extractor.by_ref().collect::<Result<Vec<_>, _>>()?;
    Ok((records, extractor.skipped()))
}
