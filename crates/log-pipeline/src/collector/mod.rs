//! 로그 수집 모듈 -- 로그 파일의 tail 스냅샷을 읽습니다.
//!
//! # 수집 소스
//! - 일반 파일: 끝에서부터 역방향 청크 읽기
//! - 파이프, 문자 장치: 순차 읽기 + 링 버퍼
//!
//! 두 로그는 순차적으로 한 번씩만 읽으며, 읽은 결과는 [`LogSnapshot`]으로 보관합니다.

pub mod file;

pub use file::read_tail;

use std::path::Path;

/// 한 로그 소스의 tail 스냅샷
///
/// 라인은 시간순(오래된 것 먼저)으로 저장되며, 추출기는 보통
/// [`newest_first`](Self::newest_first)로 최신 라인부터 스캔합니다.
#[derive(Debug, Clone, Default)]
pub struct LogSnapshot {
    /// 소스 식별자 (파일 경로)
    pub source: String,
    /// 라인 목록 (시간순)
    pub lines: Vec<String>,
}

impl LogSnapshot {
    /// 파일의 마지막 `max_lines`개 라인을 읽어 스냅샷을 만듭니다.
    pub async fn read(
        path: impl AsRef<Path>,
        max_lines: usize,
    ) -> Result<Self, crate::error::LogPipelineError> {
        let path = path.as_ref();
        let lines = read_tail(path, max_lines).await?;
        Ok(Self {
            source: path.display().to_string(),
            lines,
        })
    }

    /// 메모리 상의 라인으로 스냅샷을 만듭니다.
    pub fn from_lines<I, S>(source: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: source.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// 최신 라인부터 역순으로 순회합니다.
    pub fn newest_first(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().rev().map(String::as_str)
    }

    /// 시간순으로 순회합니다.
    pub fn oldest_first(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// 라인 수
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// 라인이 없는지 여부
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first_reverses_order() {
        let snapshot = LogSnapshot::from_lines("mem", ["a", "b", "c"]);
        let lines: Vec<&str> = snapshot.newest_first().collect();
        assert_eq!(lines, vec!["c", "b", "a"]);
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn empty_snapshot() {
        let snapshot = LogSnapshot::from_lines("mem", Vec::<String>::new());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.newest_first().count(), 0);
    }

    #[tokio::test]
    async fn read_from_file_records_source() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"first\nsecond\n").unwrap();

        let snapshot = LogSnapshot::read(file.path(), 10).await.unwrap();
        assert_eq!(snapshot.source, file.path().display().to_string());
        assert_eq!(snapshot.oldest_first().collect::<Vec<_>>(), vec!["first", "second"]);
    }
}
