//! 파일 기반 로그 tail 읽기
//!
//! 파일 끝에서부터 고정 크기 청크로 거꾸로 읽어 마지막 N개 라인만 가져옵니다.
//! 수백 MB 크기의 `debug.log`도 앞부분을 스캔하지 않고 처리할 수 있습니다.
//!
//! 일반 파일이 아닌 입력(파이프, 문자 장치)은 처음부터 순차로 읽으며 링 버퍼에 마지막 N개만 유지합니다.
//!
//! 라이브 append 추적(`tail -f`)은 하지 않으며, 호출 시점의 스냅샷 한 번만 읽습니다.

use std::collections::VecDeque;
use std::io::SeekFrom;
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncSeekExt, BufReader};

use crate::error::LogPipelineError;

/// 역방향 읽기 청크 크기
const CHUNK_SIZE: u64 = 64 * 1024; // 64KB

/// 파일의 마지막 `max_lines`개 라인을 시간순(오래된 것 먼저)으로 반환합니다.
///
/// 바이트는 손실 허용 UTF-8로 디코딩하며 `\r\n` 줄끝도 허용합니다.
/// 파일 끝의 개행은 빈 라인을 만들지 않습니다.
///
/// # Errors
/// 파일을 열거나 읽을 수 없으면 [`LogPipelineError::Collector`]를 반환합니다.
pub async fn read_tail(
    path: impl AsRef<Path>,
    max_lines: usize,
) -> Result<Vec<String>, LogPipelineError> {
    read_tail_chunked(path.as_ref(), max_lines, CHUNK_SIZE).await
}

async fn read_tail_chunked(
    path: &Path,
    max_lines: usize,
    chunk_size: u64,
) -> Result<Vec<String>, LogPipelineError> {
    let collector_err = |e: std::io::Error| LogPipelineError::Collector {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let mut file = File::open(path).await.map_err(collector_err)?;

    if max_lines == 0 {
        return Ok(Vec::new());
    }

    let metadata = file.metadata().await.map_err(collector_err)?;
    if !metadata.is_file() {
        tracing::debug!(path = %path.display(), "not a regular file, reading sequentially");
        return tail_lines(BufReader::new(file), max_lines, &path.display().to_string()).await;
    }

    let len = metadata.len();
    let mut pos = len;
    let mut tail: Vec<u8> = Vec::new();
    let mut newlines = 0usize;

    // 부분 라인을 버릴 수 있도록 N+1개의 개행을 볼 때까지 읽음
    while pos > 0 && newlines <= max_lines {
        let read_len = chunk_size.min(pos);
        pos -= read_len;

        file.seek(SeekFrom::Start(pos))
            .await
            .map_err(collector_err)?;

        let mut chunk = vec![0u8; read_len as usize];
        file.read_exact(&mut chunk).await.map_err(collector_err)?;

        newlines += chunk.iter().filter(|b| **b == b'\n').count();
        chunk.extend_from_slice(&tail);
        tail = chunk;
    }

    let lines = last_lines(&tail, max_lines);

    tracing::debug!(
        path = %path.display(),
        file_size = len,
        bytes_read = tail.len(),
        lines = lines.len(),
        "read log tail"
    );

    Ok(lines)
}

/// 바이트 버퍼에서 마지막 `max_lines`개 라인을 추출합니다.
fn last_lines(bytes: &[u8], max_lines: usize) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].iter().map(|line| (*line).to_owned()).collect()
}

/// 비동기 리더에서 마지막 `max_lines`개 라인을 반환합니다.
///
/// 탐색이 불가능한 입력용이며, 최대 `max_lines`개 라인만
/// 링 버퍼에 유지합니다. `source`는 에러 메시지에만 쓰입니다.
async fn tail_lines<R>(
    mut reader: R,
    max_lines: usize,
    source: &str,
) -> Result<Vec<String>, LogPipelineError>
where
    R: AsyncBufRead + Unpin,
{
    let mut ring: VecDeque<String> = VecDeque::with_capacity(max_lines.min(4096));
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .await
            .map_err(|e| LogPipelineError::Collector {
                path: source.to_owned(),
                reason: e.to_string(),
            })?;

        if read == 0 {
            break;
        }

        if max_lines == 0 {
            continue;
        }

        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        if ring.len() == max_lines {
            ring.pop_front();
        }
        ring.push_back(String::from_utf8_lossy(&buf).into_owned());
    }

    Ok(ring.into())
}
