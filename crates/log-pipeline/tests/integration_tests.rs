//! 통합 테스트 -- 비교 파이프라인 전체 흐름 검증
//!
//! 디스크의 로그 파일을 읽어 추출, 조인, 렌더링까지 확인합니다.

use std::io::Write;
use std::path::Path;

use blockcmp_core::config::{BlockcmpConfig, ErrorPolicy};
use blockcmp_log_pipeline::{
    CompareSession, HtmlRenderer, LogPipelineError, LogProfile, PipelineConfig,
    PipelineConfigBuilder, ProfileLoader, extract_only,
};

/// Core 로그 블록 하나 (시간순)
fn core_block(hash: &str, height: u32, blocktime: &str) -> String {
    format!(
        "2017-06-02 14:03:21       - Connect 3 transactions: 0.41ms (0.137ms/tx, 0.041ms/txin) [0.00s]\n\
         2017-06-02 14:03:21     - Verify 10 txins: 0.22ms (0.022ms/txin) [0.00s]\n\
         2017-06-02 14:03:21     - Index writing: 0.01ms [0.00s]\n\
         2017-06-02 14:03:21   - Connect total: 0.70ms [0.00s]\n\
         2017-06-02 14:03:21 UpdateTip: new best={hash} height={height} version=0x20000000 log2_work=70.1 tx=8 date='2017-06-02 14:03:20' progress=1.000000 cache=0.0MiB(1tx)\n\
         2017-06-02 14:03:21 - Connect block: {blocktime}ms [0.12s]\n"
    )
}

/// bitcrust 로그 블록 하나 (시간순, slog-term compact 형식)
fn bitcrust_block(hash: &str, second: u32) -> String {
    format!(
        "Jun 02 14:03:{second:02}.100 INFO add_block - start\n\
         Jun 02 14:03:{second:02}.101 INFO add_block - hashed, hash: {hash}\n\
         Jun 02 14:03:{second:02}.102 INFO add_block - block-index\n\
         Jun 02 14:03:{second:02}.106 INFO connected\n\
         Jun 02 14:03:{second:02}.110 INFO add_block - done\n"
    )
}

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("failed to create file");
    file.write_all(content.as_bytes()).expect("failed to write file");
    path
}

/// 한 블록이 양쪽 로그에 모두 있는 기본 시나리오
#[tokio::test]
async fn test_compare_end_to_end() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let core_log = write_file(temp_dir.path(), "debug.log", &core_block("aa11", 5, "120.5"));
    let bc_log = write_file(temp_dir.path(), "cmp1", &bitcrust_block("aa11", 21));

    let config = PipelineConfigBuilder::new()
        .core_log(&core_log)
        .bitcrust_log(&bc_log)
        .tail_lines(1000)
        .build()
        .expect("valid config");

    let session = CompareSession::from_config(&config).await.expect("session");
    let report = session.run().await.expect("compare run");

    assert_eq!(report.core_records, 1);
    assert_eq!(report.bitcrust_records, 1);
    assert_eq!(report.blocks.len(), 1);

    let block = &report.blocks[0];
    assert_eq!(block.hash(), Some("aa11"));
    assert_eq!(block.get_text("height"), Some("5"));
    assert_eq!(block.get_text("txcount"), Some("3"));
    assert_eq!(block.get_text("txincount"), Some("10"));
    assert_eq!(block.get_number("blocktime"), Some(120.5));
    assert!((block.get_number("bc_dur").expect("bc_dur") - 10.0).abs() < 1e-6);
    assert!((block.get_number("bc_cdur").expect("bc_cdur") - 4.0).abs() < 1e-6);
    assert!(!block.contains("bc_start"));
    assert!(!block.contains("bc_connect_end"));
}

/// 여러 블록 중 일부만 매칭되는 시나리오 -- 출력은 Core 최신 블록 순서
#[tokio::test]
async fn test_compare_partial_overlap() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");

    let mut core = String::new();
    core.push_str(&core_block("aa11", 5, "100.0"));
    core.push_str(&core_block("bb22", 6, "200.0"));
    core.push_str(&core_block("cc33", 7, "300.0"));

    let mut bc = String::new();
    bc.push_str(&bitcrust_block("bb22", 21));
    bc.push_str(&bitcrust_block("cc33", 22));
    bc.push_str(&bitcrust_block("dd44", 23));

    let core_log = write_file(temp_dir.path(), "debug.log", &core);
    let bc_log = write_file(temp_dir.path(), "cmp1", &bc);

    let session = CompareSession::builder()
        .core_log(&core_log)
        .bitcrust_log(&bc_log)
        .build()
        .expect("session");
    let report = session.run().await.expect("compare run");

    assert_eq!(report.core_records, 3);
    assert_eq!(report.bitcrust_records, 3);
    let hashes: Vec<&str> = report.blocks.iter().filter_map(|b| b.hash()).collect();
    assert_eq!(hashes, vec!["cc33", "bb22"]);
}

/// `already exists` 이전(시간상 이후)의 블록만 수집됨
#[tokio::test]
async fn test_bitcrust_stop_marker() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");

    let mut bc = String::new();
    bc.push_str(&bitcrust_block("aa11", 20));
    bc.push_str("Jun 02 14:03:20.500 INFO add_block - block already exists\n");
    bc.push_str(&bitcrust_block("bb22", 21));

    let mut core = String::new();
    core.push_str(&core_block("aa11", 5, "100.0"));
    core.push_str(&core_block("bb22", 6, "200.0"));

    let core_log = write_file(temp_dir.path(), "debug.log", &core);
    let bc_log = write_file(temp_dir.path(), "cmp1", &bc);

    let session = CompareSession::builder()
        .core_log(&core_log)
        .bitcrust_log(&bc_log)
        .build()
        .expect("session");
    let report = session.run().await.expect("compare run");

    assert_eq!(report.bitcrust_records, 1);
    assert_eq!(report.blocks.len(), 1);
    assert_eq!(report.blocks[0].hash(), Some("bb22"));
}

/// tail 윈도우 밖의 블록은 보이지 않음
#[tokio::test]
async fn test_tail_window_limits_input() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");

    let mut core = String::new();
    core.push_str(&core_block("aa11", 5, "100.0"));
    core.push_str(&core_block("bb22", 6, "200.0"));
    let mut bc = String::new();
    bc.push_str(&bitcrust_block("aa11", 20));
    bc.push_str(&bitcrust_block("bb22", 21));

    let core_log = write_file(temp_dir.path(), "debug.log", &core);
    let bc_log = write_file(temp_dir.path(), "cmp1", &bc);

    // Core 블록은 6줄, bitcrust 블록은 5줄 -- 마지막 6줄이면 각각 최신 블록 하나
    let session = CompareSession::builder()
        .core_log(&core_log)
        .bitcrust_log(&bc_log)
        .tail_lines(6)
        .build()
        .expect("session");
    let report = session.run().await.expect("compare run");

    assert_eq!(report.core_lines, 6);
    assert_eq!(report.core_records, 1);
    assert_eq!(report.blocks.len(), 1);
    assert_eq!(report.blocks[0].hash(), Some("bb22"));
}

/// 잘못된 타임스탬프 -- fail-fast는 에러, skip은 건너뛰고 계속
#[tokio::test]
async fn test_error_policies() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");

    let mut bc = String::new();
    bc.push_str(&bitcrust_block("aa11", 20));
    bc.push_str(&bitcrust_block("bb22", 21).replace("Jun 02 14:03:21.110", "garbage"));

    let core_log = write_file(temp_dir.path(), "debug.log", &core_block("aa11", 5, "1.0"));
    let bc_log = write_file(temp_dir.path(), "cmp1", &bc);

    let fail_fast = CompareSession::builder()
        .core_log(&core_log)
        .bitcrust_log(&bc_log)
        .build()
        .expect("session");
    let err = fail_fast.run().await.expect_err("must fail");
    assert!(matches!(err, LogPipelineError::Derivation { .. }));

    let skip = CompareSession::builder()
        .core_log(&core_log)
        .bitcrust_log(&bc_log)
        .error_policy(ErrorPolicy::Skip)
        .build()
        .expect("session");
    let report = skip.run().await.expect("compare run");
    assert_eq!(report.skipped_frames, 1);
    assert_eq!(report.blocks.len(), 1);
    assert_eq!(report.blocks[0].hash(), Some("aa11"));
}

/// 존재하지 않는 로그 파일
#[tokio::test]
async fn test_missing_log_file() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let bc_log = write_file(temp_dir.path(), "cmp1", &bitcrust_block("aa11", 20));

    let session = CompareSession::builder()
        .core_log(temp_dir.path().join("missing.log"))
        .bitcrust_log(&bc_log)
        .build()
        .expect("session");
    let err = session.run().await.expect_err("must fail");
    assert!(matches!(err, LogPipelineError::Collector { .. }));
}

/// 사용자 YAML 프로파일로 비교
#[tokio::test]
async fn test_custom_profile_from_config() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");

    let profile_yaml = r#"
name: bitcrust-lite
completion_field: bc_start
stop_marker: already exists
rules:
  - pattern: '^(?P<bc_start>.+) INFO add_block - start'
  - pattern: 'add_block - hashed, hash: (?P<hash>[0-9a-f]*)'
  - pattern: '^(?P<bc_done>.+) INFO add_block - done'
derivations:
  - duration:
      start: bc_start
      end: bc_done
      into: bc_dur
"#;
    let profile_path = write_file(temp_dir.path(), "bitcrust.yml", profile_yaml);
    let core_log = write_file(temp_dir.path(), "debug.log", &core_block("aa11", 5, "1.5"));
    let bc_log = write_file(temp_dir.path(), "cmp1", &bitcrust_block("aa11", 20));

    let mut core_config = BlockcmpConfig::default();
    core_config.sources.core_log = core_log.display().to_string();
    core_config.sources.bitcrust_log = bc_log.display().to_string();
    core_config.sources.bitcrust_profile = profile_path.display().to_string();

    let config = PipelineConfig::from_core(&core_config);
    let session = CompareSession::from_config(&config).await.expect("session");
    assert_eq!(session.bitcrust().profile.name(), "bitcrust-lite");

    let report = session.run().await.expect("compare run");
    assert_eq!(report.blocks.len(), 1);
    let block = &report.blocks[0];
    assert!(block.contains("bc_dur"));
    assert!(!block.contains("bc_cdur"));
}

/// 잘못된 프로파일 파일은 세션 생성 단계에서 실패
#[tokio::test]
async fn test_invalid_profile_file() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let profile_path = write_file(
        temp_dir.path(),
        "broken.yml",
        "name: broken\ncompletion_field: x\nrules:\n  - pattern: '(?P<x'\n",
    );

    let result = ProfileLoader::load_file(&profile_path).await;
    assert!(matches!(
        result,
        Err(LogPipelineError::ProfileValidation { .. })
    ));
}

/// 단일 로그 추출 + HTML 렌더링
#[tokio::test]
async fn test_extract_and_render() {
    let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
    let core_log = write_file(temp_dir.path(), "debug.log", &core_block("aa11", 5, "120.5"));

    let profile = LogProfile::builtin("core").expect("builtin profile");
    let report = extract_only(&profile, &core_log, 1000, ErrorPolicy::FailFast)
        .await
        .expect("extract");
    assert_eq!(report.records.len(), 1);

    let renderer = HtmlRenderer::new().expect("template");
    let html = renderer.render_document(&report.records);
    assert!(html.starts_with("<ul class='graph'>"));
    assert!(html.trim_end().ends_with("</ul>"));
    assert!(html.contains("aa11"));
    assert!(html.contains("120.5 ms"));
}
