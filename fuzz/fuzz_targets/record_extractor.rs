#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use blockcmp_core::config::ErrorPolicy;
use blockcmp_log_pipeline::rule::{BITCRUST_PROFILE, CORE_PROFILE};
use blockcmp_log_pipeline::{LogProfile, RecordExtractor};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    bitcrust: bool,
    skip: bool,
    lines: Vec<String>,
}

fuzz_target!(|input: FuzzInput| {
    let name = if input.bitcrust {
        BITCRUST_PROFILE
    } else {
        CORE_PROFILE
    };
    let Ok(profile) = LogProfile::builtin(name) else {
        return;
    };
    let policy = if input.skip {
        ErrorPolicy::Skip
    } else {
        ErrorPolicy::FailFast
    };

    // 라인 수 제한 (성능)
    let lines: Vec<String> = input.lines.into_iter().take(256).collect();
    let mut extractor = RecordExtractor::new(&profile, &lines).with_policy(policy);

    let mut emitted = 0usize;
    for result in extractor.by_ref() {
        match result {
            Ok(record) => {
                assert!(!record.is_empty());
                emitted += 1;
            }
            Err(_) => assert_eq!(policy, ErrorPolicy::FailFast),
        }
    }

    // 완료된 프레임은 최소 한 라인을 소비함
    assert!(emitted + extractor.skipped() <= extractor.lines_scanned());
});
