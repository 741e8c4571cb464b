#![no_main]

use blockcmp_log_pipeline::parser::parse_number;
use blockcmp_log_pipeline::parser::timestamp::parse_log_timestamp;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|value: &str| {
    let _ = parse_log_timestamp("fuzz", value);
    let _ = parse_number("fuzz", value);
});
