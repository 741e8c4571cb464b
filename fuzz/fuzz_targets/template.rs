#![no_main]

use blockcmp_core::types::Record;
use blockcmp_log_pipeline::Template;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, Vec<(String, String)>)| {
    let (source, fields) = data;
    let Ok(template) = Template::parse(source) else {
        return;
    };

    let record: Record = fields.into_iter().take(16).collect();
    let _ = template.render(&record);
});
