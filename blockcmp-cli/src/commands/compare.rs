//! `blockcmp compare` command handler

use std::io::Write;
use std::path::Path;

use tracing::info;

use blockcmp_core::config::{BlockcmpConfig, ErrorPolicy};
use blockcmp_core::types::Record;
use blockcmp_log_pipeline::{
    CompareReport, CompareSession, HtmlRenderer, PipelineConfig, PipelineConfigBuilder,
};

use crate::cli::CompareArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `compare` command.
///
/// Loads the configuration (a missing file falls back to defaults), applies
/// the flag overrides, then reads both log tails and joins the records.
pub async fn execute(
    args: CompareArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = BlockcmpConfig::load_or_default(config_path).await?;
    let pipeline = pipeline_config(&config, &args)?;

    info!(
        core_log = %pipeline.core_log.display(),
        bitcrust_log = %pipeline.bitcrust_log.display(),
        tail_lines = pipeline.tail_lines,
        policy = %pipeline.error_policy,
        "comparing logs"
    );

    let session = CompareSession::from_config(&pipeline).await?;
    let report = session.run().await?;

    writer.render(&report)?;
    Ok(())
}

/// Merge the configuration file with command-line overrides.
fn pipeline_config(
    config: &BlockcmpConfig,
    args: &CompareArgs,
) -> Result<PipelineConfig, CliError> {
    let mut builder = PipelineConfigBuilder::from_config(PipelineConfig::from_core(config));

    if let Some(path) = args.core_log.clone() {
        builder = builder.core_log(path);
    }
    if let Some(path) = args.bitcrust_log.clone() {
        builder = builder.bitcrust_log(path);
    }
    if let Some(lines) = args.lines {
        builder = builder.tail_lines(lines);
    }
    if args.skip_malformed {
        builder = builder.error_policy(ErrorPolicy::Skip);
    }

    Ok(builder.build()?)
}

/// Write records as `key=value` lines separated by blank lines.
pub(crate) fn write_records(w: &mut dyn Write, records: &[Record]) -> std::io::Result<()> {
    use colored::Colorize;

    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        for (field, value) in record.iter() {
            writeln!(w, "{}={}", field.cyan(), value)?;
        }
    }
    Ok(())
}

/// Render records through the built-in block template.
pub(crate) fn write_html(w: &mut dyn Write, records: &[Record]) -> std::io::Result<()> {
    let renderer = HtmlRenderer::new().map_err(std::io::Error::other)?;
    w.write_all(renderer.render_document(records).as_bytes())
}

impl Render for CompareReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Compare: {} <-> {}",
            self.core_log.bold(),
            self.bitcrust_log.bold()
        )?;
        writeln!(
            w,
            "  Lines read: core={} bitcrust={}",
            self.core_lines, self.bitcrust_lines
        )?;
        writeln!(
            w,
            "  Records: core={} bitcrust={}",
            self.core_records, self.bitcrust_records
        )?;
        if self.skipped_frames > 0 {
            writeln!(
                w,
                "  Skipped frames: {}",
                self.skipped_frames.to_string().yellow().bold()
            )?;
        }

        let joined = self.blocks.len().to_string();
        if self.blocks.is_empty() {
            writeln!(w, "  Joined blocks: {}", joined.red().bold())?;
            return Ok(());
        }
        writeln!(w, "  Joined blocks: {}", joined.green().bold())?;
        writeln!(w)?;

        write_records(w, &self.blocks)
    }

    fn render_html(&self, w: &mut dyn Write) -> std::io::Result<()> {
        write_html(w, &self.blocks)
    }
}
