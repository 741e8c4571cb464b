//! `blockcmp extract` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use blockcmp_core::config::{BlockcmpConfig, ErrorPolicy};
use blockcmp_log_pipeline::compare::resolve_profile;
use blockcmp_log_pipeline::{ExtractReport, extract_only};

use crate::cli::{ExtractArgs, LogKind};
use crate::commands::compare::{write_html, write_records};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `extract` command.
///
/// Path and profile come from the flags, then the configuration file, then
/// the built-in defaults.
pub async fn execute(
    args: ExtractArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = BlockcmpConfig::load_or_default(config_path).await?;
    let plan = ExtractPlan::resolve(&config, args);

    info!(
        kind = ?plan.kind,
        log = %plan.log.display(),
        tail_lines = plan.tail_lines,
        "extracting records"
    );

    let profile = resolve_profile(plan.kind.profile_name(), plan.profile.as_deref()).await?;
    let report = extract_only(&profile, &plan.log, plan.tail_lines, plan.policy).await?;

    writer.render(&report)?;
    Ok(())
}

/// Effective inputs for one extraction.
#[derive(Debug)]
struct ExtractPlan {
    kind: LogKind,
    log: PathBuf,
    profile: Option<PathBuf>,
    tail_lines: usize,
    policy: ErrorPolicy,
}

impl ExtractPlan {
    fn resolve(config: &BlockcmpConfig, args: ExtractArgs) -> Self {
        let sources = &config.sources;
        let (configured_log, configured_profile) = match args.kind {
            LogKind::Core => (&sources.core_log, &sources.core_profile),
            LogKind::Bitcrust => (&sources.bitcrust_log, &sources.bitcrust_profile),
        };

        let profile = args.profile.or_else(|| {
            (!configured_profile.is_empty()).then(|| PathBuf::from(configured_profile))
        });

        let policy = if args.skip_malformed {
            ErrorPolicy::Skip
        } else {
            config.compare.error_policy
        };

        Self {
            kind: args.kind,
            log: args.log.unwrap_or_else(|| PathBuf::from(configured_log)),
            profile,
            tail_lines: args.lines.unwrap_or(sources.tail_lines),
            policy,
        }
    }
}

impl Render for ExtractReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Extract: {} (profile: {})",
            self.source.bold(),
            self.profile
        )?;
        writeln!(w, "  Lines read: {}", self.lines_read)?;
        if self.skipped_frames > 0 {
            writeln!(
                w,
                "  Skipped frames: {}",
                self.skipped_frames.to_string().yellow().bold()
            )?;
        }
        writeln!(w, "  Records: {}", self.records.len().to_string().bold())?;

        if !self.records.is_empty() {
            writeln!(w)?;
            write_records(w, &self.records)?;
        }
        Ok(())
    }

    fn render_html(&self, w: &mut dyn Write) -> std::io::Result<()> {
        write_html(w, &self.records)
    }
}
