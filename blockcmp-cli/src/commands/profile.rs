//! `blockcmp profile` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use blockcmp_core::config::BlockcmpConfig;
use blockcmp_log_pipeline::compare::resolve_profile;
use blockcmp_log_pipeline::{ProfileDefinition, ProfileLoader};

use crate::cli::{LogKind, ProfileAction, ProfileArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `profile` command.
pub async fn execute(
    args: ProfileArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ProfileAction::Show { kind } => execute_show(kind, config_path, writer).await,
        ProfileAction::Validate { path } => execute_validate(&path, writer).await,
    }
}

/// Show the profile `compare` would use for the given log.
async fn execute_show(
    kind: LogKind,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let config = BlockcmpConfig::load_or_default(config_path).await?;
    let configured = match kind {
        LogKind::Core => &config.sources.core_profile,
        LogKind::Bitcrust => &config.sources.bitcrust_profile,
    };
    let path = (!configured.is_empty()).then(|| PathBuf::from(configured));

    let profile = resolve_profile(kind.profile_name(), path.as_deref()).await?;
    let source = match path {
        Some(path) => path.display().to_string(),
        None => "(built-in)".to_owned(),
    };

    let report = ProfileReport {
        source,
        profile_yaml: ProfileLoader::to_yaml(&profile)?,
        definition: profile.definition().clone(),
    };

    writer.render(&report)?;
    Ok(())
}

/// Load and compile a YAML profile, reporting every failure.
async fn execute_validate(path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %path.display(), "validating profile");

    let report = match ProfileLoader::load_file(path).await {
        Ok(profile) => ProfileValidationReport {
            source: path.display().to_string(),
            valid: true,
            name: Some(profile.name().to_owned()),
            rules: profile.rules().len(),
            errors: Vec::new(),
        },
        Err(e) => ProfileValidationReport {
            source: path.display().to_string(),
            valid: false,
            name: None,
            rules: 0,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Command("profile is invalid".to_owned()));
    }

    Ok(())
}

/// Effective profile display report.
#[derive(Serialize)]
pub struct ProfileReport {
    /// Profile file path, or `(built-in)`
    pub source: String,
    #[serde(flatten)]
    pub definition: ProfileDefinition,
    /// YAML form, used for text rendering only
    #[serde(skip)]
    pub profile_yaml: String,
}

impl Render for ProfileReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Profile {} (source: {})",
            self.definition.name.bold(),
            self.source
        )?;
        writeln!(w)?;
        write!(w, "{}", self.profile_yaml)?;

        Ok(())
    }
}

/// Profile validation report.
#[derive(Serialize)]
pub struct ProfileValidationReport {
    /// Profile file path
    pub source: String,
    /// Whether the profile loaded and compiled
    pub valid: bool,
    /// Profile name when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of compiled rules
    pub rules: usize,
    /// Error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ProfileValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Profile Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
            if let Some(ref name) = self.name {
                writeln!(w, "  Name: {name}")?;
            }
            writeln!(w, "  Rules: {}", self.rules)?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
