//! Output formatting abstraction for text, JSON and HTML rendering
//!
//! All subcommand output flows through [`OutputWriter`] which handles format switching.
//! This keeps format-specific logic out of command handlers entirely.

use std::io::Write;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Abstraction for writing CLI output in different formats.
///
/// Subcommand handlers call `writer.render(&payload)` where `payload`
/// implements both `Serialize` (for JSON) and `Render` (for text and HTML).
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer with the specified format.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// The selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render a payload to stdout.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.render_to(payload, &mut handle)
    }

    /// Render a payload to an arbitrary writer.
    ///
    /// For `Text` format, delegates to `Render::render_text()`.
    /// For `Html` format, delegates to `Render::render_html()`.
    /// For `Json` format, serialises via `serde_json`.
    pub fn render_to<T: Render + Serialize>(
        &self,
        payload: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => payload.render_text(w)?,
            OutputFormat::Html => payload.render_html(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

/// Trait for human-readable rendering.
///
/// Implemented by every CLI output payload alongside `serde::Serialize`.
/// Payloads without an HTML form fall back to their text rendering.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;

    fn render_html(&self, w: &mut dyn Write) -> std::io::Result<()> {
        self.render_text(w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestPayload {
        field1: String,
        field2: u32,
    }

    impl Render for TestPayload {
        fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
            writeln!(w, "Field1: {}", self.field1)?;
            writeln!(w, "Field2: {}", self.field2)?;
            Ok(())
        }
    }

    #[derive(Serialize)]
    struct HtmlPayload;

    impl Render for HtmlPayload {
        fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
            writeln!(w, "plain")
        }

        fn render_html(&self, w: &mut dyn Write) -> std::io::Result<()> {
            writeln!(w, "<ul class='graph'></ul>")
        }
    }

    fn render_string<T: Render + Serialize>(format: OutputFormat, payload: &T) -> String {
        let writer = OutputWriter::new(format);
        let mut buffer = Vec::new();
        writer
            .render_to(payload, &mut buffer)
            .expect("rendering should succeed");
        String::from_utf8(buffer).expect("valid UTF-8")
    }

    fn payload() -> TestPayload {
        TestPayload {
            field1: "test value".to_owned(),
            field2: 42,
        }
    }

    #[test]
    fn test_output_writer_text_format() {
        let output = render_string(OutputFormat::Text, &payload());
        assert!(
            output.contains("Field1: test value"),
            "should render field1"
        );
        assert!(output.contains("Field2: 42"), "should render field2");
    }

    #[test]
    fn test_output_writer_json_format() {
        let output = render_string(OutputFormat::Json, &payload());
        let parsed: serde_json::Value =
            serde_json::from_str(&output).expect("should parse back to JSON");
        assert_eq!(parsed["field1"].as_str(), Some("test value"));
        assert_eq!(parsed["field2"].as_u64(), Some(42));
        assert!(output.contains('\n'), "pretty JSON should contain newlines");
    }

    #[test]
    fn test_output_writer_html_falls_back_to_text() {
        let output = render_string(OutputFormat::Html, &payload());
        assert!(output.contains("Field1: test value"));
    }

    #[test]
    fn test_output_writer_html_override() {
        assert_eq!(
            render_string(OutputFormat::Html, &HtmlPayload).trim(),
            "<ul class='graph'></ul>"
        );
        assert_eq!(render_string(OutputFormat::Text, &HtmlPayload).trim(), "plain");
    }

    #[test]
    fn test_writer_reports_format() {
        assert_eq!(OutputWriter::new(OutputFormat::Json).format(), OutputFormat::Json);
    }
}
