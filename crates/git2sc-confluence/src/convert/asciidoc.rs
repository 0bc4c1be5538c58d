//! AsciiDoc conversion through the `asciidoctor` executable.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::{Converter, expand_home};
use crate::error::ConvertError;

/// Document type declaration Confluence rejects in storage format.
const DOCTYPE: &str = "<!DOCTYPE html>";

/// Renders AsciiDoc to XHTML with an external `asciidoctor` process.
#[derive(Debug, Clone)]
pub struct AsciidocConverter {
    program: String,
}

impl AsciidocConverter {
    /// Use a specific converter executable.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for AsciidocConverter {
    fn default() -> Self {
        Self::with_program("asciidoctor")
    }
}

impl Converter for AsciidocConverter {
    fn convert(&self, path: &Path) -> Result<String, ConvertError> {
        let path = expand_home(path);
        debug!("Running {} on {}", self.program, path.display());

        // Arguments are passed directly, no shell involved
        let output = Command::new(&self.program)
            .args(["-b", "xhtml"])
            .arg(&path)
            .args(["-o", "-"])
            .output()?;

        if !output.status.success() {
            return Err(ConvertError::Command {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let xhtml = String::from_utf8(output.stdout)?;
        Ok(strip_doctype(&xhtml).to_owned())
    }
}

/// Remove a leading `<!DOCTYPE html>` line.
fn strip_doctype(xhtml: &str) -> &str {
    match xhtml.trim_start().strip_prefix(DOCTYPE) {
        Some(rest) => rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest),
        None => xhtml,
    }
}
