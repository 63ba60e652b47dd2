//! Unit-file parsing.
//!
//! The submission API does not accept raw unit text; it wants the file
//! broken into `(section, name, value)` option triplets. Callers hand us
//! opaque systemd unit text and we do the split here, preserving values
//! verbatim (instance specifiers like `%i` pass through untouched).

use crate::error::ApiError;
use crate::types::UnitOption;

/// A parsed unit file, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitDefinition {
    options: Vec<UnitOption>,
}

impl UnitDefinition {
    /// Parse systemd unit text into submission options.
    ///
    /// Recognizes `[Section]` headers, `Key=Value` entries, `#`/`;`
    /// comments, and trailing-backslash line continuation. Entries before
    /// the first section header are rejected.
    pub fn parse(text: &str) -> Result<Self, ApiError> {
        let mut options = Vec::new();
        let mut section: Option<String> = None;

        let mut lines = text.lines().enumerate();
        while let Some((idx, raw)) = lines.next() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[') {
                let Some(name) = header.strip_suffix(']') else {
                    return Err(ApiError::InvalidUnitFile {
                        line: idx + 1,
                        reason: format!("unterminated section header '{}'", raw.trim()),
                    });
                };
                if name.is_empty() {
                    return Err(ApiError::InvalidUnitFile {
                        line: idx + 1,
                        reason: "empty section name".to_string(),
                    });
                }
                section = Some(name.to_string());
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ApiError::InvalidUnitFile {
                    line: idx + 1,
                    reason: format!("expected 'Key=Value', got '{}'", line),
                });
            };

            let Some(section) = section.as_ref() else {
                return Err(ApiError::InvalidUnitFile {
                    line: idx + 1,
                    reason: format!("entry '{}' appears before any [Section] header", key.trim()),
                });
            };

            // Continuation lines are folded into a single value, the way
            // systemd itself concatenates them.
            let mut value = value.trim_start().to_string();
            while value.ends_with('\\') {
                value.pop();
                value.truncate(value.trim_end().len());
                match lines.next() {
                    Some((_, next)) => {
                        value.push(' ');
                        value.push_str(next.trim());
                    }
                    None => break,
                }
            }

            options.push(UnitOption {
                section: section.clone(),
                name: key.trim().to_string(),
                value,
            });
        }

        Ok(Self { options })
    }

    /// The option triplets to submit.
    pub fn options(&self) -> &[UnitOption] {
        &self.options
    }
}
