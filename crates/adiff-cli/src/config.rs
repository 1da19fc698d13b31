use std::borrow::Cow;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use adiff_core::BasicSection;

/// How input files are split and how lines are compared.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// A line starting with this prefix opens a section named by the rest of the line.
    pub section_prefix: String,
    /// Compare lines with surrounding whitespace removed.
    pub trim_whitespace: bool,
    /// Compare lines case-insensitively.
    pub ignore_case: bool,
    /// Drop blank lines when reading input.
    pub skip_blank_lines: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            section_prefix: "## ".into(),
            trim_whitespace: false,
            ignore_case: false,
            skip_blank_lines: false,
        }
    }
}

impl DiffConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self =
            toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))?;
        anyhow::ensure!(
            !config.section_prefix.is_empty(),
            "invalid config {}: section_prefix must not be empty",
            path.display()
        );
        Ok(config)
    }

    /// The form of `line` that is compared. Two lines are equal under these
    /// options exactly when their keys are equal.
    pub fn line_key<'a>(&self, line: &'a str) -> Cow<'a, str> {
        let line = if self.trim_whitespace { line.trim() } else { line };
        if self.ignore_case {
            Cow::Owned(line.to_lowercase())
        } else {
            Cow::Borrowed(line)
        }
    }

    /// Keys for every line, computed once ahead of diffing.
    pub fn line_keys<'a>(&self, lines: &'a [String]) -> Vec<Cow<'a, str>> {
        lines.iter().map(|line| self.line_key(line)).collect()
    }

    /// `sections` with each item replaced by its key.
    pub fn section_keys<'a>(&self, sections: &'a [BasicSection<String>]) -> Vec<BasicSection<Cow<'a, str>>> {
        sections
            .iter()
            .map(|s| BasicSection::new(s.name.clone(), self.line_keys(&s.items)))
            .collect()
    }
}
