//! Reading diff inputs from text files.

use std::path::Path;

use anyhow::Context;

use adiff_core::BasicSection;

use crate::config::DiffConfig;

pub fn read_lines(path: &Path, config: &DiffConfig) -> anyhow::Result<Vec<String>> {
    let text = read(path)?;
    Ok(parse_lines(&text, config))
}

pub fn read_sections(path: &Path, config: &DiffConfig) -> anyhow::Result<Vec<BasicSection<String>>> {
    let text = read(path)?;
    Ok(parse_sections(&text, config))
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

pub fn parse_lines(text: &str, config: &DiffConfig) -> Vec<String> {
    text.lines()
        .filter(|line| !(config.skip_blank_lines && line.trim().is_empty()))
        .map(String::from)
        .collect()
}

/// Split `text` into sections at every line that starts with the configured
/// prefix. Lines before the first header form an unnamed section.
pub fn parse_sections(text: &str, config: &DiffConfig) -> Vec<BasicSection<String>> {
    let mut sections: Vec<BasicSection<String>> = Vec::new();
    for line in parse_lines(text, config) {
        if let Some(name) = line.strip_prefix(config.section_prefix.as_str()) {
            sections.push(BasicSection::new(name.trim(), Vec::new()));
            continue;
        }
        match sections.last_mut() {
            Some(section) => section.items.push(line),
            None => sections.push(BasicSection::new("", vec![line])),
        }
    }
    sections
}
