use anyhow::Context as _;
use colored::Colorize;
use serde::Serialize;
use tracing::debug;

use adiff_core::{diff, diff_nested, ArrayDiff, BasicSection, Change, NestedDiff, Side};

use crate::cli::*;
use crate::config::DiffConfig;
use crate::input::{read_lines, read_sections};

struct Context {
    config: DiffConfig,
    format: OutputFormat,
}

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => DiffConfig::load(path)?,
        None => DiffConfig::default(),
    };
    debug!(?config, "loaded configuration");
    let ctx = Context {
        config,
        format: cli.format,
    };

    match cli.command {
        Command::Diff(args) => cmd_diff(&ctx, args),
        Command::Nested(args) => cmd_nested(&ctx, args),
        Command::Translate(args) => cmd_translate(&ctx, args),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("encoding JSON output")?);
    Ok(())
}

// ---------------------------------------------------------------
// diff
// ---------------------------------------------------------------

#[derive(Serialize)]
struct FlatReport<'a> {
    old_count: usize,
    new_count: usize,
    diff: &'a ArrayDiff,
}

fn cmd_diff(ctx: &Context, args: PairArgs) -> anyhow::Result<()> {
    let old = read_lines(&args.old, &ctx.config)?;
    let new = read_lines(&args.new, &ctx.config)?;
    let d = diff(&ctx.config.line_keys(&old), &ctx.config.line_keys(&new));

    match ctx.format {
        OutputFormat::Json => print_json(&FlatReport {
            old_count: d.old_count(),
            new_count: d.new_count(),
            diff: &d,
        }),
        OutputFormat::Text => {
            if d.is_empty() {
                println!("No changes.");
                return Ok(());
            }
            for line in merged_lines(&d, &old, &new) {
                match line {
                    Line::Kept(text) => println!("  {text}"),
                    Line::Removed(i, text) => println!("{} {}", format!("-{i:>4}").red(), text.red()),
                    Line::Inserted(j, text) => println!("{} {}", format!("+{j:>4}").green(), text.green()),
                }
            }
            println!(
                "{} removed, {} inserted, {} kept",
                d.removed_indexes().len().to_string().red(),
                d.inserted_indexes().len().to_string().green(),
                d.common_indexes().len().to_string().bold()
            );
            Ok(())
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Kept(&'a str),
    Removed(usize, &'a str),
    Inserted(usize, &'a str),
}

/// Interleave old and new into one listing, removals before the insertions
/// that follow them.
fn merged_lines<'a>(d: &ArrayDiff, old: &'a [String], new: &'a [String]) -> Vec<Line<'a>> {
    let mut lines = Vec::with_capacity(old.len() + d.inserted_indexes().len());
    let mut next_old = 0;
    for (j, text) in new.iter().enumerate() {
        match d.old_index_for_new_index(j) {
            Some(i) => {
                lines.extend((next_old..i).map(|r| Line::Removed(r, old[r].as_str())));
                lines.push(Line::Kept(text));
                next_old = i + 1;
            }
            None => lines.push(Line::Inserted(j, text)),
        }
    }
    lines.extend((next_old..old.len()).map(|r| Line::Removed(r, old[r].as_str())));
    lines
}

// ---------------------------------------------------------------
// nested
// ---------------------------------------------------------------

#[derive(Serialize)]
struct NestedReport<'a> {
    diff: &'a NestedDiff,
    changes: Vec<Change>,
}

fn cmd_nested(ctx: &Context, args: PairArgs) -> anyhow::Result<()> {
    let old = read_sections(&args.old, &ctx.config)?;
    let new = read_sections(&args.new, &ctx.config)?;
    let nd = diff_nested(&ctx.config.section_keys(&old), &ctx.config.section_keys(&new));

    let mut changes: Vec<Change> = Vec::new();
    nd.apply_to(&mut changes);

    match ctx.format {
        OutputFormat::Json => print_json(&NestedReport { diff: &nd, changes }),
        OutputFormat::Text => {
            if nd.is_empty() {
                println!("No changes.");
                return Ok(());
            }
            for line in section_summary(&nd, &old, &new) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn section_summary(
    nd: &NestedDiff,
    old: &[BasicSection<String>],
    new: &[BasicSection<String>],
) -> Vec<String> {
    let sections = nd.sections_diff();
    let mut lines = Vec::new();
    for i in sections.removed_indexes() {
        lines.push(format!("{} section {:?}", "-".red(), old[i].name));
    }
    for j in sections.inserted_indexes() {
        lines.push(format!("{} section {:?} ({} items)", "+".green(), new[j].name, new[j].items.len()));
    }
    for update in nd.section_updates().filter(|u| !u.items.is_empty()) {
        lines.push(format!(
            "{} section {:?} ({} -> {}): removed {} inserted {}",
            "~".yellow(),
            old[update.old_section].name,
            update.old_section,
            update.new_section,
            update.items.removed_indexes(),
            update.items.inserted_indexes()
        ));
    }
    lines
}

// ---------------------------------------------------------------
// translate
// ---------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Serialize)]
struct TranslateReport {
    from: Side,
    index: usize,
    /// `None` when the line was removed (from old) or inserted (from new).
    to: Option<usize>,
}

fn cmd_translate(ctx: &Context, args: TranslateArgs) -> anyhow::Result<()> {
    let old = read_lines(&args.old, &ctx.config)?;
    let new = read_lines(&args.new, &ctx.config)?;
    let d = diff(&ctx.config.line_keys(&old), &ctx.config.line_keys(&new));
    let report = translate(&d, args.old_index, args.new_index)?;

    match ctx.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            let (to_side, gone) = match report.from {
                Side::Old => (Side::New, "removed"),
                Side::New => (Side::Old, "inserted"),
            };
            match report.to {
                Some(to) => println!("{} {} -> {} {}", report.from, report.index, to_side, to.to_string().bold()),
                None => println!("{} {} -> {}", report.from, report.index, gone.yellow()),
            }
            Ok(())
        }
    }
}

fn translate(d: &ArrayDiff, old_index: Option<usize>, new_index: Option<usize>) -> anyhow::Result<TranslateReport> {
    let report = match (old_index, new_index) {
        (Some(index), None) => TranslateReport {
            from: Side::Old,
            index,
            to: d.try_new_index_for_old_index(index)?,
        },
        (None, Some(index)) => TranslateReport {
            from: Side::New,
            index,
            to: d.try_old_index_for_new_index(index)?,
        },
        _ => anyhow::bail!("exactly one of --old-index and --new-index is required"),
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn merged_listing_interleaves() {
        let old = strings(&["a", "b", "c", "d"]);
        let new = strings(&["a", "c", "e"]);
        let d = diff(&old, &new);

        assert_eq!(
            merged_lines(&d, &old, &new),
            vec![
                Line::Kept("a"),
                Line::Removed(1, "b"),
                Line::Kept("c"),
                Line::Inserted(2, "e"),
                Line::Removed(3, "d"),
            ]
        );
    }

    #[test]
    fn merged_listing_of_disjoint_inputs() {
        let old = strings(&["x"]);
        let new = strings(&["y"]);
        let d = diff(&old, &new);
        assert_eq!(merged_lines(&d, &old, &new), vec![Line::Inserted(0, "y"), Line::Removed(0, "x")]);
    }

    #[test]
    fn translate_both_directions() {
        let d = diff(&["a", "b", "c", "d"], &["a", "c", "e"]);

        let r = translate(&d, Some(2), None).unwrap();
        assert_eq!(r, TranslateReport { from: Side::Old, index: 2, to: Some(1) });

        let r = translate(&d, None, Some(2)).unwrap();
        assert_eq!(r, TranslateReport { from: Side::New, index: 2, to: None });
    }

    #[test]
    fn translate_out_of_range_is_reported() {
        let d = diff(&["a"], &["a"]);
        let err = translate(&d, Some(5), None).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn summary_lists_changed_sections() {
        colored::control::set_override(false);
        let old = vec![
            BasicSection::new("gone", strings(&["1"])),
            BasicSection::new("kept", strings(&["2", "3"])),
        ];
        let new = vec![
            BasicSection::new("kept", strings(&["3"])),
            BasicSection::new("fresh", strings(&["4"])),
        ];
        let nd = adiff_core::diff_nested(&old, &new);

        assert_eq!(
            section_summary(&nd, &old, &new),
            vec![
                "- section \"gone\"".to_string(),
                "+ section \"fresh\" (1 items)".to_string(),
                "~ section \"kept\" (1 -> 0): removed [0] inserted []".to_string(),
            ]
        );
    }
}
