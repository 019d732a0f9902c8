//! Scripting define symbol injection.
//!
//! Edits the `scriptingDefineSymbols` map of
//! `ProjectSettings/ProjectSettings.asset` line by line, so the rest of the
//! serialized asset is left byte-for-byte intact.

use crate::build::{ErrorExt, Result, settings::BuildTarget};
use std::path::{Path, PathBuf};

const DEFINES_KEY: &str = "scriptingDefineSymbols:";

fn indentation(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Merges `symbols` into the existing `;`-separated list, keeping order and
/// dropping duplicates.
fn merge_symbols(existing: &str, symbols: &[String]) -> String {
    let mut merged: Vec<&str> = existing
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    for symbol in symbols.iter().map(|s| s.trim()) {
        if !symbol.is_empty() && !merged.contains(&symbol) {
            merged.push(symbol);
        }
    }
    merged.join(";")
}

/// Adds `symbols` to `group`'s entry of the define map in `contents`.
///
/// Applying the same symbols twice yields the same text. Entries for other
/// groups are not touched.
pub fn inject_define_symbols(contents: &str, group: &str, symbols: &[String]) -> Result<String> {
    let newline = if contents.contains("\r\n") { "\r\n" } else { "\n" };
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();

    let Some(key_index) = lines
        .iter()
        .position(|l| l.trim_start().starts_with(DEFINES_KEY))
    else {
        crate::bail!("{DEFINES_KEY} not found in ProjectSettings.asset");
    };

    let key_indent = indentation(&lines[key_index]);
    let entry_prefix = " ".repeat(key_indent + 2);

    // `scriptingDefineSymbols: {}` is an empty inline map.
    let inline = lines[key_index].trim_start()[DEFINES_KEY.len()..].trim().to_string();
    if inline == "{}" {
        lines[key_index] = format!("{}{DEFINES_KEY}", " ".repeat(key_indent));
        lines.insert(
            key_index + 1,
            format!("{entry_prefix}{group}: {}", merge_symbols("", symbols)),
        );
    } else if !inline.is_empty() {
        crate::bail!("unexpected inline value for {DEFINES_KEY} {inline}");
    } else {
        let mut end = key_index + 1;
        let mut found = false;
        while end < lines.len() && indentation(&lines[end]) > key_indent {
            let entry = lines[end].trim_start();
            if let Some((name, value)) = entry.split_once(':')
                && name.trim() == group
            {
                lines[end] = format!(
                    "{}{}: {}",
                    " ".repeat(indentation(&lines[end])),
                    name.trim(),
                    merge_symbols(value, symbols)
                );
                found = true;
            }
            end += 1;
        }
        if !found {
            lines.insert(
                end,
                format!("{entry_prefix}{group}: {}", merge_symbols("", symbols)),
            );
        }
    }

    let mut out = lines.join(newline);
    if contents.ends_with('\n') {
        out.push_str(newline);
    }
    Ok(out)
}

/// Path of the serialized player settings inside a project.
pub fn project_settings_path(project_directory: &Path) -> PathBuf {
    project_directory.join("ProjectSettings/ProjectSettings.asset")
}

/// Injects `symbols` for `target`'s platform group into the project.
pub async fn apply_define_symbols(
    project_directory: &Path,
    target: BuildTarget,
    symbols: &[String],
) -> Result<()> {
    if symbols.is_empty() {
        return Ok(());
    }

    let path = project_settings_path(project_directory);
    let contents = tokio::fs::read_to_string(&path)
        .await
        .fs_context("reading project settings", &path)?;
    let updated = inject_define_symbols(&contents, target.define_group(), symbols)?;

    if updated != contents {
        tokio::fs::write(&path, updated)
            .await
            .fs_context("writing project settings", &path)?;
        log::info!(
            "Added define symbols {} for {}",
            symbols.join(";"),
            target.define_group()
        );
    }
    Ok(())
}
