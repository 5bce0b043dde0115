// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Format a duration in seconds as relative time (e.g., "5s", "2m", "1h", "3d").
pub fn format_elapsed(seconds: i64) -> String {
    let seconds = seconds.max(0);
    if seconds < 60 {
        format!("{seconds}s")
    } else if seconds < 3600 {
        format!("{}m", seconds / 60)
    } else if seconds < 86400 {
        format!("{}h", seconds / 3600)
    } else {
        format!("{}d", seconds / 86400)
    }
}

/// Info about items that were truncated by [`apply_limit`].
pub struct Truncation {
    pub remaining: usize,
}

/// Apply limit/no_limit to a vec, return truncation info if items were removed.
pub fn apply_limit<T>(items: &mut Vec<T>, limit: usize, no_limit: bool) -> Option<Truncation> {
    let total = items.len();
    let effective = if no_limit { total } else { limit };
    if total > effective {
        items.truncate(effective);
        Some(Truncation {
            remaining: total - effective,
        })
    } else {
        None
    }
}

/// Render a list as a text table or JSON. Handles the empty-list message and
/// the format branch shared across every listing command.
pub fn handle_list<T: Serialize>(
    format: OutputFormat,
    items: &[T],
    empty_msg: &str,
    render_text: impl FnOnce(&[T], &mut dyn Write),
) -> anyhow::Result<()> {
    handle_list_with_limit(format, items, empty_msg, None, render_text)
}

/// Like [`handle_list`] but prints a truncation message when items were limited.
pub fn handle_list_with_limit<T: Serialize>(
    format: OutputFormat,
    items: &[T],
    empty_msg: &str,
    truncation: Option<Truncation>,
    render_text: impl FnOnce(&[T], &mut dyn Write),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(items)?);
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{}", empty_msg);
            } else {
                render_text(items, &mut std::io::stdout());
            }
            if let Some(trunc) = truncation {
                if trunc.remaining > 0 {
                    println!(
                        "\n... {} more not shown. Use --no-limit or -n N to see more.",
                        trunc.remaining
                    );
                }
            }
        }
    }
    Ok(())
}

/// Format-branch helper for non-list commands (status, trigger, ...).
///
/// Renders as JSON when `format` is `Json`, otherwise calls `text_fn`.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Text => {
            text_fn();
        }
    }
    Ok(())
}
