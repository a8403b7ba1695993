//! Shared UI primitives for fieldops
//!
//! Conventions:
//! - Prompts: lowercase with colon and space: `search: `
//! - Navigation hints: keys in brackets: `[↑/↓]`, `[x]done`
//! - Feedback: single word when possible: `Done.`

use anyhow::Result;
use crossterm::{
    cursor,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
    ExecutableCommand,
};
use inquire::{ui::RenderConfig, Confirm, Text};
use std::io::{self, Write};

// ============================================================================
// Status Bar Builder
// ============================================================================

/// Maximum actions a status bar can hold (stack-allocated)
const MAX_STATUS_ACTIONS: usize = 8;

/// Builder for consistent status bar formatting.
///
/// Example output: "12/345  [x]done [/]search [q]uit"
pub struct StatusBar<'a> {
    counter: Option<(usize, usize)>,
    actions: [Option<(&'a str, &'a str)>; MAX_STATUS_ACTIONS],
    action_count: usize,
}

impl<'a> StatusBar<'a> {
    #[inline]
    pub fn new() -> Self {
        Self {
            counter: None,
            actions: [None; MAX_STATUS_ACTIONS],
            action_count: 0,
        }
    }

    /// Add a counter (current/total)
    #[inline]
    pub fn counter(mut self, current: usize, total: usize) -> Self {
        self.counter = Some((current, total));
        self
    }

    /// Add an action hint (key, label)
    /// Example: `.action("x", "done")` produces `[x]done`
    #[inline]
    pub fn action(mut self, key: &'a str, label: &'a str) -> Self {
        if self.action_count < MAX_STATUS_ACTIONS {
            self.actions[self.action_count] = Some((key, label));
            self.action_count += 1;
        }
        self
    }

    /// Add a visual separator (" | ")
    #[inline]
    pub fn separator(mut self) -> Self {
        if self.action_count < MAX_STATUS_ACTIONS {
            self.actions[self.action_count] = Some(("|", ""));
            self.action_count += 1;
        }
        self
    }

    pub fn render(&self) -> String {
        let mut result = String::with_capacity(12 + self.action_count * 12);

        if let Some((current, total)) = self.counter {
            use std::fmt::Write;
            let _ = write!(result, "{}/{}", current, total);
        }

        for (key, label) in self.actions.iter().take(self.action_count).flatten() {
            if *key == "|" {
                result.push_str(" | ");
                continue;
            }
            if !result.is_empty() && !result.ends_with(" | ") {
                result.push(' ');
            }
            result.push('[');
            result.push_str(key);
            result.push(']');
            result.push_str(label);
        }

        result
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Print the status bar, with the pending notice (if any) on the line below.
pub fn write_footer<W: Write>(out: &mut W, bar: &StatusBar<'_>, notice: Option<&str>) -> io::Result<()> {
    writeln!(out, "\n{}", bar.render())?;
    if let Some(notice) = notice {
        writeln!(out, "! {}", notice)?;
    }
    Ok(())
}

// ============================================================================
// Layout Primitives
// ============================================================================

/// Return selection prefix for list items
#[inline]
pub fn selection_prefix(selected: bool) -> &'static str {
    if selected { "> " } else { "  " }
}

/// Truncate a string to max_chars, adding ellipsis if needed.
/// Result will be at most max_chars characters (including ellipsis if truncated).
pub fn truncate(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars - 1).collect();
    format!("{}…", kept)
}

// ============================================================================
// Message Functions
// ============================================================================

/// Print a status message to stdout
#[inline]
pub fn status(msg: &str) {
    println!("{}", msg);
}

/// Print an error message to stderr
#[inline]
pub fn error(msg: &str) {
    eprintln!("Error: {}", msg);
}

// ============================================================================
// Terminal
// ============================================================================

/// RAII guard that ensures raw mode is disabled on drop
pub struct RawModeGuard;

impl RawModeGuard {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Clear the terminal screen and move cursor to top-left
pub fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(Clear(ClearType::All))?;
    stdout.execute(cursor::MoveTo(0, 0))?;
    stdout.flush()?;
    Ok(())
}

/// Get terminal dimensions, defaulting to 80x24 if unavailable
pub fn term_size() -> (usize, usize) {
    crossterm::terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or((80, 24))
}

/// Number of visible content lines for scrollable lists.
/// Accounts for the stats header (2 lines) and status bar (2 lines).
pub fn visible_lines() -> usize {
    let (_, height) = term_size();
    height.saturating_sub(4).max(5)
}

// ============================================================================
// Prompts
// ============================================================================

/// Get a minimal render config for inquire prompts
pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Prompt for text input with optional default value
pub fn text_input(prompt: &str, default: Option<&str>) -> Result<Option<String>> {
    let mut builder = Text::new(prompt).with_render_config(minimal_render_config());

    if let Some(d) = default {
        if !d.is_empty() {
            builder = builder.with_default(d);
        }
    }

    let result = builder.prompt_skippable()?;
    Ok(result)
}

/// Prompt for yes/no confirmation (default: no)
pub fn confirm(prompt: &str) -> Result<bool> {
    let result = Confirm::new(prompt)
        .with_render_config(minimal_render_config())
        .with_default(false)
        .prompt()?;
    Ok(result)
}
