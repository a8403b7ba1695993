//! Main menu for fieldops
//!
//! Uses inquire for clean, reliable terminal interaction.

use anyhow::{anyhow, Result};
use inquire::{Select, Text};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::cli::display::stats_line;
use crate::cli::ui::{clear_screen, error, minimal_render_config};
use crate::cli::{confirm_toggle, run_clear, run_export, run_import, run_list};
use crate::session::Session;
use crate::store::BlobStore;

/// Menu options with type-safe variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    Browse,
    Search,
    Import,
    Toggle,
    Export,
    Clear,
    Quit,
}

impl MenuOption {
    const ALL: &'static [MenuOption] = &[
        MenuOption::Browse,
        MenuOption::Search,
        MenuOption::Import,
        MenuOption::Toggle,
        MenuOption::Export,
        MenuOption::Clear,
        MenuOption::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuOption::Browse => "Browse",
            MenuOption::Search => "Search",
            MenuOption::Import => "Import",
            MenuOption::Toggle => "Mark done / pending",
            MenuOption::Export => "Export",
            MenuOption::Clear => "Clear all",
            MenuOption::Quit => "Quit",
        }
    }

    fn from_label(s: &str) -> Option<MenuOption> {
        MenuOption::ALL.iter().find(|opt| opt.label() == s).copied()
    }
}

/// Run the interactive main menu
pub fn run_menu<S: BlobStore>(session: &mut Session<S>, runtime: &Runtime) -> Result<()> {
    // TTY check: interactive menu requires a terminal
    if !io::stdin().is_terminal() {
        return Err(anyhow!(
            "Interactive menu requires a terminal. Use subcommands for non-interactive use:\n  \
            fieldops import <file>\n  \
            fieldops list --all\n  \
            fieldops search <query>\n  \
            Run 'fieldops --help' for all options."
        ));
    }

    let menu_labels: Vec<&str> = MenuOption::ALL.iter().map(|opt| opt.label()).collect();

    loop {
        // Clear screen - if this fails, continue anyway (degraded but functional)
        let _ = clear_screen();
        println!("{}\n", stats_line(&session.stats()));

        let selection = Select::new("fieldops", menu_labels.clone())
            .with_render_config(minimal_render_config())
            .with_page_size(menu_labels.len())
            .with_vim_mode(true)
            .prompt_skippable();

        // Handle prompt errors (Ctrl+C, terminal issues) - exit gracefully
        let Ok(Some(choice_label)) = selection else {
            return Ok(());
        };

        let Some(choice) = MenuOption::from_label(choice_label) else {
            continue;
        };

        if choice == MenuOption::Quit {
            return Ok(());
        }

        let _ = clear_screen();

        if let Err(e) = execute_command(session, runtime, choice) {
            error(&e.to_string());
            wait_for_continue();
        }
    }
}

/// Execute a menu command
fn execute_command<S: BlobStore>(
    session: &mut Session<S>,
    runtime: &Runtime,
    choice: MenuOption,
) -> Result<()> {
    match choice {
        MenuOption::Browse => run_list(session, Some(""), false),
        MenuOption::Search => {
            let query = prompt_for_input("search: ")?;
            run_list(session, Some(&query), false)
        }
        MenuOption::Import => {
            let path = prompt_for_input("file (empty to browse): ")?;
            let path = (!path.is_empty()).then(|| PathBuf::from(path));
            let result = runtime.block_on(run_import(session, path.as_deref()));
            if result.is_ok() {
                wait_for_continue();
            }
            result
        }
        MenuOption::Toggle => {
            let identifier = prompt_for_input("id or name: ")?;
            if identifier.is_empty() {
                return Ok(());
            }
            confirm_toggle(session, &identifier)?;
            wait_for_continue();
            Ok(())
        }
        MenuOption::Export => {
            let path = prompt_for_input("file: ")?;
            if path.is_empty() {
                return Ok(());
            }
            run_export(session, Some(&PathBuf::from(path)))?;
            wait_for_continue();
            Ok(())
        }
        MenuOption::Clear => run_clear(session, false),
        MenuOption::Quit => Ok(()),
    }
}

/// Prompt for text input, returning empty string on cancel
fn prompt_for_input(label: &str) -> Result<String> {
    let result = Text::new(label)
        .with_render_config(minimal_render_config())
        .prompt_skippable()?;
    Ok(result.unwrap_or_default().trim().to_string())
}

/// Wait for user to press enter to continue
fn wait_for_continue() {
    println!();
    let _ = Text::new("[enter]")
        .with_render_config(minimal_render_config())
        .prompt_skippable();
}
