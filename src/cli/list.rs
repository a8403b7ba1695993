use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    style::{Attribute, SetAttribute},
    ExecutableCommand,
};
use std::io::{self, IsTerminal, Write};

use crate::cli::display::{stats_line, status_mark};
use crate::cli::show::run_detail;
use crate::cli::ui::{
    clear_screen, selection_prefix, term_size, text_input, truncate, visible_lines, write_footer,
    RawModeGuard, StatusBar,
};
use crate::models::Person;
use crate::session::Session;
use crate::store::BlobStore;

/// Execute the list command
pub fn run_list<S: BlobStore>(session: &mut Session<S>, query: Option<&str>, all: bool) -> Result<()> {
    if let Some(query) = query {
        session.set_query(query.trim());
    }

    if session.people().is_empty() {
        println!("No entries. Import a list first.");
        return Ok(());
    }

    // Use non-interactive mode if --all flag or not a TTY
    if all || !io::stdout().is_terminal() {
        let mut stdout = io::stdout().lock();
        write_rows(&mut stdout, session, all)?;
        return Ok(());
    }

    run_interactive_list(session)
}

/// Print the visible window (or every match with `all`), then a hint about
/// what is left below it.
pub fn write_rows<W: Write, S: BlobStore>(out: &mut W, session: &Session<S>, all: bool) -> io::Result<()> {
    let layout = ColumnLayout::for_width(term_size().0);
    writeln!(out, "{}\n", stats_line(&session.stats()))?;

    let rows: Vec<&Person> = if all {
        session.filtered().collect()
    } else {
        session.visible()
    };

    if rows.is_empty() {
        writeln!(out, "No matches.")?;
        return Ok(());
    }

    writeln!(out, "{}", layout.header())?;
    for person in &rows {
        writeln!(out, "{}", layout.row(person, false))?;
    }

    let remaining = session.filtered_len() - rows.len();
    if remaining > 0 {
        writeln!(out, "\n… {} more (use --all)", remaining)?;
    }
    Ok(())
}

fn run_interactive_list<S: BlobStore>(session: &mut Session<S>) -> Result<()> {
    let mut cursor: usize = 0; // Index into the visible window
    let mut scroll: usize = 0; // First row on screen

    loop {
        // Recalculate visible lines on each iteration (handles terminal resize)
        let window = visible_lines();
        let layout = ColumnLayout::for_width(term_size().0);

        let mut shown = session.visible().len();
        cursor = cursor.min(shown.saturating_sub(1));
        scroll = scroll_for(cursor, scroll, window);

        // Load-more sentinel: the end of the loaded rows is on screen
        while sentinel_visible(scroll, window, shown) && session.request_more() {
            shown = session.visible().len();
        }

        clear_screen()?;

        let selected_id = {
            let rows = session.visible();
            println!("{}", stats_line(&session.stats()));
            if session.query().is_empty() {
                println!();
            } else {
                println!("search: {}", session.query());
            }

            if rows.is_empty() {
                println!("No matches.");
            } else {
                println!("{}", layout.header());
                for (i, person) in rows.iter().enumerate().skip(scroll).take(window) {
                    print_row(&layout.row(person, i == cursor), i == cursor);
                }
            }

            rows.get(cursor).map(|p| p.id.clone())
        };

        let bar = StatusBar::new()
            .counter(if shown == 0 { 0 } else { cursor + 1 }, session.filtered_len())
            .action("↑↓", "")
            .action("x", "done")
            .action("enter", "view")
            .action("/", "search")
            .separator()
            .action("q", "uit");
        write_footer(&mut io::stdout().lock(), &bar, session.notice())?;

        // Read key
        let code = {
            let _guard = RawModeGuard::new()?;
            match event::read()? {
                Event::Key(KeyEvent { code, .. }) => code,
                _ => continue,
            }
        };
        // A notice stays up until the next key press
        session.dismiss_notice();

        match code {
            KeyCode::Down | KeyCode::Char('j') => {
                if cursor + 1 < shown {
                    cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                cursor = cursor.saturating_sub(1);
            }
            KeyCode::PageDown | KeyCode::Char(' ') | KeyCode::Right => {
                cursor = (cursor + window).min(shown.saturating_sub(1));
            }
            KeyCode::PageUp | KeyCode::Left => {
                cursor = cursor.saturating_sub(window);
            }
            KeyCode::Home | KeyCode::Char('g') => {
                cursor = 0;
            }
            KeyCode::End | KeyCode::Char('G') => {
                cursor = shown.saturating_sub(1);
            }
            KeyCode::Char('x') => {
                if let Some(id) = selected_id {
                    session.toggle_completion(&id);
                }
            }
            KeyCode::Enter => {
                if let Some(id) = selected_id {
                    run_detail(session, &id)?;
                }
            }
            KeyCode::Char('/') => {
                let current = session.query().to_string();
                if let Some(query) = text_input("search: ", Some(&current))? {
                    session.set_query(query.trim());
                    cursor = 0;
                    scroll = 0;
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => {
                break;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Adjust scroll so `cursor` stays on screen
fn scroll_for(cursor: usize, scroll: usize, window: usize) -> usize {
    if cursor < scroll {
        cursor
    } else if cursor >= scroll + window {
        cursor + 1 - window
    } else {
        scroll
    }
}

/// Whether the row after the last loaded one would be on screen
fn sentinel_visible(scroll: usize, window: usize, shown: usize) -> bool {
    scroll + window >= shown
}

fn print_row(line: &str, selected: bool) {
    if selected {
        let mut stdout = io::stdout();
        let _ = stdout.execute(SetAttribute(Attribute::Reverse));
        print!("{}", line);
        let _ = stdout.execute(SetAttribute(Attribute::Reset));
        println!();
    } else {
        println!("{}", line);
    }
}

/// Column layout based on terminal width
struct ColumnLayout {
    name_width: usize,
    phone_width: usize,
    address_width: usize,
}

impl ColumnLayout {
    fn for_width(width: usize) -> Self {
        if width >= 80 {
            // Full display: Name | Phone | Address
            ColumnLayout {
                name_width: 20,
                phone_width: 16,
                address_width: width.saturating_sub(46).min(60),
            }
        } else {
            // Compact display: Name | Phone
            ColumnLayout {
                name_width: 16,
                phone_width: width.saturating_sub(24).min(16),
                address_width: 0,
            }
        }
    }

    fn header(&self) -> String {
        let line = format!(
            "    {:<name_w$}  {:<phone_w$}  ADDRESS",
            "NAME",
            "PHONE",
            name_w = self.name_width,
            phone_w = self.phone_width
        );
        if self.address_width == 0 {
            line.trim_end_matches("ADDRESS").trim_end().to_string()
        } else {
            line
        }
    }

    fn row(&self, person: &Person, selected: bool) -> String {
        let name = truncate(&person.name, self.name_width);
        let phone = truncate(person.phone.as_deref().unwrap_or(""), self.phone_width);
        let mut line = format!(
            "{}{} {:<name_w$}  {:<phone_w$}",
            selection_prefix(selected),
            status_mark(person),
            name,
            phone,
            name_w = self.name_width,
            phone_w = self.phone_width
        );
        if self.address_width > 0 {
            line.push_str("  ");
            line.push_str(&truncate(&person.address, self.address_width));
        }
        line.trim_end().to_string()
    }
}
