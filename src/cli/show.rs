use anyhow::{anyhow, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use std::io::{self, IsTerminal};

use super::display::print_person;
use super::ui::{clear_screen, confirm, status, write_footer, RawModeGuard, StatusBar};
use crate::session::Session;
use crate::store::BlobStore;

/// Outcome of resolving a user-supplied identifier
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup {
    Found(String),
    Ambiguous(Vec<String>),
    Missing,
}

/// Resolve an exact id first, then fall back to a search over name, address and phone.
pub fn find_person<S: BlobStore>(session: &Session<S>, identifier: &str) -> Lookup {
    if let Some(person) = session.get(identifier) {
        return Lookup::Found(person.id.clone());
    }

    let needle = identifier.to_lowercase();
    let mut ids: Vec<String> = session
        .people()
        .iter()
        .filter(|p| p.matches(&needle))
        .map(|p| p.id.clone())
        .collect();

    match ids.len() {
        0 => Lookup::Missing,
        1 => Lookup::Found(ids.swap_remove(0)),
        _ => Lookup::Ambiguous(ids),
    }
}

/// Execute the show command
pub fn run_show<S: BlobStore>(session: &mut Session<S>, identifier: &str) -> Result<()> {
    let Some(id) = resolve(session, identifier)? else {
        return Ok(());
    };

    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        return run_detail(session, &id);
    }

    if let Some(person) = session.get(&id) {
        print_person(person);
    }
    Ok(())
}

/// Execute the toggle command
pub fn run_toggle<S: BlobStore>(session: &mut Session<S>, identifier: &str) -> Result<()> {
    let Some(id) = resolve(session, identifier)? else {
        return Ok(());
    };

    if !session.toggle_completion(&id) {
        return Err(anyhow!(session.notice().unwrap_or("Not changed.").to_string()));
    }

    if let Some(person) = session.get(&id) {
        let state = if person.is_completed { "Done." } else { "Pending." };
        status(&format!("{} {}", person.name, state));
    }
    Ok(())
}

/// Detail screen for one person: the only action is flipping completion.
pub fn run_detail<S: BlobStore>(session: &mut Session<S>, id: &str) -> Result<()> {
    if !session.select_for_detail(id) {
        println!("No entry found with ID: {}", id);
        return Ok(());
    }

    let result = detail_loop(session);
    session.close_detail();
    result
}

fn detail_loop<S: BlobStore>(session: &mut Session<S>) -> Result<()> {
    loop {
        let Some(person) = session.selected() else {
            return Ok(());
        };
        let id = person.id.clone();
        let action = if person.is_completed { "mark pending" } else { "mark done" };

        clear_screen()?;
        print_person(person);

        let bar = StatusBar::new()
            .action("x", action)
            .separator()
            .action("esc", "back");
        write_footer(&mut io::stdout().lock(), &bar, session.notice())?;

        let code = {
            let _guard = RawModeGuard::new()?;
            match event::read()? {
                Event::Key(KeyEvent { code, .. }) => code,
                _ => continue,
            }
        };

        match code {
            KeyCode::Char('x') | KeyCode::Enter => {
                session.toggle_completion(&id);
                if session.notice().is_none() {
                    return Ok(());
                }
            }
            KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
            _ => {}
        }
    }
}

/// Confirm-based variant for the menu, where raw key handling is not wanted.
pub fn confirm_toggle<S: BlobStore>(session: &mut Session<S>, identifier: &str) -> Result<()> {
    let Some(id) = resolve(session, identifier)? else {
        return Ok(());
    };
    let Some(person) = session.get(&id) else {
        return Ok(());
    };

    print_person(person);
    println!();
    let prompt = if person.is_completed {
        format!("Mark {} pending?", person.name)
    } else {
        format!("Mark {} done?", person.name)
    };

    if confirm(&prompt)? {
        run_toggle(session, &id)?;
    }
    Ok(())
}

fn resolve<S: BlobStore>(session: &Session<S>, identifier: &str) -> Result<Option<String>> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(anyhow!("Identifier cannot be empty."));
    }

    match find_person(session, identifier) {
        Lookup::Found(id) => Ok(Some(id)),
        Lookup::Missing => {
            println!("No matches.");
            Ok(None)
        }
        Lookup::Ambiguous(ids) => {
            println!("{} matches, use an id:", ids.len());
            for id in ids.iter().take(20) {
                if let Some(person) = session.get(id) {
                    println!("  {}  {}", id, person.name);
                }
            }
            Ok(None)
        }
    }
}
