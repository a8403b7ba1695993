use crate::models::{Person, Stats};

/// One-line summary shown above lists: "total 120  done 30  pending 90  25%"
pub fn stats_line(stats: &Stats) -> String {
    format!(
        "total {}  done {}  pending {}  {}%",
        stats.total,
        stats.completed,
        stats.pending,
        stats.completion_percent()
    )
}

/// Completion marker used in list rows
#[inline]
pub fn status_mark(person: &Person) -> &'static str {
    if person.is_completed { "✓" } else { "·" }
}

/// Print a full person with clean formatting (only non-empty fields)
pub fn print_person(person: &Person) {
    let name = if person.name.is_empty() { "(unnamed)" } else { person.name.as_str() };
    println!("{}\n", name);

    if let Some(ref phone) = person.phone {
        println!("  {}", phone);
    }
    if !person.address.is_empty() {
        println!("  {}", person.address);
    }
    if let Some(ref notes) = person.notes {
        if !notes.is_empty() {
            println!("  {}", notes);
        }
    }

    let state = if person.is_completed { "done" } else { "pending" };
    println!("\n  {}  {}", state, person.id);
}

/// Print aggregate counts
pub fn run_stats(stats: &Stats) {
    println!("{}", stats_line(stats));
}
