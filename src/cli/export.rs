use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::models::Person;
use crate::session::Session;
use crate::store::BlobStore;

/// Execute the export command: the working set as CSV, to `file` or stdout.
pub fn run_export<S: BlobStore>(session: &Session<S>, file: Option<&Path>) -> Result<()> {
    match file {
        Some(path) => {
            let out = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(out, session.people())?;
            eprintln!("Exported {} entries to {}", session.people().len(), path.display());
        }
        None => write_csv(io::stdout().lock(), session.people())?,
    }
    Ok(())
}

/// Write `people` with a `name,address,phone,completed` header.
pub fn write_csv<W: Write>(out: W, people: &[Person]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["name", "address", "phone", "completed"])?;
    for person in people {
        writer.write_record([
            person.name.as_str(),
            person.address.as_str(),
            person.phone.as_deref().unwrap_or(""),
            if person.is_completed { "yes" } else { "no" },
        ])?;
    }
    writer.flush()?;
    Ok(())
}
