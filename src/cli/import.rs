use anyhow::{anyhow, Result};
use rfd::FileDialog;
use std::path::{Path, PathBuf};

use crate::cli::display::stats_line;
use crate::import::{ImportGate, ImportSummary};
use crate::session::Session;
use crate::store::BlobStore;

/// Opens a native file picker dialog to select a CSV file.
/// Returns `None` if the user cancels the dialog.
pub fn pick_csv_file() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("CSV files", &["csv"])
        .set_title("Select CSV file to import")
        .pick_file()
}

/// Route Ctrl+C to the running import; with nothing running, exit as usual.
/// The handler can only be installed once per process, so later calls are ignored.
pub fn install_cancel_handler(gate: ImportGate) {
    let _ = ctrlc::set_handler(move || {
        if gate.cancel() {
            eprintln!("\nCancelling import...");
        } else {
            std::process::exit(130);
        }
    });
}

/// Execute the import command
pub async fn run_import<S: BlobStore>(session: &mut Session<S>, file: Option<&Path>) -> Result<()> {
    let path = match file {
        Some(path) => path.to_path_buf(),
        None => match pick_csv_file() {
            Some(path) => path,
            None => {
                println!("No file selected.");
                return Ok(());
            }
        },
    };

    eprintln!("Importing: {}", path.display());
    match session.import_file(&path).await {
        Ok(summary) => {
            println!("{}", format_summary(&summary));
            println!("{}", stats_line(&session.stats()));
            Ok(())
        }
        Err(_) => {
            let message = session.notice().unwrap_or("import failed").to_string();
            session.dismiss_notice();
            Err(anyhow!(message))
        }
    }
}

/// "Added 12 (1 skipped, gbk, comma-delimited)"
pub fn format_summary(summary: &ImportSummary) -> String {
    format!(
        "Added {} ({} skipped, {}, {}-delimited)",
        summary.added, summary.skipped, summary.encoding, summary.delimiter
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::{Delimiter, ImportOptions, TextEncoding};
    use crate::store::MemoryStore;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn session() -> Session<MemoryStore> {
        Session::with_options(MemoryStore::new(), 100, ImportOptions::default())
    }

    #[test]
    fn test_format_summary() {
        let summary = ImportSummary {
            added: 12,
            skipped: 1,
            delimiter: Delimiter::Semicolon,
            encoding: TextEncoding::Gbk,
        };
        assert_eq!(format_summary(&summary), "Added 12 (1 skipped, gbk, semicolon-delimited)");
    }

    #[tokio::test]
    async fn test_import_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name,address,phone\nAlice,\"1 Main, Apt 2\",555\nBob,2 Elm").unwrap();

        let mut s = session();
        run_import(&mut s, Some(file.path())).await.unwrap();

        assert_eq!(s.stats().total, 2);
        assert_eq!(s.people()[0].address, "1 Main, Apt 2");
    }

    #[tokio::test]
    async fn test_import_header_only_reports_parse_failure() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "name,address").unwrap();

        let mut s = session();
        let err = run_import(&mut s, Some(file.path())).await.unwrap_err();

        assert_eq!(err.to_string(), "file parse failed");
        assert!(s.notice().is_none());
        assert!(s.people().is_empty());
    }

    #[tokio::test]
    async fn test_import_missing_file() {
        let mut s = session();
        let err = run_import(&mut s, Some(Path::new("/nonexistent/file.csv")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/file.csv"));
    }
}
