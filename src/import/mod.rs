//! Contact list import.
//!
//! Raw bytes are decoded, the delimiter is sniffed from the header line, and
//! each data line becomes a [`Person`]. Parsing hands control back to the
//! runtime every `yield_every` lines and checks for cancellation there; the
//! working set is only touched once parsing has finished.

mod delimiter;
mod encoding;
mod gate;
mod record;

pub use delimiter::Delimiter;
pub use encoding::{decode, Decoded, TextEncoding};
pub use gate::{ImportGate, ImportGuard};
pub use record::{split_fields, Record};

use log::{debug, info, trace, warn};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::DEFAULT_YIELD_EVERY;
use crate::error::ImportError;
use crate::models::Person;
use crate::store::{BlobStore, WorkingSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Lines processed between cooperative yields.
    pub yield_every: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            yield_every: DEFAULT_YIELD_EVERY,
        }
    }
}

/// Result of a successful import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    /// Data lines dropped for having fewer than two fields.
    pub skipped: usize,
    pub delimiter: Delimiter,
    pub encoding: TextEncoding,
}

/// People parsed from decoded text, not yet merged anywhere.
#[derive(Debug, Default)]
pub struct Parsed {
    pub people: Vec<Person>,
    pub skipped: usize,
    /// `None` when the text had no non-empty line at all.
    pub delimiter: Option<Delimiter>,
}

/// Read an import file without blocking the runtime.
pub async fn read_file(path: &Path) -> Result<Vec<u8>, ImportError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })
}

/// Parse every data line of `text`. The first non-empty line is the header:
/// it picks the delimiter and is never turned into a person.
pub async fn parse_people(
    text: &str,
    batch_stamp: i64,
    yield_every: usize,
    cancel: &AtomicBool,
) -> Result<Parsed, ImportError> {
    let yield_every = yield_every.max(1);
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let Some(header) = lines.next() else {
        return Ok(Parsed::default());
    };
    let delimiter = Delimiter::sniff(header);
    debug!("delimiter: {}", delimiter);

    let mut parsed = Parsed {
        delimiter: Some(delimiter),
        ..Parsed::default()
    };

    for (offset, line) in lines.enumerate() {
        let line_index = offset + 1;
        match Record::parse(line, delimiter) {
            Some(record) => parsed.people.push(Person::new(
                Person::make_id(batch_stamp, line_index),
                record.name,
                record.address,
                record.phone,
            )),
            None => parsed.skipped += 1,
        }

        if line_index % yield_every == 0 {
            trace!("yielding after {} lines", line_index);
            tokio::task::yield_now().await;
            if cancel.load(Ordering::SeqCst) {
                return Err(ImportError::Cancelled);
            }
        }
    }

    Ok(parsed)
}

/// Decode and parse `bytes`, then append the new people to `set`.
///
/// Fails without touching `set` when no line produced a person, when
/// cancelled, or when persisting the combined set fails.
pub async fn import_bytes<S: BlobStore>(
    set: &mut WorkingSet<S>,
    bytes: &[u8],
    options: &ImportOptions,
    cancel: &AtomicBool,
) -> Result<ImportSummary, ImportError> {
    let decoded = decode(bytes);
    let batch_stamp = set.next_batch_stamp();
    let parsed = parse_people(&decoded.text, batch_stamp, options.yield_every, cancel).await?;

    let delimiter = match parsed.delimiter {
        Some(delimiter) if !parsed.people.is_empty() => delimiter,
        _ if decoded.malformed => {
            warn!("no records: bytes are not valid UTF-8 or GBK");
            return Err(ImportError::Decode);
        }
        _ => return Err(ImportError::Parse),
    };

    let summary = ImportSummary {
        added: parsed.people.len(),
        skipped: parsed.skipped,
        delimiter,
        encoding: decoded.encoding,
    };
    set.append(parsed.people)?;

    info!(
        "imported {} people ({} skipped, {}, {})",
        summary.added, summary.skipped, summary.encoding, summary.delimiter
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::collections::HashSet;

    fn not_cancelled() -> AtomicBool {
        AtomicBool::new(false)
    }

    async fn import(set: &mut WorkingSet<MemoryStore>, text: &str) -> Result<ImportSummary, ImportError> {
        import_bytes(set, text.as_bytes(), &ImportOptions::default(), &not_cancelled()).await
    }

    #[tokio::test]
    async fn test_counts_and_unique_ids() {
        let mut set = WorkingSet::open(MemoryStore::new());
        let text = "name,address,phone\nAlice,1 Main St,555\nlonely\nBob,2 Elm St\nCarol,\"3 Oak, Apt 4\",777\n";

        let summary = import(&mut set, text).await.unwrap();

        // 5 lines, minus the header, minus the one-column line
        assert_eq!(summary.added, 3);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.delimiter, Delimiter::Comma);
        assert_eq!(summary.encoding, TextEncoding::Utf8);
        assert_eq!(set.len(), 3);

        let ids: HashSet<&str> = set.people().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(set.people().iter().all(|p| !p.is_completed && p.notes.is_none()));
        assert_eq!(set.people()[2].address, "3 Oak, Apt 4");
        assert_eq!(set.people()[1].phone, None);
    }

    #[tokio::test]
    async fn test_reimport_appends_without_dedup() {
        let mut set = WorkingSet::open(MemoryStore::new());
        let text = "name,address\nAlice,A\nBob,B\n";

        import(&mut set, text).await.unwrap();
        import(&mut set, text).await.unwrap();

        let names: Vec<&str> = set.people().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Alice", "Bob"]);

        let ids: HashSet<&str> = set.people().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), 4);
    }

    #[tokio::test]
    async fn test_header_only_fails_and_leaves_set() {
        let store = MemoryStore::new();
        let mut set = WorkingSet::open(store.clone());
        import(&mut set, "name,address\nAlice,A\n").await.unwrap();

        let err = import(&mut set, "name,address\n").await.unwrap_err();
        assert!(matches!(err, ImportError::Parse));
        assert_eq!(err.to_string(), "file parse failed");
        assert_eq!(set.len(), 1);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_file_fails() {
        let mut set = WorkingSet::open(MemoryStore::new());
        assert!(matches!(import(&mut set, "").await, Err(ImportError::Parse)));
        assert!(matches!(import(&mut set, "\n  \r\n\n").await, Err(ImportError::Parse)));
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_all_single_column_fails() {
        let mut set = WorkingSet::open(MemoryStore::new());
        let err = import(&mut set, "names\nAlice\nBob\n").await.unwrap_err();
        assert!(matches!(err, ImportError::Parse));
    }

    #[tokio::test]
    async fn test_undecodable_bytes_report_decode() {
        let mut set = WorkingSet::open(MemoryStore::new());
        let err = import_bytes(
            &mut set,
            &[0xFF, 0xFF, 0x0A, 0xFF, 0x81],
            &ImportOptions::default(),
            &not_cancelled(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ImportError::Decode));
        assert_eq!(err.to_string(), "file parse failed");
    }

    #[tokio::test]
    async fn test_gbk_semicolon_crlf() {
        let (bytes, _, _) = encoding_rs::GBK.encode("姓名;地址;电话\r\n张三;北京市;13800000000\r\n李四;上海市\r\n");
        let mut set = WorkingSet::open(MemoryStore::new());

        let summary = import_bytes(&mut set, &bytes, &ImportOptions::default(), &not_cancelled())
            .await
            .unwrap();

        assert_eq!(summary.encoding, TextEncoding::Gbk);
        assert_eq!(summary.delimiter, Delimiter::Semicolon);
        assert_eq!(set.people()[0].name, "张三");
        assert_eq!(set.people()[0].phone.as_deref(), Some("13800000000"));
        assert_eq!(set.people()[1].address, "上海市");
    }

    #[tokio::test]
    async fn test_tab_delimited() {
        let mut set = WorkingSet::open(MemoryStore::new());
        let summary = import(&mut set, "name\taddress\nAlice\tA St\n").await.unwrap();
        assert_eq!(summary.delimiter, Delimiter::Tab);
        assert_eq!(set.people()[0].address, "A St");
    }

    #[tokio::test]
    async fn test_large_import_yields_and_completes() {
        let mut text = String::from("name,address,phone\n");
        for i in 0..2500 {
            text.push_str(&format!("Person {},Street {},{}\n", i, i, 1000 + i));
        }
        let mut set = WorkingSet::open(MemoryStore::new());

        let summary = import(&mut set, &text).await.unwrap();

        assert_eq!(summary.added, 2500);
        assert_eq!(set.people()[2499].name, "Person 2499");
    }

    #[tokio::test]
    async fn test_cancel_at_yield_point_applies_nothing() {
        let mut text = String::from("name,address\n");
        for i in 0..50 {
            text.push_str(&format!("P{},S{}\n", i, i));
        }
        let store = MemoryStore::new();
        let mut set = WorkingSet::open(store.clone());
        let cancel = AtomicBool::new(true);

        let err = import_bytes(&mut set, text.as_bytes(), &ImportOptions { yield_every: 10 }, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::Cancelled));
        assert!(set.is_empty());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_flag_only_read_at_yield_points() {
        let mut text = String::from("name,address\n");
        for i in 0..50 {
            text.push_str(&format!("P{},S{}\n", i, i));
        }
        let mut set = WorkingSet::open(MemoryStore::new());
        let cancel = AtomicBool::new(true);

        // 50 data lines never reach line 1000, so the raised flag is never seen
        let summary = import_bytes(&mut set, text.as_bytes(), &ImportOptions { yield_every: 1000 }, &cancel)
            .await
            .unwrap();
        assert_eq!(summary.added, 50);
    }

    #[tokio::test]
    async fn test_parse_hands_control_back_to_runtime() {
        let mut text = String::from("name,address\n");
        for i in 0..50 {
            text.push_str(&format!("P{},S{}\n", i, i));
        }
        let cancel = not_cancelled();

        // The second branch only runs once the parse suspends at its first yield
        let (parsed, _) = tokio::join!(parse_people(&text, 1, 10, &cancel), async {
            cancel.store(true, Ordering::SeqCst);
        });

        assert!(matches!(parsed, Err(ImportError::Cancelled)));
    }

    #[tokio::test]
    async fn test_persist_failure_leaves_set() {
        let store = MemoryStore::new();
        let mut set = WorkingSet::open(store.clone());
        store.set_fail_saves(true);

        let err = import(&mut set, "name,address\nAlice,A\n").await.unwrap_err();

        assert!(matches!(err, ImportError::Persist(_)));
        assert!(set.is_empty());
        assert_eq!(store.blob(), None);
    }

    #[tokio::test]
    async fn test_ids_carry_line_index() {
        let mut set = WorkingSet::open(MemoryStore::new());
        import(&mut set, "h1,h2\n\nAlice,A\nBob,B\n").await.unwrap();

        let first = &set.people()[0];
        let stamp = first.batch_stamp().unwrap();
        assert_eq!(first.id, Person::make_id(stamp, 1));
        assert_eq!(set.people()[1].id, Person::make_id(stamp, 2));
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = read_file(Path::new("/nonexistent/contacts.csv")).await.unwrap_err();
        assert!(matches!(err, ImportError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/contacts.csv"));
    }
}
