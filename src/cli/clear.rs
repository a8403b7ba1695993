use anyhow::{anyhow, Result};

use super::ui::{confirm, status};
use crate::session::Session;
use crate::store::BlobStore;

/// Execute the clear command
pub fn run_clear<S: BlobStore>(session: &mut Session<S>, force: bool) -> Result<()> {
    let total = session.stats().total;
    if total == 0 {
        status("Nothing to clear.");
        return Ok(());
    }

    if !force && !confirm(&format!("Clear all {} entries?", total)).unwrap_or(false) {
        return Ok(());
    }

    if !session.clear_all() {
        let message = session.notice().unwrap_or("clear failed").to_string();
        session.dismiss_notice();
        return Err(anyhow!(message));
    }

    status("Cleared.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::ImportOptions;
    use crate::models::Person;
    use crate::store::MemoryStore;

    fn seeded(store: &MemoryStore) -> Session<MemoryStore> {
        Session::with_options(store.clone(), 100, ImportOptions::default())
    }

    fn store_with_one() -> MemoryStore {
        let people = vec![Person::new("p-1-1".into(), "A".into(), "B".into(), None)];
        MemoryStore::with_blob(serde_json::to_vec(&people).unwrap())
    }

    #[test]
    fn test_clear_forced() {
        let store = store_with_one();
        let mut session = seeded(&store);
        run_clear(&mut session, true).unwrap();

        assert!(session.people().is_empty());
        assert_eq!(store.blob().as_deref(), Some(&b"[]"[..]));
    }

    #[test]
    fn test_clear_empty_is_noop() {
        let store = MemoryStore::new();
        let mut session = seeded(&store);
        run_clear(&mut session, true).unwrap();
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_clear_persist_failure() {
        let store = store_with_one();
        store.set_fail_saves(true);
        let mut session = seeded(&store);

        assert!(run_clear(&mut session, true).is_err());
        assert_eq!(session.people().len(), 1);
    }
}
