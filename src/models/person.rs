use serde::{Deserialize, Serialize};

/// One row of the working set.
///
/// Serialized with camelCase keys so the persisted blob reads
/// `{"id":..,"name":..,"address":..,"phone":..,"isCompleted":..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
    /// Reserved; never written by the import path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Person {
    pub fn new(id: String, name: String, address: String, phone: Option<String>) -> Self {
        Self {
            id,
            name,
            address,
            phone: phone.filter(|p| !p.is_empty()),
            is_completed: false,
            notes: None,
        }
    }

    /// Build the id for the record at `line_index` of the import batch stamped `batch_stamp`.
    pub fn make_id(batch_stamp: i64, line_index: usize) -> String {
        format!("p-{}-{}", batch_stamp, line_index)
    }

    /// Extract the batch stamp from an id produced by [`Person::make_id`].
    pub fn batch_stamp(&self) -> Option<i64> {
        let rest = self.id.strip_prefix("p-")?;
        let (stamp, _) = rest.split_once('-')?;
        stamp.parse().ok()
    }

    /// Case-insensitive substring match against name, address and phone.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.address.to_lowercase().contains(needle)
            || self
                .phone
                .as_deref()
                .map_or(false, |p| p.to_lowercase().contains(needle))
    }
}
