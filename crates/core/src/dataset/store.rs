use std::sync::Arc;

use parking_lot::RwLock;

use crate::models::Entry;

/// Thread-safe, write-once store for the loaded dataset.
///
/// The dataset is installed exactly once after the startup load and is
/// read-only for the rest of the session; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    inner: Arc<RwLock<Vec<Entry>>>,
}

impl DatasetStore {
    /// Empty store, populated later via [`DatasetStore::install`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the loaded entries. Called once after the dataset load
    /// completes; any previous contents are replaced.
    pub fn install(&self, entries: Vec<Entry>) {
        *self.inner.write() = entries;
    }

    /// Whether the startup load has completed with a non-empty dataset.
    pub fn is_loaded(&self) -> bool {
        !self.inner.read().is_empty()
    }

    /// Number of area/mission records.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Unique campaign names in first-seen dataset order.
    pub fn campaigns(&self) -> Vec<String> {
        let entries = self.inner.read();
        let mut campaigns: Vec<String> = Vec::new();
        for entry in entries.iter() {
            if entry.campaign.is_empty() {
                continue;
            }
            if !campaigns
                .iter()
                .any(|seen| seen.eq_ignore_ascii_case(&entry.campaign))
            {
                campaigns.push(entry.campaign.clone());
            }
        }
        campaigns
    }

    /// Unique area/mission names within a campaign, first-seen order.
    pub fn areas_in(&self, campaign: &str) -> Vec<String> {
        let entries = self.inner.read();
        let mut areas: Vec<String> = Vec::new();
        for entry in entries.iter() {
            if !entry.campaign.eq_ignore_ascii_case(campaign) {
                continue;
            }
            if !areas.iter().any(|seen| seen == &entry.name) {
                areas.push(entry.name.clone());
            }
        }
        areas
    }

    /// The record for a campaign/name pair.
    pub fn find(&self, campaign: &str, name: &str) -> Option<Entry> {
        self.inner
            .read()
            .iter()
            .find(|entry| {
                entry.campaign.eq_ignore_ascii_case(campaign) && entry.name == name
            })
            .cloned()
    }

    /// First record whose name matches, across all campaigns. Used to
    /// resolve a featured-area name without knowing its campaign;
    /// case-insensitive because the wiki's casing is not under our control.
    pub fn find_by_name(&self, name: &str) -> Option<Entry> {
        self.inner
            .read()
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    /// Default selection: the first campaign in dataset order and its first
    /// area.
    pub fn first_selection(&self) -> Option<(String, String)> {
        let campaign = self.campaigns().into_iter().next()?;
        let area = self.areas_in(&campaign).into_iter().next()?;
        Some((campaign, area))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Roster;

    fn entry(campaign: &str, name: &str) -> Entry {
        Entry {
            campaign: campaign.to_string(),
            name: name.to_string(),
            wiki_url: None,
            roster: Roster::Flat { foes: Vec::new() },
            avg_foes: None,
            min_foes: None,
            max_foes: None,
        }
    }

    fn sample_store() -> DatasetStore {
        let store = DatasetStore::new();
        store.install(vec![
            entry("Factions", "Raisu Palace"),
            entry("Factions", "Morostav Trail"),
            entry("Nightfall", "Jokanur Diggings"),
            entry("factions", "Unwaking Waters"),
        ]);
        store
    }

    #[test]
    fn campaigns_come_back_in_first_seen_order() {
        let store = sample_store();
        assert_eq!(store.campaigns(), vec!["Factions", "Nightfall"]);
    }

    #[test]
    fn areas_match_campaign_case_insensitively() {
        let store = sample_store();
        assert_eq!(
            store.areas_in("FACTIONS"),
            vec!["Raisu Palace", "Morostav Trail", "Unwaking Waters"]
        );
        assert_eq!(store.areas_in("Nightfall"), vec!["Jokanur Diggings"]);
        assert!(store.areas_in("Prophecies").is_empty());
    }

    #[test]
    fn find_by_name_resolves_campaign() {
        let store = sample_store();
        let found = store.find_by_name("Jokanur Diggings").expect("present");
        assert_eq!(found.campaign, "Nightfall");
        assert!(store.find_by_name("Kryta").is_none());
    }

    #[test]
    fn find_by_name_ignores_case() {
        let store = sample_store();
        assert!(store.find_by_name("raisu palace").is_some());
    }

    #[test]
    fn first_selection_is_first_campaign_and_area() {
        let store = sample_store();
        assert_eq!(
            store.first_selection(),
            Some(("Factions".to_string(), "Raisu Palace".to_string()))
        );
        assert!(DatasetStore::new().first_selection().is_none());
    }

    #[test]
    fn empty_store_reports_not_loaded() {
        let store = DatasetStore::new();
        assert!(!store.is_loaded());
        store.install(vec![entry("Factions", "Raisu Palace")]);
        assert!(store.is_loaded());
        assert_eq!(store.len(), 1);
    }
}
