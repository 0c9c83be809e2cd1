use super::domain::{EvaluationRecord, IdSequence, PlayerId, Roster};
use chrono::Utc;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Name of the single blob holding the serialized roster.
pub const ROSTER_BLOB_NAME: &str = "hawkeye_data";

/// Durable home of the roster blob. The whole roster is read and written as
/// one value; there is no partial update.
pub trait RosterBlob: Send {
    fn read(&self) -> Result<Option<String>, StoreError>;
    fn write(&self, contents: &str) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("roster storage unavailable: {0}")]
    Io(#[from] std::io::Error),
    #[error("roster could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Stores the blob as `<name>.json` inside a data directory.
#[derive(Debug, Clone)]
pub struct FileBlob {
    path: PathBuf,
}

impl FileBlob {
    pub fn new<P: AsRef<Path>>(data_dir: P, name: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{name}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RosterBlob for FileBlob {
    fn read(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    // Written beside the target then renamed, so readers never see half a roster.
    fn write(&self, contents: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, contents)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

/// Process-local blob used by tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlob {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryBlob {
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Arc::new(Mutex::new(Some(contents.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().expect("blob mutex poisoned").clone()
    }
}

impl RosterBlob for MemoryBlob {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        *self.contents.lock().expect("blob mutex poisoned") = Some(contents.to_string());
        Ok(())
    }
}

/// Owns the canonical roster and writes it back after every mutation.
pub struct RosterStore<B> {
    blob: B,
    roster: Roster,
    ids: IdSequence,
}

impl<B: RosterBlob> RosterStore<B> {
    /// Reads the blob. A missing, unreadable or corrupt blob yields an empty
    /// roster; the failure is logged and not reported to the caller.
    pub fn load(blob: B) -> Self {
        let loaded = match blob.read() {
            Ok(Some(contents)) => match serde_json::from_str::<Roster>(&contents) {
                Ok(roster) => roster,
                Err(err) => {
                    warn!(%err, "stored roster is corrupt; starting empty");
                    Roster::new()
                }
            },
            Ok(None) => {
                debug!("no stored roster; starting empty");
                Roster::new()
            }
            Err(err) => {
                warn!(%err, "stored roster unreadable; starting empty");
                Roster::new()
            }
        };

        let mut roster = Roster::new();
        let duplicates = roster.replace(loaded.records().to_vec());
        if duplicates > 0 {
            warn!(duplicates, "dropped stored records with repeated ids");
        }

        let ids = IdSequence::seeded(roster.ids(), Utc::now());
        info!(players = roster.len(), "roster loaded");
        Self { blob, roster, ids }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn records(&self) -> &[EvaluationRecord] {
        self.roster.records()
    }

    pub fn get(&self, id: PlayerId) -> Option<&EvaluationRecord> {
        self.roster.get(id)
    }

    pub fn next_id(&mut self) -> PlayerId {
        self.ids.next_id()
    }

    pub fn ids_mut(&mut self) -> &mut IdSequence {
        &mut self.ids
    }

    pub fn save(&self) -> Result<(), StoreError> {
        let contents = serde_json::to_string(&self.roster)?;
        self.blob.write(&contents)?;
        debug!(players = self.roster.len(), "roster saved");
        Ok(())
    }

    pub fn upsert(&mut self, record: EvaluationRecord) -> Result<(), StoreError> {
        self.ids.observe(record.id());
        let previous = self.roster.clone();
        self.roster.upsert(record);
        self.commit(previous)
    }

    /// Removes a record. Unknown ids leave the roster unchanged and still succeed.
    pub fn delete(&mut self, id: PlayerId) -> Result<bool, StoreError> {
        let previous = self.roster.clone();
        let removed = self.roster.remove(id);
        self.commit(previous)?;
        Ok(removed)
    }

    /// Puts freshly imported records ahead of the existing ones.
    pub fn prepend_all(&mut self, records: Vec<EvaluationRecord>) -> Result<(), StoreError> {
        for record in &records {
            self.ids.observe(record.id());
        }
        let previous = self.roster.clone();
        let mut incoming = records;
        incoming.retain(|record| !self.roster.contains(record.id()));
        self.roster.prepend(incoming);
        self.commit(previous)
    }

    pub fn replace_all(&mut self, records: Vec<EvaluationRecord>) -> Result<(), StoreError> {
        for record in &records {
            self.ids.observe(record.id());
        }
        let previous = self.roster.clone();
        let duplicates = self.roster.replace(records);
        if duplicates > 0 {
            warn!(duplicates, "dropped replacement records with repeated ids");
        }
        self.commit(previous)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        let previous = self.roster.clone();
        self.roster.clear();
        self.commit(previous)
    }

    // The in-memory roster only moves forward once the blob holds it.
    fn commit(&mut self, previous: Roster) -> Result<(), StoreError> {
        if let Err(err) = self.save() {
            warn!(%err, "roster save failed; keeping previous roster");
            self.roster = previous;
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::domain::PlayerDraft;

    fn draft(first: &str, last: &str) -> PlayerDraft {
        PlayerDraft {
            first_name: first.to_string(),
            last_name: last.to_string(),
            number: "1".to_string(),
            ..PlayerDraft::new()
        }
    }

    fn create<B: RosterBlob>(store: &mut RosterStore<B>, first: &str, last: &str) -> PlayerId {
        let id = store.next_id();
        let record = EvaluationRecord::from_draft(draft(first, last), id, Utc::now());
        store.upsert(record).expect("upsert saves");
        id
    }

    #[test]
    fn missing_blob_loads_empty() {
        let store = RosterStore::load(MemoryBlob::default());
        assert!(store.roster().is_empty());
    }

    #[test]
    fn corrupt_blob_is_swallowed() {
        let store = RosterStore::load(MemoryBlob::with_contents("{not json"));
        assert!(store.roster().is_empty());
    }

    #[test]
    fn every_mutation_rewrites_the_blob() {
        let blob = MemoryBlob::default();
        let mut store = RosterStore::load(blob.clone());
        let id = create(&mut store, "Ava", "Smith");

        let saved = blob.contents().expect("blob written");
        assert!(saved.contains("\"firstName\":\"Ava\""));

        store.delete(id).expect("delete saves");
        assert_eq!(blob.contents().as_deref(), Some("[]"));
    }

    #[test]
    fn deleting_unknown_id_is_a_no_op() {
        let mut store = RosterStore::load(MemoryBlob::default());
        create(&mut store, "Ava", "Smith");
        let before = store.records().to_vec();

        let removed = store.delete(PlayerId(42)).expect("delete succeeds");
        assert!(!removed);
        assert_eq!(store.records(), &before[..]);
    }

    #[test]
    fn reload_restores_saved_roster_and_never_reuses_ids() {
        let blob = MemoryBlob::default();
        let mut store = RosterStore::load(blob.clone());
        let dropped = create(&mut store, "Mia", "Jones");
        let kept = create(&mut store, "Ava", "Smith");
        store.delete(dropped).expect("delete saves");

        let mut reloaded = RosterStore::load(blob);
        assert_eq!(reloaded.records().len(), 1);
        assert_eq!(reloaded.records()[0].id(), kept);
        let fresh = reloaded.next_id();
        assert!(fresh > dropped);
    }

    #[test]
    fn clear_and_replace_persist_whole_roster() {
        let blob = MemoryBlob::default();
        let mut store = RosterStore::load(blob.clone());
        create(&mut store, "Ava", "Smith");
        store.clear().expect("clear saves");
        assert_eq!(blob.contents().as_deref(), Some("[]"));

        let id = store.next_id();
        let record = EvaluationRecord::from_draft(draft("Zoe", "Park"), id, Utc::now());
        store
            .replace_all(vec![record.clone(), record])
            .expect("replace saves");
        assert_eq!(store.records().len(), 1);
    }

    struct FailingBlob(Option<String>);

    impl RosterBlob for FailingBlob {
        fn read(&self) -> Result<Option<String>, StoreError> {
            Ok(self.0.clone())
        }

        fn write(&self, _contents: &str) -> Result<(), StoreError> {
            Err(std::io::Error::new(ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[test]
    fn failed_saves_leave_the_roster_untouched() {
        let mut store = RosterStore::load(FailingBlob(None));
        let id = store.next_id();
        let record = EvaluationRecord::from_draft(draft("Ava", "Smith"), id, Utc::now());

        assert!(store.upsert(record.clone()).is_err());
        assert!(store.records().is_empty());

        assert!(store.prepend_all(vec![record.clone()]).is_err());
        assert!(store.records().is_empty());

        assert!(store.replace_all(vec![record]).is_err());
        assert!(store.records().is_empty());
    }

    #[test]
    fn failed_delete_and_clear_keep_existing_players() {
        let blob = MemoryBlob::default();
        let mut seeded = RosterStore::load(blob.clone());
        let id = create(&mut seeded, "Ava", "Smith");
        let contents = blob.contents().expect("blob written");

        let mut store = RosterStore::load(FailingBlob(Some(contents)));
        assert!(store.delete(id).is_err());
        assert!(store.clear().is_err());
        assert_eq!(store.records().len(), 1);
        assert_eq!(store.records()[0].id(), id);
    }

    #[test]
    fn file_blob_round_trips_through_disk() {
        let dir = std::env::temp_dir().join(format!("hawkeye-store-{}", std::process::id()));
        fs::remove_dir_all(&dir).ok();
        let blob = FileBlob::new(&dir, ROSTER_BLOB_NAME);
        assert!(blob.read().expect("read works").is_none());

        let mut store = RosterStore::load(blob.clone());
        create(&mut store, "Ava", "Smith");

        let reloaded = RosterStore::load(FileBlob::new(&dir, ROSTER_BLOB_NAME));
        assert_eq!(reloaded.records().len(), 1);
        assert_eq!(blob.path().file_name().and_then(|n| n.to_str()), Some("hawkeye_data.json"));

        fs::remove_dir_all(&dir).ok();
    }
}
