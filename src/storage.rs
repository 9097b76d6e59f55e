use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::events::Change;
use crate::models::{Settings, Task};
use crate::state::AppState;

pub const TASKS_KEY: &str = "todos";
pub const CLIENTS_KEY: &str = "clients";
pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "io error: {err}"),
            StorageError::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        StorageError::Io(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        StorageError::Json(value)
    }
}

/// Durable string entries addressed by key.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per entry under `root`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn ensure_dirs(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn write_atomic(&self, path: PathBuf, bytes: &[u8]) -> Result<(), StorageError> {
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut file = match File::open(self.path_for(key)) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut buf = String::new();
        file.read_to_string(&mut buf)?;
        Ok(Some(buf))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write_atomic(self.path_for(key), value.as_bytes())
    }
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads whole collections at startup and rewrites a whole entry after each change.
pub struct Storage<S> {
    backend: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn load_tasks(&self) -> Vec<Task> {
        self.load_or_default(TASKS_KEY)
    }

    pub fn load_clients(&self) -> Vec<String> {
        self.load_or_default(CLIENTS_KEY)
    }

    pub fn load_settings(&self) -> Settings {
        self.load_or_default(SETTINGS_KEY)
    }

    pub fn save_tasks(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        self.save_json(TASKS_KEY, tasks)
    }

    pub fn save_clients(&mut self, clients: &[String]) -> Result<(), StorageError> {
        self.save_json(CLIENTS_KEY, clients)
    }

    pub fn save_settings(&mut self, settings: &Settings) -> Result<(), StorageError> {
        self.save_json(SETTINGS_KEY, settings)
    }

    /// Writes the entry a mutation touched.
    pub fn persist(&mut self, state: &AppState, change: Change) -> Result<(), StorageError> {
        match change {
            Change::Tasks => self.save_tasks(state.tasks().tasks()),
            Change::Clients => self.save_clients(state.clients().clients()),
            Change::Settings => self.save_settings(state.settings()),
        }
    }

    /// Absent, unreadable, and malformed entries all load as the default value.
    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                log::info!("storage: no {key} entry found");
                return T::default();
            }
            Err(err) => {
                log::warn!("storage: failed to read {key}: {err}");
                return T::default();
            }
        };
        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(Some(value)) => {
                log::info!("storage: loaded {key}");
                value
            }
            Ok(None) => T::default(),
            Err(err) => {
                log::warn!("storage: discarding malformed {key}: {err}");
                T::default()
            }
        }
    }

    fn save_json<T: Serialize + ?Sized>(&mut self, key: &str, data: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(data)?;
        if let Err(err) = self.backend.set(key, &json) {
            log::error!("storage: failed to save {key}: {err}");
            return Err(err);
        }
        log::debug!("storage: saved {key} bytes={}", json.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Color;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_tasks() -> Vec<Task> {
        let mut first = Task::new("Draft proposal", day(2024, 5, 1), Some("Acme".into()));
        first.color = Color::Red;
        first.notes = "call first".into();
        first.history = vec!["created".into()];
        let mut second = Task::new("Invoice", day(2024, 12, 31), None);
        second.completed = true;
        vec![first, second]
    }

    #[test]
    fn missing_entries_load_as_empty() {
        let storage = Storage::new(MemoryStore::default());
        assert!(storage.load_tasks().is_empty());
        assert!(storage.load_clients().is_empty());
        assert_eq!(storage.load_settings(), Settings::default());
    }

    #[test]
    fn malformed_or_null_entries_load_as_empty() {
        let mut backend = MemoryStore::default();
        backend.set(TASKS_KEY, "{not json").unwrap();
        backend.set(CLIENTS_KEY, "null").unwrap();
        backend.set(SETTINGS_KEY, "[1, 2]").unwrap();
        let storage = Storage::new(backend);
        assert!(storage.load_tasks().is_empty());
        assert!(storage.load_clients().is_empty());
        assert_eq!(storage.load_settings(), Settings::default());
    }

    #[test]
    fn save_then_load_round_trips_tasks_and_clients() {
        let mut storage = Storage::new(MemoryStore::default());
        let tasks = sample_tasks();
        storage.save_tasks(&tasks).unwrap();
        storage
            .save_clients(&["Acme".to_string(), "Acme".to_string()])
            .unwrap();
        assert_eq!(storage.load_tasks(), tasks);
        assert_eq!(storage.load_clients(), vec!["Acme", "Acme"]);
    }

    #[test]
    fn boundary_year_tasks_reload_next_to_ordinary_ones() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = Storage::new(FileStore::new(dir.path().to_path_buf()));
        let tasks = vec![
            Task::new("ordinary", day(2024, 5, 1), None),
            Task::new("last day", day(9999, 12, 31), None),
            Task::new("first day", day(1, 1, 1), None),
        ];
        storage.save_tasks(&tasks).unwrap();

        let reopened = Storage::new(FileStore::new(dir.path().to_path_buf()));
        assert_eq!(reopened.load_tasks(), tasks);
    }

    #[test]
    fn loads_entries_written_with_utc_timestamps() {
        let mut backend = MemoryStore::default();
        backend
            .set(
                TASKS_KEY,
                r#"[{"text":"X","completed":false,"date":"2024-05-01T12:00:00.000Z","notes":"","color":"orange","client":"","attachments":["a.pdf"],"comments":[],"history":[]}]"#,
            )
            .unwrap();
        let tasks = Storage::new(backend).load_tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].color, Color::Orange);
        assert_eq!(tasks[0].client, None);
        assert_eq!(tasks[0].attachments, vec!["a.pdf"]);
    }

    #[test]
    fn file_store_writes_one_file_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("data"));
        store.ensure_dirs().unwrap();
        let mut storage = Storage::new(store);
        storage.save_tasks(&sample_tasks()).unwrap();
        storage.save_clients(&["Acme".to_string()]).unwrap();
        storage.save_settings(&Settings { dark_mode: false }).unwrap();

        let root = dir.path().join("data");
        assert!(root.join("todos.json").is_file());
        assert!(root.join("clients.json").is_file());
        assert!(root.join("settings.json").is_file());
        assert!(!root.join("todos.tmp").exists());

        let reopened = Storage::new(FileStore::new(root.clone()));
        assert_eq!(reopened.load_tasks(), sample_tasks());
        assert_eq!(reopened.load_clients(), vec!["Acme"]);
        assert!(!reopened.load_settings().dark_mode);

        let raw = fs::read_to_string(root.join("clients.json")).unwrap();
        assert_eq!(raw, r#"["Acme"]"#);
    }

    #[test]
    fn file_store_missing_root_reads_as_absent_and_fails_writes() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("missing"));
        assert!(store.get(TASKS_KEY).unwrap().is_none());
        assert!(store.set(TASKS_KEY, "[]").is_err());
    }

    #[test]
    fn unreadable_entry_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("todos.json")).unwrap();
        let storage = Storage::new(FileStore::new(dir.path().to_path_buf()));
        assert!(storage.load_tasks().is_empty());
    }

    #[test]
    fn persist_writes_only_the_touched_entry() {
        let mut state = AppState::new(Vec::new(), Vec::new(), Settings::default(), day(2024, 5, 1));
        let mut storage = Storage::new(MemoryStore::default());
        let change = state.add_client("Acme").unwrap();
        storage.persist(&state, change).unwrap();
        assert_eq!(storage.backend().get(CLIENTS_KEY).unwrap().as_deref(), Some(r#"["Acme"]"#));
        assert!(storage.backend().get(TASKS_KEY).unwrap().is_none());

        let change = state.toggle_theme();
        storage.persist(&state, change).unwrap();
        assert!(!storage.load_settings().dark_mode);
    }

    #[test]
    fn storage_error_display_prefixes_kind() {
        let err = StorageError::from(std::io::Error::other("boom"));
        assert_eq!(err.to_string(), "io error: boom");
        let json_err = serde_json::from_str::<u8>("x").unwrap_err();
        assert!(StorageError::from(json_err).to_string().starts_with("json error: "));
    }
}
