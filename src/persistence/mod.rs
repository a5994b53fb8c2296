use std::{
    collections::BTreeMap,
    fs,
    path::{
        Path,
        PathBuf,
    },
    sync::Mutex,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::AnkifyError;

const APP_NAME: &str = "ankify";
pub const STORAGE_FILE: &str = "storage.json";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json_at<T: Serialize>(data: &T, file_path: &Path) -> Result<(), AnkifyError> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(file_path, json)?;
    tracing::debug!(path = %file_path.display(), "data saved");
    Ok(())
}

pub fn load_json_at<T: for<'de> Deserialize<'de> + Default>(
    file_path: &Path,
) -> Result<T, AnkifyError> {
    if !file_path.exists() {
        return Ok(T::default());
    }

    let json = fs::read_to_string(file_path)?;
    let data: T = serde_json::from_str(&json)?;
    tracing::debug!(path = %file_path.display(), "data loaded");
    Ok(data)
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Default>(filename: &str) -> T {
    match load_json_at::<T>(&get_data_file_path(filename)) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!(file = filename, error = %e, "failed to load, using defaults");
            T::default()
        }
    }
}

/// String key/value storage that outlives the window, like a browser's local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, AnkifyError>;
    fn set(&self, key: &str, value: &str) -> Result<(), AnkifyError>;
}

/// All keys live in one JSON object on disk. Every `set` rewrites the file.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    /// `storage.json` in the platform data directory.
    pub fn in_app_data_dir() -> Self {
        Self::new(get_data_file_path(STORAGE_FILE))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AnkifyError> {
        let _guard = self.lock.lock().map_err(|e| AnkifyError::Custom(e.to_string()))?;
        let entries: BTreeMap<String, String> = load_json_at(&self.path)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AnkifyError> {
        let _guard = self.lock.lock().map_err(|e| AnkifyError::Custom(e.to_string()))?;
        // A corrupt file is replaced rather than blocking every future write.
        let mut entries: BTreeMap<String, String> = load_json_at(&self.path).unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        save_json_at(&entries, &self.path)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AnkifyError> {
        let entries = self.entries.lock().map_err(|e| AnkifyError::Custom(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AnkifyError> {
        let mut entries = self.entries.lock().map_err(|e| AnkifyError::Custom(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
