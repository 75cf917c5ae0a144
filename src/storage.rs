//! Persistent key/value storage for the signed-in user
//!
//! Native builds keep one file per key under the user's local data directory;
//! wasm builds keep values in memory for the lifetime of the page.

#[cfg(target_arch = "wasm32")]
use once_cell::sync::Lazy;
#[cfg(target_arch = "wasm32")]
use std::collections::HashMap;
#[cfg(target_arch = "wasm32")]
use std::sync::Mutex;

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("storage io: {0}")]
    Io(#[from] io::Error),

    #[error("storage encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(target_arch = "wasm32")]
static MEMORY: Lazy<Mutex<HashMap<String, String>>> = Lazy::new(|| Mutex::new(HashMap::new()));

/// Sanitize storage key for filesystem use
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}

#[derive(Clone, Debug)]
pub struct KeyValueStore {
    #[cfg(not(target_arch = "wasm32"))]
    root: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for KeyValueStore {
    fn default() -> Self {
        let root = dirs::data_local_dir()
            .map(|dir| dir.join("freshair").join("storage"))
            .unwrap_or_else(|| PathBuf::from("cache").join("storage"));
        Self { root }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl KeyValueStore {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    pub fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    pub fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for KeyValueStore {
    fn default() -> Self {
        Self {}
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore {
    pub fn get(&self, key: &str) -> Option<String> {
        MEMORY.lock().ok()?.get(&sanitize_key(key)).cloned()
    }

    pub fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if let Ok(mut memory) = MEMORY.lock() {
            memory.insert(sanitize_key(key), value.to_string());
        }
        Ok(())
    }

    pub fn delete(&self, key: &str) -> StorageResult<()> {
        if let Ok(mut memory) = MEMORY.lock() {
            memory.remove(&sanitize_key(key));
        }
        Ok(())
    }
}

impl KeyValueStore {
    pub fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring unreadable stored value");
                None
            }
        }
    }

    pub fn set_json<T: serde::Serialize>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}
