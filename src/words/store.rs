use std::path::{Path, PathBuf};
use std::sync::Arc;
use parking_lot::RwLock;
use serde::{Serialize, Deserialize};
use crate::error::VocaError;
use crate::words::model::{Folder, Word, WordStats};

/// Everything the store persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default)]
    pub folders: Vec<Folder>,
}

impl Library {
    fn get(&self, id: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    fn upsert_word(&mut self, word: &Word) {
        match self.words.iter_mut().find(|w| w.id == word.id) {
            Some(existing) => *existing = word.clone(),
            None => self.words.push(word.clone()),
        }
    }

    fn update_progress(&mut self, id: &str, learning_rate: u8, stats: &WordStats) -> Result<(), VocaError> {
        let word = self.words
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| not_found(id))?;
        word.learning_rate = learning_rate;
        word.stats = stats.clone();
        Ok(())
    }

    fn upsert_folder(&mut self, folder: &Folder) {
        match self.folders.iter_mut().find(|f| f.id == folder.id) {
            Some(existing) => *existing = folder.clone(),
            None => self.folders.push(folder.clone()),
        }
    }

    fn in_folder(&self, folder_id: Option<&str>) -> Vec<Word> {
        self.words
            .iter()
            .filter(|w| w.folder_id.as_deref() == folder_id)
            .cloned()
            .collect()
    }
}

fn not_found(id: &str) -> VocaError {
    VocaError::new(format!("Word not found: {}", id), "store")
}

/// In-process store, mostly for tests and embedding.
#[derive(Clone, Default)]
pub struct MemoryWordStore {
    library: Arc<RwLock<Library>>,
}

impl MemoryWordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_words<I: IntoIterator<Item = Word>>(words: I) -> Self {
        let library = Library {
            words: words.into_iter().collect(),
            folders: Vec::new(),
        };
        MemoryWordStore {
            library: Arc::new(RwLock::new(library)),
        }
    }
}

/// File-backed store keeping the whole library in one JSON document.
/// The library is cached in memory; a change becomes visible only once the
/// file has been rewritten. Writes from all clones are serialized.
#[derive(Clone)]
pub struct JsonWordStore {
    path: PathBuf,
    library: Arc<RwLock<Library>>,
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl JsonWordStore {
    /// Open the library at `path`. A missing file is an empty library.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, VocaError> {
        let path = path.as_ref().to_path_buf();
        let library = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<Library>(&content)
                .map_err(|e| VocaError::new(
                    format!("Failed to parse library: {}", e),
                    "json_parse"
                ).with_context(format!("path: {:?}", path)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?path, "No library file yet, starting empty");
                Library::default()
            }
            Err(e) => {
                return Err(VocaError::new(
                    format!("Failed to read library: {}", e),
                    "io"
                ).with_context(format!("path: {:?}", path)));
            }
        };

        tracing::info!(
            path = ?path,
            words = library.words.len(),
            folders = library.folders.len(),
            "Opened word library"
        );

        Ok(JsonWordStore {
            path,
            library: Arc::new(RwLock::new(library)),
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `change` to a copy of the library, write it, then publish it.
    async fn commit<F>(&self, change: F) -> Result<(), VocaError>
    where
        F: FnOnce(&mut Library) -> Result<(), VocaError>,
    {
        let _writing = self.write_lock.lock().await;
        let mut next = self.library.read().clone();
        change(&mut next)?;
        self.write_file(&next).await?;
        *self.library.write() = next;
        Ok(())
    }

    /// Write via a sibling temp file and rename, so the file is never half written.
    async fn write_file(&self, library: &Library) -> Result<(), VocaError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| VocaError::new(
                        format!("Failed to create directory: {}", e),
                        "io"
                    ).with_context(format!("path: {:?}", parent)))?;
            }
        }

        let json = serde_json::to_string_pretty(library)
            .map_err(|e| VocaError::new(
                format!("Failed to serialize library: {}", e),
                "json_serialize"
            ))?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| VocaError::new(
                format!("Failed to write library: {}", e),
                "io"
            ).with_context(format!("path: {:?}", tmp)))?;

        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                tracing::warn!(path = ?tmp, error = %cleanup, "Failed to remove temp library file");
            }
            return Err(VocaError::new(
                format!("Failed to replace library: {}", e),
                "io"
            ).with_context(format!("path: {:?}", self.path)));
        }

        Ok(())
    }
}

/// Persistence backends for words and folders.
#[derive(Clone)]
pub enum WordStore {
    Memory(MemoryWordStore),
    Json(JsonWordStore),
}

impl WordStore {
    fn library(&self) -> &Arc<RwLock<Library>> {
        match self {
            WordStore::Memory(s) => &s.library,
            WordStore::Json(s) => &s.library,
        }
    }

    /// Run a change against the library. Nothing is visible if it fails.
    async fn update<F>(&self, change: F) -> Result<(), VocaError>
    where
        F: FnOnce(&mut Library) -> Result<(), VocaError>,
    {
        match self {
            WordStore::Memory(s) => {
                let mut library = s.library.write();
                let mut next = library.clone();
                change(&mut next)?;
                *library = next;
                Ok(())
            }
            WordStore::Json(s) => s.commit(change).await,
        }
    }

    pub async fn get(&self, id: &str) -> Result<Option<Word>, VocaError> {
        Ok(self.library().read().get(id).cloned())
    }

    pub async fn list(&self) -> Result<Vec<Word>, VocaError> {
        Ok(self.library().read().words.clone())
    }

    /// Words in one folder, or the unfiled words when `folder_id` is `None`.
    pub async fn list_in_folder(&self, folder_id: Option<&str>) -> Result<Vec<Word>, VocaError> {
        Ok(self.library().read().in_folder(folder_id))
    }

    pub async fn save_word(&self, word: &Word) -> Result<(), VocaError> {
        self.update(|library| {
            library.upsert_word(word);
            Ok(())
        }).await?;
        tracing::debug!(word_id = %word.id, learning_rate = word.learning_rate, "Saved word");
        Ok(())
    }

    /// Write back only the fields the learning engine owns.
    pub async fn save_progress(&self, id: &str, learning_rate: u8, stats: &WordStats) -> Result<(), VocaError> {
        self.update(|library| library.update_progress(id, learning_rate, stats)).await?;
        tracing::debug!(word_id = %id, learning_rate = learning_rate, "Saved word progress");
        Ok(())
    }

    pub async fn folders(&self) -> Result<Vec<Folder>, VocaError> {
        Ok(self.library().read().folders.clone())
    }

    pub async fn save_folder(&self, folder: &Folder) -> Result<(), VocaError> {
        self.update(|library| {
            library.upsert_folder(folder);
            Ok(())
        }).await
    }
}

impl From<MemoryWordStore> for WordStore {
    fn from(store: MemoryWordStore) -> Self {
        WordStore::Memory(store)
    }
}

impl From<JsonWordStore> for WordStore {
    fn from(store: JsonWordStore) -> Self {
        WordStore::Json(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store: WordStore = MemoryWordStore::with_words(vec![
            Word::new("a", "apple", "fruit"),
            Word::new("b", "bench", "seat").in_folder("f1"),
        ]).into();

        assert_eq!(store.list().await.unwrap().len(), 2);
        assert_eq!(store.list_in_folder(Some("f1")).await.unwrap()[0].id, "b");
        assert_eq!(store.list_in_folder(None).await.unwrap()[0].id, "a");

        let stats = WordStats { wrong_count: 1, review_count: 1, last_penalty: 5, ..Default::default() };
        store.save_progress("a", 0, &stats).await.unwrap();
        let word = store.get("a").await.unwrap().unwrap();
        assert_eq!(word.stats.last_penalty, 5);
        assert_eq!(word.term, "apple");
    }

    #[tokio::test]
    async fn test_save_progress_unknown_word() {
        let store: WordStore = MemoryWordStore::new().into();
        let err = store.save_progress("ghost", 10, &WordStats::default()).await.unwrap_err();
        assert_eq!(err.stage, "store");
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_library() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        let store: WordStore = JsonWordStore::open(&path).await.unwrap().into();
        store.save_word(&Word::new("a", "apple", "fruit").with_rate(50)).await.unwrap();

        // a directory in place of the file makes the rename fail
        tokio::fs::remove_file(&path).await.unwrap();
        tokio::fs::create_dir(&path).await.unwrap();

        let stats = WordStats { wrong_count: 1, review_count: 1, last_penalty: 5, ..Default::default() };
        let err = store.save_progress("a", 45, &stats).await.unwrap_err();
        assert_eq!(err.stage, "io");

        let word = store.get("a").await.unwrap().unwrap();
        assert_eq!(word.learning_rate, 50);
        assert_eq!(word.stats, WordStats::default());
        assert!(!dir.path().join("library.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_concurrent_saves_all_reach_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.json");
        let first = JsonWordStore::open(&path).await.unwrap();
        let a: WordStore = first.clone().into();
        let b: WordStore = first.into();

        let (left, right) = tokio::join!(
            async {
                for i in 0..10 {
                    a.save_word(&Word::new(format!("a{}", i), "x".to_string(), String::new())).await?;
                }
                Ok::<(), VocaError>(())
            },
            async {
                for i in 0..10 {
                    b.save_word(&Word::new(format!("b{}", i), "y".to_string(), String::new())).await?;
                }
                Ok::<(), VocaError>(())
            }
        );
        left.unwrap();
        right.unwrap();

        let reopened: WordStore = JsonWordStore::open(&path).await.unwrap().into();
        assert_eq!(reopened.list().await.unwrap().len(), 20);
    }
}
