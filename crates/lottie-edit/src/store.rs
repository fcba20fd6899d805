use crate::error::EditResult;
use lottie_data::Document;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Parses each animation file once and hands out fresh working copies.
///
/// Every [`DocumentStore::checkout`] returns an independent clone, so edits made
/// for one interaction never leak into the next. Cloning the store shares the
/// cache.
#[derive(Clone, Default)]
pub struct DocumentStore {
    cache: Arc<Mutex<HashMap<PathBuf, Arc<Document>>>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<Document>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the parsed original without copying it.
    pub fn original(&self, path: impl AsRef<Path>) -> EditResult<Arc<Document>> {
        let path = path.as_ref();
        let mut cache = self.lock();
        if let Some(doc) = cache.get(path) {
            debug!(path = %path.display(), "animation cache hit");
            return Ok(Arc::clone(doc));
        }
        let doc = Arc::new(Document::load(path)?);
        cache.insert(path.to_path_buf(), Arc::clone(&doc));
        Ok(doc)
    }

    /// A fresh, independently mutable copy of the animation at `path`.
    pub fn checkout(&self, path: impl AsRef<Path>) -> EditResult<Document> {
        Ok(Document::clone(&*self.original(path)?))
    }

    /// Drops the cached copy so the next checkout re-reads the file.
    pub fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        self.lock().remove(path.as_ref()).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditError;
    use lottie_data::DocumentError;

    #[test]
    fn checkouts_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        std::fs::write(&path, r#"{"layers":[{"nm":"Tree"}]}"#).unwrap();

        let store = DocumentStore::new();
        let mut first = store.checkout(&path).unwrap();
        first.layer_mut(0).unwrap().set_name("Changed");

        let second = store.checkout(&path).unwrap();
        assert_eq!(second.layer(0).unwrap().name(), Some("Tree"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn cache_survives_file_changes_until_invalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.json");
        std::fs::write(&path, r#"{"layers":[]}"#).unwrap();

        let store = DocumentStore::new();
        assert_eq!(store.checkout(&path).unwrap().layer_count(), 0);

        std::fs::write(&path, r#"{"layers":[{}]}"#).unwrap();
        assert_eq!(store.checkout(&path).unwrap().layer_count(), 0);

        assert!(store.invalidate(&path));
        assert_eq!(store.checkout(&path).unwrap().layer_count(), 1);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let store = DocumentStore::new();
        let err = store.checkout("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, EditError::Document(DocumentError::Read { .. })));
        assert!(store.is_empty());
    }
}
