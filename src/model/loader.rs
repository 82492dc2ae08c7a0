use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use super::{Classifier, ModelArtifact};
use crate::error::{AnalysisError, Result};

static GLOBAL: LazyLock<ModelLoader> = LazyLock::new(ModelLoader::new);

/// Loads model artifacts and keeps them for the life of the process.
///
/// Each path is read and deserialized at most once. The cache lock is held
/// across the read, so concurrent first loads of the same path wait for the
/// first one instead of deserializing twice. Failed loads are not cached.
pub struct ModelLoader {
    cache: Mutex<HashMap<PathBuf, Arc<dyn Classifier>>>,
    storage_reads: AtomicUsize,
}

impl ModelLoader {
    /// Create an empty loader. Most callers want [`ModelLoader::global`].
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            storage_reads: AtomicUsize::new(0),
        }
    }

    /// The process-wide loader.
    pub fn global() -> &'static ModelLoader {
        &GLOBAL
    }

    /// Return the classifier stored at `path`, reading it on first use.
    ///
    /// Paths are compared after canonicalization, so `./m.json` and `m.json`
    /// share one cache entry. The path as given is remembered too: a later
    /// call with the same spelling is served without touching storage.
    pub fn load(&self, path: &Path) -> Result<Arc<dyn Classifier>> {
        if path.as_os_str().is_empty() {
            return Err(AnalysisError::ArtifactNotFound {
                path: path.to_path_buf(),
            });
        }

        // Only complete classifiers are ever inserted, so a poisoned map is
        // still consistent.
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = cache.get(path) {
            log::debug!("Model cache hit for {}", path.display());
            return Ok(Arc::clone(model));
        }

        let canonical = resolve(path)?;
        let model = match cache.get(&canonical) {
            Some(model) => {
                log::debug!("Model cache hit for {} via {}", path.display(), canonical.display());
                Arc::clone(model)
            }
            None => {
                let model = self.read_artifact(path, &canonical)?;
                log::info!(
                    "Loaded model '{}' ({} features) from {}",
                    model.name(),
                    model.n_features(),
                    canonical.display()
                );
                cache.insert(canonical, Arc::clone(&model));
                model
            }
        };
        cache.insert(path.to_path_buf(), Arc::clone(&model));
        Ok(model)
    }

    /// How many times an artifact was read from storage.
    pub fn storage_reads(&self) -> usize {
        self.storage_reads.load(Ordering::SeqCst)
    }

    /// Whether `path` is already cached, under this spelling.
    pub fn is_cached(&self, path: &Path) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    fn read_artifact(&self, path: &Path, canonical: &Path) -> Result<Arc<dyn Classifier>> {
        self.storage_reads.fetch_add(1, Ordering::SeqCst);
        let bytes = std::fs::read(canonical).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AnalysisError::ArtifactNotFound {
                path: path.to_path_buf(),
            },
            _ => corrupt(path, format!("reading file: {e}")),
        })?;

        let artifact: ModelArtifact = serde_json::from_slice(&bytes)
            .map_err(|e| corrupt(path, format!("parsing JSON: {e}")))?;
        artifact.into_classifier().map_err(|reason| corrupt(path, reason))
    }
}

/// Canonical form of an existing artifact file.
fn resolve(path: &Path) -> Result<PathBuf> {
    let not_found = || AnalysisError::ArtifactNotFound {
        path: path.to_path_buf(),
    };
    if !path.is_file() {
        return Err(not_found());
    }
    std::fs::canonicalize(path).map_err(|_| not_found())
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn corrupt(path: &Path, reason: String) -> AnalysisError {
    log::warn!("Rejected model artifact {}: {reason}", path.display());
    AnalysisError::ArtifactCorrupt {
        path: path.to_path_buf(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_logistic(dir: &TempDir, file: &str) -> PathBuf {
        let path = dir.path().join(file);
        let json = serde_json::json!({
            "format_version": 1,
            "name": "wheels",
            "n_features": 36,
            "model": {
                "type": "logistic_regression",
                "coefficients": vec![0.01; 36],
                "intercept": 0.0
            }
        });
        fs::write(&path, json.to_string()).unwrap();
        path
    }

    #[test]
    fn test_second_load_is_a_cache_hit() {
        let dir = TempDir::new().unwrap();
        let path = write_logistic(&dir, "model.json");
        let loader = ModelLoader::new();

        let first = loader.load(&path).unwrap();
        assert_eq!(loader.storage_reads(), 1);

        // Removing the file proves the second call never touches storage.
        fs::remove_file(&path).unwrap();
        let second = loader.load(&path).unwrap();

        assert_eq!(loader.storage_reads(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(loader.is_cached(&path));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let loader = ModelLoader::new();

        let err = loader.load(&dir.path().join("nope.json")).err().unwrap();
        assert!(matches!(err, AnalysisError::ArtifactNotFound { .. }));
        assert_eq!(loader.storage_reads(), 0);
    }

    #[test]
    fn test_empty_path_is_not_found() {
        let err = ModelLoader::new().load(Path::new("")).err().unwrap();
        assert!(matches!(err, AnalysisError::ArtifactNotFound { .. }));
    }

    #[test]
    fn test_directory_is_not_an_artifact() {
        let dir = TempDir::new().unwrap();
        let err = ModelLoader::new().load(dir.path()).err().unwrap();
        assert!(matches!(err, AnalysisError::ArtifactNotFound { .. }));
    }

    #[test]
    fn test_malformed_json_is_corrupt_and_not_cached() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"\x80\x04\x95pickle").unwrap();
        let loader = ModelLoader::new();

        let err = loader.load(&path).err().unwrap();
        assert!(matches!(err, AnalysisError::ArtifactCorrupt { .. }));
        assert!(!loader.is_cached(&path));

        // A fixed artifact at the same path loads on the next attempt.
        let fixed = write_logistic(&dir, "model.json");
        assert!(loader.load(&fixed).is_ok());
        assert_eq!(loader.storage_reads(), 2);
    }

    #[test]
    fn test_different_spellings_share_one_read() {
        let dir = TempDir::new().unwrap();
        let path = write_logistic(&dir, "model.json");
        let dotted = dir.path().join(".").join("model.json");
        let loader = ModelLoader::new();

        let first = loader.load(&path).unwrap();
        let second = loader.load(&dotted).unwrap();

        assert_eq!(loader.storage_reads(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(loader.is_cached(&dotted));
    }

    #[test]
    fn test_concurrent_first_loads_read_once() {
        let dir = TempDir::new().unwrap();
        let path = write_logistic(&dir, "model.json");
        let loader = Arc::new(ModelLoader::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let loader = Arc::clone(&loader);
                let path = path.clone();
                std::thread::spawn(move || loader.load(&path).map(|_| ()).is_ok())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(loader.storage_reads(), 1);
    }
}
