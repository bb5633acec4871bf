// Memoized dataset loads keyed by file identity.
//
// An entry is reused only while the file's canonical path and modification
// time are unchanged. `invalidate` and `clear` drop entries explicitly.
use crate::errors::{FuelError, Result};
use crate::loader::{load_dipping, load_equipment, DippingDataset, EquipmentDataset};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

impl FileIdentity {
    pub fn of(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FuelError::MissingInputFile {
                path: path.to_path_buf(),
            });
        }
        let io_err = |source: std::io::Error| FuelError::Io {
            path: path.to_path_buf(),
            source,
        };
        let path = path.canonicalize().map_err(io_err)?;
        let modified = std::fs::metadata(&path)
            .map_err(io_err)?
            .modified()
            .ok();
        Ok(FileIdentity { path, modified })
    }
}

#[derive(Debug, Default)]
pub struct DatasetCache {
    dipping: HashMap<FileIdentity, Arc<DippingDataset>>,
    equipment: HashMap<FileIdentity, Arc<EquipmentDataset>>,
    strict: bool,
}

impl DatasetCache {
    pub fn new(strict: bool) -> Self {
        DatasetCache {
            strict,
            ..DatasetCache::default()
        }
    }

    pub fn dipping(&mut self, path: &Path) -> Result<Arc<DippingDataset>> {
        let id = FileIdentity::of(path)?;
        if let Some(hit) = self.dipping.get(&id) {
            log::debug!("Dipping cache hit for {}", id.path.display());
            return Ok(Arc::clone(hit));
        }
        let loaded = Arc::new(load_dipping(path, self.strict)?);
        // a changed file leaves its old entry behind otherwise
        self.dipping.retain(|k, _| k.path != id.path);
        self.dipping.insert(id, Arc::clone(&loaded));
        Ok(loaded)
    }

    pub fn equipment(&mut self, path: &Path) -> Result<Arc<EquipmentDataset>> {
        let id = FileIdentity::of(path)?;
        if let Some(hit) = self.equipment.get(&id) {
            log::debug!("Equipment cache hit for {}", id.path.display());
            return Ok(Arc::clone(hit));
        }
        let loaded = Arc::new(load_equipment(path, self.strict)?);
        self.equipment.retain(|k, _| k.path != id.path);
        self.equipment.insert(id, Arc::clone(&loaded));
        Ok(loaded)
    }

    /// Drop every entry for `path`, whatever its modification time.
    pub fn invalidate(&mut self, path: &Path) {
        let target = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.dipping.retain(|k, _| k.path != target);
        self.equipment.retain(|k, _| k.path != target);
    }

    pub fn clear(&mut self) {
        self.dipping.clear();
        self.equipment.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn dipping_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Date,Diesel Used,Balance\n2025-07-16,100,900").unwrap();
        file
    }

    #[test]
    fn second_load_reuses_the_same_table() {
        let file = dipping_file();
        let mut cache = DatasetCache::new(false);
        let a = cache.dipping(file.path()).unwrap();
        let b = cache.dipping(file.path()).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.dipping.len(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let file = dipping_file();
        let mut cache = DatasetCache::new(false);
        let a = cache.dipping(file.path()).unwrap();
        cache.invalidate(file.path());
        assert!(cache.dipping.is_empty() && cache.equipment.is_empty());
        let b = cache.dipping(file.path()).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(a.records, b.records);
    }

    #[test]
    fn missing_file_is_reported_before_loading() {
        let mut cache = DatasetCache::new(false);
        let err = cache.equipment(Path::new("/no/such/equipment.csv")).unwrap_err();
        assert!(matches!(err, FuelError::MissingInputFile { .. }));
    }

    #[test]
    fn clear_empties_both_maps() {
        let file = dipping_file();
        let mut cache = DatasetCache::new(false);
        cache.dipping(file.path()).unwrap();
        cache.clear();
        assert!(cache.dipping.is_empty() && cache.equipment.is_empty());
    }
}
