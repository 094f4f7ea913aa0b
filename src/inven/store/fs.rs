use super::DataStore;
use crate::error::{InvenError, Result};
use crate::model::Snapshot;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_DATA_FILE: &str = "data.json";

pub struct FileStore {
    root: PathBuf,
    data_file: String,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            data_file: DEFAULT_DATA_FILE.to_string(),
        }
    }

    pub fn with_data_file(mut self, name: &str) -> Self {
        if !name.is_empty() {
            self.data_file = name.to_string();
        }
        self
    }

    pub fn data_path(&self) -> PathBuf {
        self.root.join(&self.data_file)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(InvenError::Io)?;
        }
        Ok(())
    }
}

impl DataStore for FileStore {
    fn load(&self) -> Result<Snapshot> {
        let data_file = self.data_path();
        if !data_file.exists() {
            return Ok(Snapshot::default());
        }
        let content = fs::read_to_string(data_file).map_err(InvenError::Io)?;
        let snapshot: Snapshot =
            serde_json::from_str(&content).map_err(InvenError::Serialization)?;
        Ok(snapshot)
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let content = serde_json::to_string_pretty(snapshot).map_err(InvenError::Serialization)?;
        fs::write(self.data_path(), content).map_err(InvenError::Io)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rack;

    #[test]
    fn missing_file_loads_as_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("does-not-exist-yet"));
        let snapshot = store.load().unwrap();
        assert!(snapshot.racks.is_empty());
        assert!(snapshot.items.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf());

        let mut snapshot = Snapshot::default();
        snapshot.racks.push(Rack::new(3, "Garage".into(), None));
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.racks.len(), 1);
        assert_eq!(loaded.racks[0].name, "Garage");
        assert_eq!(loaded.racks[0].number, 3);
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let mut store = FileStore::new(nested.clone());

        store.save(&Snapshot::default()).unwrap();
        assert!(nested.join("data.json").exists());
    }

    #[test]
    fn data_file_name_is_configurable() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().to_path_buf()).with_data_file("inventory.json");

        store.save(&Snapshot::default()).unwrap();
        assert!(dir.path().join("inventory.json").exists());
        assert!(!dir.path().join("data.json").exists());
    }

    #[test]
    fn corrupt_file_surfaces_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("data.json"), "not json").unwrap();

        let store = FileStore::new(dir.path().to_path_buf());
        assert!(matches!(
            store.load(),
            Err(InvenError::Serialization(_))
        ));
    }
}
