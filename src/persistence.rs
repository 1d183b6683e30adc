// File: src/persistence.rs
use crate::error::Result;
use crate::registry::{VehicleRecord, VehicleRegistry};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Writes a bincode snapshot of the registry, atomically replacing `path`.
pub fn save_snapshot(registry: &VehicleRegistry, path: &Path) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        bincode::serialize_into(&mut writer, registry)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    info!(records = registry.len(), path = %path.display(), "registry snapshot saved");
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<VehicleRegistry> {
    let reader = BufReader::new(File::open(path)?);
    let mut registry: VehicleRegistry = bincode::deserialize_from(reader)?;
    registry.reindex();
    Ok(registry)
}

/// Reads a JSON array of vehicle records.
pub fn load_json(path: &Path) -> Result<VehicleRegistry> {
    let reader = BufReader::new(File::open(path)?);
    let records: Vec<VehicleRecord> = serde_json::from_reader(reader)?;
    Ok(VehicleRegistry::from_records(records))
}

/// Loads `path` as JSON when it ends in `.json`, as a snapshot otherwise.
pub fn load_registry(path: &Path) -> Result<VehicleRegistry> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_json(path),
        _ => load_snapshot(path),
    }
}

/// Loads the registry at `path`, or the built-in demo vehicles when unset.
pub fn open_registry(path: Option<&Path>) -> Result<VehicleRegistry> {
    match path {
        Some(path) => {
            let registry = load_registry(path)?;
            info!(records = registry.len(), path = %path.display(), "registry loaded");
            Ok(registry)
        }
        None => Ok(VehicleRegistry::demo()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlateError;

    #[test]
    fn snapshot_round_trip_restores_lookups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("registry.bin");
        let registry = VehicleRegistry::demo();

        save_snapshot(&registry, &path).unwrap();
        let restored = load_snapshot(&path).unwrap();

        assert_eq!(restored.records(), registry.records());
        assert!(restored.lookup("5561 ksa").found);
    }

    #[test]
    fn snapshot_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.bin");
        save_snapshot(&VehicleRegistry::demo(), &path).unwrap();
        save_snapshot(&VehicleRegistry::new(), &path).unwrap();
        assert!(load_registry(&path).unwrap().is_empty());
    }

    #[test]
    fn json_records_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vehicles.json");
        let records = VehicleRegistry::demo().records().to_vec();
        fs::write(&path, serde_json::to_string(&records).unwrap()).unwrap();

        let registry = load_registry(&path).unwrap();
        assert_eq!(registry.len(), 8);
        assert!(registry.lookup("2020NSS").found);
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.bin");
        fs::write(&path, b"\xff\xff\xff\xff\xff\xff\xff\xff\xff").unwrap();
        assert!(matches!(load_snapshot(&path), Err(PlateError::Snapshot(_))));
    }
}
