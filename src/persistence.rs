// File: src/persistence.rs
use crate::error::{PredicateError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Versioned storage for derived tables, keyed by name.
///
/// A cache that is missing, unreadable or older than the required version
/// behaves as empty; the caller rebuilds and saves again.
pub trait TableCache {
    fn load<T: DeserializeOwned>(&self, key: &str, min_version: u32) -> Option<T>;
    fn save<T: Serialize>(&self, key: &str, table: &T, version: u32) -> Result<()>;
}

/// Never hits, never writes. Forces every table to be rebuilt.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl TableCache for NoCache {
    fn load<T: DeserializeOwned>(&self, _key: &str, _min_version: u32) -> Option<T> {
        None
    }

    fn save<T: Serialize>(&self, _key: &str, _table: &T, _version: u32) -> Result<()> {
        Ok(())
    }
}

#[derive(Serialize)]
struct CachedTableRef<'a, T> {
    version: u32,
    table: &'a T,
}

#[derive(Deserialize)]
struct CachedTable<T> {
    version: u32,
    table: T,
}

/// Stores each table as `<dir>/<key>.bin` (bincode) next to a pretty-printed
/// `<key>.json` copy for inspection. Only the binary file is ever read back.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn binary_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.bin", key))
    }

    pub fn json_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<CachedTable<T>> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(bincode::deserialize_from(reader)?)
    }

    // Writes through a temp file in the same directory, then renames it over
    // the target so readers never observe a half-written cache.
    fn write_atomic(&self, path: &Path, write: impl FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>) -> Result<()> {
        let temp_file = NamedTempFile::new_in(&self.dir)?;
        {
            let mut writer = BufWriter::new(&temp_file);
            write(&mut writer)?;
            writer.flush()?;
        }
        temp_file.persist(path).map_err(|e| PredicateError::Io(e.error))?;
        Ok(())
    }
}

impl TableCache for DiskCache {
    fn load<T: DeserializeOwned>(&self, key: &str, min_version: u32) -> Option<T> {
        let path = self.binary_path(key);
        if !path.exists() {
            return None;
        }
        info!(key, path = %path.display(), "loading cached table");
        match self.read::<T>(&path) {
            Ok(cached) if cached.version >= min_version => Some(cached.table),
            Ok(cached) => {
                warn!(key, found = cached.version, required = min_version, "cache is outdated, rebuilding");
                None
            }
            Err(e) => {
                warn!(key, error = %e, "cache is unreadable, rebuilding");
                None
            }
        }
    }

    fn save<T: Serialize>(&self, key: &str, table: &T, version: u32) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let envelope = CachedTableRef { version, table };

        self.write_atomic(&self.binary_path(key), |writer| {
            bincode::serialize_into(writer, &envelope)?;
            Ok(())
        })?;

        // serde_json only sorts keys of its own Value maps, so go through one.
        let value = serde_json::to_value(&envelope)?;
        self.write_atomic(&self.json_path(key), |writer| {
            serde_json::to_writer_pretty(writer, &value)?;
            Ok(())
        })?;

        info!(key, dir = %self.dir.display(), version, "saved table cache");
        Ok(())
    }
}
