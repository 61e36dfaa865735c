use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::errors::ArtifactError;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Find files with an exact file name anywhere below a directory
    pub fn find_files_named<P: AsRef<Path>>(dir: P, file_name: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() && path.file_name().is_some_and(|name| name == file_name) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Replace a file in one step.
    ///
    /// Content goes to a temporary file in the target directory first and is
    /// renamed over the target, so readers never see a partial file.
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &[u8]) -> std::io::Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        Self::ensure_dir(parent)?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(content)?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Read and deserialize a JSON file
    pub fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T, ArtifactError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ArtifactError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Serialize a value as pretty JSON and replace the file atomically
    pub fn write_json_atomic<T: Serialize, P: AsRef<Path>>(path: P, value: &T) -> Result<(), ArtifactError> {
        let path = path.as_ref();
        let json = serde_json::to_vec_pretty(value)?;

        Self::write_atomic(path, &json).map_err(|source| ArtifactError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
