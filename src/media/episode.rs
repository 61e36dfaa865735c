use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::EpisodeError;
use crate::file_utils::FileManager;

// @module: Episode identity records

/// File describing one episode inside its directory
pub const EPISODE_INFO_FILE: &str = "episode_info.json";

// @struct: Episode record written by the track extraction step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeInfo {
    // @field: Base file name of the episode media
    pub file_name: String,

    // @field: Order of the series within the work
    pub series_order: u32,

    // @field: Series name
    pub series_name: String,

    // @field: Episode number within the series
    pub episode_number: u32,

    // @field: Episode number within the whole work
    pub overall_order: u32,

    // @field: Full path of the media file
    pub file_path: PathBuf,

    // @field: Directory holding this episode's extracted artifacts
    pub episode_path: PathBuf,
}

impl EpisodeInfo {
    /// Stable name used for frame directories and image files
    pub fn base_name(&self) -> String {
        format!(
            "{:03}_{:02}_{}_{:02}",
            self.overall_order, self.series_order, self.series_name, self.episode_number
        )
    }

    /// Short label for log lines
    pub fn display_name(&self) -> String {
        format!("{} {:02}", self.series_name, self.episode_number)
    }

    /// Read the episode record from an episode directory
    pub fn load<P: AsRef<Path>>(episode_dir: P) -> Result<Self, EpisodeError> {
        let path = episode_dir.as_ref().join(EPISODE_INFO_FILE);
        FileManager::read_json(&path).map_err(|e| EpisodeError::InvalidRecord {
            path,
            message: e.to_string(),
        })
    }
}

/// Find every episode directory (one holding an episode record) below a root
pub fn discover_episode_dirs<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    let records = FileManager::find_files_named(root, EPISODE_INFO_FILE)?;

    Ok(records
        .into_iter()
        .filter_map(|record| record.parent().map(Path::to_path_buf))
        .collect())
}
