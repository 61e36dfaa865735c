/*!
 * Subtitle track list of an episode.
 *
 * The track extraction step writes `subs.json` into each episode directory:
 * one entry per subtitle track, naming the extracted track file and embedding
 * the container's track description (`mkvmerge -J` shape).
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::EpisodeError;
use crate::file_utils::FileManager;
use crate::language_utils;

/// Track list file inside an episode directory
pub const TRACK_LIST_FILE: &str = "subs.json";

/// Container track type for subtitle tracks
pub const SUBTITLE_TRACK_TYPE: &str = "subtitles";

/// Per-track properties reported by the container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackProperties {
    /// Codec identifier, e.g. `S_TEXT/ASS`
    #[serde(default)]
    pub codec_id: String,

    /// Track language (ISO 639-2)
    #[serde(default)]
    pub language: Option<String>,

    /// Whether the container flags this as the default track
    #[serde(default)]
    pub default_track: bool,
}

/// Container description of one track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Numeric track id
    pub id: u64,

    /// Track type (`video`, `audio`, `subtitles`)
    #[serde(rename = "type")]
    pub track_type: String,

    /// Human readable codec name
    #[serde(default)]
    pub codec: String,

    #[serde(default)]
    pub properties: TrackProperties,
}

/// One entry of the episode track list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtitleTrackEntry {
    /// Path of the extracted track file
    pub file_name: PathBuf,

    /// Track language as used in file names
    pub language: String,

    /// Container track description
    pub info: TrackInfo,

    /// Track id
    pub track: u64,
}

impl SubtitleTrackEntry {
    pub fn codec_id(&self) -> &str {
        &self.info.properties.codec_id
    }

    pub fn is_subtitle(&self) -> bool {
        self.info.track_type == SUBTITLE_TRACK_TYPE
    }

    /// Location of the processed line artifact, next to the track file
    pub fn artifact_path(&self) -> PathBuf {
        let dir = self.file_name.parent().unwrap_or(Path::new("."));
        dir.join(format!("{}_{}.json", self.track, self.language))
    }
}

/// Read the track list of an episode directory
pub fn load_track_list<P: AsRef<Path>>(episode_dir: P) -> Result<Vec<SubtitleTrackEntry>, EpisodeError> {
    let path = episode_dir.as_ref().join(TRACK_LIST_FILE);
    FileManager::read_json(&path).map_err(|e| EpisodeError::InvalidRecord {
        path,
        message: e.to_string(),
    })
}

/// Pick the track frames are aligned against.
///
/// A lone track is used as is. Otherwise the first track in the preferred
/// language wins, then the container's default track, then the first track.
pub fn select_track<'a>(
    tracks: &'a [SubtitleTrackEntry],
    preferred_language: Option<&str>,
) -> Option<&'a SubtitleTrackEntry> {
    if tracks.len() == 1 {
        return tracks.first();
    }

    if let Some(preferred) = preferred_language {
        let by_language = tracks
            .iter()
            .find(|t| language_utils::language_codes_match(&t.language, preferred));
        if by_language.is_some() {
            return by_language;
        }
    }

    tracks
        .iter()
        .find(|t| t.info.properties.default_track)
        .or_else(|| tracks.first())
}
