use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::app_config::SubtitleConfig;
use crate::errors::{ArtifactError, EpisodeError};
use crate::file_utils::FileManager;
use crate::media::tracks::{SubtitleTrackEntry, load_track_list};
use crate::subtitle::{DialogueExtractor, SubtitleLine, TextNormalizer, collapse_by_start, combine_adjacent};

// @module: Subtitle track processing and line artifacts

// @struct: Persisted line sequence of one track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineArtifact {
    // @field: Track file the lines were extracted from
    pub source: String,

    // @field: Artifact format version
    pub subversion: u32,

    // @field: Final line sequence
    pub subs: Vec<SubtitleLine>,
}

/// State of a line artifact on disk relative to what is expected
#[derive(Debug)]
pub enum ArtifactState {
    /// Present, current version, same source
    Fresh(LineArtifact),
    /// Not written yet
    Missing,
    /// Written by another version or for another source
    Stale(String),
    /// Present but unreadable
    Corrupt(ArtifactError),
}

impl fmt::Display for ArtifactState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ArtifactState::Fresh(artifact) => write!(f, "fresh ({} lines)", artifact.subs.len()),
            ArtifactState::Missing => write!(f, "missing"),
            ArtifactState::Stale(reason) => write!(f, "stale: {}", reason),
            ArtifactState::Corrupt(error) => write!(f, "corrupt: {}", error),
        }
    }
}

/// What happened to one track
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOutcome {
    /// Artifact was already up to date
    Skipped,
    /// Artifact was (re)written with this many lines
    Written(usize),
}

/// Track outcomes of one episode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpisodeSubtitleSummary {
    pub written: usize,
    pub skipped: usize,
    pub lines: usize,
}

/// Subtitle processor: script parsing, line cleanup and artifact handling
#[derive(Debug, Clone)]
pub struct SubtitleProcessor {
    extractor: DialogueExtractor,
    artifact_version: u32,
    ass_codec_id: String,
}

impl SubtitleProcessor {
    pub fn new(config: &SubtitleConfig) -> Self {
        SubtitleProcessor {
            extractor: DialogueExtractor::new(TextNormalizer::new(config.cjk_ranges.clone())),
            artifact_version: config.artifact_version,
            ass_codec_id: config.ass_codec_id.clone(),
        }
    }

    /// Turn ASS script text into the final line sequence.
    ///
    /// Extraction, adjacency merge, and same-start collapse, with a stable
    /// sort by start time after each merge pass.
    pub fn process_script(&self, script: &str) -> Vec<SubtitleLine> {
        let extracted = self.extractor.extract(script);

        let mut combined = combine_adjacent(&extracted);
        combined.sort_by_key(|line| line.start_ms);

        let mut collapsed = collapse_by_start(&combined);
        collapsed.sort_by_key(|line| line.start_ms);

        debug!(
            "Dialogue records: {} extracted, {} after merge, {} after collapse",
            extracted.len(),
            combined.len(),
            collapsed.len()
        );

        collapsed
    }

    /// Read and process an ASS file
    pub fn process_ass_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<SubtitleLine>, EpisodeError> {
        let path = path.as_ref();
        info!("Processing {:?}", path);

        let bytes = std::fs::read(path)?;
        let script = String::from_utf8_lossy(&bytes);
        Ok(self.process_script(&script))
    }

    /// Compare the artifact at `path` against the expected source and version
    pub fn check_artifact(&self, path: &Path, source: &str) -> ArtifactState {
        if !path.exists() {
            return ArtifactState::Missing;
        }

        match FileManager::read_json::<LineArtifact, _>(path) {
            Ok(artifact) if artifact.subversion != self.artifact_version => ArtifactState::Stale(format!(
                "version {} != {}",
                artifact.subversion, self.artifact_version
            )),
            Ok(artifact) if artifact.source != source => {
                ArtifactState::Stale(format!("source {} != {}", artifact.source, source))
            }
            Ok(artifact) => ArtifactState::Fresh(artifact),
            Err(e) => ArtifactState::Corrupt(e),
        }
    }

    /// Process one track and write its artifact unless it is already fresh
    pub fn process_track(&self, track: &SubtitleTrackEntry, force: bool) -> Result<TrackOutcome, EpisodeError> {
        let artifact_path = track.artifact_path();
        let source = track.file_name.to_string_lossy().to_string();

        if !force {
            match self.check_artifact(&artifact_path, &source) {
                ArtifactState::Fresh(_) => {
                    debug!("Skipping track {}, lines already processed", track.track);
                    return Ok(TrackOutcome::Skipped);
                }
                ArtifactState::Missing => {}
                state => warn!("Reprocessing {:?}: artifact {}", artifact_path, state),
            }
        }

        let subs = if track.codec_id() == self.ass_codec_id {
            self.process_ass_file(&track.file_name)?
        } else {
            info!(
                "Track {} uses codec {}, writing empty line list",
                track.track,
                track.codec_id()
            );
            Vec::new()
        };

        let line_count = subs.len();
        let artifact = LineArtifact {
            source,
            subversion: self.artifact_version,
            subs,
        };
        FileManager::write_json_atomic(&artifact_path, &artifact)?;

        Ok(TrackOutcome::Written(line_count))
    }

    /// Process every subtitle track listed for an episode directory
    pub fn process_episode<P: AsRef<Path>>(&self, episode_dir: P, force: bool) -> Result<EpisodeSubtitleSummary, EpisodeError> {
        let episode_dir = episode_dir.as_ref();
        let tracks = load_track_list(episode_dir)?;
        let mut summary = EpisodeSubtitleSummary::default();

        for track in tracks.iter().filter(|t| t.is_subtitle()) {
            match self.process_track(track, force)? {
                TrackOutcome::Skipped => summary.skipped += 1,
                TrackOutcome::Written(lines) => {
                    summary.written += 1;
                    summary.lines += lines;
                }
            }
        }

        Ok(summary)
    }

    /// Load the processed lines of a track, which must be fresh
    pub fn load_lines(&self, track: &SubtitleTrackEntry) -> Result<Vec<SubtitleLine>, EpisodeError> {
        let artifact_path = track.artifact_path();
        let source = track.file_name.to_string_lossy().to_string();

        match self.check_artifact(&artifact_path, &source) {
            ArtifactState::Fresh(artifact) => Ok(artifact.subs),
            ArtifactState::Corrupt(e) => Err(e.into()),
            state => Err(EpisodeError::InvalidRecord {
                path: artifact_path,
                message: format!("line artifact {}, run `process` first", state),
            }),
        }
    }
}
