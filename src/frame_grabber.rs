use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::aligner::{self, AlignmentSummary};
use crate::app_config::Config;
use crate::errors::{EpisodeError, FrameError};
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::media::episode::EpisodeInfo;
use crate::media::ffmpeg::FfmpegFrameStream;
use crate::media::frames::FrameImage;
use crate::media::tracks::{load_track_list, select_track};
use crate::subtitle::SubtitleLine;
use crate::subtitle::timestamp;
use crate::subtitle_processor::SubtitleProcessor;

// @module: Per-episode frame extraction

/// Frame artifact file inside an episode's frame directory
pub const FRAME_ARTIFACT_FILE: &str = "frame_info.json";

// @struct: One saved frame and the line it illustrates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFrame {
    pub series_order: u32,
    pub series_name: String,
    pub episode_number: u32,
    pub overall_order: u32,

    // @field: Line interval as written in the script
    pub start: String,
    pub start_ms: u64,
    pub end: String,
    pub end_ms: u64,

    // @field: Time of the chosen frame
    pub extracted: String,
    pub extracted_ms: u64,

    // @field: Line text
    pub text: String,

    // @field: Image path relative to the frames root
    pub frame_path: String,
}

/// What happened to one episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabOutcome {
    /// Frame artifact already present
    Skipped,
    /// Frames were saved and the artifact written
    Aligned(AlignmentSummary),
}

/// Saves one frame per line and records the result
#[derive(Debug, Clone)]
pub struct FrameGrabber {
    frames_root: PathBuf,
    image_extension: String,
}

impl FrameGrabber {
    pub fn new<P: Into<PathBuf>>(frames_root: P, image_extension: &str) -> Self {
        FrameGrabber {
            frames_root: frames_root.into(),
            image_extension: image_extension.to_lowercase(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.frames_dir, &config.frames.image_extension)
    }

    /// Directory receiving the frames of one episode
    pub fn frame_dir(&self, episode: &EpisodeInfo) -> PathBuf {
        self.frames_root.join(episode.base_name())
    }

    pub fn artifact_path(&self, episode: &EpisodeInfo) -> PathBuf {
        self.frame_dir(episode).join(FRAME_ARTIFACT_FILE)
    }

    /// An episode is done once its frame artifact exists
    pub fn is_complete(&self, episode: &EpisodeInfo) -> bool {
        FileManager::file_exists(self.artifact_path(episode))
    }

    /// Image file name for a line midpoint, e.g. `001_01_Show_01_0_01_02_50.jpg`
    pub fn frame_file_name(&self, episode: &EpisodeInfo, midpoint_ms: u64) -> String {
        format!(
            "{}_{}.{}",
            episode.base_name(),
            timestamp::format(midpoint_ms, '_', '_'),
            self.image_extension
        )
    }

    /// Align lines against a frame stream and save every matched frame.
    ///
    /// Records come back in midpoint order. Nothing is written besides the
    /// images; the artifact is left to `write_artifact` so a caller can
    /// check the decoder first.
    pub fn align_frames<F, I>(
        &self,
        episode: &EpisodeInfo,
        lines: &[SubtitleLine],
        frames: I,
    ) -> Result<(Vec<ExtractedFrame>, AlignmentSummary), EpisodeError>
    where
        F: FrameImage,
        I: IntoIterator<Item = (f64, F)>,
    {
        let frame_dir = self.frame_dir(episode);
        FileManager::ensure_dir(&frame_dir)?;

        let base_name = episode.base_name();
        let midpoints = aligner::midpoints(lines);
        let mut records = Vec::with_capacity(midpoints.len());

        let summary = aligner::align(&midpoints, frames, |midpoint, frame_secs, frame: F| {
            let line = &lines[midpoint.line_index];
            let file_name = self.frame_file_name(episode, midpoint.ms);
            frame.save(&frame_dir.join(&file_name))?;

            let extracted_ms = (frame_secs * 1000.0).round() as u64;
            debug!("Line at {} matched frame at {}", line.start, timestamp::format_display(extracted_ms));

            records.push(ExtractedFrame {
                series_order: episode.series_order,
                series_name: episode.series_name.clone(),
                episode_number: episode.episode_number,
                overall_order: episode.overall_order,
                start: line.start.clone(),
                start_ms: line.start_ms,
                end: line.end.clone(),
                end_ms: line.end_ms,
                extracted: timestamp::format_display(extracted_ms),
                extracted_ms,
                text: line.text.clone(),
                frame_path: format!("{}/{}", base_name, file_name),
            });
            Ok::<(), FrameError>(())
        })?;

        if summary.exhausted {
            info!(
                "Frame stream of {} ended early, {} line(s) without a frame",
                episode.display_name(),
                summary.unmatched
            );
        }

        Ok((records, summary))
    }

    /// Write the frame artifact, marking the episode as done
    pub fn write_artifact(&self, episode: &EpisodeInfo, records: &[ExtractedFrame]) -> Result<(), EpisodeError> {
        FileManager::write_json_atomic(self.artifact_path(episode), &records)?;
        Ok(())
    }

    /// Extract the frames of one episode directory.
    ///
    /// Uses the line artifact of the selected track, so the episode must
    /// have been processed first.
    pub fn run_episode<P: AsRef<Path>>(&self, episode_dir: P, config: &Config) -> Result<GrabOutcome, EpisodeError> {
        let episode_dir = episode_dir.as_ref();
        let episode = EpisodeInfo::load(episode_dir)?;

        if self.is_complete(&episode) {
            debug!("Skipping {}, frames already extracted", episode.display_name());
            return Ok(GrabOutcome::Skipped);
        }

        let tracks: Vec<_> = load_track_list(episode_dir)?
            .into_iter()
            .filter(|t| t.is_subtitle())
            .collect();
        let track = select_track(&tracks, config.subtitles.preferred_language.as_deref())
            .ok_or_else(|| EpisodeError::NoTracks(episode.display_name()))?;

        if tracks.len() > 1 {
            debug!(
                "{} has {} subtitle tracks, using track {} ({})",
                episode.display_name(),
                tracks.len(),
                track.track,
                language_utils::language_name(&track.language).unwrap_or(track.language.as_str())
            );
        }

        let lines = SubtitleProcessor::new(&config.subtitles).load_lines(track)?;

        if lines.is_empty() {
            warn!("{} has no dialogue lines, writing empty frame list", episode.display_name());
            self.write_artifact(&episode, &[])?;
            return Ok(GrabOutcome::Aligned(AlignmentSummary::default()));
        }

        info!("Extracting {} frames for {}", lines.len(), episode.display_name());

        let mut stream = FfmpegFrameStream::open(&config.frames, &episode.file_path)?;
        let (records, summary) = self.align_frames(&episode, &lines, stream.by_ref())?;
        let decoded = stream.finish()?;

        debug!("{} frames decoded for {}", decoded, episode.display_name());
        self.write_artifact(&episode, &records)?;

        Ok(GrabOutcome::Aligned(summary))
    }
}
