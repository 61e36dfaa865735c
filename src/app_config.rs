use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::subtitle::CjkRanges;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory holding one sub-directory per episode, each with an
    /// `episode_info.json` and a `subs.json` track list
    #[serde(default = "default_mediainfo_dir")]
    pub mediainfo_dir: PathBuf,

    /// Directory receiving extracted frames, one sub-directory per episode
    #[serde(default = "default_frames_dir")]
    pub frames_dir: PathBuf,

    /// Maximum number of episodes processed at the same time
    #[serde(default = "default_max_parallel_episodes")]
    pub max_parallel_episodes: usize,

    /// Subtitle processing settings
    #[serde(default)]
    pub subtitles: SubtitleConfig,

    /// Frame extraction settings
    #[serde(default)]
    pub frames: FrameConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Configuration for subtitle processing
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubtitleConfig {
    /// Version tag written into line artifacts; a mismatch forces reprocessing
    #[serde(default = "default_artifact_version")]
    pub artifact_version: u32,

    /// Codec id of the only track type that is parsed
    #[serde(default = "default_ass_codec_id")]
    pub ass_codec_id: String,

    /// Unicode ranges treated as CJK by the whitespace normalizer
    #[serde(default)]
    pub cjk_ranges: CjkRanges,

    /// Track language to align frames against when an episode has several
    /// subtitle tracks (ISO 639-1 or 639-2). Falls back to the default track.
    #[serde(default)]
    pub preferred_language: Option<String>,
}

impl Default for SubtitleConfig {
    fn default() -> Self {
        Self {
            artifact_version: default_artifact_version(),
            ass_codec_id: default_ass_codec_id(),
            cjk_ranges: CjkRanges::default(),
            preferred_language: None,
        }
    }
}

/// Configuration for frame decoding and saving
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FrameConfig {
    /// ffmpeg executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    /// ffprobe executable
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    /// Burn the episode's subtitles into the decoded frames
    #[serde(default = "default_true")]
    pub burn_in_subtitles: bool,

    /// Subtitle stream index passed to the burn-in filter
    #[serde(default)]
    pub subtitle_stream_index: usize,

    /// Image file extension; selects the encoder (`jpg`, `png`)
    #[serde(default = "default_image_extension")]
    pub image_extension: String,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            burn_in_subtitles: true,
            subtitle_stream_index: 0,
            image_extension: default_image_extension(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_mediainfo_dir() -> PathBuf {
    PathBuf::from("mediainfo")
}

fn default_frames_dir() -> PathBuf {
    PathBuf::from("frames")
}

fn default_max_parallel_episodes() -> usize {
    2
}

fn default_artifact_version() -> u32 {
    1
}

fn default_ass_codec_id() -> String {
    "S_TEXT/ASS".to_string()
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_image_extension() -> String {
    "jpg".to_string()
}

fn default_true() -> bool {
    true
}

/// Image extensions the frame writer knows how to encode
const SUPPORTED_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

impl Config {
    /// Load the configuration file, writing a default one if it is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();

        if path.exists() {
            let content = fs::read_to_string(path)?;
            return serde_json::from_str(&content)
                .map_err(|e| AppError::Config(format!("Failed to parse {:?}: {}", path, e)));
        }

        log::warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        let json = serde_json::to_vec_pretty(&config)
            .map_err(|e| AppError::Config(format!("Failed to serialize default config: {}", e)))?;
        FileManager::write_atomic(path, &json)?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.mediainfo_dir.as_os_str().is_empty() {
            return Err(anyhow!("mediainfo_dir must not be empty"));
        }
        if self.frames_dir.as_os_str().is_empty() {
            return Err(anyhow!("frames_dir must not be empty"));
        }
        if self.max_parallel_episodes == 0 {
            return Err(anyhow!("max_parallel_episodes must be at least 1"));
        }

        self.subtitles.cjk_ranges.validate()?;

        if let Some(language) = &self.subtitles.preferred_language {
            crate::language_utils::validate_language_code(language)?;
        }

        let extension = self.frames.image_extension.to_lowercase();
        if !SUPPORTED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(anyhow!(
                "Unsupported image extension '{}', expected one of: {}",
                self.frames.image_extension,
                SUPPORTED_IMAGE_EXTENSIONS.join(", ")
            ));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            mediainfo_dir: default_mediainfo_dir(),
            frames_dir: default_frames_dir(),
            max_parallel_episodes: default_max_parallel_episodes(),
            subtitles: SubtitleConfig::default(),
            frames: FrameConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
