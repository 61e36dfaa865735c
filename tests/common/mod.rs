/*!
 * Common test utilities for the subframe test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use subframe::app_config::FrameConfig;
use subframe::errors::FrameError;
use subframe::file_utils::FileManager;
use subframe::media::episode::{EPISODE_INFO_FILE, EpisodeInfo};
use subframe::media::frames::FrameImage;
use subframe::media::tracks::{SubtitleTrackEntry, TRACK_LIST_FILE, TrackInfo, TrackProperties};

/// Codec id of ASS tracks
pub const ASS_CODEC: &str = "S_TEXT/ASS";

/// Four dialogue records: a drawing followed by text, the same text again
/// right after it, and two records starting together
pub const SAMPLE_SCRIPT: &str = r#"[Script Info]
Title: Sample
ScriptType: v4.00+

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour
Style: Default,Arial,20,&H00FFFFFF

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,{\p1}m 0 0 l 10 10{\p0}Hello
Dialogue: 0,0:00:02.00,0:00:03.00,Default,,0,0,0,,{\i1}Hello{\i0}
Dialogue: 0,0:00:05.00,0:00:06.00,Default,,0,0,0,,World
Dialogue: 0,0:00:05.00,0:00:07.00,Default,,0,0,0,,Again
"#;

/// Route library logs to the test harness
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Build a dialogue record with default style fields
pub fn dialogue(start: &str, end: &str, text: &str) -> String {
    format!("Dialogue: 0,{},{},Default,,0,0,0,,{}", start, end, text)
}

/// Episode record for a made-up series
pub fn sample_episode(root: &Path, overall_order: u32, episode_number: u32) -> EpisodeInfo {
    let episode_path = root.join(format!("episode_{:03}", overall_order));
    EpisodeInfo {
        file_name: format!("show_{:02}.mkv", episode_number),
        series_order: 1,
        series_name: "Show".to_string(),
        episode_number,
        overall_order,
        file_path: root.join(format!("show_{:02}.mkv", episode_number)),
        episode_path,
    }
}

/// Write the episode record into its episode directory
pub fn write_episode(episode: &EpisodeInfo) -> Result<PathBuf> {
    let dir = episode.episode_path.clone();
    FileManager::ensure_dir(&dir)?;
    FileManager::write_json_atomic(dir.join(EPISODE_INFO_FILE), episode)?;
    Ok(dir)
}

/// Track list entry for a track file inside an episode directory
pub fn track_entry(episode_dir: &Path, track: u64, language: &str, codec_id: &str, default_track: bool) -> SubtitleTrackEntry {
    SubtitleTrackEntry {
        file_name: episode_dir.join(format!("track{}_{}.ass", track, language)),
        language: language.to_string(),
        info: TrackInfo {
            id: track,
            track_type: "subtitles".to_string(),
            codec: "SubStationAlpha".to_string(),
            properties: TrackProperties {
                codec_id: codec_id.to_string(),
                language: Some(language.to_string()),
                default_track,
            },
        },
        track,
    }
}

/// Write a track file and list it in the episode's track list
pub fn write_track(episode_dir: &Path, track: u64, language: &str, script: &str) -> Result<SubtitleTrackEntry> {
    let entry = track_entry(episode_dir, track, language, ASS_CODEC, false);
    fs::write(&entry.file_name, script)?;
    write_track_list(episode_dir, std::slice::from_ref(&entry))?;
    Ok(entry)
}

/// Write the episode's track list
pub fn write_track_list(episode_dir: &Path, tracks: &[SubtitleTrackEntry]) -> Result<()> {
    FileManager::write_json_atomic(episode_dir.join(TRACK_LIST_FILE), &tracks)?;
    Ok(())
}

/// In-memory frame that writes its label to disk
#[derive(Debug, Clone)]
pub struct LabelFrame(pub String);

impl FrameImage for LabelFrame {
    fn save(&self, path: &Path) -> Result<(), FrameError> {
        fs::write(path, &self.0).map_err(|e| FrameError::Save {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// Frame whose encoder always fails
#[derive(Debug, Clone)]
pub struct BrokenFrame;

impl FrameImage for BrokenFrame {
    fn save(&self, path: &Path) -> Result<(), FrameError> {
        Err(FrameError::Save {
            path: path.to_path_buf(),
            message: "encoder unavailable".to_string(),
        })
    }
}

/// Frame stream at the given times, labelled by their time
pub fn label_frames(times: &[f64]) -> Vec<(f64, LabelFrame)> {
    times.iter().map(|&t| (t, LabelFrame(format!("{:.1}", t)))).collect()
}

/// Write an executable shell script
#[cfg(unix)]
pub fn create_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    let path = create_test_file(dir, name, &format!("#!/bin/sh\n{}\n", body))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

/// Frame config pointing at stand-in decoder tools.
///
/// The probe reports a 2x1 video at 25 fps, so every frame is 6 bytes;
/// `ffmpeg_body` is the script run in place of ffmpeg.
#[cfg(unix)]
pub fn fake_decoder_config(dir: &Path, ffmpeg_body: &str) -> Result<FrameConfig> {
    let ffprobe = create_script(
        dir,
        "ffprobe",
        r#"echo '{"streams":[{"width":2,"height":1,"r_frame_rate":"25/1"}]}'"#,
    )?;
    let ffmpeg = create_script(dir, "ffmpeg", ffmpeg_body)?;

    Ok(FrameConfig {
        ffmpeg_path: ffmpeg.to_string_lossy().to_string(),
        ffprobe_path: ffprobe.to_string_lossy().to_string(),
        ..FrameConfig::default()
    })
}
