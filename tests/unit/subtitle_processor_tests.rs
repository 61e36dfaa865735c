/*!
 * Tests for track processing and line artifact states
 */

use anyhow::Result;
use std::fs;
use subframe::app_config::SubtitleConfig;
use subframe::file_utils::FileManager;
use subframe::subtitle_processor::{ArtifactState, LineArtifact, SubtitleProcessor, TrackOutcome};
use crate::common;

fn processor() -> SubtitleProcessor {
    SubtitleProcessor::new(&SubtitleConfig::default())
}

#[test]
fn test_check_artifact_withNoFile_shouldReportMissing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let state = processor().check_artifact(&temp_dir.path().join("2_eng.json"), "track.ass");
    assert!(matches!(state, ArtifactState::Missing));
    Ok(())
}

#[test]
fn test_process_track_withFreshArtifact_shouldSkip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let track = common::write_track(temp_dir.path(), 2, "eng", common::SAMPLE_SCRIPT)?;
    let processor = processor();

    assert_eq!(processor.process_track(&track, false)?, TrackOutcome::Written(2));
    assert_eq!(processor.process_track(&track, false)?, TrackOutcome::Skipped);

    let source = track.file_name.to_string_lossy().to_string();
    assert!(matches!(
        processor.check_artifact(&track.artifact_path(), &source),
        ArtifactState::Fresh(_)
    ));
    Ok(())
}

#[test]
fn test_process_track_withForce_shouldRewriteFreshArtifact() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let track = common::write_track(temp_dir.path(), 2, "eng", common::SAMPLE_SCRIPT)?;
    let processor = processor();

    processor.process_track(&track, false)?;
    assert_eq!(processor.process_track(&track, true)?, TrackOutcome::Written(2));
    Ok(())
}

#[test]
fn test_check_artifact_withOtherVersion_shouldReportStale() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let track = common::write_track(temp_dir.path(), 2, "eng", common::SAMPLE_SCRIPT)?;
    processor().process_track(&track, false)?;

    let newer = SubtitleProcessor::new(&SubtitleConfig {
        artifact_version: 2,
        ..SubtitleConfig::default()
    });
    let source = track.file_name.to_string_lossy().to_string();

    assert!(matches!(
        newer.check_artifact(&track.artifact_path(), &source),
        ArtifactState::Stale(_)
    ));
    assert_eq!(newer.process_track(&track, false)?, TrackOutcome::Written(2));

    let artifact: LineArtifact = FileManager::read_json(track.artifact_path())?;
    assert_eq!(artifact.subversion, 2);
    Ok(())
}

#[test]
fn test_check_artifact_withOtherSource_shouldReportStale() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let track = common::write_track(temp_dir.path(), 2, "eng", common::SAMPLE_SCRIPT)?;
    processor().process_track(&track, false)?;

    let state = processor().check_artifact(&track.artifact_path(), "elsewhere/track.ass");
    assert!(matches!(state, ArtifactState::Stale(_)));
    Ok(())
}

#[test]
fn test_process_track_withCorruptArtifact_shouldReprocess() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let track = common::write_track(temp_dir.path(), 2, "eng", common::SAMPLE_SCRIPT)?;
    fs::write(track.artifact_path(), "{ not json")?;
    let processor = processor();

    let source = track.file_name.to_string_lossy().to_string();
    assert!(matches!(
        processor.check_artifact(&track.artifact_path(), &source),
        ArtifactState::Corrupt(_)
    ));
    assert_eq!(processor.process_track(&track, false)?, TrackOutcome::Written(2));
    Ok(())
}

#[test]
fn test_process_track_withOtherCodec_shouldWriteEmptyArtifact() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let track = common::track_entry(temp_dir.path(), 3, "jpn", "S_HDMV/PGS", false);

    assert_eq!(processor().process_track(&track, false)?, TrackOutcome::Written(0));

    let artifact: LineArtifact = FileManager::read_json(track.artifact_path())?;
    assert!(artifact.subs.is_empty());
    assert_eq!(artifact.source, track.file_name.to_string_lossy());
    Ok(())
}

#[test]
fn test_process_track_withMissingTrackFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let track = common::track_entry(temp_dir.path(), 2, "eng", common::ASS_CODEC, false);

    assert!(processor().process_track(&track, false).is_err());
    assert!(!track.artifact_path().exists());
    Ok(())
}

#[test]
fn test_load_lines_withoutArtifact_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let track = common::write_track(temp_dir.path(), 2, "eng", common::SAMPLE_SCRIPT)?;
    let processor = processor();

    assert!(processor.load_lines(&track).is_err());

    processor.process_track(&track, false)?;
    assert_eq!(processor.load_lines(&track)?.len(), 2);
    Ok(())
}

#[test]
fn test_process_episode_withSeveralTracks_shouldCountOutcomes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path();
    let english = common::track_entry(dir, 2, "eng", common::ASS_CODEC, true);
    let japanese = common::track_entry(dir, 3, "jpn", common::ASS_CODEC, false);
    fs::write(&english.file_name, common::SAMPLE_SCRIPT)?;
    fs::write(&japanese.file_name, common::dialogue("0:00:01.00", "0:00:02.00", "はい"))?;
    common::write_track_list(dir, &[english, japanese])?;
    let processor = processor();

    let first = processor.process_episode(dir, false)?;
    assert_eq!((first.written, first.skipped, first.lines), (2, 0, 3));

    let second = processor.process_episode(dir, false)?;
    assert_eq!((second.written, second.skipped, second.lines), (0, 2, 0));
    Ok(())
}

#[test]
fn test_process_script_withEmptyScript_shouldReturnNoLines() {
    assert!(processor().process_script("").is_empty());
}
