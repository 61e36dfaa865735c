/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use subframe::errors::ArtifactError;
use subframe::file_utils::FileManager;
use crate::common;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Record {
    name: String,
    count: u32,
}

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.tmp", "test content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));
    Ok(())
}

/// Test that file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

#[test]
fn test_write_atomic_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("a").join("b").join("out.json");

    FileManager::write_atomic(&target, b"first")?;
    assert_eq!(fs::read_to_string(&target)?, "first");
    Ok(())
}

#[test]
fn test_write_atomic_withExistingFile_shouldReplaceWithoutLeftovers() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out.json");

    FileManager::write_atomic(&target, b"first")?;
    FileManager::write_atomic(&target, b"second")?;

    assert_eq!(fs::read_to_string(&target)?, "second");
    assert_eq!(fs::read_dir(temp_dir.path())?.count(), 1);
    Ok(())
}

#[test]
fn test_json_helpers_withRecord_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("record.json");
    let record = Record { name: "episode".to_string(), count: 3 };

    FileManager::write_json_atomic(&target, &record)?;
    let loaded: Record = FileManager::read_json(&target)?;

    assert_eq!(loaded, record);
    Ok(())
}

#[test]
fn test_read_json_withInvalidContent_shouldReturnParseError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = common::create_test_file(temp_dir.path(), "broken.json", "{\"name\": ")?;

    let result: Result<Record, ArtifactError> = FileManager::read_json(&target);
    assert!(matches!(result, Err(ArtifactError::Parse { .. })));
    Ok(())
}

#[test]
fn test_read_json_withMissingFile_shouldReturnReadError() {
    let result: Result<Record, ArtifactError> = FileManager::read_json("missing/record.json");
    assert!(matches!(result, Err(ArtifactError::Read { .. })));
}

#[test]
fn test_find_files_named_shouldSearchRecursively() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("x").join("y");
    fs::create_dir_all(&nested)?;
    common::create_test_file(&nested, "subs.json", "[]")?;
    common::create_test_file(temp_dir.path(), "subs.json", "[]")?;
    common::create_test_file(temp_dir.path(), "other.json", "[]")?;

    let found = FileManager::find_files_named(temp_dir.path(), "subs.json")?;

    assert_eq!(found, vec![temp_dir.path().join("subs.json"), nested.join("subs.json")]);
    Ok(())
}
