/*!
 * Error types for the subframe application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing JSON artifacts
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Error reading an artifact from disk
    #[error("Failed to read {path:?}: {source}")]
    Read {
        /// Artifact location
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing an artifact to disk
    #[error("Failed to write {path:?}: {source}")]
    Write {
        /// Artifact location
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact content is not valid JSON for the expected type
    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        /// Artifact location
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be serialized
    #[error("Failed to serialize artifact: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that can occur while decoding or saving video frames
#[derive(Error, Debug)]
pub enum FrameError {
    /// The decoder process could not be started
    #[error("Failed to start {program}: {source}")]
    Spawn {
        /// Program name or path
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Stream geometry or frame rate could not be determined
    #[error("Failed to probe video stream: {0}")]
    Probe(String),

    /// The decoder failed mid-stream
    #[error("Frame decoding failed: {0}")]
    Decode(String),

    /// A frame image could not be written
    #[error("Failed to save frame {path:?}: {message}")]
    Save {
        /// Image location
        path: PathBuf,
        /// Encoder message
        message: String,
    },
}

/// Errors that end the processing of a single episode
#[derive(Error, Debug)]
pub enum EpisodeError {
    /// The episode record or track list is unusable
    #[error("Invalid episode data in {path:?}: {message}")]
    InvalidRecord {
        /// Offending file
        path: PathBuf,
        /// What was wrong
        message: String,
    },

    /// The episode has no subtitle track to work with
    #[error("No subtitle tracks listed for episode {0}")]
    NoTracks(String),

    /// Error from artifact handling
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Error from frame decoding
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Error from a file operation
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from loading or creating the application config
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
