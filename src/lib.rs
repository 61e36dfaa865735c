/*!
 * # subframe - subtitle lines to video frames
 *
 * A Rust library that turns ASS subtitle tracks into clean, time-ordered
 * display lines and picks one representative video frame per line.
 *
 * ## Features
 *
 * - Parse ASS dialogue records, stripping override blocks and vector drawings
 * - CJK-aware whitespace normalization
 * - Merge adjacent records of the same line and collapse simultaneous ones
 * - Versioned JSON line artifacts, reprocessed only when stale
 * - Single-pass alignment of line midpoints against a decoded frame stream
 * - Batch processing of episode directories with bounded parallelism
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `subtitle`: line parsing and cleanup:
 *   - `subtitle::timestamp`: `H:MM:SS.ff` codec
 *   - `subtitle::override_tags`: override block stripping
 *   - `subtitle::text`: text normalization
 *   - `subtitle::dialogue`: dialogue record extraction
 *   - `subtitle::merge`: adjacency merge and same-start collapse
 * - `subtitle_processor`: track processing and line artifacts
 * - `aligner`: midpoint to frame alignment
 * - `media`: episode records, track lists, and the ffmpeg frame stream
 * - `frame_grabber`: per-episode frame extraction and frame artifacts
 * - `app_controller`: batch driver over all episodes
 * - `app_config`: configuration management
 * - `file_utils`: file system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod aligner;
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod frame_grabber;
pub mod language_utils;
pub mod media;
pub mod subtitle;
pub mod subtitle_processor;

// Re-export main types for easier usage
pub use aligner::{AlignmentSummary, Midpoint};
pub use app_config::Config;
pub use app_controller::{BatchSummary, Controller};
pub use errors::{AppError, ArtifactError, EpisodeError, FrameError};
pub use frame_grabber::{ExtractedFrame, FrameGrabber};
pub use language_utils::language_codes_match;
pub use subtitle::SubtitleLine;
pub use subtitle_processor::{LineArtifact, SubtitleProcessor};
