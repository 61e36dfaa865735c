/*!
 * Episode media collaborators.
 *
 * - `episode`: episode identity records and directory discovery
 * - `tracks`: the per-episode subtitle track list and track selection
 * - `frames`: the frame image abstraction
 * - `ffmpeg`: decoding frames through an ffmpeg child process
 */

pub mod episode;
pub mod ffmpeg;
pub mod frames;
pub mod tracks;

pub use episode::{EpisodeInfo, discover_episode_dirs};
pub use ffmpeg::FfmpegFrameStream;
pub use frames::{FrameImage, RgbFrame};
pub use tracks::{SubtitleTrackEntry, load_track_list, select_track};
