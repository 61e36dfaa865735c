/*!
 * ffmpeg-backed frame stream.
 *
 * Decodes the first video stream of an episode (optionally with its
 * subtitles burned in) to raw RGB on ffmpeg's stdout and yields one
 * `(seconds, RgbFrame)` pair per frame. Frame times are derived from the
 * probed frame rate, so the stream is monotonic by construction. Dropping
 * an unfinished stream kills and reaps the decoder.
 */

use log::{debug, warn};
use serde_json::{Value, from_slice};
use std::collections::VecDeque;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};

use crate::app_config::FrameConfig;
use crate::errors::FrameError;

use super::frames::RgbFrame;

/// Geometry and rate of a video stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoGeometry {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

/// Probe the first video stream with ffprobe
pub fn probe_video(ffprobe_path: &str, video_path: &Path) -> Result<VideoGeometry, FrameError> {
    let output = Command::new(ffprobe_path)
        .args([
            "-v", "error",
            "-select_streams", "v:0",
            "-show_entries", "stream=width,height,r_frame_rate,avg_frame_rate",
            "-of", "json",
        ])
        .arg(video_path)
        .output()
        .map_err(|source| FrameError::Spawn {
            program: ffprobe_path.to_string(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(FrameError::Probe(format!("ffprobe failed: {}", stderr.trim())));
    }

    let json: Value = from_slice(&output.stdout)
        .map_err(|e| FrameError::Probe(format!("invalid ffprobe output: {}", e)))?;

    parse_probe_output(&json)
}

/// Extract geometry from ffprobe's JSON output
pub fn parse_probe_output(json: &Value) -> Result<VideoGeometry, FrameError> {
    let stream = json
        .get("streams")
        .and_then(|s| s.as_array())
        .and_then(|s| s.first())
        .ok_or_else(|| FrameError::Probe("no video stream found".to_string()))?;

    let dimension = |key: &str| {
        stream
            .get(key)
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v > 0)
            .ok_or_else(|| FrameError::Probe(format!("missing stream {}", key)))
    };

    let fps = ["r_frame_rate", "avg_frame_rate"]
        .iter()
        .filter_map(|key| stream.get(*key).and_then(|v| v.as_str()))
        .find_map(parse_frame_rate)
        .ok_or_else(|| FrameError::Probe("missing or zero frame rate".to_string()))?;

    Ok(VideoGeometry {
        width: dimension("width")?,
        height: dimension("height")?,
        fps,
    })
}

/// Parse an ffprobe rate such as `24000/1001` or `25`
pub fn parse_frame_rate(rate: &str) -> Option<f64> {
    let value = match rate.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            if den == 0.0 {
                return None;
            }
            num / den
        }
        None => rate.trim().parse().ok()?,
    };

    (value.is_finite() && value > 0.0).then_some(value)
}

/// Escape a path for use as an ffmpeg filter option value
pub fn escape_filter_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '\'' | ':' | ',' | '[' | ']' | ';') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Number of trailing ffmpeg stderr lines kept for error reports
const STDERR_TAIL_LINES: usize = 20;

// @returns: Reader thread collecting the last stderr lines
fn drain_stderr(stderr: ChildStderr) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut tail = VecDeque::with_capacity(STDERR_TAIL_LINES);
        for line in BufReader::new(stderr).lines() {
            let Ok(line) = line else { break };
            if tail.len() == STDERR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
        }
        Vec::from(tail).join("\n")
    })
}

// @struct: Running ffmpeg decoder and its frame cursor
pub struct FfmpegFrameStream {
    child: Child,
    stdout: BufReader<ChildStdout>,
    stderr_tail: Option<JoinHandle<String>>,
    geometry: VideoGeometry,
    frame_index: u64,
    reached_end: bool,
    reaped: bool,
    error: Option<FrameError>,
}

impl FfmpegFrameStream {
    /// Probe the video and start decoding it
    pub fn open(config: &FrameConfig, video_path: &Path) -> Result<Self, FrameError> {
        let geometry = probe_video(&config.ffprobe_path, video_path)?;
        debug!(
            "Decoding {:?} at {}x{} {:.3} fps",
            video_path, geometry.width, geometry.height, geometry.fps
        );

        let mut command = Command::new(&config.ffmpeg_path);
        command.args(["-nostdin", "-nostats", "-loglevel", "error", "-i"]);
        command.arg(video_path);

        if config.burn_in_subtitles {
            let filter = format!(
                "subtitles=filename={}:si={}",
                escape_filter_value(&video_path.to_string_lossy()),
                config.subtitle_stream_index
            );
            command.args(["-vf", &filter]);
        }

        command
            .args(["-an", "-sn", "-f", "rawvideo", "-pix_fmt", "rgb24", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().map_err(|source| FrameError::Spawn {
            program: config.ffmpeg_path.clone(),
            source,
        })?;

        // stderr is read concurrently so a chatty filter cannot fill the pipe
        // and stall the frame reads
        let stderr_tail = child.stderr.take().map(drain_stderr);

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(FrameError::Decode("failed to capture ffmpeg stdout".to_string()));
        };

        Ok(Self {
            child,
            stdout: BufReader::new(stdout),
            stderr_tail,
            geometry,
            frame_index: 0,
            reached_end: false,
            reaped: false,
            error: None,
        })
    }

    pub fn geometry(&self) -> VideoGeometry {
        self.geometry
    }

    /// Process id of the ffmpeg child
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// Stop the decoder and report how the stream ended.
    ///
    /// A stream abandoned before its end (all lines matched) is not an
    /// error. A stream that ended on a read error or a failed ffmpeg exit is.
    pub fn finish(mut self) -> Result<u64, FrameError> {
        if let Some(error) = self.error.take() {
            self.stop();
            return Err(error);
        }

        if !self.reached_end {
            self.stop();
            return Ok(self.frame_index);
        }

        let status = self.child.wait();
        self.reaped = true;
        let stderr = self.collect_stderr();

        let status = status.map_err(|e| FrameError::Decode(format!("failed to wait for ffmpeg: {}", e)))?;
        if !status.success() {
            return Err(FrameError::Decode(format!(
                "ffmpeg exited with {}: {}",
                status,
                stderr.trim()
            )));
        }

        Ok(self.frame_index)
    }

    // @updates: Kills and reaps the child, then joins the stderr reader
    fn stop(&mut self) {
        if !self.reaped {
            let _ = self.child.kill();
            let _ = self.child.wait();
            self.reaped = true;
        }
        self.collect_stderr();
    }

    fn collect_stderr(&mut self) -> String {
        self.stderr_tail
            .take()
            .and_then(|reader| reader.join().ok())
            .unwrap_or_default()
    }
}

impl Drop for FfmpegFrameStream {
    fn drop(&mut self) {
        if !self.reaped {
            debug!("Stopping unfinished ffmpeg decoder {}", self.child.id());
            self.stop();
        }
    }
}

impl Iterator for FfmpegFrameStream {
    type Item = (f64, RgbFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.reached_end || self.error.is_some() {
            return None;
        }

        let VideoGeometry { width, height, fps } = self.geometry;
        let mut pixels = vec![0u8; RgbFrame::byte_len(width, height)];

        match self.stdout.read_exact(&mut pixels) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                self.reached_end = true;
                return None;
            }
            Err(e) => {
                warn!("Frame read failed after {} frames: {}", self.frame_index, e);
                self.error = Some(FrameError::Decode(e.to_string()));
                return None;
            }
        }

        let time_secs = self.frame_index as f64 / fps;
        self.frame_index += 1;

        RgbFrame::new(width, height, pixels).map(|frame| (time_secs, frame))
    }
}
