use anyhow::{Context, Result, anyhow};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::EpisodeError;
use crate::frame_grabber::{FrameGrabber, GrabOutcome};
use crate::media::episode::discover_episode_dirs;
use crate::subtitle_processor::SubtitleProcessor;

// @module: Application controller for batch episode runs

/// Result of one episode job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeStatus {
    Done,
    Skipped,
    Failed,
    Cancelled,
}

/// Counts over one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl BatchSummary {
    fn record(&mut self, status: EpisodeStatus) {
        match status {
            EpisodeStatus::Done => self.processed += 1,
            EpisodeStatus::Skipped => self.skipped += 1,
            EpisodeStatus::Failed => self.failed += 1,
            EpisodeStatus::Cancelled => self.cancelled += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.processed + self.skipped + self.failed + self.cancelled
    }
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Arc<Config>,

    // @field: Set once the user asked to stop; checked before each episode
    cancelled: Arc<AtomicBool>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;

        Ok(Self {
            config: Arc::new(config),
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Flag that stops the batch before the next episode when set
    pub fn cancellation_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Find every episode directory under the configured media info root
    pub fn discover_episodes(&self) -> Result<Vec<PathBuf>> {
        let root = &self.config.mediainfo_dir;
        if !root.is_dir() {
            return Err(anyhow!("Media info directory does not exist: {:?}", root));
        }

        discover_episode_dirs(root).with_context(|| format!("Failed to scan {:?}", root))
    }

    /// Turn every subtitle track of every episode into a line artifact
    pub async fn run_process(&self, force: bool) -> Result<BatchSummary> {
        let episodes = self.discover_episodes()?;
        let processor = SubtitleProcessor::new(&self.config.subtitles);

        self.run_batch("Processing subtitles", episodes, move |dir| {
            let summary = processor.process_episode(&dir, force)?;
            Ok(if summary.written == 0 && summary.skipped > 0 {
                EpisodeStatus::Skipped
            } else {
                EpisodeStatus::Done
            })
        })
        .await
    }

    /// Extract one frame per line for every episode
    pub async fn run_grab(&self) -> Result<BatchSummary> {
        let episodes = self.discover_episodes()?;
        let grabber = FrameGrabber::from_config(&self.config);
        let config = Arc::clone(&self.config);

        self.run_batch("Extracting frames", episodes, move |dir| {
            Ok(match grabber.run_episode(&dir, &config)? {
                GrabOutcome::Skipped => EpisodeStatus::Skipped,
                GrabOutcome::Aligned(_) => EpisodeStatus::Done,
            })
        })
        .await
    }

    /// Run a blocking job per episode with bounded parallelism.
    ///
    /// A failing episode is logged and counted; the others keep going.
    async fn run_batch<J>(&self, label: &str, episodes: Vec<PathBuf>, job: J) -> Result<BatchSummary>
    where
        J: Fn(PathBuf) -> Result<EpisodeStatus, EpisodeError> + Clone + Send + Sync + 'static,
    {
        let start_time = Instant::now();
        let mut summary = BatchSummary::default();

        if episodes.is_empty() {
            warn!("No episodes found in {:?}", self.config.mediainfo_dir);
            return Ok(summary);
        }

        info!("{}: {} episode(s)", label, episodes.len());
        let progress_bar = Self::progress_bar(episodes.len() as u64, label);

        let statuses: Vec<EpisodeStatus> = stream::iter(episodes)
            .map(|dir| {
                let job = job.clone();
                let cancelled = Arc::clone(&self.cancelled);
                let progress_bar = progress_bar.clone();

                async move {
                    let name = dir.display().to_string();

                    let status = if cancelled.load(Ordering::SeqCst) {
                        EpisodeStatus::Cancelled
                    } else {
                        match tokio::task::spawn_blocking(move || job(dir)).await {
                            Ok(Ok(status)) => status,
                            Ok(Err(e)) => {
                                error!("Error processing episode {}: {}", name, e);
                                EpisodeStatus::Failed
                            }
                            Err(e) => {
                                error!("Episode task {} did not complete: {}", name, e);
                                EpisodeStatus::Failed
                            }
                        }
                    };

                    progress_bar.inc(1);
                    status
                }
            })
            .buffer_unordered(self.config.max_parallel_episodes)
            .collect()
            .await;

        for status in statuses {
            summary.record(status);
        }

        progress_bar.finish_with_message("done");

        info!(
            "{} completed in {}: {} processed, {} skipped, {} errors",
            label,
            Self::format_duration(start_time.elapsed()),
            summary.processed,
            summary.skipped,
            summary.failed
        );
        if summary.cancelled > 0 {
            warn!("Cancelled before starting {} episode(s)", summary.cancelled);
        }

        Ok(summary)
    }

    fn progress_bar(len: u64, label: &str) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} episodes ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar.set_message(label.to_string());
        progress_bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
