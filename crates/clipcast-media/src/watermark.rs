//! Watermark overlay for staged highlights.
//!
//! A configured image is composited at one of four corner anchors; without
//! an image a semi-transparent text overlay is drawn at the same anchor.
//! The overlay produces a new `…_watermarked` file and removes the
//! pre-watermark copy.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{info, warn};

use crate::command::CommandRunner;
use crate::error::{MediaError, MediaResult};

/// Default overlay text when no image is configured.
pub const DEFAULT_WATERMARK_TEXT: &str = "ClipCast";

/// Default distance from the anchored corner, in pixels.
pub const DEFAULT_WATERMARK_MARGIN: u32 = 12;

/// Corner the watermark is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WatermarkAnchor {
    TopLeft,
    #[default]
    TopRight,
    BottomLeft,
    BottomRight,
}

impl FromStr for WatermarkAnchor {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top-left" => Ok(WatermarkAnchor::TopLeft),
            "top-right" => Ok(WatermarkAnchor::TopRight),
            "bottom-left" => Ok(WatermarkAnchor::BottomLeft),
            "bottom-right" => Ok(WatermarkAnchor::BottomRight),
            _ => Err(()),
        }
    }
}

/// Configuration for the watermark overlay.
#[derive(Debug, Clone)]
pub struct WatermarkConfig {
    /// Overlay image; text overlay is used when unset
    pub image_path: Option<PathBuf>,
    /// Text drawn when no image is configured
    pub text: String,
    /// Corner anchor
    pub anchor: WatermarkAnchor,
    /// Distance from the anchored corner, pixels
    pub margin: u32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            image_path: None,
            text: DEFAULT_WATERMARK_TEXT.to_string(),
            anchor: WatermarkAnchor::default(),
            margin: DEFAULT_WATERMARK_MARGIN,
        }
    }
}

impl WatermarkConfig {
    /// Create config from environment variables.
    ///
    /// Recognized: `WATERMARK_PATH`, `WATERMARK_TEXT`, `WATERMARK_POSITION`
    /// (one of the four corner names, default `top-right`) and
    /// `WATERMARK_MARGIN` (pixels, default 12).
    pub fn from_env() -> Self {
        Self {
            image_path: std::env::var("WATERMARK_PATH").ok().map(PathBuf::from),
            text: std::env::var("WATERMARK_TEXT")
                .unwrap_or_else(|_| DEFAULT_WATERMARK_TEXT.to_string()),
            anchor: std::env::var("WATERMARK_POSITION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            margin: std::env::var("WATERMARK_MARGIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_WATERMARK_MARGIN),
        }
    }

    /// Overlay position expressions for the anchored corner.
    fn overlay_position(&self) -> (String, String) {
        let margin = self.margin;
        match self.anchor {
            WatermarkAnchor::TopLeft => (format!("{margin}"), format!("{margin}")),
            WatermarkAnchor::TopRight => (format!("W-w-{margin}"), format!("{margin}")),
            WatermarkAnchor::BottomLeft => (format!("{margin}"), format!("H-h-{margin}")),
            WatermarkAnchor::BottomRight => (format!("W-w-{margin}"), format!("H-h-{margin}")),
        }
    }

    fn drawtext_filter(&self) -> String {
        let (x, y) = self.overlay_position();
        format!(
            "drawtext=text='{}':fontcolor=white@0.85:fontsize=24:box=1:boxcolor=black@0.35:boxborderw=6:x={x}:y={y}",
            self.text
        )
    }
}

/// Destination path for the watermarked copy of `video`.
fn watermarked_path(video: &Path) -> PathBuf {
    let stem = video
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = video
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mp4".to_string());
    video.with_file_name(format!("{stem}_watermarked.{extension}"))
}

/// Apply the configured watermark to `video`.
///
/// Writes a sibling `…_watermarked` file, deletes the input on success, and
/// returns the new path. Audio is stream-copied; only video is re-encoded.
pub async fn apply_watermark(
    runner: &dyn CommandRunner,
    video: &Path,
    config: &WatermarkConfig,
) -> MediaResult<PathBuf> {
    let output = watermarked_path(video);
    let (x, y) = config.overlay_position();

    let args = match &config.image_path {
        Some(image) => vec![
            "-y".to_string(),
            "-i".to_string(),
            video.to_string_lossy().to_string(),
            "-i".to_string(),
            image.to_string_lossy().to_string(),
            "-filter_complex".to_string(),
            format!("overlay={x}:{y}"),
            "-codec:a".to_string(),
            "copy".to_string(),
            output.to_string_lossy().to_string(),
        ],
        None => vec![
            "-y".to_string(),
            "-i".to_string(),
            video.to_string_lossy().to_string(),
            "-vf".to_string(),
            config.drawtext_filter(),
            "-codec:a".to_string(),
            "copy".to_string(),
            output.to_string_lossy().to_string(),
        ],
    };

    info!(
        video = %video.display(),
        image = ?config.image_path,
        "Applying watermark overlay"
    );

    let run = runner.run("ffmpeg", &args).await?;
    if !run.success() {
        return Err(MediaError::ffmpeg_failed(
            "watermark overlay failed",
            Some(run.stderr),
            run.exit_code,
        ));
    }

    if !output.exists() {
        return Err(MediaError::OutputMissing(output));
    }

    // The pre-watermark copy is an intermediate; drop it.
    if let Err(e) = tokio::fs::remove_file(video).await {
        warn!(
            video = %video.display(),
            "Failed to remove pre-watermark copy: {e}"
        );
    }

    Ok(output)
}
