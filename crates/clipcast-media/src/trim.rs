//! Segment trimming with stream-copy fallback to re-encode.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::command::CommandRunner;
use crate::error::{MediaError, MediaResult};

/// Fixed codec pair used when stream copy is not possible.
pub const TARGET_VIDEO_CODEC: &str = "libx264";
pub const TARGET_AUDIO_CODEC: &str = "aac";

/// Extract a time range from `input` into `output`.
///
/// Attempts a fast stream-copy first; on a non-zero exit the range is
/// re-encoded once with the fixed target codec pair. A missing output file
/// after either path is a hard error — the component itself never retries
/// beyond the single fallback.
pub async fn trim_segment(
    runner: &dyn CommandRunner,
    input: &Path,
    start_secs: f64,
    end_secs: f64,
    output: &Path,
) -> MediaResult<PathBuf> {
    info!(
        input = %input.display(),
        output = %output.display(),
        start = start_secs,
        end = end_secs,
        "Trimming segment"
    );

    let copy = runner
        .run("ffmpeg", &copy_args(input, start_secs, end_secs, output))
        .await?;

    if !copy.success() {
        debug!(
            exit_code = ?copy.exit_code,
            "Stream-copy trim failed, falling back to re-encode"
        );

        let reencode = runner
            .run("ffmpeg", &reencode_args(input, start_secs, end_secs, output))
            .await?;

        if !reencode.success() {
            return Err(MediaError::ffmpeg_failed(
                "segment re-encode failed",
                Some(reencode.stderr),
                reencode.exit_code,
            ));
        }
    }

    if !output.exists() {
        return Err(MediaError::TrimProducedNoOutput(output.to_path_buf()));
    }

    Ok(output.to_path_buf())
}

fn copy_args(input: &Path, start: f64, end: f64, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-i".to_string(),
        input.to_string_lossy().to_string(),
        "-ss".to_string(),
        format!("{start:.3}"),
        "-to".to_string(),
        format!("{end:.3}"),
        "-c".to_string(),
        "copy".to_string(),
        output.to_string_lossy().to_string(),
    ]
}

fn reencode_args(input: &Path, start: f64, end: f64, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-i".to_string(),
        input.to_string_lossy().to_string(),
        "-ss".to_string(),
        format!("{start:.3}"),
        "-to".to_string(),
        format!("{end:.3}"),
        "-c:v".to_string(),
        TARGET_VIDEO_CODEC.to_string(),
        "-c:a".to_string(),
        TARGET_AUDIO_CODEC.to_string(),
        output.to_string_lossy().to_string(),
    ]
}
