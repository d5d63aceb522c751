//! Transition merging of trimmed parts into one highlight.

use std::path::{Path, PathBuf};

use tracing::info;

use clipcast_models::{MergeSource, TransitionStyle};

use crate::command::CommandRunner;
use crate::compositor::build_transition_graph;
use crate::error::{MediaError, MediaResult};
use crate::trim::{TARGET_AUDIO_CODEC, TARGET_VIDEO_CODEC};

/// Merge trimmed parts into `output`, joining adjacent parts with the
/// configured transition.
///
/// Descriptors are sorted by position before anything else; caller ordering
/// is never trusted. A single part is stream-copied directly. The encode
/// process reports its own failures through the exit code; a missing output
/// file after a successful exit is a separate hard error.
pub async fn merge_segments(
    runner: &dyn CommandRunner,
    sources: &[MergeSource],
    style: TransitionStyle,
    transition_duration: f64,
    output: &Path,
) -> MediaResult<PathBuf> {
    let args = build_merge_args(sources, style, transition_duration, output)?;

    if let Some(parent) = output.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    info!(
        parts = sources.len(),
        style = %style,
        output = %output.display(),
        "Merging segments"
    );

    let run = runner.run("ffmpeg", &args).await?;
    if !run.success() {
        return Err(MediaError::ffmpeg_failed(
            "merge encode failed",
            Some(run.stderr),
            run.exit_code,
        ));
    }

    if !output.exists() {
        return Err(MediaError::OutputMissing(output.to_path_buf()));
    }

    Ok(output.to_path_buf())
}

/// Build the full FFmpeg argument vector for a merge.
///
/// Exposed separately so the command synthesis is testable without running
/// an encoder.
pub fn build_merge_args(
    sources: &[MergeSource],
    style: TransitionStyle,
    transition_duration: f64,
    output: &Path,
) -> MediaResult<Vec<String>> {
    if sources.is_empty() {
        return Err(MediaError::NoSegments);
    }

    let mut ordered: Vec<&MergeSource> = sources.iter().collect();
    ordered.sort_by_key(|source| source.position);

    if ordered.len() == 1 {
        return Ok(vec![
            "-y".to_string(),
            "-i".to_string(),
            ordered[0].path.to_string_lossy().to_string(),
            "-c".to_string(),
            "copy".to_string(),
            output.to_string_lossy().to_string(),
        ]);
    }

    let durations = ordered
        .iter()
        .map(|source| {
            source
                .duration_secs()
                .ok_or(MediaError::MissingDuration(source.position))
        })
        .collect::<MediaResult<Vec<f64>>>()?;

    let graph = build_transition_graph(&durations, style, transition_duration)?;

    let mut args = vec!["-y".to_string()];
    for source in &ordered {
        args.push("-i".to_string());
        args.push(source.path.to_string_lossy().to_string());
    }
    args.extend([
        "-filter_complex".to_string(),
        graph.filter_complex(),
        "-map".to_string(),
        graph.video_out,
        "-map".to_string(),
        graph.audio_out,
        "-c:v".to_string(),
        TARGET_VIDEO_CODEC.to_string(),
        "-c:a".to_string(),
        TARGET_AUDIO_CODEC.to_string(),
        output.to_string_lossy().to_string(),
    ]);

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn source(path: &str, position: u32, duration: f64) -> MergeSource {
        MergeSource {
            path: PathBuf::from(path),
            position,
            duration: Some(duration),
            start: None,
            end: None,
        }
    }

    #[test]
    fn test_single_part_is_stream_copied() {
        let args = build_merge_args(
            &[source("part1.mp4", 0, 2.5)],
            TransitionStyle::Fade,
            1.0,
            Path::new("merged.mp4"),
        )
        .unwrap();

        assert!(args.contains(&"copy".to_string()));
        assert!(!args.contains(&"-filter_complex".to_string()));
    }

    #[test]
    fn test_parts_are_ordered_by_position() {
        let args = build_merge_args(
            &[
                source("c.mp4", 2, 4.0),
                source("a.mp4", 0, 5.0),
                source("b.mp4", 1, 7.0),
            ],
            TransitionStyle::Fade,
            1.0,
            Path::new("merged.mp4"),
        )
        .unwrap();

        let mut inputs = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if arg == "-i" {
                inputs.push(iter.next().unwrap().clone());
            }
        }
        assert_eq!(inputs, ["a.mp4", "b.mp4", "c.mp4"]);
    }

    #[test]
    fn test_filter_graph_carries_resolved_effect() {
        let args = build_merge_args(
            &[source("a.mp4", 0, 5.0), source("b.mp4", 1, 4.0)],
            TransitionStyle::Slide,
            1.0,
            Path::new("merged.mp4"),
        )
        .unwrap();

        let filter_idx = args.iter().position(|a| a == "-filter_complex").unwrap();
        let filter = &args[filter_idx + 1];
        assert!(filter.contains("xfade"));
        assert!(filter.contains("slideleft"));
        assert!(filter.contains("acrossfade"));
    }

    #[test]
    fn test_duration_derived_from_start_end() {
        let with_range = MergeSource {
            path: PathBuf::from("a.mp4"),
            position: 0,
            duration: None,
            start: Some(0.0),
            end: Some(5.0),
        };
        let args = build_merge_args(
            &[with_range, source("b.mp4", 1, 4.0)],
            TransitionStyle::Fade,
            1.0,
            Path::new("merged.mp4"),
        )
        .unwrap();

        let filter_idx = args.iter().position(|a| a == "-filter_complex").unwrap();
        // first offset = 5.0 - 1.0
        assert!(args[filter_idx + 1].contains("offset=4.000"));
    }

    #[test]
    fn test_missing_duration_is_error() {
        let bare = MergeSource {
            path: PathBuf::from("a.mp4"),
            position: 3,
            duration: None,
            start: Some(1.0),
            end: None,
        };
        let err = build_merge_args(
            &[bare, source("b.mp4", 4, 4.0)],
            TransitionStyle::Fade,
            1.0,
            Path::new("merged.mp4"),
        )
        .unwrap_err();

        assert!(matches!(err, MediaError::MissingDuration(3)));
    }

    #[test]
    fn test_empty_sources_rejected() {
        let err = build_merge_args(&[], TransitionStyle::Fade, 1.0, Path::new("merged.mp4"))
            .unwrap_err();
        assert!(matches!(err, MediaError::NoSegments));
    }

    struct CreatingRunner {
        calls: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl CommandRunner for CreatingRunner {
        async fn run(&self, _program: &str, args: &[String]) -> MediaResult<CommandOutput> {
            self.calls.lock().unwrap().push(args.to_vec());
            std::fs::write(args.last().unwrap(), b"merged").unwrap();
            Ok(CommandOutput {
                exit_code: Some(0),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_merge_runs_one_encode_and_verifies_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("job-1.mp4");
        let runner = CreatingRunner {
            calls: Mutex::new(Vec::new()),
        };

        let merged = merge_segments(
            &runner,
            &[source("a.mp4", 0, 5.0), source("b.mp4", 1, 4.0)],
            TransitionStyle::Fade,
            1.0,
            &output,
        )
        .await
        .unwrap();

        assert_eq!(merged, output);
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }

    struct SilentlyFailingRunner;

    #[async_trait]
    impl CommandRunner for SilentlyFailingRunner {
        async fn run(&self, _program: &str, _args: &[String]) -> MediaResult<CommandOutput> {
            // Succeeds but never writes the output file
            Ok(CommandOutput {
                exit_code: Some(0),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_missing_merged_output_is_terminal() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("merged.mp4");

        let err = merge_segments(
            &SilentlyFailingRunner,
            &[source("a.mp4", 0, 5.0), source("b.mp4", 1, 4.0)],
            TransitionStyle::Fade,
            1.0,
            &output,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, MediaError::OutputMissing(_)));
    }
}
