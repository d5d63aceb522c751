//! Source download via yt-dlp.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::command::CommandRunner;
use crate::error::{MediaError, MediaResult};

/// Download a source video as mp4.
///
/// `template` is the yt-dlp output template; `expected` is the
/// deterministic container path the rest of the pipeline consumes. The
/// download only counts as done once `expected` exists.
pub async fn download_source(
    runner: &dyn CommandRunner,
    url: &str,
    template: &str,
    expected: &Path,
) -> MediaResult<PathBuf> {
    info!(url, expected = %expected.display(), "Downloading source video");

    let args = vec![
        "-f".to_string(),
        "mp4/bestvideo+bestaudio/best".to_string(),
        "--merge-output-format".to_string(),
        "mp4".to_string(),
        "--no-playlist".to_string(),
        "--quiet".to_string(),
        "-o".to_string(),
        template.to_string(),
        url.to_string(),
    ];

    let run = runner.run("yt-dlp", &args).await?;
    if !run.success() {
        let reason = run.stderr.lines().last().unwrap_or("unknown error");
        return Err(MediaError::download_failed(format!(
            "yt-dlp failed: {reason}"
        )));
    }

    if !expected.exists() {
        return Err(MediaError::download_failed(format!(
            "expected downloaded video at {}",
            expected.display()
        )));
    }

    Ok(expected.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandOutput;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct DepositingRunner {
        deposit: Option<PathBuf>,
        exit_code: i32,
    }

    #[async_trait]
    impl CommandRunner for DepositingRunner {
        async fn run(&self, program: &str, _args: &[String]) -> MediaResult<CommandOutput> {
            assert_eq!(program, "yt-dlp");
            if let Some(path) = &self.deposit {
                std::fs::write(path, b"container").unwrap();
            }
            Ok(CommandOutput {
                exit_code: Some(self.exit_code),
                stderr: "ERROR: no formats".to_string(),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_download_deposits_deterministic_path() {
        let dir = TempDir::new().unwrap();
        let expected = dir.path().join("abc123.mp4");
        let runner = DepositingRunner {
            deposit: Some(expected.clone()),
            exit_code: 0,
        };

        let path = download_source(
            &runner,
            "https://youtu.be/abc123",
            &format!("{}/abc123.%(ext)s", dir.path().display()),
            &expected,
        )
        .await
        .unwrap();

        assert_eq!(path, expected);
    }

    #[tokio::test]
    async fn test_missing_deposit_is_hard_error() {
        let dir = TempDir::new().unwrap();
        let expected = dir.path().join("abc123.mp4");
        let runner = DepositingRunner {
            deposit: None,
            exit_code: 0,
        };

        let err = download_source(&runner, "https://youtu.be/abc123", "tpl", &expected)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::DownloadFailed { .. }));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_hard_error() {
        let dir = TempDir::new().unwrap();
        let expected = dir.path().join("abc123.mp4");
        let runner = DepositingRunner {
            deposit: Some(expected.clone()),
            exit_code: 1,
        };

        let err = download_source(&runner, "https://youtu.be/abc123", "tpl", &expected)
            .await
            .unwrap_err();
        assert!(matches!(err, MediaError::DownloadFailed { .. }));
    }
}
