//! External command invocation.
//!
//! Every stage drives its external tools through [`CommandRunner`], a single
//! `run(program, args)` seam that tests replace with a scripted fake. A
//! non-zero exit is data, not an error: the calling component decides
//! whether to fall back (trim) or fail (merge, watermark).

use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Captured result of one external command invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Process exit code, `None` if terminated by signal
    pub exit_code: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the process exited with status zero.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Seam for invoking external processes.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion, capturing exit code and both streams.
    async fn run(&self, program: &str, args: &[String]) -> MediaResult<CommandOutput>;
}

/// Runner backed by real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> MediaResult<CommandOutput> {
        debug!("Running: {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check if yt-dlp is available.
pub fn check_ytdlp() -> MediaResult<PathBuf> {
    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_system_runner_captures_exit_code() {
        let runner = SystemRunner;
        let output = runner
            .run("sh", &["-c".to_string(), "exit 3".to_string()])
            .await
            .unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert!(!output.success());
    }

    #[tokio::test]
    async fn test_system_runner_captures_stdout() {
        let runner = SystemRunner;
        let output = runner
            .run("sh", &["-c".to_string(), "echo hello".to_string()])
            .await
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
    }
}
