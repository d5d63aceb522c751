//! Staging-directory discipline for pipeline artifacts.
//!
//! Every stage writes under its own root, namespaced by source-video
//! identifier. Namespacing is the sole concurrency-safety mechanism: no
//! locks are taken, so the identifier must be unique per pipeline run.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use clipcast_models::SourceId;

use crate::error::MediaResult;

/// Staging roots for the four filesystem stages.
#[derive(Debug, Clone)]
pub struct StagingConfig {
    /// Root for downloaded source containers
    pub download_root: PathBuf,
    /// Root for trimmed part files
    pub trim_root: PathBuf,
    /// Root for merged highlights awaiting staging
    pub merge_root: PathBuf,
    /// Root for watermarked highlight output
    pub highlight_root: PathBuf,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            download_root: PathBuf::from("/tmp/clipcast/downloads"),
            trim_root: PathBuf::from("/tmp/clipcast/trimmed"),
            merge_root: PathBuf::from("/tmp/clipcast/merged"),
            highlight_root: PathBuf::from("/tmp/clipcast/highlights"),
        }
    }
}

impl StagingConfig {
    /// Create config from environment variables.
    ///
    /// Recognized: `DOWNLOAD_ROOT`, `TRIM_ROOT`, `MERGE_ROOT`,
    /// `HIGHLIGHT_ROOT`, each defaulting under `/tmp/clipcast/`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            download_root: env_path("DOWNLOAD_ROOT", defaults.download_root),
            trim_root: env_path("TRIM_ROOT", defaults.trim_root),
            merge_root: env_path("MERGE_ROOT", defaults.merge_root),
            highlight_root: env_path("HIGHLIGHT_ROOT", defaults.highlight_root),
        }
    }

    /// Directory holding a source's downloaded container.
    pub fn download_dir(&self, source: &SourceId) -> PathBuf {
        self.download_root.join(source.as_str())
    }

    /// Deterministic path of the downloaded container file.
    pub fn source_file(&self, source: &SourceId) -> PathBuf {
        self.download_dir(source)
            .join(format!("{}.mp4", source.as_str()))
    }

    /// yt-dlp output template matching [`source_file`](Self::source_file).
    pub fn source_template(&self, source: &SourceId) -> String {
        self.download_dir(source)
            .join(format!("{}.%(ext)s", source.as_str()))
            .to_string_lossy()
            .to_string()
    }

    /// Directory holding a source's trimmed parts.
    pub fn trim_dir(&self, source: &SourceId) -> PathBuf {
        self.trim_root.join(source.as_str())
    }

    /// Directory holding a source's merged highlight.
    pub fn merge_dir(&self, source: &SourceId) -> PathBuf {
        self.merge_root.join(source.as_str())
    }

    /// Directory holding a source's staged highlight output.
    pub fn highlight_dir(&self, source: &SourceId) -> PathBuf {
        self.highlight_root.join(source.as_str())
    }

    /// Create a directory (and parents) if missing, returning it.
    pub async fn ensure_dir(dir: &Path) -> MediaResult<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        Ok(dir.to_path_buf())
    }

    /// Delete the download/trim/merge directories for a source.
    ///
    /// Runs once the terminal highlight file exists; earlier artifacts are
    /// removed together whether or not a later upload succeeds. Best
    /// effort: failures are logged, never propagated.
    pub async fn cleanup_intermediates(&self, source: &SourceId) {
        for root in [&self.download_root, &self.trim_root, &self.merge_root] {
            let dir = root.join(source.as_str());
            if !dir.exists() {
                continue;
            }
            match tokio::fs::remove_dir_all(&dir).await {
                Ok(()) => debug!(dir = %dir.display(), "Removed staging directory"),
                Err(e) => warn!(dir = %dir.display(), "Failed to remove staging directory: {e}"),
            }
        }
    }
}

fn env_path(key: &str, default: PathBuf) -> PathBuf {
    std::env::var(key).map(PathBuf::from).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_under(dir: &Path) -> StagingConfig {
        StagingConfig {
            download_root: dir.join("downloads"),
            trim_root: dir.join("trimmed"),
            merge_root: dir.join("merged"),
            highlight_root: dir.join("highlights"),
        }
    }

    #[test]
    fn test_source_file_is_deterministic() {
        let config = StagingConfig::default();
        let source = SourceId::from("abc123def45");
        assert_eq!(
            config.source_file(&source),
            PathBuf::from("/tmp/clipcast/downloads/abc123def45/abc123def45.mp4")
        );
    }

    #[tokio::test]
    async fn test_cleanup_removes_intermediates_only() {
        let dir = TempDir::new().unwrap();
        let config = config_under(dir.path());
        let source = SourceId::from("abc123");

        for staged in [
            config.download_dir(&source),
            config.trim_dir(&source),
            config.merge_dir(&source),
            config.highlight_dir(&source),
        ] {
            tokio::fs::create_dir_all(&staged).await.unwrap();
            tokio::fs::write(staged.join("artifact.mp4"), b"x")
                .await
                .unwrap();
        }

        config.cleanup_intermediates(&source).await;

        assert!(!config.download_dir(&source).exists());
        assert!(!config.trim_dir(&source).exists());
        assert!(!config.merge_dir(&source).exists());
        assert!(config.highlight_dir(&source).exists());
    }

    #[tokio::test]
    async fn test_cleanup_ignores_missing_directories() {
        let dir = TempDir::new().unwrap();
        let config = config_under(dir.path());

        // Nothing staged for this source; must not error
        config.cleanup_intermediates(&SourceId::from("ghost")).await;
    }

    #[tokio::test]
    async fn test_cleanup_is_scoped_to_the_source() {
        let dir = TempDir::new().unwrap();
        let config = config_under(dir.path());
        let ours = SourceId::from("ours");
        let theirs = SourceId::from("theirs");

        for source in [&ours, &theirs] {
            let staged = config.trim_dir(source);
            tokio::fs::create_dir_all(&staged).await.unwrap();
        }

        config.cleanup_intermediates(&ours).await;

        assert!(!config.trim_dir(&ours).exists());
        assert!(config.trim_dir(&theirs).exists());
    }
}
