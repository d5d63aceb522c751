//! Pipeline stage handlers.
//!
//! One module per stage. Each handler takes the shared [`StageContext`]
//! plus its job payload, does its work atomically from the queue's point
//! of view, and returns the artifact handed to the next stage.
//!
//! [`StageContext`]: crate::context::StageContext

pub mod download;
pub mod highlight;
pub mod merge;
pub mod publish;
pub mod trim;

pub use download::run_download;
pub use highlight::run_highlight;
pub use merge::run_merge;
pub use publish::{run_publish, PublishResult};
pub use trim::run_trim;

#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use clipcast_media::{
        CommandOutput, CommandRunner, MediaResult, StagingConfig, WatermarkConfig,
    };
    use clipcast_youtube::{YoutubeClient, YoutubeConfig};

    use crate::context::StageContext;

    /// Records invocations and fabricates the output file named by the
    /// last argument, standing in for ffmpeg/yt-dlp.
    #[derive(Default)]
    pub(crate) struct StubRunner {
        pub(crate) calls: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl CommandRunner for StubRunner {
        async fn run(&self, _program: &str, args: &[String]) -> MediaResult<CommandOutput> {
            self.calls.lock().unwrap().push(args.to_vec());
            std::fs::write(args.last().unwrap(), b"artifact").unwrap();
            Ok(CommandOutput {
                exit_code: Some(0),
                ..Default::default()
            })
        }
    }

    pub(crate) fn staging_under(base: &Path) -> StagingConfig {
        StagingConfig {
            download_root: base.join("downloads"),
            trim_root: base.join("trimmed"),
            merge_root: base.join("merged"),
            highlight_root: base.join("highlights"),
        }
    }

    pub(crate) fn context_with(runner: Arc<StubRunner>, base: &Path) -> StageContext {
        StageContext {
            runner,
            staging: staging_under(base),
            watermark: WatermarkConfig::default(),
            persist: None,
            storage: None,
            youtube: YoutubeClient::new(YoutubeConfig::default()).unwrap(),
            shorts_max_duration: 60,
        }
    }
}
