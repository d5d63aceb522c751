//! Pipeline worker binary.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use clipcast_queue::StageQueue;
use clipcast_worker::{StageContext, StageExecutor, WorkerConfig};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("clipcast=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting clipcast-worker");

    let config = WorkerConfig::from_env();

    let queue = match StageQueue::from_env() {
        Ok(queue) => queue,
        Err(e) => {
            error!("Failed to create stage queue: {e}");
            std::process::exit(1);
        }
    };

    let context = match StageContext::from_env(&config) {
        Ok(context) => context,
        Err(e) => {
            error!("Failed to wire stage context: {e}");
            std::process::exit(1);
        }
    };

    let executor = StageExecutor::new(config, context, queue);

    // Setup signal handler
    let shutdown_handle = tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        std::process::exit(0);
    });

    if let Err(e) = executor.run().await {
        error!("Executor error: {e}");
        std::process::exit(1);
    }

    shutdown_handle.await.ok();
}
