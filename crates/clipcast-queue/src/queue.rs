//! Stage queue on Redis Streams.

use redis::AsyncCommands;
use tracing::{debug, info, warn};

use crate::error::{QueueError, QueueResult};
use crate::job::{Lane, StageJob};

/// Queue configuration.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Redis URL
    pub redis_url: String,
    /// Stream name for the default lane
    pub default_stream: String,
    /// Stream name for the paid/priority lane
    pub priority_stream: String,
    /// Consumer group name
    pub consumer_group: String,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            default_stream: "clipcast:jobs".to_string(),
            priority_stream: "clipcast:priority".to_string(),
            consumer_group: "clipcast:workers".to_string(),
        }
    }
}

impl QueueConfig {
    /// Create config from environment variables.
    ///
    /// Recognized: `REDIS_URL`, `QUEUE_STREAM` (default `clipcast:jobs`),
    /// `PAID_QUEUE_NAME` (default `clipcast:priority`) and
    /// `QUEUE_CONSUMER_GROUP` (default `clipcast:workers`).
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: std::env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            default_stream: std::env::var("QUEUE_STREAM").unwrap_or(defaults.default_stream),
            priority_stream: std::env::var("PAID_QUEUE_NAME").unwrap_or(defaults.priority_stream),
            consumer_group: std::env::var("QUEUE_CONSUMER_GROUP")
                .unwrap_or(defaults.consumer_group),
        }
    }

    fn stream_for(&self, lane: Lane) -> &str {
        match lane {
            Lane::Default => &self.default_stream,
            Lane::Priority => &self.priority_stream,
        }
    }
}

/// Handle identifying a consumed message for acknowledgement.
#[derive(Debug, Clone)]
pub struct MessageHandle {
    /// Stream the message was read from
    pub stream: String,
    /// Stream entry ID
    pub id: String,
}

/// Stage queue client.
pub struct StageQueue {
    client: redis::Client,
    config: QueueConfig,
}

impl StageQueue {
    /// Create a new stage queue.
    pub fn new(config: QueueConfig) -> QueueResult<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> QueueResult<Self> {
        Self::new(QueueConfig::from_env())
    }

    /// Initialize both lanes (create consumer groups if missing).
    pub async fn init(&self) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        for stream in [&self.config.default_stream, &self.config.priority_stream] {
            let result: Result<(), redis::RedisError> = redis::cmd("XGROUP")
                .arg("CREATE")
                .arg(stream)
                .arg(&self.config.consumer_group)
                .arg("$")
                .arg("MKSTREAM")
                .query_async(&mut conn)
                .await;

            match result {
                Ok(_) => info!(stream, "Created consumer group"),
                Err(e) if e.to_string().contains("BUSYGROUP") => {
                    debug!(stream, "Consumer group already exists");
                }
                Err(e) => return Err(QueueError::Redis(e)),
            }
        }

        Ok(())
    }

    /// Enqueue a stage job on the chosen lane.
    pub async fn enqueue(&self, job: &StageJob, lane: Lane) -> QueueResult<String> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let payload = serde_json::to_string(job)?;
        let stream = self.config.stream_for(lane);

        let message_id: String = redis::cmd("XADD")
            .arg(stream)
            .arg("*")
            .arg("job")
            .arg(&payload)
            .query_async(&mut conn)
            .await?;

        info!(
            stage = job.stage_name(),
            source = %job.source_id(),
            stream,
            message_id,
            "Enqueued stage job"
        );

        Ok(message_id)
    }

    /// Consume jobs, draining the priority lane before the default lane.
    pub async fn consume(
        &self,
        consumer_name: &str,
        block_ms: u64,
        count: usize,
    ) -> QueueResult<Vec<(MessageHandle, StageJob)>> {
        // Priority lane is checked without blocking; only an empty priority
        // lane falls through to a blocking read on the default lane.
        let jobs = self
            .read_stream(&self.config.priority_stream, consumer_name, None, count)
            .await?;
        if !jobs.is_empty() {
            return Ok(jobs);
        }

        self.read_stream(
            &self.config.default_stream,
            consumer_name,
            Some(block_ms),
            count,
        )
        .await
    }

    async fn read_stream(
        &self,
        stream: &str,
        consumer_name: &str,
        block_ms: Option<u64>,
        count: usize,
    ) -> QueueResult<Vec<(MessageHandle, StageJob)>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let mut cmd = redis::cmd("XREADGROUP");
        cmd.arg("GROUP")
            .arg(&self.config.consumer_group)
            .arg(consumer_name)
            .arg("COUNT")
            .arg(count);
        if let Some(block) = block_ms {
            cmd.arg("BLOCK").arg(block);
        }
        cmd.arg("STREAMS").arg(stream).arg(">");

        let result: redis::streams::StreamReadReply = cmd.query_async(&mut conn).await?;

        let mut jobs = Vec::new();

        for stream_key in result.keys {
            for entry in stream_key.ids {
                let handle = MessageHandle {
                    stream: stream.to_string(),
                    id: entry.id.clone(),
                };

                if let Some(redis::Value::BulkString(payload)) = entry.map.get("job") {
                    let payload_str = String::from_utf8_lossy(payload);
                    match serde_json::from_str::<StageJob>(&payload_str) {
                        Ok(job) => {
                            debug!(stage = job.stage_name(), id = %handle.id, "Consumed stage job");
                            jobs.push((handle, job));
                        }
                        Err(e) => {
                            warn!("Failed to parse job payload: {}", e);
                            // Ack the malformed message to prevent reprocessing
                            self.ack(&handle).await.ok();
                        }
                    }
                }
            }
        }

        Ok(jobs)
    }

    /// Acknowledge a consumed message.
    pub async fn ack(&self, handle: &MessageHandle) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        redis::cmd("XACK")
            .arg(&handle.stream)
            .arg(&self.config.consumer_group)
            .arg(&handle.id)
            .query_async::<()>(&mut conn)
            .await?;

        redis::cmd("XDEL")
            .arg(&handle.stream)
            .arg(&handle.id)
            .query_async::<()>(&mut conn)
            .await?;

        debug!(id = %handle.id, "Acknowledged stage job");
        Ok(())
    }

    /// Length of a lane's stream.
    pub async fn len(&self, lane: Lane) -> QueueResult<u64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let len: u64 = conn.xlen(self.config.stream_for(lane)).await?;
        Ok(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_stream_selection() {
        let config = QueueConfig::default();
        assert_eq!(config.stream_for(Lane::Default), "clipcast:jobs");
        assert_eq!(config.stream_for(Lane::Priority), "clipcast:priority");
    }
}
