use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{error, warn};

use super::{VetoEvent, VetoEventSink};
use crate::error::AppError;

// Publisher retry configuration (HTTP request path)
const PUBLISHER_MAX_ATTEMPTS: u32 = 3;
const PUBLISHER_INITIAL_RETRY_DELAY_MS: u64 = 50;
const PUBLISHER_MAX_RETRY_DELAY_MS: u64 = 200;

/// Publishes each event as JSON on the `veto:{session_id}` channel.
pub struct RedisSink {
    publisher: Mutex<ConnectionManager>,
}

impl RedisSink {
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url)
            .map_err(|err| AppError::config(format!("Invalid REDIS_URL: {err}")))?;

        let manager = ConnectionManager::new(client).await.map_err(|err| {
            AppError::config(format!("Unable to initialize Redis connection manager: {err}"))
        })?;

        Ok(Self {
            publisher: Mutex::new(manager),
        })
    }

    async fn publish_to_channel(&self, channel: String, encoded: String) -> Result<(), RedisError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;

            let publish_res = {
                let mut publisher = self.publisher.lock().await;
                publisher
                    .publish::<_, _, ()>(channel.clone(), encoded.clone())
                    .await
            };

            match publish_res {
                Ok(()) => return Ok(()),
                Err(err) => {
                    if attempt >= PUBLISHER_MAX_ATTEMPTS || !is_transient_error(&err) {
                        return Err(err);
                    }

                    let delay_ms = retry_delay_ms(attempt);
                    warn!(
                        error = %err,
                        attempt,
                        retry_delay_ms = delay_ms,
                        "Redis publish failed, retrying"
                    );
                    sleep(Duration::from_millis(delay_ms)).await;
                }
            }
        }
    }
}

#[async_trait]
impl VetoEventSink for RedisSink {
    async fn publish(&self, event: VetoEvent) {
        let channel = event.channel();
        let encoded = match serde_json::to_string(&event) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(error = %err, %channel, "Failed to serialize veto event");
                return;
            }
        };

        if let Err(err) = self.publish_to_channel(channel.clone(), encoded).await {
            error!(error = %err, %channel, "Dropping veto event after Redis publish failure");
        }
    }
}

fn retry_delay_ms(attempt: u32) -> u64 {
    PUBLISHER_INITIAL_RETRY_DELAY_MS
        .saturating_mul(2_u64.pow(attempt.saturating_sub(1)))
        .min(PUBLISHER_MAX_RETRY_DELAY_MS)
}

fn is_transient_error(err: &RedisError) -> bool {
    let error_msg = err.to_string().to_lowercase();

    if error_msg.contains("authentication failed")
        || error_msg.contains("unsupported")
        || error_msg.contains("noperm")
    {
        return false;
    }

    error_msg.contains("connection refused")
        || error_msg.contains("connection reset")
        || error_msg.contains("connection aborted")
        || error_msg.contains("timed out")
        || error_msg.contains("timeout")
        || error_msg.contains("broken pipe")
        || error_msg.contains("io error")
        || error_msg.contains("dropped")
}
