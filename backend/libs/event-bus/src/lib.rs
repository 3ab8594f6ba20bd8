//! Publish-only event bus
//!
//! Services announce side effects (an integration whose files need
//! ingesting, for instance) by publishing a JSON payload on a named topic.
//! Publication is an explicit, fallible step: callers decide what a failure
//! means for the operation that triggered it.
//!
//! # Example
//!
//! ```no_run
//! use event_bus::{publish_json, RedisPublisher};
//!
//! # async fn demo() -> event_bus::Result<()> {
//! let publisher = RedisPublisher::new("redis://localhost:6379", "integration-service").await?;
//! publish_json(&publisher, "integration_created", &serde_json::json!({"id": "42"})).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

mod error;

pub use error::{PublishError, Result};

/// Destination for events
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a raw payload. Returns the number of subscribers that
    /// received it, where the bus reports one.
    async fn publish(&self, topic: &str, payload: String) -> Result<usize>;
}

/// Serialize `event` as JSON and publish it on `topic`
pub async fn publish_json<T: Serialize + Sync>(
    publisher: &dyn EventPublisher,
    topic: &str,
    event: &T,
) -> Result<usize> {
    let payload = serde_json::to_string(event)?;
    publisher.publish(topic, payload).await
}

/// Redis pub/sub publisher
#[derive(Clone)]
pub struct RedisPublisher {
    connection: ConnectionManager,
    service_name: String,
}

impl RedisPublisher {
    pub async fn new(redis_url: &str, service_name: impl Into<String>) -> Result<Self> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;
        let service_name = service_name.into();

        info!(service = %service_name, "Redis event publisher connected");
        Ok(Self {
            connection,
            service_name,
        })
    }
}

#[async_trait]
impl EventPublisher for RedisPublisher {
    async fn publish(&self, topic: &str, payload: String) -> Result<usize> {
        debug!(
            topic,
            service = %self.service_name,
            bytes = payload.len(),
            "Publishing event"
        );

        let mut conn = self.connection.clone();
        let subscribers: usize = conn.publish(topic, payload).await?;

        info!(topic, subscribers, "Event published");
        Ok(subscribers)
    }
}

/// Published message, as recorded by [`InMemoryPublisher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedEvent {
    pub topic: String,
    pub payload: String,
}

/// Records events in process. Can be switched to fail every publish.
#[derive(Clone, Default)]
pub struct InMemoryPublisher {
    events: Arc<Mutex<Vec<PublishedEvent>>>,
    failing: Arc<std::sync::atomic::AtomicBool>,
}

impl InMemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    pub async fn events(&self) -> Vec<PublishedEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventPublisher for InMemoryPublisher {
    async fn publish(&self, topic: &str, payload: String) -> Result<usize> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(PublishError::Rejected(format!("bus unavailable for {topic}")));
        }

        self.events.lock().await.push(PublishedEvent {
            topic: topic.to_string(),
            payload,
        });
        Ok(1)
    }
}
