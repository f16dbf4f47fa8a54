//! Worker client configuration

use serde::{Deserialize, Serialize};

use crate::error::ConnectionError;

/// Default capacity of the inbound and outbound queues.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Connection parameters for a worker client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Coordinator host name or address
    pub host: String,

    /// Coordinator port
    pub port: u16,

    /// Identity this worker registers under; also the filter for inbound
    /// traffic
    pub identity: String,

    /// Capacity of each message queue
    pub queue_capacity: usize,
}

impl WorkerConfig {
    /// Create a config with the default queue capacity.
    pub fn new(host: impl Into<String>, port: u16, identity: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            identity: identity.into(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }

    /// Set the queue capacity
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConnectionError> {
        if self.host.is_empty() {
            return Err(ConnectionError::InvalidConfig(
                "host cannot be empty".to_string(),
            ));
        }
        if self.identity.is_empty() {
            return Err(ConnectionError::InvalidConfig(
                "identity cannot be empty".to_string(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(ConnectionError::InvalidConfig(
                "queue capacity must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
