use tokio::sync::Mutex;

use shared_config::AppConfig;

use crate::services::QueueController;

/// Shared application state. The mutex serializes all queue mutations, so
/// two requests can never race a second appointment into the consultation
/// room.
pub struct QueueState {
    pub controller: Mutex<QueueController>,
    pub config: AppConfig,
}

impl QueueState {
    pub fn new(controller: QueueController, config: AppConfig) -> Self {
        Self {
            controller: Mutex::new(controller),
            config,
        }
    }
}
