//! Real inter-request throttle

use std::time::Duration;

use async_trait::async_trait;

use crate::traits::Throttle;

/// Sleeps for the configured delay; a zero delay is a no-op
pub struct RealThrottle;

#[async_trait]
impl Throttle for RealThrottle {
    async fn pause(&self, delay: Duration) {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
