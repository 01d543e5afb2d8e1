//! Collector trait definitions for dependency injection

use std::time::Duration;

use async_trait::async_trait;

use crate::error::CollectorResult;
use crate::types::TradeRecord;

/// Parameters that vary per work unit; everything else about the remote
/// query (classification scheme, frequency, flow direction, record cap) is
/// fixed by the client implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeQuery {
    pub year: u16,
    pub cmd_code: String,
    pub reporter_code: String,
    pub partner_code: String,
}

/// Remote trade-data API with response normalization
#[mockall::automock]
#[async_trait]
pub trait TradeApi: Send + Sync {
    /// Execute one query and normalize the response into rows
    ///
    /// An empty vec means the call succeeded with zero rows; any transport,
    /// auth or decoding problem is an error. The caller decides how the two
    /// are classified.
    async fn fetch(&self, query: &TradeQuery) -> CollectorResult<Vec<TradeRecord>>;
}

/// Inter-request pacing seam, mockable so tests can count pauses
#[mockall::automock]
#[async_trait]
pub trait Throttle: Send + Sync {
    async fn pause(&self, delay: Duration);
}
