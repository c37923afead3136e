//! Usage source trait.
//!
//! A source is anything that can be told to refresh and then asked for its
//! last good snapshot. [`UsageFetcher`](crate::UsageFetcher) is the real
//! implementation; the sensor only depends on this trait.

use async_trait::async_trait;
use xfinity_usage_core::UsageSnapshot;

use crate::fetcher::UsageFetcher;

/// Something that produces usage snapshots on demand.
#[async_trait]
pub trait UsageSource: Send {
    /// Tries to fetch fresh data. Returns true if the snapshot was replaced.
    ///
    /// Implementations must not clear an existing snapshot on failure.
    async fn refresh(&mut self) -> bool;

    /// Returns the last successful snapshot, if any.
    fn snapshot(&self) -> Option<&UsageSnapshot>;
}

#[async_trait]
impl UsageSource for UsageFetcher {
    async fn refresh(&mut self) -> bool {
        UsageFetcher::refresh(self).await
    }

    fn snapshot(&self) -> Option<&UsageSnapshot> {
        UsageFetcher::snapshot(self)
    }
}
