use async_trait::async_trait;

use super::worker::WorkerApiError;
use crate::models::{RemoteStats, VideoId, ViewCount, Vote, VoteTally};

/// Remote counting service: the source of truth for view, like and
/// dislike counts.
#[async_trait]
pub trait StatsService: Send + Sync + std::fmt::Debug {
    /// Fetch the current counts for a video.
    async fn video_stats(&self, id: &VideoId) -> Result<RemoteStats, WorkerApiError>;

    /// Record one view and return the updated view count.
    async fn record_view(&self, id: &VideoId) -> Result<ViewCount, WorkerApiError>;

    /// Cast `vote`, telling the service which vote (if any) it replaces.
    async fn cast_vote(
        &self,
        id: &VideoId,
        vote: Vote,
        previous: Option<Vote>,
    ) -> Result<VoteTally, WorkerApiError>;
}
