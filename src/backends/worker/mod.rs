// Client for the remote counting worker

mod client;
pub mod errors;
mod stats;
mod types;
mod views;
mod votes;


pub use client::WorkerApi;
pub use errors::WorkerApiError;

use async_trait::async_trait;

use super::traits::StatsService;
use crate::models::{RemoteStats, VideoId, ViewCount, Vote, VoteTally};

#[async_trait]
impl StatsService for WorkerApi {
    async fn video_stats(&self, id: &VideoId) -> Result<RemoteStats, WorkerApiError> {
        self.get_video_stats(id).await
    }

    async fn record_view(&self, id: &VideoId) -> Result<ViewCount, WorkerApiError> {
        WorkerApi::record_view(self, id).await
    }

    async fn cast_vote(
        &self,
        id: &VideoId,
        vote: Vote,
        previous: Option<Vote>,
    ) -> Result<VoteTally, WorkerApiError> {
        WorkerApi::cast_vote(self, id, vote, previous).await
    }
}
