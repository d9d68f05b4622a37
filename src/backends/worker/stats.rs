use tracing::debug;

use super::client::WorkerApi;
use super::errors::WorkerApiError;
use crate::models::{RemoteStats, VideoId};

impl WorkerApi {
    /// Fetch global view/like/dislike counts for a video.
    pub async fn get_video_stats(&self, id: &VideoId) -> Result<RemoteStats, WorkerApiError> {
        let url = self.build_url(&Self::video_path(id));
        debug!("[get_video_stats] GET {}", url);

        let stats: RemoteStats = self
            .execute(self.client.get(&url), "get_video_stats")
            .await?;

        debug!(
            "Stats for {}: {} views, {} likes, {} dislikes",
            id, stats.views, stats.likes, stats.dislikes
        );
        Ok(stats)
    }
}
