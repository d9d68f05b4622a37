use tracing::debug;

use super::client::WorkerApi;
use super::errors::WorkerApiError;
use super::types::VoteRequest;
use crate::models::{VideoId, Vote, VoteTally};

impl WorkerApi {
    /// Cast a like/dislike. The worker uses `previous` to undo this
    /// client's earlier vote before applying the new one.
    pub async fn cast_vote(
        &self,
        id: &VideoId,
        vote: Vote,
        previous: Option<Vote>,
    ) -> Result<VoteTally, WorkerApiError> {
        let url = self.build_url("/vote");
        debug!(
            "[cast_vote] POST {} (id: {}, vote: {}, previous: {:?})",
            url, id, vote, previous
        );

        self.execute(
            self.client.post(&url).json(&VoteRequest { id, vote, previous }),
            "cast_vote",
        )
        .await
    }
}
