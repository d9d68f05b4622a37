use tracing::debug;

use super::client::WorkerApi;
use super::errors::WorkerApiError;
use super::types::ViewRequest;
use crate::models::{VideoId, ViewCount};

impl WorkerApi {
    /// Count one view of `id`.
    pub async fn record_view(&self, id: &VideoId) -> Result<ViewCount, WorkerApiError> {
        let url = self.build_url("/view");
        debug!("[record_view] POST {} (id: {})", url, id);

        self.execute(
            self.client.post(&url).json(&ViewRequest { id }),
            "record_view",
        )
        .await
    }
}
