use serde::Serialize;

use crate::models::{VideoId, Vote};

#[derive(Debug, Serialize)]
pub(super) struct ViewRequest<'a> {
    pub id: &'a VideoId,
}

/// `previous` is always sent, as `null` when there was no earlier vote.
#[derive(Debug, Serialize)]
pub(super) struct VoteRequest<'a> {
    pub id: &'a VideoId,
    pub vote: Vote,
    pub previous: Option<Vote>,
}
