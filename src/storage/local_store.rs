use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::models::{VideoId, Vote};

/// Last-watched bookkeeping, merge-written by the player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_id: Option<VideoId>,

    /// Last persisted playback position in whole seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<u64>,
}

/// Partial update for [`PersistedState`]; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatePatch {
    pub last_id: Option<VideoId>,
    pub t: Option<u64>,
}

impl StatePatch {
    pub fn last_id(id: VideoId) -> Self {
        Self {
            last_id: Some(id),
            t: None,
        }
    }

    pub fn position(t: u64) -> Self {
        Self {
            last_id: None,
            t: Some(t),
        }
    }
}

/// Everything the store keeps on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredData {
    #[serde(default)]
    pub state: PersistedState,

    /// Local-only view counters, used when the worker can't be reached.
    #[serde(default)]
    pub views: BTreeMap<VideoId, u64>,

    /// The vote this client last cast per video. Not a count.
    #[serde(default)]
    pub votes: BTreeMap<VideoId, Vote>,
}

/// Local key-value persistence for the player.
///
/// Backed by a single JSON document, or purely in memory when no path is
/// given. Mutations that leave the document unchanged skip the write.
#[derive(Debug)]
pub struct LocalStore {
    path: Option<PathBuf>,
    data: StoredData,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: StoredData::default(),
        }
    }

    /// Open the document at `path`. A missing file starts empty; an
    /// unreadable or corrupt one is logged and replaced on the next write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create state directory {:?}", parent))?;
        }

        let data = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(data) => {
                    debug!("Loaded local state from {:?}", path);
                    data
                }
                Err(e) => {
                    warn!("Discarding corrupt local state {:?}: {}", path, e);
                    StoredData::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No local state at {:?}, starting fresh", path);
                StoredData::default()
            }
            Err(e) => {
                warn!("Failed to read local state {:?}: {}", path, e);
                StoredData::default()
            }
        };

        Ok(Self {
            path: Some(path),
            data,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn state(&self) -> &PersistedState {
        &self.data.state
    }

    /// Merge `patch` into the persisted state. Returns whether anything
    /// changed.
    pub fn save_state(&mut self, patch: StatePatch) -> Result<bool> {
        let mut next = self.data.state.clone();
        if let Some(last_id) = patch.last_id {
            next.last_id = Some(last_id);
        }
        if let Some(t) = patch.t {
            next.t = Some(t);
        }

        if next == self.data.state {
            return Ok(false);
        }

        self.data.state = next;
        self.flush()?;
        Ok(true)
    }

    pub fn views(&self, id: &VideoId) -> u64 {
        self.data.views.get(id).copied().unwrap_or(0)
    }

    /// Bump the local counter for `id` and return the new value. The
    /// in-memory count is updated even if the write fails.
    pub fn increment_view(&mut self, id: &VideoId) -> Result<u64> {
        let count = self.data.views.entry(id.clone()).or_insert(0);
        *count += 1;
        let count = *count;

        self.flush()?;
        Ok(count)
    }

    pub fn vote(&self, id: &VideoId) -> Option<Vote> {
        self.data.votes.get(id).copied()
    }

    pub fn set_vote(&mut self, id: &VideoId, vote: Vote) -> Result<()> {
        if self.data.votes.get(id) == Some(&vote) {
            return Ok(());
        }
        self.data.votes.insert(id.clone(), vote);
        self.flush()
    }

    pub fn snapshot(&self) -> StoredData {
        self.data.clone()
    }

    fn flush(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let contents =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize local state")?;

        // Write beside the target and rename so a crash never leaves half a file.
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write local state {:?}", tmp_path))?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to replace local state {:?}", path))?;

        debug!("Local state saved to {:?}", path);
        Ok(())
    }
}
