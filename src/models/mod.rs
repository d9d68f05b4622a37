mod identifiers;

pub use identifiers::VideoId;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;

/// Metadata describing one playable video. Supplied by the catalog, never
/// mutated by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDescriptor {
    pub id: VideoId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    pub map: Option<String>,
    pub src: String,
}

/// Accepts a string or a number; blank strings count as absent.
fn optional_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) if !text.trim().is_empty() => Some(text),
        Some(Raw::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Ordered list of videos the player can load.
#[derive(Debug, Clone, Default)]
pub struct VideoCatalog {
    videos: Vec<VideoDescriptor>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<VideoDescriptor>),
    Wrapped { videos: Vec<VideoDescriptor> },
}

impl VideoCatalog {
    pub fn new(videos: Vec<VideoDescriptor>) -> Self {
        Self { videos }
    }

    /// Parse a catalog from either a bare JSON array or `{ "videos": [...] }`.
    pub fn from_json(contents: &str) -> Result<Self> {
        let document: CatalogDocument =
            serde_json::from_str(contents).context("Failed to parse video catalog")?;
        let videos = match document {
            CatalogDocument::List(videos) | CatalogDocument::Wrapped { videos } => videos,
        };
        Ok(Self { videos })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read video catalog {:?}", path))?;
        Self::from_json(&contents)
    }

    pub fn get(&self, id: &VideoId) -> Option<&VideoDescriptor> {
        self.videos.iter().find(|video| &video.id == id)
    }

    pub fn first(&self) -> Option<&VideoDescriptor> {
        self.videos.first()
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

/// A like ("up") or dislike ("down").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vote {
    Up,
    Down,
}

impl Vote {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Up => "up",
            Vote::Down => "down",
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authoritative counts held by the counting worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteStats {
    pub views: u64,
    pub likes: u64,
    pub dislikes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCount {
    pub views: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub likes: u64,
    pub dislikes: u64,
}

/// Per-controller playback bookkeeping, reset on every load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub counted_view: bool,
    pub current_video_id: Option<VideoId>,
}

impl PlaybackState {
    pub fn reset_for(&mut self, id: VideoId) {
        self.counted_view = false;
        self.current_video_id = Some(id);
    }

    pub fn is_current(&self, id: &VideoId) -> bool {
        self.current_video_id.as_ref() == Some(id)
    }
}
