#![allow(dead_code)]

use reel_counter::backends::StatsService;
use reel_counter::config::UiConfig;
use reel_counter::core::PlayerViewModel;
use reel_counter::models::{VideoDescriptor, VideoId};
use reel_counter::player::{
    ControllerOptions, HeadlessMedia, PlayerComponents, PlayerController, PlayerHandle,
};
use reel_counter::storage::LocalStore;
use reel_counter::utils::ShareLink;
use std::sync::Arc;
use std::time::Duration;

pub struct VideoBuilder {
    id: String,
    title: String,
    description: String,
    tags: Vec<String>,
    year: Option<String>,
    map: Option<String>,
}

impl VideoBuilder {
    pub fn clip(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: format!("Clip {}", id),
            description: String::new(),
            tags: Vec::new(),
            year: None,
            map: None,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_year(mut self, year: &str) -> Self {
        self.year = Some(year.to_string());
        self
    }

    pub fn with_map(mut self, map: &str) -> Self {
        self.map = Some(map.to_string());
        self
    }

    pub fn build(self) -> VideoDescriptor {
        VideoDescriptor {
            src: format!("https://media.example.com/{}.mp4", self.id),
            id: VideoId::from(self.id),
            title: self.title,
            description: self.description,
            tags: self.tags,
            year: self.year,
            map: self.map,
        }
    }
}

pub struct RunningPlayer {
    pub handle: PlayerHandle,
    pub view: PlayerViewModel,
    pub media: Arc<HeadlessMedia>,
}

pub fn start_player(
    stats: Option<Arc<dyn StatsService>>,
    store: LocalStore,
    options: ControllerOptions,
) -> RunningPlayer {
    let view = PlayerViewModel::new(UiConfig::default());
    let media = Arc::new(HeadlessMedia::new());
    let share_link = ShareLink::new("https://clips.example.com/?ref=feed").unwrap();

    let (handle, controller) = PlayerController::new(PlayerComponents {
        view: view.clone(),
        media: media.clone(),
        stats,
        store,
        share_link,
        options,
    });
    tokio::spawn(controller.run());

    RunningPlayer {
        handle,
        view,
        media,
    }
}

pub async fn wait_until<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    while start.elapsed() < Duration::from_secs(5) {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
