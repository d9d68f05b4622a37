#![cfg(test)]

use std::sync::Arc;

use crate::backends::StatsService;
use crate::config::UiConfig;
use crate::core::PlayerViewModel;
use crate::models::{VideoDescriptor, VideoId};
use crate::player::{ControllerOptions, HeadlessMedia, PlayerComponents, PlayerController, PlayerHandle};
use crate::storage::LocalStore;
use crate::utils::ShareLink;

/// Common test utilities
pub mod common {
    use std::future::Future;
    use std::time::Duration;
    use tokio::time::sleep;

    /// Wait for an async condition to become true
    pub async fn wait_for_async<F, Fut>(mut condition: F, max_wait: Duration) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = bool>,
    {
        let start = std::time::Instant::now();

        while start.elapsed() < max_wait {
            if condition().await {
                return true;
            }
            sleep(Duration::from_millis(10)).await;
        }

        false
    }

    /// Wait for a synchronous condition to become true
    pub async fn wait_for<F>(mut condition: F, max_wait: Duration) -> bool
    where
        F: FnMut() -> bool,
    {
        wait_for_async(|| std::future::ready(condition()), max_wait).await
    }
}

/// Mock counting service for testing
pub mod mock_stats {
    use crate::backends::{StatsService, WorkerApiError};
    use crate::models::{RemoteStats, VideoId, ViewCount, Vote, VoteTally};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory counting service that behaves like the worker.
    #[derive(Debug, Default)]
    pub struct MockStatsService {
        pub should_fail: AtomicBool,
        pub fail_record_view: AtomicBool,
        pub stats: Mutex<HashMap<VideoId, RemoteStats>>,
        pub stats_delays: Mutex<HashMap<VideoId, Duration>>,
        pub view_delays: Mutex<HashMap<VideoId, Duration>>,
        pub vote_delays: Mutex<HashMap<VideoId, Duration>>,
        pub stats_calls: AtomicUsize,
        pub view_calls: Mutex<Vec<VideoId>>,
        pub vote_calls: Mutex<Vec<(VideoId, Vote, Option<Vote>)>>,
    }

    impl MockStatsService {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_stats(self, id: &str, views: u64, likes: u64, dislikes: u64) -> Self {
            self.stats.lock().unwrap().insert(
                VideoId::from(id),
                RemoteStats {
                    views,
                    likes,
                    dislikes,
                },
            );
            self
        }

        /// Hold the stats response for `id` back by `delay`.
        pub fn with_stats_delay(self, id: &str, delay: Duration) -> Self {
            self.stats_delays
                .lock()
                .unwrap()
                .insert(VideoId::from(id), delay);
            self
        }

        /// Hold the record-view response for `id` back by `delay`.
        pub fn with_view_delay(self, id: &str, delay: Duration) -> Self {
            self.view_delays
                .lock()
                .unwrap()
                .insert(VideoId::from(id), delay);
            self
        }

        /// Hold the vote response for `id` back by `delay`.
        pub fn with_vote_delay(self, id: &str, delay: Duration) -> Self {
            self.vote_delays
                .lock()
                .unwrap()
                .insert(VideoId::from(id), delay);
            self
        }

        pub fn set_should_fail(&self, should_fail: bool) {
            self.should_fail.store(should_fail, Ordering::SeqCst);
        }

        pub fn view_call_count(&self) -> usize {
            self.view_calls.lock().unwrap().len()
        }

        pub fn vote_call_count(&self) -> usize {
            self.vote_calls.lock().unwrap().len()
        }

        async fn hold(delays: &Mutex<HashMap<VideoId, Duration>>, id: &VideoId) {
            let delay = delays.lock().unwrap().get(id).copied();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
        }

        fn check_failure(&self) -> Result<(), WorkerApiError> {
            if self.should_fail.load(Ordering::SeqCst) {
                return Err(WorkerApiError::Network("Mock connection refused".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl StatsService for MockStatsService {
        async fn video_stats(&self, id: &VideoId) -> Result<RemoteStats, WorkerApiError> {
            self.stats_calls.fetch_add(1, Ordering::SeqCst);
            Self::hold(&self.stats_delays, id).await;
            self.check_failure()?;

            self.stats
                .lock()
                .unwrap()
                .get(id)
                .copied()
                .ok_or_else(|| WorkerApiError::from_status(404, format!("unknown video {}", id)))
        }

        async fn record_view(&self, id: &VideoId) -> Result<ViewCount, WorkerApiError> {
            self.view_calls.lock().unwrap().push(id.clone());
            Self::hold(&self.view_delays, id).await;
            self.check_failure()?;
            if self.fail_record_view.load(Ordering::SeqCst) {
                return Err(WorkerApiError::from_status(500, "boom".into()));
            }

            let mut stats = self.stats.lock().unwrap();
            let entry = stats.entry(id.clone()).or_insert(RemoteStats {
                views: 0,
                likes: 0,
                dislikes: 0,
            });
            entry.views += 1;
            Ok(ViewCount { views: entry.views })
        }

        async fn cast_vote(
            &self,
            id: &VideoId,
            vote: Vote,
            previous: Option<Vote>,
        ) -> Result<VoteTally, WorkerApiError> {
            self.vote_calls
                .lock()
                .unwrap()
                .push((id.clone(), vote, previous));
            Self::hold(&self.vote_delays, id).await;
            self.check_failure()?;

            let mut stats = self.stats.lock().unwrap();
            let entry = stats.entry(id.clone()).or_insert(RemoteStats {
                views: 0,
                likes: 0,
                dislikes: 0,
            });
            match previous {
                Some(Vote::Up) => entry.likes = entry.likes.saturating_sub(1),
                Some(Vote::Down) => entry.dislikes = entry.dislikes.saturating_sub(1),
                None => {}
            }
            match vote {
                Vote::Up => entry.likes += 1,
                Vote::Down => entry.dislikes += 1,
            }
            Ok(VoteTally {
                likes: entry.likes,
                dislikes: entry.dislikes,
            })
        }
    }
}

pub fn video(id: &str, title: &str) -> VideoDescriptor {
    VideoDescriptor {
        id: VideoId::from(id),
        title: title.to_string(),
        description: format!("Description of {}", title),
        tags: vec!["clutch".to_string(), "ranked".to_string()],
        year: Some("2023".to_string()),
        map: None,
        src: format!("https://cdn.example.com/{}.mp4", id),
    }
}

/// A running controller plus the pieces tests inspect.
pub struct TestPlayer {
    pub handle: PlayerHandle,
    pub view: PlayerViewModel,
    pub media: Arc<HeadlessMedia>,
}

pub fn spawn_player(
    stats: Option<Arc<dyn StatsService>>,
    store: LocalStore,
    options: ControllerOptions,
    layout: UiConfig,
) -> TestPlayer {
    let view = PlayerViewModel::new(layout);
    let media = Arc::new(HeadlessMedia::new());
    let share_link = ShareLink::new("https://clips.example.com/watch").unwrap();

    let (handle, controller) = PlayerController::new(PlayerComponents {
        view: view.clone(),
        media: media.clone(),
        stats,
        store,
        share_link,
        options,
    });
    tokio::spawn(controller.run());

    TestPlayer {
        handle,
        view,
        media,
    }
}
