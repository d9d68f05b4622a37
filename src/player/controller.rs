use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use super::progress::ProgressPolicy;
use crate::backends::{StatsService, WorkerApiError};
use crate::config::{Config, FallbackMode};
use crate::constants::{ACTIVATE_KEY, LOADING_SUFFIX, SHARE_QUERY_KEY, UNAVAILABLE_SUFFIX};
use crate::core::{MediaElement, PlayerViewModel};
use crate::models::{
    PlaybackState, RemoteStats, VideoDescriptor, VideoId, ViewCount, Vote, VoteTally,
};
use crate::storage::{LocalStore, StatePatch, StoredData};
use crate::utils::ShareLink;

/// Tunables the controller reads from the config.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub progress: ProgressPolicy,
    pub fallback: FallbackMode,
    pub share_query_key: String,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            progress: ProgressPolicy::default(),
            fallback: FallbackMode::default(),
            share_query_key: SHARE_QUERY_KEY.to_string(),
        }
    }
}

impl ControllerOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            progress: ProgressPolicy::from(&config.playback),
            fallback: config.stats.fallback,
            share_query_key: config.share.query_key.clone(),
        }
    }
}

/// Everything the controller drives.
pub struct PlayerComponents {
    pub view: PlayerViewModel,
    pub media: Arc<dyn MediaElement>,
    /// `None` when no worker is configured; only local counts are used.
    pub stats: Option<Arc<dyn StatsService>>,
    pub store: LocalStore,
    pub share_link: ShareLink,
    pub options: ControllerOptions,
}

/// Commands processed by the player controller, one at a time
#[derive(Debug)]
pub enum PlayerCommand {
    /// Show a new video and start loading it
    LoadVideo { video: VideoDescriptor },
    /// Write a message into the status target
    SetStatus { message: String },
    /// Playback time notification from the media element
    TimeUpdate { current_time: f64 },
    /// Like/dislike control activated
    Vote { vote: Vote },
    /// Get the playback bookkeeping
    GetPlaybackState {
        respond_to: oneshot::Sender<PlaybackState>,
    },
    /// Get a copy of the locally persisted data
    GetStoredData {
        respond_to: oneshot::Sender<StoredData>,
    },
    /// Completion of a stats request
    StatsLoaded {
        video_id: VideoId,
        result: Result<RemoteStats, WorkerApiError>,
    },
    /// Completion of a record-view request
    ViewRecorded {
        video_id: VideoId,
        result: Result<ViewCount, WorkerApiError>,
    },
    /// Completion of a vote request
    VoteCast {
        video_id: VideoId,
        vote: Vote,
        result: Result<VoteTally, WorkerApiError>,
    },
}

/// Controller that owns the playback state and processes commands.
///
/// All state lives on the single task running [`PlayerController::run`].
/// Network calls are spawned and report back through the same command
/// channel, so handlers never overlap.
pub struct PlayerController {
    receiver: mpsc::UnboundedReceiver<PlayerCommand>,
    // Weak so that the loop ends once every handle is dropped.
    completions: mpsc::WeakUnboundedSender<PlayerCommand>,
    view: PlayerViewModel,
    media: Arc<dyn MediaElement>,
    stats: Option<Arc<dyn StatsService>>,
    store: LocalStore,
    share_link: ShareLink,
    options: ControllerOptions,
    state: PlaybackState,
    current_title: String,
    /// Video whose vote controls are live. Set once its stats arrive.
    voting_for: Option<VideoId>,
}

impl PlayerController {
    pub fn new(components: PlayerComponents) -> (PlayerHandle, PlayerController) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let controller = PlayerController {
            receiver,
            completions: sender.downgrade(),
            view: components.view,
            media: components.media.clone(),
            stats: components.stats,
            store: components.store,
            share_link: components.share_link,
            options: components.options,
            state: PlaybackState::default(),
            current_title: String::new(),
            voting_for: None,
        };
        let handle = PlayerHandle {
            sender,
            media: components.media,
            progress_bound: Arc::new(AtomicBool::new(false)),
        };

        (handle, controller)
    }

    /// Run the controller event loop
    pub async fn run(mut self) {
        debug!("PlayerController event loop started");

        while let Some(command) = self.receiver.recv().await {
            match command {
                PlayerCommand::LoadVideo { video } => self.load_video(video),
                PlayerCommand::SetStatus { message } => {
                    if !self.view.set_status(&message) {
                        trace!("No status target, dropping message");
                    }
                }
                PlayerCommand::TimeUpdate { current_time } => self.on_time_update(current_time),
                PlayerCommand::Vote { vote } => self.on_vote(vote),
                PlayerCommand::GetPlaybackState { respond_to } => {
                    let _ = respond_to.send(self.state.clone());
                }
                PlayerCommand::GetStoredData { respond_to } => {
                    let _ = respond_to.send(self.store.snapshot());
                }
                PlayerCommand::StatsLoaded { video_id, result } => {
                    self.on_stats_loaded(video_id, result)
                }
                PlayerCommand::ViewRecorded { video_id, result } => {
                    self.on_view_recorded(video_id, result)
                }
                PlayerCommand::VoteCast {
                    video_id,
                    vote,
                    result,
                } => self.on_vote_cast(video_id, vote, result),
            }
        }

        debug!("PlayerController event loop terminated");
    }

    fn load_video(&mut self, video: VideoDescriptor) {
        info!("Loading video {} ({})", video.id, video.title);

        // Reset before any request for the new id goes out.
        self.state.reset_for(video.id.clone());
        self.voting_for = None;
        self.current_title = video.title.clone();
        self.view.set_active_vote(None);
        self.view.set_title(&self.current_title, LOADING_SUFFIX);

        match self.stats.clone() {
            Some(stats) => {
                let video_id = video.id.clone();
                self.dispatch(async move {
                    let result = stats.video_stats(&video_id).await;
                    PlayerCommand::StatsLoaded { video_id, result }
                });
            }
            None => {
                let views = self.store.views(&video.id);
                self.show_view_count(views);
            }
        }

        self.view.set_description(&video.description);
        self.view.set_tags(&video.tags);
        self.view.set_year(video.year.as_deref());
        self.view.set_map(video.map.as_deref());

        let share_url = self
            .share_link
            .set(&self.options.share_query_key, video.id.as_str());
        self.view.set_share_url(share_url);

        self.media.set_source(&video.src);
        self.media.load();

        self.persist(StatePatch::last_id(video.id));
    }

    fn on_stats_loaded(&mut self, video_id: VideoId, result: Result<RemoteStats, WorkerApiError>) {
        if !self.state.is_current(&video_id) {
            debug!("Ignoring stats for superseded video {}", video_id);
            return;
        }

        match result {
            Ok(stats) => {
                self.show_view_count(stats.views);
                self.view.set_vote_counts(stats.likes, stats.dislikes);
                self.bind_voting(video_id);
            }
            Err(e) => {
                warn!(
                    "Failed to load stats for {} (transient: {}): {}",
                    video_id,
                    e.is_transient(),
                    e
                );
                match self.options.fallback {
                    FallbackMode::Unavailable => {
                        self.view.set_title(&self.current_title, UNAVAILABLE_SUFFIX)
                    }
                    FallbackMode::LocalCount => self.show_view_count(self.store.views(&video_id)),
                }
            }
        }
    }

    fn on_time_update(&mut self, current_time: f64) {
        let step = self.options.progress.evaluate(&self.state, current_time);

        if step.count_view {
            self.count_view();
        }
        if let Some(position) = step.persist_position {
            self.persist(StatePatch::position(position));
        }
    }

    fn count_view(&mut self) {
        let Some(video_id) = self.state.current_video_id.clone() else {
            return;
        };
        self.state.counted_view = true;

        let local_views = match self.store.increment_view(&video_id) {
            Ok(count) => count,
            Err(e) => {
                warn!("Failed to persist local view count for {}: {:#}", video_id, e);
                self.store.views(&video_id)
            }
        };
        info!("Counted view of {} (local count {})", video_id, local_views);

        match self.stats.clone() {
            Some(stats) => self.dispatch(async move {
                let result = stats.record_view(&video_id).await;
                PlayerCommand::ViewRecorded { video_id, result }
            }),
            None => self.show_view_count(local_views),
        }
    }

    fn on_view_recorded(&mut self, video_id: VideoId, result: Result<ViewCount, WorkerApiError>) {
        let is_current = self.state.is_current(&video_id);

        match result {
            Ok(count) if is_current => self.show_view_count(count.views),
            Ok(_) => debug!("View of superseded video {} recorded", video_id),
            Err(e) => {
                warn!(
                    "Failed to record view of {} (transient: {}): {}",
                    video_id,
                    e.is_transient(),
                    e
                );
                if is_current && self.options.fallback == FallbackMode::LocalCount {
                    self.show_view_count(self.store.views(&video_id));
                }
            }
        }
    }

    fn bind_voting(&mut self, video_id: VideoId) {
        if !self.view.has_vote_controls() {
            return;
        }
        self.view.set_active_vote(self.store.vote(&video_id));
        self.voting_for = Some(video_id);
    }

    fn on_vote(&mut self, vote: Vote) {
        let Some(video_id) = self.voting_for.clone() else {
            debug!("Vote {} ignored, controls not bound", vote);
            return;
        };
        let Some(stats) = self.stats.clone() else {
            return;
        };

        let previous = self.store.vote(&video_id);
        if previous == Some(vote) {
            debug!("Vote {} already recorded for {}", vote, video_id);
            return;
        }

        self.dispatch(async move {
            let result = stats.cast_vote(&video_id, vote, previous).await;
            PlayerCommand::VoteCast {
                video_id,
                vote,
                result,
            }
        });
    }

    fn on_vote_cast(&mut self, video_id: VideoId, vote: Vote, result: Result<VoteTally, WorkerApiError>) {
        let tally = match result {
            Ok(tally) => tally,
            Err(e) => {
                warn!(
                    "Failed to cast {} vote for {} (transient: {}): {}",
                    vote,
                    video_id,
                    e.is_transient(),
                    e
                );
                return;
            }
        };

        // The worker accepted it, so remember it even if the video changed.
        if let Err(e) = self.store.set_vote(&video_id, vote) {
            warn!("Failed to persist vote for {}: {:#}", video_id, e);
        }

        if self.voting_for.as_ref() == Some(&video_id) {
            self.view.set_vote_counts(tally.likes, tally.dislikes);
            self.view.set_active_vote(Some(vote));
        } else {
            debug!("Vote tally for superseded video {} not shown", video_id);
        }
    }

    fn show_view_count(&self, views: u64) {
        self.view
            .set_title(&self.current_title, &format!("{} views", views));
    }

    fn persist(&mut self, patch: StatePatch) {
        if let Err(e) = self.store.save_state(patch) {
            warn!("Failed to persist player state: {:#}", e);
        }
    }

    /// Spawn `request` and feed its completion back into the loop.
    ///
    /// The task only holds a weak sender while the request is pending, so a
    /// request that never completes does not keep the loop alive once every
    /// handle is gone.
    fn dispatch<F>(&self, request: F)
    where
        F: Future<Output = PlayerCommand> + Send + 'static,
    {
        let completions = self.completions.clone();
        tokio::spawn(async move {
            let completion = request.await;
            match completions.upgrade() {
                Some(sender) => {
                    let _ = sender.send(completion);
                }
                None => debug!("Player controller gone, dropping completion"),
            }
        });
    }
}

/// Handle to send commands to the player controller
#[derive(Clone)]
pub struct PlayerHandle {
    sender: mpsc::UnboundedSender<PlayerCommand>,
    media: Arc<dyn MediaElement>,
    progress_bound: Arc<AtomicBool>,
}

impl std::fmt::Debug for PlayerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerHandle")
            .field("sender", &"<UnboundedSender>")
            .field("progress_bound", &self.progress_bound.load(Ordering::Relaxed))
            .finish()
    }
}

impl PlayerHandle {
    /// Load a video. Stats arrive later; failures only affect the display.
    pub fn load_video(&self, video: VideoDescriptor) -> Result<()> {
        self.send(PlayerCommand::LoadVideo { video })
    }

    /// Show a status message, if the layout has a status target
    pub fn set_status(&self, message: impl Into<String>) -> Result<()> {
        self.send(PlayerCommand::SetStatus {
            message: message.into(),
        })
    }

    /// Start forwarding media time updates to the controller for view
    /// counting and position persistence. Binding again is a no-op.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn bind_progress_persistence(&self) -> Result<()> {
        if self.progress_bound.swap(true, Ordering::SeqCst) {
            debug!("Progress persistence already bound");
            return Ok(());
        }

        let mut updates = self.media.time_updates();
        let sender = self.sender.downgrade();

        tokio::spawn(async move {
            loop {
                let current_time = match updates.recv().await {
                    Ok(time) => time,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("Progress forwarding lagged, skipped {} time updates", skipped);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };

                let Some(sender) = sender.upgrade() else {
                    break;
                };
                if sender
                    .send(PlayerCommand::TimeUpdate { current_time })
                    .is_err()
                {
                    break;
                }
            }
            debug!("Progress forwarding stopped");
        });

        Ok(())
    }

    /// Click on a vote control
    pub fn vote(&self, vote: Vote) -> Result<()> {
        self.send(PlayerCommand::Vote { vote })
    }

    /// Key press on a focused vote control; only Enter activates it
    pub fn key_down(&self, vote: Vote, key: &str) -> Result<()> {
        if key != ACTIVATE_KEY {
            return Ok(());
        }
        self.vote(vote)
    }

    /// Get the playback bookkeeping
    pub async fn playback_state(&self) -> Result<PlaybackState> {
        let (respond_to, response) = oneshot::channel();
        self.send(PlayerCommand::GetPlaybackState { respond_to })?;
        response
            .await
            .map_err(|_| anyhow::anyhow!("Failed to receive response from player controller"))
    }

    /// Get a copy of the locally persisted data
    pub async fn stored_data(&self) -> Result<StoredData> {
        let (respond_to, response) = oneshot::channel();
        self.send(PlayerCommand::GetStoredData { respond_to })?;
        response
            .await
            .map_err(|_| anyhow::anyhow!("Failed to receive response from player controller"))
    }

    fn send(&self, command: PlayerCommand) -> Result<()> {
        self.sender
            .send(command)
            .map_err(|_| anyhow::anyhow!("Player controller disconnected"))
    }
}
