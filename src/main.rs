use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use reel_counter::backends::{StatsService, WorkerApi};
use reel_counter::config::Config;
use reel_counter::core::PlayerViewModel;
use reel_counter::models::{VideoCatalog, VideoDescriptor, VideoId};
use reel_counter::player::{ControllerOptions, HeadlessMedia, PlayerComponents, PlayerController};
use reel_counter::storage::LocalStore;
use reel_counter::utils::ShareLink;

// Room for in-flight worker responses after simulated playback ends.
const SETTLE_TIME: Duration = Duration::from_millis(500);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Play a clip from a catalog with remote view and vote counting
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Video catalog (JSON array or `{ "videos": [...] }`)
    #[arg(long, value_name = "FILE")]
    catalog: PathBuf,

    /// Video id to load; defaults to the last watched or the first entry
    #[arg(long, value_name = "ID")]
    video: Option<String>,

    /// Config file instead of the default location
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Local state file instead of the configured one
    #[arg(long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Seconds of playback to simulate
    #[arg(long, value_name = "N", default_value = "6")]
    play_seconds: u64,

    /// Interval between time updates
    #[arg(long, value_name = "N", default_value = "250")]
    tick_ms: u64,

    /// Status message to show after loading
    #[arg(long, value_name = "MSG")]
    status: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reel_counter=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting reel-counter");

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let state_path = match &args.state {
        Some(path) => path.clone(),
        None => config.storage.resolve_state_path()?,
    };
    let store = LocalStore::open(&state_path)?;
    if let Some(path) = store.path() {
        info!("Local state at {:?}", path);
    }

    let catalog = VideoCatalog::load(&args.catalog)?;
    info!("Catalog {:?} has {} videos", args.catalog, catalog.len());
    let video = select_video(&catalog, args.video.as_deref(), &store)?;
    let resume_from = match (&store.state().last_id, store.state().t) {
        (Some(last_id), Some(t)) if *last_id == video.id => t as f64,
        _ => 0.0,
    };

    let stats: Option<Arc<dyn StatsService>> = match config.worker.url() {
        Some(url) => match WorkerApi::new(url, config.worker.timeout()) {
            Ok(api) => {
                info!("Using counting worker at {}", api.base_url());
                Some(Arc::new(api))
            }
            Err(e) => {
                warn!("Invalid worker URL, counting locally: {}", e);
                None
            }
        },
        None => {
            info!("No worker configured, counting locally");
            None
        }
    };

    let share_link = ShareLink::new(&config.share.base_url)
        .with_context(|| format!("Invalid share base URL {:?}", config.share.base_url))?;

    let view = PlayerViewModel::new(config.ui);
    let media = Arc::new(HeadlessMedia::new());
    let (handle, controller) = PlayerController::new(PlayerComponents {
        view: view.clone(),
        media: media.clone(),
        stats,
        store,
        share_link,
        options: ControllerOptions::from_config(&config),
    });
    let controller_task = tokio::spawn(controller.run());

    spawn_change_logger(&view, "title");
    spawn_change_logger(&view, "status");

    handle.load_video(video)?;
    if let Some(message) = &args.status {
        handle.set_status(message.as_str())?;
    }
    handle.bind_progress_persistence()?;

    media
        .play(
            resume_from,
            Duration::from_secs(args.play_seconds),
            Duration::from_millis(args.tick_ms),
        )
        .await;
    tokio::time::sleep(SETTLE_TIME).await;

    let playback = handle.playback_state().await?;
    debug!("Final playback state: {:?}", playback);

    let snapshot = view.snapshot();
    println!("{}", snapshot.title);
    if !snapshot.description.is_empty() {
        println!("{}", snapshot.description);
    }
    if !snapshot.tags.is_empty() {
        println!("tags: {}", snapshot.tags.join(", "));
    }
    for (label, field) in [("year", &snapshot.year), ("map", &snapshot.map)] {
        if let Some(field) = field.as_ref().filter(|f| f.visible) {
            println!("{}: {}", label, field.text);
        }
    }
    if let (Some(likes), Some(dislikes)) = (&snapshot.likes, &snapshot.dislikes) {
        let active = snapshot
            .active_vote
            .map(|vote| format!(" (voted {})", vote))
            .unwrap_or_default();
        println!("{}  {}{}", likes, dislikes, active);
    }
    if let Some(status) = snapshot.status.as_ref().filter(|s| !s.is_empty()) {
        println!("status: {}", status);
    }
    println!("share: {}", snapshot.share_url);

    drop(handle);
    match tokio::time::timeout(SHUTDOWN_TIMEOUT, controller_task).await {
        Ok(Ok(())) => debug!("Player controller stopped"),
        Ok(Err(e)) => warn!("Player controller task failed: {}", e),
        Err(_) => warn!("Player controller did not stop within {:?}", SHUTDOWN_TIMEOUT),
    }

    Ok(())
}

fn select_video(catalog: &VideoCatalog, requested: Option<&str>, store: &LocalStore) -> Result<VideoDescriptor> {
    if let Some(id) = requested {
        return catalog
            .get(&VideoId::from(id))
            .cloned()
            .with_context(|| format!("Video {:?} not found in catalog", id));
    }

    let remembered = store
        .state()
        .last_id
        .as_ref()
        .and_then(|id| catalog.get(id));

    remembered
        .or_else(|| catalog.first())
        .cloned()
        .context("Catalog is empty")
}

fn spawn_change_logger(view: &PlayerViewModel, property: &'static str) {
    let Some(mut subscriber) = view.subscribe_to_property(property) else {
        return;
    };
    let view = view.clone();

    tokio::spawn(async move {
        while subscriber.wait_for_change().await {
            let value = match property {
                "status" => view.status().map(|p| p.get()).unwrap_or_default(),
                _ => view.title().get(),
            };
            info!("{} -> {}", property, value);
        }
    });
}
