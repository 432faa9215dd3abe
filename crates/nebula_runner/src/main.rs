//! Headless Nebula Runner
//!
//! Plays one level with a simple autopilot at a fixed frame rate, submits the
//! final score and prints the leaderboard.

use clap::Parser;
use nebula_runner::components::{EntityKind, LaneCommand, LANE_COUNT};
use nebula_runner::config::LeaderboardConfig;
use nebula_runner::leaderboard::{
    LeaderboardQuery, LocalLeaderboard, OfflineQueue, ResilientSubmitter, ScoreSubmissionPort,
};
use nebula_runner::{GameConfig, GameLoop, GameSession, PlayerContext, ProfileCatalog, SubmissionStatus};
use runner_engine::config::Config;
use runner_engine::environment::{EnvironmentManager, ImageFileSource, SkyboxLoader};
use runner_engine::foundation::logging;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless three-lane space runner", long_about = None)]
struct Args {
    /// Level to play (defaults to the configured start level)
    #[arg(long)]
    level: Option<u32>,

    /// Configuration file (.toml or .ron)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for every random stream
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks even if the ship survives
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,

    /// Display name for the leaderboard
    #[arg(long, default_value = "Pilot")]
    player: String,

    /// Simulated frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Log filter used when RUST_LOG is unset (overrides the config)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let loaded = match &args.config {
        Some(path) => GameConfig::load_from_file(path).and_then(|config| config.validate().map(|()| config)),
        None => Ok(GameConfig::default()),
    };
    let log_level = args.log_level.clone().unwrap_or_else(|| {
        loaded
            .as_ref()
            .map_or_else(|_| "info".to_string(), |config| config.engine.log_level.clone())
    });
    logging::init_with_default(&log_level);
    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Using default configuration: {}", e);
        GameConfig::default()
    });

    let catalog = match &config.environment.catalog {
        Some(path) => ProfileCatalog::load(path)?,
        None => ProfileCatalog::builtin(),
    };
    let level = args.level.unwrap_or(config.environment.start_level);
    let profile = catalog.level(level)?.clone();

    let mut environment = EnvironmentManager::new();
    if let Some(seed) = args.seed {
        environment = environment.with_seed(seed);
    }
    if config.engine.load_skyboxes {
        let source = Arc::new(ImageFileSource::new(config.engine.asset_root.clone()));
        environment = environment.with_loader(SkyboxLoader::new(source));
    }

    let session = match args.seed {
        Some(seed) => GameSession::with_seed(profile, config.simulation.clone(), seed),
        None => GameSession::new(profile, config.simulation.clone()),
    };
    let context = PlayerContext::new(&args.player).with_game_mode(config.leaderboard.game_mode.clone());
    let port = submitter(&config.leaderboard);

    let mut game = GameLoop::new(session, environment, port, context, args.seed);
    game.mark_player_ready();

    let delta = 1.0 / args.fps.max(1.0);
    let mut ticks = 0;
    while game.session().is_running() && ticks < args.max_ticks {
        let lane = autopilot_lane(game.session());
        game.apply(LaneCommand::Set(lane));
        game.tick(delta);
        ticks += 1;
    }

    if game.session().is_running() {
        log::info!("Stopped after {} ticks with the ship intact", ticks);
    } else {
        while !game.is_finished() {
            game.tick(delta);
        }
    }

    let session = game.session();
    println!(
        "Level {} ({}): score {}, coins {}, {:.1}s",
        session.profile().level,
        session.profile().name,
        session.score(),
        session.coins(),
        session.elapsed()
    );
    match game.submission() {
        Some(SubmissionStatus::Submitted(receipt)) if receipt.offline => println!("Score saved offline"),
        Some(SubmissionStatus::Submitted(receipt)) => {
            if let Some(rank) = receipt.rank {
                println!("Rank {}", rank);
            }
        }
        Some(SubmissionStatus::Failed(e)) => println!("Score not submitted: {}", e),
        None => {}
    }

    let limit = config.leaderboard.top_limit;
    let port = game.into_port();
    for (position, entry) in port.top(&LeaderboardQuery::top(limit).level(level))?.iter().enumerate() {
        println!("{:>3}. {:<20} {:>8}", position + 1, entry.player_name, entry.score);
    }
    Ok(())
}

fn submitter(config: &LeaderboardConfig) -> ResilientSubmitter<LocalLeaderboard> {
    let board = LocalLeaderboard::with_capacity(config.local_capacity);
    let queue = match &config.offline_queue_path {
        Some(path) => OfflineQueue::open_or_empty(path),
        None => OfflineQueue::new(),
    };
    let mut submitter = ResilientSubmitter::with_queue(board, queue);
    if !submitter.queue().is_empty() {
        let report = submitter.sync();
        log::info!("Replayed offline scores: {} sent, {} still queued", report.sent, report.requeued);
    }
    submitter
}

/// Lane whose nearest oncoming asteroid is furthest away, preferring the current lane
fn autopilot_lane(session: &GameSession) -> u8 {
    let lanes = &session.tuning().lane_offsets;
    let player = session.player();
    let clearance = |lane: u8| {
        let x = lanes[usize::from(lane)];
        session
            .pool()
            .iter()
            .filter(|entity| entity.kind == EntityKind::Asteroid)
            .filter(|entity| (entity.position.x - x).abs() < f32::EPSILON)
            .filter(|entity| entity.position.z <= player.position.z)
            .map(|entity| player.position.z - entity.position.z)
            .fold(f32::INFINITY, f32::min)
    };

    let mut best = player.lane();
    for lane in 0..LANE_COUNT {
        if clearance(lane) > clearance(best) {
            best = lane;
        }
    }
    best
}
