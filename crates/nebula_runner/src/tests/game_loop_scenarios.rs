use super::ready_session;
use crate::components::EntityKind;
use crate::context::PlayerContext;
use crate::game_loop::{GameLoop, SubmissionStatus};
use crate::leaderboard::offline::tests::FlakyRemote;
use crate::leaderboard::{LocalLeaderboard, PortError, ResilientSubmitter, ScoreSubmissionPort};
use crate::profile::ProfileCatalog;
use crate::session::SessionEvent;
use runner_engine::environment::{EnvironmentManager, VisualRecipe};
use runner_engine::foundation::math::Vec3;

const FRAME: f32 = 1.0 / 60.0;

fn game<P: ScoreSubmissionPort>(port: P, seed: u64) -> GameLoop<P> {
    GameLoop::new(
        ready_session(seed),
        EnvironmentManager::new().with_seed(seed),
        port,
        PlayerContext::new("Nova Star!"),
        Some(seed),
    )
}

/// Drop an asteroid on top of the player so the next tick ends the run
fn crash<P: ScoreSubmissionPort>(game: &mut GameLoop<P>) -> Vec<SessionEvent> {
    let near = game.session().player().position - Vec3::new(0.0, 0.0, 0.2);
    game.session_mut().pool_mut().spawn(EntityKind::Asteroid, near, Vec3::zeros());
    game.tick(FRAME)
}

#[test]
fn test_loop_builds_level_environment() {
    let game = game(LocalLeaderboard::new(), 1);
    let active = game.environment().active().unwrap();

    assert_eq!(active.name(), "Asteroid Belt");
    assert_eq!(active.recipe(), VisualRecipe::AsteroidBelt);
    assert!(game.environment().resource_count() > 0);
    assert!(game.submission().is_none());
}

#[test]
fn test_game_over_submits_exactly_once() {
    let mut game = game(LocalLeaderboard::new(), 2);
    for _ in 0..30 {
        game.tick(FRAME);
    }
    let score = game.session().score();

    let events = crash(&mut game);
    assert!(events.iter().any(|e| matches!(e, SessionEvent::GameOver { .. })));

    for _ in 0..10 {
        assert!(game.tick(FRAME).is_empty());
    }

    assert_eq!(game.port().len(), 1);
    let entry = &game.port().entries()[0];
    assert_eq!(entry.player_name, "NovaStar");
    assert_eq!(entry.score, score);
    assert_eq!(entry.level, 1);

    match game.submission() {
        Some(SubmissionStatus::Submitted(receipt)) => {
            assert_eq!(receipt.rank, Some(1));
            assert!(!receipt.offline);
        }
        other => panic!("unexpected submission status: {:?}", other),
    }
}

#[test]
fn test_crash_effects_play_out_then_loop_finishes() {
    let mut game = game(LocalLeaderboard::new(), 3);
    game.tick(FRAME);
    crash(&mut game);

    assert_eq!(game.effects().len(), 3);
    assert!(game.effects().shake_magnitude() > 0.0);
    assert!(!game.is_finished());

    for _ in 0..300 {
        game.tick(FRAME);
    }
    assert!(game.effects().is_empty());
    assert!(game.is_finished());
}

#[test]
fn test_unreachable_backend_keeps_score_offline() {
    let remote = FlakyRemote { online: false, ..Default::default() };
    let mut game = game(ResilientSubmitter::new(remote), 4);
    game.tick(FRAME);
    crash(&mut game);

    match game.submission() {
        Some(SubmissionStatus::Submitted(receipt)) => {
            assert!(receipt.offline);
            assert_eq!(receipt.rank, None);
        }
        other => panic!("unexpected submission status: {:?}", other),
    }

    let mut submitter = game.into_port();
    assert_eq!(submitter.queue().len(), 1);
    assert_eq!(submitter.local().len(), 1);

    // Reconnect and flush
    submitter.remote_mut().online = true;
    let report = submitter.sync();
    assert_eq!(report.sent, 1);
    assert!(submitter.queue().is_empty());
    assert_eq!(submitter.remote().board.len(), 1);
}

#[test]
fn test_failed_submission_does_not_stop_the_loop() {
    let mut game = game(FlakyRemote::default(), 5);
    game.tick(FRAME);
    crash(&mut game);

    assert!(matches!(game.submission(), Some(SubmissionStatus::Failed(PortError::Unreachable(_)))));
    assert_eq!(game.port().calls, 1);

    for _ in 0..300 {
        game.tick(FRAME);
    }
    assert!(game.is_finished());
    assert_eq!(game.port().calls, 1);
}

#[test]
fn test_level_round_trip_releases_resources() {
    let catalog = ProfileCatalog::builtin();
    let first = catalog.level(1).unwrap();
    let second = catalog.level(3).unwrap();

    let mut environment = EnvironmentManager::new().with_seed(6);
    environment.switch_environment(first);
    let baseline = environment.resource_count();

    environment.switch_environment(second);
    assert_eq!(environment.active().unwrap().recipe(), VisualRecipe::StellarStorm);

    environment.switch_environment(first);
    assert_eq!(environment.resource_count(), baseline);
    assert_eq!(environment.generation(), 3);

    environment.dispose();
    assert_eq!(environment.resource_count(), 0);
}

#[test]
fn test_into_port_disposes_environment() {
    let game = game(LocalLeaderboard::new(), 7);
    let board = game.into_port();
    assert!(board.is_empty());
}
