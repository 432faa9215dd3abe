use super::ready_session;
use crate::components::{EntityKind, LaneCommand};
use crate::config::SimulationConfig;
use crate::profile::EnvironmentProfile;
use crate::session::{GameSession, SessionEvent, SessionState};
use runner_engine::foundation::math::Vec3;

const FRAME: f32 = 1.0 / 60.0;

fn spawn_ticks(session: &mut GameSession, delta: f32, ticks: usize, kind: EntityKind) -> Vec<usize> {
    (1..=ticks)
        .filter_map(|tick| {
            let spawned = session
                .step(delta)
                .iter()
                .any(|event| matches!(event, SessionEvent::Spawned { kind: k, .. } if *k == kind));
            spawned.then_some(tick)
        })
        .collect()
}

fn unclamped() -> SimulationConfig {
    SimulationConfig { max_delta: 1.0, ..SimulationConfig::default() }
}

#[test]
fn test_score_counts_ticks_regardless_of_delta() {
    let mut session = GameSession::with_seed(EnvironmentProfile::stellar_storm(), SimulationConfig::default(), 1);
    let deltas = [0.001, 0.016, 0.05, 0.1, 3.0, 0.0, -1.0];

    for (n, delta) in deltas.iter().cycle().take(200).enumerate() {
        let before = session.score();
        session.step(*delta);
        assert_eq!(session.score(), before + 1, "tick {}", n);
    }
    assert_eq!(session.score(), 200);
}

#[test]
fn test_asteroid_spawns_on_second_half_second_tick() {
    let mut session = GameSession::with_seed(EnvironmentProfile::asteroid_belt(), unclamped(), 2);
    assert_eq!(spawn_ticks(&mut session, 0.5, 6, EntityKind::Asteroid), vec![2, 4, 6]);
}

#[test]
fn test_spawn_timer_drops_remainder() {
    // 0.9s ticks: 1.8s at tick 2. Carrying the 0.85s overflow would spawn again at tick 3.
    let mut session = GameSession::with_seed(EnvironmentProfile::asteroid_belt(), unclamped(), 3);
    assert_eq!(spawn_ticks(&mut session, 0.9, 6, EntityKind::Asteroid), vec![2, 4, 6]);
}

#[test]
fn test_coin_spawns_follow_their_own_interval() {
    let mut session = GameSession::with_seed(EnvironmentProfile::asteroid_belt(), unclamped(), 4);
    // 1.18s interval at 0.5s ticks: due at 1.5s
    assert_eq!(spawn_ticks(&mut session, 0.5, 6, EntityKind::Coin), vec![3, 6]);
}

#[test]
fn test_lane_change_approaches_monotonically_without_overshoot() {
    let mut session = ready_session(5);
    session.apply(LaneCommand::Right);

    let mut previous = session.player().position.x;
    for _ in 0..40 {
        session.step(FRAME);
        let x = session.player().position.x;
        assert!(x > previous, "x must keep increasing: {} -> {}", previous, x);
        assert!(x <= 4.0);
        previous = x;
    }
    assert!(previous > 3.9);
}

#[test]
fn test_coin_pickup_keeps_running() {
    let mut session = ready_session(6);
    let near = session.player().position - Vec3::new(0.0, 0.0, 0.2);
    let coin = session.pool_mut().spawn(EntityKind::Coin, near, Vec3::zeros());

    let events = session.step(FRAME);

    assert!(events.contains(&SessionEvent::CoinCollected { id: coin }));
    assert_eq!(session.coins(), 1);
    assert!(session.pool().iter().all(|entity| entity.id != coin));
    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.score(), 1);
}

#[test]
fn test_asteroid_hit_ends_session_once() {
    let mut session = ready_session(7);
    for _ in 0..10 {
        session.step(FRAME);
    }
    let score_before = session.score();
    let near = session.player().position - Vec3::new(0.0, 0.0, 0.2);

    let coin = session.pool_mut().spawn(EntityKind::Coin, near, Vec3::zeros());
    let first = session.pool_mut().spawn(EntityKind::Asteroid, near, Vec3::zeros());
    let second = session.pool_mut().spawn(EntityKind::Asteroid, near, Vec3::zeros());

    let events = session.step(FRAME);
    let game_overs: Vec<_> = events.iter().filter(|e| matches!(e, SessionEvent::GameOver { .. })).collect();
    assert_eq!(game_overs.len(), 1);
    assert!(matches!(game_overs[0], SessionEvent::GameOver { asteroid, .. } if *asteroid == first));
    assert!(events.contains(&SessionEvent::CoinCollected { id: coin }));

    assert_eq!(session.state(), SessionState::GameOver);
    assert_eq!(session.score(), score_before, "the fatal tick does not score");
    assert!(session.pool().iter().any(|entity| entity.id == second));

    // Nothing moves or triggers again
    let frozen: Vec<_> = session.pool().iter().map(|e| e.position).collect();
    for _ in 0..5 {
        assert!(session.step(FRAME).is_empty());
    }
    let after: Vec<_> = session.pool().iter().map(|e| e.position).collect();
    assert_eq!(frozen, after);
    assert_eq!(session.score(), score_before);
    assert_eq!(session.coins(), 1);
}

#[test]
fn test_passed_entities_are_removed() {
    let mut session = ready_session(8);
    let passed = session.pool_mut().spawn(EntityKind::Asteroid, Vec3::new(0.0, 1.0, 9.9), Vec3::zeros());

    session.step(FRAME);

    assert!(session.pool().iter().all(|entity| entity.id != passed));
    assert!(session.is_running());
}

#[test]
fn test_entities_in_flight_speed_up_with_score() {
    let mut session = GameSession::with_seed(EnvironmentProfile::asteroid_belt(), SimulationConfig::default(), 9);
    session.pool_mut().spawn(EntityKind::Coin, Vec3::new(4.0, 1.0, -400.0), Vec3::zeros());

    for _ in 0..200 {
        session.step(0.001);
    }

    // The last advance ran before the final tick was scored
    let coin = session.pool().iter().next().unwrap();
    let speed_at_advance = session.approach_speed() - session.tuning().speed_per_point;
    assert!((coin.velocity.z - speed_at_advance).abs() < 1e-5);
    assert!(coin.velocity.z > EnvironmentProfile::asteroid_belt().approach_speed_base);
}
