//! Per-frame orchestration
//!
//! [`GameLoop`] ties one session to its environment, background decoration,
//! cosmetic effects and the score port. Each [`GameLoop::tick`] runs the
//! decoration, the simulation step and the environment update with the same
//! clamped delta. Once the session ends the final score is handed to the port
//! exactly once and only effects keep ticking until they are reaped.

use crate::backdrop::Backdrop;
use crate::components::LaneCommand;
use crate::context::PlayerContext;
use crate::leaderboard::{GameMode, PortError, ScoreSubmission, ScoreSubmissionPort, SubmissionReceipt};
use crate::session::{GameSession, SessionEvent};
use rand::{rngs::StdRng, SeedableRng};
use runner_engine::effects::{CameraShake, Effect, EffectStack, ExplosionBurst, ScreenFlash};
use runner_engine::environment::EnvironmentManager;
use runner_engine::foundation::math::Vec3;
use runner_engine::foundation::time::clamp_delta;

/// Starting camera shake after a crash
pub const CRASH_SHAKE: f32 = 0.7;

/// What happened to the final score
#[derive(Debug)]
pub enum SubmissionStatus {
    /// The port accepted it
    Submitted(SubmissionReceipt),
    /// The port failed; the game carries on regardless
    Failed(PortError),
}

/// One running game
#[derive(Debug)]
pub struct GameLoop<P> {
    session: GameSession,
    environment: EnvironmentManager,
    backdrop: Backdrop,
    effects: EffectStack,
    port: P,
    context: PlayerContext,
    submission: Option<SubmissionStatus>,
    rng: StdRng,
}

impl<P: ScoreSubmissionPort> GameLoop<P> {
    /// Build the level environment and decoration for `session`
    pub fn new(
        session: GameSession,
        mut environment: EnvironmentManager,
        port: P,
        context: PlayerContext,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        environment.switch_environment(session.profile());
        let backdrop = Backdrop::new(&mut rng);

        Self {
            session,
            environment,
            backdrop,
            effects: EffectStack::new(),
            port,
            context,
            submission: None,
            rng,
        }
    }

    /// Advance one frame by `raw_delta` seconds
    pub fn tick(&mut self, raw_delta: f32) -> Vec<SessionEvent> {
        let delta = clamp_delta(raw_delta, self.session.tuning().max_delta);

        if !self.session.is_running() {
            self.effects.update(delta);
            return Vec::new();
        }

        self.backdrop.update(delta, &mut self.rng);
        let events = self.session.step(delta);
        for event in &events {
            if let SessionEvent::GameOver { position, .. } = event {
                self.crash_effects(*position);
                self.submit_final_score();
            }
        }
        self.environment.update(delta);
        self.effects.update(delta);
        events
    }

    fn crash_effects(&mut self, position: Vec3) {
        self.effects.push(Effect::Explosion(ExplosionBurst::new(position, &mut self.rng)));
        self.effects.push(Effect::Flash(ScreenFlash::new()));
        self.effects.push(Effect::Shake(CameraShake::new(CRASH_SHAKE)));
    }

    fn submit_final_score(&mut self) {
        if self.submission.is_some() {
            return;
        }

        let game_mode: GameMode = self.context.game_mode().parse().unwrap_or_else(|e| {
            log::warn!("{}, submitting as normal", e);
            GameMode::Normal
        });
        let submission = ScoreSubmission::new(
            self.context.display_name(),
            self.session.score(),
            self.session.profile().level,
            game_mode,
        )
        .with_metadata(serde_json::json!({
            "gameVersion": env!("CARGO_PKG_VERSION"),
            "coins": self.session.coins(),
            "playTime": self.session.elapsed(),
        }));

        let status = match self.port.submit(&submission) {
            Ok(receipt) => {
                match receipt.rank {
                    Some(rank) => log::info!("Score {} submitted, rank {}", receipt.entry.score, rank),
                    None => log::info!("Score {} saved offline", receipt.entry.score),
                }
                SubmissionStatus::Submitted(receipt)
            }
            Err(e) => {
                log::warn!("Score submission failed: {}", e);
                SubmissionStatus::Failed(e)
            }
        };
        self.submission = Some(status);
    }

    /// Forward a lane input
    pub fn apply(&mut self, command: LaneCommand) {
        self.session.apply(command);
    }

    /// Player mesh finished loading
    pub fn mark_player_ready(&mut self) {
        self.session.mark_player_ready();
    }

    /// True once the session ended and every effect has played out
    pub fn is_finished(&self) -> bool {
        !self.session.is_running() && self.effects.is_empty()
    }

    /// The session
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// The session, mutably
    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    /// The level environment
    pub fn environment(&self) -> &EnvironmentManager {
        &self.environment
    }

    /// Background decoration
    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    /// Live cosmetic effects
    pub fn effects(&self) -> &EffectStack {
        &self.effects
    }

    /// The score port
    pub fn port(&self) -> &P {
        &self.port
    }

    /// The score port, mutably
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    /// Who is playing
    pub fn context(&self) -> &PlayerContext {
        &self.context
    }

    /// Outcome of the final score submission, once the session ended
    pub fn submission(&self) -> Option<&SubmissionStatus> {
        self.submission.as_ref()
    }

    /// Release the environment and hand back the port
    pub fn into_port(mut self) -> P {
        self.environment.dispose();
        self.port
    }
}
