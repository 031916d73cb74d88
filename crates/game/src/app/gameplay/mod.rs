use std::time::Duration;

use engine::{InputAction, InputSnapshot, Scene, SceneCommand, SubscriptionId};
use tracing::{debug, info};

mod board;
mod level;
mod outcome;
mod replay;
mod reveal;
mod session;
mod strip;
mod tiles;

pub(crate) use level::{Level, LevelError, BUILT_IN_LEVEL_NAME};
pub(crate) use outcome::Outcome;
pub(crate) use session::{GameSession, SessionSummary};
pub(crate) use tiles::Direction;

#[cfg(test)]
pub(crate) use outcome::LoseReason;
#[cfg(test)]
pub(crate) use session::SessionPhase;

/// Drives a [`GameSession`] from loop input.
///
/// Quits once the session reaches an outcome, or once a started run has
/// nothing left to replay.
pub(crate) struct PuzzleScene {
    session: GameSession,
    loads: u32,
    presenter: Option<SubscriptionId>,
}

impl PuzzleScene {
    pub(crate) fn new(session: GameSession) -> Self {
        Self {
            session,
            loads: 0,
            presenter: None,
        }
    }

    pub(crate) fn session(&self) -> &GameSession {
        &self.session
    }

    pub(crate) fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    fn apply_action(&mut self, action: InputAction, now: Duration) -> Option<SceneCommand> {
        match action {
            InputAction::Go => {
                self.session.go(now);
                None
            }
            InputAction::Restart => Some(SceneCommand::HardReset),
            InputAction::Quit => Some(SceneCommand::Quit),
            movement => {
                if let Some(direction) = Direction::from_action(movement) {
                    self.session.enqueue(direction);
                }
                None
            }
        }
    }
}

impl Scene for PuzzleScene {
    fn load(&mut self) {
        if self.loads > 0 {
            self.session.reset();
        }
        self.loads = self.loads.saturating_add(1);
        self.presenter = Some(self.session.outcomes_mut().subscribe(|outcome| {
            let reason = match outcome {
                Outcome::Win => "reached_goal",
                Outcome::Lose(reason) => reason.as_token(),
            };
            info!(outcome = outcome.as_token(), reason, "outcome_presented");
        }));
        info!(
            level = self.session.level().name(),
            rows = ?self.session.board().render_rows(),
            "scene_loaded"
        );
    }

    fn update(
        &mut self,
        _fixed_dt: Duration,
        now: Duration,
        input: &InputSnapshot,
    ) -> SceneCommand {
        for action in input.pressed_actions() {
            if let Some(command) = self.apply_action(action, now) {
                return command;
            }
        }

        if let Some(report) = self.session.tick(now) {
            if !report.is_idle() {
                debug!(
                    report = ?report,
                    next_allowed_ms = self.session.engine().next_allowed().as_millis() as u64,
                    "tick_report"
                );
            }
        }

        if self.session.phase().is_terminal() || self.session.is_settled() {
            SceneCommand::Quit
        } else {
            SceneCommand::None
        }
    }

    fn unload(&mut self) {
        if let Some(id) = self.presenter.take() {
            self.session.outcomes_mut().unsubscribe(id);
        }
    }

    fn debug_title(&self) -> Option<String> {
        let engine = self.session.engine();
        let revert = if engine.must_revert() { " | revert" } else { "" };
        Some(format!(
            "{} | {} | {} | queued {} | player {}{revert}",
            self.session.level().name(),
            self.session.phase().as_token(),
            self.session.visibility().as_token(),
            engine.len(),
            self.session.board().player_position(),
        ))
    }
}
