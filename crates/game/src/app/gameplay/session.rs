use std::time::Duration;

use engine::IVec2;
use serde::Serialize;
use tracing::{info, warn};

use super::board::Board;
use super::level::Level;
use super::outcome::{Outcome, OutcomeSignal};
use super::replay::{ReplayEngine, TickReport};
use super::reveal::BoardVisibility;
use super::strip::CommandStrip;
use super::tiles::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum SessionPhase {
    Planning,
    Running,
    Won,
    Lost,
}

impl SessionPhase {
    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::Running => "running",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    pub(crate) fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct SessionSummary {
    pub(crate) level: String,
    pub(crate) phase: SessionPhase,
    pub(crate) outcome: Option<Outcome>,
    pub(crate) player: IVec2,
    pub(crate) pending: Vec<Direction>,
    pub(crate) commands: String,
    pub(crate) board: Vec<String>,
}

/// One play-through of a level.
///
/// Owns everything a run touches so collaborators receive it by `&mut`
/// instead of reaching for shared state. Outcome subscribers outlive
/// [`GameSession::reset`].
#[derive(Debug)]
pub(crate) struct GameSession {
    level: Level,
    board: Board,
    engine: ReplayEngine,
    outcomes: OutcomeSignal,
    strip: CommandStrip,
    phase: SessionPhase,
    started_at: Option<Duration>,
    visibility: BoardVisibility,
}

impl GameSession {
    pub(crate) fn new(level: Level) -> Self {
        let board = level.board().clone();
        let engine = ReplayEngine::new(level.interval());
        info!(
            level = level.name(),
            rows = board.rows(),
            cols = board.cols(),
            interval_ms = level.interval().as_millis() as u64,
            "session_started"
        );
        Self {
            level,
            board,
            engine,
            outcomes: OutcomeSignal::new(),
            strip: CommandStrip::default(),
            phase: SessionPhase::Planning,
            started_at: None,
            visibility: BoardVisibility::Shown,
        }
    }

    pub(crate) fn with_revert_marker_consumption(mut self, consume: bool) -> Self {
        self.engine = self.engine.with_revert_marker_consumption(consume);
        self
    }

    pub(crate) fn enqueue(&mut self, direction: Direction) -> bool {
        if self.phase.is_terminal() {
            warn!(
                direction = direction.as_token(),
                phase = self.phase.as_token(),
                "command_rejected"
            );
            return false;
        }
        self.engine.enqueue(direction);
        let icon = self.strip.push(direction);
        info!(
            direction = direction.as_token(),
            queued = self.engine.len(),
            column = icon.column,
            row = icon.row,
            rotation = icon.rotation_degrees,
            strip = %self.strip.render_line(),
            "command_enqueued"
        );
        true
    }

    /// Starts replaying queued commands. Only has an effect while planning.
    pub(crate) fn go(&mut self, now: Duration) -> bool {
        if self.phase != SessionPhase::Planning {
            return false;
        }
        self.phase = SessionPhase::Running;
        info!(
            now_ms = now.as_millis() as u64,
            queued = self.engine.len(),
            interval_ms = self.engine.interval().as_millis() as u64,
            "session_running"
        );
        true
    }

    /// Returns `None` while planning, when the replay engine is not consulted.
    pub(crate) fn tick(&mut self, now: Duration) -> Option<TickReport> {
        let started_at = *self.started_at.get_or_insert(now);
        let visibility = self.board_visibility(now.saturating_sub(started_at));
        if visibility != self.visibility {
            self.visibility = visibility;
            if visibility == BoardVisibility::Hidden {
                info!(
                    level = self.level.name(),
                    show_for_ms = self.level.reveal().show_for().as_millis() as u64,
                    "board_hidden"
                );
            }
        }

        if self.phase == SessionPhase::Planning {
            return None;
        }

        let report = self.engine.tick(now, &mut self.board, &mut self.outcomes);
        if let Some(outcome) = self.engine.outcome() {
            self.phase = match outcome {
                Outcome::Win => SessionPhase::Won,
                Outcome::Lose(_) => SessionPhase::Lost,
            };
        }
        Some(report)
    }

    pub(crate) fn reset(&mut self) {
        self.board = self.level.board().clone();
        self.engine.reset();
        self.strip.clear();
        self.phase = SessionPhase::Planning;
        self.started_at = None;
        self.visibility = BoardVisibility::Shown;
        info!(level = self.level.name(), "session_reset");
    }

    pub(crate) fn board_visibility(&self, elapsed: Duration) -> BoardVisibility {
        self.level.reveal().phase_at(elapsed)
    }

    pub(crate) fn outcomes_mut(&mut self) -> &mut OutcomeSignal {
        &mut self.outcomes
    }

    pub(crate) fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub(crate) fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn engine(&self) -> &ReplayEngine {
        &self.engine
    }

    #[cfg(test)]
    pub(crate) fn strip(&self) -> &CommandStrip {
        &self.strip
    }

    pub(crate) fn level(&self) -> &Level {
        &self.level
    }

    pub(crate) fn visibility(&self) -> BoardVisibility {
        self.visibility
    }

    /// Running with nothing left to replay.
    pub(crate) fn is_settled(&self) -> bool {
        self.phase == SessionPhase::Running && self.engine.is_empty()
    }

    pub(crate) fn summary(&self) -> SessionSummary {
        SessionSummary {
            level: self.level.name().to_string(),
            phase: self.phase,
            outcome: self.engine.outcome(),
            player: self.board.player_position(),
            pending: self.engine.pending().collect(),
            commands: self.strip.render_line(),
            board: self.board.render_rows(),
        }
    }
}
