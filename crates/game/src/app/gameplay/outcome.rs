use engine::Signal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum LoseReason {
    OffBoard,
    HitWall,
}

/// Terminal result of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub(crate) enum Outcome {
    Win,
    Lose(LoseReason),
}

impl Outcome {
    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Lose(_) => "lose",
        }
    }
}

impl LoseReason {
    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::OffBoard => "off_board",
            Self::HitWall => "hit_wall",
        }
    }
}

pub(crate) type OutcomeSignal = Signal<Outcome>;
