use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoardVisibility {
    Shown,
    Fading,
    Hidden,
}

impl BoardVisibility {
    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::Shown => "shown",
            Self::Fading => "fading",
            Self::Hidden => "hidden",
        }
    }
}

/// How long the board stays visible after a session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RevealSchedule {
    show_for: Duration,
    fade_start: Duration,
}

impl RevealSchedule {
    /// `fade_start` is clamped to `show_for`.
    pub(crate) fn new(show_for: Duration, fade_start: Duration) -> Self {
        Self {
            show_for,
            fade_start: fade_start.min(show_for),
        }
    }

    pub(crate) fn show_for(&self) -> Duration {
        self.show_for
    }

    pub(crate) fn phase_at(&self, elapsed: Duration) -> BoardVisibility {
        if elapsed >= self.show_for {
            BoardVisibility::Hidden
        } else if elapsed >= self.fade_start {
            BoardVisibility::Fading
        } else {
            BoardVisibility::Shown
        }
    }
}
