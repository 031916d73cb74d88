use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use super::board::{Board, BoardError};
use super::reveal::RevealSchedule;
use super::tiles::LayoutCell;

pub(crate) const BUILT_IN_LEVEL_NAME: &str = "moon";
const DEFAULT_SHOW_BOARD_SECS: f64 = 10.0;
const DEFAULT_FADE_START_SECS: f64 = 9.0;

#[derive(Debug, Error)]
pub(crate) enum LevelError {
    #[error("read level '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse level json at {at}: {source}")]
    Parse {
        at: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("validation failed at {field}: {message}")]
    Invalid { field: String, message: String },
    #[error("level board is invalid: {0}")]
    Board(#[from] BoardError),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LevelFile {
    name: String,
    interval_secs: f64,
    #[serde(default = "default_show_board_secs")]
    show_board_secs: f64,
    #[serde(default = "default_fade_start_secs")]
    fade_start_secs: f64,
    rows: Vec<String>,
}

fn default_show_board_secs() -> f64 {
    DEFAULT_SHOW_BOARD_SECS
}

fn default_fade_start_secs() -> f64 {
    DEFAULT_FADE_START_SECS
}

/// A validated level: starting board plus timing.
#[derive(Debug, Clone)]
pub(crate) struct Level {
    name: String,
    interval: Duration,
    reveal: RevealSchedule,
    board: Board,
}

impl Level {
    /// The 3×3 moon board the game ships with.
    pub(crate) fn built_in() -> Self {
        let file = LevelFile {
            name: BUILT_IN_LEVEL_NAME.to_string(),
            interval_secs: 5.0,
            show_board_secs: DEFAULT_SHOW_BOARD_SECS,
            fade_start_secs: DEFAULT_FADE_START_SECS,
            rows: ["###", "GR#", "#P#"].map(str::to_string).to_vec(),
        };
        Self::from_file(file).expect("built-in level should be valid")
    }

    pub(crate) fn load(path: &Path) -> Result<Self, LevelError> {
        let raw = fs::read_to_string(path).map_err(|source| LevelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub(crate) fn from_json(raw: &str) -> Result<Self, LevelError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let file = serde_path_to_error::deserialize::<_, LevelFile>(&mut deserializer).map_err(
            |error| {
                let at = error.path().to_string();
                LevelError::Parse {
                    at,
                    source: error.into_inner(),
                }
            },
        )?;
        Self::from_file(file)
    }

    pub(crate) fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn interval(&self) -> Duration {
        self.interval
    }

    pub(crate) fn reveal(&self) -> RevealSchedule {
        self.reveal
    }

    pub(crate) fn board(&self) -> &Board {
        &self.board
    }

    fn from_file(file: LevelFile) -> Result<Self, LevelError> {
        if file.name.trim().is_empty() {
            return Err(invalid("name", "must not be empty"));
        }
        let interval = positive_secs("interval_secs", file.interval_secs)?;
        let show_for = non_negative_secs("show_board_secs", file.show_board_secs)?;
        let fade_start = non_negative_secs("fade_start_secs", file.fade_start_secs)?;
        if fade_start > show_for {
            return Err(invalid(
                "fade_start_secs",
                format!(
                    "expected at most show_board_secs ({}), got {}",
                    file.show_board_secs, file.fade_start_secs
                ),
            ));
        }

        let board = Board::from_rows(parse_rows(&file.rows)?)?;
        Ok(Self {
            name: file.name,
            interval,
            reveal: RevealSchedule::new(show_for, fade_start),
            board,
        })
    }
}

fn parse_rows(rows: &[String]) -> Result<Vec<Vec<LayoutCell>>, LevelError> {
    if rows.is_empty() {
        return Err(invalid("rows", "must contain at least one row"));
    }
    rows.iter()
        .enumerate()
        .map(|(y, row)| {
            row.chars()
                .enumerate()
                .map(|(x, glyph)| {
                    LayoutCell::from_glyph(glyph).ok_or_else(|| {
                        invalid(
                            format!("rows[{y}][{x}]"),
                            format!("unknown glyph {glyph:?}"),
                        )
                    })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

fn positive_secs(field: &str, value: f64) -> Result<Duration, LevelError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(field, format!("expected a positive number, got {value}")));
    }
    Duration::try_from_secs_f64(value).map_err(|error| invalid(field, error.to_string()))
}

fn non_negative_secs(field: &str, value: f64) -> Result<Duration, LevelError> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            field,
            format!("expected a non-negative number, got {value}"),
        ));
    }
    Duration::try_from_secs_f64(value).map_err(|error| invalid(field, error.to_string()))
}

fn invalid(field: impl Into<String>, message: impl Into<String>) -> LevelError {
    LevelError::Invalid {
        field: field.into(),
        message: message.into(),
    }
}
