use engine::{IVec2, InputAction};
use serde::{Deserialize, Serialize};

/// Static content of a board cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum TileKind {
    #[default]
    Empty,
    Wall,
    Goal,
    RevertMarker,
}

impl TileKind {
    pub(crate) fn glyph(self) -> char {
        match self {
            Self::Empty => '.',
            Self::Wall => '#',
            Self::Goal => 'G',
            Self::RevertMarker => 'R',
        }
    }

    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Wall => "wall",
            Self::Goal => "goal",
            Self::RevertMarker => "revert_marker",
        }
    }
}

pub(crate) const PLAYER_GLYPH: char = 'P';

/// One cell of a level layout table before the board is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LayoutCell {
    Tile(TileKind),
    PlayerStart,
}

impl LayoutCell {
    pub(crate) fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' => Some(Self::Tile(TileKind::Empty)),
            '#' => Some(Self::Tile(TileKind::Wall)),
            'G' => Some(Self::Tile(TileKind::Goal)),
            'R' => Some(Self::Tile(TileKind::RevertMarker)),
            PLAYER_GLYPH => Some(Self::PlayerStart),
            _ => None,
        }
    }
}

/// What a query sees at a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellView {
    Tile(TileKind),
    Player,
}

impl CellView {
    pub(crate) fn glyph(self) -> char {
        match self {
            Self::Tile(kind) => kind.glyph(),
            Self::Player => PLAYER_GLYPH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub(crate) fn delta(self) -> IVec2 {
        match self {
            Self::Up => IVec2::new(0, -1),
            Self::Down => IVec2::new(0, 1),
            Self::Left => IVec2::new(-1, 0),
            Self::Right => IVec2::new(1, 0),
        }
    }

    pub(crate) fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    pub(crate) fn from_action(action: InputAction) -> Option<Self> {
        match action {
            InputAction::MoveUp => Some(Self::Up),
            InputAction::MoveDown => Some(Self::Down),
            InputAction::MoveLeft => Some(Self::Left),
            InputAction::MoveRight => Some(Self::Right),
            InputAction::Go | InputAction::Restart | InputAction::Quit => None,
        }
    }

    pub(crate) fn to_action(self) -> InputAction {
        match self {
            Self::Up => InputAction::MoveUp,
            Self::Down => InputAction::MoveDown,
            Self::Left => InputAction::MoveLeft,
            Self::Right => InputAction::MoveRight,
        }
    }

    /// Script letters: `U`, `D`, `L`, `R`, case-insensitive.
    pub(crate) fn from_script_char(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'U' => Some(Self::Up),
            'D' => Some(Self::Down),
            'L' => Some(Self::Left),
            'R' => Some(Self::Right),
            _ => None,
        }
    }

    pub(crate) fn as_token(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}
