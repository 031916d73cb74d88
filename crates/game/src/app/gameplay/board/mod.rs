use engine::{Grid, GridError, IVec2};
use thiserror::Error;

use super::tiles::{CellView, LayoutCell, TileKind};

mod executor;

/// Static layout plus the player's occupant slot.
///
/// The player's own cell in `cells` is a placeholder; the real content of
/// that cell lives in `under_player` until the player leaves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Board {
    cells: Grid<TileKind>,
    player: IVec2,
    under_player: TileKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub(crate) enum BoardError {
    #[error("layout shape is invalid: {0}")]
    Shape(#[from] GridError),
    #[error("layout has no player start")]
    MissingPlayerStart,
    #[error("layout has more than one player start: {first} and {second}")]
    MultiplePlayerStarts { first: IVec2, second: IVec2 },
}

impl Board {
    pub(crate) fn new(layout: &Grid<LayoutCell>) -> Result<Self, BoardError> {
        let mut player = None;
        for (pos, cell) in layout.iter_with_pos() {
            if *cell == LayoutCell::PlayerStart {
                if let Some(first) = player {
                    return Err(BoardError::MultiplePlayerStarts { first, second: pos });
                }
                player = Some(pos);
            }
        }
        let player = player.ok_or(BoardError::MissingPlayerStart)?;

        let cells = layout.map(|cell| match cell {
            LayoutCell::Tile(kind) => *kind,
            LayoutCell::PlayerStart => TileKind::Empty,
        });

        Ok(Self {
            cells,
            player,
            under_player: TileKind::Empty,
        })
    }

    pub(crate) fn from_rows(rows: Vec<Vec<LayoutCell>>) -> Result<Self, BoardError> {
        let layout = Grid::from_rows(rows)?;
        Self::new(&layout)
    }

    pub(crate) fn rows(&self) -> u32 {
        self.cells.height()
    }

    pub(crate) fn cols(&self) -> u32 {
        self.cells.width()
    }

    pub(crate) fn player_position(&self) -> IVec2 {
        self.player
    }

    pub(crate) fn tile_under_player(&self) -> TileKind {
        self.under_player
    }

    pub(crate) fn is_out_of_bounds(&self, pos: IVec2) -> bool {
        !self.cells.contains(pos)
    }

    pub(crate) fn tile_kind_at(&self, pos: IVec2) -> Option<CellView> {
        if pos == self.player {
            return Some(CellView::Player);
        }
        self.cells.get(pos).copied().map(CellView::Tile)
    }

    pub(crate) fn is_player_on_goal(&self) -> bool {
        self.under_player == TileKind::Goal
    }

    pub(crate) fn is_player_on_wall(&self) -> bool {
        self.under_player == TileKind::Wall
    }

    pub(crate) fn is_player_on_revert_marker(&self) -> bool {
        self.under_player == TileKind::RevertMarker
    }

    /// Turns a revert marker under the player into floor so it cannot fire again.
    pub(crate) fn remove_revert_marker_under_player(&mut self) -> bool {
        if self.is_player_on_revert_marker() {
            self.under_player = TileKind::Empty;
            true
        } else {
            false
        }
    }

    pub(crate) fn render_rows(&self) -> Vec<String> {
        (0..self.rows() as i32)
            .map(|y| {
                (0..self.cols() as i32)
                    .filter_map(|x| self.tile_kind_at(IVec2::new(x, y)))
                    .map(CellView::glyph)
                    .collect::<String>()
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) fn board_from_text(rows: &[&str]) -> Board {
    let rows = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|glyph| LayoutCell::from_glyph(glyph).expect("known glyph"))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();
    Board::from_rows(rows).expect("board")
}
