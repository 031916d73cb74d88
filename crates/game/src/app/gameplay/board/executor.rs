use engine::IVec2;

use super::Board;
use crate::app::gameplay::tiles::TileKind;

impl Board {
    /// Moves the player by `displacement`, swapping through the occupant slot.
    ///
    /// Returns false without touching the board when the target is off the
    /// board. Landing on a wall is a successful move; callers decide what it
    /// means.
    pub(crate) fn try_move(&mut self, displacement: IVec2) -> bool {
        let from = self.player;
        let target = from + displacement;
        if self.is_out_of_bounds(target) {
            return false;
        }

        let landed = self
            .cells
            .replace(target, TileKind::Empty)
            .unwrap_or_default();
        self.cells.replace(from, self.under_player);
        self.player = target;
        self.under_player = landed;
        true
    }
}
