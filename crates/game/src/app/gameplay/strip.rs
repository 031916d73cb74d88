use super::tiles::Direction;

pub(crate) const ICONS_PER_ROW: usize = 7;

/// One entered command as laid out in the on-screen strip.
///
/// The arrow sprite points left at zero rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ArrowIcon {
    pub(crate) direction: Direction,
    pub(crate) rotation_degrees: u16,
    pub(crate) column: usize,
    pub(crate) row: usize,
}

impl ArrowIcon {
    fn at_index(direction: Direction, index: usize) -> Self {
        Self {
            direction,
            rotation_degrees: rotation_for(direction),
            column: index % ICONS_PER_ROW,
            row: index / ICONS_PER_ROW,
        }
    }

    pub(crate) fn glyph(&self) -> char {
        match self.direction {
            Direction::Up => '↑',
            Direction::Right => '→',
            Direction::Down => '↓',
            Direction::Left => '←',
        }
    }
}

fn rotation_for(direction: Direction) -> u16 {
    match direction {
        Direction::Left => 0,
        Direction::Down => 90,
        Direction::Right => 180,
        Direction::Up => 270,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CommandStrip {
    icons: Vec<ArrowIcon>,
}

impl CommandStrip {
    pub(crate) fn push(&mut self, direction: Direction) -> ArrowIcon {
        let icon = ArrowIcon::at_index(direction, self.icons.len());
        self.icons.push(icon);
        icon
    }

    #[cfg(test)]
    pub(crate) fn icons(&self) -> &[ArrowIcon] {
        &self.icons
    }

    pub(crate) fn clear(&mut self) {
        self.icons.clear();
    }

    pub(crate) fn render_line(&self) -> String {
        self.icons.iter().map(ArrowIcon::glyph).collect()
    }
}
