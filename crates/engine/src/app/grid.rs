use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Signed cell coordinate or displacement. `y` grows downward, row 0 is the top row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IVec2 {
    pub x: i32,
    pub y: i32,
}

impl IVec2 {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for IVec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for IVec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Neg for IVec2 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl fmt::Display for IVec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fixed-size grid stored row-major.
/// - Cell `(x, y)` lives at index `y * width + x`.
/// - Dimensions never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid must have at least one row and one column")]
    Empty,
    #[error("cell count mismatch: expected {expected}, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
    #[error("row {row} has {actual} cells, expected {expected}")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl<T> Grid<T> {
    pub fn new(width: u32, height: u32, cells: Vec<T>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }
        let expected = width as usize * height as usize;
        let actual = cells.len();
        if expected != actual {
            return Err(GridError::CellCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Builds a grid from top-to-bottom rows; every row must match the first row's width.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self, GridError> {
        let expected = rows.first().map(Vec::len).ok_or(GridError::Empty)?;
        let height = rows.len();
        let mut cells = Vec::with_capacity(expected * height);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != expected {
                return Err(GridError::RowWidthMismatch {
                    row,
                    expected,
                    actual: values.len(),
                });
            }
            cells.extend(values);
        }
        let width = u32::try_from(expected).map_err(|_| GridError::CellCountMismatch {
            expected: u32::MAX as usize,
            actual: expected,
        })?;
        let height = u32::try_from(height).map_err(|_| GridError::CellCountMismatch {
            expected: u32::MAX as usize,
            actual: height,
        })?;
        Self::new(width, height, cells)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn contains(&self, pos: IVec2) -> bool {
        self.index_of(pos).is_some()
    }

    pub fn index_of(&self, pos: IVec2) -> Option<usize> {
        let x = u32::try_from(pos.x).ok()?;
        let y = u32::try_from(pos.y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, pos: IVec2) -> Option<&T> {
        self.index_of(pos).and_then(|index| self.cells.get(index))
    }

    pub fn get_mut(&mut self, pos: IVec2) -> Option<&mut T> {
        let index = self.index_of(pos)?;
        self.cells.get_mut(index)
    }

    /// Replaces the cell at `pos`, returning the previous value.
    pub fn replace(&mut self, pos: IVec2, value: T) -> Option<T> {
        self.get_mut(pos).map(|slot| std::mem::replace(slot, value))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width as usize)
    }

    pub fn iter_with_pos(&self) -> impl Iterator<Item = (IVec2, &T)> {
        let width = self.width as usize;
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let pos = IVec2::new((index % width) as i32, (index / width) as i32);
            (pos, cell)
        })
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }
}
