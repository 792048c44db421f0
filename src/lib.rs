use std::ops::{Index, IndexMut};

use thiserror::Error;

mod fmt;
mod parse;
pub mod play;
pub mod rules;
pub mod solve;

pub use parse::Turn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("position {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: Pos, width: u8, height: u8 },
    #[error("cell at {0} is locked")]
    Locked(Pos),
    #[error("grid has {got} cells, expected {expected}")]
    Shape { expected: usize, got: usize },
    #[error("exit column {0} is outside the grid")]
    ExitOutOfBounds(u8),
    #[error("grid of {width}x{height} has no cells")]
    Empty { width: u8, height: u8 },
}

/// Pipe shape code, `0..=13`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellType(u8);

impl CellType {
    pub const MAX: u8 = 13;

    pub const ALL: [Self; 14] = {
        let mut all = [Self(0); 14];
        let mut i = 0;
        while i < all.len() {
            all[i] = Self(i as u8);
            i += 1;
        }
        all
    };

    pub fn new(ty: u8) -> Option<Self> {
        (ty <= Self::MAX).then_some(Self(ty))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

/// A grid cell. Locked cells keep their shape but refuse rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub ty: CellType,
    pub locked: bool,
}

impl Cell {
    /// Decodes an input value, where a negative value is a locked cell.
    pub fn from_raw(raw: i8) -> Option<Self> {
        let ty = CellType::new(raw.unsigned_abs())?;
        Some(Self {
            ty,
            locked: raw < 0,
        })
    }
}

/// The side the agent enters a cell from.
///
/// The declaration order matches the lexicographic order of the protocol
/// names (`LEFT` < `RIGHT` < `TOP`), which the search uses as its primary
/// tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Left = 0,
    Right,
    Top,
}

impl Direction {
    pub const ALL: [Self; 3] = [Self::Left, Self::Right, Self::Top];

    /// Offset to the cell that is entered from this side.
    fn offset(self) -> (i8, i8) {
        match self {
            Direction::Left => (0, 1),
            Direction::Right => (0, -1),
            Direction::Top => (1, 0),
        }
    }
}

/// A quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    Left = 0,
    Right,
}

/// (row, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos(pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Command {
    pub pos: Pos,
    pub rotation: Rotation,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    height: u8,
    width: u8,
    exit_col: u8,
    cells: Box<[Cell]>,
}

impl Index<Pos> for Grid {
    type Output = Cell;
    fn index(&self, pos: Pos) -> &Self::Output {
        let idx = pos.0 as usize * self.width as usize + pos.1 as usize;
        &self.cells[idx]
    }
}
impl IndexMut<Pos> for Grid {
    fn index_mut(&mut self, pos: Pos) -> &mut Self::Output {
        let idx = pos.0 as usize * self.width as usize + pos.1 as usize;
        &mut self.cells[idx]
    }
}

impl Grid {
    pub fn new(width: u8, height: u8, cells: Vec<Cell>, exit_col: u8) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty { width, height });
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(GridError::Shape {
                expected,
                got: cells.len(),
            });
        }
        if exit_col >= width {
            return Err(GridError::ExitOutOfBounds(exit_col));
        }
        Ok(Self {
            height,
            width,
            exit_col,
            cells: cells.into(),
        })
    }

    /// (width, height).
    pub fn dimensions(&self) -> (u8, u8) {
        (self.width, self.height)
    }

    pub fn exit_column(&self) -> u8 {
        self.exit_col
    }

    pub fn exit(&self) -> Pos {
        Pos(self.height - 1, self.exit_col)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.0 < self.height && pos.1 < self.width
    }

    pub fn cell_at(&self, pos: Pos) -> Result<Cell, GridError> {
        if !self.contains(pos) {
            return Err(GridError::OutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            });
        }
        Ok(self[pos])
    }

    pub fn cells(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        let idx_iter = std::iter::successors(Some(Pos(0, 0)), |&Pos(row, col)| {
            Some(if col + 1 < self.width {
                Pos(row, col + 1)
            } else {
                Pos(row + 1, 0)
            })
        });
        idx_iter.zip(self.cells.iter().copied())
    }

    /// The cell the agent moves into when it leaves `pos` and enters the next
    /// cell from `enter`, if that cell is inside the grid.
    pub fn sibling_pos(&self, pos: Pos, enter: Direction) -> Option<Pos> {
        let (dr, dc) = enter.offset();
        let row = pos.0.checked_add_signed(dr)?;
        let col = pos.1.checked_add_signed(dc)?;
        if self.height <= row || self.width <= col {
            return None;
        }
        Some(Pos(row, col))
    }

    /// Rotates the addressed cell in place.
    pub fn apply(&mut self, command: &Command) -> Result<(), GridError> {
        let cell = self.cell_at(command.pos)?;
        if cell.locked {
            return Err(GridError::Locked(command.pos));
        }
        self[command.pos].ty = cell.ty.rotated(command.rotation);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Game {
    pub grid: Grid,
    pub entry: Pos,
    pub enter: Direction,
}
