use std::fmt;

use crate::{Cell, CellType, Command, Direction, Game, Grid, Pos, Rotation};

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Pos(row, col) = self.entry;
        writeln!(f, "{}", self.grid)?;
        write!(f, "{col} {row} {}", self.enter)
    }
}

/// Prints the initialization block the grid was read from.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        write!(f, "{width} {height}")?;
        for (pos, cell) in self.cells() {
            if pos.1 == 0 {
                f.write_str("\n")?;
            } else {
                f.write_str(" ")?;
            }
            write!(f, "{cell}")?;
        }
        write!(f, "\n{}", self.exit_column())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.locked {
            f.write_str("-")?;
        }
        write!(f, "{}", self.ty)
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0, self.1)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => f.write_str("LEFT"),
            Direction::Right => f.write_str("RIGHT"),
            Direction::Top => f.write_str("TOP"),
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Left => f.write_str("LEFT"),
            Rotation::Right => f.write_str("RIGHT"),
        }
    }
}

/// `ROW COL LEFT|RIGHT`.
impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.pos, self.rotation)
    }
}
