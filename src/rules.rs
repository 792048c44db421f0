//! Pipe geometry: where each shape sends the agent, and which shapes a cell
//! can be turned into.

use arrayvec::ArrayVec;

use crate::{Cell, CellType, Direction, Rotation};

/// Shapes one physical cell can take.
pub type Orbit = ArrayVec<CellType, 4>;

const L: Option<Direction> = Some(Direction::Left);
const R: Option<Direction> = Some(Direction::Right);
const T: Option<Direction> = Some(Direction::Top);

/// Side the agent enters the next cell from, indexed by
/// `[cell type][entry side]` with entry sides ordered Left, Right, Top.
///
/// `T` means the agent falls into the cell below, `L` that it moves one
/// column right, `R` one column left.
#[rustfmt::skip]
const TRANSITIONS: [[Option<Direction>; 3]; 14] = [
    [None, None, None], // 0
    [T,    T,    T   ], // 1
    [L,    R,    None], // 2
    [None, None, T   ], // 3
    [None, T,    R   ], // 4
    [T,    None, L   ], // 5
    [L,    R,    None], // 6
    [None, T,    T   ], // 7
    [T,    T,    None], // 8
    [T,    None, T   ], // 9
    [None, None, R   ], // 10
    [None, None, L   ], // 11
    [None, T,    None], // 12
    [T,    None, None], // 13
];

/// `[left, right]` quarter turns of each shape.
#[rustfmt::skip]
const ROTATIONS: [[u8; 2]; 14] = [
    [0, 0], [1, 1],
    [3, 3], [2, 2],
    [5, 5], [4, 4],
    [9, 7], [6, 8], [7, 9], [8, 6],
    [13, 11], [10, 12], [11, 13], [12, 10],
];

/// Returns the side the agent enters the following cell from, or `None` if
/// the shape is a dead end for this entry side.
pub fn next_direction(ty: CellType, enter: Direction) -> Option<Direction> {
    TRANSITIONS[ty.get() as usize][enter as usize]
}

impl CellType {
    pub fn orbit(self) -> Orbit {
        let members: &[u8] = match self.get() {
            0 | 1 => return [self].into_iter().collect(),
            2 | 3 => &[2, 3],
            4 | 5 => &[4, 5],
            6..=9 => &[6, 7, 8, 9],
            _ => &[10, 11, 12, 13],
        };
        members.iter().map(|&ty| CellType(ty)).collect()
    }

    pub fn is_rotatable(self) -> bool {
        self.orbit().len() > 1
    }

    pub fn rotated(self, rotation: Rotation) -> CellType {
        CellType(ROTATIONS[self.get() as usize][rotation as usize])
    }
}

impl Cell {
    /// Shapes this cell can be turned into, honoring the lock.
    pub fn orbit(self) -> Orbit {
        if self.locked {
            [self.ty].into_iter().collect()
        } else {
            self.ty.orbit()
        }
    }
}
