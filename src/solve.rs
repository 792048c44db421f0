use std::cmp::Reverse;
use std::collections::BinaryHeap;

use anyhow::{ensure, Context, Result};
use arrayvec::ArrayVec;
use thiserror::Error;
use tracing::debug;

use crate::{rules, CellType, Command, Direction, Game, Grid, Pos, Rotation};

type IndexMap<K, V> = indexmap::IndexMap<K, V, fxhash::FxBuildHasher>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error("no rotation of the grid routes the agent to the exit")]
    Unreachable,
    #[error("entry position {0} is outside the grid")]
    EntryOutOfBounds(Pos),
    #[error("cell {pos} cannot turn from type {original} into type {assumed}")]
    InconsistentRotation {
        pos: Pos,
        original: CellType,
        assumed: CellType,
    },
}

/// The agent standing in a cell, under the assumption that the cell has been
/// turned into `ty`.
///
/// Field order is the frontier order: entry side, then row and column, then
/// the assumed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualState {
    pub enter: Direction,
    pub pos: Pos,
    pub ty: CellType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Every state before the exit, entry first.
    pub path: Vec<VirtualState>,
    pub commands: Vec<Command>,
    /// Number of states taken off the frontier.
    pub expanded: usize,
}

/// Moves the agent out of `state`. The next state assumes the grid's shape.
pub fn step(grid: &Grid, state: VirtualState) -> Option<VirtualState> {
    let enter = rules::next_direction(state.ty, state.enter)?;
    let pos = grid.sibling_pos(state.pos, enter)?;
    Some(VirtualState {
        enter,
        pos,
        ty: grid[pos].ty,
    })
}

/// Best-first search over virtual states, ordered by [`VirtualState`]'s `Ord`.
///
/// Every reached cell branches into each shape of its rotation orbit. The
/// frontier is drained completely; among the states landing on the exit the
/// lowest-ordered one wins, ties going to the earliest discovered
/// predecessor. This is not necessarily the shortest route nor the one with
/// the fewest rotations.
pub fn search(game: &Game, mut on_step: impl FnMut()) -> Result<Solution, SolveError> {
    let grid = &game.grid;
    let start_cell = grid
        .cell_at(game.entry)
        .map_err(|_| SolveError::EntryOutOfBounds(game.entry))?;
    if game.entry == grid.exit() {
        return Ok(Solution {
            path: Vec::new(),
            commands: Vec::new(),
            expanded: 0,
        });
    }

    let start = VirtualState {
        enter: game.enter,
        pos: game.entry,
        ty: start_cell.ty,
    };
    debug!(?start, exit = ?grid.exit(), "search started");

    // Each visited state with the index of its predecessor.
    let mut state_parent = IndexMap::default();
    state_parent.insert(start, !0usize); // Sentinel.
    let mut frontier = BinaryHeap::new();
    frontier.push(Reverse((start, 0usize)));

    // Exit states with the index of the state they were reached from.
    let mut completed = BinaryHeap::new();

    let mut expanded = 0;
    while let Some(Reverse((cur, cur_idx))) = frontier.pop() {
        #[cfg(feature = "coz")]
        coz::scope!("Expand");

        on_step();
        expanded += 1;
        tracing::trace!(?cur, "expand");

        #[cfg(feature = "coz")]
        coz::progress!("Step");

        let Some(next) = step(grid, cur) else {
            tracing::trace!(?cur, "dead end");
            continue;
        };
        if next.pos == grid.exit() {
            completed.push(Reverse((next, cur_idx)));
            continue;
        }

        for ty in grid[next.pos].orbit() {
            let state = VirtualState { ty, ..next };
            if state_parent.contains_key(&state) {
                continue;
            }
            let (idx, _) = state_parent.insert_full(state, cur_idx);
            frontier.push(Reverse((state, idx)));
        }
    }

    let Some(Reverse((exit_state, last_idx))) = completed.pop() else {
        debug!(expanded, "frontier exhausted");
        return Err(SolveError::Unreachable);
    };

    let mut path = Vec::new();
    let mut cursor = last_idx;
    while let Some((&state, &parent)) = state_parent.get_index(cursor) {
        path.push(state);
        cursor = parent;
    }
    path.reverse();

    let commands = commands(grid, &path)?;
    debug!(
        expanded,
        ?exit_state,
        routes = completed.len() + 1,
        visited = state_parent.len(),
        path_len = path.len(),
        commands = commands.len(),
        "search finished"
    );
    Ok(Solution {
        path,
        commands,
        expanded,
    })
}

/// Quarter turns that bring `original` into `assumed`, or `None` if the two
/// shapes are not rotations of each other.
pub fn rotations_between(original: CellType, assumed: CellType) -> Option<ArrayVec<Rotation, 2>> {
    if !original.orbit().contains(&assumed) {
        return None;
    }
    let rotations: &[Rotation] = match assumed.get() as i8 - original.get() as i8 {
        0 => &[],
        1 | -3 => &[Rotation::Right],
        -1 | 3 => &[Rotation::Left],
        2 | -2 => &[Rotation::Right, Rotation::Right],
        _ => return None,
    };
    Some(rotations.iter().copied().collect())
}

/// Turns a path of virtual states into the rotations that realize it on
/// `grid`, entry first.
pub fn commands(grid: &Grid, path: &[VirtualState]) -> Result<Vec<Command>, SolveError> {
    let mut commands = Vec::new();
    for state in path {
        let cell = grid[state.pos];
        let rotations = rotations_between(cell.ty, state.ty)
            .filter(|rotations| !cell.locked || rotations.is_empty())
            .ok_or(SolveError::InconsistentRotation {
                pos: state.pos,
                original: cell.ty,
                assumed: state.ty,
            })?;
        commands.extend(rotations.into_iter().map(|rotation| Command {
            pos: state.pos,
            rotation,
        }));
    }
    Ok(commands)
}

/// Follows the agent through `grid` as it is, returning every visited
/// position up to and including the exit.
pub fn trace(grid: &Grid, entry: Pos, enter: Direction) -> Result<Vec<Pos>> {
    let mut state = VirtualState {
        enter,
        pos: entry,
        ty: grid.cell_at(entry)?.ty,
    };
    let mut visited = vec![entry];
    while state.pos != grid.exit() {
        state = step(grid, state).with_context(|| format!("Agent stops at {}", state.pos))?;
        visited.push(state.pos);
        ensure!(visited.len() <= grid.len(), "Agent never reaches the exit");
    }
    Ok(visited)
}

/// Rotates a copy of the game's grid by `commands` and checks that the agent
/// then reaches the exit.
pub fn replay(game: &Game, commands: &[Command]) -> Result<Vec<Pos>> {
    let mut grid = game.grid.clone();
    for (command, i) in commands.iter().zip(1..) {
        grid.apply(command)
            .with_context(|| format!("Failed to apply command {i} ({command})"))?;
    }
    trace(&grid, game.entry, game.enter)
}
