//! The turn-by-turn protocol: one initialization block, then per turn the
//! agent's position, a rock count and that many rock positions. Each turn is
//! answered with one command or `WAIT`.

use std::io::Write;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::solve::{self, SolveError};
use crate::{Command, Game, Grid, Turn};

/// Runs the protocol until `lines` ends, returning the grid with every sent
/// command applied.
///
/// The route is searched once, on the first turn. An unreachable exit is
/// answered with `WAIT` for the rest of the game; any other search failure
/// stops the loop.
pub fn play<I, S, W>(lines: I, out: &mut W) -> Result<Grid>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    W: Write,
{
    let mut lines = lines.into_iter();
    let mut grid = Grid::from_lines(&mut lines).context("Failed to read the grid")?;
    debug!("grid:\n{grid}");

    let mut commands = None;
    let mut turn_cnt = 0;
    while let Some(line) = lines.next() {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        let turn = line.parse::<Turn>().context("Invalid agent position")?;
        if commands.is_none() {
            commands = Some(first_turn(&grid, turn)?);
        }

        let rocks_line = lines.next().context("Missing rock count")?;
        let rocks_line = rocks_line.as_ref().trim();
        let rocks = rocks_line
            .parse::<usize>()
            .with_context(|| format!("Invalid rock count: {rocks_line:?}"))?;
        for i in 0..rocks {
            lines
                .next()
                .with_context(|| format!("Missing rock {i}"))?
                .as_ref()
                .parse::<Turn>()
                .with_context(|| format!("Invalid rock {i}"))?;
        }

        match commands.as_deref().unwrap_or_default().get(turn_cnt) {
            Some(command) => {
                writeln!(out, "{command}")?;
                grid.apply(command)
                    .with_context(|| format!("Failed to apply {command}"))?;
                debug!(%command, cell = %grid[command.pos], "rotated");
            }
            None => writeln!(out, "WAIT")?,
        }
        out.flush()?;
        turn_cnt += 1;
    }
    Ok(grid)
}

fn first_turn(grid: &Grid, turn: Turn) -> Result<Vec<Command>> {
    let game = Game {
        grid: grid.clone(),
        entry: turn.pos,
        enter: turn.enter,
    };
    match solve::search(&game, || {}) {
        Ok(solution) => {
            info!(
                expanded = solution.expanded,
                commands = solution.commands.len(),
                "path found"
            );
            Ok(solution.commands)
        }
        Err(SolveError::Unreachable) => {
            warn!("no route to the exit, waiting out the game");
            Ok(Vec::new())
        }
        Err(err) => Err(err).context("Search failed on the first turn"),
    }
}
