use std::str::FromStr;

use anyhow::{bail, ensure, Context, Result};

use crate::{Cell, Direction, Game, Grid, Pos};

/// A per-turn position line, `X Y SIDE`, as reported for the agent and for
/// rocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Turn {
    pub pos: Pos,
    pub enter: Direction,
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "LEFT" => Direction::Left,
            "RIGHT" => Direction::Right,
            "TOP" => Direction::Top,
            _ => bail!("Invalid direction: {s:?}"),
        })
    }
}

impl FromStr for Turn {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let mut next = |what: &str| tokens.next().with_context(|| format!("Missing {what}"));
        let col = next("column")?;
        let col = col
            .parse::<u8>()
            .with_context(|| format!("Invalid column: {col:?}"))?;
        let row = next("row")?;
        let row = row
            .parse::<u8>()
            .with_context(|| format!("Invalid row: {row:?}"))?;
        let enter = next("direction")?.parse()?;
        ensure!(tokens.next().is_none(), "Trailing tokens in {s:?}");
        Ok(Turn {
            pos: Pos(row, col),
            enter,
        })
    }
}

impl Grid {
    /// Reads the initialization block: `W H`, `H` rows of `W` cell values,
    /// then the exit column. Blank lines are skipped.
    pub fn from_lines<I, S>(lines: &mut I) -> Result<Self>
    where
        I: Iterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines = lines
            .map(|line| line.as_ref().trim().to_owned())
            .filter(|line| !line.is_empty());

        let header = lines.next().context("Missing grid size")?;
        let dims = header
            .split_whitespace()
            .map(str::parse::<u8>)
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Invalid grid size: {header:?}"))?;
        let [width, height] = dims[..] else {
            bail!("Invalid grid size: {header:?}");
        };
        ensure!(width > 0 && height > 0, "Empty grid: {width}x{height}");

        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            let line = lines
                .next()
                .with_context(|| format!("Missing grid row {row}"))?;
            let row_start = cells.len();
            for token in line.split_whitespace() {
                let raw = token
                    .parse::<i8>()
                    .with_context(|| format!("Invalid cell {token:?} in row {row}"))?;
                let cell = Cell::from_raw(raw)
                    .with_context(|| format!("Cell type {raw} out of range in row {row}"))?;
                cells.push(cell);
            }
            ensure!(
                cells.len() - row_start == width as usize,
                "Width mismatch of row {row}, expecting width {width}",
            );
        }

        let line = lines.next().context("Missing exit column")?;
        let exit_col = line
            .parse::<u8>()
            .with_context(|| format!("Invalid exit column: {line:?}"))?;
        Ok(Grid::new(width, height, cells, exit_col)?)
    }
}

impl FromStr for Game {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut lines = s.lines();
        let grid = Grid::from_lines(&mut lines)?;
        let line = lines
            .map(str::trim)
            .find(|line| !line.is_empty())
            .context("Missing agent position")?;
        let turn = line
            .parse::<Turn>()
            .context("Invalid agent position")?;
        ensure!(
            grid.contains(turn.pos),
            "Agent position {} is outside the grid",
            turn.pos,
        );
        Ok(Game {
            grid,
            entry: turn.pos,
            enter: turn.enter,
        })
    }
}
