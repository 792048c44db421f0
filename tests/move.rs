use std::fmt::Write;

use anyhow::Context;
use common::*;
use pipe_solver::solve;
use pipe_solver::Game;

mod common;

fn main() {
    run_tests("move", |content| {
        let input = split_input(content);
        let game = input.parse::<Game>().context("Invalid game")?;

        let mut got = format!("{input}\n\n{SEPARATOR}");
        let visited = solve::trace(&game.grid, game.entry, game.enter)
            .context("Agent does not reach the exit")?;
        for pos in visited {
            writeln!(got, "{pos}").unwrap();
        }
        Ok(got)
    });
}
