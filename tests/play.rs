use pipe_solver::play::play;
use pipe_solver::{CellType, Pos};

fn run(input: &str) -> anyhow::Result<(pipe_solver::Grid, String)> {
    let mut out = Vec::new();
    let grid = play(input.lines(), &mut out)?;
    Ok((grid, String::from_utf8(out).unwrap()))
}

#[test]
fn sends_commands_then_waits() {
    let input = "2 2\n5 4\n0 3\n1\n0 0 TOP\n0\n1 0 LEFT\n1\n1 1 TOP\n1 1 TOP\n0\n";
    let (grid, out) = run(input).unwrap();
    assert_eq!(out, "0 1 RIGHT\nWAIT\nWAIT\n");
    assert_eq!(grid[Pos(0, 1)].ty, CellType::new(5).unwrap());
}

#[test]
fn unreachable_exit_waits_every_turn() {
    let input = "2 2\n1 0\n0 1\n1\n0 0 TOP\n0\n1 0 TOP\n0\n";
    let (grid, out) = run(input).unwrap();
    assert_eq!(out, "WAIT\nWAIT\n");
    assert_eq!(grid.to_string(), "2 2\n1 0\n0 1\n1");
}

#[test]
fn search_failure_stops_the_game() {
    let input = "2 2\n1 1\n1 1\n0\n5 5 TOP\n0\n";
    let err = run(input).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("outside the grid"), "{msg}");
}

#[test]
fn missing_rock_is_an_error() {
    let input = "2 2\n1 1\n1 1\n0\n0 0 TOP\n2\n1 1 TOP\n";
    let err = run(input).unwrap_err();
    assert!(format!("{err:#}").contains("Missing rock 1"));
}
