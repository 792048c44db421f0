use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use pipe_solver::solve;
use pipe_solver::{play, Command, Game};
use rayon::prelude::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pipe-solver")]
#[command(about = "Rotate pipe cells so the agent falls through to the exit")]
struct Cli {
    /// Log more to stderr (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve game files and print their rotation commands
    Solve {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Replay each solution on its grid and check that the agent exits
        #[arg(long)]
        verify: bool,
        #[arg(long)]
        no_progress: bool,
    },
    /// Answer the turn-by-turn protocol on stdin/stdout
    Play,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    match cli.action {
        Action::Solve {
            paths,
            verify,
            no_progress,
        } => solve_files(&paths, verify, !no_progress),
        Action::Play => play_stdio(),
    }
}

fn solve_files(paths: &[PathBuf], verify: bool, progress: bool) -> Result<()> {
    let bar = if progress {
        ProgressBar::new(paths.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    bar.set_style(ProgressStyle::with_template(
        "{elapsed_precise} [{bar:40}] {pos}/{len} {msg}",
    )?);

    let results = paths
        .par_iter()
        .map(|path| {
            let ret = solve_file(path, verify, &bar);
            bar.inc(1);
            ret
        })
        .collect::<Vec<_>>();
    bar.finish_and_clear();

    let mut failed_cnt = 0;
    for (path, ret) in paths.iter().zip(&results) {
        match ret {
            Ok(commands) => {
                println!("{}", path.display());
                for command in commands {
                    println!("{command}");
                }
                eprintln!("{}: {}", path.display(), style("OK").green());
            }
            Err(err) => {
                eprintln!("{}: {}\n{err:?}", path.display(), style("FAILED").red());
                failed_cnt += 1;
            }
        }
    }

    ensure!(
        failed_cnt == 0,
        "{failed_cnt}/{} games failed",
        paths.len()
    );
    Ok(())
}

fn solve_file(path: &Path, verify: bool, bar: &ProgressBar) -> Result<Vec<Command>> {
    let data = std::fs::read_to_string(path).context("Failed to read the game")?;
    let game = data.parse::<Game>().context("Failed to parse the game")?;

    let mut steps = 0u64;
    let solution = solve::search(&game, || {
        steps += 1;
        if steps % 4096 == 0 {
            bar.tick();
        }
    })?;
    debug!(
        path = %path.display(),
        expanded = solution.expanded,
        commands = solution.commands.len(),
        "solved"
    );

    if verify {
        solve::replay(&game, &solution.commands).context("Solution does not reach the exit")?;
    }
    Ok(solution.commands)
}

fn play_stdio() -> Result<()> {
    let lines = io::stdin().lock().lines().map_while(Result::ok);
    play::play(lines, &mut io::stdout().lock())?;
    Ok(())
}
