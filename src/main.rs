use anyhow::Result;
use clap::Parser;
use minesweeper_ai::{Cell, Game, GameConfig, GameState, Oracle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Autoplays minesweeper by logical deduction, guessing only when stuck
#[derive(Parser, Debug)]
#[command(name = "minesweeper-ai")]
#[command(version, long_about = None)]
struct Cli {
    /// Number of rows
    #[arg(long, default_value_t = 8)]
    height: usize,

    /// Number of columns
    #[arg(long, default_value_t = 8)]
    width: usize,

    /// Number of mines
    #[arg(short, long, default_value_t = 8)]
    mines: usize,

    /// Seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Number of games to play
    #[arg(short, long, default_value_t = 1)]
    games: usize,

    /// Only print the summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = GameConfig::new(cli.height, cli.width, cli.mines);
    config.validate()?;

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut wins = 0;
    for number in 1..=cli.games {
        let mut game = Game::new(&config, StdRng::seed_from_u64(rng.gen()))?;
        let stats = game.play()?;
        info!(
            game = number,
            won = stats.won,
            moves = stats.moves,
            random_moves = stats.random_moves,
            mines_flagged = stats.mines_flagged,
            "game finished"
        );

        if !cli.quiet {
            print_board(&game);
            println!("Mine locations:");
            print!("{}", game.board());
            match game.state() {
                GameState::Won => println!("Game {number}: won in {} moves", stats.moves),
                GameState::Lost => println!("Game {number}: lost after {} moves", stats.moves),
                GameState::Playing => println!("Game {number}: stuck after {} moves", stats.moves),
            }
        }
        if stats.won {
            wins += 1;
        }
    }

    println!(
        "Won {} of {} games ({:.1}%)",
        wins,
        cli.games,
        wins as f64 / cli.games.max(1) as f64 * 100.0
    );
    Ok(())
}

/// Prints the board as the agent sees it
fn print_board<R: Rng>(game: &Game<R>) {
    let board = game.board();
    let grid = board.grid();
    let revealed = game.agent().moves_made();

    // Print column numbers
    print!("   ");
    for col in 0..grid.width() {
        print!("{:>2}", col % 100);
    }
    println!();

    for row in 0..grid.height() {
        print!("{:>2} ", row);
        for col in 0..grid.width() {
            let cell = Cell::new(row, col);
            if revealed.contains(&cell) {
                match board.neighbor_mine_count(cell) {
                    0 => print!("  "),
                    n => print!(" {}", n),
                }
            } else if board.mines_found().contains(&cell) {
                print!(" ⚑");
            } else if game.state() == GameState::Lost && board.is_mine(cell) {
                print!(" *");
            } else {
                print!(" □");
            }
        }
        println!();
    }
}
