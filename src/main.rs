use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use xiangqi_engine::{Config, Difficulty, Side};

pub mod tui;

/// Play Xiangqi against the computer in the terminal.
#[derive(Parser, Debug)]
#[command(name = "xiangqi", version, about)]
struct Args {
    /// Search difficulty: shallow, medium or deep.
    #[arg(short, long, default_value = "medium")]
    difficulty: Difficulty,

    /// Side played by the computer.
    #[arg(short, long, value_enum, default_value_t = Opponent::Black)]
    computer: Opponent,

    /// Root moves within this many points of the best count as ties.
    #[arg(long, default_value_t = 0)]
    tie_tolerance: u32,

    /// Seed for the tie-breaking random source.
    #[arg(long)]
    seed: Option<u64>,

    /// Game record to open for browsing at startup.
    #[arg(short, long)]
    load: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Opponent {
    Red,
    Black,
    /// Two players at one keyboard.
    None,
}

impl Opponent {
    fn side(self) -> Option<Side> {
        match self {
            Opponent::Red => Some(Side::Red),
            Opponent::Black => Some(Side::Black),
            Opponent::None => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Logs go to stderr so they never interleave with the board on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let settings = tui::Settings {
        config: Config {
            difficulty: args.difficulty,
            tie_tolerance: args.tie_tolerance,
        },
        computer: args.computer.side(),
        load: args.load,
        seed: args.seed,
    };
    tui::run(settings).await
}
