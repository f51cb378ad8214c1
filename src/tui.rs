//! The Textual User Interface for the Xiangqi engine.

use anyhow::{Context, bail};
use crossterm::style::Stylize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use xiangqi_engine::constants::{COLS, ROWS};
use xiangqi_engine::{Board, Config, Engine, Game, Move, Side, Snapshot, Square};

/// Startup options collected from the command line.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub computer: Option<Side>,
    pub load: Option<PathBuf>,
    pub seed: Option<u64>,
}

/// A line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(Square, Square),
    Moves(Square),
    Undo,
    Replay,
    Live,
    First,
    Last,
    Step(isize),
    Seek(usize),
    Resume,
    Save(PathBuf),
    Load(PathBuf),
    New,
    Board,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  h2e2           move from h2 to e2 (files a-i, ranks 0-9 from Red's side)
  moves h2       list legal moves of the piece on h2
  undo           take back the last turn
  replay         browse the game from the first position
  first | last | prev | next | jump N | seek N
                 move through the game while browsing
  resume         continue playing from the position being browsed
  live           stop browsing and return to the current position
  save FILE      write the game record as JSON
  load FILE      read a game record and browse it
  new            start a new game
  board | help | quit";

/// The engine plus its random source, moved onto a blocking thread per search.
struct Computer {
    engine: Engine,
    rng: StdRng,
}

impl Computer {
    fn think(&mut self, board: &Board, side: Side) -> Option<Move> {
        let depth = self.engine.config.search_depth();
        self.engine.choose_move(board, side, depth, &mut self.rng)
    }
}

/// Runs the main game loop for the text-based UI.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let mut game = Game::new(settings.computer);
    if let Some(path) = &settings.load {
        load_record(&mut game, path).await?;
    }

    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut computer = Computer { engine: Engine::new(settings.config), rng };

    println!("--- Xiangqi Engine in Rust ---");
    println!(
        "Difficulty: {}. Enter moves in algebraic notation (e.g., h2e2). Type 'help' for commands.",
        settings.config.difficulty
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_position(&game);
    loop {
        if let Some((board, side)) = game.search_request() {
            // --- Computer's Turn ---
            println!("Computer is thinking...");
            let (returned, chosen) = tokio::task::spawn_blocking(move || {
                let chosen = computer.think(&board, side);
                (computer, chosen)
            })
            .await
            .context("search task failed")?;
            computer = returned;

            if let Some(mv) = chosen {
                println!("Computer moves: {}", move_notation(mv));
                game.apply_move(mv)?;
                print_position(&game);
                continue;
            }
            // Fall through to the prompt instead of searching again.
            warn!("computer found no move");
            println!("Computer has no move. {}", game.is_game_over().to_string().bold());
        }

        // --- Player's Turn ---
        print!("{}> ", if game.is_replaying() { "replay" } else { "move" });
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => {
                if let Err(err) = execute(&mut game, command).await {
                    println!("{}", format!("Error: {:#}", err).red());
                }
            }
            Err(err) => println!("{}", err.to_string().red()),
        }
    }
    Ok(())
}

async fn execute(game: &mut Game, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Play(from, to) => {
            let mv = Move::new(from, to);
            if game.is_replaying() {
                bail!("browsing the record; use 'resume' or 'live' first");
            }
            game.apply_move(mv)?;
            print_position(game);
        }
        Command::Moves(from) => {
            let moves = game.legal_moves(from, game.side_to_move());
            if moves.is_empty() {
                println!("No legal moves from {}.", square_notation(from));
            } else {
                let list: Vec<String> = moves.iter().map(|&mv| move_notation(mv)).collect();
                println!("{}", list.join(" "));
            }
        }
        Command::Undo => match game.undo_last_turn() {
            0 => println!("Nothing to undo."),
            _ => print_position(game),
        },
        Command::Replay => {
            game.enter_replay();
            print_position(game);
        }
        Command::Live => {
            game.exit_replay();
            print_position(game);
        }
        Command::First => seek(game, 0)?,
        Command::Last => {
            let last = game.record().len() - 1;
            seek(game, last)?
        }
        Command::Step(delta) => {
            if game.step_replay(delta).is_none() {
                bail!("not browsing; use 'replay' first");
            }
            print_position(game);
        }
        Command::Seek(index) => seek(game, index)?,
        Command::Resume => {
            if !game.is_replaying() {
                bail!("not browsing; nothing to resume");
            }
            game.resume_from_replay();
            print_position(game);
        }
        Command::Save(path) => {
            let json = game.save()?;
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "record saved");
            println!("Saved {} positions to {}.", game.record().len(), path.display());
        }
        Command::Load(path) => {
            load_record(game, &path).await?;
            print_position(game);
        }
        Command::New => {
            game.new_game();
            print_position(game);
        }
        Command::Board => print_position(game),
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
    Ok(())
}

fn seek(game: &mut Game, index: usize) -> anyhow::Result<()> {
    if !game.is_replaying() {
        bail!("not browsing; use 'replay' first");
    }
    if game.seek_replay(index).is_none() {
        bail!("position {} is outside the record (0-{})", index, game.record().len() - 1);
    }
    print_position(game);
    Ok(())
}

async fn load_record(game: &mut Game, path: &Path) -> anyhow::Result<()> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    game.load(&json)
        .with_context(|| format!("loading {}", path.display()))?;
    println!("Loaded {} positions; browsing the last one.", game.record().len());
    Ok(())
}

/// Parses one line of input.
pub fn parse_command(line: &str) -> anyhow::Result<Command> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        bail!("empty command");
    };
    let arg = words.next();
    if words.next().is_some() {
        bail!("too many arguments; type 'help' for commands");
    }

    let command = match (head.to_ascii_lowercase().as_str(), arg) {
        ("moves", Some(sq)) => Command::Moves(parse_square(sq)?),
        ("undo", None) => Command::Undo,
        ("replay", None) => Command::Replay,
        ("live", None) => Command::Live,
        ("first", None) => Command::First,
        ("last", None) => Command::Last,
        ("prev", None) => Command::Step(-1),
        ("next", None) => Command::Step(1),
        ("jump", Some(n)) => Command::Step(n.parse().with_context(|| format!("bad step {:?}", n))?),
        ("seek", Some(n)) => Command::Seek(n.parse().with_context(|| format!("bad position {:?}", n))?),
        ("resume", None) => Command::Resume,
        ("save", Some(path)) => Command::Save(PathBuf::from(path)),
        ("load", Some(path)) => Command::Load(PathBuf::from(path)),
        ("new", None) => Command::New,
        ("board", None) => Command::Board,
        ("help", None) => Command::Help,
        ("quit" | "exit", None) => Command::Quit,
        (text, None) if text.len() == 4 => {
            let (from, to) = parse_move_string(text)?;
            Command::Play(from, to)
        }
        _ => bail!("unknown command {:?}; type 'help' for commands", line.trim()),
    };
    Ok(command)
}

/// Parses a move from algebraic notation (e.g., "h2e2").
fn parse_move_string(move_str: &str) -> anyhow::Result<(Square, Square)> {
    if !move_str.is_ascii() || move_str.len() != 4 {
        bail!("bad move {:?}", move_str);
    }
    Ok((parse_square(&move_str[..2])?, parse_square(&move_str[2..])?))
}

/// Parses a square such as "e2": file letter then rank counted from Red's side.
fn parse_square(text: &str) -> anyhow::Result<Square> {
    let bytes = text.as_bytes();
    if bytes.len() != 2 {
        bail!("bad square {:?}", text);
    }
    let file = bytes[0].to_ascii_lowercase();
    let rank = bytes[1];
    if !(b'a'..=b'i').contains(&file) || !rank.is_ascii_digit() {
        bail!("bad square {:?}", text);
    }
    let col = (file - b'a') as usize;
    let row = ROWS - 1 - (rank - b'0') as usize;
    Ok(Square::new(row, col)?)
}

/// Gets algebraic notation for a square.
fn square_notation(sq: Square) -> String {
    format!("{}{}", (b'a' + sq.col() as u8) as char, ROWS - 1 - sq.row())
}

fn move_notation(mv: Move) -> String {
    format!("{}{}", square_notation(mv.from), square_notation(mv.to))
}

fn print_position(game: &Game) {
    let snapshot = game.current_snapshot();
    println!();
    print!("{}", render_board(snapshot));

    if let Some(index) = game.replay_index() {
        println!("Browsing position {} of {}.", index, game.record().len() - 1);
    }
    if let Some(mv) = snapshot.last_move {
        println!("Last move: {}", move_notation(mv));
    }

    let outcome = game.is_game_over();
    if outcome.is_over() {
        println!("{}", outcome.to_string().bold());
    } else if xiangqi_engine::rules::is_in_check(&snapshot.board, snapshot.side_to_move) {
        println!("{} to move, in check.", snapshot.side_to_move);
    } else {
        println!("{} to move.", snapshot.side_to_move);
    }
}

fn render_board(snapshot: &Snapshot) -> String {
    let highlight = |sq: Square| snapshot.last_move.is_some_and(|mv| mv.from == sq || mv.to == sq);

    let mut out = String::new();
    for row in 0..ROWS {
        out.push_str(&format!("{} ", ROWS - 1 - row));
        for col in 0..COLS {
            let sq = Square::from_index(row * COLS + col);
            let cell = match snapshot.board.at(sq) {
                Some(piece) => {
                    let glyph = piece.glyph().to_string();
                    match piece.side {
                        Side::Red => glyph.red().bold(),
                        Side::Black => glyph.blue().bold(),
                    }
                }
                None => "\u{b7} ".to_string().dark_grey(),
            };
            let cell = if highlight(sq) { cell.on_dark_yellow() } else { cell };
            out.push_str(&format!("{} ", cell));
        }
        out.push('\n');
        if row == 4 {
            out.push_str("  ~~~~~~~~~ river ~~~~~~~~~\n");
        }
    }
    out.push_str("  a  b  c  d  e  f  g  h  i\n");
    out
}
