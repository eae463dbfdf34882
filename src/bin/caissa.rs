use caissa::{ChessField, ChessMatch, Color, Piece};

use clap::arg;
use clap::command;
use clap::Command;

use rand::prelude::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

use std::io::{stdin, BufRead};

use tabled::settings::Style;
use tabled::Table;
use tabled::Tabled;

use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = command!()
        .propagate_version(true)
        .subcommand(Command::new("play").about("Play a game on the console"))
        .subcommand(
            Command::new("selfplay")
                .about("Random self-play until checkmate")
                .arg(
                    arg!(
                        -s --seed <SEED> "RNG seed"
                    )
                    .default_value("42")
                    .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(
                        -t --turns <N> "Give up after that many turns"
                    )
                    .default_value("300")
                    .value_parser(clap::value_parser!(u32)),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("selfplay", arg_matches)) => {
            let seed = *arg_matches.get_one::<u64>("seed").unwrap();
            let turns = *arg_matches.get_one::<u32>("turns").unwrap();
            selfplay(seed, turns);
        }
        Some(("play", _)) | None => {
            play();
        }
        _ => unreachable!("Exhausted list of subcommands"),
    }
}

fn play() {
    let mut game = ChessMatch::standard();
    println!("{}", game.board().render_to_string());
    println!("Turn {}: {} to move (e.g. 'e2 e4', 'quit' to stop)", game.turn(), game.active_color());

    for line in stdin().lock().lines() {
        let line = match line {
            Ok(l) => l.trim().to_string(),
            Err(_) => continue,
        };
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            break;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (source, target) = match parse_move(&tokens) {
            Some(squares) => squares,
            None => {
                println!("Expected a move like 'e2 e4' or 'e2e4'");
                continue;
            }
        };

        match game.perform_move(source, target) {
            Ok(captured) => {
                if let Some(piece) = captured {
                    println!("Captured the {} {}", piece.color, piece.kind.name());
                }
                println!("{}", game.board().render_to_string());
                if game.is_checkmate() {
                    println!("Checkmate — {} wins on turn {}.", game.active_color(), game.turn());
                    print_ledger(&game);
                    return;
                }
                if game.is_check() {
                    println!("Check!");
                }
                println!("Turn {}: {} to move", game.turn(), game.active_color());
            }
            Err(error) => println!("Illegal move: {}", error),
        }
    }
}

fn parse_move(tokens: &[&str]) -> Option<(ChessField, ChessField)> {
    match tokens {
        [from, to] => Some((
            ChessField::try_from_algebraic(from)?,
            ChessField::try_from_algebraic(to)?,
        )),
        [single] if single.len() == 4 => Some((
            ChessField::try_from_algebraic(&single[..2])?,
            ChessField::try_from_algebraic(&single[2..])?,
        )),
        _ => None,
    }
}

#[derive(Tabled)]
struct CaptureRow {
    turn: u32,
    mover: String,
    from: String,
    to: String,
    captured: String,
}

fn selfplay(seed: u64, max_turns: u32) {
    let mut rng = Pcg64Mcg::seed_from_u64(seed);
    let mut game = ChessMatch::standard();
    let mut capture_rows = Vec::new();

    loop {
        if game.turn() > max_turns {
            println!("No checkmate within {} turns.", max_turns);
            break;
        }
        let turn = game.turn();
        let mover = game.active_color();

        match random_move(&mut game, &mut rng) {
            Some((source, target, captured)) => {
                if let Some(piece) = captured {
                    capture_rows.push(CaptureRow {
                        turn,
                        mover: mover.to_string(),
                        from: source.as_algebraic(),
                        to: target.as_algebraic(),
                        captured: format!("{} {}", piece.color, piece.kind.name()),
                    });
                }
            }
            None => {
                // Not in check but no reply survives king safety: a stalemate
                // shape, which this engine does not score
                println!("{} has no legal move — stopping.", game.active_color());
                break;
            }
        }

        if game.is_checkmate() {
            println!("{}", game.board().render_to_string());
            println!("Checkmate — {} wins on turn {}.", game.active_color(), game.turn());
            break;
        }
    }

    if !capture_rows.is_empty() {
        println!("{}", Table::new(capture_rows).with(Style::modern()));
    }
    print_ledger(&game);
}

/// Plays one uniformly random legal move for the player on turn. The raw
/// reachable matrices provide the candidates; `perform_move` arbitrates
/// king safety.
fn random_move(
    game: &mut ChessMatch,
    rng: &mut Pcg64Mcg,
) -> Option<(ChessField, ChessField, Option<Piece>)> {
    let sources: Vec<ChessField> = game
        .board()
        .pieces_of_color(game.active_color())
        .map(|(field, _)| field)
        .collect();

    let mut candidates: Vec<(ChessField, ChessField)> = Vec::new();
    for source in sources {
        if let Ok(reachable) = game.possible_moves(source) {
            candidates.extend(reachable.iter().map(|target| (source, target)));
        }
    }
    candidates.shuffle(rng);

    for (source, target) in candidates {
        if let Ok(captured) = game.perform_move(source, target) {
            return Some((source, target, captured));
        }
    }
    None
}

fn print_ledger(game: &ChessMatch) {
    let mut white = String::new();
    let mut black = String::new();
    for piece in game.captured_pieces() {
        match piece.color {
            Color::White => white.push(piece.to_char()),
            Color::Black => black.push(piece.to_char()),
        }
    }
    println!("Captured white pieces: [{}]", white);
    println!("Captured black pieces: [{}]", black);
}
