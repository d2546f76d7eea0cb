//! Fog Chess - play the engine on the triangular board

use clap::Parser;
use log::{error, info};
use std::error::Error;
use std::io::{self, BufRead, Write};

use fog_chess::core::board::{Coord, Side};
use fog_chess::core::moves::Move;
use fog_chess::play::{Outcome, Session};
use fog_chess::SearchLimits;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seconds the engine may think per move
    #[arg(long, default_value_t = 30)]
    movetime: u64,
    /// Deepest search iteration
    #[arg(long, default_value_t = 10)]
    depth: u32,
    /// Node budget per move
    #[arg(long)]
    nodes: Option<u64>,
    /// Let a random opponent play instead of reading moves from stdin
    #[arg(long)]
    self_play: bool,
    /// Stop after this many plies
    #[arg(long)]
    max_plies: Option<u32>,
}

impl Args {
    fn limits(&self) -> SearchLimits {
        SearchLimits {
            depth: Some(self.depth),
            nodes: self.nodes,
            movetime: Some(self.movetime.saturating_mul(1000)),
            infinite: false,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut session = Session::new(args.limits());
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Fog Chess - you play the lower-case pieces and move first");

    loop {
        if let Some(max) = args.max_plies {
            if session.plies() >= max {
                info!("ply limit {} reached", max);
                break;
            }
        }
        if report_outcome(session.outcome(Side::Them)) {
            break;
        }

        print!("{}", session.opponent_view().render());
        let mv = if args.self_play {
            match session.random_opponent_move() {
                Some(mv) => mv,
                None => break,
            }
        } else {
            match read_move(&mut lines)? {
                Some(mv) => mv,
                None => break,
            }
        };

        if let Err(e) = session.play_opponent(mv) {
            error!("{}", e);
            if args.self_play {
                return Err(e.into());
            }
            continue;
        }
        info!("you played {}", mv);
        print!("{}", session.opponent_view().render());

        if report_outcome(session.outcome(Side::Us)) {
            break;
        }
        match session.engine_reply()? {
            Some(mv) => info!("engine played {}", mv),
            None => break,
        }
    }

    Ok(())
}

/// Print the result and return true once the game is over
fn report_outcome(outcome: Outcome) -> bool {
    match outcome {
        Outcome::Ongoing => false,
        Outcome::KingLost(Side::Us) => {
            println!("The engine lost its king. You win!");
            true
        }
        Outcome::KingLost(Side::Them) => {
            println!("You lost your king. The engine wins.");
            true
        }
        Outcome::NoMoves(side) => {
            println!("{:?} has no legal move. Game over.", side);
            true
        }
    }
}

/// Read a piece cell and a target cell, one `row,col` per line
fn read_move<B: BufRead>(lines: &mut io::Lines<B>) -> io::Result<Option<Move>> {
    let Some(from) = prompt(lines, "select piece")? else {
        return Ok(None);
    };
    let Some(to) = prompt(lines, "select target")? else {
        return Ok(None);
    };
    Ok(Some(Move::new(from, to)))
}

fn prompt<B: BufRead>(lines: &mut io::Lines<B>, label: &str) -> io::Result<Option<Coord>> {
    loop {
        println!("{}", label);
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(None);
        };
        match line?.parse::<Coord>() {
            Ok(coord) => return Ok(Some(coord)),
            Err(e) => println!("{}", e),
        }
    }
}
