//! Plays one game between the reference strategies on a small demo board, and prints the
//! report as JSON.
//!
//! Logs go to stderr, filtered through `RUST_LOG` (e.g. `RUST_LOG=info`).

use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use trains::board::{Board, RailConnection, SegmentLength};
use trains::city::City;
use trains::color::RailColor;
use trains::config::RefereeConfig;
use trains::referee::RefereeBuilder;
use trains::strategy::{BuyNow, Cheat, Hold10, StrategyParticipant};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with the game parameters. Missing parameters take their default value.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed of the deck and of the destinations, overriding the configuration's.
    #[arg(long)]
    seed: Option<u64>,
    /// Time each participant has to answer, in milliseconds, overriding the configuration's.
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Leaves the cheating participant out of the game.
    #[arg(long)]
    without_cheat: bool,
}

fn demo_board() -> Result<Board, Box<dyn Error>> {
    let cities = [
        City::new("Seattle", 10, 10),
        City::new("Portland", 10, 60),
        City::new("Boise", 120, 70),
        City::new("Helena", 220, 20),
        City::new("Salt Lake City", 200, 150),
        City::new("Denver", 300, 180),
        City::new("Las Vegas", 150, 250),
    ];

    let find = |name: &str| {
        cities
            .iter()
            .find(|city| city.name() == name)
            .ok_or_else(|| format!("Unknown demo city `{}`.", name))
    };

    let connection = |a: &str, b: &str, length: u8, color: RailColor| -> Result<_, String> {
        let (a, b) = (find(a)?, find(b)?);
        let length = SegmentLength::try_from(length)?;
        RailConnection::between(a, b, length, color)
            .ok_or_else(|| format!("Demo connection {}-{} loops on itself.", a, b))
    };

    let connections = [
        connection("Seattle", "Portland", 3, RailColor::Red)?,
        connection("Seattle", "Portland", 3, RailColor::Blue)?,
        connection("Seattle", "Helena", 5, RailColor::Green)?,
        connection("Portland", "Boise", 5, RailColor::White)?,
        connection("Boise", "Helena", 4, RailColor::Red)?,
        connection("Boise", "Salt Lake City", 3, RailColor::Blue)?,
        connection("Helena", "Denver", 5, RailColor::White)?,
        connection("Salt Lake City", "Denver", 4, RailColor::Green)?,
        connection("Salt Lake City", "Las Vegas", 3, RailColor::Red)?,
        connection("Las Vegas", "Denver", 5, RailColor::Blue)?,
    ];

    Ok(Board::new(cities, connections)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config: RefereeConfig = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => RefereeConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.call_timeout_ms = timeout_ms;
    }

    let mut builder = RefereeBuilder::new(demo_board()?)
        .config(config)
        .participant("buy-now", Box::new(StrategyParticipant::new(BuyNow)))
        .participant("hold-10", Box::new(StrategyParticipant::new(Hold10)));
    if !args.without_cheat {
        builder = builder.participant("cheat", Box::new(StrategyParticipant::new(Cheat)));
    }

    let report = builder.build()?.play_game();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
