use std::path::{Path, PathBuf};

use clap::Parser;
use rand::thread_rng;
use uuid::Uuid;

use engine::GameSession;
use lobby::{record_unrated, SeasonRating};
use simulation::{load_players, runner, SimulationConfig};
use strategies::{GreedyStrategy, RandomStrategy};

#[derive(Parser, Debug)]
struct Params {
    /// Path to the player-pool JSON file.
    #[arg(short, long)]
    pool: Option<String>,

    /// Optional YAML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rated bot matches to run (overrides config).
    #[arg(short, long)]
    matches: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Params::parse();
    log::info!("args: {args:?}");

    let config = SimulationConfig::from_cli_or_env_or_yaml(args.pool, args.config.as_deref());
    let pool = load_players(Path::new(&config.pool_file), config.source)?;

    let season_id = 1;
    let mut host = SeasonRating::new(Uuid::new_v4(), season_id);
    let mut guest = SeasonRating::new(Uuid::new_v4(), season_id);
    let mut rng = thread_rng();

    let rounds = args.matches.unwrap_or(config.matches);
    for round in 1..=rounds {
        let record = runner::run_rated_match(
            &pool,
            config.grid_size,
            config.difficulty,
            &mut host,
            &mut guest,
            &mut GreedyStrategy::default(),
            &mut RandomStrategy::default(),
            config.seconds_per_turn,
            &mut rng,
        )?;
        match record {
            Some(record) => log::info!(
                "round {round}: {} won (±{:.1}); ratings now {:.0} vs {:.0} ({} / {})",
                record.winner_id,
                record.rating_delta,
                host.rating,
                guest.rating,
                host.tier(),
                guest.tier()
            ),
            None => {
                log::info!("round {round}: ratings drifted out of the pairing window, stopping");
                break;
            }
        }
    }

    let mut solo = GameSession::new(&pool, config.grid_size, config.difficulty)?;
    let report = runner::run_session(&mut solo, &mut GreedyStrategy::default(), config.seconds_per_turn);
    record_unrated(&mut host, &report.player_result());
    log::info!(
        "solo: score {} at {:.0}% accuracy in {:.0}s ({:?}); {} games on record",
        report.score,
        report.accuracy,
        report.elapsed_seconds,
        report.reason,
        host.total_games
    );
    Ok(())
}
