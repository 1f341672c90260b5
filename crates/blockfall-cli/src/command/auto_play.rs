use std::time::Duration;

use serde::Serialize;

use blockfall_engine::{GameSession, GameStats, PieceGenerator};
use blockfall_evaluator::select_placement;
use blockfall_store::{HttpWeightStore, MemoryWeightStore, WeightStore};

use crate::sync::WeightSync;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Weight endpoint (host:port); built-in defaults when omitted
    #[arg(long)]
    server: Option<String>,
    /// Maximum number of placements before the game is stopped
    #[arg(long, default_value_t = 1000)]
    moves: usize,
    /// Seed for the piece stream; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Interval between weight re-reads, in milliseconds
    #[arg(long, default_value_t = 1000)]
    sync_interval_ms: u64,
}

impl Default for AutoPlayArg {
    fn default() -> Self {
        Self {
            server: None,
            moves: 1000,
            seed: None,
            sync_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Serialize)]
struct PlaySummary<'a> {
    moves: usize,
    game_over: bool,
    generation: u64,
    stats: &'a GameStats,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let store: Box<dyn WeightStore> = match &arg.server {
        Some(server) => Box::new(HttpWeightStore::new(server.clone())),
        None => Box::new(MemoryWeightStore::default()),
    };

    let mut current = store.load_or_default();
    tracing::info!(generation = current.generation, "starting auto-play");

    let generator = match arg.seed {
        Some(seed) => PieceGenerator::from_seed(seed),
        None => PieceGenerator::new(),
    };
    let mut session = GameSession::new(generator);
    let mut sync = WeightSync::new(Duration::from_millis(arg.sync_interval_ms));

    let mut moves = 0;
    while session.state().is_playing() && moves < arg.moves {
        if let Some(update) = sync.poll(store.as_ref(), &current) {
            current = update;
        }

        match select_placement(session.board(), session.active_piece(), &current.weights) {
            Some(placement) => {
                session.apply_placement(&placement)?;
                moves += 1;
            }
            None => {
                tracing::debug!(
                    piece = %session.active_piece().as_char(),
                    "no legal placement left",
                );
                session.mark_game_over();
            }
        }
    }
    sync.cancel();

    let summary = PlaySummary {
        moves,
        game_over: session.state().is_game_over(),
        generation: current.generation,
        stats: session.stats(),
    };
    serde_json::to_writer_pretty(std::io::stdout().lock(), &summary)?;
    println!();

    tracing::info!(
        moves,
        score = session.stats().score(),
        lines = session.stats().total_cleared_lines(),
        "auto-play finished",
    );
    Ok(())
}
