use std::{fs::File, io::BufWriter, path::PathBuf};

use anyhow::Context as _;
use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;

use blockfall_store::{HttpWeightStore, MemoryWeightStore, WeightStore};
use blockfall_training::{CancelToken, Trainer};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Weight endpoint (host:port); the result is only printed when omitted
    #[arg(long)]
    server: Option<String>,
    /// Number of self-play games in the session
    #[arg(long, default_value_t = 100)]
    games: usize,
    /// Seed for the training RNG; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Write the training report as JSON to this path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let store: Box<dyn WeightStore> = match &arg.server {
        Some(server) => Box::new(HttpWeightStore::new(server.clone())),
        None => Box::new(MemoryWeightStore::default()),
    };

    let stored = store.load_or_default();
    eprintln!(
        "Starting training session: {} games from generation {}",
        arg.games, stored.generation,
    );

    let mut rng = match arg.seed {
        Some(seed) => Pcg64Mcg::seed_from_u64(seed),
        None => Pcg64Mcg::from_os_rng(),
    };
    let mut trainer = Trainer::new(stored.weights, stored.generation, arg.games);
    let report = trainer.run(&mut rng, &CancelToken::new());

    eprintln!("Training complete:");
    eprintln!("  Games:      {}", report.games_played);
    eprintln!("  Best score: {}", report.best_score);
    eprintln!("  Generation: {}", report.generation);
    eprintln!("  Weights:    {:?}", report.weights);

    if let Some(path) = &arg.output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report file: {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &report)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        eprintln!("  Report:     {}", path.display());
    }

    store
        .save(&report.weights, report.generation)
        .context("Failed to persist trained weights")?;
    eprintln!("Weights saved (generation {})", report.generation);

    Ok(())
}
