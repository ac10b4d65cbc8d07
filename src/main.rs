use anyhow::Result;
use clap::Parser;
use petri_core::config::AppConfig;
use petri_core::selection::SelectionPredicate;
use petri_lib::control::{Command, SimulationHandle, Update};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Number of generations to simulate
    #[arg(short, long, default_value_t = 10)]
    generations: u32,

    /// Survival predicate: left-half, right-half, lower-half, upper-half,
    /// vertical-borders or horizontal-borders
    #[arg(long)]
    predicate: Option<SelectionPredicate>,

    /// Override the configured world seed
    #[arg(long)]
    seed: Option<u64>,

    /// Stream per-step snapshots as JSON lines instead of running
    /// generations silently
    #[arg(long)]
    live: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    petri_core::metrics::init_logging();
    let args = Args::parse();

    let mut config = match std::fs::read_to_string(&args.config) {
        Ok(content) => AppConfig::from_toml(&content)?,
        Err(_) => {
            tracing::info!(path = %args.config, "config not found; using defaults");
            AppConfig::default()
        }
    };
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    if let Some(predicate) = args.predicate {
        config.evolution.predicate = predicate;
    }

    tracing::info!(
        width = config.world.width,
        height = config.world.height,
        population = config.world.population,
        genome_length = config.genome.length,
        steps = config.evolution.steps_per_generation,
        predicate = %config.evolution.predicate,
        fingerprint = %config.fingerprint(),
        "starting simulation"
    );

    let mut sim = SimulationHandle::spawn(&config)?;

    for _ in 0..args.generations {
        sim.send(Command::RunGeneration { live: args.live })?;
        while let Some(update) = sim.recv().await {
            match update {
                Update::Step(snapshot) => {
                    println!("{}", serde_json::to_string(&snapshot)?);
                }
                Update::GenerationComplete(snapshot) => {
                    println!(
                        "Gen {}: survival rate {:.1}%",
                        snapshot.generation,
                        snapshot.survival_rate * 100.0
                    );
                    break;
                }
                Update::GenerationAdvanced(_) => {}
            }
        }

        sim.send(Command::AdvanceGeneration)?;
        while let Some(update) = sim.recv().await {
            if matches!(update, Update::GenerationAdvanced(_)) {
                break;
            }
        }
    }

    Ok(())
}
