use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use codonsoup::config::{AppConfig, ConfigManager};
use codonsoup::engines::generation::{EvolutionEngine, LogProgressCallback, RunSummary};
use codonsoup::pool::{GenePool, JsonFileStore, LocalPoolService, PoolService, PoolStore};
use log::{info, LevelFilter};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

#[derive(Parser, Debug)]
#[command(name = "codonsoup", version, about = "Distributed artificial-life evolution over circular genomes")]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: LevelFilter,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run evolution clients against a shared gene pool
    Run(RunArgs),
    /// Print pool status and gene statistics of a pool snapshot
    Stats {
        #[arg(long)]
        pool_file: PathBuf,
    },
    /// Write the effective configuration as TOML
    InitConfig {
        path: PathBuf,
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Number of independent clients, each with its own world
    #[arg(long, default_value_t = 1)]
    clients: usize,
    /// Run without a gene pool
    #[arg(long)]
    offline: bool,
    /// JSON pool snapshot, loaded on start and saved on exit
    #[arg(long)]
    pool_file: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    generations: Option<usize>,
    #[arg(long)]
    ticks: Option<usize>,
    #[arg(long)]
    population: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet { LevelFilter::Warn } else { cli.log_level };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Run(args) => run(args),
        Commands::Stats { pool_file } => stats(pool_file),
        Commands::InitConfig { path, config } => {
            let manager = ConfigManager::with_config(
                AppConfig::load_layered(config.as_deref()).context("failed to load configuration")?,
            );
            manager
                .save_to_file(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote configuration to {}", path.display());
            Ok(())
        }
    }
}

fn run(args: RunArgs) -> Result<()> {
    if args.clients == 0 {
        bail!("--clients must be at least 1");
    }

    let manager = ConfigManager::with_config(
        AppConfig::load_layered(args.config.as_deref()).context("failed to load configuration")?,
    );
    manager
        .update(|c| {
            if let Some(g) = args.generations {
                c.evolution.generations = g;
            }
            if let Some(t) = args.ticks {
                c.evolution.ticks_per_generation = t;
            }
            if let Some(p) = args.population {
                c.evolution.population_size = p;
            }
            if args.seed.is_some() {
                c.evolution.seed = args.seed;
            }
        })
        .context("invalid command-line override")?;
    let config = manager.get();

    let store = args.pool_file.as_ref().map(JsonFileStore::new);
    let pool = Arc::new(match &store {
        Some(store) => store
            .restore(&config.pool)
            .with_context(|| format!("failed to load pool from {}", store.path().display()))?,
        None => GenePool::new(&config.pool),
    });
    let service: Arc<dyn PoolService> = Arc::new(LocalPoolService::new(pool.clone()));

    info!(
        "starting {} client(s){}: {} generations x {} ticks, population {}",
        args.clients,
        if args.offline { " offline" } else { "" },
        config.evolution.generations,
        config.evolution.ticks_per_generation,
        config.evolution.population_size
    );

    let mut handles = Vec::with_capacity(args.clients);
    for i in 0..args.clients {
        let mut client_config = config.clone();
        client_config.evolution.seed = config.evolution.seed.map(|s| s.wrapping_add((i as u64) << 32));
        let client_id = format!("soup_{}", i);
        let service = (!args.offline).then(|| service.clone());

        let handle = thread::Builder::new()
            .name(client_id.clone())
            .spawn(move || -> codonsoup::Result<RunSummary> {
                let mut engine = EvolutionEngine::new(client_config, client_id.clone())?;
                if let Some(service) = service {
                    engine = engine.with_service(service);
                }
                Ok(engine.run(&mut LogProgressCallback::new(client_id)))
            })
            .context("failed to spawn client thread")?;
        handles.push(handle);
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let summary = match handle.join() {
            Ok(result) => result.with_context(|| format!("client soup_{} failed", i))?,
            Err(_) => bail!("client soup_{} panicked", i),
        };
        info!(
            "soup_{}: {} generations, best fitness {:.4}, {} submitted, {} dropped",
            i, summary.generations, summary.best_fitness, summary.submitted, summary.dropped
        );
    }

    if !args.offline {
        let status = pool.pool_status();
        info!(
            "pool: {} / {} genomes, top fitness {:.4}, avg fitness {:.4}, avg length {:.1}",
            status.total_genomes, status.capacity, status.top_fitness, status.avg_fitness, status.avg_genome_length
        );
    }

    if let Some(store) = store {
        store
            .save(&pool.snapshot())
            .with_context(|| format!("failed to save pool to {}", store.path().display()))?;
        info!("saved {} genomes to {}", pool.len(), store.path().display());
    }

    Ok(())
}

fn stats(pool_file: PathBuf) -> Result<()> {
    let config = AppConfig::load_layered(None).context("failed to load configuration")?;
    let store = JsonFileStore::new(&pool_file);
    let pool = store
        .restore(&config.pool)
        .with_context(|| format!("failed to load pool from {}", pool_file.display()))?;

    let report = json!({
        "pool_status": pool.pool_status(),
        "gene_stats": pool.gene_stats(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
