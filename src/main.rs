use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pathvector_sim::engine_runner::{EngineRunConfig, EngineRunner};
use pathvector_sim::rendering::render_round;
use pathvector_sim::topology::{
    DemoTopology, FullMeshTopology, LineTopology, RandomTopology, RingTopology, TopologyGenerator,
};

#[derive(Parser)]
#[command(
    name = "pathvector-sim",
    about = "Round-based path-vector route propagation simulator",
    version
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Skip the per-round tables and show a progress bar instead
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Number of propagation rounds (config files carry their own default)
    #[arg(short, long, global = true)]
    rounds: Option<u32>,

    /// Directory receiving one subdirectory per run
    #[arg(short, long, global = true)]
    output_dir: Option<PathBuf>,

    /// Name of the run, used as the storage subdirectory
    #[arg(long, global = true)]
    name: Option<String>,

    /// Collect-phase worker threads (defaults to one per CPU)
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Write a Graphviz DOT file per round
    #[arg(long, global = true)]
    dot: bool,

    /// Also render PNGs with the `dot` executable
    #[arg(long, global = true)]
    png: bool,

    /// Replace results from an earlier run with the same name
    #[arg(long, global = true)]
    overwrite: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Four routers A-B-C-D with an extra B-D link
    Demo,

    /// Routers chained in a line
    Line {
        #[arg(short = 'n', long, default_value = "4")]
        routers: usize,

        /// Every router originates a prefix, not just the first
        #[arg(long)]
        originate_all: bool,
    },

    /// Routers connected in a ring
    Ring {
        #[arg(short = 'n', long, default_value = "5")]
        routers: usize,
    },

    /// Every router linked to every other
    Mesh {
        #[arg(short = 'n', long, default_value = "4")]
        routers: usize,
    },

    /// Randomly linked routers
    Random {
        #[arg(short = 'n', long, default_value = "8")]
        routers: usize,

        /// Probability of a link between any two routers
        #[arg(short, long, default_value = "0.3")]
        probability: f64,

        #[arg(short, long, default_value = "0")]
        seed: u64,
    },

    /// Load routers and links from a JSON run configuration
    Config { file: PathBuf },
}

const DEFAULT_ROUNDS: u32 = 5;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else if cli.quiet {
            EnvFilter::new("warn")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config(&cli)?;
    // Tables and per-round logs would tear through the bar
    let show_progress = cli.quiet && !cli.verbose;

    let mut runner = EngineRunner::new(config)
        .with_write_diagrams(cli.dot || cli.png)
        .with_render_png(cli.png)
        .with_overwrite(cli.overwrite)
        .with_progress(show_progress);
    if let Some(dir) = cli.output_dir.clone() {
        runner = runner.with_base_dir(dir);
    }
    if let Some(threads) = cli.threads {
        runner = runner.with_worker_threads(threads);
    }

    let snapshots = runner.run_with_observer(|round, routers| {
        if !cli.quiet {
            println!("\n{}", render_round(round, routers));
        }
    })?;

    println!(
        "\nSimulation complete after {} rounds. Results stored in {}",
        snapshots.len(),
        runner.storage_dir.display()
    );

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineRunConfig> {
    let rounds = cli.rounds.unwrap_or(DEFAULT_ROUNDS);

    let (default_name, routers) = match &cli.command {
        Commands::Config { file } => {
            let mut config = EngineRunConfig::from_json_file(file)?;
            if let Some(rounds) = cli.rounds {
                config.rounds = rounds;
            }
            if let Some(name) = &cli.name {
                config.name = name.clone();
            }
            return Ok(config);
        }
        Commands::Demo => ("demo".to_string(), DemoTopology.generate()?),
        Commands::Line { routers, originate_all } => (
            format!("line_{}", routers),
            LineTopology::new(*routers)
                .with_originate_all(*originate_all)
                .generate()?,
        ),
        Commands::Ring { routers } => (format!("ring_{}", routers), RingTopology::new(*routers).generate()?),
        Commands::Mesh { routers } => (format!("mesh_{}", routers), FullMeshTopology::new(*routers).generate()?),
        Commands::Random {
            routers,
            probability,
            seed,
        } => (
            format!("random_{}_{}", routers, seed),
            RandomTopology::new(*routers, *probability, *seed).generate()?,
        ),
    };

    let name = cli.name.clone().unwrap_or(default_name);
    Ok(EngineRunConfig::from_router_set(name, rounds, &routers))
}
