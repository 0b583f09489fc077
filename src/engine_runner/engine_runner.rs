use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::rendering::{render_routing_table, DotRenderer};
use crate::shared::RunnerError;
use crate::simulation_engine::{RoundSnapshot, RouterSet, SimulationEngine};

use super::engine_run_config::EngineRunConfig;

const SNAPSHOTS_FILE: &str = "snapshots.json";
const CONFIG_FILE: &str = "config.json";

/// Runs a single engine run with specific configuration
pub struct EngineRunner {
    /// Configuration for this engine run
    pub config: EngineRunConfig,

    /// Base directory for storing results
    pub base_dir: PathBuf,

    /// Whether to overwrite existing results
    pub overwrite: bool,

    /// Whether to write a DOT graph per round
    pub write_diagrams: bool,

    /// Whether to turn DOT graphs into PNGs with Graphviz
    pub render_png: bool,

    /// Collect-phase threads; `None` uses one per CPU
    pub worker_threads: Option<usize>,

    /// Whether to draw a progress bar on stderr
    pub show_progress: bool,

    /// Storage directory for this specific run
    pub storage_dir: PathBuf,
}

impl EngineRunner {
    pub fn new(config: EngineRunConfig) -> Self {
        let base_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Desktop")
            .join("pathvector_engine_runs");

        let storage_dir = base_dir.join(&config.name);

        EngineRunner {
            config,
            base_dir,
            overwrite: false,
            write_diagrams: false,
            render_png: false,
            worker_threads: None,
            show_progress: false,
            storage_dir,
        }
    }

    pub fn with_base_dir(mut self, dir: PathBuf) -> Self {
        self.base_dir = dir;
        self.storage_dir = self.base_dir.join(&self.config.name);
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_write_diagrams(mut self, write: bool) -> Self {
        self.write_diagrams = write;
        self
    }

    pub fn with_render_png(mut self, render_png: bool) -> Self {
        self.render_png = render_png;
        self
    }

    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = Some(worker_threads);
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn run(&self) -> Result<Vec<RoundSnapshot>, RunnerError> {
        self.run_with_observer(|_, _| {})
    }

    /// Build the routers, run the configured rounds and store the results.
    ///
    /// `observer` sees the live routers after every round, after the
    /// runner's own logging and diagram output.
    pub fn run_with_observer<F>(&self, mut observer: F) -> Result<Vec<RoundSnapshot>, RunnerError>
    where
        F: FnMut(u32, &RouterSet),
    {
        let snapshots_path = self.storage_dir.join(SNAPSHOTS_FILE);
        if snapshots_path.exists() && !self.overwrite {
            return Err(RunnerError::StorageExists(self.storage_dir.clone()));
        }
        fs::create_dir_all(&self.storage_dir)?;

        let mut routers = self.config.build_routers()?;
        let engine = self.engine();
        info!(
            name = %self.config.name,
            routers = routers.len(),
            rounds = self.config.rounds,
            threads = engine.worker_threads(),
            "starting engine run"
        );

        let progress = self.progress_bar()?;
        let renderer = DotRenderer::new(self.storage_dir.join("diagrams")).with_png(self.render_png);
        let mut diagram_error: Option<std::io::Error> = None;

        let snapshots = engine.run_rounds_with_hook(&mut routers, self.config.rounds, |round, routers| {
            for router in routers.iter() {
                debug!(round, "{}", render_routing_table(router).trim_end());
            }

            if self.write_diagrams && diagram_error.is_none() {
                if let Err(err) = renderer.write_round(round, routers) {
                    diagram_error = Some(err);
                }
            }

            progress.inc(1);
            progress.suspend(|| observer(round, routers));
        });
        progress.finish_and_clear();

        if let Some(err) = diagram_error {
            return Err(err.into());
        }

        self.store_data(&routers, &snapshots)?;
        info!(name = %self.config.name, storage = %self.storage_dir.display(), "engine run stored");

        Ok(snapshots)
    }

    fn engine(&self) -> SimulationEngine {
        match self.worker_threads {
            Some(threads) => SimulationEngine::new().with_worker_threads(threads),
            None => SimulationEngine::new(),
        }
    }

    fn progress_bar(&self) -> Result<ProgressBar, RunnerError> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }

        let pb = ProgressBar::new(u64::from(self.config.rounds));
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} rounds")?
                .progress_chars("##-"),
        );
        Ok(pb)
    }

    fn store_data(&self, routers: &RouterSet, snapshots: &[RoundSnapshot]) -> Result<(), RunnerError> {
        let snapshots_json = serde_json::json!({
            "name": self.config.name,
            "generated_at": Utc::now().to_rfc3339(),
            "rounds": self.config.rounds,
            "router_count": routers.len(),
            "snapshots": snapshots,
        });
        fs::write(
            self.storage_dir.join(SNAPSHOTS_FILE),
            serde_json::to_string_pretty(&snapshots_json)?,
        )?;

        fs::write(
            self.storage_dir.join(CONFIG_FILE),
            serde_json::to_string_pretty(&self.config.to_json())?,
        )?;

        Ok(())
    }
}
