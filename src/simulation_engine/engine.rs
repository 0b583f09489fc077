use std::collections::BTreeMap;
use std::panic;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::shared::RouterId;
use crate::simulation_engine::route::Route;
use crate::simulation_engine::router::{ApplyOutcome, Router, RoutingTable};
use crate::simulation_engine::router_set::RouterSet;

/// Every router's routing table as it stood at the end of one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub round: u32,
    pub tables: BTreeMap<RouterId, RoutingTable>,
}

impl RoundSnapshot {
    pub fn table(&self, router_id: &str) -> Option<&RoutingTable> {
        self.tables.get(router_id)
    }

    pub fn route(&self, router_id: &str, prefix: &str) -> Option<&Route> {
        self.tables.get(router_id).and_then(|table| table.get(prefix))
    }

    pub fn route_count(&self) -> usize {
        self.tables.values().map(|table| table.len()).sum()
    }
}

/// Drives synchronous propagation rounds over a caller-owned [`RouterSet`].
///
/// Each round reads every router's pre-round table to build the incoming
/// batches, and only then lets routers apply them. The collect phase can be
/// spread over several threads; they hold shared borrows only and are joined
/// before the apply phase starts, so results never depend on the thread count.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    worker_threads: usize,
}

impl SimulationEngine {
    pub fn new() -> Self {
        SimulationEngine {
            worker_threads: num_cpus::get().max(1),
        }
    }

    pub fn sequential() -> Self {
        SimulationEngine { worker_threads: 1 }
    }

    pub fn with_worker_threads(mut self, worker_threads: usize) -> Self {
        self.worker_threads = worker_threads.max(1);
        self
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn run_rounds(&self, routers: &mut RouterSet, round_count: u32) -> Vec<RoundSnapshot> {
        self.run_rounds_with_hook(routers, round_count, |_, _| {})
    }

    /// Run exactly `round_count` rounds, returning one snapshot per round.
    ///
    /// `hook` is called after each round's snapshot with the round number
    /// (starting at 1) and the live routers. It only gets a shared borrow.
    pub fn run_rounds_with_hook<F>(
        &self,
        routers: &mut RouterSet,
        round_count: u32,
        mut hook: F,
    ) -> Vec<RoundSnapshot>
    where
        F: FnMut(u32, &RouterSet),
    {
        let mut snapshots = Vec::with_capacity(round_count as usize);

        for round in 1..=round_count {
            let batches = self.collect_phase(routers);

            let mut outcome = ApplyOutcome::default();
            for (router_id, batch) in batches {
                if let Some(router) = routers.get_mut(&router_id) {
                    debug!(round, router = %router_id, received = batch.len(), "applying advertisements");
                    outcome.merge(router.apply_advertisements(batch));
                }
            }

            info!(
                round,
                installed = outcome.installed,
                looped = outcome.looped,
                rejected = outcome.rejected,
                "round complete"
            );

            snapshots.push(RoundSnapshot {
                round,
                tables: routers.table_snapshot(),
            });

            hook(round, &*routers);
        }

        snapshots
    }

    fn collect_phase(&self, routers: &RouterSet) -> Vec<(RouterId, Vec<Route>)> {
        let members: Vec<&Router> = routers.iter().collect();
        let workers = self.worker_threads.min(members.len());

        if workers <= 1 {
            return members
                .iter()
                .map(|router| (router.id().to_string(), incoming_batch(routers, router)))
                .collect();
        }

        let chunk_size = members.len().div_ceil(workers);
        thread::scope(|scope| {
            let handles: Vec<_> = members
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|router| (router.id().to_string(), incoming_batch(routers, router)))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
                .collect()
        })
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Advertisements reaching `router` this round, neighbor by neighbor in id order.
fn incoming_batch(routers: &RouterSet, router: &Router) -> Vec<Route> {
    router
        .neighbors()
        .iter()
        .filter_map(|neighbor_id| routers.get(neighbor_id))
        .flat_map(|neighbor| neighbor.generate_advertisements())
        .collect()
}

/// Sequential [`SimulationEngine::run_rounds_with_hook`] with an optional hook.
pub fn run_rounds(
    routers: &mut RouterSet,
    round_count: u32,
    hook: Option<&mut dyn FnMut(u32, &RouterSet)>,
) -> Vec<RoundSnapshot> {
    let engine = SimulationEngine::sequential();
    match hook {
        Some(hook) => engine.run_rounds_with_hook(routers, round_count, hook),
        None => engine.run_rounds(routers, round_count),
    }
}
