use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace};

use crate::shared::{Prefix, RouterId};
use crate::simulation_engine::decision::decide;
use crate::simulation_engine::route::Route;

/// Prefix to best known route. One entry per prefix, no multipath.
pub type RoutingTable = BTreeMap<Prefix, Route>;

/// Tally of what happened to one batch of received routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub installed: usize,
    pub looped: usize,
    pub rejected: usize,
}

impl ApplyOutcome {
    pub fn merge(&mut self, other: ApplyOutcome) {
        self.installed += other.installed;
        self.looped += other.looped;
        self.rejected += other.rejected;
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    id: RouterId,
    pub(crate) neighbors: BTreeSet<RouterId>,
    pub(crate) routing_table: RoutingTable,
}

impl Router {
    pub fn new(id: impl Into<RouterId>) -> Self {
        Router {
            id: id.into(),
            neighbors: BTreeSet::new(),
            routing_table: BTreeMap::new(),
        }
    }

    /// Fixed at construction; the id a [`RouterSet`](crate::simulation_engine::RouterSet) keys this router by.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn neighbors(&self) -> &BTreeSet<RouterId> {
        &self.neighbors
    }

    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing_table
    }

    pub fn route(&self, prefix: &str) -> Option<&Route> {
        self.routing_table.get(prefix)
    }

    /// One-sided adjacency; `RouterSet::connect` keeps the relation symmetric.
    /// Linking a router to itself does nothing.
    pub(crate) fn add_neighbor(&mut self, neighbor: &str) {
        if neighbor != self.id {
            self.neighbors.insert(neighbor.to_string());
        }
    }

    /// Seed a self-originated route with default preference and cost.
    pub fn originate(&mut self, prefix: impl Into<Prefix>) {
        let route = Route::originated(prefix, self.id.clone());
        self.seed_route(route);
    }

    pub fn originate_with(&mut self, prefix: impl Into<Prefix>, local_pref: i64, med: i64) {
        let route = Route::originated(prefix, self.id.clone())
            .with_local_pref(local_pref)
            .with_med(med);
        self.seed_route(route);
    }

    /// Install a route before the simulation starts, replacing any entry for
    /// the same prefix without running the decision process.
    pub fn seed_route(&mut self, route: Route) {
        self.routing_table.insert(route.prefix.clone(), route);
    }

    /// Routes offered to every neighbor this round: each table entry with
    /// this router prepended and set as next hop.
    pub fn generate_advertisements(&self) -> Vec<Route> {
        self.routing_table
            .values()
            .map(|route| route.prepend_and_rehome(&self.id, &self.id))
            .collect()
    }

    /// Merge a batch of received routes into the table, in order.
    ///
    /// Routes whose AS path already carries this router are dropped. The
    /// rest replace the current entry only when they win the decision
    /// process against whatever is installed at that moment, including
    /// routes installed earlier in the same batch.
    pub fn apply_advertisements<I>(&mut self, received: I) -> ApplyOutcome
    where
        I: IntoIterator<Item = Route>,
    {
        let mut outcome = ApplyOutcome::default();

        for route in received {
            if route.path_contains(&self.id) {
                trace!(router = %self.id, %route, "discarding looped route");
                outcome.looped += 1;
                continue;
            }

            let replace = match self.routing_table.get(&route.prefix) {
                None => true,
                Some(current) => {
                    let (ordering, reason) = decide(&route, current);
                    if ordering == Ordering::Less {
                        true
                    } else {
                        trace!(router = %self.id, %route, %reason, "keeping installed route");
                        false
                    }
                }
            };

            if replace {
                debug!(router = %self.id, %route, "installing route");
                self.routing_table.insert(route.prefix.clone(), route);
                outcome.installed += 1;
            } else {
                outcome.rejected += 1;
            }
        }

        outcome
    }
}
