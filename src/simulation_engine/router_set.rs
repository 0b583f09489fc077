use std::collections::BTreeMap;

use crate::shared::RouterId;
use crate::simulation_engine::router::{Router, RoutingTable};

/// Every router taking part in a simulation, keyed (and iterated) by id.
#[derive(Debug, Clone, Default)]
pub struct RouterSet {
    routers: BTreeMap<RouterId, Router>,
}

impl RouterSet {
    pub fn new() -> Self {
        RouterSet {
            routers: BTreeMap::new(),
        }
    }

    /// Insert a router, replacing any router with the same id.
    pub fn add_router(&mut self, router: Router) {
        self.routers.insert(router.id().to_string(), router);
    }

    /// Router with `id`, created empty if it does not exist yet.
    pub fn ensure_router(&mut self, id: &str) -> &mut Router {
        self.routers
            .entry(id.to_string())
            .or_insert_with(|| Router::new(id))
    }

    /// Link two routers in both directions, creating either if missing.
    /// Connecting a router to itself adds no link but still creates it.
    pub fn connect(&mut self, a: &str, b: &str) {
        let router = self.ensure_router(a);
        if a == b {
            return;
        }
        router.add_neighbor(b);
        self.ensure_router(b).add_neighbor(a);
    }

    pub fn are_connected(&self, a: &str, b: &str) -> bool {
        self.routers
            .get(a)
            .map(|router| router.neighbors.contains(b))
            .unwrap_or(false)
    }

    pub fn get(&self, id: &str) -> Option<&Router> {
        self.routers.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Router> {
        self.routers.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.routers.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RouterId> {
        self.routers.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Router> {
        self.routers.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Router> {
        self.routers.values_mut()
    }

    /// Undirected links, each reported once with the smaller id first.
    pub fn links(&self) -> Vec<(RouterId, RouterId)> {
        let mut links = Vec::new();
        for router in self.routers.values() {
            for neighbor in router.neighbors.iter() {
                if router.id() < neighbor.as_str() {
                    links.push((router.id().to_string(), neighbor.clone()));
                }
            }
        }
        links
    }

    /// Deep copy of every routing table, detached from the live routers.
    pub fn table_snapshot(&self) -> BTreeMap<RouterId, RoutingTable> {
        self.routers
            .iter()
            .map(|(id, router)| (id.clone(), router.routing_table.clone()))
            .collect()
    }
}
