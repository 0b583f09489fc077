pub mod generators;

pub use generators::{
    DemoTopology, FullMeshTopology, LineTopology, RandomTopology, RingTopology, TopologyGenerator,
};

use crate::shared::{Prefix, RouterId, DEFAULT_LOCAL_PREF, DEFAULT_MED};
use crate::simulation_engine::{Router, RouterSet};

/// Prefix a router originates before the first round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origination {
    pub prefix: Prefix,
    pub local_pref: i64,
    pub med: i64,
}

/// Builder struct used during topology construction
#[derive(Debug, Clone)]
pub struct RouterBuilder {
    pub id: RouterId,
    pub neighbor_ids: Vec<RouterId>,
    pub originations: Vec<Origination>,
}

impl RouterBuilder {
    pub fn new(id: impl Into<RouterId>) -> Self {
        RouterBuilder {
            id: id.into(),
            neighbor_ids: Vec::new(),
            originations: Vec::new(),
        }
    }

    pub fn with_neighbors<I, S>(mut self, neighbors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<RouterId>,
    {
        self.neighbor_ids.extend(neighbors.into_iter().map(Into::into));
        self
    }

    pub fn originating(self, prefix: impl Into<Prefix>) -> Self {
        self.originating_with(prefix, DEFAULT_LOCAL_PREF, DEFAULT_MED)
    }

    pub fn originating_with(mut self, prefix: impl Into<Prefix>, local_pref: i64, med: i64) -> Self {
        self.originations.push(Origination {
            prefix: prefix.into(),
            local_pref,
            med,
        });
        self
    }
}

impl RouterSet {
    /// Build a router set from builders.
    ///
    /// All declared routers are created first, then links are added in both
    /// directions. A neighbor that has no builder of its own is created as an
    /// empty router. Self links are ignored.
    pub fn build(builders: Vec<RouterBuilder>) -> RouterSet {
        let mut routers = RouterSet::new();

        for builder in &builders {
            let mut router = Router::new(builder.id.clone());
            for origination in &builder.originations {
                router.originate_with(origination.prefix.clone(), origination.local_pref, origination.med);
            }
            routers.add_router(router);
        }

        for builder in &builders {
            for neighbor in &builder.neighbor_ids {
                routers.connect(&builder.id, neighbor);
            }
        }

        routers
    }
}

/// Router ids used by the generators: `A`..`Z`, then `R26`, `R27`, ...
pub fn router_name(index: usize) -> RouterId {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        format!("R{}", index)
    }
}

/// Prefix originated by the `index`-th generated router. Unique below
/// [`MAX_GENERATED_ROUTERS`].
pub fn router_prefix(index: usize) -> Prefix {
    format!("10.{}.{}.0/24", (index / 256) % 256, index % 256)
}

pub const MAX_GENERATED_ROUTERS: usize = 65_536;
