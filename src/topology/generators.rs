use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::shared::ConfigError;
use crate::simulation_engine::{Router, RouterSet};

use super::{router_name, router_prefix, MAX_GENERATED_ROUTERS};

pub trait TopologyGenerator {
    fn generate(&self) -> Result<RouterSet, ConfigError>;
}

fn check_router_count(count: usize, minimum: usize) -> Result<(), ConfigError> {
    if count < minimum || count > MAX_GENERATED_ROUTERS {
        return Err(ConfigError::InvalidParameter(format!(
            "router count must be between {} and {}, got {}",
            minimum, MAX_GENERATED_ROUTERS, count
        )));
    }
    Ok(())
}

/// `count` unconnected routers, each optionally originating its own prefix.
fn blank_routers(count: usize, originate: bool) -> RouterSet {
    let mut routers = RouterSet::new();
    for index in 0..count {
        let mut router = Router::new(router_name(index));
        if originate {
            router.originate(router_prefix(index));
        }
        routers.add_router(router);
    }
    routers
}

/// The four-router network the simulator ships with: A-B, B-C, C-D and
/// the extra B-D link closing the B-C-D triangle.
#[derive(Debug, Clone, Default)]
pub struct DemoTopology;

impl TopologyGenerator for DemoTopology {
    fn generate(&self) -> Result<RouterSet, ConfigError> {
        let mut routers = RouterSet::new();
        for id in ["A", "B", "C", "D"] {
            routers.add_router(Router::new(id));
        }

        routers.connect("A", "B");
        routers.connect("B", "C");
        routers.connect("C", "D");
        routers.connect("B", "D");

        for (id, prefix) in [("A", "10.0.0.0/24"), ("C", "20.0.0.0/24"), ("D", "30.0.0.0/24")] {
            if let Some(router) = routers.get_mut(id) {
                router.originate(prefix);
            }
        }

        Ok(routers)
    }
}

/// Routers chained A-B-C-...; only the first router originates by default.
#[derive(Debug, Clone)]
pub struct LineTopology {
    pub routers: usize,
    pub originate_all: bool,
}

impl LineTopology {
    pub fn new(routers: usize) -> Self {
        LineTopology {
            routers,
            originate_all: false,
        }
    }

    pub fn with_originate_all(mut self, originate_all: bool) -> Self {
        self.originate_all = originate_all;
        self
    }
}

impl TopologyGenerator for LineTopology {
    fn generate(&self) -> Result<RouterSet, ConfigError> {
        check_router_count(self.routers, 1)?;

        let mut routers = blank_routers(self.routers, self.originate_all);
        if !self.originate_all {
            if let Some(first) = routers.get_mut(&router_name(0)) {
                first.originate(router_prefix(0));
            }
        }

        for index in 1..self.routers {
            routers.connect(&router_name(index - 1), &router_name(index));
        }
        Ok(routers)
    }
}

/// Line topology with the last router linked back to the first.
#[derive(Debug, Clone)]
pub struct RingTopology {
    pub routers: usize,
}

impl RingTopology {
    pub fn new(routers: usize) -> Self {
        RingTopology { routers }
    }
}

impl TopologyGenerator for RingTopology {
    fn generate(&self) -> Result<RouterSet, ConfigError> {
        check_router_count(self.routers, 3)?;

        let mut routers = blank_routers(self.routers, true);
        for index in 0..self.routers {
            let next = (index + 1) % self.routers;
            routers.connect(&router_name(index), &router_name(next));
        }
        Ok(routers)
    }
}

#[derive(Debug, Clone)]
pub struct FullMeshTopology {
    pub routers: usize,
}

impl FullMeshTopology {
    pub fn new(routers: usize) -> Self {
        FullMeshTopology { routers }
    }
}

impl TopologyGenerator for FullMeshTopology {
    fn generate(&self) -> Result<RouterSet, ConfigError> {
        check_router_count(self.routers, 1)?;

        let mut routers = blank_routers(self.routers, true);
        for a in 0..self.routers {
            for b in (a + 1)..self.routers {
                routers.connect(&router_name(a), &router_name(b));
            }
        }
        Ok(routers)
    }
}

/// Each pair of routers is linked with probability `probability`.
///
/// With `connected` set, every router is first attached to a random
/// earlier router so the graph has no isolated parts. The same seed always
/// yields the same topology.
#[derive(Debug, Clone)]
pub struct RandomTopology {
    pub routers: usize,
    pub probability: f64,
    pub seed: u64,
    pub connected: bool,
}

impl RandomTopology {
    pub fn new(routers: usize, probability: f64, seed: u64) -> Self {
        RandomTopology {
            routers,
            probability,
            seed,
            connected: true,
        }
    }

    pub fn with_connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }
}

impl TopologyGenerator for RandomTopology {
    fn generate(&self) -> Result<RouterSet, ConfigError> {
        check_router_count(self.routers, 1)?;
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(ConfigError::InvalidParameter(format!(
                "link probability must be within [0, 1], got {}",
                self.probability
            )));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut routers = blank_routers(self.routers, true);

        if self.connected {
            for index in 1..self.routers {
                let earlier = rng.gen_range(0..index);
                routers.connect(&router_name(earlier), &router_name(index));
            }
        }

        for a in 0..self.routers {
            for b in (a + 1)..self.routers {
                if rng.gen_bool(self.probability) {
                    routers.connect(&router_name(a), &router_name(b));
                }
            }
        }

        Ok(routers)
    }
}
