use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use ipnetwork::IpNetwork;
use serde::{Deserialize, Serialize};

use crate::shared::{ConfigError, Prefix, RouterId, DEFAULT_LOCAL_PREF, DEFAULT_MED};
use crate::simulation_engine::RouterSet;
use crate::topology::RouterBuilder;

fn default_local_pref() -> i64 {
    DEFAULT_LOCAL_PREF
}

fn default_med() -> i64 {
    DEFAULT_MED
}

fn default_rounds() -> u32 {
    5
}

/// A prefix a router originates, with optional preference and cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginConfig {
    pub prefix: Prefix,
    #[serde(default = "default_local_pref")]
    pub local_pref: i64,
    #[serde(default = "default_med")]
    pub med: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
    pub id: RouterId,
    #[serde(default)]
    pub neighbors: Vec<RouterId>,
    #[serde(default)]
    pub originates: Vec<OriginConfig>,
}

/// Configuration for a single engine run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineRunConfig {
    /// Unique name for this engine run; also the storage subdirectory
    pub name: String,

    /// Number of propagation rounds
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    pub routers: Vec<RouterConfig>,
}

impl EngineRunConfig {
    pub fn new(name: impl Into<String>, rounds: u32) -> Self {
        EngineRunConfig {
            name: name.into(),
            rounds,
            routers: Vec::new(),
        }
    }

    pub fn with_router(mut self, router: RouterConfig) -> Self {
        self.routers.push(router);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineRunConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Reject what the engine would otherwise silently accept: empty or
    /// repeated ids, links to undeclared routers, self links and prefixes
    /// that are not valid IPv4/IPv6 networks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut ids = BTreeSet::new();
        for router in &self.routers {
            if router.id.is_empty() {
                return Err(ConfigError::EmptyRouterId);
            }
            if !ids.insert(router.id.as_str()) {
                return Err(ConfigError::DuplicateRouter(router.id.clone()));
            }
        }

        for router in &self.routers {
            for neighbor in &router.neighbors {
                if *neighbor == router.id {
                    return Err(ConfigError::SelfNeighbor(router.id.clone()));
                }
                if !ids.contains(neighbor.as_str()) {
                    return Err(ConfigError::UnknownNeighbor {
                        router: router.id.clone(),
                        neighbor: neighbor.clone(),
                    });
                }
            }

            for origin in &router.originates {
                if IpNetwork::from_str(&origin.prefix).is_err() {
                    return Err(ConfigError::InvalidPrefix {
                        router: router.id.clone(),
                        prefix: origin.prefix.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn builders(&self) -> Vec<RouterBuilder> {
        self.routers
            .iter()
            .map(|router| {
                router.originates.iter().fold(
                    RouterBuilder::new(router.id.clone()).with_neighbors(router.neighbors.iter().cloned()),
                    |builder, origin| builder.originating_with(origin.prefix.clone(), origin.local_pref, origin.med),
                )
            })
            .collect()
    }

    pub fn build_routers(&self) -> Result<RouterSet, ConfigError> {
        self.validate()?;
        Ok(RouterSet::build(self.builders()))
    }

    /// Describe an existing router set, e.g. one produced by a generator,
    /// so the run can be stored and replayed.
    pub fn from_router_set(name: impl Into<String>, rounds: u32, routers: &RouterSet) -> Self {
        let routers = routers
            .iter()
            .map(|router| RouterConfig {
                id: router.id().to_string(),
                neighbors: router.neighbors().iter().cloned().collect(),
                originates: router
                    .routing_table()
                    .values()
                    .filter(|route| route.next_hop == router.id())
                    .map(|route| OriginConfig {
                        prefix: route.prefix.clone(),
                        local_pref: route.local_pref,
                        med: route.med,
                    })
                    .collect(),
            })
            .collect();

        EngineRunConfig {
            name: name.into(),
            rounds,
            routers,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name,
            "rounds": self.rounds,
            "routers": self.routers,
        })
    }
}
