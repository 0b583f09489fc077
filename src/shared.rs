use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Identifier of a router. Doubles as the AS number in AS paths.
pub type RouterId = String;

/// Opaque address-block identifier, e.g. `"10.0.0.0/24"`.
pub type Prefix = String;

pub const DEFAULT_LOCAL_PREF: i64 = 100;
pub const DEFAULT_MED: i64 = 0;

/// Criterion of the decision process that separated two routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionReason {
    LocalPref,
    AsPathLength,
    Med,
    NextHop,
    Identical,
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DecisionReason::LocalPref => "LOCAL_PREF",
            DecisionReason::AsPathLength => "AS_PATH_LENGTH",
            DecisionReason::Med => "MED",
            DecisionReason::NextHop => "NEXT_HOP",
            DecisionReason::Identical => "IDENTICAL",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("router id must not be empty")]
    EmptyRouterId,

    #[error("router {0} is declared more than once")]
    DuplicateRouter(RouterId),

    #[error("router {router} lists unknown neighbor {neighbor}")]
    UnknownNeighbor { router: RouterId, neighbor: RouterId },

    #[error("router {0} lists itself as a neighbor")]
    SelfNeighbor(RouterId),

    #[error("router {router} originates invalid prefix {prefix:?}")]
    InvalidPrefix { router: RouterId, prefix: String },

    #[error("invalid topology parameter: {0}")]
    InvalidParameter(String),
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize run output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid progress bar template: {0}")]
    Progress(#[from] indicatif::style::TemplateError),

    #[error("storage directory {0:?} already holds results; enable overwrite to replace them")]
    StorageExists(PathBuf),
}
