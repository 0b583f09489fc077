pub mod route;
pub mod decision;
pub mod router;
pub mod router_set;
pub mod engine;

pub use route::Route;
pub use decision::{compare_routes, decide, is_better};
pub use router::{ApplyOutcome, Router, RoutingTable};
pub use router_set::RouterSet;
pub use engine::{run_rounds, RoundSnapshot, SimulationEngine};
