pub mod dot;

pub use dot::DotRenderer;

use std::fmt::Write;

use crate::simulation_engine::{RoundSnapshot, Router, RouterSet};

/// Router heading followed by one indented line per route, ordered by prefix.
pub fn render_routing_table(router: &Router) -> String {
    let mut out = format!("Router {} Routing Table:\n", router.id());
    for route in router.routing_table().values() {
        let _ = writeln!(out, "  {}", route);
    }
    out
}

pub fn render_round(round: u32, routers: &RouterSet) -> String {
    let mut out = format!("=========== ROUND {} ===========\n", round);
    for router in routers.iter() {
        out.push('\n');
        out.push_str(&render_routing_table(router));
    }
    out
}

/// Same layout as [`render_round`], read from a stored snapshot.
pub fn render_snapshot(snapshot: &RoundSnapshot) -> String {
    let mut out = format!("=========== ROUND {} ===========\n", snapshot.round);
    for (router_id, table) in &snapshot.tables {
        let _ = write!(out, "\nRouter {} Routing Table:\n", router_id);
        for route in table.values() {
            let _ = writeln!(out, "  {}", route);
        }
    }
    out
}
