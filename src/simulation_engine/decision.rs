use std::cmp::Ordering;

use crate::shared::DecisionReason;
use crate::simulation_engine::route::Route;

/// Ranks two routes for the same prefix. `Ordering::Less` means `a` is preferred.
///
/// Criteria, first difference wins: higher local preference, shorter AS
/// path, lower MED, byte-wise smaller next hop.
pub fn compare_routes(a: &Route, b: &Route) -> Ordering {
    decide(a, b).0
}

/// Same ranking as [`compare_routes`], also reporting which criterion decided.
pub fn decide(a: &Route, b: &Route) -> (Ordering, DecisionReason) {
    match b.local_pref.cmp(&a.local_pref) {
        Ordering::Equal => {}
        other => return (other, DecisionReason::LocalPref),
    }

    match a.as_path.len().cmp(&b.as_path.len()) {
        Ordering::Equal => {}
        other => return (other, DecisionReason::AsPathLength),
    }

    match a.med.cmp(&b.med) {
        Ordering::Equal => {}
        other => return (other, DecisionReason::Med),
    }

    match a.next_hop.as_bytes().cmp(b.next_hop.as_bytes()) {
        Ordering::Equal => (Ordering::Equal, DecisionReason::Identical),
        other => (other, DecisionReason::NextHop),
    }
}

/// True when `candidate` should replace `incumbent`. Ties keep the incumbent.
pub fn is_better(candidate: &Route, incumbent: &Route) -> bool {
    compare_routes(candidate, incumbent) == Ordering::Less
}

