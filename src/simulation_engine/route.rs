use std::fmt;

use serde::{Deserialize, Serialize};

use crate::shared::{Prefix, RouterId, DEFAULT_LOCAL_PREF, DEFAULT_MED};

/// One candidate path to a prefix, as known at a particular router.
///
/// Routes are never edited once they sit in a routing table; every update
/// installs a freshly built value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub prefix: Prefix,
    pub as_path: Vec<RouterId>,
    pub local_pref: i64,
    pub med: i64,
    pub next_hop: RouterId,
}

impl Route {
    pub fn new(prefix: impl Into<Prefix>, as_path: Vec<RouterId>, next_hop: impl Into<RouterId>) -> Self {
        Route {
            prefix: prefix.into(),
            as_path,
            local_pref: DEFAULT_LOCAL_PREF,
            med: DEFAULT_MED,
            next_hop: next_hop.into(),
        }
    }

    /// Self-originated route: the owner is both the whole AS path and the next hop.
    pub fn originated(prefix: impl Into<Prefix>, owner: impl Into<RouterId>) -> Self {
        let owner = owner.into();
        Route::new(prefix, vec![owner.clone()], owner)
    }

    pub fn with_local_pref(mut self, local_pref: i64) -> Self {
        self.local_pref = local_pref;
        self
    }

    pub fn with_med(mut self, med: i64) -> Self {
        self.med = med;
        self
    }

    /// Last router on the path, falling back to the next hop for an empty path.
    pub fn origin(&self) -> &str {
        self.as_path.last().map(String::as_str).unwrap_or(&self.next_hop)
    }

    pub fn path_contains(&self, router_id: &str) -> bool {
        self.as_path.iter().any(|hop| hop == router_id)
    }

    /// Copy of this route with `router_id` pushed onto the front of the AS
    /// path and the next hop rewritten.
    pub fn prepend_and_rehome(&self, router_id: &str, next_hop: &str) -> Route {
        let mut as_path = Vec::with_capacity(self.as_path.len() + 1);
        as_path.push(router_id.to_string());
        as_path.extend(self.as_path.iter().cloned());

        Route {
            prefix: self.prefix.clone(),
            as_path,
            local_pref: self.local_pref,
            med: self.med,
            next_hop: next_hop.to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | NextHop={} | LP={} | MED={} | ASPath={}",
            self.prefix,
            self.next_hop,
            self.local_pref,
            self.med,
            self.as_path.join(" ")
        )
    }
}
