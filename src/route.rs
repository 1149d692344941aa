//! A Route is an ordered, temporally feasible chain of contacts with
//! cached aggregate metrics (§3, §4.2, §4.3).

use std::collections::HashSet;

use crate::contact::ContactSpec;
use crate::types::{NodeId, Time, Volume, INFINITY};

/// One hop of a Route: the contact's fixed facts plus the forwarding
/// numbers `refresh_metrics` derives for it.
///
/// These forwarding fields belong to the Route's own copy of the
/// contact, not to the shared [`crate::contact::Contact`] in the plan —
/// a contact can appear (unmutated) in many candidate routes during a
/// single search, but its effective volume on any one of them is only
/// meaningful in that route's context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hop {
    pub spec: ContactSpec,
    pub first_byte_tx_time: Time,
    pub last_byte_tx_time: Time,
    pub last_byte_arr_time: Time,
    pub effective_volume_limit: Volume,
}

impl Hop {
    fn bare(spec: ContactSpec) -> Self {
        Hop {
            spec,
            first_byte_tx_time: 0,
            last_byte_tx_time: 0,
            last_byte_arr_time: 0,
            effective_volume_limit: 0,
        }
    }
}

/// `bundle_tx_time` is fixed at zero: this engine computes the best-case
/// (zero-size-bundle) route volume and delivery time; a caller applying
/// an actual bundle size derates both itself (§4.3, §9).
const BUNDLE_TX_TIME: Time = 0;

/// An ordered chain of contacts that delivers data from its first hop's
/// source to its last hop's destination, with derived aggregate metrics.
///
/// An empty route (`hops().is_empty()`) represents "unreachable"; its
/// accessor values mirror the reference implementation's default values
/// and are not independently meaningful (§4.2).
#[derive(Debug, Clone)]
pub struct Route {
    hops: Vec<Hop>,
    visited_nodes: HashSet<NodeId>,
    pub to_node: NodeId,
    pub next_node: NodeId,
    pub from_time: Time,
    pub to_time: Time,
    pub best_delivery_time: Time,
    pub volume: Volume,
    pub confidence: f64,
}

impl Route {
    /// An empty route, representing "no path found".
    pub fn empty() -> Self {
        Route {
            hops: Vec::new(),
            visited_nodes: HashSet::new(),
            to_node: 0,
            next_node: 0,
            from_time: 0,
            to_time: INFINITY,
            best_delivery_time: 0,
            volume: INFINITY,
            confidence: 1.0,
        }
    }

    /// Starts a new route by appending `seed` to an (optional) parent
    /// route's hops, carrying the parent's visited-node set forward so
    /// `eligible` still forbids revisiting a node the parent already
    /// reached.
    pub fn new(seed: ContactSpec, parent: Option<&Route>) -> Self {
        let mut route = match parent {
            Some(p) => Route {
                visited_nodes: p.visited_nodes.clone(),
                ..Route::empty()
            },
            None => Route::empty(),
        };
        route.append(seed);
        route
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    fn last(&self) -> Option<&Hop> {
        self.hops.last()
    }

    /// Whether `contact` may legally extend this route: the route is
    /// empty, or `contact.to` hasn't been visited yet and `contact`'s
    /// window is still open when data could earliest arrive at its
    /// source (§4.2).
    pub fn eligible(&self, contact: &ContactSpec) -> bool {
        match self.last() {
            None => true,
            Some(last) => {
                !self.visited_nodes.contains(&contact.to) && contact.end > last.spec.start + last.spec.owlt
            }
        }
    }

    /// Appends `contact` to the route and refreshes its aggregate
    /// metrics.
    ///
    /// # Panics
    ///
    /// Panics if `contact` is not [`eligible`](Self::eligible) — an
    /// ineligible append is a programming error in the caller (a search
    /// implementation), not a recoverable condition (§7).
    pub fn append(&mut self, contact: ContactSpec) {
        assert!(
            self.eligible(&contact),
            "attempted to append an ineligible contact {:?} to a route ending at {:?}",
            contact,
            self.last().map(|h| h.spec)
        );
        self.visited_nodes.insert(contact.from);
        self.visited_nodes.insert(contact.to);
        self.hops.push(Hop::bare(contact));
        self.refresh_metrics();
    }

    /// Recomputes every cached aggregate from the current hop sequence
    /// (§4.3).
    fn refresh_metrics(&mut self) {
        assert!(!self.hops.is_empty());

        self.to_node = self.hops.last().unwrap().spec.to;
        self.next_node = self.hops[0].spec.to;
        self.from_time = self.hops[0].spec.start;

        self.to_time = INFINITY;
        self.confidence = 1.0;
        for hop in &self.hops {
            self.to_time = self.to_time.min(hop.spec.end);
            self.confidence *= hop.spec.confidence;
        }

        // t_0 = start_0 + owlt_0; t_i = max(t_{i-1}, start_i) + owlt_i.
        let mut delivery = 0;
        for hop in &self.hops {
            delivery = delivery.max(hop.spec.start) + hop.spec.owlt;
        }
        self.best_delivery_time = delivery;

        let mut prev_last_byte_arr_time = 0;
        let mut min_effective_volume_limit = INFINITY;
        let n = self.hops.len();
        for i in 0..n {
            let spec = self.hops[i].spec;
            let first_byte_tx_time = if i == 0 {
                spec.start
            } else {
                spec.start.max(prev_last_byte_arr_time)
            };
            let last_byte_tx_time = first_byte_tx_time + BUNDLE_TX_TIME;
            let last_byte_arr_time = last_byte_tx_time + spec.owlt;
            prev_last_byte_arr_time = last_byte_arr_time;

            let min_succ_stop_time = self.hops[i..].iter().map(|h| h.spec.end).min().unwrap();
            let effective_stop_time = spec.end.min(min_succ_stop_time);
            let effective_duration = effective_stop_time - first_byte_tx_time;
            let effective_volume_limit = (effective_duration * spec.rate).min(spec.volume());

            let hop = &mut self.hops[i];
            hop.first_byte_tx_time = first_byte_tx_time;
            hop.last_byte_tx_time = last_byte_tx_time;
            hop.last_byte_arr_time = last_byte_arr_time;
            hop.effective_volume_limit = effective_volume_limit;

            min_effective_volume_limit = min_effective_volume_limit.min(effective_volume_limit);
        }
        self.volume = min_effective_volume_limit;
    }
}
