//! CMR-Dijkstra: shortest-arrival-time search over a [`ContactMultigraph`],
//! relaxing node-to-node instead of contact-to-contact (§4.6).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tracing::{debug, instrument, warn};

use crate::contact::Contact;
use crate::multigraph::{contact_search, ContactMultigraph};
use crate::route::Route;
use crate::types::{NodeId, Time};

fn pop_next(heap: &mut BinaryHeap<Reverse<(Time, NodeId)>>, cm: &ContactMultigraph) -> Option<NodeId> {
    while let Some(Reverse((_, id))) = heap.pop() {
        if !cm.vertex(id).map(|v| v.visited).unwrap_or(true) {
            return Some(id);
        }
    }
    None
}

/// Runs CMR-Dijkstra from `root` to `destination` over `plan`, returning
/// the earliest-arrival route (an empty [`Route`] if none exists).
///
/// Unlike [`crate::routing::cgr_dijkstra`], this builds a fresh
/// [`ContactMultigraph`] per call rather than mutating `plan` in place, so
/// it takes `plan` by shared reference.
#[instrument(skip(plan), fields(plan_len = plan.len()))]
pub fn cmr_dijkstra(root: &Contact, destination: NodeId, plan: &[Contact]) -> Route {
    let specs: Vec<_> = plan.iter().map(|c| c.spec).collect();
    let mut cm = ContactMultigraph::build(&specs, root.from());
    if let Some(v) = cm.vertex_mut(root.from()) {
        v.arrival_time = root.start();
    }

    let mut heap: BinaryHeap<Reverse<(Time, NodeId)>> = BinaryHeap::new();
    for node in cm.nodes() {
        heap.push(Reverse((cm.vertex(node).unwrap().arrival_time, node)));
    }

    let mut v_curr = match pop_next(&mut heap, &cm) {
        Some(id) => id,
        None => return Route::empty(),
    };

    loop {
        let v_curr_arrival = cm.vertex(v_curr).unwrap().arrival_time;
        let neighbor_ids: Vec<NodeId> = cm.vertex(v_curr).unwrap().neighbors().collect();

        for u_id in neighbor_ids {
            if cm.vertex(u_id).map(|v| v.visited).unwrap_or(true) {
                continue;
            }
            let best = match contact_search(&cm, v_curr, u_id, v_curr_arrival) {
                Some(c) => c,
                None => continue,
            };
            let best_arrival = best.start.max(v_curr_arrival) + best.owlt;
            let u_arrival = cm.vertex(u_id).unwrap().arrival_time;
            if best_arrival < u_arrival {
                if let Some(vu) = cm.vertex_mut(u_id) {
                    vu.arrival_time = best_arrival;
                    vu.predecessor = Some(best);
                }
                heap.push(Reverse((best_arrival, u_id)));
                debug!(node = u_id, arrival = best_arrival, "relaxed");
            }
        }

        if let Some(v) = cm.vertex_mut(v_curr) {
            v.visited = true;
        }

        match pop_next(&mut heap, &cm) {
            Some(v_next) if v_next == destination => break,
            Some(v_next) => v_curr = v_next,
            None => break,
        }
    }

    reconstruct(&cm, destination, root.from()).unwrap_or_else(|| {
        warn!(destination, "no route found");
        Route::empty()
    })
}

fn reconstruct(cm: &ContactMultigraph, destination: NodeId, root_from: NodeId) -> Option<Route> {
    let mut current_pred = cm.vertex(destination)?.predecessor?;
    let mut chain = Vec::new();
    loop {
        chain.push(current_pred);
        if current_pred.from == current_pred.to || current_pred.from == root_from {
            break;
        }
        match cm.vertex(current_pred.from).and_then(|v| v.predecessor) {
            Some(p) => current_pred = p,
            None => break,
        }
    }
    chain.reverse();

    let mut hops = chain.into_iter();
    let first = hops.next()?;
    let mut route = Route::new(first, None);
    for spec in hops {
        route.append(spec);
    }
    Some(route)
}
