//! CGR-Dijkstra: shortest-arrival-time search over a contact plan arena,
//! relaxing contact-to-contact (§4.5).
//!
//! The plan is its own arena: a contact's predecessor is stored as a
//! [`Predecessor`] — an index back into the same slice, or `Root` for the
//! synthetic search origin, which never has an index of its own. This
//! avoids `Rc<RefCell<_>>` between elements of the same container.

use std::collections::HashMap;

use tracing::{debug, instrument, warn};

use crate::contact::{Contact, Predecessor};
use crate::route::Route;
use crate::types::{NodeId, Time, INFINITY};

/// Where the search currently stands: the synthetic root, or a contact by
/// its index into `plan`.
#[derive(Clone, Copy)]
enum Current {
    Root,
    Idx(usize),
}

/// Runs CGR-Dijkstra from `root` to `destination` over `plan`, returning
/// the earliest-arrival route (an empty [`Route`] if none exists).
///
/// `root` is a synthetic contact (see [`Contact::root`]) that must not be a
/// member of `plan`. Every bookkeeping field on every contact in `plan` is
/// reset before the search runs, so the same plan may be reused across
/// independent searches (§5, "idempotent reset").
#[instrument(skip(plan), fields(plan_len = plan.len()))]
pub fn cgr_dijkstra(root: &Contact, destination: NodeId, plan: &mut [Contact]) -> Route {
    for contact in plan.iter_mut() {
        contact.clear_dijkstra_working_area();
    }

    let mut neighbors: HashMap<NodeId, Vec<usize>> = HashMap::new();
    for (idx, contact) in plan.iter().enumerate() {
        neighbors.entry(contact.from()).or_default().push(idx);
    }

    let mut current = Current::Root;
    let mut current_to = root.to();
    let mut current_from = root.from();
    let mut current_arrival = root.arrival_time();
    let mut current_visited_nodes = root.state.visited_nodes.clone();
    let mut current_suppressed_next_hop = root.state.suppressed_next_hop.clone();

    let mut earliest_final_arrival: Time = INFINITY;
    let mut final_contact: Option<usize> = None;

    loop {
        if let Some(indices) = neighbors.get(&current_to) {
            for &idx in indices {
                let skip = {
                    let c = &plan[idx];
                    current_suppressed_next_hop.contains(&idx)
                        || c.is_suppressed()
                        || c.state.visited
                        || current_visited_nodes.contains(&c.to())
                        || c.end() <= current_arrival
                        || c.mav.iter().copied().max().unwrap_or(0) <= 0
                        || (current_from == c.to() && current_to == c.from())
                };
                if skip {
                    continue;
                }

                let c_start = plan[idx].start();
                let c_owlt = plan[idx].owlt();
                let candidate = if c_start < current_arrival {
                    current_arrival + c_owlt
                } else {
                    c_start + c_owlt
                };

                if candidate <= plan[idx].state.arrival_time {
                    let predecessor = match current {
                        Current::Root => Predecessor::Root,
                        Current::Idx(i) => Predecessor::Contact(i),
                    };
                    let c_to = plan[idx].to();
                    plan[idx].state.arrival_time = candidate;
                    plan[idx].state.predecessor = Some(predecessor);
                    plan[idx].state.visited_nodes = current_visited_nodes.clone();
                    plan[idx].state.visited_nodes.insert(c_to);
                    debug!(contact = idx, arrival = candidate, "relaxed");

                    if c_to == destination && candidate < earliest_final_arrival {
                        earliest_final_arrival = candidate;
                        final_contact = Some(idx);
                    }
                }
            }
        }

        if let Current::Idx(i) = current {
            plan[i].state.visited = true;
        }

        let mut next: Option<usize> = None;
        for (idx, c) in plan.iter().enumerate() {
            if c.is_suppressed() || c.state.visited || c.state.arrival_time > earliest_final_arrival {
                continue;
            }
            match next {
                None => next = Some(idx),
                Some(best) if c.state.arrival_time < plan[best].state.arrival_time => next = Some(idx),
                _ => {}
            }
        }

        match next {
            Some(idx) => {
                current = Current::Idx(idx);
                current_to = plan[idx].to();
                current_from = plan[idx].from();
                current_arrival = plan[idx].state.arrival_time;
                current_visited_nodes = plan[idx].state.visited_nodes.clone();
                current_suppressed_next_hop = plan[idx].state.suppressed_next_hop.clone();
            }
            None => break,
        }
    }

    match final_contact {
        Some(idx) => reconstruct(plan, idx),
        None => {
            warn!(destination, "no route found");
            Route::empty()
        }
    }
}

fn reconstruct(plan: &[Contact], final_idx: usize) -> Route {
    let mut chain = Vec::new();
    let mut cur = final_idx;
    loop {
        chain.push(plan[cur].spec);
        match plan[cur].state.predecessor {
            Some(Predecessor::Contact(prev)) => cur = prev,
            Some(Predecessor::Root) | None => break,
        }
    }
    chain.reverse();

    let mut hops = chain.into_iter();
    let first = hops.next().expect("a final contact always has at least one hop");
    let mut route = Route::new(first, None);
    for spec in hops {
        route.append(spec);
    }
    route
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contact::Contact;

    fn plan(contacts: Vec<Contact>) -> Vec<Contact> {
        contacts
    }

    #[test]
    fn direct_hop() {
        let root = Contact::root(1, 0);
        let mut p = plan(vec![Contact::with_confidence_and_owlt(1, 2, 0, 100, 10, 1.0, 1)]);
        let route = cgr_dijkstra(&root, 2, &mut p);
        assert_eq!(route.hops().len(), 1);
        assert_eq!(route.best_delivery_time, 1);
        assert_eq!(route.to_node, 2);
    }

    #[test]
    fn two_hop_via_relay() {
        let root = Contact::root(1, 0);
        let mut p = plan(vec![
            Contact::with_confidence_and_owlt(1, 2, 0, 10, 1, 1.0, 1),
            Contact::with_confidence_and_owlt(2, 3, 0, 10, 1, 1.0, 1),
        ]);
        let route = cgr_dijkstra(&root, 3, &mut p);
        assert_eq!(route.hops().len(), 2);
        assert_eq!(route.to_node, 3);
        assert_eq!(route.best_delivery_time, 2);
    }

    #[test]
    fn unreachable_destination_returns_empty_route() {
        let root = Contact::root(1, 0);
        let mut p = plan(vec![Contact::with_confidence_and_owlt(1, 2, 0, 10, 1, 1.0, 1)]);
        let route = cgr_dijkstra(&root, 9, &mut p);
        assert!(route.hops().is_empty());
    }

    #[test]
    fn no_revisit_along_returned_route() {
        let root = Contact::root(1, 0);
        let mut p = plan(vec![
            Contact::with_confidence_and_owlt(1, 2, 0, 10, 1, 1.0, 1),
            Contact::with_confidence_and_owlt(2, 3, 0, 10, 1, 1.0, 1),
            Contact::with_confidence_and_owlt(3, 1, 0, 10, 1, 1.0, 1),
            Contact::with_confidence_and_owlt(3, 4, 0, 10, 1, 1.0, 1),
        ]);
        let route = cgr_dijkstra(&root, 4, &mut p);
        let mut seen = std::collections::HashSet::new();
        for hop in route.hops() {
            assert!(seen.insert(hop.spec.to), "node {} visited twice", hop.spec.to);
        }
    }

    #[test]
    fn rerunning_on_the_same_plan_is_idempotent() {
        let root = Contact::root(1, 0);
        let mut p = plan(vec![
            Contact::with_confidence_and_owlt(1, 2, 0, 10, 1, 1.0, 1),
            Contact::with_confidence_and_owlt(2, 3, 0, 10, 1, 1.0, 1),
        ]);
        let first = cgr_dijkstra(&root, 3, &mut p);
        let second = cgr_dijkstra(&root, 3, &mut p);
        assert_eq!(first.hops().len(), second.hops().len());
        assert_eq!(first.best_delivery_time, second.best_delivery_time);
        assert_eq!(first.volume, second.volume);
    }

    #[test]
    fn relaxation_tie_break_prefers_later_discovered_equal_cost_predecessor() {
        // Two parallel contacts from node 1 to node 2 (different owlt, so
        // they reach node 2 at different times and are processed as
        // `current` in two separate iterations). Both see the same onward
        // contact (2->5) relax to the identical candidate arrival time,
        // since its start (100) dominates either current_arrival. With a
        // <= relaxation test, the later-processed predecessor (the slower
        // 1->2 contact) wins the overwrite.
        let root = Contact::root(1, 0);
        let mut p = plan(vec![
            Contact::with_confidence_and_owlt(1, 2, 0, 10, 1, 1.0, 1), // arrives at 2 at t=1
            Contact::with_confidence_and_owlt(1, 2, 0, 10, 1, 1.0, 2), // arrives at 2 at t=2
            Contact::with_confidence_and_owlt(2, 5, 100, 200, 1, 1.0, 1),
        ]);
        let route = cgr_dijkstra(&root, 5, &mut p);
        assert_eq!(route.hops().len(), 2);
        assert_eq!(route.hops()[0].spec, p[1].spec);
    }
}
