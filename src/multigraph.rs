//! Contact multigraph: a per-search reindexing of a contact plan by node,
//! used by CMR-Dijkstra to relax node-to-node instead of contact-to-contact
//! (§3, §4.4).
//!
//! Each [`Vertex`] owns the sorted-by-`end` list of contacts outbound from
//! its node, grouped by destination. Sorting by `end` is what lets
//! [`contact_search_index`] binary-search "the first contact on this edge
//! that is still open after time `t`" instead of scanning linearly.

use std::collections::HashMap;

use crate::contact::ContactSpec;
use crate::types::{NodeId, Time, INFINITY};

/// One node's outbound contacts, grouped by destination and sorted by
/// ascending `end` within each destination, plus this node's current
/// search state.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: NodeId,
    adjacencies: HashMap<NodeId, Vec<ContactSpec>>,
    pub arrival_time: Time,
    pub visited: bool,
    /// The contact that last relaxed this vertex's `arrival_time`. `None`
    /// both before relaxation and for the root vertex, which is never
    /// relaxed from anywhere (§9, "CMR predecessor storage" resolution:
    /// the spec is copied by value rather than referencing the multigraph's
    /// adjacency lists, which do not outlive a single search).
    pub predecessor: Option<ContactSpec>,
}

impl Vertex {
    fn fresh(id: NodeId) -> Self {
        Vertex {
            id,
            adjacencies: HashMap::new(),
            arrival_time: INFINITY,
            visited: false,
            predecessor: None,
        }
    }

    /// The contacts outbound from this node toward `to`, sorted by
    /// ascending `end`.
    pub fn contacts_toward(&self, to: NodeId) -> &[ContactSpec] {
        self.adjacencies.get(&to).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every destination this node has at least one outbound contact
    /// toward.
    pub fn neighbors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.adjacencies.keys().copied()
    }

    /// Inserts `contact` keeping the per-destination list sorted ascending
    /// by `start` (equivalently by `end`, under the non-overlap
    /// assumption contacts on one edge are never scheduled concurrently).
    ///
    /// Contact plans are typically supplied in roughly chronological
    /// order, so the common case is an append; this only falls back to a
    /// binary search when `contact` sorts earlier than the current tail —
    /// reusing [`contact_search_index`] itself, keyed on the new contact's
    /// `start`, as its own insertion-point finder (§4.4).
    fn insert(&mut self, contact: ContactSpec) {
        let bucket = self.adjacencies.entry(contact.to).or_default();
        match bucket.last() {
            Some(tail) if contact.start <= tail.start => {
                let idx = contact_search_index(bucket, contact.start);
                bucket.insert(idx, contact);
            }
            _ => bucket.push(contact),
        }
    }
}

/// A contact plan reindexed by source node, built fresh for one CMR search.
///
/// Construction guarantees a [`Vertex`] exists for both the destination of
/// every contact in the plan *and* the root's own source node, even if the
/// root's node has no outbound contacts of its own — the reference
/// implementation this was ported from only guaranteed the former, which
/// left a node with no outbound contacts to be silently default-constructed
/// by map auto-vivification when used as a search root (§3).
#[derive(Debug, Clone)]
pub struct ContactMultigraph {
    vertices: HashMap<NodeId, Vertex>,
}

impl ContactMultigraph {
    /// Builds a multigraph from `plan`, rooted at `root_node`.
    pub fn build(plan: &[ContactSpec], root_node: NodeId) -> Self {
        let mut vertices: HashMap<NodeId, Vertex> = HashMap::new();
        vertices.entry(root_node).or_insert_with(|| Vertex::fresh(root_node));
        for contact in plan {
            vertices
                .entry(contact.from)
                .or_insert_with(|| Vertex::fresh(contact.from))
                .insert(*contact);
            vertices.entry(contact.to).or_insert_with(|| Vertex::fresh(contact.to));
        }
        ContactMultigraph { vertices }
    }

    pub fn vertex(&self, node: NodeId) -> Option<&Vertex> {
        self.vertices.get(&node)
    }

    pub fn vertex_mut(&mut self, node: NodeId) -> Option<&mut Vertex> {
        self.vertices.get_mut(&node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.vertices.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Returns the index of the first contact in `contacts` (sorted ascending
/// by `end`) whose `end` is strictly greater than `arrival_time` — i.e.
/// the first contact on this edge still open after `arrival_time`.
///
/// # Panics
///
/// Panics if `contacts` is empty.
pub fn contact_search_index(contacts: &[ContactSpec], arrival_time: Time) -> usize {
    assert!(!contacts.is_empty(), "contact_search_index on an empty contact list");
    let mut left = 0usize;
    let mut right = contacts.len() - 1;
    if contacts[left].end > arrival_time {
        return left;
    }
    while left + 1 < right {
        let mid = (left + right) / 2;
        if contacts[mid].end > arrival_time {
            right = mid;
        } else {
            left = mid;
        }
    }
    right
}

/// Finds the earliest-ending contact from `node` toward `to` that is still
/// open after `arrival_time`, i.e. the contact CMR-Dijkstra would relax
/// along next. Returns `None` if every contact on this edge has already
/// closed by `arrival_time`.
pub fn contact_search(
    multigraph: &ContactMultigraph,
    node: NodeId,
    to: NodeId,
    arrival_time: Time,
) -> Option<ContactSpec> {
    let contacts = multigraph.vertex(node)?.contacts_toward(to);
    if contacts.is_empty() {
        return None;
    }
    let idx = contact_search_index(contacts, arrival_time);
    let candidate = contacts[idx];
    if candidate.end > arrival_time {
        Some(candidate)
    } else {
        None
    }
}
