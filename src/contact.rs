//! Contact descriptor and per-search bookkeeping (§3, §4.1 of the design).
//!
//! A [`Contact`] is split into an immutable [`ContactSpec`] — the seven
//! scheduling facts that distinguish one contact from another — and a
//! private scratch area that the two searches reset and mutate. Keeping
//! the split explicit means equality, hashing, and "is this the same
//! contact" all go through `ContactSpec` alone, and a full working-area
//! reset is just replacing the scratch area wholesale.

use std::collections::HashSet;

use crate::types::{NodeId, Rate, Time, Volume, INFINITY};

/// The fixed, immutable facts about a scheduled contact.
///
/// Two contacts are equal iff all seven fields match; none of the
/// search bookkeeping participates in equality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSpec {
    pub from: NodeId,
    pub to: NodeId,
    pub start: Time,
    pub end: Time,
    pub rate: Rate,
    pub owlt: Time,
    pub confidence: f64,
}

impl ContactSpec {
    /// Total bytes transmissible over the contact's open window.
    ///
    /// Short-circuits on a zero rate so the synthetic root contact, whose
    /// window runs to [`INFINITY`](crate::types::INFINITY), never forces
    /// an overflowing subtraction to compute a volume nobody will use.
    pub fn volume(&self) -> Volume {
        if self.rate == 0 {
            0
        } else {
            self.rate * (self.end - self.start)
        }
    }
}

/// Identifies what relaxed a contact's arrival time during a CGR search:
/// the synthetic root (which is never itself a member of the plan), or
/// another contact by its index into the plan arena.
///
/// A plain `Option<usize>` can't distinguish "unrelaxed" from "relaxed
/// directly from the root", since the root has no index of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predecessor {
    Root,
    Contact(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct ContactState {
    pub arrival_time: Time,
    pub visited: bool,
    pub predecessor: Option<Predecessor>,
    pub visited_nodes: HashSet<NodeId>,
    pub suppressed: bool,
    pub suppressed_next_hop: HashSet<usize>,
}

impl ContactState {
    fn fresh() -> Self {
        ContactState {
            arrival_time: INFINITY,
            visited: false,
            predecessor: None,
            visited_nodes: HashSet::new(),
            suppressed: false,
            suppressed_next_hop: HashSet::new(),
        }
    }
}

/// A scheduled, directional communication opportunity between two nodes,
/// plus the scratch area two Dijkstra-family searches reset and mutate.
#[derive(Debug, Clone)]
pub struct Contact {
    pub spec: ContactSpec,
    /// `rate * (end - start)`, cached at construction.
    pub volume: Volume,
    /// Mission availability vector: three residual-volume gates, all
    /// initialized to `volume`. Never mutated by either search — it is
    /// read-only bookkeeping supplied by whatever tracks bundle
    /// forwarding against this contact between searches.
    pub mav: [Volume; 3],
    pub(crate) state: ContactState,
}

impl Contact {
    /// Creates a contact with default confidence (1.0) and owlt (1).
    pub fn new(from: NodeId, to: NodeId, start: Time, end: Time, rate: Rate) -> Self {
        Self::with_confidence_and_owlt(from, to, start, end, rate, 1.0, 1)
    }

    /// Creates a contact with an explicit confidence and one-way light time.
    ///
    /// # Panics
    ///
    /// Panics if `start >= end`: a contact with no open window is a
    /// programming error, not a recoverable condition (§7).
    pub fn with_confidence_and_owlt(
        from: NodeId,
        to: NodeId,
        start: Time,
        end: Time,
        rate: Rate,
        confidence: f64,
        owlt: Time,
    ) -> Self {
        assert!(start < end, "contact {from}->{to}: start {start} >= end {end}");
        assert!(
            (0.0..=1.0).contains(&confidence),
            "contact {from}->{to}: confidence {confidence} out of [0, 1]"
        );
        let spec = ContactSpec {
            from,
            to,
            start,
            end,
            rate,
            owlt,
            confidence,
        };
        let volume = spec.volume();
        Contact {
            spec,
            volume,
            mav: [volume; 3],
            state: ContactState::fresh(),
        }
    }

    /// Builds the synthetic root contact a search starts from: a self-loop
    /// on `node` whose arrival time is pre-set to `ready_time` (the time
    /// data becomes available at `node`), rather than `+infinity`.
    ///
    /// The root is never a member of the contact plan passed to a search.
    pub fn root(node: NodeId, ready_time: Time) -> Self {
        let mut root = Self::with_confidence_and_owlt(node, node, ready_time, INFINITY, 0, 1.0, 0);
        root.state.arrival_time = ready_time;
        root.state.visited_nodes.insert(node);
        root
    }

    /// The sending node.
    pub fn from(&self) -> NodeId {
        self.spec.from
    }

    /// The receiving node.
    pub fn to(&self) -> NodeId {
        self.spec.to
    }

    /// The instant the contact's window opens.
    pub fn start(&self) -> Time {
        self.spec.start
    }

    /// The instant the contact's window closes (exclusive).
    pub fn end(&self) -> Time {
        self.spec.end
    }

    /// One-way light time across this contact.
    pub fn owlt(&self) -> Time {
        self.spec.owlt
    }

    /// Confidence this contact will occur as scheduled, in `[0, 1]`.
    pub fn confidence(&self) -> f64 {
        self.spec.confidence
    }

    /// The best-known arrival time relaxed onto this contact so far.
    pub fn arrival_time(&self) -> Time {
        self.state.arrival_time
    }

    /// Resets all per-search bookkeeping to its initial state. Every
    /// search must call this on every contact in the plan before it
    /// starts (the root, which is never in the plan, is exempt).
    pub fn clear_dijkstra_working_area(&mut self) {
        self.state = ContactState::fresh();
    }

    /// Forbids `next` from ever being selected as this contact's successor
    /// during a search (route-management bookkeeping external to the
    /// core searches, carried over from the reference design for callers
    /// that suppress specific hand-offs between searches).
    pub fn suppress_next_hop(&mut self, next: usize) {
        self.state.suppressed_next_hop.insert(next);
    }

    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.state.suppressed = suppressed;
    }

    pub fn is_suppressed(&self) -> bool {
        self.state.suppressed
    }
}

impl PartialEq for Contact {
    fn eq(&self, other: &Self) -> bool {
        self.spec == other.spec
    }
}
impl Eq for Contact {}
