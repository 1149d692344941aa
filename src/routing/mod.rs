//! The two Dijkstra-family searches this engine provides (§4.5, §4.6).
//!
//! [`cgr_dijkstra`] relaxes contact-to-contact directly over the plan
//! arena; [`cmr_dijkstra`] relaxes node-to-node over a per-call
//! [`crate::multigraph::ContactMultigraph`]. Both return a
//! [`crate::route::Route`], empty when the destination is unreachable.

mod cgr;
mod cmr;

pub use cgr::cgr_dijkstra;
pub use cmr::cmr_dijkstra;
