//! Contact Graph Routing (CGR) and Contact Multigraph Routing (CMR) over a
//! time-indexed DTN contact plan.
//!
//! | module          | purpose                                             |
//! |-----------------|------------------------------------------------------|
//! | [`types`]        | shared primitive aliases (`NodeId`, `Time`, ...)     |
//! | [`error`]        | the loader's fallible-path error type                |
//! | [`contact`]      | `Contact`/`ContactSpec`, the plan's unit of schedule |
//! | [`route`]        | `Route`, an ordered chain of contacts with metrics   |
//! | [`multigraph`]   | `ContactMultigraph`, CMR's per-search node index     |
//! | [`contact_plan`] | JSON plan loading                                    |
//! | [`routing`]      | `cgr_dijkstra` and `cmr_dijkstra`                     |
//!
//! Both searches are total on a well-formed plan: they always return a
//! [`route::Route`], empty when the destination is unreachable. The only
//! fallible entry point is [`contact_plan::load_contact_plan`].

pub mod contact;
pub mod contact_plan;
pub mod error;
pub mod multigraph;
pub mod route;
pub mod routing;
pub mod types;

pub use contact::{Contact, ContactSpec};
pub use contact_plan::{load_contact_plan, ContactPlan};
pub use error::{PlanError, PlanResult};
pub use route::{Hop, Route};
pub use routing::{cgr_dijkstra, cmr_dijkstra};
