//! Primitive types shared by the contact, route, and search modules.

/// The unique identifier of a network node.
pub type NodeId = u32;

/// An integer time instant (or duration), in whatever consistent unit the
/// caller's contact plan uses (seconds are typical).
pub type Time = i64;

/// A data transfer rate, in bytes (or bits) per unit time.
pub type Rate = i64;

/// A quantity of data, in bytes (or bits), consistent with [`Rate`].
pub type Volume = i64;

/// Sentinel standing in for "+infinity" in arrival-time and volume comparisons.
pub const INFINITY: Time = Time::MAX;
