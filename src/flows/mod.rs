//! One module per user-triggered flow. Each flow is a single async sequence
//! with RPC round-trips as its only suspension points, guarded against
//! re-entrant invocation by the client's per-flow gates.

pub mod list_offers;
pub mod make_offer;
pub mod setup;
pub mod take_offer;
