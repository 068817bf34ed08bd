//! Bridged rooms: link registry, lifecycle and per-room event pump.
//!
//! ## Module Structure
//!
//! - `links`: Matrix rooms linked to one Gitter room, plus the portal
//! - `state`: Lifecycle states and legal transitions
//! - `pump`: Task feeding Gitter streams into the inbound relay
//! - `room`: `BridgedRoom`, the aggregate tying the above together

pub mod links;
mod pump;
pub mod room;
pub mod state;

pub use links::RoomLinks;
pub use room::BridgedRoom;
pub use state::RoomState;
