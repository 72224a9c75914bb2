//! Plain data shared by every Vivarium crate: creature instances, species
//! definitions, snapshots and the live events emitted by the simulation.

pub mod data;

pub use data::creature::*;
pub use data::event::*;
pub use data::geometry::*;
pub use data::species::*;
