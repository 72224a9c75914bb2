//! Core data structures for the Vivarium simulation.

pub mod creature;
pub mod event;
pub mod geometry;
pub mod species;
