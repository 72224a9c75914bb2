//! Vivarium: a habitat of autonomous creatures driven by per-creature
//! engines from `vivarium_core`.
//!
//! The [`model::habitat::Habitat`] owns the live creatures and the injected
//! services; [`model::food::FoodField`] and [`model::rewards::RewardLedger`]
//! are ready-made resource and reward services.

pub mod model;
