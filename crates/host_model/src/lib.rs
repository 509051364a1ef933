#![doc = include_str!("../../../README.md")]

pub mod error;
pub mod host;
pub mod power_measurement;
pub mod power_model;
pub mod resources;
pub mod suitability;
