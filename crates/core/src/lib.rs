//! Domain primitives shared by every Streamsight Studio crate.
//!
//! This crate has zero internal dependencies so the API/repository layer and
//! any future worker or CLI tooling can all use it.

pub mod correlation;
pub mod error;
pub mod status;
pub mod types;
