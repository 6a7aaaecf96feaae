//! HTTP handlers, grouped by resource.

pub mod auth;
pub mod catalog;
pub mod evaluations;
pub mod streams;
