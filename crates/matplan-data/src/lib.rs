//! Matplan data -- data-driven planning model loading.
//!
//! Deserializes planning models (products, locations, operations with their
//! flows, opening inventory movements) from RON, JSON, or TOML files and
//! applies them to a [`matplan_core::session::PlanningSession`]. The format
//! is detected from the file extension; string entry points take it
//! explicitly.

pub mod loader;
pub mod schema;
