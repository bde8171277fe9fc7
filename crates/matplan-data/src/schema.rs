//! Serde data file structs for planning model definitions.
//!
//! These structs define the on-disk format for products, locations,
//! operations, and opening inventory movements. They are deserialized from
//! RON, JSON, or TOML data files and then applied to a planning session by
//! the loader.

use serde::Deserialize;

/// Top-level planning model document.
///
/// Products and locations may be listed explicitly, but any name appearing
/// in a `product@location` key is created on demand, so the lists are only
/// needed for catalog entries no flow references.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelData {
    #[serde(default)]
    pub products: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub operations: Vec<OperationData>,
    #[serde(default)]
    pub inventory: Vec<MovementData>,
}

/// An operation definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationData {
    pub key: String,
    /// Lower values are preferred by the resolver.
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub inputs: Vec<FlowData>,
    #[serde(default)]
    pub output: Option<FlowData>,
}

/// A flow entry. `at` is a composite `product@location` key.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowData {
    pub at: String,
    pub quantity_per: f64,
}

/// An opening inventory movement.
#[derive(Debug, Clone, Deserialize)]
pub struct MovementData {
    /// Composite `product@location` key.
    pub at: String,
    pub time: i64,
    /// Signed net change: positive quantities are added, negative removed.
    /// With `set`, the value overwrites the slot instead.
    pub quantity: f64,
    #[serde(default)]
    pub set: bool,
}
