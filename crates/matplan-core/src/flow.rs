//! Flow model: quantity-per-unit relationships between operations and
//! product-locations.
//!
//! An operation's consumed side is always a (possibly singleton) ordered
//! collection of flows; "single vs. simultaneous" is a derived property, not
//! a separate representation. The produced side holds exactly one flow --
//! multi-output operations are rejected by design.

use crate::fixed::Fixed64;
use crate::id::ProductLocationId;

// ---------------------------------------------------------------------------
// Flow kinds and outcomes
// ---------------------------------------------------------------------------

/// Whether a spec consumes or produces its flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FlowKind {
    Consume,
    Produce,
}

/// Outcome of adding a flow to a spec that tolerates re-adding the same
/// target. Re-adding is harmless; the original quantity is retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Added,
    AlreadyPresent,
}

impl FlowOutcome {
    pub fn was_added(self) -> bool {
        matches!(self, FlowOutcome::Added)
    }
}

/// Outcome of [`ProductionSpec::add_flow`]. The session maps `Conflict` into
/// a [`FlowError::MultiOutput`] carrying resolved keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductionOutcome {
    /// The spec was created with this flow.
    Added,
    /// Same target re-added; original quantity retained.
    AlreadyPresent,
    /// The spec already targets a different product-location.
    Conflict { existing: ProductLocationId },
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from flow construction and spec mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    /// Quantity-per-unit must be strictly positive.
    #[error("quantity per unit must be positive")]
    NonPositiveQuantity,

    /// A simultaneous spec cannot be built from an empty flow set.
    #[error("flow set must not be empty")]
    EmptyFlowSet,

    /// Each product-location may appear at most once in an initial flow set.
    #[error("duplicate flow target in initial set")]
    DuplicateFlowTarget,

    /// The flow target handle did not resolve to a live product-location.
    #[error("unknown product-location handle")]
    UnknownTarget,

    /// The operation handle did not resolve to a live operation.
    #[error("unknown operation handle")]
    UnknownOperation,

    /// Operations produce exactly one product-location.
    #[error(
        "operation '{operation}' already produces '{existing}'; cannot also produce '{rejected}'"
    )]
    MultiOutput {
        operation: String,
        existing: String,
        rejected: String,
    },
}

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

/// An immutable quantity-per-unit relationship with one product-location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Flow {
    target: ProductLocationId,
    quantity_per: Fixed64,
}

impl Flow {
    /// Fails when `quantity_per` is zero or negative.
    pub fn new(target: ProductLocationId, quantity_per: Fixed64) -> Result<Self, FlowError> {
        if quantity_per <= Fixed64::ZERO {
            return Err(FlowError::NonPositiveQuantity);
        }
        Ok(Self {
            target,
            quantity_per,
        })
    }

    pub fn target(&self) -> ProductLocationId {
        self.target
    }

    pub fn quantity_per(&self) -> Fixed64 {
        self.quantity_per
    }
}

// ---------------------------------------------------------------------------
// Consumption spec
// ---------------------------------------------------------------------------

/// The consumed side of an operation: an ordered set of flows, at most one
/// per product-location.
///
/// Holds one or more flows from construction on; a spec with exactly one
/// flow reports `is_single()`. Re-adding a target that is already present
/// keeps the original quantity and reports `AlreadyPresent`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConsumptionSpec {
    flows: Vec<Flow>,
}

impl ConsumptionSpec {
    pub fn new(first: Flow) -> Self {
        Self { flows: vec![first] }
    }

    /// Build from a non-empty initial set. Each product-location may appear
    /// at most once.
    pub fn from_flows(flows: Vec<Flow>) -> Result<Self, FlowError> {
        if flows.is_empty() {
            return Err(FlowError::EmptyFlowSet);
        }
        for (i, flow) in flows.iter().enumerate() {
            if flows[..i].iter().any(|f| f.target() == flow.target()) {
                return Err(FlowError::DuplicateFlowTarget);
            }
        }
        Ok(Self { flows })
    }

    pub fn kind(&self) -> FlowKind {
        FlowKind::Consume
    }

    /// Append a flow, unless its target is already consumed.
    pub fn add_flow(&mut self, flow: Flow) -> FlowOutcome {
        if self.contains(flow.target()) {
            return FlowOutcome::AlreadyPresent;
        }
        self.flows.push(flow);
        FlowOutcome::Added
    }

    /// Flows in insertion order.
    pub fn flows(&self) -> &[Flow] {
        &self.flows
    }

    pub fn contains(&self, target: ProductLocationId) -> bool {
        self.flows.iter().any(|f| f.target() == target)
    }

    /// Exactly one consumed flow.
    pub fn is_single(&self) -> bool {
        self.flows.len() == 1
    }

    /// Two or more flows consumed simultaneously.
    pub fn is_simultaneous(&self) -> bool {
        self.flows.len() > 1
    }
}

// ---------------------------------------------------------------------------
// Production spec
// ---------------------------------------------------------------------------

/// The produced side of an operation: exactly one flow.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProductionSpec {
    flow: Flow,
}

impl ProductionSpec {
    pub fn new(flow: Flow) -> Self {
        Self { flow }
    }

    pub fn kind(&self) -> FlowKind {
        FlowKind::Produce
    }

    /// Re-adding the existing target is a no-op; a different target is a
    /// conflict (multi-output is unsupported).
    pub fn add_flow(&mut self, flow: Flow) -> ProductionOutcome {
        if flow.target() == self.flow.target() {
            ProductionOutcome::AlreadyPresent
        } else {
            ProductionOutcome::Conflict {
                existing: self.flow.target(),
            }
        }
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    pub fn target(&self) -> ProductLocationId {
        self.flow.target()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
