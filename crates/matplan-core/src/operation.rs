//! Operations: named, prioritized transformations with at most one
//! consumption spec and at most one production spec.
//!
//! Key and priority are fixed at registration. Flow specs grow monotonically
//! through the session's `add_input`/`add_output`; flows are never removed
//! through the public surface.

use crate::flow::{ConsumptionSpec, Flow, FlowOutcome, ProductionOutcome, ProductionSpec};
use crate::id::Priority;

/// How a product-location is supplied: by a single operation, or by a ranked
/// set of competing alternates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OperationType {
    Basic,
    Alternate,
}

/// A named, prioritized transformation of consumed flows into one produced
/// flow.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Operation {
    key: String,
    priority: Priority,
    /// Registration order within the session. The resolver uses this as the
    /// discovery order for alternates, which stays well-defined even when
    /// removed operations free their slots for reuse.
    seq: u64,
    consumption: Option<ConsumptionSpec>,
    production: Option<ProductionSpec>,
}

impl Operation {
    pub(crate) fn new(key: String, priority: Priority, seq: u64) -> Self {
        Self {
            key,
            priority,
            seq,
            consumption: None,
            production: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }

    /// A plain operation is `Basic`; `Alternate` exists only as a resolver
    /// product.
    pub fn operation_type(&self) -> OperationType {
        OperationType::Basic
    }

    pub fn has_consumption(&self) -> bool {
        self.consumption.is_some()
    }

    pub fn has_production(&self) -> bool {
        self.production.is_some()
    }

    /// True when the consumed side holds exactly one flow.
    pub fn consumes_single(&self) -> bool {
        self.consumption.as_ref().is_some_and(ConsumptionSpec::is_single)
    }

    /// True when the consumed side holds two or more simultaneous flows.
    pub fn consumes_simultaneous(&self) -> bool {
        self.consumption
            .as_ref()
            .is_some_and(ConsumptionSpec::is_simultaneous)
    }

    /// Flattened list of consumed flows, empty when no consumption is set.
    pub fn consumed_flows(&self) -> &[Flow] {
        self.consumption
            .as_ref()
            .map(ConsumptionSpec::flows)
            .unwrap_or(&[])
    }

    /// The single produced flow, when production is set.
    pub fn produced_flow(&self) -> Option<&Flow> {
        self.production.as_ref().map(ProductionSpec::flow)
    }

    /// Append a consumed flow, creating the collection on first use.
    pub(crate) fn add_input_flow(&mut self, flow: Flow) -> FlowOutcome {
        match &mut self.consumption {
            Some(spec) => spec.add_flow(flow),
            None => {
                self.consumption = Some(ConsumptionSpec::new(flow));
                FlowOutcome::Added
            }
        }
    }

    /// Set the produced flow on first use; afterwards delegate to the spec's
    /// same-target/conflict rules.
    pub(crate) fn add_output_flow(&mut self, flow: Flow) -> ProductionOutcome {
        match &mut self.production {
            Some(spec) => spec.add_flow(flow),
            None => {
                self.production = Some(ProductionSpec::new(flow));
                ProductionOutcome::Added
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
