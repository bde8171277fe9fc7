//! Session consistency checks.
//!
//! Removal does not cascade: deleting a product-location leaves any
//! operation flows that referenced it dangling, and a resolution pass never
//! retracts an assignment whose producers have since disappeared. This pass
//! diagnoses both without mutating anything.

use crate::flow::FlowKind;
use crate::id::{OperationId, ProductLocationId};
use crate::operation::Operation;
use crate::resolver::ProducingOperation;
use crate::session::PlanningSession;

// ---------------------------------------------------------------------------
// Issue types
// ---------------------------------------------------------------------------

/// A single consistency finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// An operation flow references a product-location that was removed.
    DanglingFlowTarget {
        operation: String,
        kind: FlowKind,
    },
    /// An operation carries neither consumption nor production.
    EmptyOperation { operation: String },
    /// A producing-operation assignment references operations that no
    /// longer exist or no longer produce this product-location.
    StaleProducer { product_location: String },
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Pass
// ---------------------------------------------------------------------------

/// Check every operation flow and producer assignment against the live
/// registries.
pub fn validate_session(session: &PlanningSession) -> ValidationReport {
    let mut issues = Vec::new();

    for (_, op) in session.operations() {
        if !op.has_consumption() && !op.has_production() {
            issues.push(ValidationIssue::EmptyOperation {
                operation: op.key().to_string(),
            });
        }
        for flow in op.consumed_flows() {
            if session.get_product_location(flow.target()).is_none() {
                issues.push(ValidationIssue::DanglingFlowTarget {
                    operation: op.key().to_string(),
                    kind: FlowKind::Consume,
                });
            }
        }
        if let Some(flow) = op.produced_flow() {
            if session.get_product_location(flow.target()).is_none() {
                issues.push(ValidationIssue::DanglingFlowTarget {
                    operation: op.key().to_string(),
                    kind: FlowKind::Produce,
                });
            }
        }
    }

    for (id, pl) in session.product_locations() {
        let Some(assignment) = session.producing_operation(id) else {
            continue;
        };
        let stale = match assignment {
            ProducingOperation::Unset => false,
            ProducingOperation::Basic(op) => !still_produces(session, *op, id),
            ProducingOperation::Alternate(alt) => alt
                .members()
                .iter()
                .any(|&(op, _)| !still_produces(session, op, id)),
        };
        if stale {
            issues.push(ValidationIssue::StaleProducer {
                product_location: pl.key().to_string(),
            });
        }
    }

    ValidationReport { issues }
}

fn still_produces(
    session: &PlanningSession,
    op: OperationId,
    target: ProductLocationId,
) -> bool {
    session
        .get_operation(op)
        .and_then(Operation::produced_flow)
        .is_some_and(|flow| flow.target() == target)
}

// ===========================================================================
// Tests
// ===========================================================================
