//! Alternate-operation resolution: the batch pass that assigns every
//! product-location its producing operation.
//!
//! Registering an operation declares "this can make X"; resolution decides
//! which operation actually makes X when several can, ranked by explicit
//! priority rather than declaration order. The pass is a full-registry
//! batch: each call re-derives and overwrites the assignment for every
//! product-location currently represented among production specs.

use std::collections::HashMap;

use crate::id::{OperationId, Priority, ProductLocationId};
use crate::operation::OperationType;
use crate::session::PlanningSession;

// ---------------------------------------------------------------------------
// AlternateOperation
// ---------------------------------------------------------------------------

/// A ranked, non-empty set of two or more operations that can all produce
/// the same product-location. Constructed only by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AlternateOperation {
    /// Members in discovery (registration) order.
    members: Vec<(OperationId, Priority)>,
}

impl AlternateOperation {
    pub(crate) fn new(members: Vec<(OperationId, Priority)>) -> Self {
        debug_assert!(members.len() >= 2, "alternates need at least two members");
        Self { members }
    }

    pub fn operation_type(&self) -> OperationType {
        OperationType::Alternate
    }

    /// Members in discovery order.
    pub fn members(&self) -> &[(OperationId, Priority)] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Members sorted ascending by priority value (lower = preferred).
    /// Ties keep discovery order -- the sort is stable.
    pub fn operations_by_priority(&self) -> Vec<(OperationId, Priority)> {
        let mut sorted = self.members.clone();
        sorted.sort_by_key(|&(_, priority)| priority);
        sorted
    }

    /// The preferred member: lowest priority value, first-registered on
    /// ties.
    pub fn preferred(&self) -> (OperationId, Priority) {
        let mut best = self.members[0];
        for &member in &self.members[1..] {
            if member.1 < best.1 {
                best = member;
            }
        }
        best
    }
}

// ---------------------------------------------------------------------------
// ProducingOperation
// ---------------------------------------------------------------------------

/// The producing-operation assignment of a product-location.
///
/// `Unset` until a resolution pass first sees a production spec targeting
/// the product-location. A later pass that finds no producers leaves the
/// previous assignment in place; the validation pass reports such stale
/// assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProducingOperation {
    #[default]
    Unset,
    /// Exactly one registered operation produces this product-location.
    Basic(OperationId),
    /// Two or more operations compete, ranked by priority.
    Alternate(AlternateOperation),
}

impl ProducingOperation {
    pub fn is_unset(&self) -> bool {
        matches!(self, ProducingOperation::Unset)
    }

    /// `Basic` or `Alternate`; `None` while unset.
    pub fn operation_type(&self) -> Option<OperationType> {
        match self {
            ProducingOperation::Unset => None,
            ProducingOperation::Basic(_) => Some(OperationType::Basic),
            ProducingOperation::Alternate(_) => Some(OperationType::Alternate),
        }
    }

    pub fn as_alternate(&self) -> Option<&AlternateOperation> {
        match self {
            ProducingOperation::Alternate(alt) => Some(alt),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution pass
// ---------------------------------------------------------------------------

/// Summary of one resolution pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    /// Product-locations that received an assignment this pass.
    pub resolved: usize,
    /// Assignments with exactly one producer.
    pub basic: usize,
    /// Assignments with two or more producers.
    pub alternate: usize,
}

impl PlanningSession {
    /// Derive the producing operation for every product-location that at
    /// least one registered operation produces.
    ///
    /// Product-locations no operation produces keep their previous
    /// assignment. Flows whose target was removed are skipped; the
    /// validation pass reports them as dangling. Safe to invoke repeatedly
    /// as operations are registered over time.
    pub fn resolve_producing_operations(&mut self) -> ResolutionReport {
        // Discovery: every live production spec, in registration order so
        // alternates keep a well-defined member order across slot reuse.
        let mut discovered: Vec<(u64, ProductLocationId, OperationId, Priority)> = self
            .operations()
            .filter_map(|(id, op)| {
                op.produced_flow()
                    .map(|flow| (op.seq(), flow.target(), id, op.priority()))
            })
            .filter(|&(_, target, _, _)| self.get_product_location(target).is_some())
            .collect();
        discovered.sort_by_key(|&(seq, _, _, _)| seq);

        let mut by_target: HashMap<ProductLocationId, Vec<(OperationId, Priority)>> =
            HashMap::new();
        for (_, target, op, priority) in discovered {
            by_target.entry(target).or_default().push((op, priority));
        }

        // Assignment: collected first, written second, so discovery never
        // observes a half-updated session.
        let mut report = ResolutionReport::default();
        for (target, candidates) in by_target {
            let assignment = if candidates.len() == 1 {
                report.basic += 1;
                ProducingOperation::Basic(candidates[0].0)
            } else {
                report.alternate += 1;
                ProducingOperation::Alternate(AlternateOperation::new(candidates))
            };
            self.set_producing_operation(target, assignment);
            report.resolved += 1;
        }

        tracing::debug!(
            resolved = report.resolved,
            basic = report.basic,
            alternate = report.alternate,
            "resolution pass complete"
        );
        report
    }
}

// ===========================================================================
// Tests
// ===========================================================================
