//! Read-only snapshot views over session state.
//!
//! Owned copies with no references into session storage -- suitable for
//! reporting layers and external consumers that outlive a borrow of the
//! session.

use crate::fixed::{Fixed64, Timestamp};
use crate::id::{OperationId, Priority, ProductLocationId};
use crate::resolver::ProducingOperation;
use crate::session::PlanningSession;

// ---------------------------------------------------------------------------
// Product-location snapshot
// ---------------------------------------------------------------------------

/// An aggregated, read-only view of a single product-location.
#[derive(Debug, Clone)]
pub struct ProductLocationSnapshot {
    pub id: ProductLocationId,
    /// Composite `product@location` key.
    pub key: String,
    /// The current producing-operation assignment.
    pub producing_operation: ProducingOperation,
    /// Every recorded ledger change, ascending by timestamp.
    pub inventory_changes: Vec<(Timestamp, Fixed64)>,
    /// Net position after the final recorded change.
    pub closing_inventory: Fixed64,
}

// ---------------------------------------------------------------------------
// Operation snapshot
// ---------------------------------------------------------------------------

/// An aggregated, read-only view of a single operation.
#[derive(Debug, Clone)]
pub struct OperationSnapshot {
    pub id: OperationId,
    pub key: String,
    pub priority: Priority,
    /// Consumed `(product-location key, quantity per unit)` pairs, in
    /// insertion order.
    pub inputs: Vec<(String, Fixed64)>,
    /// The produced pair, when production is set.
    pub output: Option<(String, Fixed64)>,
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

impl PlanningSession {
    /// Snapshot one product-location, or `None` for a stale handle.
    pub fn snapshot_product_location(
        &self,
        id: ProductLocationId,
    ) -> Option<ProductLocationSnapshot> {
        let pl = self.get_product_location(id)?;
        let ledger = self.ledger(id)?;
        let inventory_changes: Vec<_> = ledger.changes().collect();
        let closing_inventory = inventory_changes
            .iter()
            .fold(Fixed64::ZERO, |acc, &(_, change)| acc + change);
        Some(ProductLocationSnapshot {
            id,
            key: pl.key().to_string(),
            producing_operation: self
                .producing_operation(id)
                .cloned()
                .unwrap_or(ProducingOperation::Unset),
            inventory_changes,
            closing_inventory,
        })
    }

    /// Snapshot one operation, or `None` for a stale handle. Flow targets
    /// that were removed render as an empty key.
    pub fn snapshot_operation(&self, id: OperationId) -> Option<OperationSnapshot> {
        let op = self.get_operation(id)?;
        let key_of = |target| {
            self.get_product_location(target)
                .map(|pl| pl.key().to_string())
                .unwrap_or_default()
        };
        Some(OperationSnapshot {
            id,
            key: op.key().to_string(),
            priority: op.priority(),
            inputs: op
                .consumed_flows()
                .iter()
                .map(|flow| (key_of(flow.target()), flow.quantity_per()))
                .collect(),
            output: op
                .produced_flow()
                .map(|flow| (key_of(flow.target()), flow.quantity_per())),
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================
