//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available to unit tests, the `tests/` directory, benchmarks, and
//! downstream test crates (via the `test-utils` feature).

use crate::fixed::Fixed64;
use crate::id::{OperationId, Priority};
use crate::session::PlanningSession;

// ===========================================================================
// Fixed-point helper
// ===========================================================================

pub fn qty(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

// ===========================================================================
// Session builders
// ===========================================================================

/// Register an operation that produces one unit of `product@location`.
/// Creates the product-location on demand.
pub fn producer_of(
    session: &mut PlanningSession,
    key: &str,
    priority: Priority,
    product: &str,
    location: &str,
) -> OperationId {
    let target = session
        .create_product_location(product, location)
        .expect("valid product/location names");
    let op = session
        .create_operation(key, priority)
        .expect("unique operation key");
    session
        .add_output(op, target, qty(1.0))
        .expect("first output on a fresh operation");
    op
}

/// Append a consumed flow to an operation, creating the product-location on
/// demand.
pub fn consumes(
    session: &mut PlanningSession,
    op: OperationId,
    product: &str,
    location: &str,
    quantity_per: f64,
) {
    let target = session
        .create_product_location(product, location)
        .expect("valid product/location names");
    session
        .add_input(op, target, qty(quantity_per))
        .expect("valid input flow");
}

/// Build a session where `makers` operations all produce the same
/// product-location, with priorities `1..=makers`.
pub fn competing_producers(product: &str, location: &str, makers: usize) -> PlanningSession {
    let mut session = PlanningSession::new();
    for i in 1..=makers {
        producer_of(
            &mut session,
            &format!("Make{product}In{location}{i}"),
            i as Priority,
            product,
            location,
        );
    }
    session
}
