//! Matplan core -- a supply-chain planning graph for MRP engines.
//!
//! This crate models named products at named locations, the operations that
//! transform inputs into outputs at those locations, and a time-indexed
//! ledger of inventory movements per product-location pair. Planning
//! engines use it to answer two questions for any product-location: which
//! operation currently supplies it, and what its net inventory looks like
//! over time.
//!
//! # Planning Pipeline
//!
//! Everything hangs off a [`session::PlanningSession`], an explicit context
//! object (there are no process-wide registries):
//!
//! 1. **Register** products, locations, and product-locations. Creation is
//!    create-or-get: names are interned to stable handles.
//! 2. **Declare** operations and accumulate their consumed/produced flows
//!    via `add_input` / `add_output`.
//! 3. **Resolve**: [`session::PlanningSession::resolve_producing_operations`]
//!    runs a batch pass that assigns every produced product-location either
//!    its single producer or a priority-ranked
//!    [`resolver::AlternateOperation`].
//! 4. **Record and query** inventory movements on each product-location's
//!    [`ledger::InventoryLedger`].
//!
//! # Key Types
//!
//! - [`session::PlanningSession`] -- owner of all registries and state.
//! - [`flow::Flow`] -- a quantity-per-unit relationship with one
//!   product-location; [`flow::ConsumptionSpec`] and
//!   [`flow::ProductionSpec`] are the two sides of an operation.
//! - [`operation::Operation`] -- a keyed, prioritized transformation.
//! - [`resolver::ProducingOperation`] -- `Unset | Basic | Alternate`, the
//!   assignment written by the resolver.
//! - [`ledger::InventoryLedger`] -- ordered time-series of net quantity
//!   changes with accumulate/overwrite/prefix-sum queries.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point used for all quantities.
//!
//! # Concurrency
//!
//! The session is single-owner by construction: every mutation takes
//! `&mut self`, so the borrow checker rules out concurrent registry or
//! ledger mutation and guarantees resolution passes see a stable registry.
//! There is no internal locking.

pub mod fixed;
pub mod flow;
pub mod id;
pub mod ledger;
pub mod operation;
pub mod product_location;
pub mod query;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
