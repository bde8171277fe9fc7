//! The planning session: explicit owner of every registry and all
//! per-product-location state.
//!
//! # Architecture
//!
//! A `PlanningSession` owns:
//! - Interned registries for [`Product`] and [`Location`] (name -> handle)
//! - The [`ProductLocation`] registry, indexed by composite key
//! - The [`Operation`] registry, indexed by unique operation key
//! - Per-product-location state in secondary maps: one [`InventoryLedger`]
//!   and one [`ProducingOperation`] assignment each
//!
//! All mutation goes through `&mut self`. The borrow checker confines a
//! session to a single logical owner at a time, which is this crate's whole
//! concurrency model: no internal locking, no atomicity guarantees across
//! sessions, and a resolution pass can never observe a half-mutated
//! registry.
//!
//! Removal does not cascade. Removing a product-location leaves any
//! operation flows that referenced it dangling; the
//! [`validation`](crate::validation) pass reports those.

use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;
use tracing::warn;

use crate::fixed::Fixed64;
use crate::flow::{Flow, FlowError, FlowOutcome, ProductionOutcome};
use crate::id::{LocationId, OperationId, Priority, ProductId, ProductLocationId};
use crate::ledger::InventoryLedger;
use crate::operation::Operation;
use crate::product_location::{self, ProductLocation};
use crate::registry::{Location, NamedStore, Product, RegistryError};
use crate::resolver::ProducingOperation;

/// One independent planning run: products, locations, product-locations,
/// operations, ledgers, and producing-operation assignments.
#[derive(Debug, Default)]
pub struct PlanningSession {
    products: NamedStore<ProductId, Product>,
    locations: NamedStore<LocationId, Location>,

    product_locations: SlotMap<ProductLocationId, ProductLocation>,
    by_key: HashMap<String, ProductLocationId>,

    operations: SlotMap<OperationId, Operation>,
    operation_keys: HashMap<String, OperationId>,
    /// Monotonic registration counter. Unlike slots, never reused.
    next_seq: u64,

    // -- Per-product-location state (SoA, keyed by ProductLocationId) --
    ledgers: SecondaryMap<ProductLocationId, InventoryLedger>,
    producers: SecondaryMap<ProductLocationId, ProducingOperation>,
}

impl PlanningSession {
    pub fn new() -> Self {
        Self::default()
    }

    // -----------------------------------------------------------------------
    // Products
    // -----------------------------------------------------------------------

    /// Create-or-get a product by name. Idempotent: a repeated name returns
    /// the original handle.
    pub fn create_product(&mut self, name: &str) -> Result<ProductId, RegistryError> {
        self.products.create(name, Product::new)
    }

    pub fn product_id(&self, name: &str) -> Option<ProductId> {
        self.products.id(name)
    }

    pub fn get_product(&self, id: ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn product_exists(&self, name: &str) -> bool {
        self.products.exists(name)
    }

    /// Remove a product by name. Does NOT remove product-locations that
    /// reference it.
    pub fn remove_product(&mut self, name: &str) -> bool {
        self.products.remove(name).is_some()
    }

    /// All products, unordered.
    pub fn products(&self) -> impl Iterator<Item = (ProductId, &Product)> {
        self.products.iter()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    // -----------------------------------------------------------------------
    // Locations
    // -----------------------------------------------------------------------

    /// Create-or-get a location by name. Idempotent like
    /// [`create_product`](Self::create_product).
    pub fn create_location(&mut self, name: &str) -> Result<LocationId, RegistryError> {
        self.locations.create(name, Location::new)
    }

    pub fn location_id(&self, name: &str) -> Option<LocationId> {
        self.locations.id(name)
    }

    pub fn get_location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id)
    }

    pub fn location_exists(&self, name: &str) -> bool {
        self.locations.exists(name)
    }

    /// Remove a location by name. Does NOT remove product-locations that
    /// reference it.
    pub fn remove_location(&mut self, name: &str) -> bool {
        self.locations.remove(name).is_some()
    }

    /// All locations, unordered.
    pub fn locations(&self) -> impl Iterator<Item = (LocationId, &Location)> {
        self.locations.iter()
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    // -----------------------------------------------------------------------
    // Product-locations
    // -----------------------------------------------------------------------

    /// Create-or-get a product-location from names, auto-creating the
    /// product and location as needed.
    pub fn create_product_location(
        &mut self,
        product: &str,
        location: &str,
    ) -> Result<ProductLocationId, RegistryError> {
        let product_id = self.create_product(product)?;
        let location_id = self.create_location(location)?;
        let key = product_location::make_key(product, location);
        Ok(self.intern_product_location(product_id, location_id, key))
    }

    /// Create-or-get from already-resolved handles. Fails on stale handles.
    pub fn create_product_location_from_ids(
        &mut self,
        product: ProductId,
        location: LocationId,
    ) -> Result<ProductLocationId, RegistryError> {
        let Some(p) = self.products.get(product) else {
            return Err(RegistryError::UnknownHandle("product"));
        };
        let Some(l) = self.locations.get(location) else {
            return Err(RegistryError::UnknownHandle("location"));
        };
        let key = product_location::make_key(p.name(), l.name());
        Ok(self.intern_product_location(product, location, key))
    }

    /// Create-or-get from a composite `product@location` key.
    pub fn create_product_location_by_key(
        &mut self,
        key: &str,
    ) -> Result<ProductLocationId, RegistryError> {
        let (product, location) = product_location::parse_key(key)?;
        self.create_product_location(product, location)
    }

    fn intern_product_location(
        &mut self,
        product: ProductId,
        location: LocationId,
        key: String,
    ) -> ProductLocationId {
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }
        let id = self
            .product_locations
            .insert(ProductLocation::new(product, location, key.clone()));
        self.by_key.insert(key, id);
        self.ledgers.insert(id, InventoryLedger::new());
        self.producers.insert(id, ProducingOperation::Unset);
        id
    }

    pub fn product_location_id(&self, product: &str, location: &str) -> Option<ProductLocationId> {
        self.by_key
            .get(&product_location::make_key(product, location))
            .copied()
    }

    pub fn product_location_id_by_key(&self, key: &str) -> Option<ProductLocationId> {
        self.by_key.get(key).copied()
    }

    pub fn get_product_location(&self, id: ProductLocationId) -> Option<&ProductLocation> {
        self.product_locations.get(id)
    }

    pub fn product_location_exists(&self, product: &str, location: &str) -> bool {
        self.product_location_id(product, location).is_some()
    }

    /// Remove a product-location with its ledger and producer assignment.
    /// Operation flows that referenced it are left dangling.
    pub fn remove_product_location(&mut self, product: &str, location: &str) -> bool {
        let key = product_location::make_key(product, location);
        self.remove_product_location_by_key(&key)
    }

    pub fn remove_product_location_by_key(&mut self, key: &str) -> bool {
        let Some(id) = self.by_key.remove(key) else {
            return false;
        };
        self.product_locations.remove(id);
        self.ledgers.remove(id);
        self.producers.remove(id);
        true
    }

    /// All product-locations, unordered.
    pub fn product_locations(&self) -> impl Iterator<Item = (ProductLocationId, &ProductLocation)> {
        self.product_locations.iter()
    }

    pub fn product_location_count(&self) -> usize {
        self.product_locations.len()
    }

    /// Product-locations stocking the named product.
    pub fn product_locations_for_product(&self, product: &str) -> Vec<ProductLocationId> {
        let Some(product_id) = self.product_id(product) else {
            return Vec::new();
        };
        self.product_locations
            .iter()
            .filter(|(_, pl)| pl.product() == product_id)
            .map(|(id, _)| id)
            .collect()
    }

    /// Product-locations at the named location.
    pub fn product_locations_for_location(&self, location: &str) -> Vec<ProductLocationId> {
        let Some(location_id) = self.location_id(location) else {
            return Vec::new();
        };
        self.product_locations
            .iter()
            .filter(|(_, pl)| pl.location() == location_id)
            .map(|(id, _)| id)
            .collect()
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Register an operation under a unique key. Unlike the entity
    /// registries this is not create-or-get: reusing a key is a conflict.
    pub fn create_operation(
        &mut self,
        key: &str,
        priority: Priority,
    ) -> Result<OperationId, RegistryError> {
        if key.trim().is_empty() {
            return Err(RegistryError::BlankName);
        }
        if self.operation_keys.contains_key(key) {
            return Err(RegistryError::DuplicateKey(key.to_string()));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        let id = self
            .operations
            .insert(Operation::new(key.to_string(), priority, seq));
        self.operation_keys.insert(key.to_string(), id);
        Ok(id)
    }

    pub fn operation_id(&self, key: &str) -> Option<OperationId> {
        self.operation_keys.get(key).copied()
    }

    pub fn get_operation(&self, id: OperationId) -> Option<&Operation> {
        self.operations.get(id)
    }

    pub fn operation_exists(&self, key: &str) -> bool {
        self.operation_keys.contains_key(key)
    }

    /// Remove an operation by key. Producer assignments that referenced it
    /// go stale until the next resolution pass re-derives them.
    pub fn remove_operation(&mut self, key: &str) -> bool {
        let Some(id) = self.operation_keys.remove(key) else {
            return false;
        };
        self.operations.remove(id);
        true
    }

    /// All operations, unordered.
    pub fn operations(&self) -> impl Iterator<Item = (OperationId, &Operation)> {
        self.operations.iter()
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    // -----------------------------------------------------------------------
    // Flow accumulation
    // -----------------------------------------------------------------------

    /// Append a consumed flow to an operation. Re-adding a product-location
    /// the operation already consumes keeps the original quantity and
    /// reports `AlreadyPresent`.
    pub fn add_input(
        &mut self,
        op: OperationId,
        target: ProductLocationId,
        quantity_per: Fixed64,
    ) -> Result<FlowOutcome, FlowError> {
        let flow = self.checked_flow(target, quantity_per)?;
        let target_key = self.key_of(target);
        let Some(operation) = self.operations.get_mut(op) else {
            return Err(FlowError::UnknownOperation);
        };
        let outcome = operation.add_input_flow(flow);
        if outcome == FlowOutcome::AlreadyPresent {
            warn!(
                operation = operation.key(),
                target = %target_key,
                "input flow already present; keeping original quantity"
            );
        }
        Ok(outcome)
    }

    /// Set or confirm an operation's produced flow. Producing a second,
    /// different product-location is rejected: multi-output is unsupported.
    pub fn add_output(
        &mut self,
        op: OperationId,
        target: ProductLocationId,
        quantity_per: Fixed64,
    ) -> Result<FlowOutcome, FlowError> {
        let flow = self.checked_flow(target, quantity_per)?;
        let target_key = self.key_of(target);
        let Some(operation) = self.operations.get_mut(op) else {
            return Err(FlowError::UnknownOperation);
        };
        let op_key = operation.key().to_string();
        match operation.add_output_flow(flow) {
            ProductionOutcome::Added => Ok(FlowOutcome::Added),
            ProductionOutcome::AlreadyPresent => {
                warn!(
                    operation = %op_key,
                    target = %target_key,
                    "output flow already present; keeping original quantity"
                );
                Ok(FlowOutcome::AlreadyPresent)
            }
            ProductionOutcome::Conflict { existing } => Err(FlowError::MultiOutput {
                operation: op_key,
                existing: self.key_of(existing),
                rejected: target_key,
            }),
        }
    }

    fn checked_flow(
        &self,
        target: ProductLocationId,
        quantity_per: Fixed64,
    ) -> Result<Flow, FlowError> {
        if !self.product_locations.contains_key(target) {
            return Err(FlowError::UnknownTarget);
        }
        Flow::new(target, quantity_per)
    }

    fn key_of(&self, id: ProductLocationId) -> String {
        self.product_locations
            .get(id)
            .map(|pl| pl.key().to_string())
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // Per-product-location state
    // -----------------------------------------------------------------------

    /// The inventory ledger of a product-location.
    pub fn ledger(&self, id: ProductLocationId) -> Option<&InventoryLedger> {
        self.ledgers.get(id)
    }

    /// Mutable ledger access for recording movements.
    pub fn ledger_mut(&mut self, id: ProductLocationId) -> Option<&mut InventoryLedger> {
        self.ledgers.get_mut(id)
    }

    /// The producing-operation assignment of a product-location, written by
    /// the resolver.
    pub fn producing_operation(&self, id: ProductLocationId) -> Option<&ProducingOperation> {
        self.producers.get(id)
    }

    pub(crate) fn set_producing_operation(
        &mut self,
        id: ProductLocationId,
        assignment: ProducingOperation,
    ) {
        self.producers.insert(id, assignment);
    }

    // -----------------------------------------------------------------------
    // Reset
    // -----------------------------------------------------------------------

    /// Clear every registry, ledger, and assignment. Intended for test
    /// isolation between planning runs.
    pub fn reset(&mut self) {
        self.products.clear();
        self.locations.clear();
        self.product_locations.clear();
        self.by_key.clear();
        self.operations.clear();
        self.operation_keys.clear();
        self.ledgers.clear();
        self.producers.clear();
        self.next_seq = 0;
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::qty;

    #[test]
    fn create_product_location_auto_creates_parts() {
        let mut session = PlanningSession::new();
        let pl = session.create_product_location("Car", "Bangalore").unwrap();
        assert!(session.product_exists("Car"));
        assert!(session.location_exists("Bangalore"));
        assert_eq!(
            session.get_product_location(pl).map(ProductLocation::key),
            Some("Car@Bangalore")
        );
    }

    #[test]
    fn create_product_location_is_idempotent() {
        let mut session = PlanningSession::new();
        let a = session.create_product_location("Car", "Bangalore").unwrap();
        let b = session.create_product_location("Car", "Bangalore").unwrap();
        assert_eq!(a, b);
        assert_eq!(session.product_location_count(), 1);
    }

    #[test]
    fn create_product_location_rejects_blank_parts() {
        let mut session = PlanningSession::new();
        assert_eq!(
            session.create_product_location("", "Bangalore"),
            Err(RegistryError::BlankName)
        );
        assert_eq!(
            session.create_product_location("Car", "  "),
            Err(RegistryError::BlankName)
        );
        assert_eq!(session.product_location_count(), 0);
    }

    #[test]
    fn create_from_ids_rejects_stale_handles() {
        let mut session = PlanningSession::new();
        let product = session.create_product("Car").unwrap();
        let location = session.create_location("Bangalore").unwrap();
        session.remove_location("Bangalore");
        assert_eq!(
            session.create_product_location_from_ids(product, location),
            Err(RegistryError::UnknownHandle("location"))
        );
    }

    #[test]
    fn create_from_ids_matches_name_based_interning() {
        let mut session = PlanningSession::new();
        let product = session.create_product("Car").unwrap();
        let location = session.create_location("Bangalore").unwrap();
        let by_ids = session
            .create_product_location_from_ids(product, location)
            .unwrap();
        let by_names = session.create_product_location("Car", "Bangalore").unwrap();
        assert_eq!(by_ids, by_names);
    }

    #[test]
    fn lookup_by_composite_key() {
        let mut session = PlanningSession::new();
        let pl = session
            .create_product_location_by_key("Car@Bangalore")
            .unwrap();
        assert_eq!(session.product_location_id_by_key("Car@Bangalore"), Some(pl));
        assert_eq!(session.product_location_id("Car", "Bangalore"), Some(pl));
        assert!(
            session
                .create_product_location_by_key("no-separator")
                .is_err()
        );
    }

    #[test]
    fn filtered_views_by_product_and_location() {
        let mut session = PlanningSession::new();
        let widget_a = session
            .create_product_location("Widget", "Warehouse-A")
            .unwrap();
        let widget_b = session
            .create_product_location("Widget", "Warehouse-B")
            .unwrap();
        let gadget_a = session
            .create_product_location("Gadget", "Warehouse-A")
            .unwrap();

        let mut widgets = session.product_locations_for_product("Widget");
        widgets.sort();
        let mut expected = vec![widget_a, widget_b];
        expected.sort();
        assert_eq!(widgets, expected);

        let mut at_a = session.product_locations_for_location("Warehouse-A");
        at_a.sort();
        let mut expected = vec![widget_a, gadget_a];
        expected.sort();
        assert_eq!(at_a, expected);

        assert!(session.product_locations_for_product("Unknown").is_empty());
    }

    #[test]
    fn operation_keys_are_unique() {
        let mut session = PlanningSession::new();
        session.create_operation("MakeCar", 1).unwrap();
        assert_eq!(
            session.create_operation("MakeCar", 2),
            Err(RegistryError::DuplicateKey("MakeCar".to_string()))
        );
        assert_eq!(session.operation_count(), 1);
    }

    #[test]
    fn operation_blank_key_rejected() {
        let mut session = PlanningSession::new();
        assert_eq!(
            session.create_operation("  ", 1),
            Err(RegistryError::BlankName)
        );
    }

    #[test]
    fn add_input_builds_consumption() {
        let mut session = PlanningSession::new();
        let tyre = session.create_product_location("Tyre", "Bangalore").unwrap();
        let engine = session
            .create_product_location("Engine", "Bangalore")
            .unwrap();
        let op = session.create_operation("MakeCar", 1).unwrap();

        assert_eq!(
            session.add_input(op, tyre, qty(4.0)).unwrap(),
            FlowOutcome::Added
        );
        assert_eq!(
            session.add_input(op, engine, qty(1.0)).unwrap(),
            FlowOutcome::Added
        );

        let operation = session.get_operation(op).unwrap();
        assert!(operation.consumes_simultaneous());
        assert_eq!(operation.consumed_flows().len(), 2);
        assert_eq!(operation.consumed_flows()[0].target(), tyre);
    }

    #[test]
    fn duplicate_input_is_reported_not_applied() {
        let mut session = PlanningSession::new();
        let tyre = session.create_product_location("Tyre", "Bangalore").unwrap();
        let op = session.create_operation("MakeCar", 1).unwrap();

        session.add_input(op, tyre, qty(4.0)).unwrap();
        assert_eq!(
            session.add_input(op, tyre, qty(4.0)).unwrap(),
            FlowOutcome::AlreadyPresent
        );

        let flows = session.get_operation(op).unwrap().consumed_flows();
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].quantity_per(), qty(4.0));
    }

    #[test]
    fn add_input_validates_quantity_and_handles() {
        let mut session = PlanningSession::new();
        let tyre = session.create_product_location("Tyre", "Bangalore").unwrap();
        let op = session.create_operation("MakeCar", 1).unwrap();

        assert_eq!(
            session.add_input(op, tyre, qty(0.0)),
            Err(FlowError::NonPositiveQuantity)
        );
        session.remove_product_location("Tyre", "Bangalore");
        assert_eq!(
            session.add_input(op, tyre, qty(4.0)),
            Err(FlowError::UnknownTarget)
        );
    }

    #[test]
    fn add_output_to_second_target_names_both_keys() {
        let mut session = PlanningSession::new();
        let car_blr = session.create_product_location("Car", "Bangalore").unwrap();
        let car_del = session.create_product_location("Car", "Delhi").unwrap();
        let op = session.create_operation("MakeCar", 1).unwrap();

        session.add_output(op, car_blr, qty(1.0)).unwrap();
        let err = session.add_output(op, car_del, qty(1.0)).unwrap_err();
        match err {
            FlowError::MultiOutput {
                operation,
                existing,
                rejected,
            } => {
                assert_eq!(operation, "MakeCar");
                assert_eq!(existing, "Car@Bangalore");
                assert_eq!(rejected, "Car@Delhi");
            }
            other => panic!("expected MultiOutput, got {other:?}"),
        }
        // Production untouched by the failed call.
        let produced = session.get_operation(op).unwrap().produced_flow().unwrap();
        assert_eq!(produced.target(), car_blr);
    }

    #[test]
    fn add_output_same_target_is_a_noop() {
        let mut session = PlanningSession::new();
        let car = session.create_product_location("Car", "Bangalore").unwrap();
        let op = session.create_operation("MakeCar", 1).unwrap();
        session.add_output(op, car, qty(1.0)).unwrap();
        assert_eq!(
            session.add_output(op, car, qty(2.0)).unwrap(),
            FlowOutcome::AlreadyPresent
        );
        let produced = session.get_operation(op).unwrap().produced_flow().unwrap();
        assert_eq!(produced.quantity_per(), qty(1.0));
    }

    #[test]
    fn operation_accumulates_both_sides() {
        let mut session = PlanningSession::new();
        let tyre = session.create_product_location("Tyre", "Bangalore").unwrap();
        let car = session.create_product_location("Car", "Bangalore").unwrap();
        let op = session.create_operation("MakeCar", 1).unwrap();
        session.add_input(op, tyre, qty(4.0)).unwrap();
        session.add_output(op, car, qty(1.0)).unwrap();

        let operation = session.get_operation(op).unwrap();
        assert!(operation.has_consumption());
        assert!(operation.consumes_single());
        assert_eq!(operation.produced_flow().map(Flow::target), Some(car));
    }

    #[test]
    fn ledger_access_per_product_location() {
        let mut session = PlanningSession::new();
        let pl = session.create_product_location("Car", "Bangalore").unwrap();
        session.ledger_mut(pl).unwrap().add(480, qty(100.0)).unwrap();
        assert_eq!(session.ledger(pl).unwrap().cumulative(500), qty(100.0));
    }

    #[test]
    fn removal_drops_ledger_and_producer_state() {
        let mut session = PlanningSession::new();
        let pl = session.create_product_location("Car", "Bangalore").unwrap();
        session.ledger_mut(pl).unwrap().add(480, qty(1.0)).unwrap();
        assert!(session.remove_product_location("Car", "Bangalore"));
        assert!(session.ledger(pl).is_none());
        assert!(session.producing_operation(pl).is_none());
        assert!(!session.remove_product_location("Car", "Bangalore"));
    }

    #[test]
    fn recreated_product_location_starts_fresh() {
        let mut session = PlanningSession::new();
        let first = session.create_product_location("Car", "Bangalore").unwrap();
        session.ledger_mut(first).unwrap().add(480, qty(9.0)).unwrap();
        session.remove_product_location("Car", "Bangalore");

        let second = session.create_product_location("Car", "Bangalore").unwrap();
        assert_ne!(first, second);
        assert!(session.ledger(second).unwrap().is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = PlanningSession::new();
        let pl = session.create_product_location("Car", "Bangalore").unwrap();
        let op = session.create_operation("MakeCar", 1).unwrap();
        session.add_output(op, pl, qty(1.0)).unwrap();
        session.ledger_mut(pl).unwrap().add(480, qty(1.0)).unwrap();

        session.reset();

        assert_eq!(session.product_count(), 0);
        assert_eq!(session.location_count(), 0);
        assert_eq!(session.product_location_count(), 0);
        assert_eq!(session.operation_count(), 0);
        assert!(!session.operation_exists("MakeCar"));
        // The session is immediately reusable.
        session.create_operation("MakeCar", 1).unwrap();
    }
}
