//! End-to-end scenarios across the whole planning core: registries, flow
//! accumulation, resolution, and the inventory ledger working together.

use matplan_core::flow::{FlowError, FlowOutcome};
use matplan_core::operation::OperationType;
use matplan_core::resolver::ProducingOperation;
use matplan_core::session::PlanningSession;
use matplan_core::test_utils::*;
use matplan_core::validation::validate_session;

// ---------------------------------------------------------------------------
// Scenario: two plants compete to make the same car
// ---------------------------------------------------------------------------
#[test]
fn competing_car_plants_resolve_to_ranked_alternate() {
    let mut session = PlanningSession::new();

    let first = producer_of(&mut session, "MakeCarInBangalore1", 1, "Car", "Bangalore");
    let second = producer_of(&mut session, "MakeCarInBangalore2", 2, "Car", "Bangalore");
    consumes(&mut session, first, "Tyre", "Bangalore", 4.0);
    consumes(&mut session, first, "Engine", "Bangalore", 1.0);
    consumes(&mut session, second, "Tyre", "Bangalore", 4.0);

    let report = session.resolve_producing_operations();
    assert_eq!(report.resolved, 1);
    assert_eq!(report.alternate, 1);

    let car = session.product_location_id("Car", "Bangalore").unwrap();
    let assignment = session.producing_operation(car).unwrap();
    assert_eq!(assignment.operation_type(), Some(OperationType::Alternate));

    let alt = assignment.as_alternate().unwrap();
    assert_eq!(alt.member_count(), 2);
    assert_eq!(alt.operations_by_priority(), vec![(first, 1), (second, 2)]);
    assert_eq!(alt.preferred(), (first, 1));
}

// ---------------------------------------------------------------------------
// Scenario: a day of inventory movements
// ---------------------------------------------------------------------------
#[test]
fn inventory_walk_through_a_day() {
    let mut session = PlanningSession::new();
    let car = session.create_product_location("Car", "Bangalore").unwrap();

    // 08:00 +100, 12:00 +50, 14:00 -30 (timestamps as minutes since midnight).
    let ledger = session.ledger_mut(car).unwrap();
    ledger.add(480, qty(100.0)).unwrap();
    ledger.add(720, qty(50.0)).unwrap();
    ledger.remove(840, qty(30.0)).unwrap();

    let ledger = session.ledger(car).unwrap();
    assert_eq!(ledger.cumulative(720), qty(150.0));
    assert_eq!(ledger.cumulative(840), qty(120.0));
    assert_eq!(ledger.cumulative(479), qty(0.0));

    let afternoon = ledger.changes_in_range(720, 840);
    assert_eq!(afternoon, vec![(720, qty(50.0)), (840, qty(-30.0))]);
}

// ---------------------------------------------------------------------------
// Scenario: re-adding the same input is harmless
// ---------------------------------------------------------------------------
#[test]
fn duplicate_tyre_input_is_a_noop() {
    let mut session = PlanningSession::new();
    let tyre = session.create_product_location("Tyre", "Bangalore").unwrap();
    let op = session.create_operation("MakeCarInBangalore", 1).unwrap();

    assert_eq!(session.add_input(op, tyre, qty(4.0)).unwrap(), FlowOutcome::Added);
    assert_eq!(
        session.add_input(op, tyre, qty(4.0)).unwrap(),
        FlowOutcome::AlreadyPresent
    );

    let flows = session.get_operation(op).unwrap().consumed_flows();
    assert_eq!(flows.len(), 1);
    assert_eq!(flows[0].quantity_per(), qty(4.0));
}

// ---------------------------------------------------------------------------
// Scenario: multi-output rejection names both keys
// ---------------------------------------------------------------------------
#[test]
fn multi_output_rejection_names_both_keys() {
    let mut session = PlanningSession::new();
    let blr = session.create_product_location("Car", "Bangalore").unwrap();
    let del = session.create_product_location("Car", "Delhi").unwrap();
    let op = session.create_operation("MakeCar", 1).unwrap();

    session.add_output(op, blr, qty(1.0)).unwrap();
    let err = session.add_output(op, del, qty(1.0)).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Car@Bangalore"), "got: {message}");
    assert!(message.contains("Car@Delhi"), "got: {message}");
    assert!(matches!(err, FlowError::MultiOutput { .. }));
}

// ---------------------------------------------------------------------------
// Scenario: a small bill of materials, resolved and inspected
// ---------------------------------------------------------------------------
#[test]
fn bill_of_materials_end_to_end() {
    let mut session = PlanningSession::new();

    let make_car = producer_of(&mut session, "MakeCar", 1, "Car", "Bangalore");
    consumes(&mut session, make_car, "Tyre", "Bangalore", 4.0);
    consumes(&mut session, make_car, "Engine", "Bangalore", 1.0);

    producer_of(&mut session, "MouldTyre", 1, "Tyre", "Bangalore");
    producer_of(&mut session, "ImportTyre", 2, "Tyre", "Bangalore");
    producer_of(&mut session, "CastEngine", 1, "Engine", "Bangalore");

    let report = session.resolve_producing_operations();
    assert_eq!(report.resolved, 3);
    assert_eq!(report.basic, 2); // Car, Engine
    assert_eq!(report.alternate, 1); // Tyre

    let tyre = session.product_location_id("Tyre", "Bangalore").unwrap();
    let tyre_alt = session
        .producing_operation(tyre)
        .unwrap()
        .as_alternate()
        .unwrap();
    assert_eq!(tyre_alt.member_count(), 2);

    let snap = session.snapshot_operation(make_car).unwrap();
    assert_eq!(snap.inputs.len(), 2);
    assert_eq!(snap.output, Some(("Car@Bangalore".to_string(), qty(1.0))));

    assert!(validate_session(&session).is_clean());
}

// ---------------------------------------------------------------------------
// Scenario: registries answer the catalog surface
// ---------------------------------------------------------------------------
#[test]
fn catalog_surface_round_trip() {
    let mut session = PlanningSession::new();
    session.create_product_location("Widget", "Warehouse-A").unwrap();
    session.create_product_location("Widget", "Warehouse-B").unwrap();
    session.create_product_location("Gadget", "Warehouse-A").unwrap();

    assert_eq!(session.product_count(), 2);
    assert_eq!(session.location_count(), 2);
    assert_eq!(session.product_location_count(), 3);

    assert_eq!(session.product_locations_for_product("Widget").len(), 2);
    assert_eq!(session.product_locations_for_location("Warehouse-A").len(), 2);

    assert!(session.remove_product_location("Gadget", "Warehouse-A"));
    assert_eq!(session.product_location_count(), 2);
    // The product itself survives its last product-location.
    assert!(session.product_exists("Gadget"));
}

// ---------------------------------------------------------------------------
// Scenario: reset isolates planning runs
// ---------------------------------------------------------------------------
#[test]
fn reset_isolates_planning_runs() {
    let mut session = PlanningSession::new();
    producer_of(&mut session, "MakeCar", 1, "Car", "Bangalore");
    session.resolve_producing_operations();

    session.reset();

    assert_eq!(session.product_location_count(), 0);
    assert_eq!(session.operation_count(), 0);

    // Same keys can be registered again with fresh state.
    let op = producer_of(&mut session, "MakeCar", 7, "Car", "Bangalore");
    let car = session.product_location_id("Car", "Bangalore").unwrap();
    session.resolve_producing_operations();
    assert_eq!(
        session.producing_operation(car).unwrap(),
        &ProducingOperation::Basic(op)
    );
}
