//! End-to-end scenarios for the match coordinator
//!
//! Each test drives a tiny level through taps, transit completions, and bus
//! lifecycle signals, then checks the terminal outcome.

use busjam_core_rs::{
    BusSpec, BusState, LevelConfig, LevelOutcome, LossReason, MatchCoordinator, PassengerColor,
    PassengerLocation, SelectOutcome, SelectionRejection,
};

fn level(
    width: usize,
    height: usize,
    colors: Vec<PassengerColor>,
    buses: Vec<BusSpec>,
    queue_capacity: usize,
) -> LevelConfig {
    LevelConfig {
        grid_width: width,
        grid_height: height,
        passenger_colors: colors,
        buses,
        queue_capacity,
        timer_ticks: 100,
    }
}

/// Passenger ID at a spawn-order index
fn passenger_at(coordinator: &MatchCoordinator, index: usize) -> String {
    coordinator
        .passengers()
        .nth(index)
        .expect("passenger exists")
        .id()
        .to_string()
}

/// Act as the movement collaborator: complete every pending move, including
/// chained ones, in FIFO order.
fn drain_transits(coordinator: &mut MatchCoordinator) {
    while let Some(request) = coordinator.pending_transits().first().cloned() {
        coordinator.complete_transit(request.transit_id).unwrap();
    }
}

#[test]
fn test_scenario_a_leftover_passenger_loses_on_exhaustion() {
    // Grid 2x1 with [Red, Blue]; one Red bus of capacity 1.
    let config = level(
        2,
        1,
        vec![PassengerColor::Red, PassengerColor::Blue],
        vec![BusSpec::with_capacity(PassengerColor::Red, 1)],
        6,
    );
    let mut coordinator = MatchCoordinator::new(&config).unwrap();
    coordinator.complete_bus_arrival().unwrap();

    let red = passenger_at(&coordinator, 0);
    assert!(matches!(
        coordinator.select_passenger(&red).unwrap(),
        SelectOutcome::MovingToBus { .. }
    ));
    drain_transits(&mut coordinator);

    // Bus is full and departing; Blue is still on the grid.
    assert_eq!(
        coordinator.dispatcher().active_bus().unwrap().state(),
        BusState::Departing
    );
    let outcome = coordinator.complete_bus_departure().unwrap();
    assert_eq!(outcome, Some(LevelOutcome::Loss(LossReason::BusesExhausted)));
    assert_eq!(coordinator.active_passenger_count(), 1);
}

#[test]
fn test_scenario_b_win_after_last_departure() {
    // Grid 1x1 with [Red]; one Red bus of capacity 1.
    let config = level(
        1,
        1,
        vec![PassengerColor::Red],
        vec![BusSpec::with_capacity(PassengerColor::Red, 1)],
        2,
    );
    let mut coordinator = MatchCoordinator::new(&config).unwrap();
    coordinator.complete_bus_arrival().unwrap();

    let red = passenger_at(&coordinator, 0);
    coordinator.select_passenger(&red).unwrap();
    drain_transits(&mut coordinator);

    let outcome = coordinator.complete_bus_departure().unwrap();
    assert_eq!(outcome, Some(LevelOutcome::Win));
    assert_eq!(coordinator.active_passenger_count(), 0);
}

#[test]
fn test_win_requires_every_configured_bus_to_depart() {
    // Same single passenger, but two Red buses: after the first departure
    // the departed count is below the level total, so no outcome yet.
    let config = level(
        1,
        1,
        vec![PassengerColor::Red],
        vec![
            BusSpec::with_capacity(PassengerColor::Red, 1),
            BusSpec::with_capacity(PassengerColor::Red, 1),
        ],
        2,
    );
    let mut coordinator = MatchCoordinator::new(&config).unwrap();
    coordinator.complete_bus_arrival().unwrap();

    let red = passenger_at(&coordinator, 0);
    coordinator.select_passenger(&red).unwrap();
    drain_transits(&mut coordinator);

    let outcome = coordinator.complete_bus_departure().unwrap();
    assert_eq!(outcome, None);
    // The second bus took over as the single active bus.
    assert!(coordinator.dispatcher().any_bus_remaining());
}

#[test]
fn test_scenario_c_path_blocking_and_unblocking() {
    // One column, two rows: row 0 Red (front), row 1 Blue behind it.
    let config = level(
        1,
        2,
        vec![PassengerColor::Red, PassengerColor::Blue],
        vec![BusSpec::with_capacity(PassengerColor::Red, 2)],
        6,
    );
    let mut coordinator = MatchCoordinator::new(&config).unwrap();
    coordinator.complete_bus_arrival().unwrap();

    let red = passenger_at(&coordinator, 0);
    let blue = passenger_at(&coordinator, 1);

    // Blue's path is blocked by Red; the tap rejects with no movement.
    assert_eq!(
        coordinator.select_passenger(&blue).unwrap(),
        SelectOutcome::Rejected(SelectionRejection::PathBlocked)
    );
    assert_eq!(
        coordinator.passenger(&blue).unwrap().location(),
        PassengerLocation::GridCell { row: 1, col: 0 }
    );

    // Board Red, freeing the column.
    coordinator.select_passenger(&red).unwrap();
    drain_transits(&mut coordinator);

    // Blue's path is clear now; it cannot board the Red bus but it is
    // allowed to move into the waiting queue.
    assert!(matches!(
        coordinator.select_passenger(&blue).unwrap(),
        SelectOutcome::MovingToQueue { slot: 0, .. }
    ));
}

#[test]
fn test_scenario_d_full_queue_rejects_second_displacement() {
    // Two Greens with no matching bus, one queue slot.
    let config = level(
        2,
        1,
        vec![PassengerColor::Green, PassengerColor::Green],
        vec![BusSpec::with_capacity(PassengerColor::Red, 1)],
        1,
    );
    let mut coordinator = MatchCoordinator::new(&config).unwrap();
    coordinator.complete_bus_arrival().unwrap();

    let a = passenger_at(&coordinator, 0);
    let b = passenger_at(&coordinator, 1);

    assert!(matches!(
        coordinator.select_passenger(&a).unwrap(),
        SelectOutcome::MovingToQueue { slot: 0, .. }
    ));
    drain_transits(&mut coordinator);
    assert_eq!(
        coordinator.passenger(&a).unwrap().location(),
        PassengerLocation::QueueSlot(0)
    );

    // The only slot is taken; B stays on the grid, state unchanged.
    assert_eq!(
        coordinator.select_passenger(&b).unwrap(),
        SelectOutcome::Rejected(SelectionRejection::QueueFull)
    );
    assert_eq!(
        coordinator.passenger(&b).unwrap().location(),
        PassengerLocation::GridCell { row: 0, col: 1 }
    );
    assert_eq!(coordinator.grid().occupied_count(), 1);
}

#[test]
fn test_queued_sweep_then_win_across_two_buses() {
    // Blue bus first, then a Red bus that collects two queued Reds.
    let config = level(
        3,
        1,
        vec![
            PassengerColor::Red,
            PassengerColor::Red,
            PassengerColor::Blue,
        ],
        vec![
            BusSpec::with_capacity(PassengerColor::Blue, 1),
            BusSpec::with_capacity(PassengerColor::Red, 2),
        ],
        6,
    );
    let mut coordinator = MatchCoordinator::new(&config).unwrap();
    coordinator.complete_bus_arrival().unwrap();

    let red_a = passenger_at(&coordinator, 0);
    let red_b = passenger_at(&coordinator, 1);
    let blue = passenger_at(&coordinator, 2);

    // Reds park in the queue while the Blue bus is at the stop.
    coordinator.select_passenger(&red_a).unwrap();
    coordinator.select_passenger(&red_b).unwrap();
    drain_transits(&mut coordinator);

    // Blue boards; bus 1 fills and departs.
    coordinator.select_passenger(&blue).unwrap();
    drain_transits(&mut coordinator);
    assert_eq!(coordinator.complete_bus_departure().unwrap(), None);

    // Red bus arrives; the sweep boards both queued Reds in slot order.
    coordinator.complete_bus_arrival().unwrap();
    assert_eq!(coordinator.pending_transits().len(), 2);
    drain_transits(&mut coordinator);

    assert!(coordinator.queue().is_empty());
    assert_eq!(
        coordinator.complete_bus_departure().unwrap(),
        Some(LevelOutcome::Win)
    );
}
