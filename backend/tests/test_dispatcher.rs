//! Dispatcher ordering and countdown behavior through the coordinator.

use busjam_core_rs::{
    BusSpec, BusState, LevelConfig, LevelOutcome, LossReason, MatchCoordinator, PassengerColor,
};

fn level_with_buses(buses: Vec<BusSpec>, timer_ticks: usize) -> LevelConfig {
    LevelConfig {
        grid_width: 1,
        grid_height: 1,
        passenger_colors: vec![PassengerColor::Red],
        buses,
        queue_capacity: 2,
        timer_ticks,
    }
}

fn drain_transits(coordinator: &mut MatchCoordinator) {
    while let Some(request) = coordinator.pending_transits().first().cloned() {
        coordinator.complete_transit(request.transit_id).unwrap();
    }
}

#[test]
fn test_buses_activate_in_level_order() {
    let config = level_with_buses(
        vec![
            BusSpec::with_capacity(PassengerColor::Red, 1),
            BusSpec::with_capacity(PassengerColor::Green, 1),
            BusSpec::with_capacity(PassengerColor::Blue, 1),
        ],
        100,
    );
    let mut coordinator = MatchCoordinator::new(&config).unwrap();

    assert_eq!(
        coordinator.dispatcher().active_bus().unwrap().color(),
        PassengerColor::Red
    );

    // Board the only rider so the first bus can leave.
    coordinator.complete_bus_arrival().unwrap();
    let red = coordinator.passengers().next().unwrap().id().to_string();
    coordinator.select_passenger(&red).unwrap();
    drain_transits(&mut coordinator);
    coordinator.complete_bus_departure().unwrap();

    assert_eq!(
        coordinator.dispatcher().active_bus().unwrap().color(),
        PassengerColor::Green
    );
    assert_eq!(coordinator.dispatcher().departed_count(), 1);
}

#[test]
fn test_at_most_one_bus_is_ever_active() {
    let config = level_with_buses(
        vec![
            BusSpec::with_capacity(PassengerColor::Red, 1),
            BusSpec::with_capacity(PassengerColor::Red, 1),
        ],
        100,
    );
    let coordinator = MatchCoordinator::new(&config).unwrap();

    // The second bus is still Waiting while the first is active.
    let fills = coordinator.dispatcher().fill_levels();
    assert_eq!(fills.len(), 2);

    let active_id = coordinator.dispatcher().active_bus().unwrap().id().to_string();
    let non_terminal_active = fills
        .iter()
        .filter(|(id, _, _)| {
            let bus = coordinator.dispatcher().bus(id).unwrap();
            !matches!(bus.state(), BusState::Waiting | BusState::Departed)
        })
        .count();
    assert_eq!(non_terminal_active, 1);
    assert_eq!(
        coordinator.dispatcher().bus(&active_id).unwrap().state(),
        BusState::Arriving
    );
}

#[test]
fn test_timeout_loss_is_edge_triggered_once() {
    let config = level_with_buses(vec![BusSpec::with_capacity(PassengerColor::Red, 1)], 3);
    let mut coordinator = MatchCoordinator::new(&config).unwrap();
    coordinator.complete_bus_arrival().unwrap();

    assert_eq!(coordinator.tick().outcome, None);
    assert_eq!(coordinator.tick().outcome, None);

    let result = coordinator.tick();
    assert_eq!(result.outcome, Some(LevelOutcome::Loss(LossReason::TimedOut)));
    assert_eq!(result.remaining_ticks, 0);

    // Further ticks report the same outcome without re-firing the timer.
    let again = coordinator.tick();
    assert_eq!(again.outcome, Some(LevelOutcome::Loss(LossReason::TimedOut)));
    assert_eq!(
        coordinator.event_log().events_of_type("timer_expired").len(),
        1
    );
    assert_eq!(coordinator.event_log().events_of_type("level_lost").len(), 1);
}

#[test]
fn test_win_is_not_demoted_by_a_later_expiry() {
    let config = level_with_buses(vec![BusSpec::with_capacity(PassengerColor::Red, 1)], 2);
    let mut coordinator = MatchCoordinator::new(&config).unwrap();
    coordinator.complete_bus_arrival().unwrap();

    let red = coordinator.passengers().next().unwrap().id().to_string();
    coordinator.select_passenger(&red).unwrap();
    drain_transits(&mut coordinator);
    assert_eq!(
        coordinator.complete_bus_departure().unwrap(),
        Some(LevelOutcome::Win)
    );

    // Ticking past the zero mark leaves the win in place.
    for _ in 0..5 {
        assert_eq!(coordinator.tick().outcome, Some(LevelOutcome::Win));
    }
    assert!(coordinator.event_log().events_of_type("timer_expired").is_empty());
    assert!(coordinator.event_log().events_of_type("level_lost").is_empty());
}

#[test]
fn test_remaining_ticks_counts_down() {
    let config = level_with_buses(vec![BusSpec::with_capacity(PassengerColor::Red, 1)], 10);
    let mut coordinator = MatchCoordinator::new(&config).unwrap();

    assert_eq!(coordinator.remaining_ticks(), 10);
    coordinator.tick();
    coordinator.tick();
    assert_eq!(coordinator.remaining_ticks(), 8);
    assert_eq!(coordinator.elapsed_ticks(), 2);
}
