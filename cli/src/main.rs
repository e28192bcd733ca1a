//! Command-line driver for the bus jam engine
//!
//! Loads a level config from a JSON file given as the first argument (or
//! falls back to a built-in demo level), plays it with a simple greedy
//! strategy, and prints the event stream as the level unfolds.
//!
//! Exit code 0 on a win, 1 on a loss or a config error.

use std::env;
use std::fs;
use std::process::ExitCode;

use busjam_core_rs::{
    BusSpec, BusState, GameEvent, GamePhase, GameSession, LevelConfig, PassengerColor,
    PassengerLocation, SelectOutcome,
};

/// 2x2 board, two riders per color, one bus per color.
fn demo_level() -> LevelConfig {
    LevelConfig {
        grid_width: 2,
        grid_height: 2,
        passenger_colors: vec![
            PassengerColor::Red,
            PassengerColor::Blue,
            PassengerColor::Red,
            PassengerColor::Blue,
        ],
        buses: vec![
            BusSpec::with_capacity(PassengerColor::Red, 2),
            BusSpec::with_capacity(PassengerColor::Blue, 2),
        ],
        queue_capacity: 6,
        timer_ticks: 200,
    }
}

fn load_level(path: &str) -> Result<LevelConfig, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("cannot read {path}: {e}"))?;
    serde_json::from_str(&text).map_err(|e| format!("invalid level config in {path}: {e}"))
}

fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::PassengerSpawned {
            passenger_id,
            color,
            row,
            col,
            ..
        } => format!("spawned {color:?} passenger {passenger_id} at ({row}, {col})"),
        GameEvent::BusActivated { bus_id, color, .. } => {
            format!("{color:?} bus {bus_id} is arriving")
        }
        GameEvent::BusArrived { bus_id, .. } => format!("bus {bus_id} is at the stop"),
        GameEvent::SelectionRejected {
            passenger_id,
            reason,
            ..
        } => format!("tap on {passenger_id} rejected: {reason}"),
        GameEvent::TransitStarted {
            passenger_id,
            destination,
            ..
        } => format!("{passenger_id} is walking to {destination}"),
        GameEvent::PassengerQueued {
            passenger_id, slot, ..
        } => format!("{passenger_id} parked in queue slot {slot}"),
        GameEvent::PassengerBoarded {
            passenger_id,
            bus_id,
            now_full,
            ..
        } => {
            if *now_full {
                format!("{passenger_id} boarded {bus_id} (bus is full)")
            } else {
                format!("{passenger_id} boarded {bus_id}")
            }
        }
        GameEvent::PassengerDropped {
            passenger_id,
            bus_id,
            ..
        } => format!("{passenger_id} lost the race for {bus_id} and left play"),
        GameEvent::BusDepartureRequested { bus_id, .. } => {
            format!("bus {bus_id} is pulling out")
        }
        GameEvent::BusDeparted {
            bus_id,
            departed_count,
            ..
        } => format!("bus {bus_id} departed ({departed_count} gone)"),
        GameEvent::TimerExpired { .. } => "the countdown ran out".to_string(),
        GameEvent::LevelWon { .. } => "level complete".to_string(),
        GameEvent::LevelLost { reason, .. } => format!("level failed: {reason:?}"),
    }
}

fn print_new_events(events: &[GameEvent], printed: &mut usize) {
    for event in &events[*printed..] {
        println!("[tick {:>3}] {}", event.tick(), describe(event));
    }
    *printed = events.len();
}

/// Pick the next tap while the active bus is at the stop: a clear-path
/// rider of the bus color first, otherwise displace a clear-path rider
/// into the waiting queue to open the column up.
fn pick_tap(session: &GameSession) -> Option<String> {
    let coordinator = session.coordinator()?;
    let bus_color = coordinator.dispatcher().active_bus()?.color();

    let mut displacement = None;
    for passenger in coordinator.passengers() {
        let PassengerLocation::GridCell { row, col } = passenger.location() else {
            continue;
        };
        if !coordinator.grid().is_path_clear(row, col) {
            continue;
        }
        if passenger.color() == bus_color {
            return Some(passenger.id().to_string());
        }
        if displacement.is_none() && !coordinator.queue().is_full() {
            displacement = Some(passenger.id().to_string());
        }
    }
    displacement
}

fn play(session: &mut GameSession) -> Result<(), String> {
    session.start_level().map_err(|e| e.to_string())?;
    let mut printed = 0;

    while session.phase() == GamePhase::Playing {
        let coordinator = session
            .coordinator()
            .ok_or_else(|| "playing without a live level".to_string())?;
        print_new_events(coordinator.event_log().events(), &mut printed);

        // Finish any in-flight movement before deciding the next tap.
        if let Some(request) = coordinator.pending_transits().first().cloned() {
            let coordinator = session.coordinator_mut().ok_or("level ended")?;
            coordinator
                .complete_transit(request.transit_id)
                .map_err(|e| e.to_string())?;
            continue;
        }

        let bus_state = coordinator.dispatcher().active_bus().map(|b| b.state());
        match bus_state {
            Some(BusState::Arriving) => {
                let coordinator = session.coordinator_mut().ok_or("level ended")?;
                coordinator.complete_bus_arrival().map_err(|e| e.to_string())?;
                continue;
            }
            Some(BusState::Departing) => {
                let coordinator = session.coordinator_mut().ok_or("level ended")?;
                coordinator
                    .complete_bus_departure()
                    .map_err(|e| e.to_string())?;
                print_new_events(coordinator.event_log().events(), &mut printed);
                // Let the session observe the terminal outcome, if any.
                session.tick().map_err(|e| e.to_string())?;
                continue;
            }
            Some(BusState::AtStop) => {
                if let Some(id) = pick_tap(session) {
                    let coordinator = session.coordinator_mut().ok_or("level ended")?;
                    let outcome = coordinator
                        .select_passenger(&id)
                        .map_err(|e| e.to_string())?;
                    if !matches!(outcome, SelectOutcome::Rejected(_)) {
                        continue;
                    }
                }
            }
            _ => {}
        }

        // Nothing actionable: let the clock run.
        let coordinator = session.coordinator_mut().ok_or("level ended")?;
        let result = coordinator.tick();
        print_new_events(coordinator.event_log().events(), &mut printed);
        if result.outcome.is_some() {
            session.tick().map_err(|e| e.to_string())?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let config = match env::args().nth(1) {
        Some(path) => match load_level(&path) {
            Ok(config) => config,
            Err(message) => {
                eprintln!("error: {message}");
                return ExitCode::FAILURE;
            }
        },
        None => demo_level(),
    };

    let mut session = match GameSession::new(vec![config]) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(message) = play(&mut session) {
        eprintln!("error: {message}");
        return ExitCode::FAILURE;
    }

    match session.phase() {
        GamePhase::Complete => {
            println!("result: win");
            ExitCode::SUCCESS
        }
        phase => {
            println!("result: {phase:?}");
            ExitCode::FAILURE
        }
    }
}
