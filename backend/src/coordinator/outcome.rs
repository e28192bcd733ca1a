//! Win/loss evaluation
//!
//! Derives the terminal outcome from aggregate counts. Evaluated after
//! every bus-departure completion and on timer expiry.
//!
//! Win and loss can become true on the same evaluation (for example the
//! last departure coinciding with timer expiry); the win check runs first,
//! so a cleared level is never demoted to a loss.

/// Why the level was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossReason {
    /// Every bus departed (or none was configured) with riders left over
    BusesExhausted,

    /// The countdown reached zero while playing
    TimedOut,
}

/// Terminal level outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelOutcome {
    Win,
    Loss(LossReason),
}

/// Aggregate counts the evaluator reads
///
/// The coordinator assembles this from the passenger map, the queue, and
/// the dispatcher; the evaluator itself owns no state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutcomeSnapshot {
    /// Passengers not yet removed (grid, queue, or in transit)
    pub active_passengers: usize,

    /// True when every queue slot is empty
    pub queue_empty: bool,

    /// Buses that completed departure
    pub departed_buses: usize,

    /// Buses configured for the level
    pub total_buses: usize,

    /// True when a bus is still waiting or active
    pub bus_remaining: bool,
}

/// Stateless win/loss evaluator
pub struct WinLossEvaluator;

impl WinLossEvaluator {
    /// Evaluate the snapshot; `None` means the level continues
    ///
    /// Win: nobody left anywhere and every configured bus departed.
    /// Loss (exhaustion): no bus remains but riders do. Checked in that
    /// order.
    pub fn evaluate(snapshot: &OutcomeSnapshot) -> Option<LevelOutcome> {
        if snapshot.active_passengers == 0
            && snapshot.queue_empty
            && snapshot.departed_buses == snapshot.total_buses
            && snapshot.total_buses > 0
        {
            return Some(LevelOutcome::Win);
        }

        if !snapshot.bus_remaining
            && (snapshot.active_passengers > 0 || !snapshot.queue_empty)
        {
            return Some(LevelOutcome::Loss(LossReason::BusesExhausted));
        }

        None
    }
}
