//! Occupancy structures: the standing grid and the fixed waiting queue.

pub mod grid;
pub mod queue;

pub use grid::{GridBoard, GridError};
pub use queue::{QueueError, WaitingQueue};
