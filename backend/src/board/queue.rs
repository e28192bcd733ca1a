//! Waiting queue
//!
//! A fixed array of slots holding displaced passengers. Slot indices are
//! stable for the whole level: freeing a slot leaves a hole, and the hole
//! may be refilled in any order by any later tap or sweep. There is no
//! compaction.

use thiserror::Error;

/// Queue slot errors (caller misuse, not gameplay rejections)
#[derive(Debug, Error, PartialEq)]
pub enum QueueError {
    #[error("slot {slot} is out of range for a {capacity}-slot queue")]
    SlotOutOfRange { slot: usize, capacity: usize },

    #[error("slot {slot} is already occupied")]
    SlotOccupied { slot: usize },
}

/// Fixed-capacity ordered slots holding passenger IDs
///
/// # Example
/// ```
/// use busjam_core_rs::WaitingQueue;
///
/// let mut queue = WaitingQueue::new(3);
/// let slot = queue.find_empty_slot().unwrap();
/// queue.enqueue("p1".to_string(), slot).unwrap();
///
/// assert_eq!(queue.occupant(0), Some("p1"));
/// assert!(!queue.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct WaitingQueue {
    slots: Vec<Option<String>>,
}

impl WaitingQueue {
    /// Create a queue with `capacity` empty slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Lowest-index empty slot, or `None` when the queue is full
    pub fn find_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    /// Put a passenger into a specific empty slot
    ///
    /// The slot index comes from `find_empty_slot`; reserving the slot and
    /// freeing the source location happen in the same handler, so two
    /// passengers can never be assigned the same freed slot.
    pub fn enqueue(&mut self, passenger_id: String, slot: usize) -> Result<(), QueueError> {
        if slot >= self.slots.len() {
            return Err(QueueError::SlotOutOfRange {
                slot,
                capacity: self.slots.len(),
            });
        }
        if self.slots[slot].is_some() {
            return Err(QueueError::SlotOccupied { slot });
        }
        self.slots[slot] = Some(passenger_id);
        Ok(())
    }

    /// Remove a passenger by identity, returning the freed slot index
    pub fn remove(&mut self, passenger_id: &str) -> Option<usize> {
        let slot = self
            .slots
            .iter()
            .position(|s| s.as_deref() == Some(passenger_id))?;
        self.slots[slot] = None;
        Some(slot)
    }

    /// Get the occupant of a slot
    pub fn occupant(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot)?.as_deref()
    }

    /// Check if every slot is empty
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    /// Check if every slot is occupied
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_some())
    }

    /// Occupied slots in index order as (slot, passenger_id)
    pub fn occupants(&self) -> impl Iterator<Item = (usize, &str)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, id)| id.as_deref().map(|id| (slot, id)))
    }

    /// Per-slot occupancy snapshot for presentation
    pub fn occupancy(&self) -> Vec<Option<&str>> {
        self.slots.iter().map(|slot| slot.as_deref()).collect()
    }

    /// Evict every occupant (level teardown)
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_empty_slot_prefers_lowest_index() {
        let mut queue = WaitingQueue::new(3);
        queue.enqueue("a".to_string(), 0).unwrap();
        assert_eq!(queue.find_empty_slot(), Some(1));
    }

    #[test]
    fn test_full_queue_has_no_empty_slot() {
        let mut queue = WaitingQueue::new(2);
        queue.enqueue("a".to_string(), 0).unwrap();
        queue.enqueue("b".to_string(), 1).unwrap();
        assert_eq!(queue.find_empty_slot(), None);
        assert!(queue.is_full());
    }

    #[test]
    fn test_slots_are_stable_holes() {
        let mut queue = WaitingQueue::new(3);
        queue.enqueue("a".to_string(), 0).unwrap();
        queue.enqueue("b".to_string(), 1).unwrap();
        queue.enqueue("c".to_string(), 2).unwrap();

        // Free the middle slot; neighbors stay put
        assert_eq!(queue.remove("b"), Some(1));
        assert_eq!(queue.occupant(0), Some("a"));
        assert_eq!(queue.occupant(1), None);
        assert_eq!(queue.occupant(2), Some("c"));

        // The hole is the next empty slot
        assert_eq!(queue.find_empty_slot(), Some(1));
    }

    #[test]
    fn test_enqueue_into_occupied_slot_rejected() {
        let mut queue = WaitingQueue::new(2);
        queue.enqueue("a".to_string(), 0).unwrap();
        assert_eq!(
            queue.enqueue("b".to_string(), 0),
            Err(QueueError::SlotOccupied { slot: 0 })
        );
    }

    #[test]
    fn test_enqueue_out_of_range_rejected() {
        let mut queue = WaitingQueue::new(2);
        assert_eq!(
            queue.enqueue("a".to_string(), 2),
            Err(QueueError::SlotOutOfRange {
                slot: 2,
                capacity: 2
            })
        );
    }

    #[test]
    fn test_occupants_iterate_in_index_order() {
        let mut queue = WaitingQueue::new(4);
        queue.enqueue("late".to_string(), 3).unwrap();
        queue.enqueue("early".to_string(), 1).unwrap();

        let order: Vec<_> = queue.occupants().collect();
        assert_eq!(order, vec![(1, "early"), (3, "late")]);
    }

    #[test]
    fn test_clear_evicts_everyone() {
        let mut queue = WaitingQueue::new(2);
        queue.enqueue("a".to_string(), 0).unwrap();
        queue.clear();
        assert!(queue.is_empty());
    }
}
