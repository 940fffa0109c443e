//! Shuffle state and queue randomization
//!
//! Shuffling keeps the current entry playing: it moves to the front and the
//! rest of the queue is Fisher-Yates shuffled behind it. Turning shuffle off
//! restores the exact pre-shuffle order and points the current index at
//! wherever the playing entry sits in that order.

use crate::queue::{Queue, QueueEntry};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

/// Whether the queue is shuffled, plus the order to restore
///
/// `original_order` is present exactly when shuffle is enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShuffleState {
    original_order: Option<Arc<[QueueEntry]>>,
}

impl ShuffleState {
    /// Shuffle disabled
    pub fn off() -> Self {
        Self {
            original_order: None,
        }
    }

    /// Shuffle enabled, remembering `original_order`
    pub fn on(original_order: Arc<[QueueEntry]>) -> Self {
        Self {
            original_order: Some(original_order),
        }
    }

    /// Whether shuffle is on
    pub fn enabled(&self) -> bool {
        self.original_order.is_some()
    }

    /// Pre-shuffle order, when shuffle is on
    pub fn original_order(&self) -> Option<&[QueueEntry]> {
        self.original_order.as_deref()
    }

    /// Same state with `entry` added to the remembered order
    pub(crate) fn appended(&self, entry: QueueEntry) -> Self {
        match &self.original_order {
            Some(order) => {
                let mut order = order.to_vec();
                order.push(entry);
                Self::on(Arc::from(order))
            }
            None => Self::off(),
        }
    }
}

/// Shuffle a queue around its current entry
///
/// The current entry lands at index 0 and becomes current; all other entries
/// are uniformly permuted.
pub fn shuffle_around_current<R: Rng + ?Sized>(queue: &Queue, rng: &mut R) -> Queue {
    let Some(current) = queue.current_index() else {
        return queue.clone();
    };

    let entries = queue.entries();
    let mut rest: Vec<QueueEntry> = entries
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != current)
        .map(|(_, e)| e.clone())
        .collect();
    rest.shuffle(rng);

    let mut shuffled = Vec::with_capacity(entries.len());
    shuffled.push(entries[current].clone());
    shuffled.extend(rest);

    Queue::from_entries(shuffled, Some(0))
}

/// Restore the pre-shuffle order
///
/// The current index follows the playing entry to its original position.
pub fn restore_order(shuffled: &Queue, original_order: &[QueueEntry]) -> Queue {
    let restored = Queue::from_entries(original_order.to_vec(), Some(0));
    let position = shuffled
        .current()
        .and_then(|current| restored.position_of_key(current.key));

    match position {
        Some(index) => restored.with_current(index).unwrap_or(restored),
        None => restored,
    }
}
