//! Immutable play queue
//!
//! A [`Queue`] is a value: every mutation builds a new queue and the session
//! swaps it in whole, so readers never see a half-applied change.

use aria_core::{Track, TrackId};
use std::sync::Arc;

/// Identity of one queue slot
///
/// The same track can be queued twice; the key tells the two entries apart
/// so shuffle restoration can find the exact slot that was playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey(u64);

impl EntryKey {
    /// Raw key value
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Hands out unique entry keys
#[derive(Debug, Default)]
pub(crate) struct EntryKeys {
    next: u64,
}

impl EntryKeys {
    pub(crate) fn entry(&mut self, track: Track) -> QueueEntry {
        let key = EntryKey(self.next);
        self.next += 1;
        QueueEntry {
            key,
            track: Arc::new(track),
        }
    }
}

/// A track occupying one queue slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    /// Slot identity
    pub key: EntryKey,

    /// The queued track
    pub track: Arc<Track>,
}

/// Ordered tracks plus the current position
///
/// If the queue is non-empty, `current_index` is `Some(i)` with
/// `i < len()`; if it is empty, `current_index` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Queue {
    entries: Arc<[QueueEntry]>,
    current_index: Option<usize>,
}

impl Default for Queue {
    fn default() -> Self {
        Self::empty()
    }
}

impl Queue {
    /// Empty queue
    pub fn empty() -> Self {
        Self {
            entries: Arc::from(Vec::new()),
            current_index: None,
        }
    }

    /// Build a queue, clamping the index to the invariant
    ///
    /// An out-of-range index points at the last entry; a missing index on a
    /// non-empty queue points at the first.
    pub fn from_entries(entries: Vec<QueueEntry>, current_index: Option<usize>) -> Self {
        let current_index = match (entries.len(), current_index) {
            (0, _) => None,
            (len, Some(i)) => Some(i.min(len - 1)),
            (_, None) => Some(0),
        };
        Self {
            entries: Arc::from(entries),
            current_index,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current entry
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Current entry
    pub fn current(&self) -> Option<&QueueEntry> {
        self.current_index.and_then(|i| self.entries.get(i))
    }

    /// Current track
    pub fn current_track(&self) -> Option<&Track> {
        self.current().map(|entry| entry.track.as_ref())
    }

    /// Entry at `index`
    pub fn get(&self, index: usize) -> Option<&QueueEntry> {
        self.entries.get(index)
    }

    /// All entries in play order
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Shared handle to the entries, for snapshotting
    pub(crate) fn shared_entries(&self) -> Arc<[QueueEntry]> {
        Arc::clone(&self.entries)
    }

    /// Track ids in play order
    pub fn track_ids(&self) -> Vec<TrackId> {
        self.entries.iter().map(|e| e.track.id.clone()).collect()
    }

    /// Owned tracks in play order, as handed to the engine
    pub fn tracks(&self) -> Vec<Track> {
        tracks_of(&self.entries)
    }

    /// Position of a track id
    ///
    /// Prefers the current entry when the id is queued more than once.
    pub fn position_of(&self, track_id: &TrackId) -> Option<usize> {
        if let Some(i) = self.current_index {
            if self.entries[i].track.id == *track_id {
                return Some(i);
            }
        }
        self.entries.iter().position(|e| e.track.id == *track_id)
    }

    /// Position of an entry key
    pub fn position_of_key(&self, key: EntryKey) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    /// Same entries with a different current index
    ///
    /// Returns `None` if `index` is out of range.
    pub fn with_current(&self, index: usize) -> Option<Self> {
        (index < self.entries.len()).then(|| Self {
            entries: Arc::clone(&self.entries),
            current_index: Some(index),
        })
    }

    /// A copy with `entry` appended
    ///
    /// The current index is untouched unless the queue was empty, in which
    /// case the new entry becomes current.
    pub fn appended(&self, entry: QueueEntry) -> Self {
        let mut entries = self.entries.to_vec();
        entries.push(entry);
        Self {
            entries: Arc::from(entries),
            current_index: self.current_index.or(Some(0)),
        }
    }
}

/// Clone the tracks out of a run of entries
pub(crate) fn tracks_of(entries: &[QueueEntry]) -> Vec<Track> {
    entries.iter().map(|e| e.track.as_ref().clone()).collect()
}
