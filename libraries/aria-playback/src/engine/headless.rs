//! In-process engine without audio output
//!
//! Tracks queue position, transport state, and elapsed time exactly as a
//! device engine would report them, which is all a terminal host or a test
//! needs. Nothing is decoded.

use super::{
    EngineCommand, EngineError, EngineEvent, EngineResult, EngineSubscription, EventBus,
    PlaybackEngine, Progress,
};
use crate::types::{EngineConfig, PlaybackState, RepeatMode};
use aria_core::{Track, TrackId};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Inner {
    config: Option<EngineConfig>,
    fail_setup: bool,
    rejected: HashSet<EngineCommand>,
    queue: Vec<Track>,
    index: Option<usize>,
    state: PlaybackState,
    repeat: RepeatMode,
    position: Duration,
}

impl Inner {
    fn check(&self, command: EngineCommand) -> EngineResult<()> {
        if self.rejected.contains(&command) {
            return Err(EngineError::Rejected {
                command,
                reason: "command disabled".to_string(),
            });
        }
        if self.config.is_none() {
            return Err(EngineError::NotInitialized);
        }
        Ok(())
    }

    fn current_duration(&self) -> Duration {
        self.index
            .and_then(|i| self.queue.get(i))
            .map(|t| t.duration)
            .unwrap_or_default()
    }

    fn move_to(&mut self, index: usize) -> EngineEvent {
        self.index = Some(index);
        self.position = Duration::ZERO;
        EngineEvent::TrackChanged {
            index: Some(index),
            track_id: Some(self.queue[index].id.clone()),
        }
    }

    fn set_state(&mut self, state: PlaybackState) -> Option<EngineEvent> {
        if self.state == state {
            return None;
        }
        self.state = state;
        Some(EngineEvent::PlaybackStateChanged(state))
    }

    /// Advance past the current item, honoring `repeat`.
    fn advance(&mut self, repeat: RepeatMode) -> Vec<EngineEvent> {
        let Some(index) = self.index else {
            return Vec::new();
        };

        if repeat == RepeatMode::Track {
            return vec![self.move_to(index)];
        }

        if index + 1 < self.queue.len() {
            vec![self.move_to(index + 1)]
        } else if repeat == RepeatMode::Queue {
            vec![self.move_to(0)]
        } else {
            self.position = self.current_duration();
            self.set_state(PlaybackState::Stopped).into_iter().collect()
        }
    }
}

/// Reference [`PlaybackEngine`] with no audio output
///
/// Besides the engine surface it exposes hooks to simulate device behavior:
/// [`finish_current_track`](Self::finish_current_track) for natural track
/// ends, [`reject`](Self::reject) to make commands fail, and
/// [`with_failing_setup`](Self::with_failing_setup).
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    inner: Mutex<Inner>,
    events: EventBus,
}

impl HeadlessEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine whose `setup` always fails
    pub fn with_failing_setup() -> Self {
        let engine = Self::default();
        engine.lock().fail_setup = true;
        engine
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit_all(&self, events: impl IntoIterator<Item = EngineEvent>) {
        for event in events {
            self.events.emit(event);
        }
    }

    /// Make `command` fail until [`accept`](Self::accept) is called
    pub fn reject(&self, command: EngineCommand) {
        self.lock().rejected.insert(command);
    }

    /// Undo [`reject`](Self::reject)
    pub fn accept(&self, command: EngineCommand) {
        self.lock().rejected.remove(&command);
    }

    /// Simulate the current track playing to its end
    pub fn finish_current_track(&self) {
        let events = {
            let mut inner = self.lock();
            let repeat = inner.repeat;
            inner.advance(repeat)
        };
        self.emit_all(events);
    }

    /// Emit an arbitrary event, as a device engine might at any time
    pub fn inject(&self, event: EngineEvent) {
        self.events.emit(event);
    }

    /// Track ids in engine queue order
    pub fn queue_ids(&self) -> Vec<TrackId> {
        self.lock().queue.iter().map(|t| t.id.clone()).collect()
    }

    /// Engine-side current index
    pub fn current_index(&self) -> Option<usize> {
        self.lock().index
    }

    /// Engine-side transport state
    pub fn playback_state(&self) -> PlaybackState {
        self.lock().state
    }

    /// Engine-side repeat mode
    pub fn repeat_mode(&self) -> RepeatMode {
        self.lock().repeat
    }

    /// Options passed to the last successful `setup`
    pub fn config(&self) -> Option<EngineConfig> {
        self.lock().config.clone()
    }
}

#[async_trait]
impl PlaybackEngine for HeadlessEngine {
    async fn setup(&self, config: &EngineConfig) -> EngineResult<()> {
        let event = {
            let mut inner = self.lock();
            if inner.fail_setup {
                return Err(EngineError::Setup("no audio output available".to_string()));
            }
            if inner.rejected.contains(&EngineCommand::Setup) {
                return Err(EngineError::Rejected {
                    command: EngineCommand::Setup,
                    reason: "command disabled".to_string(),
                });
            }
            if inner.config.is_some() {
                debug!("Headless engine already set up");
                return Ok(());
            }
            inner.config = Some(config.clone());
            inner.set_state(PlaybackState::Ready)
        };

        info!(
            progress_interval_ms = config.progress_interval_ms,
            "Headless engine ready"
        );
        self.emit_all(event);
        Ok(())
    }

    async fn enqueue(&self, track: &Track) -> EngineResult<()> {
        let event = {
            let mut inner = self.lock();
            inner.check(EngineCommand::Enqueue)?;
            inner.queue.push(track.clone());
            // The first item of an empty queue becomes current
            if inner.index.is_none() {
                let last = inner.queue.len() - 1;
                Some(inner.move_to(last))
            } else {
                None
            }
        };
        self.emit_all(event);
        Ok(())
    }

    async fn replace_queue(&self, tracks: &[Track]) -> EngineResult<()> {
        let events = {
            let mut inner = self.lock();
            inner.check(EngineCommand::ReplaceQueue)?;
            inner.queue = tracks.to_vec();
            inner.position = Duration::ZERO;
            if tracks.is_empty() {
                inner.index = None;
                inner.set_state(PlaybackState::Stopped).into_iter().collect()
            } else {
                vec![inner.move_to(0)]
            }
        };
        self.emit_all(events);
        Ok(())
    }

    async fn reorder_queue(&self, tracks: &[Track], current_index: usize) -> EngineResult<()> {
        let mut inner = self.lock();
        inner.check(EngineCommand::ReorderQueue)?;
        if tracks.is_empty() {
            inner.queue.clear();
            inner.index = None;
            return Ok(());
        }
        if current_index >= tracks.len() {
            return Err(EngineError::InvalidIndex(current_index));
        }
        inner.queue = tracks.to_vec();
        inner.index = Some(current_index);
        Ok(())
    }

    async fn skip_to_index(&self, index: usize) -> EngineResult<()> {
        let event = {
            let mut inner = self.lock();
            inner.check(EngineCommand::SkipToIndex)?;
            if index >= inner.queue.len() {
                return Err(EngineError::InvalidIndex(index));
            }
            inner.move_to(index)
        };
        self.events.emit(event);
        Ok(())
    }

    async fn play(&self) -> EngineResult<()> {
        let event = {
            let mut inner = self.lock();
            inner.check(EngineCommand::Play)?;
            if inner.index.is_none() {
                return Ok(());
            }
            // Replaying a finished queue starts the last track over
            if inner.state == PlaybackState::Stopped {
                inner.position = Duration::ZERO;
            }
            inner.set_state(PlaybackState::Playing)
        };
        self.emit_all(event);
        Ok(())
    }

    async fn pause(&self) -> EngineResult<()> {
        let event = {
            let mut inner = self.lock();
            inner.check(EngineCommand::Pause)?;
            if inner.state != PlaybackState::Playing {
                return Ok(());
            }
            inner.set_state(PlaybackState::Paused)
        };
        self.emit_all(event);
        Ok(())
    }

    async fn skip_to_next(&self) -> EngineResult<()> {
        let events = {
            let mut inner = self.lock();
            inner.check(EngineCommand::SkipToNext)?;
            // A manual skip leaves the track even under Track repeat
            let repeat = match inner.repeat {
                RepeatMode::Track => RepeatMode::Off,
                other => other,
            };
            inner.advance(repeat)
        };
        self.emit_all(events);
        Ok(())
    }

    async fn skip_to_previous(&self) -> EngineResult<()> {
        let event = {
            let mut inner = self.lock();
            inner.check(EngineCommand::SkipToPrevious)?;
            let repeat = inner.repeat;
            let index = inner.index;
            match index {
                None => None,
                Some(0) if repeat == RepeatMode::Queue => {
                    let last = inner.queue.len() - 1;
                    Some(inner.move_to(last))
                }
                Some(0) => {
                    inner.position = Duration::ZERO;
                    None
                }
                Some(index) => Some(inner.move_to(index - 1)),
            }
        };
        self.emit_all(event);
        Ok(())
    }

    async fn seek_to(&self, position: Duration) -> EngineResult<()> {
        let mut inner = self.lock();
        inner.check(EngineCommand::SeekTo)?;
        if inner.index.is_none() {
            return Ok(());
        }
        let duration = inner.current_duration();
        inner.position = if duration.is_zero() {
            position
        } else {
            position.min(duration)
        };
        Ok(())
    }

    async fn set_repeat_mode(&self, mode: RepeatMode) -> EngineResult<()> {
        let mut inner = self.lock();
        inner.check(EngineCommand::SetRepeatMode)?;
        inner.repeat = mode;
        Ok(())
    }

    async fn progress(&self) -> EngineResult<Progress> {
        let inner = self.lock();
        inner.check(EngineCommand::Progress)?;
        Ok(Progress {
            position: inner.position,
            duration: inner.current_duration(),
        })
    }

    fn subscribe(&self) -> EngineSubscription {
        self.events.subscribe()
    }
}
