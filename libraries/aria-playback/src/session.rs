//! Playback session
//!
//! One task owns the queue, shuffle, and repeat state and is the only place
//! that issues engine commands. UI calls reach it as messages through a
//! [`PlaybackSession`] handle, and engine events arrive on the same task, so
//! every queue mutation runs to completion before the next one starts.
//!
//! Engine events take priority over commands: a command always sees every
//! event the engine emitted before the command was picked up, and a command
//! only replies once the events it caused have been applied.
//!
//! State is published copy-on-write through a `watch` channel. Readers get an
//! `Arc<SessionState>` that never changes under them.

use crate::catalog::CatalogCache;
use crate::engine::{EngineCommand, EngineError, EngineEvent, EngineSubscription, PlaybackEngine, Progress};
use crate::error::{surface, PlaybackError, Result};
use crate::events::Notice;
use crate::history::PlayHistoryRecorder;
use crate::queue::{EntryKeys, Queue};
use crate::shuffle::{restore_order, shuffle_around_current, ShuffleState};
use crate::types::{EngineConfig, PlaybackConfig, PlaybackState, RepeatMode};
use aria_core::{Track, TrackId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, warn};

/// Snapshot of everything the session owns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Play queue and current position
    pub queue: Queue,

    /// Shuffle flag and the order to restore
    pub shuffle: ShuffleState,

    /// Repeat mode last accepted by the engine
    pub repeat: RepeatMode,

    /// Transport state mirrored from the engine
    pub playback: PlaybackState,

    /// Whether engine setup succeeded
    pub player_ready: bool,
}

impl SessionState {
    /// Track at the current index
    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current_track()
    }
}

type Reply<T> = oneshot::Sender<T>;

enum Command {
    Initialize(Reply<bool>),
    PlayWithId(TrackId, Reply<()>),
    AddToQueue(TrackId, Reply<()>),
    ToggleShuffle(Reply<bool>),
    ToggleRepeat(Reply<RepeatMode>),
    SkipToNext(Reply<()>),
    SkipToPrevious(Reply<()>),
    SeekTo(Duration, Reply<()>),
    Play(Reply<()>),
    Pause(Reply<()>),
    TogglePlayPause(Reply<()>),
    Progress(Reply<Option<Progress>>),
    Settle(Reply<()>),
    Shutdown(Reply<()>),
}

/// Handle to the playback session task
///
/// Cheap to clone. None of the operations return errors: failures are
/// logged and, where the user should know, broadcast as notices. Callers
/// observe the outcome through [`PlaybackSession::state`] or
/// [`PlaybackSession::subscribe`].
#[derive(Clone)]
pub struct PlaybackSession {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<Arc<SessionState>>,
}

impl PlaybackSession {
    /// Start the session task
    ///
    /// Must be called from within a Tokio runtime. The engine is not set up
    /// until [`initialize`](Self::initialize) is called.
    pub fn spawn(
        engine: Arc<dyn PlaybackEngine>,
        catalog: CatalogCache,
        history: PlayHistoryRecorder,
        notices: broadcast::Sender<Notice>,
        config: &PlaybackConfig,
    ) -> Self {
        let (commands, mailbox) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(Arc::new(SessionState::default()));
        let events = engine.subscribe();

        let rng = match config.shuffle_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let actor = SessionActor {
            engine,
            catalog,
            history,
            notices,
            state: state_tx,
            engine_config: config.engine.clone(),
            initial_repeat: config.repeat,
            keys: EntryKeys::default(),
            rng,
        };
        tokio::spawn(actor.run(mailbox, events));

        Self { commands, state }
    }

    async fn request<T>(&self, command: impl FnOnce(Reply<T>) -> Command) -> Option<T> {
        let (reply, response) = oneshot::channel();
        if self.commands.send(command(reply)).is_err() {
            debug!("Playback session has stopped, dropping command");
            return None;
        }
        response.await.ok()
    }

    /// Set up the engine; returns whether the player is ready
    pub async fn initialize(&self) -> bool {
        self.request(Command::Initialize).await.unwrap_or(false)
    }

    /// Play a track, jumping to it if queued or replacing the queue if not
    pub async fn play_with_id(&self, id: impl Into<TrackId>) {
        let id = id.into();
        self.request(|reply| Command::PlayWithId(id, reply)).await;
    }

    /// Append a track to the end of the queue
    ///
    /// Duplicates are kept: queueing the same id twice yields two entries.
    pub async fn add_to_queue(&self, id: impl Into<TrackId>) {
        let id = id.into();
        self.request(|reply| Command::AddToQueue(id, reply)).await;
    }

    /// Flip shuffle; returns whether shuffle is on afterwards
    pub async fn toggle_shuffle(&self) -> bool {
        match self.request(Command::ToggleShuffle).await {
            Some(enabled) => enabled,
            None => self.state().shuffle.enabled(),
        }
    }

    /// Advance the repeat mode; returns the mode in effect afterwards
    pub async fn toggle_repeat(&self) -> RepeatMode {
        match self.request(Command::ToggleRepeat).await {
            Some(mode) => mode,
            None => self.state().repeat,
        }
    }

    /// Skip to the next track
    pub async fn skip_to_next(&self) {
        self.request(Command::SkipToNext).await;
    }

    /// Skip to the previous track
    pub async fn skip_to_previous(&self) {
        self.request(Command::SkipToPrevious).await;
    }

    /// Seek within the current track
    pub async fn seek_to(&self, position: Duration) {
        self.request(|reply| Command::SeekTo(position, reply)).await;
    }

    /// Start or resume playback
    pub async fn play(&self) {
        self.request(Command::Play).await;
    }

    /// Pause playback
    pub async fn pause(&self) {
        self.request(Command::Pause).await;
    }

    /// Pause if playing, play otherwise
    pub async fn toggle_play_pause(&self) {
        self.request(Command::TogglePlayPause).await;
    }

    /// Position in the current track
    pub async fn progress(&self) -> Option<Progress> {
        self.request(Command::Progress).await.flatten()
    }

    /// Wait until every engine event emitted so far has been applied
    pub async fn settle(&self) {
        self.request(Command::Settle).await;
    }

    /// Current state
    pub fn state(&self) -> Arc<SessionState> {
        Arc::clone(&self.state.borrow())
    }

    /// Watch state changes
    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionState>> {
        self.state.clone()
    }

    /// Stop the session task
    ///
    /// Later calls on any handle do nothing.
    pub async fn shutdown(&self) {
        self.request(Command::Shutdown).await;
    }
}

struct SessionActor {
    engine: Arc<dyn PlaybackEngine>,
    catalog: CatalogCache,
    history: PlayHistoryRecorder,
    notices: broadcast::Sender<Notice>,
    state: watch::Sender<Arc<SessionState>>,
    engine_config: EngineConfig,
    initial_repeat: RepeatMode,
    keys: EntryKeys,
    rng: StdRng,
}

impl SessionActor {
    async fn run(
        mut self,
        mut mailbox: mpsc::UnboundedReceiver<Command>,
        mut events: EngineSubscription,
    ) {
        let mut events_open = true;

        loop {
            tokio::select! {
                biased;

                event = events.recv(), if events_open => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        warn!("Engine event stream closed");
                        events_open = false;
                    }
                },

                command = mailbox.recv() => match command {
                    Some(Command::Shutdown(reply)) => {
                        let _ = reply.send(());
                        break;
                    }
                    Some(command) => self.handle_command(command, &mut events).await,
                    None => break,
                },
            }
        }

        events.unsubscribe();
        info!("Playback session stopped");
    }

    async fn handle_command(&mut self, command: Command, events: &mut EngineSubscription) {
        match command {
            Command::Initialize(reply) => {
                let ready = self.initialize().await;
                self.respond(events, reply, ready);
            }
            Command::PlayWithId(id, reply) => {
                self.play_with_id(id).await;
                self.respond(events, reply, ());
            }
            Command::AddToQueue(id, reply) => {
                self.add_to_queue(id).await;
                self.respond(events, reply, ());
            }
            Command::ToggleShuffle(reply) => {
                let enabled = self.toggle_shuffle().await;
                self.respond(events, reply, enabled);
            }
            Command::ToggleRepeat(reply) => {
                let mode = self.toggle_repeat().await;
                self.respond(events, reply, mode);
            }
            Command::SkipToNext(reply) => {
                self.transport(EngineCommand::SkipToNext).await;
                self.respond(events, reply, ());
            }
            Command::SkipToPrevious(reply) => {
                self.transport(EngineCommand::SkipToPrevious).await;
                self.respond(events, reply, ());
            }
            Command::SeekTo(position, reply) => {
                self.seek_to(position).await;
                self.respond(events, reply, ());
            }
            Command::Play(reply) => {
                self.transport(EngineCommand::Play).await;
                self.respond(events, reply, ());
            }
            Command::Pause(reply) => {
                self.transport(EngineCommand::Pause).await;
                self.respond(events, reply, ());
            }
            Command::TogglePlayPause(reply) => {
                let command = if self.current().playback == PlaybackState::Playing {
                    EngineCommand::Pause
                } else {
                    EngineCommand::Play
                };
                self.transport(command).await;
                self.respond(events, reply, ());
            }
            Command::Progress(reply) => {
                let progress = self.progress().await;
                self.respond(events, reply, progress);
            }
            Command::Settle(reply) => self.respond(events, reply, ()),
            Command::Shutdown(reply) => {
                let _ = reply.send(());
            }
        }
    }

    /// Apply pending engine events, then answer the caller
    fn respond<T>(&mut self, events: &mut EngineSubscription, reply: Reply<T>, value: T) {
        while let Some(event) = events.try_recv() {
            self.handle_event(event);
        }
        // The caller may have given up waiting
        let _ = reply.send(value);
    }

    // =========================================================================
    // State
    // =========================================================================

    fn current(&self) -> Arc<SessionState> {
        Arc::clone(&self.state.borrow())
    }

    fn publish(&self, update: impl FnOnce(&mut SessionState)) {
        let mut next = SessionState::clone(&self.current());
        update(&mut next);
        self.state.send_replace(Arc::new(next));
    }

    /// State if the engine is ready to take commands
    fn ready_state(&self) -> Option<Arc<SessionState>> {
        let state = self.current();
        if state.player_ready {
            Some(state)
        } else {
            surface(PlaybackError::NotReady, &self.notices);
            None
        }
    }

    /// State if transport commands can have any effect
    fn transport_state(&self, command: EngineCommand) -> Option<Arc<SessionState>> {
        let state = self.ready_state()?;
        if state.queue.is_empty() {
            debug!(%command, "Queue is empty, ignoring command");
            return None;
        }
        Some(state)
    }

    /// Catalog track for `id`
    fn resolve(&self, id: &TrackId) -> Result<Track> {
        self.catalog
            .resolve(id)
            .ok_or_else(|| PlaybackError::TrackNotFound(id.clone()))
    }

    fn command_failed(&self, command: EngineCommand, source: EngineError) {
        surface(PlaybackError::Command { command, source }, &self.notices);
    }

    // =========================================================================
    // Engine events
    // =========================================================================

    fn handle_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::TrackChanged { index, track_id } => {
                self.on_track_changed(index, track_id);
            }
            EngineEvent::PlaybackStateChanged(playback) => {
                if self.current().playback != playback {
                    debug!(?playback, "Playback state changed");
                    self.publish(|s| s.playback = playback);
                }
            }
            EngineEvent::PlaybackFailed { message } => {
                surface(PlaybackError::Engine(message), &self.notices);
            }
        }
    }

    fn on_track_changed(&mut self, index: Option<usize>, track_id: Option<TrackId>) {
        let state = self.current();

        let Some(index) = index else {
            debug!("Engine reports no active track");
            return;
        };
        let Some(entry) = state.queue.get(index) else {
            debug!(index, len = state.queue.len(), "Ignoring track change outside the queue");
            return;
        };
        if let Some(track_id) = &track_id {
            if entry.track.id != *track_id {
                debug!(index, %track_id, "Ignoring track change for a replaced queue");
                return;
            }
        }

        if state.queue.current_index() != Some(index) {
            if let Some(queue) = state.queue.with_current(index) {
                self.publish(|s| s.queue = queue);
            }
        }

        debug!(index, track_id = %entry.track.id, "Track started");
        self.history.record(&entry.track);
    }

    // =========================================================================
    // Commands
    // =========================================================================

    async fn initialize(&mut self) -> bool {
        if self.current().player_ready {
            return true;
        }

        if let Err(e) = self.engine.setup(&self.engine_config).await {
            surface(PlaybackError::Setup(e), &self.notices);
            return false;
        }

        let mut repeat = RepeatMode::Off;
        if self.initial_repeat != RepeatMode::Off {
            match self.engine.set_repeat_mode(self.initial_repeat).await {
                Ok(()) => repeat = self.initial_repeat,
                Err(e) => self.command_failed(EngineCommand::SetRepeatMode, e),
            }
        }

        self.publish(|s| {
            s.player_ready = true;
            s.repeat = repeat;
            if s.playback == PlaybackState::Uninitialized {
                s.playback = PlaybackState::Ready;
            }
        });
        info!(?repeat, "Playback session ready");
        true
    }

    async fn play_with_id(&mut self, id: TrackId) {
        let Some(state) = self.ready_state() else {
            return;
        };

        // Already queued: jump there, leave the queue alone
        if let Some(index) = state.queue.position_of(&id) {
            if state.queue.current_index() != Some(index) {
                if let Err(e) = self.engine.skip_to_index(index).await {
                    self.command_failed(EngineCommand::SkipToIndex, e);
                    return;
                }
                if let Some(queue) = state.queue.with_current(index) {
                    self.publish(|s| s.queue = queue);
                }
            }
            debug!(%id, index, "Playing queued track");
            if let Err(e) = self.engine.play().await {
                self.command_failed(EngineCommand::Play, e);
            }
            return;
        }

        let track = match self.resolve(&id) {
            Ok(track) => track,
            Err(e) => return surface(e, &self.notices),
        };

        let entry = self.keys.entry(track);
        if let Err(e) = self
            .engine
            .replace_queue(std::slice::from_ref(entry.track.as_ref()))
            .await
        {
            self.command_failed(EngineCommand::ReplaceQueue, e);
            return;
        }

        let queue = Queue::from_entries(vec![entry], Some(0));
        let shuffle = if state.shuffle.enabled() {
            ShuffleState::on(queue.shared_entries())
        } else {
            ShuffleState::off()
        };
        self.publish(|s| {
            s.queue = queue;
            s.shuffle = shuffle;
        });
        info!(%id, "Queue replaced");

        if let Err(e) = self.engine.play().await {
            self.command_failed(EngineCommand::Play, e);
        }
    }

    async fn add_to_queue(&mut self, id: TrackId) {
        let Some(state) = self.ready_state() else {
            return;
        };
        let track = match self.resolve(&id) {
            Ok(track) => track,
            Err(e) => return surface(e, &self.notices),
        };

        let entry = self.keys.entry(track);
        if let Err(e) = self.engine.enqueue(&entry.track).await {
            self.command_failed(EngineCommand::Enqueue, e);
            return;
        }

        let queue = state.queue.appended(entry.clone());
        let shuffle = state.shuffle.appended(entry);
        debug!(%id, len = queue.len(), "Track queued");
        self.publish(|s| {
            s.queue = queue;
            s.shuffle = shuffle;
        });
    }

    async fn toggle_shuffle(&mut self) -> bool {
        let Some(state) = self.transport_state(EngineCommand::ReorderQueue) else {
            return self.current().shuffle.enabled();
        };

        if let Some(original) = state.shuffle.original_order() {
            let restored = restore_order(&state.queue, original);
            let index = restored.current_index().unwrap_or(0);
            if let Err(e) = self.engine.reorder_queue(&restored.tracks(), index).await {
                self.command_failed(EngineCommand::ReorderQueue, e);
                return true;
            }
            self.publish(|s| {
                s.queue = restored;
                s.shuffle = ShuffleState::off();
            });
            info!(index, "Shuffle off, original order restored");
            false
        } else {
            let shuffled = shuffle_around_current(&state.queue, &mut self.rng);
            if let Err(e) = self.engine.reorder_queue(&shuffled.tracks(), 0).await {
                self.command_failed(EngineCommand::ReorderQueue, e);
                return false;
            }
            let original = state.queue.shared_entries();
            self.publish(|s| {
                s.queue = shuffled;
                s.shuffle = ShuffleState::on(original);
            });
            info!(len = state.queue.len(), "Shuffle on");
            true
        }
    }

    async fn toggle_repeat(&mut self) -> RepeatMode {
        let Some(state) = self.ready_state() else {
            return self.current().repeat;
        };

        let next = state.repeat.next();
        match self.engine.set_repeat_mode(next).await {
            Ok(()) => {
                self.publish(|s| s.repeat = next);
                info!(repeat = ?next, "Repeat mode changed");
                next
            }
            Err(e) => {
                self.command_failed(EngineCommand::SetRepeatMode, e);
                state.repeat
            }
        }
    }

    /// Delegate a transport command; the engine owns the resulting index math
    async fn transport(&mut self, command: EngineCommand) {
        if self.transport_state(command).is_none() {
            return;
        }

        let result = match command {
            EngineCommand::Play => self.engine.play().await,
            EngineCommand::Pause => self.engine.pause().await,
            EngineCommand::SkipToNext => self.engine.skip_to_next().await,
            EngineCommand::SkipToPrevious => self.engine.skip_to_previous().await,
            other => {
                warn!(command = %other, "Not a transport command");
                return;
            }
        };

        match result {
            Ok(()) => debug!(%command, "Transport command sent"),
            Err(e) => self.command_failed(command, e),
        }
    }

    async fn seek_to(&mut self, position: Duration) {
        if self.transport_state(EngineCommand::SeekTo).is_none() {
            return;
        }
        if let Err(e) = self.engine.seek_to(position).await {
            self.command_failed(EngineCommand::SeekTo, e);
        }
    }

    async fn progress(&mut self) -> Option<Progress> {
        let state = self.current();
        if !state.player_ready || state.queue.is_empty() {
            return None;
        }
        match self.engine.progress().await {
            Ok(progress) => Some(progress),
            Err(e) => {
                debug!(error = %e, "Progress unavailable");
                None
            }
        }
    }
}
