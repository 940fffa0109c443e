//! Queue and transport behavior of the playback session
//!
//! Drives a mounted `Player` over the headless engine and checks the state
//! the session publishes.

mod common;

use aria_core::TrackId;
use aria_playback::{
    EngineCommand, EngineEvent, HeadlessEngine, NoticeKind, PlaybackState, RepeatMode,
};
use common::{ids, test_config, FakeMusicService, Harness};
use std::time::Duration;

// =============================================================================
// End-to-end scenarios
// =============================================================================

mod scenarios {
    use super::*;

    #[tokio::test]
    async fn skip_next_stops_at_last_track_without_repeat() {
        let h = Harness::new(&["a", "b", "c"]).await;
        h.queue(&["a", "b", "c"]).await;
        let session = h.player.session();

        assert_eq!(h.current_index(), Some(0));
        assert_eq!(session.state().repeat, RepeatMode::Off);

        session.skip_to_next().await;
        session.skip_to_next().await;

        let state = session.state();
        assert_eq!(state.queue.current_index(), Some(2));
        assert_eq!(state.current_track().unwrap().id, TrackId::new("c"));

        session.skip_to_next().await;

        let state = session.state();
        assert_eq!(state.queue.current_index(), Some(2));
        assert_eq!(state.current_track().unwrap().id, TrackId::new("c"));
        assert_eq!(state.playback, PlaybackState::Stopped);
    }

    #[tokio::test]
    async fn skip_next_wraps_under_queue_repeat() {
        let h = Harness::new(&["a", "b", "c"]).await;
        h.queue(&["a", "b", "c"]).await;
        let session = h.player.session();

        assert_eq!(session.toggle_repeat().await, RepeatMode::Track);
        assert_eq!(session.toggle_repeat().await, RepeatMode::Queue);

        session.skip_to_next().await;
        session.skip_to_next().await;
        assert_eq!(h.current_index(), Some(2));

        session.skip_to_next().await;

        let state = session.state();
        assert_eq!(state.queue.current_index(), Some(0));
        assert_eq!(state.current_track().unwrap().id, TrackId::new("a"));
        assert_eq!(state.playback, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn add_to_queue_leaves_index_and_playback_alone() {
        let h = Harness::new(&["a", "b", "d"]).await;
        h.queue(&["a", "b"]).await;
        let session = h.player.session();

        let before = session.state();
        assert_eq!(before.playback, PlaybackState::Playing);
        assert_eq!(before.queue.current_index(), Some(0));

        session.add_to_queue("d").await;

        let after = session.state();
        assert_eq!(after.queue.track_ids(), ids(&["a", "b", "d"]));
        assert_eq!(after.queue.current_index(), Some(0));
        assert_eq!(after.playback, PlaybackState::Playing);
        assert_eq!(h.engine.queue_ids(), ids(&["a", "b", "d"]));
    }
}

// =============================================================================
// play_with_id
// =============================================================================

mod play_with_id {
    use super::*;

    #[tokio::test]
    async fn miss_replaces_queue_and_plays() {
        let h = Harness::new(&["a", "b", "x"]).await;
        h.queue(&["a", "b"]).await;

        h.player.session().play_with_id("x").await;

        let state = h.player.session().state();
        assert_eq!(state.queue.track_ids(), ids(&["x"]));
        assert_eq!(state.queue.current_index(), Some(0));
        assert_eq!(state.playback, PlaybackState::Playing);
        assert_eq!(h.engine.queue_ids(), ids(&["x"]));
    }

    #[tokio::test]
    async fn hit_skips_without_touching_queue() {
        let h = Harness::new(&["a", "b", "c"]).await;
        h.queue(&["a", "b", "c"]).await;
        let before = h.player.session().state();

        h.player.session().play_with_id("c").await;

        let after = h.player.session().state();
        assert_eq!(after.queue.entries(), before.queue.entries());
        assert_eq!(after.queue.current_index(), Some(2));
        assert_eq!(h.engine.current_index(), Some(2));
        assert_eq!(after.playback, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn current_track_is_idempotent() {
        let h = Harness::new(&["a", "b"]).await;
        h.queue(&["a", "b"]).await;
        let session = h.player.session();
        session.pause().await;
        let before = session.state();

        session.play_with_id("a").await;

        let after = session.state();
        assert_eq!(after.queue, before.queue);
        assert_eq!(after.playback, PlaybackState::Playing);
    }

    #[tokio::test]
    async fn unknown_track_changes_nothing() {
        let mut h = Harness::new(&["a"]).await;
        h.queue(&["a"]).await;
        h.drain_notices();
        let before = h.player.session().state();

        h.player.session().play_with_id("missing").await;
        h.player.session().add_to_queue("missing").await;

        assert_eq!(h.player.session().state(), before);
        assert!(h.drain_notices().is_empty());
    }
}

// =============================================================================
// Guards: not ready, empty queue
// =============================================================================

mod guards {
    use super::*;

    #[tokio::test]
    async fn failed_setup_makes_everything_a_no_op() {
        let mut h = Harness::build(
            FakeMusicService::with_songs(&["a", "b"]),
            HeadlessEngine::with_failing_setup(),
            test_config(),
        )
        .await;
        let session = h.player.session().clone();

        let notices = h.drain_notices();
        assert!(notices.iter().any(|n| n.kind == NoticeKind::Setup));
        assert!(!session.state().player_ready);

        session.play_with_id("a").await;
        session.add_to_queue("b").await;
        session.skip_to_next().await;
        session.seek_to(Duration::from_secs(10)).await;
        assert!(!session.toggle_shuffle().await);
        assert_eq!(session.toggle_repeat().await, RepeatMode::Off);

        let state = session.state();
        assert!(state.queue.is_empty());
        assert_eq!(state.playback, PlaybackState::Uninitialized);
        assert!(h.engine.queue_ids().is_empty());
        assert!(session.progress().await.is_none());

        // The catalog still loaded
        assert_eq!(h.player.catalog().snapshot().songs.len(), 2);
    }

    #[tokio::test]
    async fn empty_queue_ignores_transport() {
        let mut h = Harness::new(&["a"]).await;
        let session = h.player.session().clone();
        h.drain_notices();

        session.skip_to_next().await;
        session.skip_to_previous().await;
        session.seek_to(Duration::from_secs(5)).await;
        session.play().await;
        session.pause().await;
        session.toggle_play_pause().await;
        assert!(!session.toggle_shuffle().await);

        let state = session.state();
        assert!(state.queue.is_empty());
        assert_eq!(state.queue.current_index(), None);
        assert_eq!(state.playback, PlaybackState::Ready);
        assert!(!state.shuffle.enabled());
        assert!(h.drain_notices().is_empty());

        // Repeat is a mode change, not transport
        assert_eq!(session.toggle_repeat().await, RepeatMode::Track);
        assert_eq!(h.engine.repeat_mode(), RepeatMode::Track);
    }

    #[tokio::test]
    async fn add_to_empty_queue_makes_it_current() {
        let h = Harness::new(&["a"]).await;

        h.player.session().add_to_queue("a").await;

        let state = h.player.session().state();
        assert_eq!(state.queue.current_index(), Some(0));
        assert_eq!(state.playback, PlaybackState::Ready);
    }

    #[tokio::test]
    async fn duplicates_are_kept() {
        let h = Harness::new(&["a", "b"]).await;
        h.queue(&["a", "b", "b"]).await;

        let state = h.player.session().state();
        assert_eq!(state.queue.track_ids(), ids(&["a", "b", "b"]));
        assert_ne!(state.queue.entries()[1].key, state.queue.entries()[2].key);
    }
}

// =============================================================================
// Engine failures and events
// =============================================================================

mod engine_interaction {
    use super::*;

    #[tokio::test]
    async fn rejected_command_leaves_state_and_notifies() {
        let mut h = Harness::new(&["a", "b"]).await;
        h.queue(&["a", "b"]).await;
        h.drain_notices();
        let before = h.player.session().state();

        h.engine.reject(EngineCommand::SkipToNext);
        h.player.session().skip_to_next().await;

        assert_eq!(h.player.session().state(), before);
        let notices = h.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::PlaybackCommand);

        // Not retried: accepting again does not replay the skip
        h.engine.accept(EngineCommand::SkipToNext);
        h.player.session().settle().await;
        assert_eq!(h.current_index(), Some(0));
    }

    #[tokio::test]
    async fn rejected_replace_keeps_old_queue() {
        let h = Harness::new(&["a", "b", "x"]).await;
        h.queue(&["a", "b"]).await;

        h.engine.reject(EngineCommand::ReplaceQueue);
        h.player.session().play_with_id("x").await;

        assert_eq!(h.queue_ids(), ids(&["a", "b"]));
    }

    #[tokio::test]
    async fn natural_track_end_advances_index() {
        let h = Harness::new(&["a", "b"]).await;
        h.queue(&["a", "b"]).await;

        h.engine.finish_current_track();
        h.player.session().settle().await;

        assert_eq!(h.current_index(), Some(1));
    }

    #[tokio::test]
    async fn stale_and_out_of_range_track_changes_are_ignored() {
        let h = Harness::new(&["a", "b"]).await;
        h.queue(&["a", "b"]).await;
        let session = h.player.session();

        h.engine.inject(EngineEvent::TrackChanged {
            index: Some(1),
            track_id: Some(TrackId::new("from-old-queue")),
        });
        h.engine.inject(EngineEvent::TrackChanged {
            index: Some(9),
            track_id: None,
        });
        h.engine.inject(EngineEvent::TrackChanged {
            index: None,
            track_id: None,
        });
        session.settle().await;
        assert_eq!(h.current_index(), Some(0));

        h.engine.inject(EngineEvent::TrackChanged {
            index: Some(1),
            track_id: Some(TrackId::new("b")),
        });
        session.settle().await;
        assert_eq!(h.current_index(), Some(1));
    }

    #[tokio::test]
    async fn playback_failure_becomes_notice() {
        let mut h = Harness::new(&["a"]).await;
        h.queue(&["a"]).await;
        h.drain_notices();

        h.engine.inject(EngineEvent::PlaybackFailed {
            message: "decoder error".into(),
        });
        h.player.session().settle().await;

        let notices = h.drain_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::PlaybackCommand);
        assert!(notices[0].message.contains("decoder error"));
    }

    #[tokio::test]
    async fn play_pause_and_seek() {
        let h = Harness::new(&["a"]).await;
        h.queue(&["a"]).await;
        let session = h.player.session();

        session.toggle_play_pause().await;
        assert_eq!(session.state().playback, PlaybackState::Paused);
        session.toggle_play_pause().await;
        assert_eq!(session.state().playback, PlaybackState::Playing);

        session.seek_to(Duration::from_secs(42)).await;
        assert_eq!(
            session.progress().await.unwrap().position,
            Duration::from_secs(42)
        );

        session.seek_to(Duration::from_secs(4000)).await;
        let progress = session.progress().await.unwrap();
        assert_eq!(progress.position, progress.duration);
    }

    #[tokio::test]
    async fn skip_previous_steps_back() {
        let h = Harness::new(&["a", "b"]).await;
        h.queue(&["a", "b"]).await;
        let session = h.player.session();

        session.skip_to_next().await;
        session.skip_to_previous().await;

        assert_eq!(h.current_index(), Some(0));
    }

    #[tokio::test]
    async fn shutdown_stops_accepting_commands() {
        let h = Harness::new(&["a", "b"]).await;
        h.queue(&["a"]).await;

        h.player.shutdown().await;
        h.player.session().add_to_queue("b").await;

        assert_eq!(h.queue_ids(), ids(&["a"]));
        assert_eq!(h.player.session().toggle_repeat().await, RepeatMode::Off);
    }
}

// =============================================================================
// Serialization
// =============================================================================

mod serialization {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_never_desync_engine_and_session() {
        let h = Harness::new(&["a", "b", "c", "d", "e"]).await;
        h.queue(&["a", "b", "c"]).await;

        let mut tasks = Vec::new();
        for worker in 0..8usize {
            let session = h.player.session().clone();
            tasks.push(tokio::spawn(async move {
                for step in 0..25usize {
                    match (worker + step) % 6 {
                        0 => session.skip_to_next().await,
                        1 => {
                            session.toggle_shuffle().await;
                        }
                        2 => session.add_to_queue("d").await,
                        3 => session.skip_to_previous().await,
                        4 => session.play_with_id("e").await,
                        _ => {
                            session.toggle_repeat().await;
                        }
                    }
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        h.player.session().settle().await;

        let state = h.player.session().state();
        let len = state.queue.len();
        assert!(len > 0);
        assert!(state.queue.current_index().unwrap() < len);
        assert_eq!(h.engine.queue_ids(), state.queue.track_ids());
        assert_eq!(h.engine.current_index(), state.queue.current_index());
        assert_eq!(h.engine.repeat_mode(), state.repeat);
    }
}
