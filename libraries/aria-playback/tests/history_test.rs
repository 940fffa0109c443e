//! Play reporting and the recent-plays list

mod common;

use aria_playback::{PlaybackConfig, PlaybackState, RepeatMode};
use common::{ids, test_config, Call, Endpoint, Harness};

const SONGS: &[&str] = &["a", "b", "c"];

async fn signed_in(config: PlaybackConfig) -> Harness {
    let h = Harness::with_config(SONGS, config).await;
    h.player.set_access_token(Some("tok".into())).await;
    h
}

fn recent_ids(h: &Harness) -> Vec<aria_core::TrackId> {
    h.player
        .history()
        .recent_plays()
        .into_iter()
        .map(|t| t.id)
        .collect()
}

#[tokio::test]
async fn every_track_start_is_reported_once() {
    let h = signed_in(test_config()).await;
    h.queue(&["a", "b", "c"]).await;

    h.player.session().skip_to_next().await;
    h.engine.finish_current_track();
    h.player.session().settle().await;
    // Resuming the same track is not a new start
    h.player.session().play_with_id("c").await;
    h.player.history().flush().await;

    assert_eq!(h.service.plays(), ids(&["a", "b", "c"]));
    assert!(h.service.calls().contains(&Call::RecordPlay {
        token: "tok".into(),
        track_id: "a".into(),
    }));
    assert_eq!(recent_ids(&h), ids(&["a", "b", "c"]));
}

#[tokio::test]
async fn looped_track_is_reported_each_time() {
    let h = signed_in(test_config()).await;
    h.queue(&["a", "b"]).await;
    assert_eq!(h.player.session().toggle_repeat().await, RepeatMode::Track);

    h.engine.finish_current_track();
    h.engine.finish_current_track();
    h.player.session().settle().await;
    h.player.history().flush().await;

    assert_eq!(h.service.plays(), ids(&["a", "a", "a"]));
}

#[tokio::test]
async fn track_queued_into_empty_queue_is_reported() {
    let h = signed_in(test_config()).await;
    let session = h.player.session();

    session.add_to_queue("a").await;
    session.play().await;
    session.settle().await;
    h.player.history().flush().await;

    assert_eq!(h.engine.playback_state(), PlaybackState::Playing);
    assert_eq!(h.service.plays(), ids(&["a"]));
    assert_eq!(recent_ids(&h), ids(&["a"]));
}

#[tokio::test]
async fn signed_out_plays_are_kept_locally_only() {
    let h = Harness::new(SONGS).await;
    h.queue(&["a", "b"]).await;
    h.player.session().skip_to_next().await;
    h.player.history().flush().await;

    assert!(h.service.plays().is_empty());
    assert_eq!(recent_ids(&h), ids(&["a", "b"]));
}

#[tokio::test]
async fn sign_out_stops_reporting() {
    let h = signed_in(test_config()).await;
    h.queue(&["a", "b"]).await;

    h.player.set_access_token(None).await;
    h.player.session().skip_to_next().await;
    h.player.history().flush().await;

    assert_eq!(h.service.plays(), ids(&["a"]));
}

#[tokio::test]
async fn reporting_can_be_disabled() {
    let config = PlaybackConfig {
        record_plays: false,
        ..test_config()
    };
    let h = signed_in(config).await;
    h.queue(&["a", "b"]).await;
    h.player.session().skip_to_next().await;
    h.player.history().flush().await;

    assert!(h.service.plays().is_empty());
    assert_eq!(recent_ids(&h), ids(&["a", "b"]));
}

#[tokio::test]
async fn failed_report_does_not_affect_playback() {
    let mut h = signed_in(test_config()).await;
    h.drain_notices();
    h.service.fail(Endpoint::RecordPlay);

    h.queue(&["a", "b"]).await;
    h.player.session().skip_to_next().await;
    h.player.history().flush().await;

    assert_eq!(h.current_index(), Some(1));
    assert_eq!(h.service.plays(), ids(&["a", "b"]));
    assert!(h.drain_notices().is_empty());
}

#[tokio::test]
async fn recent_plays_are_bounded() {
    let config = PlaybackConfig {
        history_size: 2,
        ..test_config()
    };
    let h = Harness::with_config(SONGS, config).await;
    h.queue(&["a", "b", "c"]).await;

    h.player.session().skip_to_next().await;
    h.player.session().skip_to_next().await;

    assert_eq!(recent_ids(&h), ids(&["b", "c"]));
}

#[tokio::test]
async fn shutdown_waits_for_pending_reports() {
    let h = signed_in(test_config()).await;
    h.queue(&["a"]).await;

    h.player.shutdown().await;

    assert_eq!(h.service.plays(), ids(&["a"]));
}
