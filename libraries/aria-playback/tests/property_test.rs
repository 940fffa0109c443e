//! Property-based tests for the playback session
//!
//! Uses proptest to drive the session with random command sequences and
//! checks the queue invariants after every step.

mod common;

use aria_playback::{PlaybackConfig, SessionState};
use common::{test_config, Harness};
use proptest::prelude::*;
use std::collections::HashSet;
use std::future::Future;

const SONGS: &[&str] = &["s0", "s1", "s2", "s3", "s4", "s5"];

#[derive(Debug, Clone)]
enum Op {
    Play(usize),
    Add(usize),
    Next,
    Previous,
    Shuffle,
    Repeat,
    Finish,
    PlayPause,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => (0..SONGS.len()).prop_map(Op::Play),
        3 => (0..SONGS.len()).prop_map(Op::Add),
        2 => Just(Op::Next),
        1 => Just(Op::Previous),
        2 => Just(Op::Shuffle),
        1 => Just(Op::Repeat),
        1 => Just(Op::Finish),
        1 => Just(Op::PlayPause),
    ]
}

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

async fn apply(h: &Harness, op: &Op) {
    let session = h.player.session();
    match op {
        Op::Play(i) => session.play_with_id(SONGS[*i]).await,
        Op::Add(i) => session.add_to_queue(SONGS[*i]).await,
        Op::Next => session.skip_to_next().await,
        Op::Previous => session.skip_to_previous().await,
        Op::Shuffle => {
            session.toggle_shuffle().await;
        }
        Op::Repeat => {
            session.toggle_repeat().await;
        }
        Op::Finish => {
            h.engine.finish_current_track();
            session.settle().await;
        }
        Op::PlayPause => session.toggle_play_pause().await,
    }
}

/// Invariants that hold between any two commands
fn check_invariants(h: &Harness, state: &SessionState) -> Result<(), TestCaseError> {
    let queue = &state.queue;

    match queue.current_index() {
        None => prop_assert!(queue.is_empty()),
        Some(index) => prop_assert!(index < queue.len()),
    }

    let keys: HashSet<_> = queue.entries().iter().map(|e| e.key).collect();
    prop_assert_eq!(keys.len(), queue.len(), "entry keys must be unique");

    if let Some(original) = state.shuffle.original_order() {
        let original_keys: HashSet<_> = original.iter().map(|e| e.key).collect();
        prop_assert_eq!(&original_keys, &keys, "original order is a permutation");
    }

    prop_assert_eq!(h.engine.queue_ids(), queue.track_ids());
    prop_assert_eq!(h.engine.current_index(), queue.current_index());
    prop_assert_eq!(h.engine.repeat_mode(), state.repeat);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: every command sequence keeps session and engine in step
    #[test]
    fn random_commands_keep_queue_consistent(
        ops in prop::collection::vec(arbitrary_op(), 1..40),
        seed in any::<u64>(),
    ) {
        block_on(async {
            let config = PlaybackConfig { shuffle_seed: Some(seed), ..test_config() };
            let h = Harness::with_config(SONGS, config).await;

            for op in &ops {
                apply(&h, op).await;
                let state = h.player.session().state();
                check_invariants(&h, &state)?;
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    /// Property: shuffle on then off is the identity on order and current entry
    #[test]
    fn shuffle_round_trip_restores_exactly(
        picks in prop::collection::vec(0..SONGS.len(), 1..20),
        current in 0usize..20,
        seed in any::<u64>(),
    ) {
        block_on(async {
            let config = PlaybackConfig { shuffle_seed: Some(seed), ..test_config() };
            let h = Harness::with_config(SONGS, config).await;
            let session = h.player.session();

            let ids: Vec<&str> = picks.iter().map(|i| SONGS[*i]).collect();
            h.queue(&ids).await;
            for _ in 0..current % ids.len() {
                session.skip_to_next().await;
            }

            let before = session.state();
            let playing = before.queue.current().unwrap().key;

            prop_assert!(session.toggle_shuffle().await);
            let shuffled = session.state();
            prop_assert_eq!(shuffled.queue.current_index(), Some(0));
            prop_assert_eq!(shuffled.queue.current().unwrap().key, playing);
            prop_assert_eq!(shuffled.queue.len(), before.queue.len());

            prop_assert!(!session.toggle_shuffle().await);
            let restored = session.state();
            prop_assert_eq!(restored.queue.entries(), before.queue.entries());
            prop_assert_eq!(restored.queue.current_index(), before.queue.current_index());
            Ok::<(), TestCaseError>(())
        })?;
    }

    /// Property: appending while shuffled lands the track at the end of both orders
    #[test]
    fn add_while_shuffled_extends_both_orders(
        picks in prop::collection::vec(0..SONGS.len(), 1..12),
        added in 0..SONGS.len(),
        seed in any::<u64>(),
    ) {
        block_on(async {
            let config = PlaybackConfig { shuffle_seed: Some(seed), ..test_config() };
            let h = Harness::with_config(SONGS, config).await;
            let session = h.player.session();

            let ids: Vec<&str> = picks.iter().map(|i| SONGS[*i]).collect();
            h.queue(&ids).await;
            session.toggle_shuffle().await;
            session.add_to_queue(SONGS[added]).await;

            let state = session.state();
            let last = state.queue.entries().last().unwrap().key;
            let original = state.shuffle.original_order().unwrap();
            prop_assert_eq!(original.last().unwrap().key, last);

            session.toggle_shuffle().await;
            let restored = session.state();
            prop_assert_eq!(restored.queue.len(), ids.len() + 1);
            prop_assert_eq!(restored.queue.entries().last().unwrap().key, last);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
