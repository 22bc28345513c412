//! Move submission guard under a real tokio runtime: single flight per key,
//! strictly serial FIFO execution across keys, failure isolation and
//! re-validation of slow external suggestions.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chess_core::config::GuardConfig;
use chess_core::engine::{ChessError, Game, Rejection};
use chess_core::guard::{Dedupe, DispatchError, GuardedGame, MoveDispatcher, MoveSource};
use futures::future::{BoxFuture, join_all};
use tokio::sync::{Notify, oneshot};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn dispatcher(ttl: Duration) -> MoveDispatcher {
    MoveDispatcher::new(Arc::new(Dedupe::new(ttl)))
}

// =====================================================================
// Dispatcher
// =====================================================================

#[tokio::test]
async fn only_first_of_identical_submissions_runs() {
    init_tracing();
    let d = dispatcher(Duration::from_secs(5));
    let runs = Arc::new(AtomicUsize::new(0));
    let (release, gate) = oneshot::channel::<()>();

    let first = {
        let runs = Arc::clone(&runs);
        d.enqueue("fp:e2e4", move || async move {
            let _ = gate.await;
            runs.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>(())
        })
    };
    let duplicates: Vec<_> = (0..5)
        .map(|_| {
            let runs = Arc::clone(&runs);
            d.enqueue("fp:e2e4", move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(())
            })
        })
        .collect();

    for out in join_all(duplicates).await {
        assert_eq!(out.unwrap(), None);
    }
    release.send(()).unwrap();
    assert_eq!(first.await.unwrap(), Some(()));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert!(d.dedupe().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn never_more_than_one_task_at_a_time() {
    init_tracing();
    let d = dispatcher(Duration::from_secs(5));
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    let submissions: Vec<_> = (0..8)
        .map(|i| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            let order = Arc::clone(&order);
            d.enqueue(format!("key-{i}"), move || async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                order.lock().unwrap().push(i);
                in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, Infallible>(i)
            })
        })
        .collect();

    let results: Vec<_> = join_all(submissions)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap())
        .collect();
    assert_eq!(results, (0..8).collect::<Vec<_>>());
    assert_eq!(peak.load(Ordering::SeqCst), 1);
    assert_eq!(*order.lock().unwrap(), (0..8).collect::<Vec<_>>());
}

#[tokio::test]
async fn failed_and_panicked_tasks_release_their_keys() {
    init_tracing();
    let d = dispatcher(Duration::from_secs(5));

    let failed = d
        .enqueue("a", || async { Err::<(), _>(ChessError::NothingToUndo) })
        .await;
    assert!(matches!(failed, Err(DispatchError::Task(_))));

    let panicked = d
        .enqueue("b", || async {
            if true {
                panic!("boom");
            }
            Ok::<(), Infallible>(())
        })
        .await;
    assert!(matches!(panicked, Err(DispatchError::Panicked { .. })));

    // Both keys are free again and the worker is still alive.
    assert!(!d.dedupe().is_duplicate("a"));
    assert!(!d.dedupe().is_duplicate("b"));
    let again = d.enqueue("a", || async { Ok::<_, Infallible>("ok") }).await;
    assert_eq!(again.unwrap(), Some("ok"));
}

#[tokio::test(start_paused = true)]
async fn mark_expires_after_ttl_even_while_task_runs() {
    init_tracing();
    let ttl = Duration::from_millis(250);
    let d = dispatcher(ttl);
    let (release_slow, slow_gate) = oneshot::channel::<()>();
    let (release_late, late_gate) = oneshot::channel::<()>();

    let slow = d.enqueue("k", move || async move {
        let _ = slow_gate.await;
        Ok::<_, Infallible>(1)
    });
    let early = d.enqueue("k", || async { Ok::<_, Infallible>(2) });
    assert_eq!(early.await.unwrap(), None);

    tokio::time::advance(ttl).await;
    let late = d.enqueue("k", move || async move {
        let _ = late_gate.await;
        Ok::<_, Infallible>(3)
    });

    release_slow.send(()).unwrap();
    assert_eq!(slow.await.unwrap(), Some(1));

    // The finished job released only its own mark; the late one still
    // holds the key.
    assert!(d.dedupe().is_duplicate("k"));
    let third = d.enqueue("k", || async { Ok::<_, Infallible>(4) });
    assert_eq!(third.await.unwrap(), None);

    release_late.send(()).unwrap();
    assert_eq!(late.await.unwrap(), Some(3));
    assert!(!d.dedupe().is_duplicate("k"));
}

// =====================================================================
// GuardedGame
// =====================================================================

fn guarded() -> Arc<GuardedGame> {
    Arc::new(GuardedGame::new(Game::new(), &GuardConfig::default()))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_identical_moves_apply_once() {
    init_tracing();
    let g = guarded();
    let handles: Vec<_> = (0..10)
        .map(|_| tokio::spawn(g.submit_lan("e2e4")))
        .collect();

    // A late submission may see the new position and be refused instead of
    // skipped; either way only one e2e4 reaches the board.
    let mut applied = 0;
    for handle in handles {
        if let Some(result) = handle.await.unwrap().unwrap()
            && result.is_valid()
        {
            applied += 1;
        }
    }
    assert_eq!(applied, 1);
    assert_eq!(g.current().history.len(), 1);

    // New position, new key: the same text is judged again and refused.
    let again = g.submit_lan("e2e4").await.unwrap().unwrap();
    assert_eq!(again.rejection, Some(Rejection::NoPiece));
}

#[tokio::test]
async fn different_moves_are_applied_in_submission_order() {
    init_tracing();
    let g = guarded();
    let submissions = vec![
        g.submit_lan("e2e4"),
        g.submit_lan("e7e5"),
        g.submit_lan("g1f3"),
    ];
    for out in join_all(submissions).await {
        assert!(out.unwrap().unwrap().is_valid());
    }
    assert_eq!(
        g.current().to_fen(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
    );
}

#[tokio::test]
async fn subscribers_see_accepted_states_only() {
    init_tracing();
    let g = guarded();
    let mut rx = g.subscribe();

    let bad = g.submit_lan("e2e5").await.unwrap().unwrap();
    assert!(!bad.is_valid());
    assert!(!rx.has_changed().unwrap());

    g.submit_lan("d2d4").await.unwrap().unwrap();
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().history.len(), 1);
}

#[tokio::test]
async fn undo_goes_through_the_queue() {
    init_tracing();
    let g = guarded();
    let mut rx = g.subscribe();
    g.submit_lan("e2e4").await.unwrap().unwrap();
    g.submit_lan("e7e5").await.unwrap().unwrap();
    rx.borrow_and_update();

    // A double click on undo takes back one move, not two.
    let (a, b) = tokio::join!(g.submit_undo(), g.submit_undo());
    let undone: Vec<_> = [a.unwrap(), b.unwrap()].into_iter().flatten().collect();
    assert_eq!(undone.len(), 1);
    assert_eq!(undone[0].history.len(), 1);

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().history.len(), 1);
    assert_eq!(g.current().redo_stack.len(), 1);

    // Moves queued behind the undo see the rolled-back position.
    let replay = g.submit_lan("e7e5").await.unwrap().unwrap();
    assert!(replay.is_valid());
    assert!(g.current().redo_stack.is_empty());
}

// =====================================================================
// Move sources
// =====================================================================

/// Answers only once `ready` is notified.
struct Slow {
    answer: &'static str,
    ready: Notify,
}

impl MoveSource for Slow {
    fn suggest(&self, _fen: &str) -> BoxFuture<'_, Result<String, ChessError>> {
        Box::pin(async move {
            self.ready.notified().await;
            Ok(self.answer.to_string())
        })
    }

    fn name(&self) -> &str {
        "slow"
    }
}

struct Offline;

impl MoveSource for Offline {
    fn suggest(&self, _fen: &str) -> BoxFuture<'_, Result<String, ChessError>> {
        Box::pin(async { Err(ChessError::MoveSource("connection refused".into())) })
    }

    fn name(&self) -> &str {
        "offline"
    }
}

#[tokio::test]
async fn stale_suggestion_is_revalidated() {
    init_tracing();
    let g = guarded();
    let source = Slow {
        answer: "e2e4",
        ready: Notify::new(),
    };

    let (suggested, played) = tokio::join!(g.request_suggestion(&source), async {
        let played = g.submit_lan("e2e4").await;
        source.ready.notify_one();
        played
    });

    assert!(played.unwrap().unwrap().is_valid());
    // The suggestion was for the starting position; by the time it is
    // judged the e-pawn is gone.
    let suggested = suggested.unwrap().unwrap();
    assert_eq!(suggested.rejection, Some(Rejection::NoPiece));
    assert_eq!(g.current().history.len(), 1);
}

#[tokio::test]
async fn failing_source_leaves_game_untouched() {
    init_tracing();
    let g = guarded();
    let before = g.current();
    let err = g.request_suggestion(&Offline).await.unwrap_err();
    assert!(matches!(err, DispatchError::Source { ref name, .. } if name == "offline"));
    assert_eq!(g.current(), before);
}
