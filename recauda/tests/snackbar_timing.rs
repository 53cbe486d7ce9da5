//! Snackbar timers running inside a store, on paused tokio time.

#![allow(clippy::unwrap_used)]

use recauda::snackbar::{Notice, SnackbarAction, SnackbarPhase, SnackbarReducer, SnackbarState, SnackbarTimings};
use recauda_runtime::{Store, StoreError};
use std::time::Duration;

type SnackbarStore = Store<SnackbarState, SnackbarAction, (), SnackbarReducer>;

fn store(timings: &SnackbarTimings) -> SnackbarStore {
    Store::new(SnackbarState::default(), SnackbarReducer::from_timings(timings), ())
}

async fn advance_to(start: tokio::time::Instant, ms: u64) {
    tokio::time::sleep_until(start + Duration::from_millis(ms)).await;
}

async fn phase(store: &SnackbarStore) -> SnackbarPhase {
    store.state(|state| state.phase).await
}

#[tokio::test(start_paused = true)]
async fn success_notice_closes_then_hides() {
    let timings = SnackbarTimings::default();
    let store = store(&timings);
    let start = tokio::time::Instant::now();

    store
        .send(timings.show(Notice::success("Vendedor editado con éxito")))
        .await
        .unwrap();
    assert_eq!(phase(&store).await, SnackbarPhase::Visible);

    advance_to(start, 2650).await;
    assert_eq!(phase(&store).await, SnackbarPhase::Visible);

    advance_to(start, 2750).await;
    assert_eq!(phase(&store).await, SnackbarPhase::Closing);

    advance_to(start, 3050).await;
    assert_eq!(phase(&store).await, SnackbarPhase::Hidden);
    assert!(store.state(|state| state.notice.is_none()).await);
}

#[tokio::test(start_paused = true)]
async fn error_notice_uses_the_longer_duration() {
    let timings = SnackbarTimings::default();
    let store = store(&timings);
    let start = tokio::time::Instant::now();

    store
        .send(timings.show(Notice::error("No se pudieron realizar los cambios")))
        .await
        .unwrap();

    advance_to(start, 4650).await;
    assert_eq!(phase(&store).await, SnackbarPhase::Visible);
    advance_to(start, 4750).await;
    assert_eq!(phase(&store).await, SnackbarPhase::Closing);
    advance_to(start, 5050).await;
    assert_eq!(phase(&store).await, SnackbarPhase::Hidden);
}

#[tokio::test(start_paused = true)]
async fn unmount_mid_display_freezes_state() {
    let timings = SnackbarTimings::default();
    let store = store(&timings);
    let start = tokio::time::Instant::now();

    store.send(timings.show(Notice::success("Guardado"))).await.unwrap();
    advance_to(start, 100).await;
    let before = store.state(Clone::clone).await;

    store.dispose();
    advance_to(start, 10_000).await;

    assert_eq!(store.state(Clone::clone).await, before);
    assert_eq!(before.phase, SnackbarPhase::Visible);
    assert_eq!(store.pending_effects(), 0);
    assert!(matches!(
        store.send(SnackbarAction::Dismiss).await,
        Err(StoreError::Disposed)
    ));
}

#[tokio::test(start_paused = true)]
async fn showing_again_restarts_the_timers() {
    let timings = SnackbarTimings::default();
    let store = store(&timings);
    let start = tokio::time::Instant::now();

    store.send(timings.show(Notice::success("Primero"))).await.unwrap();
    advance_to(start, 2000).await;
    store.send(timings.show(Notice::success("Segundo"))).await.unwrap();

    // The first notice's timers would have fired at 2700 and 3000.
    advance_to(start, 3100).await;
    assert_eq!(phase(&store).await, SnackbarPhase::Visible);
    assert_eq!(
        store.state(|state| state.notice.as_ref().map(|n| n.message.clone())).await,
        Some("Segundo".to_string())
    );

    advance_to(start, 4750).await;
    assert_eq!(phase(&store).await, SnackbarPhase::Closing);
    advance_to(start, 5050).await;
    assert_eq!(phase(&store).await, SnackbarPhase::Hidden);
}

#[tokio::test(start_paused = true)]
async fn dismiss_plays_only_the_closing_animation() {
    let timings = SnackbarTimings::default();
    let store = store(&timings);
    let start = tokio::time::Instant::now();

    store.send(timings.show(Notice::success("Guardado"))).await.unwrap();
    advance_to(start, 500).await;
    store.send(SnackbarAction::Dismiss).await.unwrap();
    assert_eq!(phase(&store).await, SnackbarPhase::Closing);

    advance_to(start, 850).await;
    assert_eq!(phase(&store).await, SnackbarPhase::Hidden);

    // Stale timers of the dismissed notice must not reopen or re-close anything.
    advance_to(start, 3500).await;
    assert_eq!(phase(&store).await, SnackbarPhase::Hidden);
}
