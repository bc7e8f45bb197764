//! End-to-end flows through `TodoApp` with in-memory directories.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use todoboard::directory::mocks::{FailingDirectory, PendingDirectory, StaticDirectory};
use todoboard::directory::{DirectoryState, UserDirectory};
use todoboard::widgets::{DirectoryStatus, Key};
use todoboard::{AssignableUser, DirectoryError, TodoApp, UiEvent, UserId};

/// Wait until the directory state satisfies `done`
async fn wait_for_directory(app: &TodoApp, done: impl Fn(&DirectoryState) -> bool) -> DirectoryState {
    let mut revisions = app.list_view().directory_revisions();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let state = app.list_view().directory_state().await;
            if done(&state) {
                return state;
            }
            revisions.changed().await.unwrap();
        }
    })
    .await
    .unwrap()
}

async fn wait_until(condition: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();
}

/// Sets a flag when dropped
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// Directory whose fetch never resolves and reports when it is dropped
#[derive(Default)]
struct TrackedPendingDirectory {
    started: AtomicUsize,
    dropped: Arc<AtomicBool>,
}

impl UserDirectory for TrackedPendingDirectory {
    fn fetch_users(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<AssignableUser>, DirectoryError>> + Send + '_>> {
        self.started.fetch_add(1, Ordering::SeqCst);
        let guard = DropFlag(Arc::clone(&self.dropped));
        Box::pin(async move {
            let _guard = guard;
            std::future::pending().await
        })
    }
}

#[tokio::test]
async fn mount_loads_directory_once() {
    todoboard_testing::init_test_tracing();
    let directory = Arc::new(StaticDirectory::sample());
    let mut app = TodoApp::new(directory.clone());

    app.mount().await.unwrap();
    app.mount().await.unwrap();
    let state = wait_for_directory(&app, |state| matches!(state, DirectoryState::Loaded(_))).await;

    assert_eq!(state.users().len(), 2);
    assert_eq!(directory.calls(), 1);
    assert!(app.list_view().is_mounted());
}

#[tokio::test]
async fn loaded_users_feed_assignment_selector() {
    let mut app = TodoApp::new(Arc::new(StaticDirectory::sample()));
    app.mount().await.unwrap();
    wait_for_directory(&app, |state| matches!(state, DirectoryState::Loaded(_))).await;

    app.handle(UiEvent::DraftChanged("  Buy milk  ".into())).await.unwrap();
    app.handle(UiEvent::Key(Key::Enter)).await.unwrap();
    app.handle(UiEvent::Assign {
        index: 0,
        value: "2".into(),
    })
    .await
    .unwrap();

    let frame = app.render().await;
    let row = &frame.list.rows[0];

    assert_eq!(row.title, "Buy milk");
    assert_eq!(row.assignee, Some(UserId::new(2)));
    assert_eq!(row.assignee_label, "Ervin Howell");
    assert_eq!(row.options.len(), 3);
    assert!(row.options[2].selected);
    assert_eq!(frame.list.directory, DirectoryStatus::Ready(2));
}

#[tokio::test]
async fn failed_fetch_is_observable() {
    todoboard_testing::init_test_tracing();
    let directory = Arc::new(FailingDirectory::new(DirectoryError::RequestFailed(
        "connection refused".into(),
    )));
    let mut app = TodoApp::new(directory.clone());

    app.mount().await.unwrap();
    wait_for_directory(&app, |state| matches!(state, DirectoryState::Failed(_))).await;

    let frame = app.render().await;
    assert!(matches!(frame.list.directory, DirectoryStatus::Failed(ref message) if message.contains("connection refused")));
    assert!(frame.to_string().contains("users: unavailable"));
    assert_eq!(directory.calls(), 1);

    // The list keeps working without users
    app.handle(UiEvent::DraftChanged("Walk dog".into())).await.unwrap();
    app.handle(UiEvent::Key(Key::Enter)).await.unwrap();
    assert_eq!(app.todos().await.len(), 1);
}

#[tokio::test]
async fn empty_directory_differs_from_loading() {
    let mut app = TodoApp::new(Arc::new(StaticDirectory::new(Vec::new())));

    assert_eq!(app.render().await.list.directory, DirectoryStatus::NotRequested);

    app.mount().await.unwrap();
    wait_for_directory(&app, |state| matches!(state, DirectoryState::Loaded(_))).await;

    assert_eq!(app.render().await.list.directory, DirectoryStatus::Empty);
}

#[tokio::test]
async fn pending_fetch_shows_loading() {
    let directory = Arc::new(PendingDirectory::new());
    let mut app = TodoApp::new(directory.clone());

    app.mount().await.unwrap();
    wait_until(|| directory.calls() == 1).await;

    assert_eq!(app.render().await.list.directory, DirectoryStatus::Loading);
}

#[tokio::test]
async fn dropping_app_cancels_fetch() {
    todoboard_testing::init_test_tracing();
    let directory = Arc::new(TrackedPendingDirectory::default());
    let dropped = Arc::clone(&directory.dropped);
    let mut app = TodoApp::new(directory.clone());

    app.mount().await.unwrap();
    wait_until(|| directory.started.load(Ordering::SeqCst) == 1).await;
    assert!(!dropped.load(Ordering::SeqCst));

    drop(app);

    wait_until(|| dropped.load(Ordering::SeqCst)).await;
}

#[tokio::test]
async fn unmount_cancels_fetch() {
    let directory = Arc::new(TrackedPendingDirectory::default());
    let dropped = Arc::clone(&directory.dropped);
    let mut app = TodoApp::new(directory.clone());

    app.mount().await.unwrap();
    wait_until(|| directory.started.load(Ordering::SeqCst) == 1).await;

    assert!(app.list_view().directory_state().await.is_loading());

    app.unmount().await.unwrap();
    wait_until(|| dropped.load(Ordering::SeqCst)).await;

    assert_eq!(app.list_view().directory_state().await, DirectoryState::NotRequested);
    assert!(!app.list_view().is_mounted());
}
