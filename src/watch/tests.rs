use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use notify::event::{AccessKind, CreateKind, DataChange, ModifyKind, RemoveKind};
use notify::{Event, EventKind};
use tempfile::tempdir;

use super::{
    ChangeHandler, DirectoryWatchRegistry, SubscribeOutcome, WatchError, WatchSubscription,
};
use crate::identity::FileIdentity;

fn counting_handler() -> (ChangeHandler, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = count.clone();
    let handler: ChangeHandler = Arc::new(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    (handler, count)
}

fn modified(path: &Path) -> Event {
    Event::new(EventKind::Modify(ModifyKind::Data(DataChange::Content)))
        .add_path(path.to_path_buf())
}

fn identity_in(dir: &Path, name: &str) -> FileIdentity {
    let path = dir.join(name);
    fs::write(&path, "@startuml\n@enduml\n").expect("write fixture");
    FileIdentity::Path(path)
}

#[test]
fn files_in_one_directory_share_a_single_watch() {
    let dir = tempdir().expect("tempdir");
    let first = identity_in(dir.path(), "a.puml");
    let second = identity_in(dir.path(), "b.puml");
    let mut registry = DirectoryWatchRegistry::new();

    let (handler_a, _) = counting_handler();
    let (handler_b, _) = counting_handler();
    assert_eq!(
        registry.subscribe(&first, handler_a).expect("subscribe a"),
        SubscribeOutcome::Created
    );
    assert_eq!(
        registry.subscribe(&second, handler_b).expect("subscribe b"),
        SubscribeOutcome::Attached
    );

    assert_eq!(registry.directory_count(), 1);
    assert_eq!(registry.handler_count(dir.path()), 2);
    assert!(registry.is_watching(&first));
    assert!(registry.is_watching(&second));
}

#[test]
fn change_events_reach_only_the_matching_file() {
    let dir = tempdir().expect("tempdir");
    let target = identity_in(dir.path(), "a.puml");
    let neighbour = identity_in(dir.path(), "unrelated.puml");
    let mut registry = DirectoryWatchRegistry::new();

    let (handler_a, count_a) = counting_handler();
    let (handler_b, count_b) = counting_handler();
    registry.subscribe(&target, handler_a).expect("subscribe a");
    registry.subscribe(&neighbour, handler_b).expect("subscribe b");

    let subscription = registry.subscription(dir.path()).expect("subscription");
    let target_path = target.as_path().expect("path");
    assert_eq!(subscription.dispatch(&modified(target_path)), 1);
    assert_eq!(count_a.load(Ordering::SeqCst), 1);
    assert_eq!(count_b.load(Ordering::SeqCst), 0);
}

#[test]
fn only_content_changes_dispatch() {
    let dir = Path::new("/watched");
    let file = dir.join("a.puml");
    let subscription = WatchSubscription::detached(dir);
    let (handler, count) = counting_handler();
    subscription.attach(file.clone(), handler);

    let ignored = [
        EventKind::Access(AccessKind::Any),
        EventKind::Remove(RemoveKind::File),
        EventKind::Other,
    ];
    for kind in ignored {
        assert_eq!(subscription.dispatch(&Event::new(kind).add_path(file.clone())), 0);
    }

    let created = Event::new(EventKind::Create(CreateKind::File)).add_path(file.clone());
    assert_eq!(subscription.dispatch(&created), 1);
    assert_eq!(subscription.dispatch(&modified(&file)), 1);
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn unrelated_or_prefix_paths_do_not_match() {
    let dir = Path::new("/watched");
    let subscription = WatchSubscription::detached(dir);
    let (handler, count) = counting_handler();
    subscription.attach(dir.join("a.puml"), handler);

    assert_eq!(subscription.dispatch(&modified(&dir.join("a.puml.bak"))), 0);
    assert_eq!(subscription.dispatch(&modified(&dir.join("nested/a.puml"))), 0);
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn virtual_identities_are_skipped() {
    let mut registry = DirectoryWatchRegistry::new();
    let (handler, _) = counting_handler();
    let identity = FileIdentity::Virtual("untitled:Untitled-1".into());

    let outcome = registry.subscribe(&identity, handler).expect("subscribe");
    assert_eq!(outcome, SubscribeOutcome::Skipped);
    assert_eq!(registry.directory_count(), 0);
    assert!(!registry.unsubscribe(&identity));
}

#[test]
fn missing_directory_is_unavailable() {
    let dir = tempdir().expect("tempdir");
    let identity = FileIdentity::Path(dir.path().join("gone").join("a.puml"));
    let mut registry = DirectoryWatchRegistry::new();
    let (handler, _) = counting_handler();

    let error = registry.subscribe(&identity, handler).expect_err("must fail");
    assert!(matches!(error, WatchError::Unavailable { .. }));
    assert_eq!(registry.directory_count(), 0);
}

#[test]
fn last_unsubscribe_releases_the_directory() {
    let dir = tempdir().expect("tempdir");
    let first = identity_in(dir.path(), "a.puml");
    let second = identity_in(dir.path(), "b.puml");
    let mut registry = DirectoryWatchRegistry::new();
    registry.subscribe(&first, counting_handler().0).expect("subscribe a");
    registry.subscribe(&second, counting_handler().0).expect("subscribe b");

    assert!(registry.unsubscribe(&first));
    assert_eq!(registry.directory_count(), 1);
    assert!(!registry.is_watching(&first));
    assert!(!registry.unsubscribe(&first));

    assert!(registry.unsubscribe(&second));
    assert_eq!(registry.directory_count(), 0);
}

#[cfg(target_os = "linux")]
#[test]
fn writing_a_watched_file_fires_its_handler() {
    let dir = tempdir().expect("tempdir");
    let identity = identity_in(dir.path(), "live.puml");
    let mut registry = DirectoryWatchRegistry::new();

    let (tx, rx) = mpsc::channel();
    let handler: ChangeHandler = Arc::new(move || {
        let _ = tx.send(());
    });
    registry.subscribe(&identity, handler).expect("subscribe");

    let path = identity.as_path().expect("path");
    fs::write(path, "@startuml\nA -> B\n@enduml\n").expect("modify fixture");
    rx.recv_timeout(Duration::from_secs(10))
        .expect("change notification");
}
