use memlist_core::{GroupedQuery, GroupedResults, Memory, MemoryStore, ResultGroup, SharedObserver};
use std::cell::RefCell;
use std::rc::Rc;
use url::Url;

fn memory(title: &str, kind: &str) -> Memory {
    Memory::new(title, kind, Url::parse("https://youtu.be/FP9_xIqeY04").unwrap())
}

/// Observer that records every delivered result set.
fn recorder() -> (SharedObserver, Rc<RefCell<Vec<GroupedResults>>>) {
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&received);
    let observer: SharedObserver = Rc::new(RefCell::new(move |results: &GroupedResults| {
        sink.borrow_mut().push(results.clone());
    }));
    (observer, received)
}

#[test]
fn subscribe_delivers_initial_result_immediately() {
    let mut store = MemoryStore::open_in_memory().unwrap();
    let a = memory("a", "alpha");
    store.insert(&a).unwrap();

    let (observer, received) = recorder();
    store.subscribe(GroupedQuery::all(), observer);

    assert_eq!(
        *received.borrow(),
        vec![vec![ResultGroup::new("alpha", vec![a.id])]]
    );
}

#[test]
fn empty_store_delivers_empty_initial_result() {
    let mut store = MemoryStore::open_in_memory().unwrap();
    let (observer, received) = recorder();
    store.subscribe(GroupedQuery::all(), observer);

    assert_eq!(received.borrow().len(), 1);
    assert!(received.borrow()[0].is_empty());
}

#[test]
fn every_write_delivers_the_complete_result_not_a_delta() {
    let mut store = MemoryStore::open_in_memory().unwrap();
    let (observer, received) = recorder();
    store.subscribe(GroupedQuery::all(), observer);

    let a = memory("a", "alpha");
    let b = memory("b", "beta");
    store.insert(&a).unwrap();
    store.insert(&b).unwrap();
    store.delete(a.id).unwrap();

    let received = received.borrow();
    assert_eq!(received.len(), 4);
    assert_eq!(received[1], vec![ResultGroup::new("alpha", vec![a.id])]);
    assert_eq!(
        received[2],
        vec![
            ResultGroup::new("alpha", vec![a.id]),
            ResultGroup::new("beta", vec![b.id]),
        ]
    );
    assert_eq!(received[3], vec![ResultGroup::new("beta", vec![b.id])]);
}

#[test]
fn batch_insert_notifies_once() {
    let mut store = MemoryStore::open_in_memory().unwrap();
    let (observer, received) = recorder();
    store.subscribe(GroupedQuery::all(), observer);

    let batch = vec![memory("a", "alpha"), memory("b", "alpha"), memory("c", "beta")];
    store.insert_batch(&batch).unwrap();

    assert_eq!(received.borrow().len(), 2);
    assert_eq!(store.count().unwrap(), 3);
}

#[test]
fn failed_batch_rolls_back_and_does_not_notify() {
    let mut store = MemoryStore::open_in_memory().unwrap();
    let (observer, received) = recorder();
    store.subscribe(GroupedQuery::all(), observer);

    let valid = memory("a", "alpha");
    let invalid = memory("", "alpha");
    assert!(store.insert_batch(&[valid, invalid]).is_err());

    assert_eq!(store.count().unwrap(), 0);
    assert_eq!(received.borrow().len(), 1);
}

#[test]
fn unchanged_results_are_not_redelivered() {
    let mut store = MemoryStore::open_in_memory().unwrap();
    let (observer, received) = recorder();
    store.subscribe(GroupedQuery::only_kind("alpha"), observer);

    store.insert(&memory("x", "beta")).unwrap();
    store.refresh();

    assert_eq!(received.borrow().len(), 1);
}

#[test]
fn unsubscribed_observer_hears_nothing_more() {
    let mut store = MemoryStore::open_in_memory().unwrap();
    let (observer, received) = recorder();
    let id = store.subscribe(GroupedQuery::all(), observer);

    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
    store.insert(&memory("a", "alpha")).unwrap();

    assert_eq!(received.borrow().len(), 1);
}

#[test]
fn fetch_failure_leaves_observer_with_stale_result() {
    let mut store = MemoryStore::open_in_memory().unwrap();
    store.insert(&memory("a", "alpha")).unwrap();
    let (observer, received) = recorder();
    store.subscribe(GroupedQuery::all(), observer);

    store
        .connection()
        .execute_batch("DROP TABLE memories;")
        .unwrap();
    store.refresh();

    let received = received.borrow();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0][0].members.len(), 1);
}
