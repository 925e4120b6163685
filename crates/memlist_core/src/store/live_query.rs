//! Live query subscriptions.

use crate::repo::memory_repo::{
    GroupedQuery, GroupedResults, MemoryRepository, SqliteMemoryRepository,
};
use log::{debug, error};
use rusqlite::Connection;
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Receives the complete grouped result every time a live query changes.
pub trait QueryObserver {
    fn results_changed(&mut self, results: &GroupedResults);
}

impl<F: FnMut(&GroupedResults)> QueryObserver for F {
    fn results_changed(&mut self, results: &GroupedResults) {
        self(results)
    }
}

/// Observer handle shared between the store and whoever renders it.
pub type SharedObserver = Rc<RefCell<dyn QueryObserver>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub(crate) struct Subscription {
    id: SubscriptionId,
    query: GroupedQuery,
    observer: SharedObserver,
    last_delivered: Option<GroupedResults>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, query: GroupedQuery, observer: SharedObserver) -> Self {
        Self {
            id,
            query,
            observer,
            last_delivered: None,
        }
    }

    pub(crate) fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Fetches the current result and delivers it if it changed.
    pub(crate) fn refresh(&mut self, conn: &Connection) {
        let results = match SqliteMemoryRepository::new(conn).list_grouped(&self.query) {
            Ok(results) => results,
            Err(err) => {
                error!(
                    "event=live_query_fetch module=store status=error subscription={} error={}",
                    self.id, err
                );
                return;
            }
        };

        if self.last_delivered.as_ref() == Some(&results) {
            debug!(
                "event=live_query_fetch module=store status=unchanged subscription={}",
                self.id
            );
            return;
        }

        debug!(
            "event=live_query_notify module=store status=ok subscription={} groups={} items={}",
            self.id,
            results.len(),
            results.iter().map(|group| group.members.len()).sum::<usize>()
        );
        self.observer.borrow_mut().results_changed(&results);
        self.last_delivered = Some(results);
    }
}
