//! Record store with live grouped queries.
//!
//! # Responsibility
//! - Own the SQLite connection for the memory list.
//! - Run write batches in one transaction each.
//! - Re-run every live query after a committed batch and push the complete
//!   grouped result to its observer.
//!
//! # Invariants
//! - Observers receive full result sets, never deltas.
//! - An observer is notified only when its result set differs from the last
//!   one it received.
//! - Notifications run synchronously on the caller's thread, in commit order.
//! - A failed fetch is logged and skipped; the observer keeps its stale view.

pub mod live_query;

pub use live_query::{QueryObserver, SharedObserver, SubscriptionId};

use crate::db::{open_db, open_db_in_memory};
use crate::model::memory::{Memory, MemoryId};
use crate::repo::memory_repo::{
    GroupedQuery, GroupedResults, MemoryRepository, RepoResult, SqliteMemoryRepository,
};
use live_query::Subscription;
use log::{debug, info};
use rusqlite::Connection;
use std::path::Path;

/// Single-threaded owner of the memory database and its live queries.
pub struct MemoryStore {
    conn: Connection,
    subscriptions: Vec<Subscription>,
    next_subscription: u64,
}

impl MemoryStore {
    /// Wraps an already-migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            subscriptions: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Raw connection for read paths that need SQL the repositories don't
    /// expose.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn get(&self, id: MemoryId) -> RepoResult<Option<Memory>> {
        SqliteMemoryRepository::new(&self.conn).get_memory(id)
    }

    pub fn count(&self) -> RepoResult<u64> {
        SqliteMemoryRepository::new(&self.conn).count_memories()
    }

    /// One-shot grouped fetch, outside any subscription.
    pub fn fetch_grouped(&self, query: &GroupedQuery) -> RepoResult<GroupedResults> {
        SqliteMemoryRepository::new(&self.conn).list_grouped(query)
    }

    pub fn insert(&mut self, memory: &Memory) -> RepoResult<MemoryId> {
        self.write_batch(|conn| SqliteMemoryRepository::new(conn).create_memory(memory))
    }

    /// Inserts all memories atomically; observers see one notification.
    pub fn insert_batch(&mut self, memories: &[Memory]) -> RepoResult<Vec<MemoryId>> {
        if memories.is_empty() {
            return Ok(Vec::new());
        }
        self.write_batch(|conn| {
            let repo = SqliteMemoryRepository::new(conn);
            memories
                .iter()
                .map(|memory| repo.create_memory(memory))
                .collect()
        })
    }

    pub fn delete(&mut self, id: MemoryId) -> RepoResult<()> {
        self.write_batch(|conn| SqliteMemoryRepository::new(conn).delete_memory(id))
    }

    /// Runs `write` inside one transaction and notifies live queries after
    /// commit.
    ///
    /// On error the transaction is rolled back and nobody is notified.
    pub fn write_batch<T>(
        &mut self,
        write: impl FnOnce(&Connection) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let tx = self.conn.transaction()?;
        let value = write(&tx)?;
        tx.commit()?;
        self.notify_all();
        Ok(value)
    }

    /// Registers a live query and delivers its initial result immediately.
    ///
    /// A failing initial fetch is logged; the subscription stays active and
    /// the observer hears about the first successful fetch after a later
    /// write or [`MemoryStore::refresh`].
    pub fn subscribe(&mut self, query: GroupedQuery, observer: SharedObserver) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        let mut subscription = Subscription::new(id, query, observer);
        subscription.refresh(&self.conn);
        self.subscriptions.push(subscription);

        info!(
            "event=live_query_subscribe module=store status=ok subscription={} active={}",
            id,
            self.subscriptions.len()
        );
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id() != id);
        let removed = self.subscriptions.len() != before;
        debug!(
            "event=live_query_unsubscribe module=store removed={} subscription={}",
            removed, id
        );
        removed
    }

    /// Re-runs every live query, e.g. after an external writer touched the
    /// database file.
    pub fn refresh(&mut self) {
        self.notify_all();
    }

    fn notify_all(&mut self) {
        for subscription in &mut self.subscriptions {
            subscription.refresh(&self.conn);
        }
    }
}
