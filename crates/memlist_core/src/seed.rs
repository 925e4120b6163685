//! First-run population of the memory store.
//!
//! # Responsibility
//! - Insert the built-in memory list once per database.
//!
//! # Invariants
//! - Records and the `memories_seeded` flag commit in one transaction.
//! - Once the flag is set, seeding performs no writes.
//! - Failures are logged and swallowed; the flag stays unset so the next
//!   launch retries.

use crate::model::memory::Memory;
use crate::repo::flag_repo::{FlagRepository, SqliteFlagRepository};
use crate::repo::memory_repo::{MemoryRepository, RepoError, SqliteMemoryRepository};
use crate::store::MemoryStore;
use log::{error, info};
use url::Url;

pub const SEEDED_FLAG: &str = "memories_seeded";

/// One built-in `(title, category, url)` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedEntry {
    pub title: &'static str,
    pub kind: &'static str,
    pub url: &'static str,
}

const fn entry(title: &'static str, kind: &'static str, url: &'static str) -> SeedEntry {
    SeedEntry { title, kind, url }
}

const FIRST_HALF: &str = "First half";
const SECOND_HALF: &str = "Second half";

pub const SEED_MEMORIES: &[SeedEntry] = &[
    entry("Afternoon walk in Chamonix, France, in winter (part 1)", FIRST_HALF, "https://youtu.be/ANBGkZwOX68"),
    entry("Afternoon walk in Chamonix, France, in winter (part 2)", FIRST_HALF, "https://youtu.be/FP9_xIqeY04"),
    entry("Afternoon walk in Chamonix, France, in winter (part 3)", FIRST_HALF, "https://youtu.be/0yHPJjrmY9M"),
    entry("Afternoon walk in Chamonix, France, in winter (part 4)", FIRST_HALF, "https://youtu.be/i140FFzKwHM"),
    entry("Afternoon walk in Chamonix, France, in winter (part 5)", FIRST_HALF, "https://youtu.be/-c37LBSJrA0"),
    entry("Afternoon walk in Chamonix, France, in winter (part 6)", FIRST_HALF, "https://youtu.be/RlHwBtO65GI"),
    entry("Afternoon walk in Chamonix, France, in winter (part 7)", SECOND_HALF, "https://youtu.be/ZSvNcpWSccE"),
    entry("Afternoon walk in Chamonix, France, in winter (part 8)", SECOND_HALF, "https://youtu.be/_crNfAd86bc"),
    entry("Afternoon walk in Chamonix, France, in winter (part 9)", SECOND_HALF, "https://youtu.be/DGyK0es9ZQg"),
    entry("Afternoon walk in Chamonix, France, in winter (part 10)", SECOND_HALF, "https://youtu.be/ojIhjb8J7fU"),
    entry("Afternoon walk in Chamonix, France, in winter (part 11)", SECOND_HALF, "https://youtu.be/swI3Mp_Ofqk"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// This call inserted `n` records.
    Seeded(usize),
    AlreadySeeded,
    /// Logged and swallowed; retried on next run.
    Failed,
}

/// Seeds [`SEED_MEMORIES`] unless this database was seeded before.
pub fn seed_if_needed(store: &mut MemoryStore) -> SeedOutcome {
    seed_with(store, SEED_MEMORIES)
}

/// Seeds `entries` unless this database was seeded before.
pub fn seed_with(store: &mut MemoryStore, entries: &[SeedEntry]) -> SeedOutcome {
    match SqliteFlagRepository::new(store.connection()).get_flag(SEEDED_FLAG) {
        Ok(true) => {
            info!("event=seed module=seed status=skipped reason=already_seeded");
            return SeedOutcome::AlreadySeeded;
        }
        Ok(false) => {}
        Err(err) => {
            error!("event=seed module=seed status=error stage=read_flag error={err}");
            return SeedOutcome::Failed;
        }
    }

    let memories = match build_memories(entries) {
        Ok(memories) => memories,
        Err(err) => {
            error!("event=seed module=seed status=error stage=build error={err}");
            return SeedOutcome::Failed;
        }
    };

    let written = store.write_batch(|conn| {
        let repo = SqliteMemoryRepository::new(conn);
        for memory in &memories {
            repo.create_memory(memory)?;
        }
        SqliteFlagRepository::new(conn).set_flag(SEEDED_FLAG, true)?;
        Ok(memories.len())
    });

    match written {
        Ok(count) => {
            info!("event=seed module=seed status=ok inserted={count}");
            SeedOutcome::Seeded(count)
        }
        Err(err) => {
            error!("event=seed module=seed status=error stage=commit error={err}");
            SeedOutcome::Failed
        }
    }
}

fn build_memories(entries: &[SeedEntry]) -> Result<Vec<Memory>, RepoError> {
    entries
        .iter()
        .map(|entry| {
            let url = Url::parse(entry.url).map_err(|err| {
                RepoError::InvalidData(format!("invalid seed url `{}`: {err}", entry.url))
            })?;
            let memory = Memory::new(entry.title, entry.kind, url);
            memory.validate()?;
            Ok(memory)
        })
        .collect()
}
