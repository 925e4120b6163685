//! Persisted boolean application flags (`app_flags` table).

use crate::repo::memory_repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

pub trait FlagRepository {
    /// Returns the stored value, `false` when the flag was never written.
    fn get_flag(&self, key: &str) -> RepoResult<bool>;
    fn set_flag(&self, key: &str, value: bool) -> RepoResult<()>;
}

pub struct SqliteFlagRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFlagRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl FlagRepository for SqliteFlagRepository<'_> {
    fn get_flag(&self, key: &str) -> RepoResult<bool> {
        let value: Option<i64> = self
            .conn
            .query_row(
                "SELECT value FROM app_flags WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            None | Some(0) => Ok(false),
            Some(1) => Ok(true),
            Some(other) => Err(RepoError::InvalidData(format!(
                "invalid flag value `{other}` for app_flags.{key}"
            ))),
        }
    }

    fn set_flag(&self, key: &str, value: bool) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO app_flags (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, i64::from(value)],
        )?;
        Ok(())
    }
}
