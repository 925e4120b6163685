//! Memory repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/delete/count over the `memories` table.
//! - Run the grouped, sorted list query that feeds the live observer.
//!
//! # Invariants
//! - Write paths call `Memory::validate()` before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.
//! - Grouped results are ordered by `type ASC, seq ASC`; `seq` is insertion
//!   order, the store's natural order inside one category.

use crate::db::DbError;
use crate::model::memory::{Memory, MemoryId, MemoryValidationError};
use rusqlite::types::Value;
use rusqlite::{ffi, params, params_from_iter, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

const MEMORY_SELECT_SQL: &str = "SELECT id, title, type, resource_url FROM memories";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for memory persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(MemoryValidationError),
    Db(DbError),
    NotFound(MemoryId),
    /// A memory with this id is already stored.
    Duplicate(MemoryId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "memory not found: {id}"),
            Self::Duplicate(id) => write!(f, "memory already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memory data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Duplicate(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<MemoryValidationError> for RepoError {
    fn from(value: MemoryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Options for the grouped list query.
///
/// Grouping key and sort are fixed (category ascending, then insertion
/// order); only the category filter varies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedQuery {
    /// Restricts results to one category when set.
    pub kind: Option<String>,
}

impl GroupedQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
        }
    }
}

/// One group of a grouped result: the category label and its members in
/// query order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultGroup {
    pub label: String,
    pub members: Vec<MemoryId>,
}

impl ResultGroup {
    pub fn new(label: impl Into<String>, members: Vec<MemoryId>) -> Self {
        Self {
            label: label.into(),
            members,
        }
    }
}

/// Complete grouped result set, in group order.
pub type GroupedResults = Vec<ResultGroup>;

/// Repository interface for memory storage.
pub trait MemoryRepository {
    fn create_memory(&self, memory: &Memory) -> RepoResult<MemoryId>;
    fn get_memory(&self, id: MemoryId) -> RepoResult<Option<Memory>>;
    fn delete_memory(&self, id: MemoryId) -> RepoResult<()>;
    fn count_memories(&self) -> RepoResult<u64>;
    fn list_grouped(&self, query: &GroupedQuery) -> RepoResult<GroupedResults>;
}

/// SQLite-backed memory repository.
pub struct SqliteMemoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl MemoryRepository for SqliteMemoryRepository<'_> {
    fn create_memory(&self, memory: &Memory) -> RepoResult<MemoryId> {
        memory.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO memories (id, title, type, resource_url) VALUES (?1, ?2, ?3, ?4);",
            params![
                memory.id.to_string(),
                memory.title.as_str(),
                memory.kind.as_str(),
                memory.resource_url.as_str(),
            ],
        );

        match inserted {
            Ok(_) => Ok(memory.id),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
                    && err.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(RepoError::Duplicate(memory.id))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn get_memory(&self, id: MemoryId) -> RepoResult<Option<Memory>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMORY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_memory_row(row)?));
        }
        Ok(None)
    }

    fn delete_memory(&self, id: MemoryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM memories WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn count_memories(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM memories;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative memory count `{count}`")))
    }

    fn list_grouped(&self, query: &GroupedQuery) -> RepoResult<GroupedResults> {
        let mut sql = String::from("SELECT id, type FROM memories");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(kind) = &query.kind {
            sql.push_str(" WHERE type = ?");
            bind_values.push(Value::Text(kind.clone()));
        }
        sql.push_str(" ORDER BY type ASC, seq ASC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut groups: GroupedResults = Vec::new();

        while let Some(row) = rows.next()? {
            let id = parse_memory_id(&row.get::<_, String>("id")?)?;
            let kind: String = row.get("type")?;
            match groups.last_mut() {
                Some(group) if group.label == kind => group.members.push(id),
                _ => groups.push(ResultGroup::new(kind, vec![id])),
            }
        }

        Ok(groups)
    }
}

fn parse_memory_row(row: &Row<'_>) -> RepoResult<Memory> {
    let id = parse_memory_id(&row.get::<_, String>("id")?)?;

    let url_text: String = row.get("resource_url")?;
    let resource_url = Url::parse(&url_text).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid url `{url_text}` in memories.resource_url: {err}"
        ))
    })?;

    let memory = Memory {
        id,
        title: row.get("title")?,
        kind: row.get("type")?,
        resource_url,
    };
    memory.validate()?;
    Ok(memory)
}

fn parse_memory_id(value: &str) -> RepoResult<MemoryId> {
    MemoryId::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid id value `{value}` in memories.id")))
}
