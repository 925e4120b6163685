use memlist_core::db::open_db_in_memory;
use memlist_core::{
    FlagRepository, GroupedQuery, Memory, MemoryId, MemoryRepository, MemoryValidationError,
    RepoError, ResultGroup, SqliteFlagRepository, SqliteMemoryRepository,
};
use url::Url;

fn memory(title: &str, kind: &str) -> Memory {
    Memory::new(title, kind, Url::parse("https://youtu.be/ANBGkZwOX68").unwrap())
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::new(&conn);

    let record = memory("part 1", "First half");
    let id = repo.create_memory(&record).unwrap();

    let loaded = repo.get_memory(id).unwrap().unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn get_unknown_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::new(&conn);
    assert!(repo.get_memory(MemoryId::new_v4()).unwrap().is_none());
}

#[test]
fn create_rejects_invalid_records() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::new(&conn);

    let blank_title = memory("  ", "First half");
    assert!(matches!(
        repo.create_memory(&blank_title).unwrap_err(),
        RepoError::Validation(MemoryValidationError::EmptyTitle)
    ));

    let ftp = Memory::new(
        "archive",
        "First half",
        Url::parse("ftp://example.com/file").unwrap(),
    );
    assert!(matches!(
        repo.create_memory(&ftp).unwrap_err(),
        RepoError::Validation(MemoryValidationError::UnsupportedUrlScheme(scheme)) if scheme == "ftp"
    ));
    assert_eq!(repo.count_memories().unwrap(), 0);
}

#[test]
fn duplicate_id_is_reported() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::new(&conn);

    let record = memory("part 1", "First half");
    repo.create_memory(&record).unwrap();
    let err = repo.create_memory(&record).unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(id) if id == record.id));
}

#[test]
fn delete_removes_row_and_reports_missing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::new(&conn);

    let record = memory("part 1", "First half");
    repo.create_memory(&record).unwrap();
    repo.delete_memory(record.id).unwrap();

    assert_eq!(repo.count_memories().unwrap(), 0);
    assert!(matches!(
        repo.delete_memory(record.id).unwrap_err(),
        RepoError::NotFound(id) if id == record.id
    ));
}

#[test]
fn list_grouped_sorts_by_type_then_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::new(&conn);

    let b1 = memory("b1", "beta");
    let a1 = memory("a1", "alpha");
    let b2 = memory("b2", "beta");
    let a2 = memory("a2", "alpha");
    for record in [&b1, &a1, &b2, &a2] {
        repo.create_memory(record).unwrap();
    }

    let groups = repo.list_grouped(&GroupedQuery::all()).unwrap();
    assert_eq!(
        groups,
        vec![
            ResultGroup::new("alpha", vec![a1.id, a2.id]),
            ResultGroup::new("beta", vec![b1.id, b2.id]),
        ]
    );
}

#[test]
fn list_grouped_filters_by_kind() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemoryRepository::new(&conn);

    let a = memory("a", "alpha");
    let b = memory("b", "beta");
    repo.create_memory(&a).unwrap();
    repo.create_memory(&b).unwrap();

    let groups = repo.list_grouped(&GroupedQuery::only_kind("beta")).unwrap();
    assert_eq!(groups, vec![ResultGroup::new("beta", vec![b.id])]);

    let none = repo.list_grouped(&GroupedQuery::only_kind("gamma")).unwrap();
    assert!(none.is_empty());
}

#[test]
fn corrupted_url_is_rejected_on_read() {
    let conn = open_db_in_memory().unwrap();
    let id = MemoryId::new_v4();
    conn.execute(
        "INSERT INTO memories (id, title, type, resource_url) VALUES (?1, 't', 'k', 'not a url');",
        [id.to_string()],
    )
    .unwrap();

    let repo = SqliteMemoryRepository::new(&conn);
    assert!(matches!(
        repo.get_memory(id).unwrap_err(),
        RepoError::InvalidData(_)
    ));
}

#[test]
fn flags_default_to_false_and_upsert() {
    let conn = open_db_in_memory().unwrap();
    let flags = SqliteFlagRepository::new(&conn);

    assert!(!flags.get_flag("memories_seeded").unwrap());
    flags.set_flag("memories_seeded", true).unwrap();
    assert!(flags.get_flag("memories_seeded").unwrap());
    flags.set_flag("memories_seeded", false).unwrap();
    assert!(!flags.get_flag("memories_seeded").unwrap());
}

#[test]
fn memory_serializes_kind_as_type() {
    let record = memory("part 1", "First half");
    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["type"], "First half");
    assert_eq!(json["resource_url"], "https://youtu.be/ANBGkZwOX68");
    assert_eq!(json["id"], record.id.to_string());
}
