use anyrow_core::{
    open_db_in_memory, PlaceholderStyle, RepoError, Repository, RowNode, RowValue, SqlRepository,
    SqliteBackend, TableBinding,
};
use rusqlite::Connection;

fn person_db() -> Connection {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE person (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT UNIQUE,
            age INTEGER
        );",
    )
    .unwrap();
    conn
}

fn person_binding() -> TableBinding {
    TableBinding::new(
        "person",
        "id",
        vec!["name".to_string(), "email".to_string(), "age".to_string()],
        PlaceholderStyle::Positional,
    )
    .unwrap()
}

fn alice() -> RowNode {
    let mut row = RowNode::record("person");
    row.add_child("name", "Alice").unwrap();
    row.add_child("email", "alice@example.com").unwrap();
    row.add_child("age", 30i64).unwrap();
    row
}

#[test]
fn insert_returns_positive_id_and_find_reproduces_fields() {
    let conn = person_db();
    let backend = SqliteBackend::new(&conn);
    let repo = SqlRepository::new(&backend, person_binding());

    let id = repo.insert(alice()).unwrap();
    assert!(id > 0);

    let loaded = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(loaded.child("id").unwrap().get::<i64>().unwrap(), id);
    assert_eq!(
        loaded.child("name").unwrap().get::<String>().unwrap(),
        "Alice"
    );
    assert_eq!(
        loaded.child("email").unwrap().get::<String>().unwrap(),
        "alice@example.com"
    );
    assert_eq!(loaded.child("age").unwrap().get::<i64>().unwrap(), 30);
}

#[test]
fn missing_column_in_record_binds_null() {
    let conn = person_db();
    let backend = SqliteBackend::new(&conn);
    let repo = SqlRepository::new(&backend, person_binding());

    let mut partial = RowNode::record("person");
    partial.add_child("name", "Bob").unwrap();
    let id = repo.insert(partial).unwrap();

    let loaded = repo.find_by_id(&id).unwrap().unwrap();
    assert!(loaded.child("email").unwrap().value().is_null());
    assert!(loaded.child("age").unwrap().value().is_null());
}

#[test]
fn update_overwrites_all_columns() {
    let conn = person_db();
    let backend = SqliteBackend::new(&conn);
    let repo = SqlRepository::new(&backend, person_binding());

    let id = repo.insert(alice()).unwrap();

    let mut replacement = RowNode::record("person");
    replacement.add_child("name", "Alice B.").unwrap();
    replacement.add_child("email", "aliceb@example.com").unwrap();
    replacement.add_child("age", 31i64).unwrap();
    repo.update(&id, replacement).unwrap();

    let loaded = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(
        loaded.child("name").unwrap().get::<String>().unwrap(),
        "Alice B."
    );
    assert_eq!(
        loaded.child("email").unwrap().get::<String>().unwrap(),
        "aliceb@example.com"
    );
    assert_eq!(loaded.child("age").unwrap().get::<i64>().unwrap(), 31);
}

#[test]
fn update_of_missing_id_is_not_an_error() {
    let conn = person_db();
    let backend = SqliteBackend::new(&conn);
    let repo = SqlRepository::new(&backend, person_binding());

    repo.update(&9999, alice()).unwrap();
    assert!(repo.find_by_id(&9999).unwrap().is_none());
}

#[test]
fn remove_is_idempotent() {
    let conn = person_db();
    let backend = SqliteBackend::new(&conn);
    let repo = SqlRepository::new(&backend, person_binding());

    let id = repo.insert(alice()).unwrap();
    repo.remove(&id).unwrap();
    repo.remove(&id).unwrap();

    assert!(repo.find_by_id(&id).unwrap().is_none());
}

#[test]
fn find_on_missing_id_returns_none_not_error() {
    let conn = person_db();
    let backend = SqliteBackend::new(&conn);
    let repo = SqlRepository::new(&backend, person_binding());

    assert!(repo.find_by_id(&42).unwrap().is_none());
}

#[test]
fn unique_violation_surfaces_as_write_rejected_with_sql_context() {
    let conn = person_db();
    let backend = SqliteBackend::new(&conn);
    let repo = SqlRepository::new(&backend, person_binding());

    repo.insert(alice()).unwrap();
    let err = repo.insert(alice()).unwrap_err();

    match err {
        RepoError::WriteRejected { sql, .. } => {
            assert!(sql.starts_with("INSERT INTO person"));
        }
        other => panic!("expected WriteRejected, got {other:?}"),
    }
}

#[test]
fn not_null_violation_surfaces_as_write_rejected() {
    let conn = person_db();
    let backend = SqliteBackend::new(&conn);
    let repo = SqlRepository::new(&backend, person_binding());

    // `name` is NOT NULL and absent from the record, so it binds NULL.
    let mut nameless = RowNode::record("person");
    nameless.add_child("email", "nobody@example.com").unwrap();

    let err = repo.insert(nameless).unwrap_err();
    assert!(matches!(err, RepoError::WriteRejected { .. }));
}

#[test]
fn bool_values_round_trip_as_integers_on_sqlite() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE flag (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            enabled INTEGER
        );",
    )
    .unwrap();

    let backend = SqliteBackend::new(&conn);
    let binding = TableBinding::new(
        "flag",
        "id",
        vec!["enabled".to_string()],
        PlaceholderStyle::Positional,
    )
    .unwrap();
    let repo = SqlRepository::new(&backend, binding);

    let mut row = RowNode::record("flag");
    row.add_child("enabled", true).unwrap();
    let id = repo.insert(row).unwrap();

    // SQLite has no boolean storage class, so the value reads back as 0/1.
    let loaded = repo.find_by_id(&id).unwrap().unwrap();
    assert_eq!(loaded.child("enabled").unwrap().value(), &RowValue::Int(1));
}

#[test]
fn repeated_calls_reuse_one_repository_instance() {
    let conn = person_db();
    let backend = SqliteBackend::new(&conn);
    let repo = SqlRepository::new(&backend, person_binding());

    let first = repo.insert(alice()).unwrap();

    // UNIQUE email column: the second row needs its own address.
    let mut carol = RowNode::record("person");
    carol.add_child("name", "Carol").unwrap();
    carol.add_child("email", "carol@example.com").unwrap();
    carol.add_child("age", 28i64).unwrap();
    let second = repo.insert(carol).unwrap();

    assert!(second > first);
    assert!(repo.find_by_id(&first).unwrap().is_some());
    assert!(repo.find_by_id(&second).unwrap().is_some());
}
