//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable that drives one full CRUD cycle through
//!   `anyrow_core` against an in-memory database.
//! - Keep output deterministic for quick local sanity checks.

use anyrow_core::{
    open_db_in_memory, PlaceholderStyle, Repository, RowNode, SqlRepository, SqliteBackend,
    TableBinding,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("anyrow_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("anyrow_core version={}", anyrow_core::core_version());

    let conn = open_db_in_memory()?;
    conn.execute_batch(
        "CREATE TABLE person (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT,
            age INTEGER
        );",
    )?;

    let backend = SqliteBackend::new(&conn);
    let binding = TableBinding::new(
        "person",
        "id",
        vec!["name".to_string(), "email".to_string(), "age".to_string()],
        PlaceholderStyle::Positional,
    )?;
    let repo = SqlRepository::new(&backend, binding);

    let mut person = RowNode::record("person");
    person.add_child("name", "Alice")?;
    person.add_child("email", "alice@example.com")?;
    person.add_child("age", 30i64)?;

    let id = repo.insert(person)?;
    println!("insert id={id}");

    let loaded = repo
        .find_by_id(&id)?
        .ok_or("inserted person should be readable")?;
    let name: String = loaded
        .child("name")
        .ok_or("name column should be present")?
        .get()?;
    println!("find name={name}");

    let mut renamed = RowNode::record("person");
    renamed.add_child("name", "Alice B.")?;
    renamed.add_child("email", "alice@example.com")?;
    renamed.add_child("age", 31i64)?;
    repo.update(&id, renamed)?;

    let reloaded = repo
        .find_by_id(&id)?
        .ok_or("updated person should be readable")?;
    let age: i64 = reloaded
        .child("age")
        .ok_or("age column should be present")?
        .get()?;
    println!("update age={age}");

    repo.remove(&id)?;
    println!("remove found={}", repo.find_by_id(&id)?.is_some());

    Ok(())
}
