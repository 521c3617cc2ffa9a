use anyrow_core::{
    delete_by_key_statement, insert_statement, select_by_key_statement, update_by_key_statement,
    PlaceholderStyle, SqlBuildError,
};

const PERSON_COLUMNS: [&str; 3] = ["name", "email", "age"];

#[test]
fn insert_statement_matches_positional_shape() {
    let sql = insert_statement(PlaceholderStyle::Positional, "person", &PERSON_COLUMNS).unwrap();
    assert_eq!(sql, "INSERT INTO person (name, email, age) VALUES (?, ?, ?)");
}

#[test]
fn insert_statement_matches_numbered_shape() {
    let sql = insert_statement(PlaceholderStyle::Numbered, "person", &PERSON_COLUMNS).unwrap();
    assert_eq!(
        sql,
        "INSERT INTO person (name, email, age) VALUES ($1, $2, $3)"
    );
}

#[test]
fn select_statement_leads_with_primary_key() {
    let sql = select_by_key_statement(
        PlaceholderStyle::Positional,
        "person",
        "id",
        &PERSON_COLUMNS,
    )
    .unwrap();
    assert_eq!(sql, "SELECT id, name, email, age FROM person WHERE id = ?");
}

#[test]
fn update_statement_binds_key_last() {
    let positional = update_by_key_statement(
        PlaceholderStyle::Positional,
        "person",
        "id",
        &PERSON_COLUMNS,
    )
    .unwrap();
    assert_eq!(
        positional,
        "UPDATE person SET name = ?, email = ?, age = ? WHERE id = ?"
    );

    let numbered =
        update_by_key_statement(PlaceholderStyle::Numbered, "person", "id", &PERSON_COLUMNS)
            .unwrap();
    assert_eq!(
        numbered,
        "UPDATE person SET name = $1, email = $2, age = $3 WHERE id = $4"
    );
}

#[test]
fn delete_statement_matches_both_styles() {
    let positional =
        delete_by_key_statement(PlaceholderStyle::Positional, "person", "id").unwrap();
    assert_eq!(positional, "DELETE FROM person WHERE id = ?");

    let numbered = delete_by_key_statement(PlaceholderStyle::Numbered, "person", "id").unwrap();
    assert_eq!(numbered, "DELETE FROM person WHERE id = $1");
}

#[test]
fn builders_are_deterministic() {
    let first = insert_statement(PlaceholderStyle::Numbered, "person", &PERSON_COLUMNS).unwrap();
    let second = insert_statement(PlaceholderStyle::Numbered, "person", &PERSON_COLUMNS).unwrap();
    assert_eq!(first, second);
}

#[test]
fn placeholder_count_equals_column_count() {
    let columns = ["a", "b", "c", "d", "e"];
    let sql = insert_statement(PlaceholderStyle::Positional, "wide", &columns).unwrap();
    assert_eq!(sql.matches('?').count(), columns.len());

    let sql = update_by_key_statement(PlaceholderStyle::Positional, "wide", "id", &columns).unwrap();
    // Columns plus the key constraint.
    assert_eq!(sql.matches('?').count(), columns.len() + 1);
}

#[test]
fn empty_column_list_is_rejected() {
    let columns: [&str; 0] = [];
    let err = insert_statement(PlaceholderStyle::Positional, "person", &columns).unwrap_err();
    assert_eq!(
        err,
        SqlBuildError::EmptyColumnList {
            table: "person".to_string()
        }
    );
}

#[test]
fn malformed_identifiers_are_rejected() {
    let err = insert_statement(
        PlaceholderStyle::Positional,
        "person; DROP TABLE person",
        &PERSON_COLUMNS,
    )
    .unwrap_err();
    assert!(matches!(err, SqlBuildError::InvalidIdentifier(_)));

    let err = select_by_key_statement(
        PlaceholderStyle::Positional,
        "person",
        "id",
        &["name", "bad column"],
    )
    .unwrap_err();
    assert_eq!(
        err,
        SqlBuildError::InvalidIdentifier("bad column".to_string())
    );
}
