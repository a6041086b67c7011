#[allow(unused_imports)]
use std::time::Duration;

use litebind::prelude::*;
use tempfile::TempDir;

const CREATE_USERS: &str =
    "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT, age INTEGER, email TEXT)";

#[allow(dead_code)]
async fn setup_database() -> (TempDir, Connection) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let conn = Connection::open(dir.path(), "test.db")
        .await
        .expect("failed to init database");
    conn.execute_raw(CREATE_USERS, &[])
        .await
        .expect("failed to create users");
    (dir, conn)
}

#[allow(dead_code)]
async fn seed(conn: &Connection) {
    for (id, name, age) in [(1, "Alice", 30), (2, "Bob", 25), (3, "Carol", 18), (4, "Dave", 41)] {
        conn.insert("users", &kwargs!(id = id, name = name, age = age))
            .await
            .expect("failed to seed users");
    }
}

#[allow(dead_code)]
async fn count(conn: &Connection) -> usize {
    conn.select("users", &["*"], &[]).await.unwrap().len()
}

#[allow(dead_code)]
fn row(pairs: &[(&str, Value)]) -> Row {
    pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
}

#[allow(dead_code)]
fn names(rows: &[Row]) -> Vec<String> {
    rows.iter()
        .map(|r| r.get("name").and_then(Value::as_str).unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_select_all_after_insert() {
    let (_dir, conn) = setup_database().await;

    let r = conn
        .insert("users", &kwargs!(id = 1, name = "Alice", age = 30))
        .await;
    assert_eq!(r.unwrap(), 1);

    let rows = conn.select("users", &["*"], &[]).await.unwrap();
    assert_eq!(
        rows,
        vec![row(&[
            ("id", Value::Integer(1)),
            ("name", Value::Text("Alice".into())),
            ("age", Value::Integer(30)),
            ("email", Value::Null),
        ])]
    );
    assert_eq!(
        serde_json::to_value(&rows[0]).unwrap(),
        serde_json::json!({"id": 1, "name": "Alice", "age": 30, "email": null})
    );
}

#[tokio::test]
async fn test_insert_then_select_by_age() {
    let (_dir, conn) = setup_database().await;

    conn.insert("users", &kwargs!(id = 2, name = "Bob", age = 25))
        .await
        .unwrap();
    assert_eq!(conn.last_insert_rowid(), 2);

    let rows = conn
        .select("users", &["name"], &[cond!(age == 25).unwrap()])
        .await
        .unwrap();
    assert_eq!(rows, vec![row(&[("name", Value::Text("Bob".into()))])]);
}

#[tokio::test]
async fn test_delete_without_conditions_is_rejected() {
    let (_dir, conn) = setup_database().await;
    seed(&conn).await;

    let before = count(&conn).await;
    let err = conn.delete("users", &[]).await.unwrap_err();
    assert!(err.is_missing_condition(), "{err}");
    assert_eq!(count(&conn).await, before);
}

#[tokio::test]
async fn test_update_without_conditions_is_rejected() {
    let (_dir, conn) = setup_database().await;
    seed(&conn).await;

    let err = conn
        .update("users", &kwargs!(age = 99), &[])
        .await
        .unwrap_err();
    assert!(err.is_missing_condition(), "{err}");

    let untouched = conn
        .select("users", &["id"], &[cond!(age == 99).unwrap()])
        .await
        .unwrap();
    assert!(untouched.is_empty());
}

#[tokio::test]
async fn test_update_matching_rows() {
    let (_dir, conn) = setup_database().await;
    seed(&conn).await;

    let affected = conn
        .update(
            "users",
            &kwargs!(age = 26, email = "bob@example.com"),
            &[cond!(name == "Bob").unwrap(), cond!(age == 25).unwrap()],
        )
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let rows = conn
        .select("users", &["age", "email"], &[Condition::eq("id", 2).unwrap()])
        .await
        .unwrap();
    assert_eq!(rows[0].get("age"), Some(&Value::Integer(26)));
    assert_eq!(
        rows[0].get("email"),
        Some(&Value::Text("bob@example.com".into()))
    );
}

#[tokio::test]
async fn test_update_where_references_assigned_column() {
    let (_dir, conn) = setup_database().await;
    seed(&conn).await;

    let affected = conn
        .update("users", &kwargs!(age = 31), &[cond!(age == 30).unwrap()])
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let rows = conn
        .select("users", &["name"], &[cond!(age == 31).unwrap()])
        .await
        .unwrap();
    assert_eq!(names(&rows), vec!["Alice"]);
}

#[tokio::test]
async fn test_delete_with_in() {
    let (_dir, conn) = setup_database().await;
    seed(&conn).await;

    let affected = conn
        .delete("users", &[Condition::in_list("name", ["Bob", "Dave", "Nobody"]).unwrap()])
        .await
        .unwrap();
    assert_eq!(affected, 2);
    assert_eq!(count(&conn).await, 2);
}

#[tokio::test]
async fn test_between_and_in_on_same_column() {
    let (_dir, conn) = setup_database().await;
    seed(&conn).await;

    let rows = conn
        .select(
            "users",
            &["name"],
            &[
                Condition::between("age", 18, 30).unwrap(),
                Condition::in_list("age", [18, 21, 30]).unwrap(),
            ],
        )
        .await
        .unwrap();
    let mut found = names(&rows);
    found.sort();
    assert_eq!(found, vec!["Alice", "Carol"]);

    let rows = conn
        .select(
            "users",
            &["name"],
            &[
                Condition::not_between("age", 18, 30).unwrap(),
                Condition::not_in("name", ["Alice"]).unwrap(),
            ],
        )
        .await
        .unwrap();
    assert_eq!(names(&rows), vec!["Dave"]);
}

#[tokio::test]
async fn test_comparisons_and_patterns() {
    let (_dir, conn) = setup_database().await;
    seed(&conn).await;

    let select = |conditions: Vec<Condition>| {
        let conn = &conn;
        async move {
            let mut found = names(&conn.select("users", &["name"], &conditions).await.unwrap());
            found.sort();
            found
        }
    };

    assert_eq!(select(vec![cond!(age > 30).unwrap()]).await, vec!["Dave"]);
    assert_eq!(select(vec![cond!(age >= 30).unwrap()]).await, vec!["Alice", "Dave"]);
    assert_eq!(select(vec![cond!(age < 25).unwrap()]).await, vec!["Carol"]);
    assert_eq!(select(vec![cond!(age <= 25).unwrap()]).await, vec!["Bob", "Carol"]);
    assert_eq!(
        select(vec![cond!(name != "Alice").unwrap()]).await,
        vec!["Bob", "Carol", "Dave"]
    );
    // LIKE is case-insensitive for ASCII in SQLite
    assert_eq!(
        select(vec![Condition::like("name", "%a%").unwrap()]).await,
        vec!["Alice", "Carol", "Dave"]
    );
    assert_eq!(
        select(vec![Condition::not_like("name", "%o%").unwrap()]).await,
        vec!["Alice", "Dave"]
    );
}

#[tokio::test]
async fn test_null_checks() {
    let (_dir, conn) = setup_database().await;
    seed(&conn).await;
    conn.update(
        "users",
        &kwargs!(email = "carol@example.com"),
        &[cond!(name == "Carol").unwrap()],
    )
    .await
    .unwrap();

    let rows = conn
        .select("users", &["name"], &[Condition::is_not_null("email")])
        .await
        .unwrap();
    assert_eq!(names(&rows), vec!["Carol"]);

    let rows = conn
        .select("users", &["name"], &[Condition::is_null("email")])
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn test_null_and_boolean_values_bind() {
    let (_dir, conn) = setup_database().await;

    conn.insert("users", &kwargs!(id = 9, name = Option::<&str>::None, age = true))
        .await
        .unwrap();
    let rows = conn
        .select("users", &["*"], &[cond!(age == 1).unwrap(), Condition::is_null("name")])
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("id"), Some(&Value::Integer(9)));
}

#[tokio::test]
async fn test_schema_errors() {
    let (_dir, conn) = setup_database().await;
    seed(&conn).await;

    let err = conn.select("ghosts", &["*"], &[]).await.unwrap_err();
    assert!(err.is_schema(), "{err}");
    assert_eq!(err.to_string(), "table does not exist: ghosts");

    let err = conn.select("users", &["id", "shoe_size"], &[]).await.unwrap_err();
    assert!(err.is_schema(), "{err}");
    assert_eq!(err.to_string(), "column does not exist: shoe_size");

    let err = conn
        .insert("users", &kwargs!(id = 10, shoe_size = 44))
        .await
        .unwrap_err();
    assert!(err.is_schema(), "{err}");

    let err = conn
        .update("users", &kwargs!(shoe_size = 44), &[cond!(id == 1).unwrap()])
        .await
        .unwrap_err();
    assert!(err.is_schema(), "{err}");

    let err = conn
        .delete("ghosts", &[cond!(id == 1).unwrap()])
        .await
        .unwrap_err();
    assert!(err.is_schema(), "{err}");

    assert_eq!(count(&conn).await, 4);
}

#[tokio::test]
async fn test_select_table_qualified_columns() -> anyhow::Result<()> {
    let (_dir, conn) = setup_database().await;
    seed(&conn).await;

    let rows = conn
        .select("users", &["users.name"], &[cond!(users.age == 25)?])
        .await?;
    assert_eq!(names(&rows), vec!["Bob"]);

    conn.check_table_and_columns("users", &["USERS.age", "id"]).await?;
    let err = conn.select("users", &["orders.name"], &[]).await.unwrap_err();
    assert!(err.is_schema(), "{err}");
    Ok(())
}

#[tokio::test]
async fn test_introspection() {
    let (_dir, conn) = setup_database().await;

    assert!(conn.table_exists("users").await.unwrap());
    assert!(!conn.table_exists("ghosts").await.unwrap());
    assert_eq!(
        conn.columns("users").await.unwrap(),
        vec!["id", "name", "age", "email"]
    );
    conn.check_table_and_columns("users", &["name", "age"])
        .await
        .unwrap();
    conn.check_table_and_columns("users", &[]).await.unwrap();
}

#[tokio::test]
async fn test_execute_raw() {
    let (_dir, conn) = setup_database().await;
    seed(&conn).await;

    let mut result = conn
        .execute_raw(
            "SELECT name FROM users WHERE age > :min_age ORDER BY age",
            &[ParamBinding::new(":min_age", 20).unwrap()],
        )
        .await
        .unwrap();
    assert_eq!(result.columns(), ["name".to_string()]);
    let first = result.next_row().unwrap();
    assert_eq!(first.get("name"), Some(&Value::Text("Bob".into())));
    assert_eq!(result.next_row().unwrap().get("name"), Some(&Value::Text("Alice".into())));
    assert_eq!(result.next_row().unwrap().get("name"), Some(&Value::Text("Dave".into())));
    assert!(result.next_row().is_none());

    let result = conn
        .execute_raw(
            "UPDATE users SET age = age + 1 WHERE age >= :min_age",
            &[ParamBinding::new(":min_age", 30).unwrap()],
        )
        .await
        .unwrap();
    assert_eq!(result.rows_affected(), 2);

    let result = conn.execute_raw("SELECT * FROM users", &[]).await.unwrap();
    assert_eq!(result.rows_affected(), 0);
}

#[tokio::test]
async fn test_result_set_keeps_rowid_of_its_statement() -> anyhow::Result<()> {
    let (_dir, conn) = setup_database().await;

    let first = conn
        .execute_raw(
            "INSERT INTO users (id, name) VALUES (:id, :name)",
            &[ParamBinding::new(":id", 7)?, ParamBinding::new(":name", "Eve")?],
        )
        .await?;
    assert_eq!(first.rows_affected(), 1);
    assert_eq!(first.last_insert_rowid(), 7);

    conn.insert("users", &kwargs!(id = 8, name = "Finn")).await?;
    assert_eq!(conn.last_insert_rowid(), 8);
    assert_eq!(first.last_insert_rowid(), 7);
    Ok(())
}

#[tokio::test]
async fn test_execute_raw_failures() {
    let (_dir, conn) = setup_database().await;

    let err = conn.execute_raw("SELEC nothing", &[]).await.unwrap_err();
    assert!(matches!(err, Error::Statement { context, .. } if context == "failed to prepare statement"), "{err}");

    let err = conn
        .execute_raw(
            "SELECT * FROM users WHERE id = :id",
            &[ParamBinding::new(":other", 1).unwrap()],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Statement { context, .. } if context == "failed to bind value"), "{err}");

    let err = conn
        .execute_raw("SELECT * FROM users WHERE id = :id", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Statement { .. }), "{err}");

    conn.execute_raw(
        "INSERT INTO users (id, name) VALUES (:id, :name)",
        &[
            ParamBinding::new(":id", 1).unwrap(),
            ParamBinding::new(":name", "Alice").unwrap(),
        ],
    )
    .await
    .unwrap();
    let err = conn
        .insert("users", &kwargs!(id = 1, name = "Again"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Statement { context, .. } if context == "failed to execute statement"), "{err}");
}

#[tokio::test]
async fn test_open_failures() {
    let err = Connection::open("", "test.db").await.err().unwrap();
    assert!(matches!(err, Error::Config(_)), "{err}");

    let dir = tempfile::tempdir().unwrap();
    let err = Connection::open(dir.path(), "").await.err().unwrap();
    assert!(matches!(err, Error::Config(_)), "{err}");

    let missing = dir.path().join("does").join("not").join("exist");
    let err = Connection::open(&missing, "test.db").await.err().unwrap();
    assert!(matches!(err, Error::Connection(_)), "{err}");
}

#[tokio::test]
async fn test_busy_timeout_bounds_lock_wait() {
    let (dir, writer) = setup_database().await;
    let config = Config::new(dir.path(), "test.db").with_busy_timeout(Duration::from_millis(100));
    let contender = Connection::open_with(&config).await.unwrap();

    writer.execute_raw("BEGIN IMMEDIATE", &[]).await.unwrap();
    let err = contender
        .insert("users", &kwargs!(id = 1, name = "Blocked"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Statement { .. }), "{err}");
    writer.execute_raw("ROLLBACK", &[]).await.unwrap();

    contender
        .insert("users", &kwargs!(id = 1, name = "Unblocked"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_data_persists_across_connections() {
    let (dir, conn) = setup_database().await;
    seed(&conn).await;
    drop(conn);

    let reopened = Connection::open(dir.path(), "test.db").await.unwrap();
    assert_eq!(count(&reopened).await, 4);
}
