use super::*;
use crate::test_utils::{changelog_ids, table_exists, Project, RecordingDb, TABLE};
use sw_db::DatabaseChangelog;

async fn setup() -> (Project, RecordingDb) {
    let project = Project::new();
    let db = RecordingDb::new();
    db.inner().create_changelog(TABLE).await.unwrap();
    (project, db)
}

fn migration(project: &Project, filename: &str) -> Migration {
    Migration::from_filename(&project.migrations_dir(), filename)
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_apply_runs_body_and_records_row_in_one_transaction() {
    let (project, db) = setup().await;
    project.write(
        "001_create_users.sql",
        "CREATE TABLE users (id INT);\n@UNDO\nDROP TABLE users;\n",
    );

    let executor = Executor::new(&db, TABLE);
    let step = executor
        .apply(&migration(&project, "001_create_users.sql"))
        .await
        .unwrap();

    assert_eq!(step.direction, Direction::Up);
    assert_eq!(step.filename, "001_create_users.sql");
    assert_eq!(step.sql, "CREATE TABLE users (id INT);\n");
    assert!(table_exists(db.inner(), "users").await);
    assert_eq!(changelog_ids(db.inner()).await, vec![1]);
    assert_eq!(
        db.calls(),
        vec![
            "begin",
            "execute_batch CREATE TABLE users (id INT);",
            "insert_changelog_row 001",
            "commit",
        ]
    );
}

#[tokio::test]
async fn test_recorded_row_carries_filename_and_description() {
    let (project, db) = setup().await;
    project.write("004_add_index.sql", "CREATE TABLE idx (id INT);");

    Executor::new(&db, TABLE)
        .apply(&migration(&project, "004_add_index.sql"))
        .await
        .unwrap();

    let rows = db.inner().load_changelog(TABLE).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].filename, "004_add_index.sql");
    assert_eq!(rows[0].description, "add index");
}

#[tokio::test]
async fn test_failed_body_leaves_changelog_untouched() {
    let (project, db) = setup().await;
    project.write(
        "002_broken.sql",
        "CREATE TABLE partial (id INT);\nINSERT INTO missing_table VALUES (1);\n",
    );

    let failure = Executor::new(&db, TABLE)
        .apply(&migration(&project, "002_broken.sql"))
        .await
        .unwrap_err();

    assert_eq!(failure.id.get(), 2);
    assert!(changelog_ids(db.inner()).await.is_empty());
    assert!(!table_exists(db.inner(), "partial").await);
    assert_eq!(db.calls().last().map(String::as_str), Some("rollback"));

    let text = failure.to_string();
    assert!(text.starts_with("UP Migration failure 002_broken.sql\n"));
    assert!(text.contains("INSERT INTO missing_table VALUES (1);"));
    assert!(text.contains("missing_table"));
}

#[tokio::test]
async fn test_apply_then_revert_restores_changelog() {
    let (project, db) = setup().await;
    project.write(
        "001_create_users.sql",
        "CREATE TABLE users (id INT);\n@UNDO\nDROP TABLE users;\n",
    );
    let m = migration(&project, "001_create_users.sql");
    let executor = Executor::new(&db, TABLE);

    executor.apply(&m).await.unwrap();
    let step = executor.revert(&m).await.unwrap();

    assert_eq!(step.direction, Direction::Down);
    assert_eq!(step.sql, "\nDROP TABLE users;\n");
    assert!(changelog_ids(db.inner()).await.is_empty());
    assert!(!table_exists(db.inner(), "users").await);
}

#[tokio::test]
async fn test_empty_reverse_body_still_removes_row() {
    let (project, db) = setup().await;
    project.write("001_only_up.sql", "CREATE TABLE kept (id INT);");
    let m = migration(&project, "001_only_up.sql");
    let executor = Executor::new(&db, TABLE);

    executor.apply(&m).await.unwrap();
    db.clear();
    executor.revert(&m).await.unwrap();

    assert!(changelog_ids(db.inner()).await.is_empty());
    assert!(table_exists(db.inner(), "kept").await);
    assert_eq!(
        db.calls(),
        vec!["begin", "delete_changelog_row 001", "commit"]
    );
}

#[tokio::test]
async fn test_comment_only_body_is_recorded_without_execution() {
    let (project, db) = setup().await;
    project.write(
        "003_placeholder.sql",
        "-- Migration 003: placeholder\n\n-- //@UNDO\n-- nothing\n",
    );

    Executor::new(&db, TABLE)
        .apply(&migration(&project, "003_placeholder.sql"))
        .await
        .unwrap();

    assert_eq!(changelog_ids(db.inner()).await, vec![3]);
    assert!(!db.calls().iter().any(|c| c.starts_with("execute_batch")));
}

#[tokio::test]
async fn test_missing_file_fails_before_transaction() {
    let (project, db) = setup().await;
    let m = migration(&project, "005_gone.sql");

    let failure = Executor::new(&db, TABLE).revert(&m).await.unwrap_err();

    assert_eq!(failure.direction, Direction::Down);
    assert!(failure.sql.is_empty());
    assert!(failure
        .to_string()
        .starts_with("DOWN Migration failure 005_gone.sql\n"));
    assert!(db.calls().is_empty());
}

#[tokio::test]
async fn test_changelog_failure_rolls_back_body() {
    let (project, db) = setup().await;
    project.write("001_create_users.sql", "CREATE TABLE users (id INT);");
    let m = migration(&project, "001_create_users.sql");
    let executor = Executor::new(&db, TABLE);
    executor.apply(&m).await.unwrap();

    // Second apply hits the primary key after the body has run
    project.write("001_create_users.sql", "CREATE TABLE other (id INT);");
    let failure = executor.apply(&m).await.unwrap_err();

    assert!(failure.error.contains("001"));
    assert!(!table_exists(db.inner(), "other").await);
    assert_eq!(changelog_ids(db.inner()).await, vec![1]);
}

#[test]
fn test_success_message() {
    let step = StepSuccess {
        id: MigrationId::new(1).unwrap(),
        filename: "001_init.sql".to_string(),
        direction: Direction::Up,
        sql: "CREATE TABLE t (id INT);".to_string(),
    };

    assert_eq!(step.message(false), "up success 001_init.sql");
    assert_eq!(
        step.message(true),
        "up success 001_init.sql\n====================\nCREATE TABLE t (id INT);"
    );
}
