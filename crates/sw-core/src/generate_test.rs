use super::*;
use crate::migration::{has_statements, parse_filename, split_body};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_generate_first_migration_creates_directory() {
    let dir = tempdir().unwrap();
    let migrations = dir.path().join("migrations");

    let generated = generate_migration(&migrations, "create users").unwrap();
    assert_eq!(generated.id.get(), 1);
    assert_eq!(generated.filename, "001_create_users.sql");
    assert!(generated.path.exists());
}

#[test]
fn test_generate_uses_highest_id_plus_one() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("001_init.sql"), "").unwrap();
    fs::write(dir.path().join("005_gap.sql"), "").unwrap();

    let generated = generate_migration(dir.path(), "next").unwrap();
    assert_eq!(generated.filename, "006_next.sql");
}

#[test]
fn test_generated_file_round_trips_through_grammar() {
    let dir = tempdir().unwrap();
    let generated = generate_migration(dir.path(), "add order index").unwrap();

    let parsed = parse_filename(&generated.filename).unwrap().unwrap();
    assert_eq!(parsed.id, generated.id);
    assert_eq!(parsed.description, "add order index");
}

#[test]
fn test_template_bodies_are_comment_only() {
    let dir = tempdir().unwrap();
    let generated = generate_migration(dir.path(), "noop").unwrap();

    let contents = fs::read_to_string(&generated.path).unwrap();
    assert!(contents.contains("-- //@UNDO"));

    let body = split_body(&contents);
    assert!(!has_statements(&body.up));
    assert!(!has_statements(&body.down));
}

#[test]
fn test_generate_rejects_bad_names() {
    let dir = tempdir().unwrap();
    for name in ["", "   ", "../escape", "a/b", "a\\b"] {
        let err = generate_migration(dir.path(), name).unwrap_err();
        assert!(
            matches!(err, CoreError::InvalidMigrationName { .. }),
            "expected InvalidMigrationName for {name:?}"
        );
    }
}

#[test]
fn test_generate_fails_on_duplicate_ids() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("001_a.sql"), "").unwrap();
    fs::write(dir.path().join("1_b.sql"), "").unwrap();

    assert!(generate_migration(dir.path(), "c").is_err());
}

#[test]
fn test_migration_filename_pads_id() {
    let id = MigrationId::new(12).unwrap();
    assert_eq!(migration_filename(id, " add users "), "012_add_users.sql");
}
