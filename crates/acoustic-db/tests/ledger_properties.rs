use acoustic_common::Error;
use acoustic_db::migrations::checksum;
use acoustic_db::{BASELINE, MigrationLedger, Version};
use rusqlite::Connection;
use tempfile::TempDir;

/// Fresh ledger over a scratch directory holding a single table `t`.
fn ledger_with_table() -> (TempDir, MigrationLedger) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let ledger = MigrationLedger::open(dir.path().join("ledger.db"), dir.path().join("migrations"))
        .expect("open ledger");
    Connection::open(ledger.db_path())
        .unwrap()
        .execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY);")
        .unwrap();
    (dir, ledger)
}

fn column_exists(ledger: &MigrationLedger, table: &str, column: &str) -> bool {
    let conn = Connection::open(ledger.db_path()).unwrap();
    conn.query_row(
        "SELECT count(*) FROM pragma_table_info(?1) WHERE name = ?2",
        [table, column],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}

fn applied_versions(ledger: &MigrationLedger) -> Vec<Version> {
    ledger
        .applied()
        .unwrap()
        .into_iter()
        .map(|e| e.version)
        .collect()
}

fn create_abc(ledger: &MigrationLedger) {
    for name in ["a", "b", "c"] {
        ledger
            .create_migration(
                name,
                &format!("CREATE TABLE tbl_{name} (id INTEGER);"),
                &format!("DROP TABLE tbl_{name};"),
            )
            .unwrap();
    }
}

#[test]
fn add_column_end_to_end() {
    let (_dir, ledger) = ledger_with_table();

    let created = ledger
        .create_migration(
            "add_col",
            "ALTER TABLE t ADD COLUMN x",
            "ALTER TABLE t DROP COLUMN x",
        )
        .unwrap();
    assert!(created.filename.contains("add_col"));

    let migration = ledger.pending().unwrap().remove(0);
    ledger.apply(&migration).unwrap();

    assert!(column_exists(&ledger, "t", "x"));
    let applied = ledger.applied().unwrap();
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].name, "add_col");
    assert_eq!(applied[0].version, created.version);

    ledger.rollback_migration(&migration).unwrap();
    assert!(!column_exists(&ledger, "t", "x"));
    assert!(ledger.applied().unwrap().is_empty());
}

#[test]
fn applied_migration_leaves_pending_and_cannot_be_reapplied() {
    let (_dir, ledger) = ledger_with_table();
    ledger
        .create_migration("add_col", "ALTER TABLE t ADD COLUMN x", "ALTER TABLE t DROP COLUMN x")
        .unwrap();
    let migration = ledger.pending().unwrap().remove(0);

    ledger.apply(&migration).unwrap();
    assert!(ledger.pending().unwrap().is_empty());

    let err = ledger.apply(&migration).unwrap_err();
    assert!(matches!(err, Error::AlreadyApplied(_)));
    assert!(ledger.pending().unwrap().is_empty());
    assert_eq!(ledger.applied().unwrap().len(), 1);
}

#[test]
fn rollback_then_migrate_restores_applied_order() {
    let (_dir, ledger) = ledger_with_table();
    create_abc(&ledger);
    ledger.migrate().unwrap();
    let before = applied_versions(&ledger);
    assert_eq!(before.len(), 3);

    let rolled_back = ledger.rollback(2).unwrap();
    assert_eq!(rolled_back, vec![before[2].clone(), before[1].clone()]);
    assert_eq!(applied_versions(&ledger), before[..1].to_vec());

    ledger.migrate().unwrap();
    assert_eq!(applied_versions(&ledger), before);
}

#[test]
fn refresh_matches_sequential_application_from_empty() {
    let (dir, ledger) = ledger_with_table();
    create_abc(&ledger);

    // Sequential application on a second database sharing the same migrations.
    let sequential =
        MigrationLedger::open(dir.path().join("sequential.db"), ledger.migrations_dir()).unwrap();
    for migration in sequential.all_migrations().unwrap() {
        sequential.apply(&migration).unwrap();
    }

    // Partially applied state with extra non-migration data, then refresh.
    ledger.apply(&ledger.pending().unwrap()[1]).unwrap();
    let refreshed = ledger.refresh().unwrap();

    let expected = applied_versions(&sequential);
    assert_eq!(refreshed, expected);
    assert_eq!(applied_versions(&ledger), expected);

    let names: Vec<_> = ledger.applied().unwrap().into_iter().map(|e| e.name).collect();
    assert_eq!(names, ["a", "b", "c"]);

    // The table created outside of migrations is gone after the rebuild.
    let conn = Connection::open(ledger.db_path()).unwrap();
    let has_t: bool = conn
        .query_row(
            "SELECT count(*) > 0 FROM sqlite_master WHERE type='table' AND name='t'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert!(!has_t);
}

#[test]
fn failing_up_script_keeps_migration_pending() {
    let (_dir, ledger) = ledger_with_table();
    ledger
        .create_migration("good", "ALTER TABLE t ADD COLUMN y", "ALTER TABLE t DROP COLUMN y")
        .unwrap();
    ledger.migrate().unwrap();
    let applied_before = ledger.applied().unwrap();

    let broken = ledger
        .create_migration(
            "broken",
            "ALTER TABLE t ADD COLUMN z; ALTER TABLE nope ADD COLUMN q;",
            "",
        )
        .unwrap();

    let err = ledger.migrate().unwrap_err();
    assert_eq!(err.migration_version(), Some(broken.version.as_str()));
    assert!(err.to_string().contains("broken"));

    assert_eq!(ledger.applied().unwrap(), applied_before);
    let pending = ledger.pending().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].version, broken.version);
    assert!(!column_exists(&ledger, "t", "z"));
}

#[test]
fn checksums_are_deterministic_across_creations() {
    let (_dir, ledger) = ledger_with_table();
    let up = "ALTER TABLE t ADD COLUMN x";
    let down = "ALTER TABLE t DROP COLUMN x";
    ledger.create_migration("first", up, down).unwrap();
    ledger.create_migration("second", up, down).unwrap();

    let all = ledger.all_migrations().unwrap();
    assert_eq!(all.len(), 2);
    assert_ne!(all[0].version, all[1].version);
    assert_eq!(all[0].checksum, all[1].checksum);
    assert_eq!(all[0].checksum, checksum(up, down));
}

#[test]
fn ledger_survives_reopen() {
    let (dir, ledger) = ledger_with_table();
    create_abc(&ledger);
    ledger.migrate().unwrap();
    let before = applied_versions(&ledger);
    drop(ledger);

    let reopened =
        MigrationLedger::open(dir.path().join("ledger.db"), dir.path().join("migrations")).unwrap();
    assert_eq!(applied_versions(&reopened), before);
    assert!(reopened.pending().unwrap().is_empty());
}

#[test]
fn table_rebuild_rollback_keeps_child_rows() {
    let dir = tempfile::tempdir().unwrap();
    let ledger = MigrationLedger::open(dir.path().join("projects.db"), dir.path().join("migrations"))
        .unwrap();
    let schema = BASELINE[0];
    ledger.create_migration(schema.name, schema.up, schema.down).unwrap();
    ledger.migrate().unwrap();

    let conn = Connection::open(ledger.db_path()).unwrap();
    conn.execute_batch(
        "PRAGMA foreign_keys=ON;
         INSERT INTO projects (project_id, project_name, client_name, start_date, end_date, status)
         VALUES (1, 'Concert Hall Renovation', 'City Arts Council', '2024-01-01', '2024-09-01', 'Planning');
         INSERT INTO milestones (project_id, milestone_name, milestone_type, planned_date, status)
         VALUES (1, 'Design Review', 'Review', '2024-03-01', 'Pending');",
    )
    .unwrap();
    drop(conn);

    ledger
        .create_migration(
            "add_priority_to_projects",
            "ALTER TABLE projects ADD COLUMN priority TEXT DEFAULT 'medium';",
            "CREATE TABLE projects_backup AS SELECT project_id, project_name, client_name,
                 start_date, end_date, status, percent_complete, created_at FROM projects;
             DROP TABLE projects;
             ALTER TABLE projects_backup RENAME TO projects;",
        )
        .unwrap();
    ledger.migrate().unwrap();
    assert!(column_exists(&ledger, "projects", "priority"));

    let rolled_back = ledger.rollback(1).unwrap();
    assert_eq!(rolled_back.len(), 1);
    assert!(!column_exists(&ledger, "projects", "priority"));
    assert_eq!(ledger.applied().unwrap().len(), 1);

    let conn = Connection::open(ledger.db_path()).unwrap();
    let (projects, milestones): (i64, i64) = conn
        .query_row(
            "SELECT (SELECT count(*) FROM projects), (SELECT count(*) FROM milestones)",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!((projects, milestones), (1, 1));
}
