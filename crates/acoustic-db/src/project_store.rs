use std::path::Path;

use acoustic_common::{Error, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use tracing::info;

use crate::records::{
    AcousticMaterial, AstmTest, Budget, DATE_FORMAT, Deliverable, Email, EquipmentItem,
    EquipmentSpace, MaterialRow, Milestone, NewProject, ProjectRecord, RoomVolumeRow,
    TIMESTAMP_FORMAT,
};
use crate::schema::{PROJECT_SCHEMA, PROJECT_TABLES};

/// Read/write access to the project-management tables of a migrated database.
#[derive(Debug)]
pub struct ProjectStore {
    conn: Connection,
}

impl ProjectStore {
    /// Open a database whose schema has already been migrated.
    pub fn open(db_path: &Path) -> Result<Self> {
        info!("opening project store at {}", db_path.display());
        if !db_path.is_file() {
            return Err(Error::NotFound(format!(
                "database {} does not exist; run `acoustic init` first",
                db_path.display()
            )));
        }

        let conn = Connection::open(db_path)
            .map_err(|e| Error::Database(format!("failed to open database: {e}")))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| Error::Database(format!("failed to set pragmas: {e}")))?;

        let has_projects: bool = conn
            .query_row(
                "SELECT count(*) > 0 FROM sqlite_master WHERE type='table' AND name='projects'",
                [],
                |row| row.get(0),
            )
            .map_err(|e| Error::Database(format!("failed to inspect schema: {e}")))?;
        if !has_projects {
            return Err(Error::Database(
                "project tables are missing; apply the schema migrations first".into(),
            ));
        }

        Ok(Self { conn })
    }

    /// Scratch database with the project schema installed directly.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Database(format!("failed to open in-memory database: {e}")))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| Error::Database(format!("failed to set pragmas: {e}")))?;
        conn.execute_batch(PROJECT_SCHEMA.up)
            .map_err(|e| Error::Database(format!("failed to install schema: {e}")))?;
        Ok(Self { conn })
    }

    /// Run `f` inside one transaction; any error rolls everything back.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| Error::Database(format!("failed to begin transaction: {e}")))?;
        let value = f(self)?;
        tx.commit()
            .map_err(|e| Error::Database(format!("failed to commit transaction: {e}")))?;
        Ok(value)
    }

    pub fn insert_project(&self, project: &NewProject) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO projects (project_name, client_name, start_date, end_date, status, percent_complete)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    project.project_name,
                    project.client_name,
                    format_date(project.start_date),
                    format_date(project.end_date),
                    project.status,
                    project.percent_complete,
                ],
            )
            .map_err(|e| Error::Database(format!("failed to insert project: {e}")))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_astm_test(&self, project_id: i64, test: &AstmTest) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO astm_tests (project_id, test_name, test_date, test_type, result_value, result_unit, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    project_id,
                    test.test_name,
                    format_date(test.test_date),
                    test.test_type,
                    test.result_value,
                    test.result_unit,
                    test.notes,
                ],
            )
            .map_err(|e| Error::Database(format!("failed to insert ASTM test: {e}")))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_budget(&self, project_id: i64, budget: &Budget) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO budget (project_id, total_budget, spent_amount, remaining_amount, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    project_id,
                    budget.total_budget,
                    budget.spent_amount,
                    budget.remaining_amount(),
                    format_date(budget.last_updated),
                ],
            )
            .map_err(|e| Error::Database(format!("failed to insert budget: {e}")))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_material(&self, project_id: i64, material: &AcousticMaterial) -> Result<i64> {
        let [b125, b250, b500, b1000, b2000, b4000] = material.nrc_bands;
        self.conn
            .execute(
                "INSERT INTO acoustic_materials (
                    project_id, material_name, material_type, nrc_single_value,
                    nrc_125, nrc_250, nrc_500, nrc_1000, nrc_2000, nrc_4000,
                    stc_rating, iic_rating, cost_per_sqft, notes
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    project_id,
                    material.material_name,
                    material.material_type,
                    material.nrc_single_value,
                    b125,
                    b250,
                    b500,
                    b1000,
                    b2000,
                    b4000,
                    material.stc_rating,
                    material.iic_rating,
                    material.cost_per_sqft,
                    material.notes,
                ],
            )
            .map_err(|e| Error::Database(format!("failed to insert material: {e}")))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_equipment(&self, project_id: i64, item: &EquipmentItem) -> Result<i64> {
        let [p125, p250, p500, p1000, p2000, p4000, p8000] = item.sound_power;
        self.conn
            .execute(
                "INSERT INTO equipment (
                    project_id, equipment_name, equipment_type,
                    sound_power_125, sound_power_250, sound_power_500,
                    sound_power_1000, sound_power_2000, sound_power_4000,
                    sound_power_8000, notes
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    project_id,
                    item.equipment_name,
                    item.equipment_type,
                    p125,
                    p250,
                    p500,
                    p1000,
                    p2000,
                    p4000,
                    p8000,
                    item.notes,
                ],
            )
            .map_err(|e| Error::Database(format!("failed to insert equipment: {e}")))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_space(&self, project_id: i64, space: &EquipmentSpace) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO equipment_spaces (
                    project_id, space_name, space_type,
                    length_ft, width_ft, height_ft,
                    volume_cubic_ft, nc_requirement,
                    rt60_500hz, rt60_1000hz, rt60_2000hz,
                    background_noise_dba, notes
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    project_id,
                    space.space_name,
                    space.space_type,
                    space.length_ft,
                    space.width_ft,
                    space.height_ft,
                    space.volume_cubic_ft(),
                    space.nc_requirement,
                    space.rt60_500hz,
                    space.rt60_1000hz,
                    space.rt60_2000hz,
                    space.background_noise_dba,
                    space.notes,
                ],
            )
            .map_err(|e| Error::Database(format!("failed to insert space: {e}")))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_email(&self, project_id: i64, email: &Email) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO email_correspondence (
                    project_id, sender, recipient, subject, content, sent_date, is_read
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    project_id,
                    email.sender,
                    email.recipient,
                    email.subject,
                    email.content,
                    email.sent_date.format(TIMESTAMP_FORMAT).to_string(),
                    email.is_read,
                ],
            )
            .map_err(|e| Error::Database(format!("failed to insert email: {e}")))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_deliverable(&self, project_id: i64, deliverable: &Deliverable) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO deliverables (
                    project_id, deliverable_name, deliverable_type, due_date, submission_date, status, notes
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    project_id,
                    deliverable.deliverable_name,
                    deliverable.deliverable_type,
                    format_date(deliverable.due_date),
                    deliverable.submission_date.map(format_date),
                    deliverable.status,
                    deliverable.notes,
                ],
            )
            .map_err(|e| Error::Database(format!("failed to insert deliverable: {e}")))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_milestone(&self, project_id: i64, milestone: &Milestone) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO milestones (
                    project_id, milestone_name, milestone_type, planned_date, actual_date, status, notes
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    project_id,
                    milestone.milestone_name,
                    milestone.milestone_type,
                    format_date(milestone.planned_date),
                    milestone.actual_date.map(format_date),
                    milestone.status,
                    milestone.notes,
                ],
            )
            .map_err(|e| Error::Database(format!("failed to insert milestone: {e}")))?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn projects(&self) -> Result<Vec<ProjectRecord>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT project_id, project_name, client_name, start_date, end_date, status, percent_complete
                 FROM projects
                 ORDER BY project_id",
            )
            .map_err(|e| Error::Database(format!("failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, Option<i64>>(6)?,
                ))
            })
            .map_err(|e| Error::Database(format!("failed to query projects: {e}")))?;

        let mut projects = Vec::new();
        for row in rows {
            let (project_id, project_name, client_name, start, end, status, percent) =
                row.map_err(|e| Error::Database(format!("failed to read project row: {e}")))?;
            projects.push(ProjectRecord {
                project_id,
                project_name,
                client_name,
                start_date: parse_date(&start)?,
                end_date: parse_date(&end)?,
                status,
                percent_complete: percent.unwrap_or(0),
            });
        }
        Ok(projects)
    }

    /// Spaces joined with their project, largest volume first.
    pub fn room_volumes(&self) -> Result<Vec<RoomVolumeRow>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT p.project_name, p.client_name, es.space_name, es.space_type,
                        es.volume_cubic_ft, es.nc_requirement, es.rt60_500hz, es.background_noise_dba
                 FROM equipment_spaces es
                 JOIN projects p ON es.project_id = p.project_id
                 ORDER BY es.volume_cubic_ft DESC, es.space_id",
            )
            .map_err(|e| Error::Database(format!("failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(RoomVolumeRow {
                    project_name: row.get(0)?,
                    client_name: row.get(1)?,
                    space_name: row.get(2)?,
                    space_type: row.get(3)?,
                    volume_cubic_ft: row.get(4)?,
                    nc_requirement: row.get(5)?,
                    rt60_500hz: row.get(6)?,
                    background_noise_dba: row.get(7)?,
                })
            })
            .map_err(|e| Error::Database(format!("failed to query room volumes: {e}")))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Database(format!("failed to read room volume row: {e}")))
    }

    /// Materials joined with their project.
    pub fn material_performance(&self) -> Result<Vec<MaterialRow>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT p.project_name, p.client_name, am.material_name, am.material_type,
                        am.nrc_single_value, am.stc_rating, am.iic_rating, am.cost_per_sqft
                 FROM acoustic_materials am
                 JOIN projects p ON am.project_id = p.project_id
                 ORDER BY am.material_id",
            )
            .map_err(|e| Error::Database(format!("failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(MaterialRow {
                    project_name: row.get(0)?,
                    client_name: row.get(1)?,
                    material_name: row.get(2)?,
                    material_type: row.get(3)?,
                    nrc_single_value: row.get(4)?,
                    stc_rating: row.get(5)?,
                    iic_rating: row.get(6)?,
                    cost_per_sqft: row.get(7)?,
                })
            })
            .map_err(|e| Error::Database(format!("failed to query materials: {e}")))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Database(format!("failed to read material row: {e}")))
    }

    /// Row count of every project table, parents first.
    pub fn table_counts(&self) -> Result<Vec<(&'static str, usize)>> {
        PROJECT_TABLES
            .iter()
            .map(|&table| {
                let count: i64 = self
                    .conn
                    .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                        row.get(0)
                    })
                    .map_err(|e| Error::Database(format!("failed to count {table}: {e}")))?;
                Ok((table, count as usize))
            })
            .collect()
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| Error::Database(format!("malformed date {s:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_project() -> NewProject {
        NewProject {
            project_name: "Concert Hall Renovation".into(),
            client_name: "City Arts Foundation".into(),
            start_date: date(2024, 1, 15),
            end_date: date(2024, 9, 1),
            status: "Planning".into(),
            percent_complete: 12,
        }
    }

    fn space(name: &str, length: f64, nc: Option<i64>, noise: Option<f64>) -> EquipmentSpace {
        EquipmentSpace {
            space_name: name.into(),
            space_type: "Meeting Space".into(),
            length_ft: length,
            width_ft: 10.0,
            height_ft: 10.0,
            nc_requirement: nc,
            rt60_500hz: Some(0.5),
            rt60_1000hz: None,
            rt60_2000hz: None,
            background_noise_dba: noise,
            notes: None,
        }
    }

    #[test]
    fn insert_and_read_back_project() {
        let store = ProjectStore::in_memory().unwrap();
        let id = store.insert_project(&sample_project()).unwrap();

        let projects = store.projects().unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].project_id, id);
        assert_eq!(projects[0].start_date, date(2024, 1, 15));
        assert_eq!(projects[0].percent_complete, 12);
    }

    #[test]
    fn room_volumes_are_sorted_largest_first() {
        let store = ProjectStore::in_memory().unwrap();
        let id = store.insert_project(&sample_project()).unwrap();
        store.insert_space(id, &space("Small", 10.0, Some(30), Some(35.0))).unwrap();
        store.insert_space(id, &space("Large", 40.0, None, None)).unwrap();

        let rows = store.room_volumes().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].space_name, "Large");
        assert_eq!(rows[0].volume_cubic_ft, 4000.0);
        assert_eq!(rows[0].nc_requirement, None);
        assert_eq!(rows[1].project_name, "Concert Hall Renovation");
    }

    #[test]
    fn material_rows_keep_missing_ratings() {
        let store = ProjectStore::in_memory().unwrap();
        let id = store.insert_project(&sample_project()).unwrap();
        store
            .insert_material(
                id,
                &AcousticMaterial {
                    material_name: "Isolation Mat Y".into(),
                    material_type: "Underlayment".into(),
                    nrc_single_value: None,
                    nrc_bands: [None; 6],
                    stc_rating: Some(52),
                    iic_rating: Some(62),
                    cost_per_sqft: 2.75,
                    notes: None,
                },
            )
            .unwrap();

        let rows = store.material_performance().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].nrc_single_value, None);
        assert_eq!(rows[0].stc_rating, Some(52));
    }

    #[test]
    fn failed_transaction_rolls_back_inserts() {
        let store = ProjectStore::in_memory().unwrap();
        let result: Result<()> = store.in_transaction(|s| {
            s.insert_project(&sample_project())?;
            Err(Error::Seed("boom".into()))
        });
        assert!(result.is_err());
        assert!(store.projects().unwrap().is_empty());

        store
            .in_transaction(|s| s.insert_project(&sample_project()))
            .unwrap();
        assert_eq!(store.projects().unwrap().len(), 1);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let store = ProjectStore::in_memory().unwrap();
        let err = store
            .insert_budget(
                99,
                &Budget {
                    total_budget: 1000.0,
                    spent_amount: 0.0,
                    last_updated: date(2024, 1, 1),
                },
            )
            .unwrap_err();
        assert!(matches!(err, Error::Database(_)));
    }

    #[test]
    fn table_counts_cover_every_table() {
        let store = ProjectStore::in_memory().unwrap();
        let id = store.insert_project(&sample_project()).unwrap();
        store
            .insert_milestone(
                id,
                &Milestone {
                    milestone_name: "Project Kickoff".into(),
                    milestone_type: "Project Management".into(),
                    planned_date: date(2024, 1, 15),
                    actual_date: None,
                    status: "Completed".into(),
                    notes: None,
                },
            )
            .unwrap();

        let counts = store.table_counts().unwrap();
        assert_eq!(counts.len(), PROJECT_TABLES.len());
        assert_eq!(counts[0], ("projects", 1));
        assert_eq!(counts[8], ("milestones", 1));
        assert_eq!(counts[1], ("astm_tests", 0));
    }

    #[test]
    fn open_rejects_missing_database() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectStore::open(&dir.path().join("absent.db")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn open_rejects_unmigrated_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.db");
        Connection::open(&path)
            .unwrap()
            .execute_batch("CREATE TABLE other (id INTEGER);")
            .unwrap();
        assert!(matches!(
            ProjectStore::open(&path),
            Err(Error::Database(_))
        ));
    }
}
