//! Built-in scripts for the project-management schema.
//!
//! A fresh migrations directory is bootstrapped from [`BASELINE`], after which
//! the schema evolves through ordinary migration files.

/// Forward and backward SQL for one built-in migration.
#[derive(Debug, Clone, Copy)]
pub struct SchemaScript {
    pub name: &'static str,
    pub up: &'static str,
    pub down: &'static str,
}

pub const PROJECT_SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS projects (
    project_id INTEGER PRIMARY KEY,
    project_name TEXT NOT NULL,
    client_name TEXT NOT NULL,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    status TEXT NOT NULL,
    percent_complete INTEGER DEFAULT 0,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS astm_tests (
    test_id INTEGER PRIMARY KEY,
    project_id INTEGER,
    test_name TEXT NOT NULL,
    test_date DATE NOT NULL,
    test_type TEXT NOT NULL,
    result_value REAL,
    result_unit TEXT,
    notes TEXT,
    FOREIGN KEY (project_id) REFERENCES projects(project_id)
);

CREATE TABLE IF NOT EXISTS budget (
    budget_id INTEGER PRIMARY KEY,
    project_id INTEGER,
    total_budget REAL NOT NULL,
    spent_amount REAL DEFAULT 0,
    remaining_amount REAL,
    last_updated DATE,
    FOREIGN KEY (project_id) REFERENCES projects(project_id)
);

CREATE TABLE IF NOT EXISTS acoustic_materials (
    material_id INTEGER PRIMARY KEY,
    project_id INTEGER,
    material_name TEXT NOT NULL,
    material_type TEXT NOT NULL,
    nrc_single_value REAL,
    nrc_125 REAL,
    nrc_250 REAL,
    nrc_500 REAL,
    nrc_1000 REAL,
    nrc_2000 REAL,
    nrc_4000 REAL,
    stc_rating INTEGER,
    iic_rating INTEGER,
    cost_per_sqft REAL NOT NULL,
    notes TEXT,
    FOREIGN KEY (project_id) REFERENCES projects(project_id)
);

-- rt60_* in seconds, background noise in dBA
CREATE TABLE IF NOT EXISTS equipment_spaces (
    space_id INTEGER PRIMARY KEY,
    project_id INTEGER,
    space_name TEXT NOT NULL,
    space_type TEXT NOT NULL,
    length_ft REAL NOT NULL,
    width_ft REAL NOT NULL,
    height_ft REAL NOT NULL,
    volume_cubic_ft REAL NOT NULL,
    nc_requirement INTEGER,
    rt60_500hz REAL,
    rt60_1000hz REAL,
    rt60_2000hz REAL,
    background_noise_dba REAL,
    notes TEXT,
    FOREIGN KEY (project_id) REFERENCES projects(project_id)
);

CREATE TABLE IF NOT EXISTS equipment (
    equipment_id INTEGER PRIMARY KEY,
    project_id INTEGER,
    equipment_name TEXT NOT NULL,
    equipment_type TEXT NOT NULL,
    sound_power_125 REAL,
    sound_power_250 REAL,
    sound_power_500 REAL,
    sound_power_1000 REAL,
    sound_power_2000 REAL,
    sound_power_4000 REAL,
    sound_power_8000 REAL,
    notes TEXT,
    FOREIGN KEY (project_id) REFERENCES projects(project_id)
);

CREATE TABLE IF NOT EXISTS email_correspondence (
    email_id INTEGER PRIMARY KEY,
    project_id INTEGER,
    sender TEXT NOT NULL,
    recipient TEXT NOT NULL,
    subject TEXT NOT NULL,
    content TEXT NOT NULL,
    sent_date TIMESTAMP NOT NULL,
    is_read BOOLEAN DEFAULT 0,
    FOREIGN KEY (project_id) REFERENCES projects(project_id)
);

CREATE TABLE IF NOT EXISTS deliverables (
    deliverable_id INTEGER PRIMARY KEY,
    project_id INTEGER,
    deliverable_name TEXT NOT NULL,
    deliverable_type TEXT NOT NULL,
    due_date DATE NOT NULL,
    submission_date DATE,
    status TEXT NOT NULL,
    notes TEXT,
    FOREIGN KEY (project_id) REFERENCES projects(project_id)
);

CREATE TABLE IF NOT EXISTS milestones (
    milestone_id INTEGER PRIMARY KEY,
    project_id INTEGER,
    milestone_name TEXT NOT NULL,
    milestone_type TEXT NOT NULL,
    planned_date DATE NOT NULL,
    actual_date DATE,
    status TEXT NOT NULL,
    notes TEXT,
    FOREIGN KEY (project_id) REFERENCES projects(project_id)
);
";

// Children first so foreign key enforcement never sees dangling rows.
pub const DROP_PROJECT_SCHEMA_SQL: &str = "
DROP TABLE IF EXISTS milestones;
DROP TABLE IF EXISTS deliverables;
DROP TABLE IF EXISTS email_correspondence;
DROP TABLE IF EXISTS equipment;
DROP TABLE IF EXISTS equipment_spaces;
DROP TABLE IF EXISTS acoustic_materials;
DROP TABLE IF EXISTS budget;
DROP TABLE IF EXISTS astm_tests;
DROP TABLE IF EXISTS projects;
";

pub const PROJECT_SCHEMA: SchemaScript = SchemaScript {
    name: "create_project_schema",
    up: PROJECT_SCHEMA_SQL,
    down: DROP_PROJECT_SCHEMA_SQL,
};

pub const PROJECT_PRIORITY: SchemaScript = SchemaScript {
    name: "add_priority_to_projects",
    up: "ALTER TABLE projects ADD COLUMN priority TEXT DEFAULT 'medium';",
    down: "ALTER TABLE projects DROP COLUMN priority;",
};

/// Migrations written into an empty migrations directory, in order.
pub const BASELINE: &[SchemaScript] = &[PROJECT_SCHEMA, PROJECT_PRIORITY];

/// Domain tables in dependency order (parents first).
pub const PROJECT_TABLES: [&str; 9] = [
    "projects",
    "astm_tests",
    "budget",
    "acoustic_materials",
    "equipment_spaces",
    "equipment",
    "email_correspondence",
    "deliverables",
    "milestones",
];
