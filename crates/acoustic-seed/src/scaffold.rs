use std::fs;
use std::path::{Path, PathBuf};

use acoustic_common::Result;
use tracing::{debug, info};

pub const DEFAULT_PROJECT_FOLDER: &str = "Project_1_Acoustic_Design";

const PROJECT_FOLDERS: [(&str, [&str; 2]); 6] = [
    ("astm_tests_db", ["test_results_001.txt", "raw_data_001.txt"]),
    ("budget", ["project_budget.xlsx", "scope_of_work.txt"]),
    ("acoustic_materials_db", ["material_specs.txt", "nrc_ratings.csv"]),
    ("equipment_spaces_db", ["space_requirements.txt", "equipment_list.csv"]),
    ("email_db", ["client_correspondence.txt", "team_meetings.txt"]),
    ("deliverables_db", ["final_report.txt", "presentation.pptx"]),
];

/// Create the project folder tree under `base` and return the files written.
///
/// Existing folders are reused; placeholder files are overwritten.
pub fn scaffold_project_folders(base: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (folder, files) in PROJECT_FOLDERS {
        let dir = base.join(folder);
        fs::create_dir_all(&dir)?;
        for file in files {
            let path = dir.join(file);
            fs::write(&path, format!("Sample content for {file}\n"))?;
            debug!("wrote {}", path.display());
            written.push(path);
        }
    }
    info!("scaffolded {} files under {}", written.len(), base.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_six_folders_with_two_files_each() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join(DEFAULT_PROJECT_FOLDER);
        let written = scaffold_project_folders(&base).unwrap();

        assert_eq!(written.len(), 12);
        let folders = fs::read_dir(&base).unwrap().count();
        assert_eq!(folders, 6);

        let report = base.join("deliverables_db").join("final_report.txt");
        assert_eq!(
            fs::read_to_string(report).unwrap(),
            "Sample content for final_report.txt\n"
        );
    }

    #[test]
    fn rerunning_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_project_folders(dir.path()).unwrap();
        let again = scaffold_project_folders(dir.path()).unwrap();
        assert_eq!(again.len(), 12);
    }
}
