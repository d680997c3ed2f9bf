use std::fs;
use std::path::{Path, PathBuf};

use acoustic_common::{Error, Result};
use acoustic_db::ProjectStore;
use acoustic_db::records::{MaterialRow, RoomVolumeRow};
use serde::Serialize;
use tracing::info;

use crate::materials::{MaterialSummary, summarize_materials};
use crate::plot;
use crate::rooms::{RoomSummary, summarize_rooms};
use crate::table::{Table, cell};

fn write_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| Error::Report(format!("failed to create {}: {e}", path.display())))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| Error::Report(format!("failed to write {}: {e}", path.display())))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write detail and summary CSVs into `dir`, returning both paths.
fn export_pair<D: Serialize, S: Serialize>(
    dir: &Path,
    detail_name: &str,
    detail: &[D],
    summary_name: &str,
    summary: &[S],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let detail_path = dir.join(detail_name);
    let summary_path = dir.join(summary_name);
    write_records(&detail_path, detail)?;
    write_records(&summary_path, summary)?;
    info!(
        "wrote {} and {}",
        detail_path.display(),
        summary_path.display()
    );
    Ok(vec![detail_path, summary_path])
}

/// Room volumes across every project.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomReport {
    pub rows: Vec<RoomVolumeRow>,
    pub summary: Vec<RoomSummary>,
}

impl RoomReport {
    pub fn load(store: &ProjectStore) -> Result<Self> {
        Ok(Self::from_rows(store.room_volumes()?))
    }

    pub fn from_rows(rows: Vec<RoomVolumeRow>) -> Self {
        let summary = summarize_rooms(&rows);
        Self { rows, summary }
    }

    pub fn summary_table(&self) -> Table {
        let mut table = Table::new(
            "Room Volume Analysis by Project",
            &[
                "Project",
                "Total Volume (ft³)",
                "Avg Room Volume (ft³)",
                "Rooms",
                "Avg NC",
                "Avg Background Noise (dBA)",
            ],
        );
        for s in &self.summary {
            table.push_row(vec![
                s.project_name.clone(),
                format!("{:.2}", s.total_volume),
                format!("{:.2}", s.average_volume),
                s.room_count.to_string(),
                cell(s.average_nc),
                cell(s.average_background_noise_dba),
            ]);
        }
        table
    }

    /// `room_analysis.csv` (detail) and `room_summary.csv`.
    pub fn write_csv(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        export_pair(
            dir,
            "room_analysis.csv",
            &self.rows,
            "room_summary.csv",
            &self.summary,
        )
    }

    /// Box plot of room volumes per project as `room_volumes.svg`.
    /// Nothing is written when there are no rooms.
    pub fn write_plot(&self, dir: &Path) -> Result<Option<PathBuf>> {
        if self.rows.is_empty() {
            return Ok(None);
        }
        fs::create_dir_all(dir)?;
        let path = dir.join("room_volumes.svg");
        plot::room_volume_boxplot(&self.rows, &path)?;
        info!("wrote {}", path.display());
        Ok(Some(path))
    }
}

/// Acoustic material performance and cost across every project.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialReport {
    pub rows: Vec<MaterialRow>,
    pub summary: Vec<MaterialSummary>,
}

impl MaterialReport {
    pub fn load(store: &ProjectStore) -> Result<Self> {
        Ok(Self::from_rows(store.material_performance()?))
    }

    pub fn from_rows(rows: Vec<MaterialRow>) -> Self {
        let summary = summarize_materials(&rows);
        Self { rows, summary }
    }

    pub fn summary_table(&self) -> Table {
        let mut table = Table::new(
            "Material Performance Summary",
            &[
                "Material Type",
                "NRC",
                "STC",
                "IIC",
                "Cost Mean ($/ft²)",
                "Cost Min",
                "Cost Max",
            ],
        );
        for s in &self.summary {
            table.push_row(vec![
                s.material_type.clone(),
                cell(s.mean_nrc),
                cell(s.mean_stc),
                cell(s.mean_iic),
                format!("{:.2}", s.cost_mean),
                format!("{:.2}", s.cost_min),
                format!("{:.2}", s.cost_max),
            ]);
        }
        table
    }

    /// `material_analysis.csv` (detail) and `material_summary.csv`.
    pub fn write_csv(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        export_pair(
            dir,
            "material_analysis.csv",
            &self.rows,
            "material_summary.csv",
            &self.summary,
        )
    }

    /// NRC against cost for room-treatment materials as `material_performance.svg`.
    pub fn write_plot(&self, dir: &Path) -> Result<Option<PathBuf>> {
        let points = plot::treatment_points(&self.rows);
        if points.is_empty() {
            return Ok(None);
        }
        fs::create_dir_all(dir)?;
        let path = dir.join("material_performance.svg");
        plot::nrc_cost_scatter(&points, &path)?;
        info!("wrote {}", path.display());
        Ok(Some(path))
    }
}
