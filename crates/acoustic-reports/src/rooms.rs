use std::collections::BTreeMap;

use acoustic_db::records::RoomVolumeRow;
use serde::Serialize;

use crate::stats::{mean, round2};

/// Per-project room volume aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSummary {
    pub project_name: String,
    pub total_volume: f64,
    pub average_volume: f64,
    pub room_count: usize,
    pub average_nc: Option<f64>,
    pub average_background_noise_dba: Option<f64>,
}

/// Group spaces by project name (sorted) and aggregate their volumes.
pub fn summarize_rooms(rows: &[RoomVolumeRow]) -> Vec<RoomSummary> {
    let mut by_project: BTreeMap<&str, Vec<&RoomVolumeRow>> = BTreeMap::new();
    for row in rows {
        by_project.entry(&row.project_name).or_default().push(row);
    }

    by_project
        .into_iter()
        .map(|(project, spaces)| {
            let total: f64 = spaces.iter().map(|s| s.volume_cubic_ft).sum();
            let count = spaces.len();
            RoomSummary {
                project_name: project.to_string(),
                total_volume: round2(total),
                average_volume: round2(total / count as f64),
                room_count: count,
                average_nc: mean(spaces.iter().map(|s| s.nc_requirement.map(|nc| nc as f64))),
                average_background_noise_dba: mean(spaces.iter().map(|s| s.background_noise_dba)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space(project: &str, volume: f64, nc: Option<i64>, noise: Option<f64>) -> RoomVolumeRow {
        RoomVolumeRow {
            project_name: project.into(),
            client_name: "Client".into(),
            space_name: "Room".into(),
            space_type: "Meeting Space".into(),
            volume_cubic_ft: volume,
            nc_requirement: nc,
            rt60_500hz: None,
            background_noise_dba: noise,
        }
    }

    #[test]
    fn groups_by_project_in_name_order() {
        let rows = vec![
            space("Recording Studio Design", 5_400.0, Some(20), Some(25.0)),
            space("Concert Hall Renovation", 6_000.0, Some(30), Some(35.0)),
            space("Recording Studio Design", 960.0, Some(25), Some(30.0)),
        ];
        let summary = summarize_rooms(&rows);
        let names: Vec<_> = summary.iter().map(|s| s.project_name.as_str()).collect();
        assert_eq!(names, ["Concert Hall Renovation", "Recording Studio Design"]);

        let studio = &summary[1];
        assert_eq!(studio.total_volume, 6_360.0);
        assert_eq!(studio.average_volume, 3_180.0);
        assert_eq!(studio.room_count, 2);
        assert_eq!(studio.average_nc, Some(22.5));
        assert_eq!(studio.average_background_noise_dba, Some(27.5));
    }

    #[test]
    fn standard_project_spaces_match_hand_totals() {
        // The five sample spaces: 6000 + 1620 + 5400 + 18000 + 960 ft³.
        let rows = vec![
            space("P", 6_000.0, Some(30), Some(35.0)),
            space("P", 1_620.0, Some(35), Some(40.0)),
            space("P", 5_400.0, Some(20), Some(25.0)),
            space("P", 18_000.0, Some(40), Some(45.0)),
            space("P", 960.0, Some(25), Some(30.0)),
        ];
        let summary = summarize_rooms(&rows);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].total_volume, 31_980.0);
        assert_eq!(summary[0].average_volume, 6_396.0);
        assert_eq!(summary[0].average_nc, Some(30.0));
        assert_eq!(summary[0].average_background_noise_dba, Some(35.0));
    }

    #[test]
    fn missing_measurements_are_skipped() {
        let rows = vec![
            space("P", 100.0, None, None),
            space("P", 200.0, Some(40), None),
        ];
        let summary = summarize_rooms(&rows);
        assert_eq!(summary[0].room_count, 2);
        assert_eq!(summary[0].average_nc, Some(40.0));
        assert_eq!(summary[0].average_background_noise_dba, None);
    }

    #[test]
    fn no_rows_no_summary() {
        assert!(summarize_rooms(&[]).is_empty());
    }
}
