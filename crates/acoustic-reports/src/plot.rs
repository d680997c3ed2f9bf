//! SVG charts for the room and material reports.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

use acoustic_common::{Error, Result};
use acoustic_db::records::{MaterialRow, RoomVolumeRow};
use plotters::data::Quartiles;
use plotters::prelude::*;

const SIZE: (u32, u32) = (1200, 600);

pub(crate) const ROOM_TREATMENT: &str = "Room Treatment";

fn failed<E: Display>(path: &Path) -> impl Fn(E) -> Error + '_ {
    move |e| Error::Report(format!("failed to draw {}: {e}", path.display()))
}

/// Upper axis bound with some headroom; never below `floor`.
fn headroom(values: impl Iterator<Item = f64>, floor: f64) -> f64 {
    values.fold(0.0, f64::max).max(floor) * 1.1
}

/// Box plot of room volumes, one box per project in name order.
pub(crate) fn room_volume_boxplot(rows: &[RoomVolumeRow], path: &Path) -> Result<()> {
    let mut by_project: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in rows {
        by_project
            .entry(&row.project_name)
            .or_default()
            .push(row.volume_cubic_ft);
    }
    let names: Vec<&str> = by_project.keys().copied().collect();
    let top = headroom(rows.iter().map(|r| r.volume_cubic_ft), 1.0) as f32;

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(failed(path))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Room Volume Distribution by Project", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d((0..names.len() as i32).into_segmented(), 0f32..top)
        .map_err(failed(path))?;

    let project_label = |value: &SegmentValue<i32>| match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| names.get(i))
            .map(|name| name.to_string())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len())
        .x_label_formatter(&project_label)
        .x_desc("Project")
        .y_desc("Volume (cubic feet)")
        .draw()
        .map_err(failed(path))?;

    chart
        .draw_series(by_project.values().enumerate().map(|(i, volumes)| {
            Boxplot::new_vertical(SegmentValue::CenterOf(i as i32), &Quartiles::new(volumes))
                .width(40)
                .style(BLUE)
        }))
        .map_err(failed(path))?;

    root.present().map_err(failed(path))?;
    Ok(())
}

/// (cost, NRC) points for room-treatment materials with a rated NRC, by material name.
pub(crate) fn treatment_points(rows: &[MaterialRow]) -> BTreeMap<&str, Vec<(f64, f64)>> {
    let mut points: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.material_type == ROOM_TREATMENT) {
        if let Some(nrc) = row.nrc_single_value {
            points
                .entry(&row.material_name)
                .or_default()
                .push((row.cost_per_sqft, nrc));
        }
    }
    points
}

/// Scatter of NRC against cost, one colour per material.
pub(crate) fn nrc_cost_scatter(
    points: &BTreeMap<&str, Vec<(f64, f64)>>,
    path: &Path,
) -> Result<()> {
    let all = || points.values().flatten();
    let max_cost = headroom(all().map(|p| p.0), 1.0);
    let max_nrc = headroom(all().map(|p| p.1), 1.0);

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(failed(path))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("NRC vs Cost for Room Treatment Materials", ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..max_cost, 0f64..max_nrc)
        .map_err(failed(path))?;

    chart
        .configure_mesh()
        .x_desc("Cost per Square Foot ($)")
        .y_desc("NRC Rating")
        .draw()
        .map_err(failed(path))?;

    for (i, (name, series)) in points.iter().enumerate() {
        let color = Palette99::pick(i).to_rgba();
        chart
            .draw_series(
                series
                    .iter()
                    .map(|&(cost, nrc)| Circle::new((cost, nrc), 6, color.filled())),
            )
            .map_err(failed(path))?
            .label(*name)
            .legend(move |(x, y)| Circle::new((x, y), 6, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(failed(path))?;

    root.present().map_err(failed(path))?;
    Ok(())
}
