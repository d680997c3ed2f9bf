use std::collections::BTreeMap;

use acoustic_db::records::MaterialRow;
use serde::Serialize;

use crate::stats::{mean, round2};

/// Performance and cost aggregates for one material type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialSummary {
    pub material_type: String,
    pub mean_nrc: Option<f64>,
    pub mean_stc: Option<f64>,
    pub mean_iic: Option<f64>,
    pub cost_mean: f64,
    pub cost_min: f64,
    pub cost_max: f64,
}

pub fn summarize_materials(rows: &[MaterialRow]) -> Vec<MaterialSummary> {
    let mut by_type: BTreeMap<&str, Vec<&MaterialRow>> = BTreeMap::new();
    for row in rows {
        by_type.entry(&row.material_type).or_default().push(row);
    }

    by_type
        .into_iter()
        .map(|(material_type, group)| {
            let costs: Vec<f64> = group.iter().map(|m| m.cost_per_sqft).collect();
            let cost_min = costs.iter().copied().fold(f64::INFINITY, f64::min);
            let cost_max = costs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            MaterialSummary {
                material_type: material_type.to_string(),
                mean_nrc: mean(group.iter().map(|m| m.nrc_single_value)),
                mean_stc: mean(group.iter().map(|m| m.stc_rating.map(|v| v as f64))),
                mean_iic: mean(group.iter().map(|m| m.iic_rating.map(|v| v as f64))),
                cost_mean: round2(costs.iter().sum::<f64>() / costs.len() as f64),
                cost_min: round2(cost_min),
                cost_max: round2(cost_max),
            }
        })
        .collect()
}
