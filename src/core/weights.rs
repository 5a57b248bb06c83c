//! Weight list: piece lengths grouped per takeoff
//!
//! Lengths are rounded up to the next half foot and grouped, so a shop can
//! read quantity, cut length and weight for every structural item.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::model::Takeoff;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightGroup {
    pub quantity: usize,
    pub name: String,
    /// Rounded length in feet
    pub length: f64,
    /// Feet and inches, e.g. `12' 6"`
    pub length_label: String,
    pub weight: i64,
    pub weight_per_foot: f64,
}

/// Weight per lineal foot of a takeoff, 0 without lineal footage
pub fn takeoff_weight_per_foot(takeoff: &Takeoff) -> f64 {
    match takeoff.lf {
        Some(lf) if lf != 0.0 => takeoff.weight / lf,
        _ => 0.0,
    }
}

/// `12'` or `12' 6"` for a length already rounded to half feet
pub fn length_label(length: f64) -> String {
    let feet = length.floor();
    if length > feet {
        format!("{}' 6\"", feet as i64)
    } else {
        format!("{}'", feet as i64)
    }
}

/// Group the lengths of a takeoff by rounded length, shortest first.
///
/// Takeoffs of a do-not-list type produce no groups.
pub fn weight_list(takeoff: &Takeoff, dnl_types: &[String]) -> Vec<WeightGroup> {
    if dnl_types.iter().any(|t| *t == takeoff.type_name) {
        return Vec::new();
    }

    let weight_per_foot = takeoff_weight_per_foot(takeoff);

    // Keyed by half feet so rounded lengths compare exactly
    let mut groups: BTreeMap<i64, WeightGroup> = BTreeMap::new();
    for &raw in &takeoff.lengths {
        let half_feet = (raw * 2.0).ceil();
        let length = half_feet / 2.0;
        let piece_weight = (weight_per_foot * length).round_ties_even() as i64;

        let group = groups.entry(half_feet as i64).or_insert_with(|| WeightGroup {
            quantity: 0,
            name: takeoff.name.clone(),
            length,
            length_label: length_label(length),
            weight: 0,
            weight_per_foot,
        });
        group.quantity += 1;
        group.weight += piece_weight;
    }

    groups.into_values().collect()
}
