//! Item Cost by Type ingestion
//!
//! The cost export opens with a free-form preamble. A row whose first cell is
//! `Material` announces the column header on the next row; data rows follow
//! until a blank first cell or the `Summary` block.

use std::io::BufRead;

use crate::core::columns::{is_blank, split_line, ColumnIndex};
use crate::core::config::Config;
use crate::core::diagnostics::{Diagnostics, Notice};
use crate::core::error::IngestError;
use crate::core::model::{identity_key, Listing, Takeoff, TakeoffModel};
use crate::core::normalize::normalize_name;

use super::CostStats;

/// File label used in errors
pub const COST_FILE: &str = "cost report";

const PLAN_NAME: &str = "Plan Name";
const TYPE: &str = "Type";
const NAME: &str = "Name";
const QTY: &str = "Qty";

const REQUIRED_COLUMNS: &[&str] = &[PLAN_NAME, TYPE, NAME, QTY];

enum CostState {
    Preamble,
    Header,
    Rows(ColumnIndex),
}

/// Add cost report weights to a model built from the geometry export
pub fn ingest_cost<R: BufRead>(
    model: &mut TakeoffModel,
    reader: R,
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> Result<CostStats, IngestError> {
    let mut state = CostState::Preamble;
    let mut stats = CostStats::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| IngestError::io(COST_FILE, e))?;
        let fields = split_line(&line, COST_FILE, line_no)?;
        let first = fields.first().map(String::as_str).unwrap_or("");

        match &state {
            CostState::Preamble => {
                if first == "Material" {
                    state = CostState::Header;
                }
            }
            CostState::Header => {
                let columns = ColumnIndex::from_header(&fields, COST_FILE);
                columns.require(REQUIRED_COLUMNS)?;
                state = CostState::Rows(columns);
            }
            CostState::Rows(columns) => {
                if is_blank(first) || first == "Summary" {
                    break;
                }
                let qty = columns.parse_f64(columns.cell(&fields, QTY)?, QTY, line_no)?;
                let plan = columns.cell(&fields, PLAN_NAME)?;
                let type_name = columns.cell(&fields, TYPE)?;
                let raw_name = columns.cell(&fields, NAME)?;
                apply_row(model, config, diagnostics, &mut stats, plan, type_name, raw_name, qty);
            }
        }
    }

    match state {
        CostState::Preamble => Err(IngestError::MissingHeader {
            file: COST_FILE.to_string(),
        }),
        _ => Ok(stats),
    }
}

#[allow(clippy::too_many_arguments)]
fn apply_row(
    model: &mut TakeoffModel,
    config: &Config,
    diagnostics: &mut Diagnostics,
    stats: &mut CostStats,
    plan: &str,
    type_name: &str,
    raw_name: &str,
    qty: f64,
) {
    stats.rows_read += 1;
    let name = normalize_name(raw_name);
    let key = identity_key(plan, type_name, &name);

    if let Some(id) = model.find(Listing::Struct, &key) {
        model.takeoff_mut(id).weight += qty;
        stats.matched += 1;
    } else {
        let takeoff = Takeoff::cost_only(plan, type_name, &name, raw_name, qty);
        if name.starts_with("HSS") && (type_name == "Beam" || type_name == "Column") {
            diagnostics.push(Notice::CostOnlyHss {
                name: name.clone(),
                type_name: type_name.to_string(),
            });
        }
        model.add_takeoff(Listing::Struct, key, takeoff);
        stats.cost_only += 1;
    }

    match model.material_mut(&name) {
        Some(material) => material.add_weight(qty),
        None => {
            // Plates and connection hardware are priced by weight only
            if !config.is_dnl_type(type_name) && !name.contains("Plate") {
                diagnostics.push(Notice::CostOnlyMaterial {
                    name,
                    type_name: type_name.to_string(),
                });
            }
        }
    }
}
