//! Takeoff Geometry Detail ingestion
//!
//! Layout of the export after its header line:
//!
//! ```text
//! P1,Beam,W12x50,,0,40,2      <- summary row, starts an item
//! ,,Name,Description,SF,LF,EA <- per-item column header, skipped
//! ,,,,,20,                    <- length detail rows
//! ,,,,,20,
//! STACK ...                   <- section marker, ignored
//! ```

use std::io::BufRead;

use crate::core::columns::{is_blank, parse_number, split_line, ColumnIndex};
use crate::core::config::Config;
use crate::core::diagnostics::{Diagnostics, Notice};
use crate::core::error::IngestError;
use crate::core::model::{identity_key, Listing, Takeoff, TakeoffId, TakeoffModel};
use crate::core::normalize::normalize_name;
use crate::core::stub::StubResolver;

use super::GeometryStats;

/// File label used in errors
pub const GEOMETRY_FILE: &str = "takeoff geometry";

const PLAN_NAME: &str = "Plan Name";
const TYPE: &str = "Type";
const NAME: &str = "Name";
const DESCRIPTION: &str = "Description";
const SF: &str = "SF";
const LF: &str = "LF";
const EA: &str = "EA";

const REQUIRED_COLUMNS: &[&str] = &[PLAN_NAME, TYPE, NAME, DESCRIPTION, SF, LF, EA];

/// Item whose detail rows are being read
#[derive(Debug, Clone)]
struct CurrentItem {
    takeoff: TakeoffId,
    material: String,
    /// Description of the latest summary row; columns and diagonals take
    /// their piece length from it
    description: String,
}

/// Cells of one geometry row, by column
#[derive(Debug)]
struct GeometryRow {
    line: usize,
    plan: String,
    type_name: String,
    raw_name: String,
    description: String,
    sf: String,
    lf: String,
    ea: String,
}

impl GeometryRow {
    fn read(fields: &[String], columns: &ColumnIndex, line: usize) -> Result<Self, IngestError> {
        Ok(Self {
            line,
            plan: columns.cell(fields, PLAN_NAME)?.to_string(),
            type_name: columns.cell(fields, TYPE)?.to_string(),
            raw_name: columns.cell(fields, NAME)?.to_string(),
            description: columns.cell(fields, DESCRIPTION)?.to_string(),
            sf: columns.cell(fields, SF)?.to_string(),
            lf: columns.cell(fields, LF)?.to_string(),
            ea: columns.cell(fields, EA)?.to_string(),
        })
    }
}

/// Line-by-line state machine over the geometry export
pub struct GeometryIngestor {
    stubs: StubResolver,
    dnl_types: Vec<String>,
    columns: Option<ColumnIndex>,
    skip_item_header: bool,
    /// Set by a do-not-list row, consumed by the next full takeoff created
    pending_dnl: bool,
    current: Option<CurrentItem>,
    model: TakeoffModel,
    stats: GeometryStats,
}

impl GeometryIngestor {
    pub fn new(config: &Config) -> Self {
        Self {
            stubs: config.stub_resolver(),
            dnl_types: config.dnl_types(),
            columns: None,
            skip_item_header: false,
            pending_dnl: false,
            current: None,
            model: TakeoffModel::new(),
            stats: GeometryStats::default(),
        }
    }

    /// Consume one line (1-based `line_no`)
    pub fn feed(&mut self, line_no: usize, line: &str, diagnostics: &mut Diagnostics) -> Result<(), IngestError> {
        self.stats.lines_read += 1;
        let fields = split_line(line, GEOMETRY_FILE, line_no)?;

        if self.columns.is_none() {
            let columns = ColumnIndex::from_header(&fields, GEOMETRY_FILE);
            columns.require(REQUIRED_COLUMNS)?;
            self.columns = Some(columns);
            return Ok(());
        }

        let Some(columns) = &self.columns else {
            return Ok(());
        };
        if fields.is_empty() {
            return Ok(());
        }

        let row = GeometryRow::read(&fields, columns, line_no)?;
        if row.plan.starts_with("STACK") {
            return Ok(());
        }

        if !is_blank(&row.plan) {
            self.start_item(&row, diagnostics)?;
            self.skip_item_header = true;
        } else if self.skip_item_header {
            self.skip_item_header = false;
        } else {
            self.add_detail(&row)?;
        }
        Ok(())
    }

    /// Finished model; fails if the file had no header line
    pub fn finish(self) -> Result<(TakeoffModel, GeometryStats), IngestError> {
        if self.columns.is_none() {
            return Err(IngestError::MissingHeader {
                file: GEOMETRY_FILE.to_string(),
            });
        }
        Ok((self.model, self.stats))
    }

    /// Summary row: create or extend a takeoff and attach it to its material
    fn start_item(&mut self, row: &GeometryRow, diagnostics: &mut Diagnostics) -> Result<(), IngestError> {
        let name = normalize_name(&row.raw_name);
        let key = identity_key(&row.plan, &row.type_name, &name);
        let raw_key = identity_key(&row.plan, &row.type_name, &row.raw_name);
        let listing = Listing::for_type(&row.type_name);
        let material = self.stubs.de_stub(&name);

        if self.dnl_types.iter().any(|t| *t == row.type_name) {
            self.pending_dnl = true;
        }

        if row.type_name == "None" {
            diagnostics.push(Notice::NoneType {
                plan: row.plan.clone(),
                type_name: row.type_name.clone(),
                count: row.ea.clone(),
                name: row.raw_name.clone(),
                description: row.description.clone(),
            });
        }

        let count: i64 = parse_number(GEOMETRY_FILE, &row.ea, EA, row.line)?;

        if let Some(id) = self.model.find(listing, &key) {
            let existing = self.model.takeoff_mut(id);
            existing.add_count(count);
            if existing.raw_key() == raw_key {
                diagnostics.push(Notice::DuplicateEntry {
                    key: key.clone(),
                    raw_name: row.raw_name.clone(),
                });
            }
            self.stats.duplicates += 1;
            self.current = Some(CurrentItem {
                takeoff: id,
                material,
                description: row.description.clone(),
            });
            return Ok(());
        }

        let takeoff = if self.stubs.is_stub(&name) {
            // Counted on its own; lengths fold into the base material only.
            // A pending do-not-list flag waits for the next full takeoff.
            self.stats.stubs += 1;
            Takeoff::stub(
                &row.plan,
                &row.type_name,
                &name,
                &row.raw_name,
                &row.description,
                count,
            )
        } else {
            let sf: f64 = parse_number(GEOMETRY_FILE, &row.sf, SF, row.line)?;
            let lf: f64 = parse_number(GEOMETRY_FILE, &row.lf, LF, row.line)?;
            let takeoff = Takeoff::new(
                &row.plan,
                &row.type_name,
                &name,
                &row.raw_name,
                &row.description,
                sf,
                lf,
                count,
            )
            .with_dnl(self.pending_dnl);
            self.pending_dnl = false;
            takeoff
        };

        let id = self.model.add_takeoff(listing, key.clone(), takeoff);
        self.model.material_entry(&material).attach(key, id);
        self.stats.takeoffs_created += 1;
        self.current = Some(CurrentItem {
            takeoff: id,
            material,
            description: row.description.clone(),
        });
        Ok(())
    }

    /// Length detail row for the current item
    fn add_detail(&mut self, row: &GeometryRow) -> Result<(), IngestError> {
        let current = self
            .current
            .clone()
            .ok_or_else(|| IngestError::OrphanContinuation {
                file: GEOMETRY_FILE.to_string(),
                line: row.line,
            })?;

        let by_description = self.model.takeoff(current.takeoff).measured_by_description();
        let length = if by_description {
            if is_blank(&current.description) {
                return Ok(());
            }
            Some(leading_length(&current.description).ok_or_else(|| IngestError::MissingLength {
                file: GEOMETRY_FILE.to_string(),
                description: current.description.clone(),
                line: row.line,
            })?)
        } else if !is_blank(&row.lf) {
            let lf: f64 = parse_number(GEOMETRY_FILE, &row.lf, LF, row.line)?;
            (lf != 0.0).then_some(lf)
        } else {
            None
        };

        let Some(length) = length else {
            return Ok(());
        };

        let takeoff = self.model.takeoff_mut(current.takeoff);
        takeoff.lengths.push(length);
        // Stub takeoffs keep no lf of their own
        if by_description && takeoff.lf.is_some() {
            takeoff.add_lf(length);
        }
        if let Some(material) = self.model.material_mut(&current.material) {
            material.add_lf(length);
        }
        self.stats.lengths += 1;
        Ok(())
    }
}

/// Leading number of a description, e.g. `12.5` from `12.5' F->L02`
fn leading_length(description: &str) -> Option<f64> {
    let digits = description
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }

    let rest = &description[digits..];
    let end = match rest.strip_prefix('.') {
        Some(fraction) => {
            digits + 1 + fraction.chars().take_while(|c| c.is_ascii_digit()).count()
        }
        None => digits,
    };
    description[..end].parse().ok()
}

/// Read a whole geometry export into a new model
pub fn ingest_geometry<R: BufRead>(
    reader: R,
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> Result<TakeoffModel, IngestError> {
    read_geometry(reader, config, diagnostics).map(|(model, _)| model)
}

/// Like [`ingest_geometry`], also returning the pass counters
pub fn read_geometry<R: BufRead>(
    reader: R,
    config: &Config,
    diagnostics: &mut Diagnostics,
) -> Result<(TakeoffModel, GeometryStats), IngestError> {
    let mut ingestor = GeometryIngestor::new(config);
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| IngestError::io(GEOMETRY_FILE, e))?;
        ingestor.feed(idx + 1, &line, diagnostics)?;
    }
    ingestor.finish()
}
