//! Ingestion passes over the two exports
//!
//! The geometry pass builds a [`TakeoffModel`]; the cost pass can only run on
//! a finished model, and multing runs last.

pub mod cost;
pub mod geometry;

pub use cost::{ingest_cost, COST_FILE};
pub use geometry::{ingest_geometry, read_geometry, GeometryIngestor, GEOMETRY_FILE};

use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::core::config::Config;
use crate::core::diagnostics::Diagnostics;
use crate::core::error::IngestError;
use crate::core::model::TakeoffModel;
use crate::core::multing;

/// Counters from the geometry pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeometryStats {
    pub lines_read: usize,
    pub takeoffs_created: usize,
    pub duplicates: usize,
    pub stubs: usize,
    pub lengths: usize,
}

/// Counters from the cost pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CostStats {
    pub rows_read: usize,
    pub matched: usize,
    pub cost_only: usize,
}

/// Everything a run produces
#[derive(Debug)]
pub struct Estimate {
    pub model: TakeoffModel,
    pub diagnostics: Diagnostics,
    pub geometry: GeometryStats,
    pub cost: CostStats,
}

/// Geometry pass, cost pass, then multing
pub fn run_pipeline(geometry: &Path, cost: &Path, config: &Config) -> Result<Estimate, IngestError> {
    let mut diagnostics = Diagnostics::new();

    let file = File::open(geometry).map_err(|e| IngestError::io(&geometry.display().to_string(), e))?;
    let (mut model, geometry_stats) = read_geometry(BufReader::new(file), config, &mut diagnostics)?;

    let file = File::open(cost).map_err(|e| IngestError::io(&cost.display().to_string(), e))?;
    let cost_stats = ingest_cost(&mut model, BufReader::new(file), config, &mut diagnostics)?;

    multing::apply(&mut model, &config.stock_rules());

    Ok(Estimate {
        model,
        diagnostics,
        geometry: geometry_stats,
        cost: cost_stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Listing;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_pipeline_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let geometry = tmp.path().join("geometry.csv");
        let cost = tmp.path().join("cost.csv");
        fs::write(
            &geometry,
            "Plan Name,Type,Name,Description,SF,LF,EA\n\
             P1,Beam,W12x50,,0,100,4\n\
             ,,Name,Description,SF,LF,EA\n\
             ,,,,,40,\n,,,,,30,\n,,,,,20,\n,,,,,10,\n",
        )
        .unwrap();
        fs::write(&cost, "Material\nPlan Name,Type,Name,Qty\nP1,Beam,W12x50,5000\n").unwrap();

        let estimate = run_pipeline(&geometry, &cost, &Config::default()).unwrap();

        assert_eq!(estimate.geometry.takeoffs_created, 1);
        assert_eq!(estimate.geometry.lengths, 4);
        assert_eq!(estimate.cost.matched, 1);
        assert!(estimate.diagnostics.is_empty());

        let material = estimate.model.material("W 12x50").unwrap();
        assert_eq!(material.weight_per_foot, 50.0);
        assert_eq!(material.drop_weight, 225.0);
        assert_eq!(
            estimate.model.get(Listing::Struct, "P1|Beam|W12x50").unwrap().weight,
            5000.0
        );
    }

    #[test]
    fn test_missing_file_names_path() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope.csv");
        let err = run_pipeline(&missing, &missing, &Config::default()).unwrap_err();
        match err {
            IngestError::Io { file, .. } => assert!(file.ends_with("nope.csv")),
            other => panic!("expected Io, got {:?}", other),
        }
    }
}
