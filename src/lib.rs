//! STK: Steel Takeoff Toolkit
//!
//! Merges the takeoff geometry and cost-by-type exports of a steel estimating
//! tool into one bill of materials, estimates drop weight with a greedy
//! stock-cutting pass, and renders pricing and weight reports.
//!
//! ```no_run
//! use std::path::Path;
//! use stk::core::Config;
//!
//! let estimate = stk::ingest::run_pipeline(
//!     Path::new("geometry.csv"),
//!     Path::new("cost.csv"),
//!     &Config::load(),
//! )?;
//! for material in estimate.model.materials().values() {
//!     println!("{}: {:.1} lb drop", material.name, material.drop_weight);
//! }
//! # Ok::<(), stk::core::IngestError>(())
//! ```

pub mod cli;
pub mod core;
pub mod ingest;
