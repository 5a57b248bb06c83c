//! Core module - takeoff model, name handling and multing

pub mod columns;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod multing;
pub mod normalize;
pub mod stub;
pub mod weights;

pub use columns::{is_blank, parse_number, split_line, ColumnIndex};
pub use config::{Config, ConfigError, Pricing};
pub use diagnostics::{Diagnostics, Notice};
pub use error::IngestError;
pub use model::{identity_key, Listing, Material, OrderedMap, Takeoff, TakeoffId, TakeoffModel};
pub use multing::{MultingPlan, StockBar, StockRules};
pub use normalize::normalize_name;
pub use stub::StubResolver;
pub use weights::WeightGroup;
