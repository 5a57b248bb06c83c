//! Multing: greedy stock-cutting estimate of drop weight
//!
//! Piece lengths of a material are packed, longest first, into stock bars no
//! longer than `max_stock`. Every piece after the first in a bar costs one saw
//! kerf. Bars are bought in `stock_increment` steps and whatever is left over
//! is drop. This is the estimating heuristic, not an optimal cutting plan.

use serde::{Deserialize, Serialize};

use crate::core::model::{Material, TakeoffModel};

/// Stock and saw parameters, in feet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockRules {
    pub max_stock: f64,
    pub kerf: f64,
    pub stock_increment: f64,
}

impl Default for StockRules {
    fn default() -> Self {
        Self {
            max_stock: 65.0,
            kerf: 0.25,
            stock_increment: 5.0,
        }
    }
}

/// One purchased stock bar and the pieces cut from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockBar {
    pieces: Vec<f64>,
    kerf: f64,
    total: f64,
}

impl StockBar {
    fn new(length: f64, kerf: f64) -> Self {
        Self {
            pieces: vec![length],
            kerf,
            total: length,
        }
    }

    fn push_cut(&mut self, length: f64) {
        self.total += self.kerf;
        self.total += length;
        self.pieces.push(length);
    }

    pub fn pieces(&self) -> &[f64] {
        &self.pieces
    }

    /// Kerf charged in this bar
    pub fn kerf_length(&self) -> f64 {
        self.kerf * (self.pieces.len() - 1) as f64
    }

    /// Pieces plus kerf
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Length bought: the total rounded up to the next increment
    pub fn stock_length(&self, increment: f64) -> f64 {
        (self.total / increment).ceil() * increment
    }

    pub fn drop_length(&self, increment: f64) -> f64 {
        self.stock_length(increment) - self.total
    }
}

/// Bar layout for one material
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultingPlan {
    pub bars: Vec<StockBar>,
    pub stock_increment: f64,
}

impl MultingPlan {
    pub fn total_drop_length(&self) -> f64 {
        self.bars
            .iter()
            .map(|bar| bar.drop_length(self.stock_increment))
            .sum()
    }

    pub fn total_stock_length(&self) -> f64 {
        self.bars
            .iter()
            .map(|bar| bar.stock_length(self.stock_increment))
            .sum()
    }

    pub fn piece_count(&self) -> usize {
        self.bars.iter().map(|bar| bar.pieces.len()).sum()
    }
}

/// Pack piece lengths into stock bars, longest piece first
pub fn pack(lengths: &[f64], rules: &StockRules) -> MultingPlan {
    let mut sorted = lengths.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut bars = Vec::new();
    let mut open: Option<StockBar> = None;

    for length in sorted {
        // Oversized pieces are special-ordered on their own
        if length > rules.max_stock {
            bars.extend(open.take());
            bars.push(StockBar::new(length, rules.kerf));
            continue;
        }

        let fits = matches!(
            &open,
            Some(bar) if bar.total + rules.kerf + length <= rules.max_stock
        );
        if fits {
            if let Some(bar) = open.as_mut() {
                bar.push_cut(length);
            }
        } else if let Some(full) = open.replace(StockBar::new(length, rules.kerf)) {
            bars.push(full);
        }
    }
    bars.extend(open);

    MultingPlan {
        bars,
        stock_increment: rules.stock_increment,
    }
}

/// Bar layout for a material of the model
pub fn plan_for(model: &TakeoffModel, material: &Material, rules: &StockRules) -> MultingPlan {
    pack(&model.material_lengths(material), rules)
}

/// Assign drop weight and purchased stock length to every material
pub fn apply(model: &mut TakeoffModel, rules: &StockRules) {
    let plans: Vec<MultingPlan> = model
        .materials()
        .values()
        .map(|material| plan_for(model, material, rules))
        .collect();

    for ((_, material), plan) in model.materials_mut().iter_mut().zip(plans) {
        material.drop_weight = material.weight_per_foot * plan.total_drop_length();
        material.stock_length = plan.total_stock_length();
    }
}
