//! `stk materials` command - material rollup with multing results

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{format_float, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::model::TakeoffModel;
use crate::core::multing::{plan_for, MultingPlan, StockRules};

use super::{load_estimate, print_diagnostics, write_output, InputArgs};

const HEADER: [&str; 9] = [
    "Material", "LF", "Weight", "Lb/Ft", "Pieces", "Bars", "Stock LF", "Drop LF", "Drop Wt",
];

#[derive(clap::Args, Debug)]
pub struct MaterialsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// One material with the bar layout that produced its drop weight
#[derive(Debug, Serialize)]
pub struct MaterialSummary<'a> {
    pub name: &'a str,
    pub takeoffs: Vec<&'a str>,
    pub lf: f64,
    pub weight: f64,
    pub weight_per_foot: f64,
    pub drop_weight: f64,
    pub stock_length: f64,
    pub plan: MultingPlan,
}

impl MaterialSummary<'_> {
    fn cells(&self) -> [String; 9] {
        [
            self.name.to_string(),
            format_float(self.lf),
            format_float(self.weight),
            format!("{:.2}", self.weight_per_foot),
            self.plan.piece_count().to_string(),
            self.plan.bars.len().to_string(),
            format_float(self.stock_length),
            format_float(self.plan.total_drop_length()),
            format!("{:.1}", self.drop_weight),
        ]
    }
}

pub fn summarize<'a>(model: &'a TakeoffModel, rules: &StockRules) -> Vec<MaterialSummary<'a>> {
    model
        .materials()
        .iter()
        .map(|(name, material)| MaterialSummary {
            name,
            takeoffs: material.takeoffs.keys().collect(),
            lf: material.lf,
            weight: material.weight,
            weight_per_foot: material.weight_per_foot,
            drop_weight: material.drop_weight,
            stock_length: material.stock_length,
            plan: plan_for(model, material, rules),
        })
        .collect()
}

pub fn run(args: MaterialsArgs, global: &GlobalOpts) -> Result<()> {
    let (estimate, config) = load_estimate(&args.input, global)?;
    let summaries = summarize(&estimate.model, &config.stock_rules());

    let content = match global.format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&summaries).into_diagnostic()?;
            json.push('\n');
            json
        }
        OutputFormat::Tsv => render_tsv(&summaries),
        OutputFormat::Auto => render_table(&summaries),
    };

    write_output(&content, args.input.output)?;
    print_diagnostics(&estimate.diagnostics, global);
    Ok(())
}

pub fn render_tsv(summaries: &[MaterialSummary<'_>]) -> String {
    let mut out = vec![HEADER.join("\t")];
    out.extend(summaries.iter().map(|s| s.cells().join("\t")));
    let mut text = out.join("\n");
    text.push('\n');
    text
}

pub fn render_table(summaries: &[MaterialSummary<'_>]) -> String {
    let mut builder = Builder::default();
    builder.push_record(HEADER);
    for summary in summaries {
        let mut cells = summary.cells();
        cells[0] = truncate_str(&cells[0], 30);
        builder.push_record(cells);
    }
    let mut text = builder.build().with(Style::markdown()).to_string();
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::diagnostics::Diagnostics;
    use crate::core::multing;
    use crate::ingest::{ingest_cost, ingest_geometry};

    fn model() -> TakeoffModel {
        let config = Config::default();
        let mut diagnostics = Diagnostics::new();
        let geometry = "Plan Name,Type,Name,Description,SF,LF,EA
P1,Beam,W12x50,,0,100,4
,,Name,Description,SF,LF,EA
,,,,,40,
,,,,,30,
,,,,,20,
,,,,,10,
";
        let mut model = ingest_geometry(geometry.as_bytes(), &config, &mut diagnostics).unwrap();
        let cost = "Material\nPlan Name,Type,Name,Qty\nP1,Beam,W12x50,5000\n";
        ingest_cost(&mut model, cost.as_bytes(), &config, &mut diagnostics).unwrap();
        multing::apply(&mut model, &config.stock_rules());
        model
    }

    #[test]
    fn test_summary_matches_multing() {
        let model = model();
        let summaries = summarize(&model, &StockRules::default());

        assert_eq!(summaries.len(), 1);
        let s = &summaries[0];
        assert_eq!(s.name, "W 12x50");
        assert_eq!(s.takeoffs, vec!["P1|Beam|W12x50"]);
        assert_eq!(s.plan.bars.len(), 2);
        assert_eq!(s.plan.piece_count(), 4);
        assert_eq!(s.stock_length, 105.0);
        assert_eq!(s.drop_weight, 225.0);
    }

    #[test]
    fn test_tsv_rows() {
        let model = model();
        let text = render_tsv(&summarize(&model, &StockRules::default()));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Material\tLF\tWeight\tLb/Ft\tPieces\tBars\tStock LF\tDrop LF\tDrop Wt");
        assert_eq!(lines[1], "W 12x50\t100.0\t5000.0\t50.00\t4\t2\t105.0\t4.5\t225.0");
    }

    #[test]
    fn test_table_has_header_and_material() {
        let model = model();
        let text = render_table(&summarize(&model, &StockRules::default()));
        assert!(text.contains("Drop Wt"));
        assert!(text.contains("W 12x50"));
    }
}
