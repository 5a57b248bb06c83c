//! `stk weights` command - shop weight list

use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::format_float;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::diagnostics::Diagnostics;
use crate::core::model::{Listing, TakeoffModel};
use crate::core::weights::{weight_list, WeightGroup};

use super::{load_estimate, write_output, InputArgs};

#[derive(clap::Args, Debug)]
pub struct WeightsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Weight groups of one structural takeoff
#[derive(Debug, Serialize)]
pub struct TakeoffWeights<'a> {
    pub key: &'a str,
    pub plan: &'a str,
    #[serde(rename = "type")]
    pub type_name: &'a str,
    pub groups: Vec<WeightGroup>,
}

/// Weight groups for every structural takeoff with at least one piece
pub fn collect_weights<'a>(model: &'a TakeoffModel, dnl_types: &[String]) -> Vec<TakeoffWeights<'a>> {
    model
        .takeoffs_in(Listing::Struct)
        .map(|(key, takeoff)| TakeoffWeights {
            key,
            plan: &takeoff.plan,
            type_name: &takeoff.type_name,
            groups: weight_list(takeoff, dnl_types),
        })
        .filter(|entry| !entry.groups.is_empty())
        .collect()
}

pub fn run(args: WeightsArgs, global: &GlobalOpts) -> Result<()> {
    let (estimate, config) = load_estimate(&args.input, global)?;
    let weights = collect_weights(&estimate.model, &config.dnl_types());

    let content = match global.format {
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Dump<'a> {
                takeoffs: &'a [TakeoffWeights<'a>],
                diagnostics: &'a Diagnostics,
            }
            let mut json = serde_json::to_string_pretty(&Dump {
                takeoffs: &weights,
                diagnostics: &estimate.diagnostics,
            })
            .into_diagnostic()?;
            json.push('\n');
            json
        }
        OutputFormat::Auto | OutputFormat::Tsv => render_weights(&weights, &estimate.diagnostics),
    };

    write_output(&content, args.input.output)
}

/// Tab-separated weight list, notices at the end
pub fn render_weights(weights: &[TakeoffWeights<'_>], diagnostics: &Diagnostics) -> String {
    let mut out = vec!["Qty\t\tDescription\tLength\tWeight".to_string()];
    for group in weights.iter().flat_map(|entry| &entry.groups) {
        out.push(format!(
            "{}\t\t{}\t{}\t{}\t{}",
            group.quantity,
            group.name,
            group.length_label,
            group.weight,
            format_float(group.weight_per_foot)
        ));
    }

    out.push(String::new());
    out.extend(diagnostics.iter().map(|notice| notice.to_string()));

    let mut text = out.join("\n");
    text.push('\n');
    text
}
