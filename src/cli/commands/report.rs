//! `stk report` command - pricing report
//!
//! The report is tab-separated text meant to be pasted into the estimating
//! spreadsheet at cell A1. Row numbers in the formulas depend on that: data
//! starts on row 3 and every printed line is one spreadsheet row.

use chrono::Local;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{format_float, format_lengths, format_opt_count, format_opt_float};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Pricing;
use crate::core::diagnostics::Diagnostics;
use crate::core::model::{Listing, Takeoff, TakeoffModel};

use super::{load_estimate, write_output, InputArgs, ModelDump};

/// Label cells sit in column F
const SPACING: &str = "\t\t\t\t\t";

const COUNT_COL: char = 'D';
const DATA_COL: char = 'G';
const DATA_COL_TWO: char = 'H';
const SF_COL: char = 'G';
const LF_COL: char = 'H';
const WEIGHT_COL: char = 'I';

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn run(args: ReportArgs, global: &GlobalOpts) -> Result<()> {
    let (estimate, config) = load_estimate(&args.input, global)?;

    let content = match global.format {
        OutputFormat::Json => {
            let dump = ModelDump {
                model: &estimate.model,
                diagnostics: &estimate.diagnostics,
            };
            let mut json = serde_json::to_string_pretty(&dump).into_diagnostic()?;
            json.push('\n');
            json
        }
        OutputFormat::Auto | OutputFormat::Tsv => {
            let date = Local::now().format("%Y-%m-%d").to_string();
            render_pricing(&estimate.model, &estimate.diagnostics, &config.pricing(), &date)
        }
    };

    write_output(&content, args.input.output)
}

/// First and last spreadsheet row of the section being printed
struct RowRange {
    start: usize,
    end: usize,
}

impl RowRange {
    fn at(row: usize) -> Self {
        Self { start: row, end: row }
    }
}

fn dnl_cell(takeoff: &Takeoff) -> &'static str {
    if takeoff.dnl {
        "DNL"
    } else {
        ""
    }
}

fn struct_row(takeoff: &Takeoff) -> String {
    [
        dnl_cell(takeoff).to_string(),
        takeoff.plan.clone(),
        takeoff.type_name.clone(),
        format_opt_count(takeoff.count),
        String::new(),
        takeoff.name.clone(),
        takeoff.description.clone(),
        format_opt_float(takeoff.lf),
        format_float(takeoff.weight),
    ]
    .join("\t")
}

fn deck_row(takeoff: &Takeoff) -> String {
    [
        dnl_cell(takeoff).to_string(),
        takeoff.plan.clone(),
        takeoff.type_name.clone(),
        format_opt_count(takeoff.count),
        String::new(),
        takeoff.description.clone(),
        format_opt_float(takeoff.sf),
        format_opt_float(takeoff.lf),
    ]
    .join("\t")
}

fn cxn_row(takeoff: &Takeoff) -> String {
    [
        dnl_cell(takeoff).to_string(),
        takeoff.plan.clone(),
        takeoff.type_name.clone(),
        format_opt_count(takeoff.count),
        String::new(),
        takeoff.name.clone(),
    ]
    .join("\t")
}

/// Render the pricing report
pub fn render_pricing(
    model: &TakeoffModel,
    diagnostics: &Diagnostics,
    pricing: &Pricing,
    date: &str,
) -> String {
    let mut out: Vec<String> = Vec::new();

    // Struct
    let mut range = RowRange::at(3);
    let mut initial_weight = 0.0;
    let mut previous: Option<(&str, &str)> = None;

    out.push("Struct".to_string());
    out.push("DNL\tPlan\tType\tEA\t\tName\tDescription\tLF\tWeight".to_string());
    for (_, takeoff) in model.takeoffs_in(Listing::Struct) {
        if let Some((plan, type_name)) = previous {
            if plan != takeoff.plan || type_name != takeoff.type_name {
                out.push(String::new());
                range.end += 1;
            }
        }
        initial_weight += takeoff.weight;
        out.push(struct_row(takeoff));
        if takeoff.row_count > 1 {
            out.push(format!("{}{}", SPACING, format_lengths(&takeoff.lengths)));
        }
        range.end += usize::from(takeoff.row_count);
        previous = Some((&takeoff.plan, &takeoff.type_name));
    }

    let drop_weight = model.total_drop_weight();
    let drop_percent = if initial_weight != 0.0 {
        100.0 * drop_weight / initial_weight
    } else {
        0.0
    };

    let e = range.end;
    out.push(String::new());
    out.push(format!(
        "{SPACING}Prelim Weight\t=SUM({WEIGHT_COL}{}:{WEIGHT_COL}{})\t{}",
        range.start, e, pricing.misc_factor
    ));
    out.push(format!(
        "{SPACING}Misc Weight\t=PRODUCT({DATA_COL}{0}:{DATA_COL_TWO}{0})",
        e + 1
    ));
    out.push(format!(
        "{SPACING}Drop Weight\t{}\t({:.2}%)",
        format_float(drop_weight),
        drop_percent
    ));
    out.push(format!(
        "{SPACING}Final Weight\t=SUM({DATA_COL}{}:{DATA_COL}{})\t{}",
        e + 1,
        e + 3,
        pricing.struct_price_factor
    ));
    out.push(format!(
        "{SPACING}Struct Price\t=PRODUCT({DATA_COL}{0}:{DATA_COL_TWO}{0})",
        e + 4
    ));

    let mut grand_total = format!("={DATA_COL}{}", e + 5);
    range = RowRange::at(e + 6);

    // Decking
    if !model.listing(Listing::Deck).is_empty() {
        out.push(String::new());
        out.push("Decking".to_string());
        out.push("DNL\tPlan\tType\tEA\t\tName\tSF\tLF".to_string());

        range = RowRange::at(range.end + 3);
        for (_, takeoff) in model.takeoffs_in(Listing::Deck) {
            out.push(deck_row(takeoff));
            range.end += 1;
        }

        let e = range.end;
        out.push(String::new());
        out.push(format!(
            "{SPACING}Total SF\t=SUM({SF_COL}{}:{SF_COL}{})\t{}",
            range.start, e, pricing.decking_price_factor
        ));
        out.push(format!(
            "{SPACING}Decking Subtotal\t=PRODUCT({DATA_COL}{0}:{DATA_COL_TWO}{0})",
            e + 1
        ));
        out.push(format!(
            "{SPACING}Total LF\t=SUM({LF_COL}{}:{LF_COL}{})\t{}",
            range.start, e, pricing.safety_line_price_factor
        ));
        out.push(format!(
            "{SPACING}Safety Line Subtotal\t=PRODUCT({DATA_COL}{0}:{DATA_COL_TWO}{0})",
            e + 3
        ));
        out.push(format!(
            "{SPACING}Decking Total\t={DATA_COL}{}+{DATA_COL}{}",
            e + 2,
            e + 4
        ));

        grand_total.push_str(&format!("+{DATA_COL}{}", e + 5));
        range = RowRange::at(e + 6);
    }

    // MF labor
    if !model.listing(Listing::Cxn).is_empty() {
        out.push(String::new());
        out.push("MF Labor".to_string());
        out.push("DNL\tPlan\tType\tEA\t\tName".to_string());

        range = RowRange::at(range.end + 3);
        for (_, takeoff) in model.takeoffs_in(Listing::Cxn) {
            out.push(cxn_row(takeoff));
            range.end += 1;
        }

        let e = range.end;
        out.push(String::new());
        out.push(format!(
            "{SPACING}Total Points\t=SUM({COUNT_COL}{}:{COUNT_COL}{})\t{}",
            range.start, e, pricing.mf_hours_per_point
        ));
        out.push(format!(
            "{SPACING}Total Hours\t=PRODUCT({DATA_COL}{0}:{DATA_COL_TWO}{0})\t{1}",
            e + 1,
            pricing.mf_labor_rate
        ));
        out.push(format!(
            "{SPACING}MF Labor Cost\t=PRODUCT({DATA_COL}{0}:{DATA_COL_TWO}{0})",
            e + 2
        ));

        grand_total.push_str(&format!("+{DATA_COL}{}", e + 3));
        range = RowRange::at(e + 4);
    }

    // Total, rounded up to the next 10 and pinned between 700 and 990 of
    // the thousand
    let total_cell = format!("{DATA_COL}{}", range.end + 1);
    let rounded = format!(
        "=MAX(MIN(ROUNDUP({0},-1),ROUNDDOWN({0},-3)+990),ROUNDDOWN({0},-3)+700)",
        total_cell
    );
    out.push(String::new());
    out.push(format!("{SPACING}Total Price\t{}\t{}", grand_total, rounded));

    out.push(String::new());
    out.push("Exclude:\tAny and all misc. steel, stairs, and handrails.".to_string());
    out.push("\tAESS Unless Otherwise Noted".to_string());
    out.push("Pages:".to_string());
    out.push(format!("Date:\t{}", date));

    out.push(String::new());
    out.extend(diagnostics.iter().map(|notice| notice.to_string()));

    let mut text = out.join("\n");
    text.push('\n');
    text
}
