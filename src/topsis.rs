use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use topsis_core::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::topsis::config_reader::*;
use crate::topsis::io_common::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
pub enum TopsisCliError {
    #[snafu(display("Error opening CSV file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing CSV output"))]
    WritingCsv { source: csv::Error },
    #[snafu(display("The table {path} has no header row"))]
    EmptyTable { path: String },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Excel line {lineno}: could not understand cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error serializing the JSON summary"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Missing setting {name}: pass it on the command line or in the configuration file"))]
    MissingSetting { name: String },
    #[snafu(display("Unknown input type {input_type:?} (expected csv or excel)"))]
    UnknownInputType { input_type: String },
    #[snafu(display("Could not score the table"))]
    Scoring { source: TopsisError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type CliResult<T> = Result<T, TopsisCliError>;

/// Everything needed for one run, after merging the command line and the configuration file.
#[derive(PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub input_path: String,
    pub input_type: InputType,
    pub excel_worksheet_name: Option<String>,
    pub weights: String,
    pub impacts: String,
    pub out: Option<String>,
    pub summary: Option<String>,
    pub reference: Option<String>,
    pub rules: TopsisRules,
}

/// Reads the configuration file if any, lets the command line override it and runs.
pub fn run_from_args(args: &Args) -> CliResult<ScoredDataset> {
    let settings = settings_from_args(args)?;
    run_settings(&settings)
}

fn settings_from_args(args: &Args) -> CliResult<RunSettings> {
    let (config, root): (Option<TopsisConfig>, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root = Path::new(config_path)
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default();
            (Some(config), root)
        }
        None => (None, PathBuf::new()),
    };
    let in_root = |p: &String| -> String { root.join(p).display().to_string() };

    let input_path: String = match (&args.input, &config) {
        (Some(p), _) => p.clone(),
        (None, Some(c)) => in_root(&c.input.file_path),
        (None, None) => {
            return MissingSettingSnafu { name: "input" }.fail();
        }
    };

    let input_type_name: Option<String> = args
        .input_type
        .clone()
        .or_else(|| config.as_ref().and_then(|c| c.input.provider.clone()));
    let input_type = match input_type_name {
        Some(name) => InputType::from_name(&name)?,
        None => InputType::infer(&input_path),
    };

    let weights: String = match (&args.weights, &config) {
        (Some(w), _) => Some(w.clone()),
        (None, Some(c)) => c.weights_spec()?,
        (None, None) => None,
    }
    .context(MissingSettingSnafu { name: "weights" })?;

    let impacts: String = match (&args.impacts, &config) {
        (Some(i), _) => Some(i.clone()),
        (None, Some(c)) => c.impacts_spec()?,
        (None, None) => None,
    }
    .context(MissingSettingSnafu { name: "impacts" })?;

    let output = config.as_ref().and_then(|c| c.output.clone());
    let out = args.out.clone().or_else(|| {
        output
            .as_ref()
            .and_then(|o| o.file_path.as_ref())
            .map(|p| in_root(p))
    });
    let summary = args.summary.clone().or_else(|| {
        output
            .as_ref()
            .and_then(|o| o.summary_path.as_ref())
            .map(|p| in_root(p))
    });

    let rules = match (args.fallback_score, &config) {
        (Some(x), _) => TopsisRules {
            degenerate_policy: DegenerateScorePolicy::Fallback(x),
        },
        (None, Some(TopsisConfig { rules: Some(r), .. })) => r.rules()?,
        (None, _) => TopsisRules::DEFAULT_RULES,
    };

    Ok(RunSettings {
        input_path,
        input_type,
        excel_worksheet_name: args.excel_worksheet_name.clone().or_else(|| {
            config
                .as_ref()
                .and_then(|c| c.input.excel_worksheet_name.clone())
        }),
        weights,
        impacts,
        out,
        summary,
        reference: args.reference.clone(),
        rules,
    })
}

fn read_table(settings: &RunSettings) -> CliResult<Dataset> {
    info!(
        "Attempting to read {:?} file {:?}",
        settings.input_type, settings.input_path
    );
    match settings.input_type {
        InputType::Csv => io_csv::read_csv_table(&settings.input_path),
        InputType::Excel => io_excel::read_excel_table(
            &settings.input_path,
            settings.excel_worksheet_name.as_deref(),
        ),
    }
}

pub fn run_settings(settings: &RunSettings) -> CliResult<ScoredDataset> {
    debug!("run_settings: {:?}", settings);
    let dataset = read_table(settings)?;
    info!(
        "Read {} rows with columns {:?}",
        dataset.rows.len(),
        dataset.header
    );

    let weights = parse_weights(&settings.weights).context(ScoringSnafu {})?;
    let impacts = parse_impacts(&settings.impacts).context(ScoringSnafu {})?;
    let scored =
        run_topsis(&dataset, &weights, &impacts, &settings.rules).context(ScoringSnafu {})?;

    let table = scored_table(&scored);
    match settings.out.as_deref() {
        None | Some("stdout") => {
            io_csv::write_table(std::io::stdout(), &table)?;
        }
        Some(path) => {
            let f = fs::File::create(path).context(WritingFileSnafu { path })?;
            io_csv::write_table(f, &table)?;
            info!("Wrote the scored table to {:?}", path);
        }
    }

    if let Some(path) = settings.summary.as_deref() {
        let js = build_summary_js(settings, &scored);
        let pretty_js = serde_json::to_string_pretty(&js).context(WritingJsonSnafu {})?;
        fs::write(path, pretty_js).context(WritingFileSnafu { path })?;
        info!("Wrote the summary to {:?}", path);
    }

    // The reference table, if provided for comparison
    if let Some(reference_path) = settings.reference.as_deref() {
        let reference = io_csv::read_csv_table(reference_path)?;
        if !tables_match(&reference, &table) {
            warn!("Found differences with the reference table {}", reference_path);
            let reference_txt = io_csv::table_to_string(&reference)?;
            let computed_txt = io_csv::table_to_string(&table)?;
            print_diff(reference_txt.as_str(), computed_txt.as_str(), "\n");
            whatever!("Difference detected between the computed table and the reference table")
        }
        info!("The computed table matches the reference {}", reference_path);
    }

    Ok(scored)
}

fn build_summary_js(settings: &RunSettings, scored: &ScoredDataset) -> JSValue {
    let criteria: Vec<JSValue> = scored
        .header
        .iter()
        .skip(1)
        .enumerate()
        .map(|(idx, name)| {
            json!({
                "name": name,
                "weight": scored.weights[idx],
                "impact": scored.impacts[idx].symbol(),
                "idealBest": scored.ideal_best[idx],
                "idealWorst": scored.ideal_worst[idx],
            })
        })
        .collect();
    let results: Vec<JSValue> = scored
        .rows
        .iter()
        .map(|r| json!({"id": r.id(), "score": r.score, "rank": r.rank}))
        .collect();
    json!({
        "config": {
            "input": settings.input_path,
            "weights": settings.weights,
            "impacts": settings.impacts,
        },
        "criteria": criteria,
        "results": results,
    })
}
