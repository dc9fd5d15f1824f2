use std::path::Path;

use crate::topsis::*;

// Relative tolerance when comparing numeric cells against a reference table.
const REFERENCE_TOLERANCE: f64 = 1e-9;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Excel,
}

impl InputType {
    pub fn from_name(name: &str) -> CliResult<InputType> {
        match name {
            "csv" => Ok(InputType::Csv),
            "excel" | "xlsx" => Ok(InputType::Excel),
            x => UnknownInputTypeSnafu { input_type: x }.fail(),
        }
    }

    /// Excel for `.xlsx` files, CSV for everything else.
    pub fn infer(path: &str) -> InputType {
        match Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
        {
            Some(e) if e == "xlsx" => InputType::Excel,
            _ => InputType::Csv,
        }
    }
}

/// The output table: the original cells followed by the score and the rank.
pub fn scored_table(scored: &ScoredDataset) -> Dataset {
    let rows = scored
        .rows
        .iter()
        .map(|r| {
            let mut cells = r.cells.clone();
            cells.push(r.score.to_string());
            cells.push(r.rank.to_string());
            cells
        })
        .collect();
    Dataset::new(scored.output_header(), rows)
}

/// Compares two tables cell by cell. Cells that both read as numbers are
/// compared with a relative tolerance, all the others must be identical.
pub fn tables_match(expected: &Dataset, actual: &Dataset) -> bool {
    if expected.header != actual.header || expected.rows.len() != actual.rows.len() {
        debug!(
            "tables_match: shapes differ: {:?} {:?} vs {:?} {:?}",
            expected.header,
            expected.rows.len(),
            actual.header,
            actual.rows.len()
        );
        return false;
    }
    for (idx, (e_row, a_row)) in expected.rows.iter().zip(actual.rows.iter()).enumerate() {
        if e_row.len() != a_row.len() {
            debug!("tables_match: row {} has a different length", idx + 1);
            return false;
        }
        for (e, a) in e_row.iter().zip(a_row.iter()) {
            if !cells_match(e, a) {
                debug!("tables_match: row {}: {:?} vs {:?}", idx + 1, e, a);
                return false;
            }
        }
    }
    true
}

fn cells_match(expected: &str, actual: &str) -> bool {
    if expected == actual {
        return true;
    }
    match (expected.trim().parse::<f64>(), actual.trim().parse::<f64>()) {
        (Ok(e), Ok(a)) => {
            let scale = e.abs().max(a.abs()).max(1.0);
            (e - a).abs() <= REFERENCE_TOLERANCE * scale
        }
        _ => false,
    }
}
