mod config;
pub mod builder;
pub mod manual;

use log::{debug, info, warn};

use std::cmp::Ordering;

pub use crate::config::*;

// **** Private structures ****

// Dense row-major matrix: rows are alternatives, columns are criteria.
#[derive(PartialEq, Debug, Clone)]
struct Matrix {
    num_rows: usize,
    num_cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    fn zeros(num_rows: usize, num_cols: usize) -> Matrix {
        Matrix {
            num_rows,
            num_cols,
            data: vec![0.0; num_rows * num_cols],
        }
    }

    fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.num_cols + col]
    }

    fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.num_cols + col] = value;
    }

    fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.num_cols..(row + 1) * self.num_cols]
    }

    fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        (0..self.num_rows).map(move |row| self.get(row, col))
    }
}

// The reference points of each criterion, in the weighted normalized space.
#[derive(PartialEq, Debug, Clone)]
struct IdealPoints {
    best: Vec<f64>,
    worst: Vec<f64>,
}

/// Parses a comma-delimited list of weights, such as `"1,1,2"`.
///
/// Only the syntax is checked here. Negative weights and zero sums are
/// rejected when the weights are used.
pub fn parse_weights(spec: &str) -> Result<Vec<f64>, TopsisError> {
    let mut res: Vec<f64> = Vec::new();
    for (idx, token) in spec.split(',').enumerate() {
        let t = token.trim();
        match t.parse::<f64>() {
            Ok(x) => res.push(x),
            Err(_) => {
                return Err(TopsisError::Parse {
                    location: Location::Weight { position: idx + 1 },
                    content: t.to_string(),
                });
            }
        }
    }
    debug!("parse_weights: {:?} -> {:?}", spec, res);
    Ok(res)
}

/// Parses a comma-delimited list of impacts, such as `"+,-,+"`.
pub fn parse_impacts(spec: &str) -> Result<Vec<Impact>, TopsisError> {
    let mut res: Vec<Impact> = Vec::new();
    for (idx, token) in spec.split(',').enumerate() {
        let t = token.trim();
        match Impact::from_symbol(t) {
            Some(impact) => res.push(impact),
            None => {
                return Err(TopsisError::Validation {
                    field: "impacts".to_string(),
                    reason: format!("impact #{} is {:?}, expected '+' or '-'", idx + 1, t),
                });
            }
        }
    }
    debug!("parse_impacts: {:?} -> {:?}", spec, res);
    Ok(res)
}

/// Scores a dataset from the textual weight and impact specifications,
/// with the default rules.
///
/// ```
/// use topsis_core::{compute, Dataset};
///
/// let header = vec!["Model".to_string(), "Speed".to_string(), "Cost".to_string()];
/// let rows: Vec<Vec<String>> = [["A", "1", "8"], ["B", "2", "6"], ["C", "3", "4"]]
///     .iter()
///     .map(|r| r.iter().map(|s| s.to_string()).collect())
///     .collect();
///
/// let res = compute(&Dataset::new(header, rows), "1,1", "+,-")?;
/// assert_eq!(res.ranks(), vec![3, 2, 1]);
/// # Ok::<(), topsis_core::TopsisError>(())
/// ```
pub fn compute(
    dataset: &Dataset,
    weight_spec: &str,
    impact_spec: &str,
) -> Result<ScoredDataset, TopsisError> {
    let weights = parse_weights(weight_spec)?;
    let impacts = parse_impacts(impact_spec)?;
    run_topsis(dataset, &weights, &impacts, &TopsisRules::DEFAULT_RULES)
}

/// Runs the TOPSIS algorithm over a dataset.
///
/// Arguments:
/// * `dataset` the table to score. The first column is carried through untouched.
/// * `weights` one non-negative weight per criterion. They do not need to sum to 1.
/// * `impacts` one direction per criterion.
/// * `rules` the policies for this run.
///
/// The rows of the result are in the same order as the rows of the input.
pub fn run_topsis(
    dataset: &Dataset,
    weights: &[f64],
    impacts: &[Impact],
    rules: &TopsisRules,
) -> Result<ScoredDataset, TopsisError> {
    info!(
        "Processing {:?} alternatives, criteria: {:?}, rules: {:?}",
        dataset.rows.len(),
        dataset.criteria_names(),
        rules
    );

    check_schema(dataset)?;
    check_lengths(dataset.criteria_names().len(), weights, impacts)?;
    check_rules(rules)?;

    let matrix = extract_matrix(dataset)?;
    let norm_weights = normalize_weights(weights)?;
    info!("Normalized weights: {:?}", norm_weights);

    let normalized = vector_normalize(&matrix);
    let weighted = apply_weights(&normalized, &norm_weights);
    let ideal = ideal_points(&weighted, impacts);
    info!("Ideal best: {:?}", ideal.best);
    info!("Ideal worst: {:?}", ideal.worst);

    let mut scores: Vec<f64> = Vec::with_capacity(matrix.num_rows);
    for row in 0..weighted.num_rows {
        let values = weighted.row(row);
        let dist_best = euclidean_distance(values, &ideal.best);
        let dist_worst = euclidean_distance(values, &ideal.worst);
        debug!(
            "run_topsis: row {:?}: dist_best: {:?} dist_worst: {:?}",
            row + 1,
            dist_best,
            dist_worst
        );
        let score = closeness(dist_best, dist_worst).or_else(|| {
            match rules.degenerate_policy {
                DegenerateScorePolicy::Reject => None,
                DegenerateScorePolicy::Fallback(x) => {
                    warn!(
                        "Row {} ({:?}) is at zero distance of both ideal points, using fallback score {}",
                        row + 1,
                        dataset.rows[row][0],
                        x
                    );
                    Some(x)
                }
            }
        });
        match score {
            Some(s) => scores.push(s),
            None => {
                return Err(TopsisError::Degenerate {
                    row: row + 1,
                    id: dataset.rows[row][0].clone(),
                });
            }
        }
    }

    let ranks = competition_ranks(&scores);

    let rows: Vec<ScoredRow> = dataset
        .rows
        .iter()
        .zip(scores.iter().zip(ranks.iter()))
        .map(|(cells, (score, rank))| ScoredRow {
            cells: cells.clone(),
            score: *score,
            rank: *rank,
        })
        .collect();

    for r in rows.iter() {
        info!("{:>4} {:.6} {}", r.rank, r.score, r.id());
    }

    Ok(ScoredDataset {
        header: dataset.header.clone(),
        rows,
        weights: norm_weights,
        impacts: impacts.to_vec(),
        ideal_best: ideal.best,
        ideal_worst: ideal.worst,
    })
}

fn check_schema(dataset: &Dataset) -> Result<(), TopsisError> {
    let num_cols = dataset.header.len();
    if num_cols < 3 {
        return Err(TopsisError::Schema {
            reason: format!(
                "expected at least 3 columns (an identifier and 2 criteria), found {}",
                num_cols
            ),
        });
    }
    // The output appends these columns, the names must stay unique.
    for name in dataset.header.iter() {
        if name == SCORE_COLUMN || name == RANK_COLUMN {
            return Err(TopsisError::Schema {
                reason: format!(
                    "the input already has a {:?} column, this name is reserved for the output",
                    name
                ),
            });
        }
    }
    if dataset.rows.is_empty() {
        return Err(TopsisError::Schema {
            reason: "the dataset has no alternatives".to_string(),
        });
    }
    for (idx, row) in dataset.rows.iter().enumerate() {
        if row.len() != num_cols {
            return Err(TopsisError::Schema {
                reason: format!(
                    "row {} has {} columns, the header has {}",
                    idx + 1,
                    row.len(),
                    num_cols
                ),
            });
        }
    }
    Ok(())
}

fn check_lengths(
    num_criteria: usize,
    weights: &[f64],
    impacts: &[Impact],
) -> Result<(), TopsisError> {
    if weights.len() != impacts.len() || weights.len() != num_criteria {
        return Err(TopsisError::Schema {
            reason: format!(
                "lengths disagree: {} weights, {} impacts, {} criterion columns",
                weights.len(),
                impacts.len(),
                num_criteria
            ),
        });
    }
    Ok(())
}

fn check_rules(rules: &TopsisRules) -> Result<(), TopsisError> {
    match rules.degenerate_policy {
        DegenerateScorePolicy::Fallback(x) if !(0.0..=1.0).contains(&x) => {
            Err(TopsisError::Validation {
                field: "fallbackScore".to_string(),
                reason: format!("{} is not in [0, 1]", x),
            })
        }
        _ => Ok(()),
    }
}

// Reads every criterion cell. Non-finite numbers (NaN, inf) are refused as well.
fn extract_matrix(dataset: &Dataset) -> Result<Matrix, TopsisError> {
    let criteria = dataset.criteria_names();
    let mut m = Matrix::zeros(dataset.rows.len(), criteria.len());
    for (row_idx, row) in dataset.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().skip(1).enumerate() {
            let value = match cell.trim().parse::<f64>() {
                Ok(x) if x.is_finite() => x,
                _ => {
                    return Err(TopsisError::Parse {
                        location: Location::Cell {
                            row: row_idx + 1,
                            column: criteria[col_idx].clone(),
                        },
                        content: cell.clone(),
                    });
                }
            };
            m.set(row_idx, col_idx, value);
        }
    }
    debug!("extract_matrix: {:?}", m);
    Ok(m)
}

fn normalize_weights(weights: &[f64]) -> Result<Vec<f64>, TopsisError> {
    for (idx, w) in weights.iter().enumerate() {
        if !w.is_finite() || *w < 0.0 {
            return Err(TopsisError::Validation {
                field: "weights".to_string(),
                reason: format!(
                    "weight #{} is {}, weights must be finite and non-negative",
                    idx + 1,
                    w
                ),
            });
        }
    }
    // Rescaled by the largest weight first, the sum cannot overflow.
    let max = weights.iter().cloned().fold(0.0, f64::max);
    if max == 0.0 {
        return Err(TopsisError::Validation {
            field: "weights".to_string(),
            reason: "the weights sum to zero".to_string(),
        });
    }
    let scaled: Vec<f64> = weights.iter().map(|w| w / max).collect();
    let total: f64 = scaled.iter().sum();
    Ok(scaled.iter().map(|w| w / total).collect())
}

fn vector_normalize(matrix: &Matrix) -> Matrix {
    let mut res = Matrix::zeros(matrix.num_rows, matrix.num_cols);
    for col in 0..matrix.num_cols {
        let max_abs = matrix.column(col).fold(0.0, |acc: f64, x| acc.max(x.abs()));
        // An all-zero column stays at zero.
        if max_abs == 0.0 {
            debug!("vector_normalize: column {:?} is all zero", col);
            continue;
        }
        // Values are divided by the largest magnitude before squaring, so
        // that neither huge nor tiny columns overflow or vanish.
        let scaled_norm = matrix
            .column(col)
            .map(|x| (x / max_abs) * (x / max_abs))
            .sum::<f64>()
            .sqrt();
        debug!(
            "vector_normalize: column {:?} norm: {:?} x {:?}",
            col, max_abs, scaled_norm
        );
        for row in 0..matrix.num_rows {
            res.set(row, col, (matrix.get(row, col) / max_abs) / scaled_norm);
        }
    }
    res
}

fn apply_weights(matrix: &Matrix, weights: &[f64]) -> Matrix {
    let mut res = matrix.clone();
    for row in 0..res.num_rows {
        for (col, w) in weights.iter().enumerate() {
            res.set(row, col, matrix.get(row, col) * w);
        }
    }
    res
}

fn ideal_points(matrix: &Matrix, impacts: &[Impact]) -> IdealPoints {
    let mut best: Vec<f64> = Vec::with_capacity(matrix.num_cols);
    let mut worst: Vec<f64> = Vec::with_capacity(matrix.num_cols);
    for (col, impact) in impacts.iter().enumerate() {
        let max = matrix.column(col).fold(f64::NEG_INFINITY, f64::max);
        let min = matrix.column(col).fold(f64::INFINITY, f64::min);
        match impact {
            Impact::Maximize => {
                best.push(max);
                worst.push(min);
            }
            Impact::Minimize => {
                best.push(min);
                worst.push(max);
            }
        }
    }
    IdealPoints { best, worst }
}

fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

// None when the row is at zero distance of both ideal points.
fn closeness(dist_best: f64, dist_worst: f64) -> Option<f64> {
    let total = dist_best + dist_worst;
    if total == 0.0 {
        None
    } else {
        Some(dist_worst / total)
    }
}

/// Competition ranking, highest score first.
///
/// Tied scores all receive the largest rank of their group: the rank of a
/// score is the number of scores greater than or equal to it.
fn competition_ranks(scores: &[f64]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|a, b| {
        scores[*b]
            .partial_cmp(&scores[*a])
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks: Vec<u32> = vec![0; scores.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        for idx in order[start..end].iter() {
            ranks[*idx] = end as u32;
        }
        start = end;
    }
    ranks
}
