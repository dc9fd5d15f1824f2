// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Name of the score column appended to the output table.
pub const SCORE_COLUMN: &str = "Score";
/// Name of the rank column appended to the output table.
pub const RANK_COLUMN: &str = "Rank";

/// A raw table, as read from a file.
///
/// The first column identifies the alternative and is never interpreted.
/// All the other columns are criteria and must hold real numbers.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Dataset {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Dataset {
        Dataset { header, rows }
    }

    /// The names of the criterion columns (everything after the identifier).
    pub fn criteria_names(&self) -> &[String] {
        if self.header.is_empty() {
            &[]
        } else {
            &self.header[1..]
        }
    }
}

/// The direction of a criterion.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Impact {
    /// A benefit criterion, written `+`.
    Maximize,
    /// A cost criterion, written `-`.
    Minimize,
}

impl Impact {
    pub fn symbol(&self) -> &'static str {
        match self {
            Impact::Maximize => "+",
            Impact::Minimize => "-",
        }
    }

    pub fn from_symbol(s: &str) -> Option<Impact> {
        match s {
            "+" => Some(Impact::Maximize),
            "-" => Some(Impact::Minimize),
            _ => None,
        }
    }
}

// ******** Output data structures *********

/// One row of the output: the original cells, untouched, and the outcome.
#[derive(PartialEq, Debug, Clone)]
pub struct ScoredRow {
    pub cells: Vec<String>,
    pub score: f64,
    pub rank: u32,
}

impl ScoredRow {
    pub fn id(&self) -> &str {
        self.cells.first().map(|s| s.as_str()).unwrap_or("")
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct ScoredDataset {
    pub header: Vec<String>,
    pub rows: Vec<ScoredRow>,
    /// The weights after normalization, summing to 1.
    pub weights: Vec<f64>,
    pub impacts: Vec<Impact>,
    pub ideal_best: Vec<f64>,
    pub ideal_worst: Vec<f64>,
}

impl ScoredDataset {
    /// The input header followed by the score and rank columns.
    ///
    /// The input header never contains these names: such datasets are
    /// rejected before scoring.
    pub fn output_header(&self) -> Vec<String> {
        let mut h = self.header.clone();
        h.push(SCORE_COLUMN.to_string());
        h.push(RANK_COLUMN.to_string());
        h
    }

    pub fn scores(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.score).collect()
    }

    pub fn ranks(&self) -> Vec<u32> {
        self.rows.iter().map(|r| r.rank).collect()
    }
}

/// Where a value that failed to parse was found.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Location {
    /// A cell of the dataset. The row index starts at 1 and does not count the header.
    Cell { row: usize, column: String },
    /// A position in the weight list, starting at 1.
    Weight { position: usize },
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Cell { row, column } => write!(f, "row {} column {:?}", row, column),
            Location::Weight { position } => write!(f, "weight #{}", position),
        }
    }
}

/// Errors that prevent the algorithm from completing successfully.
///
/// All of them are detected before any score is produced.
#[derive(PartialEq, Debug, Clone)]
pub enum TopsisError {
    /// The shape of the inputs is wrong: too few columns, ragged rows,
    /// or lengths of the weights, impacts and criteria that disagree.
    Schema { reason: String },
    /// A value could not be read as a real number.
    Parse { location: Location, content: String },
    /// A well-formed value that is not acceptable (impact symbol, negative weight, ...).
    Validation { field: String, reason: String },
    /// The score of a row is undefined: it is at zero distance of both ideal points.
    Degenerate { row: usize, id: String },
}

impl Error for TopsisError {}

impl Display for TopsisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopsisError::Schema { reason } => write!(f, "SchemaError: {}", reason),
            TopsisError::Parse { location, content } => {
                write!(f, "ParseError: {}: {:?} is not a number", location, content)
            }
            TopsisError::Validation { field, reason } => {
                write!(f, "ValidationError: {}: {}", field, reason)
            }
            TopsisError::Degenerate { row, id } => write!(
                f,
                "DegenerateInputError: row {} ({:?}) coincides with both the ideal best and the ideal worst",
                row, id
            ),
        }
    }
}

// ********* Configuration **********

/// What to do with a row whose distances to both ideal points are zero.
///
/// This only happens when every criterion is constant over the dataset
/// (a single row is the most common case).
#[derive(PartialEq, Debug, Clone, Copy)]
pub enum DegenerateScorePolicy {
    /// Fail with `TopsisError::Degenerate`.
    Reject,
    /// Assign the given score, which must be in [0, 1].
    Fallback(f64),
}

#[derive(PartialEq, Debug, Clone)]
pub struct TopsisRules {
    pub degenerate_policy: DegenerateScorePolicy,
}

impl TopsisRules {
    pub const DEFAULT_RULES: TopsisRules = TopsisRules {
        degenerate_policy: DegenerateScorePolicy::Reject,
    };
}
