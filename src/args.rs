use clap::Parser;

/// This is a multi-criteria decision program: it scores and ranks the rows of a table with TOPSIS.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the settings of the run. For more information about the file format,
    /// read the manual of the topsis_core crate. Relative paths in this file are resolved against its directory.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The table to score. The first column identifies the alternatives, the other columns are criteria.
    /// Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (csv or excel) The type of the input. By default, it is inferred from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When using an Excel file, the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (list of comma-separated numbers) One non-negative weight per criterion, for example "1,1,2".
    #[clap(short, long, value_parser, allow_hyphen_values = true)]
    pub weights: Option<String>,

    /// (list of comma-separated '+' or '-') One impact per criterion: '+' when larger values are better,
    /// '-' when smaller values are better. For example "+,-,+".
    #[clap(long, value_parser, allow_hyphen_values = true)]
    pub impacts: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the scored table in CSV format. Setting this option overrides
    /// the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, a summary of the run will be written in JSON format to the given location.
    #[clap(long, value_parser)]
    pub summary: Option<String>,

    /// (file path) A reference file containing the expected scored table in CSV format. If provided, topsis will
    /// check that the computed table matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (number in [0, 1]) If specified, the alternatives whose score is undefined (all the criteria are constant)
    /// receive this score instead of failing the run.
    #[clap(long, value_parser)]
    pub fallback_score: Option<f64>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
