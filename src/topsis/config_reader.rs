use crate::topsis::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InputSettings {
    #[serde(rename = "filePath")]
    pub file_path: String,
    pub provider: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "summaryPath")]
    pub summary_path: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RulesSettings {
    #[serde(rename = "degenerateScore")]
    pub degenerate_score: Option<String>,
    #[serde(rename = "fallbackScore")]
    pub fallback_score: Option<f64>,
}

impl RulesSettings {
    pub fn rules(&self) -> CliResult<TopsisRules> {
        let degenerate_policy = match self.degenerate_score.as_deref() {
            None | Some("reject") => DegenerateScorePolicy::Reject,
            Some("fallback") => DegenerateScorePolicy::Fallback(self.fallback_score.unwrap_or(0.5)),
            Some(x) => whatever!(
                "unknown degenerateScore policy: {:?} (expected reject or fallback)",
                x
            ),
        };
        Ok(TopsisRules { degenerate_policy })
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TopsisConfig {
    pub input: InputSettings,
    // Either "1,1,2" or [1, 1, 2]
    weights: Option<JSValue>,
    // Either "+,-" or ["+", "-"]
    impacts: Option<JSValue>,
    pub output: Option<OutputSettings>,
    pub rules: Option<RulesSettings>,
}

impl TopsisConfig {
    /// The weights, as the comma-separated text the parser expects.
    pub fn weights_spec(&self) -> CliResult<Option<String>> {
        read_js_list(&self.weights, "weights")
    }

    /// The impacts, as the comma-separated text the parser expects.
    pub fn impacts_spec(&self) -> CliResult<Option<String>> {
        read_js_list(&self.impacts, "impacts")
    }
}

pub fn read_config(path: &str) -> CliResult<TopsisConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: content: {:?}", contents);
    let config: TopsisConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

fn read_js_list(x: &Option<JSValue>, field: &str) -> CliResult<Option<String>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::String(s)) => Ok(Some(s.clone())),
        Some(JSValue::Array(elts)) => {
            let mut l: Vec<String> = Vec::new();
            for elt in elts {
                match elt {
                    JSValue::Number(n) => l.push(n.to_string()),
                    JSValue::String(s) => l.push(s.clone()),
                    _ => whatever!("{}: cannot understand element {}", field, elt),
                }
            }
            Ok(Some(l.join(",")))
        }
        Some(other) => whatever!("{}: expected a string or a list, found {}", field, other),
    }
}
