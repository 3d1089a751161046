use crate::data::Dataset;
use crate::metrics::{Alternative, DEFAULT_INITIAL_WEALTH, DEFAULT_NORMALITY_LEVEL, DEFAULT_VAR_LEVEL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

//complete analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfiguration {
    //data
    pub data_path: PathBuf,
    pub dataset: Dataset,

    //tail risk
    pub var_level: f64,

    //normality test
    pub normality_level: f64,
    pub alternative: Alternative,

    //drawdown, asset defaults to the first column
    pub initial_wealth: f64,
    pub drawdown_asset: Option<String>,

    //optional output path
    pub output_drawdown_csv: Option<PathBuf>,
}

impl Default for AnalysisConfiguration {
    fn default() -> Self {
        AnalysisConfiguration {
            data_path: PathBuf::from("edhec-hedgefundindices.csv"),
            dataset: Dataset::Hfi,
            var_level: DEFAULT_VAR_LEVEL,
            normality_level: DEFAULT_NORMALITY_LEVEL,
            alternative: Alternative::TwoSided,
            initial_wealth: DEFAULT_INITIAL_WEALTH,
            drawdown_asset: None,
            output_drawdown_csv: None,
        }
    }
}

impl AnalysisConfiguration {
    //load configuration from a JSON file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AnalysisConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
