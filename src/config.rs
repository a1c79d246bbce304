use crate::calculations::CostModel;
use crate::persistence::PersistenceResult;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub const DEFAULT_TRANSFER_RATE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    #[default]
    Plain,
    Transfer,
}

impl AnalysisMode {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "plain" => Some(AnalysisMode::Plain),
            "transfer" | "transfer_weighted" => Some(AnalysisMode::Transfer),
            _ => None,
        }
    }
}

/// Analysis settings shared by the CLI, the HTTP API and config files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub mode: AnalysisMode,
    pub transfer_rate: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::Plain,
            transfer_rate: DEFAULT_TRANSFER_RATE,
        }
    }
}

impl AnalysisConfig {
    pub fn cost_model(&self) -> CostModel {
        match self.mode {
            AnalysisMode::Plain => CostModel::Plain,
            AnalysisMode::Transfer => CostModel::TransferWeighted {
                transfer_rate: self.transfer_rate,
            },
        }
    }
}

pub fn load_analysis_config<P: AsRef<Path>>(path: P) -> PersistenceResult<AnalysisConfig> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"mode":"transfer"}"#).unwrap();
        assert_eq!(config.mode, AnalysisMode::Transfer);
        assert_eq!(config.transfer_rate, DEFAULT_TRANSFER_RATE);
        assert_eq!(
            config.cost_model(),
            CostModel::TransferWeighted { transfer_rate: 10.0 }
        );
    }

    #[test]
    fn default_is_plain() {
        assert_eq!(AnalysisConfig::default().cost_model(), CostModel::Plain);
    }

    #[test]
    fn parses_mode_names() {
        assert_eq!(AnalysisMode::parse("Transfer"), Some(AnalysisMode::Transfer));
        assert_eq!(AnalysisMode::parse("plain"), Some(AnalysisMode::Plain));
        assert_eq!(AnalysisMode::parse("fast"), None);
    }
}
