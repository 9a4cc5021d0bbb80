//! JSON configuration files

use crate::error::Result;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use survey_core::AnalysisConfig;

/// Parse and validate a configuration
pub fn read_config<R: Read>(reader: R) -> Result<AnalysisConfig> {
    let config: AnalysisConfig = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

pub fn read_config_path(path: impl AsRef<Path>) -> Result<AnalysisConfig> {
    read_config(BufReader::new(File::open(path)?))
}

/// Pretty-printed JSON, readable back with [`read_config`]
pub fn write_config<W: Write>(config: &AnalysisConfig, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, config)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use survey_core::{Polarity, RangePolicy};

    #[test]
    fn test_preset_survives_json() {
        let preset = AnalysisConfig::connectivity_study();
        let mut buffer = Vec::new();
        write_config(&preset, &mut buffer).unwrap();
        assert_eq!(read_config(buffer.as_slice()).unwrap(), preset);
    }

    #[test]
    fn test_defaults_fill_optional_fields() {
        let json = r#"{
            "score_columns": [
                {"name": "WiFi_Speed_Score"},
                {"name": "Time_Lost_Score", "polarity": "inverted"}
            ],
            "composites": [{"name": "Index", "constituents": ["WiFi_Speed_Score", "Time_Lost_Score_R"]}]
        }"#;
        let config = read_config(json.as_bytes()).unwrap();
        assert_eq!(config.alpha, 0.05);
        assert_eq!(config.reverse_suffix, "_R");
        assert_eq!(config.range_policy, RangePolicy::Warn);
        assert_eq!(config.score_columns[1].polarity, Polarity::Inverted);
        assert!(config.batteries.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let json = r#"{"score_columns": [], "composites": [], "alpha": 2.0}"#;
        assert!(matches!(read_config(json.as_bytes()), Err(Error::Core(_))));
        assert!(matches!(read_config("{".as_bytes()), Err(Error::Json(_))));
    }
}
