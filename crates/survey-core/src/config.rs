//! Static analysis configuration
//!
//! Every column list the pipeline needs lives in one immutable
//! [`AnalysisConfig`] that is passed explicitly into each component.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Direction of a survey item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// High raw value = better outcome
    #[default]
    Direct,
    /// High raw value = worse outcome; reverse-coded before aggregation
    Inverted,
}

/// A named numeric survey item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreColumn {
    pub name: String,
    #[serde(default)]
    pub polarity: Polarity,
}

impl ScoreColumn {
    pub fn direct(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            polarity: Polarity::Direct,
        }
    }

    pub fn inverted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            polarity: Polarity::Inverted,
        }
    }
}

/// A composite index: the unweighted mean of its constituents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeSpec {
    pub name: String,
    pub constituents: Vec<String>,
}

impl CompositeSpec {
    pub fn new<I, S>(name: impl Into<String>, constituents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            constituents: constituents.into_iter().map(Into::into).collect(),
        }
    }
}

/// Equal-frequency Low/Medium/High labelling of one composite index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TercileSpec {
    /// Column to bin
    pub source: String,
    /// Name of the label column to add
    pub label_column: String,
}

/// How the reverse coder treats values outside [1, 5]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Reverse anyway and report each offending record
    #[default]
    Warn,
    /// Refuse to reverse the column
    Strict,
}

/// A named list of columns, e.g. "Infrastructure"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableGroup {
    pub name: String,
    pub columns: Vec<String>,
}

impl VariableGroup {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// One test battery: the cartesian product of two sets of variable groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryPlan {
    pub name: String,
    /// Names of independent variable groups
    pub independent: Vec<String>,
    /// Names of dependent variable groups
    pub dependent: Vec<String>,
}

/// Factors and response of the two-way analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoWaySpec {
    pub factor_a: String,
    pub factor_b: String,
    pub dependent: String,
}

/// Grouping used for the variance homogeneity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HomogeneitySpec {
    pub group_column: String,
    pub value_column: String,
}

fn default_alpha() -> f64 {
    0.05
}

fn default_reverse_suffix() -> String {
    "_R".to_string()
}

/// Complete configuration of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Items rescaled onto 1-5
    pub score_columns: Vec<ScoreColumn>,
    /// Text-to-number maps applied before rescaling
    #[serde(default)]
    pub ordinal_maps: BTreeMap<String, BTreeMap<String, f64>>,
    /// Suffix of reverse-coded copies of inverted items
    #[serde(default = "default_reverse_suffix")]
    pub reverse_suffix: String,
    #[serde(default)]
    pub range_policy: RangePolicy,
    pub composites: Vec<CompositeSpec>,
    #[serde(default)]
    pub tercile: Option<TercileSpec>,
    /// Significance level shared by every test
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    #[serde(default)]
    pub independent_groups: Vec<VariableGroup>,
    #[serde(default)]
    pub dependent_groups: Vec<VariableGroup>,
    #[serde(default)]
    pub batteries: Vec<BatteryPlan>,
    #[serde(default)]
    pub two_way: Option<TwoWaySpec>,
    #[serde(default)]
    pub normality_columns: Vec<String>,
    #[serde(default)]
    pub homogeneity: Option<HomogeneitySpec>,
}

impl AnalysisConfig {
    /// The internet connectivity / academic productivity study
    pub fn connectivity_study() -> Self {
        let score_columns = vec![
            ScoreColumn::direct("WiFi_Speed_Score"),
            ScoreColumn::direct("Reliability_Score"),
            ScoreColumn::direct("Peak_Performance_Score"),
            ScoreColumn::inverted("Outage_Frequency_Score"),
            ScoreColumn::direct("Programming_Impact_Score"),
            ScoreColumn::direct("Collaboration_Score"),
            ScoreColumn::inverted("Task_Abandonment_Score"),
            ScoreColumn::inverted("Time_Lost_Score"),
            ScoreColumn::direct("Productivity_Influence_Score"),
            ScoreColumn::direct("Future_Performance_Score"),
        ];

        let composites = vec![
            CompositeSpec::new(
                "Connectivity_Index",
                [
                    "WiFi_Speed_Score",
                    "Reliability_Score",
                    "Peak_Performance_Score",
                    "Outage_Frequency_Score_R",
                ],
            ),
            CompositeSpec::new(
                "Productivity_Index",
                [
                    "Programming_Impact_Score",
                    "Collaboration_Score",
                    "Task_Abandonment_Score_R",
                    "Time_Lost_Score_R",
                    "Productivity_Influence_Score",
                    "Future_Performance_Score",
                ],
            ),
        ];

        let independent_groups = vec![
            VariableGroup::new(
                "Demographics",
                ["Academic_Year_Score", "Device_Capability_Score", "Residence_Score"],
            ),
            VariableGroup::new(
                "Infrastructure",
                [
                    "WiFi_Speed_Score",
                    "Reliability_Score",
                    "Peak_Performance_Score",
                    "Outage_Frequency_Score",
                ],
            ),
            VariableGroup::new(
                "Usage_Patterns",
                [
                    "Daily_Hours_Score",
                    "Alternative_Sources_Score",
                    "Schedule_Changes_Score",
                    "Download_Frequency_Score",
                ],
            ),
            VariableGroup::new("Spending", ["Monthly_Spending_Score"]),
            VariableGroup::new("WiFi_Speed", ["WiFi_Speed_Score"]),
        ];

        let dependent_groups = vec![
            VariableGroup::new(
                "Academic_Performance",
                [
                    "Programming_Impact_Score",
                    "Collaboration_Score",
                    "LMS_Access_Score",
                    "Productivity_Influence_Score",
                ],
            ),
            VariableGroup::new(
                "Performance_Issues",
                ["Task_Abandonment_Score", "Time_Lost_Score"],
            ),
            VariableGroup::new("Adaptation", ["Offpeak_Effectiveness_Score"]),
            VariableGroup::new("Future_Expectations", ["Future_Performance_Score"]),
        ];

        let batteries = vec![
            BatteryPlan {
                name: "wifi_academic".to_string(),
                independent: vec!["WiFi_Speed".to_string()],
                dependent: vec!["Academic_Performance".to_string()],
            },
            BatteryPlan {
                name: "infrastructure_performance".to_string(),
                independent: vec!["Infrastructure".to_string()],
                dependent: vec!["Performance_Issues".to_string()],
            },
        ];

        Self {
            score_columns,
            ordinal_maps: BTreeMap::new(),
            reverse_suffix: default_reverse_suffix(),
            range_policy: RangePolicy::Warn,
            composites,
            tercile: Some(TercileSpec {
                source: "Connectivity_Index".to_string(),
                label_column: "Connectivity_Group".to_string(),
            }),
            alpha: default_alpha(),
            independent_groups,
            dependent_groups,
            batteries,
            two_way: Some(TwoWaySpec {
                factor_a: "WiFi_Speed_Score".to_string(),
                factor_b: "Reliability_Score".to_string(),
                dependent: "Productivity_Influence_Score".to_string(),
            }),
            normality_columns: vec![
                "WiFi_Speed_Score".to_string(),
                "Productivity_Influence_Score".to_string(),
                "Task_Abandonment_Score".to_string(),
            ],
            homogeneity: Some(HomogeneitySpec {
                group_column: "WiFi_Speed_Score".to_string(),
                value_column: "Productivity_Influence_Score".to_string(),
            }),
        }
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(Error::InvalidParameter(format!(
                "alpha {} must be in (0, 1)",
                self.alpha
            )));
        }
        if self.reverse_suffix.is_empty() {
            return Err(Error::InvalidParameter(
                "reverse suffix must not be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for spec in &self.composites {
            if spec.constituents.is_empty() {
                return Err(Error::InvalidParameter(format!(
                    "composite '{}' has no constituents",
                    spec.name
                )));
            }
            for column in &spec.constituents {
                if !seen.insert(column.as_str()) {
                    return Err(Error::InvalidParameter(format!(
                        "column '{column}' appears in more than one composite"
                    )));
                }
            }
        }

        for plan in &self.batteries {
            self.resolve_battery(plan)?;
        }
        Ok(())
    }

    /// Names of the inverted-polarity items
    pub fn inverted_columns(&self) -> impl Iterator<Item = &str> {
        self.score_columns
            .iter()
            .filter(|c| c.polarity == Polarity::Inverted)
            .map(|c| c.name.as_str())
    }

    /// Name of the reverse-coded copy of `column`
    pub fn reversed_name(&self, column: &str) -> String {
        format!("{column}{}", self.reverse_suffix)
    }

    /// Expand a battery plan into its independent and dependent column lists
    pub fn resolve_battery(&self, plan: &BatteryPlan) -> Result<(Vec<String>, Vec<String>)> {
        let independent = Self::expand(&self.independent_groups, &plan.independent, &plan.name)?;
        let dependent = Self::expand(&self.dependent_groups, &plan.dependent, &plan.name)?;
        Ok((independent, dependent))
    }

    fn expand(groups: &[VariableGroup], names: &[String], plan: &str) -> Result<Vec<String>> {
        let mut columns = Vec::new();
        for name in names {
            let group = groups.iter().find(|g| &g.name == name).ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "battery '{plan}' references unknown variable group '{name}'"
                ))
            })?;
            columns.extend(group.columns.iter().cloned());
        }
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_is_valid() {
        let config = AnalysisConfig::connectivity_study();
        config.validate().unwrap();
        let inverted: Vec<_> = config.inverted_columns().collect();
        assert_eq!(
            inverted,
            vec![
                "Outage_Frequency_Score",
                "Task_Abandonment_Score",
                "Time_Lost_Score"
            ]
        );
        assert_eq!(
            config.reversed_name("Time_Lost_Score"),
            "Time_Lost_Score_R"
        );
    }

    #[test]
    fn test_resolve_battery() {
        let config = AnalysisConfig::connectivity_study();
        let plan = &config.batteries[1];
        let (ind, dep) = config.resolve_battery(plan).unwrap();
        assert_eq!(ind.len(), 4);
        assert_eq!(dep, vec!["Task_Abandonment_Score", "Time_Lost_Score"]);
    }

    #[test]
    fn test_unknown_group_rejected() {
        let mut config = AnalysisConfig::connectivity_study();
        config.batteries[0].dependent = vec!["Nope".to_string()];
        assert!(matches!(config.validate(), Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_overlapping_composites_rejected() {
        let mut config = AnalysisConfig::connectivity_study();
        config.composites[1]
            .constituents
            .push("WiFi_Speed_Score".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_alpha_bounds() {
        let mut config = AnalysisConfig::connectivity_study();
        config.alpha = 1.0;
        assert!(config.validate().is_err());
        config.alpha = 0.01;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip_with_defaults() {
        let json = r#"{
            "score_columns": [
                {"name": "A"},
                {"name": "B", "polarity": "inverted"}
            ],
            "composites": [
                {"name": "Index", "constituents": ["A", "B_R"]}
            ]
        }"#;
        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.alpha, 0.05);
        assert_eq!(config.reverse_suffix, "_R");
        assert_eq!(config.range_policy, RangePolicy::Warn);
        assert_eq!(config.score_columns[1].polarity, Polarity::Inverted);
        assert!(config.batteries.is_empty());

        let back = serde_json::to_string(&config).unwrap();
        let again: AnalysisConfig = serde_json::from_str(&back).unwrap();
        assert_eq!(config, again);
    }
}
