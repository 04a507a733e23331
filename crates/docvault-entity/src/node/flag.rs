//! Designated-document flag categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A category for which exactly one file may be the current document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagCategory {
    /// The current construction-phase safety plan.
    SafetyPlan,
    /// The current site risk assessment.
    RiskAssessment,
    /// The current insurance certificate.
    Insurance,
}

impl FlagCategory {
    /// Every category, in column order.
    pub const ALL: [FlagCategory; 3] = [Self::SafetyPlan, Self::RiskAssessment, Self::Insurance];

    /// Column holding this flag in the `nodes` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::SafetyPlan => "is_current_safety_plan",
            Self::RiskAssessment => "is_current_risk_assessment",
            Self::Insurance => "is_current_insurance",
        }
    }

    /// Short name used on the command line and in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SafetyPlan => "safety_plan",
            Self::RiskAssessment => "risk_assessment",
            Self::Insurance => "insurance",
        }
    }
}

impl fmt::Display for FlagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlagCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "safety_plan" => Ok(Self::SafetyPlan),
            "risk_assessment" => Ok(Self::RiskAssessment),
            "insurance" => Ok(Self::Insurance),
            other => Err(format!("Unknown flag category: {other}")),
        }
    }
}
