use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Daily precipitation bucket used as a categorical regressor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RainGroup {
    #[serde(rename = "0")]
    Dry,
    #[serde(rename = "0.1-1")]
    Light,
    #[serde(rename = "1.1-4")]
    Moderate,
    #[serde(rename = "4.1-10")]
    Heavy,
    #[serde(rename = "10.1-20")]
    VeryHeavy,
    #[serde(rename = "20+")]
    Extreme,
}

/// Upper bounds (inclusive) in mm, ordered ascending. First bound >= value wins.
const RAIN_BOUNDARIES: [(f64, RainGroup); 5] = [
    (0.1, RainGroup::Dry),
    (1.0, RainGroup::Light),
    (4.0, RainGroup::Moderate),
    (10.0, RainGroup::Heavy),
    (20.0, RainGroup::VeryHeavy),
];

impl RainGroup {
    pub const ALL: [RainGroup; 6] = [
        RainGroup::Dry,
        RainGroup::Light,
        RainGroup::Moderate,
        RainGroup::Heavy,
        RainGroup::VeryHeavy,
        RainGroup::Extreme,
    ];

    /// Bucket a precipitation total. Negative readings land in the dry bucket,
    /// anything above 20 mm is unbounded `20+`.
    pub fn from_precipitation(precip_mm: f64) -> Self {
        RAIN_BOUNDARIES
            .iter()
            .find(|(upper, _)| precip_mm <= *upper)
            .map(|(_, group)| *group)
            .unwrap_or(RainGroup::Extreme)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RainGroup::Dry => "0",
            RainGroup::Light => "0.1-1",
            RainGroup::Moderate => "1.1-4",
            RainGroup::Heavy => "4.1-10",
            RainGroup::VeryHeavy => "10.1-20",
            RainGroup::Extreme => "20+",
        }
    }
}

impl fmt::Display for RainGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RainGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RainGroup::ALL
            .iter()
            .find(|g| g.label() == s)
            .copied()
            .ok_or_else(|| format!("Unknown rain group '{}'", s))
    }
}
