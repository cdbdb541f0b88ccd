//! The closed set of pairwise measures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Pairwise similarity / coincidence measure between unit feature vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    /// dot(i, j) / (‖i‖ · ‖j‖)
    #[default]
    Cosine,
    /// Pearson correlation of the two feature vectors.
    Correlation,
    /// Σ s_i·s_j / Σ s_j with `s = 1 − (1/α)^value`. Asymmetric, in `[0, 1]`
    /// for α > 1.
    ConditionalProbability,
    /// Number of features where both units are present.
    CoincidenceCount,
    /// Overlap coefficient |P(i) ∩ P(j)| / |P(j)|. Asymmetric.
    ///
    /// The name is historical: this is not the Jaccard index. Kept as is
    /// because callers depend on the asymmetric formula.
    #[serde(rename = "overlap_jacard")]
    OverlapJacard,
}

impl Measure {
    pub const ALL: [Measure; 5] = [
        Measure::Cosine,
        Measure::Correlation,
        Measure::ConditionalProbability,
        Measure::CoincidenceCount,
        Measure::OverlapJacard,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Measure::Cosine => "cosine",
            Measure::Correlation => "correlation",
            Measure::ConditionalProbability => "conditional_probability",
            Measure::CoincidenceCount => "coincidence_count",
            Measure::OverlapJacard => "overlap_jacard",
        }
    }

    /// True for measures where result[i,j] ≠ result[j,i] in general.
    pub fn is_directed(self) -> bool {
        matches!(self, Measure::ConditionalProbability | Measure::OverlapJacard)
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Measure {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Measure::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| Error::UnknownName { kind: "measure", name: s.to_string() })
    }
}
