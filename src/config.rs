//! Engine configuration.
//!
//! Both configs deserialize from JSON with every field optional:
//!
//! ```json
//! { "measure": "overlap_jacard", "alpha": 2.0, "min_similarity": 0.1 }
//! { "window_size": 3, "direction": "directed.down", "count_once": true }
//! ```

use serde::{Deserialize, Serialize};

use crate::model::Direction;
use crate::similarity::{check_alpha, Measure, DEFAULT_ALPHA};
use crate::{Error, Result};

// ============================================================================
// Similarity
// ============================================================================

/// Parameters of the similarity engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub measure: Measure,
    /// Saturation base, only used by `conditional_probability`.
    pub alpha: f64,
    /// Edges with a weight below this are dropped from the graph.
    pub min_similarity: Option<f64>,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { measure: Measure::Cosine, alpha: DEFAULT_ALPHA, min_similarity: None }
    }
}

impl SimilarityConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_measure(mut self, measure: Measure) -> Self {
        self.measure = measure;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_min_similarity(mut self, threshold: f64) -> Self {
        self.min_similarity = Some(threshold);
        self
    }

    pub fn validate(&self) -> Result<()> {
        check_alpha(self.alpha)?;
        check_threshold("min_similarity", self.min_similarity)
    }
}

// ============================================================================
// Windowed ties
// ============================================================================

/// Parameters of the windowed tie engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Maximum lag (in order steps) that still forms a tie. At least 1.
    pub window_size: usize,
    pub direction: Direction,
    /// Count each target at most once per (context, source).
    ///
    /// The cap applies before orientation: under `Direction::Undirected`
    /// a pair that tied both ways in one context weighs 2 for it.
    pub count_once: bool,
    /// Edges with a weight below this are dropped from the graph.
    pub min_weight: Option<f64>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window_size: 1,
            direction: Direction::DirectedUp,
            count_once: false,
            min_weight: None,
        }
    }
}

impl WindowConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_count_once(mut self, count_once: bool) -> Self {
        self.count_once = count_once;
        self
    }

    pub fn with_min_weight(mut self, threshold: f64) -> Self {
        self.min_weight = Some(threshold);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 {
            return Err(Error::InvalidInput {
                argument: "window_size",
                message: "must be at least 1".into(),
            });
        }
        check_threshold("min_weight", self.min_weight)
    }
}

fn check_threshold(argument: &'static str, threshold: Option<f64>) -> Result<()> {
    match threshold {
        Some(t) if !t.is_finite() => Err(Error::InvalidInput {
            argument,
            message: format!("must be finite, got {t}"),
        }),
        _ => Ok(()),
    }
}
