//! Drinking-rate classification over a drinker's sessions.
//!
//! Sessions that are too small (too few pours or too little beer) are dropped
//! before any averaging so that one-off tastings do not skew the rate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::sessions::Session;

/// Default minimum number of pours for a session to count.
pub const DEFAULT_MIN_POURS: usize = 2;
/// Default minimum volume in ounces for a session to count.
pub const DEFAULT_MIN_OUNCES: f64 = 24.0;
/// Ounces in one standard drink.
pub const STANDARD_DRINK_OUNCES: f64 = 12.0;

/// Ordinal drinking-rate rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    NonDrinker,
    Harmless,
    Lightweight,
    Average,
    Heavy,
    Extreme,
}

impl Rating {
    /// Map standard drinks per hour onto the fixed rating table.
    pub fn from_drinks_per_hour(drinks_per_hour: f64) -> Self {
        if drinks_per_hour < 0.5 {
            Rating::Harmless
        } else if drinks_per_hour < 1.0 {
            Rating::Lightweight
        } else if drinks_per_hour < 1.5 {
            Rating::Average
        } else if drinks_per_hour < 2.0 {
            Rating::Heavy
        } else {
            Rating::Extreme
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::NonDrinker => "non-drinker",
            Rating::Harmless => "harmless",
            Rating::Lightweight => "lightweight",
            Rating::Average => "average",
            Rating::Heavy => "heavy",
            Rating::Extreme => "extreme",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregates over the sessions that passed the noise filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateMetrics {
    pub session_count: usize,
    pub avg_ounces: f64,
    pub avg_duration_seconds: f64,
    pub ounces_per_hour: f64,
    pub drinks_per_hour: f64,
    /// Longest session in seconds
    pub longest: i64,
    /// Shortest session in seconds
    pub shortest: i64,
}

/// Rating plus the metrics it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrinkingRateReport {
    pub rating: Rating,
    /// Absent when the rating is [`Rating::NonDrinker`]
    pub metrics: Option<RateMetrics>,
}

impl DrinkingRateReport {
    fn non_drinker() -> Self {
        Self {
            rating: Rating::NonDrinker,
            metrics: None,
        }
    }

    /// Render the report as a short text block.
    pub fn render(&self) -> String {
        let mut output = format!("Rating: {}\n", self.rating);
        if let Some(m) = &self.metrics {
            output.push_str(&format!("Sessions counted:   {}\n", m.session_count));
            output.push_str(&format!(
                "Avg session:        {:.1} oz over {:.2} h\n",
                m.avg_ounces,
                m.avg_duration_seconds / 3600.0
            ));
            output.push_str(&format!(
                "Rate:               {:.1} oz/h ({:.2} drinks/h)\n",
                m.ounces_per_hour, m.drinks_per_hour
            ));
            output.push_str(&format!(
                "Longest / shortest: {:.2} h / {:.2} h\n",
                m.longest as f64 / 3600.0,
                m.shortest as f64 / 3600.0
            ));
        }
        output
    }
}

/// Classifier with configurable noise-filter thresholds.
#[derive(Debug, Clone)]
pub struct DrinkingRateClassifier {
    pub min_pours_per_session: usize,
    pub min_ounces_per_session: f64,
}

impl Default for DrinkingRateClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl DrinkingRateClassifier {
    pub fn new() -> Self {
        Self {
            min_pours_per_session: DEFAULT_MIN_POURS,
            min_ounces_per_session: DEFAULT_MIN_OUNCES,
        }
    }

    pub fn with_thresholds(min_pours_per_session: usize, min_ounces_per_session: f64) -> Self {
        Self {
            min_pours_per_session,
            min_ounces_per_session,
        }
    }

    fn qualifies(&self, session: &Session) -> bool {
        session.pour_count() >= self.min_pours_per_session
            && session.total_ounces() >= self.min_ounces_per_session
    }

    pub fn classify(&self, sessions: &[Session]) -> DrinkingRateReport {
        let counted: Vec<&Session> = sessions.iter().filter(|s| self.qualifies(s)).collect();
        let total_duration: i64 = counted.iter().map(|s| s.duration_seconds()).sum();

        debug!(
            sessions = sessions.len(),
            counted = counted.len(),
            total_duration,
            "classifying drinking rate"
        );

        if counted.is_empty() || total_duration == 0 {
            return DrinkingRateReport::non_drinker();
        }

        let count = counted.len() as f64;
        let avg_ounces = counted.iter().map(|s| s.total_ounces()).sum::<f64>() / count;
        let avg_duration_seconds = total_duration as f64 / count;
        let longest = counted.iter().map(|s| s.duration_seconds()).max().unwrap_or(0);
        let shortest = counted.iter().map(|s| s.duration_seconds()).min().unwrap_or(0);

        // a single short session would otherwise extrapolate to a huge hourly rate
        let ounces_per_hour = if avg_duration_seconds < 3600.0 {
            avg_ounces
        } else {
            avg_ounces / avg_duration_seconds * 3600.0
        };
        let drinks_per_hour = ounces_per_hour / STANDARD_DRINK_OUNCES;

        DrinkingRateReport {
            rating: Rating::from_drinks_per_hour(drinks_per_hour),
            metrics: Some(RateMetrics {
                session_count: counted.len(),
                avg_ounces,
                avg_duration_seconds,
                ounces_per_hour,
                drinks_per_hour,
                longest,
                shortest,
            }),
        }
    }
}

/// Classify sessions with explicit thresholds.
pub fn classify_drinking_rate(
    sessions: &[Session],
    min_pours_per_session: usize,
    min_ounces_per_session: f64,
) -> DrinkingRateReport {
    DrinkingRateClassifier::with_thresholds(min_pours_per_session, min_ounces_per_session)
        .classify(sessions)
}
