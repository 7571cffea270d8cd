//! Statistics module for kegstats
//!
//! Pure aggregations over already-loaded pour records: session grouping,
//! drinking-rate rating, per-drinker and per-keg totals, and leaderboards.

mod drinker;
mod drinking_rate;
mod keg;
mod leaders;
mod sessions;

pub use sessions::{group_into_sessions, Session, SessionGrouper, DEFAULT_GAP_SECONDS};

pub use drinking_rate::{
    classify_drinking_rate, DrinkingRateClassifier, DrinkingRateReport, RateMetrics, Rating,
    DEFAULT_MIN_OUNCES, DEFAULT_MIN_POURS, STANDARD_DRINK_OUNCES,
};

pub use drinker::DrinkerStats;

pub use keg::KegStats;

pub use leaders::{
    by_count, by_peak_bac, by_volume, current_drinkers, leaderboard, CurrentDrinker, LeaderEntry,
    LeaderMetric,
};
