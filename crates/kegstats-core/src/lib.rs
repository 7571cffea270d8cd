//! # kegstats Core Library
//!
//! Analytics over beer pours from metered kegs: blood alcohol estimation,
//! grouping a drinker's history into sessions, and rating how fast they drink.
//!
//! ## Architecture
//!
//! - **BAC Estimator**: instant BAC of a pour from drinker physiology, and
//!   linear decay of a recorded sample over time
//! - **Stats**: session grouping, drinking-rate rating, per-drinker totals and
//!   leaderboards, all pure functions over record slices
//! - **Storage**: TOML configuration and a SQLite pour store that feeds the
//!   analytics through the read-only [`PourSource`] trait
//!
//! The analytics never fetch data or keep state between calls; callers load
//! records and pass them in.
//!
//! ## Key Components
//!
//! - [`estimate_instant_bac`], [`decay_sample`], [`current_bac`]
//! - [`SessionGrouper`] / [`group_into_sessions`]
//! - [`DrinkingRateClassifier`] / [`classify_drinking_rate`]
//! - [`Database`]: drinker, keg and pour persistence
//! - [`Config`]: application configuration

pub mod bac;
pub mod error;
pub mod model;
pub mod stats;
pub mod storage;
pub mod units;

pub use bac::{current_bac, decay_sample, estimate_instant_bac, BacSample};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use model::{Drinker, DrinkerProfile, Gender, Keg, KegStatus, PourRecord};
pub use stats::{
    classify_drinking_rate, group_into_sessions, DrinkerStats, DrinkingRateClassifier,
    DrinkingRateReport, KegStats, LeaderEntry, LeaderMetric, RateMetrics, Rating, Session,
    SessionGrouper,
};
pub use storage::{Config, Database, NewKeg, PourSource};
pub use units::{Quantity, VolumeUnit};
