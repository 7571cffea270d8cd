//! Blood alcohol concentration estimation.
//!
//! BAC is expressed in grams-percent (grams of alcohol per 100 mL of blood).
//! The model follows the NHTSA body-water method: a pour's alcohol is assumed
//! to be absorbed instantly and completely, then eliminated linearly at a
//! fixed metabolic rate. Linear elimination keeps [`decay_sample`] monotonic
//! and trivially invertible ([`hours_until_sober`]).
//!
//! All constants are fixed physiology, not configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::DrinkerProfile;

/// Pounds per kilogram.
pub const LB_PER_KG: f64 = 2.2046;
/// Milliliters per US fluid ounce, as used by the estimator.
pub const ML_PER_OUNCE: f64 = 29.57;
/// Density of ethanol in g/mL.
pub const ETHANOL_DENSITY: f64 = 0.79;
/// Fraction of whole-body water concentration found in blood.
pub const BLOOD_WATER_FRACTION: f64 = 0.806;
/// Grams-percent eliminated per hour.
pub const ELIMINATION_RATE_PER_HOUR: f64 = 0.016;
/// Concentration at which a drinker is considered over the limit.
pub const LEGAL_LIMIT: f64 = 0.08;

/// A BAC value and the moment it was computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacSample {
    pub bac: f64,
    pub sample_time: DateTime<Utc>,
}

impl BacSample {
    pub fn new(bac: f64, sample_time: DateTime<Utc>) -> Self {
        Self { bac, sample_time }
    }

    /// Decay this sample forward to `now`.
    pub fn decayed_to(&self, now: DateTime<Utc>) -> BacSample {
        BacSample {
            bac: decay_sample(self.bac, elapsed_seconds(self.sample_time, now)),
            sample_time: now,
        }
    }

    pub fn is_over_limit(&self) -> bool {
        self.bac >= LEGAL_LIMIT
    }
}

/// BAC produced by one pour, assuming instantaneous complete absorption.
///
/// `alcohol_pct` is a fraction (0.05 for 5%).
///
/// # Errors
/// Returns [`ValidationError::InvalidProfile`] when the profile's weight is not
/// a positive number.
pub fn estimate_instant_bac(
    profile: &DrinkerProfile,
    volume_ounces: f64,
    alcohol_pct: f64,
) -> Result<f64, ValidationError> {
    let weight_ok = profile.weight_lb.is_finite() && profile.weight_lb > 0.0;
    if !weight_ok {
        return Err(ValidationError::InvalidProfile {
            weight_lb: profile.weight_lb,
        });
    }

    let weight_kg = profile.weight_lb / LB_PER_KG;
    let body_water_ml = weight_kg * profile.gender.body_water_fraction() * 1000.0;

    // grams of ethanol in one fluid ounce of pure alcohol (~23.36 g)
    let alcohol_weight_g = ML_PER_OUNCE * ETHANOL_DENSITY;
    let bac_per_ounce = (alcohol_weight_g / body_water_ml) * BLOOD_WATER_FRACTION * 100.0;

    let alcohol_consumed = volume_ounces * alcohol_pct;
    Ok(alcohol_consumed * bac_per_ounce)
}

/// Apply linear elimination to a sample over `elapsed_seconds`.
///
/// Never returns a negative value. Negative elapsed time is treated as zero.
pub fn decay_sample(sample_bac: f64, elapsed_seconds: f64) -> f64 {
    let elapsed_hours = elapsed_seconds.max(0.0) / 3600.0;
    (sample_bac - ELIMINATION_RATE_PER_HOUR * elapsed_hours).max(0.0)
}

/// BAC at `now` given the drinker's most recent sample, 0.0 without one.
///
/// The profile is accepted for symmetry with [`estimate_instant_bac`]; the
/// linear elimination rate does not depend on it.
pub fn current_bac(
    _profile: &DrinkerProfile,
    most_recent_sample: Option<&BacSample>,
    now: DateTime<Utc>,
) -> f64 {
    match most_recent_sample {
        None => 0.0,
        Some(sample) => decay_sample(sample.bac, elapsed_seconds(sample.sample_time, now)),
    }
}

/// Hours until `bac` decays to zero.
pub fn hours_until_sober(bac: f64) -> f64 {
    bac.max(0.0) / ELIMINATION_RATE_PER_HOUR
}

/// Running BAC right after a pour: the previous sample decayed to
/// `pour_time`, plus the pour's instant contribution.
///
/// # Errors
/// Propagates [`ValidationError::InvalidProfile`].
pub fn accumulate(
    profile: &DrinkerProfile,
    previous: Option<&BacSample>,
    pour_time: DateTime<Utc>,
    volume_ounces: f64,
    alcohol_pct: f64,
) -> Result<BacSample, ValidationError> {
    let instant = estimate_instant_bac(profile, volume_ounces, alcohol_pct)?;
    let carried = current_bac(profile, previous, pour_time);
    Ok(BacSample::new(carried + instant, pour_time))
}

fn elapsed_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}
