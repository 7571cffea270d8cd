//! Plain value records shared by the analytics core and the storage layer.
//!
//! Records are immutable once loaded: the analytics functions only ever see
//! them through shared slices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::bac::BacSample;
use crate::error::ValidationError;

/// Drinker gender, which selects the body-water fraction used for BAC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Fraction of body mass that is water.
    pub fn body_water_fraction(&self) -> f64 {
        match self {
            Gender::Male => 0.58,
            Gender::Female => 0.49,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(ValidationError::invalid_value(
                "gender",
                format!("expected 'male' or 'female', got '{other}'"),
            )),
        }
    }
}

/// Physiology needed for BAC estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrinkerProfile {
    /// Body weight in pounds; must be positive
    pub weight_lb: f64,
    pub gender: Gender,
}

impl DrinkerProfile {
    pub fn new(weight_lb: f64, gender: Gender) -> Self {
        Self { weight_lb, gender }
    }
}

/// A registered drinker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drinker {
    pub id: i64,
    pub username: String,
    pub profile: DrinkerProfile,
}

/// Whether a keg is still on tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KegStatus {
    Online,
    Offline,
}

impl KegStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KegStatus::Online => "online",
            KegStatus::Offline => "offline",
        }
    }
}

impl FromStr for KegStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(KegStatus::Online),
            "offline" => Ok(KegStatus::Offline),
            other => Err(ValidationError::invalid_value(
                "keg status",
                format!("unknown status '{other}'"),
            )),
        }
    }
}

/// A keg of beer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keg {
    pub id: i64,
    pub beer_name: String,
    /// Alcohol content as a fraction (0.05 for 5%)
    pub alcohol_pct: f64,
    pub calories_per_ounce: f64,
    pub capacity_ounces: f64,
    pub status: KegStatus,
}

/// A single metered pour attributed to one drinker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PourRecord {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub keg_id: Option<i64>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub volume_ounces: f64,
    /// Running BAC computed when the pour was recorded
    #[serde(default)]
    pub recorded_bac: Option<BacSample>,
}
