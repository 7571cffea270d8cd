//! Fill level and consumption for a single keg.

use serde::{Deserialize, Serialize};

use crate::model::{Keg, PourRecord};

/// How much of a keg has been served.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KegStats {
    pub keg_id: i64,
    pub pour_count: usize,
    pub served_ounces: f64,
    /// Never below zero, even when pours exceed the stated capacity
    pub remaining_ounces: f64,
    /// 0..=100, absent when the keg has no known capacity
    pub percent_full: Option<f64>,
}

impl KegStats {
    /// Tally the pours drawn from `keg`; pours from other kegs are ignored.
    pub fn compute(keg: &Keg, pours: &[PourRecord]) -> Self {
        let (pour_count, served_ounces) = pours
            .iter()
            .filter(|p| p.keg_id == Some(keg.id))
            .fold((0, 0.0), |(count, total), p| (count + 1, total + p.volume_ounces));

        let remaining_ounces = (keg.capacity_ounces - served_ounces).max(0.0);
        let percent_full = (keg.capacity_ounces > 0.0)
            .then(|| remaining_ounces / keg.capacity_ounces * 100.0);

        Self {
            keg_id: keg.id,
            pour_count,
            served_ounces,
            remaining_ounces,
            percent_full,
        }
    }
}
