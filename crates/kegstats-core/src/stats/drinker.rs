//! Lifetime statistics for a single drinker.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{Keg, PourRecord};

/// Lifetime totals for one drinker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DrinkerStats {
    pub pour_count: usize,
    pub total_ounces: f64,
    /// Pours from kegs that are not in the lookup contribute nothing
    pub total_calories: f64,
    /// Highest recorded BAC over all pours
    pub peak_bac: f64,
    pub peak_bac_pour_id: Option<i64>,
    /// Volume poured in the 24 hours before `now`
    pub last_24h_ounces: f64,
}

impl DrinkerStats {
    /// Compute totals over one drinker's pours.
    pub fn compute(pours: &[PourRecord], kegs: &[Keg], now: DateTime<Utc>) -> Self {
        let calories_by_keg: HashMap<i64, f64> =
            kegs.iter().map(|k| (k.id, k.calories_per_ounce)).collect();
        let window_start = now - Duration::hours(24);

        let mut stats = DrinkerStats {
            pour_count: pours.len(),
            ..Default::default()
        };

        for pour in pours {
            stats.total_ounces += pour.volume_ounces;

            if let Some(per_oz) = pour.keg_id.and_then(|id| calories_by_keg.get(&id)) {
                stats.total_calories += pour.volume_ounces * per_oz;
            }

            if let Some(sample) = &pour.recorded_bac {
                if sample.bac > stats.peak_bac {
                    stats.peak_bac = sample.bac;
                    stats.peak_bac_pour_id = Some(pour.id);
                }
            }

            if pour.start_time >= window_start && pour.start_time <= now {
                stats.last_24h_ounces += pour.volume_ounces;
            }
        }

        stats
    }
}
