//! Leaderboards and the list of drinkers currently above zero BAC.
//!
//! Every board is computed from the population's pours in one pass. Ties are
//! broken by ascending user id so boards are stable across calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bac::BacSample;
use crate::model::PourRecord;

/// What a leaderboard ranks by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaderMetric {
    /// Total ounces poured
    Volume,
    /// Number of pours
    Count,
    /// Highest recorded BAC
    Bac,
}

/// One row of a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderEntry {
    /// 1-based rank
    pub rank: usize,
    pub user_id: i64,
    pub amount: f64,
}

/// A drinker whose decayed BAC is still positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentDrinker {
    pub user_id: i64,
    pub bac: f64,
}

/// Rank users by `metric`, optionally only counting pours from `keg_id`.
pub fn leaderboard(
    pours: &[PourRecord],
    metric: LeaderMetric,
    keg_id: Option<i64>,
    limit: usize,
) -> Vec<LeaderEntry> {
    let mut per_user: BTreeMap<i64, f64> = BTreeMap::new();

    for pour in pours.iter().filter(|p| keg_id.is_none() || p.keg_id == keg_id) {
        match metric {
            LeaderMetric::Volume => {
                *per_user.entry(pour.user_id).or_insert(0.0) += pour.volume_ounces;
            }
            LeaderMetric::Count => {
                *per_user.entry(pour.user_id).or_insert(0.0) += 1.0;
            }
            LeaderMetric::Bac => {
                if let Some(sample) = &pour.recorded_bac {
                    let best = per_user.entry(pour.user_id).or_insert(sample.bac);
                    *best = best.max(sample.bac);
                }
            }
        }
    }

    rank(per_user.into_iter().collect(), limit)
}

pub fn by_volume(pours: &[PourRecord], keg_id: Option<i64>, limit: usize) -> Vec<LeaderEntry> {
    leaderboard(pours, LeaderMetric::Volume, keg_id, limit)
}

pub fn by_count(pours: &[PourRecord], keg_id: Option<i64>, limit: usize) -> Vec<LeaderEntry> {
    leaderboard(pours, LeaderMetric::Count, keg_id, limit)
}

pub fn by_peak_bac(pours: &[PourRecord], keg_id: Option<i64>, limit: usize) -> Vec<LeaderEntry> {
    leaderboard(pours, LeaderMetric::Bac, keg_id, limit)
}

/// Decay each user's latest sample to `now` and keep those still above zero,
/// highest first.
pub fn current_drinkers(latest: &[(i64, BacSample)], now: DateTime<Utc>) -> Vec<CurrentDrinker> {
    let mut drinkers: Vec<CurrentDrinker> = latest
        .iter()
        .map(|(user_id, sample)| CurrentDrinker {
            user_id: *user_id,
            bac: sample.decayed_to(now).bac,
        })
        .filter(|d| d.bac > 0.0)
        .collect();

    drinkers.sort_by(|a, b| b.bac.total_cmp(&a.bac).then(a.user_id.cmp(&b.user_id)));
    drinkers
}

fn rank(mut totals: Vec<(i64, f64)>, limit: usize) -> Vec<LeaderEntry> {
    totals.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    totals
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(i, (user_id, amount))| LeaderEntry {
            rank: i + 1,
            user_id,
            amount,
        })
        .collect()
}
