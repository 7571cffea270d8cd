//! Drinking session grouping.
//!
//! A session is a run of pours in which no pour starts more than the gap
//! threshold after the previous pour ended.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::PourRecord;

/// Default gap between pours that ends a session (90 minutes).
pub const DEFAULT_GAP_SECONDS: i64 = 90 * 60;

/// One drinking occasion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// 1-based position within the grouping result
    pub number: usize,
    pub pours: Vec<PourRecord>,
}

impl Session {
    fn open(number: usize, first: &PourRecord) -> Self {
        Self {
            number,
            pours: vec![first.clone()],
        }
    }

    /// Start time of the first pour.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.pours.first().map(|p| p.start_time)
    }

    /// End time of the last pour.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.pours.last().map(|p| p.end_time)
    }

    /// `end_time - start_time` in seconds, 0 for an empty session.
    pub fn duration_seconds(&self) -> i64 {
        match (self.start_time(), self.end_time()) {
            (Some(start), Some(end)) => (end - start).num_seconds(),
            _ => 0,
        }
    }

    pub fn total_ounces(&self) -> f64 {
        self.pours.iter().map(|p| p.volume_ounces).sum()
    }

    pub fn pour_count(&self) -> usize {
        self.pours.len()
    }
}

/// Groups pour histories into sessions.
#[derive(Debug, Clone)]
pub struct SessionGrouper {
    /// Maximum idle time between pours of the same session
    pub gap_seconds: i64,
}

impl Default for SessionGrouper {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionGrouper {
    /// Create a grouper with the default 90 minute gap.
    pub fn new() -> Self {
        Self {
            gap_seconds: DEFAULT_GAP_SECONDS,
        }
    }

    pub fn with_gap(gap_seconds: i64) -> Self {
        Self { gap_seconds }
    }

    /// Gap as a duration, saturating when `gap_seconds` is out of range.
    fn gap(&self) -> Duration {
        Duration::try_seconds(self.gap_seconds).unwrap_or(if self.gap_seconds < 0 {
            Duration::MIN
        } else {
            Duration::MAX
        })
    }

    /// Partition `pours` (sorted by start time) into sessions.
    ///
    /// The gap test is pairwise against the immediately preceding pour, so
    /// out-of-order timestamps are tolerated rather than rejected.
    pub fn group(&self, pours: &[PourRecord]) -> Vec<Session> {
        let gap = self.gap();
        let mut sessions: Vec<Session> = Vec::new();
        let mut previous: Option<&PourRecord> = None;

        for pour in pours {
            let starts_new = match previous {
                None => true,
                Some(prev) => pour.start_time - prev.end_time > gap,
            };

            match sessions.last_mut() {
                Some(current) if !starts_new => current.pours.push(pour.clone()),
                _ => {
                    let number = sessions.len() + 1;
                    sessions.push(Session::open(number, pour));
                }
            }
            previous = Some(pour);
        }

        debug!(
            pours = pours.len(),
            sessions = sessions.len(),
            gap_seconds = self.gap_seconds,
            "grouped pours into sessions"
        );
        sessions
    }
}

/// Partition `pours` into sessions separated by more than `gap_seconds`.
pub fn group_into_sessions(pours: &[PourRecord], gap_seconds: i64) -> Vec<Session> {
    SessionGrouper::with_gap(gap_seconds).group(pours)
}
