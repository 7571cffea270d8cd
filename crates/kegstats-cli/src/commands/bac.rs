use chrono::{DateTime, Utc};
use clap::Subcommand;
use kegstats_core::bac::hours_until_sober;
use kegstats_core::stats::current_drinkers;
use kegstats_core::{
    estimate_instant_bac, BacSample, Database, DrinkerProfile, Gender, PourSource, Quantity,
    VolumeUnit,
};
use serde::Serialize;
use std::collections::HashMap;

use super::print_json;

#[derive(Subcommand)]
pub enum BacAction {
    /// Estimate the BAC of a single pour
    Estimate {
        /// Body weight in pounds
        #[arg(long)]
        weight: f64,
        /// male or female
        #[arg(long)]
        gender: Gender,
        /// Poured amount
        #[arg(long)]
        volume: f64,
        /// Unit of --volume
        #[arg(long, default_value = "oz")]
        unit: VolumeUnit,
        /// Alcohol by volume in percent (e.g. 5.2)
        #[arg(long)]
        abv: f64,
    },
    /// A drinker's BAC right now
    Current {
        /// Drinker username
        username: String,
    },
    /// Everyone still above zero
    Drinkers {
        /// Plain text instead of JSON
        #[arg(long)]
        text: bool,
    },
}

#[derive(Serialize)]
struct BacReading {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    bac: f64,
    over_limit: bool,
    hours_until_sober: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample_time: Option<DateTime<Utc>>,
}

impl BacReading {
    /// Reading of `current`; `recorded_at` is the stored sample it decayed from.
    fn new(
        username: Option<String>,
        current: &BacSample,
        recorded_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            username,
            bac: current.bac,
            over_limit: current.is_over_limit(),
            hours_until_sober: hours_until_sober(current.bac),
            sample_time: recorded_at,
        }
    }
}

pub fn run(action: BacAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BacAction::Estimate {
            weight,
            gender,
            volume,
            unit,
            abv,
        } => {
            let profile = DrinkerProfile::new(weight, gender);
            let ounces = Quantity::new(volume, unit).in_ounces();
            let bac = estimate_instant_bac(&profile, ounces, abv / 100.0)?;
            print_json(&BacReading::new(None, &BacSample::new(bac, Utc::now()), None))?;
        }
        BacAction::Current { username } => {
            let db = Database::open()?;
            let drinker = db.require_drinker(&username)?;
            let now = Utc::now();
            let latest = db.latest_sample(drinker.id)?;
            let current = latest
                .map(|s| s.decayed_to(now))
                .unwrap_or_else(|| BacSample::new(0.0, now));
            print_json(&BacReading::new(
                Some(drinker.username),
                &current,
                latest.map(|s| s.sample_time),
            ))?;
        }
        BacAction::Drinkers { text } => {
            let db = Database::open()?;
            let names: HashMap<i64, String> = db
                .list_drinkers()?
                .into_iter()
                .map(|d| (d.id, d.username))
                .collect();

            let now = Utc::now();
            let readings: Vec<BacReading> = current_drinkers(&db.latest_samples()?, now)
                .into_iter()
                .map(|d| {
                    let current = BacSample::new(d.bac, now);
                    BacReading::new(names.get(&d.user_id).cloned(), &current, None)
                })
                .collect();

            if text {
                if readings.is_empty() {
                    println!("nobody is drinking");
                }
                for r in &readings {
                    let flag = if r.over_limit { "  over limit" } else { "" };
                    println!(
                        "{:<20} {:.3}  sober in {:.1} h{flag}",
                        r.username.as_deref().unwrap_or("?"),
                        r.bac,
                        r.hours_until_sober
                    );
                }
            } else {
                print_json(&readings)?;
            }
        }
    }
    Ok(())
}
