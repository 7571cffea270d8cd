use chrono::{DateTime, Duration, Utc};
use clap::Subcommand;
use kegstats_core::{Config, Database, PourSource, Quantity, ValidationError, VolumeUnit};

use super::print_json;

#[derive(Subcommand)]
pub enum PourAction {
    /// Record a pour and the drinker's running BAC
    Add {
        /// Drinker username
        username: String,
        /// Keg the beer came from
        #[arg(long)]
        keg: i64,
        /// Poured amount
        #[arg(long)]
        volume: f64,
        /// Unit of --volume (defaults to display.volume_unit)
        #[arg(long)]
        unit: Option<VolumeUnit>,
        /// When the pour finished, RFC 3339 (defaults to now)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        /// How long the pour took, in seconds
        #[arg(long, default_value_t = 0)]
        duration: i64,
    },
    /// List a drinker's valid pours
    List {
        /// Drinker username
        username: String,
        /// Plain text instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Exclude a pour from every statistic
    Invalidate {
        /// Pour id
        id: i64,
    },
}

pub fn run(action: PourAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        PourAction::Add {
            username,
            keg,
            volume,
            unit,
            at,
            duration,
        } => {
            let config = Config::load()?;
            let unit = unit.unwrap_or(config.display.volume_unit);
            let drinker = db.require_drinker(&username)?;

            let end = at.unwrap_or_else(Utc::now);
            let start = Duration::try_seconds(duration.max(0))
                .and_then(|d| end.checked_sub_signed(d))
                .ok_or_else(|| {
                    ValidationError::InvalidValue {
                        field: "duration".to_string(),
                        message: format!("{duration} seconds is out of range"),
                    }
                })?;
            let ounces = Quantity::new(volume, unit).in_ounces();

            let pour = db.record_pour(drinker.id, keg, start, end, ounces)?;
            print_json(&pour)?;
        }
        PourAction::List { username, text } => {
            let drinker = db.require_drinker(&username)?;
            let pours = db.pours_for_user(drinker.id)?;
            if text {
                let unit = Config::load_or_default().display.volume_unit;
                for p in &pours {
                    let bac = p.recorded_bac.map(|s| s.bac).unwrap_or(0.0);
                    println!(
                        "{:>5}  {}  {:>12}  bac {:.3}",
                        p.id,
                        p.start_time.format("%Y-%m-%d %H:%M:%S"),
                        Quantity::ounces(p.volume_ounces).convert_to(unit).to_string(),
                        bac
                    );
                }
            } else {
                print_json(&pours)?;
            }
        }
        PourAction::Invalidate { id } => {
            db.invalidate_pour(id)?;
            println!("pour {id} invalidated");
        }
    }
    Ok(())
}
