use clap::Subcommand;
use kegstats_core::stats::by_volume;
use kegstats_core::{
    Config, Database, DatabaseError, Keg, KegStats, KegStatus, NewKeg, PourSource, Quantity,
    VolumeUnit,
};
use serde::Serialize;
use std::collections::HashMap;

use super::print_json;

#[derive(Serialize)]
struct KegLeader {
    username: String,
    ounces: f64,
}

#[derive(Serialize)]
struct KegInfo {
    keg: Keg,
    stats: KegStats,
    leaders: Vec<KegLeader>,
}

#[derive(Subcommand)]
pub enum KegAction {
    /// Put a new keg on tap
    Add {
        /// Beer name
        beer: String,
        /// Alcohol by volume in percent (e.g. 5.2)
        #[arg(long)]
        abv: f64,
        /// Calories per ounce
        #[arg(long, default_value_t = 0.0)]
        calories: f64,
        /// Keg capacity, in --unit
        #[arg(long, requires = "unit")]
        capacity: Option<f64>,
        /// Unit of --capacity (l, ml, oz, pint, gal, half-barrel, pony, ...)
        #[arg(long)]
        unit: Option<VolumeUnit>,
    },
    /// List kegs
    List {
        /// Plain text instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Fill level, pours served and volume leaders of one keg
    Info {
        /// Keg id
        id: i64,
        /// Plain text instead of JSON
        #[arg(long)]
        text: bool,
    },
    /// Take a keg off tap
    Offline {
        /// Keg id
        id: i64,
    },
}

pub fn run(action: KegAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        KegAction::Add {
            beer,
            abv,
            calories,
            capacity,
            unit,
        } => {
            let capacity_ounces = match (capacity, unit) {
                (Some(amount), Some(unit)) => Quantity::new(amount, unit).in_ounces(),
                (Some(amount), None) => amount,
                (None, _) => 0.0,
            };
            let keg = db.add_keg(&NewKeg {
                beer_name: beer,
                alcohol_pct: abv / 100.0,
                calories_per_ounce: calories,
                capacity_ounces,
            })?;
            print_json(&keg)?;
        }
        KegAction::List { text } => {
            let kegs = db.list_kegs()?;
            if text {
                for k in &kegs {
                    println!(
                        "{:>4}  {:<24} {:>5.1}%  {:>8.1} oz  {}",
                        k.id,
                        k.beer_name,
                        k.alcohol_pct * 100.0,
                        k.capacity_ounces,
                        k.status.as_str()
                    );
                }
            } else {
                print_json(&kegs)?;
            }
        }
        KegAction::Info { id, text } => {
            let keg = db.keg(id)?.ok_or_else(|| DatabaseError::NotFound {
                entity: "keg",
                key: id.to_string(),
            })?;
            let config = Config::load()?;
            let names: HashMap<i64, String> = db
                .list_drinkers()?
                .into_iter()
                .map(|d| (d.id, d.username))
                .collect();

            let pours = db.all_pours()?;
            let stats = KegStats::compute(&keg, &pours);
            let leaders: Vec<KegLeader> = by_volume(&pours, Some(id), config.leaders.limit)
                .into_iter()
                .map(|e| KegLeader {
                    username: names
                        .get(&e.user_id)
                        .cloned()
                        .unwrap_or_else(|| e.user_id.to_string()),
                    ounces: e.amount,
                })
                .collect();

            if text {
                let unit = config.display.volume_unit;
                println!("Keg {}: {} ({})", keg.id, keg.beer_name, keg.status.as_str());
                println!("Pours served: {}", stats.pour_count);
                println!(
                    "Served:       {}",
                    Quantity::ounces(stats.served_ounces).convert_to(unit)
                );
                match stats.percent_full {
                    Some(pct) => println!(
                        "Remaining:    {} ({pct:.0}% full)",
                        Quantity::ounces(stats.remaining_ounces).convert_to(unit)
                    ),
                    None => println!("Remaining:    unknown capacity"),
                }
                for (i, l) in leaders.iter().enumerate() {
                    println!(
                        "{:>2}. {:<20} {}",
                        i + 1,
                        l.username,
                        Quantity::ounces(l.ounces).convert_to(unit)
                    );
                }
            } else {
                print_json(&KegInfo {
                    keg,
                    stats,
                    leaders,
                })?;
            }
        }
        KegAction::Offline { id } => {
            db.set_keg_status(id, KegStatus::Offline)?;
            println!("keg {id} offline");
        }
    }
    Ok(())
}
