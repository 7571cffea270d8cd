use chrono::Utc;
use clap::Args;
use kegstats_core::{Config, Database, DrinkerStats, PourSource, Quantity};

use super::print_json;

#[derive(Args)]
pub struct StatsArgs {
    /// Drinker username
    username: String,
    /// Plain text instead of JSON
    #[arg(long)]
    text: bool,
}

pub fn run(args: StatsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let drinker = db.require_drinker(&args.username)?;

    let pours = db.pours_for_user(drinker.id)?;
    let kegs = db.kegs()?;
    let stats = DrinkerStats::compute(&pours, &kegs, Utc::now());

    if args.text {
        let unit = Config::load_or_default().display.volume_unit;
        println!("Drinker:       {}", drinker.username);
        println!("Pours:         {}", stats.pour_count);
        println!(
            "Total volume:  {}",
            Quantity::ounces(stats.total_ounces).convert_to(unit)
        );
        println!(
            "Last 24 hours: {}",
            Quantity::ounces(stats.last_24h_ounces).convert_to(unit)
        );
        println!("Calories:      {:.0}", stats.total_calories);
        match stats.peak_bac_pour_id {
            Some(id) => println!("Peak BAC:      {:.3} (pour {id})", stats.peak_bac),
            None => println!("Peak BAC:      n/a"),
        }
    } else {
        print_json(&stats)?;
    }
    Ok(())
}
