use clap::Subcommand;
use kegstats_core::{Database, DrinkerProfile, Gender};

use super::print_json;

#[derive(Subcommand)]
pub enum DrinkerAction {
    /// Register a drinker
    Add {
        /// Unique username
        username: String,
        /// Body weight in pounds
        #[arg(long)]
        weight: f64,
        /// male or female
        #[arg(long)]
        gender: Gender,
    },
    /// List registered drinkers
    List {
        /// Plain text instead of JSON
        #[arg(long)]
        text: bool,
    },
}

pub fn run(action: DrinkerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        DrinkerAction::Add {
            username,
            weight,
            gender,
        } => {
            let drinker = db.add_drinker(&username, DrinkerProfile::new(weight, gender))?;
            print_json(&drinker)?;
        }
        DrinkerAction::List { text } => {
            let drinkers = db.list_drinkers()?;
            if text {
                for d in &drinkers {
                    println!(
                        "{:>4}  {:<20} {:>6.1} lb  {}",
                        d.id, d.username, d.profile.weight_lb, d.profile.gender
                    );
                }
            } else {
                print_json(&drinkers)?;
            }
        }
    }
    Ok(())
}
