use clap::Args;
use kegstats_core::{Config, Database, PourSource};

use super::print_json;

#[derive(Args)]
pub struct RatingArgs {
    /// Drinker username
    username: String,
    /// Plain text instead of JSON
    #[arg(long)]
    text: bool,
}

pub fn run(args: RatingArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let drinker = db.require_drinker(&args.username)?;

    let pours = db.pours_for_user(drinker.id)?;
    let sessions = config.session_grouper().group(&pours);
    let report = config.rate_classifier().classify(&sessions);

    if args.text {
        print!("{}", report.render());
    } else {
        print_json(&report)?;
    }
    Ok(())
}
