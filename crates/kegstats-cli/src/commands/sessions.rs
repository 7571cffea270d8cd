use chrono::{DateTime, Utc};
use clap::Args;
use kegstats_core::{Config, Database, PourSource, Quantity, Session, SessionGrouper};
use serde::Serialize;

use super::print_json;

#[derive(Args)]
pub struct SessionsArgs {
    /// Drinker username
    username: String,
    /// Idle seconds between pours that end a session (defaults to sessions.gap_seconds)
    #[arg(long)]
    gap: Option<i64>,
    /// Plain text instead of JSON
    #[arg(long)]
    text: bool,
}

#[derive(Serialize)]
struct SessionSummary {
    number: usize,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    duration_seconds: i64,
    pour_count: usize,
    total_ounces: f64,
    pour_ids: Vec<i64>,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        Self {
            number: session.number,
            start_time: session.start_time(),
            end_time: session.end_time(),
            duration_seconds: session.duration_seconds(),
            pour_count: session.pour_count(),
            total_ounces: session.total_ounces(),
            pour_ids: session.pours.iter().map(|p| p.id).collect(),
        }
    }
}

pub fn run(args: SessionsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let drinker = db.require_drinker(&args.username)?;
    let pours = db.pours_for_user(drinker.id)?;

    let grouper = match args.gap {
        Some(gap) => SessionGrouper::with_gap(gap),
        None => config.session_grouper(),
    };
    let sessions = grouper.group(&pours);
    let summaries: Vec<SessionSummary> = sessions.iter().map(SessionSummary::from).collect();

    if args.text {
        let unit = config.display.volume_unit;
        if summaries.is_empty() {
            println!("no sessions for {}", drinker.username);
        }
        for s in &summaries {
            let start = s
                .start_time
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            println!(
                "#{:<3} {start}  {:>2} pours  {:>12}  {:.2} h",
                s.number,
                s.pour_count,
                Quantity::ounces(s.total_ounces).convert_to(unit).to_string(),
                s.duration_seconds as f64 / 3600.0
            );
        }
    } else {
        print_json(&summaries)?;
    }
    Ok(())
}
