use clap::{Args, ValueEnum};
use kegstats_core::stats::leaderboard;
use kegstats_core::{Config, Database, LeaderMetric, PourSource};
use serde::Serialize;
use std::collections::HashMap;

use super::print_json;

#[derive(Clone, Copy, ValueEnum)]
enum Board {
    /// Total ounces poured
    Volume,
    /// Number of pours
    Count,
    /// Highest recorded BAC
    Bac,
}

impl From<Board> for LeaderMetric {
    fn from(board: Board) -> Self {
        match board {
            Board::Volume => LeaderMetric::Volume,
            Board::Count => LeaderMetric::Count,
            Board::Bac => LeaderMetric::Bac,
        }
    }
}

#[derive(Args)]
pub struct LeadersArgs {
    /// What to rank by
    #[arg(long, value_enum, default_value = "volume")]
    by: Board,
    /// Only count pours from this keg
    #[arg(long)]
    keg: Option<i64>,
    /// Board size (defaults to leaders.limit)
    #[arg(long)]
    limit: Option<usize>,
    /// Plain text instead of JSON
    #[arg(long)]
    text: bool,
}

#[derive(Serialize)]
struct Row {
    rank: usize,
    username: String,
    amount: f64,
}

pub fn run(args: LeadersArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let names: HashMap<i64, String> = db
        .list_drinkers()?
        .into_iter()
        .map(|d| (d.id, d.username))
        .collect();

    let limit = args.limit.unwrap_or(config.leaders.limit);
    let board = leaderboard(&db.all_pours()?, args.by.into(), args.keg, limit);
    let rows: Vec<Row> = board
        .into_iter()
        .map(|e| Row {
            rank: e.rank,
            username: names
                .get(&e.user_id)
                .cloned()
                .unwrap_or_else(|| e.user_id.to_string()),
            amount: e.amount,
        })
        .collect();

    if args.text {
        for r in &rows {
            let amount = match args.by {
                Board::Volume => format!("{:.1} oz", r.amount),
                Board::Count => format!("{:.0} pours", r.amount),
                Board::Bac => format!("{:.3}", r.amount),
            };
            println!("{:>2}. {:<20} {amount}", r.rank, r.username);
        }
    } else {
        print_json(&rows)?;
    }
    Ok(())
}
