//! End-to-end tests: record pours in SQLite, then run the analytics over
//! what the store returns.

use chrono::{DateTime, Duration, TimeZone, Utc};
use kegstats_core::stats::{current_drinkers, leaderboard};
use kegstats_core::{
    current_bac, decay_sample, estimate_instant_bac, CoreError, Database, DatabaseError,
    DrinkerProfile, DrinkerStats, DrinkingRateClassifier, Gender, LeaderMetric, NewKeg,
    PourSource, Rating, SessionGrouper,
};
use tempfile::TempDir;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 20, 0, 0).unwrap()
}

fn pale_ale() -> NewKeg {
    NewKeg {
        beer_name: "Pale Ale".to_string(),
        alcohol_pct: 0.05,
        calories_per_ounce: 12.0,
        capacity_ounces: 1984.0,
    }
}

#[test]
fn running_bac_is_decayed_previous_plus_instant() {
    let db = Database::open_memory().unwrap();
    let profile = DrinkerProfile::new(180.0, Gender::Male);
    let alice = db.add_drinker("alice", profile).unwrap();
    let keg = db.add_keg(&pale_ale()).unwrap();

    let first = db
        .record_pour(alice.id, keg.id, t0(), t0() + Duration::seconds(30), 12.0)
        .unwrap();
    let first_bac = first.recorded_bac.unwrap().bac;
    let instant = estimate_instant_bac(&profile, 12.0, 0.05).unwrap();
    assert!((first_bac - instant).abs() < 1e-12);

    let second_start = t0() + Duration::hours(1);
    let second = db
        .record_pour(alice.id, keg.id, second_start, second_start + Duration::seconds(30), 12.0)
        .unwrap();
    let expected = decay_sample(first_bac, 3600.0) + instant;
    assert!((second.recorded_bac.unwrap().bac - expected).abs() < 1e-12);

    let latest = db.latest_sample(alice.id).unwrap().unwrap();
    assert_eq!(latest.sample_time, second.end_time);
    let later = latest.sample_time + Duration::hours(10);
    assert_eq!(current_bac(&profile, Some(&latest), later), 0.0);
}

#[test]
fn history_feeds_sessions_and_rating() {
    let db = Database::open_memory().unwrap();
    let bob = db
        .add_drinker("bob", DrinkerProfile::new(160.0, Gender::Male))
        .unwrap();
    let keg = db.add_keg(&pale_ale()).unwrap();

    // one evening of three 10 oz pours over 90 minutes
    for offset in [0, 2700, 5340] {
        let start = t0() + Duration::seconds(offset);
        db.record_pour(bob.id, keg.id, start, start + Duration::seconds(60), 10.0)
            .unwrap();
    }
    // a lone pour the next day
    let next_day = t0() + Duration::days(1);
    db.record_pour(bob.id, keg.id, next_day, next_day + Duration::seconds(600), 10.0)
        .unwrap();

    let pours = db.pours_for_user(bob.id).unwrap();
    assert_eq!(pours.len(), 4);
    assert!(pours.iter().all(|p| p.recorded_bac.is_some()));

    let sessions = SessionGrouper::new().group(&pours);
    assert_eq!(sessions.len(), 2);
    let report = DrinkingRateClassifier::new().classify(&sessions);
    assert_eq!(report.rating, Rating::Heavy);
}

#[test]
fn invalidated_pours_drop_out() {
    let db = Database::open_memory().unwrap();
    let carol = db
        .add_drinker("carol", DrinkerProfile::new(130.0, Gender::Female))
        .unwrap();
    let keg = db.add_keg(&pale_ale()).unwrap();
    let pour = db
        .record_pour(carol.id, keg.id, t0(), t0() + Duration::seconds(20), 8.0)
        .unwrap();

    db.invalidate_pour(pour.id).unwrap();
    assert!(db.pours_for_user(carol.id).unwrap().is_empty());
    assert!(db.latest_sample(carol.id).unwrap().is_none());

    let err = db.invalidate_pour(pour.id).unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound { entity: "pour", .. }));
}

#[test]
fn drinker_stats_and_leaderboards() {
    let db = Database::open_memory().unwrap();
    let a = db.add_drinker("a", DrinkerProfile::new(200.0, Gender::Male)).unwrap();
    let b = db.add_drinker("b", DrinkerProfile::new(120.0, Gender::Female)).unwrap();
    let keg = db.add_keg(&pale_ale()).unwrap();

    db.record_pour(a.id, keg.id, t0(), t0() + Duration::seconds(10), 16.0).unwrap();
    db.record_pour(a.id, keg.id, t0() + Duration::minutes(30), t0() + Duration::minutes(31), 16.0)
        .unwrap();
    db.record_pour(b.id, keg.id, t0(), t0() + Duration::seconds(10), 16.0).unwrap();

    let kegs = db.kegs().unwrap();
    let now = t0() + Duration::hours(2);
    let stats = DrinkerStats::compute(&db.pours_for_user(a.id).unwrap(), &kegs, now);
    assert_eq!(stats.pour_count, 2);
    assert_eq!(stats.total_ounces, 32.0);
    assert_eq!(stats.total_calories, 384.0);
    assert_eq!(stats.last_24h_ounces, 32.0);
    assert!(stats.peak_bac > 0.0);

    let all = db.all_pours().unwrap();
    let volume = leaderboard(&all, LeaderMetric::Volume, None, 5);
    assert_eq!(volume[0].user_id, a.id);
    assert_eq!(volume[0].amount, 32.0);
    assert_eq!(volume[1].rank, 2);

    // the lighter drinker peaks higher on a single pint
    let bac = leaderboard(&all, LeaderMetric::Bac, Some(keg.id), 1);
    assert_eq!(bac.len(), 1);
    assert_eq!(bac[0].user_id, b.id);

    let drinking = current_drinkers(&db.latest_samples().unwrap(), t0() + Duration::minutes(40));
    assert_eq!(drinking.len(), 2);
    assert!(current_drinkers(&db.latest_samples().unwrap(), now + Duration::days(1)).is_empty());
}

#[test]
fn rejects_bad_input() {
    let db = Database::open_memory().unwrap();
    let keg = db.add_keg(&pale_ale()).unwrap();

    let err = db
        .add_drinker("ghost", DrinkerProfile::new(0.0, Gender::Male))
        .unwrap_err();
    assert!(matches!(err, CoreError::Validation(_)));

    let d = db.add_drinker("dave", DrinkerProfile::new(170.0, Gender::Male)).unwrap();
    let dup = db
        .add_drinker("dave", DrinkerProfile::new(170.0, Gender::Male))
        .unwrap_err();
    assert!(matches!(
        dup,
        CoreError::Database(DatabaseError::AlreadyExists { .. })
    ));

    let backwards = db.record_pour(d.id, keg.id, t0(), t0() - Duration::seconds(5), 12.0);
    assert!(matches!(backwards, Err(CoreError::Validation(_))));

    let negative = db.record_pour(d.id, keg.id, t0(), t0(), -1.0);
    assert!(matches!(negative, Err(CoreError::Validation(_))));

    let no_keg = db.record_pour(d.id, 999, t0(), t0(), 12.0);
    assert!(matches!(
        no_keg,
        Err(CoreError::Database(DatabaseError::NotFound { entity: "keg", .. }))
    ));
}

#[test]
fn data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kegstats.db");
    {
        let db = Database::open_at(&path).unwrap();
        let e = db.add_drinker("erin", DrinkerProfile::new(150.0, Gender::Female)).unwrap();
        let keg = db.add_keg(&pale_ale()).unwrap();
        db.record_pour(e.id, keg.id, t0(), t0() + Duration::seconds(15), 12.0).unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    let erin = db.require_drinker("erin").unwrap();
    assert_eq!(erin.profile.gender, Gender::Female);
    let pours = db.pours_for_user(erin.id).unwrap();
    assert_eq!(pours.len(), 1);
    assert_eq!(pours[0].start_time, t0());
}
