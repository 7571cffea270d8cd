//! Basic CLI E2E tests.
//!
//! Each test drives the `kegstats` binary against its own temporary data
//! directory.

use std::process::Command;
use tempfile::TempDir;

/// Run a CLI command with `home` as the data directory and return output.
fn run_cli(home: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_kegstats"))
        .env("KEGSTATS_HOME", home.path())
        .env_remove("KEGSTATS_LOG")
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Run a CLI command and expect success.
fn run_ok(home: &TempDir, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "command {args:?} failed: {stderr}");
    stdout
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

/// A drinker "alice" and a 5% keg with id 1.
fn seeded() -> TempDir {
    let home = TempDir::new().unwrap();
    run_ok(&home, &["drinker", "add", "alice", "--weight", "180", "--gender", "male"]);
    run_ok(&home, &["keg", "add", "House Pale", "--abv", "5", "--calories", "12"]);
    home
}

#[test]
fn test_bac_estimate() {
    let home = TempDir::new().unwrap();
    let out = run_ok(
        &home,
        &["bac", "estimate", "--weight", "180", "--gender", "male", "--volume", "12", "--abv", "5"],
    );
    let json = parse_json(&out);
    let bac = json["bac"].as_f64().unwrap();
    assert!((bac - 0.02386).abs() < 1e-4);
    assert_eq!(json["over_limit"], false);

    let out = run_ok(
        &home,
        &["bac", "estimate", "--weight", "120", "--gender", "f", "--volume", "2", "--unit", "pint", "--abv", "6"],
    );
    assert_eq!(parse_json(&out)["over_limit"], true);
}

#[test]
fn test_bac_estimate_rejects_zero_weight() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(
        &home,
        &["bac", "estimate", "--weight", "0", "--gender", "female", "--volume", "12", "--abv", "5"],
    );
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
    assert!(stderr.contains("weight"));
}

#[test]
fn test_drinker_add_and_list() {
    let home = seeded();
    let json = parse_json(&run_ok(&home, &["drinker", "list"]));
    let drinkers = json.as_array().unwrap();
    assert_eq!(drinkers.len(), 1);
    assert_eq!(drinkers[0]["username"], "alice");
    assert_eq!(drinkers[0]["profile"]["gender"], "male");

    let (_, stderr, code) = run_cli(
        &home,
        &["drinker", "add", "alice", "--weight", "150", "--gender", "f"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_keg_add_converts_capacity() {
    let home = TempDir::new().unwrap();
    let out = run_ok(
        &home,
        &["keg", "add", "Stout", "--abv", "6", "--capacity", "1", "--unit", "half-barrel"],
    );
    let keg = parse_json(&out);
    assert!((keg["alcohol_pct"].as_f64().unwrap() - 0.06).abs() < 1e-12);
    assert!((keg["capacity_ounces"].as_f64().unwrap() - 1984.0).abs() < 1.0);

    run_ok(&home, &["keg", "offline", "1"]);
    let kegs = parse_json(&run_ok(&home, &["keg", "list"]));
    assert_eq!(kegs[0]["status"], "offline");
}

#[test]
fn test_pours_sessions_and_rating() {
    let home = seeded();
    for at in [
        "2024-02-16T19:01:00Z",
        "2024-02-16T19:46:00Z",
        "2024-02-16T20:30:00Z",
        "2024-02-17T19:10:00Z",
    ] {
        run_ok(
            &home,
            &["pour", "add", "alice", "--keg", "1", "--volume", "10", "--at", at, "--duration", "60"],
        );
    }

    let pours = parse_json(&run_ok(&home, &["pour", "list", "alice"]));
    assert_eq!(pours.as_array().unwrap().len(), 4);
    assert!(pours[0]["recorded_bac"]["bac"].as_f64().unwrap() > 0.0);

    let sessions = parse_json(&run_ok(&home, &["sessions", "alice"]));
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["number"], 1);
    assert_eq!(sessions[0]["pour_count"], 3);
    assert_eq!(sessions[0]["duration_seconds"], 5400);

    let report = parse_json(&run_ok(&home, &["rating", "alice"]));
    assert_eq!(report["rating"], "heavy");
    assert_eq!(report["metrics"]["session_count"], 1);

    let text = run_ok(&home, &["rating", "alice", "--text"]);
    assert!(text.starts_with("Rating: heavy"));

    // a tiny gap splits every pour into its own session
    let split = parse_json(&run_ok(&home, &["sessions", "alice", "--gap", "60"]));
    assert_eq!(split.as_array().unwrap().len(), 4);
}

#[test]
fn test_invalidated_pour_leaves_stats() {
    let home = seeded();
    let pour = parse_json(&run_ok(
        &home,
        &["pour", "add", "alice", "--keg", "1", "--volume", "1", "--unit", "pint"],
    ));
    let id = pour["id"].as_i64().unwrap().to_string();
    assert!((pour["volume_ounces"].as_f64().unwrap() - 16.0).abs() < 0.01);

    let stats = parse_json(&run_ok(&home, &["stats", "alice"]));
    assert_eq!(stats["pour_count"], 1);

    run_ok(&home, &["pour", "invalidate", &id]);
    let stats = parse_json(&run_ok(&home, &["stats", "alice"]));
    assert_eq!(stats["pour_count"], 0);
    assert_eq!(stats["peak_bac_pour_id"], serde_json::Value::Null);
}

#[test]
fn test_leaders_and_current_drinkers() {
    let home = seeded();
    run_ok(&home, &["drinker", "add", "bob", "--weight", "150", "--gender", "male"]);
    run_ok(&home, &["pour", "add", "alice", "--keg", "1", "--volume", "12"]);
    run_ok(&home, &["pour", "add", "bob", "--keg", "1", "--volume", "24"]);

    let board = parse_json(&run_ok(&home, &["leaders", "--by", "volume"]));
    assert_eq!(board[0]["username"], "bob");
    assert_eq!(board[0]["rank"], 1);
    assert_eq!(board[1]["username"], "alice");

    let top = parse_json(&run_ok(&home, &["leaders", "--by", "count", "--limit", "1"]));
    assert_eq!(top.as_array().unwrap().len(), 1);

    let drinking = parse_json(&run_ok(&home, &["bac", "drinkers"]));
    assert_eq!(drinking.as_array().unwrap().len(), 2);
    assert_eq!(drinking[0]["username"], "bob");

    let current = parse_json(&run_ok(&home, &["bac", "current", "alice"]));
    assert!(current["bac"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_unknown_drinker_fails() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(&home, &["stats", "nobody"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_config_get_set() {
    let home = TempDir::new().unwrap();
    assert_eq!(run_ok(&home, &["config", "get", "sessions.gap_seconds"]).trim(), "5400");

    run_ok(&home, &["config", "set", "sessions.gap_seconds", "3600"]);
    assert_eq!(run_ok(&home, &["config", "get", "sessions.gap_seconds"]).trim(), "3600");

    let (_, _, code) = run_cli(&home, &["config", "set", "sessions.nope", "1"]);
    assert_eq!(code, 1);

    run_ok(&home, &["config", "reset"]);
    let config = parse_json(&run_ok(&home, &["config", "list"]));
    assert_eq!(config["leaders"]["limit"], 5);
}

#[test]
fn test_pour_duration_out_of_range_is_an_error() {
    let home = seeded();
    let (_, stderr, code) = run_cli(
        &home,
        &["pour", "add", "alice", "--keg", "1", "--volume", "12", "--duration", "99999999999999999"],
    );
    assert_eq!(code, 1);
    assert!(stderr.starts_with("error:"));
    assert!(stderr.contains("duration"));

    let pours = parse_json(&run_ok(&home, &["pour", "list", "alice"]));
    assert!(pours.as_array().unwrap().is_empty());
}

#[test]
fn test_keg_info() {
    let home = TempDir::new().unwrap();
    run_ok(&home, &["drinker", "add", "alice", "--weight", "180", "--gender", "male"]);
    run_ok(&home, &["drinker", "add", "bob", "--weight", "150", "--gender", "male"]);
    run_ok(
        &home,
        &["keg", "add", "Pils", "--abv", "4.8", "--capacity", "160", "--unit", "oz"],
    );
    run_ok(&home, &["keg", "add", "Stout", "--abv", "6"]);
    run_ok(&home, &["pour", "add", "alice", "--keg", "1", "--volume", "16"]);
    run_ok(&home, &["pour", "add", "bob", "--keg", "1", "--volume", "24"]);
    run_ok(&home, &["pour", "add", "bob", "--keg", "2", "--volume", "12"]);

    let info = parse_json(&run_ok(&home, &["keg", "info", "1"]));
    assert_eq!(info["keg"]["beer_name"], "Pils");
    assert_eq!(info["stats"]["pour_count"], 2);
    assert!((info["stats"]["served_ounces"].as_f64().unwrap() - 40.0).abs() < 1e-6);
    assert!((info["stats"]["remaining_ounces"].as_f64().unwrap() - 120.0).abs() < 1e-6);
    assert!((info["stats"]["percent_full"].as_f64().unwrap() - 75.0).abs() < 1e-6);
    assert_eq!(info["leaders"][0]["username"], "bob");
    assert!((info["leaders"][0]["ounces"].as_f64().unwrap() - 24.0).abs() < 1e-6);
    assert_eq!(info["leaders"].as_array().unwrap().len(), 2);

    let text = run_ok(&home, &["keg", "info", "1", "--text"]);
    assert!(text.contains("75% full"));

    let (_, stderr, code) = run_cli(&home, &["keg", "info", "9"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_config_accepts_short_unit_names() {
    let home = TempDir::new().unwrap();
    run_ok(&home, &["config", "set", "display.volume_unit", "oz"]);
    assert_eq!(run_ok(&home, &["config", "get", "display.volume_unit"]).trim(), "ounce");

    run_ok(&home, &["config", "set", "display.volume_unit", "l"]);
    assert_eq!(run_ok(&home, &["config", "get", "display.volume_unit"]).trim(), "liter");
}
