// Tests for replaying throw logs through the engine
use cornhole_core::{
    BoardGeometry, Bounds, LandingResult, MatchOutcome, MatchRules, MatchStatus, PhysicsConfig,
    Point, WindState,
};
use cornhole_host::{
    load_log, load_report, replay_match, save_report, simulate_throw, LoggedThrow, ThrowLog,
};
use serde_json::json;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/match-log_seed42.json");

fn throw(player: usize, angle: f64, power: f64) -> LoggedThrow {
    LoggedThrow {
        player,
        angle,
        power,
    }
}

fn log_with(throws: Vec<LoggedThrow>) -> ThrowLog {
    ThrowLog {
        v: 1,
        seed: 7,
        board: None,
        rules: None,
        physics: None,
        players: None,
        initial_wind: None,
        throws,
    }
}

/// A board so large every landing counts as a hole
fn everything_is_a_hole() -> BoardGeometry {
    BoardGeometry {
        bounds: Bounds {
            x: -100.0,
            y: -100.0,
            width: 1000.0,
            height: 800.0,
        },
        hole_center: Point::new(400.0, 300.0),
        hole_radius: 2000.0,
    }
}

#[test]
fn test_replay_fixture_log() {
    let log = load_log(FIXTURE).expect("Failed to load fixture");
    let report = replay_match(&log).expect("Replay failed");

    assert_eq!(report.throws.len(), 6, "Expected all 6 throws replayed");
    assert_eq!(report.summary.status, MatchStatus::Active);
    assert_eq!(report.summary.rounds, 4, "Three full rounds played, fourth pending");
    assert_eq!(report.summary.players.len(), 2);
    assert_eq!(report.summary.players[0].username, "bagmaster");
    assert!(report.summary.outcome.is_none(), "Unfinished match has no outcome");
    assert_eq!(report.log_hash.len(), 64, "Hash should be 32 bytes hex-encoded");

    let mut per_player = [0u32; 2];
    for t in &report.throws {
        per_player[t.player] += t.points;
    }
    assert_eq!(per_player, report.summary.scores, "Every throw is scored exactly once");

    for (i, t) in report.throws.iter().enumerate() {
        assert_eq!(t.player, i % 2, "Players alternate");
        assert_eq!(t.round as usize, i / 2 + 1);
    }
}

#[test]
fn test_replay_determinism() {
    let log = load_log(FIXTURE).unwrap();
    let a = replay_match(&log).unwrap();
    let b = replay_match(&log).unwrap();

    assert_eq!(a.log_hash, b.log_hash, "Same log must give the same hash");
    assert_eq!(a.summary, b.summary);
    assert_eq!(a.throws, b.throws);
    assert_eq!(a.final_wind, b.final_wind);
}

#[test]
fn test_seed_changes_wind_but_not_hash_inputs() {
    let log = load_log(FIXTURE).unwrap();
    let mut other = log.clone();
    other.seed = 43;

    let a = replay_match(&log).unwrap();
    let b = replay_match(&other).unwrap();
    assert_ne!(a.throws[0].wind, b.throws[0].wind, "Wind is drawn from the seed");
    assert_ne!(a.log_hash, b.log_hash, "Seed is bound into the hash");
}

#[test]
fn test_hole_in_one_with_synced_calm_wind() {
    let mut log = log_with(vec![throw(0, 90.0, 80.0)]);
    log.initial_wind = Some(WindState::CALM);
    log.board = Some(BoardGeometry {
        bounds: Bounds {
            x: 320.0,
            y: 330.0,
            width: 160.0,
            height: 240.0,
        },
        hole_center: Point::new(400.0, 448.6),
        hole_radius: 25.0,
    });

    let report = replay_match(&log).unwrap();
    assert_eq!(report.throws[0].result, LandingResult::Hole);
    assert_eq!(report.summary.scores, [3, 0]);
    assert_eq!(report.summary.status, MatchStatus::Active);
}

#[test]
fn test_throw_after_completion_rejected() {
    let mut log = log_with(vec![throw(0, 80.0, 60.0), throw(1, 80.0, 60.0)]);
    log.board = Some(everything_is_a_hole());
    log.rules = Some(MatchRules {
        target_score: 3,
        round_equalizer: false,
    });

    let err = replay_match(&log).unwrap_err().to_string();
    assert!(err.contains("Throw 1 rejected"), "Unexpected error: {}", err);

    log.throws.pop();
    let report = replay_match(&log).unwrap();
    assert_eq!(report.summary.status, MatchStatus::Completed);
    assert_eq!(report.summary.outcome, Some(MatchOutcome::Winner(0)));
}

#[test]
fn test_equalizer_draw_replay() {
    let mut log = log_with(vec![throw(0, 80.0, 60.0), throw(1, 80.0, 60.0)]);
    log.board = Some(everything_is_a_hole());
    log.rules = Some(MatchRules {
        target_score: 3,
        round_equalizer: true,
    });

    let report = replay_match(&log).unwrap();
    assert_eq!(report.summary.scores, [3, 3]);
    assert_eq!(report.summary.status, MatchStatus::Completed);
    assert_eq!(report.summary.outcome, Some(MatchOutcome::Draw));
}

#[test]
fn test_out_of_turn_throw_rejected() {
    let log = log_with(vec![throw(0, 80.0, 60.0), throw(0, 80.0, 60.0)]);
    let err = replay_match(&log).unwrap_err().to_string();
    assert!(err.contains("illegal turn"), "Unexpected error: {}", err);
}

#[test]
fn test_invalid_throw_rejected() {
    let log = log_with(vec![throw(0, 190.0, 60.0)]);
    let err = replay_match(&log).unwrap_err().to_string();
    assert!(err.contains("invalid throw input"), "Unexpected error: {}", err);
}

#[test]
fn test_unsupported_version() {
    let mut log = log_with(vec![]);
    log.v = 2;
    let err = replay_match(&log).unwrap_err().to_string();
    assert!(err.contains("Unsupported log version"));
}

#[test]
fn test_too_many_throws() {
    let throws = (0..2001).map(|i| throw(i % 2, 80.0, 10.0)).collect();
    let err = replay_match(&log_with(throws)).unwrap_err().to_string();
    assert!(err.contains("Too many throws"), "Unexpected error: {}", err);
}

#[test]
fn test_player_count_must_be_two() {
    let raw = json!({
        "v": 1,
        "seed": 1,
        "players": [{ "wallet": "a", "username": "solo" }],
        "throws": []
    });
    let log: ThrowLog = serde_json::from_value(raw).unwrap();
    let err = replay_match(&log).unwrap_err().to_string();
    assert!(err.contains("Expected 2 players"));
}

#[test]
fn test_minimal_log_parses_with_defaults() {
    let raw = json!({ "v": 1, "seed": 5, "throws": [{ "player": 0, "angle": 85.0, "power": 50.0 }] });
    let log: ThrowLog = serde_json::from_value(raw).unwrap();
    let report = replay_match(&log).unwrap();
    assert_eq!(report.summary.players[0].wallet, "player-1");
    assert_eq!(report.throws.len(), 1);
}

#[test]
fn test_report_save_and_load() {
    let log = load_log(FIXTURE).unwrap();
    let report = replay_match(&log).unwrap();

    let path = std::env::temp_dir().join(format!("cornhole-report-test-{}.json", std::process::id()));
    let path = path.to_str().unwrap();
    save_report(&report, path).unwrap();
    let loaded = load_report(path).unwrap();
    std::fs::remove_file(path).ok();

    assert_eq!(loaded.log_hash, report.log_hash);
    assert_eq!(loaded.summary, report.summary);
}

#[test]
fn test_simulate_single_throw() {
    let board = BoardGeometry::standard();
    let t = simulate_throw(60.0, 50.0, &WindState::CALM, &board).unwrap();
    assert_eq!(t.result, LandingResult::Miss, "Lands on the ground right of the board");
    assert_eq!(t.points, 0);
    assert!((t.landing_point.x - 637.0).abs() < 1e-6);

    assert!(simulate_throw(0.0, 50.0, &WindState::CALM, &board).is_err());
}

#[test]
fn test_hash_binds_wind_board_and_rules() {
    let base = log_with(vec![throw(0, 80.0, 60.0), throw(1, 75.0, 55.0)]);
    let base_hash = replay_match(&base).unwrap().log_hash;

    let mut windy = base.clone();
    windy.initial_wind = Some(WindState::new(15.0, 180.0));
    assert_ne!(replay_match(&windy).unwrap().log_hash, base_hash, "Wind changes the hash");

    let mut moved = base.clone();
    moved.board = Some(BoardGeometry::centered_at(300.0, 260.0));
    assert_ne!(replay_match(&moved).unwrap().log_hash, base_hash, "Board changes the hash");

    let mut short = base.clone();
    short.rules = Some(MatchRules {
        target_score: 11,
        round_equalizer: false,
    });
    assert_ne!(replay_match(&short).unwrap().log_hash, base_hash, "Rules change the hash");

    let mut heavy = base.clone();
    heavy.physics = Some(PhysicsConfig {
        gravity: 0.2,
        ..PhysicsConfig::default()
    });
    assert_ne!(replay_match(&heavy).unwrap().log_hash, base_hash, "Physics changes the hash");
}

#[test]
fn test_report_carries_wind_history() {
    let mut log = log_with(vec![throw(0, 80.0, 60.0), throw(1, 75.0, 55.0), throw(0, 85.0, 50.0)]);
    let start = WindState::new(6.0, 45.0);
    log.initial_wind = Some(start);

    let report = replay_match(&log).unwrap();
    assert_eq!(report.throws[0].wind, start, "First throw flies through the synced wind");
    for pair in report.throws.windows(2) {
        assert_ne!(pair[0].wind, pair[1].wind, "Wind regenerates between throws");
    }
    let last = report.throws.last().unwrap();
    assert_ne!(report.final_wind, last.wind, "Final wind is the one after the last throw");
}
