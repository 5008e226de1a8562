use cornhole_core::constants::{LOG_VERSION, MAX_THROWS};
use cornhole_core::{
    resolve_throw, BoardGeometry, LandingResult, MatchRules, MatchSession, MatchSummary,
    PhysicsConfig, Player, Point, ThrowInput, ThrowRecord, Trajectory, WindState,
};
use serde::{Deserialize, Serialize};
use std::fs;

/// Largest log file the replay host will read (10 MB)
pub const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;

/// One throw as relayed by the transport layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggedThrow {
    pub player: usize,
    pub angle: f64,
    pub power: f64,
}

/// Throw log format (JSON)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThrowLog {
    pub v: u32,
    /// Wind seed shared by both clients - every replay with this seed sees the same wind
    pub seed: u64,
    #[serde(default)]
    pub board: Option<BoardGeometry>,
    #[serde(default)]
    pub rules: Option<MatchRules>,
    #[serde(default)]
    pub physics: Option<PhysicsConfig>,
    #[serde(default)]
    pub players: Option<Vec<Player>>,
    /// Wind agreed on by both clients for the first throw; drawn from `seed` when absent
    #[serde(default)]
    pub initial_wind: Option<WindState>,
    pub throws: Vec<LoggedThrow>,
}

/// Result of replaying a throw log
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchReport {
    pub summary: MatchSummary,
    pub throws: Vec<ThrowRecord>,
    /// Wind in effect after the last throw
    pub final_wind: WindState,
    /// Hex-encoded SHA-256 over seed and throw sequence
    pub log_hash: String,
    pub seed: u64,
}

/// Replay a throw log through the engine.
///
/// The log is rejected as a whole on the first throw the match would not accept
/// (wrong turn, invalid parameters, throw after completion).
///
/// # Arguments
/// * `log` - The throw log to replay
///
/// # Returns
/// * `Ok(MatchReport)` - Final scores, per-throw history and log hash
/// * `Err` - If the log is malformed or contains an illegal throw
pub fn replay_match(log: &ThrowLog) -> Result<MatchReport, Box<dyn std::error::Error>> {
    tracing::info!(
        "Replaying match with seed {} ({} throws)",
        log.seed,
        log.throws.len()
    );

    if log.v != LOG_VERSION {
        return Err(format!("Unsupported log version: {}", log.v).into());
    }
    if log.throws.len() > MAX_THROWS {
        return Err(format!(
            "Too many throws: {} (max {})",
            log.throws.len(),
            MAX_THROWS
        )
        .into());
    }

    let mut session = MatchSession::new(
        log.seed,
        log.rules.unwrap_or_default(),
        log.board.unwrap_or_default(),
    )
    .with_physics(log.physics.unwrap_or_default());

    let players = match &log.players {
        Some(p) if p.len() == 2 => p.clone(),
        Some(p) => return Err(format!("Expected 2 players, got {}", p.len()).into()),
        None => vec![
            Player::new("player-1", "Player 1"),
            Player::new("player-2", "Player 2"),
        ],
    };
    for p in players {
        session
            .bind_player(p)
            .map_err(|e| format!("Error binding player: {}", e))?;
    }

    if let Some(wind) = log.initial_wind {
        session
            .sync_wind(wind)
            .map_err(|e| format!("Error setting initial wind: {}", e))?;
    }

    for (i, t) in log.throws.iter().enumerate() {
        let input = ThrowInput {
            angle: t.angle,
            power: t.power,
        };
        session
            .throw(t.player, input)
            .map_err(|e| format!("Throw {} rejected: {}", i, e))?;
    }

    let summary = session.summary();
    tracing::info!(
        "Replay finished: {}-{} ({})",
        summary.scores[0],
        summary.scores[1],
        summary.status
    );

    Ok(MatchReport {
        summary,
        throws: session.history().to_vec(),
        final_wind: session.wind(),
        log_hash: hex::encode(session.log_hash()),
        seed: log.seed,
    })
}

/// A single throw resolved outside any match, for aiming and debugging.
#[derive(Clone, Debug, Serialize)]
pub struct SingleThrow {
    pub trajectory: Trajectory,
    pub landing_point: Point,
    pub result: LandingResult,
    pub points: u32,
}

pub fn simulate_throw(
    angle: f64,
    power: f64,
    wind: &WindState,
    board: &BoardGeometry,
) -> Result<SingleThrow, Box<dyn std::error::Error>> {
    let input = ThrowInput::new(angle, power)?;
    let (trajectory, landing_point, result) = resolve_throw(
        &PhysicsConfig::default(),
        board,
        &input,
        wind,
        Point::launch(),
    )?;
    Ok(SingleThrow {
        trajectory,
        landing_point,
        result,
        points: result.points(),
    })
}

pub fn load_log(path: &str) -> Result<ThrowLog, Box<dyn std::error::Error>> {
    // Check file size before reading (DoS protection)
    let metadata = fs::metadata(path)?;
    if metadata.len() > MAX_LOG_SIZE {
        return Err(format!(
            "Log file too large: {} bytes (max {} bytes)",
            metadata.len(),
            MAX_LOG_SIZE
        )
        .into());
    }

    let raw = fs::read_to_string(path)?;
    let log: ThrowLog = serde_json::from_str(&raw)?;
    Ok(log)
}

pub fn save_report(report: &MatchReport, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_report(path: &str) -> Result<MatchReport, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;
    let report: MatchReport = serde_json::from_str(&json)?;
    Ok(report)
}
