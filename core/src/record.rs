use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::physics::PhysicsConfig;
use crate::scoring::MatchRules;
use crate::types::{BoardGeometry, LandingResult, Point};
use crate::wind::WindState;

/// One resolved throw as kept in the match history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThrowRecord {
    pub player: usize,
    pub round: u32,
    /// Position of the throw within its round
    pub throw_index: u32,
    pub angle: f64,
    pub power: f64,
    pub wind: WindState,
    pub result: LandingResult,
    pub points: u32,
}

/// Compute SHA-256 hash of a match's setup and throw sequence
/// This binds a report or settlement payload to the exact board, rules, physics and
/// throws (including the wind each one flew through) that produced it
pub fn compute_log_hash(
    seed: u64,
    board: &BoardGeometry,
    rules: &MatchRules,
    physics: &PhysicsConfig,
    launch: Point,
    throws: &[ThrowRecord],
) -> [u8; 32] {
    let mut h = Sha256::new();

    // Version prefix: 10 bytes, seed: 8, setup: 149, then 33 bytes per throw
    let mut buf = Vec::with_capacity(167 + throws.len() * 33);
    buf.extend_from_slice(b"CORNLOGv2:");
    buf.extend_from_slice(&seed.to_le_bytes());

    for v in [
        board.bounds.x,
        board.bounds.y,
        board.bounds.width,
        board.bounds.height,
        board.hole_center.x,
        board.hole_center.y,
        board.hole_radius,
    ] {
        buf.extend_from_slice(&v.to_le_bytes());
    }

    buf.extend_from_slice(&rules.target_score.to_le_bytes());
    buf.push(rules.round_equalizer as u8);

    for v in [
        physics.max_velocity,
        physics.gravity,
        physics.wind_accel_factor,
        physics.ground_y,
        physics.min_x,
        physics.max_x,
        physics.drift_factor_x,
        physics.drift_factor_y,
    ] {
        buf.extend_from_slice(&v.to_le_bytes());
    }
    buf.extend_from_slice(&(physics.max_steps as u64).to_le_bytes());

    buf.extend_from_slice(&launch.x.to_le_bytes());
    buf.extend_from_slice(&launch.y.to_le_bytes());

    for t in throws {
        buf.push(t.player as u8);
        buf.extend_from_slice(&t.angle.to_le_bytes());
        buf.extend_from_slice(&t.power.to_le_bytes());
        buf.extend_from_slice(&t.wind.speed.to_le_bytes());
        buf.extend_from_slice(&t.wind.direction.to_le_bytes());
    }

    h.update(&buf);

    let out = h.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    arr
}
