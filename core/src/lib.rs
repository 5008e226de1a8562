//! Throw physics, landing resolution and match scoring for cornhole.
//!
//! Everything here is pure computation: give it a throw and the current wind, get back a
//! trajectory, a landing result and the updated match state. Rendering, transport and
//! settlement live elsewhere.

pub mod aim;
pub mod commit;
pub mod constants;
pub mod error;
pub mod landing;
pub mod physics;
pub mod record;
pub mod scoring;
pub mod session;
pub mod types;
pub mod wind;

pub use aim::{preview, throw_from_drag};
pub use commit::{compute_commitment, generate_nonce, Commitment, Nonce, RoundCommitments, ThrowReveal};
pub use error::CoreError;
pub use landing::{classify, points_for};
pub use physics::{apply_drift, integrate, PhysicsConfig};
pub use record::{compute_log_hash, ThrowRecord};
pub use scoring::{
    MatchMachine, MatchOutcome, MatchRules, MatchScoreState, MatchStatus, MatchSummary, ScoredThrow,
};
pub use session::{resolve_throw, MatchSession, ThrowOutcome};
pub use types::{BoardGeometry, Bounds, LandingResult, Player, Point, ThrowInput, Trajectory};
pub use wind::{direction_label, normalize_degrees, random_seed, CompassPoint, WindModel, WindState};
