use serde::{Deserialize, Serialize};

use crate::commit::{Commitment, RoundCommitments, ThrowReveal};
use crate::error::CoreError;
use crate::landing::classify;
use crate::physics::PhysicsConfig;
use crate::record::{compute_log_hash, ThrowRecord};
use crate::scoring::{MatchMachine, MatchRules, MatchStatus, MatchSummary};
use crate::types::{BoardGeometry, LandingResult, Player, Point, ThrowInput, Trajectory};
use crate::wind::WindState;

/// Everything produced by resolving one throw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThrowOutcome {
    pub player: usize,
    pub trajectory: Trajectory,
    pub landing_point: Point,
    pub result: LandingResult,
    pub points: u32,
}

/// Integrate, drift and classify a throw. Pure: the same inputs always give the same outcome.
pub fn resolve_throw(
    physics: &PhysicsConfig,
    board: &BoardGeometry,
    input: &ThrowInput,
    wind: &WindState,
    launch: Point,
) -> Result<(Trajectory, Point, LandingResult), CoreError> {
    let raw = physics.integrate(input.angle, input.power, wind, launch)?;
    let trajectory = physics.apply_drift(raw, wind);
    let landing_point = trajectory.landing().unwrap_or(launch);
    let result = classify(&landing_point, board);
    Ok((trajectory, landing_point, result))
}

/// A single match owned by its caller: scoring machine, board, physics and history.
///
/// All mutation goes through `&mut self`, so a host serving several matches only has to
/// put each session behind its own lock.
pub struct MatchSession {
    seed: u64,
    machine: MatchMachine,
    board: BoardGeometry,
    physics: PhysicsConfig,
    launch: Point,
    history: Vec<ThrowRecord>,
    commitments: RoundCommitments,
    pending_reveals: [Option<ThrowInput>; 2],
}

impl MatchSession {
    pub fn new(seed: u64, rules: MatchRules, board: BoardGeometry) -> Self {
        Self {
            seed,
            machine: MatchMachine::new(rules, seed),
            board,
            physics: PhysicsConfig::default(),
            launch: Point::launch(),
            history: Vec::new(),
            commitments: RoundCommitments::new(),
            pending_reveals: [None, None],
        }
    }

    pub fn with_physics(mut self, physics: PhysicsConfig) -> Self {
        self.physics = physics;
        self
    }

    pub fn with_launch(mut self, launch: Point) -> Self {
        self.launch = launch;
        self
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn machine(&self) -> &MatchMachine {
        &self.machine
    }

    pub fn board(&self) -> &BoardGeometry {
        &self.board
    }

    pub fn physics(&self) -> &PhysicsConfig {
        &self.physics
    }

    pub fn launch(&self) -> Point {
        self.launch
    }

    pub fn wind(&self) -> WindState {
        self.machine.wind()
    }

    pub fn status(&self) -> MatchStatus {
        self.machine.status()
    }

    pub fn history(&self) -> &[ThrowRecord] {
        &self.history
    }

    pub fn summary(&self) -> MatchSummary {
        self.machine.summary()
    }

    pub fn log_hash(&self) -> [u8; 32] {
        compute_log_hash(
            self.seed,
            &self.board,
            self.machine.rules(),
            &self.physics,
            self.launch,
            &self.history,
        )
    }

    pub fn bind_player(&mut self, player: Player) -> Result<usize, CoreError> {
        self.machine.bind_player(player)
    }

    pub fn sync_wind(&mut self, wind: WindState) -> Result<(), CoreError> {
        self.machine.sync_wind(wind)
    }

    pub fn cancel(&mut self) -> Result<(), CoreError> {
        self.pending_reveals = [None, None];
        self.commitments.reset();
        self.machine.cancel()
    }

    /// Resolve `player`'s throw against the current wind and score it.
    ///
    /// Turn checks, simulation and scoring happen together: on any error the match is
    /// left exactly as it was. A player holding a commitment for the round can only
    /// throw through [`MatchSession::reveal`].
    pub fn throw(&mut self, player: usize, input: ThrowInput) -> Result<ThrowOutcome, CoreError> {
        if self.commitments.has_committed(player) {
            tracing::warn!("Player {} tried to bypass their commitment", player);
            return Err(CoreError::IllegalTurn(format!(
                "player {} has committed this round and must reveal",
                player
            )));
        }
        self.resolve(player, input)
    }

    fn resolve(&mut self, player: usize, input: ThrowInput) -> Result<ThrowOutcome, CoreError> {
        input.validate()?;
        self.machine.begin_throw(player)?;

        let wind = self.machine.wind();
        let (trajectory, landing_point, result) =
            match resolve_throw(&self.physics, &self.board, &input, &wind, self.launch) {
                Ok(r) => r,
                Err(e) => {
                    self.machine.abandon_throw();
                    return Err(e);
                }
            };

        let scored = self.machine.record_throw(player, result)?;

        self.history.push(ThrowRecord {
            player,
            round: scored.round,
            throw_index: scored.throw_index,
            angle: input.angle,
            power: input.power,
            wind,
            result,
            points: scored.points,
        });

        // A new round (or the end of the match) opens a fresh commit-reveal exchange
        if self.machine.current_round() != scored.round || scored.completed {
            self.commitments.reset();
            self.pending_reveals = [None, None];
        }

        Ok(ThrowOutcome {
            player,
            trajectory,
            landing_point,
            result,
            points: scored.points,
        })
    }

    /// Register `player`'s commitment for the current round.
    pub fn commit(&mut self, player: usize, commitment: Commitment) -> Result<(), CoreError> {
        if self.machine.status() != MatchStatus::Active {
            return Err(CoreError::IllegalTurn(format!(
                "match is {}",
                self.machine.status()
            )));
        }
        self.commitments.commit(player, commitment)
    }

    /// Open `player`'s commitment and resolve every revealed throw whose turn has come.
    ///
    /// A reveal for the closing player that arrives before the opener has thrown is held
    /// until the opener's throw resolves.
    pub fn reveal(
        &mut self,
        player: usize,
        reveal: &ThrowReveal,
    ) -> Result<Vec<ThrowOutcome>, CoreError> {
        if self.machine.status() != MatchStatus::Active {
            return Err(CoreError::IllegalTurn(format!(
                "match is {}",
                self.machine.status()
            )));
        }
        let input = self.commitments.reveal(player, reveal)?;
        self.pending_reveals[player] = Some(input);

        let mut outcomes = Vec::new();
        while self.machine.status() == MatchStatus::Active {
            let active = self.machine.active_player();
            let Some(input) = self.pending_reveals[active].take() else {
                break;
            };
            outcomes.push(self.resolve(active, input)?);
        }
        Ok(outcomes)
    }
}
