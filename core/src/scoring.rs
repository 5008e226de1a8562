use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::CoreError;
use crate::types::{LandingResult, Player};
use crate::wind::{WindModel, WindState};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Waiting,
    Active,
    Completed,
    Cancelled,
}

impl MatchStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MatchStatus::Completed | MatchStatus::Cancelled)
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStatus::Waiting => write!(f, "waiting"),
            MatchStatus::Active => write!(f, "active"),
            MatchStatus::Completed => write!(f, "completed"),
            MatchStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Final result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Winner(usize),
    Draw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    pub target_score: u32,
    /// When the round's opening player reaches the target, the closing player still
    /// gets the last throw of the round before the match is decided.
    pub round_equalizer: bool,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            target_score: POINTS_TO_WIN,
            round_equalizer: false,
        }
    }
}

/// Score-relevant snapshot of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScoreState {
    pub scores: [u32; 2],
    pub current_round: u32,
    pub bags_remaining: u32,
    pub active_player_index: usize,
    pub status: MatchStatus,
}

impl MatchScoreState {
    fn new() -> Self {
        Self {
            scores: [0, 0],
            current_round: 1,
            bags_remaining: THROWS_PER_ROUND,
            active_player_index: 0,
            status: MatchStatus::Waiting,
        }
    }

    /// `Some` only once the match has completed. Equal scores are a draw.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        if self.status != MatchStatus::Completed {
            return None;
        }
        let [a, b] = self.scores;
        Some(if a > b {
            MatchOutcome::Winner(0)
        } else if b > a {
            MatchOutcome::Winner(1)
        } else {
            MatchOutcome::Draw
        })
    }
}

/// Settlement payload: everything an external consumer needs about a finished match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub scores: [u32; 2],
    pub outcome: Option<MatchOutcome>,
    pub rounds: u32,
    pub status: MatchStatus,
    pub players: Vec<Player>,
}

/// What a single recorded throw did to the match.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredThrow {
    pub player: usize,
    pub result: LandingResult,
    pub points: u32,
    pub round: u32,
    pub throw_index: u32,
    pub completed: bool,
}

/// Turn-based scoring state machine.
///
/// Waiting -> Active once both slots are bound, then Active -> Completed when a player
/// reaches the target, or -> Cancelled at any time before that. Terminal states are final.
/// Each recorded throw adds its points exactly once, then either completes the match or
/// passes the turn, regenerates the wind and advances the round when both have thrown.
pub struct MatchMachine {
    rules: MatchRules,
    state: MatchScoreState,
    players: [Option<Player>; 2],
    wind: WindState,
    wind_model: WindModel,
    in_flight: Option<usize>,
}

impl MatchMachine {
    /// New match in `Waiting`, with initial wind drawn from `seed`.
    pub fn new(rules: MatchRules, seed: u64) -> Self {
        let mut wind_model = WindModel::from_seed(seed);
        let wind = wind_model.generate(None);
        Self {
            rules,
            state: MatchScoreState::new(),
            players: [None, None],
            wind,
            wind_model,
            in_flight: None,
        }
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn state(&self) -> &MatchScoreState {
        &self.state
    }

    pub fn status(&self) -> MatchStatus {
        self.state.status
    }

    pub fn scores(&self) -> [u32; 2] {
        self.state.scores
    }

    pub fn active_player(&self) -> usize {
        self.state.active_player_index
    }

    pub fn current_round(&self) -> u32 {
        self.state.current_round
    }

    pub fn wind(&self) -> WindState {
        self.wind
    }

    pub fn players(&self) -> &[Option<Player>; 2] {
        &self.players
    }

    pub fn throw_in_flight(&self) -> Option<usize> {
        self.in_flight
    }

    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.state.outcome()
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            scores: self.state.scores,
            outcome: self.state.outcome(),
            rounds: self.state.current_round,
            status: self.state.status,
            players: self.players.iter().flatten().cloned().collect(),
        }
    }

    /// Replace the current wind with an externally synchronized one.
    pub fn sync_wind(&mut self, wind: WindState) -> Result<(), CoreError> {
        if self.state.status.is_terminal() {
            return Err(CoreError::IllegalTransition(format!(
                "cannot change wind of a {} match",
                self.state.status
            )));
        }
        self.wind = wind;
        Ok(())
    }

    /// Bind a player to the next free slot. The match goes Active once both are bound.
    pub fn bind_player(&mut self, player: Player) -> Result<usize, CoreError> {
        if self.state.status != MatchStatus::Waiting {
            return Err(CoreError::IllegalTransition(format!(
                "players can only join a waiting match (status: {})",
                self.state.status
            )));
        }
        if self
            .players
            .iter()
            .flatten()
            .any(|p| p.wallet == player.wallet)
        {
            return Err(CoreError::DuplicatePlayer(player.wallet));
        }

        let slot = self
            .players
            .iter()
            .position(Option::is_none)
            .ok_or(CoreError::MatchFull)?;

        tracing::info!("Player {} bound to slot {}", player.wallet, slot);
        self.players[slot] = Some(player);

        if self.players.iter().all(Option::is_some) {
            self.state.status = MatchStatus::Active;
            tracing::info!("Match active, wind {}", self.wind.display());
        }

        Ok(slot)
    }

    /// Mark `player`'s throw as being resolved. Only one throw may be in flight.
    pub fn begin_throw(&mut self, player: usize) -> Result<(), CoreError> {
        self.check_turn(player)?;
        if let Some(p) = self.in_flight {
            return Err(CoreError::ThrowInFlight(p));
        }
        self.in_flight = Some(player);
        Ok(())
    }

    /// Drop an in-flight marker whose throw could not be simulated.
    pub fn abandon_throw(&mut self) {
        self.in_flight = None;
    }

    /// Score a landed throw for `player` and advance the match.
    ///
    /// Rejected with `IllegalTurn` (and no state change) unless the match is Active and it
    /// is `player`'s turn.
    ///
    /// The in-flight gate lives in [`MatchMachine::begin_throw`]: callers that resolve a
    /// throw asynchronously must bracket it with `begin_throw` and then `record_throw` or
    /// `abandon_throw`. Calling `record_throw` alone scores immediately, which is only
    /// sound for a caller that resolves the throw synchronously under `&mut self`, as
    /// `MatchSession::throw` does. Either way the in-flight marker is cleared.
    pub fn record_throw(
        &mut self,
        player: usize,
        result: LandingResult,
    ) -> Result<ScoredThrow, CoreError> {
        self.check_turn(player)?;

        let points = result.points();
        let round = self.state.current_round;
        let throw_index = THROWS_PER_ROUND - self.state.bags_remaining;

        self.in_flight = None;
        self.state.scores[player] += points;
        self.state.bags_remaining -= 1;
        let round_done = self.state.bags_remaining == 0;

        let completed = self.reached_completion(round_done);
        if completed {
            self.state.status = MatchStatus::Completed;
            tracing::info!(
                "Match completed: {}-{} after {} rounds ({:?})",
                self.state.scores[0],
                self.state.scores[1],
                round,
                self.state.outcome()
            );
        } else {
            self.state.active_player_index = 1 - player;
            self.wind = self.wind_model.generate(Some(&self.wind));
            tracing::debug!("Wind now {}", self.wind.display());

            if round_done {
                self.state.current_round += 1;
                self.state.bags_remaining = THROWS_PER_ROUND;
            }
        }

        tracing::info!(
            "Player {} scored {} ({}) in round {}, score {}-{}",
            player,
            points,
            result,
            round,
            self.state.scores[0],
            self.state.scores[1]
        );

        Ok(ScoredThrow {
            player,
            result,
            points,
            round,
            throw_index,
            completed,
        })
    }

    /// Cancel from Waiting or Active. Cancelling twice is fine; a completed match stays completed.
    pub fn cancel(&mut self) -> Result<(), CoreError> {
        match self.state.status {
            MatchStatus::Completed => Err(CoreError::IllegalTransition(
                "cannot cancel a completed match".to_string(),
            )),
            MatchStatus::Cancelled => Ok(()),
            MatchStatus::Waiting | MatchStatus::Active => {
                self.state.status = MatchStatus::Cancelled;
                self.in_flight = None;
                tracing::info!("Match cancelled in round {}", self.state.current_round);
                Ok(())
            }
        }
    }

    fn check_turn(&self, player: usize) -> Result<(), CoreError> {
        if player > 1 {
            return Err(CoreError::UnknownPlayer(player));
        }
        if self.state.status != MatchStatus::Active {
            tracing::warn!("Rejected throw by player {}: match is {}", player, self.state.status);
            return Err(CoreError::IllegalTurn(format!(
                "match is {}",
                self.state.status
            )));
        }
        if player != self.state.active_player_index {
            tracing::warn!("Rejected throw by player {}: out of turn", player);
            return Err(CoreError::IllegalTurn(format!(
                "it is player {}'s turn",
                self.state.active_player_index
            )));
        }
        Ok(())
    }

    fn reached_completion(&self, round_done: bool) -> bool {
        let target = self.rules.target_score;
        let reached = self.state.scores.iter().any(|&s| s >= target);
        if !reached {
            return false;
        }
        // Opener crossed the line mid-round: the closer still throws.
        !self.rules.round_equalizer || round_done
    }
}
