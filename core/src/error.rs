use thiserror::Error;

/// Everything the engine can refuse to do.
///
/// None of these are retryable: they are either bad input or a turn-order violation,
/// and the state they were raised against is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("invalid throw input: {0}")]
    InvalidInput(String),

    #[error("illegal turn: {0}")]
    IllegalTurn(String),

    #[error("illegal transition: {0}")]
    IllegalTransition(String),

    #[error("a throw by player {0} is still being resolved")]
    ThrowInFlight(usize),

    #[error("unknown player index {0}")]
    UnknownPlayer(usize),

    #[error("both player slots are already bound")]
    MatchFull,

    #[error("wallet {0} is already bound to this match")]
    DuplicatePlayer(String),

    #[error("player {0} has already committed this round")]
    AlreadyCommitted(usize),

    #[error("player {0} has already revealed this round")]
    AlreadyRevealed(usize),

    #[error("player {0} has no commitment this round")]
    CommitmentMissing(usize),

    #[error("reveal by player {0} does not match the commitment")]
    CommitmentMismatch(usize),

    #[error("reveals are locked until both players have committed")]
    RevealTooEarly,

    #[error("invalid commitment encoding: {0}")]
    InvalidCommitment(String),
}
