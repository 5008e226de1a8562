use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::CoreError;
use crate::types::ThrowInput;

/// Per-throw secret mixed into a commitment.
///
/// SECURITY REQUIREMENT: must come from a CSPRNG with the full 32 bytes of entropy,
/// otherwise an opponent can brute-force the (angle, power) space behind a commitment.
pub type Nonce = [u8; 32];

/// SHA-256 commitment to a throw (32 bytes)
/// Format: SHA256(nonce || player || angle || power)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commitment(pub [u8; 32]);

impl Commitment {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidCommitment(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(CoreError::InvalidCommitment(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

/// Compute the SHA-256 commitment for a throw.
/// nonce (32 bytes) || player (1 byte) || angle (8 bytes LE) || power (8 bytes LE)
pub fn compute_commitment(nonce: &Nonce, player: usize, angle: f64, power: f64) -> Commitment {
    let mut h = Sha256::new();
    h.update(nonce);
    h.update([player as u8]);
    h.update(angle.to_le_bytes());
    h.update(power.to_le_bytes());

    let out = h.finalize();
    let mut arr = [0u8; 32];
    arr.copy_from_slice(&out);
    Commitment(arr)
}

pub fn generate_nonce() -> Nonce {
    let mut nonce = [0u8; 32];
    OsRng.fill_bytes(&mut nonce);
    nonce
}

/// The opened value behind a commitment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThrowReveal {
    pub angle: f64,
    pub power: f64,
    pub nonce: Nonce,
}

impl ThrowReveal {
    /// Pick a fresh nonce for `input` and return the reveal to keep plus the commitment to send.
    pub fn seal(player: usize, input: ThrowInput) -> (Self, Commitment) {
        let nonce = generate_nonce();
        let reveal = Self {
            angle: input.angle,
            power: input.power,
            nonce,
        };
        (reveal, reveal.commitment(player))
    }

    pub fn commitment(&self, player: usize) -> Commitment {
        compute_commitment(&self.nonce, player, self.angle, self.power)
    }
}

/// One round of commit-reveal between the two players.
///
/// Each player commits once. No reveal is accepted until both commitments are in, and a
/// reveal must hash to its player's commitment.
#[derive(Clone, Debug, Default)]
pub struct RoundCommitments {
    commitments: [Option<Commitment>; 2],
    revealed: [bool; 2],
}

impl RoundCommitments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&mut self, player: usize, commitment: Commitment) -> Result<(), CoreError> {
        let slot = self
            .commitments
            .get_mut(player)
            .ok_or(CoreError::UnknownPlayer(player))?;
        if slot.is_some() {
            return Err(CoreError::AlreadyCommitted(player));
        }
        *slot = Some(commitment);
        tracing::debug!("Player {} committed {}", player, commitment.to_hex());
        Ok(())
    }

    pub fn has_committed(&self, player: usize) -> bool {
        matches!(self.commitments.get(player), Some(Some(_)))
    }

    pub fn both_committed(&self) -> bool {
        self.commitments.iter().all(Option::is_some)
    }

    /// Check `reveal` against `player`'s commitment and hand back the validated throw.
    pub fn reveal(&mut self, player: usize, reveal: &ThrowReveal) -> Result<ThrowInput, CoreError> {
        let committed = *self
            .commitments
            .get(player)
            .ok_or(CoreError::UnknownPlayer(player))?;
        let committed = committed.ok_or(CoreError::CommitmentMissing(player))?;
        if !self.both_committed() {
            return Err(CoreError::RevealTooEarly);
        }
        if self.revealed[player] {
            return Err(CoreError::AlreadyRevealed(player));
        }
        if reveal.commitment(player) != committed {
            tracing::warn!("Player {} revealed a throw that does not match its commitment", player);
            return Err(CoreError::CommitmentMismatch(player));
        }

        let input = ThrowInput::new(reveal.angle, reveal.power)?;
        self.revealed[player] = true;
        Ok(input)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
