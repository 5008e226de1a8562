use rand::rngs::OsRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Ambient wind. `speed` in mph within [0, 15], `direction` in degrees within [0, 360),
/// 0 = east, increasing clockwise on screen.
///
/// Replaced wholesale every turn; never mutated in place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WindState {
    pub speed: f64,
    pub direction: f64,
}

impl WindState {
    pub const CALM: WindState = WindState {
        speed: 0.0,
        direction: 0.0,
    };

    pub fn new(speed: f64, direction: f64) -> Self {
        Self { speed, direction }
    }

    /// Fresh wind for the start of a match.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            speed: rng.gen_range(0.0..INITIAL_WIND_SPEED_MAX),
            direction: rng.gen_range(0.0..360.0),
        }
    }

    /// Wind for the next turn: a bounded random walk away from `self`.
    ///
    /// Out-of-range (or non-finite) previous values are pulled back into range, so the
    /// result always satisfies the speed and direction bounds.
    pub fn drifted<R: Rng>(&self, rng: &mut R) -> Self {
        let speed_drift = rng.gen_range(-WIND_SPEED_DRIFT..WIND_SPEED_DRIFT);
        let direction_drift = rng.gen_range(-WIND_DIRECTION_DRIFT_DEG..WIND_DIRECTION_DRIFT_DEG);

        let base_speed = if self.speed.is_finite() { self.speed } else { 0.0 };

        Self {
            speed: (base_speed + speed_drift).clamp(0.0, MAX_WIND_SPEED),
            direction: normalize_degrees(self.direction + direction_drift),
        }
    }

    pub fn radians(&self) -> f64 {
        self.direction.to_radians()
    }

    pub fn is_calm(&self) -> bool {
        self.speed == 0.0
    }

    pub fn label(&self) -> CompassPoint {
        direction_label(self.direction)
    }

    /// Human readable form, e.g. `4.2 mph SE`.
    pub fn display(&self) -> String {
        format!("{:.1} mph {}", self.speed, self.label())
    }
}

/// Map any angle into [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let n = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if n >= 360.0 {
        0.0
    } else {
        n
    }
}

/// 8-way compass bucket for a screen-space wind direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NE => "NE",
            CompassPoint::E => "E",
            CompassPoint::SE => "SE",
            CompassPoint::S => "S",
            CompassPoint::SW => "SW",
            CompassPoint::W => "W",
            CompassPoint::NW => "NW",
        }
    }
}

impl std::fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 45° sectors centred on each compass point. Screen y grows downward, so 90° is south.
pub fn direction_label(direction: f64) -> CompassPoint {
    let d = normalize_degrees(direction);

    if d >= 337.5 || d < 22.5 {
        CompassPoint::E
    } else if d < 67.5 {
        CompassPoint::SE
    } else if d < 112.5 {
        CompassPoint::S
    } else if d < 157.5 {
        CompassPoint::SW
    } else if d < 202.5 {
        CompassPoint::W
    } else if d < 247.5 {
        CompassPoint::NW
    } else if d < 292.5 {
        CompassPoint::N
    } else {
        CompassPoint::NE
    }
}

/// Wind generator owning its randomness source.
///
/// Seeded with ChaCha8 by default so two clients sharing a seed see the same wind.
pub struct WindModel<R = ChaCha8Rng> {
    rng: R,
}

impl WindModel<ChaCha8Rng> {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> WindModel<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Random wind when `previous` is `None`, otherwise a drift from it.
    pub fn generate(&mut self, previous: Option<&WindState>) -> WindState {
        match previous {
            None => WindState::random(&mut self.rng),
            Some(prev) => prev.drifted(&mut self.rng),
        }
    }
}

/// Fresh match seed from the OS entropy source.
pub fn random_seed() -> u64 {
    OsRng.next_u64()
}
