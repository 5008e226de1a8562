use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::CoreError;

/// A position on the playfield. Origin is top-left, y grows downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Default bag starting position.
    pub const fn launch() -> Self {
        Self::new(LAUNCH_X, LAUNCH_Y)
    }

    pub fn distance_squared(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

/// Axis-aligned rectangle, `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Inclusive on all four edges.
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Board footprint and hole. Fixed for the whole match.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardGeometry {
    pub bounds: Bounds,
    pub hole_center: Point,
    pub hole_radius: f64,
}

impl BoardGeometry {
    /// Board centred at `(cx, cy)` using the standard board dimensions.
    pub fn centered_at(cx: f64, cy: f64) -> Self {
        Self {
            bounds: Bounds {
                x: cx - BOARD_WIDTH / 2.0,
                y: cy - BOARD_HEIGHT / 2.0,
                width: BOARD_WIDTH,
                height: BOARD_HEIGHT,
            },
            hole_center: Point::new(cx, cy + HOLE_OFFSET_Y),
            hole_radius: HOLE_RADIUS,
        }
    }

    /// The board as the match scene places it.
    pub fn standard() -> Self {
        Self::centered_at(BOARD_CENTER_X, BOARD_CENTER_Y)
    }
}

impl Default for BoardGeometry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Player-chosen throw parameters.
///
/// `angle` is in degrees from horizontal (90 = straight up) and must lie strictly inside
/// (0, 180); anything else points downward. `power` is a percentage in [0, 100].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThrowInput {
    pub angle: f64,
    pub power: f64,
}

impl ThrowInput {
    /// Build a validated input.
    pub fn new(angle: f64, power: f64) -> Result<Self, CoreError> {
        let input = Self { angle, power };
        input.validate()?;
        Ok(input)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.angle.is_finite() || !self.power.is_finite() {
            return Err(CoreError::InvalidInput(format!(
                "angle and power must be finite (angle={}, power={})",
                self.angle, self.power
            )));
        }
        if self.angle <= 0.0 || self.angle >= 180.0 {
            return Err(CoreError::InvalidInput(format!(
                "angle {} is not an upward throw; must be strictly between 0 and 180",
                self.angle
            )));
        }
        if self.power < 0.0 || self.power > MAX_POWER {
            return Err(CoreError::InvalidInput(format!(
                "power {} out of range [0, {}]",
                self.power, MAX_POWER
            )));
        }
        Ok(())
    }
}

/// Sampled flight path. First point is the launch point, last is where the bag came to rest.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory(Vec<Point>);

impl Trajectory {
    pub fn from_points(points: Vec<Point>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn points_mut(&mut self) -> &mut [Point] {
        &mut self.0
    }

    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn launch(&self) -> Option<Point> {
        self.0.first().copied()
    }

    pub fn landing(&self) -> Option<Point> {
        self.0.last().copied()
    }
}

/// Where a bag ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LandingResult {
    Miss,
    Board,
    Hole,
}

impl std::fmt::Display for LandingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LandingResult::Miss => write!(f, "miss"),
            LandingResult::Board => write!(f, "board"),
            LandingResult::Hole => write!(f, "hole"),
        }
    }
}

/// A participant bound to one of the two match slots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub wallet: String,
    pub username: String,
}

impl Player {
    pub fn new(wallet: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            wallet: wallet.into(),
            username: username.into(),
        }
    }
}
