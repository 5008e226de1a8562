// Playfield, physics and scoring constants.
// These are shared by the renderer, the replay host and the API server - they must match exactly!

/// Playfield width (distance units)
pub const FIELD_WIDTH: f64 = 800.0;

/// Playfield height (distance units)
pub const FIELD_HEIGHT: f64 = 600.0;

/// Default launch point: horizontally centred, 80 units above the bottom edge
pub const LAUNCH_X: f64 = FIELD_WIDTH / 2.0;
pub const LAUNCH_Y: f64 = FIELD_HEIGHT - 80.0;

/// Launch speed at full power (units/step)
pub const MAX_VELOCITY: f64 = 12.0;

/// Downward acceleration (units/step^2)
pub const GRAVITY: f64 = 0.15;

/// Horizontal acceleration per unit of wind speed during flight
pub const WIND_ACCEL_FACTOR: f64 = 0.005;

/// Upper bound on integration steps per throw
pub const MAX_STEPS: usize = 120;

/// A bag below this line has hit the ground
pub const GROUND_Y: f64 = 580.0;

/// Horizontal limits; leaving them ends the flight
pub const FIELD_MIN_X: f64 = -50.0;
pub const FIELD_MAX_X: f64 = 850.0;

/// Post-flight drift factors (lateral and vertical)
pub const DRIFT_FACTOR_X: f64 = 0.08;
pub const DRIFT_FACTOR_Y: f64 = 0.04;

/// Wind speed ceiling (mph)
pub const MAX_WIND_SPEED: f64 = 15.0;

/// Initial wind is drawn from [0, INITIAL_WIND_SPEED_MAX)
pub const INITIAL_WIND_SPEED_MAX: f64 = 10.0;

/// Per-turn drift half-widths
pub const WIND_SPEED_DRIFT: f64 = 2.0;
pub const WIND_DIRECTION_DRIFT_DEG: f64 = 20.0;

/// Power is a percentage
pub const MAX_POWER: f64 = 100.0;

/// Drags that produce less power than this are not throws
pub const MIN_THROW_POWER: f64 = 5.0;

/// Drag distance per unit of power
pub const DRAG_POWER_DIVISOR: f64 = 3.0;

/// Board placement and size, matching the rendered board
pub const BOARD_CENTER_X: f64 = FIELD_WIDTH / 2.0;
pub const BOARD_CENTER_Y: f64 = FIELD_HEIGHT / 2.0 - 40.0;
pub const BOARD_WIDTH: f64 = 160.0;
pub const BOARD_HEIGHT: f64 = 240.0;

/// Hole sits in the upper portion of the board
pub const HOLE_OFFSET_Y: f64 = -60.0;
pub const HOLE_RADIUS: f64 = 22.0;

/// Points needed to win the match
pub const POINTS_TO_WIN: u32 = 21;

/// One bag per player per round
pub const THROWS_PER_ROUND: u32 = 2;

/// Only throw log version understood by the replay host
pub const LOG_VERSION: u32 = 1;

/// Maximum number of throws accepted in a single log
pub const MAX_THROWS: usize = 2000;
