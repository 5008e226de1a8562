use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::CoreError;
use crate::types::{Point, ThrowInput, Trajectory};
use crate::wind::WindState;

/// Tunables for flight integration and wind drift.
///
/// `Default` gives the values the renderer was built against; replays only agree if
/// both sides use the same config.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub max_velocity: f64,
    pub gravity: f64,
    pub wind_accel_factor: f64,
    pub max_steps: usize,
    pub ground_y: f64,
    pub min_x: f64,
    pub max_x: f64,
    pub drift_factor_x: f64,
    pub drift_factor_y: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_velocity: MAX_VELOCITY,
            gravity: GRAVITY,
            wind_accel_factor: WIND_ACCEL_FACTOR,
            max_steps: MAX_STEPS,
            ground_y: GROUND_Y,
            min_x: FIELD_MIN_X,
            max_x: FIELD_MAX_X,
            drift_factor_x: DRIFT_FACTOR_X,
            drift_factor_y: DRIFT_FACTOR_Y,
        }
    }
}

impl PhysicsConfig {
    /// Step the bag's flight until it lands, leaves the field, or runs out of steps.
    ///
    /// Fails with `InvalidInput` for a non-upward angle, out-of-range power or a
    /// non-finite wind. Output always holds at least the launch point and is fully
    /// deterministic in its inputs.
    pub fn integrate(
        &self,
        angle: f64,
        power: f64,
        wind: &WindState,
        launch: Point,
    ) -> Result<Trajectory, CoreError> {
        ThrowInput { angle, power }.validate()?;
        if !wind.speed.is_finite() || !wind.direction.is_finite() {
            return Err(CoreError::InvalidInput(format!(
                "wind must be finite (speed={}, direction={})",
                wind.speed, wind.direction
            )));
        }

        let rad = angle.to_radians();
        let velocity = (power / MAX_POWER) * self.max_velocity;

        // y axis is inverted in screen coordinates
        let mut vx = velocity * rad.cos();
        let mut vy = -velocity * rad.sin();

        let wind_accel = wind.radians().cos() * wind.speed * self.wind_accel_factor;

        let mut x = launch.x;
        let mut y = launch.y;
        let mut points = Vec::with_capacity(self.max_steps + 1);

        for _ in 0..self.max_steps {
            points.push(Point::new(x, y));

            vy += self.gravity;
            vx += wind_accel;

            x += vx;
            y += vy;

            if y > self.ground_y || x < self.min_x || x > self.max_x {
                points.push(Point::new(x, y.min(self.ground_y)));
                break;
            }
        }

        if points.is_empty() {
            points.push(launch);
        }

        Ok(Trajectory::from_points(points))
    }

    /// Push a finished trajectory sideways (and slightly vertically) with the wind.
    ///
    /// Point `i` of `n` moves by `F * i * (i/n)^2`, so late points drift the most.
    /// Calm wind returns the input untouched. Length and order never change.
    pub fn apply_drift(&self, mut trajectory: Trajectory, wind: &WindState) -> Trajectory {
        if wind.is_calm() {
            return trajectory;
        }

        let rad = wind.radians();
        let force_x = rad.cos() * wind.speed * self.drift_factor_x;
        let force_y = rad.sin() * wind.speed * self.drift_factor_y;

        let len = trajectory.len() as f64;
        for (i, p) in trajectory.points_mut().iter_mut().enumerate() {
            let i = i as f64;
            let t = i / len;
            let time_factor = t * t;
            p.x += force_x * i * time_factor;
            p.y += force_y * i * time_factor * 0.5;
        }

        trajectory
    }
}

/// `PhysicsConfig::default().integrate(..)`.
pub fn integrate(
    angle: f64,
    power: f64,
    wind: &WindState,
    launch: Point,
) -> Result<Trajectory, CoreError> {
    PhysicsConfig::default().integrate(angle, power, wind, launch)
}

/// `PhysicsConfig::default().apply_drift(..)`.
pub fn apply_drift(trajectory: Trajectory, wind: &WindState) -> Trajectory {
    PhysicsConfig::default().apply_drift(trajectory, wind)
}
