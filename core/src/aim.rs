use crate::constants::*;
use crate::error::CoreError;
use crate::physics::PhysicsConfig;
use crate::types::{Point, ThrowInput, Trajectory};
use crate::wind::WindState;

/// Turn a pointer drag into throw parameters.
///
/// Power scales with drag length and the angle is measured on the `start - end` vector, so
/// an upward drag throws upward. Returns `None` for non-upward drags and for drags too
/// short to count as a throw.
pub fn throw_from_drag(start: Point, end: Point) -> Option<ThrowInput> {
    let dx = start.x - end.x;
    let dy = start.y - end.y;
    let power = (dx.hypot(dy) / DRAG_POWER_DIVISOR).min(MAX_POWER);
    let angle = dy.atan2(dx).to_degrees();

    if power < MIN_THROW_POWER || angle <= 0.0 || angle >= 180.0 {
        return None;
    }

    Some(ThrowInput { angle, power })
}

/// Drifted flight path for drawing an aim guide.
pub fn preview(
    physics: &PhysicsConfig,
    input: &ThrowInput,
    wind: &WindState,
    launch: Point,
) -> Result<Trajectory, CoreError> {
    let raw = physics.integrate(input.angle, input.power, wind, launch)?;
    Ok(physics.apply_drift(raw, wind))
}
