use crate::types::{BoardGeometry, LandingResult, Point};

/// Classify a resting point against the board.
///
/// The hole lies inside the board footprint, so it is tested first; both tests are
/// boundary-inclusive.
pub fn classify(point: &Point, board: &BoardGeometry) -> LandingResult {
    if point.distance_squared(&board.hole_center) <= board.hole_radius * board.hole_radius {
        return LandingResult::Hole;
    }

    if board.bounds.contains(point) {
        return LandingResult::Board;
    }

    LandingResult::Miss
}

pub fn points_for(result: LandingResult) -> u32 {
    match result {
        LandingResult::Hole => 3,
        LandingResult::Board => 1,
        LandingResult::Miss => 0,
    }
}

impl LandingResult {
    pub fn points(&self) -> u32 {
        points_for(*self)
    }
}
