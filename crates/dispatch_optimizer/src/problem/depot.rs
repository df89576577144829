use serde::Serialize;

use crate::problem::point::Point;

/// Depots are part of the input but play no role in the construction.
#[derive(Serialize, Debug, Clone)]
pub struct Depot {
    point_id: u64,
    point: Point,
}

impl Depot {
    pub fn new(point_id: u64, point: Point) -> Self {
        Depot { point_id, point }
    }

    pub fn point_id(&self) -> u64 {
        self.point_id
    }

    pub fn point(&self) -> &Point {
        &self.point
    }
}
