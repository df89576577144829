use serde::Serialize;

/// A location on the integer grid couriers move on.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    point: geo_types::Point<i64>,
}

impl Point {
    pub fn new(x: i64, y: i64) -> Self {
        Self {
            point: geo_types::Point::new(x, y),
        }
    }

    pub fn x(&self) -> i64 {
        self.point.x()
    }

    pub fn y(&self) -> i64 {
        self.point.y()
    }

    pub fn manhattan_distance(&self, to: &Point) -> i64 {
        (self.x() - to.x()).abs() + (self.y() - to.y()).abs()
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Point::new(x, y)
    }
}

/// Travel cost between two points: Manhattan distance plus a fixed setup
/// overhead paid on every leg. One distance unit is one minute of travel.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceParams {
    pub setup_cost: i64,
}

impl Default for DistanceParams {
    fn default() -> Self {
        DistanceParams { setup_cost: 10 }
    }
}

impl DistanceParams {
    pub fn distance(&self, from: &Point, to: &Point) -> i64 {
        from.manhattan_distance(to) + self.setup_cost
    }
}
