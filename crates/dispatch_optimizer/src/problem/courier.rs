use serde::Serialize;

use crate::{define_index_newtype, problem::point::Point};

define_index_newtype!(CourierIdx, Courier);

#[derive(Serialize, Debug, Clone)]
pub struct Courier {
    external_id: u64,
    start: Point,
}

impl Courier {
    pub fn new(external_id: u64, start: Point) -> Self {
        Courier { external_id, start }
    }

    pub fn external_id(&self) -> u64 {
        self.external_id
    }

    pub fn start(&self) -> &Point {
        &self.start
    }
}
