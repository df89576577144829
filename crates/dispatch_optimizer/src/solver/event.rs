use serde::Serialize;

use crate::problem::order::{OrderIdx, StopAction};

/// A visit to one end of an order, before any time is attached to it.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Stop {
    pub order_id: OrderIdx,
    pub action: StopAction,
}

impl Stop {
    pub fn pickup(order_id: OrderIdx) -> Self {
        Stop {
            order_id,
            action: StopAction::Pickup,
        }
    }

    pub fn dropoff(order_id: OrderIdx) -> Self {
        Stop {
            order_id,
            action: StopAction::Dropoff,
        }
    }
}

/// A stop of a feasible route with its resolved arrival time.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    stop: Stop,
    timestamp: i64,
}

impl Event {
    pub fn new(stop: Stop, timestamp: i64) -> Self {
        Event { stop, timestamp }
    }

    pub fn stop(&self) -> Stop {
        self.stop
    }

    pub fn order_id(&self) -> OrderIdx {
        self.stop.order_id
    }

    pub fn action(&self) -> StopAction {
        self.stop.action
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
