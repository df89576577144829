use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    define_index_newtype,
    problem::{
        error::ProblemError,
        point::{DistanceParams, Point},
        time_window::TimeWindow,
    },
};

define_index_newtype!(OrderIdx, Order);

/// Which end of an order a courier is visiting.
#[derive(
    Serialize, Deserialize, JsonSchema, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum StopAction {
    Pickup,
    Dropoff,
}

impl Display for StopAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopAction::Pickup => write!(f, "pickup"),
            StopAction::Dropoff => write!(f, "dropoff"),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct OrderStop {
    point_id: u64,
    point: Point,
    time_window: TimeWindow,
}

impl OrderStop {
    pub fn new(point_id: u64, point: Point, time_window: TimeWindow) -> Self {
        OrderStop {
            point_id,
            point,
            time_window,
        }
    }

    pub fn point_id(&self) -> u64 {
        self.point_id
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct Order {
    external_id: u64,
    payment: f64,
    pickup: OrderStop,
    dropoff: OrderStop,
    transit_distance: i64,
}

impl Order {
    pub fn external_id(&self) -> u64 {
        self.external_id
    }

    pub fn payment(&self) -> f64 {
        self.payment
    }

    pub fn pickup(&self) -> &OrderStop {
        &self.pickup
    }

    pub fn dropoff(&self) -> &OrderStop {
        &self.dropoff
    }

    pub fn stop(&self, action: StopAction) -> &OrderStop {
        match action {
            StopAction::Pickup => &self.pickup,
            StopAction::Dropoff => &self.dropoff,
        }
    }

    /// Travel time from pickup to dropoff, setup cost included.
    pub fn transit_distance(&self) -> i64 {
        self.transit_distance
    }
}

#[derive(Default)]
pub struct OrderBuilder {
    external_id: Option<u64>,
    payment: Option<f64>,
    pickup: Option<OrderStop>,
    dropoff: Option<OrderStop>,
}

impl OrderBuilder {
    pub fn set_external_id(&mut self, external_id: u64) -> &mut OrderBuilder {
        self.external_id = Some(external_id);
        self
    }

    pub fn set_payment(&mut self, payment: f64) -> &mut OrderBuilder {
        self.payment = Some(payment);
        self
    }

    pub fn set_pickup(&mut self, pickup: OrderStop) -> &mut OrderBuilder {
        self.pickup = Some(pickup);
        self
    }

    pub fn set_dropoff(&mut self, dropoff: OrderStop) -> &mut OrderBuilder {
        self.dropoff = Some(dropoff);
        self
    }

    pub fn build(self, distance_params: &DistanceParams) -> Result<Order, ProblemError> {
        let order_id = self.external_id.ok_or(ProblemError::MissingOrderId)?;
        let payment = self.payment.ok_or(ProblemError::MissingOrderField {
            order_id,
            field: "payment",
        })?;
        if !payment.is_finite() {
            return Err(ProblemError::NonFinitePayment { order_id, payment });
        }

        let pickup = self.pickup.ok_or(ProblemError::MissingOrderField {
            order_id,
            field: "pickup",
        })?;
        let dropoff = self.dropoff.ok_or(ProblemError::MissingOrderField {
            order_id,
            field: "dropoff",
        })?;
        let transit_distance = distance_params.distance(pickup.point(), dropoff.point());

        Ok(Order {
            external_id: order_id,
            payment,
            pickup,
            dropoff,
            transit_distance,
        })
    }
}
