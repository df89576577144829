use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    problem::{
        courier::Courier,
        depot::Depot,
        dispatch_problem::{DispatchProblem, DispatchProblemBuilder},
        error::ProblemError,
        order::{OrderBuilder, OrderStop, StopAction},
        point::{DistanceParams, Point},
        time_window::TimeWindow,
    },
    solver::assignment::{AssignedStop, Assignment},
};

#[derive(Deserialize, JsonSchema)]
#[serde(rename = "DispatchInput")]
pub struct JsonDispatchInput {
    pub couriers: Vec<JsonCourier>,
    pub orders: Vec<JsonOrder>,
    #[serde(default)]
    pub depots: Vec<JsonDepot>,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone)]
#[serde(rename = "Courier")]
pub struct JsonCourier {
    pub courier_id: u64,
    pub location_x: i64,
    pub location_y: i64,
}

/// Times are minutes since midnight.
#[derive(Serialize, Deserialize, JsonSchema, Clone)]
#[serde(rename = "Order")]
pub struct JsonOrder {
    pub order_id: u64,
    pub payment: f64,
    pub pickup_point_id: u64,
    pub pickup_location_x: i64,
    pub pickup_location_y: i64,
    pub pickup_from: i64,
    pub pickup_to: i64,
    pub dropoff_point_id: u64,
    pub dropoff_location_x: i64,
    pub dropoff_location_y: i64,
    pub dropoff_from: i64,
    pub dropoff_to: i64,
}

#[derive(Serialize, Deserialize, JsonSchema, Clone)]
#[serde(rename = "Depot")]
pub struct JsonDepot {
    pub point_id: u64,
    pub location_x: i64,
    pub location_y: i64,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename = "Stop")]
pub struct JsonStop {
    pub courier_id: u64,
    pub action: StopAction,
    pub order_id: u64,
    pub point_id: u64,
}

impl From<&AssignedStop> for JsonStop {
    fn from(stop: &AssignedStop) -> Self {
        JsonStop {
            courier_id: stop.courier_id,
            action: stop.action,
            order_id: stop.order_id,
            point_id: stop.point_id,
        }
    }
}

pub fn assignment_to_json(assignment: &Assignment) -> Vec<JsonStop> {
    assignment.stops().iter().map(JsonStop::from).collect()
}

impl From<&JsonOrder> for OrderBuilder {
    fn from(order: &JsonOrder) -> Self {
        let mut builder = OrderBuilder::default();
        builder
            .set_external_id(order.order_id)
            .set_payment(order.payment)
            .set_pickup(OrderStop::new(
                order.pickup_point_id,
                Point::new(order.pickup_location_x, order.pickup_location_y),
                TimeWindow::new(order.pickup_from, order.pickup_to),
            ))
            .set_dropoff(OrderStop::new(
                order.dropoff_point_id,
                Point::new(order.dropoff_location_x, order.dropoff_location_y),
                TimeWindow::new(order.dropoff_from, order.dropoff_to),
            ));
        builder
    }
}

impl JsonDispatchInput {
    #[instrument(skip_all, level = "debug")]
    pub fn build_problem(
        &self,
        distance_params: DistanceParams,
    ) -> Result<DispatchProblem, ProblemError> {
        let mut builder = DispatchProblemBuilder::default();
        builder.set_distance_params(distance_params);

        builder.set_couriers(
            self.couriers
                .iter()
                .map(|courier| {
                    Courier::new(
                        courier.courier_id,
                        Point::new(courier.location_x, courier.location_y),
                    )
                })
                .collect(),
        );

        for order in &self.orders {
            builder.add_order(OrderBuilder::from(order));
        }

        for depot in &self.depots {
            builder.add_depot(Depot::new(
                depot.point_id,
                Point::new(depot.location_x, depot.location_y),
            ));
        }

        builder.build()
    }
}
