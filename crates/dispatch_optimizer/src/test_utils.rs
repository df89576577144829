use crate::{
    problem::{
        courier::Courier,
        dispatch_problem::{DispatchProblem, DispatchProblemBuilder},
        order::{OrderBuilder, OrderStop},
        point::{DistanceParams, Point},
        time_window::TimeWindow,
    },
    solver::solver_params::{SolverParams, Threads},
};

pub const TEST_SETUP_COST: i64 = 10;

#[derive(Clone)]
pub struct TestOrder {
    pub payment: f64,
    pub pickup: (i64, i64),
    pub pickup_window: (i64, i64),
    pub dropoff: (i64, i64),
    pub dropoff_window: (i64, i64),
}

impl TestOrder {
    pub fn new(pickup: (i64, i64), dropoff: (i64, i64)) -> Self {
        TestOrder {
            payment: 0.0,
            pickup,
            pickup_window: (0, 10_000),
            dropoff,
            dropoff_window: (0, 10_000),
        }
    }

    pub fn with_payment(mut self, payment: f64) -> Self {
        self.payment = payment;
        self
    }

    pub fn with_pickup_window(mut self, start: i64, end: i64) -> Self {
        self.pickup_window = (start, end);
        self
    }

    pub fn with_dropoff_window(mut self, start: i64, end: i64) -> Self {
        self.dropoff_window = (start, end);
        self
    }
}

pub fn create_test_problem(couriers: Vec<(i64, i64)>, orders: Vec<TestOrder>) -> DispatchProblem {
    let mut builder = DispatchProblemBuilder::default();
    builder.set_distance_params(DistanceParams {
        setup_cost: TEST_SETUP_COST,
    });

    for (index, location) in couriers.into_iter().enumerate() {
        builder.add_courier(Courier::new(index as u64, location.into()));
    }

    for (index, order) in orders.into_iter().enumerate() {
        let mut order_builder = OrderBuilder::default();
        let point_id = index as u64 * 2;
        order_builder
            .set_external_id(index as u64)
            .set_payment(order.payment)
            .set_pickup(OrderStop::new(
                point_id,
                Point::from(order.pickup),
                TimeWindow::new(order.pickup_window.0, order.pickup_window.1),
            ))
            .set_dropoff(OrderStop::new(
                point_id + 1,
                Point::from(order.dropoff),
                TimeWindow::new(order.dropoff_window.0, order.dropoff_window.1),
            ));
        builder.add_order(order_builder);
    }

    builder.build().unwrap()
}

/// Parameters matching the worked examples: start at time 0, unit time cost
/// rate of 2.
pub fn create_test_params() -> SolverParams {
    SolverParams {
        start_time: 0,
        threads: Threads::Single,
        ..SolverParams::default()
    }
}
