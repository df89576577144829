use fxhash::FxHashSet;

use crate::problem::{
    courier::{Courier, CourierIdx},
    depot::Depot,
    error::ProblemError,
    order::{Order, OrderBuilder, OrderIdx},
    point::{DistanceParams, Point},
};

/// Couriers, orders and depots of one dispatch instance. Immutable once
/// built; the solver only ever reads from it.
#[derive(Debug, Clone)]
pub struct DispatchProblem {
    couriers: Vec<Courier>,
    orders: Vec<Order>,
    depots: Vec<Depot>,
    distance_params: DistanceParams,
}

impl DispatchProblem {
    pub fn couriers(&self) -> &[Courier] {
        &self.couriers
    }

    pub fn courier(&self, courier_id: CourierIdx) -> &Courier {
        &self.couriers[courier_id]
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn order(&self, order_id: OrderIdx) -> &Order {
        &self.orders[order_id]
    }

    pub fn depots(&self) -> &[Depot] {
        &self.depots
    }

    #[inline]
    pub fn distance(&self, from: &Point, to: &Point) -> i64 {
        self.distance_params.distance(from, to)
    }
}

#[derive(Default)]
pub struct DispatchProblemBuilder {
    couriers: Vec<Courier>,
    orders: Vec<OrderBuilder>,
    depots: Vec<Depot>,
    distance_params: DistanceParams,
}

impl DispatchProblemBuilder {
    pub fn set_distance_params(
        &mut self,
        distance_params: DistanceParams,
    ) -> &mut DispatchProblemBuilder {
        self.distance_params = distance_params;
        self
    }

    pub fn add_courier(&mut self, courier: Courier) -> &mut DispatchProblemBuilder {
        self.couriers.push(courier);
        self
    }

    pub fn set_couriers(&mut self, couriers: Vec<Courier>) -> &mut DispatchProblemBuilder {
        self.couriers = couriers;
        self
    }

    pub fn add_order(&mut self, order: OrderBuilder) -> &mut DispatchProblemBuilder {
        self.orders.push(order);
        self
    }

    pub fn add_depot(&mut self, depot: Depot) -> &mut DispatchProblemBuilder {
        self.depots.push(depot);
        self
    }

    pub fn build(self) -> Result<DispatchProblem, ProblemError> {
        if self.distance_params.setup_cost < 0 {
            return Err(ProblemError::NegativeSetupCost(
                self.distance_params.setup_cost,
            ));
        }

        let mut courier_ids = FxHashSet::default();
        for courier in &self.couriers {
            if !courier_ids.insert(courier.external_id()) {
                return Err(ProblemError::DuplicateCourier(courier.external_id()));
            }
        }

        let orders = self
            .orders
            .into_iter()
            .map(|order| order.build(&self.distance_params))
            .collect::<Result<Vec<_>, _>>()?;

        let mut order_ids = FxHashSet::default();
        for order in &orders {
            if !order_ids.insert(order.external_id()) {
                return Err(ProblemError::DuplicateOrder(order.external_id()));
            }
        }

        Ok(DispatchProblem {
            couriers: self.couriers,
            orders,
            depots: self.depots,
            distance_params: self.distance_params,
        })
    }
}
