use fxhash::FxHashSet;
use serde::Serialize;

use crate::{
    problem::{dispatch_problem::DispatchProblem, order::StopAction},
    solver::{
        error::SolverError, feasibility::schedule, route::RouteState,
        solver_params::SolverParams,
    },
};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AssignedStop {
    pub courier_id: u64,
    pub action: StopAction,
    pub order_id: u64,
    pub point_id: u64,
    pub timestamp: i64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CourierSummary {
    pub courier_id: u64,
    pub orders: usize,
    pub money: f64,
    pub end_time: i64,
}

/// Every committed stop of the fleet in chronological order.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    stops: Vec<AssignedStop>,
    couriers: Vec<CourierSummary>,
    total_money: f64,
}

impl Assignment {
    /// Flattens the committed routes. Each route is replayed before it is
    /// emitted, a route that does not replay is a solver bug.
    pub fn assemble(
        problem: &DispatchProblem,
        params: &SolverParams,
        states: &[RouteState],
    ) -> Result<Assignment, SolverError> {
        let mut stops = Vec::new();
        let mut couriers = Vec::new();
        let mut total_money = 0.0;

        for state in states {
            let route = state.committed();
            let courier = problem.courier(state.courier_id());
            let infeasible = || SolverError::InfeasibleRoute {
                courier_id: courier.external_id(),
            };

            let mut picked_up = FxHashSet::default();
            for stop in route.stops() {
                let in_order = match stop.action {
                    StopAction::Pickup => picked_up.insert(stop.order_id),
                    StopAction::Dropoff => picked_up.remove(&stop.order_id),
                };
                if !in_order {
                    return Err(infeasible());
                }
            }
            if !picked_up.is_empty() {
                return Err(infeasible());
            }

            let replayed = schedule(problem, courier.start(), params.start_time, route.stops())
                .ok_or_else(infeasible)?;

            for event in &replayed.events {
                let order = problem.order(event.order_id());
                stops.push(AssignedStop {
                    courier_id: courier.external_id(),
                    action: event.action(),
                    order_id: order.external_id(),
                    point_id: order.stop(event.action()).point_id(),
                    timestamp: event.timestamp(),
                });
            }

            if !route.is_empty() {
                couriers.push(CourierSummary {
                    courier_id: courier.external_id(),
                    orders: route.orders().len(),
                    money: route.money(),
                    end_time: replayed.end_time,
                });
            }

            total_money += route.money();
        }

        stops.sort_by_key(|stop| (stop.timestamp, stop.action == StopAction::Dropoff));

        Ok(Assignment {
            stops,
            couriers,
            total_money,
        })
    }

    pub fn stops(&self) -> &[AssignedStop] {
        &self.stops
    }

    pub fn couriers(&self) -> &[CourierSummary] {
        &self.couriers
    }

    pub fn total_money(&self) -> f64 {
        self.total_money
    }

    pub fn assigned_orders(&self) -> usize {
        self.couriers.iter().map(|courier| courier.orders).sum()
    }
}
