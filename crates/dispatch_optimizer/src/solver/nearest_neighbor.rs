use tracing::{debug, warn};

use crate::{
    problem::{
        dispatch_problem::DispatchProblem,
        order::{Order, OrderIdx},
        point::Point,
    },
    solver::{
        event::Stop,
        feasibility::schedule,
        orders_mask::OrdersMask,
        route::{CourierRoute, RouteState},
        solver_params::{IdleFillParams, SolverParams},
    },
};

/// Chains orders one after the other for couriers the construction left
/// without work, always moving to the order paying the most per minute
/// among the closest ones.
pub struct NearestNeighborFill<'a> {
    problem: &'a DispatchProblem,
    params: &'a SolverParams,
    neighbors: usize,
}

struct Walk {
    orders: Vec<OrderIdx>,
    money: f64,
}

impl<'a> NearestNeighborFill<'a> {
    pub fn new(
        problem: &'a DispatchProblem,
        params: &'a SolverParams,
        fill_params: &IdleFillParams,
    ) -> Self {
        NearestNeighborFill {
            problem,
            params,
            neighbors: fill_params.neighbors,
        }
    }

    /// Fills every courier with an empty committed route, in fleet order.
    /// Returns the number of couriers that received orders.
    pub fn fill(&self, states: &mut [RouteState], mask: &mut OrdersMask) -> usize {
        let mut filled = 0;

        for state in states.iter_mut() {
            if !state.committed().is_empty() {
                continue;
            }

            let start = *self.problem.courier(state.courier_id()).start();
            let Some(walk) = self.walk(&start, mask) else {
                continue;
            };

            let stops = walk
                .orders
                .iter()
                .flat_map(|&order_id| [Stop::pickup(order_id), Stop::dropoff(order_id)]);
            let Some(schedule) = schedule(self.problem, &start, self.params.start_time, stops)
            else {
                warn!(courier = %state.courier_id(), "idle fill produced an infeasible route");
                continue;
            };

            debug!(
                courier = %state.courier_id(),
                orders = walk.orders.len(),
                money = walk.money,
                "idle courier filled"
            );

            for &order_id in &walk.orders {
                mask.insert(order_id);
            }
            state.assign(CourierRoute::from_schedule(schedule, walk.money));
            filled += 1;
        }

        filled
    }

    /// Greedy walk from `start`. Keeps the prefix with the highest money,
    /// `None` when no prefix earns strictly positive money.
    fn walk(&self, start: &Point, mask: &OrdersMask) -> Option<Walk> {
        let mut taken = mask.clone();
        let mut position = *start;
        let mut time = self.params.start_time;
        let mut payments = 0.0;
        let mut orders = Vec::new();
        let mut best: Option<Walk> = None;

        loop {
            let next = self
                .nearest_orders(&position)
                .into_iter()
                .filter(|&order_id| !taken.contains(order_id))
                .filter_map(|order_id| {
                    let (score, dropoff_time) =
                        self.score(&position, time, self.problem.order(order_id))?;
                    Some((order_id, score, dropoff_time))
                })
                .fold(None, |best: Option<(OrderIdx, f64, i64)>, candidate| match best {
                    Some(best) if best.1 >= candidate.1 => Some(best),
                    _ => Some(candidate),
                });

            let Some((order_id, score, dropoff_time)) = next else {
                break;
            };
            if score < 0.0 {
                break;
            }

            let order = self.problem.order(order_id);
            taken.insert(order_id);
            orders.push(order_id);
            payments += order.payment();
            position = *order.dropoff().point();
            time = dropoff_time;

            let money = self.params.route_money(payments, time);
            if money > best.as_ref().map_or(0.0, |best| best.money) {
                best = Some(Walk {
                    orders: orders.clone(),
                    money,
                });
            }
        }

        best
    }

    /// The `neighbors` orders whose pickup is closest to `point`, closest
    /// first. Taken orders are not excluded here.
    pub fn nearest_orders(&self, point: &Point) -> Vec<OrderIdx> {
        let mut candidates: Vec<(i64, OrderIdx)> = self
            .problem
            .orders()
            .iter()
            .enumerate()
            .map(|(index, order)| {
                (
                    point.manhattan_distance(order.pickup().point()),
                    OrderIdx::new(index),
                )
            })
            .collect();

        if candidates.len() > self.neighbors {
            candidates.select_nth_unstable(self.neighbors);
            candidates.truncate(self.neighbors);
        }
        candidates.sort_unstable();

        candidates
            .into_iter()
            .map(|(_, order_id)| order_id)
            .collect()
    }

    /// Payment per minute spent to serve `order` directly from `point` at
    /// `time`, with the dropoff time. `None` when a window is missed.
    pub fn score(&self, point: &Point, time: i64, order: &Order) -> Option<(f64, i64)> {
        let pickup = order.pickup();
        let pickup_time = pickup
            .time_window()
            .clamp_arrival(time + self.problem.distance(point, pickup.point()))?;
        let dropoff_time = order
            .dropoff()
            .time_window()
            .clamp_arrival(pickup_time + order.transit_distance())?;

        let elapsed = (dropoff_time - time).max(1);
        Some((order.payment() / elapsed as f64, dropoff_time))
    }
}
