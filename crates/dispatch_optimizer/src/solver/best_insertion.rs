use rayon::prelude::*;
use tracing::trace;

use crate::{
    problem::{
        courier::Courier,
        dispatch_problem::DispatchProblem,
        order::{Order, OrderIdx},
    },
    solver::{
        feasibility::{completion_time, schedule},
        insertion::{ShipmentInsertion, for_each_shipment_insertion},
        orders_mask::OrdersMask,
        route::{CourierRoute, RouteState},
        solver_params::SolverParams,
    },
};

/// What a candidate has to beat to replace the working route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acceptance {
    /// Any feasible insertion is taken, even one losing money.
    AnyFeasible,
    /// The insertion must strictly increase the working route money.
    Improving,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InsertionCandidate {
    pub insertion: ShipmentInsertion,
    pub money: f64,
    pub end_time: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertionOutcome {
    Unchanged,
    Inserted(OrderIdx),
    Promoted(OrderIdx),
}

/// Best single-order insertion into one courier route.
pub struct InsertionSearch<'a> {
    problem: &'a DispatchProblem,
    params: &'a SolverParams,
    thread_pool: &'a rayon::ThreadPool,
}

impl<'a> InsertionSearch<'a> {
    pub fn new(
        problem: &'a DispatchProblem,
        params: &'a SolverParams,
        thread_pool: &'a rayon::ThreadPool,
    ) -> Self {
        InsertionSearch {
            problem,
            params,
            thread_pool,
        }
    }

    /// Inserts the best order into the working route of `state` and promotes
    /// the working route when it earns more than the committed one.
    pub fn try_insert(
        &self,
        state: &mut RouteState,
        mask: &OrdersMask,
        max_detour: Option<i64>,
        acceptance: Acceptance,
    ) -> InsertionOutcome {
        let courier = self.problem.courier(state.courier_id());
        let Some(candidate) =
            self.best_insertion(state.working(), courier, mask, max_detour, acceptance)
        else {
            return InsertionOutcome::Unchanged;
        };

        let Some(route) = self.apply(state.working(), courier, &candidate) else {
            return InsertionOutcome::Unchanged;
        };

        let order_id = candidate.insertion.order_id;
        state.set_working(route);

        if state.should_promote() {
            state.promote();
            InsertionOutcome::Promoted(order_id)
        } else {
            InsertionOutcome::Inserted(order_id)
        }
    }

    /// Scans every free order and every placement of it. Ties keep the
    /// lowest order index, then the earliest placement.
    pub fn best_insertion(
        &self,
        route: &CourierRoute,
        courier: &Courier,
        mask: &OrdersMask,
        max_detour: Option<i64>,
        acceptance: Acceptance,
    ) -> Option<InsertionCandidate> {
        let payments: f64 = route
            .orders()
            .iter()
            .map(|&order_id| self.problem.order(order_id).payment())
            .sum();

        let best = self.thread_pool.install(|| {
            (0..self.problem.orders().len())
                .into_par_iter()
                .map(OrderIdx::new)
                .filter(|&order_id| !mask.contains(order_id) && !route.contains_order(order_id))
                .filter(|&order_id| {
                    self.is_within_detour(route, courier, self.problem.order(order_id), max_detour)
                })
                .filter_map(|order_id| {
                    self.best_insertion_for_order(route, courier, order_id, payments)
                })
                .reduce_with(better_candidate)
        })?;

        let accepted = match acceptance {
            Acceptance::AnyFeasible => true,
            Acceptance::Improving => best.money > route.money(),
        };

        if accepted {
            trace!(
                order = %best.insertion.order_id,
                money = best.money,
                "best insertion found"
            );
            Some(best)
        } else {
            None
        }
    }

    fn best_insertion_for_order(
        &self,
        route: &CourierRoute,
        courier: &Courier,
        order_id: OrderIdx,
        payments: f64,
    ) -> Option<InsertionCandidate> {
        let payments = payments + self.problem.order(order_id).payment();
        let mut best: Option<InsertionCandidate> = None;

        for_each_shipment_insertion(route.len(), order_id, |insertion| {
            let Some(end_time) = completion_time(
                self.problem,
                courier.start(),
                self.params.start_time,
                insertion.stops(route.events()),
            ) else {
                return;
            };

            let money = self.params.route_money(payments, end_time);
            if best.as_ref().is_none_or(|best| money > best.money) {
                best = Some(InsertionCandidate {
                    insertion,
                    money,
                    end_time,
                });
            }
        });

        best
    }

    /// Orders whose pickup is far from everything the courier already does
    /// are skipped. An empty route accepts any order.
    fn is_within_detour(
        &self,
        route: &CourierRoute,
        courier: &Courier,
        order: &Order,
        max_detour: Option<i64>,
    ) -> bool {
        let Some(max_detour) = max_detour else {
            return true;
        };

        if route.is_empty() {
            return true;
        }

        self.distance_to_route(route, courier, order) <= max_detour
    }

    pub fn distance_to_route(&self, route: &CourierRoute, courier: &Courier, order: &Order) -> i64 {
        let pickup = order.pickup().point();

        route
            .stops()
            .map(|stop| self.problem.order(stop.order_id).stop(stop.action).point())
            .chain(std::iter::once(courier.start()))
            .map(|point| self.problem.distance(point, pickup))
            .min()
            .unwrap_or(i64::MAX)
    }

    /// Materializes the candidate with resolved timestamps.
    pub fn apply(
        &self,
        route: &CourierRoute,
        courier: &Courier,
        candidate: &InsertionCandidate,
    ) -> Option<CourierRoute> {
        let schedule = schedule(
            self.problem,
            courier.start(),
            self.params.start_time,
            candidate.insertion.stops(route.events()),
        )?;

        Some(CourierRoute::from_schedule(schedule, candidate.money))
    }
}

fn better_candidate(a: InsertionCandidate, b: InsertionCandidate) -> InsertionCandidate {
    if b.money > a.money {
        b
    } else if a.money > b.money {
        a
    } else if b.insertion.order_id < a.insertion.order_id {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::{courier::CourierIdx, order::StopAction},
        solver::solver_params::Threads,
        test_utils::{TestOrder, create_test_params, create_test_problem},
    };

    use super::*;

    fn thread_pool(threads: usize) -> rayon::ThreadPool {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap()
    }

    fn worked_example_order() -> TestOrder {
        TestOrder::new((10, 0), (20, 0))
            .with_payment(100.0)
            .with_pickup_window(0, 100)
            .with_dropoff_window(0, 200)
    }

    #[test]
    fn test_single_order_score() {
        let problem = create_test_problem(vec![(0, 0)], vec![worked_example_order()]);
        let params = create_test_params();
        let pool = thread_pool(1);
        let search = InsertionSearch::new(&problem, &params, &pool);
        let mut state = RouteState::new(CourierIdx::new(0), params.start_time);
        let mask = OrdersMask::new(problem.orders().len());

        let outcome = search.try_insert(&mut state, &mask, Some(100), Acceptance::Improving);

        assert_eq!(outcome, InsertionOutcome::Promoted(OrderIdx::new(0)));
        assert_eq!(state.committed().money(), 20.0);
        assert_eq!(state.committed().end_time(), 40);
        let events = state.committed().events();
        assert_eq!(events[0].action(), StopAction::Pickup);
        assert_eq!(events[0].timestamp(), 20);
        assert_eq!(events[1].action(), StopAction::Dropoff);
        assert_eq!(events[1].timestamp(), 40);
    }

    #[test]
    fn test_infeasible_order_is_never_selected() {
        let problem = create_test_problem(
            vec![(0, 0)],
            vec![worked_example_order().with_dropoff_window(0, 30)],
        );
        let params = create_test_params();
        let pool = thread_pool(1);
        let search = InsertionSearch::new(&problem, &params, &pool);
        let mut state = RouteState::new(CourierIdx::new(0), params.start_time);
        let mask = OrdersMask::new(problem.orders().len());

        let outcome = search.try_insert(&mut state, &mask, None, Acceptance::AnyFeasible);

        assert_eq!(outcome, InsertionOutcome::Unchanged);
        assert!(state.working().is_empty());
        assert!(state.committed().is_empty());
    }

    #[test]
    fn test_any_feasible_accepts_losing_insertion_without_promoting() {
        let problem = create_test_problem(
            vec![(0, 0)],
            vec![TestOrder::new((10, 0), (20, 0)).with_payment(0.0)],
        );
        let params = create_test_params();
        let pool = thread_pool(1);
        let search = InsertionSearch::new(&problem, &params, &pool);
        let mut state = RouteState::new(CourierIdx::new(0), params.start_time);
        let mask = OrdersMask::new(problem.orders().len());

        let outcome = search.try_insert(&mut state, &mask, None, Acceptance::AnyFeasible);

        assert_eq!(outcome, InsertionOutcome::Inserted(OrderIdx::new(0)));
        assert_eq!(state.working().money(), -80.0);
        assert!(state.committed().is_empty());
    }

    #[test]
    fn test_improving_rejects_losing_insertion() {
        let problem = create_test_problem(
            vec![(0, 0)],
            vec![TestOrder::new((10, 0), (20, 0)).with_payment(0.0)],
        );
        let params = create_test_params();
        let pool = thread_pool(1);
        let search = InsertionSearch::new(&problem, &params, &pool);
        let mut state = RouteState::new(CourierIdx::new(0), params.start_time);
        let mask = OrdersMask::new(problem.orders().len());

        let outcome = search.try_insert(&mut state, &mask, None, Acceptance::Improving);

        assert_eq!(outcome, InsertionOutcome::Unchanged);
        assert!(state.working().is_empty());
    }

    #[test]
    fn test_masked_orders_are_skipped() {
        let problem = create_test_problem(vec![(0, 0)], vec![worked_example_order()]);
        let params = create_test_params();
        let pool = thread_pool(1);
        let search = InsertionSearch::new(&problem, &params, &pool);
        let mut state = RouteState::new(CourierIdx::new(0), params.start_time);
        let mut mask = OrdersMask::new(problem.orders().len());
        mask.insert(OrderIdx::new(0));

        let outcome = search.try_insert(&mut state, &mask, None, Acceptance::AnyFeasible);

        assert_eq!(outcome, InsertionOutcome::Unchanged);
    }

    #[test]
    fn test_detour_cap_prunes_far_orders_on_non_empty_route() {
        let problem = create_test_problem(
            vec![(0, 0)],
            vec![
                worked_example_order(),
                TestOrder::new((500, 0), (510, 0)).with_payment(10_000.0),
            ],
        );
        let params = create_test_params();
        let pool = thread_pool(1);
        let search = InsertionSearch::new(&problem, &params, &pool);
        let mut state = RouteState::new(CourierIdx::new(0), params.start_time);
        let mut mask = OrdersMask::new(problem.orders().len());
        mask.insert(OrderIdx::new(1));

        search.try_insert(&mut state, &mask, Some(100), Acceptance::AnyFeasible);
        assert!(state.working().contains_order(OrderIdx::new(0)));

        let mask = OrdersMask::from_routes(problem.orders().len(), [state.working()]);
        let outcome = search.try_insert(&mut state, &mask, Some(100), Acceptance::AnyFeasible);
        assert_eq!(outcome, InsertionOutcome::Unchanged);

        let outcome = search.try_insert(&mut state, &mask, None, Acceptance::AnyFeasible);
        assert_eq!(outcome, InsertionOutcome::Promoted(OrderIdx::new(1)));
    }

    #[test]
    fn test_distance_to_route_uses_closest_point() {
        let problem = create_test_problem(
            vec![(0, 0)],
            vec![
                worked_example_order(),
                TestOrder::new((25, 0), (30, 0)).with_payment(10.0),
            ],
        );
        let params = create_test_params();
        let pool = thread_pool(1);
        let search = InsertionSearch::new(&problem, &params, &pool);
        let mut state = RouteState::new(CourierIdx::new(0), params.start_time);
        let mask = OrdersMask::new(problem.orders().len());
        let courier = problem.courier(CourierIdx::new(0));
        let far_order = problem.order(OrderIdx::new(1));

        assert_eq!(search.distance_to_route(state.working(), courier, far_order), 35);

        let mut restricted = mask.clone();
        restricted.insert(OrderIdx::new(1));
        search.try_insert(&mut state, &restricted, None, Acceptance::AnyFeasible);

        // dropoff of the first order sits at (20, 0)
        assert_eq!(search.distance_to_route(state.working(), courier, far_order), 15);
    }

    #[test]
    fn test_chooses_most_profitable_order() {
        let problem = create_test_problem(
            vec![(0, 0)],
            vec![
                TestOrder::new((10, 0), (20, 0)).with_payment(50.0),
                TestOrder::new((10, 0), (20, 0)).with_payment(150.0),
                TestOrder::new((10, 0), (20, 0)).with_payment(150.0),
            ],
        );
        let params = create_test_params();
        let pool = thread_pool(1);
        let search = InsertionSearch::new(&problem, &params, &pool);
        let state = RouteState::new(CourierIdx::new(0), params.start_time);
        let mask = OrdersMask::new(problem.orders().len());

        let best = search
            .best_insertion(
                state.working(),
                problem.courier(CourierIdx::new(0)),
                &mask,
                None,
                Acceptance::AnyFeasible,
            )
            .unwrap();

        assert_eq!(best.insertion.order_id, OrderIdx::new(1));
        assert_eq!(best.money, 70.0);
    }

    #[test]
    fn test_parallel_search_matches_single_thread() {
        let orders = (0..40)
            .map(|i| {
                TestOrder::new((i * 7 % 50, i * 3 % 40), (i * 11 % 60, i * 5 % 30))
                    .with_payment(((i * 37) % 90) as f64 * 10.0 + 200.0)
                    .with_pickup_window(0, 300 + i * 10)
            })
            .collect();
        let problem = create_test_problem(vec![(0, 0), (30, 30)], orders);
        let mut params = create_test_params();

        let run = |threads: usize, params: &SolverParams| {
            let pool = thread_pool(threads);
            let search = InsertionSearch::new(&problem, params, &pool);
            let mut state = RouteState::new(CourierIdx::new(0), params.start_time);
            for _ in 0..5 {
                let mask = OrdersMask::from_routes(problem.orders().len(), [state.working()]);
                search.try_insert(&mut state, &mask, None, Acceptance::Improving);
            }
            state
                .committed()
                .events()
                .iter()
                .map(|event| (event.stop(), event.timestamp()))
                .collect::<Vec<_>>()
        };

        params.threads = Threads::Single;
        let single = run(1, &params);
        params.threads = Threads::Multi(4);
        let multi = run(4, &params);

        assert!(!single.is_empty());
        assert_eq!(single, multi);
    }
}
