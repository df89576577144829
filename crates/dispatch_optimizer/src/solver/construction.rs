use std::fmt::Display;

use jiff::Timestamp;
use serde::Serialize;
use tracing::{Level, debug, info, instrument, trace};

use crate::{
    problem::dispatch_problem::DispatchProblem,
    solver::{
        best_insertion::{Acceptance, InsertionOutcome, InsertionSearch},
        error::SolverError,
        orders_mask::OrdersMask,
        route::RouteState,
        solver_params::SolverParams,
        statistics::{PassStatistics, SearchStatistics},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    /// Detour-capped passes that keep any feasible insertion in the
    /// working routes.
    Speculative,
    /// Unrestricted passes that only keep insertions earning more money.
    Confirm,
}

impl Phase {
    pub fn max_detour(&self, params: &SolverParams) -> Option<i64> {
        match self {
            Phase::Speculative => Some(params.max_detour_distance),
            Phase::Confirm => None,
        }
    }

    pub fn acceptance(&self) -> Acceptance {
        match self {
            Phase::Speculative => Acceptance::AnyFeasible,
            Phase::Confirm => Acceptance::Improving,
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Speculative => write!(f, "Speculative"),
            Self::Confirm => write!(f, "Confirm"),
        }
    }
}

/// Repeated insertion passes over the whole fleet.
pub struct Construction<'a> {
    problem: &'a DispatchProblem,
    params: &'a SolverParams,
    search: InsertionSearch<'a>,
}

impl<'a> Construction<'a> {
    pub fn new(
        problem: &'a DispatchProblem,
        params: &'a SolverParams,
        thread_pool: &'a rayon::ThreadPool,
    ) -> Self {
        Construction {
            problem,
            params,
            search: InsertionSearch::new(problem, params, thread_pool),
        }
    }

    /// Speculative phase, reset of every working route, confirm phase.
    /// `on_improvement` runs after every pass that changed the total money.
    pub fn run<F>(
        &self,
        states: &mut [RouteState],
        statistics: &mut SearchStatistics,
        mut on_improvement: F,
    ) -> Result<f64, SolverError>
    where
        F: FnMut(&[RouteState]) -> Result<(), SolverError>,
    {
        let mut money = 0.0;

        self.run_phase(
            states,
            Phase::Speculative,
            &mut money,
            statistics,
            &mut on_improvement,
        )?;

        for state in states.iter_mut() {
            state.reset();
        }

        self.run_phase(
            states,
            Phase::Confirm,
            &mut money,
            statistics,
            &mut on_improvement,
        )?;

        Ok(money)
    }

    /// Passes until the total committed money is the same as after the
    /// previous pass, or `max_iterations` passes ran.
    #[instrument(skip_all, fields(phase = %phase), level = Level::DEBUG)]
    pub fn run_phase<F>(
        &self,
        states: &mut [RouteState],
        phase: Phase,
        money: &mut f64,
        statistics: &mut SearchStatistics,
        on_improvement: &mut F,
    ) -> Result<(), SolverError>
    where
        F: FnMut(&[RouteState]) -> Result<(), SolverError>,
    {
        for pass in 0..self.params.max_iterations {
            let started_at = Timestamp::now();
            let new_money = self.run_pass(states, phase);
            let improved = new_money != *money;

            statistics.add_pass(PassStatistics {
                phase,
                pass,
                total_money: new_money,
                assigned_orders: states
                    .iter()
                    .map(|state| state.committed().orders().len())
                    .sum(),
                improved,
                duration: Timestamp::now().duration_since(started_at),
            });

            info!(%phase, pass, money = new_money, "pass finished");

            if !improved {
                break;
            }

            *money = new_money;
            on_improvement(states)?;
        }

        Ok(())
    }

    /// One insertion attempt per courier, in fleet order. An order taken by
    /// a courier is invisible to the couriers after it in the same pass.
    /// Returns the total committed money.
    pub fn run_pass(&self, states: &mut [RouteState], phase: Phase) -> f64 {
        let mut mask = OrdersMask::from_routes(
            self.problem.orders().len(),
            states.iter().map(RouteState::working),
        );
        let max_detour = phase.max_detour(self.params);
        let acceptance = phase.acceptance();
        let mut money = 0.0;

        for state in states.iter_mut() {
            match self.search.try_insert(state, &mask, max_detour, acceptance) {
                InsertionOutcome::Promoted(order_id) => debug!(
                    courier = %state.courier_id(),
                    order = %order_id,
                    money = state.committed().money(),
                    "promoted working route"
                ),
                InsertionOutcome::Inserted(order_id) => trace!(
                    courier = %state.courier_id(),
                    order = %order_id,
                    money = state.working().money(),
                    "speculative insertion"
                ),
                InsertionOutcome::Unchanged => {}
            }

            mask.insert_route(state.working());
            money += state.committed().money();
        }

        money
    }
}
