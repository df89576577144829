use jiff::Timestamp;
use serde::Serialize;
use tracing::info;

use crate::{
    problem::dispatch_problem::DispatchProblem,
    solver::{
        assignment::Assignment,
        construction::Construction,
        error::SolverError,
        nearest_neighbor::NearestNeighborFill,
        orders_mask::OrdersMask,
        route::RouteState,
        solver_params::SolverParams,
        statistics::SearchStatistics,
    },
    utils::enumerate_idx::EnumerateIdx,
};

type ImprovementHandler = Box<dyn FnMut(&Assignment) + Send + 'static>;

#[derive(Serialize, Debug, Clone)]
pub struct SolveOutcome {
    pub assignment: Assignment,
    pub statistics: SearchStatistics,
    pub idle_couriers_filled: usize,
}

pub struct Solver {
    problem: DispatchProblem,
    params: SolverParams,
    on_improvement_handler: Option<ImprovementHandler>,
    created_at: Timestamp,
}

impl Solver {
    pub fn new(problem: DispatchProblem, params: SolverParams) -> Self {
        Solver {
            problem,
            params,
            on_improvement_handler: None,
            created_at: Timestamp::now(),
        }
    }

    /// Called with the full assignment after every pass that changed the
    /// total money.
    pub fn on_improvement<F>(&mut self, callback: F)
    where
        F: FnMut(&Assignment) + Send + 'static,
    {
        self.on_improvement_handler = Some(Box::new(callback));
    }

    pub fn solve(&mut self) -> Result<SolveOutcome, SolverError> {
        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.params.threads.number_of_threads())
            .build()?;

        let problem = &self.problem;
        let params = &self.params;
        let mut states: Vec<RouteState> = problem
            .couriers()
            .iter()
            .enumerate_idx()
            .map(|(courier_id, _)| RouteState::new(courier_id, params.start_time))
            .collect();
        let mut statistics = SearchStatistics::default();

        info!(
            couriers = problem.couriers().len(),
            orders = problem.orders().len(),
            threads = params.threads.number_of_threads(),
            "solving"
        );

        let construction = Construction::new(problem, params, &thread_pool);
        let handler = &mut self.on_improvement_handler;
        construction.run(&mut states, &mut statistics, |states| {
            if let Some(callback) = handler.as_mut() {
                let assignment = Assignment::assemble(problem, params, states)?;
                callback(&assignment);
            }
            Ok(())
        })?;

        let idle_couriers_filled = match &params.idle_fill {
            Some(fill_params) => {
                let mut mask = OrdersMask::from_routes(
                    problem.orders().len(),
                    states.iter().map(RouteState::committed),
                );
                let filled = NearestNeighborFill::new(problem, params, fill_params)
                    .fill(&mut states, &mut mask);
                info!(filled, "idle couriers filled");
                filled
            }
            None => 0,
        };

        let assignment = Assignment::assemble(problem, params, &states)?;
        if idle_couriers_filled > 0
            && let Some(callback) = handler.as_mut()
        {
            callback(&assignment);
        }

        info!(
            money = assignment.total_money(),
            orders = assignment.assigned_orders(),
            duration = %Timestamp::now().duration_since(self.created_at),
            "solved"
        );

        Ok(SolveOutcome {
            assignment,
            statistics,
            idle_couriers_filled,
        })
    }
}
