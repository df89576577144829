/// Knobs of the construction heuristic. Times are minutes, distances are
/// grid units (one unit takes one minute to travel).
#[derive(Clone, Debug)]
pub struct SolverParams {
    /// Time at which every courier leaves its start point.
    pub start_time: i64,

    /// Money charged per minute a courier spends between `start_time` and
    /// the end of its route.
    pub time_cost_rate: f64,

    /// During the speculative phase, orders whose pickup is farther than this
    /// from every point of a non-empty route are not considered.
    pub max_detour_distance: i64,

    /// Upper bound on passes per phase.
    pub max_iterations: usize,

    pub threads: Threads,

    pub idle_fill: Option<IdleFillParams>,
}

#[derive(Clone, Debug)]
pub struct IdleFillParams {
    /// How many orders closest to the courier are looked at on every step.
    pub neighbors: usize,
}

impl Default for IdleFillParams {
    fn default() -> Self {
        IdleFillParams { neighbors: 1000 }
    }
}

#[derive(Clone, Debug)]
pub enum Threads {
    Single,
    Auto,
    Multi(usize),
}

impl Threads {
    pub fn number_of_threads(&self) -> usize {
        match self {
            Threads::Single => 1,
            Threads::Multi(num) => (*num).max(1),
            Threads::Auto => std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            start_time: 360,
            time_cost_rate: 2.0,
            max_detour_distance: 100,
            max_iterations: 15,
            threads: Threads::Single,
            idle_fill: None,
        }
    }
}

impl SolverParams {
    /// Net money of a route collecting `payments` and finishing at `end_time`.
    pub fn route_money(&self, payments: f64, end_time: i64) -> f64 {
        payments - self.time_cost_rate * (end_time - self.start_time) as f64
    }
}
