use fxhash::FxHashSet;

use crate::{
    problem::{courier::CourierIdx, order::OrderIdx},
    solver::{
        event::{Event, Stop},
        feasibility::Schedule,
    },
};

/// Ordered stops of one courier together with the money they earn.
#[derive(Clone, Debug)]
pub struct CourierRoute {
    events: Vec<Event>,
    orders: FxHashSet<OrderIdx>,
    money: f64,
    end_time: i64,
}

impl CourierRoute {
    pub fn empty(start_time: i64) -> Self {
        CourierRoute {
            events: Vec::new(),
            orders: FxHashSet::default(),
            money: 0.0,
            end_time: start_time,
        }
    }

    /// Builds a route out of a feasible schedule. Every order of the
    /// schedule is expected to appear with both its pickup and dropoff.
    pub fn from_schedule(schedule: Schedule, money: f64) -> Self {
        let orders = schedule.events.iter().map(Event::order_id).collect();

        CourierRoute {
            events: schedule.events,
            orders,
            money,
            end_time: schedule.end_time,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn stops(&self) -> impl Iterator<Item = Stop> + '_ {
        self.events.iter().map(Event::stop)
    }

    pub fn orders(&self) -> &FxHashSet<OrderIdx> {
        &self.orders
    }

    pub fn contains_order(&self, order_id: OrderIdx) -> bool {
        self.orders.contains(&order_id)
    }

    pub fn money(&self) -> f64 {
        self.money
    }

    pub fn end_time(&self) -> i64 {
        self.end_time
    }
}

/// Per-courier checkpoint: `committed` is the best route found so far,
/// `working` the route the current pass extends. Speculative insertions
/// live in `working` until they pay off (`promote`) or are dropped (`reset`).
#[derive(Clone, Debug)]
pub struct RouteState {
    courier_id: CourierIdx,
    committed: CourierRoute,
    working: CourierRoute,
}

impl RouteState {
    pub fn new(courier_id: CourierIdx, start_time: i64) -> Self {
        RouteState {
            courier_id,
            committed: CourierRoute::empty(start_time),
            working: CourierRoute::empty(start_time),
        }
    }

    pub fn courier_id(&self) -> CourierIdx {
        self.courier_id
    }

    pub fn committed(&self) -> &CourierRoute {
        &self.committed
    }

    pub fn working(&self) -> &CourierRoute {
        &self.working
    }

    pub fn set_working(&mut self, route: CourierRoute) {
        self.working = route;
    }

    pub fn should_promote(&self) -> bool {
        self.working.money > self.committed.money
    }

    /// working -> committed
    pub fn promote(&mut self) {
        self.committed = self.working.clone();
    }

    /// committed -> working
    pub fn reset(&mut self) {
        self.working = self.committed.clone();
    }

    /// Replaces both routes at once.
    pub fn assign(&mut self, route: CourierRoute) {
        self.working = route.clone();
        self.committed = route;
    }
}
