use fixedbitset::FixedBitSet;

use crate::{problem::order::OrderIdx, solver::route::CourierRoute};

/// Orders already claimed by some courier during the current pass.
#[derive(Clone, Debug)]
pub struct OrdersMask {
    taken: FixedBitSet,
}

impl OrdersMask {
    pub fn new(number_of_orders: usize) -> Self {
        OrdersMask {
            taken: FixedBitSet::with_capacity(number_of_orders),
        }
    }

    pub fn from_routes<'a>(
        number_of_orders: usize,
        routes: impl IntoIterator<Item = &'a CourierRoute>,
    ) -> Self {
        let mut mask = OrdersMask::new(number_of_orders);
        for route in routes {
            mask.insert_route(route);
        }
        mask
    }

    pub fn insert(&mut self, order_id: OrderIdx) {
        self.taken.insert(order_id.get());
    }

    pub fn insert_route(&mut self, route: &CourierRoute) {
        for &order_id in route.orders() {
            self.insert(order_id);
        }
    }

    pub fn contains(&self, order_id: OrderIdx) -> bool {
        self.taken.contains(order_id.get())
    }

    pub fn count(&self) -> usize {
        self.taken.count_ones(..)
    }
}
