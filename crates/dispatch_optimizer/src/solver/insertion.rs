use std::iter;

use crate::{
    problem::order::OrderIdx,
    solver::event::{Event, Stop},
};

/// Splices the pickup and the dropoff of `order_id` into a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShipmentInsertion {
    pub order_id: OrderIdx,

    /// Position of the pickup
    pub pickup_position: usize,

    /// This is the position before the pickup has been inserted, the
    /// dropoff always ends up after the pickup
    pub delivery_position: usize,
}

impl ShipmentInsertion {
    /// Stop sequence of the route once the insertion is applied, without
    /// materializing it.
    pub fn stops<'a>(&self, events: &'a [Event]) -> impl Iterator<Item = Stop> + 'a {
        let ShipmentInsertion {
            order_id,
            pickup_position,
            delivery_position,
        } = *self;

        events[..pickup_position]
            .iter()
            .map(Event::stop)
            .chain(iter::once(Stop::pickup(order_id)))
            .chain(
                events[pickup_position..delivery_position]
                    .iter()
                    .map(Event::stop),
            )
            .chain(iter::once(Stop::dropoff(order_id)))
            .chain(events[delivery_position..].iter().map(Event::stop))
    }
}

/// Every `(pickup, dropoff)` placement of `order_id` in a route of
/// `route_len` stops, pickup positions ascending, then dropoff positions
/// ascending.
pub fn for_each_shipment_insertion(
    route_len: usize,
    order_id: OrderIdx,
    mut f: impl FnMut(ShipmentInsertion),
) {
    for pickup_position in 0..=route_len {
        for delivery_position in pickup_position..=route_len {
            f(ShipmentInsertion {
                order_id,
                pickup_position,
                delivery_position,
            });
        }
    }
}
