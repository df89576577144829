use dispatch_optimizer::json::types::JsonDispatchInput;
use rand::{SeedableRng, rngs::SmallRng, seq::SliceRandom};
use tracing::info;

/// Keeps a random subset of the couriers and orders. The same seed always
/// keeps the same subset.
pub fn sample_input(
    input: &mut JsonDispatchInput,
    couriers: Option<usize>,
    orders: Option<usize>,
    seed: u64,
) {
    let mut rng = SmallRng::seed_from_u64(seed);

    if let Some(couriers) = couriers {
        input.couriers.shuffle(&mut rng);
        input.couriers.truncate(couriers);
    }

    if let Some(orders) = orders {
        input.orders.shuffle(&mut rng);
        input.orders.truncate(orders);
    }

    info!(
        couriers = input.couriers.len(),
        orders = input.orders.len(),
        seed,
        "sampled input"
    );
}
