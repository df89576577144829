//! Chronological traversal of a courier route.
//!
//! A route is replayed from the courier start point every time it is
//! checked. Inserting a stop early in the route can delay every later
//! stop, so there is no prefix of a previous check that can be reused.

use crate::{
    problem::{dispatch_problem::DispatchProblem, point::Point},
    solver::event::{Event, Stop},
};

/// Walks `stops` starting at `start` at `start_time`, waiting whenever a
/// window is not open yet. `on_arrival` receives the position and resolved
/// arrival of every visited stop. Returns the completion time, or `None`
/// as soon as a window is missed.
#[inline]
pub fn simulate<I>(
    problem: &DispatchProblem,
    start: &Point,
    start_time: i64,
    stops: I,
    mut on_arrival: impl FnMut(usize, Stop, i64),
) -> Option<i64>
where
    I: IntoIterator<Item = Stop>,
{
    let mut current = *start;
    let mut time = start_time;

    for (position, stop) in stops.into_iter().enumerate() {
        let target = problem.order(stop.order_id).stop(stop.action);
        let arrival = time + problem.distance(&current, target.point());
        let arrival = target.time_window().clamp_arrival(arrival)?;

        on_arrival(position, stop, arrival);

        current = *target.point();
        time = arrival;
    }

    Some(time)
}

/// Completion time of the route, `None` when infeasible.
pub fn completion_time<I>(
    problem: &DispatchProblem,
    start: &Point,
    start_time: i64,
    stops: I,
) -> Option<i64>
where
    I: IntoIterator<Item = Stop>,
{
    simulate(problem, start, start_time, stops, |_, _, _| {})
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub events: Vec<Event>,
    pub end_time: i64,
}

/// Same traversal as [`completion_time`], keeping the timestamp of every
/// stop.
pub fn schedule<I>(
    problem: &DispatchProblem,
    start: &Point,
    start_time: i64,
    stops: I,
) -> Option<Schedule>
where
    I: IntoIterator<Item = Stop>,
{
    let mut events = Vec::new();
    let end_time = simulate(problem, start, start_time, stops, |_, stop, arrival| {
        events.push(Event::new(stop, arrival));
    })?;

    Some(Schedule { events, end_time })
}

#[cfg(test)]
mod tests {
    use crate::{
        problem::order::OrderIdx,
        test_utils::{TestOrder, create_test_problem},
    };

    use super::*;

    fn single_order_stops() -> Vec<Stop> {
        vec![
            Stop::pickup(OrderIdx::new(0)),
            Stop::dropoff(OrderIdx::new(0)),
        ]
    }

    #[test]
    fn test_empty_route_finishes_at_start_time() {
        let problem = create_test_problem(vec![(0, 0)], vec![]);
        let start = Point::new(0, 0);

        assert_eq!(completion_time(&problem, &start, 360, []), Some(360));
        assert_eq!(
            schedule(&problem, &start, 360, []),
            Some(Schedule {
                events: vec![],
                end_time: 360
            })
        );
    }

    #[test]
    fn test_single_order_schedule() {
        let problem = create_test_problem(
            vec![(0, 0)],
            vec![
                TestOrder::new((10, 0), (20, 0))
                    .with_payment(100.0)
                    .with_pickup_window(0, 100)
                    .with_dropoff_window(0, 200),
            ],
        );

        let schedule = schedule(&problem, &Point::new(0, 0), 0, single_order_stops()).unwrap();

        assert_eq!(schedule.end_time, 40);
        assert_eq!(schedule.events.len(), 2);
        assert_eq!(schedule.events[0].timestamp(), 20);
        assert_eq!(schedule.events[1].timestamp(), 40);
    }

    #[test]
    fn test_missed_dropoff_window_is_infeasible() {
        let problem = create_test_problem(
            vec![(0, 0)],
            vec![
                TestOrder::new((10, 0), (20, 0))
                    .with_payment(100.0)
                    .with_pickup_window(0, 100)
                    .with_dropoff_window(0, 30),
            ],
        );

        assert_eq!(
            completion_time(&problem, &Point::new(0, 0), 0, single_order_stops()),
            None
        );
        assert_eq!(
            schedule(&problem, &Point::new(0, 0), 0, single_order_stops()),
            None
        );
    }

    #[test]
    fn test_waiting_is_free() {
        let problem = create_test_problem(
            vec![(0, 0)],
            vec![
                TestOrder::new((10, 0), (20, 0))
                    .with_pickup_window(100, 120)
                    .with_dropoff_window(0, 200),
            ],
        );

        let schedule = schedule(&problem, &Point::new(0, 0), 0, single_order_stops()).unwrap();

        assert_eq!(schedule.events[0].timestamp(), 100);
        assert_eq!(schedule.end_time, 120);
    }

    #[test]
    fn test_checking_twice_gives_identical_results() {
        let problem = create_test_problem(
            vec![(0, 0)],
            vec![
                TestOrder::new((10, 0), (20, 0)).with_pickup_window(50, 60),
                TestOrder::new((5, 5), (0, 30)),
            ],
        );
        let stops = [
            Stop::pickup(OrderIdx::new(1)),
            Stop::pickup(OrderIdx::new(0)),
            Stop::dropoff(OrderIdx::new(1)),
            Stop::dropoff(OrderIdx::new(0)),
        ];

        let first = schedule(&problem, &Point::new(0, 0), 0, stops);
        let second = schedule(&problem, &Point::new(0, 0), 0, stops);

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_timestamps_respect_windows() {
        let problem = create_test_problem(
            vec![(0, 0)],
            vec![
                TestOrder::new((10, 0), (20, 0))
                    .with_pickup_window(30, 80)
                    .with_dropoff_window(100, 150),
                TestOrder::new((12, 0), (25, 0)).with_pickup_window(0, 200),
            ],
        );
        let stops = [
            Stop::pickup(OrderIdx::new(0)),
            Stop::pickup(OrderIdx::new(1)),
            Stop::dropoff(OrderIdx::new(0)),
            Stop::dropoff(OrderIdx::new(1)),
        ];

        let schedule = schedule(&problem, &Point::new(0, 0), 0, stops).unwrap();

        for event in &schedule.events {
            let window = problem
                .order(event.order_id())
                .stop(event.action())
                .time_window();
            assert!(window.contains(event.timestamp()));
        }
    }
}
