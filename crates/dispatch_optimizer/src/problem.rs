pub mod courier;
pub mod depot;
pub mod dispatch_problem;
pub mod error;
pub mod order;
pub mod point;
pub mod time_window;
