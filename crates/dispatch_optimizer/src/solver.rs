pub mod assignment;
pub mod best_insertion;
pub mod construction;
pub mod error;
pub mod event;
pub mod feasibility;
pub mod insertion;
pub mod nearest_neighbor;
pub mod orders_mask;
pub mod route;
pub mod solver;
pub mod solver_params;
pub mod statistics;
