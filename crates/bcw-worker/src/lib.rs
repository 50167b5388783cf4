//! Background worker for the BrandConnect marketplace.
//!
//! Verifies new signups, simulates influencer growth and rolls completed
//! campaign work up into cumulative brand and campaign statistics.

pub mod context;
pub mod provider;
pub mod scheduler;
pub mod store;
pub mod tasks;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::WorkerContext;
pub use scheduler::Scheduler;
pub use tasks::{run_task, TaskKind, TaskReport};
