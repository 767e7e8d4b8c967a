//! Background maintenance for AnimHub.
//!
//! This crate provides:
//! - A job executor that dispatches named jobs to registered handlers
//! - A scheduler that runs jobs on a fixed interval for the life of the process
//! - The retention sweep that bounds disk usage of the working directories

pub mod executor;
pub mod jobs;
pub mod scheduler;

pub use executor::{JobExecutionError, JobExecutor, JobHandler};
pub use jobs::retention::{RetentionJobHandler, RetentionSweeper, SweepReport};
pub use scheduler::CronScheduler;
