//! Orchestration core: per-unit execution, the plan runner and the resume driver

pub mod executor;
pub mod resume;
pub mod runner;

pub use executor::{UnitExecutor, NO_DATA_REASON};
pub use resume::{ResumeDriver, RetryOptions};
pub use runner::{PlanRunner, RunConfig, PERSIST_FAILURE_REASON};
