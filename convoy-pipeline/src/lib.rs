//! Convoy Pipeline
//!
//! Bounded-concurrency execution engine for terminal work-unit pipelines.
//!
//! Architecture:
//! - Units: the atomic jobs (callables or command lines) and their run loop
//! - Store: the mutex-guarded serialized region workers publish snapshots into
//! - Executor: the semaphore-gated worker pool plus the live render loop
//! - Render: the renderer contract and the default spinner theme
//!
//! The executor fans units out over the pool, each worker publishes its
//! finished snapshot into the progress store, and a dedicated render task
//! polls the store at a fixed interval until the pool drains. Results come
//! back in submission order, one per unit.

pub mod cancel;
pub mod command;
pub mod config;
pub mod executor;
pub mod render;
pub mod report;
pub mod store;
pub mod unit;

pub use cancel::CancelToken;
pub use config::Config;
pub use convoy_core::domain::result::ExecutionResult;
pub use convoy_core::domain::unit::{UnitSnapshot, UnitStatus};
pub use convoy_core::error::PipelineError;
pub use executor::Pipeline;
pub use unit::WorkUnit;
