//! Request pipeline: factory, optional rate limiter, worker pool, executor,
//! and the orchestrating client.
mod client;
mod execution;
mod factory;
mod pool;
mod rate;


pub use client::{Client, RunConfig};
pub use execution::send;
pub use factory::{RequestTemplate, WorkItem, produce};
pub use pool::dispatch;
pub use rate::{throttle, throttle_interval};
