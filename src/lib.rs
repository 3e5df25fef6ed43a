//! Core library for the `hit` CLI.
//!
//! This crate provides the building blocks used by the binary: CLI argument
//! types and validation, configuration loading, the request pipeline
//! (factory, throttle, worker pool, executor), and result aggregation. The
//! main entry point for embedding is [`http::Client::run`].
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod metrics;
pub mod shutdown;
