//! Generic fan-out/fan-in engine for independent units of work.
//!
//! This module provides the building blocks for running a fixed set of
//! independent work items concurrently over a long-lived, bounded pool and
//! collecting their results in submission order.
//!
//! # Main Components
//!
//! - [`Work`] / [`TaskDescriptor`] - A named unit of work with an injectable body
//! - [`WorkerPool`] / [`TaskPool`] - The bounded pool that executes work items
//! - [`PoolScope`] - Per-call lease on the pool, released on drop
//! - [`Dispatcher`] - Submits, waits, and inspects results
//! - [`TaskError`] / [`DispatchError`] - Error types
//!
//! # Testing
//!
//! See [`mock`] module for test doubles (recording log, tracking pool, scripted tasks).

pub mod core;
pub mod error;
pub mod mock;

// Re-export core types for convenience
pub use self::core::*;
pub use self::error::*;
