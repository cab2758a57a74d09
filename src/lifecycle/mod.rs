//! # Service Lifecycle
//!
//! This module wires the pieces together and manages their lifetime.
//!
//! **Key Responsibilities:**
//! 1. **Assembly** - [`OrderService`] creates the long-lived pool of
//!    [`POOL_SIZE`] workers, the dispatcher, and the default task list
//! 2. **Shutdown** - [`OrderService::shutdown`] interrupts waiting orders and
//!    waits for every pool scope to be released
//! 3. **Observability Setup** - [`setup_tracing`]
//!
//! ## Pool Ownership
//!
//! The pool outlives individual orders. Each call to
//! [`OrderService::order`] takes a scope on the shared pool and releases it
//! before returning, whatever the outcome:
//!
//! ```rust,ignore
//! let service = OrderService::new();
//! service.order("Order#1").await?;   // scope opened and released
//! service.order("Order#2").await?;   // same pool, no new workers
//! service.shutdown().await;
//! ```
//!
//! Custom pools (for example the
//! [`TrackingPool`](crate::framework::mock::TrackingPool) test double) plug in
//! through [`OrderService::with_parts`].

pub mod order_service;
pub mod tracing;

pub use order_service::*;
pub use self::tracing::*;
