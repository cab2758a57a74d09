#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Order Dispatch
//!
//! > **Run independent order steps concurrently on a bounded pool, fail fast on the results.**
//!
//! Processing an order touches three subsystems: inventory, shipping, and
//! accounting. The steps don't depend on each other, so instead of running
//! them one after the other (3 × 1 s) this crate submits all of them to a
//! worker pool, waits for every one to finish (≈ 1 s), and then inspects the
//! results in submission order.
//!
//! ## 🚀 Core Concepts
//!
//! ### Steps are data
//! A step is a [`TaskDescriptor`](framework::TaskDescriptor): a name plus a
//! [`Work`](framework::Work) body. The default list is built by
//! [`order_tasks::new`], and tests swap in scripted
//! [`MockTask`](framework::mock::MockTask)s.
//!
//! ### Barrier, then inspect
//! [`Dispatcher::dispatch`](framework::Dispatcher::dispatch) never returns on the
//! first completion. Once all steps finished it walks the results in
//! submission order:
//! - `Ok(true)` everywhere → [`OrderOutcome::Completed`](model::OrderOutcome::Completed)
//! - first `Ok(false)` → [`OrderOutcome::Rejected`](model::OrderOutcome::Rejected) (soft failure)
//! - first `Err` → [`DispatchError::TaskExecution`](framework::DispatchError::TaskExecution) (hard failure)
//!
//! Siblings of a failing step are not cancelled.
//!
//! ### One pool, many orders
//! The [`TaskPool`](framework::TaskPool) is long-lived. Each dispatch takes a
//! [`PoolScope`](framework::PoolScope) on it, and the scope is released on
//! every exit path. Shutting the pool down interrupts waiting dispatches with
//! [`DispatchError::Interrupted`](framework::DispatchError::Interrupted).
//!
//! ## 🗺️ Module Tour
//!
//! - [`framework`] - The generic engine (work, pool, scope, dispatcher, errors) and [`framework::mock`].
//! - [`order_tasks`] - The inventory, shipping, and accounting steps.
//! - [`model`] - [`OrderNumber`](model::OrderNumber) and the outcome types.
//! - [`lifecycle`] - [`OrderService`](lifecycle::OrderService) and tracing setup.
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod order_tasks;
