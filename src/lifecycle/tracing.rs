//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//!
//! ## What Gets Traced
//!
//! - **Order log**: the human-readable lines written through
//!   [`TracingLog`](crate::framework::TracingLog) (one per step, one aggregate)
//! - **Dispatch span**: every line inside a dispatch carries the `order` and `tasks` fields
//! - **Pool lifecycle**: scope acquire/release, shutdown, interrupted waits
//! - **Failures**: the failing task name and fault reason
//!
//! ## Usage Examples
//!
//! ```bash
//! # Order log only
//! RUST_LOG=info cargo run
//!
//! # Scope acquire/release and per-task start/finish
//! RUST_LOG=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a successful order prints:
//!
//! ```text
//! INFO dispatch: Inventory update: Order#1234 order=Order#1234 tasks=3
//! INFO dispatch: Shipping system notification: Order#1234 order=Order#1234 tasks=3
//! INFO dispatch: Accounting system update: Order#1234 order=Order#1234 tasks=3
//! INFO dispatch: All order processing tasks were completed successfully. order=Order#1234 tasks=3
//! ```
//!
//! The three step lines may appear in any order.

/// Installs the global subscriber. Filter comes from `RUST_LOG` (default `info`).
pub fn setup_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true) // steps run on different worker threads
        .compact()
        .init();
}
