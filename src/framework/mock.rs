//! # Mock Framework
//!
//! Test doubles for exercising the dispatcher without real subsystems.
//!
//! - [`RecordingLog`] captures every order log line.
//! - [`TrackingPool`] wraps a [`TaskPool`] and counts scope acquire/release.
//! - [`MockTask`] builds scripted work items (succeed, fail, fault, panic).
//!
//! # Example
//! ```ignore
//! let pool = Arc::new(TrackingPool::new(5));
//! let log = Arc::new(RecordingLog::new());
//! let dispatcher = Dispatcher::new(pool.clone(), log.clone());
//!
//! let tasks = vec![
//!     MockTask::new("inventory").into_descriptor(),
//!     MockTask::new("shipping").returning(false).into_descriptor(),
//! ];
//! let outcome = dispatcher.dispatch(&"order_1".into(), &tasks).await?;
//!
//! pool.verify_balanced();
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::framework::{OrderLog, TaskContext, TaskDescriptor, TaskError, TaskPool, TaskResult, Work, WorkerPool};

// =============================================================================
// RECORDING LOG
// =============================================================================

/// [`OrderLog`] that keeps every line in memory.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<String>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines logged so far, in arrival order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Number of lines exactly equal to `message`.
    pub fn count(&self, message: &str) -> usize {
        self.lines.lock().unwrap().iter().filter(|line| line.as_str() == message).count()
    }

    /// Number of lines starting with `prefix`.
    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.lines.lock().unwrap().iter().filter(|line| line.starts_with(prefix)).count()
    }
}

impl OrderLog for RecordingLog {
    fn log(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }
}

// =============================================================================
// TRACKING POOL
// =============================================================================

/// A [`TaskPool`] that counts how many scopes were acquired and released.
pub struct TrackingPool {
    inner: TaskPool,
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl TrackingPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: TaskPool::new(capacity),
            acquired: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
        }
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Shuts the wrapped pool down.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }

    /// Panics unless every acquired scope has been released exactly once.
    pub fn verify_balanced(&self) {
        let (acquired, released) = (self.acquired(), self.released());
        if acquired != released {
            panic!("Pool scopes unbalanced: {acquired} acquired, {released} released");
        }
    }
}

impl WorkerPool for TrackingPool {
    fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    fn permits(&self) -> Arc<Semaphore> {
        self.inner.permits()
    }

    fn shutdown_token(&self) -> CancellationToken {
        self.inner.shutdown_token()
    }

    fn acquire(&self) {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        self.inner.acquire();
    }

    fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
        self.inner.release();
    }
}

// =============================================================================
// SCRIPTED TASKS
// =============================================================================

#[derive(Debug, Clone)]
enum Behavior {
    Return(bool),
    Fault(String),
    Panic(String),
}

/// Builder for a scripted work item.
///
/// Defaults to returning `true` immediately. Every run is counted, which lets
/// tests assert that siblings of a failing task still ran.
#[derive(Debug, Clone)]
pub struct MockTask {
    name: String,
    latency: Duration,
    behavior: Behavior,
    runs: Arc<AtomicUsize>,
}

impl MockTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latency: Duration::ZERO,
            behavior: Behavior::Return(true),
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Simulated latency before the scripted result.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn returning(mut self, succeeded: bool) -> Self {
        self.behavior = Behavior::Return(succeeded);
        self
    }

    /// Fails with [`TaskError::Fault`] instead of returning.
    pub fn faulting(mut self, reason: impl Into<String>) -> Self {
        self.behavior = Behavior::Fault(reason.into());
        self
    }

    /// Panics instead of returning.
    pub fn panicking(mut self, message: impl Into<String>) -> Self {
        self.behavior = Behavior::Panic(message.into());
        self
    }

    /// Shared run counter; stays valid after [`into_descriptor`](Self::into_descriptor).
    pub fn runs(&self) -> Arc<AtomicUsize> {
        self.runs.clone()
    }

    pub fn into_descriptor(self) -> TaskDescriptor {
        TaskDescriptor::new(self.name.clone(), self)
    }
}

#[async_trait]
impl Work for MockTask {
    async fn run(&self, ctx: TaskContext) -> TaskResult {
        self.runs.fetch_add(1, Ordering::SeqCst);
        ctx.log(&format!("{}: {}", self.name, ctx.order));
        if !self.latency.is_zero() {
            ctx.simulate_latency(self.latency).await?;
        }
        match &self.behavior {
            Behavior::Return(succeeded) => Ok(*succeeded),
            Behavior::Fault(reason) => Err(TaskError::Fault(reason.clone())),
            Behavior::Panic(message) => panic!("{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::PoolScope;
    use crate::model::OrderNumber;

    #[test]
    fn test_recording_log_counts_lines() {
        let log = RecordingLog::new();
        log.log("Inventory update: order_1");
        log.log("Inventory update: order_2");
        log.log("done");

        assert_eq!(log.lines().len(), 3);
        assert_eq!(log.count("done"), 1);
        assert_eq!(log.count_prefix("Inventory update:"), 2);
    }

    #[tokio::test]
    async fn test_tracking_pool_counts_scopes() {
        let pool = TrackingPool::new(2);
        {
            let _first = PoolScope::open(&pool).unwrap();
            let _second = PoolScope::open(&pool).unwrap();
            assert_eq!(pool.acquired(), 2);
            assert_eq!(pool.released(), 0);
        }
        assert_eq!(pool.released(), 2);
        pool.verify_balanced();
    }

    #[tokio::test]
    async fn test_mock_task_scripted_results() {
        let log: Arc<RecordingLog> = Arc::new(RecordingLog::new());
        let ctx = TaskContext::new(OrderNumber::from("order_1"), log.clone(), CancellationToken::new());

        let ok = MockTask::new("inventory");
        let failing = MockTask::new("shipping").returning(false);
        let faulting = MockTask::new("accounting").faulting("ledger offline");

        assert_eq!(ok.run(ctx.clone()).await, Ok(true));
        assert_eq!(failing.run(ctx.clone()).await, Ok(false));
        assert_eq!(faulting.run(ctx).await, Err(TaskError::Fault("ledger offline".to_string())));

        assert_eq!(ok.runs().load(Ordering::SeqCst), 1);
        assert_eq!(log.lines(), vec!["inventory: order_1", "shipping: order_1", "accounting: order_1"]);
    }
}
