use std::sync::Arc;
use std::time::Duration;

use order_dispatch::framework::mock::{RecordingLog, TrackingPool};
use order_dispatch::framework::{DispatchError, WorkerPool, ALL_SUCCEEDED_MESSAGE};
use order_dispatch::lifecycle::{OrderService, POOL_SIZE};
use order_dispatch::model::OrderOutcome;
use order_dispatch::order_tasks::{self, ACCOUNTING, INVENTORY, SHIPPING, TASK_LATENCY};
use tokio::time::Instant;

fn tracked_service(capacity: usize) -> (OrderService<TrackingPool>, Arc<TrackingPool>, Arc<RecordingLog>) {
    let pool = Arc::new(TrackingPool::new(capacity));
    let log = Arc::new(RecordingLog::new());
    let tasks = order_tasks::new();
    let service = OrderService::with_parts(pool.clone(), log.clone(), tasks);
    (service, pool, log)
}

/// `order("Order#1234")`: three step lines in any order plus the aggregate
/// line, in roughly the time of one step.
#[tokio::test(start_paused = true)]
async fn test_order_1234_scenario() {
    let (service, pool, log) = tracked_service(POOL_SIZE);

    let start = Instant::now();
    let outcome = service.order("Order#1234").await.expect("order failed");
    let elapsed = start.elapsed();

    assert!(outcome.is_completed());
    let names: Vec<_> = outcome.reports().iter().map(|r| r.task.as_str()).collect();
    assert_eq!(names, vec![INVENTORY, SHIPPING, ACCOUNTING]);

    let lines = log.lines();
    assert_eq!(lines.len(), 4);
    assert_eq!(log.count("Inventory update: Order#1234"), 1);
    assert_eq!(log.count("Shipping system notification: Order#1234"), 1);
    assert_eq!(log.count("Accounting system update: Order#1234"), 1);
    assert_eq!(lines.last().map(String::as_str), Some(ALL_SUCCEEDED_MESSAGE));

    assert!(elapsed >= Duration::from_millis(1000));
    assert!(elapsed < Duration::from_millis(2000), "steps were serialised: {elapsed:?}");

    pool.verify_balanced();
}

/// The default service always runs every step with its fixed latency on a
/// pool larger than the task list.
#[tokio::test(start_paused = true)]
async fn test_default_service_is_fixed() {
    let service = OrderService::new();
    assert_eq!(service.pool().capacity(), POOL_SIZE);
    assert!(service.pool().capacity() > service.tasks().len());

    let start = Instant::now();
    let outcome = service.order("Order#1").await.unwrap();
    let elapsed = start.elapsed();

    assert!(outcome.is_completed());
    assert!(elapsed >= TASK_LATENCY, "steps skipped their latency: {elapsed:?}");
    assert!(elapsed < TASK_LATENCY * 2, "steps were serialised: {elapsed:?}");

    service.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_service_reuses_pool() {
    let service = OrderService::new();

    for n in 0..3 {
        let outcome = service.order(format!("Order#{n}")).await.unwrap();
        assert!(matches!(outcome, OrderOutcome::Completed { .. }));
        assert_eq!(service.pool().open_scopes(), 0);
    }
    assert_eq!(service.tasks().len(), 3);

    service.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_interrupts_in_flight_order() {
    let service = Arc::new(OrderService::new());
    let pool = service.pool().clone();

    let in_flight = {
        let service = service.clone();
        tokio::spawn(async move { service.order("Order#1234").await })
    };

    tokio::time::sleep(Duration::from_millis(500)).await;
    pool.shutdown();

    let result = in_flight.await.expect("order task panicked");
    assert_eq!(result, Err(DispatchError::Interrupted));

    pool.drained().await;
    assert_eq!(pool.open_scopes(), 0);

    let after = service.order("Order#5678").await;
    assert_eq!(after, Err(DispatchError::Interrupted));
}
