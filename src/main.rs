use order_dispatch::lifecycle::{setup_tracing, OrderService, POOL_SIZE};
use order_dispatch::model::OrderOutcome;
use tracing::{error, info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!(pool_size = POOL_SIZE, "Starting order service");

    let service = OrderService::new();

    let span = tracing::info_span!("order_processing");
    let result = async {
        let start = std::time::Instant::now();
        let result = service.order("Order#1234").await;
        info!(elapsed_ms = start.elapsed().as_millis() as u64, "Order dispatched");
        result
    }
    .instrument(span)
    .await;

    service.shutdown().await;

    match result {
        Ok(OrderOutcome::Completed { .. }) => {
            info!("Order processed successfully");
            Ok(())
        }
        Ok(OrderOutcome::Rejected { task, .. }) => {
            warn!(task = %task, "Order rejected");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Order processing failed");
            Err(e.to_string())
        }
    }
}
