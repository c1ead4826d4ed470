//! Recurring background jobs. Call `spawn_all` once during startup.

use crate::config::OrdersConfig;
use crate::services::OrderService;

/// Detaches every background task via `tokio::spawn`; does not block.
pub fn spawn_all(order_service: OrderService, orders: OrdersConfig) {
    // unpaid online orders
    {
        let svc = order_service.clone();
        let interval = std::time::Duration::from_secs(orders.expiry_check_interval_secs);
        tokio::spawn(async move {
            loop {
                match svc.expire_unpaid_orders().await {
                    Ok(n) if n > 0 => log::info!("Expired unpaid orders: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to expire unpaid orders: {e:?}"),
                }
                tokio::time::sleep(interval).await;
            }
        });
    }
}
