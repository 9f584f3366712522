//! # Admin Data Service
//!
//! Where the admin dashboard gets its initial collections. The dashboard
//! owns and mutates its copies afterwards; nothing is written back.

use async_trait::async_trait;
use storefront_core::{Order, Product, User};
use tracing::debug;

use crate::error::RemoteResult;
use crate::fixtures;

#[async_trait]
pub trait AdminDataService: Send + Sync {
    async fn list_orders(&self) -> RemoteResult<Vec<Order>>;

    async fn list_users(&self) -> RemoteResult<Vec<User>>;

    /// Products managed from the dashboard (separate from the shop catalog).
    async fn list_inventory(&self) -> RemoteResult<Vec<Product>>;
}

/// [`AdminDataService`] serving the bundled demo data.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAdminData;

#[async_trait]
impl AdminDataService for MockAdminData {
    async fn list_orders(&self) -> RemoteResult<Vec<Order>> {
        let orders = fixtures::dashboard_orders();
        debug!(count = orders.len(), "Listing demo orders");
        Ok(orders)
    }

    async fn list_users(&self) -> RemoteResult<Vec<User>> {
        let users = fixtures::demo_users();
        debug!(count = users.len(), "Listing demo users");
        Ok(users)
    }

    async fn list_inventory(&self) -> RemoteResult<Vec<Product>> {
        let products = fixtures::dashboard_products();
        debug!(count = products.len(), "Listing demo inventory");
        Ok(products)
    }
}
