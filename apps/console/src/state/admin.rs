//! # Admin Dashboard State
//!
//! The three admin tables, loaded together on first admin command.
//!
//! ```text
//! AdminDataService ──try_join──► inventory, orders, users
//!                                    │
//!                                    ▼
//!                ┌──────────────────────────────────────────┐
//!                │ Dashboard                                │
//!                │   products: TableView<Product>           │
//!                │   orders:   TableView<Order>             │
//!                │   users:    TableView<User>              │
//!                │                                          │
//!                │   stats() / user_stats() recomputed on   │
//!                │   every call, never cached               │
//!                └──────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use storefront_core::stats::{DashboardStats, UserStats};
use storefront_core::table::TableView;
use storefront_core::validation::ProductForm;
use storefront_core::{CoreError, CoreResult, FormErrors, Order, OrderStatus, Product, User};
use storefront_remote::{AdminDataService, RemoteResult};
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub products: TableView<Product>,
    pub orders: TableView<Order>,
    pub users: TableView<User>,
}

impl Dashboard {
    pub fn new(products: Vec<Product>, orders: Vec<Order>, users: Vec<User>) -> Self {
        Dashboard {
            products: TableView::new(products),
            orders: TableView::new(orders),
            users: TableView::new(users),
        }
    }

    pub async fn load(service: &dyn AdminDataService) -> RemoteResult<Self> {
        let (products, orders, users) = tokio::try_join!(
            service.list_inventory(),
            service.list_orders(),
            service.list_users()
        )?;
        info!(
            products = products.len(),
            orders = orders.len(),
            users = users.len(),
            "Admin data loaded"
        );
        Ok(Dashboard::new(products, orders, users))
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::compute(self.products.rows(), self.users.rows(), self.orders.rows())
    }

    /// Summary cards over every user, regardless of the table filters.
    pub fn user_stats(&self) -> UserStats {
        UserStats::compute(self.users.rows())
    }

    /// One past the highest product id in the table.
    pub fn next_product_id(&self) -> u64 {
        self.products.rows().iter().map(|p| p.id).max().unwrap_or(0) + 1
    }

    pub fn product(&self, id: u64) -> CoreResult<&Product> {
        self.products.get(&id).ok_or(CoreError::ProductNotFound(id))
    }

    /// Validates the form and inserts (new) or replaces (edit) the product.
    pub fn save_product(
        &mut self,
        form: &ProductForm,
        now: DateTime<Utc>,
    ) -> Result<Product, FormErrors> {
        let product = form.submit(self.next_product_id(), now)?;
        debug!(
            product_id = product.id,
            editing = form.is_editing(),
            "Saving product"
        );
        self.products.upsert(product.clone());
        Ok(product)
    }

    pub fn set_order_status(&mut self, id: u64, status: OrderStatus) -> CoreResult<()> {
        if !self.orders.update(&id, |order| order.status = status) {
            return Err(CoreError::OrderNotFound(id));
        }
        info!(order_id = id, %status, "Order status updated");
        Ok(())
    }
}

/// Dashboard shared by admin commands; `None` until first loaded.
#[derive(Debug, Default)]
pub struct AdminState {
    dashboard: Mutex<Option<Dashboard>>,
}

impl AdminState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against the dashboard, loading it first if needed.
    pub async fn with_dashboard<F, R>(
        &self,
        service: &dyn AdminDataService,
        f: F,
    ) -> RemoteResult<R>
    where
        F: FnOnce(&mut Dashboard) -> R,
    {
        let mut guard = self.dashboard.lock().await;
        if guard.is_none() {
            *guard = Some(Dashboard::load(service).await?);
        }
        let dashboard =
            guard.get_or_insert_with(|| Dashboard::new(Vec::new(), Vec::new(), Vec::new()));
        Ok(f(dashboard))
    }
}
