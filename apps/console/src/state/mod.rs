//! # State Module
//!
//! Application state for the console, one type per concern.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      AppState                                   │   │
//! │  │  built once by lib::bootstrap, borrowed by every command        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │     ┌──────────────┬─────────┴────┬───────────────┬──────────────┐      │
//! │     ▼              ▼              ▼               ▼              ▼      │
//! │ ┌──────────┐ ┌────────────┐ ┌────────────┐ ┌────────────┐ ┌──────────┐ │
//! │ │  Config  │ │SessionState│ │CatalogState│ │ AdminState │ │ Services │ │
//! │ │ TOML+env │ │ identity + │ │ products + │ │ 3 tables   │ │ catalog  │ │
//! │ │          │ │ cart       │ │ query      │ │ (lazy)     │ │ auth     │ │
//! │ │          │ │ (persisted)│ │ (lazy)     │ │            │ │ admin    │ │
//! │ └──────────┘ └────────────┘ └────────────┘ └────────────┘ └──────────┘ │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • ConfigState, Services: read-only after startup                      │
//! │  • Session, Catalog, Admin: tokio::sync::Mutex, no poisoning           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod admin;
mod catalog;
mod config;
mod session;

pub use admin::{AdminState, Dashboard};
pub use catalog::{Catalog, CatalogState};
pub use config::ConfigState;
pub use session::{SessionState, SharedStore};

use storefront_remote::{AdminDataService, AuthService, CatalogService};

/// Backend boundaries, boxed so tests can swap in fakes.
pub struct Services {
    pub catalog: Box<dyn CatalogService>,
    pub auth: Box<dyn AuthService>,
    pub admin_data: Box<dyn AdminDataService>,
}

pub struct AppState {
    pub config: ConfigState,
    pub session: SessionState,
    pub catalog: CatalogState,
    pub admin: AdminState,
    pub services: Services,
}

impl AppState {
    pub fn new(config: ConfigState, session: SessionState, services: Services) -> Self {
        AppState {
            config,
            session,
            catalog: CatalogState::new(),
            admin: AdminState::new(),
            services,
        }
    }

    /// Runs `f` against the lazily fetched catalog.
    pub async fn with_catalog<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Catalog) -> R,
    {
        self.catalog
            .with_catalog(
                self.services.catalog.as_ref(),
                self.config.config.catalog.page_size,
                f,
            )
            .await
    }

    /// Runs `f` against the lazily loaded admin dashboard.
    pub async fn with_dashboard<F, R>(&self, f: F) -> storefront_remote::RemoteResult<R>
    where
        F: FnOnce(&mut Dashboard) -> R,
    {
        self.admin
            .with_dashboard(self.services.admin_data.as_ref(), f)
            .await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fakes shared by the state and command tests.

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use storefront_core::{Identity, Money, Product, Role};
    use storefront_db::MemoryStore;
    use storefront_remote::config::{AuthSettings, StorefrontConfig};
    use storefront_remote::{CatalogLoad, MockAdminData, MockAuthService};

    use super::*;

    pub fn product(id: u64, category: &str) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            description: format!("Description of product {}", id),
            price: Money::from_cents(1_000 + id as i64 * 100),
            stock: 5,
            category: category.to_string(),
            brand: Some("Generic".to_string()),
            image: format!("https://example.com/{}.png", id),
            rating: 4.0,
            featured: id % 5 == 0,
            specs: None,
            sku: None,
            created_at: None,
        }
    }

    /// Serves a fixed product list and counts fetches.
    pub struct FixedCatalog {
        products: Vec<Product>,
        fetches: AtomicUsize,
    }

    impl FixedCatalog {
        pub fn new(products: Vec<Product>) -> Self {
            FixedCatalog {
                products,
                fetches: AtomicUsize::new(0),
            }
        }

        pub fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogService for FixedCatalog {
        async fn fetch_products(&self) -> CatalogLoad {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            CatalogLoad {
                products: self.products.clone(),
                failures: Vec::new(),
                banner: None,
            }
        }
    }

    pub const ADMIN_EMAIL: &str = "admin@example.com";
    pub const ADMIN_PASSWORD: &str = "secret";

    /// App state over an in-memory session, 20 catalog products (ids 1..=20,
    /// alternating smartphones / laptops), demo admin data and instant auth.
    pub async fn app() -> AppState {
        let mut config = StorefrontConfig::default();
        config.auth = AuthSettings {
            admin_email: Some(ADMIN_EMAIL.to_string()),
            admin_password: Some(ADMIN_PASSWORD.to_string()),
            latency_ms: 0,
            ..AuthSettings::default()
        };

        let products = (1..=20)
            .map(|i| product(i, if i % 2 == 0 { "laptops" } else { "smartphones" }))
            .collect();
        let services = Services {
            catalog: Box::new(FixedCatalog::new(products)),
            auth: Box::new(MockAuthService::new(config.auth.clone())),
            admin_data: Box::new(MockAdminData),
        };

        let session = SessionState::open(Box::new(MemoryStore::new()))
            .await
            .unwrap();
        AppState::new(ConfigState::from(config), session, services)
    }

    pub fn identity(role: Role) -> Identity {
        Identity {
            id: 7,
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role,
        }
    }

    /// `app()` with `role` already signed in.
    pub async fn app_as(role: Role) -> AppState {
        let app = app().await;
        app.session.lock().await.login(identity(role)).await.unwrap();
        app
    }
}
