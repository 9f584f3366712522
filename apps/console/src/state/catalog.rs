//! # Catalog State
//!
//! The fetched product list and the shopper's current query.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  Catalog                                                         │
//! │                                                                  │
//! │  products ◄── CatalogService::fetch_products (once per process)  │
//! │  banner   ◄── degraded fetch message, if any                     │
//! │  query    ◄── set_search / set_category / set_sort /             │
//! │               set_page_size   (each resets page to 1)            │
//! │               go_to_page      (must stay in 1..=total_pages)     │
//! │               update_query    (all of the above, or none)        │
//! │                                                                  │
//! │  view() ──► storefront_core::catalog::view(products, query)      │
//! └──────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::catalog::{self, CatalogQuery, CatalogView, CategoryFilter};
use storefront_core::validation::{validate_page_size, validate_search_query};
use storefront_core::{CoreError, CoreResult, Product, SortKey, ValidationError};
use storefront_remote::{CatalogLoad, CatalogService};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Catalog contents plus the derived-view inputs.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    banner: Option<String>,
    query: CatalogQuery,
}

impl Catalog {
    pub fn new(load: CatalogLoad, page_size: usize) -> Self {
        let query = CatalogQuery {
            page_size,
            ..CatalogQuery::default()
        };
        Catalog {
            products: load.products,
            banner: load.banner,
            query,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Message shown above the grid after a degraded fetch.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn find(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn categories(&self) -> Vec<&str> {
        catalog::categories(&self.products)
    }

    pub fn set_search(&mut self, raw: &str) -> Result<(), ValidationError> {
        self.query.search = validate_search_query(raw)?;
        self.query.page = 1;
        Ok(())
    }

    /// `all` (or blank) clears the filter; anything else must be a known slug.
    pub fn set_category(&mut self, raw: &str) -> Result<(), ValidationError> {
        let filter = CategoryFilter::from(raw);
        if let CategoryFilter::Only(slug) = &filter {
            let known = self.categories();
            if !known.contains(&slug.as_str()) {
                return Err(ValidationError::not_allowed("category", known));
            }
        }
        self.query.category = filter;
        self.query.page = 1;
        Ok(())
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.query.sort = sort;
        self.query.page = 1;
    }

    pub fn set_page_size(&mut self, size: usize) -> Result<(), ValidationError> {
        self.query.page_size = validate_page_size(size)?;
        self.query.page = 1;
        Ok(())
    }

    /// Moves to `page`. Out-of-range requests leave the current page alone.
    ///
    /// Page 1 is always reachable, even when nothing matches.
    pub fn go_to_page(&mut self, page: usize) -> CoreResult<()> {
        let total = self.view().total_pages;
        if page != 1 && (page == 0 || page > total) {
            return Err(CoreError::PageOutOfRange { page, total });
        }
        self.query.page = page;
        Ok(())
    }

    /// Applies several query changes as one step: when `f` fails the
    /// query is restored to what it was before.
    pub fn update_query<E, F>(&mut self, f: F) -> Result<(), E>
    where
        F: FnOnce(&mut Self) -> Result<(), E>,
    {
        let previous = self.query.clone();
        let result = f(self);
        if result.is_err() {
            debug!(query = ?previous, "Query change rejected, restoring");
            self.query = previous;
        }
        result
    }

    pub fn view(&self) -> CatalogView<'_> {
        catalog::view(&self.products, &self.query)
    }
}

/// Catalog shared by every command; fetched lazily on first use.
#[derive(Debug, Default)]
pub struct CatalogState {
    catalog: Mutex<Option<Catalog>>,
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against the catalog, fetching it first if needed.
    ///
    /// The fetch never fails: a degraded load still yields products.
    pub async fn with_catalog<F, R>(
        &self,
        service: &dyn CatalogService,
        page_size: usize,
        f: F,
    ) -> R
    where
        F: FnOnce(&mut Catalog) -> R,
    {
        let mut guard = self.catalog.lock().await;
        if guard.is_none() {
            let load = service.fetch_products().await;
            info!(
                products = load.products.len(),
                degraded = load.is_degraded(),
                "Catalog loaded"
            );
            *guard = Some(Catalog::new(load, page_size));
        }

        let catalog = guard.get_or_insert_with(Catalog::default);
        debug!(query = ?catalog.query, "Catalog query");
        f(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::testing::{product, FixedCatalog};

    fn catalog() -> Catalog {
        let products = (1..=20)
            .map(|i| product(i, if i % 2 == 0 { "laptops" } else { "smartphones" }))
            .collect();
        Catalog::new(
            CatalogLoad {
                products,
                failures: Vec::new(),
                banner: None,
            },
            8,
        )
    }

    #[test]
    fn test_query_changes_reset_page() {
        let mut catalog = catalog();
        catalog.go_to_page(3).unwrap();
        assert_eq!(catalog.query().page, 3);

        catalog.set_sort(SortKey::PriceHigh);
        assert_eq!(catalog.query().page, 1);

        catalog.go_to_page(2).unwrap();
        catalog.set_category("laptops").unwrap();
        assert_eq!(catalog.query().page, 1);
        assert_eq!(catalog.view().total_items, 10);

        catalog.go_to_page(2).unwrap();
        catalog.set_search("  product  ").unwrap();
        assert_eq!(catalog.query().search, "product");
        assert_eq!(catalog.query().page, 1);

        catalog.go_to_page(2).unwrap();
        catalog.set_page_size(4).unwrap();
        assert_eq!(catalog.query().page, 1);
        assert_eq!(catalog.view().total_pages, 3);
    }

    #[test]
    fn test_out_of_range_page_is_rejected() {
        let mut catalog = catalog();
        catalog.go_to_page(2).unwrap();

        let err = catalog.go_to_page(4).unwrap_err();
        assert!(matches!(err, CoreError::PageOutOfRange { page: 4, total: 3 }));
        assert!(catalog.go_to_page(0).is_err());
        assert_eq!(catalog.query().page, 2);
    }

    #[test]
    fn test_unknown_category_and_bad_page_size() {
        let mut catalog = catalog();
        assert!(catalog.set_category("groceries").is_err());
        assert!(catalog.set_page_size(10).is_err());
        assert_eq!(catalog.query().category, CategoryFilter::All);
        assert_eq!(catalog.query().page_size, 8);

        catalog.set_category("laptops").unwrap();
        catalog.set_category("all").unwrap();
        assert_eq!(catalog.query().category, CategoryFilter::All);
    }

    #[test]
    fn test_empty_result_keeps_page_one() {
        let mut catalog = catalog();
        catalog.set_search("nothing matches this").unwrap();
        assert_eq!(catalog.view().total_pages, 0);
        assert!(catalog.go_to_page(1).is_ok());
        assert!(catalog.go_to_page(2).is_err());
    }

    #[test]
    fn test_rejected_update_restores_query() {
        let mut catalog = catalog();
        catalog.go_to_page(2).unwrap();

        let result = catalog.update_query(|c| -> CoreResult<()> {
            c.set_search("product")?;
            c.set_category("laptops")?;
            c.go_to_page(9)
        });
        assert!(matches!(result, Err(CoreError::PageOutOfRange { page: 9, .. })));
        assert_eq!(catalog.query().search, "");
        assert_eq!(catalog.query().category, CategoryFilter::All);
        assert_eq!(catalog.query().page, 2);

        catalog
            .update_query(|c| -> CoreResult<()> {
                c.set_category("laptops")?;
                c.go_to_page(2)
            })
            .unwrap();
        assert_eq!(catalog.query().page, 2);
        assert_eq!(catalog.view().total_items, 10);
    }

    #[tokio::test]
    async fn test_fetches_once() {
        let service = FixedCatalog::new(vec![product(1, "laptops")]);
        let state = CatalogState::new();

        let count = state.with_catalog(&service, 8, |c| c.products().len()).await;
        assert_eq!(count, 1);
        state.with_catalog(&service, 8, |c| c.set_sort(SortKey::Title)).await;

        assert_eq!(service.fetches(), 1);
        let sort = state.with_catalog(&service, 8, |c| c.query().sort).await;
        assert_eq!(sort, SortKey::Title);
    }
}
