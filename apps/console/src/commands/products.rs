//! # Catalog Commands
//!
//! ## Shopper Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  storefront products --search phone --sort price-low --page 2           │
//! │                                                                         │
//! │  Showing 9-16 of 40 products  (sort: Price: Low to High, category: all) │
//! │      12  iPhone 9                         smartphones    $549.00  ★4.7  │
//! │      ...                                                                │
//! │  Pages: 1 [2] 3 4 ... 5                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use serde::Serialize;
use storefront_core::{Product, SortKey};
use tracing::debug;

use super::truncate;
use crate::cli::BrowseArgs;
use crate::error::ApiError;
use crate::state::{AppState, Catalog};

/// One page of the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResponse {
    /// Degraded-fetch notice, if any.
    pub banner: Option<String>,
    pub search: String,
    pub category: String,
    pub sort: SortKey,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// Pagination control, ellipses as `"..."`.
    pub page_numbers: Vec<String>,
    /// 1-based positions of the first and last product shown.
    #[serde(skip)]
    pub showing: Option<(usize, usize)>,
    pub products: Vec<Product>,
}

impl BrowseResponse {
    fn from_catalog(catalog: &Catalog) -> Self {
        let query = catalog.query();
        let view = catalog.view();
        BrowseResponse {
            banner: catalog.banner().map(str::to_string),
            search: query.search.clone(),
            category: query.category.to_string(),
            sort: query.sort,
            page: view.page,
            page_size: view.page_size,
            total_pages: view.total_pages,
            total_items: view.total_items,
            page_numbers: view.page_numbers.iter().map(|m| m.to_string()).collect(),
            showing: view.showing_range(),
            products: view.items.into_iter().cloned().collect(),
        }
    }
}

impl fmt::Display for BrowseResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(banner) = &self.banner {
            writeln!(f, "! {}", banner)?;
        }

        let Some((first, last)) = self.showing else {
            return write!(f, "No products found");
        };
        writeln!(
            f,
            "Showing {}-{} of {} products  (sort: {}, category: {})",
            first,
            last,
            self.total_items,
            self.sort.label(),
            self.category
        )?;

        for product in &self.products {
            writeln!(
                f,
                "{:>6}  {:<34} {:<16} {:>10}  ★{:.1}  {}{}",
                product.id,
                truncate(&product.name, 34),
                truncate(&product.category, 16),
                product.price.to_string(),
                product.rating,
                if product.in_stock() { "in stock" } else { "out of stock" },
                if product.featured { "  [featured]" } else { "" },
            )?;
        }

        let pages: Vec<String> = self
            .page_numbers
            .iter()
            .map(|marker| {
                if marker == &self.page.to_string() {
                    format!("[{}]", marker)
                } else {
                    marker.clone()
                }
            })
            .collect();
        write!(f, "Pages: {}", pages.join(" "))
    }
}

/// Applies the given query changes in order, then returns the current page.
/// A rejected change leaves the previous query in place.
///
/// ## Order
/// search → category → sort → page size → page. The first four reset
/// the page to 1, so `--page` is applied last.
pub async fn browse(app: &AppState, args: &BrowseArgs) -> Result<BrowseResponse, ApiError> {
    debug!(?args, "browse products");
    app.with_catalog(|catalog| -> Result<BrowseResponse, ApiError> {
        catalog.update_query(|catalog| -> Result<(), ApiError> {
            if let Some(search) = &args.search {
                catalog.set_search(search)?;
            }
            if let Some(category) = &args.category {
                catalog.set_category(category)?;
            }
            if let Some(sort) = args.sort {
                catalog.set_sort(sort);
            }
            if let Some(size) = args.page_size {
                catalog.set_page_size(size)?;
            }
            if let Some(page) = args.page {
                catalog.go_to_page(page)?;
            }
            Ok(())
        })?;
        Ok(BrowseResponse::from_catalog(catalog))
    })
    .await
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub slug: String,
    pub products: usize,
}

/// Category selector options, in first-seen order.
#[derive(Debug, Clone, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryCount>,
}

impl fmt::Display for CategoriesResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "all")?;
        let lines: Vec<String> = self
            .categories
            .iter()
            .map(|c| format!("{} ({})", c.slug, c.products))
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}

pub async fn categories(app: &AppState) -> CategoriesResponse {
    app.with_catalog(|catalog| {
        let categories = catalog
            .categories()
            .into_iter()
            .map(|slug| CategoryCount {
                slug: slug.to_string(),
                products: catalog
                    .products()
                    .iter()
                    .filter(|p| p.category == slug)
                    .count(),
            })
            .collect();
        CategoriesResponse { categories }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::testing::app;

    #[tokio::test]
    async fn test_default_page() {
        let app = app().await;
        let page = browse(&app, &BrowseArgs::default()).await.unwrap();

        assert_eq!(page.total_items, 20);
        assert_eq!(page.products.len(), 8);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.page_numbers, vec!["1", "2", "3"]);
        // featured (ids divisible by 5) first
        assert!(page.products[0].featured);
    }

    #[tokio::test]
    async fn test_state_persists_between_calls() {
        let app = app().await;
        let args = BrowseArgs {
            category: Some("laptops".to_string()),
            sort: Some(SortKey::PriceHigh),
            ..BrowseArgs::default()
        };
        browse(&app, &args).await.unwrap();

        let next = BrowseArgs {
            page: Some(2),
            ..BrowseArgs::default()
        };
        let page = browse(&app, &next).await.unwrap();
        assert_eq!(page.category, "laptops");
        assert_eq!(page.page, 2);
        assert_eq!(page.products.len(), 2);
        assert!(page.products[0].price >= page.products[1].price);
    }

    #[tokio::test]
    async fn test_out_of_range_page() {
        let app = app().await;
        let args = BrowseArgs {
            page: Some(9),
            ..BrowseArgs::default()
        };
        let err = browse(&app, &args).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("out of range"));
    }

    #[tokio::test]
    async fn test_rejected_browse_keeps_previous_query() {
        let app = app().await;
        let second = BrowseArgs {
            page: Some(2),
            ..BrowseArgs::default()
        };
        browse(&app, &second).await.unwrap();

        let rejected = BrowseArgs {
            category: Some("laptops".to_string()),
            page: Some(9),
            ..BrowseArgs::default()
        };
        assert!(browse(&app, &rejected).await.is_err());

        let page = browse(&app, &BrowseArgs::default()).await.unwrap();
        assert_eq!((page.category.as_str(), page.page), ("all", 2));
        assert_eq!(page.total_items, 20);
    }

    #[tokio::test]
    async fn test_display_lists_range_and_pages() {
        let app = app().await;
        let args = BrowseArgs {
            page: Some(2),
            ..BrowseArgs::default()
        };
        let text = browse(&app, &args).await.unwrap().to_string();
        assert!(text.starts_with("Showing 9-16 of 20 products"));
        assert!(text.ends_with("Pages: 1 [2] 3"));
    }

    #[tokio::test]
    async fn test_categories() {
        let app = app().await;
        let response = categories(&app).await;
        let slugs: Vec<&str> = response.categories.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["smartphones", "laptops"]);
        assert!(response.categories.iter().all(|c| c.products == 10));
    }
}
