//! # Catalog Service
//!
//! Assembles the storefront catalog from the product feed.
//!
//! ## Fetch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  fetch_products()                                                       │
//! │                                                                         │
//! │   ┌──────────────┐ ┌──────────┐ ┌─────────────────┐ ┌──────────┐        │
//! │   │ smartphones  │ │ laptops  │ │ home-decoration │ │ skincare │  ...   │
//! │   └──────┬───────┘ └────┬─────┘ └───────┬─────────┘ └────┬─────┘        │
//! │          │              │   general?limit=30             │              │
//! │          │              │        ┌──────┴──────┐         │              │
//! │          ▼              ▼        ▼             ▼         ▼              │
//! │   ══════════════ join_all (concurrent) ═════════════════════            │
//! │          │                                                              │
//! │          ├── failed source ──► warn!, recorded, contributes nothing     │
//! │          ▼                                                              │
//! │   normalize (ids, categories, images, stock, rating, featured)          │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   + exclusive products ──► dedupe ids ──► cap at max_products           │
//! │                                                                         │
//! │   every source failed ──► fallback sample catalog + banner              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;
use std::fmt;

use async_trait::async_trait;
use futures_util::future::{join, join_all};
use reqwest::Client;
use serde::Deserialize;
use storefront_core::{Money, Product, DEFAULT_RATING, FEATURED_RATING_THRESHOLD};
use tracing::{debug, info, warn};

use crate::config::{ApiSettings, CatalogSettings};
use crate::error::{RemoteError, RemoteResult};
use crate::fixtures;

/// Shown when the sample catalog replaced the feed.
pub const FALLBACK_BANNER: &str = "Failed to load products. Using sample data instead.";

/// Added to general-feed identifiers so they never collide with seeded ones.
pub const GENERAL_ID_OFFSET: u64 = 1000;

// =============================================================================
// Feed Records
// =============================================================================

/// A product as the DummyJSON feed returns it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedProduct {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub brand: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeedPage {
    products: Vec<FeedProduct>,
}

// =============================================================================
// Feed Trait + HTTP Implementation
// =============================================================================

/// Source of raw feed products.
#[async_trait]
pub trait ProductFeed: Send + Sync {
    /// Every product of one category.
    async fn category(&self, slug: &str) -> RemoteResult<Vec<FeedProduct>>;

    /// The first `limit` products across all categories.
    async fn general(&self, limit: usize) -> RemoteResult<Vec<FeedProduct>>;
}

/// [`ProductFeed`] over the DummyJSON HTTP API.
#[derive(Debug, Clone)]
pub struct DummyJsonFeed {
    client: Client,
    base_url: String,
}

impl DummyJsonFeed {
    pub fn new(settings: &ApiSettings) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .map_err(|e| RemoteError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    async fn get_page(&self, path: &str) -> RemoteResult<Vec<FeedProduct>> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), path);
        debug!(url = %url, "Fetching product feed");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(RemoteError::BadStatus {
                status: status.as_u16(),
                url,
            });
        }

        let page: FeedPage = response.json().await?;
        Ok(page.products)
    }
}

#[async_trait]
impl ProductFeed for DummyJsonFeed {
    async fn category(&self, slug: &str) -> RemoteResult<Vec<FeedProduct>> {
        self.get_page(&format!("products/category/{}", slug)).await
    }

    async fn general(&self, limit: usize) -> RemoteResult<Vec<FeedProduct>> {
        self.get_page(&format!("products?limit={}", limit)).await
    }
}

// =============================================================================
// Load Result
// =============================================================================

/// One request of the fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Category(String),
    General,
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Category(slug) => f.write_str(slug),
            FeedSource::General => f.write_str("general"),
        }
    }
}

/// A source that contributed nothing, and why.
#[derive(Debug, Clone)]
pub struct SourceFailure {
    pub source: FeedSource,
    pub reason: String,
}

/// The assembled catalog plus what went wrong getting it.
#[derive(Debug, Clone)]
pub struct CatalogLoad {
    pub products: Vec<Product>,
    pub failures: Vec<SourceFailure>,
    /// Single non-blocking message for the shopper, if any source failed.
    pub banner: Option<String>,
}

impl CatalogLoad {
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty()
    }
}

// =============================================================================
// Catalog Service
// =============================================================================

/// Anything that can produce the storefront catalog.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Never fails: broken sources degrade, and a fully broken feed yields the
    /// sample catalog.
    async fn fetch_products(&self) -> CatalogLoad;
}

/// Catalog assembled from a [`ProductFeed`].
#[derive(Debug, Clone)]
pub struct RemoteCatalog<F> {
    feed: F,
    settings: CatalogSettings,
}

impl<F: ProductFeed> RemoteCatalog<F> {
    pub fn new(feed: F, settings: CatalogSettings) -> Self {
        Self { feed, settings }
    }
}

impl RemoteCatalog<DummyJsonFeed> {
    /// Catalog backed by the HTTP feed at `api.base_url`.
    pub fn dummy_json(api: &ApiSettings, settings: CatalogSettings) -> RemoteResult<Self> {
        Ok(Self::new(DummyJsonFeed::new(api)?, settings))
    }
}

#[async_trait]
impl<F: ProductFeed> CatalogService for RemoteCatalog<F> {
    async fn fetch_products(&self) -> CatalogLoad {
        let seeded = &self.settings.seeded_categories;
        info!(categories = seeded.len(), "Fetching catalog");

        let category_requests = seeded.iter().map(|slug| async move {
            (FeedSource::Category(slug.clone()), self.feed.category(slug).await)
        });
        let general_request = async {
            (
                FeedSource::General,
                self.feed.general(self.settings.general_limit).await,
            )
        };

        let (category_results, general_result) =
            join(join_all(category_requests), general_request).await;

        let mut failures = Vec::new();
        let mut products = Vec::new();
        let total_sources = category_results.len() + 1;

        for (source, result) in category_results.into_iter().chain(Some(general_result)) {
            let items = match result {
                Ok(items) => items,
                Err(err) => {
                    warn!(source = %source, error = %err, "Product source failed, skipping");
                    failures.push(SourceFailure {
                        source,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            debug!(source = %source, count = items.len(), "Product source loaded");
            match source {
                FeedSource::Category(_) => {
                    products.extend(items.iter().map(|p| normalize(p, 0)));
                }
                FeedSource::General => {
                    products.extend(
                        items
                            .iter()
                            .filter(|p| !seeded.contains(&normalize_category(&p.category)))
                            .map(|p| normalize(p, GENERAL_ID_OFFSET)),
                    );
                }
            }
        }

        if failures.len() == total_sources {
            warn!("Every product source failed, using sample catalog");
            return CatalogLoad {
                products: fixtures::fallback_products(),
                failures,
                banner: Some(FALLBACK_BANNER.to_string()),
            };
        }

        products.extend(fixtures::exclusive_products());

        let mut seen = HashSet::new();
        products.retain(|p| seen.insert(p.id));
        products.truncate(self.settings.max_products);

        let banner = partial_banner(&failures);
        info!(
            products = products.len(),
            failed_sources = failures.len(),
            "Catalog assembled"
        );

        CatalogLoad {
            products,
            failures,
            banner,
        }
    }
}

fn partial_banner(failures: &[SourceFailure]) -> Option<String> {
    if failures.is_empty() {
        return None;
    }
    let names: Vec<String> = failures.iter().map(|f| f.source.to_string()).collect();
    Some(format!(
        "Some products could not be loaded ({}).",
        names.join(", ")
    ))
}

// =============================================================================
// Normalization
// =============================================================================

/// Lowercases and turns each whitespace run into a single `-`.
pub fn normalize_category(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(c.to_lowercase());
            in_space = false;
        }
    }
    slug
}

/// Maps a feed record onto a catalog product.
///
/// Missing stock reads as 0 and a missing or zero rating as the default
/// rating. `featured` follows the feed's own rating.
pub fn normalize(raw: &FeedProduct, id_offset: u64) -> Product {
    let id = raw.id.saturating_add(id_offset);

    let image = raw
        .thumbnail
        .as_deref()
        .filter(|t| !t.is_empty())
        .or_else(|| raw.images.first().map(String::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("https://picsum.photos/400/400?random={}", raw.id));

    let stock = raw
        .stock
        .filter(|s| *s > 0)
        .map(|s| u32::try_from(s).unwrap_or(u32::MAX))
        .unwrap_or(0);

    let feed_rating = raw.rating.filter(|r| r.is_finite() && *r > 0.0);

    Product {
        id,
        name: raw.title.clone(),
        description: raw.description.clone(),
        price: Money::from_f64(raw.price).unwrap_or_default(),
        stock,
        category: normalize_category(&raw.category),
        brand: raw.brand.clone().filter(|b| !b.is_empty()),
        image,
        rating: feed_rating.map_or(DEFAULT_RATING, |r| r.min(5.0)),
        featured: feed_rating.is_some_and(|r| r >= FEATURED_RATING_THRESHOLD),
        specs: None,
        sku: None,
        created_at: None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory feed; categories missing from the map fail.
    #[derive(Default)]
    struct FakeFeed {
        categories: HashMap<String, Vec<FeedProduct>>,
        general: Option<Vec<FeedProduct>>,
    }

    impl FakeFeed {
        fn with_category(mut self, slug: &str, items: Vec<FeedProduct>) -> Self {
            self.categories.insert(slug.to_string(), items);
            self
        }

        fn with_general(mut self, items: Vec<FeedProduct>) -> Self {
            self.general = Some(items);
            self
        }
    }

    #[async_trait]
    impl ProductFeed for FakeFeed {
        async fn category(&self, slug: &str) -> RemoteResult<Vec<FeedProduct>> {
            self.categories
                .get(slug)
                .cloned()
                .ok_or_else(|| RemoteError::BadStatus {
                    status: 404,
                    url: format!("fake/products/category/{}", slug),
                })
        }

        async fn general(&self, limit: usize) -> RemoteResult<Vec<FeedProduct>> {
            match &self.general {
                Some(items) => Ok(items.iter().take(limit).cloned().collect()),
                None => Err(RemoteError::RequestFailed("connection refused".into())),
            }
        }
    }

    fn feed_product(id: u64, category: &str) -> FeedProduct {
        FeedProduct {
            id,
            title: format!("Item {}", id),
            description: "from the feed".to_string(),
            price: 19.99,
            category: category.to_string(),
            thumbnail: Some(format!("https://cdn.example.com/{}.png", id)),
            images: vec![],
            stock: Some(10),
            rating: Some(4.2),
            brand: Some("Acme".to_string()),
        }
    }

    fn full_feed() -> FakeFeed {
        FakeFeed::default()
            .with_category(
                "smartphones",
                vec![feed_product(1, "smartphones"), feed_product(2, "smartphones")],
            )
            .with_category("laptops", vec![feed_product(3, "laptops")])
            .with_category("home-decoration", vec![feed_product(4, "home-decoration")])
            .with_category("skincare", vec![feed_product(5, "skincare")])
            .with_general(vec![
                feed_product(1, "smartphones"),
                feed_product(6, "Mens Shirts"),
                feed_product(7, "home decoration"),
            ])
    }

    #[tokio::test]
    async fn test_full_feed() {
        let catalog = RemoteCatalog::new(full_feed(), CatalogSettings::default());
        let load = catalog.fetch_products().await;

        assert!(!load.is_degraded());
        assert!(load.banner.is_none());

        let ids: Vec<u64> = load.products.iter().map(|p| p.id).collect();
        // general items in seeded categories are dropped, the rest offset
        assert_eq!(&ids[..6], &[1, 2, 3, 4, 5, 1006]);
        assert_eq!(load.products[5].category, "mens-shirts");
        // exclusives follow
        assert_eq!(ids.len(), 6 + 8);
        assert_eq!(ids[6], 2001);
    }

    #[tokio::test]
    async fn test_one_failed_category_keeps_the_others() {
        let mut feed = full_feed();
        feed.categories.remove("laptops");

        let catalog = RemoteCatalog::new(feed, CatalogSettings::default());
        let load = catalog.fetch_products().await;

        assert_eq!(load.failures.len(), 1);
        assert_eq!(load.failures[0].source, FeedSource::Category("laptops".into()));
        assert!(load.banner.as_deref().unwrap().contains("laptops"));

        let from_feed: Vec<&Product> = load.products.iter().filter(|p| p.id < 2000).collect();
        let categories: HashSet<&str> = from_feed.iter().map(|p| p.category.as_str()).collect();
        assert!(categories.contains("smartphones"));
        assert!(categories.contains("home-decoration"));
        assert!(categories.contains("skincare"));
        assert!(!categories.contains("laptops"));
    }

    #[tokio::test]
    async fn test_every_source_failed_uses_sample_catalog() {
        let catalog = RemoteCatalog::new(FakeFeed::default(), CatalogSettings::default());
        let load = catalog.fetch_products().await;

        assert_eq!(load.failures.len(), 5);
        assert_eq!(load.banner.as_deref(), Some(FALLBACK_BANNER));
        assert_eq!(load.products, fixtures::fallback_products());
    }

    #[tokio::test]
    async fn test_general_failure_alone_still_degrades() {
        let mut feed = full_feed();
        feed.general = None;

        let load = RemoteCatalog::new(feed, CatalogSettings::default())
            .fetch_products()
            .await;
        assert_eq!(load.failures[0].source, FeedSource::General);
        assert_eq!(load.products.len(), 5 + 8);
    }

    #[tokio::test]
    async fn test_cap_and_unique_ids() {
        let many: Vec<FeedProduct> = (1..=150).map(|id| feed_product(id, "smartphones")).collect();
        let feed = full_feed().with_category("smartphones", many);
        let settings = CatalogSettings {
            max_products: 100,
            ..CatalogSettings::default()
        };

        let load = RemoteCatalog::new(feed, settings).fetch_products().await;
        assert_eq!(load.products.len(), 100);

        let ids: HashSet<u64> = load.products.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 100);
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category("home decoration"), "home-decoration");
        assert_eq!(normalize_category("Mens  Shirts"), "mens-shirts");
        assert_eq!(normalize_category("skincare"), "skincare");
    }

    #[test]
    fn test_normalize_defaults() {
        let raw = FeedProduct {
            id: 9,
            title: "Bare".to_string(),
            price: 5.0,
            category: "Groceries".to_string(),
            images: vec!["https://cdn.example.com/first.png".to_string()],
            ..FeedProduct::default()
        };

        let product = normalize(&raw, GENERAL_ID_OFFSET);
        assert_eq!(product.id, 1009);
        assert_eq!(product.category, "groceries");
        assert_eq!(product.image, "https://cdn.example.com/first.png");
        assert_eq!(product.stock, 0);
        assert_eq!(product.rating, DEFAULT_RATING);
        assert!(!product.featured);
        assert_eq!(product.price.cents(), 500);

        let no_images = FeedProduct { images: vec![], ..raw };
        assert_eq!(
            normalize(&no_images, 0).image,
            "https://picsum.photos/400/400?random=9"
        );
    }

    #[test]
    fn test_normalize_featured_from_rating() {
        let mut raw = feed_product(1, "laptops");
        raw.rating = Some(4.5);
        assert!(normalize(&raw, 0).featured);

        raw.rating = Some(4.49);
        assert!(!normalize(&raw, 0).featured);
    }

    #[test]
    fn test_feed_page_decodes_dummyjson_shape() {
        let body = r#"{
            "products": [{
                "id": 1, "title": "Essence Mascara", "description": "Popular mascara",
                "price": 9.99, "category": "beauty", "thumbnail": "https://cdn.dummyjson.com/1.png",
                "images": [], "stock": 5, "rating": 4.94, "brand": "Essence", "tags": ["beauty"]
            }],
            "total": 194, "skip": 0, "limit": 30
        }"#;

        let page: FeedPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].brand.as_deref(), Some("Essence"));
    }
}
