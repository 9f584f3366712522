//! # Catalog Engine
//!
//! Filter, sort and paginate an in-memory product list, and build the
//! compact page-number list for pagination controls.
//!
//! ## Derived View Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  products (as fetched)                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  filter  ── category == C (or "all") AND query ⊂ name|description|brand │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sort    ── featured | price-low | price-high | rating | newest | title │
//! │       │     (stable: equal keys keep their fetched order)               │
//! │       ▼                                                                 │
//! │  page    ── [(page-1)*size, page*size)  (empty when out of range)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogView { items, total_items, total_pages, page_numbers }          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is referentially transparent. Resetting the page on a
//! filter change and rejecting out-of-range navigation belong to the caller.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::Product;
use crate::{ALL_CATEGORIES, DEFAULT_PAGE_SIZE, MAX_VISIBLE_PAGES};

// =============================================================================
// Sort Key
// =============================================================================

/// Catalog sort order as offered by the sort selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
#[ts(export)]
pub enum SortKey {
    /// Featured products first, otherwise fetched order.
    #[default]
    Featured,
    PriceLow,
    PriceHigh,
    /// Highest rating first.
    Rating,
    /// Highest identifier first (identifiers grow with recency).
    Newest,
    /// Name, A to Z.
    Title,
}

impl SortKey {
    pub const ALL: [SortKey; 6] = [
        SortKey::Featured,
        SortKey::PriceLow,
        SortKey::PriceHigh,
        SortKey::Rating,
        SortKey::Newest,
        SortKey::Title,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Featured => "featured",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
            SortKey::Rating => "rating",
            SortKey::Newest => "newest",
            SortKey::Title => "title",
        }
    }

    /// Human label as shown in the selector.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Featured => "Featured",
            SortKey::PriceLow => "Price: Low to High",
            SortKey::PriceHigh => "Price: High to Low",
            SortKey::Rating => "Highest Rated",
            SortKey::Newest => "Newest",
            SortKey::Title => "Title A-Z",
        }
    }

    /// Orders two products under this key.
    ///
    /// ## Keys
    /// - `Featured`: featured before non-featured, no secondary key
    /// - `Rating`: uses `total_cmp`, so NaN ratings still give a total order
    /// - `Title`: case-insensitive, ties broken by the raw name
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::Featured => b.featured.cmp(&a.featured),
            SortKey::PriceLow => a.price.cmp(&b.price),
            SortKey::PriceHigh => b.price.cmp(&a.price),
            SortKey::Rating => b.rating.total_cmp(&a.rating),
            SortKey::Newest => b.id.cmp(&a.id),
            SortKey::Title => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| ValidationError::not_allowed("sort", SortKey::ALL))
    }
}

// =============================================================================
// Category Filter
// =============================================================================

/// Category selector value: everything, or one category slug.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Only(slug) => f.write_str(slug),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }
}

// =============================================================================
// Filter / Sort / Paginate
// =============================================================================

/// Keeps the products in `category` that match `query`.
///
/// The query is matched case-insensitively against name, description and
/// brand; an empty (or whitespace) query matches everything.
pub fn filter_products<'a>(
    products: &'a [Product],
    query: &str,
    category: &CategoryFilter,
) -> Vec<&'a Product> {
    let needle = query.trim().to_lowercase();
    products
        .iter()
        .filter(|p| category.matches(&p.category) && p.matches_query(&needle))
        .collect()
}

/// Stable in-place sort by `key`.
pub fn sort_products<P: AsRef<Product>>(products: &mut [P], key: SortKey) {
    products.sort_by(|a, b| key.compare(a.as_ref(), b.as_ref()));
}

impl AsRef<Product> for Product {
    fn as_ref(&self) -> &Product {
        self
    }
}

/// Returns page `page` (1-based) of `items`.
///
/// Page 0, a zero page size, or a page past the end all yield an empty
/// slice; the last page may be shorter than `page_size`.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = match (page - 1).checked_mul(page_size) {
        Some(start) if start < items.len() => start,
        _ => return &[],
    };
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `total_items` at `page_size` (0 for no items).
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

// =============================================================================
// Page Numbers
// =============================================================================

/// One entry of the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    /// A navigable page (1-based).
    Page(usize),
    /// A gap placeholder. Never resolves to a page.
    Ellipsis,
}

impl PageMarker {
    /// The page this marker navigates to, if any.
    pub fn page(&self) -> Option<usize> {
        match self {
            PageMarker::Page(n) => Some(*n),
            PageMarker::Ellipsis => None,
        }
    }
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageMarker::Page(n) => write!(f, "{}", n),
            PageMarker::Ellipsis => f.write_str("..."),
        }
    }
}

/// Builds the compact page list for `current` of `total` pages.
///
/// ## Shapes (total = 10)
/// ```text
/// current = 1   →  1 2 3 4 … 10
/// current = 5   →  1 … 4 5 6 … 10
/// current = 10  →  1 … 7 8 9 10
/// ```
/// With five or fewer pages every page is listed.
pub fn page_numbers(current: usize, total: usize) -> Vec<PageMarker> {
    use PageMarker::{Ellipsis, Page};

    if total <= MAX_VISIBLE_PAGES {
        return (1..=total).map(Page).collect();
    }

    let mut pages = Vec::with_capacity(7);
    if current <= 3 {
        pages.extend((1..=4).map(Page));
        pages.push(Ellipsis);
        pages.push(Page(total));
    } else if current >= total - 2 {
        pages.push(Page(1));
        pages.push(Ellipsis);
        pages.extend((total - 3..=total).map(Page));
    } else {
        pages.push(Page(1));
        pages.push(Ellipsis);
        pages.extend([Page(current - 1), Page(current), Page(current + 1)]);
        pages.push(Ellipsis);
        pages.push(Page(total));
    }
    pages
}

// =============================================================================
// Catalog Query / View
// =============================================================================

/// Everything the shopper has chosen on the catalog page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search: String,
    pub category: CategoryFilter,
    pub sort: SortKey,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        CatalogQuery {
            search: String::new(),
            category: CategoryFilter::All,
            sort: SortKey::Featured,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// The derived, ordered, paged view of the catalog.
#[derive(Debug, Clone)]
pub struct CatalogView<'a> {
    /// Products on the requested page.
    pub items: Vec<&'a Product>,
    /// Products matching the filters, across all pages.
    pub total_items: usize,
    pub total_pages: usize,
    pub page: usize,
    pub page_size: usize,
    pub page_numbers: Vec<PageMarker>,
}

impl CatalogView<'_> {
    /// 1-based position of the first and last item on this page ("Showing 9-16 of 40").
    pub fn showing_range(&self) -> Option<(usize, usize)> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.page - 1) * self.page_size + 1;
        Some((first, first + self.items.len() - 1))
    }
}

/// Runs the full filter → sort → paginate pipeline.
pub fn view<'a>(products: &'a [Product], query: &CatalogQuery) -> CatalogView<'a> {
    let mut matched = filter_products(products, &query.search, &query.category);
    matched.sort_by(|a, b| query.sort.compare(a, b));

    let total_items = matched.len();
    let total_pages = total_pages(total_items, query.page_size);
    let items = paginate(&matched, query.page, query.page_size).to_vec();

    CatalogView {
        items,
        total_items,
        total_pages,
        page: query.page,
        page_size: query.page_size,
        page_numbers: page_numbers(query.page, total_pages),
    }
}

/// Distinct category slugs in first-seen order (for the category selector).
pub fn categories(products: &[Product]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for product in products {
        if !seen.contains(&product.category.as_str()) {
            seen.push(&product.category);
        }
    }
    seen
}

// =============================================================================
// Unit Tests
// =============================================================================
