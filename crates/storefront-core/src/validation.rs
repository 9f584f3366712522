//! # Validation Module
//!
//! Input validation for the admin product form and the shopper-facing inputs.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Form Submission                              │
//! │                                                                         │
//! │  ProductForm (raw strings as typed)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate()  ── every rule runs, no early return ──► FormErrors         │
//! │       │          name, description, price, stock,                       │
//! │       │          category, brand, image                                 │
//! │       ▼                                                                 │
//! │  submit()    ── normalized Product (Money price, u32 stock,             │
//! │                 preserved or default rating, timestamp)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The single-input validators at the bottom return the first
//! [`ValidationError`] they hit.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};

use crate::error::{FormErrors, FormField, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::{DEFAULT_RATING, MAX_SEARCH_QUERY_LEN, PAGE_SIZE_OPTIONS};

// =============================================================================
// Category / Brand Tables
// =============================================================================

/// Categories the admin form accepts.
pub const PRODUCT_CATEGORIES: [&str; 10] = [
    "smartphones",
    "laptops",
    "home-decoration",
    "skincare",
    "fragrances",
    "groceries",
    "electronics",
    "clothing",
    "books",
    "other",
];

/// The only category that may be submitted without a brand.
pub const UNBRANDED_CATEGORY: &str = "other";

/// Brands offered for a category. Categories without their own list use
/// the `other` list.
pub fn brands_for(category: &str) -> &'static [&'static str] {
    match category {
        "smartphones" => &["Apple", "Samsung", "Google", "OnePlus", "Xiaomi"],
        "laptops" => &["Apple", "Dell", "HP", "Lenovo", "Asus", "Microsoft"],
        "home-decoration" => &["IKEA", "HomeGoods", "West Elm", "Pottery Barn"],
        "skincare" => &[
            "La Roche-Posay",
            "CeraVe",
            "The Ordinary",
            "Neutrogena",
            "Clinique",
        ],
        "fragrances" => &["Chanel", "Dior", "Gucci", "Versace"],
        "groceries" => &["Organic Valley", "Whole Foods", "Trader Joe's"],
        _ => &["Generic", "Unbranded"],
    }
}

/// Specification keys the form edits directly.
pub const SPEC_FIELDS: [&str; 3] = ["color", "weight", "dimensions"];

// =============================================================================
// Product Form
// =============================================================================

/// The admin create/edit product form, holding values exactly as typed.
///
/// Category and brand sit behind setters: picking a category clears the
/// brand, since brand options depend on the category.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
    category: String,
    brand: String,
    /// Image URL or `data:` URL.
    pub image: String,
    pub featured: bool,
    pub sku: String,
    pub specifications: BTreeMap<String, String>,
    editing: Option<Product>,
}

impl ProductForm {
    /// An empty form for a new product.
    pub fn new() -> Self {
        let specifications = SPEC_FIELDS
            .iter()
            .map(|key| (key.to_string(), String::new()))
            .collect();
        ProductForm {
            specifications,
            ..Self::default()
        }
    }

    /// A form pre-filled from an existing product.
    pub fn edit(product: &Product) -> Self {
        let mut form = ProductForm::new();
        form.name = product.name.clone();
        form.description = product.description.clone();
        form.price = product.price.to_decimal_string();
        form.stock = product.stock.to_string();
        form.category = product.category.clone();
        form.brand = product.brand.clone().unwrap_or_default();
        form.image = product.image.clone();
        form.featured = product.featured;
        form.sku = product.sku.clone().unwrap_or_default();
        if let Some(specs) = &product.specs {
            for (key, value) in specs {
                form.specifications.insert(key.clone(), value.clone());
            }
        }
        form.editing = Some(product.clone());
        form
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    /// Selects a category and clears the brand.
    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.brand.clear();
    }

    pub fn set_brand(&mut self, brand: impl Into<String>) {
        self.brand = brand.into();
    }

    /// Brands offered for the current category (empty until one is picked).
    pub fn available_brands(&self) -> &'static [&'static str] {
        if self.category.is_empty() {
            return &[];
        }
        brands_for(&self.category)
    }

    /// Stores uploaded image bytes inline as a base64 `data:` URL.
    pub fn attach_image(&mut self, mime: &str, bytes: &[u8]) {
        self.image = format!("data:{};base64,{}", mime, STANDARD.encode(bytes));
    }

    /// Runs every field rule and reports all failures together.
    pub fn validate(&self) -> Result<(), FormErrors> {
        self.checked().map(|_| ())
    }

    /// The field rules, yielding the parsed price and stock when all pass.
    fn checked(&self) -> Result<(Money, u32), FormErrors> {
        let mut errors = FormErrors::new();

        if self.name.trim().is_empty() {
            errors.insert(FormField::Name, "Product name is required");
        }
        if self.description.trim().is_empty() {
            errors.insert(FormField::Description, "Description is required");
        }
        let price = parse_price(&self.price);
        if price.is_none() {
            errors.insert(FormField::Price, "Valid price is required");
        }
        let stock = parse_stock(&self.stock);
        if stock.is_none() {
            errors.insert(FormField::Stock, "Valid stock quantity is required");
        }
        if !PRODUCT_CATEGORIES.contains(&self.category.as_str()) {
            errors.insert(FormField::Category, "Category is required");
        }
        if self.brand.trim().is_empty() && self.category != UNBRANDED_CATEGORY {
            errors.insert(FormField::Brand, "Brand is required");
        }
        if self.image.trim().is_empty() {
            errors.insert(FormField::Image, "Product image is required");
        }

        match (price, stock) {
            (Some(price), Some(stock)) if errors.is_empty() => Ok((price, stock)),
            _ => Err(errors),
        }
    }

    /// Validates and builds the normalized product.
    ///
    /// A new product gets `new_id`, the default rating, `now` as its
    /// creation time and a `SKU-<millis>` code when none was typed. An edited
    /// product keeps its id, creation time, SKU and (non-zero) rating.
    pub fn submit(&self, new_id: u64, now: DateTime<Utc>) -> Result<Product, FormErrors> {
        let (price, stock) = self.checked()?;

        let (id, rating, created_at, sku) = match &self.editing {
            Some(original) => (
                original.id,
                if original.rating > 0.0 {
                    original.rating
                } else {
                    DEFAULT_RATING
                },
                original.created_at.or(Some(now)),
                original.sku.clone(),
            ),
            None => (
                new_id,
                DEFAULT_RATING,
                Some(now),
                Some(format!("SKU-{}", now.timestamp_millis())),
            ),
        };

        let specs: BTreeMap<String, String> = self
            .specifications
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(key, value)| (key.clone(), value.trim().to_string()))
            .collect();

        let brand = Some(self.brand.trim())
            .filter(|b| !b.is_empty())
            .map(str::to_string);
        let sku = Some(self.sku.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .or(sku);

        Ok(Product {
            id,
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            stock,
            category: self.category.clone(),
            brand,
            image: self.image.trim().to_string(),
            rating,
            featured: self.featured,
            specs: if specs.is_empty() { None } else { Some(specs) },
            sku,
            created_at,
        })
    }
}

/// Price as typed: a finite number that is still positive after rounding to cents.
fn parse_price(raw: &str) -> Option<Money> {
    let amount: f64 = raw.trim().parse().ok()?;
    if !amount.is_finite() || amount <= 0.0 {
        return None;
    }
    Money::from_f64(amount).filter(Money::is_positive)
}

/// Stock as typed: a finite number ≥ 0, truncated to a whole quantity.
fn parse_stock(raw: &str) -> Option<u32> {
    let quantity: f64 = raw.trim().parse().ok()?;
    if !quantity.is_finite() || quantity < 0.0 || quantity.trunc() > u32::MAX as f64 {
        return None;
    }
    Some(quantity.trunc() as u32)
}

// =============================================================================
// Single-Input Validators
// =============================================================================

/// Trims a catalog search query and enforces its length limit.
pub fn validate_search_query(query: &str) -> Result<String, ValidationError> {
    let trimmed = query.trim();
    if trimmed.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }
    Ok(trimmed.to_string())
}

/// Accepts only the page sizes offered by the selector.
pub fn validate_page_size(size: usize) -> Result<usize, ValidationError> {
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(ValidationError::not_allowed("page size", PAGE_SIZE_OPTIONS))
    }
}

/// Both login fields must be present.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), ValidationError> {
    validate_required("email", email)?;
    validate_required("password", password)?;
    Ok(())
}

fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    validate_required("email", email)?;
    let (local, domain) = email
        .trim()
        .split_once('@')
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "missing @".to_string(),
        })?;
    if local.is_empty() || domain.is_empty() {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "incomplete address".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Registration Form
// =============================================================================

/// Sign-up input.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required("name", &self.name)?;
        validate_email(&self.email)?;
        validate_required("password", &self.password)?;
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn filled_form() -> ProductForm {
        let mut form = ProductForm::new();
        form.name = "Desk Lamp".to_string();
        form.description = "Adjustable LED lamp".to_string();
        form.price = "49.99".to_string();
        form.stock = "12".to_string();
        form.set_category("home-decoration");
        form.set_brand("IKEA");
        form.image = "https://example.com/lamp.png".to_string();
        form
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = ProductForm::new().validate().unwrap_err();
        assert_eq!(errors.len(), 7);
        assert_eq!(errors.get(FormField::Name), Some("Product name is required"));
        assert_eq!(errors.get(FormField::Image), Some("Product image is required"));
        assert_eq!(errors.get(FormField::Category), Some("Category is required"));
    }

    #[test]
    fn test_zero_price_rejected() {
        let mut form = filled_form();
        for bad in ["0", "-5", "abc", "", "NaN", "inf", "0.001"] {
            form.price = bad.to_string();
            let errors = form.validate().unwrap_err();
            assert_eq!(errors.get(FormField::Price), Some("Valid price is required"), "{}", bad);
            assert_eq!(errors.len(), 1);
        }
    }

    #[test]
    fn test_stock_rules() {
        let mut form = filled_form();
        form.stock = "-1".to_string();
        assert!(form.validate().unwrap_err().contains(FormField::Stock));

        form.stock = "0".to_string();
        assert!(form.validate().is_ok());

        form.stock = "7.9".to_string();
        let product = form.submit(100, now()).unwrap();
        assert_eq!(product.stock, 7);
    }

    #[test]
    fn test_other_category_accepts_missing_brand() {
        let mut form = filled_form();
        form.set_category("other");
        assert_eq!(form.brand(), "");
        assert!(form.validate().is_ok());

        form.set_category("laptops");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(FormField::Brand), Some("Brand is required"));
    }

    #[test]
    fn test_unknown_category_rejected_but_brands_fall_back() {
        let mut form = filled_form();
        form.set_category("toys");
        assert!(form.validate().unwrap_err().contains(FormField::Category));
        assert_eq!(form.available_brands(), &["Generic", "Unbranded"]);
        assert!(ProductForm::new().available_brands().is_empty());
    }

    #[test]
    fn test_submit_reports_field_errors() {
        let mut form = filled_form();
        form.name.clear();
        form.stock = "lots".to_string();

        let errors = form.submit(1, now()).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(FormField::Name));
        assert!(errors.contains(FormField::Stock));
        assert_eq!(Err(errors), form.validate());
    }

    #[test]
    fn test_submit_new_product() {
        let mut form = filled_form();
        form.specifications.insert("color".to_string(), "Black".to_string());

        let product = form.submit(42, now()).unwrap();
        assert_eq!(product.id, 42);
        assert_eq!(product.price.cents(), 4999);
        assert_eq!(product.rating, DEFAULT_RATING);
        assert_eq!(product.created_at, Some(now()));
        assert_eq!(product.brand.as_deref(), Some("IKEA"));
        assert_eq!(product.sku, Some(format!("SKU-{}", now().timestamp_millis())));

        let specs = product.specs.unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs.get("color").map(String::as_str), Some("Black"));
    }

    #[test]
    fn test_edit_prefills_and_preserves_identity() {
        let original = filled_form().submit(7, now()).unwrap();
        let original = Product {
            rating: 4.8,
            sku: Some("HOME-007".to_string()),
            ..original
        };

        let mut form = ProductForm::edit(&original);
        assert!(form.is_editing());
        assert_eq!(form.price, "49.99");
        assert_eq!(form.brand(), "IKEA");
        assert_eq!(form.sku, "HOME-007");

        form.price = "39.99".to_string();
        let later = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let updated = form.submit(999, later).unwrap();
        assert_eq!(updated.id, 7);
        assert_eq!(updated.rating, 4.8);
        assert_eq!(updated.created_at, Some(now()));
        assert_eq!(updated.price.cents(), 3999);
    }

    #[test]
    fn test_attach_image_builds_data_url() {
        let mut form = ProductForm::new();
        form.attach_image("image/png", b"abc");
        assert_eq!(form.image, "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_search_and_page_size() {
        assert_eq!(validate_search_query("  lamp ").unwrap(), "lamp");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
        assert_eq!(validate_page_size(12).unwrap(), 12);
        assert!(validate_page_size(10).is_err());
    }

    #[test]
    fn test_registration() {
        let mut form = RegistrationForm {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
        };
        assert!(form.validate().is_ok());

        form.confirm_password = "other".to_string();
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));

        form.email = "jane".to_string();
        assert!(matches!(
            form.validate(),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_credentials_required() {
        assert!(validate_credentials("a@b.c", "pw").is_ok());
        assert!(validate_credentials(" ", "pw").is_err());
        assert!(validate_credentials("a@b.c", "").is_err());
    }
}
