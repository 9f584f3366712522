//! # Cart Commands
//!
//! ```text
//! storefront cart add 12     snapshot of product 12 appended (no merging)
//! storefront cart show       every entry, plus the plain sum of prices
//! ```

use std::fmt;

use serde::Serialize;
use storefront_core::{Cart, Money, Product};

use super::truncate;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<Product>,
    pub count: usize,
    pub total: Money,
    /// Name of the product just added, for the confirmation line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added: Option<String>,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            items: cart.items().to_vec(),
            count: cart.len(),
            total: cart.total(),
            added: None,
        }
    }
}

impl fmt::Display for CartResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.added {
            writeln!(f, "Added {} to cart", name)?;
        }
        if self.items.is_empty() {
            return write!(f, "Your cart is empty");
        }
        for product in &self.items {
            writeln!(
                f,
                "{:>6}  {:<40} {:>10}",
                product.id,
                truncate(&product.name, 40),
                product.price.to_string()
            )?;
        }
        write!(f, "{} item(s), total {}", self.count, self.total)
    }
}

/// Appends a snapshot of catalog product `id` to the cart.
pub async fn add(app: &AppState, id: u64) -> Result<CartResponse, ApiError> {
    let product = app
        .with_catalog(|catalog| catalog.find(id).cloned())
        .await
        .ok_or_else(|| ApiError::not_found("Product", id))?;

    let mut session = app.session.lock().await;
    session.add_to_cart(&product).await?;

    let mut response = CartResponse::from(session.cart());
    response.added = Some(product.name);
    Ok(response)
}

pub async fn show(app: &AppState) -> CartResponse {
    CartResponse::from(app.session.lock().await.cart())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::testing::app;

    #[tokio::test]
    async fn test_same_product_twice_is_two_entries() {
        let app = app().await;
        add(&app, 4).await.unwrap();
        let response = add(&app, 4).await.unwrap();

        assert_eq!(response.count, 2);
        assert_eq!(response.total.cents(), 2 * 1_400);
        assert_eq!(response.added.as_deref(), Some("Product 4"));
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let app = app().await;
        let err = add(&app, 999).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert!(show(&app).await.items.is_empty());
    }

    #[tokio::test]
    async fn test_display_total() {
        let app = app().await;
        add(&app, 1).await.unwrap();
        let text = show(&app).await.to_string();
        assert!(text.ends_with("1 item(s), total $11.00"));
    }
}
