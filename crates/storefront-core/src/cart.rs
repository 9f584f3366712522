//! # Cart
//!
//! The shopper's cart: an ordered list of product snapshots.
//!
//! Adding the same product twice stores two entries. There are no quantities
//! and no merging; the total is the plain sum of every entry's price.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::Product;

/// Ordered cart of product snapshots, persisted as a JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Vec<Product>);

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_items(items: Vec<Product>) -> Self {
        Cart(items)
    }

    /// Appends a snapshot of `product`.
    pub fn add(&mut self, product: &Product) {
        self.0.push(product.clone());
    }

    pub fn items(&self) -> &[Product] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of every entry's price.
    pub fn total(&self) -> Money {
        self.0.iter().map(|p| p.price).sum()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<Product>> for Cart {
    fn from(items: Vec<Product>) -> Self {
        Cart(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, cents: i64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            description: String::new(),
            price: Money::from_cents(cents),
            stock: 1,
            category: "other".to_string(),
            brand: None,
            image: String::new(),
            rating: 4.0,
            featured: false,
            specs: None,
            sku: None,
            created_at: None,
        }
    }

    #[test]
    fn test_duplicate_adds_keep_both_entries() {
        let mut cart = Cart::new();
        let p = product(1, 1999);
        cart.add(&p);
        cart.add(&p);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.total().cents(), 3998);
    }

    #[test]
    fn test_entries_are_snapshots() {
        let mut cart = Cart::new();
        let mut p = product(1, 1000);
        cart.add(&p);
        p.price = Money::from_cents(5000);

        assert_eq!(cart.items()[0].price.cents(), 1000);
    }

    #[test]
    fn test_order_is_insertion_order() {
        let mut cart = Cart::new();
        for id in [3, 1, 2] {
            cart.add(&product(id, 100));
        }
        let ids: Vec<u64> = cart.items().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let cart = Cart::from_items(vec![product(7, 250)]);
        let json = serde_json::to_value(&cart).unwrap();
        assert!(json.is_array());

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
        assert!(Cart::new().total().is_zero());
    }
}
