//! # Domain Types
//!
//! Core domain types shared by the catalog, the session and the admin console.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Identity     │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (u64)       │   │  id             │   │  id             │       │
//! │  │  name, brand    │   │  name, email    │   │  customer       │       │
//! │  │  price (Money)  │   │  role           │   │  amount (Money) │       │
//! │  │  category slug  │   └─────────────────┘   │  status         │       │
//! │  │  rating 0..=5   │                          └─────────────────┘       │
//! │  └─────────────────┘   ┌─────────────────┐   ┌─────────────────┐       │
//! │                        │      User       │   │  Role / Status  │       │
//! │   Session = Option<    │  (admin table)  │   │  admin, user,   │       │
//! │     Identity> + Cart   │  phone, orders  │   │  vendor, mod    │       │
//! │                        │  total_spent    │   │  active/inactive│       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product shown in the catalog or managed from the admin dashboard.
///
/// Cart entries are full clones of this struct, so later edits to the
/// catalog never reach into a shopper's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Stable identifier. Feed products keep the upstream id (general-feed
    /// products are offset by 1000), curated products use 2001+.
    pub id: u64,

    pub name: String,

    pub description: String,

    /// Price in cents. Only the admin form enforces `> 0`.
    pub price: Money,

    pub stock: u32,

    /// Category slug, e.g. `home-decoration`.
    pub category: String,

    #[serde(default)]
    pub brand: Option<String>,

    /// Image URL or an inline `data:` URL of an uploaded file.
    pub image: String,

    /// Average rating, 0.0 to 5.0.
    pub rating: f64,

    #[serde(default)]
    pub featured: bool,

    /// Free-form specification sheet (storage, ram, color, ...).
    #[serde(default)]
    pub specs: Option<BTreeMap<String, String>>,

    /// Admin-facing stock keeping unit.
    #[serde(default)]
    pub sku: Option<String>,

    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Case-insensitive substring match against name, description and brand.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .brand
                .as_deref()
                .is_some_and(|brand| brand.to_lowercase().contains(needle))
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

// =============================================================================
// Role
// =============================================================================

/// Role of an identity or a managed user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    Admin,
    #[default]
    User,
    Vendor,
    Moderator,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::User, Role::Vendor, Role::Moderator];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Vendor => "vendor",
            Role::Moderator => "moderator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::not_allowed("role", Role::ALL))
    }
}

// =============================================================================
// User Status
// =============================================================================

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
}

impl UserStatus {
    pub const ALL: [UserStatus; 2] = [UserStatus::Active, UserStatus::Inactive];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::not_allowed("status", UserStatus::ALL))
    }
}

// =============================================================================
// Identity (Session User)
// =============================================================================

/// The signed-in identity held by the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Identity {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Identity {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Shape check applied to identities read back from storage.
    pub fn is_well_formed(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

// =============================================================================
// User (Admin Table Row)
// =============================================================================

/// A customer account as listed in the admin user table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub status: UserStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub last_login: Option<DateTime<Utc>>,
    /// Number of orders placed.
    pub orders: u32,
    pub total_spent: Money,
}

impl User {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

// =============================================================================
// Order
// =============================================================================

/// Fulfilment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::not_allowed("status", OrderStatus::ALL))
    }
}

/// An order as managed from the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub id: u64,
    pub customer: String,
    pub email: String,
    pub amount: Money,
    pub status: OrderStatus,
    /// Number of line items.
    pub items: u32,
    #[ts(as = "String")]
    pub date: NaiveDate,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, brand: Option<&str>) -> Product {
        Product {
            id: 1,
            name: name.to_string(),
            description: "Premium noise-cancelling".to_string(),
            price: Money::from_cents(19999),
            stock: 3,
            category: "electronics".to_string(),
            brand: brand.map(str::to_string),
            image: "https://example.com/p.png".to_string(),
            rating: 4.2,
            featured: false,
            specs: None,
            sku: None,
            created_at: None,
        }
    }

    #[test]
    fn test_matches_query_fields() {
        let p = product("Wireless Headphones", Some("Acme"));
        assert!(p.matches_query(""));
        assert!(p.matches_query("wireless"));
        assert!(p.matches_query("noise"));
        assert!(p.matches_query("acme"));
        assert!(!p.matches_query("laptop"));

        let unbranded = product("Lamp", None);
        assert!(!unbranded.matches_query("acme"));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Moderator".parse::<Role>().unwrap(), Role::Moderator);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_order_status_round_trip_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("lost".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_identity_shape_check() {
        let mut identity = Identity {
            id: 2,
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            role: Role::User,
        };
        assert!(identity.is_well_formed());
        assert!(!identity.is_admin());

        identity.name = "  ".to_string();
        assert!(!identity.is_well_formed());
    }

    #[test]
    fn test_product_json_uses_camel_case() {
        let json = serde_json::to_value(product("Lamp", None)).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["price"], 19999);
    }
}
