//! # Demo Data
//!
//! Every hardcoded record the storefront ships with.
//!
//! ```text
//! ┌──────────────────────┬──────────────┬─────────────────────────────────┐
//! │ Set                  │ IDs          │ Used by                         │
//! ├──────────────────────┼──────────────┼─────────────────────────────────┤
//! │ exclusive_products   │ 2001..=2008  │ appended to every feed catalog  │
//! │ fallback_products    │ 1..=12       │ catalog when every source fails │
//! │ dashboard_products   │ 1..=5        │ admin inventory table           │
//! │ dashboard_orders     │ 1..=5        │ admin order table               │
//! │ demo_users           │ 1..=20       │ admin user table                │
//! └──────────────────────┴──────────────┴─────────────────────────────────┘
//! ```
//!
//! Values that were randomized in earlier demos (phone numbers, roles,
//! spend) are derived from the row index, so two runs list the same data.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use storefront_core::{
    Money, Order, OrderStatus, Product, Role, User, UserStatus, DEFAULT_RATING,
};

/// Number of rows in the demo user table.
pub const DEMO_USER_COUNT: u64 = 20;

// =============================================================================
// Product Seeds
// =============================================================================

struct Seed {
    id: u64,
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    category: &'static str,
    image: &'static str,
    stock: u32,
    rating: f64,
    featured: bool,
    brand: Option<&'static str>,
    specs: &'static [(&'static str, &'static str)],
    sku: Option<&'static str>,
}

impl Seed {
    fn to_product(&self) -> Product {
        let specs = if self.specs.is_empty() {
            None
        } else {
            Some(
                self.specs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<BTreeMap<_, _>>(),
            )
        };

        Product {
            id: self.id,
            name: self.name.to_string(),
            description: self.description.to_string(),
            price: Money::from_cents(self.price_cents),
            stock: self.stock,
            category: self.category.to_string(),
            brand: self.brand.map(str::to_string),
            image: self.image.to_string(),
            rating: self.rating,
            featured: self.featured,
            specs,
            sku: self.sku.map(str::to_string),
            created_at: None,
        }
    }
}

const NO_SPECS: &[(&str, &str)] = &[];

const EXCLUSIVE: [Seed; 8] = [
    Seed {
        id: 2001,
        name: "iPhone 15 Pro Max",
        description: "Latest Apple smartphone with A17 Pro chip and titanium design",
        price_cents: 129_900,
        category: "smartphones",
        image: "https://images.unsplash.com/photo-1695048133142-1a20484d2569?w=400&h=400&fit=crop",
        stock: 15,
        rating: 4.8,
        featured: true,
        brand: Some("Apple"),
        specs: &[("storage", "512GB"), ("ram", "8GB"), ("camera", "48MP")],
        sku: None,
    },
    Seed {
        id: 2002,
        name: "Samsung Galaxy S24 Ultra",
        description: "Premium Android phone with S-Pen and advanced AI features",
        price_cents: 119_900,
        category: "smartphones",
        image: "https://images.unsplash.com/photo-1610945265064-0e34e5519bbf?w=400&h=400&fit=crop",
        stock: 20,
        rating: 4.7,
        featured: true,
        brand: Some("Samsung"),
        specs: &[("storage", "1TB"), ("ram", "12GB"), ("camera", "200MP")],
        sku: None,
    },
    Seed {
        id: 2003,
        name: "MacBook Pro 16\"",
        description: "Professional laptop with M3 Max chip for creative work",
        price_cents: 249_900,
        category: "laptops",
        image: "https://images.unsplash.com/photo-1517336714731-489689fd1ca8?w=400&h=400&fit=crop",
        stock: 8,
        rating: 4.9,
        featured: true,
        brand: Some("Apple"),
        specs: &[("processor", "M3 Max"), ("ram", "64GB"), ("storage", "2TB SSD")],
        sku: None,
    },
    Seed {
        id: 2004,
        name: "Dell XPS 15",
        description: "Premium Windows laptop with OLED display",
        price_cents: 189_900,
        category: "laptops",
        image: "https://images.unsplash.com/photo-1593640408182-31c70c8268f5?w=400&h=400&fit=crop",
        stock: 12,
        rating: 4.6,
        featured: true,
        brand: Some("Dell"),
        specs: &[("processor", "Intel Core i9"), ("ram", "32GB"), ("storage", "1TB SSD")],
        sku: None,
    },
    Seed {
        id: 2005,
        name: "Modern Floor Lamp",
        description: "Adjustable standing lamp with smart home integration",
        price_cents: 19_900,
        category: "home-decoration",
        image: "https://images.unsplash.com/photo-1507473885765-e6ed057f782c?w=400&h=400&fit=crop",
        stock: 25,
        rating: 4.5,
        featured: true,
        brand: Some("HomeLuxe"),
        specs: NO_SPECS,
        sku: None,
    },
    Seed {
        id: 2006,
        name: "Ceramic Vase Set",
        description: "Handcrafted ceramic vases in minimalist design",
        price_cents: 8_900,
        category: "home-decoration",
        image: "https://images.unsplash.com/photo-1578500494198-246f612d3b3d?w=400&h=400&fit=crop",
        stock: 40,
        rating: 4.3,
        featured: false,
        brand: Some("ArtisanDecor"),
        specs: NO_SPECS,
        sku: None,
    },
    Seed {
        id: 2007,
        name: "Vitamin C Serum",
        description: "Brightening serum with hyaluronic acid and antioxidants",
        price_cents: 4_500,
        category: "skincare",
        image: "https://images.unsplash.com/photo-1556228578-9c360e0b8f3c?w=400&h=400&fit=crop",
        stock: 60,
        rating: 4.7,
        featured: true,
        brand: Some("SkinScience"),
        specs: NO_SPECS,
        sku: None,
    },
    Seed {
        id: 2008,
        name: "Retinol Night Cream",
        description: "Anti-aging cream with retinol and peptides",
        price_cents: 6_500,
        category: "skincare",
        image: "https://images.unsplash.com/photo-1556228453-efd6c1ff04f6?w=400&h=400&fit=crop",
        stock: 35,
        rating: 4.6,
        featured: true,
        brand: Some("GlowLab"),
        specs: NO_SPECS,
        sku: None,
    },
];

macro_rules! fallback {
    (
        $id:expr, $name:expr, $desc:expr, $dollars:expr, $cat:expr, $brand:expr;
        $photo:literal, $stock:expr, $rating:expr, $featured:expr
    ) => {
        Seed {
            id: $id,
            name: $name,
            description: $desc,
            price_cents: $dollars * 100,
            category: $cat,
            image: concat!("https://images.unsplash.com/photo-", $photo, "?w=400&h=400&fit=crop"),
            stock: $stock,
            rating: $rating,
            featured: $featured,
            brand: Some($brand),
            specs: NO_SPECS,
            sku: None,
        }
    };
}

const FALLBACK: [Seed; 12] = [
    fallback!(1, "iPhone 14", "Latest Apple smartphone", 999, "smartphones", "Apple";
        "1598327105666-5b89351aff97", 25, 4.5, true),
    fallback!(2, "Samsung Galaxy S23", "Premium Android phone", 899, "smartphones", "Samsung";
        "1610945265064-0e34e5519bbf", 30, 4.7, true),
    fallback!(3, "Google Pixel 8", "AI-powered smartphone", 799, "smartphones", "Google";
        "1592899677977-9c10ca588bbd", 20, 4.6, false),
    fallback!(4, "MacBook Air", "Lightweight Apple laptop", 1199, "laptops", "Apple";
        "1496181133206-80ce9b88a853", 15, 4.8, true),
    fallback!(5, "Dell XPS 13", "Compact Windows laptop", 1099, "laptops", "Dell";
        "1593640408182-31c70c8268f5", 18, 4.4, false),
    fallback!(6, "Lenovo ThinkPad", "Business laptop", 1299, "laptops", "Lenovo";
        "1541807084-5c52b6b3adef", 22, 4.3, false),
    fallback!(7, "Modern Wall Art", "Abstract canvas painting", 149, "home-decoration", "HomeArt";
        "1578662996442-48f60103fc96", 40, 4.2, true),
    fallback!(8, "Decorative Pillows", "Set of 4 velvet pillows", 79, "home-decoration", "CozyHome";
        "1586023492125-27b2c045efd7", 55, 4.5, false),
    fallback!(9, "Ceramic Table Lamp", "Handmade lamp with shade", 89, "home-decoration", "Lumina";
        "1507473885765-e6ed057f782c", 30, 4.6, true),
    fallback!(10, "Hyaluronic Acid Serum", "Hydrating facial serum", 35, "skincare", "SkinCare+";
        "1556228578-9c360e0b8f3c", 65, 4.7, true),
    fallback!(11, "SPF 50 Sunscreen", "Broad spectrum protection", 25, "skincare", "SunSafe";
        "1556228453-efd6c1ff04f6", 80, 4.4, false),
    fallback!(12, "Night Repair Cream", "Anti-aging moisturizer", 55, "skincare", "YouthLab";
        "1591085686350-798c0f9faa7f", 45, 4.8, true),
];

const DASHBOARD: [Seed; 5] = [
    Seed {
        id: 1,
        name: "Wireless Headphones",
        description: "Premium noise-cancelling wireless headphones",
        price_cents: 19_999,
        category: "electronics",
        image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=100&h=100&fit=crop",
        stock: 25,
        rating: DEFAULT_RATING,
        featured: false,
        brand: None,
        specs: NO_SPECS,
        sku: Some("ELEC-001"),
    },
    Seed {
        id: 2,
        name: "Smart Watch",
        description: "Latest model smart watch with health tracking",
        price_cents: 29_999,
        category: "electronics",
        image: "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=100&h=100&fit=crop",
        stock: 15,
        rating: DEFAULT_RATING,
        featured: false,
        brand: None,
        specs: NO_SPECS,
        sku: Some("ELEC-002"),
    },
    Seed {
        id: 3,
        name: "Designer Backpack",
        description: "Waterproof laptop backpack",
        price_cents: 8_999,
        category: "clothing",
        image: "https://images.unsplash.com/photo-1553062407-98eeb64c6a62?w=100&h=100&fit=crop",
        stock: 40,
        rating: DEFAULT_RATING,
        featured: false,
        brand: None,
        specs: NO_SPECS,
        sku: Some("CLOTH-001"),
    },
    Seed {
        id: 4,
        name: "Coffee Maker",
        description: "Automatic drip coffee machine",
        price_cents: 12_999,
        category: "home",
        image: "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085?w=100&h=100&fit=crop",
        stock: 30,
        rating: DEFAULT_RATING,
        featured: false,
        brand: None,
        specs: NO_SPECS,
        sku: Some("HOME-001"),
    },
    Seed {
        id: 5,
        name: "Fiction Book",
        description: "Bestselling fiction novel",
        price_cents: 1_999,
        category: "books",
        image: "https://images.unsplash.com/photo-1544716278-ca5e3f4abd8c?w=100&h=100&fit=crop",
        stock: 100,
        rating: DEFAULT_RATING,
        featured: false,
        brand: None,
        specs: NO_SPECS,
        sku: Some("BOOK-001"),
    },
];

/// Curated products appended to every assembled catalog.
pub fn exclusive_products() -> Vec<Product> {
    EXCLUSIVE.iter().map(Seed::to_product).collect()
}

/// Sample catalog shown when no feed source answered.
pub fn fallback_products() -> Vec<Product> {
    FALLBACK.iter().map(Seed::to_product).collect()
}

/// Inventory listed by the admin dashboard.
pub fn dashboard_products() -> Vec<Product> {
    DASHBOARD.iter().map(Seed::to_product).collect()
}

// =============================================================================
// Orders
// =============================================================================

/// Recent orders listed by the admin dashboard.
pub fn dashboard_orders() -> Vec<Order> {
    use OrderStatus::{Completed, Pending, Processing, Shipped};

    let rows: [(u64, &str, &str, i64, OrderStatus, (i32, u32, u32), u32); 5] = [
        (1, "John Doe", "john@example.com", 29_999, Completed, (2024, 1, 15), 3),
        (2, "Jane Smith", "jane@example.com", 19_999, Processing, (2024, 1, 15), 2),
        (3, "Bob Johnson", "bob@example.com", 59_999, Shipped, (2024, 1, 14), 5),
        (4, "Alice Brown", "alice@example.com", 8_999, Pending, (2024, 1, 14), 1),
        (5, "Charlie Wilson", "charlie@example.com", 34_999, Completed, (2024, 1, 13), 4),
    ];

    rows.into_iter()
        .filter_map(|(id, customer, email, cents, status, (y, m, d), items)| {
            Some(Order {
                id,
                customer: customer.to_string(),
                email: email.to_string(),
                amount: Money::from_cents(cents),
                status,
                items,
                date: NaiveDate::from_ymd_opt(y, m, d)?,
            })
        })
        .collect()
}

// =============================================================================
// Users
// =============================================================================

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The admin user table: `User 1` .. `User 20`.
///
/// Roles cycle admin, user, vendor, moderator; every third account is
/// inactive; sign-up dates walk back one week per row.
pub fn demo_users() -> Vec<User> {
    let anchor = anchor();

    (1..=DEMO_USER_COUNT)
        .map(|n| {
            let i = n as i64;
            let created_at = anchor - Duration::days(7 * i);
            let orders = ((n * 37) % 100) as u32;

            User {
                id: n,
                name: format!("User {}", n),
                email: format!("user{}@example.com", n),
                phone: format!("+1 {:010}", 2_025_550_100 + n * 111),
                role: Role::ALL[((n - 1) % 4) as usize],
                status: if n % 3 == 0 {
                    UserStatus::Inactive
                } else {
                    UserStatus::Active
                },
                created_at,
                last_login: Some(anchor - Duration::hours(5 * i)),
                orders,
                total_spent: Money::from_dollars(orders as i64 * 85 + i * 13),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_exclusive_products() {
        let products = exclusive_products();
        assert_eq!(products.len(), 8);
        assert_eq!(products[0].id, 2001);
        assert_eq!(products[7].id, 2008);
        assert_eq!(products[0].price, Money::from_dollars(1299));

        for category in ["smartphones", "laptops", "home-decoration", "skincare"] {
            assert_eq!(products.iter().filter(|p| p.category == category).count(), 2);
        }
        assert!(products[2].specs.as_ref().unwrap().contains_key("processor"));
        assert!(products[4].specs.is_none());
    }

    #[test]
    fn test_fallback_products() {
        let products = fallback_products();
        assert_eq!(products.len(), 12);
        let ids: Vec<u64> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
        assert_eq!(products[11].name, "Night Repair Cream");
        assert_eq!(products[11].price.cents(), 5500);
        assert!(products.iter().all(|p| p.image.starts_with("https://images.unsplash.com/")));
    }

    #[test]
    fn test_dashboard_data() {
        let products = dashboard_products();
        assert_eq!(products.len(), 5);
        assert_eq!(products[0].sku.as_deref(), Some("ELEC-001"));

        let orders = dashboard_orders();
        assert_eq!(orders.len(), 5);
        assert_eq!(orders[2].amount.cents(), 59_999);
        assert_eq!(orders[4].date, NaiveDate::from_ymd_opt(2024, 1, 13).unwrap());
    }

    #[test]
    fn test_demo_users_are_deterministic() {
        let users = demo_users();
        assert_eq!(users.len(), 20);
        assert_eq!(users, demo_users());

        assert_eq!(users[0].name, "User 1");
        assert_eq!(users[19].email, "user20@example.com");
        assert_eq!(users[0].role, Role::Admin);
        assert_eq!(users[1].role, Role::User);
        assert_eq!(users[2].status, UserStatus::Inactive);

        let ids: HashSet<u64> = users.iter().map(|u| u.id).collect();
        assert_eq!(ids.len(), 20);
        assert!(users.windows(2).all(|w| w[0].created_at > w[1].created_at));
    }
}
