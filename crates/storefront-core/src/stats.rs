//! Dashboard figures derived from the admin collections.
//!
//! Nothing here is cached: callers recompute after every mutation.

use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Order, OrderStatus, Product, Role, User};

/// Headline numbers on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub total_products: usize,
    pub total_users: usize,
    pub total_orders: usize,
    /// Sum of every non-cancelled order.
    pub total_revenue: Money,
    pub orders_by_status: BTreeMap<OrderStatus, usize>,
}

impl DashboardStats {
    pub fn compute(products: &[Product], users: &[User], orders: &[Order]) -> Self {
        let mut orders_by_status: BTreeMap<OrderStatus, usize> =
            OrderStatus::ALL.iter().map(|s| (*s, 0)).collect();
        for order in orders {
            *orders_by_status.entry(order.status).or_default() += 1;
        }

        DashboardStats {
            total_products: products.len(),
            total_users: users.len(),
            total_orders: orders.len(),
            total_revenue: orders
                .iter()
                .filter(|o| o.status != OrderStatus::Cancelled)
                .map(|o| o.amount)
                .sum(),
            orders_by_status,
        }
    }
}

/// Summary cards above the user table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub admins: usize,
    pub total_orders: u64,
    pub total_spent: Money,
}

impl UserStats {
    pub fn compute<'a, I>(users: I) -> Self
    where
        I: IntoIterator<Item = &'a User>,
    {
        let mut stats = UserStats {
            total: 0,
            active: 0,
            admins: 0,
            total_orders: 0,
            total_spent: Money::zero(),
        };
        for user in users {
            stats.total += 1;
            if user.is_active() {
                stats.active += 1;
            }
            if user.role == Role::Admin {
                stats.admins += 1;
            }
            stats.total_orders += u64::from(user.orders);
            stats.total_spent += user.total_spent;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn order(id: u64, cents: i64, status: OrderStatus) -> Order {
        Order {
            id,
            customer: "C".to_string(),
            email: "c@example.com".to_string(),
            amount: Money::from_cents(cents),
            status,
            items: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 13).unwrap(),
        }
    }

    #[test]
    fn test_revenue_excludes_cancelled() {
        let orders = vec![
            order(1, 29999, OrderStatus::Completed),
            order(2, 19999, OrderStatus::Processing),
            order(3, 50000, OrderStatus::Cancelled),
        ];
        let stats = DashboardStats::compute(&[], &[], &orders);

        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.total_revenue.cents(), 49998);
        assert_eq!(stats.orders_by_status[&OrderStatus::Cancelled], 1);
        assert_eq!(stats.orders_by_status[&OrderStatus::Shipped], 0);
    }

    #[test]
    fn test_user_stats_on_empty_input() {
        let stats = UserStats::compute(&Vec::<User>::new());
        assert_eq!(stats.total, 0);
        assert!(stats.total_spent.is_zero());
    }
}
