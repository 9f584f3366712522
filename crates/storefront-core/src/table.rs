//! # Table Views
//!
//! The admin dashboard's searchable, filterable, sortable, multi-select
//! tables over users, products and orders.
//!
//! ## State Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TableView<T: TableRow>                                                 │
//! │                                                                         │
//! │  rows ──► search ∧ filter ──► sort (column, direction) ──► visible()    │
//! │                                                                         │
//! │  selected: BTreeSet<Key>                                                │
//! │     │                                                                   │
//! │     ├── activate_selected()    applied at once                          │
//! │     ├── deactivate_selected()  ─┐                                       │
//! │     ├── delete_selected()       ├─► PendingAction ──► confirm() │ drop  │
//! │     └── delete_row(key)        ─┘   (rows untouched until confirmed)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::catalog::CategoryFilter;
use crate::error::ValidationError;
use crate::export::{to_csv, CsvRecord};
use crate::types::{Order, OrderStatus, Product, Role, User, UserStatus};

// =============================================================================
// Row Trait
// =============================================================================

/// A record that can be shown in a [`TableView`].
pub trait TableRow: Clone {
    type Key: Ord + Clone + fmt::Debug;
    type Column: Copy + Eq + fmt::Debug + fmt::Display;
    type Filter: Default + Clone + fmt::Debug;

    /// Singular and plural noun for confirmation prompts.
    const NOUN: (&'static str, &'static str);

    fn key(&self) -> Self::Key;

    /// `needle` is already lowercased and non-empty.
    fn matches_search(&self, needle: &str) -> bool;

    fn passes(&self, filter: &Self::Filter) -> bool;

    fn compare(&self, other: &Self, column: Self::Column) -> Ordering;

    /// Sort applied before the user clicks any header.
    fn default_sort() -> Option<SortState<Self::Column>> {
        None
    }

    /// Flips the row's active flag. Rows without one return `false`.
    fn set_active(&mut self, _active: bool) -> bool {
        false
    }
}

// =============================================================================
// Sorting
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<C> {
    pub column: C,
    pub direction: SortDirection,
}

// =============================================================================
// Pending (Confirmation-Gated) Actions
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Delete,
    Deactivate,
}

/// A destructive action waiting for confirmation.
///
/// Nothing changes until it is passed to [`TableView::confirm`]. Dropping
/// it (or calling [`PendingAction::cancel`]) cancels.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending action does nothing until confirmed"]
pub struct PendingAction<K> {
    pub kind: BulkAction,
    pub keys: Vec<K>,
    prompt: String,
}

impl<K> PendingAction<K> {
    /// Question to show the user, e.g. "Delete 3 users?".
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn cancel(self) {}
}

// =============================================================================
// Table View
// =============================================================================

#[derive(Debug, Clone)]
pub struct TableView<T: TableRow> {
    rows: Vec<T>,
    search: String,
    filter: T::Filter,
    sort: Option<SortState<T::Column>>,
    selected: BTreeSet<T::Key>,
}

impl<T: TableRow> TableView<T> {
    pub fn new(rows: Vec<T>) -> Self {
        TableView {
            rows,
            search: String::new(),
            filter: T::Filter::default(),
            sort: T::default_sort(),
            selected: BTreeSet::new(),
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn total(&self) -> usize {
        self.rows.len()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn filter(&self) -> &T::Filter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: T::Filter) {
        self.filter = filter;
    }

    pub fn sort(&self) -> Option<SortState<T::Column>> {
        self.sort
    }

    /// Header click: the active column flips direction, a new column starts ascending.
    pub fn sort_by(&mut self, column: T::Column) {
        self.sort = Some(match self.sort {
            Some(state) if state.column == column => SortState {
                column,
                direction: state.direction.toggled(),
            },
            _ => SortState {
                column,
                direction: SortDirection::Ascending,
            },
        });
    }

    /// Rows passing the search and filter, in display order.
    pub fn visible(&self) -> Vec<&T> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<&T> = self
            .rows
            .iter()
            .filter(|row| needle.is_empty() || row.matches_search(&needle))
            .filter(|row| row.passes(&self.filter))
            .collect();

        if let Some(SortState { column, direction }) = self.sort {
            rows.sort_by(|a, b| {
                let ord = a.compare(b, column);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        rows
    }

    /// "Showing N of M".
    pub fn visible_count(&self) -> usize {
        self.visible().len()
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.rows.iter().find(|row| &row.key() == key)
    }

    /// Applies `change` to the row with `key`. Returns `false` if absent.
    pub fn update<F: FnOnce(&mut T)>(&mut self, key: &T::Key, change: F) -> bool {
        match self.rows.iter_mut().find(|row| &row.key() == key) {
            Some(row) => {
                change(row);
                true
            }
            None => false,
        }
    }

    /// Replaces the row with the same key, or appends it.
    pub fn upsert(&mut self, row: T) {
        let key = row.key();
        match self.rows.iter_mut().find(|existing| existing.key() == key) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Toggles one row's selection; returns whether it is now selected.
    pub fn toggle_select(&mut self, key: T::Key) -> bool {
        if self.selected.remove(&key) {
            false
        } else {
            self.selected.insert(key);
            true
        }
    }

    /// The header checkbox: checked selects exactly the visible rows,
    /// unchecked clears the selection.
    pub fn select_all_visible(&mut self, checked: bool) {
        self.selected = if checked {
            self.visible().iter().map(|row| row.key()).collect()
        } else {
            BTreeSet::new()
        };
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, key: &T::Key) -> bool {
        self.selected.contains(key)
    }

    pub fn selected(&self) -> impl Iterator<Item = &T::Key> {
        self.selected.iter()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    // -------------------------------------------------------------------------
    // Bulk Actions
    // -------------------------------------------------------------------------

    /// Marks every selected row active and clears the selection.
    ///
    /// Returns the number of rows changed.
    pub fn activate_selected(&mut self) -> usize {
        let changed = self.apply_active(true);
        self.selected.clear();
        changed
    }

    /// Asks to deactivate the selection. `None` when nothing is selected.
    pub fn deactivate_selected(&self) -> Option<PendingAction<T::Key>> {
        self.pending_for_selection(BulkAction::Deactivate, "Deactivate")
    }

    /// Asks to delete the selection. `None` when nothing is selected.
    pub fn delete_selected(&self) -> Option<PendingAction<T::Key>> {
        self.pending_for_selection(BulkAction::Delete, "Delete")
    }

    /// Asks to delete one row. `None` if no row has `key`.
    pub fn delete_row(&self, key: &T::Key) -> Option<PendingAction<T::Key>> {
        self.get(key)?;
        Some(PendingAction {
            kind: BulkAction::Delete,
            keys: vec![key.clone()],
            prompt: format!("Are you sure you want to delete this {}?", T::NOUN.0),
        })
    }

    /// Applies a confirmed action and clears the selection.
    ///
    /// Returns the number of rows affected.
    pub fn confirm(&mut self, action: PendingAction<T::Key>) -> usize {
        let keys: BTreeSet<T::Key> = action.keys.into_iter().collect();
        let affected = match action.kind {
            BulkAction::Delete => {
                let before = self.rows.len();
                self.rows.retain(|row| !keys.contains(&row.key()));
                before - self.rows.len()
            }
            BulkAction::Deactivate => self
                .rows
                .iter_mut()
                .filter(|row| keys.contains(&row.key()))
                .map(|row| row.set_active(false))
                .filter(|changed| *changed)
                .count(),
        };
        self.selected.clear();
        affected
    }

    fn pending_for_selection(&self, kind: BulkAction, verb: &str) -> Option<PendingAction<T::Key>> {
        if self.selected.is_empty() {
            return None;
        }
        let count = self.selected.len();
        let noun = if count == 1 { T::NOUN.0 } else { T::NOUN.1 };
        Some(PendingAction {
            kind,
            keys: self.selected.iter().cloned().collect(),
            prompt: format!("{} {} {}?", verb, count, noun),
        })
    }

    fn apply_active(&mut self, active: bool) -> usize {
        let selected = &self.selected;
        self.rows
            .iter_mut()
            .filter(|row| selected.contains(&row.key()))
            .map(|row| row.set_active(active))
            .filter(|changed| *changed)
            .count()
    }
}

impl<T: TableRow + CsvRecord> TableView<T> {
    /// CSV of the visible rows (not the whole collection).
    pub fn export_csv(&self) -> String {
        to_csv(self.visible())
    }
}

// =============================================================================
// Column Parsing
// =============================================================================

macro_rules! column_names {
    ($ty:ident, $field:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
                    .ok_or_else(|| ValidationError::not_allowed($field, $ty::ALL.iter()))
            }
        }
    };
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    Name,
    Email,
    Role,
    Status,
    Orders,
    TotalSpent,
    CreatedAt,
}

column_names!(UserColumn, "column", {
    Name => "name",
    Email => "email",
    Role => "role",
    Status => "status",
    Orders => "orders",
    TotalSpent => "total-spent",
    CreatedAt => "created-at",
});

/// Role and status selectors; `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

impl TableRow for User {
    type Key = u64;
    type Column = UserColumn;
    type Filter = UserFilter;

    const NOUN: (&'static str, &'static str) = ("user", "users");

    fn key(&self) -> u64 {
        self.id
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.email.to_lowercase().contains(needle)
            || self.phone.to_lowercase().contains(needle)
    }

    fn passes(&self, filter: &UserFilter) -> bool {
        filter.role.map_or(true, |role| self.role == role)
            && filter.status.map_or(true, |status| self.status == status)
    }

    fn compare(&self, other: &Self, column: UserColumn) -> Ordering {
        match column {
            UserColumn::Name => self.name.to_lowercase().cmp(&other.name.to_lowercase()),
            UserColumn::Email => self.email.to_lowercase().cmp(&other.email.to_lowercase()),
            UserColumn::Role => self.role.as_str().cmp(other.role.as_str()),
            UserColumn::Status => self.status.as_str().cmp(other.status.as_str()),
            UserColumn::Orders => self.orders.cmp(&other.orders),
            UserColumn::TotalSpent => self.total_spent.cmp(&other.total_spent),
            UserColumn::CreatedAt => self.created_at.cmp(&other.created_at),
        }
    }

    fn default_sort() -> Option<SortState<UserColumn>> {
        Some(SortState {
            column: UserColumn::CreatedAt,
            direction: SortDirection::Descending,
        })
    }

    fn set_active(&mut self, active: bool) -> bool {
        let status = if active {
            UserStatus::Active
        } else {
            UserStatus::Inactive
        };
        let changed = self.status != status;
        self.status = status;
        changed
    }
}

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductColumn {
    Name,
    Category,
    Price,
    Stock,
}

column_names!(ProductColumn, "column", {
    Name => "name",
    Category => "category",
    Price => "price",
    Stock => "stock",
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: CategoryFilter,
}

impl TableRow for Product {
    type Key = u64;
    type Column = ProductColumn;
    type Filter = ProductFilter;

    const NOUN: (&'static str, &'static str) = ("product", "products");

    fn key(&self) -> u64 {
        self.id
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .sku
                .as_deref()
                .is_some_and(|sku| sku.to_lowercase().contains(needle))
    }

    fn passes(&self, filter: &ProductFilter) -> bool {
        filter.category.matches(&self.category)
    }

    fn compare(&self, other: &Self, column: ProductColumn) -> Ordering {
        match column {
            ProductColumn::Name => self.name.to_lowercase().cmp(&other.name.to_lowercase()),
            ProductColumn::Category => self.category.cmp(&other.category),
            ProductColumn::Price => self.price.cmp(&other.price),
            ProductColumn::Stock => self.stock.cmp(&other.stock),
        }
    }
}

// =============================================================================
// Orders
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderColumn {
    Customer,
    Amount,
    Status,
    Date,
}

column_names!(OrderColumn, "column", {
    Customer => "customer",
    Amount => "amount",
    Status => "status",
    Date => "date",
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}

impl TableRow for Order {
    type Key = u64;
    type Column = OrderColumn;
    type Filter = OrderFilter;

    const NOUN: (&'static str, &'static str) = ("order", "orders");

    fn key(&self) -> u64 {
        self.id
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.customer.to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }

    fn passes(&self, filter: &OrderFilter) -> bool {
        filter.status.map_or(true, |status| self.status == status)
    }

    fn compare(&self, other: &Self, column: OrderColumn) -> Ordering {
        match column {
            OrderColumn::Customer => self
                .customer
                .to_lowercase()
                .cmp(&other.customer.to_lowercase()),
            OrderColumn::Amount => self.amount.cmp(&other.amount),
            OrderColumn::Status => self.status.cmp(&other.status),
            OrderColumn::Date => self.date.cmp(&other.date),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::{Duration, TimeZone, Utc};

    fn users() -> Vec<User> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        (1..=6)
            .map(|i| User {
                id: i,
                name: format!("User {}", i),
                email: format!("user{}@example.com", i),
                phone: format!("+1 555000{:04}", i),
                role: if i % 3 == 0 { Role::Admin } else { Role::User },
                status: if i % 2 == 0 {
                    UserStatus::Inactive
                } else {
                    UserStatus::Active
                },
                created_at: base + Duration::days(i as i64),
                last_login: None,
                orders: (i * 7 % 5) as u32,
                total_spent: Money::from_dollars(i as i64 * 100),
            })
            .collect()
    }

    fn ids<T: TableRow<Key = u64>>(rows: &[&T]) -> Vec<u64> {
        rows.iter().map(|r| r.key()).collect()
    }

    #[test]
    fn test_users_default_to_newest_first() {
        let table = TableView::new(users());
        assert_eq!(ids(&table.visible()), vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_sort_toggle() {
        let mut table = TableView::new(users());
        table.sort_by(UserColumn::TotalSpent);
        assert_eq!(table.sort().map(|s| s.direction), Some(SortDirection::Ascending));
        assert_eq!(ids(&table.visible()), vec![1, 2, 3, 4, 5, 6]);

        table.sort_by(UserColumn::TotalSpent);
        assert_eq!(ids(&table.visible()), vec![6, 5, 4, 3, 2, 1]);

        table.sort_by(UserColumn::Name);
        assert_eq!(table.sort().map(|s| s.direction), Some(SortDirection::Ascending));
    }

    #[test]
    fn test_search_and_filters() {
        let mut table = TableView::new(users());
        table.set_search("USER3@");
        assert_eq!(ids(&table.visible()), vec![3]);

        table.set_search("");
        table.set_filter(UserFilter {
            role: Some(Role::Admin),
            status: None,
        });
        assert_eq!(ids(&table.visible()), vec![6, 3]);

        table.set_filter(UserFilter {
            role: Some(Role::Admin),
            status: Some(UserStatus::Active),
        });
        assert_eq!(ids(&table.visible()), vec![3]);
        assert_eq!(table.visible_count(), 1);
        assert_eq!(table.total(), 6);
    }

    #[test]
    fn test_select_all_is_scoped_to_visible_rows() {
        let mut table = TableView::new(users());
        table.set_filter(UserFilter {
            role: None,
            status: Some(UserStatus::Inactive),
        });
        table.select_all_visible(true);
        let selected: Vec<u64> = table.selected().copied().collect();
        assert_eq!(selected, vec![2, 4, 6]);

        table.select_all_visible(false);
        assert_eq!(table.selected_count(), 0);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut table = TableView::new(users());
        table.toggle_select(1);
        table.toggle_select(2);

        let pending = table.delete_selected().unwrap();
        assert_eq!(pending.prompt(), "Delete 2 users?");
        pending.cancel();
        assert_eq!(table.total(), 6);
        assert_eq!(table.selected_count(), 2);

        let pending = table.delete_selected().unwrap();
        assert_eq!(table.confirm(pending), 2);
        assert_eq!(table.total(), 4);
        assert!(table.get(&1).is_none());
        assert_eq!(table.selected_count(), 0);
    }

    #[test]
    fn test_activate_and_deactivate() {
        let mut table = TableView::new(users());
        table.toggle_select(2);
        table.toggle_select(4);
        assert_eq!(table.activate_selected(), 2);
        assert!(table.get(&2).unwrap().is_active());
        assert_eq!(table.selected_count(), 0);

        assert!(table.deactivate_selected().is_none());
        table.toggle_select(1);
        let pending = table.deactivate_selected().unwrap();
        assert_eq!(pending.prompt(), "Deactivate 1 user?");
        assert!(table.get(&1).unwrap().is_active());
        assert_eq!(table.confirm(pending), 1);
        assert!(!table.get(&1).unwrap().is_active());
    }

    #[test]
    fn test_single_row_delete() {
        let mut table = TableView::new(users());
        assert!(table.delete_row(&99).is_none());

        let pending = table.delete_row(&3).unwrap();
        assert_eq!(pending.prompt(), "Are you sure you want to delete this user?");
        drop(pending);
        assert!(table.get(&3).is_some());

        let pending = table.delete_row(&3).unwrap();
        table.confirm(pending);
        assert!(table.get(&3).is_none());
    }

    #[test]
    fn test_export_uses_visible_rows() {
        let mut table = TableView::new(users());
        table.set_search("user1@");
        let csv = table.export_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("User 1,user1@example.com,"));
        assert!(lines[1].ends_with(",$100.00,2024-01-02"));
    }

    #[test]
    fn test_order_status_update_and_filter() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let orders: Vec<Order> = OrderStatus::ALL
            .iter()
            .enumerate()
            .map(|(i, status)| Order {
                id: i as u64 + 1,
                customer: format!("Customer {}", i + 1),
                email: format!("c{}@example.com", i + 1),
                amount: Money::from_cents(1000),
                status: *status,
                items: 1,
                date,
            })
            .collect();
        let mut table = TableView::new(orders);

        assert!(table.update(&1, |o| o.status = OrderStatus::Shipped));
        assert!(!table.update(&42, |o| o.status = OrderStatus::Shipped));

        table.set_filter(OrderFilter {
            status: Some(OrderStatus::Shipped),
        });
        assert_eq!(ids(&table.visible()), vec![1, 3]);
    }

    #[test]
    fn test_column_parse() {
        assert_eq!("total-spent".parse::<UserColumn>().unwrap(), UserColumn::TotalSpent);
        assert_eq!("Price".parse::<ProductColumn>().unwrap(), ProductColumn::Price);
        assert!("size".parse::<OrderColumn>().is_err());
    }
}
