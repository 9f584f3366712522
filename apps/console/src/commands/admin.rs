//! # Admin Commands
//!
//! Everything under `storefront admin`. Every command first passes the
//! access gate (admin role required).
//!
//! ## Destructive Actions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  storefront admin users deactivate 3 4                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TableView::deactivate_selected() ──► PendingAction "Deactivate 2 users?"│
//! │       │                                                                 │
//! │       ├── without --yes ──► prompt printed, pending dropped (cancel),   │
//! │       │                     nothing changes, exit 0                     │
//! │       │                                                                 │
//! │       └── with --yes ─────► TableView::confirm(pending)                 │
//! │                                                                         │
//! │  Activate is not destructive and applies immediately.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Table Arguments
//! Search and filters describe the current command only (absent means
//! "all"). Each `--sort COLUMN` is a header click, so in the shell
//! repeating it flips the direction. Row selection is rebuilt from the
//! command's ids and `--all` every time.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use storefront_core::access::Requirement;
use storefront_core::catalog::CategoryFilter;
use storefront_core::export::export_file_name;
use storefront_core::stats::{DashboardStats, UserStats};
use storefront_core::table::{
    OrderFilter, PendingAction, ProductFilter, SortState, TableRow, TableView, UserFilter,
};
use storefront_core::validation::ProductForm;
use storefront_core::{
    CoreError, Order, OrderStatus, Product, User, ValidationError, ALL_CATEGORIES,
};
use tracing::{debug, info};

use super::{render, truncate, Flags};
use crate::cli::{
    AdminAction, AdminOrderAction, AdminProductAction, AdminUserAction, ExportTarget,
    OrderTableArgs, OutputArgs, ProductFormArgs, ProductTableArgs, UserSelection, UserTableArgs,
};
use crate::error::ApiError;
use crate::state::{AppState, Dashboard};

// =============================================================================
// Dispatch
// =============================================================================

pub async fn execute(
    app: &AppState,
    action: AdminAction,
    flags: Flags,
) -> Result<String, ApiError> {
    let Flags { yes, json } = flags;
    match action {
        AdminAction::Stats => render(&stats(app).await?, json),
        AdminAction::Products { action } => match action {
            AdminProductAction::List(args) => render(&list_products(app, &args).await?, json),
            AdminProductAction::Add(form) => {
                render(&save_product(app, None, &form, Utc::now()).await?, json)
            }
            AdminProductAction::Edit { id, form } => {
                render(&save_product(app, Some(id), &form, Utc::now()).await?, json)
            }
            AdminProductAction::Delete { id } => render(&delete_product(app, id, yes).await?, json),
        },
        AdminAction::Orders { action } => match action {
            AdminOrderAction::List(args) => render(&list_orders(app, &args).await?, json),
            AdminOrderAction::Status { id, status } => {
                render(&set_order_status(app, id, status).await?, json)
            }
            AdminOrderAction::Delete { id } => render(&delete_order(app, id, yes).await?, json),
        },
        AdminAction::Users { action } => match action {
            AdminUserAction::List(args) => render(&list_users(app, &args).await?, json),
            AdminUserAction::Activate(selection) => {
                render(&activate_users(app, &selection).await?, json)
            }
            AdminUserAction::Deactivate(selection) => {
                render(&deactivate_users(app, &selection, yes).await?, json)
            }
            AdminUserAction::Delete(selection) => {
                render(&delete_users(app, &selection, yes).await?, json)
            }
        },
        AdminAction::Export { target } => {
            let today = Utc::now().date_naive();
            let exported = export(app, &target, today).await?;
            render(&exported, json)
        }
    }
}

/// Gate, then run `f` against the dashboard.
async fn with_admin<F, R>(app: &AppState, f: F) -> Result<R, ApiError>
where
    F: FnOnce(&mut Dashboard) -> Result<R, ApiError>,
{
    app.session.require(Requirement::AdminOnly).await?;
    app.with_dashboard(f).await?
}

// =============================================================================
// Responses
// =============================================================================

/// Outcome of a confirmation-gated action.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ActionOutcome {
    Applied { affected: usize, message: String },
    Cancelled { prompt: String },
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Applied { message, .. } => f.write_str(message),
            ActionOutcome::Cancelled { prompt } => write!(
                f,
                "{}\nNothing changed. Re-run with --yes to confirm.",
                prompt
            ),
        }
    }
}

/// Confirms `pending` when `yes`, otherwise cancels it.
fn settle<T: TableRow>(
    table: &mut TableView<T>,
    pending: PendingAction<T::Key>,
    yes: bool,
    applied: impl FnOnce(usize) -> String,
) -> ActionOutcome {
    if !yes {
        let prompt = pending.prompt().to_string();
        pending.cancel();
        debug!(%prompt, "Destructive action not confirmed");
        return ActionOutcome::Cancelled { prompt };
    }
    let affected = table.confirm(pending);
    ActionOutcome::Applied {
        affected,
        message: applied(affected),
    }
}

/// Filtered rows of one admin table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableResponse<T> {
    pub showing: usize,
    pub total: usize,
    pub rows: Vec<T>,
    #[serde(skip)]
    noun: &'static str,
    #[serde(skip)]
    sort: Option<String>,
    #[serde(skip)]
    lines: Vec<String>,
}

impl<T: TableRow + Serialize> TableResponse<T> {
    fn new(table: &TableView<T>, line: impl Fn(&T) -> String) -> Self {
        let visible = table.visible();
        TableResponse {
            showing: visible.len(),
            total: table.total(),
            lines: visible.iter().map(|row| line(row)).collect(),
            rows: visible.into_iter().cloned().collect(),
            noun: T::NOUN.1,
            sort: table.sort().map(|SortState { column, direction }| {
                format!("{} {}", column, direction.arrow())
            }),
        }
    }
}

impl<T> fmt::Display for TableResponse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Showing {} of {} {}", self.showing, self.total, self.noun)?;
        if let Some(sort) = &self.sort {
            write!(f, "  (sorted by {})", sort)?;
        }
        for line in &self.lines {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}

fn product_line(p: &Product) -> String {
    format!(
        "{:>5}  {:<30} {:<16} {:>10} {:>5}  {}",
        p.id,
        truncate(&p.name, 30),
        truncate(&p.category, 16),
        p.price.to_string(),
        p.stock,
        p.sku.as_deref().unwrap_or("-")
    )
}

fn order_line(o: &Order) -> String {
    format!(
        "{:>5}  {:<18} {:<24} {:>10}  {:<10} {:>3} item(s)  {}",
        o.id,
        truncate(&o.customer, 18),
        truncate(&o.email, 24),
        o.amount.to_string(),
        o.status.as_str(),
        o.items,
        o.date
    )
}

fn user_line(u: &User) -> String {
    format!(
        "{:>4}  {:<20} {:<28} {:<9} {:<8} {:>4} {:>11}  {}",
        u.id,
        truncate(&u.name, 20),
        truncate(&u.email, 28),
        u.role.as_str(),
        u.status.as_str(),
        u.orders,
        u.total_spent.to_string(),
        u.created_at.format("%Y-%m-%d")
    )
}

// =============================================================================
// Stats
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub dashboard: DashboardStats,
    pub users: UserStats,
}

impl fmt::Display for StatsResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.dashboard;
        writeln!(f, "Products   {}", d.total_products)?;
        writeln!(
            f,
            "Users      {} ({} active, {} admins)",
            d.total_users, self.users.active, self.users.admins
        )?;
        writeln!(f, "Orders     {}", d.total_orders)?;
        write!(f, "Revenue    {}", d.total_revenue)?;
        for (status, count) in &d.orders_by_status {
            write!(f, "\n  {:<11}{}", status.as_str(), count)?;
        }
        Ok(())
    }
}

pub async fn stats(app: &AppState) -> Result<StatsResponse, ApiError> {
    with_admin(app, |d| {
        Ok(StatsResponse {
            dashboard: d.stats(),
            users: d.user_stats(),
        })
    })
    .await
}

// =============================================================================
// Products
// =============================================================================

fn apply_product_args(table: &mut TableView<Product>, args: &ProductTableArgs) {
    table.set_search(args.search.clone().unwrap_or_default());
    table.set_filter(ProductFilter {
        category: CategoryFilter::from(args.category.as_deref().unwrap_or(ALL_CATEGORIES)),
    });
    for column in &args.sort {
        table.sort_by(*column);
    }
}

pub async fn list_products(
    app: &AppState,
    args: &ProductTableArgs,
) -> Result<TableResponse<Product>, ApiError> {
    with_admin(app, |d| {
        apply_product_args(&mut d.products, args);
        Ok(TableResponse::new(&d.products, product_line))
    })
    .await
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductSaved {
    pub created: bool,
    pub product: Product,
}

impl fmt::Display for ProductSaved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.created { "added" } else { "updated" };
        write!(f, "Product {} successfully!\n{}", verb, product_line(&self.product))
    }
}

/// Creates (`id = None`) or edits a product from form arguments.
///
/// Editing starts from the product's current values; only the given
/// arguments change. Choosing a category clears the brand, so a new
/// category needs a new `--brand` (except `other`).
pub async fn save_product(
    app: &AppState,
    id: Option<u64>,
    args: &ProductFormArgs,
    now: DateTime<Utc>,
) -> Result<ProductSaved, ApiError> {
    let image = match &args.image_file {
        Some(path) => Some(read_image(path).await?),
        None => None,
    };

    with_admin(app, |d| {
        let mut form = match id {
            Some(id) => ProductForm::edit(d.product(id)?),
            None => ProductForm::new(),
        };
        fill_form(&mut form, args)?;
        if let Some((mime, bytes)) = &image {
            form.attach_image(mime, bytes);
        }

        let product = d.save_product(&form, now)?;
        info!(product_id = product.id, created = id.is_none(), "Product saved");
        Ok(ProductSaved {
            created: id.is_none(),
            product,
        })
    })
    .await
}

fn fill_form(form: &mut ProductForm, args: &ProductFormArgs) -> Result<(), ValidationError> {
    if let Some(name) = &args.name {
        form.name = name.clone();
    }
    if let Some(description) = &args.description {
        form.description = description.clone();
    }
    if let Some(price) = &args.price {
        form.price = price.clone();
    }
    if let Some(stock) = &args.stock {
        form.stock = stock.clone();
    }
    if let Some(category) = &args.category {
        form.set_category(category.trim());
    }
    if let Some(brand) = &args.brand {
        let offered = form.available_brands();
        if !offered.is_empty() && !offered.contains(&brand.trim()) {
            return Err(ValidationError::not_allowed("brand", offered.iter()));
        }
        form.set_brand(brand.trim());
    }
    if let Some(image) = &args.image {
        form.image = image.clone();
    }
    if let Some(featured) = args.featured {
        form.featured = featured;
    }
    if let Some(sku) = &args.sku {
        form.sku = sku.clone();
    }
    for (key, value) in &args.specs {
        form.specifications.insert(key.clone(), value.clone());
    }
    Ok(())
}

const IMAGE_TYPES: [(&str, &str); 6] = [
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
];

async fn read_image(path: &Path) -> Result<(&'static str, Vec<u8>), ApiError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let mime = IMAGE_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
        .ok_or_else(|| {
            ValidationError::not_allowed("image file", IMAGE_TYPES.iter().map(|(ext, _)| ext))
        })?;
    let bytes = tokio::fs::read(path).await?;
    Ok((mime, bytes))
}

pub async fn delete_product(app: &AppState, id: u64, yes: bool) -> Result<ActionOutcome, ApiError> {
    with_admin(app, |d| {
        let pending = d
            .products
            .delete_row(&id)
            .ok_or(CoreError::ProductNotFound(id))?;
        Ok(settle(&mut d.products, pending, yes, |_| {
            "Product deleted successfully!".to_string()
        }))
    })
    .await
}

// =============================================================================
// Orders
// =============================================================================

fn apply_order_args(table: &mut TableView<Order>, args: &OrderTableArgs) {
    table.set_search(args.search.clone().unwrap_or_default());
    table.set_filter(OrderFilter {
        status: args.status,
    });
    for column in &args.sort {
        table.sort_by(*column);
    }
}

pub async fn list_orders(
    app: &AppState,
    args: &OrderTableArgs,
) -> Result<TableResponse<Order>, ApiError> {
    with_admin(app, |d| {
        apply_order_args(&mut d.orders, args);
        Ok(TableResponse::new(&d.orders, order_line))
    })
    .await
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderUpdated {
    pub order: Order,
}

impl fmt::Display for OrderUpdated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order {} is now {}\n{}",
            self.order.id,
            self.order.status,
            order_line(&self.order)
        )
    }
}

pub async fn set_order_status(
    app: &AppState,
    id: u64,
    status: OrderStatus,
) -> Result<OrderUpdated, ApiError> {
    with_admin(app, |d| {
        d.set_order_status(id, status)?;
        let order = d.orders.get(&id).cloned().ok_or(CoreError::OrderNotFound(id))?;
        Ok(OrderUpdated { order })
    })
    .await
}

pub async fn delete_order(app: &AppState, id: u64, yes: bool) -> Result<ActionOutcome, ApiError> {
    with_admin(app, |d| {
        let pending = d.orders.delete_row(&id).ok_or(CoreError::OrderNotFound(id))?;
        Ok(settle(&mut d.orders, pending, yes, |_| {
            "Order deleted successfully!".to_string()
        }))
    })
    .await
}

// =============================================================================
// Users
// =============================================================================

fn apply_user_args(table: &mut TableView<User>, args: &UserTableArgs) {
    table.set_search(args.search.clone().unwrap_or_default());
    table.set_filter(UserFilter {
        role: args.role,
        status: args.status,
    });
    for column in &args.sort {
        table.sort_by(*column);
    }
}

/// User table plus the summary cards shown above it.
#[derive(Debug, Clone, Serialize)]
pub struct UserTableResponse {
    #[serde(flatten)]
    pub table: TableResponse<User>,
    pub stats: UserStats,
}

impl fmt::Display for UserTableResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Total {}  Active {}  Admins {}  Orders {}  Spent {}",
            self.stats.total,
            self.stats.active,
            self.stats.admins,
            self.stats.total_orders,
            self.stats.total_spent
        )?;
        write!(f, "{}", self.table)
    }
}

pub async fn list_users(
    app: &AppState,
    args: &UserTableArgs,
) -> Result<UserTableResponse, ApiError> {
    with_admin(app, |d| {
        apply_user_args(&mut d.users, args);
        Ok(UserTableResponse {
            table: TableResponse::new(&d.users, user_line),
            stats: d.user_stats(),
        })
    })
    .await
}

/// Rebuilds the selection: `--all` selects every visible row, then each
/// id toggles (so `--all 3` means everyone visible except user 3).
fn select_users(table: &mut TableView<User>, selection: &UserSelection) -> Result<(), ApiError> {
    apply_user_args(table, &selection.table);
    table.clear_selection();
    if selection.all {
        table.select_all_visible(true);
    }
    for id in &selection.ids {
        if table.get(id).is_none() {
            return Err(CoreError::UserNotFound(*id).into());
        }
        table.toggle_select(*id);
    }
    if table.selected_count() == 0 {
        return Err(ApiError::validation("No users selected"));
    }
    Ok(())
}

pub async fn activate_users(
    app: &AppState,
    selection: &UserSelection,
) -> Result<ActionOutcome, ApiError> {
    with_admin(app, |d| {
        select_users(&mut d.users, selection)?;
        let affected = d.users.activate_selected();
        info!(affected, "Users activated");
        Ok(ActionOutcome::Applied {
            affected,
            message: format!("Activated {} user(s)", affected),
        })
    })
    .await
}

pub async fn deactivate_users(
    app: &AppState,
    selection: &UserSelection,
    yes: bool,
) -> Result<ActionOutcome, ApiError> {
    with_admin(app, |d| {
        select_users(&mut d.users, selection)?;
        let pending = d
            .users
            .deactivate_selected()
            .ok_or_else(|| ApiError::validation("No users selected"))?;
        Ok(settle(&mut d.users, pending, yes, |n| {
            format!("Deactivated {} user(s)", n)
        }))
    })
    .await
}

/// A single id without `--all` asks about "this user"; anything else is
/// a bulk delete of the selection.
pub async fn delete_users(
    app: &AppState,
    selection: &UserSelection,
    yes: bool,
) -> Result<ActionOutcome, ApiError> {
    with_admin(app, |d| {
        select_users(&mut d.users, selection)?;
        let pending = match selection.ids.as_slice() {
            [id] if !selection.all => d.users.delete_row(id),
            _ => d.users.delete_selected(),
        }
        .ok_or_else(|| ApiError::validation("No users selected"))?;
        Ok(settle(&mut d.users, pending, yes, |n| format!("Deleted {} user(s)", n)))
    })
    .await
}

// =============================================================================
// Export
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ExportResponse {
    pub rows: usize,
    /// File written, when `--output` was given.
    pub path: Option<PathBuf>,
    /// The CSV itself, when written to stdout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv: Option<String>,
}

impl fmt::Display for ExportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.csv, &self.path) {
            (Some(csv), _) => f.write_str(csv),
            (None, Some(path)) => write!(f, "Exported {} row(s) to {}", self.rows, path.display()),
            (None, None) => write!(f, "Exported {} row(s)", self.rows),
        }
    }
}

/// CSV of the filtered table (not the whole collection).
pub async fn export(
    app: &AppState,
    target: &ExportTarget,
    today: NaiveDate,
) -> Result<ExportResponse, ApiError> {
    let (prefix, rows, csv, output) = with_admin(app, |d| {
        Ok(match target {
            ExportTarget::Users { table, output } => {
                apply_user_args(&mut d.users, table);
                ("users", d.users.visible_count(), d.users.export_csv(), output)
            }
            ExportTarget::Products { table, output } => {
                apply_product_args(&mut d.products, table);
                ("products", d.products.visible_count(), d.products.export_csv(), output)
            }
            ExportTarget::Orders { table, output } => {
                apply_order_args(&mut d.orders, table);
                ("orders", d.orders.visible_count(), d.orders.export_csv(), output)
            }
        })
    })
    .await?;

    let Some(path) = destination(output, prefix, today).await else {
        return Ok(ExportResponse {
            rows,
            path: None,
            csv: Some(csv),
        });
    };
    tokio::fs::write(&path, csv).await?;
    info!(path = %path.display(), rows, "Exported {}", prefix);
    Ok(ExportResponse {
        rows,
        path: Some(path),
        csv: None,
    })
}

/// `--output DIR` gets a dated file name such as `users-2024-01-15.csv`.
async fn destination(output: &OutputArgs, prefix: &str, today: NaiveDate) -> Option<PathBuf> {
    let path = output.output.as_ref()?;
    let is_dir = tokio::fs::metadata(path).await.is_ok_and(|meta| meta.is_dir());
    if is_dir {
        Some(path.join(export_file_name(prefix, today)))
    } else {
        Some(path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::testing::{app, app_as};
    use chrono::TimeZone;
    use storefront_core::table::UserColumn;
    use storefront_core::{Role, UserStatus};

    fn users(ids: &[u64]) -> UserSelection {
        UserSelection {
            ids: ids.to_vec(),
            ..UserSelection::default()
        }
    }

    fn lamp() -> ProductFormArgs {
        ProductFormArgs {
            name: Some("Desk Lamp".to_string()),
            description: Some("Adjustable LED lamp".to_string()),
            price: Some("49.99".to_string()),
            stock: Some("12".to_string()),
            category: Some("home-decoration".to_string()),
            brand: Some("IKEA".to_string()),
            image: Some("https://example.com/lamp.png".to_string()),
            ..ProductFormArgs::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn test_gate() {
        let err = stats(&app().await).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);

        let err = stats(&app_as(Role::User).await).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);

        assert!(stats(&app_as(Role::Admin).await).await.is_ok());
    }

    #[tokio::test]
    async fn test_deactivate_needs_confirmation() {
        let app = app_as(Role::Admin).await;
        let before = list_users(&app, &UserTableArgs::default()).await.unwrap();
        assert_eq!(before.stats.total, 20);

        // users 1 and 2 are active in the demo data
        let outcome = deactivate_users(&app, &users(&[1, 2]), false).await.unwrap();
        let ActionOutcome::Cancelled { prompt } = &outcome else {
            panic!("expected a prompt");
        };
        assert_eq!(prompt, "Deactivate 2 users?");
        assert!(outcome.to_string().contains("--yes"));
        let unchanged = list_users(&app, &UserTableArgs::default()).await.unwrap();
        assert_eq!(unchanged.stats.active, before.stats.active);

        let outcome = deactivate_users(&app, &users(&[1, 2]), true).await.unwrap();
        assert!(matches!(outcome, ActionOutcome::Applied { affected: 2, .. }));
        let after = list_users(&app, &UserTableArgs::default()).await.unwrap();
        assert_eq!(after.stats.active, before.stats.active - 2);
    }

    #[tokio::test]
    async fn test_activate_applies_immediately() {
        let app = app_as(Role::Admin).await;
        let selection = UserSelection {
            all: true,
            table: UserTableArgs {
                status: Some(UserStatus::Inactive),
                ..UserTableArgs::default()
            },
            ..UserSelection::default()
        };
        let outcome = activate_users(&app, &selection).await.unwrap();
        let ActionOutcome::Applied { affected, .. } = outcome else {
            panic!("activate is never gated");
        };
        assert!(affected > 0);

        let stats = list_users(&app, &UserTableArgs::default()).await.unwrap().stats;
        assert_eq!(stats.active, stats.total);
    }

    #[tokio::test]
    async fn test_delete_single_user_prompt() {
        let app = app_as(Role::Admin).await;
        let outcome = delete_users(&app, &users(&[5]), false).await.unwrap();
        let ActionOutcome::Cancelled { prompt } = outcome else {
            panic!("expected a confirmation prompt");
        };
        assert_eq!(prompt, "Are you sure you want to delete this user?");

        delete_users(&app, &users(&[5]), true).await.unwrap();
        let listed = list_users(&app, &UserTableArgs::default()).await.unwrap();
        assert_eq!(listed.table.total, 19);
        assert!(listed.table.rows.iter().all(|u| u.id != 5));
    }

    #[tokio::test]
    async fn test_unknown_or_empty_selection() {
        let app = app_as(Role::Admin).await;
        let err = delete_users(&app, &users(&[404]), true).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err = activate_users(&app, &users(&[])).await.unwrap_err();
        assert_eq!(err.message, "No users selected");
    }

    #[tokio::test]
    async fn test_user_filters_and_sort() {
        let app = app_as(Role::Admin).await;
        let args = UserTableArgs {
            role: Some(Role::Admin),
            sort: vec![UserColumn::Name],
            ..UserTableArgs::default()
        };
        let listed = list_users(&app, &args).await.unwrap();
        assert!(listed.table.rows.iter().all(|u| u.role == Role::Admin));
        assert_eq!(listed.table.showing, 5);
        assert_eq!(listed.table.total, 20);
        assert_eq!(listed.table.sort.as_deref(), Some("name ↑"));

        let names: Vec<String> = listed.table.rows.iter().map(|u| u.name.to_lowercase()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_add_edit_delete_product() {
        let app = app_as(Role::Admin).await;
        let added = save_product(&app, None, &lamp(), now()).await.unwrap();
        assert!(added.created);
        assert_eq!(added.product.price.cents(), 4999);

        let edit = ProductFormArgs {
            stock: Some("0".to_string()),
            ..ProductFormArgs::default()
        };
        let edited = save_product(&app, Some(added.product.id), &edit, now()).await.unwrap();
        assert!(!edited.created);
        assert_eq!(edited.product.stock, 0);
        assert_eq!(edited.product.name, "Desk Lamp");
        assert_eq!(edited.product.sku, added.product.sku);

        let outcome = delete_product(&app, added.product.id, false).await.unwrap();
        assert!(matches!(outcome, ActionOutcome::Cancelled { .. }));
        delete_product(&app, added.product.id, true).await.unwrap();
        let err = delete_product(&app, added.product.id, true).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_invalid_product_reports_fields() {
        let app = app_as(Role::Admin).await;
        let args = ProductFormArgs {
            price: Some("0".to_string()),
            ..lamp()
        };
        let err = save_product(&app, None, &args, now()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "price: Valid price is required");
    }

    #[tokio::test]
    async fn test_category_change_clears_brand() {
        let app = app_as(Role::Admin).await;
        let added = save_product(&app, None, &lamp(), now()).await.unwrap();

        let recategorize = ProductFormArgs {
            category: Some("laptops".to_string()),
            ..ProductFormArgs::default()
        };
        let err = save_product(&app, Some(added.product.id), &recategorize, now())
            .await
            .unwrap_err();
        assert!(err.message.contains("brand: Brand is required"));

        let other = ProductFormArgs {
            category: Some("other".to_string()),
            ..ProductFormArgs::default()
        };
        let saved = save_product(&app, Some(added.product.id), &other, now()).await.unwrap();
        assert_eq!(saved.product.brand, None);
    }

    #[tokio::test]
    async fn test_brand_must_match_category() {
        let app = app_as(Role::Admin).await;
        let args = ProductFormArgs {
            brand: Some("Dell".to_string()),
            ..lamp()
        };
        let err = save_product(&app, None, &args, now()).await.unwrap_err();
        assert!(err.message.contains("brand must be one of"));
    }

    #[tokio::test]
    async fn test_image_file_is_inlined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lamp.PNG");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let app = app_as(Role::Admin).await;
        let args = ProductFormArgs {
            image: None,
            image_file: Some(path),
            ..lamp()
        };
        let saved = save_product(&app, None, &args, now()).await.unwrap();
        assert!(saved.product.image.starts_with("data:image/png;base64,"));

        let bad = ProductFormArgs {
            image: None,
            image_file: Some(dir.path().join("notes.txt")),
            ..lamp()
        };
        assert!(save_product(&app, None, &bad, now()).await.is_err());
    }

    #[tokio::test]
    async fn test_order_status_and_revenue() {
        let app = app_as(Role::Admin).await;
        let before = stats(&app).await.unwrap().dashboard.total_revenue;

        // order 1 is a completed $299.99 order
        let updated = set_order_status(&app, 1, OrderStatus::Cancelled).await.unwrap();
        assert_eq!(updated.order.status, OrderStatus::Cancelled);

        let after = stats(&app).await.unwrap().dashboard.total_revenue;
        assert_eq!(before.cents() - after.cents(), 29_999);
    }

    #[tokio::test]
    async fn test_export_filtered_rows_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_as(Role::Admin).await;
        let target = ExportTarget::Orders {
            table: OrderTableArgs {
                status: Some(OrderStatus::Completed),
                ..OrderTableArgs::default()
            },
            output: OutputArgs {
                output: Some(dir.path().to_path_buf()),
            },
        };
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let exported = export(&app, &target, today).await.unwrap();

        let path = dir.path().join("orders-2024-01-15.csv");
        assert_eq!(exported.path.as_deref(), Some(path.as_path()));
        assert_eq!(exported.rows, 2);
        let csv = std::fs::read_to_string(path).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_export_to_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_as(Role::Admin).await;
        let users_to = |path: PathBuf| ExportTarget::Users {
            table: UserTableArgs::default(),
            output: OutputArgs { output: Some(path) },
        };
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        let path = dir.path().join("team.csv");
        let exported = export(&app, &users_to(path.clone()), today).await.unwrap();
        assert_eq!(exported.path.as_deref(), Some(path.as_path()));
        let csv = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(csv.lines().count(), 21);

        let missing = dir.path().join("no-such-dir").join("team.csv");
        assert!(export(&app, &users_to(missing), today).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_image_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_as(Role::Admin).await;
        let args = ProductFormArgs {
            image: None,
            image_file: Some(dir.path().join("absent.png")),
            ..lamp()
        };
        assert!(save_product(&app, None, &args, now()).await.is_err());
        assert_eq!(stats(&app).await.unwrap().dashboard.total_products, 5);
    }

    #[tokio::test]
    async fn test_export_to_stdout() {
        let app = app_as(Role::Admin).await;
        let target = ExportTarget::Products {
            table: ProductTableArgs::default(),
            output: OutputArgs::default(),
        };
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let exported = export(&app, &target, today).await.unwrap();
        assert_eq!(exported.rows, 5);
        assert_eq!(exported.to_string().lines().count(), 6);
    }
}
