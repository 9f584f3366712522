//! # Session Store
//!
//! The current identity and cart, mirrored into a [`KeyValueStore`].
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  open(store)                                                            │
//! │    ├── "user" ──► JSON ──► Identity ──► well formed? ──► Some(identity) │
//! │    │                 └── missing ─────────────────────► None            │
//! │    │                 └── malformed ──► warn + remove ─► None            │
//! │    └── "cart" ──► JSON ──► Cart (same rules, empty when absent)         │
//! │                                                                         │
//! │  login(identity)     write "user", then replace in memory               │
//! │  add_to_cart(p)      append snapshot, write "cart"                      │
//! │  logout()            clear both, then remove "user" + "cart"            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation is written through before it returns, so a later
//! `open` sees exactly what the last command left behind.

use serde::de::DeserializeOwned;
use storefront_core::{Cart, Identity, Product};
use tracing::{debug, info, warn};

use crate::error::DbResult;
use crate::kv::KeyValueStore;

/// Storage key of the signed-in identity.
pub const USER_KEY: &str = "user";

/// Storage key of the cart.
pub const CART_KEY: &str = "cart";

/// Session state for one shopper.
#[derive(Debug)]
pub struct SessionStore<S> {
    store: S,
    user: Option<Identity>,
    cart: Cart,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Rehydrates the session from `store`.
    ///
    /// Malformed entries are discarded (and deleted) rather than failing the
    /// whole session; only storage errors are returned.
    pub async fn open(store: S) -> DbResult<Self> {
        let user = load_entry(&store, USER_KEY, Identity::is_well_formed).await?;
        let cart = load_entry(&store, CART_KEY, |_: &Cart| true)
            .await?
            .unwrap_or_default();

        info!(
            signed_in = user.is_some(),
            cart_items = cart.len(),
            "Session restored"
        );

        Ok(SessionStore { store, user, cart })
    }

    pub fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(Identity::is_admin)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replaces the current identity and persists it.
    pub async fn login(&mut self, identity: Identity) -> DbResult<()> {
        let json = serde_json::to_string(&identity)?;
        self.store.set(USER_KEY, &json).await?;

        info!(user_id = identity.id, role = %identity.role, "Signed in");
        self.user = Some(identity);
        Ok(())
    }

    /// Clears identity and cart from memory and storage. Idempotent.
    ///
    /// Memory is always cleared and both removals are attempted; the first
    /// storage error is returned afterwards.
    pub async fn logout(&mut self) -> DbResult<()> {
        if self.user.take().is_some() {
            info!("Signed out");
        }
        self.cart.clear();

        let user = self.store.remove(USER_KEY).await;
        let cart = self.store.remove(CART_KEY).await;
        if let Err(err) = &cart {
            warn!(error = %err, "Cart entry could not be removed");
        }
        user.and(cart)
    }

    /// Appends a snapshot of `product` and persists the whole cart.
    pub async fn add_to_cart(&mut self, product: &Product) -> DbResult<()> {
        let mut cart = self.cart.clone();
        cart.add(product);

        let json = serde_json::to_string(&cart)?;
        self.store.set(CART_KEY, &json).await?;

        debug!(product_id = product.id, cart_items = cart.len(), "Added to cart");
        self.cart = cart;
        Ok(())
    }
}

/// Reads and decodes one entry; removes it if it fails to decode or `valid`.
async fn load_entry<T, S, F>(store: &S, key: &str, valid: F) -> DbResult<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore,
    F: Fn(&T) -> bool,
{
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };

    match serde_json::from_str::<T>(&raw) {
        Ok(value) if valid(&value) => Ok(Some(value)),
        Ok(_) => {
            warn!(key = %key, "Discarding stored session entry with invalid shape");
            store.remove(key).await?;
            Ok(None)
        }
        Err(err) => {
            warn!(key = %key, error = %err, "Discarding unreadable stored session entry");
            store.remove(key).await?;
            Ok(None)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::kv::MemoryStore;
    use crate::pool::{Database, DbConfig};
    use async_trait::async_trait;
    use storefront_core::{Money, Role};

    /// Memory store whose `remove` fails for one key.
    struct StuckKey {
        inner: MemoryStore,
        stuck: &'static str,
    }

    #[async_trait]
    impl KeyValueStore for StuckKey {
        async fn get(&self, key: &str) -> DbResult<Option<String>> {
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &str) -> DbResult<()> {
            self.inner.set(key, value).await
        }

        async fn remove(&self, key: &str) -> DbResult<()> {
            if key == self.stuck {
                return Err(DbError::Busy);
            }
            self.inner.remove(key).await
        }
    }

    fn identity() -> Identity {
        Identity {
            id: 2,
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            role: Role::User,
        }
    }

    fn product(id: u64, cents: i64) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            description: "desc".to_string(),
            price: Money::from_cents(cents),
            stock: 5,
            category: "smartphones".to_string(),
            brand: Some("Apple".to_string()),
            image: "https://example.com/p.png".to_string(),
            rating: 4.6,
            featured: true,
            specs: None,
            sku: None,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_empty_store_opens_empty_session() {
        let session = SessionStore::open(MemoryStore::new()).await.unwrap();
        assert!(session.user().is_none());
        assert!(session.cart().is_empty());
        assert!(!session.is_admin());
    }

    #[tokio::test]
    async fn test_state_survives_reopen() {
        let store = MemoryStore::new();
        let mut session = SessionStore::open(store.clone()).await.unwrap();
        session.login(identity()).await.unwrap();
        session.add_to_cart(&product(1, 1999)).await.unwrap();
        session.add_to_cart(&product(1, 1999)).await.unwrap();

        let reopened = SessionStore::open(store).await.unwrap();
        assert_eq!(reopened.user(), Some(&identity()));
        assert_eq!(reopened.cart().len(), 2);
        assert_eq!(reopened.cart().total().cents(), 3998);
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_storage() {
        let store = MemoryStore::new();
        let mut session = SessionStore::open(store.clone()).await.unwrap();
        session.login(identity()).await.unwrap();
        session.add_to_cart(&product(3, 500)).await.unwrap();

        session.logout().await.unwrap();
        assert!(session.user().is_none());
        assert!(session.cart().is_empty());
        assert!(store.is_empty().await);

        // second logout is a no-op
        session.logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_logout_still_signs_out_in_memory() {
        let inner = MemoryStore::new();
        let store = StuckKey {
            inner: inner.clone(),
            stuck: CART_KEY,
        };
        let mut session = SessionStore::open(store).await.unwrap();
        session.login(identity()).await.unwrap();
        session.add_to_cart(&product(3, 500)).await.unwrap();

        assert!(matches!(session.logout().await, Err(DbError::Busy)));
        assert!(session.user().is_none());
        assert!(session.cart().is_empty());
        assert!(!session.is_admin());
        assert!(inner.get(USER_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_entries_are_discarded() {
        let store = MemoryStore::new();
        store.set(USER_KEY, "{not json").await.unwrap();
        store.set(CART_KEY, r#"{"unexpected": true}"#).await.unwrap();

        let session = SessionStore::open(store.clone()).await.unwrap();
        assert!(session.user().is_none());
        assert!(session.cart().is_empty());
        assert!(store.get(USER_KEY).await.unwrap().is_none());
        assert!(store.get(CART_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_identity_with_blank_email_is_discarded() {
        let store = MemoryStore::new();
        store
            .set(USER_KEY, r#"{"id":1,"name":"Admin","email":"","role":"admin"}"#)
            .await
            .unwrap();

        let session = SessionStore::open(store).await.unwrap();
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_admin_session_over_sqlite() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut session = SessionStore::open(db.local_storage()).await.unwrap();
        session
            .login(Identity {
                role: Role::Admin,
                ..identity()
            })
            .await
            .unwrap();
        assert!(session.is_admin());

        let reopened = SessionStore::open(db.local_storage()).await.unwrap();
        assert!(reopened.is_admin());
    }
}
