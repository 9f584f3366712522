//! The persisted shopper session behind an async mutex.

use storefront_core::access::{check_access, Access, Requirement};
use storefront_core::Identity;
use storefront_db::{DbResult, KeyValueStore, SessionStore};
use tokio::sync::{Mutex, MutexGuard};

use crate::error::ApiError;

/// Backing store chosen at startup: SQLite, or memory with `--ephemeral`.
pub type SharedStore = Box<dyn KeyValueStore>;

/// Session shared by every command.
///
/// ## Locking
/// Login, logout and cart writes await storage while holding the guard,
/// so a second command cannot interleave between the write and the
/// in-memory update. `tokio::sync::Mutex` has no poisoning.
pub struct SessionState {
    session: Mutex<SessionStore<SharedStore>>,
}

impl SessionState {
    /// Rehydrates identity and cart from `store`.
    pub async fn open(store: SharedStore) -> DbResult<Self> {
        let session = SessionStore::open(store).await?;
        Ok(SessionState {
            session: Mutex::new(session),
        })
    }

    /// Exclusive access for mutations.
    pub async fn lock(&self) -> MutexGuard<'_, SessionStore<SharedStore>> {
        self.session.lock().await
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.session.lock().await.user().cloned()
    }

    /// The signed-in identity, if it satisfies `requirement`.
    ///
    /// ```text
    /// RedirectLogin → Unauthorized
    /// RedirectHome  → Forbidden
    /// ```
    pub async fn require(&self, requirement: Requirement) -> Result<Identity, ApiError> {
        let identity = self.identity().await;
        match check_access(identity.as_ref(), requirement) {
            Access::RedirectLogin => Err(ApiError::unauthorized()),
            Access::RedirectHome => Err(ApiError::forbidden()),
            Access::Allowed => identity.ok_or_else(ApiError::unauthorized),
        }
    }
}
