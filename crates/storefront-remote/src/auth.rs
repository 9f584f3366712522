//! # Auth Service
//!
//! The mocked authentication boundary.
//!
//! ```text
//! authenticate(email, password)
//!      │  sleep(latency)
//!      ├── either field empty ───────────► Err(InvalidCredentials)
//!      ├── configured admin pair ─────────► Identity { id: 1, role: admin }
//!      └── anything else ─────────────────► Identity { id: 2, "John Doe", role: user }
//!
//! register(form)
//!      │  sleep(latency)
//!      ├── form invalid ──────────────────► Err(Validation(..))
//!      └── ok ────────────────────────────► Identity { id: now_millis, role: user }
//! ```
//!
//! Failures carry one generic message; nothing reveals whether the email or
//! the password was wrong.

use async_trait::async_trait;
use chrono::Utc;
use storefront_core::validation::{validate_credentials, RegistrationForm};
use storefront_core::{Identity, Role};
use tracing::{debug, info};

use crate::config::AuthSettings;
use crate::error::{RemoteError, RemoteResult};

pub const ADMIN_ID: u64 = 1;
pub const DEMO_USER_ID: u64 = 2;
pub const DEMO_USER_NAME: &str = "John Doe";

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn authenticate(&self, email: &str, password: &str) -> RemoteResult<Identity>;

    async fn register(&self, form: &RegistrationForm) -> RemoteResult<Identity>;
}

/// In-process [`AuthService`] with a simulated round-trip.
#[derive(Debug, Clone)]
pub struct MockAuthService {
    settings: AuthSettings,
}

impl MockAuthService {
    pub fn new(settings: AuthSettings) -> Self {
        Self { settings }
    }

    async fn simulate_latency(&self) {
        let latency = self.settings.latency();
        if !latency.is_zero() {
            debug!(latency_ms = self.settings.latency_ms, "Simulating auth round-trip");
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl AuthService for MockAuthService {
    async fn authenticate(&self, email: &str, password: &str) -> RemoteResult<Identity> {
        self.simulate_latency().await;

        if validate_credentials(email, password).is_err() {
            return Err(RemoteError::InvalidCredentials);
        }

        let identity = if self.settings.is_admin_pair(email, password) {
            Identity {
                id: ADMIN_ID,
                name: self.settings.admin_name.clone(),
                email: email.to_string(),
                role: Role::Admin,
            }
        } else {
            Identity {
                id: DEMO_USER_ID,
                name: DEMO_USER_NAME.to_string(),
                email: email.to_string(),
                role: Role::User,
            }
        };

        info!(role = %identity.role, "Credentials accepted");
        Ok(identity)
    }

    async fn register(&self, form: &RegistrationForm) -> RemoteResult<Identity> {
        self.simulate_latency().await;
        form.validate()?;

        let id = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(DEMO_USER_ID);
        info!(user_id = id, "Account registered");

        Ok(Identity {
            id,
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            role: Role::User,
        })
    }
}
