//! Sign-in, registration and sign-out.

use std::fmt;

use serde::Serialize;
use storefront_core::validation::RegistrationForm;
use storefront_core::Identity;
use tracing::info;

use super::Message;
use crate::error::ApiError;
use crate::state::AppState;

/// Who is signed in, and how full their cart is.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user: Option<Identity>,
    pub cart_items: usize,
}

impl fmt::Display for SessionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.user {
            Some(user) => write!(
                f,
                "Signed in as {} <{}> ({}), {} item(s) in cart",
                user.name, user.email, user.role, self.cart_items
            ),
            None => write!(f, "Not signed in, {} item(s) in cart", self.cart_items),
        }
    }
}

async fn session_response(app: &AppState) -> SessionResponse {
    let session = app.session.lock().await;
    SessionResponse {
        user: session.user().cloned(),
        cart_items: session.cart().len(),
    }
}

/// Authenticates and stores the identity.
///
/// Empty email or password fails with the same generic message as any
/// other rejected sign-in.
pub async fn login(
    app: &AppState,
    email: &str,
    password: &str,
) -> Result<SessionResponse, ApiError> {
    let identity = app.services.auth.authenticate(email, password).await?;
    app.session.lock().await.login(identity).await?;
    Ok(session_response(app).await)
}

/// Creates the account and signs it in.
pub async fn register(
    app: &AppState,
    form: &RegistrationForm,
) -> Result<SessionResponse, ApiError> {
    let identity = app.services.auth.register(form).await?;
    info!(user_id = identity.id, "Account registered");
    app.session.lock().await.login(identity).await?;
    Ok(session_response(app).await)
}

/// Clears identity and cart. Signing out twice is not an error.
pub async fn logout(app: &AppState) -> Result<Message, ApiError> {
    app.session.lock().await.logout().await?;
    Ok(Message::new("Signed out"))
}

pub async fn whoami(app: &AppState) -> SessionResponse {
    session_response(app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::state::testing::{app, ADMIN_EMAIL, ADMIN_PASSWORD};
    use storefront_core::Role;

    #[tokio::test]
    async fn test_admin_login() {
        let app = app().await;
        let response = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
        assert_eq!(response.user.unwrap().role, Role::Admin);
        assert!(app.session.lock().await.is_admin());
    }

    #[tokio::test]
    async fn test_empty_password_is_generic_failure() {
        let app = app().await;
        let err = login(&app, ADMIN_EMAIL, "").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
        assert_eq!(err.message, "Invalid credentials");
        assert!(whoami(&app).await.user.is_none());
    }

    #[tokio::test]
    async fn test_register_signs_in() {
        let app = app().await;
        let form = RegistrationForm {
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
        };
        let response = register(&app, &form).await.unwrap();
        let user = response.user.unwrap();
        assert_eq!(user.name, "Jane Smith");
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn test_register_password_mismatch() {
        let app = app().await;
        let form = RegistrationForm {
            name: "Jane Smith".to_string(),
            email: "jane@example.com".to_string(),
            password: "pw".to_string(),
            confirm_password: "other".to_string(),
        };
        let err = register(&app, &form).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Passwords do not match");
    }

    #[tokio::test]
    async fn test_logout_twice() {
        let app = app().await;
        login(&app, "a@example.com", "pw").await.unwrap();
        logout(&app).await.unwrap();
        logout(&app).await.unwrap();
        assert_eq!(whoami(&app).await.to_string(), "Not signed in, 0 item(s) in cart");
    }
}
