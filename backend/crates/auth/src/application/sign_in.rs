//! Sign In Use Case
//!
//! Authenticates a user by email and password and issues a fresh token.

use std::sync::Arc;

use kernel::context::OpContext;
use kernel::id::UserId;
use platform::password::{ClearTextPassword, HashedPassword};
use storage::TodoStore;

use crate::application::run_blocking;
use crate::domain::token::{IssuedToken, TokenIssuer};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub user_id: UserId,
    pub username: String,
    pub token: IssuedToken,
}

/// Sign in use case
pub struct SignInUseCase<S>
where
    S: TodoStore,
{
    store: Arc<S>,
    issuer: Arc<TokenIssuer>,
}

impl<S> SignInUseCase<S>
where
    S: TodoStore,
{
    pub fn new(store: Arc<S>, issuer: Arc<TokenIssuer>) -> Self {
        Self { store, issuer }
    }

    /// Every credential failure is [`AuthError::InvalidCredentials`]
    pub async fn execute(&self, ctx: &OpContext, input: SignInInput) -> AuthResult<SignInOutput> {
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let password =
            ClearTextPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let user = match self.store.get_user(ctx, email.as_str()).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => return Err(AuthError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        let stored = HashedPassword::from_stored(user.password_hash.clone());
        let valid = run_blocking(ctx, move || stored.verify(&password)).await?;
        if !valid {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issuer.issue(&user.id);

        tracing::info!(user_id = %user.id, "User signed in");

        Ok(SignInOutput {
            user_id: user.id,
            username: user.name,
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::SigningKey;
    use crate::application::sign_up::{SignUpInput, SignUpUseCase};
    use chrono::TimeDelta;
    use std::time::Duration;
    use storage::MemoryStore;

    fn issuer() -> Arc<TokenIssuer> {
        Arc::new(TokenIssuer::new(
            SigningKey::new("secret").unwrap(),
            TimeDelta::hours(24),
        ))
    }

    fn ctx() -> OpContext {
        OpContext::with_timeout(Duration::from_secs(30))
    }

    async fn registered_store() -> (Arc<MemoryStore>, UserId) {
        let store = Arc::new(MemoryStore::new());
        let output = SignUpUseCase::new(store.clone(), issuer())
            .execute(
                &ctx(),
                SignUpInput {
                    email: "a@x.com".to_string(),
                    name: "Ada".to_string(),
                    password: "p1".to_string(),
                },
            )
            .await
            .unwrap();
        (store, output.user_id)
    }

    fn login(email: &str, password: &str) -> SignInInput {
        SignInInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_issues_token_for_user() {
        let (store, user_id) = registered_store().await;
        let issuer = issuer();

        let output = SignInUseCase::new(store, issuer.clone())
            .execute(&ctx(), login("A@X.COM", "p1"))
            .await
            .unwrap();

        assert_eq!(output.user_id, user_id);
        assert_eq!(output.username, "Ada");
        assert_eq!(issuer.parse(&output.token.token).unwrap().user_id, user_id);
    }

    #[tokio::test]
    async fn test_sign_in_failures_are_indistinguishable() {
        let (store, _) = registered_store().await;
        let sign_in = SignInUseCase::new(store, issuer());

        let wrong_password = sign_in
            .execute(&ctx(), login("a@x.com", "p2"))
            .await
            .unwrap_err();
        let unknown_email = sign_in
            .execute(&ctx(), login("b@x.com", "p1"))
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert_eq!(wrong_password.to_string(), "email or password is incorrect");
    }

    #[tokio::test]
    async fn test_sign_in_surfaces_storage_failure() {
        let store = Arc::new(MemoryStore::new());
        store.close().await;

        let err = SignInUseCase::new(store, issuer())
            .execute(&ctx(), login("a@x.com", "p1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Storage(_)));
    }
}
