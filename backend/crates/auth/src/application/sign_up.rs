//! Sign Up Use Case
//!
//! Registers a user and issues their first session token.
//!
//! Email uniqueness is a count-then-insert on the store, not a backend
//! constraint: two concurrent sign-ups with one email can both succeed.

use std::sync::Arc;

use kernel::context::OpContext;
use kernel::id::UserId;
use platform::password::ClearTextPassword;
use storage::{NewUser, TodoStore};

use crate::application::run_blocking;
use crate::domain::token::{IssuedToken, TokenIssuer};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Sign up output
#[derive(Debug)]
pub struct SignUpOutput {
    pub user_id: UserId,
    pub username: String,
    pub token: IssuedToken,
}

/// Sign up use case
pub struct SignUpUseCase<S>
where
    S: TodoStore,
{
    store: Arc<S>,
    issuer: Arc<TokenIssuer>,
}

impl<S> SignUpUseCase<S>
where
    S: TodoStore,
{
    pub fn new(store: Arc<S>, issuer: Arc<TokenIssuer>) -> Self {
        Self { store, issuer }
    }

    pub async fn execute(&self, ctx: &OpContext, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let email = Email::new(input.email)?;

        let name = input.name.trim().to_string();
        if name.is_empty() {
            return Err(AuthError::Validation("Name cannot be empty".into()));
        }

        let password = ClearTextPassword::new(input.password)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        if self.store.find_existing_users(ctx, email.as_str()).await? > 0 {
            return Err(AuthError::EmailTaken);
        }

        let hashed = run_blocking(ctx, move || password.hash())
            .await?
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        let user = self
            .store
            .add_user(
                ctx,
                NewUser {
                    email: email.into_string(),
                    name,
                    password_hash: hashed.as_phc_string().to_string(),
                },
            )
            .await?;

        let token = self.issuer.issue(&user.id);

        tracing::info!(user_id = %user.id, "User signed up");

        Ok(SignUpOutput {
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
    use chrono::TimeDelta;
    use std::time::Duration;
    use storage::MemoryStore;

    fn use_case(store: &MemoryStore) -> SignUpUseCase<MemoryStore> {
        let issuer = TokenIssuer::new(SigningKey::new("secret").unwrap(), TimeDelta::hours(24));
        SignUpUseCase::new(Arc::new(store.clone()), Arc::new(issuer))
    }

    fn ctx() -> OpContext {
        OpContext::with_timeout(Duration::from_secs(30))
    }

    fn input(email: &str, name: &str, password: &str) -> SignUpInput {
        SignUpInput {
            email: email.to_string(),
            name: name.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_stores_hashed_user() {
        let store = MemoryStore::new();
        let output = use_case(&store)
            .execute(&ctx(), input(" A@X.com", "Ada", "p1"))
            .await
            .unwrap();

        assert_eq!(output.username, "Ada");
        assert_eq!(output.token.user_id, output.user_id);

        let stored = store.get_user(&ctx(), "a@x.com").await.unwrap();
        assert_eq!(stored.id, output.user_id);
        assert!(stored.password_hash.starts_with("$argon2id$"));
        assert!(!stored.password_hash.contains("p1"));
    }

    #[tokio::test]
    async fn test_sign_up_rejects_duplicate_email() {
        let store = MemoryStore::new();
        let sign_up = use_case(&store);

        sign_up
            .execute(&ctx(), input("a@x.com", "Ada", "p1"))
            .await
            .unwrap();
        let err = sign_up
            .execute(&ctx(), input("A@x.com", "Other", "p2"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::EmailTaken));
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn test_sign_up_validates_before_storage() {
        let store = MemoryStore::new();
        let sign_up = use_case(&store);

        for bad in [
            input("not-an-email", "Ada", "p1"),
            input("a@x.com", "  ", "p1"),
            input("a@x.com", "Ada", ""),
        ] {
            let err = sign_up.execute(&ctx(), bad).await.unwrap_err();
            assert!(matches!(err, AuthError::Validation(_)));
        }

        // A closed store would fail any call that got through
        store.close().await;
        let err = sign_up
            .execute(&ctx(), input("a@x.com", "Ada", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }
}
