//! Demo account creation.

use crate::auth::{AuthError, AuthService};
use crate::db::{NewUser, UserRepository};
use tracing::{info, warn};

/// A fixed demo account.
#[derive(Debug, Clone, Copy)]
pub struct DemoAccount {
    /// Login name.
    pub username: &'static str,
    /// Plain-text password.
    pub password: &'static str,
    /// Contact email.
    pub email: &'static str,
    /// Staff and superuser flag.
    pub is_admin: bool,
}

/// Demo admin account.
pub const DEMO_ADMIN: DemoAccount = DemoAccount {
    username: "admin",
    password: "admin123",
    email: "admin@vesselhire.com",
    is_admin: true,
};

/// Demo regular account.
pub const DEMO_USER: DemoAccount = DemoAccount {
    username: "user",
    password: "user123",
    email: "user@vesselhire.com",
    is_admin: false,
};

/// Creates [`DEMO_ADMIN`] and [`DEMO_USER`] unless they already exist.
///
/// Returns the usernames that were created.
///
/// # Errors
/// Returns error if hashing or the store fails.
pub async fn create_demo_users(
    auth: &AuthService,
    users: &dyn UserRepository,
) -> Result<Vec<&'static str>, AuthError> {
    let mut created = Vec::new();

    for account in [DEMO_ADMIN, DEMO_USER] {
        if users.find_by_username(account.username).await?.is_some() {
            warn!(username = account.username, "user already exists, skipping");
            continue;
        }

        users
            .create(NewUser {
                username: account.username.to_string(),
                email: account.email.to_string(),
                password_hash: auth.hash_password(account.password).await?,
                is_staff: account.is_admin,
                is_superuser: account.is_admin,
            })
            .await?;
        info!(
            username = account.username,
            admin = account.is_admin,
            "created demo user"
        );
        created.push(account.username);
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::db::MemoryStore;

    fn auth() -> AuthService {
        AuthService::new(&AuthConfig {
            password_hash_cost: 4,
            ..AuthConfig::default()
        })
    }

    #[tokio::test]
    async fn test_create_demo_users_is_idempotent() {
        let auth = auth();
        let store = MemoryStore::new();

        let first = create_demo_users(&auth, &store).await.unwrap();
        assert_eq!(first, vec!["admin", "user"]);

        let second = create_demo_users(&auth, &store).await.unwrap();
        assert!(second.is_empty());
    }

    #[tokio::test]
    async fn test_demo_users_roles_and_passwords() {
        let auth = auth();
        let store = MemoryStore::new();
        create_demo_users(&auth, &store).await.unwrap();

        let admin = auth
            .authenticate(&store, "admin", "admin123")
            .await
            .unwrap()
            .expect("admin authenticates");
        assert!(admin.is_staff && admin.is_superuser);
        assert_eq!(admin.email, "admin@vesselhire.com");

        let user = auth
            .authenticate(&store, "user", "user123")
            .await
            .unwrap()
            .expect("user authenticates");
        assert!(!user.is_staff && !user.is_superuser);
    }
}
