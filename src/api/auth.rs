//! User accounts and password verification.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sha2::{Digest, Sha256};

use crate::db::entities::user;
use crate::error::{Result, ServerError};

/// Hash a password with salt
fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"agri-inventory-salt:");
    hasher.update(password.as_bytes());
    let result = hasher.finalize();
    result.iter().map(|b| format!("{:02x}", b)).collect()
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Authentication manager backed by the `users` table
pub struct AuthManager {
    db: Arc<DatabaseConnection>,
}

impl AuthManager {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a user account
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<user::Model> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ServerError::InvalidRequest("Username is required".to_string()));
        }

        user::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(hash_password(password)),
            display_name: Set(display_name.map(str::to_string)),
            created_at: Set(now_secs()),
            ..Default::default()
        }
        .insert(self.db.as_ref())
        .await
        .map_err(|e| ServerError::from_write(e, "Username already taken"))
    }

    /// Make sure a bootstrap account exists, returning it
    pub async fn ensure_admin_user(&self, username: &str, password: &str) -> Result<user::Model> {
        if let Some(existing) = self.find_user(username).await? {
            return Ok(existing);
        }
        tracing::info!("Creating bootstrap user '{}'", username);
        self.create_user(username, password, Some("Administrator")).await
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<user::Model>> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username.trim()))
            .one(self.db.as_ref())
            .await?)
    }

    /// Verify username/password and return the account
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<user::Model> {
        let user = self.find_user(username).await?.ok_or(ServerError::AuthFailed)?;
        if user.password_hash != hash_password(password) {
            return Err(ServerError::AuthFailed);
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    #[test]
    fn test_password_hash() {
        let hash1 = hash_password("test123");
        let hash2 = hash_password("test123");
        let hash3 = hash_password("different");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 64);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let auth = AuthManager::new(Arc::new(db::open_in_memory().await));
        auth.create_user("inspector", "secret", None).await.unwrap();

        let user = auth.authenticate("inspector", "secret").await.unwrap();
        assert_eq!(user.username, "inspector");

        assert!(matches!(
            auth.authenticate("inspector", "wrong").await,
            Err(ServerError::AuthFailed)
        ));
        assert!(matches!(
            auth.authenticate("nobody", "secret").await,
            Err(ServerError::AuthFailed)
        ));
    }

    #[tokio::test]
    async fn test_ensure_admin_user_is_idempotent() {
        let auth = AuthManager::new(Arc::new(db::open_in_memory().await));
        let first = auth.ensure_admin_user("admin", "admin").await.unwrap();
        let second = auth.ensure_admin_user("admin", "other").await.unwrap();
        assert_eq!(first.id, second.id);
        // The existing password is kept
        assert!(auth.authenticate("admin", "admin").await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let auth = AuthManager::new(Arc::new(db::open_in_memory().await));
        auth.create_user("alice", "pw", None).await.unwrap();
        let err = auth.create_user("alice", "pw2", None).await.unwrap_err();
        assert!(matches!(err, ServerError::Conflict(_)));
    }
}
