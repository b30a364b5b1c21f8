//! User service: registration, login, profile management, and the admin
//! surface. Registration and login both mint a bearer token through
//! [`AuthService`].

use std::sync::Arc;

use bytes::Bytes;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::auth::{self, AuthService};
use crate::application::error::AppError;
use crate::application::repos::UsersRepo;
use crate::domain::entities::UserRecord;
use crate::domain::error::DomainError;

const MIN_PASSWORD_LEN: usize = 7;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub age: u32,
}

/// Partial profile update. A non-admin caller supplying `is_admin` is
/// rejected wholesale; the other fields are not applied either.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<u32>,
    pub is_admin: Option<bool>,
}

/// Admin update of another user; absent fields keep their current value,
/// `is_admin` is always applied.
#[derive(Debug, Clone)]
pub struct AdminUserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
    pub is_admin: bool,
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UsersRepo>,
    auth: AuthService,
}

impl UserService {
    pub fn new(users: Arc<dyn UsersRepo>, auth: AuthService) -> Self {
        Self { users, auth }
    }

    pub async fn register(&self, new: NewUser) -> Result<(UserRecord, String), AppError> {
        let email = normalize_email(&new.email)?;
        validate_password(&new.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("user already exists"));
        }

        let (salt, hash) = auth::hash_password(&new.password);
        let now = OffsetDateTime::now_utc();
        let user = self
            .users
            .save(UserRecord {
                id: Uuid::new_v4(),
                name: new.name,
                email,
                password_hash: hash,
                password_salt: salt,
                age: new.age,
                is_admin: false,
                avatar: None,
                created_at: now,
                updated_at: now,
            })
            .await?;

        let token = self.auth.issue_token(user.id).await?;
        Ok((user, token))
    }

    /// Credential login. The error is deliberately the same for an unknown
    /// email and a wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<(UserRecord, String), AppError> {
        let email = normalize_email(email)?;
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::validation("unable to login"))?;

        if !auth::verify_password(&user.password_salt, &user.password_hash, password) {
            return Err(AppError::validation("unable to login"));
        }

        let token = self.auth.issue_token(user.id).await?;
        Ok((user, token))
    }

    pub async fn get(&self, id: Uuid) -> Result<UserRecord, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        caller_is_admin: bool,
        changes: ProfileChanges,
    ) -> Result<UserRecord, AppError> {
        if changes.is_admin.is_some() && !caller_is_admin {
            return Err(AppError::validation("invalid updates"));
        }

        let mut user = self.get(user_id).await?;

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = normalize_email(&email)?;
        }
        if let Some(password) = changes.password {
            validate_password(&password)?;
            let (salt, hash) = auth::hash_password(&password);
            user.password_salt = salt;
            user.password_hash = hash;
        }
        if let Some(age) = changes.age {
            user.age = age;
        }
        if let Some(is_admin) = changes.is_admin {
            user.is_admin = is_admin;
        }
        user.updated_at = OffsetDateTime::now_utc();

        Ok(self.users.save(user).await?)
    }

    pub async fn list(&self) -> Result<Vec<UserRecord>, AppError> {
        Ok(self.users.find_all().await?)
    }

    pub async fn update_user(&self, id: Uuid, changes: AdminUserChanges) -> Result<UserRecord, AppError> {
        let mut user = self.get(id).await?;

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = normalize_email(&email)?;
        }
        if let Some(age) = changes.age {
            user.age = age;
        }
        user.is_admin = changes.is_admin;
        user.updated_at = OffsetDateTime::now_utc();

        Ok(self.users.save(user).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.get(id).await?;
        self.users.delete_one(id).await?;
        Ok(())
    }

    pub async fn set_avatar(&self, id: Uuid, png: Bytes) -> Result<(), AppError> {
        let mut user = self.get(id).await?;
        user.avatar = Some(png);
        user.updated_at = OffsetDateTime::now_utc();
        self.users.save(user).await?;
        Ok(())
    }

    pub async fn clear_avatar(&self, id: Uuid) -> Result<(), AppError> {
        let mut user = self.get(id).await?;
        user.avatar = None;
        user.updated_at = OffsetDateTime::now_utc();
        self.users.save(user).await?;
        Ok(())
    }

    pub async fn avatar(&self, id: Uuid) -> Result<Bytes, AppError> {
        let user = self.get(id).await?;
        user.avatar.ok_or_else(|| AppError::not_found("User avatar"))
    }
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    // The document store enforces nothing; a minimal shape check keeps
    // garbage out of the unique index.
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    });
    if !valid {
        return Err(DomainError::validation("email is invalid"));
    }
    Ok(email)
}

fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if password.to_lowercase().contains("password") {
        return Err(DomainError::validation(
            "password cannot contain \"password\"",
        ));
    }
    Ok(())
}
