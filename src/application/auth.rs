//! Bearer-token authentication and password hashing.
//!
//! Tokens are opaque: `bk_<prefix>_<secret>`. The prefix indexes the stored
//! record; the secret is sha256-hashed at rest and compared in constant time.
//! Issuance is keyed by user id (register and login both mint a token).

use std::sync::Arc;

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{RepoError, TokensRepo, UsersRepo};
use crate::domain::entities::TokenRecord;

const TOKEN_PREFIX: &str = "bk";
const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    Missing,
    #[error("invalid bearer token")]
    Invalid,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// The authenticated identity attached to a request.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub name: String,
    pub is_admin: bool,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UsersRepo>,
    tokens: Arc<dyn TokensRepo>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UsersRepo>, tokens: Arc<dyn TokensRepo>) -> Self {
        Self { users, tokens }
    }

    /// Mint a token for `user_id` and persist its hashed secret.
    pub async fn issue_token(&self, user_id: Uuid) -> Result<String, RepoError> {
        let prefix = generate_prefix();
        let secret = generate_secret();
        let token = format!("{TOKEN_PREFIX}_{prefix}_{secret}");

        self.tokens
            .insert(TokenRecord {
                id: Uuid::new_v4(),
                user_id,
                prefix,
                hashed_secret: hash_secret(&secret),
                created_at: OffsetDateTime::now_utc(),
            })
            .await?;

        Ok(token)
    }

    /// Resolve a bearer token to the user it was issued for.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let parsed = parse_token(token).ok_or(AuthError::Invalid)?;
        let record = self
            .tokens
            .find_by_prefix(&parsed.prefix)
            .await
            .map_err(|_| AuthError::Invalid)?
            .ok_or(AuthError::Invalid)?;

        let hashed_input = hash_secret(&parsed.secret);
        if record.hashed_secret.ct_eq(&hashed_input).unwrap_u8() == 0 {
            return Err(AuthError::Invalid);
        }

        let user = self
            .users
            .find_by_id(record.user_id)
            .await
            .map_err(|_| AuthError::Invalid)?
            .ok_or(AuthError::Invalid)?;

        Ok(Principal {
            user_id: user.id,
            name: user.name,
            is_admin: user.is_admin,
        })
    }
}

/// Salted password digest, hex-encoded, with the salt returned alongside.
pub fn hash_password(password: &str) -> (String, String) {
    let salt = Uuid::new_v4().simple().to_string();
    let hash = password_digest(&salt, password);
    (salt, hash)
}

pub fn verify_password(salt: &str, stored_hash: &str, candidate: &str) -> bool {
    let candidate_hash = password_digest(salt, candidate);
    stored_hash
        .as_bytes()
        .ct_eq(candidate_hash.as_bytes())
        .unwrap_u8()
        == 1
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn hash_secret(secret: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.finalize().to_vec()
}

fn generate_prefix() -> String {
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

fn generate_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

struct ParsedToken {
    prefix: String,
    secret: String,
}

fn parse_token(token: &str) -> Option<ParsedToken> {
    let mut parts = token.splitn(3, '_');
    if parts.next()? != TOKEN_PREFIX {
        return None;
    }
    let prefix = parts.next()?;
    let secret = parts.next()?;
    if prefix.is_empty() || secret.len() < MIN_SECRET_LEN {
        return None;
    }
    Some(ParsedToken {
        prefix: prefix.to_string(),
        secret: secret.to_string(),
    })
}
