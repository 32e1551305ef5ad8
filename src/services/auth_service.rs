use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    database::{Store, StoreError},
    models::{AuthResponse, LoginRequest, RegisterRequest, User, UserResponse},
    utils::{parse_object_id, AppError},
};

const MIN_PASSWORD_LEN: usize = 6;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String,           // user _id (hex)
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
}

/// Emite e valida tokens HS256
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Option<Duration>,
}

impl TokenService {
    pub fn new(secret: &str, ttl_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::try_days(ttl_days),
        }
    }

    // Generate JWT token
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let user_id = user
            .id
            .ok_or_else(|| AppError::Internal("user has no id".to_string()))?;
        let now = Utc::now();
        let expires = self
            .ttl
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| AppError::Internal("token lifetime out of range".to_string()))?;

        let claims = Claims {
            sub: user_id.to_hex(),
            email: user.email.clone(),
            name: user.name.clone(),
            is_admin: user.is_admin,
            iat: now.timestamp() as usize,
            exp: expires.timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    // Verify JWT token
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                log::debug!("🔒 Token rejected: {}", e);
                AppError::Unauthorized("Not authorized, token failed".to_string())
            })
    }
}

pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash(password, DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

pub async fn verify_password(password: &str, hashed: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hashed = hashed.to_string();
    tokio::task::spawn_blocking(move || verify(password, &hashed).unwrap_or(false))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, AppError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", field)))
}

/// POST /api/users
pub async fn register(
    store: &dyn Store,
    tokens: &TokenService,
    request: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    let name = required(&request.name, "Name")?;
    let email = normalize_email(required(&request.email, "Email")?);
    let password = request.password.as_deref().unwrap_or_default();

    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let now = DateTime::now();
    let user = User {
        id: None,
        name: name.to_string(),
        email,
        password: hash_password(password).await?,
        is_admin: false,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let user = match store.insert_user(user).await {
        Ok(user) => user,
        Err(StoreError::Duplicate(_)) => {
            return Err(AppError::BadRequest("User already exists".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    log::info!("✅ User registered: {}", user.email);

    Ok(AuthResponse {
        user: UserResponse::from(&user),
        token: tokens.issue(&user)?,
    })
}

/// POST /api/users/login
pub async fn login(
    store: &dyn Store,
    tokens: &TokenService,
    request: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = store
        .find_user_by_email(&normalize_email(&request.email))
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&request.password, &user.password).await? {
        log::warn!("⚠️ Failed login for {}", user.email);
        return Err(invalid());
    }

    Ok(AuthResponse {
        user: UserResponse::from(&user),
        token: tokens.issue(&user)?,
    })
}

/// GET /api/users/profile
pub async fn profile(store: &dyn Store, claims: &Claims) -> Result<UserResponse, AppError> {
    let user_id = parse_object_id(&claims.sub, "user")?;
    store
        .find_user(&user_id)
        .await?
        .map(|user| UserResponse::from(&user))
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
