use crate::{
    database::{InsertOutcome, Store},
    models::SubscribeRequest,
    utils::AppError,
};

/// Resultado de POST /api/subscribe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Created { email: String },
    AlreadySubscribed,
}

/// Trims and lower-cases; requires one `@` with something on both sides.
pub fn normalize_email(raw: Option<&str>) -> Result<String, AppError> {
    let email = raw.map(str::trim).unwrap_or_default();
    if email.is_empty() {
        return Err(AppError::BadRequest("Email is required".to_string()));
    }

    let email = email.to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    Ok(email)
}

pub async fn subscribe(
    store: &dyn Store,
    request: SubscribeRequest,
) -> Result<SubscribeOutcome, AppError> {
    let email = normalize_email(request.email.as_deref())?;

    match store.insert_subscription_if_absent(&email).await? {
        InsertOutcome::Created(subscription) => {
            log::info!("📬 New subscription: {}", subscription.email);
            Ok(SubscribeOutcome::Created {
                email: subscription.email,
            })
        }
        InsertOutcome::AlreadyExists => {
            log::debug!("📬 Already subscribed: {}", email);
            Ok(SubscribeOutcome::AlreadySubscribed)
        }
    }
}
