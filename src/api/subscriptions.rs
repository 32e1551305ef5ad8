use actix_web::{web, HttpResponse};

use crate::{
    database::Store,
    models::{SubscribeRequest, SubscribeResponse},
    services::subscription_service::{self, SubscribeOutcome},
    utils::AppError,
};

// @route   POST /api/subscribe
// @access  Public
#[utoipa::path(
    post,
    path = "/api/subscribe",
    tag = "Subscriptions",
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Subscription created", body = SubscribeResponse),
        (status = 200, description = "Email was already subscribed", body = SubscribeResponse),
        (status = 400, description = "Email missing or invalid", body = crate::models::MessageResponse),
        (status = 500, description = "Unexpected failure", body = crate::models::MessageResponse)
    )
)]
pub async fn subscribe(
    store: web::Data<dyn Store>,
    request: web::Json<SubscribeRequest>,
) -> Result<HttpResponse, AppError> {
    match subscription_service::subscribe(store.get_ref(), request.into_inner()).await? {
        SubscribeOutcome::Created { email } => Ok(HttpResponse::Created().json(SubscribeResponse {
            message: "Subscription successful!".to_string(),
            email: Some(email),
        })),
        SubscribeOutcome::AlreadySubscribed => Ok(HttpResponse::Ok().json(SubscribeResponse {
            message: "Thank you for your interest!".to_string(),
            email: None,
        })),
    }
}
