use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::cart::Cart;
use crate::models::{
    AuthResponse, LoginRequest, MessageResponse, OrderResponse, ProductResponse, RegisterRequest,
    SubscribeRequest, SubscribeResponse,
};
use crate::services::subscription_service::SubscribeOutcome;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer; `message` is the server's `{ message }` body
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Your cart is empty.")]
    EmptyCart,
}

/// HTTP client for the storefront API
#[derive(Clone)]
pub struct StorefrontClient {
    http: reqwest::Client,
    base_url: String,
}

impl StorefrontClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn product_path(id: &str) -> String {
        format!("/api/products/{}", urlencoding::encode(id))
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let fallback = status.canonical_reason().unwrap_or("Request failed").to_string();
        let message = response
            .json::<MessageResponse>()
            .await
            .map(|body| body.message)
            .unwrap_or(fallback);

        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// GET /api/products
    pub async fn fetch_products(&self) -> Result<Vec<ProductResponse>, ClientError> {
        let response = self.http.get(self.url("/api/products")).send().await?;
        Self::read(response).await
    }

    pub async fn search_products(&self, keyword: &str) -> Result<Vec<ProductResponse>, ClientError> {
        let response = self
            .http
            .get(self.url("/api/products"))
            .query(&[("keyword", keyword)])
            .send()
            .await?;
        Self::read(response).await
    }

    pub async fn fetch_product(&self, id: &str) -> Result<ProductResponse, ClientError> {
        let response = self.http.get(self.url(&Self::product_path(id))).send().await?;
        Self::read(response).await
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        };
        let response = self.http.post(self.url("/api/users")).json(&body).send().await?;
        Self::read(response).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self
            .http
            .post(self.url("/api/users/login"))
            .json(&body)
            .send()
            .await?;
        Self::read(response).await
    }

    /// POST /api/orders com o conteúdo do carrinho
    pub async fn place_order(&self, token: &str, cart: &Cart) -> Result<OrderResponse, ClientError> {
        if cart.is_empty() {
            return Err(ClientError::EmptyCart);
        }

        let response = self
            .http
            .post(self.url("/api/orders"))
            .bearer_auth(token)
            .json(&cart.to_order_request())
            .send()
            .await?;
        Self::read(response).await
    }

    pub async fn my_orders(&self, token: &str) -> Result<Vec<OrderResponse>, ClientError> {
        let response = self
            .http
            .get(self.url("/api/orders/myorders"))
            .bearer_auth(token)
            .send()
            .await?;
        Self::read(response).await
    }

    /// 201 → `Created`, 200 → `AlreadySubscribed`
    pub async fn subscribe(&self, email: &str) -> Result<SubscribeOutcome, ClientError> {
        let body = SubscribeRequest {
            email: Some(email.to_string()),
        };
        let response = self.http.post(self.url("/api/subscribe")).json(&body).send().await?;
        let status = response.status();
        let body: SubscribeResponse = Self::read(response).await?;

        Ok(if status == StatusCode::CREATED {
            SubscribeOutcome::Created {
                email: body.email.unwrap_or_else(|| email.to_string()),
            }
        } else {
            SubscribeOutcome::AlreadySubscribed
        })
    }
}
