use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{Order, Product, Subscription, User};

/// Falhas da camada de persistência
#[derive(Debug, Error)]
pub enum StoreError {
    /// Violação de unique index
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("{0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Resultado de um insert-if-absent atômico
#[derive(Debug, Clone)]
pub enum InsertOutcome<T> {
    Created(T),
    AlreadyExists,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Newest first
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;
    async fn find_product(&self, id: &ObjectId) -> Result<Option<Product>, StoreError>;
    async fn insert_product(&self, product: Product) -> Result<Product, StoreError>;
    /// Returns false when no product has the given id
    async fn replace_product(&self, product: &Product) -> Result<bool, StoreError>;
    async fn delete_product(&self, id: &ObjectId) -> Result<bool, StoreError>;
    async fn count_products(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    /// Fails with `StoreError::Duplicate` if the email is taken
    async fn insert_user(&self, user: User) -> Result<User, StoreError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn insert_order(&self, order: Order) -> Result<Order, StoreError>;
    async fn find_order(&self, id: &ObjectId) -> Result<Option<Order>, StoreError>;
    /// Newest first
    async fn orders_for_user(&self, user: &ObjectId) -> Result<Vec<Order>, StoreError>;
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Single atomic step backed by the unique email index; concurrent
    /// callers with the same email see exactly one `Created`.
    async fn insert_subscription_if_absent(
        &self,
        email: &str,
    ) -> Result<InsertOutcome<Subscription>, StoreError>;
    async fn count_subscriptions(&self, email: &str) -> Result<u64, StoreError>;
}

/// Tudo que os handlers precisam da persistência
#[async_trait]
pub trait Store: ProductRepository + UserRepository + OrderRepository + SubscriptionRepository {
    async fn ping(&self) -> Result<(), StoreError>;
}
