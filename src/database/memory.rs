//! In-process store with the same contracts as the MongoDB one.
//! Used with `STORE=memory` and by the handler tests.

use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime};
use tokio::sync::RwLock;

use super::repository::*;
use crate::models::{Order, Product, Subscription, User};

#[derive(Default)]
pub struct MemoryStore {
    products: RwLock<Vec<Product>>,
    users: RwLock<Vec<User>>,
    orders: RwLock<Vec<Order>>,
    subscriptions: RwLock<Vec<Subscription>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> Option<DateTime>) {
    items.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let mut products = self.products.read().await.clone();
        newest_first(&mut products, |p| p.created_at);
        Ok(products)
    }

    async fn find_product(&self, id: &ObjectId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id.as_ref() == Some(id)).cloned())
    }

    async fn insert_product(&self, mut product: Product) -> Result<Product, StoreError> {
        product.id.get_or_insert_with(ObjectId::new);
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn replace_product(&self, product: &Product) -> Result<bool, StoreError> {
        let mut products = self.products.write().await;
        match products.iter_mut().find(|p| p.id.is_some() && p.id == product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_product(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let mut products = self.products.write().await;
        let before = products.len();
        products.retain(|p| p.id.as_ref() != Some(id));
        Ok(products.len() != before)
    }

    async fn count_products(&self) -> Result<u64, StoreError> {
        Ok(self.products.read().await.len() as u64)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, mut user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(user.email));
        }
        user.id.get_or_insert_with(ObjectId::new);
        users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn insert_order(&self, mut order: Order) -> Result<Order, StoreError> {
        order.id.get_or_insert_with(ObjectId::new);
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn find_order(&self, id: &ObjectId) -> Result<Option<Order>, StoreError> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.id.as_ref() == Some(id)).cloned())
    }

    async fn orders_for_user(&self, user: &ObjectId) -> Result<Vec<Order>, StoreError> {
        let mut orders: Vec<Order> = self
            .orders
            .read()
            .await
            .iter()
            .filter(|o| &o.user == user)
            .cloned()
            .collect();
        newest_first(&mut orders, |o| o.created_at);
        Ok(orders)
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn insert_subscription_if_absent(
        &self,
        email: &str,
    ) -> Result<InsertOutcome<Subscription>, StoreError> {
        // Check and insert under the same write guard
        let mut subscriptions = self.subscriptions.write().await;
        if subscriptions.iter().any(|s| s.email == email) {
            return Ok(InsertOutcome::AlreadyExists);
        }

        let subscription = Subscription {
            id: Some(ObjectId::new()),
            email: email.to_string(),
            created_at: Some(DateTime::now()),
        };
        subscriptions.push(subscription.clone());
        Ok(InsertOutcome::Created(subscription))
    }

    async fn count_subscriptions(&self, email: &str) -> Result<u64, StoreError> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions.iter().filter(|s| s.email == email).count() as u64)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
