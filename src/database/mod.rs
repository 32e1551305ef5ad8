pub mod memory;
pub mod repository;

pub use memory::MemoryStore;
pub use repository::*;

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};

use crate::models::{Order, Product, Subscription, User};

const PRODUCTS: &str = "products";
const USERS: &str = "users";
const ORDERS: &str = "orders";
const SUBSCRIPTIONS: &str = "subscriptions";
const DEFAULT_DATABASE: &str = "flickrly";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, StoreError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        // Nome do banco vem do path da URI, senão usa o default
        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        // Test connection
        db.run_command(doc! { "ping": 1 }).await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Creates the indexes the storefront relies on. The unique indexes on
    /// `subscriptions.email` and `users.email` carry the one-record-per-email
    /// guarantee: if either cannot be built (e.g. the collection already holds
    /// duplicate emails) startup fails.
    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        log::info!("🔧 Creating database indexes...");

        let unique = || IndexOptions::builder().unique(true).build();

        let indexes: [(&str, Document, Option<IndexOptions>); 4] = [
            (SUBSCRIPTIONS, doc! { "email": 1 }, Some(unique())),
            (USERS, doc! { "email": 1 }, Some(unique())),
            (ORDERS, doc! { "user": 1, "createdAt": -1 }, None),
            (PRODUCTS, doc! { "createdAt": -1 }, None),
        ];

        for (collection, keys, options) in indexes {
            let is_unique = options.is_some();
            let label = format!("{}({})", collection, keys.keys().cloned().collect::<Vec<_>>().join(", "));
            let model = IndexModel::builder().keys(keys).options(options).build();

            match self.collection::<Document>(collection).create_index(model).await {
                Ok(_) => log::info!("   ✅ Index created: {}", label),
                Err(e) if is_unique => {
                    log::error!("❌ Unique index {} could not be built: {}", label, e);
                    return Err(StoreError::Backend(format!("unique index {} not ensured: {}", label, e)));
                }
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");
        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    fn products(&self) -> Collection<Product> {
        self.collection(PRODUCTS)
    }

    fn users(&self) -> Collection<User> {
        self.collection(USERS)
    }

    fn orders(&self) -> Collection<Order> {
        self.collection(ORDERS)
    }

    fn subscriptions(&self) -> Collection<Subscription> {
        self.collection(SUBSCRIPTIONS)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl ProductRepository for MongoDB {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let cursor = self
            .products()
            .find(doc! {})
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_product(&self, id: &ObjectId) -> Result<Option<Product>, StoreError> {
        Ok(self.products().find_one(doc! { "_id": *id }).await?)
    }

    async fn insert_product(&self, mut product: Product) -> Result<Product, StoreError> {
        product.id.get_or_insert_with(ObjectId::new);
        self.products().insert_one(&product).await?;
        Ok(product)
    }

    async fn replace_product(&self, product: &Product) -> Result<bool, StoreError> {
        let Some(id) = product.id else {
            return Ok(false);
        };
        let result = self
            .products()
            .replace_one(doc! { "_id": id }, product)
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_product(&self, id: &ObjectId) -> Result<bool, StoreError> {
        let result = self.products().delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn count_products(&self) -> Result<u64, StoreError> {
        Ok(self.products().count_documents(doc! {}).await?)
    }
}

#[async_trait]
impl UserRepository for MongoDB {
    async fn find_user(&self, id: &ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "_id": *id }).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn insert_user(&self, mut user: User) -> Result<User, StoreError> {
        user.id.get_or_insert_with(ObjectId::new);
        match self.users().insert_one(&user).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Duplicate(user.email)),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl OrderRepository for MongoDB {
    async fn insert_order(&self, mut order: Order) -> Result<Order, StoreError> {
        order.id.get_or_insert_with(ObjectId::new);
        self.orders().insert_one(&order).await?;
        Ok(order)
    }

    async fn find_order(&self, id: &ObjectId) -> Result<Option<Order>, StoreError> {
        Ok(self.orders().find_one(doc! { "_id": *id }).await?)
    }

    async fn orders_for_user(&self, user: &ObjectId) -> Result<Vec<Order>, StoreError> {
        let cursor = self
            .orders()
            .find(doc! { "user": *user })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl SubscriptionRepository for MongoDB {
    async fn insert_subscription_if_absent(
        &self,
        email: &str,
    ) -> Result<InsertOutcome<Subscription>, StoreError> {
        let subscription = Subscription {
            id: Some(ObjectId::new()),
            email: email.to_string(),
            created_at: Some(DateTime::now()),
        };

        // Sem find antes: o unique index decide quem chegou primeiro
        match self.subscriptions().insert_one(&subscription).await {
            Ok(_) => Ok(InsertOutcome::Created(subscription)),
            Err(e) if is_duplicate_key(&e) => Ok(InsertOutcome::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    async fn count_subscriptions(&self, email: &str) -> Result<u64, StoreError> {
        Ok(self
            .subscriptions()
            .count_documents(doc! { "email": email })
            .await?)
    }
}

#[async_trait]
impl Store for MongoDB {
    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mongo_uri() -> String {
        dotenv::dotenv().ok();
        std::env::var("MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017/flickrly_test".to_string())
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        let db = MongoDB::new(&mongo_uri()).await;
        assert!(db.is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_startup_fails_when_subscription_emails_are_not_unique() {
        let base = std::env::var("MONGO_TEST_BASE").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let db_name = format!("flickrly_dup_{}", ObjectId::new().to_hex());
        let client = Client::with_uri_str(&base).await.unwrap();
        let raw = client.database(&db_name).collection::<Document>(SUBSCRIPTIONS);
        raw.insert_many(vec![doc! { "email": "twice@flickrly.test" }, doc! { "email": "twice@flickrly.test" }])
            .await
            .unwrap();

        let result = MongoDB::new(&format!("{}/{}", base, db_name)).await;

        client.database(&db_name).drop().await.unwrap();
        assert!(matches!(result, Err(StoreError::Backend(_))));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_concurrent_subscriptions_create_one_record() {
        let db = MongoDB::new(&mongo_uri()).await.unwrap();
        let email = format!("race-{}@flickrly.test", ObjectId::new().to_hex());

        let attempts = (0..8).map(|_| db.insert_subscription_if_absent(&email));
        let outcomes = futures::future::join_all(attempts).await;

        let created = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, Ok(InsertOutcome::Created(_))))
            .count();
        assert_eq!(created, 1);
        assert_eq!(db.count_subscriptions(&email).await.unwrap(), 1);
    }
}
